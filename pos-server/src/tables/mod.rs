//! Tables and reservations
//!
//! - [`occupancy`] - order/table binding used by the order lifecycle
//! - [`reservation`] - reserving available tables
//! - [`TableService`] - floor management (create, update, delete, free, status)

pub mod occupancy;
pub mod reservation;

use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate, TableDetail, TableStatus};
use sqlx::SqlitePool;

use crate::db::repository::{RepoError, dining_table, order as order_repo, reservation as reservation_repo};
use crate::orders::error::{ConflictKind, OrderError, Resource};

pub use reservation::ReservationService;

#[derive(Clone)]
pub struct TableService {
    pool: SqlitePool,
}

impl TableService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<DiningTable>, OrderError> {
        Ok(dining_table::find_all(&self.pool).await?)
    }

    /// Table plus a summary of the order seated at it
    pub async fn details(&self, table_id: i64) -> Result<TableDetail, OrderError> {
        let table = dining_table::find_by_id(&self.pool, table_id)
            .await?
            .ok_or_else(|| OrderError::not_found(Resource::Table, table_id))?;
        let current_order = match table.current_order_id {
            Some(order_id) => order_repo::find_summary(&self.pool, order_id).await?,
            None => None,
        };
        Ok(TableDetail {
            table,
            current_order,
        })
    }

    pub async fn create(&self, data: DiningTableCreate) -> Result<DiningTable, OrderError> {
        if data.capacity < 1 {
            return Err(OrderError::validation("Capacity must be at least 1"));
        }
        if let Some(number) = data.number
            && number < 1
        {
            return Err(OrderError::validation("Table number must be positive"));
        }
        let table = dining_table::create(&self.pool, data).await.map_err(|e| match e {
            RepoError::Duplicate(msg) => OrderError::conflict(ConflictKind::TableExists, msg),
            other => other.into(),
        })?;
        tracing::info!(table_id = table.id, capacity = table.capacity, "Table created");
        Ok(table)
    }

    pub async fn update(&self, table_id: i64, data: DiningTableUpdate) -> Result<DiningTable, OrderError> {
        if let Some(capacity) = data.capacity
            && capacity < 1
        {
            return Err(OrderError::validation("Capacity must be at least 1"));
        }
        dining_table::update(&self.pool, table_id, data)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => OrderError::not_found(Resource::Table, table_id),
                other => other.into(),
            })
    }

    /// Delete a table that no order has ever used
    pub async fn delete(&self, table_id: i64) -> Result<(), OrderError> {
        let mut tx = self.pool.begin().await?;
        if dining_table::find_by_id_tx(&mut tx, table_id).await?.is_none() {
            return Err(OrderError::not_found(Resource::Table, table_id));
        }
        let orders = order_repo::count_for_table(&mut tx, table_id).await?;
        if orders > 0 {
            return Err(OrderError::conflict(
                ConflictKind::TableHasOrders,
                format!("Table {table_id} is referenced by {orders} order(s)"),
            ));
        }
        dining_table::delete(&mut tx, table_id).await?;
        tx.commit().await?;
        tracing::info!(table_id, "Table deleted");
        Ok(())
    }

    /// Make the table available, refused while a live order sits at it or
    /// reservations are still confirmed
    pub async fn free(&self, table_id: i64) -> Result<DiningTable, OrderError> {
        self.set_status(table_id, TableStatus::Available).await
    }

    /// Manual status update (`available` / `reserved`)
    pub async fn set_status(&self, table_id: i64, status: TableStatus) -> Result<DiningTable, OrderError> {
        let mut tx = self.pool.begin().await?;
        let table = dining_table::find_by_id_tx(&mut tx, table_id)
            .await?
            .ok_or_else(|| OrderError::not_found(Resource::Table, table_id))?;
        occupancy::check_manual_status(table.status, status)?;

        if let Some(order_id) = table.current_order_id
            && let Some(order) = order_repo::find_by_id_tx(&mut tx, order_id).await?
            && !order.status.is_terminal()
        {
            return Err(OrderError::conflict(
                ConflictKind::TableOccupied,
                format!(
                    "Table {table_id} is held by order {} ({})",
                    order.order_number, order.status
                ),
            ));
        }

        if status == TableStatus::Available {
            let reserved = reservation_repo::count_confirmed_for_table(&mut tx, table_id).await?;
            if reserved > 0 {
                return Err(OrderError::conflict(
                    ConflictKind::TableNotAvailable,
                    format!("Table {table_id} has {reserved} confirmed reservation(s)"),
                ));
            }
        }

        let now = shared::util::now_millis();
        dining_table::set_status(&mut tx, table_id, status, now).await?;
        let updated = dining_table::find_by_id_tx(&mut tx, table_id)
            .await?
            .ok_or_else(|| OrderError::not_found(Resource::Table, table_id))?;
        tx.commit().await?;

        tracing::info!(table_id, from = %table.status, to = %status, "Table status changed");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::orders::cart::Cart;
    use crate::orders::lifecycle::{OrderLifecycle, SubmitRequest};
    use shared::models::{CustomerInfo, MenuItemCreate, OrderStatus, OrderType};

    fn new_table(number: Option<i64>) -> DiningTableCreate {
        DiningTableCreate {
            number,
            capacity: 4,
            location: Some("Main hall".into()),
            table_type: Some("booth".into()),
            notes: None,
        }
    }

    async fn seat_order(db: &DbService, table_id: i64) -> i64 {
        let item = crate::db::repository::menu_item::create(
            &db.pool,
            MenuItemCreate {
                name: "Tea".into(),
                description: None,
                price: 2.0,
                category: "Drinks".into(),
                is_available: None,
            },
        )
        .await
        .unwrap();
        let mut cart = Cart::new();
        cart.add_item(&item, 1).unwrap();
        let lifecycle = OrderLifecycle::new(db.pool.clone(), false, chrono_tz::UTC);
        lifecycle
            .submit(
                &cart,
                SubmitRequest {
                    order_type: OrderType::DineIn,
                    customer: CustomerInfo {
                        name: Some("Walk-in Customer".into()),
                        ..Default::default()
                    },
                    table_id: Some(table_id),
                    notes: None,
                },
            )
            .await
            .unwrap()
            .order_id
    }

    #[tokio::test]
    async fn test_create_numbering() {
        let db = DbService::in_memory().await.unwrap();
        let service = TableService::new(db.pool.clone());

        let t5 = service.create(new_table(Some(5))).await.unwrap();
        assert_eq!(t5.id, 5);
        assert_eq!(t5.status, TableStatus::Available);

        let next = service.create(new_table(None)).await.unwrap();
        assert_eq!(next.id, 6);

        let dup = service.create(new_table(Some(5))).await.unwrap_err();
        assert!(matches!(
            dup,
            OrderError::Conflict {
                kind: ConflictKind::TableExists,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_delete_refused_with_order_history() {
        let db = DbService::in_memory().await.unwrap();
        let service = TableService::new(db.pool.clone());
        service.create(new_table(Some(1))).await.unwrap();
        service.create(new_table(Some(2))).await.unwrap();

        let order_id = seat_order(&db, 1).await;
        let lifecycle = OrderLifecycle::new(db.pool.clone(), false, chrono_tz::UTC);
        lifecycle.cancel(order_id).await.unwrap();

        // Cancelled orders still count as history
        assert!(matches!(
            service.delete(1).await,
            Err(OrderError::Conflict {
                kind: ConflictKind::TableHasOrders,
                ..
            })
        ));

        service.delete(2).await.unwrap();
        assert!(matches!(
            service.delete(2).await,
            Err(OrderError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_free_refused_while_order_is_live() {
        let db = DbService::in_memory().await.unwrap();
        let service = TableService::new(db.pool.clone());
        service.create(new_table(Some(1))).await.unwrap();
        let order_id = seat_order(&db, 1).await;

        assert!(matches!(
            service.free(1).await,
            Err(OrderError::Conflict {
                kind: ConflictKind::TableOccupied,
                ..
            })
        ));

        let detail = service.details(1).await.unwrap();
        let current = detail.current_order.unwrap();
        assert_eq!(current.id, order_id);
        assert_eq!(current.status, OrderStatus::Pending);

        let lifecycle = OrderLifecycle::new(db.pool.clone(), false, chrono_tz::UTC);
        lifecycle.cancel(order_id).await.unwrap();
        let table = service.free(1).await.unwrap();
        assert_eq!(table.status, TableStatus::Available);
    }

    #[tokio::test]
    async fn test_manual_reserve_and_release() {
        let db = DbService::in_memory().await.unwrap();
        let service = TableService::new(db.pool.clone());
        service.create(new_table(Some(1))).await.unwrap();

        let t = service.set_status(1, TableStatus::Reserved).await.unwrap();
        assert_eq!(t.status, TableStatus::Reserved);
        assert!(matches!(
            service.set_status(1, TableStatus::Occupied).await,
            Err(OrderError::Validation(_))
        ));
        let t = service.set_status(1, TableStatus::Available).await.unwrap();
        assert_eq!(t.status, TableStatus::Available);
    }

    #[tokio::test]
    async fn test_free_refused_while_reservation_confirmed() {
        let db = DbService::in_memory().await.unwrap();
        let service = TableService::new(db.pool.clone());
        service.create(new_table(Some(1))).await.unwrap();

        let reservations = ReservationService::new(db.pool.clone());
        let reservation = reservations
            .create(shared::models::ReservationCreate {
                table_id: 1,
                customer_name: "Kai".into(),
                phone: "555-0142".into(),
                party_size: 2,
                reserved_for: 1_741_064_767_000,
                special_requests: None,
            })
            .await
            .unwrap();

        assert!(matches!(
            service.free(1).await,
            Err(OrderError::Conflict {
                kind: ConflictKind::TableNotAvailable,
                ..
            })
        ));
        let table = dining_table::find_by_id(&db.pool, 1).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Reserved);

        reservations.cancel(reservation.id).await.unwrap();
        let table = service.free(1).await.unwrap();
        assert_eq!(table.status, TableStatus::Available);
    }

    #[tokio::test]
    async fn test_update_table() {
        let db = DbService::in_memory().await.unwrap();
        let service = TableService::new(db.pool.clone());
        service.create(new_table(Some(1))).await.unwrap();

        let t = service
            .update(
                1,
                DiningTableUpdate {
                    capacity: Some(6),
                    notes: Some("Window".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(t.capacity, 6);
        assert_eq!(t.notes.as_deref(), Some("Window"));
        assert_eq!(t.location.as_deref(), Some("Main hall"));

        assert!(matches!(
            service.update(9, DiningTableUpdate::default()).await,
            Err(OrderError::NotFound { .. })
        ));
    }
}
