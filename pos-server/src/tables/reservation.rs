//! Table reservations
//!
//! Reserving flips an available table to `reserved`. Cancelling the last
//! confirmed reservation of a table hands it back as `available`. A reserved
//! table can still be seated; once that order ends it returns to `reserved`
//! while any confirmed reservation remains.

use shared::models::{Reservation, ReservationCreate, ReservationStatus, TableStatus};
use sqlx::SqlitePool;

use crate::db::repository::{dining_table, reservation as reservation_repo};
use crate::orders::error::{ConflictKind, OrderError, Resource};

#[derive(Clone)]
pub struct ReservationService {
    pool: SqlitePool,
}

impl ReservationService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Confirmed reservations, soonest first
    pub async fn list(&self) -> Result<Vec<Reservation>, OrderError> {
        Ok(reservation_repo::find_confirmed(&self.pool).await?)
    }

    pub async fn create(&self, mut data: ReservationCreate) -> Result<Reservation, OrderError> {
        data.customer_name = data.customer_name.trim().to_string();
        data.phone = data.phone.trim().to_string();
        data.special_requests = data
            .special_requests
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if data.customer_name.is_empty() {
            return Err(OrderError::validation("Customer name is required"));
        }
        if data.phone.is_empty() {
            return Err(OrderError::validation("Phone number is required"));
        }
        if data.party_size < 1 {
            return Err(OrderError::validation("Party size must be at least 1"));
        }

        let mut tx = self.pool.begin().await?;
        let table = dining_table::find_by_id_tx(&mut tx, data.table_id)
            .await?
            .ok_or_else(|| OrderError::not_found(Resource::Table, data.table_id))?;
        if data.party_size > table.capacity {
            return Err(OrderError::CapacityExceeded {
                table_id: table.id,
                capacity: table.capacity,
                party_size: data.party_size,
            });
        }
        if table.status != TableStatus::Available {
            return Err(OrderError::conflict(
                ConflictKind::TableNotAvailable,
                format!("Table {} is {}", table.id, table.status),
            ));
        }

        let now = shared::util::now_millis();
        let id = reservation_repo::insert(&mut tx, &data, now).await?;
        dining_table::set_status(&mut tx, table.id, TableStatus::Reserved, now).await?;
        let reservation = reservation_repo::find_by_id_tx(&mut tx, id)
            .await?
            .ok_or_else(|| OrderError::not_found(Resource::Reservation, id))?;
        tx.commit().await?;

        tracing::info!(
            reservation_id = id,
            table_id = table.id,
            party_size = data.party_size,
            reserved_for = data.reserved_for,
            "Reservation created"
        );
        Ok(reservation)
    }

    pub async fn cancel(&self, reservation_id: i64) -> Result<Reservation, OrderError> {
        let mut tx = self.pool.begin().await?;
        let reservation = reservation_repo::find_by_id_tx(&mut tx, reservation_id)
            .await?
            .ok_or_else(|| OrderError::not_found(Resource::Reservation, reservation_id))?;
        if reservation.status == ReservationStatus::Cancelled {
            return Err(OrderError::validation(format!(
                "Reservation {reservation_id} is already cancelled"
            )));
        }

        reservation_repo::set_status(&mut tx, reservation_id, ReservationStatus::Cancelled).await?;

        let remaining = reservation_repo::count_confirmed_for_table(&mut tx, reservation.table_id).await?;
        if remaining == 0
            && let Some(table) = dining_table::find_by_id_tx(&mut tx, reservation.table_id).await?
            && table.status == TableStatus::Reserved
        {
            let now = shared::util::now_millis();
            dining_table::set_status(&mut tx, table.id, TableStatus::Available, now).await?;
        }

        let cancelled = reservation_repo::find_by_id_tx(&mut tx, reservation_id)
            .await?
            .ok_or_else(|| OrderError::not_found(Resource::Reservation, reservation_id))?;
        tx.commit().await?;

        tracing::info!(reservation_id, table_id = reservation.table_id, "Reservation cancelled");
        Ok(cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::DiningTableCreate;

    async fn setup() -> (DbService, ReservationService) {
        let db = DbService::in_memory().await.unwrap();
        for (number, capacity) in [(1, 2), (2, 6)] {
            dining_table::create(
                &db.pool,
                DiningTableCreate {
                    number: Some(number),
                    capacity,
                    location: None,
                    table_type: None,
                    notes: None,
                },
            )
            .await
            .unwrap();
        }
        let service = ReservationService::new(db.pool.clone());
        (db, service)
    }

    fn booking(table_id: i64, party_size: i32) -> ReservationCreate {
        ReservationCreate {
            table_id,
            customer_name: " Lee ".into(),
            phone: "555-0199".into(),
            party_size,
            reserved_for: 1_741_064_767_000,
            special_requests: Some("  ".into()),
        }
    }

    #[tokio::test]
    async fn test_reserve_then_cancel_restores_table() {
        let (db, service) = setup().await;

        let reservation = service.create(booking(2, 4)).await.unwrap();
        assert_eq!(reservation.customer_name, "Lee");
        assert_eq!(reservation.special_requests, None);
        assert_eq!(reservation.status, ReservationStatus::Confirmed);
        let table = dining_table::find_by_id(&db.pool, 2).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Reserved);
        assert_eq!(service.list().await.unwrap().len(), 1);

        let cancelled = service.cancel(reservation.id).await.unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);
        let table = dining_table::find_by_id(&db.pool, 2).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Available);
        assert!(service.list().await.unwrap().is_empty());

        assert!(matches!(
            service.cancel(reservation.id).await,
            Err(OrderError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_reserve_rules() {
        let (_db, service) = setup().await;

        assert!(matches!(
            service.create(booking(1, 3)).await,
            Err(OrderError::CapacityExceeded {
                table_id: 1,
                capacity: 2,
                party_size: 3
            })
        ));
        assert!(matches!(
            service.create(booking(7, 2)).await,
            Err(OrderError::NotFound {
                resource: Resource::Table,
                id: 7
            })
        ));
        assert!(matches!(
            service.create(booking(1, 0)).await,
            Err(OrderError::Validation(_))
        ));

        service.create(booking(1, 2)).await.unwrap();
        assert!(matches!(
            service.create(booking(1, 1)).await,
            Err(OrderError::Conflict {
                kind: ConflictKind::TableNotAvailable,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_seated_reserved_table_returns_to_reserved() {
        use crate::db::repository::menu_item;
        use crate::orders::cart::Cart;
        use crate::orders::lifecycle::{OrderLifecycle, SubmitRequest};
        use shared::models::{CustomerInfo, MenuItemCreate, OrderType};

        let (db, service) = setup().await;
        let reservation = service.create(booking(2, 4)).await.unwrap();

        let coffee = menu_item::create(
            &db.pool,
            MenuItemCreate {
                name: "Coffee".into(),
                description: None,
                price: 2.5,
                category: "Drinks".into(),
                is_available: None,
            },
        )
        .await
        .unwrap();
        let mut cart = Cart::new();
        cart.add_item(&coffee, 1).unwrap();

        let lifecycle = OrderLifecycle::new(db.pool.clone(), false, chrono_tz::UTC);
        let submitted = lifecycle
            .submit(
                &cart,
                SubmitRequest {
                    order_type: OrderType::DineIn,
                    customer: CustomerInfo {
                        name: Some("Lee".into()),
                        ..Default::default()
                    },
                    table_id: Some(2),
                    notes: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(submitted.table_id, Some(2));

        lifecycle.cancel(submitted.order_id).await.unwrap();
        let table = dining_table::find_by_id(&db.pool, 2).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Reserved);
        assert_eq!(table.current_order_id, None);

        // Still held for the first booking
        assert!(matches!(
            service.create(booking(2, 2)).await,
            Err(OrderError::Conflict {
                kind: ConflictKind::TableNotAvailable,
                ..
            })
        ));
        assert_eq!(service.list().await.unwrap().len(), 1);

        service.cancel(reservation.id).await.unwrap();
        let table = dining_table::find_by_id(&db.pool, 2).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Available);
    }

    #[tokio::test]
    async fn test_cancel_unknown_reservation() {
        let (_db, service) = setup().await;
        assert!(matches!(
            service.cancel(5).await,
            Err(OrderError::NotFound {
                resource: Resource::Reservation,
                id: 5
            })
        ));
    }
}
