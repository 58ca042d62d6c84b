//! Table occupancy tracker
//!
//! A table is bound to at most one live order. Binding and releasing are
//! compare-and-swap updates run inside the caller's transaction.

use shared::models::TableStatus;

use crate::db::repository::{Tx, dining_table};
use crate::orders::error::{ConflictKind, OrderError, Resource};

/// Bind `table_id` to `order_id`
///
/// Re-assigning the same order is a no-op success.
pub async fn assign(tx: &mut Tx<'_>, table_id: i64, order_id: i64, now: i64) -> Result<(), OrderError> {
    if dining_table::try_assign(tx, table_id, order_id, now).await? {
        return Ok(());
    }
    match dining_table::find_by_id_tx(tx, table_id).await? {
        None => Err(OrderError::not_found(Resource::Table, table_id)),
        Some(table) => Err(OrderError::conflict(
            ConflictKind::TableOccupied,
            format!(
                "Table {} is occupied by order {}",
                table_id,
                table.current_order_id.unwrap_or_default()
            ),
        )),
    }
}

/// Free `table_id` if it is still held by `order_id`
///
/// A table that has moved on to another order (or was freed by hand) is left
/// alone. A released table with confirmed reservations becomes `reserved`
/// again. Returns whether the table was released.
pub async fn release(tx: &mut Tx<'_>, table_id: i64, order_id: i64, now: i64) -> Result<bool, OrderError> {
    let released = dining_table::release_if_held_by(tx, table_id, order_id, now).await?;
    if released {
        tracing::info!(table_id, order_id, "Table released");
    } else {
        tracing::warn!(table_id, order_id, "Table not held by this order, left untouched");
    }
    Ok(released)
}

/// Lowest-numbered available table
pub async fn pick_first_available(tx: &mut Tx<'_>) -> Result<Option<i64>, OrderError> {
    Ok(dining_table::first_available(tx).await?)
}

/// Manual status change, `occupied` is only reachable through [`assign`]
pub fn check_manual_status(current: TableStatus, requested: TableStatus) -> Result<(), OrderError> {
    match (current, requested) {
        (_, TableStatus::Occupied) => Err(OrderError::validation(
            "A table becomes occupied only by seating an order",
        )),
        (TableStatus::Occupied, TableStatus::Reserved) => Err(OrderError::conflict(
            ConflictKind::TableNotAvailable,
            "An occupied table cannot be reserved",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::DiningTableCreate;

    async fn setup() -> DbService {
        let db = DbService::in_memory().await.unwrap();
        for number in [3, 1, 2] {
            dining_table::create(
                &db.pool,
                DiningTableCreate {
                    number: Some(number),
                    capacity: 2,
                    location: Some("Patio".into()),
                    table_type: None,
                    notes: None,
                },
            )
            .await
            .unwrap();
        }
        // Orders referenced by the tables below
        for id in [10, 11] {
            sqlx::query(
                "INSERT INTO orders (id, order_number, order_type, status, created_at, updated_at) VALUES (?1, ?2, 'dine-in', 'pending', 0, 0)",
            )
            .bind(id)
            .bind(format!("ORD-TEST-{id}"))
            .execute(&db.pool)
            .await
            .unwrap();
        }
        db
    }

    #[tokio::test]
    async fn test_assign_is_exclusive() {
        let db = setup().await;
        let mut tx = db.pool.begin().await.unwrap();

        assign(&mut tx, 1, 10, 1).await.unwrap();
        // Same order again is fine
        assign(&mut tx, 1, 10, 2).await.unwrap();

        let err = assign(&mut tx, 1, 11, 3).await.unwrap_err();
        assert!(matches!(
            err,
            OrderError::Conflict {
                kind: ConflictKind::TableOccupied,
                ..
            }
        ));

        let err = assign(&mut tx, 99, 11, 3).await.unwrap_err();
        assert!(matches!(
            err,
            OrderError::NotFound {
                resource: Resource::Table,
                id: 99
            }
        ));
        tx.commit().await.unwrap();

        let table = dining_table::find_by_id(&db.pool, 1).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Occupied);
        assert_eq!(table.current_order_id, Some(10));
    }

    #[tokio::test]
    async fn test_release_with_other_order_is_noop() {
        let db = setup().await;
        let mut tx = db.pool.begin().await.unwrap();
        assign(&mut tx, 2, 10, 1).await.unwrap();

        assert!(!release(&mut tx, 2, 11, 2).await.unwrap());
        let table = dining_table::find_by_id_tx(&mut tx, 2).await.unwrap().unwrap();
        assert_eq!(table.current_order_id, Some(10));

        assert!(release(&mut tx, 2, 10, 3).await.unwrap());
        let table = dining_table::find_by_id_tx(&mut tx, 2).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Available);
        assert_eq!(table.current_order_id, None);
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_release_keeps_reserved_table_reserved() {
        use crate::db::repository::reservation;
        use shared::models::ReservationCreate;

        let db = setup().await;
        let mut tx = db.pool.begin().await.unwrap();
        let booking = ReservationCreate {
            table_id: 3,
            customer_name: "Noor".into(),
            phone: "555-0175".into(),
            party_size: 2,
            reserved_for: 1_741_064_767_000,
            special_requests: None,
        };
        reservation::insert(&mut tx, &booking, 1).await.unwrap();
        dining_table::set_status(&mut tx, 3, TableStatus::Reserved, 1)
            .await
            .unwrap();

        assign(&mut tx, 3, 10, 2).await.unwrap();
        assert!(release(&mut tx, 3, 10, 3).await.unwrap());
        let table = dining_table::find_by_id_tx(&mut tx, 3).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Reserved);
        assert_eq!(table.current_order_id, None);
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_pick_first_available_is_lowest_id() {
        let db = setup().await;
        let mut tx = db.pool.begin().await.unwrap();
        assert_eq!(pick_first_available(&mut tx).await.unwrap(), Some(1));

        assign(&mut tx, 1, 10, 1).await.unwrap();
        dining_table::set_status(&mut tx, 2, TableStatus::Reserved, 1)
            .await
            .unwrap();
        assert_eq!(pick_first_available(&mut tx).await.unwrap(), Some(3));

        assign(&mut tx, 3, 11, 1).await.unwrap();
        assert_eq!(pick_first_available(&mut tx).await.unwrap(), None);
        tx.commit().await.unwrap();
    }

    #[test]
    fn test_manual_status_rules() {
        use TableStatus::*;
        assert!(check_manual_status(Available, Reserved).is_ok());
        assert!(check_manual_status(Reserved, Available).is_ok());
        assert!(check_manual_status(Occupied, Available).is_ok());
        assert!(matches!(
            check_manual_status(Available, Occupied),
            Err(OrderError::Validation(_))
        ));
        assert!(matches!(
            check_manual_status(Occupied, Reserved),
            Err(OrderError::Conflict { .. })
        ));
    }
}
