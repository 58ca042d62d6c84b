//! Order lifecycle manager
//!
//! ```text
//! pending -> preparing -> ready -> completed
//!    |           |
//!    +-----------+------> cancelled
//! ```
//!
//! Every operation runs in one SQLite transaction. Submission writes the
//! header, the lines and the table assignment together; entering a terminal
//! status releases the table in the same transaction.

use chrono::TimeZone;
use chrono_tz::Tz;
use shared::models::{
    CustomerInfo, Order, OrderStatus, OrderType, PaymentMethod, SubmittedOrder,
};
use sqlx::SqlitePool;

use super::cart::Cart;
use super::error::{OrderError, Resource};
use crate::db::repository::order::{self as order_repo, NewOrder, NewOrderLine};
use crate::db::repository::Tx;
use crate::tables::occupancy;

/// Everything a submission needs besides the cart
#[derive(Debug, Clone, Default)]
pub struct SubmitRequest {
    pub order_type: OrderType,
    pub customer: CustomerInfo,
    /// Requested table (dine-in only)
    pub table_id: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct OrderLifecycle {
    pool: SqlitePool,
    auto_assign_table: bool,
    tz: Tz,
}

impl OrderLifecycle {
    pub fn new(pool: SqlitePool, auto_assign_table: bool, tz: Tz) -> Self {
        Self {
            pool,
            auto_assign_table,
            tz,
        }
    }

    /// Persist the cart as a new pending order
    pub async fn submit(
        &self,
        cart: &Cart,
        request: SubmitRequest,
    ) -> Result<SubmittedOrder, OrderError> {
        if cart.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        let customer = normalize_customer(request.customer);
        validate_customer(request.order_type, &customer)?;
        if request.table_id.is_some() && request.order_type != OrderType::DineIn {
            return Err(OrderError::validation(format!(
                "{} orders cannot be assigned a table",
                request.order_type
            )));
        }

        let now = shared::util::now_millis();
        let order_number = order_number(request.order_type, now, self.tz);
        let total = cart.total();

        let mut tx = self.pool.begin().await?;

        // Header first so the transaction holds the write lock before any table lookup
        let order_id = order_repo::insert(
            &mut tx,
            &NewOrder {
                order_number: &order_number,
                order_type: request.order_type,
                table_id: None,
                customer: &customer,
                notes: request.notes.as_deref().filter(|n| !n.trim().is_empty()),
                total,
                created_at: now,
            },
        )
        .await?;

        for line in cart.lines() {
            order_repo::insert_line(
                &mut tx,
                order_id,
                &NewOrderLine {
                    menu_item_id: line.menu_item_id,
                    name: &line.name,
                    price: line.price,
                    quantity: line.quantity,
                    line_total: line.line_total,
                },
            )
            .await?;
        }

        let table_id = match (request.order_type, request.table_id) {
            (OrderType::DineIn, Some(id)) => Some(id),
            (OrderType::DineIn, None) if self.auto_assign_table => {
                occupancy::pick_first_available(&mut tx).await?
            }
            _ => None,
        };
        if let Some(table_id) = table_id {
            occupancy::assign(&mut tx, table_id, order_id, now).await?;
            order_repo::set_table(&mut tx, order_id, table_id).await?;
        } else if request.order_type == OrderType::DineIn {
            tracing::info!(order_id, "No table available, dine-in order placed without a table");
        }

        tx.commit().await?;

        tracing::info!(
            order_id,
            order_number = %order_number,
            order_type = %request.order_type,
            table_id = ?table_id,
            total,
            "Order submitted"
        );

        Ok(SubmittedOrder {
            order_id,
            order_number,
            table_id,
            total,
        })
    }

    /// Move an order along the lifecycle
    pub async fn set_status(&self, order_id: i64, status: OrderStatus) -> Result<Order, OrderError> {
        let mut tx = self.pool.begin().await?;
        let order = load(&mut tx, order_id).await?;
        transition(&mut tx, &order, status, None).await?;
        let updated = load(&mut tx, order_id).await?;
        tx.commit().await?;
        Ok(updated)
    }

    /// Record payment and complete the order
    pub async fn complete_payment(
        &self,
        order_id: i64,
        payment_method: PaymentMethod,
    ) -> Result<Order, OrderError> {
        let mut tx = self.pool.begin().await?;
        let order = load(&mut tx, order_id).await?;
        if order.status == OrderStatus::Completed {
            return Err(OrderError::AlreadyCompleted(order_id));
        }
        transition(&mut tx, &order, OrderStatus::Completed, Some(payment_method)).await?;
        let updated = load(&mut tx, order_id).await?;
        tx.commit().await?;
        Ok(updated)
    }

    /// Cancel a pending or preparing order
    pub async fn cancel(&self, order_id: i64) -> Result<Order, OrderError> {
        self.set_status(order_id, OrderStatus::Cancelled).await
    }
}

async fn load(tx: &mut Tx<'_>, order_id: i64) -> Result<Order, OrderError> {
    order_repo::find_by_id_tx(tx, order_id)
        .await?
        .ok_or_else(|| OrderError::not_found(Resource::Order, order_id))
}

async fn transition(
    tx: &mut Tx<'_>,
    order: &Order,
    to: OrderStatus,
    payment_method: Option<PaymentMethod>,
) -> Result<(), OrderError> {
    let from = order.status;
    if !from.can_transition_to(to) {
        return Err(OrderError::InvalidTransition { from, to });
    }

    let now = shared::util::now_millis();
    if !order_repo::update_status(tx, order.id, from, to, payment_method, now).await? {
        return Err(OrderError::InvalidTransition { from, to });
    }

    if to.is_terminal()
        && let Some(table_id) = order.table_id
    {
        occupancy::release(tx, table_id, order.id, now).await?;
    }

    tracing::info!(order_id = order.id, %from, %to, "Order status changed");
    Ok(())
}

fn normalize_customer(customer: CustomerInfo) -> CustomerInfo {
    let clean = |v: Option<String>| {
        v.map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    CustomerInfo {
        name: clean(customer.name),
        phone: clean(customer.phone),
        address: clean(customer.address),
    }
}

fn validate_customer(order_type: OrderType, customer: &CustomerInfo) -> Result<(), OrderError> {
    if customer.name.is_none() {
        return Err(OrderError::validation("Customer name is required"));
    }
    if order_type == OrderType::Delivery {
        if customer.phone.is_none() {
            return Err(OrderError::validation("Phone number is required for delivery"));
        }
        if customer.address.is_none() {
            return Err(OrderError::validation("Delivery address is required"));
        }
    }
    Ok(())
}

/// `ORD-YYYYMMDD-XXXXXX`, or `DEL-YYYYMMDDHHMMSS-XXXX` for deliveries.
/// Dates are in the business timezone.
pub fn order_number(order_type: OrderType, now_millis: i64, tz: Tz) -> String {
    let local = tz
        .timestamp_millis_opt(now_millis)
        .single()
        .unwrap_or_else(|| chrono::Utc::now().with_timezone(&tz));
    let suffix = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
    match order_type {
        OrderType::Delivery => format!("DEL-{}-{}", local.format("%Y%m%d%H%M%S"), &suffix[..4]),
        _ => format!("ORD-{}-{}", local.format("%Y%m%d"), &suffix[..6]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::{dining_table, menu_item};
    use shared::models::{DiningTableCreate, MenuItem, MenuItemCreate, TableStatus};

    struct Fixture {
        db: DbService,
        burger: MenuItem,
        fries: MenuItem,
    }

    async fn setup() -> Fixture {
        let db = DbService::in_memory().await.unwrap();
        let burger = menu_item::create(
            &db.pool,
            MenuItemCreate {
                name: "Burger".into(),
                description: None,
                price: 10.0,
                category: "Mains".into(),
                is_available: None,
            },
        )
        .await
        .unwrap();
        let fries = menu_item::create(
            &db.pool,
            MenuItemCreate {
                name: "Fries".into(),
                description: None,
                price: 5.0,
                category: "Sides".into(),
                is_available: None,
            },
        )
        .await
        .unwrap();
        for number in [1, 2] {
            dining_table::create(
                &db.pool,
                DiningTableCreate {
                    number: Some(number),
                    capacity: 4,
                    location: None,
                    table_type: None,
                    notes: None,
                },
            )
            .await
            .unwrap();
        }
        Fixture { db, burger, fries }
    }

    fn cart(f: &Fixture) -> Cart {
        let mut cart = Cart::new();
        cart.add_item(&f.burger, 2).unwrap();
        cart.add_item(&f.fries, 1).unwrap();
        cart
    }

    fn dine_in(table_id: Option<i64>) -> SubmitRequest {
        SubmitRequest {
            order_type: OrderType::DineIn,
            customer: CustomerInfo {
                name: Some("Ana".into()),
                ..Default::default()
            },
            table_id,
            notes: None,
        }
    }

    fn lifecycle(f: &Fixture) -> OrderLifecycle {
        OrderLifecycle::new(f.db.pool.clone(), true, chrono_tz::UTC)
    }

    async fn order_count(f: &Fixture) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&f.db.pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_dine_in_occupies_table_and_completion_frees_it() {
        let f = setup().await;
        let manager = lifecycle(&f);

        let submitted = manager.submit(&cart(&f), dine_in(Some(1))).await.unwrap();
        assert_eq!(submitted.total, 25.0);
        assert_eq!(submitted.table_id, Some(1));
        assert!(submitted.order_number.starts_with("ORD-"));

        let table = dining_table::find_by_id(&f.db.pool, 1).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Occupied);
        assert_eq!(table.current_order_id, Some(submitted.order_id));

        let items = order_repo::find_items(&f.db.pool, submitted.order_id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].line_total, 20.0);

        for status in [OrderStatus::Preparing, OrderStatus::Ready] {
            manager.set_status(submitted.order_id, status).await.unwrap();
        }
        let order = manager
            .complete_payment(submitted.order_id, PaymentMethod::Cash)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.payment_method, Some(PaymentMethod::Cash));
        assert!(order.completed_at.is_some());

        let table = dining_table::find_by_id(&f.db.pool, 1).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Available);
        assert_eq!(table.current_order_id, None);
    }

    #[tokio::test]
    async fn test_empty_cart_writes_nothing() {
        let f = setup().await;
        let result = lifecycle(&f).submit(&Cart::new(), dine_in(None)).await;
        assert!(matches!(result, Err(OrderError::EmptyOrder)));
        assert_eq!(order_count(&f).await, 0);
    }

    #[tokio::test]
    async fn test_auto_assign_picks_lowest_free_table() {
        let f = setup().await;
        let manager = lifecycle(&f);

        let first = manager.submit(&cart(&f), dine_in(None)).await.unwrap();
        let second = manager.submit(&cart(&f), dine_in(None)).await.unwrap();
        let third = manager.submit(&cart(&f), dine_in(None)).await.unwrap();

        assert_eq!(first.table_id, Some(1));
        assert_eq!(second.table_id, Some(2));
        assert_eq!(third.table_id, None);
    }

    #[tokio::test]
    async fn test_occupied_table_conflict_rolls_back() {
        let f = setup().await;
        let manager = lifecycle(&f);
        manager.submit(&cart(&f), dine_in(Some(1))).await.unwrap();

        let result = manager.submit(&cart(&f), dine_in(Some(1))).await;
        assert!(matches!(result, Err(OrderError::Conflict { .. })));
        assert_eq!(order_count(&f).await, 1);

        let result = manager.submit(&cart(&f), dine_in(Some(42))).await;
        assert!(matches!(
            result,
            Err(OrderError::NotFound {
                resource: Resource::Table,
                id: 42
            })
        ));
        assert_eq!(order_count(&f).await, 1);
    }

    #[tokio::test]
    async fn test_customer_validation() {
        let f = setup().await;
        let manager = lifecycle(&f);

        let mut nameless = dine_in(None);
        nameless.customer.name = Some("   ".into());
        assert!(matches!(
            manager.submit(&cart(&f), nameless).await,
            Err(OrderError::Validation(_))
        ));

        let delivery = SubmitRequest {
            order_type: OrderType::Delivery,
            customer: CustomerInfo {
                name: Some("Bo".into()),
                phone: Some("555-0100".into()),
                address: None,
            },
            table_id: None,
            notes: None,
        };
        assert!(matches!(
            manager.submit(&cart(&f), delivery).await,
            Err(OrderError::Validation(_))
        ));

        let takeaway_with_table = SubmitRequest {
            order_type: OrderType::Takeaway,
            table_id: Some(1),
            ..dine_in(None)
        };
        assert!(matches!(
            manager.submit(&cart(&f), takeaway_with_table).await,
            Err(OrderError::Validation(_))
        ));
        assert_eq!(order_count(&f).await, 0);
    }

    #[tokio::test]
    async fn test_delivery_order_has_no_table() {
        let f = setup().await;
        let request = SubmitRequest {
            order_type: OrderType::Delivery,
            customer: CustomerInfo {
                name: Some("Bo".into()),
                phone: Some("555-0100".into()),
                address: Some("1 Main St".into()),
            },
            table_id: None,
            notes: Some("Ring twice".into()),
        };
        let submitted = lifecycle(&f).submit(&cart(&f), request).await.unwrap();
        assert_eq!(submitted.table_id, None);
        assert!(submitted.order_number.starts_with("DEL-"));

        let order = order_repo::find_by_id(&f.db.pool, submitted.order_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.delivery_address.as_deref(), Some("1 Main St"));
        assert_eq!(order.notes.as_deref(), Some("Ring twice"));
    }

    #[tokio::test]
    async fn test_terminal_states_are_final() {
        let f = setup().await;
        let manager = lifecycle(&f);
        let submitted = manager.submit(&cart(&f), dine_in(None)).await.unwrap();
        let id = submitted.order_id;

        manager.set_status(id, OrderStatus::Preparing).await.unwrap();
        manager.set_status(id, OrderStatus::Ready).await.unwrap();
        manager.set_status(id, OrderStatus::Completed).await.unwrap();
        let before = order_repo::find_by_id(&f.db.pool, id).await.unwrap().unwrap();

        let result = manager.set_status(id, OrderStatus::Preparing).await;
        assert!(matches!(
            result,
            Err(OrderError::InvalidTransition {
                from: OrderStatus::Completed,
                to: OrderStatus::Preparing
            })
        ));
        assert!(matches!(
            manager.complete_payment(id, PaymentMethod::Card).await,
            Err(OrderError::AlreadyCompleted(_))
        ));
        assert!(matches!(
            manager.cancel(id).await,
            Err(OrderError::InvalidTransition { .. })
        ));

        let after = order_repo::find_by_id(&f.db.pool, id).await.unwrap().unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_cancel_frees_table_and_is_final() {
        let f = setup().await;
        let manager = lifecycle(&f);
        let submitted = manager.submit(&cart(&f), dine_in(Some(2))).await.unwrap();

        let order = manager.cancel(submitted.order_id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert!(order.completed_at.is_none());

        let table = dining_table::find_by_id(&f.db.pool, 2).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Available);

        assert!(matches!(
            manager.set_status(submitted.order_id, OrderStatus::Pending).await,
            Err(OrderError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_ready_order_cannot_be_cancelled() {
        let f = setup().await;
        let manager = lifecycle(&f);
        let id = manager.submit(&cart(&f), dine_in(None)).await.unwrap().order_id;
        manager.set_status(id, OrderStatus::Preparing).await.unwrap();
        manager.set_status(id, OrderStatus::Ready).await.unwrap();

        assert!(matches!(
            manager.cancel(id).await,
            Err(OrderError::InvalidTransition {
                from: OrderStatus::Ready,
                to: OrderStatus::Cancelled
            })
        ));
    }

    #[tokio::test]
    async fn test_payment_before_ready_is_rejected() {
        let f = setup().await;
        let manager = lifecycle(&f);
        let id = manager.submit(&cart(&f), dine_in(None)).await.unwrap().order_id;

        assert!(matches!(
            manager.complete_payment(id, PaymentMethod::Cash).await,
            Err(OrderError::InvalidTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Completed
            })
        ));
    }

    #[tokio::test]
    async fn test_unknown_order() {
        let f = setup().await;
        assert!(matches!(
            lifecycle(&f).set_status(404, OrderStatus::Ready).await,
            Err(OrderError::NotFound {
                resource: Resource::Order,
                id: 404
            })
        ));
    }

    #[test]
    fn test_order_number_format() {
        // 2025-03-04 05:06:07 UTC
        let millis = 1_741_064_767_000;
        let n = order_number(OrderType::DineIn, millis, chrono_tz::UTC);
        assert!(n.starts_with("ORD-20250304-"), "{n}");
        assert_eq!(n.len(), "ORD-20250304-".len() + 6);

        let d = order_number(OrderType::Delivery, millis, chrono_tz::UTC);
        assert!(d.starts_with("DEL-20250304050607-"), "{d}");
    }
}
