//! Order cart (pre-persistence)
//!
//! A [`Cart`] belongs to one session. Lines snapshot the menu item's name and
//! price when they are added; later menu edits do not touch them. The total
//! is recomputed after every mutation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::models::{MenuItem, SubmittedOrder};

use super::error::{OrderError, Resource};
use super::lifecycle::{OrderLifecycle, SubmitRequest};
use super::money;
use crate::catalog::Catalog;
use crate::session::SessionStore;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    pub menu_item_id: i64,
    pub name: String,
    /// Unit price at the time the item was added
    pub price: f64,
    pub quantity: i32,
    pub line_total: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
    total: f64,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines
    pub fn item_count(&self) -> i32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Add `quantity` units of `item`; an existing line for the same item grows
    ///
    /// Items taken off the menu are reported as not found.
    pub fn add_item(&mut self, item: &MenuItem, quantity: i32) -> Result<(), OrderError> {
        if !item.is_available {
            return Err(OrderError::not_found(Resource::MenuItem, item.id));
        }
        money::validate_quantity(quantity)?;
        money::validate_price(item.price)?;

        match self.lines.iter_mut().find(|l| l.menu_item_id == item.id) {
            Some(line) => {
                let quantity = line.quantity + quantity;
                money::validate_quantity(quantity)?;
                line.quantity = quantity;
                line.line_total = money::line_total(line.price, quantity);
            }
            None => self.lines.push(CartLine {
                menu_item_id: item.id,
                name: item.name.clone(),
                price: item.price,
                quantity,
                line_total: money::line_total(item.price, quantity),
            }),
        }
        self.recompute();
        Ok(())
    }

    pub fn remove_item(&mut self, menu_item_id: i64) -> Result<(), OrderError> {
        let before = self.lines.len();
        self.lines.retain(|l| l.menu_item_id != menu_item_id);
        if self.lines.len() == before {
            return Err(OrderError::not_found(Resource::CartLine, menu_item_id));
        }
        self.recompute();
        Ok(())
    }

    /// Change a line's quantity by `delta`; the line goes away at zero or below
    pub fn adjust_quantity(&mut self, menu_item_id: i64, delta: i32) -> Result<(), OrderError> {
        let idx = self
            .lines
            .iter()
            .position(|l| l.menu_item_id == menu_item_id)
            .ok_or_else(|| OrderError::not_found(Resource::CartLine, menu_item_id))?;

        let quantity = self.lines[idx].quantity.saturating_add(delta);
        if quantity <= 0 {
            self.lines.remove(idx);
        } else {
            money::validate_quantity(quantity)?;
            let line = &mut self.lines[idx];
            line.quantity = quantity;
            line.line_total = money::line_total(line.price, quantity);
        }
        self.recompute();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.total = 0.0;
    }

    fn recompute(&mut self) {
        self.total = money::sum(self.lines.iter().map(|l| l.line_total));
    }
}

/// Session-scoped cart operations
///
/// Loads the cart from the session store, applies one mutation and writes it
/// back. Each session is expected to have a single writer.
#[derive(Clone)]
pub struct CartService {
    store: Arc<dyn SessionStore>,
    catalog: Arc<dyn Catalog>,
}

impl CartService {
    pub fn new(store: Arc<dyn SessionStore>, catalog: Arc<dyn Catalog>) -> Self {
        Self { store, catalog }
    }

    /// Current cart of the session
    ///
    /// A blob that no longer deserializes is dropped and the session starts
    /// over with an empty cart; the lost lines are only visible in the log.
    pub async fn load(&self, session_id: &str) -> Cart {
        match self.store.get(session_id).await {
            Some(blob) => serde_json::from_str(&blob).unwrap_or_else(|e| {
                tracing::warn!(session_id, error = %e, blob_len = blob.len(), "Discarding unreadable cart");
                Cart::new()
            }),
            None => Cart::new(),
        }
    }

    async fn save(&self, session_id: &str, cart: &Cart) -> Result<(), OrderError> {
        let blob = serde_json::to_string(cart)
            .map_err(|e| OrderError::Storage(format!("Failed to serialize cart: {e}")))?;
        self.store.set(session_id, blob).await;
        Ok(())
    }

    pub async fn add_item(
        &self,
        session_id: &str,
        menu_item_id: i64,
        quantity: i32,
    ) -> Result<Cart, OrderError> {
        let item = self
            .catalog
            .get_item(menu_item_id)
            .await?
            .ok_or_else(|| OrderError::not_found(Resource::MenuItem, menu_item_id))?;

        let mut cart = self.load(session_id).await;
        cart.add_item(&item, quantity)?;
        self.save(session_id, &cart).await?;
        Ok(cart)
    }

    pub async fn adjust_quantity(
        &self,
        session_id: &str,
        menu_item_id: i64,
        delta: i32,
    ) -> Result<Cart, OrderError> {
        let mut cart = self.load(session_id).await;
        cart.adjust_quantity(menu_item_id, delta)?;
        self.save(session_id, &cart).await?;
        Ok(cart)
    }

    pub async fn remove_item(&self, session_id: &str, menu_item_id: i64) -> Result<Cart, OrderError> {
        let mut cart = self.load(session_id).await;
        cart.remove_item(menu_item_id)?;
        self.save(session_id, &cart).await?;
        Ok(cart)
    }

    pub async fn clear(&self, session_id: &str) {
        self.store.remove(session_id).await;
    }

    /// Submit the session's cart; the cart is cleared only once the order is committed
    pub async fn submit(
        &self,
        session_id: &str,
        lifecycle: &OrderLifecycle,
        request: SubmitRequest,
    ) -> Result<SubmittedOrder, OrderError> {
        let cart = self.load(session_id).await;
        let submitted = lifecycle.submit(&cart, request).await?;
        self.clear(session_id).await;
        Ok(submitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, name: &str, price: f64) -> MenuItem {
        MenuItem {
            id,
            name: name.into(),
            description: None,
            price,
            category: "Mains".into(),
            is_available: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn expected_total(cart: &Cart) -> f64 {
        money::sum(cart.lines().iter().map(|l| money::line_total(l.price, l.quantity)))
    }

    #[test]
    fn test_add_same_item_increments_quantity() {
        let a = item(1, "A", 10.0);
        let b = item(2, "B", 5.0);
        let mut cart = Cart::new();

        cart.add_item(&a, 1).unwrap();
        cart.add_item(&a, 1).unwrap();
        cart.add_item(&b, 1).unwrap();

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.lines()[0].line_total, 20.0);
        assert_eq!(cart.total(), 25.0);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_price_snapshot_survives_menu_change() {
        let mut a = item(1, "A", 10.0);
        let mut cart = Cart::new();
        cart.add_item(&a, 1).unwrap();

        a.price = 12.0;
        a.name = "A (new)".into();
        cart.add_item(&a, 1).unwrap();

        assert_eq!(cart.lines()[0].price, 10.0);
        assert_eq!(cart.lines()[0].name, "A");
        assert_eq!(cart.total(), 20.0);
    }

    #[test]
    fn test_adjust_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_item(&item(1, "A", 10.0), 2).unwrap();
        cart.add_item(&item(2, "B", 5.0), 1).unwrap();

        cart.adjust_quantity(1, -1).unwrap();
        assert_eq!(cart.total(), 15.0);

        cart.adjust_quantity(1, -5).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total(), 5.0);
    }

    #[test]
    fn test_missing_line_is_not_found() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.adjust_quantity(9, 1),
            Err(OrderError::NotFound {
                resource: Resource::CartLine,
                id: 9
            })
        ));
        assert!(matches!(cart.remove_item(9), Err(OrderError::NotFound { .. })));
    }

    #[test]
    fn test_rejects_bad_quantity_and_unavailable_items() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add_item(&item(1, "A", 10.0), 0),
            Err(OrderError::Validation(_))
        ));

        let mut off = item(2, "Off", 3.0);
        off.is_available = false;
        assert!(matches!(
            cart.add_item(&off, 1),
            Err(OrderError::NotFound {
                resource: Resource::MenuItem,
                id: 2
            })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_matches_lines_after_every_mutation() {
        let items = [
            item(1, "A", 0.1),
            item(2, "B", 19.99),
            item(3, "C", 3.35),
        ];
        let mut cart = Cart::new();
        let ops: [(usize, i32); 10] = [
            (0, 3),
            (1, 2),
            (2, 1),
            (0, -1),
            (1, 4),
            (2, -1),
            (0, 7),
            (1, -6),
            (2, 2),
            (0, -9),
        ];
        for (idx, delta) in ops {
            let id = items[idx].id;
            if delta > 0 {
                cart.add_item(&items[idx], delta).unwrap();
            } else {
                cart.adjust_quantity(id, delta).unwrap();
            }
            assert_eq!(cart.total(), expected_total(&cart));
        }
        cart.remove_item(3).unwrap();
        assert_eq!(cart.total(), expected_total(&cart));
        cart.clear();
        assert_eq!(cart.total(), 0.0);
    }

    async fn service_with_menu() -> (CartService, Arc<dyn SessionStore>, MenuItem) {
        use crate::catalog::SqliteCatalog;
        use crate::db::DbService;
        use crate::db::repository::menu_item;
        use crate::session::MemorySessionStore;
        use shared::models::MenuItemCreate;

        let db = DbService::in_memory().await.unwrap();
        let soup = menu_item::create(
            &db.pool,
            MenuItemCreate {
                name: "Soup".into(),
                description: None,
                price: 4.5,
                category: "Starters".into(),
                is_available: Some(false),
            },
        )
        .await
        .unwrap();
        let store: Arc<dyn SessionStore> =
            Arc::new(MemorySessionStore::new(std::time::Duration::from_secs(60)));
        let catalog: Arc<dyn Catalog> = Arc::new(SqliteCatalog::new(db.pool.clone()));
        (CartService::new(store.clone(), catalog), store, soup)
    }

    #[tokio::test]
    async fn test_service_treats_unavailable_item_as_not_found() {
        let (service, _store, soup) = service_with_menu().await;
        assert!(!soup.is_available);

        let err = service.add_item("s", soup.id, 1).await.unwrap_err();
        assert!(matches!(
            err,
            OrderError::NotFound {
                resource: Resource::MenuItem,
                ..
            }
        ));
        assert!(service.load("s").await.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_cart_starts_over_empty() {
        let (service, store, _soup) = service_with_menu().await;
        store.set("s", "not a cart".to_string()).await;

        let cart = service.load("s").await;
        assert!(cart.is_empty());
        assert_eq!(cart.total(), 0.0);
    }

    #[test]
    fn test_cart_serde_roundtrip_keeps_total() {
        let mut cart = Cart::new();
        cart.add_item(&item(1, "A", 2.5), 2).unwrap();
        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
