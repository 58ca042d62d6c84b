//! Menu Item Repository

use super::{RepoError, RepoResult};
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<MenuItem>> {
    let items = sqlx::query_as::<_, MenuItem>(
        "SELECT id, name, description, price, category, is_available, created_at, updated_at FROM menu_item ORDER BY category, name",
    )
    .fetch_all(pool)
    .await?;
    Ok(items)
}

pub async fn find_available(pool: &SqlitePool) -> RepoResult<Vec<MenuItem>> {
    let items = sqlx::query_as::<_, MenuItem>(
        "SELECT id, name, description, price, category, is_available, created_at, updated_at FROM menu_item WHERE is_available = 1 ORDER BY category, name",
    )
    .fetch_all(pool)
    .await?;
    Ok(items)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItem>> {
    let item = sqlx::query_as::<_, MenuItem>(
        "SELECT id, name, description, price, category, is_available, created_at, updated_at FROM menu_item WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(item)
}

pub async fn create(pool: &SqlitePool, data: MenuItemCreate) -> RepoResult<MenuItem> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO menu_item (name, description, price, category, is_available, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(&data.category)
    .bind(data.is_available.unwrap_or(true))
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu item".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: MenuItemUpdate) -> RepoResult<MenuItem> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE menu_item SET name = COALESCE(?1, name), description = COALESCE(?2, description), price = COALESCE(?3, price), category = COALESCE(?4, category), is_available = COALESCE(?5, is_available), updated_at = ?6 WHERE id = ?7",
    )
    .bind(data.name)
    .bind(data.description)
    .bind(data.price)
    .bind(data.category)
    .bind(data.is_available)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id} not found")))
}

/// Soft delete: order lines keep referencing the row
pub async fn mark_unavailable(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE menu_item SET is_available = 0, updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn new_item(name: &str, category: &str, price: f64) -> MenuItemCreate {
        MenuItemCreate {
            name: name.into(),
            description: None,
            price,
            category: category.into(),
            is_available: None,
        }
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_available() {
        let db = DbService::in_memory().await.unwrap();
        let soup = create(&db.pool, new_item("Soup", "Starters", 4.5)).await.unwrap();
        let steak = create(&db.pool, new_item("Steak", "Mains", 21.0)).await.unwrap();
        assert!(soup.is_available);

        assert!(mark_unavailable(&db.pool, soup.id).await.unwrap());
        assert!(!mark_unavailable(&db.pool, 999).await.unwrap());

        let available = find_available(&db.pool).await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, steak.id);

        // Ordered by category, then name
        let all = find_all(&db.pool).await.unwrap();
        let names: Vec<&str> = all.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Steak", "Soup"]);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let db = DbService::in_memory().await.unwrap();
        let fries = create(&db.pool, new_item("Fries", "Sides", 3.0)).await.unwrap();

        let updated = update(
            &db.pool,
            fries.id,
            MenuItemUpdate {
                price: Some(3.5),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.price, 3.5);
        assert_eq!(updated.name, "Fries");
        assert_eq!(updated.category, "Sides");

        assert!(matches!(
            update(&db.pool, 999, MenuItemUpdate::default()).await,
            Err(RepoError::NotFound(_))
        ));
    }
}
