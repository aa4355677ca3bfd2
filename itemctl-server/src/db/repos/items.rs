//! Item repository
//!
//! `ItemStore` is the seam between handlers and persistence:
//! - `PgItemRepo` talks to PostgreSQL (production)
//! - `MemoryItemRepo` keeps items in a map (tests, local runs)
//!
//! Both implementations share the same semantics: ids are assigned by the
//! store, update replaces every field, delete is permanent.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::models::ItemFields;

/// Item record from the store
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

/// Distinct (name, description, price) combination
#[derive(Debug, Clone, PartialEq, Eq, Hash, FromRow)]
pub struct ItemValues {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

impl DbError {
    pub(crate) fn item_not_found(id: i64) -> Self {
        Self::NotFound {
            resource: "item",
            id: id.to_string(),
        }
    }
}

/// Item persistence operations (testable)
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Short backend name, reported by the health endpoint.
    fn backend(&self) -> &'static str;

    /// All items, ascending by id.
    async fn list(&self) -> Result<Vec<Item>, DbError>;

    /// Unique (name, description, price) combinations, highest price first.
    ///
    /// Ties are ordered by name, then description with null first.
    async fn list_distinct(&self) -> Result<Vec<ItemValues>, DbError>;

    async fn get(&self, id: i64) -> Result<Item, DbError>;

    /// Persist a new item; the store assigns its id.
    async fn create(&self, fields: ItemFields) -> Result<Item, DbError>;

    /// Replace every field of an existing item.
    async fn update(&self, id: i64, fields: ItemFields) -> Result<Item, DbError>;

    async fn delete(&self, id: i64) -> Result<(), DbError>;
}

/// PostgreSQL item repository
#[derive(Clone)]
pub struct PgItemRepo {
    pool: PgPool,
}

impl PgItemRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for PgItemRepo {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn list(&self) -> Result<Vec<Item>, DbError> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, description, price
            FROM items
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn list_distinct(&self) -> Result<Vec<ItemValues>, DbError> {
        // ORDER BY columns must appear in the DISTINCT select list.
        let values = sqlx::query_as::<_, ItemValues>(
            r#"
            SELECT DISTINCT name, description, price
            FROM items
            ORDER BY price DESC, name ASC, description ASC NULLS FIRST
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(values)
    }

    async fn get(&self, id: i64) -> Result<Item, DbError> {
        sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, description, price
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::item_not_found(id))
    }

    async fn create(&self, fields: ItemFields) -> Result<Item, DbError> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (name, description, price)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, price
            "#,
        )
        .bind(fields.name())
        .bind(fields.description())
        .bind(fields.price())
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    async fn update(&self, id: i64, fields: ItemFields) -> Result<Item, DbError> {
        sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET name = $2, description = $3, price = $4
            WHERE id = $1
            RETURNING id, name, description, price
            "#,
        )
        .bind(id)
        .bind(fields.name())
        .bind(fields.description())
        .bind(fields.price())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::item_not_found(id))
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::item_not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, ensure_schema};
    use crate::models::ItemPayload;
    use serde_json::json;

    // Integration tests - run with DATABASE_URL set
    // cargo test -p itemctl-server -- --ignored

    async fn repo() -> PgItemRepo {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");
        ensure_schema(&pool).await.expect("schema");
        PgItemRepo::new(pool)
    }

    fn fields(value: serde_json::Value) -> ItemFields {
        ItemPayload::from_json(value).unwrap().validate().unwrap()
    }

    fn unique(prefix: &str) -> String {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        format!("{prefix}-{nanos}")
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_then_get_round_trip() {
        let repo = repo().await;
        let name = unique("pen");
        let created = repo
            .create(fields(json!({"name": name, "description": "Blue", "price": "1.50"})))
            .await
            .unwrap();

        let fetched = repo.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.price, Decimal::new(150, 2));

        repo.delete(created.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_replaces_all_fields() {
        let repo = repo().await;
        let created = repo
            .create(fields(json!({"name": unique("mug"), "description": "Red", "price": 4})))
            .await
            .unwrap();

        let updated = repo
            .update(created.id, fields(json!({"name": "Cup", "price": "5.25"})))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Cup");
        assert_eq!(updated.description, None);
        assert_eq!(repo.get(created.id).await.unwrap(), updated);

        repo.delete(created.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn delete_is_permanent() {
        let repo = repo().await;
        let created = repo
            .create(fields(json!({"name": unique("cap"), "price": 1})))
            .await
            .unwrap();

        repo.delete(created.id).await.unwrap();

        assert!(matches!(repo.get(created.id).await, Err(DbError::NotFound { .. })));
        assert!(matches!(repo.delete(created.id).await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn distinct_collapses_duplicates() {
        let repo = repo().await;
        let name = unique("dup");
        let mut ids = Vec::new();
        for price in ["2.00", "2", "9.99"] {
            let item = repo
                .create(fields(json!({"name": name, "description": "x", "price": price})))
                .await
                .unwrap();
            ids.push(item.id);
        }

        let values: Vec<_> = repo
            .list_distinct()
            .await
            .unwrap()
            .into_iter()
            .filter(|v| v.name == name)
            .collect();

        assert_eq!(values.len(), 2);
        assert_eq!(values[0].price, Decimal::new(999, 2));
        assert_eq!(values[1].price, Decimal::new(200, 2));

        for id in ids {
            repo.delete(id).await.unwrap();
        }
    }
}
