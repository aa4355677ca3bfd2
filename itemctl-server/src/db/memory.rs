//! In-memory item store
//!
//! Same contract as `PgItemRepo`, backed by a `BTreeMap` so listing order
//! falls out of the key order. Used by tests and `itemctl serve --memory`.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::repos::{DbError, Item, ItemStore, ItemValues};
use crate::models::ItemFields;

#[derive(Default)]
struct Inner {
    last_id: i64,
    items: BTreeMap<i64, Item>,
}

/// Item store that lives for the duration of the process
#[derive(Default)]
pub struct MemoryItemRepo {
    inner: RwLock<Inner>,
}

impl MemoryItemRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

fn to_item(id: i64, fields: ItemFields) -> Item {
    Item {
        id,
        name: fields.name().to_owned(),
        description: fields.description().map(str::to_owned),
        price: fields.price(),
    }
}

#[async_trait]
impl ItemStore for MemoryItemRepo {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> Result<Vec<Item>, DbError> {
        let inner = self.inner.read().await;
        Ok(inner.items.values().cloned().collect())
    }

    async fn list_distinct(&self) -> Result<Vec<ItemValues>, DbError> {
        let inner = self.inner.read().await;

        let mut seen = HashSet::new();
        let mut values: Vec<ItemValues> = inner
            .items
            .values()
            .map(|item| ItemValues {
                name: item.name.clone(),
                description: item.description.clone(),
                price: item.price,
            })
            .filter(|v| seen.insert(v.clone()))
            .collect();

        // Option orders None first, matching NULLS FIRST in the SQL store.
        values.sort_by(|a, b| {
            b.price
                .cmp(&a.price)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.description.cmp(&b.description))
        });
        Ok(values)
    }

    async fn get(&self, id: i64) -> Result<Item, DbError> {
        let inner = self.inner.read().await;
        inner
            .items
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::item_not_found(id))
    }

    async fn create(&self, fields: ItemFields) -> Result<Item, DbError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let item = to_item(inner.last_id, fields);
        inner.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update(&self, id: i64, fields: ItemFields) -> Result<Item, DbError> {
        let mut inner = self.inner.write().await;
        let slot = inner
            .items
            .get_mut(&id)
            .ok_or_else(|| DbError::item_not_found(id))?;
        *slot = to_item(id, fields);
        Ok(slot.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        let mut inner = self.inner.write().await;
        inner
            .items
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::item_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemPayload;
    use rust_decimal::Decimal;
    use serde_json::{json, Value};

    fn fields(value: Value) -> ItemFields {
        ItemPayload::from_json(value).unwrap().validate().unwrap()
    }

    #[tokio::test]
    async fn ids_are_assigned_in_sequence() {
        let repo = MemoryItemRepo::new();
        let a = repo.create(fields(json!({"name": "A", "price": 1}))).await.unwrap();
        let b = repo.create(fields(json!({"name": "B", "price": 2}))).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
    }

    #[tokio::test]
    async fn ids_are_never_reused() {
        let repo = MemoryItemRepo::new();
        let a = repo.create(fields(json!({"name": "A", "price": 1}))).await.unwrap();
        repo.delete(a.id).await.unwrap();

        let b = repo.create(fields(json!({"name": "B", "price": 1}))).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn create_then_get() {
        let repo = MemoryItemRepo::new();
        let created = repo
            .create(fields(json!({"name": "Pen", "description": "Blue", "price": 1.5})))
            .await
            .unwrap();

        let fetched = repo.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.price, Decimal::new(150, 2));
    }

    #[tokio::test]
    async fn update_replaces_every_field() {
        let repo = MemoryItemRepo::new();
        let created = repo
            .create(fields(json!({"name": "Pen", "description": "Blue", "price": 1.5})))
            .await
            .unwrap();

        let updated = repo
            .update(created.id, fields(json!({"name": "Pencil", "price": "0.75"})))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Pencil");
        assert_eq!(updated.description, None);
        assert_eq!(repo.get(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let repo = MemoryItemRepo::new();
        let f = fields(json!({"name": "Pen", "price": 1}));

        assert!(matches!(repo.get(7).await, Err(DbError::NotFound { .. })));
        assert!(matches!(repo.update(7, f).await, Err(DbError::NotFound { .. })));
        assert!(matches!(repo.delete(7).await, Err(DbError::NotFound { .. })));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn distinct_is_unique_and_sorted_by_price_desc() {
        let repo = MemoryItemRepo::new();
        for body in [
            json!({"name": "Pen", "description": "Blue", "price": "1.50"}),
            json!({"name": "Pen", "description": "Blue", "price": 1.5}),
            json!({"name": "Book", "price": 12}),
            json!({"name": "Book", "price": 12}),
            json!({"name": "Book", "description": "Hardcover", "price": 12}),
            json!({"name": "Eraser", "description": "", "price": 0.3}),
        ] {
            repo.create(fields(body)).await.unwrap();
        }

        let values = repo.list_distinct().await.unwrap();
        let summary: Vec<_> = values
            .iter()
            .map(|v| (v.name.as_str(), v.description.as_deref(), v.price))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("Book", None, Decimal::new(1200, 2)),
                ("Book", Some("Hardcover"), Decimal::new(1200, 2)),
                ("Pen", Some("Blue"), Decimal::new(150, 2)),
                ("Eraser", Some(""), Decimal::new(30, 2)),
            ]
        );
    }
}
