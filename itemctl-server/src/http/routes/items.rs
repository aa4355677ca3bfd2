//! Item endpoints
//!
//! | Method | Path              | Handler        |
//! |--------|-------------------|----------------|
//! | GET    | /items/           | list_items     |
//! | POST   | /items/           | create_item    |
//! | GET    | /items/distinct/  | list_distinct  |
//! | GET    | /item/{id}/       | get_item       |
//! | PUT    | /item/{id}/       | update_item    |
//! | DELETE | /item/{id}/       | delete_item    |

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::repos::{Item, ItemValues};
use crate::http::error::ApiError;
use crate::http::extractors::{ItemId, ItemJson};
use crate::http::server::AppState;

/// Item response
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            price: item.price,
        }
    }
}

/// Distinct values response (no id)
#[derive(Debug, Serialize)]
pub struct ItemValuesResponse {
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl From<ItemValues> for ItemValuesResponse {
    fn from(v: ItemValues) -> Self {
        Self {
            name: v.name,
            description: v.description,
            price: v.price,
        }
    }
}

/// GET /items/ - list all items
async fn list_items(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let items = state.items.list().await?;
    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

/// POST /items/ - create a new item
async fn create_item(
    State(state): State<Arc<AppState>>,
    ItemJson(payload): ItemJson,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    let fields = payload.validate()?;
    let item = state.items.create(fields).await?;
    tracing::info!(id = item.id, "item created");

    Ok((StatusCode::CREATED, Json(ItemResponse::from(item))))
}

/// GET /items/distinct/ - unique (name, description, price), highest price first
async fn list_distinct(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ItemValuesResponse>>, ApiError> {
    let values = state.items.list_distinct().await?;
    Ok(Json(values.into_iter().map(ItemValuesResponse::from).collect()))
}

/// GET /item/{id}/ - get a single item
async fn get_item(
    State(state): State<Arc<AppState>>,
    ItemId(id): ItemId,
) -> Result<Json<ItemResponse>, ApiError> {
    let item = state.items.get(id).await?;
    Ok(Json(ItemResponse::from(item)))
}

/// PUT /item/{id}/ - replace an item
async fn update_item(
    State(state): State<Arc<AppState>>,
    ItemId(id): ItemId,
    body: Result<ItemJson, ApiError>,
) -> Result<Json<ItemResponse>, ApiError> {
    // A missing item wins over a bad body.
    let fields = match body.map(|ItemJson(payload)| payload.validate()) {
        Ok(Ok(fields)) => fields,
        Ok(Err(errors)) => {
            state.items.get(id).await?;
            return Err(errors.into());
        }
        Err(rejection) => {
            state.items.get(id).await?;
            return Err(rejection);
        }
    };

    let item = state.items.update(id, fields).await?;
    tracing::info!(id, "item updated");

    Ok(Json(ItemResponse::from(item)))
}

/// DELETE /item/{id}/ - delete an item
async fn delete_item(
    State(state): State<Arc<AppState>>,
    ItemId(id): ItemId,
) -> Result<StatusCode, ApiError> {
    state.items.delete(id).await?;
    tracing::info!(id, "item deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Item routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/items/", get(list_items).post(create_item))
        .route("/items/distinct/", get(list_distinct))
        .route("/item/{id}/", get(get_item).put(update_item).delete(delete_item))
}
