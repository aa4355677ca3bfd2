//! Custom Axum extractors

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;

use super::error::ApiError;
use crate::models::ItemPayload;

/// Extract an item id from path.
///
/// Only plain decimal digits name an item; anything else is a 404,
/// the same as a route that does not exist.
pub struct ItemId(pub i64);

impl<S> FromRequestParts<S> for ItemId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound {
                resource: "item",
                id: String::new(),
            })?;

        parse_item_id(&raw).map(Self).ok_or(ApiError::NotFound {
            resource: "item",
            id: raw,
        })
    }
}

fn parse_item_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Extract an item body as a JSON object.
///
/// Rejections become `{"detail": ...}` responses; a body that is valid JSON
/// but not an object is a 400 rather than axum's default 422.
pub struct ItemJson(pub ItemPayload);

impl<S> FromRequest<S> for ItemJson
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<ItemPayload>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let status = match &rejection {
                    JsonRejection::JsonDataError(_) => StatusCode::BAD_REQUEST,
                    other => other.status(),
                };
                ApiError::Rejected {
                    status,
                    detail: rejection.body_text(),
                }
            })?;

        Ok(Self(payload))
    }
}
