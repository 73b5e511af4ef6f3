//! Promotion routes: list, read, create, update, deactivate, delete.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Json,
    routing::{get, put},
    Router,
};
use chrono::Local;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::models::Promotion;
use crate::services::filter_service::{resolve_filter, ListParams};
use crate::storage::StorageError;

use super::app_state::AppState;
use super::error::ApiError;

/// Create the promotions router.
pub fn promotions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_promotions).post(create_promotion))
        .route(
            "/{promotion_id}",
            get(get_promotion)
                .put(update_promotion)
                .delete(delete_promotion),
        )
        .route("/{promotion_id}/deactivate", put(deactivate_promotion))
}

/// GET / - Service descriptor.
pub async fn index() -> Json<Value> {
    Json(json!({
        "name": "Promotions Service",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "RESTful service for managing promotions",
        "paths": {
            "promotions": "/promotions",
        },
    }))
}

/// GET /health - Liveness probe; deliberately touches no storage.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

/// GET /promotions - List promotions, optionally filtered.
///
/// Supported query params: `id`, `active`, `name`, `product_id`,
/// `promotion_type`; see [`resolve_filter`] for precedence.
async fn list_promotions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Promotion>>, ApiError> {
    info!("Request to list Promotions");
    let today = Local::now().date_naive();
    let filter = resolve_filter(&params, today)?;
    let promotions = state.store.list(&filter).await?;
    Ok(Json(promotions))
}

/// GET /promotions/{id} - Read a single promotion.
async fn get_promotion(
    State(state): State<AppState>,
    Path(promotion_id): Path<i64>,
) -> Result<Json<Promotion>, ApiError> {
    info!("Request to get Promotion with id [{}]", promotion_id);
    let promotion = state
        .store
        .get(promotion_id)
        .await?
        .ok_or_else(|| promotion_not_found(promotion_id))?;
    Ok(Json(promotion))
}

/// POST /promotions - Create a promotion.
async fn create_promotion(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    info!("Request to create a Promotion");
    check_content_type(&headers)?;

    let data = parse_json_body(&body)?;
    let promotion = Promotion::from_json(&data)?;
    let created = state.store.insert(&promotion).await?;

    let location = format!("/promotions/{}", created.id.unwrap_or_default());
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

/// PUT /promotions/{id} - Full replace of a promotion's fields.
async fn update_promotion(
    State(state): State<AppState>,
    Path(promotion_id): Path<i64>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Promotion>, ApiError> {
    info!("Request to update Promotion with id [{}]", promotion_id);
    check_content_type(&headers)?;

    if state.store.get(promotion_id).await?.is_none() {
        return Err(promotion_not_found(promotion_id));
    }

    let data = parse_json_body(&body)?;
    if let Some(body_id) = data.get("id").filter(|v| !v.is_null()) {
        let body_id_text = match body_id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if body_id_text != promotion_id.to_string() {
            return Err(ApiError::bad_request("ID in body must match resource path"));
        }
    }

    let mut promotion = Promotion::from_json(&data)?;
    promotion.id = Some(promotion_id);
    let updated = state.store.replace(&promotion).await?;
    Ok(Json(updated))
}

/// PUT /promotions/{id}/deactivate - Pull the promotion's end date back to
/// yesterday so it no longer counts as active today. History is preserved:
/// an end date already in the past is never moved.
async fn deactivate_promotion(
    State(state): State<AppState>,
    Path(promotion_id): Path<i64>,
) -> Result<Json<Promotion>, ApiError> {
    info!("Request to deactivate Promotion with id [{}]", promotion_id);

    let mut promotion = state
        .store
        .get(promotion_id)
        .await?
        .ok_or_else(|| promotion_not_found(promotion_id))?;

    promotion.deactivate(Local::now().date_naive());

    let updated = state
        .store
        .replace(&promotion)
        .await
        .map_err(|err| match err {
            StorageError::NotFound(missing) => promotion_not_found(missing),
            other => {
                warn!("Failed to persist deactivation: {}", other);
                ApiError::bad_request("Unable to persist the deactivated promotion")
            }
        })?;
    Ok(Json(updated))
}

/// DELETE /promotions/{id} - Delete a promotion; 404 when it never existed.
async fn delete_promotion(
    State(state): State<AppState>,
    Path(promotion_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    info!("Request to delete Promotion with id [{}]", promotion_id);
    let removed = state.store.delete(promotion_id).await?;
    if !removed {
        return Err(promotion_not_found(promotion_id));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn promotion_not_found(promotion_id: i64) -> ApiError {
    ApiError::not_found(format!(
        "Promotion with id '{}' was not found.",
        promotion_id
    ))
}

/// Check that the request carries a JSON media type (charset etc. tolerated).
fn check_content_type(headers: &HeaderMap) -> Result<(), ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    let mimetype = content_type.split(';').next().unwrap_or("").trim();
    if !mimetype.eq_ignore_ascii_case("application/json") {
        let got = if content_type.is_empty() {
            "none"
        } else {
            content_type
        };
        return Err(ApiError::unsupported_media_type(format!(
            "Content-Type must be application/json; received {}",
            got
        )));
    }
    Ok(())
}

fn parse_json_body(body: &Bytes) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|err| {
        warn!("Unparseable request body: {}", err);
        ApiError::bad_request("Invalid promotion: body of request contained bad or no data")
    })
}
