use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ItemCondition, ItemDraft, ItemId, ItemPatch};
use super::repository::{ItemFilter, ItemRepository};
use super::service::{ItemService, ItemServiceError};
use crate::marketplace::auth::{self, AccessDenied};
use crate::marketplace::profiles::domain::ProfileId;
use crate::marketplace::storage::BlobStore;
use crate::marketplace::store::StoreError;

/// Router builder exposing the item marketplace endpoints.
pub fn item_router<I, B>(service: Arc<ItemService<I, B>>) -> Router
where
    I: ItemRepository + 'static,
    B: BlobStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/items",
            post(list_item_handler::<I, B>).get(browse_handler::<I, B>),
        )
        .route(
            "/api/v1/items/:item_id",
            get(get_handler::<I, B>)
                .patch(update_handler::<I, B>)
                .delete(delete_handler::<I, B>),
        )
        .route("/api/v1/items/:item_id/image", post(image_handler::<I, B>))
        .with_state(service)
}

fn error_response(err: ItemServiceError) -> Response {
    let status = match &err {
        ItemServiceError::Denied(AccessDenied::NotAuthenticated) => StatusCode::UNAUTHORIZED,
        ItemServiceError::Denied(_) => StatusCode::FORBIDDEN,
        ItemServiceError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ItemServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        ItemServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        ItemServiceError::Store(StoreError::Unavailable(_)) | ItemServiceError::Blob(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}

#[derive(Debug, Deserialize)]
struct BrowseParams {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    condition: Option<ItemCondition>,
    #[serde(default)]
    max_price: Option<f64>,
    #[serde(default)]
    seller: Option<String>,
}

async fn list_item_handler<I, B>(
    State(service): State<Arc<ItemService<I, B>>>,
    headers: HeaderMap,
    Json(draft): Json<ItemDraft>,
) -> Response
where
    I: ItemRepository + 'static,
    B: BlobStore + 'static,
{
    let actor = match auth::current_actor(&headers) {
        Ok(actor) => actor,
        Err(denied) => return error_response(denied.into()),
    };

    match service.list_item(&actor, draft) {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn browse_handler<I, B>(
    State(service): State<Arc<ItemService<I, B>>>,
    Query(params): Query<BrowseParams>,
) -> Response
where
    I: ItemRepository + 'static,
    B: BlobStore + 'static,
{
    let filter = ItemFilter {
        category: params.category,
        condition: params.condition,
        max_price: params.max_price,
        seller: params.seller.map(ProfileId),
    };

    match service.browse(&filter) {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn get_handler<I, B>(
    State(service): State<Arc<ItemService<I, B>>>,
    Path(item_id): Path<String>,
) -> Response
where
    I: ItemRepository + 'static,
    B: BlobStore + 'static,
{
    match service.get(&ItemId(item_id)) {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn update_handler<I, B>(
    State(service): State<Arc<ItemService<I, B>>>,
    Path(item_id): Path<String>,
    headers: HeaderMap,
    Json(patch): Json<ItemPatch>,
) -> Response
where
    I: ItemRepository + 'static,
    B: BlobStore + 'static,
{
    let actor = match auth::current_actor(&headers) {
        Ok(actor) => actor,
        Err(denied) => return error_response(denied.into()),
    };

    match service.update(&actor, &ItemId(item_id), patch) {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn delete_handler<I, B>(
    State(service): State<Arc<ItemService<I, B>>>,
    Path(item_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    I: ItemRepository + 'static,
    B: BlobStore + 'static,
{
    let actor = match auth::current_actor(&headers) {
        Ok(actor) => actor,
        Err(denied) => return error_response(denied.into()),
    };

    match service.delete(&actor, &ItemId(item_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

async fn image_handler<I, B>(
    State(service): State<Arc<ItemService<I, B>>>,
    Path(item_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    I: ItemRepository + 'static,
    B: BlobStore + 'static,
{
    let actor = match auth::current_actor(&headers) {
        Ok(actor) => actor,
        Err(denied) => return error_response(denied.into()),
    };

    match service.upload_image(&actor, &ItemId(item_id), body.to_vec()) {
        Ok(url) => (StatusCode::OK, Json(json!({ "image_url": url }))).into_response(),
        Err(err) => error_response(err),
    }
}
