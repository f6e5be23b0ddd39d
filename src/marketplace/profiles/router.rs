use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::json;

use super::domain::{ProfileDraft, ProfileId, ProfilePatch};
use super::repository::ProfileRepository;
use super::service::{ProfileService, ProfileServiceError};
use crate::marketplace::auth::{self, AccessDenied};
use crate::marketplace::storage::BlobStore;
use crate::marketplace::store::StoreError;

/// Router builder exposing the profile endpoints.
pub fn profile_router<P, B>(service: Arc<ProfileService<P, B>>) -> Router
where
    P: ProfileRepository + 'static,
    B: BlobStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/profiles",
            post(register_handler::<P, B>).get(directory_handler::<P, B>),
        )
        .route(
            "/api/v1/profiles/:profile_id",
            get(get_handler::<P, B>).patch(update_handler::<P, B>),
        )
        .route(
            "/api/v1/profiles/:profile_id/avatar",
            post(avatar_handler::<P, B>),
        )
        .with_state(service)
}

fn error_response(err: ProfileServiceError) -> Response {
    let status = match &err {
        ProfileServiceError::Denied(AccessDenied::NotAuthenticated) => StatusCode::UNAUTHORIZED,
        ProfileServiceError::Denied(_) => StatusCode::FORBIDDEN,
        ProfileServiceError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ProfileServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        ProfileServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        ProfileServiceError::Store(StoreError::Unavailable(_)) | ProfileServiceError::Blob(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}

async fn register_handler<P, B>(
    State(service): State<Arc<ProfileService<P, B>>>,
    Json(draft): Json<ProfileDraft>,
) -> Response
where
    P: ProfileRepository + 'static,
    B: BlobStore + 'static,
{
    match service.register(draft) {
        Ok(profile) => {
            let view = service.view_of(&profile);
            (StatusCode::CREATED, Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

async fn directory_handler<P, B>(State(service): State<Arc<ProfileService<P, B>>>) -> Response
where
    P: ProfileRepository + 'static,
    B: BlobStore + 'static,
{
    match service.directory() {
        Ok(profiles) => {
            let views: Vec<_> = profiles
                .iter()
                .map(|profile| service.view_of(profile))
                .collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

async fn get_handler<P, B>(
    State(service): State<Arc<ProfileService<P, B>>>,
    Path(profile_id): Path<String>,
) -> Response
where
    P: ProfileRepository + 'static,
    B: BlobStore + 'static,
{
    let id = ProfileId(profile_id);
    match service.get(&id) {
        Ok(profile) => {
            // Any viewer, authenticated or not, counts toward the profile's
            // view total.
            service.record_view(&id);
            let view = service.view_of(&profile);
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

async fn update_handler<P, B>(
    State(service): State<Arc<ProfileService<P, B>>>,
    Path(profile_id): Path<String>,
    headers: HeaderMap,
    Json(patch): Json<ProfilePatch>,
) -> Response
where
    P: ProfileRepository + 'static,
    B: BlobStore + 'static,
{
    let actor = match auth::current_actor(&headers) {
        Ok(actor) => actor,
        Err(denied) => return error_response(denied.into()),
    };

    match service.update(&actor, &ProfileId(profile_id), patch) {
        Ok(profile) => {
            let view = service.view_of(&profile);
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

async fn avatar_handler<P, B>(
    State(service): State<Arc<ProfileService<P, B>>>,
    Path(profile_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    P: ProfileRepository + 'static,
    B: BlobStore + 'static,
{
    let actor = match auth::current_actor(&headers) {
        Ok(actor) => actor,
        Err(denied) => return error_response(denied.into()),
    };

    match service.upload_avatar(&actor, &ProfileId(profile_id), body.to_vec()) {
        Ok(url) => (StatusCode::OK, Json(json!({ "avatar_url": url }))).into_response(),
        Err(err) => error_response(err),
    }
}
