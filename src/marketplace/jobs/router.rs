use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::domain::{JobDraft, JobId, JobPatch, JobStatus};
use super::repository::{JobFilter, JobRepository};
use super::service::{JobService, JobServiceError};
use crate::marketplace::auth::{self, AccessDenied};
use crate::marketplace::profiles::domain::ProfileId;
use crate::marketplace::profiles::repository::ProfileRepository;
use crate::marketplace::store::StoreError;

/// Router builder exposing the job posting endpoints.
pub fn job_router<J, P>(service: Arc<JobService<J, P>>) -> Router
where
    J: JobRepository + 'static,
    P: ProfileRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/jobs",
            post(post_handler::<J, P>).get(list_handler::<J, P>),
        )
        .route(
            "/api/v1/jobs/:job_id",
            get(get_handler::<J, P>)
                .patch(update_handler::<J, P>)
                .delete(delete_handler::<J, P>),
        )
        .route("/api/v1/jobs/:job_id/status", post(status_handler::<J, P>))
        .with_state(service)
}

fn error_response(err: JobServiceError) -> Response {
    let status = match &err {
        JobServiceError::Denied(AccessDenied::NotAuthenticated) => StatusCode::UNAUTHORIZED,
        JobServiceError::Denied(_) | JobServiceError::RoleRequired => StatusCode::FORBIDDEN,
        JobServiceError::Invalid(_) | JobServiceError::Transition(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        JobServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        JobServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        JobServiceError::Store(StoreError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}

#[derive(Debug, Deserialize)]
struct ListParams {
    #[serde(default)]
    status: Option<JobStatus>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    owner: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusChange {
    status: JobStatus,
}

async fn post_handler<J, P>(
    State(service): State<Arc<JobService<J, P>>>,
    headers: HeaderMap,
    Json(draft): Json<JobDraft>,
) -> Response
where
    J: JobRepository + 'static,
    P: ProfileRepository + 'static,
{
    let actor = match auth::current_actor(&headers) {
        Ok(actor) => actor,
        Err(denied) => return error_response(denied.into()),
    };

    match service.post(&actor, draft) {
        Ok(job) => (StatusCode::CREATED, Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn list_handler<J, P>(
    State(service): State<Arc<JobService<J, P>>>,
    Query(params): Query<ListParams>,
) -> Response
where
    J: JobRepository + 'static,
    P: ProfileRepository + 'static,
{
    let filter = JobFilter {
        status: params.status,
        category: params.category,
        owner: params.owner.map(ProfileId),
    };

    match service.list(&filter) {
        Ok(jobs) => (StatusCode::OK, Json(jobs)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn get_handler<J, P>(
    State(service): State<Arc<JobService<J, P>>>,
    Path(job_id): Path<String>,
) -> Response
where
    J: JobRepository + 'static,
    P: ProfileRepository + 'static,
{
    match service.get(&JobId(job_id)) {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn update_handler<J, P>(
    State(service): State<Arc<JobService<J, P>>>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
    Json(patch): Json<JobPatch>,
) -> Response
where
    J: JobRepository + 'static,
    P: ProfileRepository + 'static,
{
    let actor = match auth::current_actor(&headers) {
        Ok(actor) => actor,
        Err(denied) => return error_response(denied.into()),
    };

    match service.update(&actor, &JobId(job_id), patch) {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn status_handler<J, P>(
    State(service): State<Arc<JobService<J, P>>>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
    Json(change): Json<StatusChange>,
) -> Response
where
    J: JobRepository + 'static,
    P: ProfileRepository + 'static,
{
    let actor = match auth::current_actor(&headers) {
        Ok(actor) => actor,
        Err(denied) => return error_response(denied.into()),
    };

    match service.set_status(&actor, &JobId(job_id), change.status) {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn delete_handler<J, P>(
    State(service): State<Arc<JobService<J, P>>>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    J: JobRepository + 'static,
    P: ProfileRepository + 'static,
{
    let actor = match auth::current_actor(&headers) {
        Ok(actor) => actor,
        Err(denied) => return error_response(denied.into()),
    };

    match service.delete(&actor, &JobId(job_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}
