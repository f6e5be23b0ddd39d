use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationId, ApplicationStatus};
use super::repository::{ApplicationRepository, EmailNotifier};
use super::service::{ApplicationService, ApplicationServiceError, SubmissionRejected};
use crate::marketplace::auth::{self, AccessDenied};
use crate::marketplace::jobs::domain::JobId;
use crate::marketplace::jobs::repository::JobRepository;
use crate::marketplace::profiles::repository::ProfileRepository;
use crate::marketplace::store::StoreError;

/// Router builder exposing the application intake and lifecycle endpoints.
pub fn application_router<A, J, P, N>(service: Arc<ApplicationService<A, J, P, N>>) -> Router
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    P: ProfileRepository + 'static,
    N: EmailNotifier + 'static,
{
    Router::new()
        .route(
            "/api/v1/jobs/:job_id/applications",
            post(submit_handler::<A, J, P, N>).get(for_job_handler::<A, J, P, N>),
        )
        .route(
            "/api/v1/applications",
            get(for_applicant_handler::<A, J, P, N>),
        )
        .route(
            "/api/v1/applications/:application_id",
            get(get_handler::<A, J, P, N>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            post(status_handler::<A, J, P, N>),
        )
        .with_state(service)
}

fn error_response(err: ApplicationServiceError) -> Response {
    let status = match &err {
        ApplicationServiceError::Denied(AccessDenied::NotAuthenticated) => {
            StatusCode::UNAUTHORIZED
        }
        ApplicationServiceError::Denied(_) => StatusCode::FORBIDDEN,
        ApplicationServiceError::Rejected(SubmissionRejected::AlreadyApplied) => {
            StatusCode::CONFLICT
        }
        ApplicationServiceError::Rejected(_) | ApplicationServiceError::Transition(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ApplicationServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        ApplicationServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        ApplicationServiceError::Store(StoreError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}

#[derive(Debug, Deserialize)]
struct SubmissionRequest {
    cover_letter: String,
}

#[derive(Debug, Deserialize)]
struct StatusChange {
    status: ApplicationStatus,
}

async fn submit_handler<A, J, P, N>(
    State(service): State<Arc<ApplicationService<A, J, P, N>>>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<SubmissionRequest>,
) -> Response
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    P: ProfileRepository + 'static,
    N: EmailNotifier + 'static,
{
    let actor = match auth::current_actor(&headers) {
        Ok(actor) => actor,
        Err(denied) => return error_response(denied.into()),
    };

    match service.submit(&JobId(job_id), &actor, request.cover_letter) {
        Ok(application) => (StatusCode::CREATED, Json(application.view())).into_response(),
        Err(err) => error_response(err),
    }
}

async fn for_job_handler<A, J, P, N>(
    State(service): State<Arc<ApplicationService<A, J, P, N>>>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    P: ProfileRepository + 'static,
    N: EmailNotifier + 'static,
{
    let actor = match auth::current_actor(&headers) {
        Ok(actor) => actor,
        Err(denied) => return error_response(denied.into()),
    };

    match service.for_job(&JobId(job_id), &actor) {
        Ok(applications) => {
            let views: Vec<_> = applications
                .iter()
                .map(|application| application.view())
                .collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

async fn for_applicant_handler<A, J, P, N>(
    State(service): State<Arc<ApplicationService<A, J, P, N>>>,
    headers: HeaderMap,
) -> Response
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    P: ProfileRepository + 'static,
    N: EmailNotifier + 'static,
{
    let actor = match auth::current_actor(&headers) {
        Ok(actor) => actor,
        Err(denied) => return error_response(denied.into()),
    };

    match service.for_applicant(&actor) {
        Ok(applications) => {
            let views: Vec<_> = applications
                .iter()
                .map(|application| application.view())
                .collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

async fn get_handler<A, J, P, N>(
    State(service): State<Arc<ApplicationService<A, J, P, N>>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    P: ProfileRepository + 'static,
    N: EmailNotifier + 'static,
{
    let actor = match auth::current_actor(&headers) {
        Ok(actor) => actor,
        Err(denied) => return error_response(denied.into()),
    };

    match service.get(&ApplicationId(application_id), &actor) {
        Ok(application) => (StatusCode::OK, Json(application.view())).into_response(),
        Err(err) => error_response(err),
    }
}

async fn status_handler<A, J, P, N>(
    State(service): State<Arc<ApplicationService<A, J, P, N>>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
    Json(change): Json<StatusChange>,
) -> Response
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    P: ProfileRepository + 'static,
    N: EmailNotifier + 'static,
{
    let actor = match auth::current_actor(&headers) {
        Ok(actor) => actor,
        Err(denied) => return error_response(denied.into()),
    };

    match service.set_status(&ApplicationId(application_id), &actor, change.status) {
        Ok(application) => (StatusCode::OK, Json(application.view())).into_response(),
        Err(err) => error_response(err),
    }
}
