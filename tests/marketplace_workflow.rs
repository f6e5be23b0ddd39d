use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use gigboard::infra::{
    InMemoryApplicationStore, InMemoryBlobStore, InMemoryItemStore, InMemoryJobStore,
    InMemoryProfileStore, RecordingNotifier,
};
use gigboard::marketplace::applications::domain::SubmissionPolicy;
use gigboard::marketplace::applications::{application_router, ApplicationService};
use gigboard::marketplace::auth::ACTOR_HEADER;
use gigboard::marketplace::items::domain::ItemListingPolicy;
use gigboard::marketplace::items::{item_router, ItemService};
use gigboard::marketplace::jobs::domain::JobPostingPolicy;
use gigboard::marketplace::jobs::{job_router, JobService};
use gigboard::marketplace::lifecycle::TransitionPolicy;
use gigboard::marketplace::profiles::{profile_router, ProfileService};

struct TestApp {
    router: Router,
    notifier: Arc<RecordingNotifier>,
}

fn test_app() -> TestApp {
    let profiles = Arc::new(InMemoryProfileStore::default());
    let jobs = Arc::new(InMemoryJobStore::default());
    let applications = Arc::new(InMemoryApplicationStore::default());
    let items = Arc::new(InMemoryItemStore::default());
    let blobs = Arc::new(InMemoryBlobStore::default());
    let notifier = Arc::new(RecordingNotifier::default());

    let profile_service = Arc::new(ProfileService::new(profiles.clone(), blobs.clone()));
    let job_service = Arc::new(JobService::new(
        jobs.clone(),
        profiles.clone(),
        JobPostingPolicy::default(),
        TransitionPolicy::guarded(),
    ));
    let application_service = Arc::new(ApplicationService::new(
        applications,
        jobs,
        profiles,
        notifier.clone(),
        SubmissionPolicy::default(),
        TransitionPolicy::guarded(),
    ));
    let item_service = Arc::new(ItemService::new(items, blobs, ItemListingPolicy::default()));

    let router = Router::new()
        .merge(profile_router(profile_service))
        .merge(job_router(job_service))
        .merge(application_router(application_service))
        .merge(item_router(item_service));

    TestApp { router, notifier }
}

fn request(method: &str, uri: &str, actor: Option<&str>, payload: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
        builder = builder.header(ACTOR_HEADER, actor);
    }
    match payload {
        Some(payload) => builder
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request built"),
        None => builder.body(Body::empty()).expect("request built"),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.expect("request handled");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

async fn register(app: &Router, name: &str, role: &str) -> String {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/api/v1/profiles",
            None,
            Some(json!({
                "name": name,
                "email": format!("{name}@example.com"),
                "role": role,
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");
    body["id"].as_str().expect("profile id").to_string()
}

async fn post_job(app: &Router, owner: &str) -> String {
    let deadline = (Utc::now().date_naive() + Duration::days(14)).to_string();
    let (status, body) = send(
        app,
        request(
            "POST",
            "/api/v1/jobs",
            Some(owner),
            Some(json!({
                "title": "Storefront logo",
                "description": "Design a logo for our new storefront",
                "price": 120.0,
                "category": "design",
                "deadline": deadline,
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "job posting failed: {body}");
    body["id"].as_str().expect("job id").to_string()
}

fn cover_letter() -> String {
    "I have shipped a dozen logo projects for small storefronts and can turn \
     this around within a week, with two revision rounds included."
        .to_string()
}

#[tokio::test]
async fn hiring_workflow_from_signup_to_acceptance() {
    let app = test_app();
    let business = register(&app.router, "studio", "business").await;
    let customer = register(&app.router, "freelancer", "customer").await;
    let job_id = post_job(&app.router, &business).await;

    // The customer applies and starts out pending.
    let (status, application) = send(
        &app.router,
        request(
            "POST",
            &format!("/api/v1/jobs/{job_id}/applications"),
            Some(&customer),
            Some(json!({ "cover_letter": cover_letter() })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(application["status"], "pending");
    let application_id = application["application_id"]
        .as_str()
        .expect("application id");

    // Applying twice to the same job is a conflict.
    let (status, _) = send(
        &app.router,
        request(
            "POST",
            &format!("/api/v1/jobs/{job_id}/applications"),
            Some(&customer),
            Some(json!({ "cover_letter": cover_letter() })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The owner reviews the inbox, then accepts.
    let (status, inbox) = send(
        &app.router,
        request(
            "GET",
            &format!("/api/v1/jobs/{job_id}/applications"),
            Some(&business),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(inbox.as_array().expect("array").len(), 1);

    let (status, _) = send(
        &app.router,
        request(
            "POST",
            &format!("/api/v1/applications/{application_id}/status"),
            Some(&business),
            Some(json!({ "status": "reviewed" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, accepted) = send(
        &app.router,
        request(
            "POST",
            &format!("/api/v1/applications/{application_id}/status"),
            Some(&business),
            Some(json!({ "status": "accepted" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["status"], "accepted");

    // Acceptance emailed the applicant exactly once.
    let messages = app.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].to, "freelancer@example.com");

    // The applicant sees the final state in their own listing.
    let (status, own) = send(
        &app.router,
        request("GET", "/api/v1/applications", Some(&customer), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(own[0]["status"], "accepted");

    // Accepted is terminal under the guard.
    let (status, _) = send(
        &app.router,
        request(
            "POST",
            &format!("/api/v1/applications/{application_id}/status"),
            Some(&business),
            Some(json!({ "status": "rejected" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn posting_jobs_is_reserved_for_business_profiles() {
    let app = test_app();
    let customer = register(&app.router, "shopper", "customer").await;

    let (status, body) = send(
        &app.router,
        request(
            "POST",
            "/api/v1/jobs",
            Some(&customer),
            Some(json!({
                "title": "Storefront logo",
                "description": "Design a logo",
                "price": 120.0,
                "category": "design",
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().expect("error").contains("business"));
}

#[tokio::test]
async fn applicants_may_withdraw_but_strangers_change_nothing() {
    let app = test_app();
    let business = register(&app.router, "agency", "business").await;
    let customer = register(&app.router, "writer", "customer").await;
    let stranger = register(&app.router, "passerby", "customer").await;
    let job_id = post_job(&app.router, &business).await;

    let (_, application) = send(
        &app.router,
        request(
            "POST",
            &format!("/api/v1/jobs/{job_id}/applications"),
            Some(&customer),
            Some(json!({ "cover_letter": cover_letter() })),
        ),
    )
    .await;
    let application_id = application["application_id"]
        .as_str()
        .expect("application id");

    let (status, _) = send(
        &app.router,
        request(
            "POST",
            &format!("/api/v1/applications/{application_id}/status"),
            Some(&stranger),
            Some(json!({ "status": "accepted" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, withdrawn) = send(
        &app.router,
        request(
            "POST",
            &format!("/api/v1/applications/{application_id}/status"),
            Some(&customer),
            Some(json!({ "status": "withdrawn" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(withdrawn["status"], "withdrawn");

    // A withdrawn application is out of the owner's hands.
    let (status, _) = send(
        &app.router,
        request(
            "POST",
            &format!("/api/v1/applications/{application_id}/status"),
            Some(&business),
            Some(json!({ "status": "accepted" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn job_lifecycle_and_listing_filters() {
    let app = test_app();
    let business = register(&app.router, "builder", "business").await;
    let job_id = post_job(&app.router, &business).await;

    let (status, _) = send(
        &app.router,
        request(
            "POST",
            &format!("/api/v1/jobs/{job_id}/status"),
            Some(&business),
            Some(json!({ "status": "in_progress" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Skipping straight back to open is rejected by the guard.
    let (status, _) = send(
        &app.router,
        request(
            "POST",
            &format!("/api/v1/jobs/{job_id}/status"),
            Some(&business),
            Some(json!({ "status": "open" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, open_jobs) = send(
        &app.router,
        request("GET", "/api/v1/jobs?status=open", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(open_jobs.as_array().expect("array").is_empty());

    let (status, in_progress) = send(
        &app.router,
        request("GET", "/api/v1/jobs?status=in_progress", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(in_progress.as_array().expect("array").len(), 1);
}

#[tokio::test]
async fn item_marketplace_supports_browse_filters_and_ownership() {
    let app = test_app();
    let seller = register(&app.router, "seller", "customer").await;
    let stranger = register(&app.router, "browser", "customer").await;

    let (status, item) = send(
        &app.router,
        request(
            "POST",
            "/api/v1/items",
            Some(&seller),
            Some(json!({
                "title": "Standing desk",
                "description": "Adjustable, lightly used",
                "price": 140.0,
                "category": "furniture",
                "condition": "good",
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "item listing failed: {item}");
    let item_id = item["id"].as_str().expect("item id");

    let (status, cheap) = send(
        &app.router,
        request("GET", "/api/v1/items?max_price=100", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(cheap.as_array().expect("array").is_empty());

    let (status, furniture) = send(
        &app.router,
        request(
            "GET",
            "/api/v1/items?category=furniture&condition=good",
            None,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(furniture.as_array().expect("array").len(), 1);

    let (status, _) = send(
        &app.router,
        request(
            "PATCH",
            &format!("/api/v1/items/{item_id}"),
            Some(&stranger),
            Some(json!({ "price": 1.0 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app.router,
        request(
            "DELETE",
            &format!("/api/v1/items/{item_id}"),
            Some(&seller),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn profile_pages_count_views_and_serve_avatars() {
    let app = test_app();
    let owner = register(&app.router, "portfolio", "customer").await;

    for _ in 0..2 {
        let (status, _) = send(
            &app.router,
            request("GET", &format!("/api/v1/profiles/{owner}"), None, None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, viewed) = send(
        &app.router,
        request("GET", &format!("/api/v1/profiles/{owner}"), None, None),
    )
    .await;
    assert_eq!(viewed["view_count"].as_u64().expect("count"), 2);

    let avatar = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/v1/profiles/{owner}/avatar"))
                .header(ACTOR_HEADER, owner.as_str())
                .header("content-type", "application/octet-stream")
                .body(Body::from(vec![0x89, 0x50, 0x4e, 0x47]))
                .expect("request built"),
        )
        .await
        .expect("request handled");
    assert_eq!(avatar.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(avatar.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let body: Value = serde_json::from_slice(&bytes).expect("json body");
    assert!(body["avatar_url"]
        .as_str()
        .expect("url")
        .contains("avatar"));
}
