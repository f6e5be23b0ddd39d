use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing::info;

use gigboard::config::AppConfig;
use gigboard::error::AppError;
use gigboard::infra::{
    InMemoryApplicationStore, InMemoryBlobStore, InMemoryItemStore, InMemoryJobStore,
    InMemoryProfileStore, RecordingNotifier,
};
use gigboard::marketplace::applications::{application_router, ApplicationService};
use gigboard::marketplace::applications::domain::SubmissionPolicy;
use gigboard::marketplace::items::domain::ItemListingPolicy;
use gigboard::marketplace::items::{item_router, ItemService};
use gigboard::marketplace::jobs::domain::JobPostingPolicy;
use gigboard::marketplace::jobs::{job_router, JobService};
use gigboard::marketplace::lifecycle::TransitionPolicy;
use gigboard::marketplace::profiles::{profile_router, ProfileService};
use gigboard::telemetry;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
}

#[derive(Parser, Debug)]
#[command(
    name = "Gigboard",
    about = "Run the freelance marketplace service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
    };

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
        TransitionPolicy::default(),
    ));
    let application_service = Arc::new(ApplicationService::new(
        applications,
        jobs,
        profiles,
        notifier,
        SubmissionPolicy::default(),
        TransitionPolicy::default(),
    ));
    let item_service = Arc::new(ItemService::new(items, blobs, ItemListingPolicy::default()));

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .with_state(state)
        .merge(profile_router(profile_service))
        .merge(job_router(job_service))
        .merge(application_router(application_service))
        .merge(item_router(item_service));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "freelance marketplace service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}
