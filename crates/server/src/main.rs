use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use server_api::{ApiContext, Classifier, MissingClassifier, MissingSolver, Solver};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{
        ApplyMoveRequest, ApplyMoveResponse, ClassifyColorsRequest, ClassifyColorsResponse,
        SolveRequest, SolveResponse, APPLY_MOVE_ROUTE, CLASSIFY_COLORS_ROUTE, SOLVE_ROUTE,
    },
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod classifier;
mod config;
mod solver;

use app_state::AppState;
use classifier::UpstreamClassifier;
use config::load_settings;
use solver::UpstreamSolver;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings()?;
    let solver: Arc<dyn Solver> = match &settings.solver_url {
        Some(url) => Arc::new(UpstreamSolver::new(url.clone(), settings.solver_timeout())?),
        None => {
            warn!("SOLVER_URL is not set; /api/solve will answer 503");
            Arc::new(MissingSolver)
        }
    };

    let classifier: Arc<dyn Classifier> = match &settings.classifier_url {
        Some(url) => Arc::new(UpstreamClassifier::new(
            url.clone(),
            settings.solver_timeout(),
        )?),
        None => {
            warn!("CLASSIFIER_URL is not set; /api/classify-colors will answer 503");
            Arc::new(MissingClassifier)
        }
    };

    let state = AppState {
        api: ApiContext::new(solver).with_classifier(classifier),
    };
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(CLASSIFY_COLORS_ROUTE, post(http_classify_colors))
        .route(SOLVE_ROUTE, post(http_solve))
        .route(APPLY_MOVE_ROUTE, post(http_apply_move))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_classify_colors(
    State(state): State<Arc<AppState>>,
    req: Result<Json<ClassifyColorsRequest>, JsonRejection>,
) -> ApiResult<ClassifyColorsResponse> {
    let Json(req) = req.map_err(bad_json)?;
    server_api::classify_colors(&state.api, req)
        .await
        .map(Json)
        .map_err(with_status)
}

async fn http_solve(
    State(state): State<Arc<AppState>>,
    req: Result<Json<SolveRequest>, JsonRejection>,
) -> ApiResult<SolveResponse> {
    let Json(req) = req.map_err(bad_json)?;
    server_api::solve(&state.api, req)
        .await
        .map(Json)
        .map_err(with_status)
}

async fn http_apply_move(
    req: Result<Json<ApplyMoveRequest>, JsonRejection>,
) -> ApiResult<ApplyMoveResponse> {
    let Json(req) = req.map_err(bad_json)?;
    server_api::apply_move(req).map(Json).map_err(with_status)
}

fn bad_json(rejection: JsonRejection) -> (StatusCode, Json<ApiError>) {
    let status = match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::BAD_REQUEST,
    };
    (
        status,
        Json(ApiError::new(ErrorCode::Validation, rejection.body_text())),
    )
}

fn with_status(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::Upstream => StatusCode::BAD_GATEWAY,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
