use super::*;
use async_trait::async_trait;
use axum::{body, body::Body, http::Request};
use server_api::{Classifier, ClassifierError, SolverError};
use shared::domain::{Color, CubeState, Face, FaceColorGrid, MoveToken, PhysicalAction};
use tower::ServiceExt;

struct CannedSolver(&'static str);

#[async_trait]
impl Solver for CannedSolver {
    async fn solve(&self, _cube_string: &str) -> Result<String, SolverError> {
        Ok(self.0.to_string())
    }
}

struct CannedClassifier(FaceColorGrid);

#[async_trait]
impl Classifier for CannedClassifier {
    async fn classify(
        &self,
        _request: &ClassifyColorsRequest,
    ) -> Result<FaceColorGrid, ClassifierError> {
        Ok(self.0)
    }
}

fn test_app(solver: Arc<dyn Solver>) -> Router {
    build_router(
        Arc::new(AppState {
            api: ApiContext::new(solver),
        }),
        64 * 1024,
    )
}

fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn read_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = test_app(Arc::new(MissingSolver));
    let request = Request::get("/healthz")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn apply_move_returns_next_state() {
    let app = test_app(Arc::new(MissingSolver));
    let request = json_post(
        APPLY_MOVE_ROUTE,
        serde_json::json!({ "state": CubeState::solved(), "move": "U" }),
    );
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let dto: ApplyMoveResponse = read_json(response).await;
    let expected = shared::cube::apply_move(&CubeState::solved(), MoveToken::clockwise(Face::U))
        .expect("apply");
    assert_eq!(dto.state, expected);
}

#[tokio::test]
async fn apply_move_rejects_short_face_and_bad_token() {
    let app = test_app(Arc::new(MissingSolver));

    let mut state = serde_json::to_value(CubeState::solved()).expect("json");
    state["U"] = serde_json::json!(["W", "W", "W"]);
    let response = app
        .clone()
        .oneshot(json_post(
            APPLY_MOVE_ROUTE,
            serde_json::json!({ "state": state, "move": "U" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let err: ApiError = read_json(response).await;
    assert_eq!(err.code, ErrorCode::Validation);

    let response = app
        .oneshot(json_post(
            APPLY_MOVE_ROUTE,
            serde_json::json!({ "state": CubeState::solved(), "move": "X2" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn apply_move_rejects_incomplete_state() {
    let app = test_app(Arc::new(MissingSolver));
    let mut state = CubeState::solved();
    state.remove(Face::B);
    let response = app
        .oneshot(json_post(
            APPLY_MOVE_ROUTE,
            serde_json::json!({ "state": state, "move": "R" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let err: ApiError = read_json(response).await;
    assert!(err.message.contains("missing faces: B"));
}

#[tokio::test]
async fn solve_without_solver_is_unavailable() {
    let app = test_app(Arc::new(MissingSolver));
    let response = app
        .oneshot(json_post(
            SOLVE_ROUTE,
            serde_json::json!({ "cube_faces": CubeState::solved() }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let err: ApiError = read_json(response).await;
    assert_eq!(err.code, ErrorCode::Unavailable);
}

#[tokio::test]
async fn solve_returns_moves_and_physical_actions() {
    let app = test_app(Arc::new(CannedSolver("R B' U2")));
    let response = app
        .oneshot(json_post(
            SOLVE_ROUTE,
            serde_json::json!({ "cube_faces": CubeState::solved() }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let raw: serde_json::Value = read_json(response).await;
    assert_eq!(raw["moves"], serde_json::json!(["R", "B'", "U2"]));
    assert_eq!(
        raw["expanded_moves"],
        serde_json::json!(["R", "TURN_BACK", "F'", "F'", "F'", "U", "U"])
    );
    let dto: SolveResponse = serde_json::from_value(raw).expect("dto");
    assert_eq!(dto.expanded_moves[1], PhysicalAction::TurnBack);
}

#[tokio::test]
async fn solve_requires_all_faces() {
    let app = test_app(Arc::new(CannedSolver("R")));
    let mut faces = CubeState::solved();
    faces.remove(Face::F);
    let response = app
        .oneshot(json_post(
            SOLVE_ROUTE,
            serde_json::json!({ "cube_faces": faces }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let err: ApiError = read_json(response).await;
    assert_eq!(err.message, "All 6 faces must be scanned");
}

#[tokio::test]
async fn classify_without_classifier_is_unavailable() {
    let app = test_app(Arc::new(MissingSolver));
    let response = app
        .oneshot(json_post(
            CLASSIFY_COLORS_ROUTE,
            serde_json::json!({ "image": "data:image/jpeg;base64,aW1hZ2U=" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let err: ApiError = read_json(response).await;
    assert_eq!(err.code, ErrorCode::Unavailable);
    assert_eq!(err.message, "no color classifier is configured");
}

#[tokio::test]
async fn classify_returns_the_face_colors() {
    let grid = FaceColorGrid::uniform(Color::O);
    let app = build_router(
        Arc::new(AppState {
            api: ApiContext::new(Arc::new(MissingSolver))
                .with_classifier(Arc::new(CannedClassifier(grid))),
        }),
        64 * 1024,
    );
    let response = app
        .clone()
        .oneshot(json_post(
            CLASSIFY_COLORS_ROUTE,
            serde_json::json!({ "image": "aW1hZ2U=", "debug": true }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let dto: ClassifyColorsResponse = read_json(response).await;
    assert_eq!(dto.colors, grid);

    let response = app
        .oneshot(json_post(
            CLASSIFY_COLORS_ROUTE,
            serde_json::json!({ "image": "" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let app = build_router(
        Arc::new(AppState {
            api: ApiContext::new(Arc::new(MissingSolver)),
        }),
        16,
    );
    let body = serde_json::json!({ "cube_faces": CubeState::solved() }).to_string();
    let request = Request::post(SOLVE_ROUTE)
        .header("content-type", "application/json")
        .header("content-length", body.len().to_string())
        .body(Body::from(body))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
