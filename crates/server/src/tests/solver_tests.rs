use super::*;
use axum::{http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn spawn_solver(status: StatusCode, reply: Value) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new().route(
        "/solve",
        post(move |Json(body): Json<Value>| {
            let reply = reply.clone();
            async move {
                assert_eq!(body["cube_string"].as_str().map(str::len), Some(54));
                (status, Json(reply))
            }
        }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/solve")
}

const CUBE: &str = "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB";

fn solver(url: String) -> UpstreamSolver {
    UpstreamSolver::new(url, Duration::from_secs(5)).expect("solver")
}

#[tokio::test]
async fn returns_the_upstream_move_string() {
    let url = spawn_solver(StatusCode::OK, json!({ "solution": "R U R' U'" })).await;
    let solution = solver(url).solve(CUBE).await.expect("solve");
    assert_eq!(solution, "R U R' U'");
}

#[tokio::test]
async fn error_body_is_a_rejection() {
    let url = spawn_solver(
        StatusCode::BAD_REQUEST,
        json!({ "error": "Invalid cube state: corner twist" }),
    )
    .await;
    let err = solver(url).solve(CUBE).await.expect_err("rejected");
    assert!(matches!(err, SolverError::Rejected(ref message) if message.contains("corner twist")));
}

#[tokio::test]
async fn unreachable_solver_is_a_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = solver(format!("http://{addr}/solve"))
        .solve(CUBE)
        .await
        .expect_err("nothing listening");
    assert!(matches!(err, SolverError::Transport(_)));
}
