//! HTTP Arbiter Integration Tests
//!
//! Runs `HttpArbiter` against an Axum mock of the StockZero move API bound
//! to a local port.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use shakmaty::Square;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use stockzero_client::game::{ChessRules, DropOutcome, Resolution, StatusText};
use stockzero_client::networking::{
    ArbitrationService, EngineMode, HttpArbiter, MoveRequest, NetworkError,
};
use stockzero_client::ui::BoardSurface;
use stockzero_client::MoveOrchestrator;
use url::Url;

/// A request as the mock server saw it
#[derive(Debug, Clone)]
struct Seen {
    endpoint: &'static str,
    csrf: Option<String>,
    cookie: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct MockState {
    seen: Arc<Mutex<Vec<Seen>>>,
    status: StatusCode,
    reply: Value,
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn record(state: &MockState, endpoint: &'static str, headers: &HeaderMap, body: Value) {
    state.seen.lock().push(Seen {
        endpoint,
        csrf: header(headers, "x-csrftoken"),
        cookie: header(headers, "cookie"),
        body,
    });
}

async fn make_move(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    record(&state, "make_move", &headers, body);
    (state.status, Json(state.reply.clone()))
}

async fn make_traditional_move(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    record(&state, "make_traditional_move", &headers, body);
    (state.status, Json(state.reply.clone()))
}

/// Serve the mock API on an ephemeral port
async fn spawn_mock(status: StatusCode, reply: Value) -> (SocketAddr, Arc<Mutex<Vec<Seen>>>) {
    spawn_mock_under(None, status, reply).await
}

/// Serve the mock API, optionally nested under a path prefix
async fn spawn_mock_under(
    prefix: Option<&str>,
    status: StatusCode,
    reply: Value,
) -> (SocketAddr, Arc<Mutex<Vec<Seen>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        seen: seen.clone(),
        status,
        reply,
    };
    let app = Router::new()
        .route("/api/chess/make_move/", post(make_move))
        .route(
            "/api/chess/make_traditional_move/",
            post(make_traditional_move),
        )
        .with_state(state);
    let app = match prefix {
        Some(prefix) => Router::new().nest(prefix, app),
        None => app,
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock server");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, seen)
}

fn arbiter(addr: SocketAddr) -> HttpArbiter {
    let base = Url::parse(&format!("http://{addr}")).unwrap();
    HttpArbiter::new(base, Duration::from_secs(5)).unwrap()
}

fn opening_request() -> MoveRequest {
    MoveRequest {
        mv: "e2e4".to_string(),
        fen: "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1".to_string(),
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[tokio::test]
async fn test_submit_posts_move_and_fen() {
    let (addr, seen) = spawn_mock(StatusCode::OK, json!({ "ai_move": "e7e5" })).await;
    let client = arbiter(addr).with_cookie("sessionid=s1; csrftoken=tok123");

    let reply = client
        .submit(EngineMode::Default, &opening_request())
        .await
        .unwrap();

    assert_eq!(reply.ai_move.as_deref(), Some("e7e5"));
    assert!(!reply.game_over);
    assert_eq!(reply.rejection(), None);

    let seen = seen.lock().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].endpoint, "make_move");
    assert_eq!(seen[0].csrf.as_deref(), Some("tok123"));
    assert_eq!(seen[0].cookie.as_deref(), Some("sessionid=s1; csrftoken=tok123"));
    assert_eq!(
        seen[0].body,
        json!({
            "move": "e2e4",
            "fen": "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
        })
    );
}

#[tokio::test]
async fn test_traditional_engine_endpoint() {
    let (addr, seen) = spawn_mock(StatusCode::OK, json!({ "ai_move": "c7c5" })).await;

    arbiter(addr)
        .submit(EngineMode::Traditional, &opening_request())
        .await
        .unwrap();

    assert_eq!(seen.lock()[0].endpoint, "make_traditional_move");
}

#[tokio::test]
async fn test_without_cookie_sends_no_csrf() {
    let (addr, seen) = spawn_mock(StatusCode::OK, json!({ "ai_move": "e7e5" })).await;

    arbiter(addr)
        .submit(EngineMode::Default, &opening_request())
        .await
        .unwrap();

    let seen = seen.lock().clone();
    assert_eq!(seen[0].csrf, None);
    assert_eq!(seen[0].cookie, None);
}

#[tokio::test]
async fn test_rejection_is_a_reply() {
    let (addr, _seen) = spawn_mock(StatusCode::OK, json!({ "error": "Illegal move" })).await;

    let reply = arbiter(addr)
        .submit(EngineMode::Default, &opening_request())
        .await
        .unwrap();

    assert_eq!(reply.rejection(), Some("Illegal move"));
}

#[tokio::test]
async fn test_game_over_reply() {
    let (addr, _seen) = spawn_mock(
        StatusCode::OK,
        json!({ "game_over": true, "result": "0-1", "ai_move": "d8h4" }),
    )
    .await;

    let reply = arbiter(addr)
        .submit(EngineMode::Default, &opening_request())
        .await
        .unwrap();

    assert!(reply.game_over);
    assert_eq!(reply.result_text(), "0-1");
    assert_eq!(reply.ai_move.as_deref(), Some("d8h4"));
}

#[tokio::test]
async fn test_server_url_path_prefix_is_kept() {
    let (addr, seen) =
        spawn_mock_under(Some("/stockzero"), StatusCode::OK, json!({ "ai_move": "e7e5" })).await;
    let base = Url::parse(&format!("http://{addr}/stockzero")).unwrap();
    let client = HttpArbiter::new(base, Duration::from_secs(5)).unwrap();

    let reply = client
        .submit(EngineMode::Traditional, &opening_request())
        .await
        .unwrap();

    assert_eq!(reply.ai_move.as_deref(), Some("e7e5"));
    assert_eq!(seen.lock()[0].endpoint, "make_traditional_move");
}

// ============================================================================
// Transport failures
// ============================================================================

#[tokio::test]
async fn test_server_error_status() {
    let (addr, _seen) = spawn_mock(StatusCode::INTERNAL_SERVER_ERROR, json!({})).await;

    let err = arbiter(addr)
        .submit(EngineMode::Default, &opening_request())
        .await
        .unwrap_err();

    match err {
        NetworkError::Status { status } => assert_eq!(status.as_u16(), 500),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_forbidden_status() {
    let (addr, _seen) = spawn_mock(StatusCode::FORBIDDEN, json!({ "detail": "CSRF" })).await;

    let err = arbiter(addr)
        .submit(EngineMode::Default, &opening_request())
        .await
        .unwrap_err();

    assert!(matches!(err, NetworkError::Status { .. }));
}

#[tokio::test]
async fn test_malformed_body() {
    let (addr, _seen) = spawn_mock(StatusCode::OK, json!(["not", "a", "reply"])).await;

    let err = arbiter(addr)
        .submit(EngineMode::Default, &opening_request())
        .await
        .unwrap_err();

    assert!(matches!(err, NetworkError::Decode(_)));
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = arbiter(addr)
        .submit(EngineMode::Default, &opening_request())
        .await
        .unwrap_err();

    assert!(matches!(err, NetworkError::Http(_)));
}

// ============================================================================
// End to end through the orchestrator
// ============================================================================

#[derive(Default)]
struct AlertLog {
    alerts: Mutex<Vec<String>>,
}

impl BoardSurface for AlertLog {
    fn render(&self, _fen: &str) {}
    fn show_status(&self, _status: &StatusText) {}
    fn alert(&self, message: &str) {
        self.alerts.lock().push(message.to_string());
    }
}

#[tokio::test]
async fn test_orchestrator_over_http() {
    let (addr, seen) = spawn_mock(
        StatusCode::OK,
        json!({ "ai_move": { "from": "e7", "to": "e5" } }),
    )
    .await;
    let board = Arc::new(AlertLog::default());
    let orch = MoveOrchestrator::new(
        ChessRules::new(),
        board.clone(),
        Arc::new(arbiter(addr).with_cookie("csrftoken=abc")),
    );

    let outcome = orch.on_drop(Square::E2, Square::E4).await;

    match outcome {
        DropOutcome::Submitted(Resolution::Accepted { reply, .. }) => {
            assert_eq!(reply.uci, "e7e5");
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(
        orch.position_notation(),
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2"
    );
    assert!(board.alerts.lock().is_empty());
    assert_eq!(seen.lock()[0].csrf.as_deref(), Some("abc"));
}

#[tokio::test]
async fn test_orchestrator_rolls_back_on_http_failure() {
    let (addr, _seen) = spawn_mock(StatusCode::BAD_GATEWAY, json!({})).await;
    let board = Arc::new(AlertLog::default());
    let orch = MoveOrchestrator::new(ChessRules::new(), board.clone(), Arc::new(arbiter(addr)));
    let before = orch.position_notation();

    let outcome = orch.on_drop(Square::G1, Square::F3).await;

    assert!(matches!(
        outcome,
        DropOutcome::Submitted(Resolution::TransportFailed { .. })
    ));
    assert_eq!(orch.position_notation(), before);
    let alerts = board.alerts.lock().clone();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].starts_with("Request failed:"));
}
