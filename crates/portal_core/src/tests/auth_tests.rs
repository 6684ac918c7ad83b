use super::*;
use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use shared::error::ErrorCode;
use tokio::net::TcpListener;

#[derive(Clone)]
struct LoginServerState {
    hits: Arc<AtomicU32>,
    unavailable_for: u32,
}

impl LoginServerState {
    fn new(unavailable_for: u32) -> Self {
        Self {
            hits: Arc::new(AtomicU32::new(0)),
            unavailable_for,
        }
    }
}

async fn login_handler(
    State(state): State<LoginServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<ApiError>)> {
    let hit = state.hits.fetch_add(1, Ordering::SeqCst) + 1;
    if hit <= state.unavailable_for {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new(ErrorCode::Internal, "warming up")),
        ));
    }
    if req.password != "pass123" {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiError::new(ErrorCode::Unauthorized, "wrong password")),
        ));
    }
    Ok(Json(LoginResponse {
        session_token: format!("token-{}", req.role),
        redirect_path: (req.role == Role::Teacher).then(|| "teacher-home.html".to_string()),
    }))
}

async fn spawn_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

async fn spawn_login_server(state: LoginServerState) -> String {
    let router = Router::new()
        .route("/login", post(login_handler))
        .with_state(state);
    spawn_server(router).await
}

fn request(role: Role, password: &str) -> LoginRequest {
    LoginRequest {
        email: "t@x.com".into(),
        password: password.into(),
        role,
        remember: true,
    }
}

fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        backoff: Duration::from_millis(5),
    }
}

#[tokio::test]
async fn http_login_returns_session_token_and_redirect() {
    let state = LoginServerState::new(0);
    let base = spawn_login_server(state.clone()).await;
    let service =
        HttpAuthService::new(&base, Duration::from_secs(5), RetryPolicy::none()).expect("service");

    let grant = service
        .authenticate(&request(Role::Teacher, "pass123"))
        .await
        .expect("login");
    assert_eq!(grant.session_token.as_deref(), Some("token-teacher"));
    assert_eq!(
        grant.redirect,
        Some(NavigationTarget::new("teacher-home.html"))
    );

    let grant = service
        .authenticate(&request(Role::Parent, "pass123"))
        .await
        .expect("login");
    assert_eq!(grant.redirect, None);
    assert_eq!(state.hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn rejected_credentials_are_not_retried() {
    let state = LoginServerState::new(0);
    let base = spawn_login_server(state.clone()).await;
    let service = HttpAuthService::new(&base, Duration::from_secs(5), fast_retry(3)).expect("service");

    let err = service
        .authenticate(&request(Role::Student, "nope123"))
        .await
        .expect_err("rejected");
    match err {
        AuthError::Rejected(reason) => assert_eq!(reason, "wrong password"),
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(state.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn server_errors_are_retried_until_success() {
    let state = LoginServerState::new(2);
    let base = spawn_login_server(state.clone()).await;
    let service = HttpAuthService::new(&base, Duration::from_secs(5), fast_retry(3)).expect("service");

    let grant = service
        .authenticate(&request(Role::Student, "pass123"))
        .await
        .expect("third attempt succeeds");
    assert_eq!(grant.session_token.as_deref(), Some("token-student"));
    assert_eq!(state.hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn gives_up_after_max_attempts() {
    let state = LoginServerState::new(10);
    let base = spawn_login_server(state.clone()).await;
    let service = HttpAuthService::new(&base, Duration::from_secs(5), fast_retry(2)).expect("service");

    let err = service
        .authenticate(&request(Role::Student, "pass123"))
        .await
        .expect_err("still unavailable");
    assert!(matches!(err, AuthError::Network(_)));
    assert_eq!(state.hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let service = HttpAuthService::new(
        &format!("http://{addr}"),
        Duration::from_secs(2),
        fast_retry(2),
    )
    .expect("service");
    let err = service
        .authenticate(&request(Role::Student, "pass123"))
        .await
        .expect_err("connection refused");
    assert!(matches!(err, AuthError::Network(_)), "got {err:?}");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn slow_server_times_out() {
    let router = Router::new().route(
        "/login",
        post(|| async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Json(LoginResponse {
                session_token: "late".into(),
                redirect_path: None,
            })
        }),
    );
    let base = spawn_server(router).await;
    let service = HttpAuthService::new(&base, Duration::from_millis(50), RetryPolicy::none())
        .expect("service");

    let err = service
        .authenticate(&request(Role::Student, "pass123"))
        .await
        .expect_err("timeout");
    assert!(matches!(err, AuthError::Timeout(d) if d == Duration::from_millis(50)));
}

#[tokio::test]
async fn malformed_body_is_an_invalid_response() {
    let router = Router::new().route("/login", post(|| async { "not json" }));
    let base = spawn_server(router).await;
    let service =
        HttpAuthService::new(&base, Duration::from_secs(5), RetryPolicy::none()).expect("service");

    let err = service
        .authenticate(&request(Role::Student, "pass123"))
        .await
        .expect_err("bad body");
    assert!(matches!(err, AuthError::InvalidResponse(_)));
}

#[test]
fn login_url_keeps_base_path() {
    let service = HttpAuthService::new(
        "https://portal.example.edu/api",
        Duration::from_secs(1),
        RetryPolicy::none(),
    )
    .expect("service");
    assert_eq!(
        service.login_url().as_str(),
        "https://portal.example.edu/api/login"
    );
}

#[test]
fn rejects_unparsable_base_url() {
    assert!(HttpAuthService::new("not a url", Duration::from_secs(1), RetryPolicy::none()).is_err());
}

#[tokio::test]
async fn http_service_serves_demo_but_not_federated() {
    let service = HttpAuthService::new(
        "http://127.0.0.1:9",
        Duration::from_secs(1),
        RetryPolicy::none(),
    )
    .expect("service");
    service.prepare_demo(Role::Parent).await.expect("demo");
    let err = service
        .federated_sign_in(FederatedProvider::Microsoft, Role::Parent)
        .await
        .expect_err("unsupported");
    assert!(matches!(err, AuthError::Unsupported(_)));
}

#[tokio::test(start_paused = true)]
async fn retry_policy_backs_off_linearly() {
    let calls = AtomicU32::new(0);
    let policy = RetryPolicy {
        max_attempts: 3,
        backoff: Duration::from_millis(100),
    };
    let started = tokio::time::Instant::now();

    let result: Result<(), AuthError> = policy
        .run("login", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AuthError::Timeout(Duration::from_secs(1)))
        })
        .await;

    assert!(matches!(result, Err(AuthError::Timeout(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    // 100ms after the first failure, 200ms after the second.
    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[test]
fn backoff_grows_linearly_and_saturates() {
    let policy = RetryPolicy {
        max_attempts: 5,
        backoff: Duration::from_millis(100),
    };
    assert_eq!(policy.delay_after(1), Duration::from_millis(100));
    assert_eq!(policy.delay_after(3), Duration::from_millis(300));

    let huge = RetryPolicy {
        max_attempts: 5,
        backoff: Duration::MAX,
    };
    assert_eq!(huge.delay_after(2), Duration::MAX);
}

#[tokio::test(start_paused = true)]
async fn simulated_service_waits_fixed_delays() {
    let service = SimulatedAuthService::default();
    let started = tokio::time::Instant::now();
    service
        .authenticate(&request(Role::Student, "pass123"))
        .await
        .expect("login");
    assert!(started.elapsed() >= SIMULATED_LOGIN_DELAY);

    let started = tokio::time::Instant::now();
    service
        .federated_sign_in(FederatedProvider::Google, Role::Student)
        .await
        .expect("federated");
    assert!(started.elapsed() >= SIMULATED_FEDERATED_DELAY);
}
