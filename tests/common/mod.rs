use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use creche::creche_core::hash_password;
use creche::creche_models::UserType;
use creche::router::init_router;
use creche::state::AppState;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "testpass123";

#[allow(dead_code)]
pub struct TestAccount {
    pub user_id: Uuid,
    pub profile_id: Uuid,
    pub username: String,
    pub password: String,
}

pub fn setup_test_app(pool: PgPool) -> Router {
    dotenvy::dotenv().ok();
    init_router(AppState::new(pool))
}

pub fn generate_unique_username(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

/// Inserts a user and its profile directly.
pub async fn create_test_account(pool: &PgPool, user_type: UserType) -> TestAccount {
    let username = generate_unique_username(user_type.as_str());
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    let user_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (username, email, password, first_name, last_name, is_staff)
         VALUES ($1, $2, $3, 'Test', 'User', $4)
         RETURNING id",
    )
    .bind(&username)
    .bind(format!("{}@test.com", username))
    .bind(&hashed)
    .bind(user_type == UserType::Admin)
    .fetch_one(pool)
    .await
    .unwrap();

    let profile_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO profiles (user_id, user_type) VALUES ($1, $2) RETURNING id",
    )
    .bind(user_id)
    .bind(user_type)
    .fetch_one(pool)
    .await
    .unwrap();

    TestAccount {
        user_id,
        profile_id,
        username,
        password: TEST_PASSWORD.to_string(),
    }
}

#[allow(dead_code)]
pub async fn create_test_nursery(pool: &PgPool, manager_profile_id: Uuid, verified: bool) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO nurseries (manager_id, name, address, contact_number, max_age,
                                max_children_per_class, verified)
         VALUES ($1, $2, '12 rue des Lilas, Lyon', '0102030405', 4, 12, $3)
         RETURNING id",
    )
    .bind(manager_profile_id)
    .bind(format!("Crèche {}", Uuid::new_v4().simple()))
    .bind(verified)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn get_auth_token(app: Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/client/token",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["access"].as_str().unwrap().to_string()
}

#[allow(dead_code)]
pub async fn login(pool: &PgPool, account: &TestAccount) -> String {
    get_auth_token(
        setup_test_app(pool.clone()),
        &account.username,
        &account.password,
    )
    .await
}

/// Sends a JSON request and returns the status with the parsed body (`Null` when empty).
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

/// Sends a single `file` field as `multipart/form-data`.
#[allow(dead_code)]
pub async fn send_file(
    app: Router,
    uri: &str,
    token: &str,
    filename: &str,
    content_type: &str,
    content: &[u8],
) -> (StatusCode, Value) {
    let boundary = "creche-test-boundary";
    let mut body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}
