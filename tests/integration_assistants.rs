mod common;

use axum::http::StatusCode;
use common::{
    TEST_PASSWORD, create_test_account, create_test_nursery, generate_unique_username,
    get_auth_token, login, send, setup_test_app,
};
use creche::creche_models::UserType;
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

fn assistant_body(username: &str, extra: Value) -> Value {
    let mut body = json!({
        "profile": {
            "user": {
                "username": username,
                "email": format!("{}@creche.test", username),
                "password": TEST_PASSWORD,
                "first_name": "Inès",
                "last_name": "Morel"
            },
            "contact": "0611223344"
        }
    });
    if let (Some(body), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        body.extend(extra.clone());
    }
    body
}

async fn create_classroom(pool: &PgPool, token: &str, nursery_id: Uuid, name: &str) -> String {
    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        &format!("/api/client/nursery/{}/classrooms", nursery_id),
        Some(token),
        Some(json!({ "name": name, "capacity": 10, "age_range_start": 0, "age_range_end": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "classroom: {}", body);
    body["id"].as_str().unwrap().to_string()
}

async fn create_group(
    pool: &PgPool,
    token: &str,
    nursery_id: Uuid,
    classroom_id: &str,
    name: &str,
) -> String {
    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        &format!(
            "/api/client/nursery/{}/classrooms/{}/groups",
            nursery_id, classroom_id
        ),
        Some(token),
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "group: {}", body);
    body["id"].as_str().unwrap().to_string()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_manager_creates_assistant_account(pool: PgPool) {
    let manager = create_test_account(&pool, UserType::NurseryManager).await;
    let nursery_id = create_test_nursery(&pool, manager.profile_id, true).await;
    let token = login(&pool, &manager).await;
    let uri = format!("/api/client/nursery/{}/assistants", nursery_id);
    let username = generate_unique_username("assistant");

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        &uri,
        Some(&token),
        Some(assistant_body(&username, json!({ "is_manager": true }))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["nursery_id"], nursery_id.to_string());
    assert_eq!(body["is_manager"], true);
    assert_eq!(body["active"], true);
    assert_eq!(body["profile"]["user_type"], "nursery_assistant");
    assert_eq!(body["profile"]["user"]["username"], username.as_str());
    assert_eq!(body["profile"]["contact"], "0611223344");

    // the new account can sign in and read its nursery
    let assistant_token =
        get_auth_token(setup_test_app(pool.clone()), &username, TEST_PASSWORD).await;
    let (status, list) = send(
        setup_test_app(pool.clone()),
        "GET",
        &uri,
        Some(&assistant_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["meta"]["total"], 1);

    let (status, _) = send(
        setup_test_app(pool),
        "POST",
        &uri,
        Some(&token),
        Some(assistant_body(&username, json!({}))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_classroom_move_drops_group(pool: PgPool) {
    let manager = create_test_account(&pool, UserType::NurseryManager).await;
    let nursery_id = create_test_nursery(&pool, manager.profile_id, true).await;
    let token = login(&pool, &manager).await;

    let classroom_a = create_classroom(&pool, &token, nursery_id, "Lucioles").await;
    let classroom_b = create_classroom(&pool, &token, nursery_id, "Coccinelles").await;
    let group_a = create_group(&pool, &token, nursery_id, &classroom_a, "Matin").await;

    let (status, assistant) = send(
        setup_test_app(pool.clone()),
        "POST",
        &format!("/api/client/nursery/{}/assistants", nursery_id),
        Some(&token),
        Some(assistant_body(
            &generate_unique_username("assistant"),
            json!({ "classroom_id": classroom_a, "group_id": group_a }),
        )),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", assistant);
    assert_eq!(assistant["group_id"], group_a.as_str());
    let uri = format!(
        "/api/client/nursery/{}/assistants/{}",
        nursery_id,
        assistant["id"].as_str().unwrap()
    );

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "PATCH",
        &uri,
        Some(&token),
        Some(json!({ "classroom_id": classroom_b })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["classroom_id"], classroom_b.as_str());
    assert_eq!(body["group_id"], Value::Null);

    // a group of another classroom is still refused
    let (status, _) = send(
        setup_test_app(pool),
        "PATCH",
        &uri,
        Some(&token),
        Some(json!({ "group_id": group_a })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_plain_assistant_cannot_manage_staff(pool: PgPool) {
    let manager = create_test_account(&pool, UserType::NurseryManager).await;
    let nursery_id = create_test_nursery(&pool, manager.profile_id, true).await;
    let token = login(&pool, &manager).await;
    let uri = format!("/api/client/nursery/{}/assistants", nursery_id);

    let username = generate_unique_username("assistant");
    let (status, assistant) = send(
        setup_test_app(pool.clone()),
        "POST",
        &uri,
        Some(&token),
        Some(assistant_body(&username, json!({}))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let assistant_uri = format!("{}/{}", uri, assistant["id"].as_str().unwrap());

    let assistant_token =
        get_auth_token(setup_test_app(pool.clone()), &username, TEST_PASSWORD).await;
    let (status, _) = send(
        setup_test_app(pool.clone()),
        "POST",
        &uri,
        Some(&assistant_token),
        Some(assistant_body(&generate_unique_username("assistant"), json!({}))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "DELETE",
        &assistant_uri,
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(setup_test_app(pool), "GET", &assistant_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
