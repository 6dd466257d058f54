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

fn classroom_body(name: &str) -> Value {
    json!({ "name": name, "capacity": 10, "age_range_start": 0, "age_range_end": 3 })
}

fn slot_body(activity_id: &str) -> Value {
    json!({
        "activity_id": activity_id,
        "date": "2025-03-10",
        "start_time": "09:30:00",
        "end_time": "10:15:00"
    })
}

/// Creates an assistant through the API and returns its access token.
async fn add_assistant(pool: &PgPool, token: &str, nursery_id: Uuid, is_manager: bool) -> String {
    let username = generate_unique_username("assistant");
    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        &format!("/api/client/nursery/{}/assistants", nursery_id),
        Some(token),
        Some(json!({
            "profile": {
                "user": {
                    "username": username,
                    "email": format!("{}@creche.test", username),
                    "password": TEST_PASSWORD
                }
            },
            "is_manager": is_manager
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "assistant: {}", body);
    get_auth_token(setup_test_app(pool.clone()), &username, TEST_PASSWORD).await
}

async fn create(pool: &PgPool, uri: &str, token: &str, body: Value) -> String {
    let (status, created) = send(
        setup_test_app(pool.clone()),
        "POST",
        uri,
        Some(token),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}: {}", uri, created);
    created["id"].as_str().unwrap().to_string()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_classroom_and_group_names(pool: PgPool) {
    let manager = create_test_account(&pool, UserType::NurseryManager).await;
    let nursery_id = create_test_nursery(&pool, manager.profile_id, true).await;
    let token = login(&pool, &manager).await;
    let classrooms_uri = format!("/api/client/nursery/{}/classrooms", nursery_id);

    let first = create(&pool, &classrooms_uri, &token, classroom_body("Papillons")).await;
    let second = create(&pool, &classrooms_uri, &token, classroom_body("Abeilles")).await;

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "POST",
        &classrooms_uri,
        Some(&token),
        Some(classroom_body("Papillons")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "PATCH",
        &format!("{}/{}", classrooms_uri, second),
        Some(&token),
        Some(json!({ "name": "Papillons" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let groups_uri = format!("{}/{}/groups", classrooms_uri, first);
    create(&pool, &groups_uri, &token, json!({ "name": "Matin" })).await;

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "POST",
        &groups_uri,
        Some(&token),
        Some(json!({ "name": "Matin" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // group names are unique per classroom only
    create(
        &pool,
        &format!("{}/{}/groups", classrooms_uri, second),
        &token,
        json!({ "name": "Matin" }),
    )
    .await;
}

#[sqlx::test(migrations = "./migrations")]
async fn test_activities_are_owner_managed(pool: PgPool) {
    let manager = create_test_account(&pool, UserType::NurseryManager).await;
    let nursery_id = create_test_nursery(&pool, manager.profile_id, true).await;
    let token = login(&pool, &manager).await;
    let lead_token = add_assistant(&pool, &token, nursery_id, true).await;
    let uri = format!("/api/client/nursery/{}/activities", nursery_id);
    let activity = json!({
        "name": "Peinture",
        "description": "Peinture au doigt",
        "type": "cultural"
    });

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "POST",
        &uri,
        Some(&lead_token),
        Some(activity.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let activity_id = create(&pool, &uri, &token, activity).await;
    let activity_uri = format!("{}/{}", uri, activity_id);

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        &activity_uri,
        Some(&lead_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "cultural");

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "DELETE",
        &activity_uri,
        Some(&lead_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(setup_test_app(pool), "DELETE", &activity_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_classroom_activity_permissions(pool: PgPool) {
    let manager = create_test_account(&pool, UserType::NurseryManager).await;
    let nursery_id = create_test_nursery(&pool, manager.profile_id, true).await;
    let token = login(&pool, &manager).await;
    let helper_token = add_assistant(&pool, &token, nursery_id, false).await;
    let lead_token = add_assistant(&pool, &token, nursery_id, true).await;

    let classroom_id = create(
        &pool,
        &format!("/api/client/nursery/{}/classrooms", nursery_id),
        &token,
        classroom_body("Papillons"),
    )
    .await;
    let activity_id = create(
        &pool,
        &format!("/api/client/nursery/{}/activities", nursery_id),
        &token,
        json!({ "name": "Comptines", "description": "Chansons", "type": "educational" }),
    )
    .await;
    let uri = format!(
        "/api/client/nursery/{}/classrooms/{}/activities",
        nursery_id, classroom_id
    );

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "POST",
        &uri,
        Some(&helper_token),
        Some(slot_body(&activity_id)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let schedule_id = create(&pool, &uri, &lead_token, slot_body(&activity_id)).await;
    let schedule_uri = format!("{}/{}", uri, schedule_id);

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "POST",
        &uri,
        Some(&token),
        Some(slot_body(&activity_id)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, list) = send(
        setup_test_app(pool.clone()),
        "GET",
        &uri,
        Some(&helper_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["meta"]["total"], 1);

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "PATCH",
        &schedule_uri,
        Some(&lead_token),
        Some(json!({ "active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "PATCH",
        &schedule_uri,
        Some(&token),
        Some(json!({ "active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], false);

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "DELETE",
        &schedule_uri,
        Some(&lead_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(setup_test_app(pool), "DELETE", &schedule_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
