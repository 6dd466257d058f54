mod common;

use axum::http::StatusCode;
use common::{TestAccount, create_test_account, create_test_nursery, login, send, setup_test_app};
use creche::creche_models::UserType;
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

struct Fixture {
    nursery_id: Uuid,
    classroom_id: String,
    plan_id: String,
    parent: TestAccount,
    parent_token: String,
    child_id: String,
}

async fn setup_fixture(pool: &PgPool) -> Fixture {
    let manager = create_test_account(pool, UserType::NurseryManager).await;
    let parent = create_test_account(pool, UserType::Parent).await;
    let nursery_id = create_test_nursery(pool, manager.profile_id, true).await;
    let manager_token = login(pool, &manager).await;

    let (status, classroom) = send(
        setup_test_app(pool.clone()),
        "POST",
        &format!("/api/client/nursery/{}/classrooms", nursery_id),
        Some(&manager_token),
        Some(json!({
            "name": "Papillons",
            "capacity": 12,
            "age_range_start": 1,
            "age_range_end": 2
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, plan) = send(
        setup_test_app(pool.clone()),
        "POST",
        &format!("/api/client/nursery/{}/plans", nursery_id),
        Some(&manager_token),
        Some(json!({ "name": "Mensuel", "price": 45000, "duration": "month" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let parent_token = login(pool, &parent).await;
    let (status, child) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/client/child",
        Some(&parent_token),
        Some(json!({ "first_name": "Léon", "last_name": "Roux", "birthday": "2023-09-02" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    Fixture {
        nursery_id,
        classroom_id: id_of(&classroom),
        plan_id: id_of(&plan),
        parent,
        parent_token,
        child_id: id_of(&child),
    }
}

fn id_of(body: &Value) -> String {
    body["id"].as_str().unwrap().to_string()
}

fn subscriptions_uri(fixture: &Fixture) -> String {
    format!(
        "/api/client/nursery/{}/plans/{}/subscriptions",
        fixture.nursery_id, fixture.plan_id
    )
}

#[sqlx::test(migrations = "./migrations")]
async fn test_subscribe_child_to_plan(pool: PgPool) {
    let fixture = setup_fixture(&pool).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        &subscriptions_uri(&fixture),
        Some(&fixture.parent_token),
        Some(json!({
            "start_date": "2025-01-31",
            "details": [{ "child_id": fixture.child_id, "classroom_id": fixture.classroom_id }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["parent_id"], fixture.parent.profile_id.to_string());
    assert_eq!(body["price"], 45000);
    assert_eq!(body["end_date"], "2025-02-28");
    assert_eq!(body["detail_objects"][0]["child"]["first_name"], "Léon");
    assert_eq!(body["detail_objects"][0]["classroom"]["name"], "Papillons");

    let (status, mine) = send(
        setup_test_app(pool),
        "GET",
        "/api/client/mysubscriptions",
        Some(&fixture.parent_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["meta"]["total"], 1);
    assert_eq!(
        mine["data"][0]["plan"]["nursery"]["id"],
        fixture.nursery_id.to_string()
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cannot_subscribe_someone_elses_child(pool: PgPool) {
    let fixture = setup_fixture(&pool).await;
    let stranger = create_test_account(&pool, UserType::Parent).await;
    let stranger_token = login(&pool, &stranger).await;

    let (status, _) = send(
        setup_test_app(pool),
        "POST",
        &subscriptions_uri(&fixture),
        Some(&stranger_token),
        Some(json!({ "details": [{ "child_id": fixture.child_id }] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_classroom_of_another_nursery_rejected(pool: PgPool) {
    let fixture = setup_fixture(&pool).await;

    let (status, _) = send(
        setup_test_app(pool),
        "POST",
        &subscriptions_uri(&fixture),
        Some(&fixture.parent_token),
        Some(json!({
            "details": [{ "child_id": fixture.child_id, "classroom_id": Uuid::new_v4() }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_inactive_plan_is_not_found(pool: PgPool) {
    let fixture = setup_fixture(&pool).await;
    sqlx::query("UPDATE plans SET is_active = FALSE WHERE id = $1")
        .bind(Uuid::parse_str(&fixture.plan_id).unwrap())
        .execute(&pool)
        .await
        .unwrap();

    let (status, _) = send(
        setup_test_app(pool),
        "POST",
        &subscriptions_uri(&fixture),
        Some(&fixture.parent_token),
        Some(json!({ "details": [{ "child_id": fixture.child_id }] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_replace_details_and_delete(pool: PgPool) {
    let fixture = setup_fixture(&pool).await;

    let (_, created) = send(
        setup_test_app(pool.clone()),
        "POST",
        &subscriptions_uri(&fixture),
        Some(&fixture.parent_token),
        Some(json!({
            "details": [{ "child_id": fixture.child_id, "classroom_id": fixture.classroom_id }]
        })),
    )
    .await;
    let uri = format!("{}/{}", subscriptions_uri(&fixture), id_of(&created));

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "PATCH",
        &uri,
        Some(&fixture.parent_token),
        Some(json!({ "details": [{ "child_id": fixture.child_id }], "is_active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], false);
    assert!(body["detail_objects"][0]["classroom"].is_null());

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "DELETE",
        &uri,
        Some(&fixture.parent_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        setup_test_app(pool),
        "GET",
        &uri,
        Some(&fixture.parent_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
