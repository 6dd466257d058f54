mod common;

use axum::http::StatusCode;
use common::{create_test_account, create_test_nursery, login, send, setup_test_app};
use creche::creche_models::UserType;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_only_active_plans_are_listed(pool: PgPool) {
    let manager = create_test_account(&pool, UserType::NurseryManager).await;
    let parent = create_test_account(&pool, UserType::Parent).await;
    let nursery_id = create_test_nursery(&pool, manager.profile_id, true).await;
    let token = login(&pool, &manager).await;
    let parent_token = login(&pool, &parent).await;
    let uri = format!("/api/client/nursery/{}/plans", nursery_id);

    for body in [
        json!({ "name": "Annuel", "price": 480000, "duration": "year" }),
        json!({ "name": "Journée", "price": 3500, "duration": "day" }),
    ] {
        let (status, _) =
            send(setup_test_app(pool.clone()), "POST", &uri, Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (status, hidden) = send(
        setup_test_app(pool.clone()),
        "POST",
        &uri,
        Some(&token),
        Some(json!({ "name": "Été", "price": 90000, "duration": "quarter", "is_active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let hidden_uri = format!("{}/{}", uri, hidden["id"].as_str().unwrap());

    let (status, list) = send(
        setup_test_app(pool.clone()),
        "GET",
        &uri,
        Some(&parent_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["meta"]["total"], 2);
    assert_eq!(list["data"][0]["name"], "Journée");
    assert_eq!(list["data"][1]["name"], "Annuel");

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "GET",
        &hidden_uri,
        Some(&parent_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "PATCH",
        &hidden_uri,
        Some(&token),
        Some(json!({ "is_active": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], true);

    let (status, list) = send(setup_test_app(pool), "GET", &uri, Some(&parent_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["meta"]["total"], 3);
    assert_eq!(list["data"][1]["name"], "Été");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_parent_cannot_create_plan(pool: PgPool) {
    let manager = create_test_account(&pool, UserType::NurseryManager).await;
    let parent = create_test_account(&pool, UserType::Parent).await;
    let nursery_id = create_test_nursery(&pool, manager.profile_id, true).await;
    let token = login(&pool, &parent).await;

    let (status, _) = send(
        setup_test_app(pool),
        "POST",
        &format!("/api/client/nursery/{}/plans", nursery_id),
        Some(&token),
        Some(json!({ "name": "Pirate", "price": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
