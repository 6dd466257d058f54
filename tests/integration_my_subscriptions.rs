mod common;

use axum::http::StatusCode;
use common::{create_test_account, create_test_nursery, login, send, setup_test_app};
use creche::creche_models::UserType;
use serde_json::{Value, json};
use sqlx::PgPool;

struct Family {
    parent_token: String,
    children: Vec<String>,
    plan_uri: String,
    manager_token: String,
    subscription_id: String,
}

/// A parent with two children sharing one subscription.
async fn subscribe_siblings(pool: &PgPool) -> Family {
    let manager = create_test_account(pool, UserType::NurseryManager).await;
    let parent = create_test_account(pool, UserType::Parent).await;
    let nursery_id = create_test_nursery(pool, manager.profile_id, true).await;
    let manager_token = login(pool, &manager).await;
    let parent_token = login(pool, &parent).await;

    let (status, plan) = send(
        setup_test_app(pool.clone()),
        "POST",
        &format!("/api/client/nursery/{}/plans", nursery_id),
        Some(&manager_token),
        Some(json!({ "name": "Semaine", "price": 12000, "duration": "week" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let plan_uri = format!(
        "/api/client/nursery/{}/plans/{}",
        nursery_id,
        id_of(&plan)
    );

    let mut children = Vec::new();
    for (first_name, birthday) in [("Jade", "2022-05-14"), ("Hugo", "2023-11-03")] {
        let (status, child) = send(
            setup_test_app(pool.clone()),
            "POST",
            "/api/client/child",
            Some(&parent_token),
            Some(json!({ "first_name": first_name, "last_name": "Garnier", "birthday": birthday })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        children.push(id_of(&child));
    }

    let (status, subscription) = send(
        setup_test_app(pool.clone()),
        "POST",
        &format!("{}/subscriptions", plan_uri),
        Some(&parent_token),
        Some(json!({
            "start_date": "2025-02-03",
            "details": [{ "child_id": children[0] }, { "child_id": children[1] }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", subscription);

    Family {
        parent_token,
        children,
        plan_uri,
        manager_token,
        subscription_id: id_of(&subscription),
    }
}

fn id_of(body: &Value) -> String {
    body["id"].as_str().unwrap().to_string()
}

async fn my_subscriptions(pool: &PgPool, token: &str) -> Value {
    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/client/mysubscriptions",
        Some(token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[sqlx::test(migrations = "./migrations")]
async fn test_siblings_share_one_listing(pool: PgPool) {
    let family = subscribe_siblings(&pool).await;

    let mine = my_subscriptions(&pool, &family.parent_token).await;
    assert_eq!(mine["meta"]["total"], 1);
    assert_eq!(mine["data"].as_array().unwrap().len(), 1);
    assert_eq!(mine["data"][0]["id"], family.subscription_id.as_str());
    assert_eq!(mine["data"][0]["detail_objects"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_listing_follows_live_children(pool: PgPool) {
    let family = subscribe_siblings(&pool).await;
    let detail_uri = format!("/api/client/mysubscriptions/{}", family.subscription_id);

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "DELETE",
        &format!("/api/client/child/{}", family.children[0]),
        Some(&family.parent_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(my_subscriptions(&pool, &family.parent_token).await["meta"]["total"], 1);

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "DELETE",
        &format!("/api/client/child/{}", family.children[1]),
        Some(&family.parent_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let mine = my_subscriptions(&pool, &family.parent_token).await;
    assert_eq!(mine["meta"]["total"], 0);
    assert!(mine["data"].as_array().unwrap().is_empty());

    let (status, _) = send(
        setup_test_app(pool),
        "GET",
        &detail_uri,
        Some(&family.parent_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deactivated_plan_hides_subscription(pool: PgPool) {
    let family = subscribe_siblings(&pool).await;

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "PATCH",
        &family.plan_uri,
        Some(&family.manager_token),
        Some(json!({ "is_active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let mine = my_subscriptions(&pool, &family.parent_token).await;
    assert_eq!(mine["meta"]["total"], 0);
}
