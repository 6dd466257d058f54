mod common;

use axum::http::StatusCode;
use common::{create_test_account, create_test_nursery, login, send, send_file, setup_test_app};
use creche::creche_models::UserType;
use serde_json::json;
use sqlx::PgPool;

fn nursery_body(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "address": "8 avenue Jean Jaurès, Lyon",
        "contact_number": "0478000000",
        "information": "Jardin et cantine bio",
        "max_age": 3,
        "max_children_per_class": 12
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn test_manager_creates_one_nursery(pool: PgPool) {
    let manager = create_test_account(&pool, UserType::NurseryManager).await;
    let token = login(&pool, &manager).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/client/nursery",
        Some(&token),
        Some(nursery_body("Les Petits Pas")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Les Petits Pas");
    assert_eq!(body["verified"], false);
    assert_eq!(body["manager"]["id"], manager.profile_id.to_string());

    let (status, _) = send(
        setup_test_app(pool),
        "POST",
        "/api/client/nursery",
        Some(&token),
        Some(nursery_body("Deuxième crèche")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_parent_cannot_create_nursery(pool: PgPool) {
    let parent = create_test_account(&pool, UserType::Parent).await;
    let token = login(&pool, &parent).await;

    let (status, _) = send(
        setup_test_app(pool),
        "POST",
        "/api/client/nursery",
        Some(&token),
        Some(nursery_body("Interdite")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_foreign_nursery_is_hidden(pool: PgPool) {
    let owner = create_test_account(&pool, UserType::NurseryManager).await;
    let other = create_test_account(&pool, UserType::NurseryManager).await;
    let nursery_id = create_test_nursery(&pool, owner.profile_id, false).await;
    let token = login(&pool, &other).await;

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "GET",
        &format!("/api/client/nursery/{}", nursery_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        setup_test_app(pool),
        "GET",
        &format!("/api/client/nursery/{}/classrooms", nursery_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_verification_publishes_to_directory(pool: PgPool) {
    let manager = create_test_account(&pool, UserType::NurseryManager).await;
    let admin = create_test_account(&pool, UserType::Admin).await;
    let parent = create_test_account(&pool, UserType::Parent).await;
    let nursery_id = create_test_nursery(&pool, manager.profile_id, false).await;

    let parent_token = login(&pool, &parent).await;
    let (status, _) = send(
        setup_test_app(pool.clone()),
        "GET",
        &format!("/api/client/mynursery/{}", nursery_id),
        Some(&parent_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Managers cannot verify their own nursery
    let manager_token = login(&pool, &manager).await;
    let (status, _) = send(
        setup_test_app(pool.clone()),
        "PATCH",
        &format!("/api/client/nursery/{}/verify", nursery_id),
        Some(&manager_token),
        Some(json!({ "verified": true })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin_token = login(&pool, &admin).await;
    let (status, body) = send(
        setup_test_app(pool.clone()),
        "PATCH",
        &format!("/api/client/nursery/{}/verify", nursery_id),
        Some(&admin_token),
        Some(json!({ "verified": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verified"], true);

    let (status, body) = send(
        setup_test_app(pool),
        "GET",
        &format!("/api/client/mynursery/{}", nursery_id),
        Some(&parent_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], nursery_id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_replace_opening_hours(pool: PgPool) {
    let manager = create_test_account(&pool, UserType::NurseryManager).await;
    let nursery_id = create_test_nursery(&pool, manager.profile_id, true).await;
    let token = login(&pool, &manager).await;
    let uri = format!("/api/client/nursery/{}/opening-hours", nursery_id);

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "PUT",
        &uri,
        Some(&token),
        Some(json!([
            { "day": 0, "open_time": "07:30:00", "close_time": "18:30:00" },
            { "day": 6, "is_closed": true }
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(setup_test_app(pool.clone()), "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let hours = body.as_array().unwrap();
    assert_eq!(hours.len(), 2);
    assert_eq!(hours[0]["day"], 0);

    let (status, _) = send(
        setup_test_app(pool),
        "PUT",
        &uri,
        Some(&token),
        Some(json!([{ "day": 1, "open_time": "18:00:00", "close_time": "08:00:00" }])),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upload_photo_larger_than_default_body_limit(pool: PgPool) {
    let manager = create_test_account(&pool, UserType::NurseryManager).await;
    let nursery_id = create_test_nursery(&pool, manager.profile_id, true).await;
    let token = login(&pool, &manager).await;

    // 3 MiB, above axum's 2 MiB default and below the 10 MiB storage cap
    let photo = vec![0u8; 3 * 1024 * 1024];
    let (status, body) = send_file(
        setup_test_app(pool.clone()),
        &format!("/api/client/nursery/{}/documents/photo_exterior", nursery_id),
        &token,
        "facade.png",
        "image/png",
        &photo,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "upload failed: {}", body);
    assert!(body["photo_exterior"].as_str().unwrap().ends_with(".png"));

    let (status, _) = send_file(
        setup_test_app(pool),
        &format!("/api/client/nursery/{}/documents/photo_interior", nursery_id),
        &token,
        "salle.pdf",
        "application/pdf",
        b"%PDF-1.4",
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
