//! HTTP-level integration tests for the `/collections` CRUD surface.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_collection, create_item, delete, get, get_public, id_of, post_json,
    put_json, seed_user,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_collection_sets_creator_and_counts(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (user, token) = seed_user(&pool, "alice").await;

    let response = post_json(
        &app,
        "/api/v1/collections",
        &token,
        json!({ "name": "c1", "description": "d" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["name"], "c1");
    assert_eq!(body["creator"]["id"], user.id.to_string());
    assert_eq!(body["creator"]["username"], "alice");
    assert_eq!(body["nb_items"], 0);
    // No storable attached yet.
    assert!(body["object_name"].is_null());
    assert!(body["presigned_url"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_retrieve_recomputes_item_count_live(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = seed_user(&pool, "alice").await;

    let collection = create_collection(&app, &token, "c1").await;
    let collection_id = id_of(&collection);
    assert_eq!(collection["nb_items"], 0);

    create_item(&app, &token, &collection_id, "i1").await;

    let response = get(&app, &format!("/api/v1/collections/{collection_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["nb_items"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_collection_name_is_globally_unique(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, alice) = seed_user(&pool, "alice").await;
    let (_, bob) = seed_user(&pool, "bob").await;

    create_collection(&app, &alice, "c1").await;

    // Even a different user cannot reuse the name.
    let response = post_json(
        &app,
        "/api/v1/collections",
        &bob,
        json!({ "name": "c1", "description": "d" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(response).await;
    assert_eq!(body["detail"]["constraint"], "uq_collections_name");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_collection_requires_authentication(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::post_json_public(
        &app,
        "/api/v1/collections",
        json!({ "name": "c1", "description": "d" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_collection_empty_name_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = seed_user(&pool, "alice").await;

    let response = post_json(
        &app,
        "/api/v1/collections",
        &token,
        json!({ "name": "", "description": "d" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Validation failed");
    assert!(body["detail"]["name"].is_array());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_is_a_full_replacement(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = seed_user(&pool, "alice").await;

    let collection = create_collection(&app, &token, "c1").await;
    let collection_id = id_of(&collection);

    let response = put_json(
        &app,
        &format!("/api/v1/collections/{collection_id}"),
        &token,
        json!({ "name": "c1-renamed", "description": "new", "object_name": "collections/c1.png" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["name"], "c1-renamed");
    assert_eq!(body["description"], "new");
    assert!(body["presigned_url"]
        .as_str()
        .unwrap()
        .contains("collections/c1.png"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_by_non_creator_returns_403_and_leaves_row_unchanged(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, alice) = seed_user(&pool, "alice").await;
    let (_, bob) = seed_user(&pool, "bob").await;

    let collection = create_collection(&app, &alice, "c1").await;
    let collection_id = id_of(&collection);

    let response = put_json(
        &app,
        &format!("/api/v1/collections/{collection_id}"),
        &bob,
        json!({ "name": "stolen", "description": "d" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let after = body_json(
        get(&app, &format!("/api/v1/collections/{collection_id}"), &bob).await,
    )
    .await;
    assert_eq!(after["name"], "c1");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_by_non_creator_returns_403(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, alice) = seed_user(&pool, "alice").await;
    let (_, bob) = seed_user(&pool, "bob").await;

    let collection = create_collection(&app, &alice, "c1").await;
    let collection_id = id_of(&collection);

    let response = delete(&app, &format!("/api/v1/collections/{collection_id}"), &bob).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_cascades_to_items(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = seed_user(&pool, "alice").await;

    let collection = create_collection(&app, &token, "c1").await;
    let collection_id = id_of(&collection);
    let item = create_item(&app, &token, &collection_id, "i1").await;
    let item_id = id_of(&item);

    let response = delete(&app, &format!("/api/v1/collections/{collection_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let gone = get(&app, &format!("/api/v1/items/{item_id}"), &token).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_nonexistent_collection_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = seed_user(&pool, "alice").await;

    let response = get(
        &app,
        "/api/v1/collections/00000000-0000-0000-0000-000000000000",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("not found"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unauthenticated_error_uses_the_envelope(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_public(&app, "/api/v1/collections").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert!(body["message"].is_string());
    assert!(body["detail"].is_null());
}
