//! HTTP-level integration tests for the pagination/filtering envelope:
//! `count` always reflects the pre-slice cardinality, `limit`/`offset`
//! only slice, and `order_by` goes through the per-resource whitelist.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_collection, create_item, get, id_of, seed_user};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_limit_and_offset_slice_but_count_is_total(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = seed_user(&pool, "alice").await;

    let collection = create_collection(&app, &token, "c1").await;
    let collection_id = id_of(&collection);
    create_item(&app, &token, &collection_id, "i1").await;
    create_item(&app, &token, &collection_id, "i2").await;

    let base = format!("/api/v1/collections/{collection_id}/items");

    let first_page =
        body_json(get(&app, &format!("{base}?limit=1&offset=0"), &token).await).await;
    assert_eq!(first_page["count"], 2);
    assert_eq!(first_page["items"].as_array().unwrap().len(), 1);

    let second_page =
        body_json(get(&app, &format!("{base}?limit=1&offset=1"), &token).await).await;
    assert_eq!(second_page["count"], 2);
    assert_eq!(second_page["items"].as_array().unwrap().len(), 1);

    // The two pages are disjoint.
    assert_ne!(first_page["items"][0]["id"], second_page["items"][0]["id"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_offset_past_the_end_yields_empty_page_with_count(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = seed_user(&pool, "alice").await;

    create_collection(&app, &token, "c1").await;
    create_collection(&app, &token, "c2").await;

    let body = body_json(get(&app, "/api/v1/collections?limit=5&offset=10", &token).await).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_limit_zero_is_a_pure_count_request(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = seed_user(&pool, "alice").await;

    create_collection(&app, &token, "c1").await;

    let body = body_json(get(&app, "/api/v1/collections?limit=0", &token).await).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_order_by_ascending_and_descending(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = seed_user(&pool, "alice").await;

    create_collection(&app, &token, "bravo").await;
    create_collection(&app, &token, "alpha").await;
    create_collection(&app, &token, "charlie").await;

    let ascending = body_json(get(&app, "/api/v1/collections?order_by=name", &token).await).await;
    let names: Vec<&str> = ascending["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["alpha", "bravo", "charlie"]);

    let descending =
        body_json(get(&app, "/api/v1/collections?order_by=-name", &token).await).await;
    let names: Vec<&str> = descending["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["charlie", "bravo", "alpha"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_order_by_unknown_field_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = seed_user(&pool, "alice").await;

    let response = get(&app, "/api/v1/collections?order_by=password_hash", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Cannot order by field"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_name_filter_narrows_the_count(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = seed_user(&pool, "alice").await;

    create_collection(&app, &token, "birds of prey").await;
    create_collection(&app, &token, "songbirds").await;
    create_collection(&app, &token, "mushrooms").await;

    let body = body_json(get(&app, "/api/v1/collections?name=bird", &token).await).await;
    assert_eq!(body["count"], 2);

    // Unset filter fields do not filter.
    let all = body_json(get(&app, "/api/v1/collections", &token).await).await;
    assert_eq!(all["count"], 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_oversized_limit_is_clamped_not_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = seed_user(&pool, "alice").await;

    create_collection(&app, &token, "c1").await;

    let response = get(&app, "/api/v1/collections?limit=99999999", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], 1);
}
