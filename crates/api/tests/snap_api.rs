//! HTTP-level integration tests for snaps and reactions.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_collection, create_item, create_snap, delete, get, id_of, post_json,
    put_json, seed_user,
};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Snaps
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_one_snap_per_user_per_item(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, owner) = seed_user(&pool, "owner").await;
    let (_, alice) = seed_user(&pool, "alice").await;

    let collection = create_collection(&app, &owner, "c1").await;
    let item = create_item(&app, &owner, &id_of(&collection), "i1").await;
    let item_id = id_of(&item);

    create_snap(&app, &alice, &item_id).await;

    let second = post_json(
        &app,
        &format!("/api/v1/items/{item_id}/snaps"),
        &alice,
        json!({ "comment": "again", "object_name": "snaps/again.png" }),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let body = body_json(second).await;
    assert_eq!(body["detail"]["constraint"], "uq_snaps_item_user");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_snap_under_missing_item_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = seed_user(&pool, "alice").await;

    let response = post_json(
        &app,
        "/api/v1/items/00000000-0000-0000-0000-000000000000/snaps",
        &token,
        json!({ "comment": "lost", "object_name": "snaps/lost.png" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_retrieve_my_snap(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, owner) = seed_user(&pool, "owner").await;
    let (alice_user, alice) = seed_user(&pool, "alice").await;
    let (_, bob) = seed_user(&pool, "bob").await;

    let collection = create_collection(&app, &owner, "c1").await;
    let item = create_item(&app, &owner, &id_of(&collection), "i1").await;
    let item_id = id_of(&item);

    create_snap(&app, &alice, &item_id).await;

    let mine = get(&app, &format!("/api/v1/items/{item_id}/snap"), &alice).await;
    assert_eq!(mine.status(), StatusCode::OK);
    let body = body_json(mine).await;
    assert_eq!(body["user"]["id"], alice_user.id.to_string());

    // Bob has no snap on this item.
    let none = get(&app, &format!("/api/v1/items/{item_id}/snap"), &bob).await;
    assert_eq!(none.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_snap_mutation_allowed_to_owner_and_collection_creator(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, owner) = seed_user(&pool, "owner").await;
    let (_, alice) = seed_user(&pool, "alice").await;
    let (_, bob) = seed_user(&pool, "bob").await;

    let collection = create_collection(&app, &owner, "c1").await;
    let item = create_item(&app, &owner, &id_of(&collection), "i1").await;
    let snap = create_snap(&app, &alice, &id_of(&item)).await;
    let path = format!("/api/v1/snaps/{}", id_of(&snap));
    let payload = json!({ "comment": "edited", "object_name": "snaps/edited.png" });

    // A bystander may not touch it.
    let denied = put_json(&app, &path, &bob, payload.clone()).await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    // The author may.
    let by_author = put_json(&app, &path, &alice, payload.clone()).await;
    assert_eq!(by_author.status(), StatusCode::OK);
    assert_eq!(body_json(by_author).await["comment"], "edited");

    // The collection creator moderates: delete works.
    let removed = delete(&app, &path, &owner).await;
    assert_eq!(removed.status(), StatusCode::NO_CONTENT);
}

// ---------------------------------------------------------------------------
// Reactions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_like_upsert_flips_the_same_row(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, owner) = seed_user(&pool, "owner").await;
    let (_, alice) = seed_user(&pool, "alice").await;

    let collection = create_collection(&app, &owner, "c1").await;
    let item = create_item(&app, &owner, &id_of(&collection), "i1").await;
    let snap = create_snap(&app, &owner, &id_of(&item)).await;
    let snap_id = id_of(&snap);
    let likes_path = format!("/api/v1/snaps/{snap_id}/likes");

    let first = post_json(&app, &likes_path, &alice, json!({ "liked": true })).await;
    assert_eq!(first.status(), StatusCode::OK);
    let first_body = body_json(first).await;
    assert_eq!(first_body["liked"], true);

    let second = post_json(&app, &likes_path, &alice, json!({ "liked": false })).await;
    assert_eq!(second.status(), StatusCode::OK);
    let second_body = body_json(second).await;
    assert_eq!(second_body["liked"], false);
    // Same row, not a second one.
    assert_eq!(second_body["id"], first_body["id"]);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_snap_aggregates_count_likes_and_dislikes(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, owner) = seed_user(&pool, "owner").await;
    let (_, alice) = seed_user(&pool, "alice").await;
    let (_, bob) = seed_user(&pool, "bob").await;

    let collection = create_collection(&app, &owner, "c1").await;
    let item = create_item(&app, &owner, &id_of(&collection), "i1").await;
    let snap = create_snap(&app, &owner, &id_of(&item)).await;
    let snap_id = id_of(&snap);
    let likes_path = format!("/api/v1/snaps/{snap_id}/likes");

    post_json(&app, &likes_path, &alice, json!({ "liked": true })).await;
    post_json(&app, &likes_path, &bob, json!({ "liked": false })).await;

    let response = get(&app, &format!("/api/v1/snaps/{snap_id}"), &owner).await;
    let body = body_json(response).await;
    assert_eq!(body["nb_likes"], 1);
    assert_eq!(body["nb_dislikes"], 1);

    // The nested listing filters on the flag.
    let dislikes = body_json(
        get(&app, &format!("/api/v1/snaps/{snap_id}/likes?liked=false"), &owner).await,
    )
    .await;
    assert_eq!(dislikes["count"], 1);
    assert_eq!(dislikes["items"][0]["user"]["username"], "bob");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_my_like_get_and_delete(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, owner) = seed_user(&pool, "owner").await;
    let (_, alice) = seed_user(&pool, "alice").await;

    let collection = create_collection(&app, &owner, "c1").await;
    let item = create_item(&app, &owner, &id_of(&collection), "i1").await;
    let snap = create_snap(&app, &owner, &id_of(&item)).await;
    let snap_id = id_of(&snap);
    let like_path = format!("/api/v1/snaps/{snap_id}/like");

    // Nothing yet.
    let missing = get(&app, &like_path, &alice).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    post_json(
        &app,
        &format!("/api/v1/snaps/{snap_id}/likes"),
        &alice,
        json!({ "liked": true }),
    )
    .await;

    let mine = get(&app, &like_path, &alice).await;
    assert_eq!(mine.status(), StatusCode::OK);
    assert_eq!(body_json(mine).await["liked"], true);

    let removed = delete(&app, &like_path, &alice).await;
    assert_eq!(removed.status(), StatusCode::NO_CONTENT);

    let gone = delete(&app, &like_path, &alice).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}
