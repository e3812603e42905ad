//! HTTP-level integration tests for the pending-item moderation flow:
//! propose, visibility, edit/withdraw, and the exactly-once accept/refuse
//! state machine.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_collection, create_item, create_pending_item, delete, get, id_of, put,
    put_json, seed_user,
};
use serde_json::json;
use sqlx::PgPool;

use snapdex_core::moderation::ALREADY_DECIDED;

// ---------------------------------------------------------------------------
// Propose
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_any_user_may_propose_and_status_defaults_to_pending(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, owner) = seed_user(&pool, "owner").await;
    let (proposer, proposer_token) = seed_user(&pool, "proposer").await;

    let collection = create_collection(&app, &owner, "c1").await;
    let pending = create_pending_item(&app, &proposer_token, &id_of(&collection), "i1").await;

    // The proposer never sends a status; the model default applies.
    assert_eq!(pending["status"], "pending");
    assert_eq!(pending["creator"]["id"], proposer.id.to_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_listing_visibility_owner_sees_all_others_see_own(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, owner) = seed_user(&pool, "owner").await;
    let (_, alice) = seed_user(&pool, "alice").await;
    let (_, bob) = seed_user(&pool, "bob").await;

    let collection = create_collection(&app, &owner, "c1").await;
    let collection_id = id_of(&collection);

    create_pending_item(&app, &alice, &collection_id, "from-alice").await;
    create_pending_item(&app, &bob, &collection_id, "from-bob").await;

    let path = format!("/api/v1/collections/{collection_id}/pending-items");

    let owner_view = body_json(get(&app, &path, &owner).await).await;
    assert_eq!(owner_view["count"], 2);

    let alice_view = body_json(get(&app, &path, &alice).await).await;
    assert_eq!(alice_view["count"], 1);
    assert_eq!(alice_view["items"][0]["name"], "from-alice");
}

// ---------------------------------------------------------------------------
// Accept / refuse
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_accept_flow_exactly_once(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, owner) = seed_user(&pool, "owner").await;
    let (_, proposer) = seed_user(&pool, "proposer").await;

    let collection = create_collection(&app, &owner, "c1").await;
    let pending = create_pending_item(&app, &proposer, &id_of(&collection), "i1").await;
    let pending_id = id_of(&pending);
    let accept_path = format!("/api/v1/pending-items/{pending_id}/accept");

    // The proposer may not decide.
    let forbidden = put(&app, &accept_path, &proposer).await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    // The owner accepts: a real item materializes with the copied fields.
    let accepted = put(&app, &accept_path, &owner).await;
    assert_eq!(accepted.status(), StatusCode::CREATED);
    let item = body_json(accepted).await;
    assert_eq!(item["name"], "i1");
    assert_eq!(item["description"], "a proposed item");
    assert_eq!(item["collection_id"], id_of(&collection));

    // The decision is terminal.
    let again = put(&app, &accept_path, &owner).await;
    assert_eq!(again.status(), StatusCode::BAD_REQUEST);
    let body = body_json(again).await;
    assert_eq!(body["message"], ALREADY_DECIDED);

    // Refusing after accepting fails the same way.
    let refuse = put(&app, &format!("/api/v1/pending-items/{pending_id}/refuse"), &owner).await;
    assert_eq!(refuse.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_refuse_creates_nothing(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, owner) = seed_user(&pool, "owner").await;
    let (_, proposer) = seed_user(&pool, "proposer").await;

    let collection = create_collection(&app, &owner, "c1").await;
    let collection_id = id_of(&collection);
    let pending = create_pending_item(&app, &proposer, &collection_id, "i1").await;

    let refused = put(
        &app,
        &format!("/api/v1/pending-items/{}/refuse", id_of(&pending)),
        &owner,
    )
    .await;
    assert_eq!(refused.status(), StatusCode::NO_CONTENT);

    let items = body_json(
        get(&app, &format!("/api/v1/collections/{collection_id}/items"), &owner).await,
    )
    .await;
    assert_eq!(items["count"], 0);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pending_items WHERE status = 'refused'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_accept_with_name_collision_rolls_back_the_status(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, owner) = seed_user(&pool, "owner").await;
    let (_, proposer) = seed_user(&pool, "proposer").await;

    let collection = create_collection(&app, &owner, "c1").await;
    let collection_id = id_of(&collection);

    // An item with the proposed name already exists.
    create_item(&app, &owner, &collection_id, "i1").await;
    let pending = create_pending_item(&app, &proposer, &collection_id, "i1").await;
    let pending_id = id_of(&pending);

    let response = put(&app, &format!("/api/v1/pending-items/{pending_id}/accept"), &owner).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // All-or-nothing: the status must not have advanced, so a retry after
    // renaming is still possible.
    let status: String = sqlx::query_scalar("SELECT status FROM pending_items WHERE id = $1::uuid")
        .bind(&pending_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "pending");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_concurrent_decisions_exactly_one_wins(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, owner) = seed_user(&pool, "owner").await;
    let (_, proposer) = seed_user(&pool, "proposer").await;

    let collection = create_collection(&app, &owner, "c1").await;
    let pending = create_pending_item(&app, &proposer, &id_of(&collection), "i1").await;
    let pending_id = id_of(&pending);

    let accept_path = format!("/api/v1/pending-items/{pending_id}/accept");
    let refuse_path = format!("/api/v1/pending-items/{pending_id}/refuse");
    let accept = put(&app, &accept_path, &owner);
    let refuse = put(&app, &refuse_path, &owner);
    let (accept_response, refuse_response) = tokio::join!(accept, refuse);

    let statuses = [accept_response.status(), refuse_response.status()];
    let successes = statuses.iter().filter(|s| s.is_success()).count();
    assert_eq!(successes, 1, "exactly one decision must win, got {statuses:?}");
    assert!(
        statuses.contains(&StatusCode::BAD_REQUEST),
        "the loser must observe the decided state, got {statuses:?}"
    );

    // At most one item exists, and only if the accept won.
    let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
        .fetch_one(&pool)
        .await
        .unwrap();
    let accept_won = accept_response.status() == StatusCode::CREATED;
    assert_eq!(items, if accept_won { 1 } else { 0 });
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_decide_missing_pending_item_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = seed_user(&pool, "owner").await;

    let response = put(
        &app,
        "/api/v1/pending-items/00000000-0000-0000-0000-000000000000/accept",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Edit / withdraw
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_proposer_and_owner_may_edit_others_may_not(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, owner) = seed_user(&pool, "owner").await;
    let (_, proposer) = seed_user(&pool, "proposer").await;
    let (_, stranger) = seed_user(&pool, "stranger").await;

    let collection = create_collection(&app, &owner, "c1").await;
    let pending = create_pending_item(&app, &proposer, &id_of(&collection), "i1").await;
    let path = format!("/api/v1/pending-items/{}", id_of(&pending));
    let payload = json!({ "name": "i1-fixed", "description": "d", "object_name": "pending/i1.png" });

    let denied = put_json(&app, &path, &stranger, payload.clone()).await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let by_proposer = put_json(&app, &path, &proposer, payload.clone()).await;
    assert_eq!(by_proposer.status(), StatusCode::OK);

    let by_owner = put_json(
        &app,
        &path,
        &owner,
        json!({ "name": "i1-final", "description": "d", "object_name": "pending/i1.png" }),
    )
    .await;
    assert_eq!(by_owner.status(), StatusCode::OK);
    assert_eq!(body_json(by_owner).await["name"], "i1-final");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_editing_stays_possible_after_a_decision(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, owner) = seed_user(&pool, "owner").await;
    let (_, proposer) = seed_user(&pool, "proposer").await;

    let collection = create_collection(&app, &owner, "c1").await;
    let pending = create_pending_item(&app, &proposer, &id_of(&collection), "i1").await;
    let pending_id = id_of(&pending);

    let refused = put(&app, &format!("/api/v1/pending-items/{pending_id}/refuse"), &owner).await;
    assert_eq!(refused.status(), StatusCode::NO_CONTENT);

    // Terminal states only forbid decisions, not bookkeeping on the row.
    let edited = put_json(
        &app,
        &format!("/api/v1/pending-items/{pending_id}"),
        &proposer,
        json!({ "name": "i1-tweaked", "description": "d", "object_name": "pending/i1.png" }),
    )
    .await;
    assert_eq!(edited.status(), StatusCode::OK);
    assert_eq!(body_json(edited).await["status"], "refused");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_proposer_may_withdraw(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, owner) = seed_user(&pool, "owner").await;
    let (_, proposer) = seed_user(&pool, "proposer").await;

    let collection = create_collection(&app, &owner, "c1").await;
    let pending = create_pending_item(&app, &proposer, &id_of(&collection), "i1").await;
    let path = format!("/api/v1/pending-items/{}", id_of(&pending));

    let response = delete(&app, &path, &proposer).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let again = delete(&app, &path, &proposer).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}
