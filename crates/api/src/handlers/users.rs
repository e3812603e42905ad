//! Handlers for the `/users` resource (registration and profiles).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use snapdex_core::error::CoreError;
use snapdex_core::types::{DbId, Timestamp};
use snapdex_db::models::user::{CreateUser, UpdateUserProfile, User};
use snapdex_db::repositories::UserRepo;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Slim user reference embedded in other resources' outputs.
#[derive(Debug, Clone, Serialize)]
pub struct UserSlim {
    pub id: DbId,
    pub username: String,
}

impl UserSlim {
    /// Build from a nullable (id, username) join pair. Both sides absent
    /// means the account was deleted (`ON DELETE SET NULL`).
    pub fn from_parts(id: Option<DbId>, username: Option<String>) -> Option<Self> {
        match (id, username) {
            (Some(id), Some(username)) => Some(Self { id, username }),
            _ => None,
        }
    }
}

/// Public wire representation of a user.
#[derive(Debug, Serialize)]
pub struct UserOutput {
    pub id: DbId,
    pub username: String,
    pub picture_object_name: Option<String>,
    pub presigned_url: Option<String>,
    pub created_at: Timestamp,
}

/// Wire representation of the caller's own profile.
#[derive(Debug, Serialize)]
pub struct MeOutput {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub picture_object_name: Option<String>,
    pub presigned_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /users` (public registration).
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 3, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/users
///
/// Public registration. The password is hashed before anything is stored;
/// username and email uniqueness surface as 409.
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterInput>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::Internal(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        username: input.username,
        email: input.email,
        password_hash,
    };
    let user = UserRepo::create(&state.pool, &create).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    let output = encode_me(&state, user).await?;
    Ok((StatusCode::CREATED, Json(output)))
}

/// GET /api/v1/users/me
pub async fn me(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<MeOutput>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })?;
    Ok(Json(encode_me(&state, user).await?))
}

/// PUT /api/v1/users/me
///
/// Full replacement of the profile fields, including the optional picture
/// object name obtained via `/presigned-url`.
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<UpdateUserProfile>,
) -> AppResult<Json<MeOutput>> {
    input.validate()?;

    let user = UserRepo::update_profile(&state.pool, auth.user_id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })?;
    Ok(Json(encode_me(&state, user).await?))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserOutput>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id })?;
    Ok(Json(encode_user(&state, user).await?))
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

async fn presign_picture(state: &AppState, user: &User) -> AppResult<Option<String>> {
    match &user.picture_object_name {
        Some(object_name) => Ok(Some(state.storage.presign_get(object_name).await?)),
        None => Ok(None),
    }
}

async fn encode_user(state: &AppState, user: User) -> AppResult<UserOutput> {
    let presigned_url = presign_picture(state, &user).await?;
    Ok(UserOutput {
        id: user.id,
        username: user.username,
        picture_object_name: user.picture_object_name,
        presigned_url,
        created_at: user.created_at,
    })
}

async fn encode_me(state: &AppState, user: User) -> AppResult<MeOutput> {
    let presigned_url = presign_picture(state, &user).await?;
    Ok(MeOutput {
        id: user.id,
        username: user.username,
        email: user.email,
        picture_object_name: user.picture_object_name,
        presigned_url,
        created_at: user.created_at,
        updated_at: user.updated_at,
    })
}
