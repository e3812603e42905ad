//! Presigned upload URL issuance.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use snapdex_core::object_name::generate_object_name;
use snapdex_core::types::DbId;
use snapdex_storage::PresignedUpload;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /presigned-url`.
#[derive(Debug, Deserialize, Validate)]
pub struct ImageUploadInput {
    /// Id of the entity the upload belongs to, used as the object-name
    /// prefix.
    pub id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub filename: String,
    #[validate(length(min = 1, max = 100))]
    pub content_type: String,
}

/// Response body: where to upload, and under which object name.
#[derive(Debug, Serialize)]
pub struct ImageUploadOutput {
    pub object_name: String,
    pub presigned_url: PresignedUpload,
}

/// POST /api/v1/presigned-url
///
/// Issue a presigned upload slot. Each call yields a fresh object name,
/// so two uploads of the same filename never collide.
pub async fn generate_upload_presigned_url(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<ImageUploadInput>,
) -> AppResult<Json<ImageUploadOutput>> {
    input.validate()?;

    let object_name = generate_object_name(&input.id.to_string(), &input.filename);
    let presigned_url = state
        .storage
        .presign_upload(&object_name, &input.content_type)
        .await?;

    tracing::debug!(%object_name, "Issued presigned upload URL");

    Ok(Json(ImageUploadOutput {
        object_name,
        presigned_url,
    }))
}
