//! Tag endpoints.

use axum::{extract::State, routing::post, Json, Router};
use jot_common::AppResult;
use jot_core::{CreateTagInput, UpdateTagInput};
use jot_db::entities::tag;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, SuccessResponse},
};

/// Tag response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<tag::Model> for TagResponse {
    fn from(t: tag::Model) -> Self {
        Self {
            id: t.id,
            name: t.name,
            created_at: t.created_at.to_rfc3339(),
            updated_at: t.updated_at.to_rfc3339(),
        }
    }
}

/// Create a new tag.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTagInput>,
) -> AppResult<ApiResponse<TagResponse>> {
    let tag = state.tag_service.create(&user.id, input).await?;
    Ok(ApiResponse::ok(tag.into()))
}

/// List the user's tags, name-ascending.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<TagResponse>>> {
    let tags = state.tag_service.list(&user.id).await?;
    Ok(ApiResponse::ok(tags.into_iter().map(Into::into).collect()))
}

/// Rename a tag.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateTagInput>,
) -> AppResult<ApiResponse<TagResponse>> {
    let tag = state.tag_service.update(&user.id, input).await?;
    Ok(ApiResponse::ok(tag.into()))
}

/// Delete tag request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTagRequest {
    pub tag_id: String,
}

/// Delete a tag.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<DeleteTagRequest>,
) -> AppResult<ApiResponse<SuccessResponse>> {
    state.tag_service.delete(&user.id, &req.tag_id).await?;
    Ok(ApiResponse::ok(SuccessResponse::ok()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(list))
        .route("/create", post(create))
        .route("/update", post(update))
        .route("/delete", post(delete))
}
