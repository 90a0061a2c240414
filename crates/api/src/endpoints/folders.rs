//! Folder endpoints.

use axum::{extract::State, routing::post, Json, Router};
use jot_common::AppResult;
use jot_core::{CreateFolderInput, UpdateFolderInput};
use jot_db::entities::folder;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, SuccessResponse},
};

/// Folder response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<folder::Model> for FolderResponse {
    fn from(f: folder::Model) -> Self {
        Self {
            id: f.id,
            name: f.name,
            parent_id: f.parent_id,
            created_at: f.created_at.to_rfc3339(),
            updated_at: f.updated_at.to_rfc3339(),
        }
    }
}

/// Create a new folder.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateFolderInput>,
) -> AppResult<ApiResponse<FolderResponse>> {
    let folder = state.folder_service.create(&user.id, input).await?;
    Ok(ApiResponse::ok(folder.into()))
}

/// List folders request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFoldersRequest {
    #[serde(default = "default_limit")]
    pub limit: u64,

    /// Absent = all folders, `null` = roots only, value = children of it.
    #[serde(default, deserialize_with = "jot_core::patch::double_option")]
    pub parent_folder_id: Option<Option<String>>,
}

const fn default_limit() -> u64 {
    10
}

/// List the user's folders.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListFoldersRequest>,
) -> AppResult<ApiResponse<Vec<FolderResponse>>> {
    let limit = req.limit.min(100);
    let folders = state
        .folder_service
        .list(
            &user.id,
            req.parent_folder_id.as_ref().map(|p| p.as_deref()),
            limit,
        )
        .await?;
    Ok(ApiResponse::ok(
        folders.into_iter().map(Into::into).collect(),
    ))
}

/// Show folder request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowFolderRequest {
    pub folder_id: String,
}

/// Get folder details.
async fn show(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ShowFolderRequest>,
) -> AppResult<ApiResponse<FolderResponse>> {
    let folder = state.folder_service.show(&user.id, &req.folder_id).await?;
    Ok(ApiResponse::ok(folder.into()))
}

/// Update a folder's name and/or parent.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateFolderInput>,
) -> AppResult<ApiResponse<FolderResponse>> {
    let folder = state.folder_service.update(&user.id, input).await?;
    Ok(ApiResponse::ok(folder.into()))
}

/// Delete folder request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFolderRequest {
    pub folder_id: String,
}

/// Delete a folder, reparenting its contents.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<DeleteFolderRequest>,
) -> AppResult<ApiResponse<SuccessResponse>> {
    state
        .folder_service
        .delete(&user.id, &req.folder_id)
        .await?;
    Ok(ApiResponse::ok(SuccessResponse::ok()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(list))
        .route("/create", post(create))
        .route("/show", post(show))
        .route("/update", post(update))
        .route("/delete", post(delete))
}
