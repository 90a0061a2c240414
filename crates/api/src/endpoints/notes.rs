//! Note endpoints.

use axum::{extract::State, routing::post, Json, Router};
use jot_common::AppResult;
use jot_core::{CreateNoteInput, NoteWithTags, UpdateNoteInput};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, SuccessResponse},
};

/// Note response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    pub tag_ids: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<NoteWithTags> for NoteResponse {
    fn from(n: NoteWithTags) -> Self {
        Self {
            id: n.note.id,
            title: n.note.title,
            content: n.note.content,
            folder_id: n.note.folder_id,
            tag_ids: n.tag_ids,
            created_at: n.note.created_at.to_rfc3339(),
            updated_at: n.note.updated_at.to_rfc3339(),
        }
    }
}

/// Create a new note.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateNoteInput>,
) -> AppResult<ApiResponse<NoteResponse>> {
    let note = state.note_service.create(&user.id, input).await?;
    Ok(ApiResponse::ok(note.into()))
}

/// List notes request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotesRequest {
    #[serde(default = "default_limit")]
    pub limit: u64,

    #[serde(default)]
    pub offset: u64,

    /// Absent = all notes, `null` = unfiled only, value = that folder.
    #[serde(default, deserialize_with = "jot_core::patch::double_option")]
    pub folder_id: Option<Option<String>>,

    pub tag_id: Option<String>,

    pub query: Option<String>,
}

const fn default_limit() -> u64 {
    10
}

/// List the user's notes, newest first.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListNotesRequest>,
) -> AppResult<ApiResponse<Vec<NoteResponse>>> {
    let limit = req.limit.min(100);
    let notes = state
        .note_service
        .list(
            &user.id,
            req.folder_id.as_ref().map(|f| f.as_deref()),
            req.tag_id.as_deref(),
            req.query.as_deref(),
            limit,
            req.offset,
        )
        .await?;
    Ok(ApiResponse::ok(notes.into_iter().map(Into::into).collect()))
}

/// Show note request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowNoteRequest {
    pub note_id: String,
}

/// Get note details.
async fn show(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ShowNoteRequest>,
) -> AppResult<ApiResponse<NoteResponse>> {
    let note = state.note_service.show(&user.id, &req.note_id).await?;
    Ok(ApiResponse::ok(note.into()))
}

/// Update a note.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateNoteInput>,
) -> AppResult<ApiResponse<NoteResponse>> {
    let note = state.note_service.update(&user.id, input).await?;
    Ok(ApiResponse::ok(note.into()))
}

/// Delete note request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteNoteRequest {
    pub note_id: String,
}

/// Delete a note.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<DeleteNoteRequest>,
) -> AppResult<ApiResponse<SuccessResponse>> {
    state.note_service.delete(&user.id, &req.note_id).await?;
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
