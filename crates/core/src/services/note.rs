//! Note service.

use jot_common::{AppError, AppResult, IdGenerator};
use jot_db::{
    entities::note,
    repositories::{FolderRepository, NoteRepository, TagRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Note service for business logic.
#[derive(Clone)]
pub struct NoteService {
    note_repo: NoteRepository,
    folder_repo: FolderRepository,
    tag_repo: TagRepository,
    id_gen: IdGenerator,
}

/// Input for creating a new note.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 100_000))]
    #[serde(default)]
    pub content: String,

    pub folder_id: Option<String>,

    #[serde(default)]
    pub tag_ids: Vec<String>,
}

/// Input for updating a note.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteInput {
    /// The note ID to update.
    pub note_id: String,

    /// New title (absent = no change).
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    /// New content (absent = no change).
    #[validate(length(max = 100_000))]
    pub content: Option<String>,

    /// New folder (absent = no change, `null` = unfile).
    #[serde(default, deserialize_with = "crate::patch::double_option")]
    pub folder_id: Option<Option<String>>,

    /// Replacement tag set (absent = no change).
    pub tag_ids: Option<Vec<String>>,
}

/// A note together with the ids of its applied tags.
pub struct NoteWithTags {
    pub note: note::Model,
    pub tag_ids: Vec<String>,
}

impl NoteService {
    /// Create a new note service.
    #[must_use]
    pub fn new(
        note_repo: NoteRepository,
        folder_repo: FolderRepository,
        tag_repo: TagRepository,
    ) -> Self {
        Self {
            note_repo,
            folder_repo,
            tag_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new note.
    pub async fn create(&self, user_id: &str, input: CreateNoteInput) -> AppResult<NoteWithTags> {
        input.validate()?;

        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::BadRequest("Note title is required".to_string()));
        }

        if let Some(ref folder_id) = input.folder_id {
            self.check_folder(user_id, folder_id).await?;
        }
        self.check_tags(user_id, &input.tag_ids).await?;

        let now = chrono::Utc::now();
        let model = note::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            folder_id: Set(input.folder_id),
            title: Set(title),
            content: Set(input.content),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let note = self.note_repo.create(model).await?;
        self.note_repo.set_tags(&note.id, &input.tag_ids).await?;
        // Duplicate input ids collapse in the junction; return the stored set
        let tag_ids = self.note_repo.find_tag_ids(&note.id).await?;

        Ok(NoteWithTags { note, tag_ids })
    }

    /// Get a note owned by the given user, with its tag ids.
    pub async fn show(&self, user_id: &str, note_id: &str) -> AppResult<NoteWithTags> {
        let note = self
            .note_repo
            .find_by_id_and_user(note_id, user_id)
            .await?
            .ok_or_else(|| AppError::NoteNotFound(note_id.to_string()))?;

        let tag_ids = self.note_repo.find_tag_ids(&note.id).await?;

        Ok(NoteWithTags { note, tag_ids })
    }

    /// List a user's notes, newest first.
    ///
    /// `folder_id` narrows by location (`Some(None)` = unfiled only),
    /// `tag_id` restricts to notes carrying that tag, `query` matches title
    /// and content case-insensitively.
    pub async fn list(
        &self,
        user_id: &str,
        folder_id: Option<Option<&str>>,
        tag_id: Option<&str>,
        query: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<NoteWithTags>> {
        let note_ids = match tag_id {
            Some(tag) => {
                let ids = self.note_repo.find_note_ids_by_tag(tag).await?;
                if ids.is_empty() {
                    return Ok(vec![]);
                }
                Some(ids)
            }
            None => None,
        };

        let notes = self
            .note_repo
            .search(
                user_id,
                folder_id,
                note_ids.as_deref(),
                query,
                limit,
                offset,
            )
            .await?;

        let mut result = Vec::with_capacity(notes.len());
        for note in notes {
            let tag_ids = self.note_repo.find_tag_ids(&note.id).await?;
            result.push(NoteWithTags { note, tag_ids });
        }

        Ok(result)
    }

    /// Update a note.
    ///
    /// Fields left absent are untouched. A provided `tag_ids` replaces the
    /// note's tag set wholesale. `updated_at` is refreshed on every call.
    pub async fn update(&self, user_id: &str, input: UpdateNoteInput) -> AppResult<NoteWithTags> {
        input.validate()?;

        let note = self
            .note_repo
            .find_by_id_and_user(&input.note_id, user_id)
            .await?
            .ok_or_else(|| AppError::NoteNotFound(input.note_id.clone()))?;

        if let Some(Some(ref folder_id)) = input.folder_id {
            self.check_folder(user_id, folder_id).await?;
        }
        if let Some(ref tag_ids) = input.tag_ids {
            self.check_tags(user_id, tag_ids).await?;
        }

        let mut active: note::ActiveModel = note.into();

        if let Some(title) = input.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(AppError::BadRequest("Note title is required".to_string()));
            }
            active.title = Set(title);
        }
        if let Some(content) = input.content {
            active.content = Set(content);
        }
        if let Some(folder_id) = input.folder_id {
            active.folder_id = Set(folder_id);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        let note = self.note_repo.update(active).await?;

        if let Some(ref tag_ids) = input.tag_ids {
            self.note_repo.set_tags(&note.id, tag_ids).await?;
        }
        let tag_ids = self.note_repo.find_tag_ids(&note.id).await?;

        Ok(NoteWithTags { note, tag_ids })
    }

    /// Delete a note.
    pub async fn delete(&self, user_id: &str, note_id: &str) -> AppResult<()> {
        let note = self
            .note_repo
            .find_by_id_and_user(note_id, user_id)
            .await?
            .ok_or_else(|| AppError::NoteNotFound(note_id.to_string()))?;

        self.note_repo.delete(&note.id).await
    }

    /// Check that a folder exists and is owned by the user.
    async fn check_folder(&self, user_id: &str, folder_id: &str) -> AppResult<()> {
        match self.folder_repo.find_by_id_and_user(folder_id, user_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("Folder not found".to_string())),
        }
    }

    /// Check that every tag id names a tag owned by the user.
    async fn check_tags(&self, user_id: &str, tag_ids: &[String]) -> AppResult<()> {
        if tag_ids.is_empty() {
            return Ok(());
        }

        let tags = self.tag_repo.find_by_ids(tag_ids).await?;
        for tag_id in tag_ids {
            if !tags.iter().any(|t| t.id == *tag_id && t.user_id == user_id) {
                return Err(AppError::TagNotFound(tag_id.clone()));
            }
        }

        Ok(())
    }
}
