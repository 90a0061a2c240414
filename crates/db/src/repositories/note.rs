//! Note repository.

use std::collections::HashSet;
use std::sync::Arc;

use crate::entities::{Note, NoteTag, note, note_tag};
use chrono::Utc;
use jot_common::{AppError, AppResult, IdGenerator};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
    sea_query::{Expr, extension::postgres::PgExpr},
};

/// Note repository for database operations.
#[derive(Clone)]
pub struct NoteRepository {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl NoteRepository {
    /// Create a new note repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Find a note by ID and owner.
    ///
    /// Returns `None` both when the note does not exist and when it is owned
    /// by someone else, so callers cannot tell the two apart.
    pub async fn find_by_id_and_user(
        &self,
        id: &str,
        user_id: &str,
    ) -> AppResult<Option<note::Model>> {
        Note::find_by_id(id)
            .filter(note::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new note.
    pub async fn create(&self, model: note::ActiveModel) -> AppResult<note::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a note.
    pub async fn update(&self, model: note::ActiveModel) -> AppResult<note::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a note (junction rows cascade).
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Note::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Search a user's notes, newest first.
    ///
    /// `folder_id` narrows by location: `None` means any folder,
    /// `Some(None)` means unfiled notes only, `Some(Some(id))` means that
    /// folder only. `note_ids` restricts the result to the given IDs,
    /// `query` matches title and content case-insensitively.
    pub async fn search(
        &self,
        user_id: &str,
        folder_id: Option<Option<&str>>,
        note_ids: Option<&[String]>,
        query: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<note::Model>> {
        let mut condition = Condition::all().add(note::Column::UserId.eq(user_id));

        match folder_id {
            Some(Some(folder)) => {
                condition = condition.add(note::Column::FolderId.eq(folder));
            }
            Some(None) => {
                condition = condition.add(note::Column::FolderId.is_null());
            }
            None => {}
        }

        if let Some(ids) = note_ids {
            condition = condition.add(note::Column::Id.is_in(ids.to_vec()));
        }

        if let Some(q) = query {
            let pattern = like_pattern(q);
            condition = condition.add(
                Condition::any()
                    .add(Expr::col(note::Column::Title).ilike(&pattern))
                    .add(Expr::col(note::Column::Content).ilike(&pattern)),
            );
        }

        Note::find()
            .filter(condition)
            .order_by_desc(note::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ==================== Note Tag Operations ====================

    /// Get the tag IDs applied to a note.
    pub async fn find_tag_ids(&self, note_id: &str) -> AppResult<Vec<String>> {
        NoteTag::find()
            .filter(note_tag::Column::NoteId.eq(note_id))
            .select_only()
            .column(note_tag::Column::TagId)
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the IDs of notes carrying a tag.
    pub async fn find_note_ids_by_tag(&self, tag_id: &str) -> AppResult<Vec<String>> {
        NoteTag::find()
            .filter(note_tag::Column::TagId.eq(tag_id))
            .select_only()
            .column(note_tag::Column::NoteId)
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Replace the tag set of a note.
    ///
    /// Junction rows for tags no longer in `tag_ids` are removed and rows for
    /// newly applied tags are inserted. Rows for retained tags are left
    /// untouched, keeping their original `created_at`.
    pub async fn set_tags(&self, note_id: &str, tag_ids: &[String]) -> AppResult<()> {
        let existing: HashSet<String> = self.find_tag_ids(note_id).await?.into_iter().collect();
        let wanted: HashSet<String> = tag_ids.iter().cloned().collect();

        let removed: Vec<String> = existing.difference(&wanted).cloned().collect();
        if !removed.is_empty() {
            NoteTag::delete_many()
                .filter(note_tag::Column::NoteId.eq(note_id))
                .filter(note_tag::Column::TagId.is_in(removed))
                .exec(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        let added: Vec<note_tag::ActiveModel> = wanted
            .difference(&existing)
            .map(|tag_id| note_tag::ActiveModel {
                id: Set(self.id_gen.generate()),
                note_id: Set(note_id.to_string()),
                tag_id: Set(tag_id.clone()),
                created_at: Set(Utc::now().into()),
            })
            .collect();
        if !added.is_empty() {
            NoteTag::insert_many(added)
                .exec(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        Ok(())
    }
}

/// Build an ILIKE pattern matching `query` as a literal substring.
///
/// The backslash has to be escaped before `%` and `_`, or the escapes just
/// added would themselves get escaped.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
