//! Folder repository.

use std::sync::Arc;

use crate::entities::{Folder, Note, folder, note};
use jot_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait, sea_query::Expr,
};

/// Folder repository for database operations.
#[derive(Clone)]
pub struct FolderRepository {
    db: Arc<DatabaseConnection>,
}

impl FolderRepository {
    /// Create a new folder repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a folder by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<folder::Model>> {
        Folder::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a folder by ID and owner.
    ///
    /// Returns `None` both when the folder does not exist and when it is
    /// owned by someone else, so callers cannot tell the two apart.
    pub async fn find_by_id_and_user(
        &self,
        id: &str,
        user_id: &str,
    ) -> AppResult<Option<folder::Model>> {
        Folder::find_by_id(id)
            .filter(folder::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new folder.
    pub async fn create(&self, model: folder::ActiveModel) -> AppResult<folder::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a folder.
    pub async fn update(&self, model: folder::ActiveModel) -> AppResult<folder::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find all folders owned by a user (name ascending).
    pub async fn find_by_user(&self, user_id: &str, limit: u64) -> AppResult<Vec<folder::Model>> {
        Folder::find()
            .filter(folder::Column::UserId.eq(user_id))
            .order_by_asc(folder::Column::Name)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user's folders under a parent (`None` = root folders).
    pub async fn find_by_parent(
        &self,
        user_id: &str,
        parent_id: Option<&str>,
        limit: u64,
    ) -> AppResult<Vec<folder::Model>> {
        let mut query = Folder::find()
            .filter(folder::Column::UserId.eq(user_id))
            .order_by_asc(folder::Column::Name)
            .limit(limit);

        if let Some(parent) = parent_id {
            query = query.filter(folder::Column::ParentId.eq(parent));
        } else {
            query = query.filter(folder::Column::ParentId.is_null());
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a folder, migrating its dependents to `new_parent_id`.
    ///
    /// Runs as one transaction: notes filed in the folder and child folders
    /// are re-parented to `new_parent_id` (null promotes them to
    /// unfiled/root), then the folder row is deleted, scoped by id and owner.
    /// Either all three writes land or none do.
    pub async fn delete_and_reparent(
        &self,
        folder_id: &str,
        user_id: &str,
        new_parent_id: Option<&str>,
    ) -> AppResult<()> {
        let new_parent = new_parent_id.map(ToString::to_string);

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Note::update_many()
            .col_expr(note::Column::FolderId, Expr::value(new_parent.clone()))
            .filter(note::Column::FolderId.eq(folder_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Folder::update_many()
            .col_expr(folder::Column::ParentId, Expr::value(new_parent))
            .filter(folder::Column::ParentId.eq(folder_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Folder::delete_many()
            .filter(folder::Column::Id.eq(folder_id))
            .filter(folder::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
