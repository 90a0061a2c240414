//! Folder service.

use std::collections::HashSet;

use jot_common::{AppError, AppResult, IdGenerator};
use jot_db::{
    entities::folder,
    repositories::{FolderRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;

/// Maximum folder name length in characters, after trimming.
const MAX_NAME_LENGTH: usize = 100;

/// Folder service for business logic.
#[derive(Clone)]
pub struct FolderService {
    folder_repo: FolderRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

/// Input for creating a folder.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderInput {
    pub name: String,
    pub parent_folder_id: Option<String>,
}

/// Input for updating a folder.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFolderInput {
    /// The folder ID to update.
    pub folder_id: String,

    /// New name (absent = no change).
    pub name: Option<String>,

    /// New parent (absent = no change, `null` = move to root).
    #[serde(default, deserialize_with = "crate::patch::double_option")]
    pub parent_folder_id: Option<Option<String>>,
}

impl FolderService {
    /// Create a new folder service.
    #[must_use]
    pub fn new(folder_repo: FolderRepository, user_repo: UserRepository) -> Self {
        Self {
            folder_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new folder.
    ///
    /// No cycle check is needed here: a freshly generated id cannot appear
    /// in any existing ancestor chain.
    pub async fn create(
        &self,
        user_id: &str,
        input: CreateFolderInput,
    ) -> AppResult<folder::Model> {
        let name = normalize_name(&input.name)?;

        if self.user_repo.find_by_id(user_id).await?.is_none() {
            return Err(AppError::UserNotFound(user_id.to_string()));
        }

        // Validate parent folder if specified
        if let Some(ref parent_id) = input.parent_folder_id {
            let parent = self.folder_repo.find_by_id(parent_id).await?;
            match parent {
                Some(p) if p.user_id == user_id => {}
                // Missing and foreign-owned parents get the same error so a
                // caller cannot probe for other users' folder ids.
                _ => return Err(AppError::NotFound("Parent folder not found".to_string())),
            }
        }

        let now = chrono::Utc::now();
        let model = folder::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            name: Set(name),
            parent_id: Set(input.parent_folder_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        self.folder_repo.create(model).await
    }

    /// Get a folder owned by the given user.
    pub async fn show(&self, user_id: &str, folder_id: &str) -> AppResult<folder::Model> {
        self.folder_repo
            .find_by_id_and_user(folder_id, user_id)
            .await?
            .ok_or_else(|| AppError::FolderNotFound(folder_id.to_string()))
    }

    /// List a user's folders.
    ///
    /// `parent_id` narrows the listing: `None` returns every folder,
    /// `Some(None)` only root folders, `Some(Some(id))` only direct children
    /// of that folder.
    pub async fn list(
        &self,
        user_id: &str,
        parent_id: Option<Option<&str>>,
        limit: u64,
    ) -> AppResult<Vec<folder::Model>> {
        match parent_id {
            None => self.folder_repo.find_by_user(user_id, limit).await,
            Some(parent) => self.folder_repo.find_by_parent(user_id, parent, limit).await,
        }
    }

    /// Update a folder's name and/or parent.
    ///
    /// Fields left absent are untouched; `updated_at` is refreshed on every
    /// call, even when no field changes.
    pub async fn update(
        &self,
        user_id: &str,
        input: UpdateFolderInput,
    ) -> AppResult<folder::Model> {
        let folder = self
            .folder_repo
            .find_by_id_and_user(&input.folder_id, user_id)
            .await?
            .ok_or_else(|| AppError::FolderNotFound(input.folder_id.clone()))?;

        // A null parent (move to root) is always legal and skips validation
        if let Some(Some(ref new_parent_id)) = input.parent_folder_id {
            self.validate_hierarchy(user_id, &folder.id, new_parent_id)
                .await?;
        }

        let mut active: folder::ActiveModel = folder.into();

        if let Some(name) = input.name {
            active.name = Set(normalize_name(&name)?);
        }
        if let Some(parent_id) = input.parent_folder_id {
            active.parent_id = Set(parent_id);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        self.folder_repo.update(active).await
    }

    /// Delete a folder, promoting its contents to its own parent.
    ///
    /// Notes filed in the folder and direct child folders are reassigned to
    /// the deleted folder's parent (or become unfiled/roots when the folder
    /// was itself a root). The subtree is flattened up one level, never
    /// deleted recursively.
    pub async fn delete(&self, user_id: &str, folder_id: &str) -> AppResult<()> {
        let folder = self
            .folder_repo
            .find_by_id_and_user(folder_id, user_id)
            .await?
            .ok_or_else(|| AppError::FolderNotFound(folder_id.to_string()))?;

        self.folder_repo
            .delete_and_reparent(folder_id, user_id, folder.parent_id.as_deref())
            .await
    }

    /// Check that assigning `new_parent_id` as the parent of `folder_id`
    /// keeps the hierarchy acyclic.
    ///
    /// Walks the ancestor chain starting at `new_parent_id`. Reaching
    /// `folder_id` means the move would close a loop; revisiting any id
    /// means the stored chain already contains one. Each ancestor must
    /// exist and belong to `user_id`. Read-only, bounded by tree depth.
    pub async fn validate_hierarchy(
        &self,
        user_id: &str,
        folder_id: &str,
        new_parent_id: &str,
    ) -> AppResult<()> {
        if new_parent_id == folder_id {
            return Err(AppError::InvalidHierarchy(
                "A folder cannot be its own parent".to_string(),
            ));
        }

        let mut visited: HashSet<String> = HashSet::new();
        let mut current = Some(new_parent_id.to_string());

        while let Some(id) = current {
            if id == folder_id {
                return Err(AppError::InvalidHierarchy(
                    "Moving the folder here would create a cycle".to_string(),
                ));
            }
            if !visited.insert(id.clone()) {
                return Err(AppError::InvalidHierarchy(
                    "Folder ancestry already contains a cycle".to_string(),
                ));
            }

            let Some(ancestor) = self.folder_repo.find_by_id(&id).await? else {
                return Err(AppError::NotFound("Parent folder not found".to_string()));
            };
            if ancestor.user_id != user_id {
                return Err(AppError::NotFound("Parent folder not found".to_string()));
            }

            current = ancestor.parent_id;
        }

        Ok(())
    }
}

/// Validate and normalize a folder name.
fn normalize_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Folder name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::BadRequest("Folder name too long".to_string()));
    }
    Ok(name.to_string())
}
