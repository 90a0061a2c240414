//! Tag service.

use jot_common::{AppError, AppResult, IdGenerator};
use jot_db::{entities::tag, repositories::TagRepository};
use sea_orm::Set;
use serde::Deserialize;

/// Maximum tag name length in characters, after trimming.
const MAX_NAME_LENGTH: usize = 50;

/// Tag service for business logic.
#[derive(Clone)]
pub struct TagService {
    tag_repo: TagRepository,
    id_gen: IdGenerator,
}

/// Input for creating a tag.
#[derive(Debug, Deserialize)]
pub struct CreateTagInput {
    pub name: String,
}

/// Input for renaming a tag.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTagInput {
    /// The tag ID to update.
    pub tag_id: String,

    pub name: String,
}

impl TagService {
    /// Create a new tag service.
    #[must_use]
    pub fn new(tag_repo: TagRepository) -> Self {
        Self {
            tag_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new tag.
    ///
    /// Tag names are unique per user; a taken name fails with a conflict.
    pub async fn create(&self, user_id: &str, input: CreateTagInput) -> AppResult<tag::Model> {
        let name = normalize_name(&input.name)?;

        if self
            .tag_repo
            .find_by_user_and_name(user_id, &name)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Tag \"{name}\" already exists"
            )));
        }

        let now = chrono::Utc::now();
        let model = tag::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            name: Set(name),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        self.tag_repo.create(model).await
    }

    /// List a user's tags, sorted by name.
    pub async fn list(&self, user_id: &str) -> AppResult<Vec<tag::Model>> {
        self.tag_repo.find_by_user(user_id).await
    }

    /// Rename a tag.
    pub async fn update(&self, user_id: &str, input: UpdateTagInput) -> AppResult<tag::Model> {
        let tag = self
            .tag_repo
            .find_by_id_and_user(&input.tag_id, user_id)
            .await?
            .ok_or_else(|| AppError::TagNotFound(input.tag_id.clone()))?;

        let name = normalize_name(&input.name)?;

        // Renaming a tag to its current name is allowed; only a collision
        // with a different tag is a conflict
        if let Some(existing) = self.tag_repo.find_by_user_and_name(user_id, &name).await? {
            if existing.id != tag.id {
                return Err(AppError::Conflict(format!(
                    "Tag \"{name}\" already exists"
                )));
            }
        }

        let mut active: tag::ActiveModel = tag.into();
        active.name = Set(name);
        active.updated_at = Set(chrono::Utc::now().into());

        self.tag_repo.update(active).await
    }

    /// Delete a tag, detaching it from every note.
    pub async fn delete(&self, user_id: &str, tag_id: &str) -> AppResult<()> {
        let tag = self
            .tag_repo
            .find_by_id_and_user(tag_id, user_id)
            .await?
            .ok_or_else(|| AppError::TagNotFound(tag_id.to_string()))?;

        self.tag_repo.delete(&tag.id).await
    }
}

/// Validate and normalize a tag name.
fn normalize_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Tag name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::BadRequest("Tag name too long".to_string()));
    }
    Ok(name.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_tag(id: &str, user_id: &str, name: &str) -> tag::Model {
        tag::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_create_tag() {
        let created = create_test_tag("tag1", "user1", "work");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<tag::Model>::new()])
                .append_query_results([[created]])
                .into_connection(),
        );

        let service = TagService::new(TagRepository::new(db));
        let input = CreateTagInput {
            name: "  work  ".to_string(),
        };
        let result = service.create("user1", input).await.unwrap();

        assert_eq!(result.name, "work");
    }

    #[tokio::test]
    async fn test_create_tag_duplicate_name_is_conflict() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_tag("tag1", "user1", "work")]])
                .into_connection(),
        );

        let service = TagService::new(TagRepository::new(db));
        let input = CreateTagInput {
            name: "work".to_string(),
        };
        let result = service.create("user1", input).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_tag_name_reusable_across_users() {
        // "work" is taken by user1; the lookup scoped to user2 sees nothing
        let created = create_test_tag("tag2", "user2", "work");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<tag::Model>::new()])
                .append_query_results([[created]])
                .into_connection(),
        );

        let service = TagService::new(TagRepository::new(db));
        let input = CreateTagInput {
            name: "work".to_string(),
        };
        let result = service.create("user2", input).await.unwrap();

        assert_eq!(result.user_id, "user2");
        assert_eq!(result.name, "work");
    }

    #[tokio::test]
    async fn test_create_tag_blank_name_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = TagService::new(TagRepository::new(db));
        let input = CreateTagInput {
            name: "   ".to_string(),
        };
        let result = service.create("user1", input).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_update_tag_same_name_is_not_conflict() {
        let tag = create_test_tag("tag1", "user1", "work");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    vec![tag.clone()],
                    vec![tag.clone()],
                    vec![tag],
                ])
                .into_connection(),
        );

        let service = TagService::new(TagRepository::new(db));
        let input = UpdateTagInput {
            tag_id: "tag1".to_string(),
            name: "work".to_string(),
        };
        let result = service.update("user1", input).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_tag_collision_is_conflict() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    vec![create_test_tag("tag1", "user1", "work")],
                    vec![create_test_tag("tag2", "user1", "personal")],
                ])
                .into_connection(),
        );

        let service = TagService::new(TagRepository::new(db));
        let input = UpdateTagInput {
            tag_id: "tag1".to_string(),
            name: "personal".to_string(),
        };
        let result = service.update("user1", input).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_tag_not_owned_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<tag::Model>::new()])
                .into_connection(),
        );

        let service = TagService::new(TagRepository::new(db));
        let input = UpdateTagInput {
            tag_id: "tag1".to_string(),
            name: "work".to_string(),
        };
        let result = service.update("other_user", input).await;

        match result {
            Err(AppError::TagNotFound(id)) => assert_eq!(id, "tag1"),
            _ => panic!("Expected TagNotFound error"),
        }
    }
}
