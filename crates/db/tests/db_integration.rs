//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance and are ignored by
//! default. Run with: `cargo test --test db_integration -- --ignored`
//!
//! Point them at a disposable server, e.g.:
//!   docker run -d -p 5433:5432 -e POSTGRES_USER=jot_test \
//!     -e POSTGRES_PASSWORD=jot_test -e POSTGRES_DB=jot_test postgres:16
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `jot_test`)
//!   `TEST_DB_PASSWORD` (default: `jot_test`)
//!   `TEST_DB_NAME` (default: `jot_test`)

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::Utc;
use jot_db::entities::{folder, note, note_tag, tag, user, Folder, Note, NoteTag, Tag};
use jot_db::repositories::FolderRepository;
use jot_db::test_utils::{TestDatabase, TestDbConfig};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait,
    PaginatorTrait, Set, SqlxPostgresConnector, Statement,
};

/// Owned connection over the same pool; `DatabaseConnection` is not `Clone`
/// while the `mock` feature (enabled by this crate's unit tests) is on.
fn conn_handle(conn: &DatabaseConnection) -> DatabaseConnection {
    SqlxPostgresConnector::from_sqlx_postgres_pool(conn.get_postgres_connection_pool().clone())
}

async fn seed_user(conn: &DatabaseConnection, id: &str) -> user::Model {
    user::ActiveModel {
        id: Set(id.to_string()),
        username: Set(format!("user-{id}")),
        username_lower: Set(format!("user-{id}")),
        password_hash: Set("$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$hash".to_string()),
        token: Set(format!("token-{id}")),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await
    .unwrap()
}

async fn seed_folder(
    conn: &DatabaseConnection,
    id: &str,
    user_id: &str,
    parent_id: Option<&str>,
) -> folder::Model {
    folder::ActiveModel {
        id: Set(id.to_string()),
        user_id: Set(user_id.to_string()),
        name: Set(format!("Folder {id}")),
        parent_id: Set(parent_id.map(ToString::to_string)),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await
    .unwrap()
}

async fn seed_note(
    conn: &DatabaseConnection,
    id: &str,
    user_id: &str,
    folder_id: Option<&str>,
) -> note::Model {
    note::ActiveModel {
        id: Set(id.to_string()),
        user_id: Set(user_id.to_string()),
        folder_id: Set(folder_id.map(ToString::to_string)),
        title: Set(format!("Note {id}")),
        content: Set(String::new()),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await
    .unwrap()
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_migrations_create_schema() {
    let db = TestDatabase::create_unique().await.unwrap();

    // All five tables exist and accept rows
    let user = seed_user(db.connection(), "u1").await;
    let folder = seed_folder(db.connection(), "f1", &user.id, None).await;
    seed_note(db.connection(), "n1", &user.id, Some(&folder.id)).await;

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_delete_and_reparent_moves_contents() {
    let db = TestDatabase::create_unique().await.unwrap();
    let conn = db.connection();

    let user = seed_user(conn, "u1").await;
    seed_folder(conn, "root", &user.id, None).await;
    seed_folder(conn, "mid", &user.id, Some("root")).await;
    seed_folder(conn, "leaf", &user.id, Some("mid")).await;
    seed_note(conn, "n1", &user.id, Some("mid")).await;

    let repo = FolderRepository::new(Arc::new(conn_handle(conn)));
    repo.delete_and_reparent("mid", &user.id, Some("root"))
        .await
        .unwrap();

    // The folder row is gone, its contents now hang off "root"
    assert!(Folder::find_by_id("mid").one(conn).await.unwrap().is_none());

    let leaf = Folder::find_by_id("leaf").one(conn).await.unwrap().unwrap();
    assert_eq!(leaf.parent_id, Some("root".to_string()));

    let note = Note::find_by_id("n1").one(conn).await.unwrap().unwrap();
    assert_eq!(note.folder_id, Some("root".to_string()));

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_delete_root_folder_promotes_contents() {
    let db = TestDatabase::create_unique().await.unwrap();
    let conn = db.connection();

    let user = seed_user(conn, "u1").await;
    seed_folder(conn, "root", &user.id, None).await;
    seed_folder(conn, "child", &user.id, Some("root")).await;
    seed_note(conn, "n1", &user.id, Some("root")).await;

    let repo = FolderRepository::new(Arc::new(conn_handle(conn)));
    repo.delete_and_reparent("root", &user.id, None).await.unwrap();

    let child = Folder::find_by_id("child").one(conn).await.unwrap().unwrap();
    assert_eq!(child.parent_id, None);

    let note = Note::find_by_id("n1").one(conn).await.unwrap().unwrap();
    assert_eq!(note.folder_id, None);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_folder_parent_fk_nulls_on_raw_delete() {
    let db = TestDatabase::create_unique().await.unwrap();
    let conn = db.connection();

    let user = seed_user(conn, "u1").await;
    seed_folder(conn, "root", &user.id, None).await;
    seed_folder(conn, "child", &user.id, Some("root")).await;

    // Schema-level backstop: deleting a parent outside the application path
    // must not leave dangling parent ids
    conn.execute(Statement::from_string(
        DatabaseBackend::Postgres,
        "DELETE FROM folder WHERE id = 'root'".to_string(),
    ))
    .await
    .unwrap();

    let child = Folder::find_by_id("child").one(conn).await.unwrap().unwrap();
    assert_eq!(child.parent_id, None);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_username_lower_unique_index() {
    let db = TestDatabase::create_unique().await.unwrap();
    let conn = db.connection();

    seed_user(conn, "u1").await;

    let duplicate = user::ActiveModel {
        id: Set("u2".to_string()),
        username: Set("USER-u1".to_string()),
        username_lower: Set("user-u1".to_string()),
        password_hash: Set("$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$hash".to_string()),
        token: Set("token-u2".to_string()),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await;

    assert!(duplicate.is_err());

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_note_delete_cascades_junction_rows() {
    let db = TestDatabase::create_unique().await.unwrap();
    let conn = db.connection();

    let user = seed_user(conn, "u1").await;
    seed_note(conn, "n1", &user.id, None).await;

    tag::ActiveModel {
        id: Set("t1".to_string()),
        user_id: Set(user.id.clone()),
        name: Set("work".to_string()),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await
    .unwrap();

    note_tag::ActiveModel {
        id: Set("nt1".to_string()),
        note_id: Set("n1".to_string()),
        tag_id: Set("t1".to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await
    .unwrap();

    Note::delete_by_id("n1").exec(conn).await.unwrap();

    assert_eq!(NoteTag::find().count(conn).await.unwrap(), 0);
    // The tag itself outlives the note
    assert_eq!(Tag::find().count(conn).await.unwrap(), 1);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_cleanup_truncates_tables() {
    let db = TestDatabase::create_unique().await.unwrap();
    let conn = db.connection();

    seed_user(conn, "u1").await;
    db.cleanup().await.unwrap();

    assert_eq!(jot_db::entities::User::find().count(conn).await.unwrap(), 0);

    db.drop_database().await.unwrap();
}
