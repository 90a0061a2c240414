//! Repository layer for database access.

pub mod folder;
pub mod note;
pub mod tag;
pub mod user;

pub use folder::FolderRepository;
pub use note::NoteRepository;
pub use tag::TagRepository;
pub use user::UserRepository;
