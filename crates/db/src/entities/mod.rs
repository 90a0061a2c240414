//! Database entities.

#![allow(missing_docs)]

pub mod folder;
pub mod note;
pub mod note_tag;
pub mod tag;
pub mod user;

pub use folder::Entity as Folder;
pub use note::Entity as Note;
pub use note_tag::Entity as NoteTag;
pub use tag::Entity as Tag;
pub use user::Entity as User;
