//! Business logic services.

#![allow(missing_docs)]

pub mod folder;
pub mod note;
pub mod tag;
pub mod user;

pub use folder::{CreateFolderInput, FolderService, UpdateFolderInput};
pub use note::{CreateNoteInput, NoteService, NoteWithTags, UpdateNoteInput};
pub use tag::{CreateTagInput, TagService, UpdateTagInput};
pub use user::{SigninInput, SignupInput, UserService};
