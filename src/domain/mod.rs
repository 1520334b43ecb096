// src/domain/mod.rs
pub mod error;
pub mod note;
pub mod theme;
pub mod user;

pub use error::DomainError;
pub use note::{NewNote, Note, NoteFields, NoteId, UNTITLED};
pub use theme::Theme;
pub use user::{Session, User};
