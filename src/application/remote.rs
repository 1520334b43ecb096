// src/application/remote.rs
use crate::domain::{DomainError, NewNote, Note, NoteFields, NoteId, User};

/// Notes table of the remote store, scoped to the authenticated session
pub trait NoteRepository {
    /// All notes visible to the session, ascending by `created_at`
    fn list_notes(&mut self) -> Result<Vec<Note>, DomainError>;

    /// Insert a note and return the created record(s) as stored
    fn insert_note(&mut self, note: &NewNote) -> Result<Vec<Note>, DomainError>;

    fn update_note(&mut self, id: &NoteId, fields: &NoteFields) -> Result<(), DomainError>;

    fn delete_note(&mut self, id: &NoteId) -> Result<(), DomainError>;
}

pub trait AuthService {
    fn current_user(&mut self) -> Option<User>;

    fn sign_out(&mut self) -> Result<(), DomainError>;
}
