// src/domain/error.rs
use crate::domain::NoteId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Note not found: {0}")]
    NoteNotFound(NoteId),
    #[error("Not logged in")]
    AuthRequired,
    #[error("Remote store returned {status}: {message}")]
    Remote { status: u16, message: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Session error: {0}")]
    Session(String),
}

impl DomainError {
    /// Message for the user: the store's own text for remote errors, the full description otherwise
    pub fn detail(&self) -> String {
        match self {
            DomainError::Remote { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
