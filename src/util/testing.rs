// src/util/testing.rs

use anyhow::Result;
use chrono::{TimeZone, Utc};
use std::env;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::{AuthService, NoteRepository};
use crate::domain::{DomainError, NewNote, Note, NoteFields, NoteId, Theme, User};

/// Build a vanilla note created `minute` minutes after a fixed epoch
pub fn note(id: &str, title: &str, minute: u32) -> Note {
    Note {
        id: NoteId::new(id),
        title: title.to_string(),
        content: String::new(),
        theme: Theme::Vanilla,
        created_at: Utc
            .with_ymd_and_hms(2024, 1, 1, 0, minute, 0)
            .single()
            .expect("valid test timestamp"),
        user_id: Some("u-1".to_string()),
    }
}

/// Shared in-memory stand-in for the remote notes table
///
/// Inserts assign sequential ids, failures are configured per operation.
///
/// # Examples
///
/// ```
/// use supanotes::application::NoteRepository;
/// use supanotes::util::testing::{note, MockNoteRepository};
///
/// let mut mock = MockNoteRepository::builder()
///     .with_notes(vec![note("1", "Groceries", 0)])
///     .with_delete_failure()
///     .build();
/// assert_eq!(mock.list_notes().unwrap().len(), 1);
/// ```
pub struct MockNoteRepository {
    notes: Vec<Note>,
    next_id: u64,
    list_failure: bool,
    insert_failure: Option<String>,
    update_failure: bool,
    delete_failure: bool,
}

impl MockNoteRepository {
    pub fn builder() -> MockNoteRepositoryBuilder {
        MockNoteRepositoryBuilder::new()
    }

    /// Rows currently held by the mock store
    pub fn stored(&self) -> &[Note] {
        &self.notes
    }

    fn failure(operation: &str) -> DomainError {
        DomainError::Remote {
            status: 500,
            message: format!("{} failed", operation),
        }
    }
}

impl NoteRepository for MockNoteRepository {
    fn list_notes(&mut self) -> Result<Vec<Note>, DomainError> {
        if self.list_failure {
            return Err(Self::failure("list"));
        }
        let mut notes = self.notes.clone();
        notes.sort_by_key(|n| n.created_at);
        Ok(notes)
    }

    fn insert_note(&mut self, new_note: &NewNote) -> Result<Vec<Note>, DomainError> {
        if let Some(message) = &self.insert_failure {
            return Err(DomainError::Remote {
                status: 400,
                message: message.clone(),
            });
        }
        self.next_id += 1;
        let created = Note {
            id: NoteId::new(format!("new-{}", self.next_id)),
            title: new_note.title.clone(),
            content: new_note.content.clone(),
            theme: new_note.theme,
            created_at: Utc::now(),
            user_id: Some(new_note.user_id.clone()),
        };
        self.notes.push(created.clone());
        Ok(vec![created])
    }

    fn update_note(&mut self, id: &NoteId, fields: &NoteFields) -> Result<(), DomainError> {
        if self.update_failure {
            return Err(Self::failure("update"));
        }
        if let Some(note) = self.notes.iter_mut().find(|n| &n.id == id) {
            note.apply(fields);
        }
        Ok(())
    }

    fn delete_note(&mut self, id: &NoteId) -> Result<(), DomainError> {
        if self.delete_failure {
            return Err(Self::failure("delete"));
        }
        self.notes.retain(|n| &n.id != id);
        Ok(())
    }
}

/// Builder for MockNoteRepository
///
/// Provides a fluent interface for configuring mock behavior.
pub struct MockNoteRepositoryBuilder {
    notes: Vec<Note>,
    list_failure: bool,
    insert_failure: Option<String>,
    update_failure: bool,
    delete_failure: bool,
}

impl MockNoteRepositoryBuilder {
    pub fn new() -> Self {
        Self {
            notes: vec![],
            list_failure: false,
            insert_failure: None,
            update_failure: false,
            delete_failure: false,
        }
    }

    /// Seed the store with existing rows
    pub fn with_notes(mut self, notes: Vec<Note>) -> Self {
        self.notes.extend(notes);
        self
    }

    pub fn with_list_failure(mut self) -> Self {
        self.list_failure = true;
        self
    }

    /// Configure insert_note to fail with the given store message
    pub fn with_insert_failure(mut self, message: &str) -> Self {
        self.insert_failure = Some(message.to_string());
        self
    }

    pub fn with_update_failure(mut self) -> Self {
        self.update_failure = true;
        self
    }

    pub fn with_delete_failure(mut self) -> Self {
        self.delete_failure = true;
        self
    }

    pub fn build(self) -> MockNoteRepository {
        MockNoteRepository {
            notes: self.notes,
            next_id: 0,
            list_failure: self.list_failure,
            insert_failure: self.insert_failure,
            update_failure: self.update_failure,
            delete_failure: self.delete_failure,
        }
    }
}

impl Default for MockNoteRepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Auth collaborator with a fixed user and configurable sign-out result
pub struct MockAuthService {
    user: Option<User>,
    sign_out_failure: bool,
}

impl MockAuthService {
    pub fn signed_in(user_id: &str) -> Self {
        Self {
            user: Some(User {
                id: user_id.to_string(),
                email: None,
            }),
            sign_out_failure: false,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            user: None,
            sign_out_failure: false,
        }
    }

    pub fn with_sign_out_failure(mut self) -> Self {
        self.sign_out_failure = true;
        self
    }
}

impl AuthService for MockAuthService {
    fn current_user(&mut self) -> Option<User> {
        self.user.clone()
    }

    fn sign_out(&mut self) -> Result<(), DomainError> {
        if self.sign_out_failure {
            return Err(DomainError::Transport("connection reset".to_string()));
        }
        self.user = None;
        Ok(())
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["hyper", "reqwest", "rustls", "mio"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
