// src/infrastructure/session_store.rs
use crate::domain::{DomainError, Session};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// JSON file holding the signed-in session between invocations
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored session, `None` when nobody is logged in
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Option<Session>, DomainError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No stored session");
                return Ok(None);
            }
            Err(e) => {
                return Err(DomainError::Session(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        serde_json::from_str(&content).map(Some).map_err(|e| {
            DomainError::Session(format!(
                "Corrupt session file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    pub fn save(&self, session: &Session) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| DomainError::Session(format!("Failed to create session dir: {}", e)))?;
        }
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| DomainError::Session(e.to_string()))?;
        fs::write(&self.path, json)
            .map_err(|e| DomainError::Session(format!("Failed to write session: {}", e)))?;
        debug!(path = %self.path.display(), "Session stored");
        Ok(())
    }

    /// Remove the stored session; a missing file is not an error
    pub fn clear(&self) -> Result<(), DomainError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Session(format!(
                "Failed to remove session: {}",
                e
            ))),
        }
    }
}
