// src/application/session.rs
use crate::domain::{Session, User};

/// Authentication state handed to the editor and the store adapter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    session: Option<Session>,
}

impl SessionContext {
    pub fn new(session: Option<Session>) -> Self {
        Self { session }
    }

    pub fn anonymous() -> Self {
        Self { session: None }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn access_token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.access_token.as_str())
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.refresh_token.as_deref())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn clear(&mut self) {
        self.session = None;
    }
}
