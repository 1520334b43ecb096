// src/infrastructure/supabase.rs
use crate::application::{AuthService, NoteRepository, SessionContext};
use crate::constants::{AUTH_PATH, CONNECT_TIMEOUT_SECS, REST_PATH};
use crate::domain::{DomainError, NewNote, Note, NoteFields, NoteId, Session, User};
use crate::infrastructure::config::SupabaseConfig;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Blocking client for the auth and table endpoints of a Supabase project
///
/// Clones share one session, so a refresh or sign-out through any handle
/// is seen by all of them.
#[derive(Clone)]
pub struct SupabaseClient {
    base_url: String,
    anon_key: String,
    table: String,
    context: Rc<RefCell<SessionContext>>,
    client: Client,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

impl SupabaseClient {
    pub fn new(config: &SupabaseConfig, context: SessionContext) -> Result<Self, DomainError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(transport)?;

        debug!(url = %config.url, table = %config.table, "Creating Supabase client");
        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            table: config.table.clone(),
            context: Rc::new(RefCell::new(context)),
            client,
        })
    }

    /// Snapshot of the session currently used for requests
    pub fn context(&self) -> SessionContext {
        self.context.borrow().clone()
    }

    fn set_session(&self, session: Session) {
        *self.context.borrow_mut() = SessionContext::new(Some(session));
    }

    fn is_authenticated(&self) -> bool {
        self.context.borrow().is_authenticated()
    }

    fn can_refresh(&self) -> bool {
        self.context.borrow().refresh_token().is_some()
    }

    fn table_url(&self) -> String {
        format!("{}{}/{}", self.base_url, REST_PATH, self.table)
    }

    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}{}/{}", self.base_url, AUTH_PATH, endpoint)
    }

    /// Attach the project key and the session token (anon key when signed out)
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let token = self
            .context
            .borrow()
            .access_token()
            .map(str::to_string)
            .unwrap_or_else(|| self.anon_key.clone());
        builder.header("apikey", &self.anon_key).bearer_auth(token)
    }

    #[instrument(level = "debug", skip(self, password))]
    pub fn sign_in_with_password(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Session, DomainError> {
        let response = self
            .client
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&Credentials { email, password })
            .send()
            .map_err(transport)?;

        let session: Session = check(response)?.json().map_err(decode)?;

        info!(user_id = %session.user.id, "Signed in");
        self.set_session(session.clone());
        Ok(session)
    }

    /// Register a new account. Projects with email confirmation return no session.
    #[instrument(level = "debug", skip(self, password))]
    pub fn sign_up(&mut self, email: &str, password: &str) -> Result<Option<Session>, DomainError> {
        let response = self
            .client
            .post(self.auth_url("signup"))
            .header("apikey", &self.anon_key)
            .json(&Credentials { email, password })
            .send()
            .map_err(transport)?;

        let body: Value = check(response)?.json().map_err(decode)?;

        let session = parse_signup(body)?;
        if let Some(session) = &session {
            self.set_session(session.clone());
        }
        Ok(session)
    }

    /// Trade the stored refresh token for a new session
    #[instrument(level = "debug", skip(self))]
    pub fn refresh_session(&mut self) -> Result<Session, DomainError> {
        let refresh_token = self
            .context
            .borrow()
            .refresh_token()
            .map(str::to_string)
            .ok_or(DomainError::AuthRequired)?;

        let response = self
            .client
            .post(self.auth_url("token"))
            .query(&[("grant_type", "refresh_token")])
            .header("apikey", &self.anon_key)
            .json(&RefreshGrant {
                refresh_token: &refresh_token,
            })
            .send()
            .map_err(transport)?;

        let session: Session = check(response)?.json().map_err(decode)?;

        info!(user_id = %session.user.id, "Session refreshed");
        self.set_session(session.clone());
        Ok(session)
    }

    /// Ask the auth service who the current token belongs to
    #[instrument(level = "debug", skip(self))]
    pub fn fetch_user(&self) -> Result<User, DomainError> {
        if !self.is_authenticated() {
            return Err(DomainError::AuthRequired);
        }

        let response = self
            .authorized(self.client.get(self.auth_url("user")))
            .send()
            .map_err(transport)?;

        check(response)?.json().map_err(decode)
    }

    /// Resolve the signed-in user, refreshing an expired access token once
    pub fn verify_session(&mut self) -> Result<User, DomainError> {
        match self.fetch_user() {
            Err(DomainError::Remote { status: 401, message }) if self.can_refresh() => {
                debug!(%message, "Access token rejected, refreshing session");
                Ok(self.refresh_session()?.user)
            }
            other => other,
        }
    }
}

impl NoteRepository for SupabaseClient {
    #[instrument(level = "debug", skip(self))]
    fn list_notes(&mut self) -> Result<Vec<Note>, DomainError> {
        let response = self
            .authorized(self.client.get(self.table_url()))
            .query(&[("select", "*"), ("order", "created_at.asc")])
            .send()
            .map_err(transport)?;

        let notes: Vec<Note> = check(response)?.json().map_err(decode)?;
        debug!(count = notes.len(), "Fetched notes");
        Ok(notes)
    }

    #[instrument(level = "debug", skip(self, note))]
    fn insert_note(&mut self, note: &NewNote) -> Result<Vec<Note>, DomainError> {
        let response = self
            .authorized(self.client.post(self.table_url()))
            .header("Prefer", "return=representation")
            .json(&[note])
            .send()
            .map_err(transport)?;

        check(response)?.json().map_err(decode)
    }

    #[instrument(level = "debug", skip(self, fields))]
    fn update_note(&mut self, id: &NoteId, fields: &NoteFields) -> Result<(), DomainError> {
        let response = self
            .authorized(self.client.patch(self.table_url()))
            .query(&[("id", id_filter(id))])
            .json(fields)
            .send()
            .map_err(transport)?;

        check(response)?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn delete_note(&mut self, id: &NoteId) -> Result<(), DomainError> {
        let response = self
            .authorized(self.client.delete(self.table_url()))
            .query(&[("id", id_filter(id))])
            .send()
            .map_err(transport)?;

        check(response)?;
        Ok(())
    }
}

impl AuthService for SupabaseClient {
    fn current_user(&mut self) -> Option<User> {
        match self.verify_session() {
            Ok(user) => Some(user),
            Err(DomainError::AuthRequired) => None,
            Err(DomainError::Remote { status, message }) => {
                debug!(status, %message, "Session rejected by auth service");
                None
            }
            Err(e) => {
                // Unreachable auth service: trust the stored session, table calls will tell
                warn!(error = %e, "Could not verify session");
                self.context.borrow().user().cloned()
            }
        }
    }

    #[instrument(level = "debug", skip(self))]
    fn sign_out(&mut self) -> Result<(), DomainError> {
        if self.is_authenticated() {
            let response = self
                .authorized(self.client.post(self.auth_url("logout")))
                .send()
                .map_err(transport)?;
            match check(response) {
                Ok(_) => {}
                // Token already expired or revoked, nothing left to end remotely
                Err(DomainError::Remote {
                    status: status @ (401 | 403 | 404),
                    message,
                }) => debug!(status, %message, "Session already invalid"),
                Err(e) => return Err(e),
            }
        }
        self.context.borrow_mut().clear();
        Ok(())
    }
}

/// PostgREST equality filter for the id column
fn id_filter(id: &NoteId) -> String {
    format!("eq.{}", id)
}

fn transport(e: reqwest::Error) -> DomainError {
    DomainError::Transport(e.to_string())
}

fn decode(e: reqwest::Error) -> DomainError {
    DomainError::Decode(e.to_string())
}

fn check(response: Response) -> Result<Response, DomainError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(DomainError::Remote {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// Human readable message of a PostgREST or GoTrue error body
pub(crate) fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|key| v.get(key).and_then(Value::as_str))
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

/// Signup answers with a session when auto-confirm is on, with the bare user otherwise
fn parse_signup(body: Value) -> Result<Option<Session>, DomainError> {
    if body.get("access_token").is_none() {
        return Ok(None);
    }
    serde_json::from_value(body)
        .map(Some)
        .map_err(|e| DomainError::Decode(e.to_string()))
}
