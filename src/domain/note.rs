// src/domain/note.rs
use crate::domain::Theme;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Title stored when a new note is saved with a blank title
pub const UNTITLED: &str = "Untitled";

/// Store-assigned note identifier (uuid or bigint, kept as text)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct NoteId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for NoteId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => NoteId(s),
            RawId::Number(n) => NoteId(n.to_string()),
        }
    }
}

impl From<NoteId> for String {
    fn from(id: NoteId) -> Self {
        id.0
    }
}

impl NoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(s: &str) -> Self {
        NoteId(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(default)]
    pub theme: Theme,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Note {
    pub fn fields(&self) -> NoteFields {
        NoteFields {
            title: self.title.clone(),
            content: self.content.clone(),
            theme: self.theme,
        }
    }

    pub fn apply(&mut self, fields: &NoteFields) {
        self.title = fields.title.clone();
        self.content = fields.content.clone();
        self.theme = fields.theme;
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED
        } else {
            &self.title
        }
    }
}

/// Editable part of a note: the edit form and the update payload
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NoteFields {
    pub title: String,
    pub content: String,
    pub theme: Theme,
}

/// Insert payload for a note that has no id yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub theme: Theme,
    pub user_id: String,
}

impl NewNote {
    /// Build the insert payload from form fields, substituting the default title when blank
    pub fn from_fields(fields: &NoteFields, user_id: &str) -> Self {
        let title = if fields.title.is_empty() {
            UNTITLED.to_string()
        } else {
            fields.title.clone()
        };
        Self {
            title,
            content: fields.content.clone(),
            theme: fields.theme,
            user_id: user_id.to_string(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
