// src/ports/terminal.rs
use crate::application::{Toast, ToastLevel};
use crate::constants::PREVIEW_CHARS;
use crate::domain::{Note, NoteId};
use crate::util::text::preview;

/// Plain-text rendering for the command line
#[derive(Debug, Default)]
pub struct TerminalPresenter;

impl TerminalPresenter {
    pub fn new() -> Self {
        Self
    }

    /// One line per note, the selected one marked with `*`
    pub fn render_list(&self, notes: &[&Note], selected: Option<&NoteId>) -> String {
        if notes.is_empty() {
            return "No notes".to_string();
        }

        notes
            .iter()
            .map(|note| {
                let marker = if Some(&note.id) == selected { '*' } else { ' ' };
                format!(
                    "{} {}\t{}\t[{}]\t{}\t{}",
                    marker,
                    note.id,
                    note.display_title(),
                    note.theme,
                    note.created_at.format("%Y-%m-%d %H:%M"),
                    preview(&note.content, PREVIEW_CHARS),
                )
                .trim_end()
                .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render_note(&self, note: &Note) -> String {
        format!(
            "{}\n{}\nid: {}  theme: {}  created: {}\n\n{}",
            note.display_title(),
            "=".repeat(note.display_title().chars().count()),
            note.id,
            note.theme,
            note.created_at.to_rfc3339(),
            note.content
        )
    }

    pub fn render_toast(&self, toast: &Toast) -> String {
        match toast.level {
            ToastLevel::Info => toast.message.clone(),
            ToastLevel::Error => format!("error: {}", toast.message),
        }
    }
}
