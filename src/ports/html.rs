// src/ports/html.rs
use crate::domain::Note;
use html_escape::encode_text;
use tracing::instrument;

/// Renders a note as a standalone page in its theme colours
#[derive(Debug, Default)]
pub struct HtmlPresenter;

impl HtmlPresenter {
    pub fn new() -> Self {
        Self
    }

    #[instrument(level = "debug", skip(self, note), fields(note_id = %note.id))]
    pub fn render(&self, note: &Note) -> String {
        let (background, foreground) = note.theme.colors();
        let title = encode_text(note.display_title());
        let content = encode_text(&note.content);

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            line-height: 1.6;
            max-width: 800px;
            margin: 2rem auto;
            padding: 0 1rem;
            background-color: #f5f5f5;
        }}
        .note {{
            background: {background};
            color: {foreground};
            border-radius: 6px;
            padding: 2rem;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }}
        .note-title {{
            font-size: 1.5rem;
            font-weight: bold;
            margin-bottom: 1rem;
        }}
        .note-content {{
            white-space: pre-wrap;
            word-wrap: break-word;
        }}
        .note-info {{
            margin-top: 1rem;
            padding-top: 1rem;
            border-top: 1px solid currentColor;
            font-size: 0.8em;
            opacity: 0.7;
        }}
    </style>
</head>
<body>
    <div class="note note-theme-{theme}">
        <div class="note-title">{title}</div>
        <div class="note-content">{content}</div>
        <div class="note-info">
            <div>Theme: {theme_name}</div>
            <div>Created: {created}</div>
        </div>
    </div>
</body>
</html>"#,
            title = title,
            background = background,
            foreground = foreground,
            theme = note.theme,
            content = content,
            theme_name = note.theme.display_name(),
            created = note.created_at.format("%Y-%m-%d %H:%M UTC"),
        )
    }
}
