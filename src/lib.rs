// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use crate::application::{
    AuthService, EditorEvent, LoadOutcome, NoteEditor, NoteRepository, SessionContext, ToastLevel,
    LOGIN_ROUTE,
};
use crate::cli::args::{Args, Command};
use crate::domain::{NoteId, Session, Theme};
use crate::infrastructure::{Config, ContentRenderer, SessionStore, SupabaseClient};
use crate::ports::{HtmlPresenter, TerminalPresenter};
use anyhow::{anyhow, bail, Context, Result};
use std::path::Path;
use tracing::{debug, info};

pub fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting supanotes with arguments");

    let config_path = match args.config {
        Some(path) => path,
        None => Config::default_path()?,
    };

    if let Command::Init = args.command {
        return init_config(&config_path);
    }

    let config = Config::load_or_default(&config_path)?
        .with_env_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    let store = SessionStore::new(config.session_path()?);

    match args.command {
        Command::Login { email, password } => login(&config, &store, &email, &password),
        Command::Signup { email, password } => signup(&config, &store, &email, &password),
        command => {
            let stored = store.load()?;
            let context = SessionContext::new(stored.clone());
            let client = SupabaseClient::new(&config.supabase, context.clone())?;
            let mut editor = NoteEditor::new(context, client.clone(), client.clone());
            let outcome = execute(&mut editor, command, &config, &store);
            persist_refreshed_session(&store, stored.as_ref(), &client.context())?;
            outcome
        }
    }
}

fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("Config file already exists: {}", path.display());
    }
    Config::create_default(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn login(config: &Config, store: &SessionStore, email: &str, password: &str) -> Result<()> {
    let mut client = SupabaseClient::new(&config.supabase, SessionContext::anonymous())?;
    let session = client
        .sign_in_with_password(email, password)
        .context("Login failed")?;
    store.save(&session)?;
    info!(user_id = %session.user.id, "Session stored");
    println!("Logged in as {}", session.user.email.as_deref().unwrap_or(email));
    Ok(())
}

fn signup(config: &Config, store: &SessionStore, email: &str, password: &str) -> Result<()> {
    let mut client = SupabaseClient::new(&config.supabase, SessionContext::anonymous())?;
    match client.sign_up(email, password).context("Signup failed")? {
        Some(session) => {
            store.save(&session)?;
            println!("Account created, logged in as {}", email);
        }
        None => println!("Account created, confirm your email and run `supanotes login`"),
    }
    Ok(())
}

/// Write back a session the client replaced while running the command
fn persist_refreshed_session(
    store: &SessionStore,
    stored: Option<&Session>,
    current: &SessionContext,
) -> Result<()> {
    if let Some(session) = current.session().filter(|s| Some(*s) != stored) {
        store.save(session)?;
        info!(user_id = %session.user.id, "Refreshed session stored");
    }
    Ok(())
}

/// Drive the editor through one command and report what it emitted
pub fn execute<R, A>(
    editor: &mut NoteEditor<R, A>,
    command: Command,
    config: &Config,
    store: &SessionStore,
) -> Result<()>
where
    R: NoteRepository,
    A: AuthService,
{
    let terminal = TerminalPresenter::new();

    if let Command::Logout = command {
        editor.logout();
        let logged_out = report(editor, &terminal)?;
        if logged_out {
            store.clear()?;
            println!("Logged out");
        }
        return Ok(());
    }

    if editor.load() == LoadOutcome::AuthRequired {
        report(editor, &terminal)?;
        bail!("Not logged in. Run `supanotes login` first.");
    }

    match command {
        Command::List { search } => {
            editor.set_search(search.unwrap_or_default());
            println!("{}", terminal.render_list(&editor.visible_notes(), None));
        }
        Command::View { note_id, json, text } => {
            editor.select(&NoteId::new(note_id))?;
            let note = editor
                .selected_note()
                .ok_or_else(|| anyhow!("Selected note vanished"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(note)?);
            } else if text {
                println!("{}", terminal.render_note(note));
            } else {
                let html = HtmlPresenter::new().render(note);
                let mut renderer = ContentRenderer::new();
                let path = renderer.create_temp_file(&html)?;
                renderer.open_in_browser(&path)?;
            }
        }
        Command::New {
            title,
            content,
            theme,
        } => {
            editor.new_note();
            editor.set_title(title);
            editor.set_content(content);
            editor.set_theme(theme.unwrap_or(config.defaults.theme));
            editor.save();
            report(editor, &terminal)?;
            if let Some(id) = editor.selected_id() {
                println!("{}", id);
            }
        }
        Command::Edit {
            note_id,
            title,
            content,
            theme,
        } => {
            editor.select(&NoteId::new(note_id))?;
            apply_edits(editor, title, content, theme);
            if !editor.is_dirty() {
                println!("Nothing to change");
                return Ok(());
            }
            editor.save();
            report(editor, &terminal)?;
        }
        Command::Delete { note_id } => {
            editor.select(&NoteId::new(note_id))?;
            editor.delete();
            report(editor, &terminal)?;
        }
        Command::Init | Command::Login { .. } | Command::Signup { .. } | Command::Logout => {
            unreachable!("handled before the editor is loaded")
        }
    }
    Ok(())
}

fn apply_edits<R: NoteRepository, A: AuthService>(
    editor: &mut NoteEditor<R, A>,
    title: Option<String>,
    content: Option<String>,
    theme: Option<Theme>,
) {
    if let Some(title) = title {
        editor.set_title(title);
    }
    if let Some(content) = content {
        editor.set_content(content);
    }
    if let Some(theme) = theme {
        editor.set_theme(theme);
    }
}

/// Print toasts; returns whether the editor navigated to the login route.
/// Error toasts become the command's error.
fn report<R: NoteRepository, A: AuthService>(
    editor: &mut NoteEditor<R, A>,
    terminal: &TerminalPresenter,
) -> Result<bool> {
    let mut navigated_to_login = false;
    let mut failure = None;

    for event in editor.drain_events() {
        match event {
            EditorEvent::Toast(toast) if toast.level == ToastLevel::Error => {
                failure = Some(toast.message);
            }
            EditorEvent::Toast(toast) => println!("{}", terminal.render_toast(&toast)),
            EditorEvent::Navigate(route) => {
                debug!(%route, "Navigation requested");
                navigated_to_login |= route == LOGIN_ROUTE;
            }
        }
    }

    match failure {
        Some(message) => Err(anyhow!(message)),
        None => Ok(navigated_to_login),
    }
}
