// src/cli/args.rs
use crate::domain::Theme;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Path to config file (default: platform config dir)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write a default config file
    Init,

    /// Sign in with email and password
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Create an account
    Signup {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// End the session
    Logout,

    /// List notes, optionally filtered by title
    List {
        /// Case-insensitive search in note titles
        #[arg(value_name = "SEARCH")]
        search: Option<String>,
    },

    /// Show a note in the browser
    View {
        #[arg(value_name = "NOTE_ID")]
        note_id: String,

        /// Output note as JSON instead of opening in browser
        #[arg(long)]
        json: bool,

        /// Print the note as text instead of opening in browser
        #[arg(long, conflicts_with = "json")]
        text: bool,
    },

    /// Create a note
    New {
        #[arg(short, long, default_value = "")]
        title: String,

        #[arg(short = 'b', long, default_value = "")]
        content: String,

        /// vanilla, chocolate, dark or light (default from config)
        #[arg(long)]
        theme: Option<Theme>,
    },

    /// Change fields of an existing note
    Edit {
        #[arg(value_name = "NOTE_ID")]
        note_id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short = 'b', long)]
        content: Option<String>,

        #[arg(long)]
        theme: Option<Theme>,
    },

    /// Delete a note
    Delete {
        #[arg(value_name = "NOTE_ID")]
        note_id: String,
    },
}
