// src/constants.rs
//
// Application-wide constants: file locations, environment overrides and
// the Supabase endpoint layout.

/// Directory name below the platform config/data dirs.
pub const APP_DIR: &str = "supanotes";

/// Config file name inside the config directory.
///
/// Used in: `infrastructure/config.rs`
pub const CONFIG_FILE: &str = "config.toml";

/// Stored session file name inside the data directory.
///
/// Used in: `infrastructure/config.rs`
pub const SESSION_FILE: &str = "session.json";

/// Environment variables that take precedence over the config file.
pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";

/// Default table holding the notes rows.
pub const DEFAULT_NOTES_TABLE: &str = "notes";

/// Path prefixes of the PostgREST and GoTrue services of a Supabase project.
pub const REST_PATH: &str = "/rest/v1";
pub const AUTH_PATH: &str = "/auth/v1";

/// Connect timeout for the HTTP client in seconds.
///
/// Requests themselves are not retried; this only bounds how long an
/// unreachable project blocks the terminal.
///
/// Used in: `infrastructure/supabase.rs`
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Characters of note content shown per line in `list` output.
///
/// Used in: `ports/terminal.rs`
pub const PREVIEW_CHARS: usize = 48;

/// Delay in milliseconds after launching the browser before the temp dir may go away.
///
/// Used in: `infrastructure/renderer.rs`
pub const BROWSER_LAUNCH_DELAY_MS: u64 = 500;
