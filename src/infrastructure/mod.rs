// src/infrastructure/mod.rs
pub mod config;
pub mod renderer;
pub mod session_store;
pub mod supabase;

pub use config::Config;
pub use renderer::ContentRenderer;
pub use session_store::SessionStore;
pub use supabase::SupabaseClient;
