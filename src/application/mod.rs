// src/application/mod.rs
pub mod events;
pub mod note_editor;
pub mod remote;
pub mod session;

pub use events::{EditorEvent, EventQueue, Toast, ToastLevel, LOGIN_ROUTE};
pub use note_editor::{LoadOutcome, NoteEditor};
pub use remote::{AuthService, NoteRepository};
pub use session::SessionContext;
