// src/application/events.rs
use std::collections::VecDeque;

/// Route of the login surface
pub const LOGIN_ROUTE: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
}

/// Non-blocking user notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    Toast(Toast),
    Navigate(String),
}

/// FIFO of events emitted by the editor, drained by the front end
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<EditorEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: EditorEvent) {
        self.events.push_back(event);
    }

    pub fn notify(&mut self, toast: Toast) {
        self.push(EditorEvent::Toast(toast));
    }

    pub fn navigate(&mut self, route: &str) {
        self.push(EditorEvent::Navigate(route.to_string()));
    }

    pub fn drain(&mut self) -> Vec<EditorEvent> {
        self.events.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
