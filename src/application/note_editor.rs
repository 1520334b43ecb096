// src/application/note_editor.rs
use crate::application::{
    AuthService, EditorEvent, EventQueue, NoteRepository, SessionContext, Toast, LOGIN_ROUTE,
};
use crate::domain::{DomainError, NewNote, Note, NoteFields, NoteId, Theme};
use tracing::{debug, error, info, instrument};

/// Result of loading the notes list on mount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    AuthRequired,
    FetchFailed,
}

/// View model of the notes page: notes list, selection and edit form.
///
/// Every interaction runs at most one remote call to completion. Local state
/// is only changed after the call succeeded, failures surface as toasts on
/// the event queue.
pub struct NoteEditor<R: NoteRepository, A: AuthService> {
    context: SessionContext,
    repository: R,
    auth: A,
    notes: Vec<Note>,
    selected: Option<NoteId>,
    form: NoteFields,
    search_query: String,
    sidebar_open: bool,
    events: EventQueue,
}

impl<R: NoteRepository, A: AuthService> NoteEditor<R, A> {
    pub fn new(context: SessionContext, repository: R, auth: A) -> Self {
        Self {
            context,
            repository,
            auth,
            notes: Vec::new(),
            selected: None,
            form: NoteFields::default(),
            search_query: String::new(),
            sidebar_open: true,
            events: EventQueue::new(),
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load(&mut self) -> LoadOutcome {
        if self.auth.current_user().is_none() {
            debug!("No authenticated user, redirecting to login");
            self.events.navigate(LOGIN_ROUTE);
            return LoadOutcome::AuthRequired;
        }

        match self.repository.list_notes() {
            Ok(notes) => {
                info!(count = notes.len(), "Loaded notes");
                self.notes = notes;
                LoadOutcome::Loaded(self.notes.len())
            }
            Err(e) => {
                error!(error = %e, "Error loading notes");
                LoadOutcome::FetchFailed
            }
        }
    }

    /// Make `id` the active note and copy its fields into the form.
    /// Unsaved form edits are discarded.
    pub fn select(&mut self, id: &NoteId) -> Result<(), DomainError> {
        let note = self
            .notes
            .iter()
            .find(|n| &n.id == id)
            .ok_or_else(|| DomainError::NoteNotFound(id.clone()))?;

        self.form = note.fields();
        self.selected = Some(id.clone());
        debug!(note_id = %id, "Selected note");
        Ok(())
    }

    pub fn new_note(&mut self) {
        self.selected = None;
        self.reset_form();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.form.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.form.content = content.into();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.form.theme = theme;
    }

    #[instrument(level = "debug", skip(self))]
    pub fn save(&mut self) {
        match self.selected.clone() {
            Some(id) => self.update_selected(&id),
            None => self.insert_new(),
        }
    }

    fn update_selected(&mut self, id: &NoteId) {
        if let Err(e) = self.repository.update_note(id, &self.form) {
            error!(note_id = %id, error = %e, "Update failed");
            self.events.notify(Toast::error("Error saving note"));
            return;
        }

        let fields = self.form.clone();
        if let Some(note) = self.notes.iter_mut().find(|n| &n.id == id) {
            note.apply(&fields);
        }
        info!(note_id = %id, "Note updated");
        self.events.notify(Toast::info("Note updated"));
    }

    fn insert_new(&mut self) {
        let Some(user) = self.auth.current_user() else {
            debug!("Save without authenticated user ignored");
            return;
        };

        let new_note = NewNote::from_fields(&self.form, &user.id);
        let inserted = match self.repository.insert_note(&new_note) {
            Ok(inserted) => inserted,
            Err(e) => {
                error!(error = %e, "Insert failed");
                self.events
                    .notify(Toast::error(format!("Error saving new note: {}", e.detail())));
                return;
            }
        };

        info!(count = inserted.len(), "Note added");
        if let Some(first) = inserted.first().filter(|n| !n.id.is_empty()) {
            self.selected = Some(first.id.clone());
            self.form = first.fields();
        }
        self.notes.extend(inserted);
        self.events.notify(Toast::info("Note added"));
    }

    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self) {
        let Some(id) = self.selected.clone() else {
            return;
        };

        if let Err(e) = self.repository.delete_note(&id) {
            error!(note_id = %id, error = %e, "Delete failed");
            self.events.notify(Toast::error("Failed to delete note"));
            return;
        }

        self.notes.retain(|n| n.id != id);
        self.selected = None;
        self.reset_form();
        info!(note_id = %id, "Note deleted");
        self.events.notify(Toast::info("Note deleted"));
    }

    #[instrument(level = "debug", skip(self))]
    pub fn logout(&mut self) {
        match self.auth.sign_out() {
            Ok(()) => {
                info!("Signed out");
                self.context.clear();
                self.events.navigate(LOGIN_ROUTE);
            }
            Err(e) => {
                error!(error = %e, "Sign out failed");
                self.events.notify(Toast::error("Error logging out"));
            }
        }
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Notes whose title contains the search query, ignoring case
    pub fn visible_notes(&self) -> Vec<&Note> {
        let needle = self.search_query.to_lowercase();
        self.notes
            .iter()
            .filter(|n| n.title.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn selected_id(&self) -> Option<&NoteId> {
        self.selected.as_ref()
    }

    pub fn selected_note(&self) -> Option<&Note> {
        let id = self.selected.as_ref()?;
        self.notes.iter().find(|n| &n.id == id)
    }

    pub fn form(&self) -> &NoteFields {
        &self.form
    }

    /// Form differs from the selected note, or from a blank form in new-note mode
    pub fn is_dirty(&self) -> bool {
        match self.selected_note() {
            Some(note) => note.fields() != self.form,
            None => self.form != NoteFields::default(),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.context
    }

    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        self.events.drain()
    }

    fn reset_form(&mut self) {
        self.form = NoteFields::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ToastLevel;
    use crate::util::testing::{note, MockAuthService, MockNoteRepository};

    fn editor_with(notes: Vec<Note>) -> NoteEditor<MockNoteRepository, MockAuthService> {
        let repo = MockNoteRepository::builder().with_notes(notes).build();
        let mut editor = NoteEditor::new(
            SessionContext::anonymous(),
            repo,
            MockAuthService::signed_in("u-1"),
        );
        editor.load();
        editor
    }

    fn toasts(editor: &mut NoteEditor<MockNoteRepository, MockAuthService>) -> Vec<Toast> {
        editor
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                EditorEvent::Toast(t) => Some(t),
                EditorEvent::Navigate(_) => None,
            })
            .collect()
    }

    #[test]
    fn given_new_editor_when_created_then_has_blank_form_and_open_sidebar() {
        let editor = NoteEditor::new(
            SessionContext::anonymous(),
            MockNoteRepository::builder().build(),
            MockAuthService::signed_in("u-1"),
        );

        assert!(editor.selected_id().is_none());
        assert_eq!(editor.form(), &NoteFields::default());
        assert_eq!(editor.form().theme, Theme::Vanilla);
        assert!(editor.sidebar_open());
        assert!(!editor.is_dirty());
    }

    #[test]
    fn given_no_user_when_loading_then_navigates_to_login_without_fetching() {
        // Arrange
        let repo = MockNoteRepository::builder()
            .with_notes(vec![note("1", "A", 1)])
            .build();
        let mut editor =
            NoteEditor::new(SessionContext::anonymous(), repo, MockAuthService::signed_out());

        // Act
        let outcome = editor.load();

        // Assert
        assert_eq!(outcome, LoadOutcome::AuthRequired);
        assert!(editor.notes().is_empty());
        assert_eq!(
            editor.drain_events(),
            vec![EditorEvent::Navigate("/login".to_string())]
        );
    }

    #[test]
    fn given_fetch_failure_when_loading_then_list_stays_empty_without_toast() {
        let repo = MockNoteRepository::builder().with_list_failure().build();
        let mut editor =
            NoteEditor::new(SessionContext::anonymous(), repo, MockAuthService::signed_in("u-1"));

        let outcome = editor.load();

        assert_eq!(outcome, LoadOutcome::FetchFailed);
        assert!(editor.notes().is_empty());
        assert!(editor.drain_events().is_empty());
    }

    #[test]
    fn given_stored_notes_when_loading_then_keeps_store_order() {
        let editor = editor_with(vec![note("1", "First", 1), note("2", "Second", 2)]);

        let titles: Vec<_> = editor.notes().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn given_note_when_selecting_then_form_matches_note() {
        let mut a = note("1", "A", 1);
        a.content = "alpha".to_string();
        a.theme = Theme::Chocolate;
        let mut editor = editor_with(vec![a]);

        editor.select(&NoteId::new("1")).unwrap();

        assert_eq!(editor.selected_id(), Some(&NoteId::new("1")));
        assert_eq!(editor.form().title, "A");
        assert_eq!(editor.form().content, "alpha");
        assert_eq!(editor.form().theme, Theme::Chocolate);
    }

    #[test]
    fn given_unsaved_edits_when_selecting_other_note_then_edits_are_discarded() {
        let mut editor = editor_with(vec![note("1", "A", 1), note("2", "B", 2)]);
        editor.select(&NoteId::new("1")).unwrap();
        editor.set_content("unsaved");
        assert!(editor.is_dirty());

        editor.select(&NoteId::new("2")).unwrap();
        editor.select(&NoteId::new("1")).unwrap();

        assert_eq!(editor.form().content, "");
        assert!(!editor.is_dirty());
    }

    #[test]
    fn given_unknown_id_when_selecting_then_returns_not_found_and_keeps_state() {
        let mut editor = editor_with(vec![note("1", "A", 1)]);

        let result = editor.select(&NoteId::new("nope"));

        assert!(matches!(result, Err(DomainError::NoteNotFound(_))));
        assert!(editor.selected_id().is_none());
    }

    #[test]
    fn given_selection_when_starting_new_note_then_form_is_reset() {
        let mut editor = editor_with(vec![note("1", "A", 1)]);
        editor.select(&NoteId::new("1")).unwrap();
        editor.set_theme(Theme::Dark);

        editor.new_note();

        assert!(editor.selected_id().is_none());
        assert_eq!(editor.form(), &NoteFields::default());
    }

    #[test]
    fn given_empty_list_when_saving_blank_new_note_then_appends_untitled_and_selects_it() {
        // Arrange
        let mut editor = editor_with(vec![]);

        // Act
        editor.save();

        // Assert
        assert_eq!(editor.notes().len(), 1);
        assert_eq!(editor.notes()[0].title, "Untitled");
        assert_eq!(editor.notes()[0].user_id.as_deref(), Some("u-1"));
        assert_eq!(editor.selected_id(), Some(&editor.notes()[0].id.clone()));
        assert_eq!(editor.form().title, "Untitled");
        assert_eq!(toasts(&mut editor), vec![Toast::info("Note added")]);
    }

    #[test]
    fn given_inserted_note_when_saving_again_then_updates_the_stored_row() {
        // Arrange
        let mut editor = editor_with(vec![]);
        editor.set_title("Draft");
        editor.save();
        editor.drain_events();

        // Act
        editor.set_content("second pass");
        editor.save();

        // Assert
        assert_eq!(editor.notes().len(), 1);
        assert_eq!(editor.selected_id(), Some(&NoteId::new("new-1")));
        assert_eq!(editor.notes()[0].content, "second pass");
        assert_eq!(toasts(&mut editor), vec![Toast::info("Note updated")]);
    }

    #[test]
    fn given_titled_new_note_when_saving_then_keeps_title_and_theme() {
        let mut editor = editor_with(vec![note("1", "A", 1)]);
        editor.set_title("Work");
        editor.set_content("tasks");
        editor.set_theme(Theme::Light);

        editor.save();

        assert_eq!(editor.notes().len(), 2);
        let added = &editor.notes()[1];
        assert_eq!(added.title, "Work");
        assert_eq!(added.content, "tasks");
        assert_eq!(added.theme, Theme::Light);
    }

    #[test]
    fn given_insert_failure_when_saving_new_note_then_reports_detail_and_keeps_list() {
        let repo = MockNoteRepository::builder()
            .with_insert_failure("title too long")
            .build();
        let mut editor =
            NoteEditor::new(SessionContext::anonymous(), repo, MockAuthService::signed_in("u-1"));
        editor.load();

        editor.save();

        assert!(editor.notes().is_empty());
        assert!(editor.selected_id().is_none());
        let toasts = toasts(&mut editor);
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].level, ToastLevel::Error);
        assert_eq!(toasts[0].message, "Error saving new note: title too long");
    }

    #[test]
    fn given_no_user_when_saving_new_note_then_nothing_happens() {
        let mut editor = NoteEditor::new(
            SessionContext::anonymous(),
            MockNoteRepository::builder().build(),
            MockAuthService::signed_out(),
        );

        editor.save();

        assert!(editor.notes().is_empty());
        assert!(editor.drain_events().is_empty());
    }

    #[test]
    fn given_selected_note_when_saving_then_updates_in_place_and_preserves_theme() {
        // Arrange
        let mut a = note("a", "A", 1);
        a.theme = Theme::Dark;
        let mut b = note("b", "B", 2);
        b.theme = Theme::Dark;
        let mut editor = editor_with(vec![a.clone(), b]);
        editor.select(&NoteId::new("b")).unwrap();
        editor.set_content("new content");

        // Act
        editor.save();

        // Assert
        assert_eq!(editor.notes().len(), 2);
        assert_eq!(editor.notes()[0], a);
        assert_eq!(editor.notes()[1].content, "new content");
        assert_eq!(editor.notes()[1].theme, Theme::Dark);
        assert!(!editor.is_dirty());
        assert_eq!(toasts(&mut editor), vec![Toast::info("Note updated")]);
    }

    #[test]
    fn given_update_failure_when_saving_then_list_is_unchanged() {
        let repo = MockNoteRepository::builder()
            .with_notes(vec![note("1", "A", 1)])
            .with_update_failure()
            .build();
        let mut editor =
            NoteEditor::new(SessionContext::anonymous(), repo, MockAuthService::signed_in("u-1"));
        editor.load();
        editor.select(&NoteId::new("1")).unwrap();
        editor.set_title("Changed");

        editor.save();

        assert_eq!(editor.notes()[0].title, "A");
        assert_eq!(editor.form().title, "Changed");
        assert_eq!(toasts(&mut editor), vec![Toast::error("Error saving note")]);
    }

    #[test]
    fn given_selected_note_when_deleting_then_removes_it_and_resets_form() {
        let mut a = note("a", "A", 1);
        a.theme = Theme::Chocolate;
        let mut editor = editor_with(vec![a, note("b", "B", 2)]);
        editor.select(&NoteId::new("a")).unwrap();

        editor.delete();

        assert_eq!(editor.notes().len(), 1);
        assert_eq!(editor.notes()[0].id, NoteId::new("b"));
        assert!(editor.selected_id().is_none());
        assert_eq!(editor.form(), &NoteFields::default());
        assert_eq!(toasts(&mut editor), vec![Toast::info("Note deleted")]);
    }

    #[test]
    fn given_no_selection_when_deleting_then_nothing_happens() {
        let mut editor = editor_with(vec![note("a", "A", 1)]);

        editor.delete();

        assert_eq!(editor.notes().len(), 1);
        assert!(editor.drain_events().is_empty());
    }

    #[test]
    fn given_delete_failure_when_deleting_then_state_is_unchanged() {
        let repo = MockNoteRepository::builder()
            .with_notes(vec![note("a", "A", 1)])
            .with_delete_failure()
            .build();
        let mut editor =
            NoteEditor::new(SessionContext::anonymous(), repo, MockAuthService::signed_in("u-1"));
        editor.load();
        editor.select(&NoteId::new("a")).unwrap();

        editor.delete();

        assert_eq!(editor.notes().len(), 1);
        assert_eq!(editor.selected_id(), Some(&NoteId::new("a")));
        assert_eq!(toasts(&mut editor), vec![Toast::error("Failed to delete note")]);
    }

    #[test]
    fn given_signed_in_user_when_logging_out_then_navigates_to_login() {
        let mut editor = editor_with(vec![]);

        editor.logout();

        assert_eq!(
            editor.drain_events(),
            vec![EditorEvent::Navigate("/login".to_string())]
        );
    }

    #[test]
    fn given_sign_out_failure_when_logging_out_then_shows_error() {
        let mut editor = NoteEditor::new(
            SessionContext::anonymous(),
            MockNoteRepository::builder().build(),
            MockAuthService::signed_in("u-1").with_sign_out_failure(),
        );

        editor.logout();

        assert_eq!(toasts(&mut editor), vec![Toast::error("Error logging out")]);
    }

    #[test]
    fn given_search_query_when_filtering_then_matches_title_case_insensitively() {
        let mut groceries = note("1", "Groceries", 1);
        groceries.content = "work".to_string();
        let mut editor = editor_with(vec![groceries, note("2", "Work", 2)]);

        editor.set_search("WOR");
        let visible: Vec<_> = editor.visible_notes().iter().map(|n| n.title.clone()).collect();

        assert_eq!(visible, vec!["Work".to_string()]);
        assert_eq!(editor.notes().len(), 2);
    }

    #[test]
    fn given_query_without_match_when_filtering_then_visible_list_is_empty() {
        let mut editor = editor_with(vec![note("1", "Groceries", 1), note("2", "Work", 2)]);

        editor.set_search("zz");

        assert!(editor.visible_notes().is_empty());
        assert_eq!(editor.notes().len(), 2);
    }

    #[test]
    fn given_open_sidebar_when_toggling_twice_then_returns_to_open() {
        let mut editor = editor_with(vec![note("1", "A", 1)]);

        editor.toggle_sidebar();
        assert!(!editor.sidebar_open());
        editor.toggle_sidebar();

        assert!(editor.sidebar_open());
        assert_eq!(editor.notes().len(), 1);
    }
}
