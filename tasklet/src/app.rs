//! Application state and event handling.
//!
//! [`App`] owns the [`TaskManager`] plus the purely local UI state: the new
//! task input, which pane has focus, the selected row and the row being
//! edited. Key events that express a user intent come back out of
//! [`App::handle_key_event`] as a [`Pending`] mutation for the caller to
//! dispatch.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tasklet_proto::{MAX_TASK_TITLE_LENGTH, Task, TaskId};

use crate::net::Completion;
use crate::tasks::{Pending, Settled, TaskManager};

/// Which pane is currently focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// New task input (default).
    Input,
    /// Task list.
    List,
}

/// Single-line text buffer with a character cursor.
///
/// Input stops at [`MAX_TASK_TITLE_LENGTH`] characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    text: String,
    /// Cursor position in characters, not bytes.
    cursor: usize,
}

impl TextField {
    /// Creates an empty field.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            text: String::new(),
            cursor: 0,
        }
    }

    /// Creates a field holding `text` with the cursor at the end.
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    /// Current contents.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in characters.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the field holds no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Empties the field.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Applies an editing key. Returns `false` if the key is not an editing key.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert(c);
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.char_count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.char_count(),
            _ => return false,
        }
        true
    }

    /// Inserts `c` at the cursor unless the field is full.
    pub fn insert(&mut self, c: char) {
        if self.char_count() >= MAX_TASK_TITLE_LENGTH {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Removes the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
    }

    /// Removes the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(i, _)| i)
    }
}

/// Inline edit of one task's title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    /// Task being edited.
    pub id: TaskId,
    /// Draft title.
    pub draft: TextField,
}

/// Main application state.
pub struct App {
    /// Local task collection and banner error.
    pub tasks: TaskManager,
    /// New task input.
    pub input: TextField,
    /// Which pane is focused.
    pub focus: Focus,
    /// Selected row in the task list.
    pub selected: usize,
    /// Row being edited, if any.
    pub editing: Option<EditState>,
    /// Remote endpoint shown in the header.
    pub endpoint: String,
    /// Title shown in the header.
    pub header_title: String,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates an app showing `endpoint` with an unloaded task list.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            tasks: TaskManager::new(),
            input: TextField::new(),
            focus: Focus::Input,
            selected: 0,
            editing: None,
            endpoint: endpoint.into(),
            header_title: crate::config::DEFAULT_HEADER_TITLE.to_string(),
            should_quit: false,
        }
    }

    /// Sets the header title.
    #[must_use]
    pub fn with_header_title(mut self, title: impl Into<String>) -> Self {
        self.header_title = title.into();
        self
    }

    /// The task under the selection cursor.
    #[must_use]
    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.tasks()?.get(self.selected)
    }

    /// Handle a key event.
    ///
    /// Returns the mutation to dispatch when the key expressed one.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<Pending> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }

        if self.editing.is_some() {
            return self.handle_edit_key(key);
        }

        if matches!(key.code, KeyCode::Tab | KeyCode::BackTab) {
            self.switch_focus();
            return None;
        }

        match self.focus {
            Focus::Input => self.handle_input_key(key),
            Focus::List => self.handle_list_key(key),
        }
    }

    /// Settles a finished request and brings the view back in line.
    pub fn apply_completion(&mut self, completion: Completion) -> Settled {
        let settled = self.tasks.settle(completion.pending, completion.outcome);
        self.sync_view();
        settled
    }

    /// Handle key event when the input is focused.
    fn handle_input_key(&mut self, key: KeyEvent) -> Option<Pending> {
        match key.code {
            KeyCode::Enter => self.submit_input(),
            KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            _ => {
                self.input.handle_key(key);
                None
            }
        }
    }

    /// Handle key event when the task list is focused.
    fn handle_list_key(&mut self, key: KeyEvent) -> Option<Pending> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(self.row_count().saturating_sub(1));
                None
            }
            KeyCode::Char(' ' | 'x') | KeyCode::Enter => {
                let task = self.selected_task()?.clone();
                self.tasks.begin_toggle(&task).ok()
            }
            KeyCode::Char('e') => {
                self.start_edit();
                None
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                let task = self.selected_task()?.clone();
                let pending = self.tasks.begin_delete(&task).ok();
                self.sync_view();
                pending
            }
            KeyCode::Char('r') => Some(self.tasks.begin_refresh()),
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            _ => None,
        }
    }

    /// Handle key event while a row is being edited.
    fn handle_edit_key(&mut self, key: KeyEvent) -> Option<Pending> {
        match key.code {
            KeyCode::Enter => self.save_edit(),
            KeyCode::Esc => {
                self.editing = None;
                None
            }
            _ => {
                if let Some(edit) = self.editing.as_mut() {
                    edit.draft.handle_key(key);
                }
                None
            }
        }
    }

    const fn switch_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::List,
            Focus::List => Focus::Input,
        };
    }

    /// Starts an add from the input; the input is cleared once accepted.
    fn submit_input(&mut self) -> Option<Pending> {
        let pending = self.tasks.begin_add(self.input.text()).ok()?;
        self.input.clear();
        // The new row is prepended, keep the selection on the same task.
        self.selected += 1;
        self.sync_view();
        Some(pending)
    }

    /// Enters edit mode on the selected row with its title as the draft.
    ///
    /// Placeholder rows cannot be edited until the server confirms them.
    fn start_edit(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        if task.id.is_synthetic() {
            return;
        }
        self.editing = Some(EditState {
            id: task.id,
            draft: TextField::with_text(task.title.clone()),
        });
    }

    /// Starts a rename from the draft. Edit mode stays open if it is rejected.
    fn save_edit(&mut self) -> Option<Pending> {
        let edit = self.editing.as_ref()?;
        let Some(task) = self.tasks.get(edit.id).cloned() else {
            self.editing = None;
            return None;
        };
        let pending = self.tasks.begin_rename(&task, edit.draft.text()).ok()?;
        self.editing = None;
        Some(pending)
    }

    fn row_count(&self) -> usize {
        self.tasks.tasks().map_or(0, <[Task]>::len)
    }

    /// Clamps the selection and drops an edit whose task is gone.
    fn sync_view(&mut self) {
        self.selected = self.selected.min(self.row_count().saturating_sub(1));
        if let Some(edit) = &self.editing
            && self.tasks.get(edit.id).is_none()
        {
            tracing::debug!(id = %edit.id, "edited task disappeared; cancelling edit");
            self.editing = None;
        }
    }
}
