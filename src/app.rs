use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::{StoreError, ValidationError};
use crate::store::TaskStore;
use crate::task::{Priority, Task, TaskId};
use crate::view::{self, StatusFilter};

/// Which widget receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Status,
    Description,
    Priority,
    DueDate,
    AddButton,
    List,
}

impl Focus {
    const RING: [Focus; 7] = [
        Focus::Search,
        Focus::Status,
        Focus::Description,
        Focus::Priority,
        Focus::DueDate,
        Focus::AddButton,
        Focus::List,
    ];

    fn position(self) -> usize {
        Self::RING.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::RING[(self.position() + 1) % Self::RING.len()]
    }

    pub fn prev(self) -> Self {
        Self::RING[(self.position() + Self::RING.len() - 1) % Self::RING.len()]
    }
}

/// A modal message. While one is open it takes all key input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub title: String,
    pub message: String,
}

impl Popup {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// How a failed add or toggle is shown to the user.
    pub fn from_error(err: &StoreError) -> Self {
        match err {
            StoreError::Validation(ValidationError::EmptyDescription) => {
                Popup::new("Error", "Please enter a task description.")
            }
            StoreError::Validation(ValidationError::InvalidDueDate { .. }) => {
                Popup::new("Invalid Date", "Please use YYYY-MM-DD format.")
            }
            other => Popup::new("Save failed", other.to_string()),
        }
    }
}

/// Application state: the store plus everything the screen shows.
#[derive(Debug)]
pub struct App {
    pub store: TaskStore,
    pub search: String,
    pub status: StatusFilter,
    pub description: String,
    pub priority: Priority,
    pub due_input: String,
    pub focus: Focus,
    /// Row index into the visible list.
    pub selected: usize,
    pub popup: Option<Popup>,
    pub should_quit: bool,
}

impl App {
    /// Build the app and queue the due-today reminder if anything is due.
    pub fn new(store: TaskStore, today: NaiveDate) -> Self {
        let mut app = Self {
            store,
            search: String::new(),
            status: StatusFilter::All,
            description: String::new(),
            priority: Priority::default(),
            due_input: String::new(),
            focus: Focus::Description,
            selected: 0,
            popup: None,
            should_quit: false,
        };
        app.remind_due(today);
        app
    }

    fn remind_due(&mut self, today: NaiveDate) {
        let due = self.store.due_today(today);
        if due.is_empty() {
            return;
        }
        tracing::info!(count = due.len(), %today, "tasks due today");
        let message = view::reminder_text(due.iter().map(|(_, t)| *t));
        self.popup = Some(Popup::new("Due Today", message));
    }

    pub fn visible_tasks(&self) -> Vec<(TaskId, &Task)> {
        view::visible(self.store.iter(), &self.search, self.status)
    }

    pub fn selected_id(&self) -> Option<TaskId> {
        self.visible_tasks().get(self.selected).map(|(id, _)| *id)
    }

    /// Add a task from the form. Clears the text inputs on success and
    /// opens a popup on failure.
    pub fn submit(&mut self) {
        match self
            .store
            .add(&self.description, self.priority, &self.due_input)
        {
            Ok(_) => {
                self.description.clear();
                self.due_input.clear();
            }
            Err(err) => self.popup = Some(Popup::from_error(&err)),
        }
    }

    /// Toggle the selected row, if any.
    pub fn toggle_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        if let Err(err) = self.store.toggle_done(id) {
            self.popup = Some(Popup::from_error(&err));
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_tasks().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn reset_selection(&mut self) {
        self.selected = 0;
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.popup.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.popup = None;
            }
            return;
        }

        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Search => {
                if edit_text(&mut self.search, key) {
                    self.reset_selection();
                }
            }
            Focus::Status => {
                let before = self.status;
                self.status = match key.code {
                    KeyCode::Left => self.status.prev(),
                    KeyCode::Right | KeyCode::Char(' ') => self.status.next(),
                    _ => self.status,
                };
                if self.status != before {
                    self.reset_selection();
                }
            }
            Focus::Description => {
                if key.code == KeyCode::Enter {
                    self.submit();
                } else {
                    edit_text(&mut self.description, key);
                }
            }
            Focus::Priority => match key.code {
                KeyCode::Left => self.priority = self.priority.prev(),
                KeyCode::Right | KeyCode::Char(' ') => self.priority = self.priority.next(),
                _ => {}
            },
            Focus::DueDate => {
                if key.code == KeyCode::Enter {
                    self.submit();
                } else {
                    edit_text(&mut self.due_input, key);
                }
            }
            Focus::AddButton => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.submit();
                }
            }
            Focus::List => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.selected = self.selected.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    let len = self.visible_tasks().len();
                    if self.selected + 1 < len {
                        self.selected += 1;
                    }
                }
                KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected(),
                _ => {}
            },
        }
    }
}

/// Apply a key to a single-line text field. Returns true if the text changed.
fn edit_text(text: &mut String, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            text.push(c);
            true
        }
        KeyCode::Backspace => text.pop().is_some(),
        _ => false,
    }
}
