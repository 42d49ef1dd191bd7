use std::fmt;

use crate::task::{Task, TaskId, DUE_FORMAT};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Done,
    NotDone,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [
        StatusFilter::All,
        StatusFilter::Done,
        StatusFilter::NotDone,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Done => "Done",
            StatusFilter::NotDone => "Not Done",
        }
    }

    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Done,
            StatusFilter::Done => StatusFilter::NotDone,
            StatusFilter::NotDone => StatusFilter::All,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::NotDone,
            StatusFilter::Done => StatusFilter::All,
            StatusFilter::NotDone => StatusFilter::Done,
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Done => task.done,
            StatusFilter::NotDone => !task.done,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The tasks to show for the current search text and status filter.
///
/// Keeps list order and each task's id. The query is trimmed and matched
/// case-insensitively anywhere in the description; an empty query matches
/// everything.
pub fn visible<'a, I>(tasks: I, query: &str, status: StatusFilter) -> Vec<(TaskId, &'a Task)>
where
    I: IntoIterator<Item = (TaskId, &'a Task)>,
{
    let needle = query.trim().to_lowercase();
    tasks
        .into_iter()
        .filter(|(_, task)| status.matches(task))
        .filter(|(_, task)| {
            needle.is_empty() || task.description.to_lowercase().contains(&needle)
        })
        .collect()
}

/// One list row: `description | Due: date | priority`, plus a check when done.
pub fn row_text(task: &Task) -> String {
    let mut text = format!(
        "{} | Due: {} | {}",
        task.description,
        task.due.format(DUE_FORMAT),
        task.priority
    );
    if task.done {
        text.push_str(" ✔");
    }
    text
}

/// Body of the due-today popup.
pub fn reminder_text<'a, I>(tasks: I) -> String
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks
        .into_iter()
        .map(|t| format!("- {} (Priority: {})", t.description, t.priority))
        .collect::<Vec<_>>()
        .join("\n")
}
