use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::NamedTempFile;

use crate::error::{StoreError, ValidationError};
use crate::task::{parse_due, Priority, Task, TaskId};

#[derive(Debug, Clone)]
struct Entry {
    id: TaskId,
    task: Task,
}

/// Ordered task list mirrored to a single JSON file.
///
/// Every mutation rewrites the whole file. Order is insertion order.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    entries: Vec<Entry>,
    next_id: u64,
}

impl TaskStore {
    /// An empty store backed by `path`. Nothing is read or written.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Create a store for `path` and load whatever is already there.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let mut store = Self::new(path);
        store.load()?;
        Ok(store)
    }

    /// Replace the in-memory list with the contents of the backing file.
    ///
    /// A missing or blank file yields an empty list. A file that is not a
    /// JSON array of tasks is an error and the in-memory list is untouched.
    pub fn load(&mut self) -> Result<(), StoreError> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "no task file yet, starting empty");
            self.entries.clear();
            return Ok(());
        }

        let data = fs::read_to_string(&self.path).map_err(|e| StoreError::Read {
            path: self.path.clone(),
            source: e,
        })?;
        let tasks: Vec<Task> = if data.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&data).map_err(|e| StoreError::Parse {
                path: self.path.clone(),
                source: e,
            })?
        };

        let entries: Vec<Entry> = tasks
            .into_iter()
            .map(|task| Entry {
                id: self.allocate_id(),
                task,
            })
            .collect();
        self.entries = entries;
        tracing::info!(path = %self.path.display(), count = self.entries.len(), "loaded tasks");
        Ok(())
    }

    /// Validate and append a new not-done task, then persist.
    pub fn add(
        &mut self,
        description: &str,
        priority: Priority,
        due_text: &str,
    ) -> Result<TaskId, StoreError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription.into());
        }
        let due_text = due_text.trim();
        let due = parse_due(due_text).ok_or_else(|| ValidationError::InvalidDueDate {
            input: due_text.to_string(),
        })?;

        let id = self.allocate_id();
        self.entries.push(Entry {
            id,
            task: Task::new(description, priority, due),
        });
        if let Err(err) = self.save() {
            self.entries.pop();
            return Err(err);
        }
        tracing::debug!(%id, %priority, %due, "added task");
        Ok(id)
    }

    /// Flip the done flag of `id` and persist. Returns the new value.
    pub fn toggle_done(&mut self, id: TaskId) -> Result<bool, StoreError> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::UnknownTask(id))?;

        self.entries[pos].task.done = !self.entries[pos].task.done;
        if let Err(err) = self.save() {
            self.entries[pos].task.done = !self.entries[pos].task.done;
            return Err(err);
        }
        let done = self.entries[pos].task.done;
        tracing::debug!(%id, done, "toggled task");
        Ok(done)
    }

    /// Rewrite the backing file with the full list.
    pub fn save(&self) -> Result<(), StoreError> {
        let tasks: Vec<&Task> = self.entries.iter().map(|e| &e.task).collect();
        let json = serde_json::to_string_pretty(&tasks)?;
        atomic_write(&self.path, json.as_bytes()).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "failed to save tasks");
            StoreError::Write {
                path: self.path.clone(),
                source: e,
            }
        })?;
        tracing::debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }

    /// Not-done tasks due on `today`, in list order.
    pub fn due_today(&self, today: NaiveDate) -> Vec<(TaskId, &Task)> {
        self.iter()
            .filter(|(_, t)| !t.done && t.due == today)
            .collect()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.task)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TaskId, &Task)> + '_ {
        self.entries.iter().map(|e| (e.id, &e.task))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn allocate_id(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        id
    }
}

/// Write to a temp file beside `path`, then rename it over `path`.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::DUE_FORMAT;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DUE_FORMAT).unwrap()
    }

    fn store_in(tmp: &TempDir) -> TaskStore {
        TaskStore::open(tmp.path().join("tasks.json")).unwrap()
    }

    fn snapshot(store: &TaskStore) -> Vec<Task> {
        store.iter().map(|(_, t)| t.clone()).collect()
    }

    #[test]
    fn missing_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        assert!(store.is_empty());
        assert!(!tmp.path().join("tasks.json").exists());
    }

    #[test]
    fn blank_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("tasks.json"), "  \n").unwrap();
        assert!(store_in(&tmp).is_empty());
    }

    #[test]
    fn malformed_file_fails_and_is_left_alone() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        fs::write(&path, r#"[{"task": "half"#).unwrap();

        let err = TaskStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }), "got {err:?}");
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"[{"task": "half"#);
    }

    #[test]
    fn failed_reload_keeps_memory() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);
        store.add("Keep me", Priority::Low, "2030-01-01").unwrap();
        fs::write(store.path(), "{not json").unwrap();

        assert!(store.load().is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn empty_description_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);

        let err = store.add("   ", Priority::High, "2099-01-01").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::EmptyDescription)
        ));
        assert!(store.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn invalid_month_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);

        let err = store.add("Pay rent", Priority::Low, "2024-13-01").unwrap_err();
        match err {
            StoreError::Validation(ValidationError::InvalidDueDate { input }) => {
                assert_eq!(input, "2024-13-01")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(store.is_empty());
    }

    #[test]
    fn non_iso_dates_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);
        for bad in ["", "01/02/2024", "2024-02-30", "tomorrow"] {
            assert!(store.add("x", Priority::Low, bad).is_err(), "accepted {bad:?}");
        }
        assert!(store.is_empty());
    }

    #[test]
    fn short_or_signed_years_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);
        for bad in ["24-1-1", "0-1-1", "+2024-01-01", "-0001-01-01"] {
            let err = store.add("x", Priority::Low, bad).unwrap_err();
            assert!(
                matches!(
                    err,
                    StoreError::Validation(ValidationError::InvalidDueDate { .. })
                ),
                "accepted {bad:?}"
            );
        }
        assert!(store.is_empty());
        assert!(!store.path().exists());

        store.add("x", Priority::Low, "2024-1-1").unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_appends_not_done_in_order() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);
        store.add("First", Priority::Low, "2030-05-05").unwrap();
        let id = store
            .add("  Buy milk ", Priority::Medium, " 2099-01-01 ")
            .unwrap();

        assert_eq!(store.len(), 2);
        let last = store.iter().last().unwrap();
        assert_eq!(last.0, id);
        assert_eq!(
            last.1,
            &Task::new("Buy milk", Priority::Medium, date("2099-01-01"))
        );
        assert!(!store.get(id).unwrap().done);
    }

    #[test]
    fn add_persists_immediately() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);
        store.add("Buy milk", Priority::Medium, "2099-01-01").unwrap();

        let reopened = store_in(&tmp);
        assert_eq!(snapshot(&reopened), snapshot(&store));
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);
        store.add("One", Priority::High, "2024-02-29").unwrap();
        let two = store.add("Two", Priority::Low, "2025-12-31").unwrap();
        store.add("Three", Priority::Medium, "2026-01-01").unwrap();
        store.toggle_done(two).unwrap();
        store.save().unwrap();

        let mut other = TaskStore::new(store.path());
        other.load().unwrap();
        assert_eq!(snapshot(&other), snapshot(&store));
    }

    #[test]
    fn toggle_twice_restores_and_persists() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);
        let a = store.add("A", Priority::Low, "2030-01-01").unwrap();
        let b = store.add("B", Priority::Low, "2030-01-01").unwrap();

        assert!(store.toggle_done(b).unwrap());
        assert!(!store.get(a).unwrap().done);
        assert!(store_in(&tmp).iter().nth(1).unwrap().1.done);

        assert!(!store.toggle_done(b).unwrap());
        assert!(!store_in(&tmp).iter().nth(1).unwrap().1.done);
    }

    #[test]
    fn toggle_unknown_id_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);
        store.add("A", Priority::Low, "2030-01-01").unwrap();

        let err = store.toggle_done(TaskId(999)).unwrap_err();
        assert!(matches!(err, StoreError::UnknownTask(TaskId(999))));
    }

    #[test]
    fn ids_stay_unique_across_reload() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);
        let first = store.add("A", Priority::Low, "2030-01-01").unwrap();
        store.load().unwrap();
        let second = store.add("B", Priority::Low, "2030-01-01").unwrap();

        let ids: Vec<TaskId> = store.iter().map(|(id, _)| id).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert!(!ids.contains(&first));
        assert_eq!(ids[1], second);
    }

    #[test]
    fn due_today_skips_done_and_other_days() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp);
        let today = date("2026-10-19");
        let open = store.add("Open today", Priority::High, "2026-10-19").unwrap();
        let closed = store.add("Done today", Priority::Low, "2026-10-19").unwrap();
        store.add("Tomorrow", Priority::Low, "2026-10-20").unwrap();
        store.toggle_done(closed).unwrap();

        let due: Vec<TaskId> = store.due_today(today).into_iter().map(|(id, _)| id).collect();
        assert_eq!(due, vec![open]);
    }

    #[test]
    fn failed_write_rolls_back() {
        let tmp = TempDir::new().unwrap();
        // A directory where the file should be makes the rename fail.
        let path = tmp.path().join("tasks.json");
        fs::create_dir(&path).unwrap();
        let mut store = TaskStore::new(&path);

        let err = store.add("A", Priority::Low, "2030-01-01").unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }), "got {err:?}");
        assert!(store.is_empty());
    }

    #[test]
    fn save_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/tasks.json");
        let mut store = TaskStore::new(&path);
        store.add("A", Priority::Low, "2030-01-01").unwrap();
        assert!(path.is_file());
    }
}
