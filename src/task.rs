use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used for the `due` field, both on disk and in the input box.
pub const DUE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` due date.
///
/// The year must be exactly four unsigned digits; month and day take one or
/// two digits. chrono alone would also take short or signed years.
pub fn parse_due(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split('-');
    let shape_ok = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(y), Some(m), Some(d), None) => {
            all_digits(y, 4..=4) && all_digits(m, 1..=2) && all_digits(d, 1..=2)
        }
        _ => false,
    };
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(text, DUE_FORMAT).ok()
}

fn all_digits(s: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Priority::Low => Priority::High,
            Priority::Medium => Priority::Low,
            Priority::High => Priority::Medium,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable in-process handle for a task held by the store.
///
/// Assigned when a record enters the store and never reused. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One to-do record, serialized with the keys `task`, `priority`, `due`, `done`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    #[serde(rename = "task")]
    pub description: String,
    pub priority: Priority,
    #[serde(with = "due_date")]
    pub due: NaiveDate,
    #[serde(default)]
    pub done: bool,
}

impl Task {
    pub fn new(description: impl Into<String>, priority: Priority, due: NaiveDate) -> Self {
        Self {
            description: description.into(),
            priority,
            due,
            done: false,
        }
    }
}

mod due_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{parse_due, DUE_FORMAT};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(DUE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_due(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid due date {s:?}")))
    }
}
