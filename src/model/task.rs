use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use indexmap::IndexSet;

/// Marker that starts an inert comment line
pub const COMMENT_MARKER: &str = ";;";

/// Tag derived for tasks whose due date has passed
pub const OVERDUE_TAG: &str = "OVERDUE";

/// Tag derived from the leading `; ` deferral marker
pub const LATER_TAG: &str = "LATER";

/// Tag that defers a task without the marker being re-derived
pub const WAITING_TAG: &str = "WAITING";

/// Tags that make a task deferred
pub const DEFERRAL_TAGS: [&str; 2] = [LATER_TAG, WAITING_TAG];

/// Task priority, a single letter `A`..`Z`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(char);

impl Priority {
    pub const A: Priority = Priority('A');
    pub const B: Priority = Priority('B');
    pub const C: Priority = Priority('C');

    /// Parse a priority letter. Only uppercase ASCII letters are valid.
    pub fn from_char(c: char) -> Option<Priority> {
        c.is_ascii_uppercase().then_some(Priority(c))
    }

    /// The priority letter
    pub fn letter(self) -> char {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Project reference: `+name` with an optional `#seq`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Project name (no whitespace, no `#`)
    pub name: String,
    /// Sequence number within the project; 0 means none
    pub seq: u32,
}

impl Project {
    pub fn new(name: impl Into<String>, seq: u32) -> Self {
        Project {
            name: name.into(),
            seq,
        }
    }
}

/// A parsed, normalized task line
#[derive(Debug, Clone)]
pub struct Task {
    /// Deferred, either by the `; ` marker or a `LATER`/`WAITING` tag
    pub later: bool,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub creation_date: NaiveDate,
    /// Task text; never empty, never contains `:`, `+` or a newline
    pub description: String,
    pub project: Option<Project>,
    /// Uppercase tags in insertion order
    pub tags: IndexSet<String>,
}

impl Task {
    /// Create a bare task with just a description and creation date
    pub fn new(description: impl Into<String>, creation_date: NaiveDate) -> Self {
        Task {
            later: false,
            priority: None,
            due_date: None,
            creation_date,
            description: description.into(),
            project: None,
            tags: IndexSet::new(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Whether the tag set carries `LATER` or `WAITING`
    pub fn has_deferral_tag(&self) -> bool {
        has_deferral_tag(&self.tags)
    }

    pub fn is_overdue(&self) -> bool {
        self.has_tag(OVERDUE_TAG)
    }

    /// Dedup key: due date plus the lowercased description
    pub fn key(&self) -> EntryKey {
        EntryKey {
            due_date: self.due_date,
            text: self.description.trim().to_lowercase(),
        }
    }
}

pub(crate) fn has_deferral_tag(tags: &IndexSet<String>) -> bool {
    DEFERRAL_TAGS.iter().any(|t| tags.contains(*t))
}

/// Uppercase the first character, leaving the rest untouched
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One line of the todo file: a task, or an inert comment
#[derive(Debug, Clone)]
pub enum Entry {
    Task(Task),
    /// Literal comment text, always starting with the comment marker
    Comment(String),
}

impl Entry {
    /// Wrap a line as a comment, prefixing the marker unless already present
    pub fn comment(line: &str) -> Entry {
        let line = line.trim();
        if line.starts_with(COMMENT_MARKER) {
            Entry::Comment(line.to_string())
        } else {
            Entry::Comment(format!("{} {}", COMMENT_MARKER, line))
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Entry::Comment(_))
    }

    pub fn as_task(&self) -> Option<&Task> {
        match self {
            Entry::Task(task) => Some(task),
            Entry::Comment(_) => None,
        }
    }

    pub fn key(&self) -> EntryKey {
        match self {
            Entry::Task(task) => task.key(),
            Entry::Comment(text) => EntryKey {
                due_date: None,
                text: text.clone(),
            },
        }
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Entry {}

impl Hash for Entry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Semantic identity of an entry. Two entries with the same key collide
/// even when their tags, priority or project differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub due_date: Option<NaiveDate>,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_priority_from_char() {
        assert_eq!(Priority::from_char('A'), Some(Priority::A));
        assert_eq!(Priority::from_char('Z').map(Priority::letter), Some('Z'));
        assert_eq!(Priority::from_char('a'), None);
        assert_eq!(Priority::from_char('1'), None);
        assert!(Priority::A < Priority::B);
    }

    #[test]
    fn test_comment_wrapping() {
        assert!(matches!(Entry::comment("garbage :x"), Entry::Comment(t) if t == ";; garbage :x"));
        assert!(matches!(Entry::comment(";; kept as is  "), Entry::Comment(t) if t == ";; kept as is"));
        assert!(Entry::comment("x").is_comment());
    }

    #[test]
    fn test_task_key_ignores_case_and_extra_fields() {
        let mut a = Task::new("Buy milk", date(2024, 1, 1));
        let mut b = Task::new("buy MILK", date(2024, 2, 2));
        b.tags.insert("HOME".into());
        b.priority = Some(Priority::B);
        assert_eq!(Entry::Task(a.clone()), Entry::Task(b.clone()));

        a.due_date = Some(date(2024, 3, 1));
        assert_ne!(Entry::Task(a), Entry::Task(b));
    }

    #[test]
    fn test_comment_key_uses_text() {
        assert_eq!(Entry::comment("same"), Entry::comment(";; same"));
        assert_ne!(Entry::comment("one"), Entry::comment("two"));
    }

    #[test]
    fn test_deferral_tags() {
        let mut task = Task::new("Read book", date(2024, 1, 1));
        assert!(!task.has_deferral_tag());
        task.tags.insert(WAITING_TAG.into());
        assert!(task.has_deferral_tag());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("buy milk"), "Buy milk");
        assert_eq!(capitalize("iPhone repair"), "IPhone repair");
        assert_eq!(capitalize("été"), "Été");
        assert_eq!(capitalize(""), "");
    }
}
