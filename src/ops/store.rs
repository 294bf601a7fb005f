use std::collections::HashSet;

use indexmap::IndexMap;
use indexmap::map::Entry as MapEntry;
use tracing::{debug, warn};

use crate::model::task::{Entry, EntryKey};
use crate::parse::{ParseContext, SerializeError, parse_entry, serialize_entry};

/// Deduplicated collection of todo entries, keyed by semantic equality.
/// The first entry inserted for a key wins.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    entries: IndexMap<EntryKey, Entry>,
}

/// Result of merging new task texts into the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddOutcome {
    /// Newly inserted tasks
    pub added: usize,
    /// Tasks whose key was already present
    pub duplicates: usize,
    /// Inputs that did not parse; they are not stored
    pub rejected: Vec<String>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from the contents of a todo file. Lines that do not
    /// parse are kept as comments so no data is lost; blank lines are dropped.
    pub fn from_text(text: &str, ctx: &ParseContext) -> Self {
        let mut store = TaskStore::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry = match parse_entry(line, ctx) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(
                        line = idx + 1,
                        "this line will be commented because it is not well formatted ({e}): {}",
                        line.trim()
                    );
                    Entry::comment(line)
                }
            };
            if !store.insert(entry) {
                debug!(line = idx + 1, "dropping duplicate entry");
            }
        }
        store
    }

    /// Insert an entry unless one with the same key exists.
    /// Returns whether it was inserted.
    pub fn insert(&mut self, entry: Entry) -> bool {
        match self.entries.entry(entry.key()) {
            MapEntry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
            MapEntry::Occupied(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Parse and merge user-supplied texts. A text starting with `;;` is
    /// added as a comment. Unlike `from_text`, malformed input is reported
    /// and skipped rather than kept as a comment.
    pub fn add<S: AsRef<str>>(&mut self, texts: &[S], ctx: &ParseContext) -> AddOutcome {
        let mut outcome = AddOutcome::default();
        for text in texts {
            let text = text.as_ref();
            match parse_entry(text, ctx) {
                Ok(entry) => {
                    if self.insert(entry) {
                        outcome.added += 1;
                    } else {
                        debug!("task already present: {}", text.trim());
                        outcome.duplicates += 1;
                    }
                }
                Err(e) => {
                    warn!("malformed task ({e}): {}", text.trim());
                    outcome.rejected.push(text.to_string());
                }
            }
        }
        outcome
    }

    /// Entries paired with their canonical text, sorted by that text
    pub fn sorted(&self) -> Result<Vec<(String, &Entry)>, SerializeError> {
        let mut rows = self
            .entries
            .values()
            .map(|entry| serialize_entry(entry).map(|text| (text, entry)))
            .collect::<Result<Vec<_>, _>>()?;
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(rows)
    }

    /// Entries to display, sorted by canonical text. A non-empty filter
    /// keeps only tasks carrying at least one of the tags (case-insensitive);
    /// comments never match a filter.
    pub fn list<S: AsRef<str>>(&self, tag_filter: &[S]) -> Result<Vec<&Entry>, SerializeError> {
        let filter: HashSet<String> = tag_filter
            .iter()
            .map(|t| t.as_ref().trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .collect();

        Ok(self
            .sorted()?
            .into_iter()
            .map(|(_, entry)| entry)
            .filter(|entry| {
                filter.is_empty()
                    || entry
                        .as_task()
                        .is_some_and(|task| task.tags.iter().any(|tag| filter.contains(tag)))
            })
            .collect())
    }

    /// Full file contents: one canonical line per entry, each `\n`-terminated
    pub fn to_text(&self) -> Result<String, SerializeError> {
        let mut out = String::new();
        for (line, _) in self.sorted()? {
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out)
    }
}
