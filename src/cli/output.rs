use serde::Serialize;

use crate::model::task::Entry;
use crate::ops::store::AddOutcome;
use crate::parse::{SerializeError, serialize_entry};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct EntryJson {
    /// Canonical line
    pub text: String,
    pub comment: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub later: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_seq: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AddOutcomeJson {
    pub added: usize,
    pub duplicates: usize,
    pub rejected: Vec<String>,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

pub fn entry_to_json(entry: &Entry) -> Result<EntryJson, SerializeError> {
    let text = serialize_entry(entry)?;
    let Some(task) = entry.as_task() else {
        return Ok(EntryJson {
            text,
            comment: true,
            later: false,
            priority: None,
            due: None,
            created: None,
            description: None,
            project: None,
            project_seq: None,
            tags: Vec::new(),
        });
    };
    Ok(EntryJson {
        text,
        comment: false,
        later: task.later,
        priority: task.priority.map(|p| p.letter()),
        due: task.due_date.map(|d| d.to_string()),
        created: Some(task.creation_date.to_string()),
        description: Some(task.description.clone()),
        project: task.project.as_ref().map(|p| p.name.clone()),
        project_seq: task.project.as_ref().map(|p| p.seq).filter(|&seq| seq != 0),
        tags: task.tags.iter().cloned().collect(),
    })
}

pub fn add_outcome_to_json(outcome: &AddOutcome) -> AddOutcomeJson {
    AddOutcomeJson {
        added: outcome.added,
        duplicates: outcome.duplicates,
        rejected: outcome.rejected.clone(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One-line summary of an `add` run
pub fn format_add_summary(outcome: &AddOutcome) -> String {
    let mut parts = vec![format!("added {}", plural(outcome.added, "task"))];
    if outcome.duplicates > 0 {
        parts.push(format!("{} already present", outcome.duplicates));
    }
    if !outcome.rejected.is_empty() {
        parts.push(format!("{} rejected", outcome.rejected.len()));
    }
    parts.join(", ")
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{} {}", n, noun)
    } else {
        format!("{} {}s", n, noun)
    }
}
