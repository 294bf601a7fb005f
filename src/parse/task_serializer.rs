use chrono::NaiveDate;

use crate::model::task::{Entry, Task, capitalize};
use crate::parse::task_parser::DEFERRAL_MARKER;

/// Date format used in canonical lines
pub const DATE_FORMAT: &str = "%y-%m-%d";

/// Only reachable when a task is built by hand with a blank description;
/// the parser never produces one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerializeError {
    #[error("cannot serialize a task with an empty description")]
    EmptyDescription,
}

/// Canonical text of an entry. Comments are emitted verbatim.
pub fn serialize_entry(entry: &Entry) -> Result<String, SerializeError> {
    match entry {
        Entry::Task(task) => serialize_task(task),
        Entry::Comment(text) => Ok(text.clone()),
    }
}

/// Canonical line for a task:
/// `[; ][(X) ][.YY-MM-DD ]YY-MM-DD Description[ +name[#seq]][ :TAG]...`
pub fn serialize_task(task: &Task) -> Result<String, SerializeError> {
    let description = task.description.trim();
    if description.is_empty() {
        return Err(SerializeError::EmptyDescription);
    }

    let mut line = String::new();

    if task.has_deferral_tag() {
        line.push_str(DEFERRAL_MARKER);
    }
    if let Some(priority) = task.priority {
        line.push_str(&format!("({}) ", priority));
    }
    if let Some(due) = task.due_date {
        line.push_str(&format!(".{} ", format_date(due)));
    }
    line.push_str(&format!("{} ", format_date(task.creation_date)));
    line.push_str(&capitalize(description));

    if let Some(ref project) = task.project {
        line.push_str(&format!(" +{}", project.name));
        if project.seq != 0 {
            line.push_str(&format!("#{}", project.seq));
        }
    }

    for tag in &task.tags {
        let tag = tag.trim();
        if !tag.is_empty() {
            line.push_str(&format!(" :{}", tag.to_uppercase()));
        }
    }

    Ok(line)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
