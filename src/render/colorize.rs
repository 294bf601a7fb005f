use std::fmt;

use crossterm::style::{Attribute, Color, ContentStyle, StyledContent};

use crate::model::task::{Entry, capitalize};
use crate::parse::task_serializer::{SerializeError, format_date, serialize_entry};
use crate::render::theme::Theme;

/// A task line split into styled segments. `Display` writes ANSI escapes;
/// `plain` gives back the canonical text.
#[derive(Debug, Clone, Default)]
pub struct StyledLine {
    segments: Vec<StyledContent<String>>,
}

impl StyledLine {
    fn push(&mut self, text: impl Into<String>, style: ContentStyle) {
        self.segments.push(StyledContent::new(style, text.into()));
    }

    pub fn segments(&self) -> &[StyledContent<String>] {
        &self.segments
    }

    /// The text without any styling
    pub fn plain(&self) -> String {
        self.segments.iter().map(|s| s.content().as_str()).collect()
    }
}

impl fmt::Display for StyledLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

fn style(color: Option<Color>, bold: bool) -> ContentStyle {
    let mut style = ContentStyle::new();
    style.foreground_color = color;
    if bold {
        style.attributes.set(Attribute::Bold);
    }
    style
}

/// Render an entry for display. Comments and deferred tasks are inert and
/// come out as one neutral segment; other tasks get per-field styles in
/// canonical field order.
pub fn colorize(entry: &Entry, theme: &Theme) -> Result<StyledLine, SerializeError> {
    let neutral = style(Some(theme.neutral), false);
    let mut line = StyledLine::default();

    let task = match entry {
        Entry::Task(task) if !task.later && !task.has_deferral_tag() => task,
        _ => {
            line.push(serialize_entry(entry)?, neutral);
            return Ok(line);
        }
    };

    let description = task.description.trim();
    if description.is_empty() {
        return Err(SerializeError::EmptyDescription);
    }

    if let Some(priority) = task.priority {
        line.push("(", neutral);
        line.push(
            priority.letter(),
            style(Some(theme.priority_color(priority)), true),
        );
        line.push(") ", neutral);
    }
    if let Some(due) = task.due_date {
        line.push(".", neutral);
        line.push(
            format!("{} ", format_date(due)),
            style(Some(theme.due_date), true),
        );
    }
    line.push(format!("{} ", format_date(task.creation_date)), neutral);
    line.push(capitalize(description), style(None, true));

    if let Some(ref project) = task.project {
        line.push(" +", neutral);
        line.push(project.name.as_str(), style(Some(theme.project), false));
        if project.seq != 0 {
            line.push(
                format!("#{}", project.seq),
                style(Some(theme.project_seq), false),
            );
        }
    }

    for tag in &task.tags {
        let tag = tag.trim().to_uppercase();
        if tag.is_empty() {
            continue;
        }
        line.push(" :", neutral);
        let color = theme.tag_color(&tag);
        line.push(tag, style(Some(color), false));
    }

    Ok(line)
}
