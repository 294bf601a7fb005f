use chrono::{Days, Local, NaiveDate};
use indexmap::IndexSet;

use crate::model::config::DEFAULT_URGENCY_DAYS;
use crate::model::task::{
    COMMENT_MARKER, Entry, LATER_TAG, OVERDUE_TAG, Priority, Project, Task, capitalize,
    has_deferral_tag,
};
use crate::parse::cursor::Cursor;

/// Leading marker for a deferred task
pub const DEFERRAL_MARKER: &str = "; ";

/// Why a line did not match the task grammar. Callers treat every variant
/// the same way; the distinction only feeds diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty task description")]
    EmptyDescription,
    #[error("invalid date `{0}`")]
    InvalidDate(String),
    #[error("unexpected `{rest}` at column {column}")]
    Unexpected { column: usize, rest: String },
}

/// Date and urgency window that normalization is evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseContext {
    pub today: NaiveDate,
    pub urgency_days: u32,
}

impl ParseContext {
    pub fn new(today: NaiveDate) -> Self {
        ParseContext {
            today,
            urgency_days: DEFAULT_URGENCY_DAYS,
        }
    }

    /// Context for the local calendar date
    pub fn now() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn with_urgency_days(mut self, days: u32) -> Self {
        self.urgency_days = days;
        self
    }

    /// Last day that still counts as urgent
    pub fn urgency_deadline(&self) -> NaiveDate {
        self.today
            .checked_add_days(Days::new(u64::from(self.urgency_days)))
            .unwrap_or(NaiveDate::MAX)
    }
}

/// Fields as they appear on the line, before normalization
#[derive(Debug)]
struct RawFields<'a> {
    deferred: bool,
    priority: Option<Priority>,
    due_date: Option<NaiveDate>,
    creation_date: Option<NaiveDate>,
    description: &'a str,
    project: Option<Project>,
    tags: Vec<&'a str>,
}

/// Parse one line of the todo file. Lines starting with `;;` are comments;
/// anything else must match the task grammar.
pub fn parse_entry(line: &str, ctx: &ParseContext) -> Result<Entry, ParseError> {
    let line = line.trim();
    if line.starts_with(COMMENT_MARKER) {
        return Ok(Entry::Comment(line.to_string()));
    }
    parse_task(line, ctx).map(Entry::Task)
}

/// Parse and normalize a task line:
///
/// `[; ][(X) ][.DUE ][CREATED ]description[ +project[#seq]][ :TAG]...`
///
/// Dates are `YYYY-MM-DD` or `YY-MM-DD`.
pub fn parse_task(line: &str, ctx: &ParseContext) -> Result<Task, ParseError> {
    let fields = parse_fields(line.trim())?;
    Ok(normalize(fields, ctx))
}

fn parse_fields(line: &str) -> Result<RawFields<'_>, ParseError> {
    let mut cur = Cursor::new(line);

    let deferred = cur.eat(DEFERRAL_MARKER);

    let priority = cur.attempt(|c| {
        if !c.eat_char('(') {
            return None;
        }
        let p = c.next_char().and_then(Priority::from_char)?;
        c.eat(") ").then_some(p)
    });

    let before_due = cur.pos();
    let due_date = if cur.eat_char('.') {
        let date = date_field(&mut cur)?;
        if date.is_none() {
            cur.reset(before_due);
        }
        date
    } else {
        None
    };

    let creation_date = date_field(&mut cur)?;

    // Description runs up to the first separator; the whitespace before a
    // project or tag belongs to that field, not the description.
    let start = cur.pos();
    let run = cur.take_while(|c| !matches!(c, ':' | '+' | '\n'));
    let description = run.trim();
    if description.is_empty() {
        return Err(ParseError::EmptyDescription);
    }
    cur.reset(start + run.trim_end().len());

    let project = if cur.eat_spaced('+') {
        let name = cur.take_while(|c| !c.is_whitespace() && c != '#');
        if name.is_empty() {
            return Err(unexpected(&cur));
        }
        let seq = if cur.eat_char('#') {
            let digits = cur.take_while(|c| c.is_ascii_digit());
            digits.parse::<u32>().map_err(|_| unexpected(&cur))?
        } else {
            0
        };
        Some(Project::new(name, seq))
    } else {
        None
    };

    let mut tags = Vec::new();
    while cur.eat_spaced(':') {
        let tag = cur.take_while(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
        if tag.is_empty() {
            return Err(unexpected(&cur));
        }
        tags.push(tag);
    }

    if !cur.is_empty() {
        return Err(unexpected(&cur));
    }

    Ok(RawFields {
        deferred,
        priority,
        due_date,
        creation_date,
        description,
        project,
        tags,
    })
}

/// Parse an optional `DATE ` field. A token shaped like a date that is not a
/// real calendar day is an error rather than description text.
fn date_field(cur: &mut Cursor<'_>) -> Result<Option<NaiveDate>, ParseError> {
    let Some((token, (year, month, day))) = cur.attempt(|c| {
        let token = c.take_while(|ch| ch.is_ascii_digit() || ch == '-');
        let parts = date_parts(token)?;
        c.eat_char(' ').then_some((token, parts))
    }) else {
        return Ok(None);
    };
    NaiveDate::from_ymd_opt(year, month, day)
        .map(Some)
        .ok_or_else(|| ParseError::InvalidDate(token.to_string()))
}

/// Split `YYYY-MM-DD` or `YY-MM-DD` into numbers. Two-digit years are in
/// the 2000s.
fn date_parts(token: &str) -> Option<(i32, u32, u32)> {
    let mut parts = token.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    let shaped = parts.next().is_none()
        && matches!(year.len(), 2 | 4)
        && month.len() == 2
        && day.len() == 2
        && [year, month, day]
            .iter()
            .all(|p| p.bytes().all(|b| b.is_ascii_digit()));
    if !shaped {
        return None;
    }
    let mut y: i32 = year.parse().ok()?;
    if year.len() == 2 {
        y += 2000;
    }
    Some((y, month.parse().ok()?, day.parse().ok()?))
}

fn unexpected(cur: &Cursor<'_>) -> ParseError {
    ParseError::Unexpected {
        column: cur.column(),
        rest: cur.rest().to_string(),
    }
}

fn normalize(fields: RawFields<'_>, ctx: &ParseContext) -> Task {
    let mut tags: IndexSet<String> = fields.tags.iter().map(|t| t.to_string()).collect();

    if fields.due_date.is_some_and(|due| due < ctx.today) {
        tags.insert(OVERDUE_TAG.to_string());
    }

    let mut priority = fields.priority;
    if tags.contains(OVERDUE_TAG) {
        priority = Some(Priority::A);
    } else if let Some(due) = fields.due_date
        && due <= ctx.urgency_deadline()
        && !priority.is_some_and(|p| p <= Priority::B)
    {
        priority = Some(Priority::C);
    }

    if fields.deferred {
        tags.insert(LATER_TAG.to_string());
    }
    let later = has_deferral_tag(&tags);

    Task {
        later,
        priority,
        due_date: fields.due_date,
        creation_date: fields.creation_date.unwrap_or(ctx.today),
        description: capitalize(fields.description),
        project: fields.project,
        tags,
    }
}
