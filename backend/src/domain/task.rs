//! Task catalogue data model.
//!
//! Task rows come from a spreadsheet whose column set is not fixed, so a row
//! is kept as an ordered JSON object. Typed access to the handful of columns
//! the service relies on goes through [`SheetLayout`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Column names the service reads from the task sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    pub id_column: String,
    pub day_column: String,
    pub answer_column: String,
    pub avatar_column: String,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            id_column: "№".to_owned(),
            day_column: "Номер дня".to_owned(),
            answer_column: "Ответ".to_owned(),
            avatar_column: "Аватарка".to_owned(),
        }
    }
}

/// One spreadsheet row keyed by column header, in sheet column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskRecord(Map<String, Value>);

impl TaskRecord {
    /// Wrap an already-projected JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Raw cell value for `column`.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Whether the row carries `column`.
    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    /// Remove `column`, ignoring absent columns.
    pub fn remove(&mut self, column: &str) {
        self.0.shift_remove(column);
    }

    /// Task identifier from the id column.
    pub fn id(&self, layout: &SheetLayout) -> Option<i64> {
        self.get(&layout.id_column).and_then(integer_value)
    }

    /// Day number from the day column.
    pub fn day(&self, layout: &SheetLayout) -> Option<i64> {
        self.get(&layout.day_column).and_then(integer_value)
    }

    /// Raw answer text, rendered as a string when the cell is numeric.
    pub fn answer(&self, layout: &SheetLayout) -> Option<String> {
        match self.get(&layout.answer_column)? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Borrow the underlying JSON object.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Interpret a cell as an integer. Whole floats and numeric strings count.
fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(whole_float)),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Exact `i64` for a whole float inside the `i64` range.
///
/// Fractions, NaN, infinities and out-of-range values yield `None`.
pub fn whole_float(value: f64) -> Option<i64> {
    // 2^63, exactly representable as f64.
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    if value.fract() != 0.0 || !(-BOUND..BOUND).contains(&value) {
        return None;
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "value is whole and inside the i64 range"
    )]
    let whole = value as i64;
    Some(whole)
}

/// Header row plus ordered records read from the task sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskTable {
    headers: Vec<String>,
    records: Vec<TaskRecord>,
}

impl TaskTable {
    pub fn new(headers: Vec<String>, records: Vec<TaskRecord>) -> Self {
        Self { headers, records }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TaskRecord> {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the header row names `column`.
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|header| header == column)
    }

    /// Drop the listed columns that exist; unknown names are ignored.
    #[must_use]
    pub fn without_columns(mut self, columns: &[&str]) -> Self {
        self.headers
            .retain(|header| !columns.contains(&header.as_str()));
        for record in &mut self.records {
            for column in columns {
                record.remove(column);
            }
        }
        self
    }

    /// Keep rows whose day is numeric and at most `max_day`.
    #[must_use]
    pub fn up_to_day(mut self, layout: &SheetLayout, max_day: i64) -> Self {
        self.records
            .retain(|record| record.day(layout).is_some_and(|day| day <= max_day));
        self
    }

    /// Rows whose day equals `day`, in sheet order.
    pub fn rows_for_day(&self, layout: &SheetLayout, day: u32) -> Vec<TaskRecord> {
        self.records
            .iter()
            .filter(|record| record.day(layout) == Some(i64::from(day)))
            .cloned()
            .collect()
    }
}

/// Validation failure for [`TaskDay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("day must be between {min} and {max}, got {value}", min = TaskDay::MIN, max = TaskDay::MAX)]
pub struct TaskDayError {
    value: i64,
}

/// Day filter accepted by the catalogue listing, inclusive 1..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskDay(u32);

impl TaskDay {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 3;

    /// Validate a raw day number.
    pub fn new(value: i64) -> Result<Self, TaskDayError> {
        u32::try_from(value)
            .ok()
            .filter(|day| (Self::MIN..=Self::MAX).contains(day))
            .map(Self)
            .ok_or(TaskDayError { value })
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Every day the cache is populated for, ascending.
    pub fn all() -> impl Iterator<Item = TaskDay> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

impl fmt::Display for TaskDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome carried in a balance update instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Approved,
    Rejected,
}

/// Instruction sent to the balance service after a task is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceUpdate {
    pub task_id: i64,
    pub user_id: i64,
    pub value: i64,
    pub status: TaskStatus,
    pub tg: bool,
}

impl BalanceUpdate {
    /// Instruction for an answer accepted by the auto-check.
    pub fn approved(task_id: i64, user_id: i64, value: i64) -> Self {
        Self {
            task_id,
            user_id,
            value,
            status: TaskStatus::Approved,
            tg: true,
        }
    }
}

/// Answer submitted for automatic checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSubmission {
    pub task_id: i64,
    pub user_id: i64,
    pub value: i64,
    pub user_answer: String,
}

/// Result of an automatic answer check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerVerdict {
    pub task_id: i64,
    pub is_correct: bool,
}

/// Where a task listing was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingSource {
    Cache,
    Sheet,
}

/// Task catalogue returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskListing {
    pub status: u16,
    pub details: String,
    pub data: Vec<TaskRecord>,
    #[serde(skip)]
    pub source: ListingSource,
}

impl TaskListing {
    pub fn from_cache(day: Option<TaskDay>, data: Vec<TaskRecord>) -> Self {
        let scope = match day {
            Some(day) => format!("for days 1-{day}"),
            None => "for all days".to_owned(),
        };
        Self {
            status: 200,
            details: format!("Tasks {scope} served from cache."),
            data,
            source: ListingSource::Cache,
        }
    }

    pub fn from_sheet(data: Vec<TaskRecord>) -> Self {
        Self {
            status: 200,
            details: "Tasks read from the task sheet.".to_owned(),
            data,
            source: ListingSource::Sheet,
        }
    }
}
