//! Projections and answer lookups over the task sheet.

use std::sync::Arc;

use tracing::debug;

use super::ports::{TaskSheet, TaskSheetError};
use super::{SheetLayout, TaskDay, TaskTable};

/// Read-side service over the authoritative task sheet.
#[derive(Clone)]
pub struct AnswerOracle {
    sheet: Arc<dyn TaskSheet>,
    layout: SheetLayout,
}

impl AnswerOracle {
    pub fn new(sheet: Arc<dyn TaskSheet>, layout: SheetLayout) -> Self {
        Self { sheet, layout }
    }

    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    /// One authoritative read of the whole sheet.
    pub async fn read_table(&self) -> Result<TaskTable, TaskSheetError> {
        self.sheet.read_table().await
    }

    /// Read the sheet and project it.
    pub async fn load(
        &self,
        columns_to_drop: &[&str],
        max_day: Option<TaskDay>,
    ) -> Result<TaskTable, TaskSheetError> {
        let table = self.read_table().await?;
        self.project(table, columns_to_drop, max_day)
    }

    /// Filter rows to `max_day` and drop the listed columns.
    ///
    /// Filtering needs the day column; its absence is a schema mismatch.
    /// Columns to drop that the sheet does not carry are ignored.
    pub fn project(
        &self,
        table: TaskTable,
        columns_to_drop: &[&str],
        max_day: Option<TaskDay>,
    ) -> Result<TaskTable, TaskSheetError> {
        let table = match max_day {
            Some(day) => {
                if !table.has_column(&self.layout.day_column) {
                    return Err(TaskSheetError::schema_mismatch(
                        self.layout.day_column.as_str(),
                    ));
                }
                table.up_to_day(&self.layout, i64::from(day.get()))
            }
            None => table,
        };
        Ok(table.without_columns(columns_to_drop))
    }

    /// Normalised answer for `task_id`: trimmed and lower-cased.
    pub async fn lookup_answer(&self, task_id: i64) -> Result<String, TaskSheetError> {
        let table = self
            .load(&[self.layout.avatar_column.as_str()], None)
            .await?;
        if !table.has_column(&self.layout.answer_column) {
            return Err(TaskSheetError::malformed(format!(
                "no '{}' column",
                self.layout.answer_column
            )));
        }

        let row = table
            .records()
            .iter()
            .find(|record| record.id(&self.layout) == Some(task_id))
            .ok_or_else(|| TaskSheetError::task_not_found(task_id))?;

        let answer = row
            .answer(&self.layout)
            .map(|answer| normalise_answer(&answer))
            .filter(|answer| !answer.is_empty())
            .ok_or_else(|| TaskSheetError::malformed(format!("task {task_id} has no answer")))?;
        debug!(task_id, "answer key located");
        Ok(answer)
    }
}

/// Canonical form used on both sides of an answer comparison.
pub fn normalise_answer(raw: &str) -> String {
    raw.trim().to_lowercase()
}
