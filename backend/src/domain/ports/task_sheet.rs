//! Port for reading the authoritative task sheet.
use async_trait::async_trait;

use crate::domain::TaskTable;

use super::define_port_error;

define_port_error! {
    /// Errors raised while reading or interpreting the task sheet.
    pub enum TaskSheetError {
        /// The workbook cannot be located or opened.
        SourceUnavailable { message: String } => "task sheet unavailable: {message}",
        /// The workbook extension is not a supported spreadsheet format.
        UnsupportedFormat { path: String } => "unsupported workbook format: {path}",
        /// The worksheet is missing or holds no rows.
        DataNotFound { sheet: String } => "worksheet '{sheet}' is missing or empty",
        /// A column required by the operation is absent.
        SchemaMismatch { column: String } => "task sheet has no '{column}' column",
        /// No row carries the requested task id.
        TaskNotFound { task_id: i64 } => "task {task_id} not found",
        /// A row exists but its content cannot be used.
        Malformed { message: String } => "task sheet row is malformed: {message}",
    }
}

/// Read access to the task sheet. Each call is one full read.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskSheet: Send + Sync {
    /// Read the header row and every non-empty data row.
    async fn read_table(&self) -> Result<TaskTable, TaskSheetError>;
}
