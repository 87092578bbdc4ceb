//! Spreadsheet-backed task sheet.

mod xlsx_task_sheet;

pub use xlsx_task_sheet::XlsxTaskSheet;
