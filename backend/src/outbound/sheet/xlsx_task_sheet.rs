//! `TaskSheet` adapter reading a worksheet with calamine.
//!
//! The first row is the header row. Data rows with no populated cell are
//! skipped. Whole-number floats become integers and empty cells become null,
//! so ids and day numbers compare as integers downstream.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use calamine::{Data, Reader, open_workbook_auto};
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::config::SheetSettings;
use crate::domain::ports::{TaskSheet, TaskSheetError};
use crate::domain::{TaskRecord, TaskTable, TraceId, whole_float};

const SUPPORTED_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Reads one worksheet of a workbook on every call.
#[derive(Debug, Clone)]
pub struct XlsxTaskSheet {
    path: PathBuf,
    worksheet: String,
}

impl XlsxTaskSheet {
    pub fn new(settings: SheetSettings) -> Self {
        Self {
            path: settings.workbook_path,
            worksheet: settings.worksheet,
        }
    }
}

#[async_trait]
impl TaskSheet for XlsxTaskSheet {
    async fn read_table(&self) -> Result<TaskTable, TaskSheetError> {
        let path = self.path.clone();
        let worksheet = self.worksheet.clone();
        let trace_id = TraceId::current();
        let table = tokio::task::spawn_blocking(move || match trace_id {
            Some(id) => TraceId::sync_scope(id, || read_worksheet(&path, &worksheet)),
            None => read_worksheet(&path, &worksheet),
        })
        .await
        .map_err(|err| TaskSheetError::source_unavailable(format!("sheet reader failed: {err}")))??;
        debug!(
            rows = table.records().len(),
            columns = table.headers().len(),
            "task sheet read"
        );
        Ok(table)
    }
}

fn check_extension(path: &Path) -> Result<(), TaskSheetError> {
    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        });
    if supported {
        Ok(())
    } else {
        Err(TaskSheetError::unsupported_format(path.display().to_string()))
    }
}

fn read_worksheet(path: &Path, worksheet: &str) -> Result<TaskTable, TaskSheetError> {
    check_extension(path)?;
    let mut workbook = open_workbook_auto(path).map_err(|err| {
        TaskSheetError::source_unavailable(format!("{}: {err}", path.display()))
    })?;
    if !workbook.sheet_names().iter().any(|name| name == worksheet) {
        return Err(TaskSheetError::data_not_found(worksheet));
    }
    let range = workbook
        .worksheet_range(worksheet)
        .map_err(|_| TaskSheetError::data_not_found(worksheet))?;
    table_from_rows(range.rows(), worksheet)
}

fn table_from_rows<'a>(
    mut rows: impl Iterator<Item = &'a [Data]>,
    worksheet: &str,
) -> Result<TaskTable, TaskSheetError> {
    let headers = rows
        .next()
        .map(header_names)
        .ok_or_else(|| TaskSheetError::data_not_found(worksheet))?;
    let records: Vec<TaskRecord> = rows
        .filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty)))
        .map(|row| {
            let fields: Map<String, Value> = headers
                .iter()
                .enumerate()
                .map(|(idx, header)| (header.clone(), row.get(idx).map_or(Value::Null, cell_value)))
                .collect();
            TaskRecord::new(fields)
        })
        .collect();
    if records.is_empty() {
        return Err(TaskSheetError::data_not_found(worksheet));
    }
    Ok(TaskTable::new(headers, records))
}

/// Header labels, with placeholders for blank cells and suffixes for repeats.
fn header_names(row: &[Data]) -> Vec<String> {
    let mut seen = HashSet::new();
    row.iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = match cell {
                Data::Empty => format!("Unnamed: {idx}"),
                Data::String(text) => text.trim().to_owned(),
                other => other.to_string(),
            };
            let mut name = base.clone();
            let mut repeat = 1;
            while !seen.insert(name.clone()) {
                name = format!("{base}.{repeat}");
                repeat += 1;
            }
            name
        })
        .collect()
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::Int(value) => Value::from(*value),
        Data::Float(value) => whole_float(*value).map_or_else(
            || Number::from_f64(*value).map_or(Value::Null, Value::Number),
            Value::from,
        ),
        Data::String(text) => Value::String(text.clone()),
        Data::Bool(flag) => Value::Bool(*flag),
        other => Value::String(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn s(text: &str) -> Data {
        Data::String(text.to_owned())
    }

    #[rstest]
    #[case(Data::Float(3.0), json!(3))]
    #[case(Data::Float(2.5), json!(2.5))]
    #[case(Data::Float(1e20), json!(1e20))]
    #[case(Data::Int(7), json!(7))]
    #[case(Data::Empty, Value::Null)]
    #[case(Data::Bool(true), json!(true))]
    #[case(Data::String("Кот".to_owned()), json!("Кот"))]
    #[case(Data::Float(f64::NAN), Value::Null)]
    fn cells_convert_to_json(#[case] cell: Data, #[case] expected: Value) {
        assert_eq!(cell_value(&cell), expected);
    }

    #[rstest]
    fn rows_follow_header_order_and_skip_blanks() {
        let rows = [
            vec![s("№"), s("Описание"), s("Номер дня")],
            vec![Data::Float(1.0), s("Find the cat"), Data::Float(1.0)],
            vec![Data::Empty, Data::Empty, Data::Empty],
            vec![Data::Float(2.0), Data::Empty],
        ];

        let table =
            table_from_rows(rows.iter().map(Vec::as_slice), "Персонажи").expect("table builds");

        assert_eq!(table.headers(), ["№", "Описание", "Номер дня"]);
        assert_eq!(
            serde_json::to_value(table.records()).expect("serialise"),
            json!([
                {"№": 1, "Описание": "Find the cat", "Номер дня": 1},
                {"№": 2, "Описание": null, "Номер дня": null},
            ])
        );
    }

    #[rstest]
    fn repeated_and_blank_headers_are_named() {
        let headers = header_names(&[s("Ответ"), Data::Empty, s("Ответ"), Data::Float(5.0)]);
        assert_eq!(headers, ["Ответ", "Unnamed: 1", "Ответ.1", "5"]);
    }

    #[rstest]
    #[case::no_rows(vec![])]
    #[case::header_only(vec![vec![s("№")]])]
    #[case::blank_rows(vec![vec![s("№")], vec![Data::Empty]])]
    fn empty_sheet_is_data_not_found(#[case] rows: Vec<Vec<Data>>) {
        let err = table_from_rows(rows.iter().map(Vec::as_slice), "Персонажи")
            .expect_err("empty sheet");
        assert_eq!(err, TaskSheetError::data_not_found("Персонажи"));
    }

    #[rstest]
    #[case("tasks.csv", false)]
    #[case("tasks", false)]
    #[case("PlayIT.xlsx", true)]
    #[case("PlayIT.XLSX", true)]
    #[case("legacy.xls", true)]
    fn extension_is_checked(#[case] path: &str, #[case] supported: bool) {
        assert_eq!(check_extension(Path::new(path)).is_ok(), supported);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_workbook_is_unavailable() {
        let dir = tempfile::tempdir().expect("temp dir");
        let sheet = XlsxTaskSheet::new(SheetSettings {
            workbook_path: dir.path().join("PlayIT.xlsx"),
            worksheet: "Персонажи".to_owned(),
        });

        let err = sheet.read_table().await.expect_err("missing file");
        assert!(matches!(err, TaskSheetError::SourceUnavailable { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn unsupported_extension_is_reported_before_opening() {
        let sheet = XlsxTaskSheet::new(SheetSettings {
            workbook_path: PathBuf::from("/nonexistent/tasks.txt"),
            worksheet: "Персонажи".to_owned(),
        });

        let err = sheet.read_table().await.expect_err("unsupported");
        assert!(matches!(err, TaskSheetError::UnsupportedFormat { .. }));
    }
}
