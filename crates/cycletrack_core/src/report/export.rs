//! Tabular export of tracked periods.
//!
//! # Responsibility
//! - Build rows with `Start Date`, `End Date`, `Cycle Day` columns.
//! - Render rows as CSV text or a JSON array of objects.
//!
//! # Invariants
//! - Rows follow ascending start order; `Cycle Day` is the 1-based position.

use crate::model::period::Period;
use crate::tracker::store::sorted_by_start;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Default file name offered for exports.
pub const EXPORT_FILE_NAME: &str = "cycle_data.csv";
/// Sheet/table title for exports.
pub const EXPORT_TITLE: &str = "Cycle Data";

const COLUMNS: [&str; 3] = ["Start Date", "End Date", "Cycle Day"];

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "export write failed: {err}"),
            Self::Json(err) => write!(f, "export encoding failed: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// One exported period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Start Date")]
    pub start_date: String,
    #[serde(rename = "End Date")]
    pub end_date: String,
    #[serde(rename = "Cycle Day")]
    pub cycle_day: usize,
}

/// Rows ordered by start date with US numeric dates.
pub fn export_rows(periods: &[Period]) -> Vec<ExportRow> {
    sorted_by_start(periods)
        .iter()
        .enumerate()
        .map(|(index, period)| ExportRow {
            start_date: period.start().us_numeric(),
            end_date: period.end().us_numeric(),
            cycle_day: index + 1,
        })
        .collect()
}

/// CSV text with a header line; lines end with `\n`.
pub fn to_csv(rows: &[ExportRow]) -> String {
    let mut out = COLUMNS.join(",");
    out.push('\n');
    for row in rows {
        let line = [
            csv_field(&row.start_date),
            csv_field(&row.end_date),
            row.cycle_day.to_string(),
        ];
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

/// Pretty JSON array of objects keyed by column name.
pub fn to_json(rows: &[ExportRow]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(rows)?)
}

/// Writes CSV rows to `path`, replacing any existing file.
pub fn write_csv(path: impl AsRef<Path>, rows: &[ExportRow]) -> Result<(), ExportError> {
    std::fs::write(path, to_csv(rows))?;
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{csv_field, export_rows, to_csv, to_json, write_csv, ExportRow};
    use crate::model::date::CalendarDate;
    use crate::model::period::Period;

    fn period(start: &str, end: &str) -> Period {
        Period::new(
            CalendarDate::parse(start).unwrap(),
            CalendarDate::parse(end).unwrap(),
        )
    }

    fn sample_rows() -> Vec<ExportRow> {
        export_rows(&[
            period("2024-02-01", "2024-02-05"),
            period("2024-01-03", "2024-01-07"),
        ])
    }

    #[test]
    fn rows_are_sorted_and_numbered_from_one() {
        let rows = sample_rows();
        assert_eq!(
            rows,
            vec![
                ExportRow {
                    start_date: "1/3/2024".to_string(),
                    end_date: "1/7/2024".to_string(),
                    cycle_day: 1,
                },
                ExportRow {
                    start_date: "2/1/2024".to_string(),
                    end_date: "2/5/2024".to_string(),
                    cycle_day: 2,
                },
            ]
        );
    }

    #[test]
    fn csv_has_header_and_one_line_per_row() {
        assert_eq!(
            to_csv(&sample_rows()),
            "Start Date,End Date,Cycle Day\n1/3/2024,1/7/2024,1\n2/1/2024,2/5/2024,2\n"
        );
        assert_eq!(to_csv(&[]), "Start Date,End Date,Cycle Day\n");
    }

    #[test]
    fn csv_field_quotes_special_characters() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn json_uses_column_names_as_keys() {
        let json: serde_json::Value = serde_json::from_str(&to_json(&sample_rows()).unwrap()).unwrap();
        assert_eq!(json[0]["Start Date"], "1/3/2024");
        assert_eq!(json[0]["End Date"], "1/7/2024");
        assert_eq!(json[1]["Cycle Day"], 2);
    }

    #[test]
    fn write_csv_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(super::EXPORT_FILE_NAME);
        write_csv(&path, &sample_rows()).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Start Date,End Date,Cycle Day\n"));
        assert_eq!(written.lines().count(), 3);
    }
}
