use chrono::NaiveDate;

use crate::error::SyncError;
use crate::transform::DATE_FORMAT;

/// A single cell of a tabular dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Missing,
}

impl CellValue {
    /// Maps a JSON scalar from the Sheets API into a cell. Blank strings and
    /// nulls become `Missing`.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => {
                if s.trim().is_empty() {
                    CellValue::Missing
                } else {
                    CellValue::Text(s.clone())
                }
            }
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(CellValue::Number)
                .unwrap_or(CellValue::Missing),
            serde_json::Value::Bool(b) => CellValue::Text(b.to_string()),
            _ => CellValue::Missing,
        }
    }

    /// Renders the cell the way it is written back to a sheet. Whole numbers
    /// drop their fractional part, dates use the sheet's day/month/year form.
    pub fn to_cell_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                // The cast saturates outside i64 range, so only whole numbers
                // inside it drop their fractional part.
                let whole = n.fract() == 0.0 && *n >= i64::MIN as f64 && *n < i64::MAX as f64;
                if whole {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            CellValue::Date(d) => d.format(DATE_FORMAT).to_string(),
            CellValue::Missing => String::new(),
        }
    }

    /// Non-missing textual form, used when handing cells to the database.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Missing => None,
            other => Some(other.to_cell_text()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

/// An ordered in-memory table passed between pipeline stages. Every row has
/// exactly one cell per column; stages produce new datasets instead of
/// mutating their input.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Crate-internal constructor for transforms that preserve row arity
    /// cell-for-cell and need no per-row validation.
    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == columns.len()));
        Self { columns, rows }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) -> Result<(), SyncError> {
        if row.len() != self.columns.len() {
            return Err(SyncError::RowShape {
                message: format!(
                    "row has {} cells but the dataset has {} columns",
                    row.len(),
                    self.columns.len()
                ),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Case-insensitive column lookup; sheet headers are conventionally
    /// uppercase while database columns are lowercase.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    pub fn row(&self, index: usize) -> Row<'_> {
        Row {
            columns: &self.columns,
            values: &self.rows[index],
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|values| Row {
            columns: &self.columns,
            values,
        })
    }
}

/// Borrowed view of one dataset row with by-name access.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [CellValue],
}

impl<'a> Row<'a> {
    pub fn get(&self, name: &str) -> Option<&'a CellValue> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .map(|i| &self.values[i])
    }

    pub fn values(&self) -> &'a [CellValue] {
        self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a CellValue)> {
        self.columns
            .iter()
            .map(|c| c.as_str())
            .zip(self.values.iter())
    }

    pub fn has_missing(&self) -> bool {
        self.values.iter().any(CellValue::is_missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_row_rejects_wrong_arity() {
        let mut data = Dataset::new(vec!["A".into(), "B".into()]);
        let err = data.push_row(vec![CellValue::Text("x".into())]);
        assert!(err.is_err());
        assert_eq!(data.row_count(), 0);
    }

    #[test]
    fn column_lookup_is_case_insensitive() {
        let data = Dataset::new(vec!["DATA".into(), "MEDICO".into()]);
        assert_eq!(data.column_index("data"), Some(0));
        assert_eq!(data.column_index("Medico"), Some(1));
        assert_eq!(data.column_index("crm"), None);
    }

    #[test]
    fn cell_text_round_trips_whole_numbers() {
        assert_eq!(CellValue::Number(42.0).to_cell_text(), "42");
        assert_eq!(CellValue::Number(1.5).to_cell_text(), "1.5");
    }

    #[test]
    fn cell_text_keeps_numbers_outside_i64_range_intact() {
        assert_eq!(
            CellValue::Number(1e19).to_cell_text(),
            "10000000000000000000"
        );
        assert_eq!(
            CellValue::Number(-1e19).to_cell_text(),
            "-10000000000000000000"
        );
        assert_eq!(CellValue::Number(f64::INFINITY).to_cell_text(), "inf");
    }

    #[test]
    fn blank_json_strings_become_missing() {
        assert!(CellValue::from_json(&serde_json::json!("   ")).is_missing());
        assert!(CellValue::from_json(&serde_json::Value::Null).is_missing());
        assert_eq!(
            CellValue::from_json(&serde_json::json!("ok")),
            CellValue::Text("ok".into())
        );
    }
}
