use chrono::NaiveDate;
use tracing::info;

use crate::dataset::{CellValue, Dataset};

/// Column holding visit dates in the curated sheet.
pub const DATE_COLUMN: &str = "DATA";

/// Day/month/year textual form used throughout the spreadsheet.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Cleans a dataset read from the curated sheet: the date column is parsed
/// from its textual form (unparseable values are coerced to missing, never a
/// row failure), then every row still containing a missing value in any
/// column is dropped. The input is left untouched.
pub fn clean(data: &Dataset) -> Dataset {
    let date_index = data.column_index(DATE_COLUMN);
    let rows: Vec<Vec<CellValue>> = data
        .rows()
        .filter_map(|row| {
            let mut values = row.values().to_vec();
            if let Some(index) = date_index {
                values[index] = coerce_date(&values[index]);
            }
            if values.iter().any(CellValue::is_missing) {
                None
            } else {
                Some(values)
            }
        })
        .collect();
    // Each retained row came from the input cell-for-cell, so arity holds by
    // construction.
    let cleaned = Dataset::from_parts(data.columns().to_vec(), rows);

    info!(
        before = data.row_count(),
        after = cleaned.row_count(),
        "Cleaned dataset"
    );
    cleaned
}

fn coerce_date(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Date(d) => CellValue::Date(*d),
        CellValue::Text(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .map(CellValue::Date)
            .unwrap_or(CellValue::Missing),
        _ => CellValue::Missing,
    }
}
