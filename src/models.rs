use chrono::NaiveDate;
use diesel::prelude::*;

use crate::dataset::{CellValue, Row};
use crate::error::SyncError;
use crate::schema::dados_rela_visitas_medicos;

/// One cleaned visit row in the shape of the destination table. The dynamic
/// dataset is converted to this typed model at the database boundary so
/// column presence is checked before the insert is attempted.
#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = dados_rela_visitas_medicos)]
pub struct NewVisitRow {
    pub data: NaiveDate,
    pub medico: String,
    pub especialidade: String,
    pub municipio: String,
}

impl NewVisitRow {
    /// Converts a cleaned dataset row. Column names are matched
    /// case-insensitively (sheet headers are uppercase); the date column must
    /// already carry a parsed date, which the clean stage guarantees.
    pub fn from_row(row: &Row<'_>) -> Result<Self, SyncError> {
        let data = match row.get("data") {
            Some(CellValue::Date(d)) => *d,
            Some(other) => {
                return Err(SyncError::RowShape {
                    message: format!("column data holds {:?} instead of a parsed date", other),
                })
            }
            None => return Err(missing_column("data")),
        };

        Ok(Self {
            data,
            medico: text_column(row, "medico")?,
            especialidade: text_column(row, "especialidade")?,
            municipio: text_column(row, "municipio")?,
        })
    }
}

fn text_column(row: &Row<'_>, name: &str) -> Result<String, SyncError> {
    let cell = row.get(name).ok_or_else(|| missing_column(name))?;
    cell.as_text().ok_or_else(|| SyncError::RowShape {
        message: format!("column {} is missing a value", name),
    })
}

fn missing_column(name: &str) -> SyncError {
    SyncError::RowShape {
        message: format!("row has no column named {}", name),
    }
}
