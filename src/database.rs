use diesel::sql_types::BigInt;
use diesel::{ExpressionMethods, QueryDsl, QueryableByName};
use diesel_async::{
    pooled_connection::{deadpool::Pool, AsyncDieselConnectionManager},
    AsyncConnection, AsyncPgConnection, RunQueryDsl,
};
use tracing::info;

use crate::dataset::{CellValue, Dataset, Row};
use crate::error::SyncError;
use crate::models::NewVisitRow;
use crate::schema::dados_rela_visitas_medicos;

/// Table name of the only destination with a compiled schema.
pub const DESTINATION_TABLE_NAME: &str = "dados_rela_visitas_medicos";

/// A destination table identity, case-normalized to lowercase. Only plain SQL
/// identifiers are accepted since the name is spliced into the clear/count
/// statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef(String);

impl TableRef {
    pub fn new(name: &str) -> Result<Self, SyncError> {
        let normalized = name.trim().to_ascii_lowercase();
        let valid = !normalized.is_empty()
            && !normalized.starts_with(|c: char| c.is_ascii_digit())
            && normalized
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(SyncError::Config {
                message: format!("invalid table name: {:?}", name),
            });
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(QueryableByName)]
struct RowCount {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

#[derive(Clone)]
pub struct DatabaseManager {
    pool: Pool<AsyncPgConnection>,
}

impl DatabaseManager {
    pub fn new(database_url: &str) -> Result<Self, SyncError> {
        let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        let pool = Pool::builder(config)
            .build()
            .map_err(|e| SyncError::Config {
                message: format!("Failed to create database pool: {}", e),
            })?;

        Ok(Self { pool })
    }

    /// Deletes every row of the destination table inside one transaction.
    pub async fn clear_table(&self, table: &TableRef) -> Result<(), SyncError> {
        let mut conn = self.pool.get().await.map_err(|e| SyncError::Database {
            message: format!("Failed to get database connection: {}", e),
        })?;
        let statement = format!("DELETE FROM {}", table);

        let deleted = conn
            .transaction::<_, SyncError, _>(|conn| {
                Box::pin(async move {
                    let deleted = diesel::sql_query(statement).execute(conn).await?;
                    Ok(deleted)
                })
            })
            .await?;

        info!(table = %table, rows = deleted, "Cleared destination table");
        Ok(())
    }

    pub async fn count_rows(&self, table: &TableRef) -> Result<i64, SyncError> {
        let mut conn = self.pool.get().await.map_err(|e| SyncError::Database {
            message: format!("Failed to get database connection: {}", e),
        })?;
        let row: RowCount = diesel::sql_query(format!("SELECT COUNT(*) AS count FROM {}", table))
            .get_result(&mut conn)
            .await
            .map_err(|e| SyncError::Database {
                message: format!("Failed to count rows of {}: {}", table, e),
            })?;
        Ok(row.count)
    }

    /// Runs the fixed reference query: every specialty description, ordered.
    pub async fn fetch_specialties(&self) -> Result<Dataset, SyncError> {
        use crate::schema::especialidade_medica::dsl::*;

        let mut conn = self.pool.get().await.map_err(|e| SyncError::Database {
            message: format!("Failed to get database connection: {}", e),
        })?;
        let descriptions: Vec<String> = especialidade_medica
            .select(descricao)
            .order(descricao.asc())
            .load(&mut conn)
            .await
            .map_err(|e| SyncError::Database {
                message: format!("Failed to fetch specialties: {}", e),
            })?;

        let mut data = Dataset::new(vec!["DESCRICAO".to_string()]);
        for description in descriptions {
            data.push_row(vec![CellValue::Text(description)])?;
        }
        Ok(data)
    }

    /// Inserts a single cleaned row. Inserts go through the compiled schema,
    /// so the table reference must name it.
    pub async fn insert_visit_row(&self, table: &TableRef, row: Row<'_>) -> Result<(), SyncError> {
        if table.as_str() != DESTINATION_TABLE_NAME {
            return Err(SyncError::Database {
                message: format!("no compiled schema for table {}", table),
            });
        }

        let new_row = NewVisitRow::from_row(&row)?;
        let mut conn = self.pool.get().await.map_err(|e| SyncError::Database {
            message: format!("Failed to get database connection: {}", e),
        })?;
        diesel::insert_into(dados_rela_visitas_medicos::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map_err(|e| SyncError::Database {
                message: format!("Failed to insert row into {}: {}", table, e),
            })?;

        Ok(())
    }
}
