use indicatif::ProgressBar;
use tracing::info;

use crate::database::{DatabaseManager, TableRef};
use crate::dataset::{Dataset, Row};
use crate::error::{Stage, StageError, SyncError};
use crate::sheets::SheetsClient;
use crate::transform;

/// Destination table that is cleared and repopulated on every run.
pub const DESTINATION_TABLE: &str = "DADOS_RELA_VISITAS_MEDICOS";
/// Tab the reference dataset is mirrored into.
pub const EXPORT_TAB: &str = "ESPECIALIDADES";
/// Curated source-of-truth tab that is read back.
pub const SOURCE_TAB: &str = "BASE";

/// Database collaborator: clear/fetch/insert against the destination table.
#[allow(async_fn_in_trait)]
pub trait Database {
    async fn clear(&self, table: &TableRef) -> Result<(), SyncError>;
    async fn count_rows(&self, table: &TableRef) -> Result<i64, SyncError>;
    async fn fetch_reference(&self) -> Result<Dataset, SyncError>;
    async fn insert_row(&self, table: &TableRef, row: Row<'_>) -> Result<(), SyncError>;
}

impl Database for DatabaseManager {
    async fn clear(&self, table: &TableRef) -> Result<(), SyncError> {
        self.clear_table(table).await
    }

    async fn count_rows(&self, table: &TableRef) -> Result<i64, SyncError> {
        DatabaseManager::count_rows(self, table).await
    }

    async fn fetch_reference(&self) -> Result<Dataset, SyncError> {
        self.fetch_specialties().await
    }

    async fn insert_row(&self, table: &TableRef, row: Row<'_>) -> Result<(), SyncError> {
        self.insert_visit_row(table, row).await
    }
}

/// Spreadsheet collaborator: read/write one named tab at a time.
#[allow(async_fn_in_trait)]
pub trait SheetService {
    async fn read_tab(&self, tab: &str) -> Result<Dataset, SyncError>;
    async fn write_tab(&self, tab: &str, data: &Dataset) -> Result<(), SyncError>;
}

impl SheetService for SheetsClient {
    async fn read_tab(&self, tab: &str) -> Result<Dataset, SyncError> {
        SheetsClient::read_tab(self, tab).await
    }

    async fn write_tab(&self, tab: &str, data: &Dataset) -> Result<(), SyncError> {
        SheetsClient::write_tab(self, tab, data).await
    }
}

/// Row counts observed at each stage boundary of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub fetched: usize,
    pub read: usize,
    pub cleaned: usize,
    pub inserted: usize,
}

/// Executes the six stages in strict sequence, aborting the whole run on the
/// first failure. Stage 1's delete is never compensated; there is no retry.
pub struct SyncPipeline<D, S> {
    database: D,
    sheets: S,
    destination: TableRef,
    export_tab: String,
    source_tab: String,
}

impl<D: Database, S: SheetService> SyncPipeline<D, S> {
    pub fn new(database: D, sheets: S) -> Result<Self, SyncError> {
        Self::with_targets(database, sheets, DESTINATION_TABLE, EXPORT_TAB, SOURCE_TAB)
    }

    pub fn with_targets(
        database: D,
        sheets: S,
        destination_table: &str,
        export_tab: &str,
        source_tab: &str,
    ) -> Result<Self, SyncError> {
        Ok(Self {
            database,
            sheets,
            destination: TableRef::new(destination_table)?,
            export_tab: export_tab.to_string(),
            source_tab: source_tab.to_string(),
        })
    }

    pub async fn run(&self) -> Result<RunReport, StageError> {
        info!("Starting data synchronization pipeline");

        // 1. Clear the destination table, then verify it really is empty
        // before any fetch is attempted.
        info!(table = %self.destination, "Clearing destination table");
        self.database
            .clear(&self.destination)
            .await
            .map_err(|e| StageError::new(Stage::Clear, e))?;
        let residual = self
            .database
            .count_rows(&self.destination)
            .await
            .map_err(|e| StageError::new(Stage::Clear, e))?;
        if residual != 0 {
            return Err(StageError::new(
                Stage::Clear,
                SyncError::Database {
                    message: format!(
                        "{} rows remain in {} after clear",
                        residual, self.destination
                    ),
                },
            ));
        }

        // 2. Fetch the reference dataset; no rows is a terminal condition.
        info!("Fetching reference data");
        let reference = self
            .database
            .fetch_reference()
            .await
            .map_err(|e| StageError::new(Stage::Fetch, e))?;
        if reference.is_empty() {
            return Err(StageError::new(
                Stage::Fetch,
                SyncError::EmptyDataset {
                    message: "reference query returned no rows".to_string(),
                },
            ));
        }
        info!(rows = reference.row_count(), "Fetched reference rows");

        // 3. Mirror the reference dataset into the export tab.
        info!(tab = %self.export_tab, "Writing reference data to sheet");
        self.sheets
            .write_tab(&self.export_tab, &reference)
            .await
            .map_err(|e| StageError::new(Stage::WriteSheet, e))?;

        // 4. Read the curated source-of-truth tab.
        info!(tab = %self.source_tab, "Reading curated data from sheet");
        let curated = self
            .sheets
            .read_tab(&self.source_tab)
            .await
            .map_err(|e| StageError::new(Stage::ReadSheet, e))?;
        if curated.is_empty() {
            return Err(StageError::new(
                Stage::ReadSheet,
                SyncError::EmptyDataset {
                    message: format!("tab {} holds no records", self.source_tab),
                },
            ));
        }
        info!(rows = curated.row_count(), "Read curated rows");

        // 5. Clean: parse dates, drop rows with missing values.
        let cleaned = transform::clean(&curated);
        if cleaned.is_empty() {
            return Err(StageError::new(
                Stage::Clean,
                SyncError::EmptyDataset {
                    message: "cleaning removed every row".to_string(),
                },
            ));
        }

        // 6. Insert row by row with a visible progress indicator. The first
        // failing insert aborts the loop; earlier rows stay committed.
        info!(
            rows = cleaned.row_count(),
            table = %self.destination,
            "Inserting cleaned rows"
        );
        let bar = ProgressBar::new(cleaned.row_count() as u64);
        let mut inserted = 0usize;
        for row in cleaned.rows() {
            if let Err(e) = self.database.insert_row(&self.destination, row).await {
                bar.abandon();
                return Err(StageError::new(Stage::Insert, e));
            }
            inserted += 1;
            bar.inc(1);
        }
        bar.finish();

        info!(inserted, "Data synchronization completed");
        Ok(RunReport {
            fetched: reference.row_count(),
            read: curated.row_count(),
            cleaned: cleaned.row_count(),
            inserted,
        })
    }
}
