//! File-backed store for payment records.
//!
//! [`RecordStore`] only remembers where the workbook lives. Each operation
//! loads the workbook, works on an in-memory [`Table`], and writes the
//! whole workbook back before returning when anything changed. Nothing is
//! cached between calls and nothing guards against concurrent writers.

mod analysis;
mod highlight;
mod layout;
mod table;
mod workbook;

use std::fs;
use std::path::{Path, PathBuf};

pub use analysis::{ChartSummary, PaymentAnalysis, StatusTotals};
pub use highlight::Fill;
pub use layout::{LINE_HEIGHT, MIN_ROW_HEIGHT, SheetLayout, TASK_TYPE_WIDTH, WRAP_CHARS};
pub use table::{Cell, Row, Table};
pub use workbook::{CHART_SHEET, CURRENCY_FORMAT, RECORDS_SHEET};

use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::models::{PaymentRecord, PaymentStatus};

#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Opens the store at `path`, creating a header-only workbook (and its
    /// directory) when the file does not exist yet. An existing file is left
    /// untouched.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { path: path.into() };
        if !store.path.exists() {
            store.create()?;
        }
        Ok(store)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::open(config.records_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn create(&self) -> Result<()> {
        let init_error = |source: Box<dyn std::error::Error + Send + Sync>| StoreError::StorageInit {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|err| init_error(err.into()))?;
        }
        workbook::save(&self.path, &Table::new()).map_err(|err| init_error(err.into()))?;

        tracing::info!(path = %self.path.display(), "created payment records workbook");
        Ok(())
    }

    fn load(&self) -> Result<Table> {
        workbook::load(&self.path)
    }

    fn save(&self, table: &Table) -> Result<()> {
        workbook::save(&self.path, table)
    }

    /// Appends `record` as the last row. No uniqueness or value checks.
    pub fn add(&self, record: &PaymentRecord) -> Result<()> {
        let mut table = self.load()?;
        table.push(record);
        self.save(&table)?;

        tracing::info!(invoice_no = %record.invoice_no, "added payment record");
        Ok(())
    }

    /// Sets the payment status of the first row with `invoice_no`.
    ///
    /// Returns `false`, without touching the file, when no row matches.
    pub fn update_status(&self, invoice_no: &str, status: PaymentStatus) -> Result<bool> {
        let mut table = self.load()?;
        let Some(row) = table.position(invoice_no).and_then(|index| table.row_mut(index)) else {
            tracing::warn!(invoice_no, "no payment record to update");
            return Ok(false);
        };

        let previous = row.status();
        row.set_status(&status);
        self.save(&table)?;

        tracing::info!(invoice_no, from = %previous, to = %status, "updated payment status");
        Ok(true)
    }

    /// First record with `invoice_no`, if any.
    pub fn search(&self, invoice_no: &str) -> Result<Option<PaymentRecord>> {
        let table = self.load()?;
        table
            .position(invoice_no)
            .map(|index| table.rows()[index].to_record())
            .transpose()
    }

    /// All records in stored order.
    pub fn list(&self) -> Result<Vec<PaymentRecord>> {
        self.load()?.records()
    }

    /// All data rows as display text, in stored order.
    pub fn get_all(&self) -> Result<Vec<Vec<String>>> {
        let table = self.load()?;
        Ok(table
            .rows()
            .iter()
            .map(|row| row.cells().iter().map(|cell| cell.text().into_owned()).collect())
            .collect())
    }

    pub fn analyze(&self) -> Result<PaymentAnalysis> {
        PaymentAnalysis::of(&self.load()?)
    }

    /// Converts currency cells to numbers and rewrites the sheet layout.
    ///
    /// Fails with `MalformedField`, leaving the file as it was, when any
    /// currency cell is not numeric.
    pub fn adjust_formatting(&self) -> Result<SheetLayout> {
        let mut table = self.load()?;
        table.coerce_currency()?;
        self.save(&table)?;

        tracing::info!(rows = table.len(), "adjusted payment records formatting");
        Ok(SheetLayout::for_table(&table))
    }

    /// Rewrites the status fills; returns the fill of every row.
    pub fn highlight(&self) -> Result<Vec<Option<Fill>>> {
        let table = self.load()?;
        self.save(&table)?;

        let fills = highlight::fills(&table);
        tracing::info!(
            highlighted = fills.iter().filter(|fill| fill.is_some()).count(),
            "highlighted payment statuses"
        );
        Ok(fills)
    }

    /// Adds (or refreshes) the chart sheet with the paid/pending counts.
    ///
    /// Returns `None` and leaves the file untouched when there are no
    /// paid or pending records.
    pub fn generate_chart(&self) -> Result<Option<ChartSummary>> {
        let mut table = self.load()?;
        let summary = ChartSummary::of(&table);
        if summary.is_empty() {
            tracing::info!("no paid or pending records to chart");
            return Ok(None);
        }

        table.chart = true;
        self.save(&table)?;

        tracing::info!(paid = summary.paid, pending = summary.pending, "generated payment chart");
        Ok(Some(summary))
    }
}
