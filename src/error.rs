use std::path::PathBuf;

use thiserror::Error;

use crate::models::Column;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cannot initialise payment records at {}: {source}", path.display())]
    StorageInit {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("row {row}: {} holds {value:?}, expected a number", column.header())]
    MalformedField {
        /// 1-based worksheet row, header included.
        row: usize,
        column: Column,
        value: String,
    },

    #[error("payment records sheet has an unexpected header: {found:?}")]
    SchemaMismatch { found: Vec<String> },

    #[error("failed to read workbook: {0}")]
    Read(#[from] calamine::Error),

    #[error("failed to render workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to replace workbook: {0}")]
    Persist(#[from] tempfile::PersistError),
}

pub type Result<T> = std::result::Result<T, StoreError>;
