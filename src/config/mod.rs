use std::path::{Path, PathBuf};

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

const DEFAULT_RECORDS_FILE: &str = "data/payment_records.xlsx";

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Location of the payment records workbook
    #[serde(default = "default_records_file")]
    pub payment_records_file: PathBuf,
}

fn default_records_file() -> PathBuf {
    PathBuf::from(DEFAULT_RECORDS_FILE)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            payment_records_file: default_records_file(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Variables from a `.env` file are loaded first if one exists, then
    /// `PAYMENT_RECORDS_FILE` is read from the environment.
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Get a direct reference to the records file location
    pub fn records_file(&self) -> &Path {
        &self.payment_records_file
    }
}

/// Load configuration, letting `records_file` override the environment
pub fn init(records_file: Option<PathBuf>) -> Result<Config> {
    let mut config = Config::load()?;

    if let Some(path) = records_file {
        config.payment_records_file = path;
    }

    Ok(config)
}
