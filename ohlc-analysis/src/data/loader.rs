//! Price table loader.
//!
//! Reads a delimited file (or an in-memory polars `DataFrame`) into a
//! `PriceTable`. The loader owns column naming and cell parsing; anything
//! that cannot be turned into a finite price is rejected with the row that
//! produced it.

use std::io::Cursor;
use std::path::Path;

use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::types::{PriceBar, PriceDataError, PriceTable};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("row {row}: column {column}: {reason}")]
    MalformedRow {
        row: usize,
        column: String,
        reason: String,
    },

    #[error("Invalid table: {0}")]
    InvalidTable(#[from] PriceDataError),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Column naming for the source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Required open price column.
    pub open_column: String,
    /// Required close price column.
    pub close_column: String,
    /// Optional high price column.
    pub high_column: Option<String>,
    /// Optional low price column.
    pub low_column: Option<String>,
    /// Optional session date column.
    pub date_column: Option<String>,
    /// chrono format string for the date column.
    pub date_format: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            open_column: "Open".to_string(),
            close_column: "Close".to_string(),
            high_column: Some("High".to_string()),
            low_column: Some("Low".to_string()),
            date_column: Some("Date".to_string()),
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

/// Loads price tables from CSV files or DataFrames.
#[derive(Debug, Clone, Default)]
pub struct PriceLoader {
    config: LoaderConfig,
}

impl PriceLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load a CSV file with a header row.
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<PriceTable, LoaderError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LoaderError::FileNotFound(path.display().to_string()));
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;

        let table = self.read_dataframe(&df)?;
        info!(
            path = %path.display(),
            rows = table.len(),
            "Loaded price table"
        );
        Ok(table)
    }

    /// Parse CSV text with a header row.
    pub fn parse_csv(&self, text: &str) -> Result<PriceTable, LoaderError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .into_reader_with_file_handle(Cursor::new(text.as_bytes().to_vec()))
            .finish()?;
        self.read_dataframe(&df)
    }

    /// Convert a DataFrame into a validated price table.
    pub fn read_dataframe(&self, df: &DataFrame) -> Result<PriceTable, LoaderError> {
        let opens = self.required_prices(df, &self.config.open_column)?;
        let closes = self.required_prices(df, &self.config.close_column)?;
        let highs = self.optional_prices(df, self.config.high_column.as_deref())?;
        let lows = self.optional_prices(df, self.config.low_column.as_deref())?;
        let dates = self.optional_dates(df)?;

        let bars = (0..df.height())
            .map(|row| PriceBar {
                date: dates.as_ref().and_then(|d| d[row]),
                open: opens[row],
                high: highs.as_ref().and_then(|h| h[row]),
                low: lows.as_ref().and_then(|l| l[row]),
                close: closes[row],
            })
            .collect();

        Ok(PriceTable::new(bars)?)
    }

    /// Read a required numeric column; nulls are malformed rows.
    fn required_prices(&self, df: &DataFrame, name: &str) -> Result<Vec<f64>, LoaderError> {
        if df.get_column_index(name).is_none() {
            return Err(LoaderError::MissingColumn(name.to_string()));
        }

        let column = df.column(name)?.cast(&DataType::Float64)?;
        column
            .f64()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                value.ok_or_else(|| LoaderError::MalformedRow {
                    row,
                    column: name.to_string(),
                    reason: "value is missing or not numeric".to_string(),
                })
            })
            .collect()
    }

    /// Read an optional numeric column; absent columns yield `None`.
    fn optional_prices(
        &self,
        df: &DataFrame,
        name: Option<&str>,
    ) -> Result<Option<Vec<Option<f64>>>, LoaderError> {
        let Some(name) = name else {
            return Ok(None);
        };
        if df.get_column_index(name).is_none() {
            debug!(column = name, "Optional price column not present");
            return Ok(None);
        }

        let column = df.column(name)?.cast(&DataType::Float64)?;
        Ok(Some(column.f64()?.into_iter().collect()))
    }

    fn optional_dates(
        &self,
        df: &DataFrame,
    ) -> Result<Option<Vec<Option<NaiveDate>>>, LoaderError> {
        let Some(name) = self.config.date_column.as_deref() else {
            return Ok(None);
        };
        if df.get_column_index(name).is_none() {
            debug!(column = name, "Date column not present");
            return Ok(None);
        }

        let column = df.column(name)?.cast(&DataType::String)?;
        let dates = column
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| match value {
                None => Ok(None),
                Some(s) => NaiveDate::parse_from_str(s.trim(), &self.config.date_format)
                    .map(Some)
                    .map_err(|e| LoaderError::MalformedRow {
                        row,
                        column: name.to_string(),
                        reason: format!("invalid date {:?}: {}", s, e),
                    }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(dates))
    }
}
