//! Per-session return calculation.

use std::ops::Deref;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::classify::DEFAULT_PARALLEL_THRESHOLD;
use crate::data::PriceTable;

use super::calculator::{MetricsError, ReturnSummary};

/// Fractional returns, one per table row, in table order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReturnSeries(Vec<f64>);

impl ReturnSeries {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    pub fn summary(&self) -> Result<ReturnSummary, MetricsError> {
        ReturnSummary::from_returns(&self.0)
    }
}

impl Deref for ReturnSeries {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl From<ReturnSeries> for Vec<f64> {
    fn from(series: ReturnSeries) -> Self {
        series.0
    }
}

/// `(close - open) / open` for every row.
///
/// Fails on the first row whose open price is zero, or whose quotient
/// overflows to a non-finite value.
pub fn daily_returns(table: &PriceTable) -> Result<ReturnSeries, MetricsError> {
    daily_returns_with_threshold(table, DEFAULT_PARALLEL_THRESHOLD)
}

pub fn daily_returns_with_threshold(
    table: &PriceTable,
    parallel_threshold: usize,
) -> Result<ReturnSeries, MetricsError> {
    if let Some(row) = table.iter().position(|bar| bar.open == 0.0) {
        return Err(MetricsError::ZeroOpen { row });
    }

    let returns: Vec<f64> = if table.len() >= parallel_threshold {
        table
            .bars()
            .par_iter()
            .map(|bar| (bar.close - bar.open) / bar.open)
            .collect()
    } else {
        table
            .iter()
            .map(|bar| (bar.close - bar.open) / bar.open)
            .collect()
    };

    if let Some(row) = returns.iter().position(|r| !r.is_finite()) {
        return Err(MetricsError::NonFiniteReturn { row });
    }

    Ok(ReturnSeries(returns))
}
