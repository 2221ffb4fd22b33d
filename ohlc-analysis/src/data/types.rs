//! Core data types for daily price bars.
//!
//! A `PriceTable` is the validated, immutable input to every analysis in
//! this crate. Rows are kept in insertion order, which by convention is
//! chronological order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PriceDataError {
    #[error("row {row}: {field} price is not a finite number ({value})")]
    NonFinitePrice {
        row: usize,
        field: &'static str,
        value: f64,
    },
}

/// One trading session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Session date, when the source provides one
    #[serde(default)]
    pub date: Option<NaiveDate>,

    /// Opening price
    pub open: f64,

    /// Session high
    #[serde(default)]
    pub high: Option<f64>,

    /// Session low
    #[serde(default)]
    pub low: Option<f64>,

    /// Closing price
    pub close: f64,
}

impl PriceBar {
    /// Create a bar from open and close only.
    pub fn new(open: f64, close: f64) -> Self {
        Self {
            date: None,
            open,
            high: None,
            low: None,
            close,
        }
    }

    /// Attach a session date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Attach the session high and low.
    pub fn with_range(mut self, high: f64, low: f64) -> Self {
        self.high = Some(high);
        self.low = Some(low);
        self
    }

    /// Fractional return within the session, `(close - open) / open`.
    ///
    /// Returns `None` when the open price is zero or the quotient overflows.
    pub fn daily_return(&self) -> Option<f64> {
        if self.open == 0.0 {
            return None;
        }
        Some((self.close - self.open) / self.open).filter(|r| r.is_finite())
    }

    fn validate(&self, row: usize) -> Result<(), PriceDataError> {
        let required = [("open", self.open), ("close", self.close)];
        let optional = [("high", self.high), ("low", self.low)];

        for (field, value) in required
            .into_iter()
            .chain(optional.into_iter().filter_map(|(f, v)| v.map(|v| (f, v))))
        {
            if !value.is_finite() {
                return Err(PriceDataError::NonFinitePrice { row, field, value });
            }
        }
        Ok(())
    }
}

/// Ordered sequence of price bars, one per session.
///
/// Every bar has finite prices; construction rejects the first row that
/// does not.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceTable {
    bars: Vec<PriceBar>,
}

impl PriceTable {
    /// Build a table, validating every row.
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, PriceDataError> {
        for (row, bar) in bars.iter().enumerate() {
            bar.validate(row)?;
        }
        Ok(Self { bars })
    }

    /// Build a table from `(open, close)` pairs.
    pub fn from_open_close<I>(pairs: I) -> Result<Self, PriceDataError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(open, close)| PriceBar::new(open, close))
                .collect(),
        )
    }

    /// Wrap bars that were taken from an already validated table.
    pub(crate) fn from_validated(bars: Vec<PriceBar>) -> Self {
        Self { bars }
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PriceBar> {
        self.bars.iter()
    }

    pub fn get(&self, row: usize) -> Option<&PriceBar> {
        self.bars.get(row)
    }

    /// First and last session dates, if the bars carry dates.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.bars.iter().find_map(|b| b.date)?;
        let last = self.bars.iter().rev().find_map(|b| b.date)?;
        Some((first, last))
    }

    pub fn into_bars(self) -> Vec<PriceBar> {
        self.bars
    }
}

impl<'a> IntoIterator for &'a PriceTable {
    type Item = &'a PriceBar;
    type IntoIter = std::slice::Iter<'a, PriceBar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_daily_return() {
        let bar = PriceBar::new(100.0, 110.0);
        assert_relative_eq!(bar.daily_return().unwrap(), 0.10, epsilon = 1e-9);

        let bar = PriceBar::new(0.0, 5.0);
        assert_eq!(bar.daily_return(), None);
        let bar = PriceBar::new(1e-300, 1e10);
        assert_eq!(bar.daily_return(), None);
    }

    #[test]
    fn test_table_rejects_non_finite_open() {
        let err = PriceTable::from_open_close([(10.0, 11.0), (f64::NAN, 9.0)]).unwrap_err();
        match err {
            PriceDataError::NonFinitePrice { row, field, .. } => {
                assert_eq!(row, 1);
                assert_eq!(field, "open");
            }
        }
    }

    #[test]
    fn test_table_rejects_infinite_high() {
        let bars = vec![
            PriceBar::new(10.0, 11.0).with_range(12.0, 9.0),
            PriceBar::new(10.0, 11.0).with_range(f64::INFINITY, 9.0),
        ];
        let err = PriceTable::new(bars).unwrap_err();
        assert_eq!(
            err.to_string(),
            "row 1: high price is not a finite number (inf)"
        );
    }

    #[test]
    fn test_empty_table() {
        let table = PriceTable::new(Vec::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.date_span(), None);
    }

    #[test]
    fn test_date_span() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let table = PriceTable::new(vec![
            PriceBar::new(1.0, 2.0).with_date(d1),
            PriceBar::new(2.0, 2.0),
            PriceBar::new(2.0, 3.0).with_date(d2),
        ])
        .unwrap();
        assert_eq!(table.date_span(), Some((d1, d2)));
    }
}
