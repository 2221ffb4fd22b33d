//! Return metrics module.
//!
//! Provides:
//! - Per-session fractional returns
//! - Mean, median, max, min
//! - Sample standard deviation

pub mod calculator;
pub mod returns;

pub use calculator::{
    average, maximum, median, minimum, standard_deviation, MetricsError, ReturnSummary,
};
pub use returns::{daily_returns, daily_returns_with_threshold, ReturnSeries};
