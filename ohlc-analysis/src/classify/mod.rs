//! Day-type classification module.
//!
//! Categorizes sessions by the direction of their close relative to the open:
//! - Green: close > open
//! - Red: close < open
//! - Neutral: close == open

pub mod day_type;
pub mod distribution;

pub use day_type::{
    classify, classify_with_threshold, count_of, select, ClassifyError, DayType, LabeledTable,
    DEFAULT_PARALLEL_THRESHOLD,
};
pub use distribution::{calculate_percentage, distribution, DayTypeCounts, PercentageDistribution};
