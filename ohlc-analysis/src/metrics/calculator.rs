//! Return statistics calculator.
//!
//! Each reducer rounds its result to four decimals. Empty input is always
//! an error, never a NaN.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use thiserror::Error;

use crate::classify::distribution::round_to;

/// Decimal places kept by every reducer.
pub const STATISTIC_DECIMALS: i32 = 4;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricsError {
    #[error("cannot compute {operation} of an empty return series")]
    EmptyInput { operation: &'static str },

    #[error("{operation} needs at least {required} observations, got {actual}")]
    InsufficientData {
        operation: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("row {row}: open price is zero")]
    ZeroOpen { row: usize },

    #[error("row {row}: return is not a finite number")]
    NonFiniteReturn { row: usize },

    #[error("return at index {index} is not a finite number")]
    NonFiniteValue { index: usize },
}

/// Arithmetic mean.
pub fn average(returns: &[f64]) -> Result<f64, MetricsError> {
    check_input(returns, "average")?;
    Ok(round_to(Statistics::mean(returns), STATISTIC_DECIMALS))
}

/// Middle value of the sorted returns; mean of the two middle values for an
/// even count.
pub fn median(returns: &[f64]) -> Result<f64, MetricsError> {
    check_input(returns, "median")?;

    let mut sorted = returns.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    let value = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };
    Ok(round_to(value, STATISTIC_DECIMALS))
}

pub fn maximum(returns: &[f64]) -> Result<f64, MetricsError> {
    check_input(returns, "maximum")?;
    Ok(round_to(Statistics::max(returns), STATISTIC_DECIMALS))
}

pub fn minimum(returns: &[f64]) -> Result<f64, MetricsError> {
    check_input(returns, "minimum")?;
    Ok(round_to(Statistics::min(returns), STATISTIC_DECIMALS))
}

/// Sample standard deviation (n - 1 denominator).
pub fn standard_deviation(returns: &[f64]) -> Result<f64, MetricsError> {
    check_input(returns, "standard deviation")?;
    if returns.len() < 2 {
        return Err(MetricsError::InsufficientData {
            operation: "standard deviation",
            required: 2,
            actual: returns.len(),
        });
    }
    Ok(round_to(Statistics::std_dev(returns), STATISTIC_DECIMALS))
}

fn check_input(returns: &[f64], operation: &'static str) -> Result<(), MetricsError> {
    if returns.is_empty() {
        return Err(MetricsError::EmptyInput { operation });
    }
    if let Some(index) = returns.iter().position(|r| !r.is_finite()) {
        return Err(MetricsError::NonFiniteValue { index });
    }
    Ok(())
}

/// All five return statistics together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSummary {
    pub observations: usize,
    pub mean: f64,
    pub median: f64,
    pub max: f64,
    pub min: f64,
    /// `None` for a single observation.
    pub std_dev: Option<f64>,
}

impl ReturnSummary {
    pub fn from_returns(returns: &[f64]) -> Result<Self, MetricsError> {
        let std_dev = match standard_deviation(returns) {
            Ok(value) => Some(value),
            Err(MetricsError::InsufficientData { .. }) => None,
            Err(e) => return Err(e),
        };

        Ok(Self {
            observations: returns.len(),
            mean: average(returns)?,
            median: median(returns)?,
            max: maximum(returns)?,
            min: minimum(returns)?,
            std_dev,
        })
    }

    pub fn summary(&self) -> String {
        let std_dev = self
            .std_dev
            .map(|s| format!("{:.4}", s))
            .unwrap_or_else(|| "n/a".to_string());
        format!(
            "Return Statistics ({} sessions)\n\
             ==============================\n\
             Average Return: {:.4}\n\
             Median Return: {:.4}\n\
             Max Return: {:.4}\n\
             Min Return: {:.4}\n\
             Standard Deviation: {}",
            self.observations, self.mean, self.median, self.max, self.min, std_dev
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_average() {
        assert_eq!(average(&[0.1, -0.1, 0.2]).unwrap(), 0.0667);
        assert_eq!(average(&[0.2, -0.2, 0.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[0.3, -0.1, 0.2]).unwrap(), 0.2);
        assert_relative_eq!(median(&[0.4, 0.1, -0.2, 0.3]).unwrap(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_max_min() {
        let returns = [0.01234, -0.05678, 0.0];
        assert_eq!(maximum(&returns).unwrap(), 0.0123);
        assert_eq!(minimum(&returns).unwrap(), -0.0568);
    }

    #[test]
    fn test_std_dev_constant_series() {
        assert_eq!(standard_deviation(&[0.1, 0.1, 0.1]).unwrap(), 0.0);
    }

    #[test]
    fn test_std_dev_is_sample() {
        // population std of [1, 2, 3, 4] is 1.1180, sample std is 1.2910
        assert_eq!(standard_deviation(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 1.291);
    }

    #[test]
    fn test_empty_input_errors() {
        let empty: [f64; 0] = [];
        assert_eq!(
            average(&empty),
            Err(MetricsError::EmptyInput { operation: "average" })
        );
        assert!(matches!(median(&empty), Err(MetricsError::EmptyInput { .. })));
        assert!(matches!(maximum(&empty), Err(MetricsError::EmptyInput { .. })));
        assert!(matches!(minimum(&empty), Err(MetricsError::EmptyInput { .. })));
        assert!(matches!(
            standard_deviation(&empty),
            Err(MetricsError::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_std_dev_single_observation() {
        let err = standard_deviation(&[0.05]).unwrap_err();
        assert_eq!(
            err,
            MetricsError::InsufficientData {
                operation: "standard deviation",
                required: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = average(&[0.1, f64::NAN]).unwrap_err();
        assert_eq!(err, MetricsError::NonFiniteValue { index: 1 });
    }

    #[test]
    fn test_summary_single_observation() {
        let summary = ReturnSummary::from_returns(&[0.05]).unwrap();
        assert_eq!(summary.mean, 0.05);
        assert_eq!(summary.median, 0.05);
        assert_eq!(summary.std_dev, None);
        assert!(summary.summary().contains("Standard Deviation: n/a"));
    }

    #[test]
    fn test_summary_empty() {
        assert!(ReturnSummary::from_returns(&[]).is_err());
    }

    #[test]
    fn test_large_finite_values_stay_finite() {
        assert_eq!(average(&[1e305]).unwrap(), 1e305);
        assert_eq!(maximum(&[2e305, 1.0]).unwrap(), 2e305);
        assert_eq!(minimum(&[-2e305, 1.0]).unwrap(), -2e305);
    }
}
