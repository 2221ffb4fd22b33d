//! End-to-end analysis of a price table.
//!
//! Runs classification, percentage distribution and return statistics in one
//! pass under a shared `AnalysisConfig`.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::classify::{classify_with_threshold, DayTypeCounts, LabeledTable, PercentageDistribution};
use crate::config::AnalysisConfig;
use crate::data::PriceTable;
use crate::metrics::{daily_returns_with_threshold, MetricsError, ReturnSeries, ReturnSummary};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Return calculation failed: {0}")]
    Metrics(#[from] MetricsError),
}

/// Everything the analyzer derives from one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub rows: usize,
    pub counts: DayTypeCounts,
    pub distribution: PercentageDistribution,
    /// `None` for an empty table.
    pub returns: Option<ReturnSummary>,
}

impl AnalysisReport {
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Day Types ({} sessions)\n\
             ========================\n\
             Green: {} ({:.2}%)\n\
             Red: {} ({:.2}%)\n\
             Neutral: {} ({:.2}%)",
            self.rows,
            self.counts.green,
            self.distribution.green,
            self.counts.red,
            self.distribution.red,
            self.counts.neutral,
            self.distribution.neutral,
        );

        match &self.returns {
            Some(returns) => {
                out.push_str("\n\n");
                out.push_str(&returns.summary());
            }
            None => out.push_str("\n\nNo sessions; return statistics undefined."),
        }
        out
    }
}

/// Pipeline runner.
#[derive(Debug, Clone, Default)]
pub struct OhlcAnalyzer {
    config: AnalysisConfig,
}

impl OhlcAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn classify(&self, table: &PriceTable) -> LabeledTable {
        self.log_path("classify", table);
        classify_with_threshold(table, self.config.parallel_threshold)
    }

    pub fn daily_returns(&self, table: &PriceTable) -> Result<ReturnSeries, MetricsError> {
        self.log_path("daily_returns", table);
        daily_returns_with_threshold(table, self.config.parallel_threshold)
    }

    /// Classify, count and summarise returns.
    pub fn analyze(&self, table: &PriceTable) -> Result<AnalysisReport, AnalysisError> {
        let labeled = self.classify(table);
        let counts = labeled.counts();

        let returns = if table.is_empty() {
            None
        } else {
            Some(self.daily_returns(table)?.summary()?)
        };

        Ok(AnalysisReport {
            rows: table.len(),
            counts,
            distribution: counts.percentages(),
            returns,
        })
    }

    fn log_path(&self, operation: &str, table: &PriceTable) {
        debug!(
            operation,
            rows = table.len(),
            parallel = table.len() >= self.config.parallel_threshold,
            "Running row-wise pass"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::DayType;

    fn scenario() -> PriceTable {
        PriceTable::from_open_close([(10.0, 12.0), (10.0, 8.0), (10.0, 10.0)]).unwrap()
    }

    #[test]
    fn test_analyze_scenario() {
        let report = OhlcAnalyzer::default().analyze(&scenario()).unwrap();

        assert_eq!(report.rows, 3);
        assert_eq!(report.counts.total(), 3);
        assert_eq!(report.distribution.green, 33.33);
        assert_eq!(report.distribution.red, 33.33);
        assert_eq!(report.distribution.neutral, 33.33);

        let returns = report.returns.unwrap();
        assert_eq!(returns.mean, 0.0);
        assert_eq!(returns.median, 0.0);
        assert_eq!(returns.max, 0.2);
        assert_eq!(returns.min, -0.2);
        assert_eq!(returns.std_dev, Some(0.2));
    }

    #[test]
    fn test_analyze_empty_table() {
        let report = OhlcAnalyzer::default().analyze(&PriceTable::default()).unwrap();
        assert_eq!(report.rows, 0);
        assert_eq!(report.distribution, PercentageDistribution::default());
        assert_eq!(report.returns, None);
        assert!(report.summary().contains("return statistics undefined"));
    }

    #[test]
    fn test_analyze_zero_open() {
        let table = PriceTable::from_open_close([(1.0, 2.0), (0.0, 2.0)]).unwrap();
        let err = OhlcAnalyzer::default().analyze(&table).unwrap_err();
        assert_eq!(err, AnalysisError::Metrics(MetricsError::ZeroOpen { row: 1 }));
    }

    #[test]
    fn test_parallel_config_gives_same_report() {
        let pairs: Vec<(f64, f64)> = (1..=300)
            .map(|i| (50.0, 50.0 + ((i % 11) as f64 - 5.0) * 0.25))
            .collect();
        let table = PriceTable::from_open_close(pairs).unwrap();

        let sequential = OhlcAnalyzer::default().analyze(&table).unwrap();
        let parallel = OhlcAnalyzer::new(AnalysisConfig {
            parallel_threshold: 1,
        })
        .analyze(&table)
        .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_classify_uses_labeled_table() {
        let labeled = OhlcAnalyzer::default().classify(&scenario());
        assert_eq!(labeled.count_of(DayType::Green), 1);
        assert_eq!(labeled.green_days().len(), 1);
    }

    #[test]
    fn test_summary_text() {
        let report = OhlcAnalyzer::default().analyze(&scenario()).unwrap();
        let text = report.summary();
        assert!(text.contains("Green: 1 (33.33%)"));
        assert!(text.contains("Average Return: 0.0000"));
    }
}
