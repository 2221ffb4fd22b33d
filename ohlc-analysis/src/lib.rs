pub mod analyzer;
pub mod classify;
pub mod config;
pub mod data;
pub mod metrics;
pub mod validation;

// Re-export commonly used types
pub use analyzer::{AnalysisError, AnalysisReport, OhlcAnalyzer};
pub use classify::{
    calculate_percentage, classify, count_of, distribution, select, ClassifyError, DayType,
    DayTypeCounts, LabeledTable, PercentageDistribution,
};
pub use config::{AnalysisConfig, Config, ConfigError};
pub use data::{LoaderConfig, LoaderError, PriceBar, PriceLoader, PriceTable};
pub use metrics::{
    average, daily_returns, maximum, median, minimum, standard_deviation, MetricsError,
    ReturnSeries, ReturnSummary,
};
pub use validation::{IntegrityReport, TableIntegrityValidator};
