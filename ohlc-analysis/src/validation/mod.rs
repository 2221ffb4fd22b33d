//! Validation module for loaded price tables.
//!
//! Reports on open-price positivity, High/Low consistency and date order.

pub mod integrity;

pub use integrity::{CheckResult, IntegrityReport, TableIntegrityValidator};
