//! Integrity checks for price tables.
//!
//! Validates:
//! - Open prices are positive (returns are undefined otherwise)
//! - High/Low envelope (low <= open, close <= high)
//! - Chronological order of session dates
//!
//! Checks only report; rows are never dropped or repaired.

use chrono::NaiveDate;

use crate::data::{PriceBar, PriceTable};

/// Rows listed in a failed check's details before truncating.
const MAX_LISTED_ROWS: usize = 10;

/// Result of a single validation check.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub details: Option<String>,
}

impl CheckResult {
    pub fn pass(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.to_string(),
            details: None,
        }
    }

    pub fn fail(name: &str, message: &str, details: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.to_string(),
            details,
        }
    }
}

/// Complete integrity report for one table.
#[derive(Debug, Clone)]
pub struct IntegrityReport {
    pub row_count: usize,
    pub date_span: Option<(NaiveDate, NaiveDate)>,
    pub checks: Vec<CheckResult>,
}

impl IntegrityReport {
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failed_checks(&self) -> Vec<&CheckResult> {
        self.checks.iter().filter(|c| !c.passed).collect()
    }

    pub fn summary(&self) -> String {
        let passed = self.checks.iter().filter(|c| c.passed).count();
        let total = self.checks.len();
        match self.date_span {
            Some((first, last)) => format!(
                "{} rows ({} to {}): {}/{} checks passed",
                self.row_count, first, last, passed, total
            ),
            None => format!(
                "{} rows: {}/{} checks passed",
                self.row_count, passed, total
            ),
        }
    }
}

/// Validator for price table integrity.
#[derive(Debug, Default)]
pub struct TableIntegrityValidator;

impl TableIntegrityValidator {
    pub fn new() -> Self {
        Self
    }

    /// Run all checks on a table.
    pub fn validate(&self, table: &PriceTable) -> IntegrityReport {
        let checks = vec![
            self.check_open_prices(table),
            self.check_price_envelope(table),
            self.check_chronological_order(table),
        ];

        IntegrityReport {
            row_count: table.len(),
            date_span: table.date_span(),
            checks,
        }
    }

    /// Open prices must be strictly positive.
    fn check_open_prices(&self, table: &PriceTable) -> CheckResult {
        let zero: Vec<usize> = rows_where(table, |bar| bar.open == 0.0);
        let negative: Vec<usize> = rows_where(table, |bar| bar.open < 0.0);

        if zero.is_empty() && negative.is_empty() {
            return CheckResult::pass("open_prices", "All open prices positive");
        }

        let mut issues = Vec::new();
        if !zero.is_empty() {
            issues.push(format!("zero open at rows {}", list_rows(&zero)));
        }
        if !negative.is_empty() {
            issues.push(format!("negative open at rows {}", list_rows(&negative)));
        }
        CheckResult::fail(
            "open_prices",
            &format!("{} rows with non-positive open", zero.len() + negative.len()),
            Some(issues.join("; ")),
        )
    }

    /// High must cover open and close, low must sit under both.
    fn check_price_envelope(&self, table: &PriceTable) -> CheckResult {
        let with_range = table
            .iter()
            .filter(|bar| bar.high.is_some() && bar.low.is_some())
            .count();
        if with_range == 0 {
            return CheckResult::pass("price_envelope", "No High/Low data to check");
        }

        let violations = rows_where(table, |bar| match (bar.high, bar.low) {
            (Some(high), Some(low)) => {
                let body_top = bar.open.max(bar.close);
                let body_bottom = bar.open.min(bar.close);
                high < low || high < body_top || low > body_bottom
            }
            _ => false,
        });

        if violations.is_empty() {
            CheckResult::pass(
                "price_envelope",
                &format!("High/Low envelope consistent on {} rows", with_range),
            )
        } else {
            CheckResult::fail(
                "price_envelope",
                &format!("{} rows outside their High/Low envelope", violations.len()),
                Some(format!("rows {}", list_rows(&violations))),
            )
        }
    }

    /// Dated rows must be strictly increasing.
    fn check_chronological_order(&self, table: &PriceTable) -> CheckResult {
        let dated: Vec<(usize, NaiveDate)> = table
            .iter()
            .enumerate()
            .filter_map(|(row, bar)| bar.date.map(|d| (row, d)))
            .collect();

        if dated.is_empty() {
            return CheckResult::pass("chronological_order", "No dates to check");
        }

        let mut issues = Vec::new();
        for window in dated.windows(2) {
            let ((_, prev), (row, curr)) = (window[0], window[1]);
            if curr == prev {
                issues.push(format!("row {}: duplicate date {}", row, curr));
            } else if curr < prev {
                issues.push(format!("row {}: {} precedes {}", row, curr, prev));
            }
        }

        if issues.is_empty() {
            CheckResult::pass(
                "chronological_order",
                &format!("{} dated rows in order", dated.len()),
            )
        } else {
            let count = issues.len();
            issues.truncate(MAX_LISTED_ROWS);
            CheckResult::fail(
                "chronological_order",
                &format!("{} ordering issues found", count),
                Some(issues.join(", ")),
            )
        }
    }
}

fn rows_where<F>(table: &PriceTable, predicate: F) -> Vec<usize>
where
    F: Fn(&PriceBar) -> bool,
{
    table
        .iter()
        .enumerate()
        .filter(|(_, bar)| predicate(*bar))
        .map(|(row, _)| row)
        .collect()
}

fn list_rows(rows: &[usize]) -> String {
    let shown: Vec<String> = rows
        .iter()
        .take(MAX_LISTED_ROWS)
        .map(|r| r.to_string())
        .collect();
    if rows.len() > MAX_LISTED_ROWS {
        format!("{} (+{} more)", shown.join(", "), rows.len() - MAX_LISTED_ROWS)
    } else {
        shown.join(", ")
    }
}
