//! Day-type counts and percentage distribution.

use serde::{Deserialize, Serialize};

use super::day_type::DayType;

/// Number of sessions of each day type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTypeCounts {
    pub green: usize,
    pub red: usize,
    pub neutral: usize,
}

impl DayTypeCounts {
    pub fn from_labels(labels: &[DayType]) -> Self {
        labels.iter().fold(Self::default(), |mut counts, label| {
            match label {
                DayType::Green => counts.green += 1,
                DayType::Red => counts.red += 1,
                DayType::Neutral => counts.neutral += 1,
            }
            counts
        })
    }

    pub fn get(&self, day_type: DayType) -> usize {
        match day_type {
            DayType::Green => self.green,
            DayType::Red => self.red,
            DayType::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.green + self.red + self.neutral
    }

    /// Convert counts to percentages of their own total.
    pub fn percentages(&self) -> PercentageDistribution {
        let total = self.total();
        PercentageDistribution {
            green: calculate_percentage(self.green, total),
            red: calculate_percentage(self.red, total),
            neutral: calculate_percentage(self.neutral, total),
        }
    }
}

/// Share of each day type, in percent rounded to two decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PercentageDistribution {
    pub green: f64,
    pub red: f64,
    pub neutral: f64,
}

impl PercentageDistribution {
    pub fn get(&self, day_type: DayType) -> f64 {
        match day_type {
            DayType::Green => self.green,
            DayType::Red => self.red,
            DayType::Neutral => self.neutral,
        }
    }

    pub fn sum(&self) -> f64 {
        self.green + self.red + self.neutral
    }
}

/// Percentage distribution of a label sequence.
pub fn distribution(labels: &[DayType]) -> PercentageDistribution {
    DayTypeCounts::from_labels(labels).percentages()
}

/// `count / total` as a percentage rounded to two decimals; zero when
/// `total` is zero.
pub fn calculate_percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(count as f64 / total as f64 * 100.0, 2)
}

/// Round half away from zero to `places` decimals.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}
