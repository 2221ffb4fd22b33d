//! Day-type classifier.
//!
//! Labels each session Green (close above open), Red (close below open) or
//! Neutral (close equal to open). Equality is exact; there is no tolerance
//! band around the open.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{PriceBar, PriceTable};

use super::distribution::{DayTypeCounts, PercentageDistribution};

/// Row count at which classification moves onto the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 100_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("label sequence has {labels} entries but table has {rows} rows")]
    Misaligned { rows: usize, labels: usize },

    #[error("unknown day type: {0}")]
    UnknownDayType(String),
}

/// Directional classification of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Green,
    Red,
    Neutral,
}

impl DayType {
    pub const ALL: [DayType; 3] = [DayType::Green, DayType::Red, DayType::Neutral];

    /// Classify a single bar.
    pub fn of(bar: &PriceBar) -> Self {
        if bar.close > bar.open {
            Self::Green
        } else if bar.close < bar.open {
            Self::Red
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Red => "red",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayType {
    type Err = ClassifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "green" => Ok(Self::Green),
            "red" => Ok(Self::Red),
            "neutral" => Ok(Self::Neutral),
            _ => Err(ClassifyError::UnknownDayType(s.to_string())),
        }
    }
}

/// A price table paired row-for-row with its day types.
///
/// The pairing is fixed at construction; nothing can change one side
/// without the other.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabeledTable {
    table: PriceTable,
    labels: Vec<DayType>,
}

impl LabeledTable {
    /// Pair a table with labels computed elsewhere.
    pub fn from_parts(table: PriceTable, labels: Vec<DayType>) -> Result<Self, ClassifyError> {
        check_alignment(&table, &labels)?;
        Ok(Self { table, labels })
    }

    pub fn table(&self) -> &PriceTable {
        &self.table
    }

    pub fn labels(&self) -> &[DayType] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Rows with their labels, in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&PriceBar, DayType)> + '_ {
        self.table.iter().zip(self.labels.iter().copied())
    }

    /// Rows whose label equals `target`, in table order.
    pub fn select(&self, target: DayType) -> PriceTable {
        select_aligned(&self.table, &self.labels, target)
    }

    pub fn green_days(&self) -> PriceTable {
        self.select(DayType::Green)
    }

    pub fn red_days(&self) -> PriceTable {
        self.select(DayType::Red)
    }

    pub fn neutral_days(&self) -> PriceTable {
        self.select(DayType::Neutral)
    }

    pub fn count_of(&self, target: DayType) -> usize {
        count_of(&self.labels, target)
    }

    pub fn counts(&self) -> DayTypeCounts {
        DayTypeCounts::from_labels(&self.labels)
    }

    pub fn distribution(&self) -> PercentageDistribution {
        self.counts().percentages()
    }

    pub fn into_parts(self) -> (PriceTable, Vec<DayType>) {
        (self.table, self.labels)
    }
}

/// Label every row of a table.
pub fn classify(table: &PriceTable) -> LabeledTable {
    classify_with_threshold(table, DEFAULT_PARALLEL_THRESHOLD)
}

/// Label every row, using the rayon pool once the table reaches
/// `parallel_threshold` rows.
pub fn classify_with_threshold(table: &PriceTable, parallel_threshold: usize) -> LabeledTable {
    let labels: Vec<DayType> = if table.len() >= parallel_threshold {
        table.bars().par_iter().map(DayType::of).collect()
    } else {
        table.iter().map(DayType::of).collect()
    };

    LabeledTable {
        table: table.clone(),
        labels,
    }
}

/// Rows of `table` whose paired label equals `target`.
pub fn select(
    table: &PriceTable,
    labels: &[DayType],
    target: DayType,
) -> Result<PriceTable, ClassifyError> {
    check_alignment(table, labels)?;
    Ok(select_aligned(table, labels, target))
}

/// Number of labels equal to `target`.
pub fn count_of(labels: &[DayType], target: DayType) -> usize {
    labels.iter().filter(|&&label| label == target).count()
}

fn select_aligned(table: &PriceTable, labels: &[DayType], target: DayType) -> PriceTable {
    let bars = table
        .iter()
        .zip(labels)
        .filter(|(_, &label)| label == target)
        .map(|(bar, _)| bar.clone())
        .collect();
    PriceTable::from_validated(bars)
}

fn check_alignment(table: &PriceTable, labels: &[DayType]) -> Result<(), ClassifyError> {
    if table.len() != labels.len() {
        return Err(ClassifyError::Misaligned {
            rows: table.len(),
            labels: labels.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> PriceTable {
        PriceTable::from_open_close([(10.0, 12.0), (10.0, 8.0), (10.0, 10.0)]).unwrap()
    }

    #[test]
    fn test_day_type_of() {
        assert_eq!(DayType::of(&PriceBar::new(10.0, 12.0)), DayType::Green);
        assert_eq!(DayType::of(&PriceBar::new(10.0, 8.0)), DayType::Red);
        assert_eq!(DayType::of(&PriceBar::new(10.0, 10.0)), DayType::Neutral);
    }

    #[test]
    fn test_neutral_uses_exact_equality() {
        let bar = PriceBar::new(10.0, 10.0 + 1e-12);
        assert_eq!(DayType::of(&bar), DayType::Green);
    }

    #[test]
    fn test_day_type_parsing() {
        assert_eq!("green".parse::<DayType>().unwrap(), DayType::Green);
        assert_eq!("RED".parse::<DayType>().unwrap(), DayType::Red);
        assert_eq!("Neutral".parse::<DayType>().unwrap(), DayType::Neutral);
        assert_eq!(" green ".parse::<DayType>().unwrap(), DayType::Green);
        assert!("purple".parse::<DayType>().is_err());
        assert!("g".parse::<DayType>().is_err());
        assert!("up".parse::<DayType>().is_err());
        assert!("flat".parse::<DayType>().is_err());
    }

    #[test]
    fn test_day_type_serde() {
        let json = serde_json::to_string(&DayType::Neutral).unwrap();
        assert_eq!(json, "\"neutral\"");
    }

    #[test]
    fn test_classify_scenario() {
        let labeled = classify(&scenario());
        assert_eq!(
            labeled.labels(),
            &[DayType::Green, DayType::Red, DayType::Neutral]
        );
        assert_eq!(labeled.table(), &scenario());
    }

    #[test]
    fn test_classify_empty() {
        let labeled = classify(&PriceTable::default());
        assert!(labeled.is_empty());
        assert!(labeled.table().is_empty());
    }

    #[test]
    fn test_classify_is_idempotent() {
        let table = scenario();
        assert_eq!(classify(&table), classify(&table));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pairs: Vec<(f64, f64)> = (0..1000)
            .map(|i| (100.0, 100.0 + ((i % 7) as f64 - 3.0)))
            .collect();
        let table = PriceTable::from_open_close(pairs).unwrap();

        let sequential = classify_with_threshold(&table, usize::MAX);
        let parallel = classify_with_threshold(&table, 0);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_subsets_partition_table() {
        let pairs: Vec<(f64, f64)> = (0..50)
            .map(|i| (20.0, 20.0 + ((i % 5) as f64 - 2.0)))
            .collect();
        let table = PriceTable::from_open_close(pairs).unwrap();
        let labeled = classify(&table);

        let green = labeled.green_days();
        let red = labeled.red_days();
        let neutral = labeled.neutral_days();
        assert_eq!(green.len() + red.len() + neutral.len(), table.len());

        assert!(green.iter().all(|b| b.close > b.open));
        assert!(red.iter().all(|b| b.close < b.open));
        assert!(neutral.iter().all(|b| b.close == b.open));
    }

    #[test]
    fn test_select_preserves_order() {
        let table =
            PriceTable::from_open_close([(1.0, 2.0), (5.0, 4.0), (3.0, 4.0), (7.0, 9.0)]).unwrap();
        let labels = classify(&table).labels().to_vec();

        let green = select(&table, &labels, DayType::Green).unwrap();
        let opens: Vec<f64> = green.iter().map(|b| b.open).collect();
        assert_eq!(opens, vec![1.0, 3.0, 7.0]);
    }

    #[test]
    fn test_select_misaligned() {
        let table = scenario();
        let err = select(&table, &[DayType::Green], DayType::Green).unwrap_err();
        assert_eq!(err, ClassifyError::Misaligned { rows: 3, labels: 1 });
    }

    #[test]
    fn test_from_parts_misaligned() {
        let err = LabeledTable::from_parts(scenario(), Vec::new()).unwrap_err();
        assert!(matches!(err, ClassifyError::Misaligned { rows: 3, labels: 0 }));
    }

    #[test]
    fn test_counts_sum_to_len() {
        let labeled = classify(&scenario());
        let total: usize = DayType::ALL.iter().map(|&t| labeled.count_of(t)).sum();
        assert_eq!(total, labeled.len());
        assert_eq!(count_of(labeled.labels(), DayType::Red), 1);
    }

    #[test]
    fn test_source_table_unchanged() {
        let table = scenario();
        let before = table.clone();
        let labeled = classify(&table);
        let _ = labeled.select(DayType::Red);
        assert_eq!(table, before);
    }
}
