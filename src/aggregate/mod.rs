//! Cell aggregation
//!
//! Reduces each cell's raw observations to one display value and one label.
//! The reporting mode picks a single [`Aggregator`] per run; every cell then
//! goes through the same `(observations, canonical) -> AggregatedCell` call.

pub mod stats;

use serde::{Deserialize, Serialize};

use crate::matrix::{ObservedValue, Observations, OrderPolicy, PairMatrix};
use crate::registry::ModelId;
use crate::trials::{ParseOptions, SeedRange};

/// Label shown for an empty cell that could have held data
pub const NO_DATA_LABEL: &str = "n/a";

/// Time observations are divided by this before display
pub const TIME_SCALE: f64 = 1000.0;

/// What a heatmap reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// Mean step count, unsolved trials clamped to 100
    #[default]
    MeanOutcome,
    /// Mean step count over solved trials only
    OnlySolved,
    /// Percentage of trials solved
    SolvedPercentage,
    /// Percentage of trials solved, with expected run counts alongside
    SolvedCount,
    /// Mean compute time
    Time,
}

/// Colour-scale bounds a renderer should use; `max: None` is open-ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: Option<f64>,
}

impl ReportMode {
    pub fn name(&self) -> &'static str {
        match self {
            ReportMode::MeanOutcome => "mean-outcome",
            ReportMode::OnlySolved => "only-solved",
            ReportMode::SolvedPercentage => "solved-percentage",
            ReportMode::SolvedCount => "solved-count",
            ReportMode::Time => "time",
        }
    }

    /// Appended to the level (or "total") when naming output files
    pub fn file_suffix(&self) -> &'static str {
        match self {
            ReportMode::MeanOutcome => "",
            ReportMode::OnlySolved => "_solved",
            ReportMode::SolvedPercentage => "_solved_pct",
            ReportMode::SolvedCount => "_solved_count",
            ReportMode::Time => "_time",
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            only_solved: matches!(self, ReportMode::OnlySolved),
            read_time: matches!(self, ReportMode::Time),
        }
    }

    pub fn observed_value(&self) -> ObservedValue {
        match self {
            ReportMode::Time => ObservedValue::Time,
            _ => ObservedValue::Outcome,
        }
    }

    pub fn value_range(&self) -> ValueRange {
        match self {
            ReportMode::Time => ValueRange {
                min: 0.0,
                max: None,
            },
            _ => ValueRange {
                min: 20.0,
                max: Some(100.0),
            },
        }
    }
}

/// Display value and label of one cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedCell {
    pub value: f64,
    pub label: String,
}

impl AggregatedCell {
    fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// Facts about the whole run that some aggregators need
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggregationContext {
    /// Levels merged into the matrix being aggregated (1 for a per-level view)
    pub levels: usize,
    pub seed_range: Option<SeedRange>,
    pub error_bars: bool,
}

/// Aggregation strategy, chosen once per run
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aggregator {
    Mean { error_bars: bool },
    SolvedPercentage,
    SolvedCount { levels: usize, seeds: u64 },
    Time { error_bars: bool },
}

impl Aggregator {
    pub fn for_mode(mode: ReportMode, context: &AggregationContext) -> Self {
        match mode {
            ReportMode::MeanOutcome | ReportMode::OnlySolved => Aggregator::Mean {
                error_bars: context.error_bars,
            },
            ReportMode::SolvedPercentage => Aggregator::SolvedPercentage,
            ReportMode::SolvedCount => Aggregator::SolvedCount {
                levels: context.levels,
                seeds: context.seed_range.map(|r| r.span()).unwrap_or(0),
            },
            ReportMode::Time => Aggregator::Time {
                error_bars: context.error_bars,
            },
        }
    }

    /// Aggregate one cell.
    ///
    /// `canonical` is false for the structurally-empty half of an
    /// order-collapsed matrix; those cells get blank labels.
    pub fn aggregate(&self, observations: &[i64], canonical: bool) -> AggregatedCell {
        match self {
            Aggregator::Mean { error_bars } => {
                mean_cell(observations, canonical, *error_bars)
            }
            Aggregator::SolvedPercentage | Aggregator::SolvedCount { .. } => {
                let pct = stats::solved_percentage(observations);
                let label = if canonical {
                    format!("{:.1}", pct)
                } else {
                    String::new()
                };
                AggregatedCell::new(pct, label)
            }
            Aggregator::Time { error_bars } => {
                time_cell(observations, canonical, *error_bars)
            }
        }
    }

    /// Trials a cell would hold if every seed of every level had been run.
    ///
    /// Off-diagonal pairs count twice since both seat orders are played.
    /// Informational only; the percentage is always over actual observations.
    pub fn expected_runs(&self, row: usize, col: usize) -> Option<u64> {
        match self {
            Aggregator::SolvedCount { levels, seeds } => {
                let runs = (*levels as u64).saturating_mul(*seeds);
                Some(if row == col { runs } else { runs.saturating_mul(2) })
            }
            _ => None,
        }
    }
}

fn mean_cell(observations: &[i64], canonical: bool, error_bars: bool) -> AggregatedCell {
    match observations {
        [] => empty_cell(canonical),
        [single] => {
            let mut label = single.to_string();
            if error_bars {
                label.push_str("\n+/-0");
            }
            AggregatedCell::new(*single as f64, label)
        }
        _ => {
            let (value, mut label) = stats::round_one_decimal(stats::mean(observations));
            if error_bars {
                if let Some(sem) = stats::standard_error(observations) {
                    label.push_str(&format!("\n+/-{}", stats::round_one_decimal(sem).1));
                }
            }
            AggregatedCell::new(value, label)
        }
    }
}

fn time_cell(observations: &[i64], canonical: bool, error_bars: bool) -> AggregatedCell {
    match observations {
        [] => empty_cell(canonical),
        [single] => {
            let value = *single as f64 / TIME_SCALE;
            let mut label = format!("{:?}", value);
            if error_bars {
                label.push_str("\n+/-0");
            }
            AggregatedCell::new(value, label)
        }
        _ => {
            let value = stats::round_even(stats::mean(observations) / TIME_SCALE);
            let mut label = format!("{}", value as i64);
            if error_bars {
                if let Some(sem) = stats::standard_error(observations) {
                    let scaled = stats::round_even(sem / TIME_SCALE) as i64;
                    label.push_str(&format!("\n+/-{}", scaled));
                }
            }
            AggregatedCell::new(value, label)
        }
    }
}

fn empty_cell(canonical: bool) -> AggregatedCell {
    let label = if canonical { NO_DATA_LABEL } else { "" };
    AggregatedCell::new(0.0, label)
}

/// A fully aggregated matrix, ready for masking and rendering
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedMatrix {
    pub models: Vec<ModelId>,
    pub cells: PairMatrix<AggregatedCell>,
    /// Present in solved-count mode
    pub expected_runs: Option<PairMatrix<u64>>,
}

impl AggregatedMatrix {
    /// Largest display value in the matrix
    pub fn max_value(&self) -> f64 {
        self.cells
            .iter()
            .map(|(_, _, cell)| cell.value)
            .fold(0.0, f64::max)
    }
}

/// Aggregate every cell of an observation matrix
pub fn aggregate_matrix(
    matrix: &PairMatrix<Observations>,
    models: &[ModelId],
    aggregator: &Aggregator,
    order: OrderPolicy,
) -> AggregatedMatrix {
    let cells = matrix.map(|row, col, observations| {
        aggregator.aggregate(observations, order.is_canonical(row, col))
    });

    let expected_runs = match aggregator {
        Aggregator::SolvedCount { .. } => Some(PairMatrix::from_fn(matrix.size(), |row, col| {
            aggregator.expected_runs(row, col).unwrap_or(0)
        })),
        _ => None,
    };

    AggregatedMatrix {
        models: models.to_vec(),
        cells,
        expected_runs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ModelRegistry;

    const MEAN: Aggregator = Aggregator::Mean { error_bars: false };
    const TIME: Aggregator = Aggregator::Time { error_bars: false };

    #[test]
    fn test_mean_of_several_observations() {
        let cell = MEAN.aggregate(&[10, 20, 30], true);
        assert_eq!(cell.value, 20.0);
        assert_eq!(cell.label, "20.0");

        let cell = MEAN.aggregate(&[10, 11, 11], true);
        assert_eq!(cell.value, 10.7);
        assert_eq!(cell.label, "10.7");
    }

    #[test]
    fn test_mean_rounding_of_twenty_run_cells() {
        // Ten seeds in both seat orders; sums chosen so the mean ends in .x5
        let cell_with_sum = |sum: i64| {
            let mut observations = vec![10; 19];
            observations.push(sum - 190);
            MEAN.aggregate(&observations, true)
        };

        assert_eq!(cell_with_sum(207).label, "10.3");
        assert_eq!(cell_with_sum(213).label, "10.7");
        assert_eq!(cell_with_sum(213).value, 10.7);
        assert_eq!(cell_with_sum(201).label, "10.1");
    }

    #[test]
    fn test_mean_single_observation_is_bare() {
        let cell = MEAN.aggregate(&[42], true);
        assert_eq!(cell.value, 42.0);
        assert_eq!(cell.label, "42");
    }

    #[test]
    fn test_empty_cells() {
        let canonical = MEAN.aggregate(&[], true);
        assert_eq!(canonical, AggregatedCell::new(0.0, "n/a"));

        let hidden = MEAN.aggregate(&[], false);
        assert_eq!(hidden, AggregatedCell::new(0.0, ""));

        assert_eq!(TIME.aggregate(&[], true).label, "n/a");
        assert_eq!(Aggregator::SolvedPercentage.aggregate(&[], true).label, "0.0");
    }

    #[test]
    fn test_solved_percentage_counts_strictly_below_threshold() {
        // [50, 150, 100] after clamping
        let cell = Aggregator::SolvedPercentage.aggregate(&[50, 100, 100], true);
        assert!((cell.value - 33.333).abs() < 1e-2);
        assert_eq!(cell.label, "33.3");

        let hidden = Aggregator::SolvedPercentage.aggregate(&[50, 100, 100], false);
        assert_eq!(hidden.label, "");
    }

    #[test]
    fn test_solved_count_expected_runs() {
        let context = AggregationContext {
            levels: 3,
            seed_range: Some(SeedRange { min: 1, max: 10 }),
            error_bars: false,
        };
        let aggregator = Aggregator::for_mode(ReportMode::SolvedCount, &context);

        assert_eq!(aggregator.expected_runs(2, 2), Some(30));
        assert_eq!(aggregator.expected_runs(3, 1), Some(60));
        assert_eq!(Aggregator::SolvedPercentage.expected_runs(3, 1), None);

        let wide = AggregationContext {
            levels: 2,
            seed_range: Some(SeedRange { min: i64::MIN, max: 1 }),
            error_bars: false,
        };
        let aggregator_wide = Aggregator::for_mode(ReportMode::SolvedCount, &wide);
        assert_eq!(aggregator_wide.expected_runs(0, 0), Some(u64::MAX));
        assert_eq!(aggregator_wide.expected_runs(0, 1), Some(u64::MAX));

        // The denominator does not change the percentage itself
        let cell = aggregator.aggregate(&[10, 100], true);
        assert_eq!(cell.value, 50.0);
    }

    #[test]
    fn test_time_rescale() {
        let single = TIME.aggregate(&[5000], true);
        assert_eq!(single.value, 5.0);
        assert_eq!(single.label, "5.0");

        let fractional = TIME.aggregate(&[5234], true);
        assert_eq!(fractional.value, 5.234);

        let several = TIME.aggregate(&[1000, 2000, 3000], true);
        assert_eq!(several.value, 2.0);
        assert_eq!(several.label, "2");

        // mean 2500 -> 2.5 rounds to even
        let tie = TIME.aggregate(&[2000, 3000], true);
        assert_eq!(tie.value, 2.0);
    }

    #[test]
    fn test_error_bar_labels() {
        let mean = Aggregator::Mean { error_bars: true };
        assert_eq!(mean.aggregate(&[10], true).label, "10\n+/-0");
        assert_eq!(mean.aggregate(&[10, 20, 30], true).label, "20.0\n+/-5.8");

        let time = Aggregator::Time { error_bars: true };
        assert_eq!(time.aggregate(&[1000, 2000, 3000], true).label, "2\n+/-1");
    }

    #[test]
    fn test_aggregate_matrix_respects_canonical_half() {
        let registry = ModelRegistry::standard();
        let matrix: PairMatrix<Observations> = PairMatrix::new(registry.len());

        let collapsed = aggregate_matrix(&matrix, registry.models(), &MEAN, OrderPolicy::Collapsed);
        assert_eq!(collapsed.cells.at(0, 1).label, "");
        assert_eq!(collapsed.cells.at(1, 0).label, "n/a");
        assert_eq!(collapsed.cells.at(2, 2).label, "n/a");
        assert!(collapsed.expected_runs.is_none());

        let ordered = aggregate_matrix(&matrix, registry.models(), &MEAN, OrderPolicy::Ordered);
        assert_eq!(ordered.cells.at(0, 1).label, "n/a");
    }

    #[test]
    fn test_mode_properties() {
        assert_eq!(ReportMode::MeanOutcome.file_suffix(), "");
        assert_eq!(ReportMode::OnlySolved.file_suffix(), "_solved");
        assert_eq!(ReportMode::SolvedCount.file_suffix(), "_solved_count");
        assert_eq!(ReportMode::Time.file_suffix(), "_time");
        assert!(ReportMode::OnlySolved.parse_options().only_solved);
        assert!(ReportMode::Time.parse_options().read_time);
        assert_eq!(ReportMode::Time.observed_value(), ObservedValue::Time);
        assert_eq!(ReportMode::Time.value_range().max, None);
        assert_eq!(ReportMode::SolvedPercentage.value_range().min, 20.0);
    }
}
