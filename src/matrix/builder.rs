//! Per-level matrix construction

use log::debug;

use super::{Observations, OrderPolicy, PairMatrix};
use crate::trials::{ParsedLog, TrialRecord};

/// Which number of a trial is stored as the observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservedValue {
    /// Step count (clamped)
    Outcome,
    /// Compute time; trials without a time field contribute nothing
    Time,
}

impl ObservedValue {
    pub fn extract(&self, record: &TrialRecord) -> Option<i64> {
        match self {
            ObservedValue::Outcome => Some(record.outcome),
            ObservedValue::Time => record.time,
        }
    }
}

/// One observation matrix per level, in first-encounter level order
#[derive(Debug, Clone, PartialEq)]
pub struct LevelMatrices {
    pub order: OrderPolicy,
    pub levels: Vec<(String, PairMatrix<Observations>)>,
}

impl LevelMatrices {
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn get(&self, level: &str) -> Option<&PairMatrix<Observations>> {
        self.levels
            .iter()
            .find(|(name, _)| name == level)
            .map(|(_, matrix)| matrix)
    }
}

/// Build one matrix per level seen in the log.
///
/// Every level in `log.levels` gets a matrix, even when all of its trials
/// were filtered out. Each retained trial lands in exactly one cell.
pub fn build_level_matrices(
    log: &ParsedLog,
    size: usize,
    order: OrderPolicy,
    value: ObservedValue,
) -> LevelMatrices {
    let mut levels: Vec<(String, PairMatrix<Observations>)> = log
        .levels
        .iter()
        .map(|level| (level.clone(), PairMatrix::new(size)))
        .collect();

    for record in &log.records {
        let Some(observation) = value.extract(record) else {
            continue;
        };
        let Some((_, matrix)) = levels.iter_mut().find(|(name, _)| *name == record.level) else {
            continue;
        };
        let (row, col) = order.canonicalize(record.model_a, record.model_b);
        matrix.get_mut(row, col).push(observation);
    }

    for (name, matrix) in &levels {
        debug!(
            "Level {}: {} observations",
            name,
            matrix.observation_count()
        );
    }

    LevelMatrices { order, levels }
}
