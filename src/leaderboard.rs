//! Model leaderboard
//!
//! Ranks every registered model by how often the pairs it took part in
//! solved their level, on either side of the pairing.

use crate::registry::{ModelId, ModelRegistry};
use crate::trials::TrialRecord;

/// Per-model totals over all trials the model played in
#[derive(Debug, Clone, Default)]
pub struct ModelStats {
    pub trials: u32,
    pub solved: u32,
    /// Sum of step counts over solved trials
    pub solved_steps: i64,
}

impl ModelStats {
    /// Solve rate (0.0 - 1.0)
    pub fn solve_rate(&self) -> f32 {
        if self.trials == 0 {
            0.0
        } else {
            self.solved as f32 / self.trials as f32
        }
    }

    /// Mean steps of solved trials, `None` when nothing was solved
    pub fn mean_solved_steps(&self) -> Option<f32> {
        if self.solved == 0 {
            None
        } else {
            Some(self.solved_steps as f32 / self.solved as f32)
        }
    }

    fn add(&mut self, record: &TrialRecord) {
        self.trials += 1;
        if record.is_solved() {
            self.solved += 1;
            self.solved_steps += record.outcome;
        }
    }
}

/// Model ranking entry
#[derive(Debug, Clone)]
pub struct ModelRanking {
    pub rank: usize,
    pub model: ModelId,
    pub stats: ModelStats,
}

/// Leaderboard of models sorted by solve rate
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    pub rankings: Vec<ModelRanking>,
}

impl Leaderboard {
    /// Build from trial records; a self-pairing counts once for its model
    pub fn from_records(records: &[TrialRecord], registry: &ModelRegistry) -> Self {
        let mut stats = vec![ModelStats::default(); registry.len()];
        for record in records {
            stats[record.model_a.index()].add(record);
            if record.model_b != record.model_a {
                stats[record.model_b.index()].add(record);
            }
        }

        let mut rankings: Vec<ModelRanking> = registry
            .models()
            .iter()
            .zip(stats)
            .filter(|(_, s)| s.trials > 0)
            .map(|(&model, stats)| ModelRanking {
                rank: 0,
                model,
                stats,
            })
            .collect();

        // Sort by solve rate (descending), then fewer steps as tiebreaker
        rankings.sort_by(|a, b| {
            b.stats
                .solve_rate()
                .partial_cmp(&a.stats.solve_rate())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    let a_steps = a.stats.mean_solved_steps().unwrap_or(f32::MAX);
                    let b_steps = b.stats.mean_solved_steps().unwrap_or(f32::MAX);
                    a_steps
                        .partial_cmp(&b_steps)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        });

        for (i, r) in rankings.iter_mut().enumerate() {
            r.rank = i + 1;
        }

        Self { rankings }
    }

    pub fn best_model(&self) -> Option<ModelId> {
        self.rankings.first().map(|r| r.model)
    }

    /// Format as ASCII table
    pub fn format_table(&self) -> String {
        let mut output = String::new();
        output.push_str("\nMODEL LEADERBOARD:\n");
        output.push_str("  Rank  Model     Trials  Solved   Solve%  Steps\n");
        output.push_str("  ───────────────────────────────────────────────\n");

        for r in &self.rankings {
            let steps = r
                .stats
                .mean_solved_steps()
                .map(|s| format!("{:>5.1}", s))
                .unwrap_or_else(|| "  n/a".to_string());
            output.push_str(&format!(
                "  {:>2}.   {:<8}  {:>6}  {:>6}   {:>5.1}%  {}\n",
                r.rank,
                r.model.name(),
                r.stats.trials,
                r.stats.solved,
                r.stats.solve_rate() * 100.0,
                steps,
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trials::{ParseOptions, parse_log_content};

    const SAMPLE_LOG: &str = r#"lvl;mac;bd;1;20
lvl;bd;mac;2;100
lvl;mac;mac;3;10
lvl;greedy;still;1;150
lvl;greedy;bd;2;40
"#;

    fn leaderboard() -> Leaderboard {
        let registry = ModelRegistry::standard();
        let log = parse_log_content(SAMPLE_LOG, &registry, ParseOptions::default()).unwrap();
        Leaderboard::from_records(&log.records, &registry)
    }

    #[test]
    fn test_rankings_sorted_by_solve_rate() {
        let board = leaderboard();

        // mac: 3 trials, 2 solved; bd: 3 trials, 2 solved; greedy: 2 trials, 1 solved
        assert_eq!(board.rankings.len(), 4);
        assert_eq!(board.best_model(), Some(ModelId::Mac));
        assert_eq!(board.rankings[0].stats.trials, 3);
        assert_eq!(board.rankings[1].model, ModelId::Bd);
        assert_eq!(board.rankings[2].model, ModelId::Greedy);
        assert_eq!(board.rankings[3].model, ModelId::Still);
        assert_eq!(board.rankings[3].stats.solve_rate(), 0.0);
    }

    #[test]
    fn test_self_pairing_counts_once() {
        let board = leaderboard();
        let mac = board
            .rankings
            .iter()
            .find(|r| r.model == ModelId::Mac)
            .unwrap();
        assert_eq!(mac.stats.trials, 3);
        assert_eq!(mac.stats.mean_solved_steps(), Some(15.0));
    }

    #[test]
    fn test_format_table() {
        let table = leaderboard().format_table();
        assert!(table.contains("MODEL LEADERBOARD"));
        assert!(table.contains("still"));
        assert!(table.contains("n/a"));
    }
}
