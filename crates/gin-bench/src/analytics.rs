use std::fs;
use std::path::Path;

use gin_bot::Difficulty;
use gin_core::model::player::Side;
use gin_core::scoring::RoundReason;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use statrs::statistics::Statistics;
use thiserror::Error;

use crate::config::BenchmarkConfig;
use crate::tournament::MatchOutcome;

const CONFIDENCE_Z: f64 = 1.96; // 95% CI

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Folds finished matches into per-side tallies.
pub struct AnalyticsCollector {
    run_id: String,
    target_score: u32,
    sides: [SideAccumulator; 2],
    round_diffs: Vec<f64>,
    rounds: usize,
    draws: usize,
    stalled_matches: usize,
}

impl AnalyticsCollector {
    pub fn new(config: &BenchmarkConfig, difficulties: [Difficulty; 2]) -> Self {
        Self {
            run_id: config.run_id.clone(),
            target_score: config.matches.target_score,
            sides: Side::BOTH.map(|side| SideAccumulator::new(side, difficulties[side.index()])),
            round_diffs: Vec::new(),
            rounds: 0,
            draws: 0,
            stalled_matches: 0,
        }
    }

    pub fn record_match(&mut self, outcome: &MatchOutcome) {
        match outcome.winner {
            Some(side) => self.sides[side.index()].match_wins += 1,
            None => self.stalled_matches += 1,
        }

        for side in Side::BOTH {
            let acc = &mut self.sides[side.index()];
            acc.matches += 1;
            acc.final_scores.push(f64::from(outcome.final_scores[side.index()]));
        }

        for round in &outcome.rounds {
            self.rounds += 1;
            if let Some(knocker) = round.knocker {
                self.sides[knocker.index()].knocks += 1;
            }

            let result = &round.outcome;
            let signed = f64::from(result.score_delta);
            match result.winner.side() {
                None => {
                    self.draws += 1;
                    self.round_diffs.push(0.0);
                    for acc in &mut self.sides {
                        acc.round_points.push(0.0);
                    }
                }
                Some(side) => {
                    let won = &mut self.sides[side.index()];
                    won.round_wins += 1;
                    won.round_points.push(signed);
                    won.winning_deltas.push(signed);
                    match result.reason {
                        RoundReason::Gin => won.gins += 1,
                        RoundReason::Undercut => won.undercuts += 1,
                        _ => {}
                    }
                    self.sides[side.opponent().index()].round_points.push(0.0);
                    self.round_diffs.push(match side {
                        Side::Player => signed,
                        Side::Ai => -signed,
                    });
                }
            }
        }
    }

    pub fn finalize(self) -> AnalyticsSummary {
        let (p_value, sample_size) = wilcoxon_signed_rank(self.round_diffs);
        AnalyticsSummary {
            run_id: self.run_id,
            target_score: self.target_score,
            rounds: self.rounds,
            draws: self.draws,
            stalled_matches: self.stalled_matches,
            sides: self.sides.map(SideAccumulator::into_report).to_vec(),
            comparison: ComparisonReport {
                p_value,
                sample_size,
            },
        }
    }
}

struct SideAccumulator {
    side: Side,
    difficulty: Difficulty,
    matches: usize,
    match_wins: usize,
    round_wins: usize,
    knocks: usize,
    gins: usize,
    undercuts: usize,
    round_points: Vec<f64>,
    winning_deltas: Vec<f64>,
    final_scores: Vec<f64>,
}

impl SideAccumulator {
    fn new(side: Side, difficulty: Difficulty) -> Self {
        Self {
            side,
            difficulty,
            matches: 0,
            match_wins: 0,
            round_wins: 0,
            knocks: 0,
            gins: 0,
            undercuts: 0,
            round_points: Vec::new(),
            winning_deltas: Vec::new(),
            final_scores: Vec::new(),
        }
    }

    fn into_report(self) -> SideReport {
        let (ci_low, ci_high) = confidence_interval(&self.round_points);
        SideReport {
            side: self.side.as_str().to_string(),
            difficulty: self.difficulty.to_string(),
            matches: self.matches,
            match_wins: self.match_wins,
            round_wins: self.round_wins,
            knocks: self.knocks,
            gins: self.gins,
            undercuts: self.undercuts,
            avg_points_per_round: mean_or_zero(&self.round_points),
            ci95: (ci_low, ci_high),
            mean_winning_delta: mean_or_zero(&self.winning_deltas),
            std_dev_winning_delta: std_dev_or_zero(&self.winning_deltas),
            mean_final_score: mean_or_zero(&self.final_scores),
        }
    }
}

fn mean_or_zero(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().mean()
    }
}

fn std_dev_or_zero(values: &[f64]) -> f64 {
    if values.len() < 2 {
        0.0
    } else {
        values.iter().std_dev()
    }
}

/// Two-sided signed-rank test on player-minus-ai round points.
fn wilcoxon_signed_rank(diffs: Vec<f64>) -> (f64, usize) {
    let diffs: Vec<f64> = diffs.into_iter().filter(|d| d.abs() > f64::EPSILON).collect();
    let n = diffs.len();
    if n == 0 {
        return (1.0, 0);
    }

    let mut paired: Vec<(f64, f64)> = diffs.into_iter().map(|d| (d.abs(), d.signum())).collect();
    paired.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut ranks = Vec::with_capacity(n);
    let mut tie_sizes = Vec::new();
    let mut i = 0;
    while i < paired.len() {
        let mut j = i;
        while j + 1 < paired.len() && (paired[j + 1].0 - paired[i].0).abs() < 1e-12 {
            j += 1;
        }
        let rank = (i + j + 2) as f64 / 2.0;
        for entry in &paired[i..=j] {
            ranks.push((rank, entry.1));
        }
        if j > i {
            tie_sizes.push(j - i + 1);
        }
        i = j + 1;
    }

    let w_plus: f64 = ranks
        .iter()
        .filter(|(_, sign)| *sign > 0.0)
        .map(|(rank, _)| *rank)
        .sum();
    let w_minus: f64 = ranks
        .iter()
        .filter(|(_, sign)| *sign < 0.0)
        .map(|(rank, _)| *rank)
        .sum();
    let w = w_plus.min(w_minus);
    let n_f = n as f64;
    let mean_w = n_f * (n_f + 1.0) / 4.0;

    let tie_adjustment: f64 = tie_sizes
        .into_iter()
        .map(|count| {
            let c = count as f64;
            (c.powi(3) - c) / 48.0
        })
        .sum();
    let variance_w = n_f * (n_f + 1.0) * (2.0 * n_f + 1.0) / 24.0 - tie_adjustment;
    if variance_w <= 0.0 {
        return (1.0, n);
    }

    let z = ((w - mean_w).abs() - 0.5) / variance_w.sqrt();
    let Ok(normal) = Normal::new(0.0, 1.0) else {
        return (1.0, n);
    };
    let p = 2.0 * (1.0 - normal.cdf(z));
    (p.clamp(0.0, 1.0), n)
}

fn confidence_interval(points: &[f64]) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let mean = mean_or_zero(points);
    if points.len() == 1 {
        return (mean, mean);
    }
    let std_error = std_dev_or_zero(points) / (points.len() as f64).sqrt();
    let margin = CONFIDENCE_Z * std_error;
    (mean - margin, mean + margin)
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub run_id: String,
    pub target_score: u32,
    pub rounds: usize,
    pub draws: usize,
    pub stalled_matches: usize,
    pub sides: Vec<SideReport>,
    pub comparison: ComparisonReport,
}

impl AnalyticsSummary {
    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        let mut rows = String::new();
        rows.push_str(&format!("# Match Summary: {}\n\n", self.run_id));
        rows.push_str(&format!(
            "Target score {}; {} rounds played, {} drawn; {} matches hit the round cap.\n\n",
            self.target_score, self.rounds, self.draws, self.stalled_matches
        ));
        rows.push_str("| Side | Difficulty | Matches | Match Win % | Rounds Won | Knocks | Gins | Undercuts | Avg pts/round | 95% CI | Mean win Δ | Std dev win Δ | Avg final score |\n");
        rows.push_str("|------|------------|---------|-------------|------------|--------|------|-----------|---------------|--------|------------|---------------|-----------------|\n");
        for side in &self.sides {
            let win_rate = if side.matches == 0 {
                0.0
            } else {
                side.match_wins as f64 / side.matches as f64
            };
            rows.push_str(&format!(
                "| {name} | {difficulty} | {matches} | {win:.1}% | {round_wins} | {knocks} | {gins} | {undercuts} | {avg:.3} | [{ci_low:.3}, {ci_high:.3}] | {mean_delta:.2} | {std_delta:.2} | {final_score:.1} |\n",
                name = side.side,
                difficulty = side.difficulty,
                matches = side.matches,
                win = win_rate * 100.0,
                round_wins = side.round_wins,
                knocks = side.knocks,
                gins = side.gins,
                undercuts = side.undercuts,
                avg = side.avg_points_per_round,
                ci_low = side.ci95.0,
                ci_high = side.ci95.1,
                mean_delta = side.mean_winning_delta,
                std_delta = side.std_dev_winning_delta,
                final_score = side.mean_final_score,
            ));
        }
        rows.push_str(&format!(
            "\nSigned-rank test on per-round points (player vs ai): p = {:.3} over {} decided rounds.\n",
            self.comparison.p_value, self.comparison.sample_size
        ));

        fs::write(path.as_ref(), rows).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })?;
        Ok(())
    }

    pub fn side(&self, side: Side) -> Option<&SideReport> {
        self.sides.iter().find(|report| report.side == side.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SideReport {
    pub side: String,
    pub difficulty: String,
    pub matches: usize,
    pub match_wins: usize,
    pub round_wins: usize,
    pub knocks: usize,
    pub gins: usize,
    pub undercuts: usize,
    pub avg_points_per_round: f64,
    pub ci95: (f64, f64),
    pub mean_winning_delta: f64,
    pub std_dev_winning_delta: f64,
    pub mean_final_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub p_value: f64,
    pub sample_size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::{DecisionSummary, RoundRecord};
    use gin_core::model::player::Winner;
    use gin_core::scoring::RoundOutcome;

    fn config() -> BenchmarkConfig {
        let yaml = r#"
run_id: "analytics"
matches:
  count: 1
outputs:
  jsonl: "out/rounds.jsonl"
  summary_md: "out/summary.md"
"#;
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(yaml).expect("parse");
        cfg.validate().expect("valid");
        cfg
    }

    fn round(
        number: u32,
        knocker: Option<Side>,
        winner: Winner,
        delta: u32,
        reason: RoundReason,
    ) -> RoundRecord {
        RoundRecord {
            round_number: number,
            dealer: Side::Ai,
            knocker,
            outcome: RoundOutcome {
                winner,
                score_delta: delta,
                reason,
                player_deadwood: 0,
                ai_deadwood: 0,
            },
            turns: 10,
            scores_after: [0, 0],
            metrics: DecisionSummary {
                decisions: 10,
                avg_ms_per_decision: 0.0,
                total_ms: 0.0,
            },
        }
    }

    fn sample_match() -> MatchOutcome {
        MatchOutcome {
            match_index: 0,
            match_seed: 1,
            first_dealer: Side::Ai,
            winner: Some(Side::Player),
            final_scores: [104, 30],
            rounds: vec![
                round(1, Some(Side::Player), Winner::Player, 40, RoundReason::Gin),
                round(2, Some(Side::Ai), Winner::Player, 30, RoundReason::Undercut),
                round(3, None, Winner::Draw, 0, RoundReason::DeckExhausted),
                round(4, Some(Side::Ai), Winner::Ai, 30, RoundReason::Knock),
                round(5, Some(Side::Player), Winner::Player, 34, RoundReason::Knock),
            ],
        }
    }

    #[test]
    fn tallies_wins_gins_undercuts_and_draws() {
        let mut collector =
            AnalyticsCollector::new(&config(), [Difficulty::Hard, Difficulty::Easy]);
        collector.record_match(&sample_match());
        let summary = collector.finalize();

        assert_eq!(summary.rounds, 5);
        assert_eq!(summary.draws, 1);
        assert_eq!(summary.stalled_matches, 0);

        let player = summary.side(Side::Player).expect("player report");
        assert_eq!(player.difficulty, "hard");
        assert_eq!(player.match_wins, 1);
        assert_eq!(player.round_wins, 3);
        assert_eq!(player.gins, 1);
        assert_eq!(player.undercuts, 1);
        assert_eq!(player.knocks, 2);
        assert!((player.avg_points_per_round - 104.0 / 5.0).abs() < 1e-9);
        assert!((player.mean_winning_delta - 104.0 / 3.0).abs() < 1e-9);
        assert!(player.std_dev_winning_delta > 0.0);

        let ai = summary.side(Side::Ai).expect("ai report");
        assert_eq!(ai.round_wins, 1);
        assert_eq!(ai.knocks, 2);
        assert_eq!(ai.std_dev_winning_delta, 0.0);
        assert_eq!(summary.comparison.sample_size, 4);
    }

    #[test]
    fn signed_rank_is_neutral_without_decided_rounds() {
        assert_eq!(wilcoxon_signed_rank(vec![0.0, 0.0]), (1.0, 0));
        let (p, n) = wilcoxon_signed_rank(vec![10.0, 12.0, 30.0, 25.0, 40.0, 11.0, 27.0, 33.0]);
        assert_eq!(n, 8);
        assert!(p < 0.05, "one-sided sample should be significant, got {p}");
    }

    #[test]
    fn confidence_interval_brackets_the_mean() {
        assert_eq!(confidence_interval(&[]), (0.0, 0.0));
        assert_eq!(confidence_interval(&[4.0]), (4.0, 4.0));
        let (low, high) = confidence_interval(&[2.0, 4.0, 6.0, 8.0]);
        assert!(low < 5.0 && high > 5.0);
    }

    #[test]
    fn writes_markdown_table() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("summary.md");
        let mut collector =
            AnalyticsCollector::new(&config(), [Difficulty::Medium, Difficulty::Medium]);
        collector.record_match(&sample_match());
        collector.finalize().write_markdown(&path).expect("write");

        let markdown = fs::read_to_string(&path).expect("read back");
        assert!(markdown.starts_with("# Match Summary: analytics"));
        assert!(markdown.contains("| player | medium | 1 | 100.0% | 3 | 2 | 1 | 1 |"));
        assert!(markdown.contains("| ai | medium | 1 | 0.0% | 1 | 2 | 0 | 0 |"));
    }
}
