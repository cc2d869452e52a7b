use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use gin_bot::policy::{HeuristicPolicy, Policy, PolicyContext};
use gin_bot::{AiTurn, Difficulty};
use gin_core::game::match_state::MatchState;
use gin_core::model::player::Side;
use gin_core::model::round::RoundError;
use gin_core::scoring::{RoundOutcome, round_result};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::analytics::{AnalyticsCollector, AnalyticsError};
use crate::config::{BenchmarkConfig, ResolvedOutputs, ValidationError};
use crate::logging::TELEMETRY_FILE;

/// Turns after which a round that keeps recycling the discard pile is
/// scored as a draw.
const MAX_TURNS_PER_ROUND: u32 = 400;
const AI_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Plays configured bot-vs-bot matches and records every round.
pub struct TournamentRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    difficulties: [Difficulty; 2],
    logging_enabled: bool,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub matches_played: usize,
    pub rounds_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
}

impl TournamentRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let difficulties = [
            config.sides.player.difficulty("sides.player.difficulty")?,
            config.sides.ai.difficulty("sides.ai.difficulty")?,
        ];

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            difficulties,
        })
    }

    pub fn difficulty(&self, side: Side) -> Difficulty {
        self.difficulties[side.index()]
    }

    /// Execute the tournament, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.matches.seed.unwrap_or(0));
        let mut analytics = AnalyticsCollector::new(&self.config, self.difficulties);
        let mut rows_written = 0usize;
        let mut rounds_played = 0usize;

        for match_index in 0..self.config.matches.count {
            let match_seed = rng.next_u64();
            let outcome = self.play_match(match_index, match_seed)?;
            analytics.record_match(&outcome);
            rounds_played += outcome.rounds.len();
            rows_written += write_match_rows(&mut writer, &self.config, &outcome)?;
        }

        writer.flush()?;

        let summary = analytics.finalize();
        summary.write_markdown(&self.outputs.summary_md)?;

        let telemetry_path = if self.logging_enabled {
            Some(self.outputs.telemetry_dir().join(TELEMETRY_FILE))
        } else {
            None
        };

        Ok(RunSummary {
            matches_played: self.config.matches.count,
            rounds_played,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
        })
    }

    /// Plays one match to the target score or the round cap.
    pub fn play_match(
        &self,
        match_index: usize,
        match_seed: u64,
    ) -> Result<MatchOutcome, RunnerError> {
        let first_dealer = if match_index % 2 == 0 {
            Side::Ai
        } else {
            Side::Player
        };
        let mut match_state = MatchState::with_seed_round(
            match_seed,
            1,
            first_dealer,
            self.config.matches.target_score,
        );
        let mut policies: [Box<dyn Policy>; 2] = [
            Box::new(HeuristicPolicy::new(self.difficulty(Side::Player), match_seed)),
            Box::new(HeuristicPolicy::new(
                self.difficulty(Side::Ai),
                match_seed ^ AI_SEED_SALT,
            )),
        ];

        let mut rounds = Vec::new();
        while !match_state.is_over() && rounds.len() < self.config.matches.max_rounds as usize {
            let record = self.play_round(match_index, &mut match_state, &mut policies)?;
            match_state.finish_round_and_start_next(&record.outcome);
            rounds.push(RoundRecord {
                scores_after: *match_state.scores().standings(),
                ..record
            });
        }

        Ok(MatchOutcome {
            match_index,
            match_seed,
            first_dealer,
            winner: match_state.winner(),
            final_scores: *match_state.scores().standings(),
            rounds,
        })
    }

    fn play_round(
        &self,
        match_index: usize,
        match_state: &mut MatchState,
        policies: &mut [Box<dyn Policy>; 2],
    ) -> Result<RoundRecord, RunnerError> {
        let round_number = match_state.round_number();
        let mut metrics = DecisionMetrics::default();

        loop {
            let side = match_state.round().to_act();

            let turn = {
                let round = match_state.round();
                let ctx = PolicyContext {
                    side,
                    hand: round.hand(side),
                    deck: round.deck(),
                    discard_pile: round.discard_pile(),
                };
                let start = Instant::now();
                let turn = policies[side.index()].take_turn(&ctx);
                metrics.record(start.elapsed());
                turn
            };

            let decision = match turn {
                AiTurn::DeckEmpty => {
                    let round = match_state.round();
                    let outcome = RoundOutcome::deck_exhausted(
                        round.hand(Side::Player),
                        round.hand(Side::Ai),
                    );
                    return Ok(self.finish_round(match_index, None, outcome, match_state, metrics));
                }
                AiTurn::Decision(decision) => decision,
            };

            let round = match_state.round_mut();
            let drawn = round.draw(side, decision.source)?;
            if drawn != decision.drawn {
                return Err(RunnerError::game(format!(
                    "{side} expected to draw {} from the {} but got {drawn}",
                    decision.drawn, decision.source
                )));
            }
            round.discard(side, decision.discarded)?;

            if self.logging_enabled && tracing::enabled!(Level::INFO) {
                event!(
                    target: "gin_bench::turn",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    match_index = match_index as u32,
                    round_number,
                    side = side.as_str(),
                    source = decision.source.as_str(),
                    drawn = %decision.drawn,
                    discarded = %decision.discarded,
                    knock = decision.knock
                );
            }

            if decision.knock {
                let round = match_state.round();
                let outcome =
                    round_result(side, round.hand(Side::Player), round.hand(Side::Ai));
                return Ok(self.finish_round(
                    match_index,
                    Some(side),
                    outcome,
                    match_state,
                    metrics,
                ));
            }

            if match_state.round().turns_taken() >= MAX_TURNS_PER_ROUND {
                tracing::warn!(
                    target: "gin_bench::turn",
                    match_index,
                    round_number,
                    "round stalled; scoring it as a draw"
                );
                let round = match_state.round();
                let outcome = RoundOutcome::deck_exhausted(
                    round.hand(Side::Player),
                    round.hand(Side::Ai),
                );
                return Ok(self.finish_round(match_index, None, outcome, match_state, metrics));
            }
        }
    }

    fn finish_round(
        &self,
        match_index: usize,
        knocker: Option<Side>,
        outcome: RoundOutcome,
        match_state: &MatchState,
        metrics: DecisionMetrics,
    ) -> RoundRecord {
        let round_number = match_state.round_number();
        if self.logging_enabled && tracing::enabled!(Level::INFO) {
            event!(
                target: "gin_bench::round",
                Level::INFO,
                run_id = %self.config.run_id,
                match_index = match_index as u32,
                round_number,
                winner = outcome.winner.as_str(),
                reason = outcome.reason.as_str(),
                score_delta = outcome.score_delta,
                narrative = %outcome.narrative()
            );
        }

        RoundRecord {
            round_number,
            dealer: match_state.round().dealer(),
            knocker,
            outcome,
            turns: match_state.round().turns_taken(),
            scores_after: *match_state.scores().standings(),
            metrics: metrics.finalize(),
        }
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_match_rows(
    writer: &mut BufWriter<File>,
    config: &BenchmarkConfig,
    outcome: &MatchOutcome,
) -> Result<usize, RunnerError> {
    let match_id = format!("M{:05}", outcome.match_index);

    let mut rows_written = 0usize;
    for round in &outcome.rounds {
        let row = RoundLogRow {
            run_id: config.run_id.clone(),
            match_id: match_id.clone(),
            match_index: outcome.match_index,
            match_seed: outcome.match_seed,
            round_number: round.round_number,
            dealer: round.dealer.as_str(),
            knocker: round.knocker.map(Side::as_str),
            winner: round.outcome.winner.as_str(),
            reason: round.outcome.reason.as_str(),
            score_delta: round.outcome.score_delta,
            player_deadwood: round.outcome.player_deadwood,
            ai_deadwood: round.outcome.ai_deadwood,
            turns: round.turns,
            player_score: round.scores_after[Side::Player.index()],
            ai_score: round.scores_after[Side::Ai.index()],
            speed_ms_turn: round.metrics.avg_ms_per_decision,
        };

        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }

    Ok(rows_written)
}

/// Rounds of one finished match, in play order.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub match_index: usize,
    pub match_seed: u64,
    pub first_dealer: Side,
    /// `None` when the round cap hit before anyone reached the target.
    pub winner: Option<Side>,
    pub final_scores: [u32; 2],
    pub rounds: Vec<RoundRecord>,
}

#[derive(Debug, Clone)]
pub struct RoundRecord {
    pub round_number: u32,
    pub dealer: Side,
    pub knocker: Option<Side>,
    pub outcome: RoundOutcome,
    pub turns: u32,
    pub scores_after: [u32; 2],
    pub metrics: DecisionSummary,
}

#[derive(Default)]
struct DecisionMetrics {
    total: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) {
        self.total += duration;
        self.decisions += 1;
    }

    fn finalize(self) -> DecisionSummary {
        let avg_ms = if self.decisions == 0 {
            0.0
        } else {
            self.total.as_secs_f64() * 1000.0 / f64::from(self.decisions)
        };

        DecisionSummary {
            decisions: self.decisions,
            avg_ms_per_decision: avg_ms,
            total_ms: self.total.as_secs_f64() * 1000.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecisionSummary {
    pub decisions: u32,
    pub avg_ms_per_decision: f64,
    pub total_ms: f64,
}

#[derive(Serialize)]
struct RoundLogRow {
    run_id: String,
    match_id: String,
    match_index: usize,
    match_seed: u64,
    round_number: u32,
    dealer: &'static str,
    knocker: Option<&'static str>,
    winner: &'static str,
    reason: &'static str,
    score_delta: u32,
    player_deadwood: u32,
    ai_deadwood: u32,
    turns: u32,
    player_score: u32,
    ai_score: u32,
    speed_ms_turn: f64,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Config(#[from] ValidationError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("illegal move: {0}")]
    Round(#[from] RoundError),
    #[error("game execution failed: {message}")]
    Game { message: String },
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}

impl RunnerError {
    fn game(message: String) -> Self {
        RunnerError::Game { message }
    }
}
