use crate::model::player::Side;
use serde::{Deserialize, Serialize};

/// Points needed to take a match unless the caller picks another target.
pub const DEFAULT_TARGET_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    totals: [u32; 2],
}

impl ScoreBoard {
    pub const fn new() -> Self {
        Self { totals: [0; 2] }
    }

    pub fn add_points(&mut self, side: Side, points: u32) {
        self.totals[side.index()] += points;
    }

    pub fn set_score(&mut self, side: Side, points: u32) {
        self.totals[side.index()] = points;
    }

    pub fn set_totals(&mut self, totals: [u32; 2]) {
        self.totals = totals;
    }

    pub fn score(&self, side: Side) -> u32 {
        self.totals[side.index()]
    }

    pub fn standings(&self) -> &[u32; 2] {
        &self.totals
    }

    pub fn leader(&self) -> Option<Side> {
        let player = self.score(Side::Player);
        let ai = self.score(Side::Ai);
        match player.cmp(&ai) {
            core::cmp::Ordering::Greater => Some(Side::Player),
            core::cmp::Ordering::Less => Some(Side::Ai),
            core::cmp::Ordering::Equal => None,
        }
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// The side whose cumulative score reached `target`, if any.
///
/// Only one side scores per round, so both crossing at once only happens with
/// hand-edited totals; the higher total wins then, and an exact tie yields
/// no winner.
pub fn match_winner(scores: &ScoreBoard, target: u32) -> Option<Side> {
    let reached: Vec<Side> = Side::BOTH
        .iter()
        .copied()
        .filter(|side| scores.score(*side) >= target)
        .collect();
    match reached.as_slice() {
        [] => None,
        [only] => Some(*only),
        _ => scores.leader(),
    }
}
