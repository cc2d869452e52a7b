//! End-of-round scoring.

use crate::meld::deadwood;
use crate::model::hand::Hand;
use crate::model::player::{Side, Winner};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Bonus for knocking with no deadwood at all.
pub const GIN_BONUS: u32 = 25;
/// Bonus for the defender when the knocker does not have the lower count.
pub const UNDERCUT_BONUS: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundReason {
    Knock,
    Gin,
    Undercut,
    EqualDeadwood,
    DeckExhausted,
}

impl RoundReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            RoundReason::Knock => "knock",
            RoundReason::Gin => "gin",
            RoundReason::Undercut => "undercut",
            RoundReason::EqualDeadwood => "equal_deadwood",
            RoundReason::DeckExhausted => "deck_exhausted",
        }
    }
}

impl fmt::Display for RoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub winner: Winner,
    pub score_delta: u32,
    pub reason: RoundReason,
    pub player_deadwood: u32,
    pub ai_deadwood: u32,
}

impl RoundOutcome {
    /// Zero-point draw for a round that ran out of stock.
    pub fn deck_exhausted(player_hand: &Hand, ai_hand: &Hand) -> Self {
        Self {
            winner: Winner::Draw,
            score_delta: 0,
            reason: RoundReason::DeckExhausted,
            player_deadwood: deadwood(player_hand),
            ai_deadwood: deadwood(ai_hand),
        }
    }

    pub fn deadwood(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player_deadwood,
            Side::Ai => self.ai_deadwood,
        }
    }

    /// One-line description suitable for a results banner.
    pub fn narrative(&self) -> String {
        let winner = match self.winner {
            Winner::Player => "You",
            Winner::Ai => "The computer",
            Winner::Draw => "Nobody",
        };
        match self.reason {
            RoundReason::Gin => format!("{winner} went gin for {} points.", self.score_delta),
            RoundReason::Knock => format!(
                "{winner} won the knock by {} points ({} vs {}).",
                self.score_delta, self.player_deadwood, self.ai_deadwood
            ),
            RoundReason::Undercut => format!(
                "{winner} undercut the knock for {} points.",
                self.score_delta
            ),
            RoundReason::EqualDeadwood => format!(
                "Deadwood tied at {}; the round is a draw.",
                self.player_deadwood
            ),
            RoundReason::DeckExhausted => {
                "The stock ran out; the round is a draw.".to_string()
            }
        }
    }
}

/// Scores a finished round from the two final hands.
pub fn round_result(knocker: Side, player_hand: &Hand, ai_hand: &Hand) -> RoundOutcome {
    let player_deadwood = deadwood(player_hand);
    let ai_deadwood = deadwood(ai_hand);
    let (knocker_deadwood, defender_deadwood) = match knocker {
        Side::Player => (player_deadwood, ai_deadwood),
        Side::Ai => (ai_deadwood, player_deadwood),
    };
    let difference = knocker_deadwood.abs_diff(defender_deadwood);

    let (winner, score_delta, reason) = if knocker_deadwood == defender_deadwood {
        (Winner::Draw, 0, RoundReason::EqualDeadwood)
    } else if knocker_deadwood < defender_deadwood {
        if knocker_deadwood == 0 {
            (Winner::from(knocker), difference + GIN_BONUS, RoundReason::Gin)
        } else {
            (Winner::from(knocker), difference, RoundReason::Knock)
        }
    } else {
        (
            Winner::from(knocker.opponent()),
            difference + UNDERCUT_BONUS,
            RoundReason::Undercut,
        )
    };

    RoundOutcome {
        winner,
        score_delta,
        reason,
        player_deadwood,
        ai_deadwood,
    }
}
