use super::{Difficulty, choose_discard, should_knock, should_take_from_discard};
use gin_core::meld::deadwood;
use gin_core::model::card::Card;
use gin_core::model::deck::{Deck, DiscardPile};
use gin_core::model::hand::Hand;
use gin_core::model::round::DrawSource;
use rand::Rng;
use tracing::{Level, event};

/// Everything the table needs to replay one automated turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnDecision {
    pub source: DrawSource,
    pub drawn: Card,
    pub discarded: Card,
    /// Ten cards left after the discard.
    pub hand: Hand,
    pub knock: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiTurn {
    /// The stock ran out; the round ends without a winner.
    DeckEmpty,
    Decision(TurnDecision),
}

impl AiTurn {
    pub fn decision(&self) -> Option<&TurnDecision> {
        match self {
            AiTurn::Decision(decision) => Some(decision),
            AiTurn::DeckEmpty => None,
        }
    }
}

/// Draw, discard and knock decisions for one turn.
///
/// Inputs are left untouched; the caller applies the returned decision.
pub fn execute_ai_turn<R: Rng + ?Sized>(
    hand: &Hand,
    deck: &Deck,
    discard_pile: &DiscardPile,
    difficulty: Difficulty,
    rng: &mut R,
) -> AiTurn {
    let Some(deck_top) = deck.top() else {
        return AiTurn::DeckEmpty;
    };

    let (source, drawn) =
        if should_take_from_discard(discard_pile.top(), hand, difficulty, rng) {
            match discard_pile.top() {
                Some(card) => (DrawSource::Discard, card),
                None => (DrawSource::Deck, deck_top),
            }
        } else {
            (DrawSource::Deck, deck_top)
        };

    let full = hand.with_card(drawn);
    let discarded = choose_discard(&full).unwrap_or(drawn);
    let kept = full.without(discarded);
    let knock = should_knock(&kept, difficulty);

    let decision = TurnDecision {
        source,
        drawn,
        discarded,
        hand: kept,
        knock,
    };
    log_turn_decision(&decision, difficulty);
    AiTurn::Decision(decision)
}

fn log_turn_decision(decision: &TurnDecision, difficulty: Difficulty) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    if !super::turn_logging_enabled() {
        return;
    }

    let hand = decision
        .hand
        .iter()
        .map(|card| card.to_string())
        .collect::<Vec<_>>()
        .join(",");

    event!(
        target: "gin_bot::turn",
        Level::INFO,
        difficulty = %difficulty,
        source = %decision.source,
        drawn = %decision.drawn,
        discarded = %decision.discarded,
        deadwood = deadwood(&decision.hand),
        knock = decision.knock,
        hand = %hand
    );
}
