mod heuristic;

pub use heuristic::HeuristicPolicy;

use crate::bot::AiTurn;
use gin_core::model::deck::{Deck, DiscardPile};
use gin_core::model::hand::Hand;
use gin_core::model::player::Side;

/// Table state a policy sees when it is asked to act.
pub struct PolicyContext<'a> {
    pub side: Side,
    pub hand: &'a Hand,
    pub deck: &'a Deck,
    pub discard_pile: &'a DiscardPile,
}

/// Seam between the table and whatever decides a side's turns.
pub trait Policy: Send {
    fn take_turn(&mut self, ctx: &PolicyContext) -> AiTurn;

    /// Short label for logs and reports.
    fn name(&self) -> String;
}
