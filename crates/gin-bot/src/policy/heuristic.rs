use super::{Policy, PolicyContext};
use crate::bot::{AiTurn, Difficulty, execute_ai_turn};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Runs the tiered draw/discard/knock rules with its own seeded generator.
pub struct HeuristicPolicy {
    difficulty: Difficulty,
    rng: StdRng,
}

impl HeuristicPolicy {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_env(seed: u64) -> Self {
        Self::new(Difficulty::from_env(), seed)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

impl Policy for HeuristicPolicy {
    fn take_turn(&mut self, ctx: &PolicyContext) -> AiTurn {
        let turn = execute_ai_turn(
            ctx.hand,
            ctx.deck,
            ctx.discard_pile,
            self.difficulty,
            &mut self.rng,
        );
        if let AiTurn::Decision(decision) = &turn {
            tracing::debug!(
                target: "gin_bot::policy",
                side = %ctx.side,
                source = %decision.source,
                knock = decision.knock,
                "heuristic turn"
            );
        }
        turn
    }

    fn name(&self) -> String {
        format!("heuristic-{}", self.difficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gin_core::model::card::Card;
    use gin_core::model::deck::{Deck, DiscardPile};
    use gin_core::model::hand::Hand;
    use gin_core::model::player::Side;

    fn context_parts(seed: u64) -> (Hand, Deck, DiscardPile) {
        let deal = Deck::shuffled_with_seed(seed);
        let hand: Hand = deal.cards()[..10].iter().copied().collect();
        let deck = Deck::from_cards(deal.cards()[11..].to_vec());
        let mut pile = DiscardPile::new();
        pile.push(deal.cards()[10]);
        (hand, deck, pile)
    }

    #[test]
    fn same_seed_plays_the_same_turns() {
        let (hand, deck, pile) = context_parts(4);
        let ctx = PolicyContext {
            side: Side::Ai,
            hand: &hand,
            deck: &deck,
            discard_pile: &pile,
        };
        let mut first = HeuristicPolicy::new(Difficulty::Easy, 12);
        let mut second = HeuristicPolicy::new(Difficulty::Easy, 12);
        for _ in 0..8 {
            assert_eq!(first.take_turn(&ctx), second.take_turn(&ctx));
        }
    }

    #[test]
    fn empty_stock_is_passed_through() {
        let (hand, _, pile) = context_parts(9);
        let empty = Deck::from_cards(Vec::<Card>::new());
        let ctx = PolicyContext {
            side: Side::Player,
            hand: &hand,
            deck: &empty,
            discard_pile: &pile,
        };
        let mut policy = HeuristicPolicy::new(Difficulty::Hard, 0);
        assert_eq!(policy.take_turn(&ctx), AiTurn::DeckEmpty);
    }

    #[test]
    fn name_includes_the_tier() {
        assert_eq!(
            HeuristicPolicy::new(Difficulty::Endless(2), 0).name(),
            "heuristic-endless-2"
        );
        assert_eq!(
            HeuristicPolicy::new(Difficulty::Medium, 0).difficulty(),
            Difficulty::Medium
        );
    }
}
