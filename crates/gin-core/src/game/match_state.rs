use crate::model::deck::Deck;
use crate::model::player::{Side, Winner};
use crate::model::round::RoundState;
use crate::model::score::{DEFAULT_TARGET_SCORE, ScoreBoard, match_winner};
use crate::scoring::RoundOutcome;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Debug, Clone)]
pub struct MatchState {
    scores: ScoreBoard,
    round_number: u32,
    current_round: RoundState,
    rng: StdRng,
    seed: u64,
    target_score: u32,
}

impl MatchState {
    pub fn new(dealer: Side) -> Self {
        let seed: u64 = rand::random();
        Self::with_seed_round(seed, 1, dealer, DEFAULT_TARGET_SCORE)
    }

    pub fn with_seed(dealer: Side, seed: u64) -> Self {
        Self::with_seed_round(seed, 1, dealer, DEFAULT_TARGET_SCORE)
    }

    /// Rebuilds the deal for `round_number` by replaying the earlier shuffles.
    pub fn with_seed_round(seed: u64, round_number: u32, dealer: Side, target_score: u32) -> Self {
        let normalized_round = round_number.max(1);
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 1..normalized_round {
            let _ = Deck::shuffled(&mut rng);
        }

        let deck = Deck::shuffled(&mut rng);
        let current_round = RoundState::deal(&deck, dealer);

        Self {
            scores: ScoreBoard::new(),
            round_number: normalized_round,
            current_round,
            rng,
            seed,
            target_score: target_score.max(1),
        }
    }

    pub fn from_snapshot(snapshot: &crate::game::serialization::MatchSnapshot) -> Self {
        let mut state = MatchState::with_seed_round(
            snapshot.seed,
            snapshot.round_number,
            snapshot.dealer,
            snapshot.target_score,
        );
        state.scores_mut().set_totals(snapshot.scores);
        state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn scores_mut(&mut self) -> &mut ScoreBoard {
        &mut self.scores
    }

    pub fn round(&self) -> &RoundState {
        &self.current_round
    }

    pub fn round_mut(&mut self) -> &mut RoundState {
        &mut self.current_round
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn target_score(&self) -> u32 {
        self.target_score
    }

    pub fn winner(&self) -> Option<Side> {
        match_winner(&self.scores, self.target_score)
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    /// Credits the round winner and deals the next round with the deal
    /// passing to the other side.
    pub fn finish_round_and_start_next(&mut self, outcome: &RoundOutcome) {
        if let Some(side) = outcome.winner.side() {
            self.scores.add_points(side, outcome.score_delta);
        }
        debug_assert!(outcome.winner != Winner::Draw || outcome.score_delta == 0);

        self.round_number += 1;
        let next_dealer = self.current_round.dealer().opponent();
        let deck = Deck::shuffled(&mut self.rng);
        self.current_round = RoundState::deal(&deck, next_dealer);
    }
}
