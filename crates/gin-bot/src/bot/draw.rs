use super::Difficulty;
use gin_core::meld::{deadwood, find_melds};
use gin_core::model::card::Card;
use gin_core::model::hand::Hand;
use rand::Rng;

const MEDIUM_SKIP_ROLL: f64 = 0.3;
const EASY_SKIP_ROLL: f64 = 0.5;
const EASY_MIN_GAIN: u32 = 2;

/// Whether to pick up the face-up card instead of drawing blind.
///
/// Hard tiers decide deterministically; lower tiers only roll `rng` once the
/// pickup would actually help.
pub fn should_take_from_discard<R: Rng + ?Sized>(
    top_discard: Option<Card>,
    hand: &Hand,
    difficulty: Difficulty,
    rng: &mut R,
) -> bool {
    let Some(top) = top_discard else {
        return false;
    };

    let extended = hand.with_card(top);
    let current = deadwood(hand);
    let test = deadwood(&extended);

    let take = if difficulty.plays_like_hard() {
        test < current || find_melds(&extended).len() > find_melds(hand).len()
    } else if difficulty == Difficulty::Medium {
        test < current && rng.gen_range(0.0..1.0) > MEDIUM_SKIP_ROLL
    } else {
        test + EASY_MIN_GAIN < current && rng.gen_range(0.0..1.0) > EASY_SKIP_ROLL
    };

    tracing::debug!(
        target: "gin_bot::draw",
        %top,
        current,
        test,
        %difficulty,
        take,
        "evaluated discard pickup"
    );
    take
}
