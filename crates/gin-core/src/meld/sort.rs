use super::{covered_mask, find_melds};
use crate::model::card::Card;
use crate::model::hand::Hand;

/// Display order for a hand: meld blocks first, then deadwood.
///
/// Each block is ordered by rank then suit. With `enabled == false` the hand
/// comes back in insertion order.
pub fn sort_hand(hand: &Hand, enabled: bool) -> Vec<Card> {
    if !enabled {
        return hand.cards().to_vec();
    }

    let melds = find_melds(hand);
    let covered = covered_mask(&melds);
    let mut ordered = Vec::with_capacity(hand.len());

    for meld in &melds {
        let mut block = meld.cards().to_vec();
        block.sort_by_key(|card| card.sort_key());
        ordered.extend(block);
    }

    let mut rest: Vec<Card> = hand
        .iter()
        .copied()
        .filter(|card| covered & card.id.bit() == 0)
        .collect();
    rest.sort_by_key(|card| card.sort_key());
    ordered.extend(rest);
    ordered
}
