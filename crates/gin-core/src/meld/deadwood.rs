use super::{Meld, find_melds};
use crate::model::card::Card;
use crate::model::hand::Hand;

/// Highest deadwood total that still allows a knock.
pub const KNOCK_LIMIT: u32 = 10;

/// Union of the card-id masks of `melds`.
pub fn covered_mask(melds: &[Meld]) -> u64 {
    melds.iter().fold(0u64, |mask, meld| mask | meld.mask())
}

/// Value of the cards in `hand` left outside the optimal decomposition.
pub fn deadwood(hand: &Hand) -> u32 {
    deadwood_with(hand, &find_melds(hand))
}

/// Value of the cards in `hand` that `melds` does not cover.
pub fn deadwood_with(hand: &Hand, melds: &[Meld]) -> u32 {
    let covered = covered_mask(melds);
    hand.iter()
        .filter(|card| covered & card.id.bit() == 0)
        .map(|card| card.value())
        .sum()
}

/// Unmelded cards, in hand order.
pub fn deadwood_cards(hand: &Hand) -> Vec<Card> {
    let covered = covered_mask(&find_melds(hand));
    hand.iter()
        .copied()
        .filter(|card| covered & card.id.bit() == 0)
        .collect()
}

pub fn is_gin(hand: &Hand) -> bool {
    deadwood(hand) == 0
}

pub fn can_knock(hand: &Hand) -> bool {
    deadwood(hand) <= KNOCK_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meld::test_support::hand;
    use crate::model::deck::Deck;

    #[test]
    fn empty_hand_has_zero_deadwood() {
        assert_eq!(deadwood(&Hand::new()), 0);
        assert!(deadwood_cards(&Hand::new()).is_empty());
    }

    #[test]
    fn counts_only_unmelded_cards() {
        assert_eq!(deadwood(&hand("AS AH AD KC")), 10);
        assert_eq!(deadwood(&hand("2S 3S 4S 7C 9D")), 16);
        assert_eq!(
            deadwood_cards(&hand("7C 2S 3S 4S 9D")),
            hand("7C 9D").cards().to_vec()
        );
    }

    #[test]
    fn fully_melded_hand_is_gin() {
        let near = hand("5C 5D 5H JC JD JS 2H 3H 4H 6H");
        // 5H serves either the set or the run, never both.
        assert_eq!(deadwood(&near), 6);
        assert!(!is_gin(&near));
        let gin = hand("5C 5D 5S JC JD JS 2H 3H 4H 5H");
        assert_eq!(deadwood(&gin), 0);
        assert!(is_gin(&gin));
    }

    #[test]
    fn knock_limit_is_inclusive() {
        assert!(can_knock(&hand("AS AH AD KC")));
        assert!(!can_knock(&hand("AS AH AD KC 2D")));
    }

    #[test]
    fn deadwood_equals_total_minus_melded_value() {
        for seed in 0..64u64 {
            let deck = Deck::shuffled_with_seed(seed);
            let hand: Hand = deck.cards()[..10].iter().copied().collect();
            let melds = find_melds(&hand);
            let melded: u32 = melds.iter().map(Meld::value).sum();
            let dw = deadwood(&hand);
            assert_eq!(dw, hand.total_value() - melded, "seed {seed}");
            assert!(dw <= hand.total_value());
            assert_eq!(deadwood_with(&hand, &melds), dw);
        }
    }
}
