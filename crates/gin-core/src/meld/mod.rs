//! Meld detection and the utilities built on it.
//!
//! [`find_melds`] is the deadwood-minimising decomposition every other
//! function here starts from; nothing is cached, each call recomputes from the
//! hand it is given.

mod deadwood;
mod finder;
mod sort;

pub use deadwood::{KNOCK_LIMIT, can_knock, covered_mask, deadwood, deadwood_cards, deadwood_with, is_gin};
pub use finder::{find_melds, meld_candidates};
pub use sort::sort_hand;

use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

/// A scoring group: three or four of a rank, or three or more in sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Meld {
    Set { rank: Rank, cards: Vec<Card> },
    Run { suit: Suit, cards: Vec<Card> },
}

impl Meld {
    /// Builds a meld from loose cards, or `None` if they do not form one.
    ///
    /// Run cards are stored in rank order; set cards keep the given order.
    pub fn from_cards(cards: Vec<Card>) -> Option<Meld> {
        if cards.len() < 3 {
            return None;
        }
        let first = cards[0];

        if cards.iter().all(|card| card.rank == first.rank) {
            let mut suits = 0u8;
            for card in &cards {
                let bit = 1u8 << card.suit.index();
                if suits & bit != 0 {
                    return None;
                }
                suits |= bit;
            }
            return (cards.len() <= 4).then_some(Meld::Set {
                rank: first.rank,
                cards,
            });
        }

        if cards.iter().all(|card| card.suit == first.suit) {
            let mut ordered = cards;
            ordered.sort_by_key(|card| card.rank.index());
            let consecutive = ordered
                .windows(2)
                .all(|pair| pair[1].rank.index() == pair[0].rank.index() + 1);
            return consecutive.then_some(Meld::Run {
                suit: first.suit,
                cards: ordered,
            });
        }

        None
    }

    pub fn cards(&self) -> &[Card] {
        match self {
            Meld::Set { cards, .. } | Meld::Run { cards, .. } => cards,
        }
    }

    pub fn len(&self) -> usize {
        self.cards().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards().is_empty()
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Meld::Set { .. })
    }

    pub fn is_run(&self) -> bool {
        matches!(self, Meld::Run { .. })
    }

    pub fn value(&self) -> u32 {
        self.cards().iter().map(|card| card.value()).sum()
    }

    /// Bitset of the card ids in this meld.
    pub fn mask(&self) -> u64 {
        self.cards().iter().fold(0u64, |mask, card| mask | card.id.bit())
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards().iter().any(|c| c.id == card.id)
    }
}

impl fmt::Display for Meld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Meld::Set { .. } => "set",
            Meld::Run { .. } => "run",
        };
        write!(f, "{label}[")?;
        for (i, card) in self.cards().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{card}")?;
        }
        f.write_str("]")
    }
}


#[cfg(test)]
mod tests {
    use super::Meld;
    use super::test_support::cards;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn from_cards_recognises_sets() {
        let meld = Meld::from_cards(cards("7C 7D 7H")).expect("set");
        assert!(meld.is_set());
        assert!(matches!(meld, Meld::Set { rank: Rank::Seven, .. }));
        assert_eq!(meld.value(), 21);
        assert!(Meld::from_cards(cards("7C 7D 7H 7S")).is_some());
    }

    #[test]
    fn from_cards_orders_runs() {
        let meld = Meld::from_cards(cards("5H 3H 4H")).expect("run");
        assert!(matches!(meld, Meld::Run { suit: Suit::Hearts, .. }));
        assert_eq!(meld.to_string(), "run[3H 4H 5H]");
    }

    #[test]
    fn from_cards_rejects_invalid_groups() {
        assert!(Meld::from_cards(cards("7C 7D")).is_none());
        assert!(Meld::from_cards(cards("7C 7D 8D")).is_none());
        assert!(Meld::from_cards(cards("QS KS AS")).is_none());
        assert!(Meld::from_cards(cards("2S 3S 5S")).is_none());
    }

    #[test]
    fn mask_covers_every_card() {
        let meld = Meld::from_cards(cards("JD QD KD")).expect("run");
        assert_eq!(meld.mask().count_ones(), 3);
        for card in meld.cards() {
            assert!(meld.contains(*card));
        }
    }

    #[test]
    fn serializes_with_kind_tag() {
        let meld = Meld::from_cards(cards("AC AD AH")).expect("set");
        let json = serde_json::to_string(&meld).unwrap();
        assert!(json.contains("\"kind\":\"set\""));
        let back: Meld = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meld);
    }
}
