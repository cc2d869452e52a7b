use crate::model::card::Card;
use serde::{Deserialize, Serialize};

/// Cards held by one side, in the order they were received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        debug_assert!(
            has_unique_ids(&cards),
            "hand built with duplicate card ids"
        );
        Self { cards }
    }

    pub fn add(&mut self, card: Card) {
        debug_assert!(!self.contains(card), "{card} is already in the hand");
        self.cards.push(card);
    }

    pub fn remove(&mut self, card: Card) -> bool {
        if let Some(index) = self.cards.iter().position(|c| c.id == card.id) {
            self.cards.remove(index);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.iter().any(|c| c.id == card.id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn total_value(&self) -> u32 {
        self.cards.iter().map(|card| card.value()).sum()
    }

    /// Copy of this hand with `card` appended.
    pub fn with_card(&self, card: Card) -> Hand {
        let mut next = self.clone();
        next.add(card);
        next
    }

    /// Copy of this hand with `card` taken out, if present.
    pub fn without(&self, card: Card) -> Hand {
        let mut next = self.clone();
        next.remove(card);
        next
    }
}

impl FromIterator<Card> for Hand {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Hand::with_cards(iter.into_iter().collect())
    }
}

pub(crate) fn has_unique_ids(cards: &[Card]) -> bool {
    let mut seen = 0u64;
    for card in cards {
        if seen & card.id.bit() != 0 {
            return false;
        }
        seen |= card.id.bit();
    }
    true
}
