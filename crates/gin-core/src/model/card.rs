use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Position of a card in the standard 52-card deck (`suit * 13 + rank`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(u8);

impl CardId {
    pub const COUNT: usize = 52;

    pub const fn of(rank: Rank, suit: Suit) -> Self {
        Self((suit.index() * 13 + rank.index()) as u8)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Single-bit mask used for overlap tracking during meld search.
    pub const fn bit(self) -> u64 {
        1u64 << self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
    pub id: CardId,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self {
            rank,
            suit,
            id: CardId::of(rank, suit),
        }
    }

    pub const fn from_id(id: usize) -> Option<Self> {
        if id >= CardId::COUNT {
            return None;
        }
        match (Rank::from_index(id % 13), Suit::from_index(id / 13)) {
            (Some(rank), Some(suit)) => Some(Self::new(rank, suit)),
            _ => None,
        }
    }

    pub const fn value(self) -> u32 {
        self.rank.value()
    }

    /// Display ordering inside a sorted block: rank index, then suit index.
    pub const fn sort_key(self) -> (usize, usize) {
        (self.rank.index(), self.suit.index())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardParseError {
    Empty,
    UnknownSuit(String),
    UnknownRank(String),
}

impl fmt::Display for CardParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardParseError::Empty => write!(f, "card notation is empty"),
            CardParseError::UnknownSuit(raw) => write!(f, "unknown suit in '{raw}'"),
            CardParseError::UnknownRank(raw) => write!(f, "unknown rank in '{raw}'"),
        }
    }
}

impl std::error::Error for CardParseError {}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let Some(suit_char) = trimmed.chars().last() else {
            return Err(CardParseError::Empty);
        };
        let suit = Suit::from_symbol(suit_char)
            .ok_or_else(|| CardParseError::UnknownSuit(trimmed.to_string()))?;
        let rank_part = &trimmed[..trimmed.len() - suit_char.len_utf8()];
        let rank = Rank::from_symbol(rank_part)
            .ok_or_else(|| CardParseError::UnknownRank(trimmed.to_string()))?;
        Ok(Card::new(rank, suit))
    }
}
