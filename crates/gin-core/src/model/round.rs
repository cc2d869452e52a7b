use crate::meld::deadwood;
use crate::model::card::Card;
use crate::model::deck::{Deck, DiscardPile};
use crate::model::hand::Hand;
use crate::model::player::Side;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::array;

pub const HAND_SIZE: usize = 10;

/// Where a turn's card came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawSource {
    Deck,
    Discard,
}

impl DrawSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            DrawSource::Deck => "deck",
            DrawSource::Discard => "discard",
        }
    }
}

impl fmt::Display for DrawSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Draw,
    Discard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundError {
    OutOfTurn { expected: Side, actual: Side },
    WrongPhase { expected: TurnPhase },
    DeckEmpty,
    DiscardEmpty,
    CardNotInHand(Card),
}

impl fmt::Display for RoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundError::OutOfTurn { expected, actual } => {
                write!(f, "expected {expected} to act but got {actual}")
            }
            RoundError::WrongPhase { expected } => {
                write!(f, "action requires the {expected:?} phase")
            }
            RoundError::DeckEmpty => write!(f, "the stock is empty"),
            RoundError::DiscardEmpty => write!(f, "the discard pile is empty"),
            RoundError::CardNotInHand(card) => write!(f, "{card} is not in the hand"),
        }
    }
}

impl std::error::Error for RoundError {}

/// Stock, discards and both hands for one deal, plus whose move it is.
#[derive(Debug, Clone)]
pub struct RoundState {
    deck: Deck,
    discard: DiscardPile,
    hands: [Hand; 2],
    dealer: Side,
    to_act: Side,
    phase: TurnPhase,
    turns_taken: u32,
}

impl RoundState {
    /// Deals ten cards each, alternating from the non-dealer, then turns the
    /// upcard. The non-dealer moves first.
    pub fn deal(deck: &Deck, dealer: Side) -> Self {
        let mut stock = deck.clone();
        let mut hands: [Hand; 2] = array::from_fn(|_| Hand::new());
        let mut seat = dealer.opponent();

        for _ in 0..HAND_SIZE * 2 {
            if let Some(card) = stock.draw() {
                hands[seat.index()].add(card);
            }
            seat = seat.opponent();
        }

        let mut discard = DiscardPile::new();
        if let Some(upcard) = stock.draw() {
            discard.push(upcard);
        }

        Self {
            deck: stock,
            discard,
            hands,
            dealer,
            to_act: dealer.opponent(),
            phase: TurnPhase::Draw,
            turns_taken: 0,
        }
    }

    pub fn from_parts(deck: Deck, discard: DiscardPile, hands: [Hand; 2], to_act: Side) -> Self {
        Self {
            deck,
            discard,
            hands,
            dealer: to_act.opponent(),
            to_act,
            phase: TurnPhase::Draw,
            turns_taken: 0,
        }
    }

    pub fn hand(&self, side: Side) -> &Hand {
        &self.hands[side.index()]
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn discard_pile(&self) -> &DiscardPile {
        &self.discard
    }

    pub fn dealer(&self) -> Side {
        self.dealer
    }

    pub fn to_act(&self) -> Side {
        self.to_act
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Completed draw-and-discard turns across both sides.
    pub fn turns_taken(&self) -> u32 {
        self.turns_taken
    }

    pub fn deadwood(&self, side: Side) -> u32 {
        deadwood(self.hand(side))
    }

    pub fn draw(&mut self, side: Side, source: DrawSource) -> Result<Card, RoundError> {
        self.check_turn(side, TurnPhase::Draw)?;
        let card = match source {
            DrawSource::Deck => self.deck.draw().ok_or(RoundError::DeckEmpty)?,
            DrawSource::Discard => self.discard.take().ok_or(RoundError::DiscardEmpty)?,
        };
        self.hands[side.index()].add(card);
        self.phase = TurnPhase::Discard;
        Ok(card)
    }

    pub fn discard(&mut self, side: Side, card: Card) -> Result<(), RoundError> {
        self.check_turn(side, TurnPhase::Discard)?;
        if !self.hands[side.index()].remove(card) {
            return Err(RoundError::CardNotInHand(card));
        }
        self.discard.push(card);
        self.phase = TurnPhase::Draw;
        self.to_act = side.opponent();
        self.turns_taken += 1;
        Ok(())
    }

    fn check_turn(&self, side: Side, phase: TurnPhase) -> Result<(), RoundError> {
        if side != self.to_act {
            return Err(RoundError::OutOfTurn {
                expected: self.to_act,
                actual: side,
            });
        }
        if phase != self.phase {
            return Err(RoundError::WrongPhase { expected: phase });
        }
        Ok(())
    }
}
