use gin_core::meld::deadwood_cards;
use gin_core::model::card::Card;
use gin_core::model::hand::Hand;

/// Card to throw away after drawing.
///
/// Picks the highest-value deadwood card, the earliest in hand order on ties.
/// A fully melded hand gives up its first card. `None` only for an empty hand.
pub fn choose_discard(hand: &Hand) -> Option<Card> {
    let mut best: Option<Card> = None;
    for card in deadwood_cards(hand) {
        match best {
            Some(current) if card.value() <= current.value() => {}
            _ => best = Some(card),
        }
    }
    best.or_else(|| hand.cards().first().copied())
}
