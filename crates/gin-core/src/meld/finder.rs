use super::Meld;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::rank::Rank;
use crate::model::suit::Suit;

/// A candidate meld with its id mask and value precomputed for the search.
#[derive(Debug, Clone)]
struct Candidate {
    meld: Meld,
    mask: u64,
    value: u32,
}

impl Candidate {
    fn new(meld: Meld) -> Self {
        Self {
            mask: meld.mask(),
            value: meld.value(),
            meld,
        }
    }
}

/// Every meld the search may pick from, overlapping freely.
///
/// Sets come first (rank order), then runs (suit order, then start position,
/// longest first).
pub fn meld_candidates(hand: &Hand) -> Vec<Meld> {
    candidates(hand).into_iter().map(|c| c.meld).collect()
}

/// Non-overlapping melds leaving the least deadwood in `hand`.
///
/// Among equally good decompositions the first one reached in candidate
/// order is returned.
pub fn find_melds(hand: &Hand) -> Vec<Meld> {
    let candidates = candidates(hand);
    if candidates.is_empty() {
        return Vec::new();
    }

    let mut search = Search {
        candidates: &candidates,
        current: Vec::with_capacity(4),
        best: Vec::new(),
        best_covered: 0,
    };
    search.explore(0, 0, 0);

    search
        .best
        .iter()
        .map(|&index| candidates[index].meld.clone())
        .collect()
}

fn candidates(hand: &Hand) -> Vec<Candidate> {
    let mut out = Vec::new();
    push_set_candidates(hand, &mut out);
    push_run_candidates(hand, &mut out);
    out
}

fn push_set_candidates(hand: &Hand, out: &mut Vec<Candidate>) {
    for rank in Rank::ORDERED {
        let group: Vec<Card> = hand.iter().copied().filter(|c| c.rank == rank).collect();
        match group.len() {
            3 => out.push(Candidate::new(Meld::Set { rank, cards: group })),
            4 => {
                out.push(Candidate::new(Meld::Set {
                    rank,
                    cards: group.clone(),
                }));
                // The 3-card subsets let a fourth card go to a run instead.
                for skip in 0..4 {
                    let subset: Vec<Card> = group
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| *i != skip)
                        .map(|(_, card)| *card)
                        .collect();
                    out.push(Candidate::new(Meld::Set {
                        rank,
                        cards: subset,
                    }));
                }
            }
            _ => {}
        }
    }
}

fn push_run_candidates(hand: &Hand, out: &mut Vec<Candidate>) {
    for suit in Suit::ALL {
        let mut cards: Vec<Card> = hand.iter().copied().filter(|c| c.suit == suit).collect();
        if cards.len() < 3 {
            continue;
        }
        cards.sort_by_key(|card| card.rank.index());

        for start in 0..cards.len() {
            let mut end = start;
            while end + 1 < cards.len()
                && cards[end + 1].rank.index() == cards[end].rank.index() + 1
            {
                end += 1;
            }

            let longest = end - start + 1;
            for len in (3..=longest).rev() {
                out.push(Candidate::new(Meld::Run {
                    suit,
                    cards: cards[start..start + len].to_vec(),
                }));
            }
        }
    }
}

struct Search<'a> {
    candidates: &'a [Candidate],
    current: Vec<usize>,
    best: Vec<usize>,
    best_covered: u32,
}

impl Search<'_> {
    /// Visits every subset of pairwise-disjoint candidates drawn from
    /// `start..`, keeping the one that covers the most value.
    fn explore(&mut self, start: usize, used: u64, covered: u32) {
        if covered > self.best_covered {
            self.best_covered = covered;
            self.best.clone_from(&self.current);
        }

        for index in start..self.candidates.len() {
            let candidate = &self.candidates[index];
            if candidate.mask & used != 0 {
                continue;
            }
            self.current.push(index);
            self.explore(index + 1, used | candidate.mask, covered + candidate.value);
            self.current.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{find_melds, meld_candidates};
    use crate::meld::Meld;
    use crate::meld::test_support::{cards, hand};
    use crate::model::card::Card;
    use crate::model::deck::Deck;
    use crate::model::hand::Hand;
    use std::collections::HashMap;

    fn uncovered(hand_notation: &str) -> u32 {
        let hand = hand(hand_notation);
        let melds = find_melds(&hand);
        let covered: u32 = melds.iter().map(Meld::value).sum();
        hand.total_value() - covered
    }

    /// Reference minimum over every partition, by trying each valid meld that
    /// contains the lowest remaining card.
    fn brute_force_deadwood(cards: &[Card]) -> u32 {
        fn solve(cards: &[Card], remaining: u32, memo: &mut HashMap<u32, u32>) -> u32 {
            if remaining == 0 {
                return 0;
            }
            if let Some(&known) = memo.get(&remaining) {
                return known;
            }
            let lowest = remaining.trailing_zeros();
            let lowest_bit = 1u32 << lowest;
            let rest = remaining & !lowest_bit;
            let mut best = cards[lowest as usize].value() + solve(cards, rest, memo);

            let mut sub = rest;
            loop {
                let group = sub | lowest_bit;
                if group.count_ones() >= 3 {
                    let members: Vec<Card> = (0..cards.len())
                        .filter(|i| group & (1 << i) != 0)
                        .map(|i| cards[i])
                        .collect();
                    if Meld::from_cards(members).is_some() {
                        best = best.min(solve(cards, remaining & !group, memo));
                    }
                }
                if sub == 0 {
                    break;
                }
                sub = (sub - 1) & rest;
            }

            memo.insert(remaining, best);
            best
        }

        let all = (1u32 << cards.len()) - 1;
        solve(cards, all, &mut HashMap::new())
    }

    #[test]
    fn empty_hand_has_no_melds() {
        assert!(find_melds(&hand("")).is_empty());
    }

    #[test]
    fn three_aces_and_a_king() {
        let hand = hand("AS AH AD KC");
        let melds = find_melds(&hand);
        assert_eq!(melds.len(), 1);
        assert!(melds[0].is_set());
        assert_eq!(melds[0].len(), 3);
        assert_eq!(uncovered("AS AH AD KC"), 10);
    }

    #[test]
    fn short_run_with_loose_cards() {
        let melds = find_melds(&hand("2S 3S 4S 7C 9D"));
        assert_eq!(melds.len(), 1);
        assert!(melds[0].is_run());
        assert_eq!(uncovered("2S 3S 4S 7C 9D"), 16);
    }

    #[test]
    fn four_of_a_kind_yields_full_set_and_subsets() {
        let candidates = meld_candidates(&hand("8C 8D 8S 8H"));
        assert_eq!(candidates.len(), 5);
        assert_eq!(candidates[0].len(), 4);
        assert!(candidates[1..].iter().all(|meld| meld.len() == 3));
    }

    #[test]
    fn five_card_run_yields_every_window() {
        let candidates = meld_candidates(&hand("3D 4D 5D 6D 7D"));
        let mut lengths: Vec<usize> = candidates.iter().map(Meld::len).collect();
        lengths.sort_unstable();
        assert_eq!(lengths, vec![3, 3, 3, 4, 4, 5]);
    }

    #[test]
    fn fourth_card_moves_from_set_into_run() {
        // 7H is needed by the hearts run, leaving 7C 7D 7S as the set.
        let melds = find_melds(&hand("7C 7D 7S 7H 8H 9H"));
        assert_eq!(melds.len(), 2);
        assert_eq!(uncovered("7C 7D 7S 7H 8H 9H"), 0);
    }

    #[test]
    fn short_run_frees_cards_for_two_sets() {
        // Using A-2-3 alone lets the fours and fives form sets.
        let notation = "AS 2S 3S 4S 5S 4H 4D 5H 5D";
        assert_eq!(uncovered(notation), 0);
        assert_eq!(find_melds(&hand(notation)).len(), 3);
    }

    #[test]
    fn ace_does_not_wrap_after_king() {
        assert!(find_melds(&hand("QS KS AS")).is_empty());
    }

    #[test]
    fn melds_never_overlap_and_have_three_cards() {
        for seed in 0..64u64 {
            let deck = Deck::shuffled_with_seed(seed);
            let hand: Hand = deck.cards()[..11].iter().copied().collect();
            let melds = find_melds(&hand);
            let mut used = 0u64;
            for meld in &melds {
                assert!(meld.len() >= 3, "seed {seed}: short meld {meld}");
                assert_eq!(used & meld.mask(), 0, "seed {seed}: overlap at {meld}");
                assert!(Meld::from_cards(meld.cards().to_vec()).is_some());
                used |= meld.mask();
            }
        }
    }

    #[test]
    fn matches_brute_force_minimum_on_random_hands() {
        for seed in 0..200u64 {
            let deck = Deck::shuffled_with_seed(seed);
            let dealt = &deck.cards()[..10];
            let hand: Hand = dealt.iter().copied().collect();
            let covered: u32 = find_melds(&hand).iter().map(Meld::value).sum();
            assert_eq!(
                hand.total_value() - covered,
                brute_force_deadwood(dealt),
                "seed {seed}"
            );
        }
    }

    #[test]
    fn matches_brute_force_on_meld_rich_hands() {
        let hands = [
            "AC 2C 3C 4C 5C 3D 3S 5D 5S 6C",
            "9H 10H JH QH KH 9C 9S QC QS KD",
            "2D 3D 4D 2H 2S 4H 4S 3H 3S 5D",
            "6S 7S 8S 9S 6H 6D 7H 7D 8D 9D",
        ];
        for notation in hands {
            let dealt = cards(notation);
            assert_eq!(uncovered(notation), brute_force_deadwood(&dealt), "{notation}");
        }
    }

    #[test]
    fn result_is_deterministic() {
        let hand = hand("7C 7D 7S 7H 8H 9H 6H 5H");
        assert_eq!(find_melds(&hand), find_melds(&hand));
    }
}
