use super::Difficulty;
use gin_core::meld::deadwood;
use gin_core::model::hand::Hand;

/// Whether the tier would end the round with this ten-card hand.
pub fn should_knock(hand: &Hand, difficulty: Difficulty) -> bool {
    deadwood(hand) <= difficulty.knock_threshold()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::test_support::hand;

    #[test]
    fn gin_always_knocks() {
        let gin = hand("5C 5D 5S JC JD JS 2H 3H 4H 5H");
        for difficulty in [
            Difficulty::Tutorial,
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Endless(7),
        ] {
            assert!(should_knock(&gin, difficulty), "{difficulty}");
        }
    }

    #[test]
    fn thresholds_are_inclusive_per_tier() {
        let five = hand("JC JD JS QC QD QS 2H 3H 4H 5D");
        assert_eq!(deadwood(&five), 5);
        assert!(should_knock(&five, Difficulty::Easy));
        assert!(should_knock(&five, Difficulty::Tutorial));

        let seven = hand("5C 5D 5S JC JD JS 2H 3H 4H 7D");
        assert_eq!(deadwood(&seven), 7);
        assert!(!should_knock(&seven, Difficulty::Easy));
        assert!(should_knock(&seven, Difficulty::Medium));

        let ten = hand("5C 5D 5S JC JD JS 2H 3H 4H KD");
        assert_eq!(deadwood(&ten), 10);
        assert!(!should_knock(&ten, Difficulty::Medium));
        assert!(should_knock(&ten, Difficulty::Hard));
        assert!(should_knock(&ten, Difficulty::Endless(3)));
    }

    #[test]
    fn high_deadwood_never_knocks() {
        let loose = hand("2C 5D 8S JH KC 3H 7D 9S QD 4C");
        assert!(!should_knock(&loose, Difficulty::Hard));
    }
}
