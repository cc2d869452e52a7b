mod discard;
mod draw;
mod knock;
mod turn;

pub use discard::choose_discard;
pub use draw::should_take_from_discard;
pub use knock::should_knock;
pub use turn::{AiTurn, TurnDecision, execute_ai_turn};

use core::fmt;
use core::str::FromStr;
use gin_core::meld::KNOCK_LIMIT;
use std::sync::OnceLock;

/// Opponent strength. Endless tiers play exactly like `Hard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Difficulty {
    Tutorial,
    Easy,
    Medium,
    Hard,
    Endless(u8),
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

impl Difficulty {
    pub fn from_env() -> Self {
        static CACHED: OnceLock<Difficulty> = OnceLock::new();
        *CACHED.get_or_init(|| Self::from_reader(|key| std::env::var(key).ok()))
    }

    fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        read("GIN_BOT_DIFFICULTY")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    pub const fn plays_like_hard(self) -> bool {
        matches!(self, Difficulty::Hard | Difficulty::Endless(_))
    }

    /// Deadwood at or below which this tier knocks.
    pub const fn knock_threshold(self) -> u32 {
        match self {
            Difficulty::Tutorial | Difficulty::Easy => 5,
            Difficulty::Medium => 7,
            Difficulty::Hard | Difficulty::Endless(_) => KNOCK_LIMIT,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Tutorial => f.write_str("tutorial"),
            Difficulty::Easy => f.write_str("easy"),
            Difficulty::Medium => f.write_str("medium"),
            Difficulty::Hard => f.write_str("hard"),
            Difficulty::Endless(level) => write!(f, "endless-{level}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDifficultyError(String);

impl fmt::Display for ParseDifficultyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown difficulty '{}'", self.0)
    }
}

impl std::error::Error for ParseDifficultyError {}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "tutorial" => return Ok(Difficulty::Tutorial),
            "easy" => return Ok(Difficulty::Easy),
            "medium" | "normal" => return Ok(Difficulty::Medium),
            "hard" => return Ok(Difficulty::Hard),
            "endless" => return Ok(Difficulty::Endless(1)),
            _ => {}
        }
        normalized
            .strip_prefix("endless-")
            .and_then(|level| level.parse::<u8>().ok())
            .map(Difficulty::Endless)
            .ok_or(ParseDifficultyError(normalized))
    }
}

pub(crate) fn turn_logging_enabled() -> bool {
    std::env::var("GIN_TURN_DETAILS")
        .map(|raw| matches!(raw.trim(), "1" | "true" | "TRUE" | "on" | "ON"))
        .unwrap_or(false)
}

#[cfg(test)]
pub(crate) mod test_support {
    use gin_core::model::card::Card;
    use gin_core::model::hand::Hand;
    use rand::RngCore;

    pub fn hand(notation: &str) -> Hand {
        notation.split_whitespace().map(card).collect()
    }

    pub fn card(notation: &str) -> Card {
        notation.parse().expect("valid card notation")
    }

    /// Yields the same word forever: `u64::MAX` samples just under 1.0 and
    /// zero samples 0.0.
    pub struct ConstantRng(pub u64);

    impl RngCore for ConstantRng {
        fn next_u32(&mut self) -> u32 {
            self.0 as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(self.0 as u8);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    /// Fails the test if a decision consults randomness.
    pub struct UntouchableRng;

    impl RngCore for UntouchableRng {
        fn next_u32(&mut self) -> u32 {
            panic!("rng consulted")
        }

        fn next_u64(&mut self) -> u64 {
            panic!("rng consulted")
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            panic!("rng consulted")
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            panic!("rng consulted")
        }
    }
}
