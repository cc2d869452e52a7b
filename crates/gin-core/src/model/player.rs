use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// One of the two seats at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Side {
    Player = 0,
    Ai = 1,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Player, Side::Ai];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Side::Player),
            1 => Some(Side::Ai),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Side::Player => "player",
            Side::Ai => "ai",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "player" => Ok(Side::Player),
            "ai" => Ok(Side::Ai),
            other => Err(format!("unknown side '{other}'")),
        }
    }
}

/// Result of a round from the table's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Player,
    Ai,
    Draw,
}

impl Winner {
    pub const fn side(self) -> Option<Side> {
        match self {
            Winner::Player => Some(Side::Player),
            Winner::Ai => Some(Side::Ai),
            Winner::Draw => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Winner::Player => "player",
            Winner::Ai => "ai",
            Winner::Draw => "draw",
        }
    }
}

impl From<Side> for Winner {
    fn from(side: Side) -> Self {
        match side {
            Side::Player => Winner::Player,
            Side::Ai => Winner::Ai,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{Side, Winner};

    #[test]
    fn opponent_swaps_sides() {
        assert_eq!(Side::Player.opponent(), Side::Ai);
        assert_eq!(Side::Ai.opponent(), Side::Player);
    }

    #[test]
    fn index_roundtrip() {
        for (i, side) in Side::BOTH.iter().enumerate() {
            assert_eq!(Side::from_index(i), Some(*side));
            assert_eq!(side.index(), i);
        }
        assert_eq!(Side::from_index(2), None);
    }

    #[test]
    fn winner_maps_back_to_side() {
        assert_eq!(Winner::from(Side::Ai).side(), Some(Side::Ai));
        assert_eq!(Winner::Draw.side(), None);
        assert_eq!(Winner::Draw.to_string(), "draw");
    }

    #[test]
    fn side_parses_case_insensitively() {
        assert_eq!("AI".parse::<Side>(), Ok(Side::Ai));
        assert!("north".parse::<Side>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Winner::Player).unwrap(), "\"player\"");
        assert_eq!(serde_json::to_string(&Side::Ai).unwrap(), "\"ai\"");
    }
}
