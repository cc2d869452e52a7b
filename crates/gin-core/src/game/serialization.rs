use super::match_state::MatchState;
use crate::model::player::Side;
use crate::model::score::DEFAULT_TARGET_SCORE;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchSnapshot {
    pub seed: u64,
    pub round_number: u32,
    pub dealer: Side,
    pub scores: [u32; 2],
    #[serde(default = "default_target_score")]
    pub target_score: u32,
}

fn default_target_score() -> u32 {
    DEFAULT_TARGET_SCORE
}

impl MatchSnapshot {
    pub fn capture(state: &MatchState) -> Self {
        MatchSnapshot {
            seed: state.seed(),
            round_number: state.round_number(),
            dealer: state.round().dealer(),
            scores: *state.scores().standings(),
            target_score: state.target_score(),
        }
    }

    pub fn restore(self) -> MatchState {
        MatchState::from_snapshot(&self)
    }

    pub fn to_json(state: &MatchState) -> serde_json::Result<String> {
        let snapshot = Self::capture(state);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::MatchSnapshot;
    use crate::game::match_state::MatchState;
    use crate::model::player::{Side, Winner};
    use crate::scoring::{RoundOutcome, RoundReason};

    #[test]
    fn snapshot_serializes_to_json() {
        let state = MatchState::with_seed(Side::Player, 99);
        let json = MatchSnapshot::to_json(&state).unwrap();
        assert!(json.contains("\"seed\": 99"));
        assert!(json.contains("\"round_number\": 1"));
        assert!(json.contains("\"dealer\": \"player\""));
    }

    #[test]
    fn snapshot_roundtrip_restores_deal_and_scores() {
        let mut state = MatchState::with_seed(Side::Ai, 123);
        state.finish_round_and_start_next(&RoundOutcome {
            winner: Winner::Ai,
            score_delta: 40,
            reason: RoundReason::Undercut,
            player_deadwood: 20,
            ai_deadwood: 5,
        });
        let snapshot = MatchSnapshot::capture(&state);
        let restored = snapshot.clone().restore();
        assert_eq!(restored.seed(), 123);
        assert_eq!(restored.round_number(), 2);
        assert_eq!(restored.scores().standings(), &snapshot.scores);
        assert_eq!(
            restored.round().hand(Side::Ai),
            state.round().hand(Side::Ai)
        );
    }

    #[test]
    fn snapshot_from_json_defaults_target_score() {
        let json = r#"{
            "seed": 7,
            "round_number": 3,
            "dealer": "ai",
            "scores": [12, 64]
        }"#;

        let snapshot = MatchSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.round_number, 3);
        assert_eq!(snapshot.dealer, Side::Ai);
        assert_eq!(snapshot.scores, [12, 64]);
        assert_eq!(snapshot.target_score, 100);
    }
}
