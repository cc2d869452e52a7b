pub mod bot;
pub mod policy;

pub use bot::{
    AiTurn, Difficulty, ParseDifficultyError, TurnDecision, choose_discard, execute_ai_turn,
    should_knock, should_take_from_discard,
};
pub use policy::{HeuristicPolicy, Policy, PolicyContext};
