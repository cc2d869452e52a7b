#![deny(warnings)]
pub mod game;
pub mod meld;
pub mod model;
pub mod scoring;

pub use meld::{Meld, deadwood, find_melds, sort_hand};
pub use model::score::match_winner;
pub use scoring::{RoundOutcome, RoundReason, round_result};

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "gin"
    }

    pub const fn codename() -> &'static str {
        "Knock Engine"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
