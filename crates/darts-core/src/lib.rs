pub mod achievement;
pub mod checkout;
pub mod game;
pub mod model;
pub mod rules;

pub use achievement::Achievement;
pub use checkout::Checkout;
pub use game::match_state::{Input, MatchState, Notice, Phase, Refusal, TurnEnding, reduce};
pub use model::config::{CheckMode, GameConfig};
pub use model::dart::Dart;
pub use model::hit::{RawHit, SegmentKind};
pub use model::player::PlayerId;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "darts-core"
    }

    pub const fn codename() -> &'static str {
        "Oche"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
