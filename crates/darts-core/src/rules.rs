//! In/out enforcement and bust detection for a single dart.

use crate::model::config::GameConfig;
use crate::model::dart::Dart;
use crate::model::player::PlayerState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BustReason {
    /// Projected score below zero.
    Overshoot,
    /// Projected score of exactly one.
    LeavesOne,
    /// Reached zero without a valid out.
    InvalidOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "snake_case")]
pub enum Verdict {
    /// Player has not started and the dart is not a valid in.
    NotIn,
    Scored,
    Bust(BustReason),
    Checkout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleOutcome {
    /// Points to subtract from the player's score.
    pub effective_score: u32,
    pub verdict: Verdict,
    pub starts_player: bool,
}

impl RuleOutcome {
    pub const fn is_bust(&self) -> bool {
        matches!(self.verdict, Verdict::Bust(_))
    }

    pub const fn is_valid_out(&self) -> bool {
        matches!(self.verdict, Verdict::Checkout)
    }
}

pub fn apply(dart: Dart, player: &PlayerState, config: &GameConfig) -> RuleOutcome {
    let starts_player = !player.has_started && config.in_mode.accepts(dart);
    if !player.has_started && !starts_player {
        return RuleOutcome {
            effective_score: 0,
            verdict: Verdict::NotIn,
            starts_player: false,
        };
    }

    let points = dart.score();
    let bust = |reason| RuleOutcome {
        effective_score: 0,
        verdict: Verdict::Bust(reason),
        starts_player,
    };

    let verdict = match player.score.checked_sub(points) {
        None => return bust(BustReason::Overshoot),
        Some(1) => return bust(BustReason::LeavesOne),
        Some(0) if !config.out_mode.accepts(dart) => return bust(BustReason::InvalidOut),
        Some(0) => Verdict::Checkout,
        Some(_) => Verdict::Scored,
    };

    RuleOutcome {
        effective_score: points,
        verdict,
        starts_player,
    }
}
