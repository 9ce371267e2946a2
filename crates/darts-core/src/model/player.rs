use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PlayerId {
    Home = 0,
    Away = 1,
}

impl PlayerId {
    pub const BOTH: [PlayerId; 2] = [PlayerId::Home, PlayerId::Away];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(PlayerId::Home),
            1 => Some(PlayerId::Away),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn other(self) -> PlayerId {
        match self {
            PlayerId::Home => PlayerId::Away,
            PlayerId::Away => PlayerId::Home,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlayerId::Home => "Home",
            PlayerId::Away => "Away",
        };
        f.write_str(label)
    }
}

/// Per-player scoring data. `score` only decreases, except through undo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub score: u32,
    pub darts_thrown: u32,
    pub has_started: bool,
    pub frozen_ppr: Option<f64>,
}

impl PlayerState {
    pub const fn new(start_score: u32) -> Self {
        Self {
            score: start_score,
            darts_thrown: 0,
            has_started: false,
            frozen_ppr: None,
        }
    }

    pub fn points_scored(&self, start_score: u32) -> u32 {
        start_score.saturating_sub(self.score)
    }

    /// Three-dart average computed from the raw counters.
    pub fn live_ppr(&self, start_score: u32) -> f64 {
        if self.darts_thrown == 0 {
            return 0.0;
        }
        self.points_scored(start_score) as f64 * 3.0 / self.darts_thrown as f64
    }

    /// Frozen statistic once captured, otherwise the live value.
    pub fn ppr(&self, start_score: u32) -> f64 {
        self.frozen_ppr
            .unwrap_or_else(|| self.live_ppr(start_score))
    }

    pub fn freeze_ppr(&mut self, start_score: u32) {
        if self.frozen_ppr.is_none() {
            self.frozen_ppr = Some(self.live_ppr(start_score));
        }
    }
}
