use crate::model::dart::Dart;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DARTS_PER_TURN: usize = 3;

/// Darts recorded in the active player's current turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    darts: Vec<Dart>,
    round_score: u32,
    busted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnError {
    TurnComplete,
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnError::TurnComplete => write!(f, "turn already holds {DARTS_PER_TURN} darts"),
        }
    }
}

impl std::error::Error for TurnError {}

impl TurnState {
    pub fn new() -> Self {
        Self {
            darts: Vec::with_capacity(DARTS_PER_TURN),
            round_score: 0,
            busted: false,
        }
    }

    pub fn darts(&self) -> &[Dart] {
        &self.darts
    }

    /// Points actually applied to the player's score this turn.
    pub fn round_score(&self) -> u32 {
        self.round_score
    }

    pub fn busted(&self) -> bool {
        self.busted
    }

    pub fn is_complete(&self) -> bool {
        self.darts.len() >= DARTS_PER_TURN
    }

    pub fn darts_remaining(&self) -> usize {
        DARTS_PER_TURN.saturating_sub(self.darts.len())
    }

    pub fn record(&mut self, dart: Dart, applied: u32) -> Result<(), TurnError> {
        if self.is_complete() {
            return Err(TurnError::TurnComplete);
        }
        self.darts.push(dart);
        self.round_score += applied;
        Ok(())
    }

    pub fn mark_bust(&mut self) {
        self.busted = true;
    }

    /// Pads the turn with misses; returns how many were added.
    pub fn fill_misses(&mut self) -> usize {
        let missing = self.darts_remaining();
        self.darts
            .extend(std::iter::repeat_n(Dart::MISS, missing));
        missing
    }
}
