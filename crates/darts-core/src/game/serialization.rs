use super::history::Snapshot;
use super::match_state::{MatchState, Phase};
use crate::model::config::{ConfigIssue, GameConfig};
use crate::model::player::PlayerId;
use crate::model::turn::DARTS_PER_TURN;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Portable capture of a match in progress, used to hand a live match to a
/// fresh engine instance. Duplicate-throw bookkeeping and the undo stack are
/// not carried over; the remaining undo allowance is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchSnapshot {
    pub config: GameConfig,
    pub starting_player: PlayerId,
    pub phase: Phase,
    pub state: Snapshot,
    pub undo_remaining: u8,
}

impl MatchSnapshot {
    pub fn capture(state: &MatchState) -> Self {
        MatchSnapshot {
            config: *state.config(),
            starting_player: state.starting_player(),
            phase: state.phase(),
            state: state.snapshot(),
            undo_remaining: state.undo_remaining(),
        }
    }

    /// Rebuilds the match, refusing captures that break scoring invariants.
    pub fn restore(self) -> Result<MatchState, SnapshotError> {
        self.validate()?;
        Ok(MatchState::from_parts(
            self.config,
            self.starting_player,
            self.state,
            self.phase,
            self.undo_remaining,
        ))
    }

    pub fn validate(&self) -> Result<(), SnapshotError> {
        self.config.validate().map_err(SnapshotError::Config)?;

        let darts = self.state.turn.darts().len();
        if darts > DARTS_PER_TURN {
            return Err(SnapshotError::TooManyDarts(darts));
        }

        let start = self.config.start_score;
        for player in PlayerId::BOTH {
            let score = self.state.players[player.index()].score;
            if score > start || score == 1 {
                return Err(SnapshotError::ImpossibleScore { player, score });
            }
        }

        if self.undo_remaining > self.config.undo_limit {
            return Err(SnapshotError::UndoAllowance {
                remaining: self.undo_remaining,
                limit: self.config.undo_limit,
            });
        }
        Ok(())
    }

    pub fn to_json(state: &MatchState) -> serde_json::Result<String> {
        let snapshot = Self::capture(state);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    Config(ConfigIssue),
    TooManyDarts(usize),
    ImpossibleScore { player: PlayerId, score: u32 },
    UndoAllowance { remaining: u8, limit: u8 },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Config(issue) => write!(f, "invalid config: {issue}"),
            SnapshotError::TooManyDarts(count) => {
                write!(f, "turn holds {count} darts, at most {DARTS_PER_TURN} allowed")
            }
            SnapshotError::ImpossibleScore { player, score } => {
                write!(f, "{player} cannot stand on {score}")
            }
            SnapshotError::UndoAllowance { remaining, limit } => {
                write!(f, "{remaining} undos remaining exceeds the limit of {limit}")
            }
        }
    }
}

impl std::error::Error for SnapshotError {}
