use crate::model::player::{PlayerId, PlayerState};
use crate::model::turn::TurnState;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Scoring data captured immediately before a dart is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub players: [PlayerState; 2],
    pub active: PlayerId,
    pub turn: TurnState,
    pub round: u32,
    pub turns_this_round: u8,
}

/// Bounded stack of snapshots plus the per-game undo allowance.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoHistory {
    snapshots: VecDeque<Snapshot>,
    capacity: usize,
    remaining: u8,
}

impl UndoHistory {
    pub fn new(limit: u8) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(limit as usize),
            capacity: limit as usize,
            remaining: limit,
        }
    }

    /// History carrying over an allowance that was partly used elsewhere.
    pub fn with_remaining(limit: u8, remaining: u8) -> Self {
        let mut history = Self::new(limit);
        history.remaining = remaining.min(limit);
        history
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        if self.capacity == 0 {
            return;
        }
        if self.snapshots.len() == self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    pub fn undo(&mut self) -> Option<Snapshot> {
        if self.remaining == 0 {
            return None;
        }
        let snapshot = self.snapshots.pop_back()?;
        self.remaining -= 1;
        Some(snapshot)
    }

    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    pub fn depth(&self) -> usize {
        self.snapshots.len()
    }

    pub fn can_undo(&self) -> bool {
        self.remaining > 0 && !self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Snapshot, UndoHistory};
    use crate::model::player::{PlayerId, PlayerState};
    use crate::model::turn::TurnState;

    fn snapshot(score: u32) -> Snapshot {
        Snapshot {
            players: [PlayerState::new(score), PlayerState::new(501)],
            active: PlayerId::Home,
            turn: TurnState::new(),
            round: 1,
            turns_this_round: 0,
        }
    }

    #[test]
    fn undo_pops_most_recent_first() {
        let mut history = UndoHistory::new(3);
        history.push(snapshot(501));
        history.push(snapshot(441));
        assert_eq!(history.undo().unwrap().players[0].score, 441);
        assert_eq!(history.undo().unwrap().players[0].score, 501);
        assert_eq!(history.remaining(), 1);
    }

    #[test]
    fn empty_stack_does_not_consume_an_undo() {
        let mut history = UndoHistory::new(3);
        assert!(history.undo().is_none());
        assert_eq!(history.remaining(), 3);
    }

    #[test]
    fn allowance_is_never_replenished() {
        let mut history = UndoHistory::new(2);
        for score in [501, 441, 381, 321] {
            history.push(snapshot(score));
        }
        assert_eq!(history.depth(), 2);
        assert!(history.undo().is_some());
        assert!(history.undo().is_some());
        history.push(snapshot(200));
        assert!(!history.can_undo());
        assert!(history.undo().is_none());
        assert_eq!(history.depth(), 1);
    }

    #[test]
    fn stack_is_bounded_by_limit() {
        let mut history = UndoHistory::new(3);
        for score in [501, 441, 381, 321] {
            history.push(snapshot(score));
        }
        assert_eq!(history.depth(), 3);
        assert_eq!(history.undo().unwrap().players[0].score, 321);
        assert_eq!(history.undo().unwrap().players[0].score, 381);
        assert_eq!(history.undo().unwrap().players[0].score, 441);
    }
}
