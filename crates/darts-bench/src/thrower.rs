use darts_core::game::match_state::MatchState;
use darts_core::model::config::CheckMode;
use darts_core::model::dart::{BULL, Dart};
use darts_core::model::hit::RawHit;
use rand::Rng;

use crate::config::ThrowerConfig;

/// Clockwise order of the numbers around the board, starting at the top.
pub const BOARD_ORDER: [u8; 20] = [
    20, 1, 18, 4, 13, 6, 10, 15, 2, 17, 3, 19, 7, 16, 8, 11, 14, 9, 12, 5,
];

/// Preferred leaves when setting up a finish with a single.
const SETUP_LEAVES: [u32; 6] = [40, 32, 36, 16, 8, 2];

/// Simulated player: picks a target from the match state and throws at it
/// with a fixed chance of hitting the intended segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thrower {
    accuracy: f64,
}

impl Thrower {
    pub fn new(accuracy: f64) -> Self {
        Self {
            accuracy: accuracy.clamp(0.0, 1.0),
        }
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    pub fn choose_target(&self, state: &MatchState) -> Dart {
        if let Some(first) = state.checkout_hint().and_then(|hint| hint.first()) {
            return first;
        }

        let player = state.player(state.active_player());
        if !player.has_started {
            return match state.config().in_mode {
                CheckMode::Double => Dart::double(20),
                CheckMode::Master | CheckMode::Open => Dart::triple(20),
            };
        }

        setup_target(player.score, state.config().out_mode)
    }

    /// Throws at `target`; a miss of the intended segment scatters to a
    /// neighbouring number, the single ring, or off the board.
    pub fn throw_at<R: Rng>(&self, target: Dart, rng: &mut R, timestamp: u64) -> RawHit {
        if rng.gen_bool(self.accuracy) {
            return RawHit::aimed(target, timestamp);
        }

        let landed = match rng.gen_range(0..10) {
            0 => Dart::MISS,
            1..=4 => {
                if target.is_bull() {
                    Dart::single(BOARD_ORDER[rng.gen_range(0..BOARD_ORDER.len())])
                } else {
                    Dart::new(neighbour(target.base, rng.gen_bool(0.5)), target.multiplier)
                }
            }
            _ => {
                if target.is_double_bull() {
                    Dart::SINGLE_BULL
                } else if target.is_bull() {
                    Dart::single(BOARD_ORDER[rng.gen_range(0..BOARD_ORDER.len())])
                } else if target.multiplier == 1 {
                    Dart::single(neighbour(target.base, rng.gen_bool(0.5)))
                } else {
                    Dart::single(target.base)
                }
            }
        };
        RawHit::aimed(landed, timestamp)
    }
}

impl From<ThrowerConfig> for Thrower {
    fn from(config: ThrowerConfig) -> Self {
        Thrower::new(config.accuracy)
    }
}

fn setup_target(score: u32, out_mode: CheckMode) -> Dart {
    if score > 60 + 40 || (score > 60 && out_mode == CheckMode::Open) {
        return Dart::triple(20);
    }
    SETUP_LEAVES
        .iter()
        .filter_map(|leave| score.checked_sub(*leave))
        .find(|single| (1..=20).contains(single))
        .map(|single| Dart::single(single as u8))
        .unwrap_or_else(|| {
            if score > 60 {
                Dart::triple(20)
            } else {
                Dart::single(1)
            }
        })
}

/// Number next to `base` on the board, clockwise or counter-clockwise.
pub fn neighbour(base: u8, clockwise: bool) -> u8 {
    let Some(pos) = BOARD_ORDER.iter().position(|n| *n == base) else {
        return base;
    };
    let len = BOARD_ORDER.len();
    let next = if clockwise {
        (pos + 1) % len
    } else {
        (pos + len - 1) % len
    };
    BOARD_ORDER[next]
}
