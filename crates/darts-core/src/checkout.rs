//! Finishing-route suggestions. Advisory only: nothing here feeds back into
//! the rules.

use crate::model::config::CheckMode;
use crate::model::dart::Dart;
use core::fmt;
use serde::Serialize;

/// Remaining scores at or above this value never produce a suggestion.
pub const CHECKOUT_LIMIT: u32 = 150;

/// Conventional order in which finishing doubles are preferred.
const DOUBLE_PREFERENCE: [u8; 20] = [
    20, 16, 18, 12, 10, 8, 14, 6, 4, 2, 19, 17, 15, 13, 11, 9, 7, 5, 3, 1,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checkout {
    darts: Vec<Dart>,
    #[serde(skip)]
    split_bull: bool,
}

impl Checkout {
    pub fn darts(&self) -> &[Dart] {
        &self.darts
    }

    pub fn first(&self) -> Option<Dart> {
        self.darts.first().copied()
    }

    pub fn len(&self) -> usize {
        self.darts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.darts.is_empty()
    }
}

impl fmt::Display for Checkout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, dart) in self.darts.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            if dart.is_double_bull() && !self.split_bull {
                f.write_str("BULL")?;
            } else {
                write!(f, "{dart}")?;
            }
        }
        Ok(())
    }
}

/// Shortest finishing sequence for `remaining` within `darts_remaining` darts.
pub fn suggest(
    remaining: u32,
    darts_remaining: usize,
    out_mode: CheckMode,
    split_bull: bool,
) -> Option<Checkout> {
    if remaining < 2 || remaining >= CHECKOUT_LIMIT || darts_remaining == 0 {
        return None;
    }

    let finishers = finishing_darts(out_mode);
    let darts = (1..=darts_remaining.min(3))
        .find_map(|count| route(remaining, count, &finishers, split_bull))?;

    Some(Checkout { darts, split_bull })
}

fn route(remaining: u32, count: usize, finishers: &[Dart], split_bull: bool) -> Option<Vec<Dart>> {
    match count {
        1 => finishers
            .iter()
            .find(|dart| dart.score() == remaining)
            .map(|dart| vec![*dart]),
        2 => finishers.iter().find_map(|last| {
            let need = remaining.checked_sub(last.score())?;
            if last.score() < 2 || need == 0 {
                return None;
            }
            let setup = setup_for(need, split_bull)?;
            Some(vec![setup, *last])
        }),
        3 => {
            let openers = opening_darts(split_bull);
            finishers.iter().find_map(|last| {
                let need = remaining.checked_sub(last.score())?;
                if last.score() < 2 || need < 2 {
                    return None;
                }
                openers.iter().find_map(|first| {
                    let rest = need.checked_sub(first.score())?;
                    if rest == 0 {
                        return None;
                    }
                    let second = setup_for(rest, split_bull)?;
                    Some(vec![*first, second, *last])
                })
            })
        }
        _ => None,
    }
}

fn finishing_darts(out_mode: CheckMode) -> Vec<Dart> {
    let doubles = DOUBLE_PREFERENCE.iter().map(|&n| Dart::double(n));
    let triples = (1..=20).rev().map(Dart::triple);
    let singles = (1..=20).rev().map(Dart::single);
    // Single bull is tried last, whatever the split-bull setting.
    let single_bull = [Dart::SINGLE_BULL];

    let mut darts: Vec<Dart> = match out_mode {
        CheckMode::Double => doubles.chain([Dart::DOUBLE_BULL]).collect(),
        CheckMode::Master => doubles
            .chain([Dart::DOUBLE_BULL])
            .chain(triples)
            .chain(single_bull)
            .collect(),
        CheckMode::Open => singles
            .chain(doubles)
            .chain(triples)
            .chain([Dart::DOUBLE_BULL])
            .chain(single_bull)
            .collect(),
    };
    darts.retain(|dart| out_mode.accepts(*dart));
    darts
}

fn opening_darts(split_bull: bool) -> Vec<Dart> {
    (1..=20)
        .rev()
        .map(Dart::triple)
        .chain([Dart::DOUBLE_BULL])
        .chain(split_bull.then_some(Dart::SINGLE_BULL))
        .chain((1..=20).rev().map(Dart::single))
        .chain((1..=20).rev().map(Dart::double))
        .collect()
}

/// Single target worth exactly `need`, favouring the widest segment.
fn setup_for(need: u32, split_bull: bool) -> Option<Dart> {
    match need {
        1..=20 => Some(Dart::single(need as u8)),
        25 if split_bull => Some(Dart::SINGLE_BULL),
        50 => Some(Dart::DOUBLE_BULL),
        n if n % 3 == 0 && n <= 60 => Some(Dart::triple((n / 3) as u8)),
        n if n % 2 == 0 && n <= 40 => Some(Dart::double((n / 2) as u8)),
        _ => None,
    }
}
