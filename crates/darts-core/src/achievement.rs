//! Named turn patterns. Exactly one (or none) is reported per turn, chosen by
//! a fixed precedence list.

use crate::model::config::GameVariant;
use crate::model::dart::{BULL, Dart};
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Achievement {
    Bust,
    Win,
    Ton80,
    ThreeInBlack,
    Shanghai,
    WhiteHorse,
    HatTrick,
    ThreeInBed,
    HighTon,
    LowTon,
}

impl Achievement {
    pub const fn as_str(self) -> &'static str {
        match self {
            Achievement::Bust => "bust",
            Achievement::Win => "win",
            Achievement::Ton80 => "ton80",
            Achievement::ThreeInBlack => "threeInBlack",
            Achievement::Shanghai => "shanghai",
            Achievement::WhiteHorse => "whiteHorse",
            Achievement::HatTrick => "hatTrick",
            Achievement::ThreeInBed => "threeInBed",
            Achievement::HighTon => "highTon",
            Achievement::LowTon => "lowTon",
        }
    }
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the classifier looks at for one finished turn.
#[derive(Debug, Clone, Copy)]
pub struct TurnSummary<'a> {
    pub darts: &'a [Dart],
    pub turn_score: u32,
    pub is_bust: bool,
    pub is_win: bool,
}

impl TurnSummary<'_> {
    /// True when every dart's face value reached the score.
    pub fn fully_scored(&self) -> bool {
        self.darts.iter().map(|d| d.score()).sum::<u32>() == self.turn_score
    }
}

type Rule = (Achievement, fn(&TurnSummary<'_>, GameVariant) -> bool);

// Pattern rules only count darts that scored in full; a double-in miss
// or a withheld dart earns nothing.
const PRECEDENCE: [Rule; 10] = [
    (Achievement::Bust, |t, _| t.is_bust),
    (Achievement::Win, |t, _| t.is_win),
    (Achievement::Ton80, |t, _| {
        t.turn_score == 180 && all_three(t.darts, |d| d == Dart::triple(20))
    }),
    (Achievement::ThreeInBlack, |t, _| {
        t.fully_scored() && all_three(t.darts, Dart::is_double_bull)
    }),
    (Achievement::Shanghai, |t, _| t.fully_scored() && is_shanghai(t.darts)),
    (Achievement::WhiteHorse, |t, variant| {
        variant == GameVariant::Cricket && t.fully_scored() && is_white_horse(t.darts)
    }),
    (Achievement::HatTrick, |t, _| {
        t.fully_scored() && all_three(t.darts, Dart::is_bull)
    }),
    (Achievement::ThreeInBed, |t, variant| {
        t.fully_scored() && is_three_in_bed(t.darts, variant)
    }),
    (Achievement::HighTon, |t, _| t.turn_score >= 150),
    (Achievement::LowTon, |t, _| (100..150).contains(&t.turn_score)),
];

/// Classify a 01 turn.
pub fn classify(darts: &[Dart], turn_score: u32, is_bust: bool, is_win: bool) -> Option<Achievement> {
    classify_for(
        GameVariant::X01,
        &TurnSummary {
            darts,
            turn_score,
            is_bust,
            is_win,
        },
    )
}

pub fn classify_for(variant: GameVariant, turn: &TurnSummary<'_>) -> Option<Achievement> {
    PRECEDENCE
        .iter()
        .find(|(_, matches)| matches(turn, variant))
        .map(|(achievement, _)| *achievement)
}

const fn is_cricket_number(base: u8) -> bool {
    matches!(base, 15..=20 | BULL)
}

fn all_three(darts: &[Dart], pred: impl Fn(Dart) -> bool) -> bool {
    darts.len() == 3 && darts.iter().all(|d| pred(*d))
}

fn is_shanghai(darts: &[Dart]) -> bool {
    let [a, b, c] = darts else {
        return false;
    };
    if a.base != b.base || b.base != c.base || !(1..=20).contains(&a.base) {
        return false;
    }
    let mut rings = [a.multiplier, b.multiplier, c.multiplier];
    rings.sort_unstable();
    rings == [1, 2, 3]
}

fn is_white_horse(darts: &[Dart]) -> bool {
    let [a, b, c] = darts else {
        return false;
    };
    [a, b, c]
        .iter()
        .all(|d| d.is_triple() && is_cricket_number(d.base))
        && a.base != b.base
        && b.base != c.base
        && a.base != c.base
}

fn is_three_in_bed(darts: &[Dart], variant: GameVariant) -> bool {
    let [a, ..] = darts else {
        return false;
    };
    let in_range = match variant {
        GameVariant::X01 => true,
        GameVariant::Cricket => is_cricket_number(a.base),
    };
    in_range && a.is_triple() && all_three(darts, |d| d == *a)
}
