use crate::model::dart::{BULL, Dart};
use serde::{Deserialize, Serialize};

/// Segment tag reported by the board hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    SingleInner,
    SingleOuter,
    Triple,
    Double,
    Bull,
    DoubleBull,
    Miss,
    Button,
    #[serde(other)]
    Unknown,
}

/// Raw board event as delivered by the input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHit {
    pub kind: SegmentKind,
    #[serde(default)]
    pub base: u8,
    #[serde(default)]
    pub multiplier: u8,
    pub timestamp: u64,
}

impl RawHit {
    pub const fn new(kind: SegmentKind, base: u8, multiplier: u8, timestamp: u64) -> Self {
        Self {
            kind,
            base,
            multiplier,
            timestamp,
        }
    }

    pub const fn button(timestamp: u64) -> Self {
        Self::new(SegmentKind::Button, 0, 0, timestamp)
    }

    /// Raw descriptor that classifies back into `dart`.
    pub const fn aimed(dart: Dart, timestamp: u64) -> Self {
        let kind = match (dart.base, dart.multiplier) {
            (_, 0) => SegmentKind::Miss,
            (BULL, 1) => SegmentKind::Bull,
            (BULL, 2) => SegmentKind::DoubleBull,
            (_, 1) => SegmentKind::SingleOuter,
            (_, 2) => SegmentKind::Double,
            (_, 3) => SegmentKind::Triple,
            _ => SegmentKind::Unknown,
        };
        Self::new(kind, dart.base, dart.multiplier, timestamp)
    }
}

/// Classified board event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Dart(Dart),
    /// Hardware end-turn signal; not a dart.
    Button,
}

pub fn classify(raw: &RawHit) -> Hit {
    let ring = |multiplier: u8| {
        if (1..=20).contains(&raw.base) {
            Dart::new(raw.base, multiplier)
        } else {
            Dart::MISS
        }
    };

    let dart = match raw.kind {
        SegmentKind::Button => return Hit::Button,
        SegmentKind::SingleInner | SegmentKind::SingleOuter => ring(1),
        SegmentKind::Double => ring(2),
        SegmentKind::Triple => ring(3),
        SegmentKind::Bull => Dart::SINGLE_BULL,
        SegmentKind::DoubleBull => Dart::DOUBLE_BULL,
        SegmentKind::Miss | SegmentKind::Unknown => Dart::MISS,
    };
    Hit::Dart(dart)
}
