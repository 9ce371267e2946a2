use core::fmt;
use serde::{Deserialize, Serialize};

pub const BULL: u8 = 25;

/// A single recorded dart. `multiplier == 0` is an explicit miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dart {
    pub base: u8,
    pub multiplier: u8,
}

impl Dart {
    pub const MISS: Dart = Dart {
        base: 0,
        multiplier: 0,
    };
    pub const SINGLE_BULL: Dart = Dart::new(BULL, 1);
    pub const DOUBLE_BULL: Dart = Dart::new(BULL, 2);

    pub const fn new(base: u8, multiplier: u8) -> Self {
        Self { base, multiplier }
    }

    pub const fn single(base: u8) -> Self {
        Self::new(base, 1)
    }

    pub const fn double(base: u8) -> Self {
        Self::new(base, 2)
    }

    pub const fn triple(base: u8) -> Self {
        Self::new(base, 3)
    }

    pub const fn score(self) -> u32 {
        self.base as u32 * self.multiplier as u32
    }

    pub const fn is_miss(self) -> bool {
        self.multiplier == 0
    }

    pub const fn is_bull(self) -> bool {
        self.base == BULL && self.multiplier > 0
    }

    pub const fn is_double_bull(self) -> bool {
        self.base == BULL && self.multiplier == 2
    }

    pub const fn is_outer_double(self) -> bool {
        self.multiplier == 2 && self.base >= 1 && self.base <= 20
    }

    /// Outer double or double bull.
    pub const fn is_double(self) -> bool {
        self.multiplier == 2
    }

    pub const fn is_triple(self) -> bool {
        self.multiplier == 3
    }

    pub fn label(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Dart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.multiplier {
            1 => "S",
            2 => "D",
            3 => "T",
            _ => return f.write_str("MISS"),
        };
        write!(f, "{prefix}{}", self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::Dart;

    #[test]
    fn labels_follow_ring_prefixes() {
        assert_eq!(Dart::triple(20).label(), "T20");
        assert_eq!(Dart::SINGLE_BULL.label(), "S25");
        assert_eq!(Dart::DOUBLE_BULL.label(), "D25");
        assert_eq!(Dart::MISS.label(), "MISS");
    }

    #[test]
    fn score_is_base_times_multiplier() {
        assert_eq!(Dart::triple(19).score(), 57);
        assert_eq!(Dart::DOUBLE_BULL.score(), 50);
        assert_eq!(Dart::MISS.score(), 0);
    }

    #[test]
    fn double_bull_is_a_double_but_not_an_outer_double() {
        assert!(Dart::DOUBLE_BULL.is_double());
        assert!(!Dart::DOUBLE_BULL.is_outer_double());
        assert!(Dart::double(16).is_outer_double());
        assert!(!Dart::SINGLE_BULL.is_double());
        assert!(Dart::SINGLE_BULL.is_bull());
    }
}
