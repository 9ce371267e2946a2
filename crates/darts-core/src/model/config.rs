use crate::model::dart::Dart;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

pub const DEFAULT_UNDO_LIMIT: u8 = 3;

/// In/out rule applied to the first scoring dart and the finishing dart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckMode {
    Open,
    Master,
    Double,
}

impl CheckMode {
    pub const ALL: [CheckMode; 3] = [CheckMode::Open, CheckMode::Master, CheckMode::Double];

    pub const fn accepts(self, dart: Dart) -> bool {
        match self {
            CheckMode::Open => dart.score() > 0,
            CheckMode::Master => dart.is_double() || dart.is_triple() || dart.is_bull(),
            CheckMode::Double => dart.is_outer_double() || dart.is_double_bull(),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            CheckMode::Open => "open",
            CheckMode::Master => "master",
            CheckMode::Double => "double",
        }
    }
}

impl fmt::Display for CheckMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckMode {
    type Err = ConfigIssue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" | "straight" => Ok(CheckMode::Open),
            "master" => Ok(CheckMode::Master),
            "double" => Ok(CheckMode::Double),
            other => Err(ConfigIssue::UnknownCheckMode(other.to_string())),
        }
    }
}

/// Which ruleset the achievement classifier reasons about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameVariant {
    #[default]
    X01,
    Cricket,
}

/// Match configuration, fixed for the life of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub start_score: u32,
    pub in_mode: CheckMode,
    pub out_mode: CheckMode,
    #[serde(default)]
    pub split_bull: bool,
    #[serde(default = "default_undo_limit")]
    pub undo_limit: u8,
    #[serde(default)]
    pub variant: GameVariant,
}

impl GameConfig {
    pub const fn new(start_score: u32, in_mode: CheckMode, out_mode: CheckMode) -> Self {
        Self {
            start_score,
            in_mode,
            out_mode,
            split_bull: false,
            undo_limit: DEFAULT_UNDO_LIMIT,
            variant: GameVariant::X01,
        }
    }

    pub const fn with_split_bull(mut self, split_bull: bool) -> Self {
        self.split_bull = split_bull;
        self
    }

    pub const fn with_undo_limit(mut self, undo_limit: u8) -> Self {
        self.undo_limit = undo_limit;
        self
    }

    /// Remaining score at which both players' PPR is frozen.
    pub const fn freeze_threshold(&self) -> u32 {
        if self.start_score >= 501 { 100 } else { 50 }
    }

    pub fn validate(&self) -> Result<(), ConfigIssue> {
        if self.start_score < 2 {
            return Err(ConfigIssue::StartScoreTooLow(self.start_score));
        }
        if self.variant != GameVariant::X01 {
            return Err(ConfigIssue::UnsupportedVariant(self.variant));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(501, CheckMode::Open, CheckMode::Double)
    }
}

fn default_undo_limit() -> u8 {
    DEFAULT_UNDO_LIMIT
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    StartScoreTooLow(u32),
    UnknownCheckMode(String),
    UnsupportedVariant(GameVariant),
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigIssue::StartScoreTooLow(score) => {
                write!(f, "start score {score} leaves no legal finish")
            }
            ConfigIssue::UnknownCheckMode(mode) => write!(f, "unknown in/out mode '{mode}'"),
            ConfigIssue::UnsupportedVariant(variant) => {
                write!(f, "{variant:?} matches are not scored by the 01 engine")
            }
        }
    }
}

impl std::error::Error for ConfigIssue {}
