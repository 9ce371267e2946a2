use darts_core::game::match_state::Input;
use darts_core::model::config::GameConfig;
use darts_core::model::player::PlayerId;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_MAX_ROUNDS: u32 = 80;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root harness configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchConfig {
    pub run_id: String,
    pub game: GameConfig,
    #[serde(default = "default_starting_player")]
    pub starting_player: PlayerId,
    #[serde(default)]
    pub script: Option<Vec<Input>>,
    #[serde(default)]
    pub simulation: Option<SimulationConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: BenchConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.game
            .validate()
            .map_err(|issue| ValidationError::InvalidField {
                field: "game".to_string(),
                message: issue.to_string(),
            })?;

        match (&self.script, &self.simulation) {
            (Some(_), Some(_)) | (None, None) => {
                return Err(ValidationError::InvalidField {
                    field: "script/simulation".to_string(),
                    message: "exactly one of script or simulation must be given".to_string(),
                });
            }
            (Some(script), None) if script.is_empty() => {
                return Err(ValidationError::InvalidField {
                    field: "script".to_string(),
                    message: "script must contain at least one input".to_string(),
                });
            }
            (None, Some(simulation)) => simulation.validate()?,
            (Some(_), None) => {}
        }

        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        Ok(())
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
        }
    }
}

fn default_starting_player() -> PlayerId {
    PlayerId::Home
}

/// Seeded match simulation block.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SimulationConfig {
    pub seed: Option<u64>,
    pub matches: usize,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
    /// Swap the starting player on every other match.
    #[serde(default)]
    pub alternate_start: bool,
    pub throwers: ThrowersConfig,
}

impl SimulationConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.matches == 0 {
            return Err(ValidationError::InvalidField {
                field: "simulation.matches".to_string(),
                message: "number of matches must be greater than zero".to_string(),
            });
        }

        if self.max_rounds == 0 {
            return Err(ValidationError::InvalidField {
                field: "simulation.max_rounds".to_string(),
                message: "max_rounds must be at least 1".to_string(),
            });
        }

        for (label, thrower) in [
            ("simulation.throwers.home", &self.throwers.home),
            ("simulation.throwers.away", &self.throwers.away),
        ] {
            if !(0.0..=1.0).contains(&thrower.accuracy) {
                return Err(ValidationError::InvalidField {
                    field: format!("{label}.accuracy"),
                    message: format!("accuracy {} must lie in [0, 1]", thrower.accuracy),
                });
            }
        }
        Ok(())
    }
}

fn default_max_rounds() -> u32 {
    DEFAULT_MAX_ROUNDS
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ThrowersConfig {
    pub home: ThrowerConfig,
    pub away: ThrowerConfig,
}

/// Probability that a dart lands in the segment it was aimed at.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct ThrowerConfig {
    pub accuracy: f64,
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use darts_core::model::config::CheckMode;
    use darts_core::model::hit::SegmentKind;

    const SIM_YAML: &str = r#"
run_id: "sim_smoke"
game:
  start_score: 501
  in_mode: open
  out_mode: double
simulation:
  seed: 123
  matches: 16
  throwers:
    home:
      accuracy: 0.7
    away:
      accuracy: 0.5
outputs:
  jsonl: "bench/out/{run_id}/matches.jsonl"
  summary_md: "bench/out/{run_id}/summary.md"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    const SCRIPT_YAML: &str = r#"
run_id: "script"
game:
  start_score: 301
  in_mode: double
  out_mode: master
  split_bull: true
starting_player: away
script:
  - input: begin
  - input: throw
    kind: double
    base: 20
    multiplier: 2
    timestamp: 1
  - input: throw
    kind: button
    timestamp: 2
  - input: advance
  - input: undo
outputs:
  jsonl: "out/{run_id}.jsonl"
  summary_md: "out/{run_id}.md"
"#;

    #[test]
    fn loads_and_validates_simulation_config() {
        let mut cfg: BenchConfig = serde_yaml::from_str(SIM_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        let sim = cfg.simulation.as_ref().expect("simulation block");
        assert_eq!(sim.max_rounds, DEFAULT_MAX_ROUNDS);
        assert!(!sim.alternate_start);
        assert_eq!(cfg.starting_player, PlayerId::Home);
        assert_eq!(cfg.game.out_mode, CheckMode::Double);
        assert_eq!(cfg.game.undo_limit, 3);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.jsonl,
            PathBuf::from("bench/out/sim_smoke/matches.jsonl")
        );
    }

    #[test]
    fn loads_scripted_inputs() {
        let mut cfg: BenchConfig = serde_yaml::from_str(SCRIPT_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        let script = cfg.script.as_ref().expect("script");
        assert_eq!(script.len(), 5);
        assert_eq!(script[0], Input::Begin);
        assert!(matches!(
            script[2],
            Input::Throw(raw) if raw.kind == SegmentKind::Button && raw.timestamp == 2
        ));
        assert_eq!(cfg.starting_player, PlayerId::Away);
        assert!(cfg.game.split_bull);
        assert!(!cfg.logging.enable_structured);
    }

    #[test]
    fn rejects_both_modes() {
        let yaml = format!(
            "{SIM_YAML}script:\n  - input: begin\n"
        );
        let mut cfg: BenchConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "script/simulation"
        ));
    }

    #[test]
    fn rejects_out_of_range_accuracy() {
        let yaml = SIM_YAML.replace("accuracy: 0.5", "accuracy: 1.5");
        let mut cfg: BenchConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("accuracy should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "simulation.throwers.away.accuracy"
        ));
    }

    #[test]
    fn rejects_unsupported_game() {
        let yaml = SIM_YAML.replace("start_score: 501", "start_score: 1");
        let mut cfg: BenchConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("start score should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "game"
        ));
    }

    #[test]
    fn rejects_invalid_run_id() {
        let yaml = SIM_YAML.replace("sim_smoke", "sim smoke");
        let mut cfg: BenchConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("invalid run id");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "run_id"
        ));
    }
}
