use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use darts_core::game::match_state::{Input, MatchState, Notice, Phase};
use darts_core::model::player::PlayerId;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{BenchConfig, ResolvedOutputs, SimulationConfig};
use crate::summary::{SummaryCollector, SummaryError};
use crate::thrower::Thrower;

/// Drives the engine through a scripted input list or a batch of simulated
/// matches, streaming JSONL rows to disk.
pub struct BenchRunner {
    config: BenchConfig,
    outputs: ResolvedOutputs,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub matches_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
}

/// One engine notice emitted while replaying a script.
#[derive(Debug, Serialize)]
struct NoticeRow<'a> {
    run_id: &'a str,
    match_index: usize,
    step: usize,
    #[serde(flatten)]
    notice: &'a Notice,
}

/// Outcome of one simulated match.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchRecord {
    pub run_id: String,
    pub match_index: usize,
    pub match_seed: u64,
    pub starting_player: PlayerId,
    pub winner: Option<PlayerId>,
    pub rounds: u32,
    pub darts: [u32; 2],
    pub final_scores: [u32; 2],
    pub ppr: [f64; 2],
    pub achievements: BTreeMap<String, [usize; 2]>,
}

impl BenchRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        if config.script.is_none() && config.simulation.is_none() {
            return Err(RunnerError::NothingToRun);
        }
        Ok(Self { config, outputs })
    }

    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut summary = SummaryCollector::new();

        let (matches_played, rows_written) = match (&self.config.script, &self.config.simulation)
        {
            (Some(script), _) => self.replay(script, &mut writer, &mut summary)?,
            (None, Some(simulation)) => self.simulate(simulation, &mut writer, &mut summary)?,
            (None, None) => return Err(RunnerError::NothingToRun),
        };

        writer.flush()?;
        summary
            .finalize(&self.config.run_id)
            .write_markdown(&self.outputs.summary_md)?;

        Ok(RunSummary {
            matches_played,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
        })
    }

    fn replay(
        &self,
        script: &[Input],
        writer: &mut BufWriter<File>,
        summary: &mut SummaryCollector,
    ) -> Result<(usize, usize), RunnerError> {
        let mut state = MatchState::new(self.config.game, self.config.starting_player);
        let mut tally = AchievementTally::default();
        let mut match_index = 0usize;
        let mut rows_written = 0usize;

        for (step, input) in script.iter().enumerate() {
            if *input == Input::Rematch {
                summary.record(&self.record_for(&state, match_index, 0, &tally));
                tally = AchievementTally::default();
                match_index += 1;
            }

            let notices = state.handle(*input);
            tally.observe(&notices);
            for notice in &notices {
                let row = NoticeRow {
                    run_id: &self.config.run_id,
                    match_index,
                    step,
                    notice,
                };
                serde_json::to_writer(&mut *writer, &row)?;
                writer.write_all(b"\n")?;
                rows_written += 1;
            }
        }

        summary.record(&self.record_for(&state, match_index, 0, &tally));
        event!(
            Level::INFO,
            run_id = %self.config.run_id,
            steps = script.len(),
            rows_written,
            phase = state.phase().name(),
            "script replayed"
        );
        Ok((match_index + 1, rows_written))
    }

    fn simulate(
        &self,
        simulation: &SimulationConfig,
        writer: &mut BufWriter<File>,
        summary: &mut SummaryCollector,
    ) -> Result<(usize, usize), RunnerError> {
        let mut rng = StdRng::seed_from_u64(simulation.seed.unwrap_or(0));
        let throwers = [
            Thrower::from(simulation.throwers.home),
            Thrower::from(simulation.throwers.away),
        ];

        for match_index in 0..simulation.matches {
            let match_seed = rng.next_u64();
            let starting = if simulation.alternate_start && match_index % 2 == 1 {
                self.config.starting_player.other()
            } else {
                self.config.starting_player
            };
            let record =
                self.play_match(match_index, match_seed, starting, &throwers, simulation)?;

            event!(
                Level::INFO,
                run_id = %self.config.run_id,
                match_index = match_index as u32,
                winner = ?record.winner,
                rounds = record.rounds,
                "match finished"
            );

            summary.record(&record);
            serde_json::to_writer(&mut *writer, &record)?;
            writer.write_all(b"\n")?;
        }

        Ok((simulation.matches, simulation.matches))
    }

    fn play_match(
        &self,
        match_index: usize,
        match_seed: u64,
        starting: PlayerId,
        throwers: &[Thrower; 2],
        simulation: &SimulationConfig,
    ) -> Result<MatchRecord, RunnerError> {
        let mut rng = StdRng::seed_from_u64(match_seed);
        let mut state = MatchState::new(self.config.game, starting);
        let mut tally = AchievementTally::default();
        let mut clock = 0u64;

        tally.observe(&state.handle(Input::Begin));
        loop {
            let notices = match state.phase() {
                Phase::AwaitingThrow => {
                    if state.round() > simulation.max_rounds {
                        break;
                    }
                    let thrower = &throwers[state.active_player().index()];
                    let target = thrower.choose_target(&state);
                    clock += 1;
                    let raw = thrower.throw_at(target, &mut rng, clock);
                    state.throw(raw).map_err(|refusal| {
                        RunnerError::game(format!("throw {clock} refused: {refusal}"))
                    })?
                }
                Phase::TurnResolving { .. } => state
                    .advance()
                    .map_err(|refusal| RunnerError::game(refusal.to_string()))?,
                Phase::GameOver { .. } => break,
                Phase::Intro => {
                    return Err(RunnerError::game("match fell back to intro".to_string()));
                }
            };
            tally.observe(&notices);
        }

        Ok(self.record_for(&state, match_index, match_seed, &tally))
    }

    fn record_for(
        &self,
        state: &MatchState,
        match_index: usize,
        match_seed: u64,
        tally: &AchievementTally,
    ) -> MatchRecord {
        let players = state.players();
        MatchRecord {
            run_id: self.config.run_id.clone(),
            match_index,
            match_seed,
            starting_player: state.starting_player(),
            winner: state.winner(),
            rounds: state.round(),
            darts: [players[0].darts_thrown, players[1].darts_thrown],
            final_scores: state.scores(),
            ppr: [state.ppr(PlayerId::Home), state.ppr(PlayerId::Away)],
            achievements: tally.counts.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct AchievementTally {
    counts: BTreeMap<String, [usize; 2]>,
}

impl AchievementTally {
    fn observe(&mut self, notices: &[Notice]) {
        for notice in notices {
            if let Notice::AchievementDetected {
                player,
                achievement,
            } = notice
            {
                self.counts
                    .entry(achievement.as_str().to_string())
                    .or_insert([0, 0])[player.index()] += 1;
            }
        }
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("game execution failed: {message}")]
    Game { message: String },
    #[error("configuration has neither a script nor a simulation block")]
    NothingToRun,
    #[error("summary error: {0}")]
    Summary(#[from] SummaryError),
}

impl RunnerError {
    fn game(message: String) -> Self {
        RunnerError::Game { message }
    }
}
