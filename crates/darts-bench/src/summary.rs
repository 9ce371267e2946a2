use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use darts_core::model::player::PlayerId;
use serde::Serialize;
use statrs::statistics::Statistics;
use thiserror::Error;

use crate::runner::MatchRecord;

const CONFIDENCE_Z: f64 = 1.96; // 95% CI

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Accumulates per-match records into run-level statistics.
#[derive(Debug, Default)]
pub struct SummaryCollector {
    matches: usize,
    unfinished: usize,
    wins: [usize; 2],
    ppr: [Vec<f64>; 2],
    darts_to_win: [Vec<f64>; 2],
    achievements: BTreeMap<String, [usize; 2]>,
}

impl SummaryCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: &MatchRecord) {
        self.matches += 1;
        match record.winner {
            Some(winner) => {
                self.wins[winner.index()] += 1;
                self.darts_to_win[winner.index()].push(f64::from(record.darts[winner.index()]));
            }
            None => self.unfinished += 1,
        }
        for id in PlayerId::BOTH {
            if record.darts[id.index()] > 0 {
                self.ppr[id.index()].push(record.ppr[id.index()]);
            }
        }
        for (name, counts) in &record.achievements {
            let entry = self.achievements.entry(name.clone()).or_insert([0, 0]);
            entry[0] += counts[0];
            entry[1] += counts[1];
        }
    }

    pub fn finalize(self, run_id: &str) -> BenchSummary {
        let players = PlayerId::BOTH.map(|id| {
            let idx = id.index();
            let ppr = &self.ppr[idx];
            PlayerReport {
                player: id,
                wins: self.wins[idx],
                win_rate: rate(self.wins[idx], self.matches),
                avg_ppr: finite_or_zero(ppr.iter().mean()),
                ppr_std_dev: if ppr.len() > 1 {
                    finite_or_zero(ppr.iter().std_dev())
                } else {
                    0.0
                },
                ppr_ci95: confidence_interval(ppr),
                avg_darts_to_win: if self.darts_to_win[idx].is_empty() {
                    None
                } else {
                    Some(self.darts_to_win[idx].iter().mean())
                },
            }
        });

        BenchSummary {
            run_id: run_id.to_string(),
            matches: self.matches,
            unfinished: self.unfinished,
            players,
            achievements: self.achievements,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerReport {
    pub player: PlayerId,
    pub wins: usize,
    pub win_rate: f64,
    pub avg_ppr: f64,
    pub ppr_std_dev: f64,
    pub ppr_ci95: (f64, f64),
    pub avg_darts_to_win: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchSummary {
    pub run_id: String,
    pub matches: usize,
    pub unfinished: usize,
    pub players: [PlayerReport; 2],
    pub achievements: BTreeMap<String, [usize; 2]>,
}

impl BenchSummary {
    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), SummaryError> {
        let mut rows = String::new();
        rows.push_str(&format!("# Match Summary: {}\n\n", self.run_id));
        rows.push_str(&format!(
            "Matches: {} ({} unfinished)\n\n",
            self.matches, self.unfinished
        ));
        rows.push_str("| Player | Wins | Win % | Avg PPR | Std dev | 95% CI | Darts per win |\n");
        rows.push_str("|--------|------|-------|---------|---------|--------|---------------|\n");

        for report in &self.players {
            let darts = report
                .avg_darts_to_win
                .map(|d| format!("{d:.1}"))
                .unwrap_or_else(|| "-".to_string());
            rows.push_str(&format!(
                "| {player} | {wins} | {win:.1}% | {avg:.2} | {std:.2} | [{low:.2}, {high:.2}] | {darts} |\n",
                player = report.player,
                wins = report.wins,
                win = report.win_rate * 100.0,
                avg = report.avg_ppr,
                std = report.ppr_std_dev,
                low = report.ppr_ci95.0,
                high = report.ppr_ci95.1,
            ));
        }

        if !self.achievements.is_empty() {
            rows.push_str("\n| Achievement | Home | Away |\n");
            rows.push_str("|-------------|------|------|\n");
            for (name, counts) in &self.achievements {
                rows.push_str(&format!("| {name} | {} | {} |\n", counts[0], counts[1]));
            }
        }

        fs::write(path.as_ref(), rows).map_err(|e| SummaryError::Io {
            context: "writing summary markdown",
            source: e,
        })?;
        Ok(())
    }
}

fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn confidence_interval(points: &[f64]) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let mean = points.iter().mean();
    if points.len() == 1 {
        return (mean, mean);
    }
    let std_error = points.iter().std_dev() / (points.len() as f64).sqrt();
    let margin = CONFIDENCE_Z * std_error;
    (mean - margin, mean + margin)
}
