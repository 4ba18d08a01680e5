//! JSON shapes written by the CLI.

use serde::Serialize;
use trackbot::batch::{BatchReport, RunReport};
use trackbot::search::{PathStep, Solution};

#[derive(Debug, Serialize)]
pub struct StepRecord {
    pub x: i32,
    pub y: i32,
    pub facing: String,
    /// `null` for the starting point.
    pub track_id: Option<u8>,
    pub cells: Vec<(i32, i32)>,
}

impl From<&PathStep> for StepRecord {
    fn from(step: &PathStep) -> Self {
        Self {
            x: step.x,
            y: step.y,
            facing: step.facing.name().to_string(),
            track_id: step.track_id,
            cells: step.cells.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RunRecord {
    pub seed: u64,
    pub pieces: u32,
    pub cells: u32,
    pub score: f64,
    pub iterations: u64,
    pub states: usize,
    pub path: Vec<StepRecord>,
}

impl RunRecord {
    pub fn new(seed: u64, sol: &Solution) -> Self {
        Self {
            seed,
            pieces: sol.stats.pieces,
            cells: sol.stats.cells,
            score: sol.stats.score,
            iterations: sol.iterations,
            states: sol.states,
            path: sol.path.iter().map(StepRecord::from).collect(),
        }
    }
}

/// One line of the batch ranking; failed runs carry `error` instead of stats.
#[derive(Debug, Serialize)]
pub struct RankRecord {
    pub seed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pieces: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&RunReport> for RankRecord {
    fn from(run: &RunReport) -> Self {
        match &run.outcome {
            Ok(sol) => Self {
                seed: run.seed,
                score: Some(sol.stats.score),
                pieces: Some(sol.stats.pieces),
                error: None,
            },
            Err(err) => Self {
                seed: run.seed,
                score: None,
                pieces: None,
                error: Some(err.to_string()),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchRecord {
    pub master_seed: u64,
    pub runs: usize,
    pub successes: usize,
    pub best: Option<RunRecord>,
    pub ranking: Vec<RankRecord>,
}

impl From<&BatchReport> for BatchRecord {
    fn from(report: &BatchReport) -> Self {
        let best = report.best().and_then(|run| {
            run.outcome
                .as_ref()
                .ok()
                .map(|sol| RunRecord::new(run.seed, sol))
        });
        Self {
            master_seed: report.master_seed,
            runs: report.runs.len(),
            successes: report.successes(),
            best,
            ranking: report.ranked().into_iter().map(RankRecord::from).collect(),
        }
    }
}
