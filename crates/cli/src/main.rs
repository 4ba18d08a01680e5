mod provenance;
mod record;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;
use trackbot::batch::run_batch;
use trackbot::search::{ReusePolicy, SearchCfg, StartRows, TrackBot, Waypoint};

use crate::provenance::RunInfo;
use crate::record::{BatchRecord, RunRecord};

#[derive(Parser)]
#[command(name = "trackbot")]
#[command(about = "Lay a track across the board with a greedy best-first search")]
struct Cmd {
    /// Log search progress at DEBUG level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Run one search and print the winning path as JSON
    Run {
        #[command(flatten)]
        search: SearchArgs,
        /// Tie-break seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Write the JSON here (plus a provenance sidecar) instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run independent searches in parallel and rank them
    Batch {
        #[command(flatten)]
        search: SearchArgs,
        #[arg(long, default_value_t = 8)]
        runs: usize,
        /// Master seed the per-run seeds are drawn from
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReuseArg {
    /// Keep the last N ids (default 3)
    SlidingWindow,
    /// Keep up to three ids, only the last one after N pieces (default 4)
    SingleRecent,
    /// Collapse to the last id around every Nth piece (default 5)
    Resupply,
}

#[derive(Args, Clone, Debug)]
struct SearchArgs {
    /// Allowed base track ids
    #[arg(required = true)]
    tracks: Vec<u8>,
    #[arg(long, default_value_t = 9)]
    map_height: i32,
    #[arg(long, default_value_t = 40)]
    map_width: i32,
    /// Goal column
    #[arg(long, default_value_t = 36)]
    goal: i32,
    /// Seed one root on every row instead of a single start row
    #[arg(long)]
    random_start: bool,
    #[arg(long, default_value_t = 4)]
    start_row: i32,
    /// Supply rows on columns 8, 17 and 26, crossed in order
    #[arg(long, num_args = 3, value_names = ["R0", "R1", "R2"])]
    supplies: Option<Vec<i32>>,
    /// Reuse policy; defaults to resupply with supplies, sliding-window otherwise
    #[arg(long, value_enum)]
    reuse: Option<ReuseArg>,
    /// Parameter of the reuse policy
    #[arg(long)]
    reuse_n: Option<u32>,
    #[arg(long, default_value_t = 1_000_000)]
    max_iterations: u64,
    /// Search until the goal or frontier exhaustion
    #[arg(long, conflicts_with = "max_iterations")]
    unbounded: bool,
    /// Drop children whose state key was already pushed
    #[arg(long)]
    dedup: bool,
    /// Log the popped state and its children at this iteration
    #[arg(long)]
    print_state: Option<u64>,
}

impl SearchArgs {
    fn to_cfg(&self) -> Result<SearchCfg> {
        let waypoints = match self.supplies.as_deref() {
            None => None,
            Some(&[r0, r1, r2]) => Some(Waypoint::supply_rows([r0, r1, r2])),
            Some(other) => bail!("expected 3 supply rows, got {}", other.len()),
        };
        let reuse_policy = match (self.reuse, self.reuse_n) {
            (None, None) => ReusePolicy::for_waypoints(waypoints.is_some()),
            (None, Some(_)) => bail!("--reuse-n needs --reuse"),
            (Some(ReuseArg::SlidingWindow), n) => ReusePolicy::SlidingWindow {
                len: n.unwrap_or(3) as usize,
            },
            (Some(ReuseArg::SingleRecent), n) => ReusePolicy::SingleRecentAfter {
                pieces: n.unwrap_or(4),
            },
            (Some(ReuseArg::Resupply), n) => ReusePolicy::Resupply {
                period: n.unwrap_or(5),
            },
        };
        Ok(SearchCfg {
            allowed_ids: self.tracks.clone(),
            map_height: self.map_height,
            map_width: self.map_width,
            goal_column: self.goal,
            start_rows: if self.random_start {
                StartRows::All
            } else {
                StartRows::Single(self.start_row)
            },
            waypoints,
            reuse_policy,
            max_iterations: (!self.unbounded).then_some(self.max_iterations),
            dedup_states: self.dedup,
            trace_iteration: self.print_state,
        })
    }

    fn params(&self) -> serde_json::Value {
        serde_json::json!({
            "tracks": self.tracks,
            "map_height": self.map_height,
            "map_width": self.map_width,
            "goal": self.goal,
            "random_start": self.random_start,
            "start_row": self.start_row,
            "supplies": self.supplies,
            "reuse": self.reuse.map(|r| format!("{r:?}")),
            "reuse_n": self.reuse_n,
            "max_iterations": (!self.unbounded).then_some(self.max_iterations),
            "dedup": self.dedup,
        })
    }
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let tracing_requested = match &cmd.action {
        Action::Run { search, .. } | Action::Batch { search, .. } => search.print_state.is_some(),
        Action::Report => false,
    };
    let level = if cmd.verbose || tracing_requested {
        Level::DEBUG
    } else {
        Level::INFO
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Run { search, seed, out } => run(&search, seed, out.as_deref()),
        Action::Batch {
            search,
            runs,
            seed,
            out,
        } => batch(&search, runs, seed, out.as_deref()),
        Action::Report => report(),
    }
}

fn run(search: &SearchArgs, seed: u64, out: Option<&Path>) -> Result<()> {
    let bot = TrackBot::new(search.to_cfg()?).context("building search")?;
    tracing::info!(seed, tracks = ?search.tracks, "run");
    let sol = bot
        .search(seed)
        .with_context(|| format!("search with seed {seed}"))?;
    let mut params = search.params();
    params["seed"] = seed.into();
    let info = RunInfo {
        command: "run",
        params,
    };
    emit(&RunRecord::new(seed, &sol), out, &info)
}

fn batch(search: &SearchArgs, runs: usize, seed: u64, out: Option<&Path>) -> Result<()> {
    if runs == 0 {
        bail!("--runs must be > 0");
    }
    let bot = TrackBot::new(search.to_cfg()?).context("building search")?;
    tracing::info!(runs, master_seed = seed, tracks = ?search.tracks, "batch");
    let report = run_batch(&bot, runs, seed);
    let record = BatchRecord::from(&report);
    let mut params = search.params();
    params["runs"] = runs.into();
    params["master_seed"] = seed.into();
    let info = RunInfo {
        command: "batch",
        params,
    };
    emit(&record, out, &info)?;
    if record.successes == 0 {
        bail!("no run reached the goal column");
    }
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "trackbot_version": trackbot::VERSION,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

/// Pretty JSON to stdout, or to `out` with a provenance sidecar.
fn emit<T: Serialize>(value: &T, out: Option<&Path>, info: &RunInfo) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let Some(out) = out else {
        println!("{json}");
        return Ok(());
    };
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    std::fs::write(out, json).with_context(|| format!("writing {}", out.display()))?;
    let sidecar = provenance::write_sidecar(out, info)?;
    tracing::info!(out = %out.display(), provenance = %sidecar.display(), "wrote");
    Ok(())
}
