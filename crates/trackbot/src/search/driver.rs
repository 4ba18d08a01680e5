//! Best-first driver: pop the best state, expand it, push its children.
//!
//! State machine
//! - Init: one root per configured start row.
//! - Explore: pop; a state at or past the goal column ends the search
//!   (provided it crossed every waypoint), otherwise its children are scored
//!   and pushed.
//! - Done: back-trace the winning state into a root-to-goal path.
//!
//! The loop is bounded by `SearchCfg::max_iterations`; running out of states
//! or budget is reported as a `SearchError`, never a panic.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::{Catalog, Track};

use super::expand::expand;
use super::frontier::Frontier;
use super::state::{State, StateArena, StateId, StateKey};
use super::types::{ConfigError, PathStats, PathStep, SearchCfg, SearchError, Solution};

/// A validated configuration plus the usable track set it selects.
#[derive(Clone, Debug)]
pub struct TrackBot {
    cfg: SearchCfg,
    tracks: Vec<Track>,
}

impl TrackBot {
    /// Build against the standard catalog.
    pub fn new(cfg: SearchCfg) -> Result<Self, ConfigError> {
        Self::with_catalog(cfg, &Catalog::standard())
    }

    pub fn with_catalog(cfg: SearchCfg, catalog: &Catalog) -> Result<Self, ConfigError> {
        cfg.validate(catalog)?;
        let tracks = catalog.usable_set(&cfg.allowed_ids);
        tracing::debug!(
            allowed = ?cfg.allowed_ids,
            usable = tracks.len(),
            "usable track set built"
        );
        Ok(Self { cfg, tracks })
    }

    pub fn cfg(&self) -> &SearchCfg {
        &self.cfg
    }

    /// Usable set: each allowed template and its rotations.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Search with tie-breaks drawn from `StdRng::seed_from_u64(seed)`.
    pub fn search(&self, seed: u64) -> Result<Solution, SearchError> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.search_with_rng(&mut rng)
    }

    /// Search with an injected tie-break source.
    pub fn search_with_rng<R: Rng>(&self, rng: &mut R) -> Result<Solution, SearchError> {
        Runner::new(self, rng).solve()
    }
}

/// Per-run mutable context.
struct Runner<'a, R: Rng> {
    bot: &'a TrackBot,
    rng: &'a mut R,
    arena: StateArena,
    frontier: Frontier,
    seen: HashSet<StateKey>,
    iterations: u64,
    best_column: i32,
}

impl<'a, R: Rng> Runner<'a, R> {
    fn new(bot: &'a TrackBot, rng: &'a mut R) -> Self {
        Self {
            bot,
            rng,
            arena: StateArena::new(),
            frontier: Frontier::new(),
            seen: HashSet::new(),
            iterations: 0,
            best_column: -1,
        }
    }

    fn solve(&mut self) -> Result<Solution, SearchError> {
        let bot = self.bot;
        let cfg = &bot.cfg;
        let n_waypoints = cfg.waypoints().len();
        for row in cfg.root_rows() {
            let root = State::root(row, n_waypoints);
            let score = root.score;
            let id = self.arena.push(root);
            self.frontier.push(id, score, &mut *self.rng);
        }

        loop {
            let Some(id) = self.frontier.pop() else {
                tracing::debug!(iterations = self.iterations, "frontier exhausted");
                return Err(SearchError::Unreachable {
                    iterations: self.iterations,
                });
            };
            let state = self.arena.get(id);
            self.best_column = self.best_column.max(state.x);
            if state.x >= cfg.goal_column {
                if state.passed.iter().all(|&p| p) {
                    return Ok(self.finish(id));
                }
                // goal column reached with a missed waypoint: dropped
                continue;
            }
            if let Some(max) = cfg.max_iterations {
                if self.iterations >= max {
                    tracing::warn!(
                        iterations = self.iterations,
                        best_column = self.best_column,
                        "search budget exhausted"
                    );
                    return Err(SearchError::BudgetExhausted {
                        iterations: self.iterations,
                        best_column: self.best_column,
                    });
                }
            }
            self.iterations += 1;
            self.step(id);
        }
    }

    fn step(&mut self, id: StateId) {
        let bot = self.bot;
        let cfg = &bot.cfg;
        let state = self.arena.get(id);
        let children: Vec<State> = expand(id, state, &bot.tracks, cfg).collect();
        let traced = cfg.trace_iteration == Some(self.iterations);
        if traced {
            tracing::debug!(iteration = self.iterations, state = %state, "expanding");
        }
        for child in children {
            if traced {
                if let Some(track) = child.track.map(|i| &bot.tracks[i]) {
                    tracing::debug!(track = track.id, child = %child, "child");
                }
            }
            if cfg.dedup_states && !self.seen.insert(child.key()) {
                continue;
            }
            let score = child.score;
            let child_id = self.arena.push(child);
            self.frontier.push(child_id, score, &mut *self.rng);
        }
    }

    fn finish(&self, id: StateId) -> Solution {
        let arena = &self.arena;
        let tracks = &self.bot.tracks;
        let path: Vec<PathStep> = arena
            .back_trace(id)
            .into_iter()
            .map(|sid| {
                let s = arena.get(sid);
                let track = s.track.map(|i| &tracks[i]);
                let cells = match (track, s.parent) {
                    (Some(t), Some(p)) => {
                        let origin = arena.get(p);
                        t.cells()
                            .iter()
                            .map(|&(dx, dy)| (origin.x + dx, origin.y + dy))
                            .collect()
                    }
                    // root
                    _ => Vec::new(),
                };
                PathStep {
                    x: s.x,
                    y: s.y,
                    facing: s.facing,
                    track_id: track.map(|t| t.id),
                    cells,
                }
            })
            .collect();
        let last = arena.get(id);
        let stats = PathStats {
            pieces: last.pieces,
            cells: last.cells,
            score: last.score,
        };
        tracing::info!(
            pieces = stats.pieces,
            cells = stats.cells,
            score = stats.score,
            iterations = self.iterations,
            "goal reached"
        );
        Solution {
            path,
            stats,
            iterations: self.iterations,
            states: arena.len(),
        }
    }
}
