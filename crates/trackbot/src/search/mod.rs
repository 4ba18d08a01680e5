//! Greedy best-first search over track placements.
//!
//! Purpose
//! - Extend a path rightward across a bounded grid, one track at a time,
//!   until some path reaches the goal column.
//! - Honour adjacency (entry side mates with the previous exit), the
//!   recently-used window, and optional ordered waypoints.
//!
//! Why this design
//! - States live in an arena and point at their parent by index; children are
//!   built from a read-only parent, so nothing is deep-copied or shared mutably.
//! - The frontier's tie-break draws come from an injected RNG, which makes a
//!   run reproducible from its seed.
//!
//! Layout: `types.rs` (config, errors, outputs), `state.rs` (states and arena),
//! `expand.rs` (candidate generation), `score.rs` (priority), `frontier.rs`
//! (priority queue), `driver.rs` (the loop).

mod driver;
mod expand;
mod frontier;
mod score;
mod state;
mod types;

pub use driver::TrackBot;
pub use expand::{expand, extend, Expansion};
pub use frontier::{rank, Frontier};
pub use score::{mark_waypoints, score};
pub use state::{State, StateArena, StateId};
pub use types::{
    ConfigError, PathStats, PathStep, ReusePolicy, SearchCfg, SearchError, Solution, StartRows,
    Waypoint, SUPPLY_COLUMNS,
};
