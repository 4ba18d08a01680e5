//! Track-laying bot for a RAILROAD INK style grid.
//!
//! A greedy best-first search lays catalog tracks left to right, starting at
//! the left edge and stopping as soon as some path reaches the goal column.
//!
//! API Policy
//! - The crate is consumed by `trackbot-cli` and its own benches. There is no
//!   stable public API; prefer better design over compatibility.

pub mod batch;
pub mod catalog;
pub mod geometry;
pub mod search;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use catalog::{Catalog, Track, TrackId};
pub use geometry::Direction;
pub use search::{SearchCfg, SearchError, Solution, TrackBot};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::batch::{run_batch, BatchReport, RunReport};
    pub use crate::catalog::{Catalog, Track, TrackId};
    pub use crate::geometry::Direction;
    pub use crate::search::{
        ConfigError, PathStats, PathStep, ReusePolicy, SearchCfg, SearchError, Solution,
        StartRows, TrackBot, Waypoint,
    };
}
