//! Search configuration, outcomes, and error types.
//!
//! Kept separate from the driver so the CLI and tests can build and inspect
//! configurations without touching the search internals.

use std::fmt;

use crate::catalog::{Catalog, TrackId};
use crate::geometry::Direction;

/// Supply columns of the ranked variant of the game.
pub const SUPPLY_COLUMNS: [i32; 3] = [8, 17, 26];

/// A mandatory cell that must be crossed before the path advances beyond `column`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Waypoint {
    pub column: i32,
    pub row: i32,
}

impl Waypoint {
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Pair caller-supplied rows with the fixed supply columns.
    pub fn supply_rows(rows: [i32; 3]) -> Vec<Waypoint> {
        SUPPLY_COLUMNS
            .iter()
            .zip(rows)
            .map(|(&column, row)| Waypoint { column, row })
            .collect()
    }
}

/// Where root states are seeded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartRows {
    /// One root per map row.
    All,
    /// A single root on the given row.
    Single(i32),
}

/// How the recently-used id window is trimmed after each placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReusePolicy {
    /// Keep at most the last `len` ids.
    SlidingWindow { len: usize },
    /// At most three ids; only the most recent one once `pieces` have been played.
    SingleRecentAfter { pieces: u32 },
    /// Supplies refill every `period` pieces: on placements `k * period` and
    /// `k * period + 1` the window collapses to the most recent id.
    Resupply { period: u32 },
}

impl ReusePolicy {
    pub const SLIDING_WINDOW_3: ReusePolicy = ReusePolicy::SlidingWindow { len: 3 };
    pub const RESUPPLY_5: ReusePolicy = ReusePolicy::Resupply { period: 5 };

    /// Canonical policy for each game mode.
    pub fn for_waypoints(has_waypoints: bool) -> Self {
        if has_waypoints {
            Self::RESUPPLY_5
        } else {
            Self::SLIDING_WINDOW_3
        }
    }

    /// Record `id` as just played (the `pieces`-th placement) and trim the window.
    pub fn admit(&self, recent: &mut Vec<TrackId>, id: TrackId, pieces: u32) {
        recent.push(id);
        let keep = match *self {
            ReusePolicy::SlidingWindow { len } => len,
            ReusePolicy::SingleRecentAfter { pieces: after } => {
                if pieces >= after {
                    1
                } else {
                    3
                }
            }
            ReusePolicy::Resupply { period } => {
                if pieces % period <= 1 {
                    1
                } else {
                    recent.len()
                }
            }
        };
        if recent.len() > keep {
            recent.drain(..recent.len() - keep);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            ReusePolicy::SlidingWindow { len: 0 } => {
                Err(ConfigError::invalid("sliding window length must be > 0"))
            }
            ReusePolicy::Resupply { period: 0 } => {
                Err(ConfigError::invalid("resupply period must be > 0"))
            }
            _ => Ok(()),
        }
    }
}

/// Search configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchCfg {
    pub allowed_ids: Vec<TrackId>,
    pub map_height: i32,
    pub map_width: i32,
    /// A popped state with `x >= goal_column` ends the search.
    pub goal_column: i32,
    pub start_rows: StartRows,
    pub waypoints: Option<Vec<Waypoint>>,
    pub reuse_policy: ReusePolicy,
    /// Pop/expand budget; `None` searches until the goal or frontier exhaustion.
    pub max_iterations: Option<u64>,
    /// Drop children whose (position, facing, window, flags) key was already pushed.
    /// Changes which path wins; off by default.
    pub dedup_states: bool,
    /// Log the popped state and its children at this iteration (1-based).
    pub trace_iteration: Option<u64>,
}

impl Default for SearchCfg {
    fn default() -> Self {
        Self {
            allowed_ids: vec![1, 2, 3, 4, 5],
            map_height: 9,
            map_width: 40,
            goal_column: 36,
            start_rows: StartRows::Single(4),
            waypoints: None,
            reuse_policy: ReusePolicy::SLIDING_WINDOW_3,
            max_iterations: Some(1_000_000),
            dedup_states: false,
            trace_iteration: None,
        }
    }
}

impl SearchCfg {
    /// Supply-mode configuration: waypoints on the fixed supply columns and
    /// the resupply reuse policy.
    pub fn with_supplies(mut self, rows: [i32; 3]) -> Self {
        self.waypoints = Some(Waypoint::supply_rows(rows));
        self.reuse_policy = ReusePolicy::for_waypoints(true);
        self
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        self.waypoints.as_deref().unwrap_or(&[])
    }

    /// Rows that receive a root state.
    pub fn root_rows(&self) -> Vec<i32> {
        match self.start_rows {
            StartRows::All => (0..self.map_height).collect(),
            StartRows::Single(row) => vec![row],
        }
    }

    /// Check every field against `catalog`; fails fast rather than producing an empty usable set.
    pub fn validate(&self, catalog: &Catalog) -> Result<(), ConfigError> {
        if self.allowed_ids.is_empty() {
            return Err(ConfigError::invalid("allowed track list is empty"));
        }
        if let Some(&id) = self.allowed_ids.iter().find(|&&id| !catalog.contains_id(id)) {
            return Err(ConfigError::invalid(format!("no catalog template has id {id}")));
        }
        if self.map_height <= 0 || self.map_width <= 0 {
            return Err(ConfigError::invalid(format!(
                "map dimensions must be positive, got {}x{}",
                self.map_width, self.map_height
            )));
        }
        if !(1..=self.map_width).contains(&self.goal_column) {
            return Err(ConfigError::invalid(format!(
                "goal column {} outside 1..={}",
                self.goal_column, self.map_width
            )));
        }
        if let StartRows::Single(row) = self.start_rows {
            if !(0..self.map_height).contains(&row) {
                return Err(ConfigError::invalid(format!(
                    "start row {row} outside 0..{}",
                    self.map_height
                )));
            }
        }
        let mut prev_column = i32::MIN;
        for w in self.waypoints() {
            if !(0..self.map_height).contains(&w.row) {
                return Err(ConfigError::invalid(format!(
                    "waypoint row {} outside 0..{}",
                    w.row, self.map_height
                )));
            }
            if !(0..self.map_width).contains(&w.column) {
                return Err(ConfigError::invalid(format!(
                    "waypoint column {} outside 0..{}",
                    w.column, self.map_width
                )));
            }
            if w.column >= self.goal_column {
                return Err(ConfigError::invalid(format!(
                    "waypoint column {} not left of goal column {}",
                    w.column, self.goal_column
                )));
            }
            if w.column <= prev_column {
                return Err(ConfigError::invalid(
                    "waypoint columns must be strictly increasing",
                ));
            }
            prev_column = w.column;
        }
        if self.max_iterations == Some(0) {
            return Err(ConfigError::invalid("iteration budget must be > 0"));
        }
        self.reuse_policy.validate()
    }
}

/// Setup failure; the search never starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { reason: String },
}

impl ConfigError {
    fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { reason } => write!(f, "invalid search config: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A search that ran but produced no path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchError {
    /// Every state was popped and none reached the goal column.
    Unreachable { iterations: u64 },
    /// The iteration ceiling was hit first.
    BudgetExhausted { iterations: u64, best_column: i32 },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable { iterations } => {
                write!(f, "goal unreachable: frontier exhausted after {iterations} iterations")
            }
            Self::BudgetExhausted {
                iterations,
                best_column,
            } => write!(
                f,
                "search budget exhausted after {iterations} iterations (best column {best_column})"
            ),
        }
    }
}

impl std::error::Error for SearchError {}

/// One element of the winning chain, root first.
#[derive(Clone, Debug, PartialEq)]
pub struct PathStep {
    pub x: i32,
    pub y: i32,
    pub facing: Direction,
    /// Track played to reach this step; `None` for the root.
    pub track_id: Option<TrackId>,
    /// Absolute cells covered by that track.
    pub cells: Vec<(i32, i32)>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathStats {
    pub pieces: u32,
    pub cells: u32,
    pub score: f64,
}

/// Result of a successful search.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    pub path: Vec<PathStep>,
    pub stats: PathStats,
    pub iterations: u64,
    /// States created over the whole run, roots included.
    pub states: usize,
}

impl Solution {
    pub fn final_step(&self) -> Option<&PathStep> {
        self.path.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window_after(policy: ReusePolicy, ids: &[TrackId]) -> Vec<Vec<TrackId>> {
        let mut recent = Vec::new();
        ids.iter()
            .enumerate()
            .map(|(i, &id)| {
                policy.admit(&mut recent, id, i as u32 + 1);
                recent.clone()
            })
            .collect()
    }

    #[test]
    fn sliding_window_keeps_last_three() {
        let w = window_after(ReusePolicy::SLIDING_WINDOW_3, &[1, 2, 3, 4, 5]);
        assert_eq!(w[2], vec![1, 2, 3]);
        assert_eq!(w[3], vec![2, 3, 4]);
        assert_eq!(w[4], vec![3, 4, 5]);
    }

    #[test]
    fn single_recent_after_collapses_from_fourth_piece() {
        let w = window_after(ReusePolicy::SingleRecentAfter { pieces: 4 }, &[1, 2, 3, 4, 5]);
        assert_eq!(w[2], vec![1, 2, 3]);
        assert_eq!(w[3], vec![4]);
        assert_eq!(w[4], vec![5]);
    }

    #[test]
    fn resupply_collapses_on_period_boundaries() {
        let w = window_after(ReusePolicy::RESUPPLY_5, &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(w[0], vec![1]);
        assert_eq!(w[3], vec![1, 2, 3, 4]);
        assert_eq!(w[4], vec![5]);
        assert_eq!(w[5], vec![6]);
        assert_eq!(w[7], vec![6, 7, 8]);
    }

    #[test]
    fn supply_rows_pair_with_fixed_columns() {
        let cfg = SearchCfg::default().with_supplies([1, 2, 3]);
        assert_eq!(
            cfg.waypoints(),
            &[Waypoint::new(8, 1), Waypoint::new(17, 2), Waypoint::new(26, 3)]
        );
        assert_eq!(cfg.reuse_policy, ReusePolicy::RESUPPLY_5);
        assert!(SearchCfg::default().waypoints().is_empty());
    }

    #[test]
    fn root_rows_follow_start_mode() {
        let mut cfg = SearchCfg::default();
        assert_eq!(cfg.root_rows(), vec![4]);
        cfg.start_rows = StartRows::All;
        assert_eq!(cfg.root_rows(), (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn validation_rejects_bad_configs() {
        let catalog = Catalog::standard();
        assert!(SearchCfg::default().validate(&catalog).is_ok());

        let bad: Vec<SearchCfg> = vec![
            SearchCfg {
                allowed_ids: vec![],
                ..SearchCfg::default()
            },
            SearchCfg {
                allowed_ids: vec![1, 42],
                ..SearchCfg::default()
            },
            SearchCfg {
                map_height: 0,
                ..SearchCfg::default()
            },
            SearchCfg {
                goal_column: 41,
                ..SearchCfg::default()
            },
            SearchCfg {
                start_rows: StartRows::Single(9),
                ..SearchCfg::default()
            },
            SearchCfg::default().with_supplies([0, 9, 2]),
            SearchCfg {
                waypoints: Some(vec![Waypoint::new(17, 1), Waypoint::new(8, 1)]),
                ..SearchCfg::default()
            },
            SearchCfg {
                reuse_policy: ReusePolicy::SlidingWindow { len: 0 },
                ..SearchCfg::default()
            },
            SearchCfg {
                max_iterations: Some(0),
                ..SearchCfg::default()
            },
        ];
        for cfg in bad {
            let err = cfg.validate(&catalog).unwrap_err();
            assert!(err.to_string().starts_with("invalid search config"));
        }
    }

    #[test]
    fn waypoints_must_sit_left_of_the_goal() {
        let catalog = Catalog::standard();
        let supplies = SearchCfg::default().with_supplies([4, 4, 4]);
        assert!(supplies.validate(&catalog).is_ok());

        let short_goal = SearchCfg {
            goal_column: 26,
            ..supplies.clone()
        };
        let err = short_goal.validate(&catalog).unwrap_err();
        assert!(err.to_string().contains("goal column 26"));

        let past_goal = SearchCfg {
            waypoints: Some(vec![Waypoint::new(37, 4)]),
            ..supplies
        };
        assert!(past_goal.validate(&catalog).is_err());
        assert!(SearchCfg {
            goal_column: 27,
            ..SearchCfg::default().with_supplies([4, 4, 4])
        }
        .validate(&catalog)
        .is_ok());
    }
}
