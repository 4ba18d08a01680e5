//! Search states and the arena that owns them.
//!
//! Every state ever created lives in one `StateArena` for the whole run.
//! Children refer to their parent by `StateId`, so extending a path never
//! copies or mutates an ancestor, and the winning chain is recovered by
//! walking parent ids back to a root.

use std::fmt;

use crate::catalog::TrackId;
use crate::geometry::Direction;

/// Index of a state in its arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub usize);

/// One path instance: where the path ends, how it got there, and its priority.
#[derive(Clone, Debug, PartialEq)]
pub struct State {
    pub x: i32,
    pub y: i32,
    /// Exit side of the last track played (`Right` for roots).
    pub facing: Direction,
    /// Tracks played so far.
    pub pieces: u32,
    /// Grid cells covered so far.
    pub cells: u32,
    /// Recently used track ids; a candidate whose id is listed here is rejected.
    pub recent: Vec<TrackId>,
    /// Per-waypoint passed flags, in waypoint order. Never cleared once set.
    pub passed: Vec<bool>,
    pub score: f64,
    pub parent: Option<StateId>,
    /// Index into the usable track set of the track that produced this state.
    pub track: Option<usize>,
}

impl State {
    /// Priority of roots and of disqualified states.
    pub const SENTINEL_SCORE: f64 = -1.0;

    /// Off-board root one column left of the map, facing right.
    pub fn root(y: i32, waypoints: usize) -> Self {
        Self {
            x: -1,
            y,
            facing: Direction::Right,
            pieces: 0,
            cells: 0,
            recent: Vec::new(),
            passed: vec![false; waypoints],
            score: Self::SENTINEL_SCORE,
            parent: None,
            track: None,
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub(crate) fn key(&self) -> StateKey {
        StateKey {
            x: self.x,
            y: self.y,
            facing: self.facing,
            recent: self.recent.clone(),
            passed: self.passed.clone(),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) {} score: {:.4}, #pieces: {}",
            self.x, self.y, self.facing, self.score, self.pieces
        )
    }
}

/// Identity used by optional duplicate pruning. Piece and cell counts are
/// left out so a longer route into the same situation counts as a duplicate.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct StateKey {
    x: i32,
    y: i32,
    facing: Direction,
    recent: Vec<TrackId>,
    passed: Vec<bool>,
}

/// Append-only store of every state created during one search.
#[derive(Debug, Default)]
pub struct StateArena {
    states: Vec<State>,
}

impl StateArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, state: State) -> StateId {
        let id = StateId(self.states.len());
        self.states.push(state);
        id
    }

    /// Ids come only from `push`, so indexing cannot fail for ids of this arena.
    #[inline]
    pub fn get(&self, id: StateId) -> &State {
        &self.states[id.0]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Ids from the root down to `id`.
    pub fn back_trace(&self, id: StateId) -> Vec<StateId> {
        let mut chain = vec![id];
        let mut cur = self.get(id).parent;
        while let Some(p) = cur {
            chain.push(p);
            cur = self.get(p).parent;
        }
        chain.reverse();
        chain
    }
}
