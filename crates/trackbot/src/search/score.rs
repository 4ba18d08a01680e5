//! Waypoint bookkeeping and the greedy priority.
//!
//! The priority is rightward progress per track, `x / pieces`. It is a
//! heuristic only: it rewards long tracks, not shortest or longest paths.
//! With waypoints, a state that has moved past a waypoint column without
//! having crossed that waypoint (or an earlier one) gets the sentinel score
//! and sinks to the bottom of the frontier.

use crate::catalog::Track;

use super::state::State;
use super::types::Waypoint;

/// Set the flag of every waypoint covered by `track` played from `origin`.
/// Flags are only ever set, never cleared.
pub fn mark_waypoints(
    passed: &mut [bool],
    origin: (i32, i32),
    track: &Track,
    waypoints: &[Waypoint],
) {
    for &(dx, dy) in track.cells() {
        let cell = (origin.0 + dx, origin.1 + dy);
        for (flag, w) in passed.iter_mut().zip(waypoints) {
            if cell == (w.column, w.row) {
                *flag = true;
            }
        }
    }
}

/// Priority of a non-root state. `state.passed` must already include the last track.
pub fn score(state: &State, waypoints: &[Waypoint]) -> f64 {
    let overtaken = waypoints
        .iter()
        .zip(&state.passed)
        .any(|(w, &passed)| state.x > w.column && !passed);
    if overtaken {
        return State::SENTINEL_SCORE;
    }
    state.x as f64 / state.pieces as f64
}
