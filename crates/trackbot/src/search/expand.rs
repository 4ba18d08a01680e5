//! Candidate generation: every legal next track from a state.

use std::iter::Enumerate;
use std::slice::Iter;

use crate::catalog::Track;

use super::score::{mark_waypoints, score};
use super::state::{State, StateId};
use super::types::SearchCfg;

/// Lazy, single-pass sequence of scored, in-bounds children of one state.
///
/// The parent is only read; children are fresh values for the driver to store.
pub struct Expansion<'a> {
    parent: &'a State,
    parent_id: StateId,
    tracks: Enumerate<Iter<'a, Track>>,
    cfg: &'a SearchCfg,
}

/// Expand `parent` (stored under `parent_id`) with the usable `tracks`.
pub fn expand<'a>(
    parent_id: StateId,
    parent: &'a State,
    tracks: &'a [Track],
    cfg: &'a SearchCfg,
) -> Expansion<'a> {
    Expansion {
        parent,
        parent_id,
        tracks: tracks.iter().enumerate(),
        cfg,
    }
}

impl Iterator for Expansion<'_> {
    type Item = State;

    fn next(&mut self) -> Option<State> {
        for (index, track) in self.tracks.by_ref() {
            if !track.mates_with(self.parent.facing) {
                continue;
            }
            if self.parent.recent.contains(&track.id) {
                continue;
            }
            let child = extend(self.parent, self.parent_id, index, track, self.cfg);
            if child.x < 0 || !(0..self.cfg.map_height).contains(&child.y) {
                continue;
            }
            return Some(child);
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.tracks.size_hint().1)
    }
}

/// Play `track` (at `index` in the usable set) on `parent` and score the result.
/// No legality or bounds checks.
pub fn extend(
    parent: &State,
    parent_id: StateId,
    index: usize,
    track: &Track,
    cfg: &SearchCfg,
) -> State {
    let (dx, dy) = track.displacement();
    let pieces = parent.pieces + 1;
    let mut recent = parent.recent.clone();
    cfg.reuse_policy.admit(&mut recent, track.id, pieces);
    let mut passed = parent.passed.clone();
    mark_waypoints(&mut passed, (parent.x, parent.y), track, cfg.waypoints());

    let mut child = State {
        x: parent.x + dx,
        y: parent.y + dy,
        facing: track.exit,
        pieces,
        cells: parent.cells + track.cells().len() as u32,
        recent,
        passed,
        score: State::SENTINEL_SCORE,
        parent: Some(parent_id),
        track: Some(index),
    };
    child.score = score(&child, cfg.waypoints());
    child
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::geometry::Direction;
    use crate::search::types::ReusePolicy;

    fn setup(cfg: &SearchCfg) -> Vec<Track> {
        Catalog::standard().usable_set(&cfg.allowed_ids)
    }

    #[test]
    fn root_children_mate_with_right_facing() {
        let cfg = SearchCfg::default();
        let tracks = setup(&cfg);
        let root = State::root(4, 0);
        let kids: Vec<State> = expand(StateId(0), &root, &tracks, &cfg).collect();
        assert!(!kids.is_empty());
        for k in &kids {
            let t = &tracks[k.track.unwrap()];
            assert_eq!(t.entry, Direction::Left);
            assert_eq!(k.parent, Some(StateId(0)));
            assert_eq!(k.pieces, 1);
            assert_eq!(k.cells as usize, t.steps.len() + 1);
            assert_eq!(k.recent, vec![t.id]);
            assert_eq!(k.score, k.x as f64);
        }
        // the straight piece reaches column 2 in one move
        assert!(kids.iter().any(|k| k.x == 2 && k.y == 4 && k.facing == Direction::Right));
        // parent untouched
        assert_eq!(root, State::root(4, 0));
    }

    #[test]
    fn recent_ids_are_not_replayed() {
        let cfg = SearchCfg::default();
        let tracks = setup(&cfg);
        let mut root = State::root(4, 0);
        root.recent = vec![2, 3];
        let kids: Vec<State> = expand(StateId(0), &root, &tracks, &cfg).collect();
        for k in &kids {
            let id = tracks[k.track.unwrap()].id;
            assert!(id != 2 && id != 3);
        }
    }

    #[test]
    fn out_of_bounds_children_are_dropped() {
        let cfg = SearchCfg {
            allowed_ids: vec![2],
            ..SearchCfg::default()
        };
        let tracks = setup(&cfg);
        // piece 2 moves two rows down: fine from row 4, off the map from row 7
        let kids: Vec<State> = expand(StateId(0), &State::root(4, 0), &tracks, &cfg).collect();
        assert_eq!(kids.len(), 1);
        assert_eq!((kids[0].x, kids[0].y), (0, 6));
        let kids: Vec<State> = expand(StateId(0), &State::root(7, 0), &tracks, &cfg).collect();
        assert!(kids.is_empty());
    }

    #[test]
    fn window_follows_policy() {
        let cfg = SearchCfg {
            reuse_policy: ReusePolicy::SingleRecentAfter { pieces: 4 },
            ..SearchCfg::default()
        };
        let tracks = setup(&cfg);
        let mut parent = State::root(4, 0);
        parent.x = 5;
        parent.pieces = 3;
        parent.recent = vec![1, 2, 4];
        let straight = tracks
            .iter()
            .position(|t| t.id == 3 && t.entry == Direction::Left)
            .unwrap();
        let child = extend(&parent, StateId(7), straight, &tracks[straight], &cfg);
        assert_eq!(child.recent, vec![3]);
        assert_eq!((child.x, child.pieces, child.cells), (8, 4, 3));
        assert_eq!(child.score, 2.0);
    }
}
