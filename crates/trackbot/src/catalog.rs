//! Track templates, rotations, and the usable set for a run.
//!
//! Purpose
//! - Hold the fixed library of physical tiles. A template is an entry side,
//!   a walk of unit steps through the cells it covers, and an exit side.
//! - Build the usable set: every template whose id is allowed, plus its three
//!   successive quarter turns.
//!
//! Model
//! - Cell offsets are relative to the cell *before* the track (the previous
//!   track's last cell, or the off-board root at `x = -1`). The first covered
//!   cell is one step away from the entry side; each step adds one more cell.
//! - Templates sharing an id are rotations or mirror variants of the same tile
//!   and count as the same piece for reuse.

use crate::geometry::Direction;

use Direction::{Down, Left, Right, Up};

/// Identifier of a physical tile (shared by all its rotations).
pub type TrackId = u8;

/// A placeable track piece with its covered-cell footprint.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Track {
    pub id: TrackId,
    pub entry: Direction,
    pub steps: Vec<Direction>,
    pub exit: Direction,
    cells: Vec<(i32, i32)>,
    displacement: (i32, i32),
}

impl Track {
    pub fn new(id: TrackId, entry: Direction, steps: Vec<Direction>, exit: Direction) -> Self {
        let mut at = entry.inverse().delta();
        let mut cells = Vec::with_capacity(steps.len() + 1);
        cells.push(at);
        for step in &steps {
            let (dx, dy) = step.delta();
            at = (at.0 + dx, at.1 + dy);
            cells.push(at);
        }
        Self {
            id,
            entry,
            steps,
            exit,
            cells,
            displacement: at,
        }
    }

    /// Covered cells relative to the position the track is played from.
    /// Never empty.
    #[inline]
    pub fn cells(&self) -> &[(i32, i32)] {
        &self.cells
    }

    /// Net `(dx, dy)` from the play position to the track's last cell.
    #[inline]
    pub fn displacement(&self) -> (i32, i32) {
        self.displacement
    }

    /// True if this track's entry side mates with a previous exit `facing`.
    #[inline]
    pub fn mates_with(&self, facing: Direction) -> bool {
        self.entry == facing.inverse()
    }

    /// Quarter turn clockwise; footprint and displacement are replayed from the rotated steps.
    pub fn rotate90(&self) -> Self {
        Self::new(
            self.id,
            self.entry.rotate90(),
            self.steps.iter().map(|s| s.rotate90()).collect(),
            self.exit.rotate90(),
        )
    }
}

/// Immutable template library passed to the search at construction.
#[derive(Clone, Debug)]
pub struct Catalog {
    templates: Vec<Track>,
}

impl Catalog {
    /// The standard tile set of the board game, ids 0..=9.
    pub fn standard() -> Self {
        let t = |id: TrackId, entry, steps: &[Direction], exit| {
            Track::new(id, entry, steps.to_vec(), exit)
        };
        Self {
            templates: vec![
                // 0 is the S-shaped piece
                t(0, Left, &[Up], Right),
                t(0, Left, &[Down], Right),
                t(0, Right, &[Down], Left),
                t(0, Right, &[Down, Down], Right),
                t(0, Right, &[Up], Left),
                t(0, Right, &[Up, Up], Right),
                t(1, Left, &[Down, Down], Left),
                t(1, Left, &[Up, Up], Left),
                t(2, Left, &[Down, Down], Right),
                t(3, Up, &[Down, Down], Down),
                t(4, Left, &[Down, Down], Down),
                t(4, Down, &[Up, Up], Left),
                t(5, Right, &[Down, Down], Down),
                t(5, Down, &[Up, Up], Right),
                t(6, Up, &[Down], Down),
                t(7, Right, &[Down], Down),
                t(7, Down, &[Up], Right),
                t(8, Left, &[Down], Down),
                t(8, Down, &[Up], Left),
                t(9, Left, &[Down], Left),
                t(9, Left, &[Up], Left),
            ],
        }
    }

    pub fn from_templates(templates: Vec<Track>) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &[Track] {
        &self.templates
    }

    pub fn contains_id(&self, id: TrackId) -> bool {
        self.templates.iter().any(|t| t.id == id)
    }

    /// Every allowed template followed by its three successive rotations,
    /// in catalog order. Order only affects which equal-score child is pushed first.
    pub fn usable_set(&self, allowed: &[TrackId]) -> Vec<Track> {
        let mut out = Vec::new();
        for template in self.templates.iter().filter(|t| allowed.contains(&t.id)) {
            let mut track = template.clone();
            for _ in 0..3 {
                let next = track.rotate90();
                out.push(track);
                track = next;
            }
            out.push(track);
        }
        out
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
