//! Max-priority frontier with randomized tie-breaking.
//!
//! Each entry carries a random draw taken from the caller's RNG at push time.
//! Ordering is a pure function of `(score, draw)`, so equal scores come out in
//! a random but seed-reproducible order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rand::Rng;

use super::state::StateId;

/// Higher score first; equal scores resolved by the larger draw.
#[inline]
pub fn rank(a_score: f64, a_draw: u64, b_score: f64, b_draw: u64) -> Ordering {
    a_score.total_cmp(&b_score).then(a_draw.cmp(&b_draw))
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    score: f64,
    draw: u64,
    id: StateId,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // id last keeps the order total when two draws collide
        rank(self.score, self.draw, other.score, other.draw).then(other.id.cmp(&self.id))
    }
}

/// Not-yet-expanded states, best score first.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<Entry>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<R: Rng>(&mut self, id: StateId, score: f64, rng: &mut R) {
        let draw = rng.gen::<u64>();
        self.heap.push(Entry { score, draw, id });
    }

    pub fn pop(&mut self) -> Option<StateId> {
        self.heap.pop().map(|e| e.id)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
