//! A* pathfinding over the hex grid.
//!
//! The search is grid-agnostic: callers supply walkability and cost as
//! closures, so the same functions serve the live map, hypothetical
//! layouts in tests, and anything else that can answer "can I stand
//! here" for a coordinate.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};

use bevy::prelude::*;

use crate::constants::SEARCH_NODE_LIMIT;
use crate::hex::HexCoord;

#[derive(Debug, Clone, Copy)]
struct PathNode {
    position: HexCoord,
    cost: f32,
    heuristic: f32,
    /// Insertion counter. Equal-priority nodes pop in insertion order,
    /// which pins down which of several equally short paths wins.
    sequence: u64,
}

impl PathNode {
    fn total_cost(&self) -> f32 {
        self.cost + self.heuristic
    }
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.sequence == other.sequence
    }
}

impl Eq for PathNode {}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total_cost()
            .partial_cmp(&other.total_cost())
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

/// Shortest path by step count. Every walkable tile costs 1.
pub fn find_path<W>(start: HexCoord, goal: HexCoord, walkable: W) -> Vec<HexCoord>
where
    W: Fn(HexCoord) -> bool,
{
    find_path_with_cost(start, goal, walkable, |_| 1.0)
}

/// Cheapest path from `start` to `goal`, inclusive of both endpoints.
///
/// Returns an empty path when either endpoint is unwalkable, when the
/// goal cannot be reached, or when the search exceeds its node budget
/// (the grid is unbounded, so an enclosed goal would otherwise never
/// terminate). `cost` is charged for entering a tile and must be at
/// least 1.0, or the hex-distance heuristic stops being admissible and
/// paths may come back suboptimal.
pub fn find_path_with_cost<W, C>(start: HexCoord, goal: HexCoord, walkable: W, cost: C) -> Vec<HexCoord>
where
    W: Fn(HexCoord) -> bool,
    C: Fn(HexCoord) -> f32,
{
    if !walkable(start) || !walkable(goal) {
        return Vec::new();
    }
    if start == goal {
        return vec![start];
    }

    let mut open = BinaryHeap::new();
    let mut closed: HashSet<HexCoord> = HashSet::new();
    let mut came_from: HashMap<HexCoord, HexCoord> = HashMap::new();
    let mut cost_so_far: HashMap<HexCoord, f32> = HashMap::new();
    let mut sequence: u64 = 0;
    let mut expanded: usize = 0;

    open.push(Reverse(PathNode {
        position: start,
        cost: 0.0,
        heuristic: start.distance(goal) as f32,
        sequence,
    }));
    cost_so_far.insert(start, 0.0);

    while let Some(Reverse(current)) = open.pop() {
        if current.position == goal {
            return reconstruct_path(&came_from, current.position);
        }

        // Stale queue entries for already-settled tiles are skipped here
        // instead of being removed eagerly on push.
        if !closed.insert(current.position) {
            continue;
        }

        expanded += 1;
        if expanded > SEARCH_NODE_LIMIT {
            warn!("Abandoning path search {start} -> {goal} after {expanded} nodes");
            return Vec::new();
        }

        for neighbor in current.position.neighbors() {
            if closed.contains(&neighbor) || !walkable(neighbor) {
                continue;
            }

            let tentative = current.cost + cost(neighbor);
            if let Some(&existing) = cost_so_far.get(&neighbor) {
                if tentative >= existing {
                    continue;
                }
            }

            cost_so_far.insert(neighbor, tentative);
            came_from.insert(neighbor, current.position);
            sequence += 1;
            open.push(Reverse(PathNode {
                position: neighbor,
                cost: tentative,
                heuristic: neighbor.distance(goal) as f32,
                sequence,
            }));
        }
    }

    Vec::new()
}

/// Total cost of walking `path`, charging `cost` per tile entered. The
/// starting tile is free.
pub fn path_cost<C>(path: &[HexCoord], cost: C) -> f32
where
    C: Fn(HexCoord) -> f32,
{
    path.iter().skip(1).map(|&coord| cost(coord)).sum()
}

fn reconstruct_path(came_from: &HashMap<HexCoord, HexCoord>, goal: HexCoord) -> Vec<HexCoord> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&parent) = came_from.get(&current) {
        current = parent;
        path.push(current);
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests;
