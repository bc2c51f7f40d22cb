//! A* pathfinding over regional tiles
//!
//! Step costs come from the caller so unit-specific rules (embarking, naval
//! units, impassable terrain) stay out of the search.

use ahash::{AHashMap, AHashSet};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::types::GlobalCoord;

/// Node in the A* open set
#[derive(Debug, Clone, PartialEq, Eq)]
struct PathNode {
    coord: GlobalCoord,
    f_cost: u32, // g_cost + heuristic
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; coordinate breaks ties deterministically
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find the cheapest path from `start` to `goal`
///
/// `step_cost(from, to)` returns `None` when `to` cannot be entered.
/// The returned path includes both endpoints.
pub fn find_path<F>(start: GlobalCoord, goal: GlobalCoord, step_cost: F) -> Option<Vec<GlobalCoord>>
where
    F: Fn(GlobalCoord, GlobalCoord) -> Option<u32>,
{
    if start == goal {
        return Some(vec![start]);
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<GlobalCoord, GlobalCoord> = AHashMap::new();
    let mut g_scores: AHashMap<GlobalCoord, u32> = AHashMap::new();
    let mut closed_set: AHashSet<GlobalCoord> = AHashSet::new();

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        coord: start,
        f_cost: start.distance(&goal),
    });

    while let Some(current) = open_set.pop() {
        if current.coord == goal {
            let mut path = vec![goal];
            let mut cursor = goal;
            while let Some(&prev) = came_from.get(&cursor) {
                path.push(prev);
                cursor = prev;
            }
            path.reverse();
            return Some(path);
        }

        if !closed_set.insert(current.coord) {
            continue;
        }

        let current_g = g_scores.get(&current.coord).copied().unwrap_or(u32::MAX);

        for neighbor in current.coord.neighbors() {
            if closed_set.contains(&neighbor) {
                continue;
            }
            let Some(cost) = step_cost(current.coord, neighbor) else {
                continue;
            };

            let tentative_g = current_g.saturating_add(cost);
            if tentative_g < g_scores.get(&neighbor).copied().unwrap_or(u32::MAX) {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);
                open_set.push(PathNode {
                    coord: neighbor,
                    f_cost: tentative_g.saturating_add(neighbor.distance(&goal)),
                });
            }
        }
    }

    None
}

/// Total cost of walking `path` with the same cost function
pub fn path_cost<F>(path: &[GlobalCoord], step_cost: F) -> Option<u32>
where
    F: Fn(GlobalCoord, GlobalCoord) -> Option<u32>,
{
    path.windows(2)
        .try_fold(0u32, |acc, pair| Some(acc.saturating_add(step_cost(pair[0], pair[1])?)))
}
