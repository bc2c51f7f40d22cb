//! Whole-grid reconciliation: river connection and coastal marking
//!
//! Both passes work over any set of regional cells given a lookup from
//! global coordinate to slice index, so they serve a single expanded hex as
//! well as the full layer. They must run after every cell in the set exists.

use ahash::AHashMap;

use crate::core::types::GlobalCoord;
use crate::spatial::hex::HexDirection;
use crate::worldgen::cells::{RegionalCell, RiverEdges};

/// Outcome counts of a reconciliation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileStats {
    pub river_cells: usize,
    pub demoted_candidates: usize,
    pub coastal_cells: usize,
}

/// Connect river candidates and rebuild every cell's river state
///
/// An edge is recorded only between two candidates, so edges are always
/// reciprocal. Candidates left without an edge are demoted to no river.
pub fn connect_rivers<F>(cells: &mut [RegionalCell], index_of: F) -> (usize, usize)
where
    F: Fn(GlobalCoord) -> Option<usize>,
{
    let edges: Vec<RiverEdges> = cells
        .iter()
        .map(|cell| {
            let mut sides = RiverEdges::default();
            if !cell.river_candidate {
                return sides;
            }
            for dir in HexDirection::ALL {
                let confirmed = index_of(cell.global.neighbor(dir))
                    .map(|j| cells[j].river_candidate)
                    .unwrap_or(false);
                if confirmed {
                    sides.insert(dir);
                }
            }
            sides
        })
        .collect();

    let mut rivers = 0;
    let mut demoted = 0;
    for (cell, sides) in cells.iter_mut().zip(edges) {
        cell.river_sides = sides;
        cell.has_river = !sides.is_empty();
        if cell.has_river {
            rivers += 1;
        } else if cell.river_candidate {
            demoted += 1;
        }
    }
    (rivers, demoted)
}

/// Mark land cells that touch water; water cells are never coastal
pub fn mark_coastal<F>(cells: &mut [RegionalCell], index_of: F) -> usize
where
    F: Fn(GlobalCoord) -> Option<usize>,
{
    let flags: Vec<bool> = cells
        .iter()
        .map(|cell| {
            !cell.is_water()
                && cell
                    .global
                    .neighbors()
                    .iter()
                    .filter_map(|n| index_of(*n))
                    .any(|j| cells[j].is_water())
        })
        .collect();

    let mut coastal = 0;
    for (cell, flag) in cells.iter_mut().zip(flags) {
        cell.coastal = flag;
        coastal += usize::from(flag);
    }
    coastal
}

/// Run both passes
pub fn reconcile<F>(cells: &mut [RegionalCell], index_of: F) -> ReconcileStats
where
    F: Fn(GlobalCoord) -> Option<usize>,
{
    let (river_cells, demoted_candidates) = connect_rivers(cells, &index_of);
    let coastal_cells = mark_coastal(cells, &index_of);
    ReconcileStats {
        river_cells,
        demoted_candidates,
        coastal_cells,
    }
}

/// Reconcile an arbitrary patch, such as the output of one hex expansion
pub fn reconcile_patch(cells: &mut [RegionalCell]) -> ReconcileStats {
    let lookup: AHashMap<GlobalCoord, usize> = cells
        .iter()
        .enumerate()
        .map(|(i, c)| (c.global, i))
        .collect();
    reconcile(cells, |coord| lookup.get(&coord).copied())
}
