//! Connected landmass labelling on the planetary layer

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::types::{ContinentId, GridCoord};
use crate::worldgen::planetary::PlanetaryGrid;

/// One connected landmass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinentGroup {
    pub id: ContinentId,
    /// Member cells in discovery order
    pub members: Vec<GridCoord>,
    pub size: usize,
    /// No member touches the grid border, so water surrounds it entirely
    pub is_island: bool,
}

pub struct ContinentDetector;

impl ContinentDetector {
    /// Label land cells by 6-neighbour connectivity
    ///
    /// Seeds are visited in row-major order, so ids are stable for a grid.
    pub fn detect(grid: &PlanetaryGrid) -> Vec<ContinentGroup> {
        let mut visited = vec![false; grid.cells.len()];
        let mut groups = Vec::new();

        for (start, cell) in grid.cells.iter().enumerate() {
            if visited[start] || !cell.is_land() {
                continue;
            }

            let id = ContinentId(groups.len() as u32);
            let mut members = Vec::new();
            let mut is_island = true;
            let mut queue = VecDeque::from([cell.coord]);
            visited[start] = true;

            while let Some(coord) = queue.pop_front() {
                if grid.is_border(coord) {
                    is_island = false;
                }
                members.push(coord);

                for n in coord.neighbors() {
                    let Some(neighbor) = grid.cell(n) else {
                        continue;
                    };
                    let idx = (n.y * grid.width + n.x) as usize;
                    if !visited[idx] && neighbor.is_land() {
                        visited[idx] = true;
                        queue.push_back(n);
                    }
                }
            }

            groups.push(ContinentGroup {
                id,
                size: members.len(),
                members,
                is_island,
            });
        }

        groups
    }

    /// Detect landmasses and write their ids back onto the grid
    pub fn detect_and_label(grid: &mut PlanetaryGrid) -> Vec<ContinentGroup> {
        let groups = Self::detect(grid);
        for cell in grid.cells.iter_mut() {
            cell.continent = None;
        }
        for group in &groups {
            for coord in &group.members {
                if let Some(cell) = grid.get_mut(coord.x, coord.y) {
                    cell.continent = Some(group.id);
                }
            }
        }
        tracing::debug!("Detected {} landmasses", groups.len());
        groups
    }
}
