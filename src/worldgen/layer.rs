//! The regional layer: one flat arena of regional cells
//!
//! Cells live at index `gy * width + gx`. Per-parent views are derived from
//! the same storage, so the planetary and global addressing never diverge.

use std::collections::BTreeMap;

use crate::core::error::{Result, WorldError};
use crate::core::types::{GlobalCoord, GridCoord};
use crate::terrain::HexYieldModel;
use crate::worldgen::cells::RegionalCell;
use crate::worldgen::rivers::{self, ReconcileStats};

#[derive(Debug, Clone, PartialEq)]
pub struct RegionalLayer {
    /// Regional cells per planetary hex side
    scale: u32,
    width: i32,
    height: i32,
    cells: Vec<RegionalCell>,
}

impl RegionalLayer {
    /// Assemble expanded hexes into the arena
    ///
    /// Fails unless the patches cover every global coordinate exactly once.
    pub fn assemble(
        planet_width: i32,
        planet_height: i32,
        scale: u32,
        patches: Vec<Vec<RegionalCell>>,
    ) -> Result<Self> {
        let width = planet_width * scale as i32;
        let height = planet_height * scale as i32;

        let mut cells: Vec<RegionalCell> = patches.into_iter().flatten().collect();
        cells.sort_unstable_by_key(|c| (c.global.y, c.global.x));

        let complete = cells.len() == (width * height) as usize
            && cells
                .iter()
                .enumerate()
                .all(|(i, c)| c.global == GlobalCoord::new(i as i32 % width, i as i32 / width));
        if !complete {
            return Err(WorldError::InvalidConfig(format!(
                "regional patches do not tile a {}x{} layer",
                width, height
            )));
        }

        Ok(Self {
            scale,
            width,
            height,
            cells,
        })
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, coord: GlobalCoord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.width && coord.y < self.height
    }

    pub fn index_of(&self, coord: GlobalCoord) -> Option<usize> {
        self.contains(coord)
            .then(|| (coord.y * self.width + coord.x) as usize)
    }

    pub fn get(&self, coord: GlobalCoord) -> Option<&RegionalCell> {
        self.index_of(coord).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, coord: GlobalCoord) -> Option<&mut RegionalCell> {
        self.index_of(coord).map(move |i| &mut self.cells[i])
    }

    /// Typed accessor that reports a missing tile as an error
    pub fn tile(&self, coord: GlobalCoord) -> Result<&RegionalCell> {
        self.get(coord).ok_or(WorldError::TileOutOfBounds(coord))
    }

    pub fn tile_mut(&mut self, coord: GlobalCoord) -> Result<&mut RegionalCell> {
        self.get_mut(coord).ok_or(WorldError::TileOutOfBounds(coord))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegionalCell> {
        self.cells.iter()
    }

    pub fn cells(&self) -> &[RegionalCell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [RegionalCell] {
        &mut self.cells
    }

    /// On-layer neighbours of a tile
    pub fn neighbors(&self, coord: GlobalCoord) -> impl Iterator<Item = &RegionalCell> + '_ {
        coord.neighbors().into_iter().filter_map(move |n| self.get(n))
    }

    /// The N×N cells expanded from one planetary hex, row by row
    pub fn cells_of(&self, parent: GridCoord) -> impl Iterator<Item = &RegionalCell> + '_ {
        let n = self.scale as i32;
        let x0 = parent.x * n;
        let y0 = parent.y * n;
        let inside = x0 >= 0 && y0 >= 0 && x0 < self.width && y0 < self.height;
        let rows = if inside { y0..y0 + n } else { 0..0 };
        rows.flat_map(move |gy| {
            let start = (gy * self.width + x0) as usize;
            self.cells[start..start + n as usize].iter()
        })
    }

    /// Planetary hex a global coordinate falls in
    pub fn parent_of(&self, coord: GlobalCoord) -> Option<GridCoord> {
        self.get(coord).map(|c| c.parent)
    }

    /// Rerun river connection and coastal marking over the whole layer
    pub fn reconcile(&mut self) -> ReconcileStats {
        let width = self.width;
        let height = self.height;
        rivers::reconcile(&mut self.cells, |c| {
            (c.x >= 0 && c.y >= 0 && c.x < width && c.y < height).then(|| (c.y * width + c.x) as usize)
        })
    }

    /// Rebuild the derived yields of one tile after a mutation
    pub fn recompute(&mut self, coord: GlobalCoord) -> Result<()> {
        HexYieldModel::recompute(self.tile_mut(coord)?);
        Ok(())
    }

    pub fn recompute_all(&mut self) {
        use rayon::prelude::*;
        self.cells.par_iter_mut().for_each(HexYieldModel::recompute);
    }

    /// Export keyed by the `"x,y"` tile string
    pub fn keyed(&self) -> BTreeMap<String, &RegionalCell> {
        self.cells.iter().map(|c| (c.global.to_string(), c)).collect()
    }
}
