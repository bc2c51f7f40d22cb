//! Offset-column hex coordinates (odd columns shifted down)
//!
//! Both layers use the same scheme: planetary cells on `GridCoord`, regional
//! cells on `GlobalCoord`. Edge indices run clockwise from north.

use serde::{Deserialize, Serialize};

use crate::core::types::{GlobalCoord, GridCoord};

/// One of the six edges of a flat-topped hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HexDirection {
    #[default]
    North,
    NorthEast,
    SouthEast,
    South,
    SouthWest,
    NorthWest,
}

impl HexDirection {
    pub const ALL: [HexDirection; 6] = [
        HexDirection::North,
        HexDirection::NorthEast,
        HexDirection::SouthEast,
        HexDirection::South,
        HexDirection::SouthWest,
        HexDirection::NorthWest,
    ];

    /// Edge index 0..=5
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Self {
        Self::ALL[(index % 6) as usize]
    }

    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// Column/row offset for this edge, which depends on column parity
    pub fn offset(self, x: i32) -> (i32, i32) {
        let odd = x.rem_euclid(2) == 1;
        match (self, odd) {
            (HexDirection::North, _) => (0, -1),
            (HexDirection::South, _) => (0, 1),
            (HexDirection::NorthEast, false) => (1, -1),
            (HexDirection::NorthEast, true) => (1, 0),
            (HexDirection::SouthEast, false) => (1, 0),
            (HexDirection::SouthEast, true) => (1, 1),
            (HexDirection::SouthWest, false) => (-1, 0),
            (HexDirection::SouthWest, true) => (-1, 1),
            (HexDirection::NorthWest, false) => (-1, -1),
            (HexDirection::NorthWest, true) => (-1, 0),
        }
    }
}

/// Neighbour of `(x, y)` across `dir`
pub fn neighbor_of(x: i32, y: i32, dir: HexDirection) -> (i32, i32) {
    let (dx, dy) = dir.offset(x);
    (x + dx, y + dy)
}

/// Cube coordinates for an offset-column position
pub fn to_cube(x: i32, y: i32) -> (i32, i32, i32) {
    let q = x;
    let r = y - (x - x.rem_euclid(2)) / 2;
    (q, r, -q - r)
}

/// Number of hex steps between two offset-column positions
pub fn hex_distance(a: (i32, i32), b: (i32, i32)) -> u32 {
    let (aq, ar, as_) = to_cube(a.0, a.1);
    let (bq, br, bs) = to_cube(b.0, b.1);
    (((aq - bq).abs() + (ar - br).abs() + (as_ - bs).abs()) / 2) as u32
}

impl GridCoord {
    pub fn neighbor(&self, dir: HexDirection) -> GridCoord {
        let (x, y) = neighbor_of(self.x, self.y, dir);
        GridCoord::new(x, y)
    }

    pub fn neighbors(&self) -> [GridCoord; 6] {
        HexDirection::ALL.map(|d| self.neighbor(d))
    }
}

impl GlobalCoord {
    pub fn neighbor(&self, dir: HexDirection) -> GlobalCoord {
        let (x, y) = neighbor_of(self.x, self.y, dir);
        GlobalCoord::new(x, y)
    }

    pub fn neighbors(&self) -> [GlobalCoord; 6] {
        HexDirection::ALL.map(|d| self.neighbor(d))
    }

    pub fn distance(&self, other: &GlobalCoord) -> u32 {
        hex_distance((self.x, self.y), (other.x, other.y))
    }

    /// Direction from `self` to an adjacent `other`, if they touch
    pub fn direction_to(&self, other: &GlobalCoord) -> Option<HexDirection> {
        HexDirection::ALL
            .into_iter()
            .find(|&d| self.neighbor(d) == *other)
    }

    /// All positions within `radius` steps, including `self`
    pub fn hexes_within(&self, radius: u32) -> Vec<GlobalCoord> {
        let r = radius as i32;
        let mut results = Vec::new();
        for x in (self.x - r)..=(self.x + r) {
            for y in (self.y - r - 1)..=(self.y + r + 1) {
                let candidate = GlobalCoord::new(x, y);
                if self.distance(&candidate) <= radius {
                    results.push(candidate);
                }
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_are_reciprocal() {
        for x in -3..4 {
            for y in -3..4 {
                let c = GlobalCoord::new(x, y);
                for dir in HexDirection::ALL {
                    let n = c.neighbor(dir);
                    assert_eq!(n.neighbor(dir.opposite()), c, "{:?} {:?}", c, dir);
                }
            }
        }
    }

    #[test]
    fn test_neighbors_distance_one() {
        let center = GlobalCoord::new(4, 7);
        for n in center.neighbors() {
            assert_eq!(center.distance(&n), 1);
        }
    }

    #[test]
    fn test_hexes_within_counts() {
        let center = GlobalCoord::new(5, 5);
        assert_eq!(center.hexes_within(0).len(), 1);
        assert_eq!(center.hexes_within(1).len(), 7);
        assert_eq!(center.hexes_within(2).len(), 19);
    }

    #[test]
    fn test_direction_opposite() {
        assert_eq!(HexDirection::North.opposite(), HexDirection::South);
        assert_eq!(HexDirection::NorthEast.opposite(), HexDirection::SouthWest);
        assert_eq!(HexDirection::NorthWest.opposite(), HexDirection::SouthEast);
    }
}
