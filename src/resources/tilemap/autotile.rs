//! Autotiling: pick each solid tile's variant from its neighbours.
//!
//! A tile's connectivity is the set of axis-adjacent cells holding a tile of
//! the same kind, encoded as a bitmask so that the set has one canonical
//! form regardless of discovery order. Only the patterns in
//! [`AUTOTILE_TABLE`] select a variant; any other pattern (isolated tiles,
//! horizontal or vertical runs) leaves the current variant untouched.

use log::debug;

use super::{GridPos, Tilemap, TileRecord};

pub const RIGHT: u8 = 1 << 0;
pub const LEFT: u8 = 1 << 1;
pub const UP: u8 = 1 << 2;
pub const DOWN: u8 = 1 << 3;

/// Directions inspected for connectivity, with their mask bit.
const SHIFTS: [((i32, i32), u8); 4] = [
    ((1, 0), RIGHT),
    ((-1, 0), LEFT),
    ((0, -1), UP),
    ((0, 1), DOWN),
];

/// Neighbour pattern to variant index.
pub const AUTOTILE_TABLE: [(u8, u32); 9] = [
    (RIGHT | DOWN, 0),
    (RIGHT | DOWN | LEFT, 1),
    (LEFT | DOWN, 2),
    (LEFT | UP | DOWN, 3),
    (LEFT | UP, 4),
    (LEFT | UP | RIGHT, 5),
    (RIGHT | UP, 6),
    (RIGHT | UP | DOWN, 7),
    (RIGHT | LEFT | UP | DOWN, 8),
];

/// Variant for a neighbour mask, or `None` when the pattern is not tabled.
pub fn variant_for(mask: u8) -> Option<u32> {
    AUTOTILE_TABLE
        .iter()
        .find(|(pattern, _)| *pattern == mask)
        .map(|&(_, variant)| variant)
}

impl Tilemap {
    /// Same-kind connectivity of `tile` as a direction bitmask.
    pub fn neighbor_mask(&self, tile: &TileRecord) -> u8 {
        SHIFTS
            .iter()
            .filter(|((dx, dy), _)| {
                tile.pos
                    .offset(*dx, *dy)
                    .and_then(|pos| self.get(pos))
                    .is_some_and(|n| n.kind == tile.kind)
            })
            .fold(0, |mask, (_, bit)| mask | bit)
    }

    /// Recompute variants of every autotiled tile. Returns how many changed.
    ///
    /// Neighbour kinds are read from the map before any variant is written,
    /// so the result does not depend on iteration order and a second run
    /// changes nothing.
    pub fn autotile(&mut self) -> usize {
        let updates: Vec<(GridPos, u32)> = self
            .tiles()
            .filter(|tile| tile.kind.is_autotiled())
            .filter_map(|tile| {
                variant_for(self.neighbor_mask(tile))
                    .filter(|&variant| variant != tile.variant)
                    .map(|variant| (tile.pos, variant))
            })
            .collect();

        for &(pos, variant) in &updates {
            if let Some(tile) = self.grid.get_mut(&pos) {
                tile.variant = variant;
            }
        }

        debug!("autotile updated {} of {} tiles", updates.len(), self.len());
        updates.len()
    }
}
