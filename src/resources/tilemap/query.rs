//! Spatial queries over the tile grid.
//!
//! Lookups are bounded: a neighbourhood query touches at most the 9 cells
//! around a world position, and a point lookup reads a single cell.

use arrayvec::ArrayVec;
use glam::Vec2;
use smallvec::SmallVec;

use super::{Tilemap, TileRecord};
use crate::geometry::Rect;

/// Cell offsets inspected by [`Tilemap::tiles_around`], centre included.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 9] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (0, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Collision rectangles near a point, as consumed by the physics resolver.
pub type NearbyRects = SmallVec<[Rect; 9]>;

/// Source of solid collision geometry for the physics resolver.
pub trait SpatialQuery {
    /// Solid rectangles that could touch a body anchored at `world`.
    fn physics_rects_around(&self, world: Vec2) -> NearbyRects;
}

impl Tilemap {
    /// Tiles in the cell containing `world` and its 8 neighbours.
    pub fn tiles_around(&self, world: Vec2) -> ArrayVec<&TileRecord, 9> {
        let center = self.world_to_grid(world);
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| center.offset(dx, dy).and_then(|pos| self.get(pos)))
            .collect()
    }

    /// Cell rectangles of the solid tiles returned by [`Tilemap::tiles_around`].
    pub fn physics_rects_around(&self, world: Vec2) -> NearbyRects {
        self.tiles_around(world)
            .into_iter()
            .filter(|tile| tile.kind.is_solid())
            .map(|tile| self.cell_rect(tile.pos))
            .collect()
    }

    /// The solid tile occupying the cell that contains `world`, if any.
    pub fn solid_at(&self, world: Vec2) -> Option<&TileRecord> {
        self.get(self.world_to_grid(world))
            .filter(|tile| tile.kind.is_solid())
    }
}

impl SpatialQuery for Tilemap {
    fn physics_rects_around(&self, world: Vec2) -> NearbyRects {
        Tilemap::physics_rects_around(self, world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::tilemap::{GridPos, TileKind};

    fn block_map() -> Tilemap {
        let mut map = Tilemap::new(16);
        for x in -2..=2 {
            for y in -2..=2 {
                map.place(GridPos::new(x, y), TileKind::Stone, 0);
            }
        }
        map
    }

    #[test]
    fn tiles_around_returns_at_most_nine() {
        let map = block_map();
        let tiles = map.tiles_around(Vec2::new(8.0, 8.0));
        assert_eq!(tiles.len(), 9);
        assert!(tiles.iter().all(|t| t.pos.x.abs() <= 1 && t.pos.y.abs() <= 1));
    }

    #[test]
    fn tiles_around_skips_missing_cells() {
        let mut map = Tilemap::new(16);
        map.place(GridPos::new(5, 5), TileKind::Grass, 0);
        map.place(GridPos::new(6, 6), TileKind::Decor, 3);
        map.place(GridPos::new(8, 5), TileKind::Grass, 0);
        let tiles = map.tiles_around(Vec2::new(5.0 * 16.0 + 1.0, 5.0 * 16.0 + 1.0));
        assert_eq!(tiles.len(), 2);
    }

    #[test]
    fn physics_rects_only_include_solid_tiles() {
        let mut map = Tilemap::new(16);
        map.place(GridPos::new(0, 1), TileKind::Grass, 0);
        map.place(GridPos::new(1, 1), TileKind::Decor, 0);
        map.place(GridPos::new(-1, 1), TileKind::Spawners, 0);
        let rects = map.physics_rects_around(Vec2::new(4.0, 4.0));
        assert_eq!(rects.as_slice(), &[Rect::new(0.0, 16.0, 16.0, 16.0)]);
    }

    #[test]
    fn physics_rects_handle_negative_positions() {
        let mut map = Tilemap::new(16);
        map.place(GridPos::new(-1, -1), TileKind::Stone, 0);
        let rects = map.physics_rects_around(Vec2::new(-0.5, -0.5));
        assert_eq!(rects.as_slice(), &[Rect::new(-16.0, -16.0, 16.0, 16.0)]);
    }

    #[test]
    fn solid_at_reads_a_single_cell() {
        let mut map = Tilemap::new(16);
        map.place(GridPos::new(2, 0), TileKind::Stone, 4);
        map.place(GridPos::new(3, 0), TileKind::LargeDecor, 0);

        let hit = map.solid_at(Vec2::new(40.0, 15.0));
        assert_eq!(hit.map(|t| t.pos), Some(GridPos::new(2, 0)));
        assert!(map.solid_at(Vec2::new(50.0, 4.0)).is_none());
        assert!(map.solid_at(Vec2::new(31.9, 4.0)).is_none());
    }

    #[test]
    fn far_positions_saturate_without_overflow() {
        let mut map = Tilemap::new(16);
        map.place(GridPos::new(i32::MAX, 0), TileKind::Stone, 0);
        map.place(GridPos::new(i32::MIN, i32::MIN), TileKind::Grass, 0);

        let far_right = Vec2::new(1.0e12, 0.0);
        assert_eq!(map.tiles_around(far_right).len(), 1);
        assert_eq!(map.physics_rects_around(far_right).len(), 1);
        assert_eq!(map.solid_at(far_right).map(|t| t.pos), Some(GridPos::new(i32::MAX, 0)));

        let far_corner = Vec2::new(-1.0e12, -1.0e12);
        assert_eq!(map.physics_rects_around(far_corner).len(), 1);
        assert!(map.tiles_around(Vec2::new(-1.0e12, 1.0e12)).is_empty());
    }
}
