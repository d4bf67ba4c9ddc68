//! Tilemap drawing contract.
//!
//! Pixels are pushed by an external renderer. This module decides *what* is
//! visible and *where* it goes on screen, then hands each tile to a
//! [`RenderSurface`]. Decorations are drawn first, followed by the grid
//! cells inside the camera view.

use glam::{IVec2, Vec2};

use crate::geometry::Rect;
use crate::resources::tilemap::{GridPos, OffgridTile, TileKind, Tilemap};

/// Image metadata provided by the asset loader.
pub trait AssetRegistry {
    /// Pixel size of the image for `(kind, variant)`, if loaded.
    fn dimensions(&self, kind: TileKind, variant: u32) -> Option<(u32, u32)>;

    /// Number of images available for a category.
    fn variant_count(&self, kind: TileKind) -> u32;

    /// World-space rectangle covered by a decoration's image.
    fn decoration_rect(&self, tile: &OffgridTile) -> Option<Rect> {
        self.dimensions(tile.kind, tile.variant)
            .map(|(w, h)| Rect::new(tile.pos.x, tile.pos.y, w as f32, h as f32))
    }
}

/// Destination that can draw tile images.
pub trait RenderSurface {
    /// Surface size in pixels.
    fn size(&self) -> (u32, u32);

    /// Draw the image for `(kind, variant)` with its top-left at `screen_pos`.
    fn blit(&mut self, kind: TileKind, variant: u32, screen_pos: Vec2);
}

/// Inclusive range of grid cells touched by a view of `size` pixels at `offset`.
pub fn visible_cells(tile_size: u32, offset: IVec2, size: (u32, u32)) -> (GridPos, GridPos) {
    let ts = tile_size.max(1) as i32;
    let min = GridPos::new(offset.x.div_euclid(ts), offset.y.div_euclid(ts));
    let max = GridPos::new(
        offset.x.saturating_add_unsigned(size.0).div_euclid(ts),
        offset.y.saturating_add_unsigned(size.1).div_euclid(ts),
    );
    (min, max)
}

/// Draw the map as seen by a camera whose top-left corner is at `offset`.
///
/// Returns the number of blits issued.
pub fn render_tilemap<S: RenderSurface + ?Sized>(
    tilemap: &Tilemap,
    surface: &mut S,
    offset: IVec2,
) -> usize {
    let camera = offset.as_vec2();
    let mut drawn = 0;

    for tile in tilemap.decorations() {
        surface.blit(tile.kind, tile.variant, tile.pos - camera);
        drawn += 1;
    }

    let (min, max) = visible_cells(tilemap.tile_size(), offset, surface.size());
    for x in min.x..=max.x {
        for y in min.y..=max.y {
            if let Some(tile) = tilemap.get(GridPos::new(x, y)) {
                surface.blit(tile.kind, tile.variant, tilemap.grid_to_world(tile.pos) - camera);
                drawn += 1;
            }
        }
    }

    drawn
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        size: (u32, u32),
        blits: Vec<(TileKind, u32, Vec2)>,
    }

    impl RenderSurface for Recorder {
        fn size(&self) -> (u32, u32) {
            self.size
        }

        fn blit(&mut self, kind: TileKind, variant: u32, screen_pos: Vec2) {
            self.blits.push((kind, variant, screen_pos));
        }
    }

    #[test]
    fn visible_range_includes_margin_cell() {
        let (min, max) = visible_cells(16, IVec2::new(0, 0), (320, 240));
        assert_eq!(min, GridPos::new(0, 0));
        assert_eq!(max, GridPos::new(20, 15));

        let (min, max) = visible_cells(16, IVec2::new(-8, 40), (32, 32));
        assert_eq!(min, GridPos::new(-1, 2));
        assert_eq!(max, GridPos::new(1, 4));
    }

    #[test]
    fn visible_range_saturates_at_the_grid_edge() {
        let offset = IVec2::new(i32::MAX - 10, i32::MIN);
        let (min, max) = visible_cells(16, offset, (320, u32::MAX));
        assert_eq!(min, GridPos::new((i32::MAX - 10).div_euclid(16), i32::MIN / 16));
        assert_eq!(max, GridPos::new(i32::MAX / 16, i32::MAX / 16));
    }

    #[test]
    fn decorations_first_then_visible_grid_tiles() {
        let mut map = Tilemap::new(16);
        map.place(GridPos::new(1, 1), TileKind::Stone, 3);
        map.place(GridPos::new(100, 1), TileKind::Stone, 3);
        map.add_decoration(OffgridTile::new(TileKind::Decor, 2, Vec2::new(500.0, 7.5)));

        let mut surface = Recorder {
            size: (64, 64),
            blits: Vec::new(),
        };
        let drawn = render_tilemap(&map, &mut surface, IVec2::new(10, 4));

        assert_eq!(drawn, 2);
        assert_eq!(surface.blits[0], (TileKind::Decor, 2, Vec2::new(490.0, 3.5)));
        assert_eq!(surface.blits[1], (TileKind::Stone, 3, Vec2::new(6.0, 12.0)));
    }

    struct FixedAssets;

    impl AssetRegistry for FixedAssets {
        fn dimensions(&self, kind: TileKind, _variant: u32) -> Option<(u32, u32)> {
            match kind {
                TileKind::LargeDecor => Some((32, 24)),
                _ => Some((16, 16)),
            }
        }

        fn variant_count(&self, _kind: TileKind) -> u32 {
            4
        }
    }

    #[test]
    fn decoration_rect_uses_image_size() {
        let tile = OffgridTile::new(TileKind::LargeDecor, 0, Vec2::new(5.0, 6.0));
        assert_eq!(FixedAssets.decoration_rect(&tile), Some(Rect::new(5.0, 6.0, 32.0, 24.0)));
    }
}
