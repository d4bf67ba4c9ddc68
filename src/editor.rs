//! Headless level editing.
//!
//! [`EditorSession`] owns the map being edited plus the brush state: which
//! tile category and variant is selected and whether painting snaps to the
//! grid. Input handling and drawing live outside; callers translate mouse
//! and key events into the methods below, passing world-space positions.

use std::path::Path;

use glam::Vec2;
use log::{debug, info};

use crate::resources::tilemap::{OffgridTile, TileId, TileKind, Tilemap, TilemapError};
use crate::systems::render::AssetRegistry;

/// One palette group: a tile category and how many images it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    pub kind: TileKind,
    pub variants: u32,
}

pub struct EditorSession {
    tilemap: Tilemap,
    palette: Vec<PaletteEntry>,
    group: usize,
    variant: u32,
    ongrid: bool,
}

impl EditorSession {
    /// Start editing `tilemap` with a palette built from `assets`.
    ///
    /// Categories with no images are left out of the palette.
    pub fn new(tilemap: Tilemap, assets: &dyn AssetRegistry) -> Self {
        let palette = TileKind::ALL
            .iter()
            .map(|&kind| PaletteEntry {
                kind,
                variants: assets.variant_count(kind),
            })
            .filter(|entry| entry.variants > 0)
            .collect();
        EditorSession {
            tilemap,
            palette,
            group: 0,
            variant: 0,
            ongrid: true,
        }
    }

    pub fn tilemap(&self) -> &Tilemap {
        &self.tilemap
    }

    pub fn into_tilemap(self) -> Tilemap {
        self.tilemap
    }

    pub fn palette(&self) -> &[PaletteEntry] {
        &self.palette
    }

    pub fn ongrid(&self) -> bool {
        self.ongrid
    }

    /// Selected `(kind, variant)`, or `None` with an empty palette.
    pub fn current(&self) -> Option<TileId> {
        self.palette.get(self.group).map(|entry| (entry.kind, self.variant))
    }

    /// Move to the next (`forward`) or previous group, wrapping around.
    /// The variant resets to 0.
    pub fn cycle_group(&mut self, forward: bool) {
        let count = self.palette.len();
        if count == 0 {
            return;
        }
        self.group = if forward {
            (self.group + 1) % count
        } else {
            (self.group + count - 1) % count
        };
        self.variant = 0;
    }

    /// Move to the next or previous variant within the group, wrapping around.
    pub fn cycle_variant(&mut self, forward: bool) {
        let Some(entry) = self.palette.get(self.group) else {
            return;
        };
        let count = entry.variants;
        self.variant = if forward {
            (self.variant + 1) % count
        } else {
            (self.variant + count - 1) % count
        };
    }

    pub fn toggle_ongrid(&mut self) {
        self.ongrid = !self.ongrid;
        debug!("Editor on-grid placement: {}", self.ongrid);
    }

    /// Place the selected tile at a world position.
    ///
    /// On grid the containing cell is overwritten; off grid a decoration is
    /// appended at the exact position.
    pub fn paint(&mut self, world: Vec2) {
        let Some((kind, variant)) = self.current() else {
            return;
        };
        if self.ongrid {
            let pos = self.tilemap.world_to_grid(world);
            self.tilemap.place(pos, kind, variant);
        } else {
            self.tilemap.add_decoration(OffgridTile::new(kind, variant, world));
        }
    }

    /// Erase at a world position: the containing grid cell plus every
    /// decoration whose image covers the point. Returns the number removed.
    pub fn erase(&mut self, world: Vec2, assets: &dyn AssetRegistry) -> usize {
        let mut removed = 0;
        let pos = self.tilemap.world_to_grid(world);
        if self.tilemap.remove(pos).is_some() {
            removed += 1;
        }

        let hit: Vec<OffgridTile> = self
            .tilemap
            .decorations()
            .iter()
            .filter(|tile| {
                assets
                    .decoration_rect(tile)
                    .is_some_and(|rect| rect.contains_point(world))
            })
            .copied()
            .collect();
        for tile in &hit {
            if self.tilemap.remove_decoration(tile) {
                removed += 1;
            }
        }
        removed
    }

    /// Autotile the whole map. Returns the number of tiles changed.
    pub fn autotile(&mut self) -> usize {
        let changed = self.tilemap.autotile();
        info!("Autotile updated {} tiles", changed);
        changed
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TilemapError> {
        self.tilemap.save(path)
    }
}
