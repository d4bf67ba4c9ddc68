//! Sparse tile grid resource.
//!
//! The [`Tilemap`] owns every tile of a level: grid-resident tiles keyed by
//! their integer [`GridPos`], and an ordered list of free-floating decoration
//! tiles ([`OffgridTile`]) positioned in world pixels.
//!
//! The map is inserted into the ECS world as a resource and borrowed by the
//! physics and render systems. All mutation happens through the methods in
//! this module; submodules add the read-side queries and whole-map passes:
//!
//! - [`query`] – neighbourhood lookups and collision rectangles
//! - [`autotile`] – variant selection from same-kind neighbour connectivity
//! - [`persistence`] – JSON map documents on disk

use std::fmt;

use bevy_ecs::prelude::Resource;
use glam::Vec2;
use log::warn;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

pub mod autotile;
pub mod persistence;
pub mod query;

pub use persistence::TilemapError;

/// Tile edge length used by the editor and the game when none is configured.
pub const DEFAULT_TILE_SIZE: u32 = 16;

/// Integer cell coordinate on the tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell displaced by `(dx, dy)`, or `None` past the edge of the `i32` grid.
    pub const fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        match (self.x.checked_add(dx), self.y.checked_add(dy)) {
            (Some(x), Some(y)) => Some(Self::new(x, y)),
            _ => None,
        }
    }

    /// Canonical `"x;y"` key used by the map file format.
    pub fn to_key(self) -> String {
        self.to_string()
    }

    /// Parse a canonical `"x;y"` key.
    ///
    /// Only the exact form produced by [`GridPos::to_key`] is accepted, so
    /// `"+1;0"` or `"01;0"` are rejected.
    pub fn from_key(key: &str) -> Option<Self> {
        let (x, y) = key.split_once(';')?;
        let pos = Self::new(x.parse().ok()?, y.parse().ok()?);
        (pos.to_key() == key).then_some(pos)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.x, self.y)
    }
}

/// Closed set of tile categories a map may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Grass,
    Stone,
    Decor,
    LargeDecor,
    Spawners,
}

impl TileKind {
    /// Every category, in editor palette order.
    pub const ALL: [TileKind; 5] = [
        TileKind::Decor,
        TileKind::Grass,
        TileKind::LargeDecor,
        TileKind::Stone,
        TileKind::Spawners,
    ];

    /// Solid tiles block physics bodies and answer point lookups.
    pub fn is_solid(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Stone)
    }

    /// Categories whose variant is chosen by the autotile pass.
    pub fn is_autotiled(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Stone)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TileKind::Grass => "grass",
            TileKind::Stone => "stone",
            TileKind::Decor => "decor",
            TileKind::LargeDecor => "large_decor",
            TileKind::Spawners => "spawners",
        }
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(category, variant)` pair identifying one tile image.
pub type TileId = (TileKind, u32);

/// A tile stored on the grid. `pos` always equals its grid key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRecord {
    pub kind: TileKind,
    pub variant: u32,
    pub pos: GridPos,
}

impl TileRecord {
    pub fn new(kind: TileKind, variant: u32, pos: GridPos) -> Self {
        Self { kind, variant, pos }
    }

    pub fn id(&self) -> TileId {
        (self.kind, self.variant)
    }
}

/// A tile placed freely in world space, outside the grid.
///
/// Decorations use this shape, and so does the output of
/// [`Tilemap::extract`] where grid tiles are converted to pixel positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffgridTile {
    pub kind: TileKind,
    pub variant: u32,
    pub pos: Vec2,
}

impl OffgridTile {
    pub fn new(kind: TileKind, variant: u32, pos: Vec2) -> Self {
        Self { kind, variant, pos }
    }

    pub fn id(&self) -> TileId {
        (self.kind, self.variant)
    }
}

/// Level tile storage: the sparse grid plus the decoration list.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Tilemap {
    tile_size: u32,
    grid: FxHashMap<GridPos, TileRecord>,
    offgrid: Vec<OffgridTile>,
}

impl Default for Tilemap {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_SIZE)
    }
}

impl Tilemap {
    /// Create an empty map. A zero tile size is bumped to 1.
    pub fn new(tile_size: u32) -> Self {
        if tile_size == 0 {
            warn!("Tilemap::new called with tile_size 0, using 1");
        }
        Self {
            tile_size: tile_size.max(1),
            grid: FxHashMap::default(),
            offgrid: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        tile_size: u32,
        grid: FxHashMap<GridPos, TileRecord>,
        offgrid: Vec<OffgridTile>,
    ) -> Self {
        Self {
            tile_size,
            grid,
            offgrid,
        }
    }

    /// Edge length of a tile in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Insert or overwrite the tile at `pos`.
    pub fn place(&mut self, pos: GridPos, kind: TileKind, variant: u32) {
        self.grid.insert(pos, TileRecord::new(kind, variant, pos));
    }

    /// Delete the tile at `pos`, returning it if there was one.
    pub fn remove(&mut self, pos: GridPos) -> Option<TileRecord> {
        self.grid.remove(&pos)
    }

    pub fn get(&self, pos: GridPos) -> Option<&TileRecord> {
        self.grid.get(&pos)
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.grid.contains_key(&pos)
    }

    /// Number of grid-resident tiles.
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty() && self.offgrid.is_empty()
    }

    /// Grid tiles in unspecified order.
    pub fn tiles(&self) -> impl Iterator<Item = &TileRecord> {
        self.grid.values()
    }

    /// Decorations in placement order.
    pub fn decorations(&self) -> &[OffgridTile] {
        &self.offgrid
    }

    pub fn add_decoration(&mut self, tile: OffgridTile) {
        self.offgrid.push(tile);
    }

    /// Erase the first decoration equal to `tile`. Returns whether one was removed.
    pub fn remove_decoration(&mut self, tile: &OffgridTile) -> bool {
        match self.offgrid.iter().position(|t| t == tile) {
            Some(index) => {
                self.offgrid.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drop every tile and decoration, keeping the tile size.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.offgrid.clear();
    }

    /// Copy out every tile whose `(kind, variant)` is listed in `ids`.
    ///
    /// Matching decorations come first in list order, followed by matching
    /// grid tiles in unspecified order. Grid copies carry their pixel
    /// position (`grid * tile_size`). When `keep` is false the matches are
    /// removed from the map.
    pub fn extract(&mut self, ids: &[TileId], keep: bool) -> Vec<OffgridTile> {
        let mut matches = Vec::new();

        if keep {
            matches.extend(self.offgrid.iter().filter(|t| ids.contains(&t.id())).copied());
        } else {
            self.offgrid.retain(|t| {
                if ids.contains(&t.id()) {
                    matches.push(*t);
                    false
                } else {
                    true
                }
            });
        }

        let tile_size = self.tile_size as f32;
        let to_pixels = |t: &TileRecord| {
            OffgridTile::new(
                t.kind,
                t.variant,
                Vec2::new(t.pos.x as f32 * tile_size, t.pos.y as f32 * tile_size),
            )
        };

        if keep {
            matches.extend(
                self.grid
                    .values()
                    .filter(|t| ids.contains(&t.id()))
                    .map(to_pixels),
            );
        } else {
            self.grid.retain(|_, t| {
                if ids.contains(&t.id()) {
                    matches.push(to_pixels(t));
                    false
                } else {
                    true
                }
            });
        }

        matches
    }

    /// Grid cell containing a world position (floor division).
    pub fn world_to_grid(&self, world: Vec2) -> GridPos {
        let ts = self.tile_size as f32;
        GridPos::new((world.x / ts).floor() as i32, (world.y / ts).floor() as i32)
    }

    /// Top-left pixel of a grid cell.
    pub fn grid_to_world(&self, pos: GridPos) -> Vec2 {
        let ts = self.tile_size as f32;
        Vec2::new(pos.x as f32 * ts, pos.y as f32 * ts)
    }

    /// World-space rectangle covered by a grid cell.
    pub fn cell_rect(&self, pos: GridPos) -> Rect {
        let ts = self.tile_size as f32;
        Rect::from_pos_size(self.grid_to_world(pos), Vec2::splat(ts))
    }
}
