//! JSON map documents.
//!
//! # File Format
//!
//! ```json
//! {
//!   "tilemap": {
//!     "3;2": { "type": "stone", "variant": 1, "pos": [3, 2] }
//!   },
//!   "tile_size": 16,
//!   "offgrid": [
//!     { "type": "large_decor", "variant": 2, "pos": [40.5, 12.0] }
//!   ]
//! }
//! ```
//!
//! Loading parses into a staging [`MapDocument`] and validates it completely
//! before a [`Tilemap`] is built, so a malformed file never leaves a live map
//! half-updated.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glam::Vec2;
use log::{info, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::{GridPos, OffgridTile, TileKind, TileRecord, Tilemap};

/// Failure while reading or writing a map file.
#[derive(Debug)]
pub enum TilemapError {
    /// The map file does not exist. Callers usually start from an empty map.
    NotFound(PathBuf),
    /// The document is not a valid map.
    Malformed(String),
    /// Any other I/O failure.
    Io(io::Error),
}

impl fmt::Display for TilemapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TilemapError::NotFound(path) => write!(f, "Map file '{}' not found", path.display()),
            TilemapError::Malformed(msg) => write!(f, "Malformed map data: {}", msg),
            TilemapError::Io(e) => write!(f, "Map file I/O error: {}", e),
        }
    }
}

impl Error for TilemapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TilemapError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TilemapError {
    fn from(e: serde_json::Error) -> Self {
        TilemapError::Malformed(e.to_string())
    }
}

/// Grid tile as written in the file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridTileDoc {
    #[serde(rename = "type")]
    kind: TileKind,
    variant: u32,
    pos: [i32; 2],
}

/// Decoration as written in the file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct OffgridTileDoc {
    #[serde(rename = "type")]
    kind: TileKind,
    variant: u32,
    pos: [f32; 2],
}

/// Top-level map document.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct MapDocument {
    tilemap: BTreeMap<String, GridTileDoc>,
    tile_size: u32,
    offgrid: Vec<OffgridTileDoc>,
}

impl MapDocument {
    fn from_tilemap(map: &Tilemap) -> Self {
        let tilemap = map
            .tiles()
            .map(|t| {
                (
                    t.pos.to_key(),
                    GridTileDoc {
                        kind: t.kind,
                        variant: t.variant,
                        pos: [t.pos.x, t.pos.y],
                    },
                )
            })
            .collect();
        let offgrid = map
            .decorations()
            .iter()
            .map(|t| OffgridTileDoc {
                kind: t.kind,
                variant: t.variant,
                pos: [t.pos.x, t.pos.y],
            })
            .collect();
        Self {
            tilemap,
            tile_size: map.tile_size(),
            offgrid,
        }
    }

    /// Validate the staged document and build a map from it.
    fn into_tilemap(self) -> Result<Tilemap, TilemapError> {
        if self.tile_size == 0 {
            return Err(TilemapError::Malformed("tile_size must be positive".into()));
        }

        let mut grid = FxHashMap::default();
        for (key, doc) in self.tilemap {
            let pos = GridPos::from_key(&key).ok_or_else(|| {
                TilemapError::Malformed(format!("invalid grid key '{}'", key))
            })?;
            if pos != GridPos::new(doc.pos[0], doc.pos[1]) {
                return Err(TilemapError::Malformed(format!(
                    "grid key '{}' does not match tile pos [{}, {}]",
                    key, doc.pos[0], doc.pos[1]
                )));
            }
            grid.insert(pos, TileRecord::new(doc.kind, doc.variant, pos));
        }

        let offgrid = self
            .offgrid
            .into_iter()
            .map(|doc| OffgridTile::new(doc.kind, doc.variant, Vec2::new(doc.pos[0], doc.pos[1])))
            .collect();

        Ok(Tilemap::from_parts(self.tile_size, grid, offgrid))
    }
}

impl Tilemap {
    /// Serialize to a pretty-printed JSON document with sorted grid keys.
    pub fn to_json(&self) -> Result<String, TilemapError> {
        Ok(serde_json::to_string_pretty(&MapDocument::from_tilemap(self))?)
    }

    /// Parse and validate a JSON map document.
    pub fn from_json(json: &str) -> Result<Self, TilemapError> {
        let doc: MapDocument = serde_json::from_str(json)?;
        doc.into_tilemap()
    }

    /// Write the map to `path`, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TilemapError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(TilemapError::Io)?;
        }
        fs::write(path, json).map_err(TilemapError::Io)?;
        info!(
            "Saved map to {:?} ({} tiles, {} decorations)",
            path,
            self.len(),
            self.decorations().len()
        );
        Ok(())
    }

    /// Read a map from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TilemapError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => TilemapError::NotFound(path.to_path_buf()),
            _ => TilemapError::Io(e),
        })?;
        let map = Self::from_json(&json)?;
        info!(
            "Loaded map from {:?} ({} tiles, {} decorations, tile_size={})",
            path,
            map.len(),
            map.decorations().len(),
            map.tile_size()
        );
        Ok(map)
    }

    /// Replace this map with the contents of `path`. On error `self` is unchanged.
    pub fn load_into(&mut self, path: impl AsRef<Path>) -> Result<(), TilemapError> {
        *self = Self::load(path)?;
        Ok(())
    }

    /// Load `path`, falling back to an empty map when the file does not exist.
    ///
    /// Every other failure is returned, since it means the authoring data is
    /// corrupt.
    pub fn load_or_empty(path: impl AsRef<Path>, tile_size: u32) -> Result<Self, TilemapError> {
        match Self::load(path) {
            Err(TilemapError::NotFound(missing)) => {
                warn!("No map at {:?}, starting with an empty map", missing);
                Ok(Self::new(tile_size))
            }
            other => other,
        }
    }
}
