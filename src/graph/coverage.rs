//! Data Coverage
//!
//! Which parts of the map have been loaded. Connectivity checks consult this
//! before judging a vertex, since a road that looks isolated may connect to
//! data that simply has not been downloaded yet.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::entity::Loc;

/// Zoom level at which map data is loaded
pub const TILE_ZOOM: u32 = 16;

const MAX_LAT: f64 = 85.051_128_779_806_6;

/// Probe answering "has the data around this location been loaded?"
///
/// Implementations must answer immediately; anything unknown is reported as
/// not loaded.
pub trait DataAvailability {
    fn is_data_loaded(&self, loc: Loc) -> bool;
}

/// Slippy-map tile at [`TILE_ZOOM`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
}

impl Tile {
    /// The tile containing `loc`
    pub fn containing(loc: Loc) -> Self {
        let n = f64::from(1u32 << TILE_ZOOM);
        let lat = loc.lat.clamp(-MAX_LAT, MAX_LAT).to_radians();
        let lon = loc.lon.clamp(-180.0, 180.0);

        let x = ((lon + 180.0) / 360.0 * n).floor();
        let y = ((1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) / 2.0 * n).floor();

        let max = n - 1.0;
        Self {
            x: x.clamp(0.0, max) as u32,
            y: y.clamp(0.0, max) as u32,
        }
    }
}

/// Explicit set of loaded tiles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileCoverage {
    tiles: HashSet<Tile>,
}

impl TileCoverage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tile: Tile) {
        self.tiles.insert(tile);
    }

    /// Mark the tile around `loc` as loaded
    pub fn insert_loc(&mut self, loc: Loc) {
        self.insert(Tile::containing(loc));
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl FromIterator<Tile> for TileCoverage {
    fn from_iter<I: IntoIterator<Item = Tile>>(iter: I) -> Self {
        Self {
            tiles: iter.into_iter().collect(),
        }
    }
}

impl DataAvailability for TileCoverage {
    fn is_data_loaded(&self, loc: Loc) -> bool {
        self.tiles.contains(&Tile::containing(loc))
    }
}

/// Everything is loaded (local files, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct AllLoaded;

impl DataAvailability for AllLoaded {
    fn is_data_loaded(&self, _loc: Loc) -> bool {
        true
    }
}

/// Coverage attached to a loaded document
#[derive(Debug, Clone, PartialEq)]
pub enum Coverage {
    All,
    Tiles(TileCoverage),
}

impl DataAvailability for Coverage {
    fn is_data_loaded(&self, loc: Loc) -> bool {
        match self {
            Coverage::All => true,
            Coverage::Tiles(tiles) => tiles.is_data_loaded(loc),
        }
    }
}
