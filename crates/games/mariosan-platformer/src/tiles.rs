use serde::{Deserialize, Serialize};

use crate::error::LevelError;

/// Tile size in world pixels.
pub const TILE_SIZE: f32 = 32.0;

/// Tile kinds for the level grid. Serialized as the numeric codes used by
/// level files (0 empty, 1 ground, 2 platform, 3 spike, 4 flag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Tile {
    Empty,
    Ground,
    Platform,
    Spike,
    Flag,
}

impl Tile {
    /// Ground and Platform block movement.
    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Ground | Tile::Platform)
    }

    /// Spikes kill on contact but never block.
    pub fn is_hazard(self) -> bool {
        matches!(self, Tile::Spike)
    }

    pub fn is_goal(self) -> bool {
        matches!(self, Tile::Flag)
    }
}

impl TryFrom<u8> for Tile {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Tile::Empty),
            1 => Ok(Tile::Ground),
            2 => Ok(Tile::Platform),
            3 => Ok(Tile::Spike),
            4 => Ok(Tile::Flag),
            other => Err(format!("unknown tile code {other}")),
        }
    }
}

impl From<Tile> for u8 {
    fn from(tile: Tile) -> u8 {
        match tile {
            Tile::Empty => 0,
            Tile::Ground => 1,
            Tile::Platform => 2,
            Tile::Spike => 3,
            Tile::Flag => 4,
        }
    }
}

/// A level's tile map, stored row-major (`y * width + x`), `y` growing
/// downward. Only constructed through `new` (validated) or `empty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Wrap a flat tile array, checking it matches the dimensions.
    pub fn new(width: u32, height: u32, tiles: Vec<Tile>) -> Result<Self, LevelError> {
        if width == 0 || height == 0 {
            return Err(LevelError::EmptyGrid);
        }
        if tiles.len() as u64 != width as u64 * height as u64 {
            return Err(LevelError::TileCountMismatch {
                width,
                height,
                actual: tiles.len(),
            });
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// A grid of `width x height` empty tiles, for authoring.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::Empty; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * TILE_SIZE
    }

    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * TILE_SIZE
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn contains(&self, tx: i32, ty: i32) -> bool {
        tx >= 0 && ty >= 0 && tx < self.width as i32 && ty < self.height as i32
    }

    /// Tile at grid coordinates. Anything outside the grid is `Empty`.
    pub fn tile(&self, tx: i32, ty: i32) -> Tile {
        if !self.contains(tx, ty) {
            return Tile::Empty;
        }
        self.tiles[ty as usize * self.width as usize + tx as usize]
    }

    /// Tile containing the world-pixel point.
    pub fn tile_at(&self, world_x: f32, world_y: f32) -> Tile {
        self.tile(tile_coord(world_x), tile_coord(world_y))
    }

    pub fn non_empty_count(&self) -> usize {
        self.tiles.iter().filter(|&&t| t != Tile::Empty).count()
    }

    pub fn set(&mut self, tx: u32, ty: u32, tile: Tile) {
        if tx < self.width && ty < self.height {
            self.tiles[ty as usize * self.width as usize + tx as usize] = tile;
        }
    }

    /// Fill a `w x h` block whose top-left tile is `(tx, ty)`; cells past
    /// the grid edge are skipped.
    pub fn fill_rect(&mut self, tx: u32, ty: u32, w: u32, h: u32, tile: Tile) {
        for y in ty..ty.saturating_add(h) {
            for x in tx..tx.saturating_add(w) {
                self.set(x, y, tile);
            }
        }
    }

    pub fn clear_rect(&mut self, tx: u32, ty: u32, w: u32, h: u32) {
        self.fill_rect(tx, ty, w, h, Tile::Empty);
    }
}

/// World pixel to tile index (floor division, so negatives map below 0).
pub fn tile_coord(world: f32) -> i32 {
    (world / TILE_SIZE).floor() as i32
}
