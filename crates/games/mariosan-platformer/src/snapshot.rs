//! Read-only view of a running level for a presentation layer.
//!
//! Everything here is plain data: a renderer draws from a `RenderSnapshot`
//! without holding a reference into the simulation.

use serde::{Deserialize, Serialize};

use mariosan_core::game_trait::Phase;

use crate::camera::Camera;
use crate::enemies::Enemy;
use crate::level::EnemyKind;
use crate::player::{Facing, Player, Pose};
use crate::projectiles::{Projectile, Rgb};
use crate::tiles::{Tile, TileGrid};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub facing: Facing,
    pub pose: Pose,
    pub alive: bool,
    pub won: bool,
}

impl From<&Player> for PlayerView {
    fn from(p: &Player) -> Self {
        Self {
            x: p.body.x,
            y: p.body.y,
            w: p.body.w,
            h: p.body.h,
            facing: p.facing,
            pose: p.pose(),
            alive: p.is_alive(),
            won: p.won,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u32,
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Sprites face right by default and are mirrored when this is set.
    pub facing_left: bool,
    /// Boss only.
    pub hits_taken: Option<u32>,
}

impl From<&Enemy> for EnemyView {
    fn from(e: &Enemy) -> Self {
        Self {
            id: e.id,
            kind: e.kind,
            x: e.body.x,
            y: e.body.y,
            w: e.body.w,
            h: e.body.h,
            facing_left: e.dir < 0.0,
            hits_taken: e.boss.map(|b| b.hits_taken),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub core: Rgb,
    pub edge: Rgb,
}

impl From<&Projectile> for ProjectileView {
    fn from(p: &Projectile) -> Self {
        Self {
            x: p.x,
            y: p.y,
            w: p.w,
            h: p.h,
            core: p.core,
            edge: p.edge,
        }
    }
}

/// The on-screen slice of the tile grid, row-major over `columns x rows`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileWindow {
    pub first_column: u32,
    pub columns: u32,
    pub rows: u32,
    pub tiles: Vec<Tile>,
}

impl TileWindow {
    pub fn capture(grid: &TileGrid, camera: &Camera) -> Self {
        let range = camera.visible_columns(grid);
        let rows = grid.height();
        let mut tiles = Vec::with_capacity(range.len() * rows as usize);
        for ty in 0..rows {
            for tx in range.clone() {
                tiles.push(grid.tile(tx as i32, ty as i32));
            }
        }
        Self {
            first_column: range.start,
            columns: range.end - range.start,
            rows,
            tiles,
        }
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub level_index: usize,
    pub level_name: String,
    pub theme: Option<String>,
    pub phase: Phase,
    /// Level size in tiles.
    pub level_width: u32,
    pub level_height: u32,
    pub camera: Camera,
    /// Seconds of play since the level started, for sprite animation.
    pub anim_time: f32,
    pub tiles: TileWindow,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
}
