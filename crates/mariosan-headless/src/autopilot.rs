//! A deliberately simple bot: run right, jump at whatever is in the way.

use mariosan_core::input::{Action, InputLatch};
use mariosan_platformer::LevelRuntime;
use mariosan_platformer::physics::{Body, PROBE_INSET};
use mariosan_platformer::tiles::{TILE_SIZE, TileGrid, tile_coord};

/// How far past the player's leading edge the sensors look.
const LOOK_AHEAD: f32 = TILE_SIZE;
/// Enemies closer than this (leading edge to enemy's left edge) trigger a jump.
const ENEMY_RANGE: f32 = TILE_SIZE * 2.5;

/// Why the autopilot wants to leave the ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Obstacle {
    Wall,
    Pit,
    Spike,
    Enemy,
}

/// Holds right forever and drives the jump button through an `InputLatch`,
/// releasing it for a tick whenever a fresh press is needed.
#[derive(Debug, Default)]
pub struct Autopilot {
    jump_down: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steer(&mut self, runtime: &LevelRuntime, latch: &mut InputLatch) {
        latch.press(Action::MoveRight);

        if wants_jump(runtime) {
            if self.jump_down {
                latch.release(Action::Jump);
                self.jump_down = false;
            } else {
                latch.press(Action::Jump);
                self.jump_down = true;
            }
        } else if self.jump_down {
            latch.release(Action::Jump);
            self.jump_down = false;
        }
    }
}

/// Ground jump when an obstacle is ahead; air jump when falling with no
/// floor underneath.
fn wants_jump(runtime: &LevelRuntime) -> bool {
    let player = runtime.player();
    if !player.is_alive() {
        return false;
    }
    let body = &player.body;
    if body.on_ground {
        return obstacle_ahead(runtime).is_some();
    }
    body.vy > 0.0
        && player.jumps_used < runtime.config().physics.max_jumps
        && !floor_below(runtime.grid(), body)
}

/// First obstacle the sensors pick up in front of a grounded player.
pub fn obstacle_ahead(runtime: &LevelRuntime) -> Option<Obstacle> {
    let grid = runtime.grid();
    let body = &runtime.player().body;
    let ahead_x = body.x + body.w + LOOK_AHEAD;
    let below = body.bottom() + TILE_SIZE / 2.0;

    if grid.tile_at(ahead_x, body.center_y()).is_solid()
        || grid.tile_at(ahead_x, body.bottom() - PROBE_INSET).is_solid()
    {
        return Some(Obstacle::Wall);
    }
    let footing = grid.tile_at(ahead_x, below);
    if footing.is_hazard() || grid.tile_at(ahead_x, body.bottom() - PROBE_INSET).is_hazard() {
        return Some(Obstacle::Spike);
    }
    if !footing.is_solid() {
        return Some(Obstacle::Pit);
    }

    let front = body.x + body.w;
    let enemy_near = runtime.enemies().iter().filter(|e| e.alive).any(|e| {
        let gap = e.body.x - front;
        (0.0..ENEMY_RANGE).contains(&gap) && (e.body.bottom() - body.bottom()).abs() < TILE_SIZE
    });
    enemy_near.then_some(Obstacle::Enemy)
}

/// Anything solid under the player's center or its look-ahead point, all
/// the way down to the bottom of the level.
fn floor_below(grid: &TileGrid, body: &Body) -> bool {
    let from_row = tile_coord(body.bottom());
    let rows = from_row..grid.height() as i32;
    [body.center_x(), body.x + body.w + LOOK_AHEAD]
        .into_iter()
        .map(tile_coord)
        .any(|tx| rows.clone().any(|ty| grid.tile(tx, ty).is_solid()))
}
