use serde::{Deserialize, Serialize};

use mariosan_core::geom::Rect;

use crate::tiles::{TILE_SIZE, TileGrid, tile_coord};

/// Gap left between a body and the tile face it was pushed out of.
pub const CONTACT_EPSILON: f32 = 0.01;
/// Collision probes stay this far inside the body's corners, so a body
/// resting on the floor does not snag on the floor when it walks.
pub const PROBE_INSET: f32 = 2.0;
/// Largest distance a body travels along either axis between collision
/// checks. Kept under a tile so fast falls cannot skip a row.
pub const MAX_STEP: f32 = TILE_SIZE * 0.5;

/// Axis-aligned moving body in world pixels, `y` growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub vx: f32,
    pub vy: f32,
    pub on_ground: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            vx: 0.0,
            vy: 0.0,
            on_ground: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

/// What happens to horizontal velocity when a body walks into a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallResponse {
    /// Player-like: `vx` drops to zero.
    Stop,
    /// Enemy-like: `vx` reverses so patrollers turn around at walls.
    Bounce,
}

/// Scan tiles in order until one is solid or a goal. A goal ends the scan as
/// "not solid", so a flag pole in front of a wall never blocks.
fn scan_solid(tiles: impl Iterator<Item = crate::tiles::Tile>) -> bool {
    for tile in tiles {
        if tile.is_goal() {
            return false;
        }
        if tile.is_solid() {
            return true;
        }
    }
    false
}

/// Any solid tile in the column containing `world_x`, between `y0` and `y1`.
pub fn column_hits_solid(grid: &TileGrid, world_x: f32, y0: f32, y1: f32) -> bool {
    let tx = tile_coord(world_x);
    scan_solid((tile_coord(y0)..=tile_coord(y1)).map(|ty| grid.tile(tx, ty)))
}

/// Any solid tile in the row containing `world_y`, between `x0` and `x1`.
pub fn row_hits_solid(grid: &TileGrid, world_y: f32, x0: f32, x1: f32) -> bool {
    let ty = tile_coord(world_y);
    scan_solid((tile_coord(x0)..=tile_coord(x1)).map(|tx| grid.tile(tx, ty)))
}

/// Integrate a body's velocity over `dt` and push it out of solid tiles,
/// horizontal axis first. Long moves are split into steps of at most
/// `MAX_STEP` so the body cannot pass through a tile in one jump.
///
/// Clears `on_ground` and sets it again only if the body lands this call.
pub fn move_body(body: &mut Body, grid: &TileGrid, dt: f32, response: WallResponse) {
    body.on_ground = false;
    if dt <= 0.0 {
        return;
    }

    let travel = (body.vx * dt).abs().max((body.vy * dt).abs());
    let steps = (travel / MAX_STEP).ceil().clamp(1.0, 64.0) as u32;
    let step_dt = dt / steps as f32;

    for _ in 0..steps {
        step_horizontal(body, grid, step_dt, response);
        if step_vertical(body, grid, step_dt) {
            body.on_ground = true;
        }
    }
}

fn step_horizontal(body: &mut Body, grid: &TileGrid, dt: f32, response: WallResponse) {
    body.x += body.vx * dt;
    let top = body.y + PROBE_INSET;
    let bottom = body.y + body.h - PROBE_INSET;

    if body.vx > 0.0 {
        if column_hits_solid(grid, body.x + body.w, top, bottom) {
            body.x = tile_coord(body.x + body.w) as f32 * TILE_SIZE - body.w - CONTACT_EPSILON;
            body.vx = match response {
                WallResponse::Stop => 0.0,
                WallResponse::Bounce => -body.vx.abs(),
            };
        }
    } else if body.vx < 0.0 && column_hits_solid(grid, body.x, top, bottom) {
        body.x = (tile_coord(body.x) + 1) as f32 * TILE_SIZE + CONTACT_EPSILON;
        body.vx = match response {
            WallResponse::Stop => 0.0,
            WallResponse::Bounce => body.vx.abs(),
        };
    }
}

/// Returns true when the body landed on a solid tile.
fn step_vertical(body: &mut Body, grid: &TileGrid, dt: f32) -> bool {
    body.y += body.vy * dt;
    let left = body.x + PROBE_INSET;
    let right = body.x + body.w - PROBE_INSET;

    if body.vy > 0.0 {
        if row_hits_solid(grid, body.y + body.h, left, right) {
            body.y = tile_coord(body.y + body.h) as f32 * TILE_SIZE - body.h - CONTACT_EPSILON;
            body.vy = 0.0;
            return true;
        }
    } else if body.vy < 0.0 && row_hits_solid(grid, body.y, left, right) {
        body.y = (tile_coord(body.y) + 1) as f32 * TILE_SIZE + CONTACT_EPSILON;
        body.vy = 0.0;
    }
    false
}
