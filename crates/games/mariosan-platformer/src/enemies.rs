use serde::{Deserialize, Serialize};

use crate::config::EnemyConfig;
use crate::level::{BossTuning, EnemyKind, EnemySpawn, Patrol};
use crate::physics::{Body, WallResponse, move_body};
use crate::player::{DeathCause, Player};
use crate::tiles::{TILE_SIZE, TileGrid};

/// Edge length of a regular enemy's hitbox.
pub const ENEMY_SIZE: f32 = TILE_SIZE * 0.9;
/// Edge length of the boss's hitbox.
pub const BOSS_SIZE: f32 = TILE_SIZE * 2.0;
/// How far ahead of and below the leading foot the ledge probe looks.
const LEDGE_PROBE: f32 = 2.0;
/// Minimum `|vx|` for the facing direction to follow velocity.
const FACING_MIN_SPEED: f32 = 1.0;

impl EnemyKind {
    pub fn speed_multiplier(self) -> f32 {
        match self {
            EnemyKind::Walker | EnemyKind::Goomba => 1.0,
            EnemyKind::Turtle => 0.75,
            EnemyKind::Mouse => 1.35,
            EnemyKind::Boss => 0.5,
        }
    }

    pub fn size(self) -> f32 {
        match self {
            EnemyKind::Boss => BOSS_SIZE,
            _ => ENEMY_SIZE,
        }
    }

    /// Turns around instead of walking off a ledge.
    pub fn avoids_ledges(self) -> bool {
        !matches!(self, EnemyKind::Walker)
    }

    /// Turns around at the edges of its patrol range.
    pub fn follows_patrol(self) -> bool {
        matches!(self, EnemyKind::Walker | EnemyKind::Boss)
    }
}

/// Boss-only mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BossState {
    pub hits_taken: u32,
    /// Seconds until the next burst may fire.
    pub fire_cooldown: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub body: Body,
    /// +1 walking right, -1 walking left.
    pub dir: f32,
    pub speed: f32,
    pub patrol: Option<Patrol>,
    pub alive: bool,
    pub boss: Option<BossState>,
}

impl Enemy {
    /// Build an enemy standing on top of its spawn tile row, facing left.
    pub fn spawn(id: u32, spawn: &EnemySpawn, cfg: &EnemyConfig) -> Self {
        let size = spawn.kind.size();
        let base = match spawn.kind {
            EnemyKind::Boss => cfg.boss_base_speed,
            _ => cfg.base_speed,
        };
        Self {
            id,
            kind: spawn.kind,
            body: Body::new(
                spawn.x as f32 * TILE_SIZE,
                spawn.y as f32 * TILE_SIZE - size,
                size,
                size,
            ),
            dir: -1.0,
            speed: base * spawn.kind.speed_multiplier(),
            patrol: spawn.patrol,
            alive: true,
            boss: (spawn.kind == EnemyKind::Boss).then_some(BossState {
                hits_taken: 0,
                fire_cooldown: 0.0,
            }),
        }
    }

    pub fn is_boss(&self) -> bool {
        self.kind == EnemyKind::Boss
    }

    /// Fell more than `margin` below the bottom of a level `level_height` px tall.
    pub fn fell_out(&self, level_height: f32, margin: f32) -> bool {
        self.body.y > level_height + margin
    }
}

/// World state an enemy reacts to during its update.
pub struct BehaviorContext<'a> {
    pub grid: &'a TileGrid,
    pub gravity: f32,
    pub player_center_x: f32,
    /// Horizontal distance (px) within which the boss breathes fire.
    pub fire_range: f32,
    pub tuning: BossTuning,
}

/// Something an enemy asks the runtime to do after its update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyAction {
    Idle,
    BreatheFire,
}

/// Run one tick of an enemy's behavior and movement.
pub fn update_enemy(enemy: &mut Enemy, ctx: &BehaviorContext<'_>, dt: f32) -> EnemyAction {
    if enemy.kind.follows_patrol()
        && let Some(patrol) = enemy.patrol
    {
        turn_at_patrol_bounds(enemy, patrol);
    }

    enemy.body.vx = enemy.speed * enemy.dir;
    enemy.body.vy += ctx.gravity * dt;

    if enemy.kind.avoids_ledges() && !ground_ahead(&enemy.body, enemy.dir, ctx.grid) {
        enemy.dir = -enemy.dir;
        enemy.body.vx = -enemy.body.vx;
    }

    move_body(&mut enemy.body, ctx.grid, dt, WallResponse::Bounce);

    if enemy.body.vx.abs() > FACING_MIN_SPEED {
        enemy.dir = enemy.body.vx.signum();
    }

    match enemy.kind {
        EnemyKind::Boss => boss_fire(enemy, ctx, dt),
        EnemyKind::Walker | EnemyKind::Goomba | EnemyKind::Turtle | EnemyKind::Mouse => {
            EnemyAction::Idle
        },
    }
}

fn turn_at_patrol_bounds(enemy: &mut Enemy, patrol: Patrol) {
    let left = patrol.left as f32 * TILE_SIZE;
    let right = (patrol.right + 1) as f32 * TILE_SIZE;
    if enemy.body.x < left {
        enemy.dir = 1.0;
    } else if enemy.body.x + enemy.body.w > right {
        enemy.dir = -1.0;
    }
}

/// Solid ground just past the leading foot.
fn ground_ahead(body: &Body, dir: f32, grid: &TileGrid) -> bool {
    let front_x = if dir > 0.0 {
        body.x + body.w + LEDGE_PROBE
    } else {
        body.x - LEDGE_PROBE
    };
    grid.tile_at(front_x, body.y + body.h + LEDGE_PROBE).is_solid()
}

fn boss_fire(enemy: &mut Enemy, ctx: &BehaviorContext<'_>, dt: f32) -> EnemyAction {
    let center_x = enemy.body.center_x();
    let Some(boss) = enemy.boss.as_mut() else {
        return EnemyAction::Idle;
    };
    boss.fire_cooldown = (boss.fire_cooldown - dt).max(0.0);
    let in_range = (ctx.player_center_x - center_x).abs() < ctx.fire_range;
    if in_range && boss.fire_cooldown <= 0.0 {
        boss.fire_cooldown = ctx.tuning.fire_cooldown;
        return EnemyAction::BreatheFire;
    }
    EnemyAction::Idle
}

/// Outcome of the player touching an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Landed on top. `defeated` is false for a boss that still has hits left.
    Stomp { defeated: bool },
    /// Touched from anywhere else; the player is now dead.
    Hurt,
}

/// Check and apply player/enemy contact. Dead players and dead enemies never
/// touch.
pub fn resolve_contact(
    player: &mut Player,
    enemy: &mut Enemy,
    cfg: &EnemyConfig,
    jump_velocity: f32,
    tuning: &BossTuning,
) -> Option<Contact> {
    if !enemy.alive || !player.is_alive() || !player.body.rect().overlaps(&enemy.body.rect()) {
        return None;
    }

    let depth = player.body.bottom() - enemy.body.y;
    let is_stomp = player.body.vy > cfg.stomp_min_fall_speed
        && depth < cfg.stomp_max_depth_tiles * TILE_SIZE;

    if !is_stomp {
        player.kill(DeathCause::Enemy);
        return Some(Contact::Hurt);
    }

    player.body.vy = -jump_velocity * cfg.stomp_bounce;
    player.body.y = enemy.body.y - player.body.h;

    let defeated = match enemy.boss.as_mut() {
        Some(boss) => {
            boss.hits_taken += 1;
            boss.hits_taken >= tuning.hits_required
        },
        None => true,
    };
    if defeated {
        enemy.alive = false;
    }
    Some(Contact::Stomp { defeated })
}
