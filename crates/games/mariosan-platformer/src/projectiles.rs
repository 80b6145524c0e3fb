use serde::{Deserialize, Serialize};

use mariosan_core::geom::Rect;

use crate::config::ProjectileConfig;
use crate::enemies::Enemy;
use crate::player::{DeathCause, Player};
use crate::tiles::TileGrid;

/// 24-bit color for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Inner and outer colors of a fireball.
pub const FLAME_CORE: Rgb = Rgb::new(0xff, 0xed, 0x00);
pub const FLAME_EDGE: Rgb = Rgb::new(0xff, 0x55, 0x00);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub vx: f32,
    pub vy: f32,
    pub gravity: f32,
    pub core: Rgb,
    pub edge: Rgb,
}

impl Projectile {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    fn hits_tile(&self, grid: &TileGrid) -> bool {
        let lead_x = if self.vx >= 0.0 { self.x + self.w } else { self.x };
        let lead_y = if self.vy >= 0.0 { self.y + self.h } else { self.y };
        grid.tile_at(lead_x, self.y + self.h / 2.0).is_solid()
            || grid.tile_at(self.x + self.w / 2.0, lead_y).is_solid()
    }
}

/// Fan of fireballs launched from the boss's mouth, on the side it faces.
/// Shot `i` leaves at `base_angle - i * angle_step`, so later shots arc higher.
pub fn spawn_boss_fire(boss: &Enemy, burst: u32, cfg: &ProjectileConfig) -> Vec<Projectile> {
    let dir = if boss.dir < 0.0 { -1.0 } else { 1.0 };
    let mouth_x = boss.body.center_x() + dir * boss.body.w / 2.0;
    let mouth_y = boss.body.y + boss.body.h * cfg.origin_height;

    (0..burst)
        .map(|i| {
            let angle = cfg.base_angle - cfg.angle_step * i as f32;
            Projectile {
                x: mouth_x,
                y: mouth_y,
                w: cfg.size,
                h: cfg.size,
                vx: angle.cos() * cfg.launch_speed * dir,
                vy: angle.sin() * cfg.launch_speed,
                gravity: cfg.gravity,
                core: FLAME_CORE,
                edge: FLAME_EDGE,
            }
        })
        .collect()
}

/// Area outside of which projectiles are culled.
#[derive(Debug, Clone, Copy)]
pub struct CullBounds {
    pub view: Rect,
    pub level_height: f32,
    pub margin: f32,
}

impl CullBounds {
    fn outside(&self, p: &Projectile) -> bool {
        p.x < self.view.x - self.margin
            || p.x > self.view.right() + self.margin
            || p.y > self.level_height + self.margin
    }
}

/// Advance every projectile one tick. Projectiles that hit a solid tile,
/// hit the player, or leave `bounds` are removed after the pass.
/// Returns true if a projectile killed the player this tick.
pub fn tick_projectiles(
    projectiles: &mut Vec<Projectile>,
    grid: &TileGrid,
    player: &mut Player,
    bounds: &CullBounds,
    dt: f32,
) -> bool {
    let mut expired = vec![false; projectiles.len()];
    let mut killed = false;

    for (p, gone) in projectiles.iter_mut().zip(expired.iter_mut()) {
        p.vy += p.gravity * dt;
        p.x += p.vx * dt;
        p.y += p.vy * dt;

        if p.hits_tile(grid) {
            *gone = true;
            continue;
        }
        if player.is_alive() && p.rect().overlaps(&player.body.rect()) {
            killed |= player.kill(DeathCause::Projectile);
            *gone = true;
            continue;
        }
        if bounds.outside(p) {
            *gone = true;
        }
    }

    let mut flags = expired.into_iter();
    projectiles.retain(|_| !flags.next().unwrap_or(false));
    killed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnemyConfig;
    use crate::level::{EnemyKind, EnemySpawn, TilePoint};
    use crate::tiles::{TILE_SIZE, Tile};

    const DT: f32 = 1.0 / 60.0;

    fn boss_at(x: i32, y: i32, dir: f32) -> Enemy {
        let mut b = Enemy::spawn(
            0,
            &EnemySpawn {
                kind: EnemyKind::Boss,
                x,
                y,
                patrol: None,
            },
            &EnemyConfig::default(),
        );
        b.dir = dir;
        b
    }

    fn open_grid() -> TileGrid {
        let mut grid = TileGrid::empty(40, 12);
        grid.fill_rect(0, 10, 40, 2, Tile::Ground);
        grid
    }

    fn far_player() -> Player {
        Player::spawn(TilePoint { x: 1, y: 1 })
    }

    fn bounds() -> CullBounds {
        CullBounds {
            view: Rect::new(0.0, 0.0, 960.0, 540.0),
            level_height: 12.0 * TILE_SIZE,
            margin: 100.0,
        }
    }

    #[test]
    fn burst_fans_upward_from_the_mouth() {
        let cfg = ProjectileConfig::default();
        let boss = boss_at(20, 10, -1.0);
        let shots = spawn_boss_fire(&boss, 3, &cfg);
        assert_eq!(shots.len(), 3);

        for (i, shot) in shots.iter().enumerate() {
            assert_eq!(shot.x, boss.body.x);
            assert!((shot.y - (boss.body.y + 0.4 * boss.body.h)).abs() < 1e-4);
            assert_eq!((shot.w, shot.h), (14.0, 14.0));
            assert!(shot.vx < 0.0, "facing left fires left");
            assert!(shot.vy < 0.0, "shots start upward");
            let angle = -0.28 - 0.12 * i as f32;
            assert!((shot.vy - angle.sin() * 240.0).abs() < 1e-3);
            assert_eq!(shot.core, FLAME_CORE);
            assert_eq!(shot.edge, FLAME_EDGE);
        }
        assert!(shots[2].vy < shots[1].vy && shots[1].vy < shots[0].vy);
    }

    #[test]
    fn facing_right_fires_from_the_right_edge() {
        let cfg = ProjectileConfig::default();
        let boss = boss_at(20, 10, 1.0);
        let shots = spawn_boss_fire(&boss, 1, &cfg);
        assert_eq!(shots[0].x, boss.body.x + boss.body.w);
        assert!(shots[0].vx > 0.0);
    }

    #[test]
    fn gravity_bends_the_arc() {
        let cfg = ProjectileConfig::default();
        let mut shots = spawn_boss_fire(&boss_at(20, 10, -1.0), 1, &cfg);
        let vy0 = shots[0].vy;
        let mut player = far_player();
        tick_projectiles(&mut shots, &open_grid(), &mut player, &bounds(), DT);
        assert!((shots[0].vy - (vy0 + 300.0 * DT)).abs() < 1e-3);
    }

    #[test]
    fn solid_tile_removes_projectile() {
        let grid = open_grid();
        let mut shots = vec![Projectile {
            x: 100.0,
            y: 10.0 * TILE_SIZE - 15.0,
            w: 14.0,
            h: 14.0,
            vx: 0.0,
            vy: 200.0,
            gravity: 300.0,
            core: FLAME_CORE,
            edge: FLAME_EDGE,
        }];
        let mut player = far_player();
        tick_projectiles(&mut shots, &grid, &mut player, &bounds(), DT);
        assert!(shots.is_empty());
    }

    #[test]
    fn hitting_the_player_kills_and_consumes() {
        let grid = open_grid();
        let mut player = far_player();
        let mut shots = vec![Projectile {
            x: player.body.x,
            y: player.body.y,
            w: 14.0,
            h: 14.0,
            vx: 10.0,
            vy: 0.0,
            gravity: 0.0,
            core: FLAME_CORE,
            edge: FLAME_EDGE,
        }];
        assert!(tick_projectiles(&mut shots, &grid, &mut player, &bounds(), DT));
        assert!(shots.is_empty());
        assert_eq!(player.dead, Some(DeathCause::Projectile));
    }

    #[test]
    fn offscreen_projectiles_are_culled() {
        let grid = open_grid();
        let mut player = far_player();
        let shot = |x: f32, y: f32| Projectile {
            x,
            y,
            w: 14.0,
            h: 14.0,
            vx: 0.0,
            vy: 0.0,
            gravity: 0.0,
            core: FLAME_CORE,
            edge: FLAME_EDGE,
        };
        let mut shots = vec![
            shot(-150.0, 100.0),
            shot(500.0, 100.0),
            shot(1100.0, 100.0),
            shot(500.0, 12.0 * TILE_SIZE + 150.0),
        ];
        tick_projectiles(&mut shots, &grid, &mut player, &bounds(), DT);
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].x, 500.0);
    }
}
