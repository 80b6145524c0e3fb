use serde::{Deserialize, Serialize};

use mariosan_core::input::{Action, InputSnapshot};

use crate::config::PhysicsConfig;
use crate::level::TilePoint;
use crate::physics::Body;
use crate::tiles::TILE_SIZE;

/// Player hitbox as a fraction of a tile.
pub const PLAYER_WIDTH: f32 = TILE_SIZE * 0.8;
pub const PLAYER_HEIGHT: f32 = TILE_SIZE * 0.95;
/// Horizontal speed above which the player counts as running.
const RUN_POSE_SPEED: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// Why the player died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Hazard,
    Enemy,
    Projectile,
    FellOut,
}

/// Animation pose derived from movement state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pose {
    Idle,
    Run,
    Jump,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub facing: Facing,
    /// Jumps started since the player last stood on the ground.
    pub jumps_used: u8,
    pub dead: Option<DeathCause>,
    pub won: bool,
}

impl Player {
    /// Place the player at a tile-unit spawn point, one tile above the
    /// spawn row and slightly inset from the column edge.
    pub fn spawn(start: TilePoint) -> Self {
        let x = start.x as f32 * TILE_SIZE + TILE_SIZE * 0.1;
        let y = start.y as f32 * TILE_SIZE - TILE_SIZE;
        Self {
            body: Body::new(x, y, PLAYER_WIDTH, PLAYER_HEIGHT),
            facing: Facing::Right,
            jumps_used: 0,
            dead: None,
            won: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.dead.is_none()
    }

    /// Mark the player dead. Returns false if already dead, so the first
    /// cause sticks.
    pub fn kill(&mut self, cause: DeathCause) -> bool {
        if self.dead.is_some() {
            return false;
        }
        self.dead = Some(cause);
        true
    }

    /// Reset the jump budget after a move that ended on the ground.
    pub fn land_if_grounded(&mut self) {
        if self.body.on_ground {
            self.jumps_used = 0;
        }
    }

    pub fn pose(&self) -> Pose {
        if !self.body.on_ground {
            Pose::Jump
        } else if self.body.vx.abs() > RUN_POSE_SPEED {
            Pose::Run
        } else {
            Pose::Idle
        }
    }
}

/// Apply one tick of input to the player: run acceleration, ground friction,
/// speed cap, jump and gravity. Returns true if a jump started this tick.
pub fn apply_input(
    player: &mut Player,
    input: &InputSnapshot,
    cfg: &PhysicsConfig,
    dt: f32,
) -> bool {
    let body = &mut player.body;
    let left = input.is_held(Action::MoveLeft);
    let right = input.is_held(Action::MoveRight);

    if left {
        body.vx -= cfg.run_accel * dt;
        player.facing = Facing::Left;
    }
    if right {
        body.vx += cfg.run_accel * dt;
        player.facing = Facing::Right;
    }
    if !left && !right && body.on_ground {
        body.vx *= cfg.ground_friction;
    }
    body.vx = body.vx.clamp(-cfg.max_run_speed, cfg.max_run_speed);

    let mut jumped = false;
    if input.jump_pressed {
        if body.on_ground {
            body.vy = -cfg.jump_velocity;
            body.on_ground = false;
            player.jumps_used = 1;
            jumped = true;
        } else if player.jumps_used < cfg.max_jumps {
            body.vy = -cfg.jump_velocity;
            player.jumps_used += 1;
            jumped = true;
        }
    }

    body.vy += cfg.gravity * dt;
    jumped
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn grounded_player() -> Player {
        let mut p = Player::spawn(TilePoint { x: 2, y: 10 });
        p.body.on_ground = true;
        p
    }

    #[test]
    fn spawn_position_and_size() {
        let p = Player::spawn(TilePoint { x: 2, y: 10 });
        assert!((p.body.x - 67.2).abs() < 1e-4);
        assert_eq!(p.body.y, 288.0);
        assert!((p.body.w - 25.6).abs() < 1e-4);
        assert!((p.body.h - 30.4).abs() < 1e-4);
        assert!(p.is_alive());
        assert_eq!(p.facing, Facing::Right);
    }

    #[test]
    fn holding_a_direction_accelerates_and_faces() {
        let cfg = PhysicsConfig::default();
        let mut p = grounded_player();
        apply_input(&mut p, &InputSnapshot::held(&[Action::MoveLeft]), &cfg, DT);
        assert!(p.body.vx < 0.0);
        assert_eq!(p.facing, Facing::Left);
    }

    #[test]
    fn speed_is_capped() {
        let cfg = PhysicsConfig::default();
        let mut p = grounded_player();
        let right = InputSnapshot::held(&[Action::MoveRight]);
        for _ in 0..120 {
            apply_input(&mut p, &right, &cfg, DT);
        }
        assert_eq!(p.body.vx, cfg.max_run_speed);
    }

    #[test]
    fn friction_only_on_ground() {
        let cfg = PhysicsConfig::default();
        let idle = InputSnapshot::default();

        let mut p = grounded_player();
        p.body.vx = 100.0;
        apply_input(&mut p, &idle, &cfg, DT);
        assert!((p.body.vx - 80.0).abs() < 1e-4);

        let mut p = grounded_player();
        p.body.on_ground = false;
        p.body.vx = 100.0;
        apply_input(&mut p, &idle, &cfg, DT);
        assert_eq!(p.body.vx, 100.0);
    }

    #[test]
    fn ground_jump_then_one_air_jump() {
        let cfg = PhysicsConfig::default();
        let jump = InputSnapshot::default().with_jump_pressed();
        let mut p = grounded_player();

        assert!(apply_input(&mut p, &jump, &cfg, DT));
        assert!(!p.body.on_ground);
        assert_eq!(p.jumps_used, 1);
        assert!(p.body.vy < 0.0);

        assert!(apply_input(&mut p, &jump, &cfg, DT));
        assert_eq!(p.jumps_used, 2);
        let vy_after_second = p.body.vy;
        assert!((vy_after_second - (-cfg.jump_velocity + cfg.gravity * DT)).abs() < 1e-3);

        assert!(!apply_input(&mut p, &jump, &cfg, DT));
        assert_eq!(p.jumps_used, 2);
    }

    #[test]
    fn walking_off_a_ledge_keeps_the_full_budget() {
        let cfg = PhysicsConfig::default();
        let jump = InputSnapshot::default().with_jump_pressed();
        let mut p = grounded_player();
        p.body.on_ground = false;

        assert!(apply_input(&mut p, &jump, &cfg, DT));
        assert_eq!(p.jumps_used, 1);
        assert!(apply_input(&mut p, &jump, &cfg, DT));
        assert!(!apply_input(&mut p, &jump, &cfg, DT));
    }

    #[test]
    fn held_jump_without_edge_does_nothing() {
        let cfg = PhysicsConfig::default();
        let mut p = grounded_player();
        let held = InputSnapshot::held(&[Action::Jump]);
        assert!(!apply_input(&mut p, &held, &cfg, DT));
        assert!(p.body.vy > 0.0);
    }

    #[test]
    fn landing_resets_budget() {
        let mut p = grounded_player();
        p.jumps_used = 2;
        p.land_if_grounded();
        assert_eq!(p.jumps_used, 0);
    }

    #[test]
    fn first_death_cause_sticks() {
        let mut p = grounded_player();
        assert!(p.kill(DeathCause::Hazard));
        assert!(!p.kill(DeathCause::Enemy));
        assert_eq!(p.dead, Some(DeathCause::Hazard));
    }

    #[test]
    fn pose_follows_motion() {
        let mut p = grounded_player();
        assert_eq!(p.pose(), Pose::Idle);
        p.body.vx = 100.0;
        assert_eq!(p.pose(), Pose::Run);
        p.body.on_ground = false;
        assert_eq!(p.pose(), Pose::Jump);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn airborne_jumps_never_exceed_budget(
                presses in proptest::collection::vec(any::<bool>(), 1..60),
                start_grounded in any::<bool>(),
            ) {
                let cfg = PhysicsConfig::default();
                let mut p = Player::spawn(TilePoint { x: 2, y: 10 });
                p.body.on_ground = start_grounded;
                let mut jumps = 0u8;
                for &pressed in &presses {
                    let input = if pressed {
                        InputSnapshot::default().with_jump_pressed()
                    } else {
                        InputSnapshot::default()
                    };
                    if apply_input(&mut p, &input, &cfg, DT) {
                        jumps += 1;
                    }
                    prop_assert!(p.jumps_used <= cfg.max_jumps);
                }
                prop_assert!(jumps <= cfg.max_jumps);
            }
        }
    }
}
