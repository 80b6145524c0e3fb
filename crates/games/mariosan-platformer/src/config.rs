use serde::{Deserialize, Serialize};

use mariosan_core::time::MAX_FRAME_DT;

/// Player movement tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration (px/s^2) applied to every body.
    pub gravity: f32,
    /// Multiplier applied to `vx` each grounded tick without directional input.
    pub ground_friction: f32,
    /// Horizontal speed cap (px/s).
    pub max_run_speed: f32,
    /// Horizontal acceleration while a direction is held (px/s^2).
    pub run_accel: f32,
    /// Initial upward speed of a jump (px/s).
    pub jump_velocity: f32,
    /// Ground jump plus air jumps.
    pub max_jumps: u8,
    /// How far below the level's bottom edge a body may fall before dying (px).
    pub fall_out_margin: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 1800.0,
            ground_friction: 0.8,
            max_run_speed: 260.0,
            run_accel: 1600.0,
            jump_velocity: 650.0,
            max_jumps: 2,
            fall_out_margin: 40.0,
        }
    }
}

/// Enemy movement and stomp tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Base speed for every non-boss enemy (px/s) before its kind multiplier.
    pub base_speed: f32,
    /// Base speed of a boss (px/s) before its kind multiplier.
    pub boss_base_speed: f32,
    /// Minimum downward player speed (px/s) for a contact to count as a stomp.
    pub stomp_min_fall_speed: f32,
    /// Maximum depth of player-bottom below enemy-top for a stomp, in tiles.
    pub stomp_max_depth_tiles: f32,
    /// Fraction of jump velocity the player bounces with after a stomp.
    pub stomp_bounce: f32,
    /// Horizontal distance (tiles) within which the boss breathes fire.
    pub boss_fire_range_tiles: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            base_speed: 80.0,
            boss_base_speed: 60.0,
            stomp_min_fall_speed: 60.0,
            stomp_max_depth_tiles: 0.6,
            stomp_bounce: 0.7,
            boss_fire_range_tiles: 10.0,
        }
    }
}

/// Boss fire-burst projectile tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub launch_speed: f32,
    pub gravity: f32,
    /// Edge length of the square projectile (px).
    pub size: f32,
    /// Launch angle of the first shot in radians (negative is upward).
    pub base_angle: f32,
    /// Angle added upward for each further shot in the fan.
    pub angle_step: f32,
    /// Launch height as a fraction of the boss's height from its top.
    pub origin_height: f32,
    /// Distance outside the viewport before a projectile is culled (px).
    pub cull_margin: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            launch_speed: 240.0,
            gravity: 300.0,
            size: 14.0,
            base_angle: -0.28,
            angle_step: 0.12,
            origin_height: 0.4,
            cull_margin: 100.0,
        }
    }
}

/// Viewport the camera follows the player with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
    /// Where the player sits horizontally, as a fraction of the width.
    pub follow_ratio: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 540.0,
            follow_ratio: 0.35,
        }
    }
}

/// Top-level simulation configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MariosanConfig {
    pub physics: PhysicsConfig,
    pub enemies: EnemyConfig,
    pub projectiles: ProjectileConfig,
    pub viewport: ViewportConfig,
    /// Largest dt integrated in one tick (s).
    pub max_frame_dt: f32,
}

impl Default for MariosanConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            enemies: EnemyConfig::default(),
            projectiles: ProjectileConfig::default(),
            viewport: ViewportConfig::default(),
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

impl MariosanConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("MARIOSAN_CONFIG")
            .unwrap_or_else(|_| "config/mariosan.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_toml(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse {path}: {e}, using defaults");
                MariosanConfig::default()
            }),
            Err(_) => MariosanConfig::default(),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
