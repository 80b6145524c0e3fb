pub mod camera;
pub mod config;
pub mod enemies;
pub mod error;
pub mod level;
pub mod physics;
pub mod player;
pub mod projectiles;
pub mod snapshot;
pub mod stages;
pub mod tiles;

use serde::{Deserialize, Serialize};

use mariosan_core::game_trait::{FrameResult, Phase, SimMetadata, Simulation};
use mariosan_core::input::{InputSnapshot, PendingCommands};
use mariosan_core::time::clamp_frame_dt;

use camera::Camera;
use enemies::{BehaviorContext, Contact, Enemy, EnemyAction, resolve_contact, update_enemy};
use level::{BossTuning, EnemyKind};
use physics::{WallResponse, move_body};
use player::{DeathCause, Player};
use projectiles::{CullBounds, Projectile, spawn_boss_fire, tick_projectiles};
use snapshot::{EnemyView, PlayerView, ProjectileView, RenderSnapshot, TileWindow};
use tiles::{TILE_SIZE, TileGrid};

pub use config::MariosanConfig;
pub use error::LevelError;
pub use level::{Level, LevelData, load_level_from_file, load_levels_from_dir, parse_level};
pub use stages::builtin_levels;

/// Hazard tiles are sampled this far inside the player's head and feet.
const HAZARD_SAMPLE_INSET: f32 = 2.0;

/// Something notable that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlatformerEvent {
    EnemyStomped { kind: EnemyKind },
    BossHit { hits_taken: u32, hits_required: u32 },
    BossDefeated,
    BossFired { projectiles: usize },
    PlayerDied { cause: DeathCause },
    LevelCleared,
}

/// One playthrough of a level list: the current level's player, enemies,
/// projectiles and camera, plus the `Playing / Won / Lost` state.
pub struct LevelRuntime {
    config: MariosanConfig,
    levels: Vec<Level>,
    level_index: usize,
    player: Player,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    camera: Camera,
    phase: Phase,
    anim_time: f32,
}

impl LevelRuntime {
    /// Start playing the first of `levels`.
    pub fn new(levels: Vec<Level>, config: MariosanConfig) -> Result<Self, LevelError> {
        let Some(first) = levels.first() else {
            return Err(LevelError::NoLevels);
        };
        let player = Player::spawn(first.player_start());
        let camera = Camera::new(&config.viewport);

        let mut runtime = Self {
            config,
            levels,
            level_index: 0,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            camera,
            phase: Phase::Playing,
            anim_time: 0.0,
        };
        runtime.reset();
        Ok(runtime)
    }

    /// Runtime over the three built-in stages.
    pub fn with_builtin_levels(config: MariosanConfig) -> Result<Self, LevelError> {
        Self::new(builtin_levels()?, config)
    }

    pub fn level(&self) -> &Level {
        &self.levels[self.level_index]
    }

    pub fn grid(&self) -> &TileGrid {
        self.level().grid()
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &MariosanConfig {
        &self.config
    }

    /// Jump straight to a level. Out-of-range indices are ignored.
    pub fn select_level(&mut self, index: usize) -> bool {
        if index >= self.levels.len() {
            return false;
        }
        self.level_index = index;
        self.reset();
        true
    }

    /// Apply one-shot commands queued by the host. Advance is tried first;
    /// a refused advance falls through to restart if that was also asked.
    pub fn apply_commands(&mut self, commands: PendingCommands) {
        if commands.advance_level && self.advance_level() {
            return;
        }
        if commands.restart {
            self.restart();
        }
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        let level = self.level();
        let grid = level.grid();
        RenderSnapshot {
            level_index: self.level_index,
            level_name: level.name().to_string(),
            theme: level.theme().map(str::to_string),
            phase: self.phase,
            level_width: grid.width(),
            level_height: grid.height(),
            camera: self.camera,
            anim_time: self.anim_time,
            tiles: TileWindow::capture(grid, &self.camera),
            player: PlayerView::from(&self.player),
            enemies: self.enemies.iter().map(EnemyView::from).collect(),
            projectiles: self.projectiles.iter().map(ProjectileView::from).collect(),
        }
    }

    /// Rebuild the current level's entities from its data.
    fn reset(&mut self) {
        let level = &self.levels[self.level_index];
        self.player = Player::spawn(level.player_start());
        self.enemies = level
            .enemies()
            .iter()
            .enumerate()
            .map(|(id, spawn)| Enemy::spawn(id as u32, spawn, &self.config.enemies))
            .collect();
        self.projectiles.clear();
        self.camera = Camera::new(&self.config.viewport);
        self.camera.follow(
            self.player.body.x,
            level.grid().pixel_width(),
            self.config.viewport.follow_ratio,
        );
        self.phase = Phase::Playing;
        self.anim_time = 0.0;

        tracing::info!(
            level = level.name(),
            index = self.level_index,
            enemies = self.enemies.len(),
            "Level started"
        );
    }

    fn step(&mut self, dt: f32, input: &InputSnapshot) -> FrameResult<PlatformerEvent> {
        if self.phase.is_terminal() {
            return FrameResult::idle(self.phase);
        }
        let dt = clamp_frame_dt(dt, self.config.max_frame_dt);
        if dt <= 0.0 {
            return FrameResult::idle(self.phase);
        }

        let mut events = Vec::new();
        let level = &self.levels[self.level_index];
        let grid = level.grid();
        let cfg = &self.config;
        let tuning = level.boss();

        // Player
        player::apply_input(&mut self.player, input, &cfg.physics, dt);
        move_body(&mut self.player.body, grid, dt, WallResponse::Stop);
        self.player.land_if_grounded();

        // Enemies: behavior, movement, contact
        let ctx = BehaviorContext {
            grid,
            gravity: cfg.physics.gravity,
            player_center_x: self.player.body.center_x(),
            fire_range: cfg.enemies.boss_fire_range_tiles * TILE_SIZE,
            tuning,
        };
        for enemy in self.enemies.iter_mut().filter(|e| e.alive) {
            if update_enemy(enemy, &ctx, dt) == EnemyAction::BreatheFire {
                let burst = spawn_boss_fire(enemy, tuning.fire_burst, &cfg.projectiles);
                tracing::debug!(count = burst.len(), "Boss breathed fire");
                events.push(PlatformerEvent::BossFired {
                    projectiles: burst.len(),
                });
                self.projectiles.extend(burst);
            }

            let contact = resolve_contact(
                &mut self.player,
                enemy,
                &cfg.enemies,
                cfg.physics.jump_velocity,
                &tuning,
            );
            match contact {
                Some(Contact::Stomp { defeated }) => {
                    record_stomp(enemy, defeated, &tuning, &mut events);
                },
                Some(Contact::Hurt) => events.push(PlatformerEvent::PlayerDied {
                    cause: DeathCause::Enemy,
                }),
                None => {},
            }
        }

        let level_height = grid.pixel_height();
        let fall_margin = cfg.physics.fall_out_margin;
        self.enemies
            .retain(|e| e.alive && !e.fell_out(level_height, fall_margin));

        // Projectiles
        let bounds = CullBounds {
            view: self.camera.view(),
            level_height,
            margin: cfg.projectiles.cull_margin,
        };
        if tick_projectiles(&mut self.projectiles, grid, &mut self.player, &bounds, dt) {
            events.push(PlatformerEvent::PlayerDied {
                cause: DeathCause::Projectile,
            });
        }

        // Tile hazards at head and feet
        let body = self.player.body;
        let cx = body.center_x();
        if grid.tile_at(cx, body.y + HAZARD_SAMPLE_INSET).is_hazard()
            || grid.tile_at(cx, body.bottom() - HAZARD_SAMPLE_INSET).is_hazard()
        {
            kill_player(&mut self.player, DeathCause::Hazard, &mut events);
        }

        // Win conditions
        if grid.tile_at(cx, body.center_y()).is_goal() {
            self.player.won = true;
        }
        if level.win_by_defeating_boss() && !self.enemies.iter().any(Enemy::is_boss) {
            self.player.won = true;
        }

        if body.y > level_height + fall_margin {
            kill_player(&mut self.player, DeathCause::FellOut, &mut events);
        }

        self.camera.follow(
            self.player.body.x,
            grid.pixel_width(),
            cfg.viewport.follow_ratio,
        );
        self.anim_time += dt;

        // Death beats victory when both happen in one tick.
        if let Some(cause) = self.player.dead {
            self.phase = Phase::Lost;
            tracing::info!(level = level.name(), ?cause, "Level lost");
        } else if self.player.won {
            self.phase = Phase::Won;
            events.push(PlatformerEvent::LevelCleared);
            tracing::info!(level = level.name(), "Level cleared");
        }

        FrameResult {
            phase: self.phase,
            events,
        }
    }
}

fn kill_player(player: &mut Player, cause: DeathCause, events: &mut Vec<PlatformerEvent>) {
    if player.kill(cause) {
        events.push(PlatformerEvent::PlayerDied { cause });
    }
}

fn record_stomp(
    enemy: &Enemy,
    defeated: bool,
    tuning: &BossTuning,
    events: &mut Vec<PlatformerEvent>,
) {
    match enemy.boss {
        Some(boss) => {
            tracing::debug!(
                hits = boss.hits_taken,
                required = tuning.hits_required,
                "Boss stomped"
            );
            events.push(PlatformerEvent::BossHit {
                hits_taken: boss.hits_taken,
                hits_required: tuning.hits_required,
            });
            if defeated {
                events.push(PlatformerEvent::BossDefeated);
            }
        },
        None => {
            tracing::debug!(kind = ?enemy.kind, id = enemy.id, "Enemy stomped");
            events.push(PlatformerEvent::EnemyStomped { kind: enemy.kind });
        },
    }
}

impl Simulation for LevelRuntime {
    type Event = PlatformerEvent;

    fn metadata(&self) -> SimMetadata {
        SimMetadata {
            name: "Mariosan".to_string(),
            description: "Run, stomp and reach the flag, or beat the boss!".to_string(),
            level_count: self.levels.len(),
        }
    }

    fn tick(&mut self, dt: f32, input: &InputSnapshot) -> FrameResult<PlatformerEvent> {
        self.step(dt, input)
    }

    fn restart(&mut self) {
        self.reset();
    }

    fn advance_level(&mut self) -> bool {
        if self.phase != Phase::Won {
            return false;
        }
        self.level_index = (self.level_index + 1) % self.levels.len();
        self.reset();
        true
    }

    mariosan_core::simulation_boilerplate!();
}
