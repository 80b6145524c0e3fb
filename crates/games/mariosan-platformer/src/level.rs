use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LevelError;
use crate::tiles::{Tile, TileGrid};

/// Enemy behavior families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    /// Constant-speed patroller that turns at its patrol bounds.
    Walker,
    /// Ground-hugger that never walks off a ledge.
    Goomba,
    /// Goomba rules at 0.75x speed.
    Turtle,
    /// Goomba rules at 1.35x speed.
    Mouse,
    /// Slow, large, takes several stomps and breathes fire.
    Boss,
}

/// Horizontal patrol range in tile columns (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patrol {
    pub left: i32,
    pub right: i32,
}

/// A point in tile units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePoint {
    pub x: i32,
    pub y: i32,
}

/// Enemy placement. `y` is the tile row the enemy stands on top of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySpawn {
    #[serde(rename = "type")]
    pub kind: EnemyKind,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub patrol: Option<Patrol>,
}

/// Level file schema. All coordinates are in tile units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub tiles: Vec<Tile>,
    pub player_start: TilePoint,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub win_by_defeating_boss: bool,
    #[serde(default)]
    pub boss_hits: Option<u32>,
    #[serde(default)]
    pub boss_fire_cooldown: Option<f32>,
    #[serde(default)]
    pub boss_fire_burst: Option<u32>,
}

/// Stomps the boss absorbs before dying.
pub const DEFAULT_BOSS_HITS: u32 = 3;
/// Seconds between fire bursts.
pub const DEFAULT_BOSS_FIRE_COOLDOWN: f32 = 1.6;
/// Projectiles per fire burst.
pub const DEFAULT_BOSS_FIRE_BURST: u32 = 3;
/// Largest accepted `bossHits`.
pub const MAX_BOSS_HITS: u32 = 99;
/// Largest accepted `bossFireBurst`.
pub const MAX_BOSS_FIRE_BURST: u32 = 32;

/// Per-level boss parameters, resolved once at load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BossTuning {
    pub hits_required: u32,
    pub fire_cooldown: f32,
    pub fire_burst: u32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            hits_required: DEFAULT_BOSS_HITS,
            fire_cooldown: DEFAULT_BOSS_FIRE_COOLDOWN,
            fire_burst: DEFAULT_BOSS_FIRE_BURST,
        }
    }
}

impl BossTuning {
    /// Apply level overrides. Absent or zero values keep the default;
    /// counts above their cap are rejected.
    fn resolve(data: &LevelData) -> Result<Self, LevelError> {
        let defaults = Self::default();
        let fire_cooldown = match data.boss_fire_cooldown {
            Some(c) if !c.is_finite() || c < 0.0 => {
                return Err(LevelError::InvalidBossTuning(format!(
                    "fire cooldown {c} must be a non-negative number"
                )));
            },
            Some(c) if c > 0.0 => c,
            _ => defaults.fire_cooldown,
        };
        let hits_required = capped_count("hits", data.boss_hits, MAX_BOSS_HITS)?
            .unwrap_or(defaults.hits_required);
        let fire_burst = capped_count("fire burst", data.boss_fire_burst, MAX_BOSS_FIRE_BURST)?
            .unwrap_or(defaults.fire_burst);
        Ok(Self {
            hits_required,
            fire_cooldown,
            fire_burst,
        })
    }
}

/// `None` for an absent or zero count, an error above `max`.
fn capped_count(what: &str, value: Option<u32>, max: u32) -> Result<Option<u32>, LevelError> {
    match value {
        Some(v) if v > max => Err(LevelError::InvalidBossTuning(format!(
            "{what} {v} exceeds the maximum of {max}"
        ))),
        Some(v) if v > 0 => Ok(Some(v)),
        _ => Ok(None),
    }
}

/// A validated level, ready to be played.
#[derive(Debug, Clone)]
pub struct Level {
    name: String,
    grid: TileGrid,
    player_start: TilePoint,
    enemies: Vec<EnemySpawn>,
    theme: Option<String>,
    win_by_defeating_boss: bool,
    boss: BossTuning,
}

impl Level {
    /// Validate level data. Nothing partially built escapes on failure.
    pub fn from_data(data: LevelData) -> Result<Self, LevelError> {
        let boss = BossTuning::resolve(&data)?;
        let grid = TileGrid::new(data.width, data.height, data.tiles)?;

        let start = data.player_start;
        if !grid.contains(start.x, start.y) {
            return Err(LevelError::SpawnOutOfBounds {
                x: start.x,
                y: start.y,
            });
        }

        for (index, spawn) in data.enemies.iter().enumerate() {
            if !grid.contains(spawn.x, spawn.y) {
                return Err(LevelError::EnemyOutOfBounds {
                    index,
                    x: spawn.x,
                    y: spawn.y,
                });
            }
            if let Some(p) = spawn.patrol
                && p.left > p.right
            {
                return Err(LevelError::InvalidPatrol {
                    index,
                    left: p.left,
                    right: p.right,
                });
            }
        }

        if data.win_by_defeating_boss && !data.enemies.iter().any(|e| e.kind == EnemyKind::Boss) {
            return Err(LevelError::MissingBoss);
        }

        if grid.non_empty_count() == 0 {
            tracing::warn!(level = %data.name, "Level has no tiles");
        }

        Ok(Self {
            name: data.name,
            grid,
            player_start: start,
            enemies: data.enemies,
            theme: data.theme,
            win_by_defeating_boss: data.win_by_defeating_boss,
            boss,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn player_start(&self) -> TilePoint {
        self.player_start
    }

    pub fn enemies(&self) -> &[EnemySpawn] {
        &self.enemies
    }

    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    pub fn win_by_defeating_boss(&self) -> bool {
        self.win_by_defeating_boss
    }

    pub fn boss(&self) -> BossTuning {
        self.boss
    }
}

/// Parse and validate a JSON level.
pub fn parse_level(json: &str) -> Result<Level, LevelError> {
    let data: LevelData =
        serde_json::from_str(json).map_err(|e| LevelError::Parse(e.to_string()))?;
    Level::from_data(data)
}

/// Load a JSON level file.
pub fn load_level_from_file(path: impl AsRef<Path>) -> Result<Level, LevelError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| LevelError::Io(format!("{}: {e}", path.display())))?;
    parse_level(&content)
}

/// Load every `*.json` level in `dir`, in file-name order. Files that fail
/// to load are skipped with a warning.
pub fn load_levels_from_dir(dir: impl AsRef<Path>) -> Result<Vec<Level>, LevelError> {
    let dir = dir.as_ref();
    let entries =
        std::fs::read_dir(dir).map_err(|e| LevelError::Io(format!("{}: {e}", dir.display())))?;

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut levels = Vec::with_capacity(paths.len());
    for path in paths {
        match load_level_from_file(&path) {
            Ok(level) => levels.push(level),
            Err(e) => tracing::warn!("Skipping level {}: {e}", path.display()),
        }
    }
    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_data(width: u32, height: u32) -> LevelData {
        let mut grid = TileGrid::empty(width, height);
        grid.fill_rect(0, height - 2, width, 2, Tile::Ground);
        LevelData {
            name: "flat".to_string(),
            width,
            height,
            tiles: grid.tiles().to_vec(),
            player_start: TilePoint { x: 1, y: height as i32 - 2 },
            enemies: Vec::new(),
            theme: None,
            win_by_defeating_boss: false,
            boss_hits: None,
            boss_fire_cooldown: None,
            boss_fire_burst: None,
        }
    }

    #[test]
    fn valid_level_loads() {
        let level = Level::from_data(flat_data(10, 6)).unwrap();
        assert_eq!(level.name(), "flat");
        assert_eq!(level.grid().width(), 10);
        assert_eq!(level.boss(), BossTuning::default());
    }

    #[test]
    fn mismatched_tiles_rejected() {
        let mut data = flat_data(10, 6);
        data.tiles.pop();
        assert!(matches!(
            Level::from_data(data),
            Err(LevelError::TileCountMismatch { actual: 59, .. })
        ));
    }

    #[test]
    fn spawn_outside_rejected() {
        let mut data = flat_data(10, 6);
        data.player_start = TilePoint { x: 10, y: 2 };
        assert!(matches!(
            Level::from_data(data),
            Err(LevelError::SpawnOutOfBounds { x: 10, y: 2 })
        ));

        let mut data = flat_data(10, 6);
        data.player_start = TilePoint { x: 0, y: -1 };
        assert!(Level::from_data(data).is_err());
    }

    #[test]
    fn enemy_outside_rejected() {
        let mut data = flat_data(10, 6);
        data.enemies.push(EnemySpawn {
            kind: EnemyKind::Goomba,
            x: 42,
            y: 3,
            patrol: None,
        });
        assert!(matches!(
            Level::from_data(data),
            Err(LevelError::EnemyOutOfBounds { index: 0, .. })
        ));
    }

    #[test]
    fn inverted_patrol_rejected() {
        let mut data = flat_data(10, 6);
        data.enemies.push(EnemySpawn {
            kind: EnemyKind::Walker,
            x: 4,
            y: 3,
            patrol: Some(Patrol { left: 6, right: 2 }),
        });
        assert!(matches!(
            Level::from_data(data),
            Err(LevelError::InvalidPatrol { .. })
        ));
    }

    #[test]
    fn boss_win_requires_a_boss() {
        let mut data = flat_data(10, 6);
        data.win_by_defeating_boss = true;
        assert!(matches!(
            Level::from_data(data),
            Err(LevelError::MissingBoss)
        ));
    }

    #[test]
    fn boss_tuning_overrides_and_zero_fallback() {
        let mut data = flat_data(10, 6);
        data.boss_hits = Some(5);
        data.boss_fire_cooldown = Some(0.0);
        data.boss_fire_burst = Some(0);
        let tuning = Level::from_data(data).unwrap().boss();
        assert_eq!(tuning.hits_required, 5);
        assert_eq!(tuning.fire_cooldown, DEFAULT_BOSS_FIRE_COOLDOWN);
        assert_eq!(tuning.fire_burst, DEFAULT_BOSS_FIRE_BURST);
    }

    #[test]
    fn negative_cooldown_rejected() {
        let mut data = flat_data(10, 6);
        data.boss_fire_cooldown = Some(-1.0);
        assert!(matches!(
            Level::from_data(data),
            Err(LevelError::InvalidBossTuning(_))
        ));
    }

    #[test]
    fn oversized_boss_counts_rejected() {
        let json = r#"{
            "name": "greedy",
            "width": 3,
            "height": 2,
            "tiles": [0, 0, 0, 1, 1, 1],
            "playerStart": { "x": 0, "y": 0 },
            "bossFireBurst": 4000000000
        }"#;
        assert!(matches!(
            parse_level(json),
            Err(LevelError::InvalidBossTuning(_))
        ));

        let mut data = flat_data(10, 6);
        data.boss_fire_burst = Some(MAX_BOSS_FIRE_BURST);
        data.boss_hits = Some(MAX_BOSS_HITS);
        let tuning = Level::from_data(data).unwrap().boss();
        assert_eq!(tuning.fire_burst, MAX_BOSS_FIRE_BURST);
        assert_eq!(tuning.hits_required, MAX_BOSS_HITS);

        let mut data = flat_data(10, 6);
        data.boss_hits = Some(MAX_BOSS_HITS + 1);
        assert!(matches!(
            Level::from_data(data),
            Err(LevelError::InvalidBossTuning(_))
        ));
    }

    #[test]
    fn parses_level_json() {
        let json = r#"{
            "name": "tiny",
            "width": 3,
            "height": 2,
            "tiles": [0, 0, 4, 1, 1, 1],
            "playerStart": { "x": 0, "y": 0 },
            "enemies": [{ "type": "mouse", "x": 1, "y": 1, "patrol": { "left": 0, "right": 2 } }],
            "theme": "forest",
            "bossFireBurst": 5
        }"#;
        let level = parse_level(json).unwrap();
        assert_eq!(level.enemies()[0].kind, EnemyKind::Mouse);
        assert_eq!(level.theme(), Some("forest"));
        assert_eq!(level.grid().tile(2, 0), Tile::Flag);
        assert_eq!(level.boss().fire_burst, 5);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(parse_level("{ nope"), Err(LevelError::Parse(_))));
        let unknown_tile = r#"{"name":"x","width":1,"height":1,"tiles":[9],"playerStart":{"x":0,"y":0}}"#;
        assert!(matches!(parse_level(unknown_tile), Err(LevelError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_level_from_file("/definitely/not/here.json"),
            Err(LevelError::Io(_))
        ));
    }

    #[test]
    fn loads_directory_in_name_order_skipping_bad_files() {
        let dir = std::env::temp_dir().join(format!("mariosan-levels-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut second = flat_data(8, 5);
        second.name = "second".to_string();
        let mut first = flat_data(8, 5);
        first.name = "first".to_string();
        std::fs::write(dir.join("b.json"), serde_json::to_string(&second).unwrap()).unwrap();
        std::fs::write(dir.join("a.json"), serde_json::to_string(&first).unwrap()).unwrap();
        std::fs::write(dir.join("c.json"), "not json").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let levels = load_levels_from_dir(&dir).unwrap();
        let names: Vec<_> = levels.iter().map(|l| l.name().to_string()).collect();
        assert_eq!(names, vec!["first", "second"]);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
