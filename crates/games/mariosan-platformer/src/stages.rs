use crate::error::LevelError;
use crate::level::{EnemyKind, EnemySpawn, Level, LevelData, Patrol, TilePoint};
use crate::tiles::{Tile, TileGrid};

/// Stage height in tiles (540px viewport / 32px tiles, rounded up).
pub const STAGE_HEIGHT: u32 = 17;
/// Top row of the ground slab every stage stands on.
const GROUND_ROW: u32 = 12;

/// The three built-in stages in play order.
pub fn builtin_levels() -> Result<Vec<Level>, LevelError> {
    [stage_one(), stage_two(), stage_three()]
        .into_iter()
        .map(Level::from_data)
        .collect()
}

fn spawn(kind: EnemyKind, x: i32, y: i32, left: i32, right: i32) -> EnemySpawn {
    EnemySpawn {
        kind,
        x,
        y,
        patrol: Some(Patrol { left, right }),
    }
}

/// Solid slab from `GROUND_ROW` to the bottom of the stage.
fn ground_slab(width: u32) -> TileGrid {
    let mut grid = TileGrid::empty(width, STAGE_HEIGHT);
    grid.fill_rect(0, GROUND_ROW, width, STAGE_HEIGHT - GROUND_ROW, Tile::Ground);
    grid
}

/// Cut a pit through the full depth of the ground slab.
fn pit(grid: &mut TileGrid, x: u32, w: u32) {
    grid.clear_rect(x, GROUND_ROW, w, STAGE_HEIGHT - GROUND_ROW);
}

/// Replace the ground surface with spikes over `[x0, x1]`.
fn spikes(grid: &mut TileGrid, x0: u32, x1: u32) {
    grid.fill_rect(x0, GROUND_ROW, x1 - x0 + 1, 1, Tile::Spike);
}

fn platforms(grid: &mut TileGrid, spans: &[(u32, u32, u32)]) {
    for &(x, y, w) in spans {
        grid.fill_rect(x, y, w, 1, Tile::Platform);
    }
}

/// Ascending staircase of `steps` single ground blocks starting at `x`.
fn staircase(grid: &mut TileGrid, x: u32, steps: u32) {
    for i in 0..steps {
        grid.set(x + i, GROUND_ROW - 1 - i, Tile::Ground);
    }
}

fn data(name: &str, grid: TileGrid, enemies: Vec<EnemySpawn>) -> LevelData {
    LevelData {
        name: name.to_string(),
        width: grid.width(),
        height: grid.height(),
        tiles: grid.tiles().to_vec(),
        player_start: TilePoint { x: 2, y: 10 },
        enemies,
        theme: None,
        win_by_defeating_boss: false,
        boss_hits: None,
        boss_fire_cooldown: None,
        boss_fire_burst: None,
    }
}

/// Introductory stage: two forgiving pits, a few platforms, flag at the end.
fn stage_one() -> LevelData {
    let width = 60;
    let mut grid = ground_slab(width);
    pit(&mut grid, 9, 2);
    pit(&mut grid, 28, 3);
    platforms(
        &mut grid,
        &[(10, 9, 3), (18, 8, 4), (26, 7, 5), (34, 5, 5), (45, 9, 6)],
    );
    staircase(&mut grid, 52, 4);
    grid.fill_rect(58, 5, 1, 7, Tile::Flag);

    data(
        "Stage 1",
        grid,
        vec![
            spawn(EnemyKind::Goomba, 12, 10, 12, 18),
            spawn(EnemyKind::Turtle, 22, 10, 20, 26),
            spawn(EnemyKind::Goomba, 34, 6, 32, 38),
        ],
    )
}

/// Wider pits, spike trenches and fast mice.
fn stage_two() -> LevelData {
    let width = 80;
    let mut grid = ground_slab(width);
    for &(x, w) in &[(13, 2), (24, 3), (41, 4), (62, 3)] {
        pit(&mut grid, x, w);
    }
    spikes(&mut grid, 30, 34);
    spikes(&mut grid, 48, 50);
    platforms(
        &mut grid,
        &[
            (10, 9, 3),
            (18, 8, 4),
            (26, 7, 5),
            (35, 6, 4),
            (44, 8, 4),
            (54, 7, 5),
            (64, 5, 4),
        ],
    );
    staircase(&mut grid, 70, 4);
    grid.fill_rect(78, 5, 1, 7, Tile::Flag);

    data(
        "Stage 2",
        grid,
        vec![
            spawn(EnemyKind::Goomba, 16, 10, 14, 20),
            spawn(EnemyKind::Mouse, 23, 10, 22, 28),
            spawn(EnemyKind::Turtle, 39, 10, 38, 44),
            spawn(EnemyKind::Mouse, 56, 7, 55, 60),
            spawn(EnemyKind::Goomba, 68, 6, 66, 72),
        ],
    )
}

/// Battlefield with a boss at the end; cleared by defeating the boss.
fn stage_three() -> LevelData {
    let width = 100;
    let mut grid = ground_slab(width);
    for &(x, w) in &[(9, 2), (22, 3), (33, 4), (60, 3)] {
        pit(&mut grid, x, w);
    }
    spikes(&mut grid, 50, 53);
    spikes(&mut grid, 66, 68);
    platforms(
        &mut grid,
        &[
            (12, 8, 4),
            (20, 7, 4),
            (28, 6, 5),
            (38, 8, 4),
            (46, 7, 4),
            (58, 6, 5),
            (68, 5, 4),
            (78, 7, 4),
            (73, 8, 3),
        ],
    );
    staircase(&mut grid, 82, 5);

    let mut level = data(
        "Stage 3",
        grid,
        vec![
            spawn(EnemyKind::Goomba, 14, 10, 12, 20),
            spawn(EnemyKind::Mouse, 28, 10, 26, 34),
            spawn(EnemyKind::Turtle, 44, 10, 42, 48),
            spawn(EnemyKind::Mouse, 56, 7, 54, 60),
            spawn(EnemyKind::Goomba, 70, 6, 68, 74),
            spawn(EnemyKind::Boss, 88, 10, 86, 96),
        ],
    );
    level.theme = Some("battle".to_string());
    level.win_by_defeating_boss = true;
    level
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_levels_validate() {
        let levels = builtin_levels().unwrap();
        assert_eq!(levels.len(), 3);
        let names: Vec<_> = levels.iter().map(|l| l.name()).collect();
        assert_eq!(names, ["Stage 1", "Stage 2", "Stage 3"]);
    }

    #[test]
    fn flag_stages_have_a_flag_and_boss_stage_does_not() {
        let levels = builtin_levels().unwrap();
        assert!(levels[0].grid().tiles().contains(&Tile::Flag));
        assert!(levels[1].grid().tiles().contains(&Tile::Flag));
        assert!(!levels[2].grid().tiles().contains(&Tile::Flag));
        assert!(levels[2].win_by_defeating_boss());
        assert_eq!(levels[2].theme(), Some("battle"));
    }

    #[test]
    fn stage_one_layout() {
        let levels = builtin_levels().unwrap();
        let grid = levels[0].grid();
        assert_eq!((grid.width(), grid.height()), (60, 17));
        // Pit near the start goes all the way down
        for y in GROUND_ROW..STAGE_HEIGHT {
            assert_eq!(grid.tile(9, y as i32), Tile::Empty);
            assert_eq!(grid.tile(10, y as i32), Tile::Empty);
        }
        assert_eq!(grid.tile(11, GROUND_ROW as i32), Tile::Ground);
        // Staircase climbs to the right
        assert_eq!(grid.tile(52, 11), Tile::Ground);
        assert_eq!(grid.tile(55, 8), Tile::Ground);
        // Flag pole spans rows 5..=11
        assert_eq!(grid.tile(58, 5), Tile::Flag);
        assert_eq!(grid.tile(58, 11), Tile::Flag);
    }

    #[test]
    fn stage_two_spikes_replace_ground_surface() {
        let levels = builtin_levels().unwrap();
        let grid = levels[1].grid();
        for x in 30..=34 {
            assert_eq!(grid.tile(x, GROUND_ROW as i32), Tile::Spike);
            assert_eq!(grid.tile(x, GROUND_ROW as i32 + 1), Tile::Ground);
        }
    }

    #[test]
    fn every_builtin_enemy_has_a_patrol() {
        for level in builtin_levels().unwrap() {
            assert!(level.enemies().iter().all(|e| e.patrol.is_some()));
        }
    }
}
