use std::fmt;

/// Reasons a level cannot be loaded.
///
/// All of these are detected before a `LevelRuntime` sees the level, so the
/// runtime never runs on partially initialized data.
#[derive(Debug)]
pub enum LevelError {
    /// `tiles.len()` does not equal `width * height`.
    TileCountMismatch {
        width: u32,
        height: u32,
        actual: usize,
    },
    /// Width or height is zero.
    EmptyGrid,
    /// Player spawn lies outside `[0, width) x [0, height)`.
    SpawnOutOfBounds { x: i32, y: i32 },
    /// An enemy descriptor lies outside the grid.
    EnemyOutOfBounds { index: usize, x: i32, y: i32 },
    /// Patrol bounds with `left > right`.
    InvalidPatrol { index: usize, left: i32, right: i32 },
    /// `win_by_defeating_boss` is set but no Boss is spawned.
    MissingBoss,
    /// Boss tuning with a non-positive or non-finite value.
    InvalidBossTuning(String),
    /// A level file could not be read.
    Io(String),
    /// A level file is not valid JSON for the level schema.
    Parse(String),
    /// A level list with no levels in it.
    NoLevels,
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TileCountMismatch {
                width,
                height,
                actual,
            } => write!(
                f,
                "tile count {actual} does not match {width}x{height} = {}",
                *width as u64 * *height as u64
            ),
            Self::EmptyGrid => write!(f, "level has zero width or height"),
            Self::SpawnOutOfBounds { x, y } => {
                write!(f, "player spawn ({x}, {y}) is outside the level")
            },
            Self::EnemyOutOfBounds { index, x, y } => {
                write!(f, "enemy #{index} at ({x}, {y}) is outside the level")
            },
            Self::InvalidPatrol { index, left, right } => {
                write!(f, "enemy #{index} patrol left {left} > right {right}")
            },
            Self::MissingBoss => {
                write!(f, "level is won by defeating a boss but spawns none")
            },
            Self::InvalidBossTuning(m) => write!(f, "invalid boss tuning: {m}"),
            Self::Io(e) => write!(f, "level io error: {e}"),
            Self::Parse(e) => write!(f, "level parse error: {e}"),
            Self::NoLevels => write!(f, "no levels to play"),
        }
    }
}

impl std::error::Error for LevelError {}
