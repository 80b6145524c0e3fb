use serde::{Deserialize, Serialize};

use mariosan_core::geom::Rect;

use crate::config::ViewportConfig;
use crate::tiles::{TILE_SIZE, TileGrid};

/// Horizontal-only follow camera. `y` stays at the top of the level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Camera {
    pub fn new(viewport: &ViewportConfig) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: viewport.width,
            height: viewport.height,
        }
    }

    /// Keep the player at `follow_ratio` of the screen width, clamped so the
    /// view never leaves the level. Levels narrower than the view pin to 0.
    pub fn follow(&mut self, player_x: f32, level_width: f32, follow_ratio: f32) {
        let max_x = (level_width - self.width).max(0.0);
        self.x = (player_x - self.width * follow_ratio).clamp(0.0, max_x);
    }

    pub fn view(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Tile columns worth drawing, one column of slack on each side,
    /// clipped to the grid.
    pub fn visible_columns(&self, grid: &TileGrid) -> std::ops::Range<u32> {
        let first = (self.x / TILE_SIZE).floor() as i64 - 1;
        let last = ((self.x + self.width) / TILE_SIZE).ceil() as i64 + 1;
        let width = grid.width() as i64;
        let start = first.clamp(0, width) as u32;
        let end = last.clamp(0, width) as u32;
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(&ViewportConfig::default())
    }

    #[test]
    fn follows_with_lead_room() {
        let mut cam = camera();
        cam.follow(1000.0, 3200.0, 0.35);
        assert_eq!(cam.x, 1000.0 - 960.0 * 0.35);
    }

    #[test]
    fn clamps_to_level_edges() {
        let mut cam = camera();
        cam.follow(10.0, 3200.0, 0.35);
        assert_eq!(cam.x, 0.0);
        cam.follow(3190.0, 3200.0, 0.35);
        assert_eq!(cam.x, 3200.0 - 960.0);
    }

    #[test]
    fn narrow_level_pins_to_origin() {
        let mut cam = camera();
        cam.follow(500.0, 640.0, 0.35);
        assert_eq!(cam.x, 0.0);
    }

    #[test]
    fn visible_columns_have_slack_and_clip() {
        let grid = TileGrid::empty(100, 17);
        let mut cam = camera();
        assert_eq!(cam.visible_columns(&grid), 0..31);

        cam.x = 320.0;
        assert_eq!(cam.visible_columns(&grid), 9..41);

        cam.x = 100.0 * TILE_SIZE - 960.0;
        assert_eq!(cam.visible_columns(&grid), 69..100);
    }
}
