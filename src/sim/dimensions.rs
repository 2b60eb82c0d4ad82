//! Viewport to play-field layout

use super::state::GameSize;
use crate::consts::*;

/// Play-field dimensions before the mobile flag is attached
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameDimensions {
    pub game_width: f32,
    pub game_height: f32,
    pub lane_height: f32,
    pub lane_padding: f32,
    pub frog_size: f32,
}

impl GameDimensions {
    pub fn with_mobile(self, is_mobile: bool) -> GameSize {
        GameSize {
            game_width: self.game_width,
            game_height: self.game_height,
            lane_height: self.lane_height,
            lane_padding: self.lane_padding,
            frog_size: self.frog_size,
            is_mobile,
        }
    }
}

/// Fit the lanes into a window. Returns `None` if the window is too small.
pub fn compute_game_dimensions(window_width: f32, window_height: f32) -> Option<GameDimensions> {
    let lanes = NUM_LANES as f32;
    if window_width < MIN_GAME_WIDTH || window_height < MIN_LANE_HEIGHT * lanes {
        return None;
    }

    // Lane height sets frog size, so wide windows must not shrink the
    // number of horizontal frog positions below the minimum.
    let mut lane_height = (window_width / MIN_HORIZONTAL_FROG_POSITIONS).min(MAX_LANE_HEIGHT);
    if lane_height * lanes > window_height {
        lane_height = (window_height / lanes).floor();
    }
    let game_height = lane_height * lanes;

    // Lanes may have shrunk, so cap the width again
    let game_width = window_width.min(lane_height * MAX_HORIZONTAL_FROG_POSITIONS);

    let lane_padding = (lane_height / 15.0).floor().max(2.0);
    let frog_size = lane_height - lane_padding * 2.0;

    Some(GameDimensions {
        game_width,
        game_height,
        lane_height,
        lane_padding,
        frog_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_small_is_infeasible() {
        assert!(compute_game_dimensions(100.0, 800.0).is_none());
        assert!(compute_game_dimensions(800.0, 200.0).is_none());
    }

    #[test]
    fn test_large_window_caps_lane_height() {
        let dims = compute_game_dimensions(1920.0, 1080.0).unwrap();
        assert_eq!(dims.lane_height, 60.0);
        assert_eq!(dims.game_height, 780.0);
        assert_eq!(dims.game_width, 960.0);
        assert_eq!(dims.lane_padding, 4.0);
        assert_eq!(dims.frog_size, 52.0);
    }

    #[test]
    fn test_short_window_shrinks_lanes() {
        let dims = compute_game_dimensions(800.0, 400.0).unwrap();
        // floor(400 / 13) = 30
        assert_eq!(dims.lane_height, 30.0);
        assert_eq!(dims.game_width, 480.0);
        assert_eq!(dims.lane_padding, 2.0);
        assert_eq!(dims.frog_size, 26.0);
    }

    #[test]
    fn test_narrow_window_keeps_width() {
        let dims = compute_game_dimensions(320.0, 900.0).unwrap();
        assert_eq!(dims.lane_height, 40.0);
        assert_eq!(dims.game_width, 320.0);
        assert!(dims.with_mobile(true).is_mobile);
    }
}
