//! Read-only selectors for presentation
//!
//! These take `&GamePlayingState`, so they cannot be called outside a round.

use glam::Vec2;
use serde::Serialize;

use super::kinematics::positions_at_time;
use super::state::{Direction, GamePlayingState, ObjectColor, RoundStatus};

/// One obstacle ready for placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LaneObjectView {
    pub left: f32,
    pub length: f32,
    pub color: ObjectColor,
    pub id: u32,
}

/// The frog ready for placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrogView {
    /// Top-left corner in play-field pixels
    pub pos: Vec2,
    pub facing: Direction,
    pub status: RoundStatus,
}

/// Screen-left of every object in a lane (empty for grass)
pub fn lane_object_positions(state: &GamePlayingState, lane: usize) -> Vec<f32> {
    match state.lanes[lane].moving() {
        Some(moving) => positions_at_time(moving, state.time_ms, state.game_size.game_width),
        None => Vec::new(),
    }
}

/// Obstacles of a lane at the current time (empty for grass)
pub fn lane_object_views(state: &GamePlayingState, lane: usize) -> Vec<LaneObjectView> {
    let Some(moving) = state.lanes[lane].moving() else {
        return Vec::new();
    };
    positions_at_time(moving, state.time_ms, state.game_size.game_width)
        .into_iter()
        .zip(&moving.objects)
        .map(|(left, object)| LaneObjectView {
            left,
            length: moving.length,
            color: object.color,
            id: object.id,
        })
        .collect()
}

pub fn frog_view(state: &GamePlayingState) -> FrogView {
    let size = &state.game_size;
    FrogView {
        pos: Vec2::new(
            state.frog.x,
            state.frog.lane as f32 * size.lane_height + size.lane_padding,
        ),
        facing: state.frog.facing,
        status: state.round_status,
    }
}
