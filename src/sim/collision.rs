//! Round outcome from frog/obstacle overlap
//!
//! Road and water use different tests on purpose: touching a car is enough to
//! die, but staying afloat needs the frog's center region to be over a log.

use super::kinematics::positions_at_time;
use super::state::{GamePlayingState, MovingKind, MovingLane, RoundStatus};

/// Half-open overlap of `[frog_left, frog_left + frog_size)` with `[obj_left, obj_left + length)`
#[inline]
pub fn road_hit(frog_left: f32, frog_size: f32, obj_left: f32, length: f32) -> bool {
    frog_left + frog_size > obj_left && frog_left < obj_left + length
}

/// Whether the frog is carried by the object. Biased by half a frog toward the
/// object's left so the frog must be substantially supported.
#[inline]
pub fn water_supported(frog_left: f32, frog_size: f32, obj_left: f32, length: f32) -> bool {
    let half = frog_size / 2.0;
    frog_left > obj_left - half && frog_left < obj_left + length - half
}

/// Outcome of standing at `frog_left` in a moving lane at `elapsed_ms`
pub fn moving_lane_status(
    lane: &MovingLane,
    frog_left: f32,
    frog_size: f32,
    elapsed_ms: u64,
    game_width: f32,
) -> RoundStatus {
    let positions = positions_at_time(lane, elapsed_ms, game_width);
    match lane.kind {
        MovingKind::Road => {
            if positions
                .iter()
                .any(|&left| road_hit(frog_left, frog_size, left, lane.length))
            {
                RoundStatus::Dead
            } else {
                RoundStatus::Alive
            }
        }
        MovingKind::Water => {
            if positions
                .iter()
                .any(|&left| water_supported(frog_left, frog_size, left, lane.length))
            {
                RoundStatus::Alive
            } else {
                RoundStatus::Dead
            }
        }
    }
}

/// Evaluate the round status for the current frog position and time.
///
/// Terminal statuses are returned unchanged.
pub fn evaluate(state: &GamePlayingState) -> RoundStatus {
    if state.round_status.is_terminal() {
        return state.round_status;
    }
    if state.frog.lane == 0 {
        return RoundStatus::Won;
    }

    match state.current_lane().moving() {
        None => RoundStatus::Alive,
        Some(lane) => moving_lane_status(
            lane,
            state.frog.x,
            state.game_size.frog_size,
            state.time_ms,
            state.game_size.game_width,
        ),
    }
}
