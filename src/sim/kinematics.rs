//! Conveyor motion
//!
//! Obstacle positions are a pure function of elapsed time. Each lane replays its
//! generated segment with period `loop_length`, placed so the visible window
//! `[-game_width, 2 * game_width]` is always covered and nothing pops at the wrap.

use super::state::{Heading, MovingLane};

/// Current screen-left position of every object, index-aligned with `lane.objects`
pub fn positions_at_time(lane: &MovingLane, elapsed_ms: u64, game_width: f32) -> Vec<f32> {
    let loop_length = lane.loop_length();
    let displacement = (lane.speed as f64 * elapsed_ms as f64) % loop_length as f64;

    lane.objects
        .iter()
        .map(|object| {
            let raw = wrap(object.start_pos as f64 + displacement, loop_length);
            match lane.heading {
                Heading::Left => 2.0 * game_width - raw,
                Heading::Right => -game_width + raw,
            }
        })
        .collect()
}

/// Offset along the conveyor in `[0, loop_length)`
fn wrap(offset: f64, loop_length: f32) -> f32 {
    let raw = (offset % loop_length as f64) as f32;
    // Narrowing can round up onto the period itself
    if raw >= loop_length { 0.0 } else { raw }
}
