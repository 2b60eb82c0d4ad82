//! Procedural lane generation
//!
//! Each moving lane gets a random crossing time, from which its speed, obstacle
//! length and spacing follow. Obstacles are laid out once along a conveyor a few
//! screens long; kinematics replays that segment forever.

use rand::Rng;
use rand::seq::IndexedRandom;

use super::state::{Heading, LaneObject, LaneState, LaneType, MovingKind, MovingLane, ObjectColor};
use crate::consts::LOOP_SPAN_WIDTHS;

const ROAD_COLORS: [ObjectColor; 6] = [
    ObjectColor::White,
    ObjectColor::Black,
    ObjectColor::DarkGray,
    ObjectColor::Red,
    ObjectColor::Beige,
    ObjectColor::LightBlue,
];

// Brown listed twice: logs outnumber lily pads 2:1
const WATER_COLORS: [ObjectColor; 3] = [
    ObjectColor::Brown,
    ObjectColor::Brown,
    ObjectColor::DarkGreen,
];

/// Lanes slower than this get long obstacles and wide, regular gaps
const SLOW_LANE_SECS: f32 = 6.0;

/// (min_gap, max_gap) for a crossing time
fn gap_range(secs_to_cross: f32) -> (f32, f32) {
    if secs_to_cross < SLOW_LANE_SECS {
        (120.0, 480.0)
    } else {
        (180.0, 240.0)
    }
}

/// Generate a lane of the given type
pub fn generate_lane(lane_type: LaneType, game_width: f32, rng: &mut impl Rng) -> LaneState {
    let (kind, secs, length, colors): (MovingKind, f32, f32, &[ObjectColor]) = match lane_type {
        LaneType::Grass => return LaneState::Grass,
        LaneType::Road => {
            let secs: f32 = rng.random_range(2.0..8.0);
            let length = if secs < SLOW_LANE_SECS { 60.0 } else { 120.0 };
            (MovingKind::Road, secs, length, &ROAD_COLORS[..])
        }
        LaneType::Water => {
            let secs: f32 = rng.random_range(5.0..8.0);
            (
                MovingKind::Water,
                secs,
                rng.random_range(120.0..240.0),
                &WATER_COLORS[..],
            )
        }
    };
    let speed = game_width / (secs * 1000.0);
    let heading = if rng.random_bool(0.5) {
        Heading::Right
    } else {
        Heading::Left
    };
    let (min_gap, max_gap) = gap_range(secs);
    let objects = generate_objects(length, min_gap, max_gap, colors, game_width, rng);

    log::debug!(
        "{:?} lane: {:.1}s to cross, {} objects of {:.0}px heading {:?}",
        lane_type,
        secs,
        objects.len(),
        length,
        heading
    );

    LaneState::Moving(MovingLane {
        kind,
        speed,
        heading,
        length,
        min_gap,
        max_gap,
        objects,
    })
}

/// Lay out obstacles along the conveyor.
///
/// The first object is always placed; after that the cursor advances by one
/// object plus a random gap until it reaches the loop span. Every object starts
/// inside the span, and the loop is at least `span - max_gap` long.
fn generate_objects(
    length: f32,
    min_gap: f32,
    max_gap: f32,
    colors: &[ObjectColor],
    game_width: f32,
    rng: &mut impl Rng,
) -> Vec<LaneObject> {
    let span = LOOP_SPAN_WIDTHS * game_width;

    let mut objects = Vec::new();
    let mut pos = rng.random_range(min_gap..=max_gap);
    let mut id = 0;
    while objects.is_empty() || pos < span {
        let color = colors.choose(rng).copied().unwrap_or(ObjectColor::Black);
        objects.push(LaneObject {
            start_pos: pos,
            id,
            color,
        });
        id += 1;
        pos += length + rng.random_range(min_gap..=max_gap);
    }
    objects
}
