//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through TICK actions
//! - Seeded RNG only, passed in explicitly
//! - No rendering, input or platform dependencies

pub mod collision;
pub mod dimensions;
pub mod kinematics;
pub mod lane;
pub mod map;
pub mod reducer;
pub mod state;
pub mod view;

pub use collision::{evaluate, moving_lane_status, road_hit, water_supported};
pub use dimensions::{GameDimensions, compute_game_dimensions};
pub use kinematics::positions_at_time;
pub use lane::generate_lane;
pub use map::{lane_types, lanes_for_map};
pub use reducer::{Action, PhaseError, reduce};
pub use state::{
    Direction, FrogState, GamePhase, GamePlayingState, GameSize, GameState, Heading, LaneObject,
    LaneState, LaneType, MapType, MovingKind, MovingLane, ObjectColor, RngState, RoundStatus,
    SimEnv,
};
pub use view::{FrogView, LaneObjectView, frog_view, lane_object_positions, lane_object_views};
