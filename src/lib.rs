//! Frog Crossing - simulation core for a lane-crossing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lanes, motion, outcomes, state machine)
//! - `game`: Driver that owns the current snapshot, ticks and gate timers
//! - `highscores`: High score service contract and local reference service
//! - `settings`: Runtime configuration

pub mod game;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use game::{Clock, Game, ManualClock, SystemClock};
pub use highscores::{HighScoreError, LocalScoreService, ScoreService};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Number of lanes on every map (index 0 is the winning edge)
    pub const NUM_LANES: usize = 13;

    /// Fixed simulation tick (20ms = 50 evaluations per second)
    pub const TICK_MS: u32 = 20;
    /// Delay before movement input is accepted after a transition
    pub const INPUT_DELAY_MS: u64 = 250;
    /// Delay before the end-of-round overlay is shown
    pub const OVERLAY_DELAY_MS: u64 = 90;

    /// Lane height bounds (pixels)
    pub const MIN_LANE_HEIGHT: f32 = 20.0;
    pub const MAX_LANE_HEIGHT: f32 = 60.0;
    /// Approximate number of horizontal frog positions
    pub const MIN_HORIZONTAL_FROG_POSITIONS: f32 = 8.0;
    pub const MAX_HORIZONTAL_FROG_POSITIONS: f32 = 16.0;
    pub const MIN_GAME_WIDTH: f32 = MIN_LANE_HEIGHT * MIN_HORIZONTAL_FROG_POSITIONS;

    /// Generated conveyor span, in multiples of the game width
    pub const LOOP_SPAN_WIDTHS: f32 = 4.0;

    /// Round timer stops counting at 59:59.99
    pub const MAX_DISPLAY_TIME_MS: f64 = 3_599_999.0;
}
