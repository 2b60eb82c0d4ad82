//! Game state and core simulation types
//!
//! Every transition produces a fresh `GameState` snapshot; nothing in here is
//! mutated behind the state machine's back.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Top-level phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a usable viewport
    Loading,
    /// Map selection
    MainMenu,
    /// A round is in progress (or just ended)
    Playing,
}

/// Lane kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaneType {
    /// Safe
    Grass,
    /// Obstacles kill on contact
    Road,
    /// Obstacles are required for survival
    Water,
}

/// Lane kinds that carry a conveyor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovingKind {
    Road,
    Water,
}

impl MovingKind {
    pub fn lane_type(self) -> LaneType {
        match self {
            MovingKind::Road => LaneType::Road,
            MovingKind::Water => LaneType::Water,
        }
    }
}

/// Horizontal movement of a lane's conveyor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    Left,
    Right,
}

impl Heading {
    /// -1 for left, +1 for right
    pub fn sign(self) -> f32 {
        match self {
            Heading::Left => -1.0,
            Heading::Right => 1.0,
        }
    }
}

/// Frog move intent and facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Facing angle in degrees, clockwise from up
    pub fn degrees(self) -> u16 {
        match self {
            Direction::Up => 0,
            Direction::Right => 90,
            Direction::Down => 180,
            Direction::Left => 270,
        }
    }
}

/// Cosmetic obstacle color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectColor {
    White,
    Black,
    DarkGray,
    Red,
    Beige,
    LightBlue,
    Brown,
    DarkGreen,
}

impl ObjectColor {
    /// CSS color string
    pub fn css(self) -> &'static str {
        match self {
            ObjectColor::White => "white",
            ObjectColor::Black => "#000",
            ObjectColor::DarkGray => "#333",
            ObjectColor::Red => "red",
            ObjectColor::Beige => "beige",
            ObjectColor::LightBlue => "lightBlue",
            ObjectColor::Brown => "#654321",
            ObjectColor::DarkGreen => "#003300",
        }
    }
}

/// Named map layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MapType {
    #[default]
    #[serde(rename = "CLASSIC")]
    Classic,
    #[serde(rename = "LOS ANGELES")]
    LosAngeles,
    #[serde(rename = "VENICE")]
    Venice,
    #[serde(rename = "EXPERT")]
    Expert,
}

impl MapType {
    pub const ALL: [MapType; 4] = [
        MapType::Classic,
        MapType::LosAngeles,
        MapType::Venice,
        MapType::Expert,
    ];

    /// Catalog name (also the wire name used by the high score service)
    pub fn as_str(&self) -> &'static str {
        match self {
            MapType::Classic => "CLASSIC",
            MapType::LosAngeles => "LOS ANGELES",
            MapType::Venice => "VENICE",
            MapType::Expert => "EXPERT",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().replace(['_', '-'], " ").as_str() {
            "CLASSIC" => Some(MapType::Classic),
            "LOS ANGELES" | "LA" => Some(MapType::LosAngeles),
            "VENICE" => Some(MapType::Venice),
            "EXPERT" => Some(MapType::Expert),
            _ => None,
        }
    }
}

/// Layout derived from the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameSize {
    pub game_width: f32,
    pub game_height: f32,
    pub lane_height: f32,
    pub lane_padding: f32,
    pub frog_size: f32,
    pub is_mobile: bool,
}

/// The player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrogState {
    /// Left edge, in pixels
    pub x: f32,
    /// 0 = winning edge, NUM_LANES - 1 = start
    pub lane: usize,
    pub facing: Direction,
}

impl FrogState {
    /// Centered on the start lane, facing up
    pub fn initial(game_width: f32, frog_size: f32) -> Self {
        Self {
            x: (game_width - frog_size) / 2.0,
            lane: NUM_LANES - 1,
            facing: Direction::Up,
        }
    }
}

/// One obstacle on a conveyor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneObject {
    /// Offset along the conveyor at generation time
    pub start_pos: f32,
    /// Sequential within the lane, starting at 0
    pub id: u32,
    pub color: ObjectColor,
}

/// A road or water lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingLane {
    pub kind: MovingKind,
    /// Pixels per millisecond, always positive
    pub speed: f32,
    pub heading: Heading,
    /// Obstacle length in pixels
    pub length: f32,
    /// Spacing bounds (generation only)
    pub min_gap: f32,
    pub max_gap: f32,
    /// Never empty
    pub objects: Vec<LaneObject>,
}

impl MovingLane {
    /// Period of the conveyor
    pub fn loop_length(&self) -> f32 {
        self.objects
            .last()
            .map(|o| o.start_pos + self.length)
            .unwrap_or(self.length)
    }

    /// Milliseconds for the conveyor to repeat itself
    pub fn period_ms(&self) -> f32 {
        self.loop_length() / self.speed
    }
}

/// Runtime state of one lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LaneState {
    Grass,
    Moving(MovingLane),
}

impl LaneState {
    pub fn lane_type(&self) -> LaneType {
        match self {
            LaneState::Grass => LaneType::Grass,
            LaneState::Moving(lane) => lane.kind.lane_type(),
        }
    }

    pub fn moving(&self) -> Option<&MovingLane> {
        match self {
            LaneState::Grass => None,
            LaneState::Moving(lane) => Some(lane),
        }
    }
}

/// Round outcome. DEAD and WON are terminal until the next round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStatus {
    Alive,
    Dead,
    Won,
}

impl RoundStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RoundStatus::Dead | RoundStatus::Won)
    }
}

/// State of a round in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamePlayingState {
    pub game_size: GameSize,
    pub map_type: MapType,
    /// Identifies the round; gate timers are tagged with it
    pub round_id: u64,
    pub frog: FrogState,
    /// Index 0 is the winning edge
    pub lanes: Vec<LaneState>,
    /// Milliseconds since round start
    pub time_ms: u64,
    pub round_status: RoundStatus,
    pub has_moved: bool,
    pub ready_for_overlay: bool,
    pub ready_for_input: bool,
    /// Wall clock (unix ms)
    pub game_start_time: f64,
    pub game_win_time: Option<f64>,
}

impl GamePlayingState {
    /// Lane the frog is standing in
    pub fn current_lane(&self) -> &LaneState {
        &self.lanes[self.frog.lane]
    }

    /// Time to cross, only once the round is won
    pub fn finish_time_ms(&self) -> Option<f64> {
        self.game_win_time.map(|win| win - self.game_start_time)
    }

    /// Value for the on-screen round timer
    pub fn display_elapsed_ms(&self, now_ms: f64) -> f64 {
        match self.finish_time_ms() {
            Some(finish) => finish,
            None => (now_ms - self.game_start_time).clamp(0.0, MAX_DISPLAY_TIME_MS),
        }
    }
}

/// Complete game state, one variant per phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameState {
    Loading { loading_failed: bool },
    MainMenu { game_size: GameSize },
    Playing(Box<GamePlayingState>),
}

impl Default for GameState {
    fn default() -> Self {
        GameState::Loading {
            loading_failed: false,
        }
    }
}

impl GameState {
    pub fn phase(&self) -> GamePhase {
        match self {
            GameState::Loading { .. } => GamePhase::Loading,
            GameState::MainMenu { .. } => GamePhase::MainMenu,
            GameState::Playing(_) => GamePhase::Playing,
        }
    }

    pub fn playing(&self) -> Option<&GamePlayingState> {
        match self {
            GameState::Playing(playing) => Some(playing),
            _ => None,
        }
    }

    pub fn game_size(&self) -> Option<GameSize> {
        match self {
            GameState::Loading { .. } => None,
            GameState::MainMenu { game_size } => Some(*game_size),
            GameState::Playing(playing) => Some(playing.game_size),
        }
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Inputs a transition needs besides the state and the action:
/// the lane generator's random source and the round id counter.
#[derive(Debug, Clone)]
pub struct SimEnv {
    pub rng_state: RngState,
    pub rng: Pcg32,
    next_round_id: u64,
}

impl SimEnv {
    pub fn new(seed: u64) -> Self {
        let rng_state = RngState::new(seed);
        Self {
            rng: rng_state.to_rng(),
            rng_state,
            next_round_id: 1,
        }
    }

    /// Allocate a new round ID
    pub fn next_round_id(&mut self) -> u64 {
        let id = self.next_round_id;
        self.next_round_id += 1;
        id
    }
}
