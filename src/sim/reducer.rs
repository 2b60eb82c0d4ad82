//! Game state machine
//!
//! `reduce` is the single entry point for every action. It never mutates the
//! snapshot it is given; each transition returns a new `GameState`.
//!
//! Actions arriving while a gate is closed or in a phase where they mean
//! nothing are silently ignored. Actions that can only come from a caller bug
//! (starting a game before the viewport is known, for instance) are reported
//! as `PhaseError`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::collision::evaluate;
use super::dimensions::compute_game_dimensions;
use super::map::lanes_for_map;
use super::state::{
    Direction, FrogState, GamePhase, GamePlayingState, GameSize, GameState, LaneType, MapType,
    MovingKind, RoundStatus, SimEnv,
};

/// Everything that can happen to the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Viewport changed (also sent once at startup)
    ScreenResize {
        width: f32,
        height: f32,
        is_mobile: bool,
    },
    /// Start (or restart) a round on a map
    StartGame { map_type: MapType },
    /// Player move intent
    FrogMove { direction: Direction },
    /// Advance simulation time
    Tick { tick_ms: u32 },
    /// End-of-round overlay may be shown
    ReadyForOverlay,
    /// Movement input may be accepted
    ReadyForInput,
    /// Abandon the round
    ReturnToMainMenu,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::ScreenResize { .. } => "SCREEN_RESIZE",
            Action::StartGame { .. } => "START_GAME",
            Action::FrogMove { .. } => "FROG_MOVE",
            Action::Tick { .. } => "TICK",
            Action::ReadyForOverlay => "READY_FOR_OVERLAY",
            Action::ReadyForInput => "READY_FOR_INPUT",
            Action::ReturnToMainMenu => "RETURN_TO_MAIN_MENU",
        }
    }
}

/// An action was dispatched in a phase where it can never be valid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseError {
    pub action: &'static str,
    pub phase: GamePhase,
}

impl fmt::Display for PhaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not valid in phase {:?}", self.action, self.phase)
    }
}

impl std::error::Error for PhaseError {}

/// Apply one action to a snapshot.
///
/// `now_ms` is the wall clock (unix ms) used for round start/win stamps.
pub fn reduce(
    state: &GameState,
    action: &Action,
    env: &mut SimEnv,
    now_ms: f64,
) -> Result<GameState, PhaseError> {
    let invalid = || PhaseError {
        action: action.name(),
        phase: state.phase(),
    };

    match action {
        Action::ScreenResize {
            width,
            height,
            is_mobile,
        } => Ok(reduce_screen_resize(state, *width, *height, *is_mobile)),

        Action::StartGame { map_type } => match state {
            GameState::Loading { .. } => Err(invalid()),
            GameState::MainMenu { game_size } => {
                Ok(start_round(*game_size, *map_type, env, now_ms))
            }
            GameState::Playing(playing) if playing.ready_for_input => {
                Ok(start_round(playing.game_size, *map_type, env, now_ms))
            }
            GameState::Playing(_) => Ok(state.clone()),
        },

        Action::FrogMove { direction } => Ok(match state {
            GameState::Playing(playing) => match reduce_frog_move(playing, *direction, now_ms) {
                Some(next) => GameState::Playing(Box::new(next)),
                None => state.clone(),
            },
            _ => state.clone(),
        }),

        Action::Tick { tick_ms } => Ok(match state {
            GameState::Playing(playing) => GameState::Playing(Box::new(reduce_tick(playing, *tick_ms))),
            _ => state.clone(),
        }),

        Action::ReadyForOverlay => match state {
            GameState::Playing(playing) => Ok(GameState::Playing(Box::new(GamePlayingState {
                ready_for_overlay: true,
                ready_for_input: false,
                ..(**playing).clone()
            }))),
            _ => Err(invalid()),
        },

        Action::ReadyForInput => Ok(match state {
            GameState::Playing(playing) => GameState::Playing(Box::new(GamePlayingState {
                ready_for_input: true,
                ..(**playing).clone()
            })),
            _ => state.clone(),
        }),

        Action::ReturnToMainMenu => match state {
            GameState::Loading { .. } => Err(invalid()),
            GameState::MainMenu { game_size } => Ok(GameState::MainMenu {
                game_size: *game_size,
            }),
            GameState::Playing(playing) => {
                log::info!("Round {} abandoned, back to menu", playing.round_id);
                Ok(GameState::MainMenu {
                    game_size: playing.game_size,
                })
            }
        },
    }
}

fn reduce_screen_resize(state: &GameState, width: f32, height: f32, is_mobile: bool) -> GameState {
    // Layout is frozen for the duration of a round
    if let GameState::Playing(_) = state {
        log::debug!("Ignoring resize to {}x{} mid-round", width, height);
        return state.clone();
    }

    match compute_game_dimensions(width, height) {
        Some(dims) => {
            let game_size = dims.with_mobile(is_mobile);
            log::info!(
                "Viewport {}x{}: play field {}x{}, frog {}",
                width,
                height,
                game_size.game_width,
                game_size.game_height,
                game_size.frog_size
            );
            GameState::MainMenu { game_size }
        }
        None => {
            log::warn!("Viewport {}x{} too small to play", width, height);
            GameState::Loading {
                loading_failed: true,
            }
        }
    }
}

/// Fresh round with newly generated lanes
fn start_round(game_size: GameSize, map_type: MapType, env: &mut SimEnv, now_ms: f64) -> GameState {
    let round_id = env.next_round_id();
    let lanes = lanes_for_map(map_type, game_size.game_width, &mut env.rng);
    log::info!("Round {} started on {}", round_id, map_type.as_str());

    GameState::Playing(Box::new(GamePlayingState {
        game_size,
        map_type,
        round_id,
        frog: FrogState::initial(game_size.game_width, game_size.frog_size),
        lanes,
        time_ms: 0,
        round_status: RoundStatus::Alive,
        has_moved: false,
        ready_for_overlay: false,
        ready_for_input: false,
        game_start_time: now_ms,
        game_win_time: None,
    }))
}

/// Returns `None` when the move is ignored
fn reduce_frog_move(
    state: &GamePlayingState,
    direction: Direction,
    now_ms: f64,
) -> Option<GamePlayingState> {
    if state.round_status.is_terminal() || !state.ready_for_input {
        return None;
    }

    let mut next = state.clone();
    let frog = &mut next.frog;
    let frog_size = state.game_size.frog_size;
    let game_width = state.game_size.game_width;
    // On water the frog may step past the edge; the next tick decides its fate
    let clamp = state.current_lane().lane_type() != LaneType::Water;

    match direction {
        Direction::Up => frog.lane = frog.lane.saturating_sub(1),
        Direction::Down => frog.lane = (frog.lane + 1).min(state.lanes.len() - 1),
        Direction::Left => {
            frog.x = if clamp && frog.x - frog_size < 0.0 {
                0.0
            } else {
                frog.x - frog_size
            };
        }
        Direction::Right => {
            frog.x = if clamp && frog.x + frog_size > game_width - frog_size {
                game_width - frog_size
            } else {
                frog.x + frog_size
            };
        }
    }
    frog.facing = direction;
    next.has_moved = true;

    next.round_status = evaluate(&next);
    match next.round_status {
        RoundStatus::Won => {
            next.game_win_time = Some(now_ms);
            log::info!(
                "Round {} won in {:.0}ms",
                next.round_id,
                now_ms - next.game_start_time
            );
        }
        RoundStatus::Dead => log::info!("Round {} lost on lane {}", next.round_id, next.frog.lane),
        RoundStatus::Alive => {}
    }
    Some(next)
}

fn reduce_tick(state: &GamePlayingState, tick_ms: u32) -> GamePlayingState {
    let mut next = state.clone();
    next.time_ms = state.time_ms + u64::from(tick_ms);

    // Ride the log
    let water = state
        .current_lane()
        .moving()
        .filter(|lane| lane.kind == MovingKind::Water);
    if let (Some(lane), RoundStatus::Alive) = (water, state.round_status) {
        next.frog.x += lane.speed * tick_ms as f32 * lane.heading.sign();
    }

    next.round_status = evaluate(&next);
    if next.round_status == RoundStatus::Dead && state.round_status == RoundStatus::Alive {
        log::info!(
            "Round {} lost on lane {} at {}ms",
            next.round_id,
            next.frog.lane,
            next.time_ms
        );
    }
    next
}
