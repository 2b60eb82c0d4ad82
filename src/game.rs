//! Game driver
//!
//! Owns the current snapshot and feeds it actions: fixed-period ticks from
//! elapsed frame time, player intents, and the one-shot gate timers
//! (READY_FOR_INPUT / READY_FOR_OVERLAY). Gate timers are tagged with the round
//! they were scheduled for and dropped if that round is gone when they fire.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::settings::Settings;
use crate::sim::{
    Action, Direction, GamePhase, GamePlayingState, GameState, MapType, PhaseError, SimEnv,
    reduce,
};

/// Wall clock used for round start/win stamps
pub trait Clock {
    /// Unix time in milliseconds
    fn now_ms(&self) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<Cell<f64>>);

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self(Rc::new(Cell::new(start_ms)))
    }

    pub fn set(&self, now_ms: f64) {
        self.0.set(now_ms);
    }

    pub fn advance(&self, ms: f64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.0.get()
    }
}

/// Timed gates on a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Input,
    Overlay,
}

impl Gate {
    fn action(self) -> Action {
        match self {
            Gate::Input => Action::ReadyForInput,
            Gate::Overlay => Action::ReadyForOverlay,
        }
    }
}

/// A pending one-shot gate action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateTimer {
    /// Driver time (ms since the driver started)
    pub fire_at_ms: u64,
    pub round_id: u64,
    pub gate: Gate,
}

pub struct Game<C: Clock = SystemClock> {
    state: GameState,
    env: SimEnv,
    clock: C,
    settings: Settings,
    /// Driver time in ms
    now_ms: u64,
    next_tick_ms: u64,
    timers: Vec<GateTimer>,
}

impl Game<SystemClock> {
    pub fn new(settings: Settings) -> Self {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> Game<C> {
    pub fn with_clock(settings: Settings, clock: C) -> Self {
        let seed = settings
            .seed
            .unwrap_or_else(|| clock.now_ms().to_bits());
        log::info!("Game driver created (seed {})", seed);
        let tick_ms = u64::from(settings.tick_ms.max(1));
        Self {
            state: GameState::default(),
            env: SimEnv::new(seed),
            clock,
            settings,
            now_ms: 0,
            next_tick_ms: tick_ms,
            timers: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn playing(&self) -> Option<&GamePlayingState> {
        self.state.playing()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.env.rng_state.seed
    }

    /// Driver time in ms
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn wall_clock_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    pub fn pending_timers(&self) -> &[GateTimer] {
        &self.timers
    }

    /// Apply one action and schedule whatever gate timers the new snapshot needs
    pub fn dispatch(&mut self, action: Action) -> Result<&GameState, PhaseError> {
        let before = self.state.phase();
        let next = reduce(&self.state, &action, &mut self.env, self.clock.now_ms())?;
        self.state = next;

        let after = self.state.phase();
        if before != after {
            log::info!("Phase {:?} -> {:?}", before, after);
        }
        self.schedule_gates();
        Ok(&self.state)
    }

    pub fn resize(&mut self, width: f32, height: f32, is_mobile: bool) -> Result<&GameState, PhaseError> {
        self.dispatch(Action::ScreenResize {
            width,
            height,
            is_mobile,
        })
    }

    pub fn start(&mut self, map_type: MapType) -> Result<&GameState, PhaseError> {
        self.dispatch(Action::StartGame { map_type })
    }

    pub fn move_frog(&mut self, direction: Direction) -> Result<&GameState, PhaseError> {
        self.dispatch(Action::FrogMove { direction })
    }

    pub fn return_to_menu(&mut self) -> Result<&GameState, PhaseError> {
        self.dispatch(Action::ReturnToMainMenu)
    }

    /// Advance driver time, firing gate timers and fixed-period ticks in order.
    ///
    /// Timers due at the same instant as a tick fire first.
    pub fn advance(&mut self, elapsed_ms: u64) -> Result<(), PhaseError> {
        let target = self.now_ms + elapsed_ms;
        let tick_ms = self.settings.tick_ms.max(1);

        loop {
            let next_timer = self
                .timers
                .iter()
                .enumerate()
                .min_by_key(|(_, t)| t.fire_at_ms)
                .map(|(i, t)| (i, t.fire_at_ms));

            match next_timer {
                Some((index, at)) if at <= target && at <= self.next_tick_ms => {
                    self.now_ms = at;
                    let timer = self.timers.remove(index);
                    self.fire(timer)?;
                }
                _ if self.next_tick_ms <= target => {
                    self.now_ms = self.next_tick_ms;
                    self.next_tick_ms += u64::from(tick_ms);
                    if self.state.phase() == GamePhase::Playing {
                        self.dispatch(Action::Tick { tick_ms })?;
                    }
                }
                _ => break,
            }
        }

        self.now_ms = target;
        Ok(())
    }

    fn fire(&mut self, timer: GateTimer) -> Result<(), PhaseError> {
        let current_round = self.state.playing().map(|p| p.round_id);
        match current_round {
            Some(round_id) if round_id == timer.round_id => {
                log::debug!("{:?} gate opened for round {}", timer.gate, timer.round_id);
                self.dispatch(timer.gate.action())?;
            }
            _ => log::debug!(
                "Dropping stale {:?} timer for round {}",
                timer.gate,
                timer.round_id
            ),
        }
        Ok(())
    }

    fn schedule_gates(&mut self) {
        let Some(playing) = self.state.playing() else {
            return;
        };
        let round_id = playing.round_id;

        let mut wanted = Vec::new();
        if !playing.ready_for_input {
            wanted.push((Gate::Input, self.settings.input_delay_ms));
        }
        if playing.round_status.is_terminal() && !playing.ready_for_overlay {
            wanted.push((Gate::Overlay, self.settings.overlay_delay_ms));
        }

        for (gate, delay) in wanted {
            let pending = self
                .timers
                .iter()
                .any(|t| t.round_id == round_id && t.gate == gate);
            if !pending {
                log::debug!("Scheduling {:?} gate for round {} in {}ms", gate, round_id, delay);
                self.timers.push(GateTimer {
                    fire_at_ms: self.now_ms + delay,
                    round_id,
                    gate,
                });
            }
        }
    }
}
