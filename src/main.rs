//! Frog Crossing headless runner
//!
//! Plays one round with a greedy autopilot on a fixed viewport and prints the
//! outcome. Usage: `frog-crossing [MAP] [--seed N] [--settings FILE] [--name NAME]
//! [--scores FILE]`

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use frog_crossing::consts::*;
use frog_crossing::highscores::{HighScoreTable, ScoreQuery, ScoreSubmission, format_millis};
use frog_crossing::sim::{
    Direction, GamePlayingState, LaneState, MapType, MovingKind, RoundStatus, moving_lane_status,
};
use frog_crossing::{Clock, Game, LocalScoreService, ManualClock, ScoreService, Settings, SystemClock};

#[derive(Parser, Debug)]
#[command(name = "frog-crossing")]
#[command(about = "Play one Frog Crossing round headlessly with a greedy autopilot")]
struct Cli {
    /// Map to play (CLASSIC, LOS ANGELES, VENICE, EXPERT); settings default if omitted
    #[arg(value_parser = parse_map)]
    map: Option<MapType>,
    /// RNG seed, overriding the settings file
    #[arg(long)]
    seed: Option<u64>,
    /// Settings file (defaults are used if it is missing)
    #[arg(long, default_value = "frog-crossing.json")]
    settings: PathBuf,
    /// Name submitted with a winning time
    #[arg(long, default_value = "AUTOFROG")]
    name: String,
    /// High score file, read before and written after submitting
    #[arg(long)]
    scores: Option<PathBuf>,
}

fn parse_map(s: &str) -> std::result::Result<MapType, String> {
    MapType::from_str(s).ok_or_else(|| {
        let names: Vec<&str> = MapType::ALL.iter().map(|m| m.as_str()).collect();
        format!("unknown map '{s}', expected one of: {}", names.join(", "))
    })
}

const VIEWPORT: (f32, f32) = (960.0, 1080.0);
/// Give up after this much round time
const MAX_ROUND_MS: u64 = 5 * 60 * 1000;
/// Minimum time between hops
const HOP_INTERVAL_MS: u64 = 120;
/// Ticks of road traffic checked before stepping into or staying in a lane
const LOOKAHEAD_TICKS: u64 = 6;

/// Whether a frog at (`lane`, `x`) survives the next few ticks
fn safe_at(round: &GamePlayingState, lane: usize, x: f32, tick_ms: u64) -> bool {
    if lane == 0 {
        return true;
    }
    let size = &round.game_size;
    let moving = match &round.lanes[lane] {
        LaneState::Grass => return true,
        LaneState::Moving(moving) => moving,
    };
    let alive_at =
        |t: u64| moving_lane_status(moving, x, size.frog_size, t, size.game_width) == RoundStatus::Alive;

    match moving.kind {
        // Carried along with the log, so only the landing matters
        MovingKind::Water => {
            x >= 0.0 && x <= size.game_width - size.frog_size && alive_at(round.time_ms)
        }
        MovingKind::Road => {
            (0..=LOOKAHEAD_TICKS).all(|k| alive_at(round.time_ms + k * tick_ms))
        }
    }
}

/// Pick the next hop: forward if safe, otherwise stay, otherwise dodge
fn choose_move(round: &GamePlayingState, tick_ms: u64) -> Option<Direction> {
    let frog = &round.frog;
    let step = round.game_size.frog_size;
    let lane = frog.lane;

    if safe_at(round, lane.saturating_sub(1), frog.x, tick_ms) {
        return Some(Direction::Up);
    }
    if safe_at(round, lane, frog.x, tick_ms) {
        return None;
    }
    let max_x = round.game_size.game_width - step;
    [
        (Direction::Left, lane, (frog.x - step).max(0.0)),
        (Direction::Right, lane, (frog.x + step).min(max_x)),
        (Direction::Down, (lane + 1).min(NUM_LANES - 1), frog.x),
    ]
    .into_iter()
    .find(|&(_, lane, x)| safe_at(round, lane, x, tick_ms))
    .map(|(direction, _, _)| direction)
}

fn main() -> Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Frog Crossing (headless) starting...");

    let cli = Cli::parse();
    let mut settings = Settings::load(&cli.settings);
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }
    let map_type = cli.map.unwrap_or(settings.default_map);
    let tick_ms = u64::from(settings.tick_ms);

    let clock = ManualClock::new(SystemClock.now_ms());
    let mut game = Game::with_clock(settings, clock.clone());
    log::info!("Playing {} with seed {}", map_type.as_str(), game.seed());

    game.resize(VIEWPORT.0, VIEWPORT.1, false)?;
    game.start(map_type)?;

    let mut last_hop_ms = 0;
    loop {
        clock.advance(tick_ms as f64);
        game.advance(tick_ms)?;

        let Some(round) = game.playing() else {
            return Err(anyhow!("round ended before reaching a result"));
        };
        if round.round_status.is_terminal() {
            break;
        }
        if round.time_ms >= MAX_ROUND_MS {
            println!("Gave up after {}", format_millis(round.time_ms as f64));
            return Ok(());
        }
        if !round.ready_for_input || round.time_ms < last_hop_ms + HOP_INTERVAL_MS {
            continue;
        }
        if let Some(direction) = choose_move(round, tick_ms) {
            log::debug!("Hop {:?} from lane {}", direction, round.frog.lane);
            last_hop_ms = round.time_ms;
            game.move_frog(direction)?;
        }
    }

    // Let the overlay gate open
    let overlay_delay = game.settings().overlay_delay_ms;
    clock.advance(overlay_delay as f64);
    game.advance(overlay_delay)?;

    let Some(round) = game.playing() else {
        return Err(anyhow!("round ended before reaching a result"));
    };
    println!("Map:    {}", round.map_type.as_str());
    println!("Seed:   {}", game.seed());
    println!("Result: {:?} on lane {}", round.round_status, round.frog.lane);
    println!(
        "Timer:  {}",
        format_millis(round.display_elapsed_ms(game.wall_clock_ms()))
    );

    let Some(submission) = ScoreSubmission::from_round(round, &cli.name) else {
        return Ok(());
    };
    println!("Submit: {}", submission.to_json()?);

    let mut service = match &cli.scores {
        Some(path) if path.exists() => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed reading {}", path.display()))?;
            LocalScoreService::from_json(&json)
                .with_context(|| format!("invalid high score file {}", path.display()))?
        }
        _ => LocalScoreService::new(),
    };

    let shown = game.settings().high_scores_shown;
    let before = HighScoreTable::new(service.fetch(&ScoreQuery::top(map_type))?, shown);
    if let Some(rank) = before.potential_rank(submission.finish_time_ms) {
        println!("New high score! Rank #{}", rank);
    }

    let rows = service.submit(&submission)?;
    for row in rows.iter().take(shown).chain(rows.iter().skip(shown).filter(|r| r.is_your_score)) {
        let marker = if row.is_your_score { " <" } else { "" };
        println!(
            "{:>3}. {:<12} {}{}",
            row.rank,
            row.name,
            format_millis(row.finish_time_ms),
            marker
        );
    }

    if let Some(path) = &cli.scores {
        fs::write(path, service.to_json()?)
            .with_context(|| format!("failed writing {}", path.display()))?;
        log::info!("Saved high scores to {}", path.display());
    }
    Ok(())
}
