//! Duel Pong entry point
//!
//! Native builds run one headless demo match (both paddles scripted) and
//! record the result. The wasm32 build is driven by the page through the
//! library instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use duel_pong::sim::{GameEvent, GamePhase, GameState, TickInput, advance};
    use duel_pong::{Leaderboard, Settings};

    env_logger::init();
    log::info!("Duel Pong (native) starting...");

    let now_ms = || {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0)
    };

    let settings = Settings::load();
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .or(settings.seed)
        .unwrap_or_else(|| now_ms() as u64);
    log::info!("Seed: {}", seed);

    let mut leaderboard = Leaderboard::load();
    let mut state = GameState::with_settings(&settings, seed);
    state.start_match(settings.mode);

    // Generous cap so a stalemate can't spin forever
    const MAX_TICKS: u64 = 60 * 60 * 30;
    let mut input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut bounces = 0u64;

    while state.time_ticks < MAX_TICKS {
        input.now_ms = now_ms();
        advance(&mut state, &input, &mut leaderboard);

        for event in state.drain_events() {
            match event {
                GameEvent::Bounce => bounces += 1,
                GameEvent::Score { scorer } => log::debug!("Point to {:?}", scorer),
                GameEvent::AchievementUnlocked(a) => log::info!("Achievement: {}", a.id()),
                GameEvent::MatchWon { winner, rounds_won } => {
                    log::info!("{:?} won {} rounds to take the match", winner, rounds_won)
                }
                other => log::debug!("{:?}", other),
            }
        }

        if state.phase() == GamePhase::MatchOver {
            break;
        }
    }

    let ms = &state.match_state;
    println!(
        "Final rounds: left {} - right {} after {} ticks ({} bounces, {} paddle hits)",
        ms.left.rounds_won, ms.right.rounds_won, state.time_ticks, bounces, ms.stats.hits
    );
    for (i, entry) in leaderboard.entries.iter().enumerate() {
        println!("{}. {} - {} rounds", i + 1, entry.name, entry.rounds_won);
    }

    leaderboard.save();
}

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Page-side setup; the page owns the frame loop and calls into the library
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already set: {}", e).into());
    }
    log::info!("Duel Pong starting...");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
