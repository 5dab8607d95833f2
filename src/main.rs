//! Plinko headless runner
//!
//! Usage: `plinko [settings.json] [drops]`
//!
//! Runs drops back to back through the fixed-step loop and logs each
//! settlement. Set `RUST_LOG=debug` for per-drop physics detail.

use std::process::ExitCode;

use plinko_core::Settings;
use plinko_core::sim::{FrameClock, GameEvent, GameSession, TickInput};

const DEFAULT_DROPS: u32 = 10;
/// Frame delta fed to the clock (60 fps)
const FRAME_DT: f32 = 1.0 / 60.0;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Plinko (native) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = match args.first().filter(|a| a.ends_with(".json")) {
        Some(path) => match Settings::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::error!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };
    let drops = args
        .iter()
        .find_map(|a| a.parse::<u32>().ok())
        .unwrap_or(DEFAULT_DROPS);

    let mut session = match GameSession::create(settings) {
        Ok(session) => session,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    session.start_auto(Some(drops));
    let mut clock = FrameClock::new();
    let mut input = TickInput::default();
    // Every drop resolves within its tick budget; each frame runs at least one tick
    let max_frames = (drops as u64 + 1) * (session.settings().physics.tick_budget as u64 + 1);

    for _ in 0..max_frames {
        clock.update(&mut session, &mut input, FRAME_DT);
        let mut finished = false;
        for event in session.drain_events() {
            match event {
                GameEvent::Resolved(outcome) => log::info!(
                    "Drop {}: x{} -> payout {:.2}, balance {:.2}{}",
                    outcome.drop_id,
                    outcome.multiplier,
                    outcome.payout,
                    outcome.balance,
                    if outcome.forced { " (forced)" } else { "" }
                ),
                GameEvent::AutoStopped { reason } => {
                    log::info!("Auto play finished: {:?}", reason);
                    finished = true;
                }
                other => log::debug!("{:?}", other),
            }
        }
        if finished {
            break;
        }
    }

    let stats = session.stats().clone();
    let snapshot = session.dispose();
    match serde_json::to_string_pretty(&stats) {
        Ok(json) => println!("{json}"),
        Err(err) => log::warn!("Could not serialize stats: {err}"),
    }
    log::info!(
        "{} drops, wagered {:.2}, returned {:.2}, final balance {:.2}",
        stats.drops,
        stats.total_wagered,
        stats.total_returned,
        snapshot.balance
    );
    ExitCode::SUCCESS
}
