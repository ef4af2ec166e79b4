//! Monster Splash headless driver
//!
//! Runs an unattended autoplay session for a fixed number of ticks and
//! reports the outcome. Useful for soak-testing balance changes:
//! `RUST_LOG=debug` surfaces every spawn, throw, and hit.
//!
//! Usage: monster-splash [seed] [ticks]

use std::time::{SystemTime, UNIX_EPOCH};

use monster_splash::flow::{App, FrameInput, Screen, TitleInput};
use monster_splash::sim::autoplay_input;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
    let ticks: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(3600);

    log::info!("running {ticks} ticks with seed {seed}");

    let mut app = App::new(seed);
    let start = FrameInput {
        title: TitleInput {
            start: true,
            ..Default::default()
        },
        ..Default::default()
    };
    app.frame(&start);

    let mut sessions: u32 = 1;
    let mut best_score: u32 = 0;
    for _ in 0..ticks {
        let input = match &app.screen {
            Screen::Playing(state) => {
                if state.is_game_over {
                    best_score = best_score.max(state.score);
                    sessions += 1;
                }
                FrameInput {
                    tick: autoplay_input(state),
                    ..Default::default()
                }
            }
            Screen::Title(_) => start.clone(),
        };
        app.frame(&input);
    }

    if let Some(state) = app.session() {
        best_score = best_score.max(state.score);
        println!(
            "ran {ticks} ticks across {sessions} session(s): current score {} (ammo {}), best score {best_score}",
            state.score, state.ammo
        );
    }
}
