//! Title screen and outer session driver
//!
//! The original shipped as two engine scenes behind an inheritance
//! hierarchy; here they are two plain values the host loop drives: a
//! `TitleFlow` for the menu and a `GameState` for play. The host calls
//! `frame` once per rendered frame and reads whichever screen is active.

use crate::consts::SIM_DT;
use crate::sim::{GameState, TickInput, tick};
use crate::tuning::Tuning;

/// Input edges for the title screen
#[derive(Debug, Clone, Default)]
pub struct TitleInput {
    /// Toggle the rules panel
    pub toggle_rules: bool,
    /// Start a session
    pub start: bool,
}

/// Title screen state: a rules overlay and a start button
#[derive(Debug, Clone, Default)]
pub struct TitleFlow {
    pub rules_open: bool,
}

impl TitleFlow {
    /// Handle one frame of title input; returns true when play should begin
    pub fn handle(&mut self, input: &TitleInput) -> bool {
        if input.toggle_rules {
            self.rules_open = !self.rules_open;
        }
        input.start
    }
}

/// Which screen is active
#[derive(Debug)]
pub enum Screen {
    Title(TitleFlow),
    Playing(Box<GameState>),
}

/// Combined per-frame input
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub title: TitleInput,
    pub tick: TickInput,
}

/// Top-level driver: title screen into gameplay, restart handled in-session
pub struct App {
    pub screen: Screen,
    tuning: Tuning,
    next_seed: u64,
}

impl App {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            screen: Screen::Title(TitleFlow::default()),
            tuning,
            next_seed: seed,
        }
    }

    /// Advance whichever screen is active by one frame
    pub fn frame(&mut self, input: &FrameInput) {
        match &mut self.screen {
            Screen::Title(title) => {
                if title.handle(&input.title) {
                    let state = GameState::with_tuning(self.next_seed, self.tuning.clone());
                    log::info!("session started with seed {}", self.next_seed);
                    self.next_seed = self.next_seed.wrapping_add(1);
                    self.screen = Screen::Playing(Box::new(state));
                }
            }
            Screen::Playing(state) => tick(state, &input.tick, SIM_DT),
        }
    }

    /// The live session, if one is running
    pub fn session(&self) -> Option<&GameState> {
        match &self.screen {
            Screen::Playing(state) => Some(state),
            _ => None,
        }
    }
}
