//! Fixed timestep simulation tick
//!
//! Every mutation of the session happens on this one timeline: input is
//! applied at the start of a tick, then the world advances by `SIM_DT`.

use super::drop::DropOutcome;
use super::state::GameSession;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Drop a ball from a random column near the centre
    pub drop: bool,
    /// Drop a ball from this column instead
    pub drop_at: Option<f32>,
    /// Leave auto play
    pub stop_auto: bool,
}

impl TickInput {
    /// Clear one-shot commands after they have been applied
    pub fn clear_one_shots(&mut self) {
        self.drop = false;
        self.drop_at = None;
        self.stop_auto = false;
    }
}

/// Apply `input` and advance the session by one fixed timestep
pub fn tick(session: &mut GameSession, input: &TickInput, dt: f32) -> Option<DropOutcome> {
    if input.stop_auto {
        session.stop_auto();
    }

    // A refused drop is queued by the session as a `Rejected` event
    if let Some(x) = input.drop_at {
        let _ = session.drop_ball_at(x);
    } else if input.drop {
        let _ = session.drop_ball();
    }

    session.step(dt)
}

/// Frame accumulator for driving the fixed step from a variable-rate clock
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run as many fixed ticks as `frame_dt` covers (capped at `MAX_SUBSTEPS`).
    ///
    /// One-shot commands in `input` are consumed by the first tick.
    pub fn update(
        &mut self,
        session: &mut GameSession,
        input: &mut TickInput,
        frame_dt: f32,
    ) -> Vec<DropOutcome> {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut outcomes = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            if let Some(outcome) = tick(session, input, SIM_DT) {
                outcomes.push(outcome);
            }
            input.clear_one_shots();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        outcomes
    }

    /// Leftover time not yet simulated
    pub fn pending(&self) -> f32 {
        self.accumulator
    }
}
