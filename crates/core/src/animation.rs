//! Start/stop state machine and frame clock.
//!
//! The host owns the real clock and passes `now` in as a [`Duration`] since
//! any fixed epoch, so the same controller drives a browser loop, a native
//! window or a headless render at a fixed frame rate.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::settings::DrawSettings;

/// Whether the animation loop should keep scheduling ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Stopped,
    Running,
}

/// Clock and bookkeeping for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    /// Seconds since the last `start`, unscaled.
    pub t: f64,
    pub speed: f64,
    /// Seconds between the two most recent ticks. `None` until two ticks
    /// have been observed since `start`.
    pub delta_time: Option<f64>,
    pub stopped: bool,
    pub has_randomized_points: bool,
}

#[derive(Debug, Clone)]
pub struct AnimationController {
    state: AnimationState,
    origin: Duration,
    ticked: bool,
    run_settings: DrawSettings,
}

impl AnimationController {
    pub const DEFAULT_SPEED: f64 = 1.0;

    /// A stopped controller with full run settings.
    pub fn new(speed: f64) -> Self {
        Self {
            state: AnimationState {
                t: 0.0,
                speed,
                delta_time: None,
                stopped: true,
                has_randomized_points: false,
            },
            origin: Duration::ZERO,
            ticked: false,
            run_settings: DrawSettings::full(),
        }
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn run_state(&self) -> RunState {
        if self.state.stopped {
            RunState::Stopped
        } else {
            RunState::Running
        }
    }

    pub fn is_running(&self) -> bool {
        !self.state.stopped
    }

    pub fn speed(&self) -> f64 {
        self.state.speed
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.state.speed = speed;
    }

    /// Settings used for every frame drawn while running.
    pub fn run_settings(&self) -> DrawSettings {
        self.run_settings
    }

    pub fn set_run_settings(&mut self, settings: DrawSettings) {
        self.run_settings = settings;
    }

    pub fn has_randomized_points(&self) -> bool {
        self.state.has_randomized_points
    }

    /// Records that the seed set no longer holds only the initial points,
    /// either because a reset randomized them or the user placed one.
    pub fn note_randomized(&mut self) {
        self.state.has_randomized_points = true;
    }

    /// Enters `Running` and restarts the clock at `now`.
    pub fn start(&mut self, now: Duration) {
        self.state.stopped = false;
        self.state.t = 0.0;
        self.state.delta_time = None;
        self.origin = now;
        self.ticked = false;
    }

    /// Enters `Stopped` and returns the settings for the reset pass.
    pub fn stop(&mut self) -> DrawSettings {
        self.state.stopped = true;
        self.reset_settings()
    }

    /// Settings a reset pass should use given the session so far.
    pub fn reset_settings(&self) -> DrawSettings {
        if self.state.has_randomized_points {
            DrawSettings::no_randomize()
        } else {
            self.run_settings
        }
    }

    /// Updates the clock and returns the scaled time to sample at, or
    /// `None` when stopped.
    pub fn advance(&mut self, now: Duration) -> Option<f64> {
        if self.state.stopped {
            return None;
        }
        let t = now.saturating_sub(self.origin).as_secs_f64();
        if self.ticked {
            self.state.delta_time = Some(t - self.state.t);
        }
        self.ticked = true;
        self.state.t = t;
        Some(self.scaled_time())
    }

    /// Elapsed seconds times speed.
    pub fn scaled_time(&self) -> f64 {
        self.state.t * self.state.speed
    }

    /// `1 / delta_time`, when a positive delta is known.
    pub fn frame_rate(&self) -> Option<f64> {
        self.state
            .delta_time
            .filter(|dt| *dt > 0.0)
            .map(|dt| 1.0 / dt)
    }

    /// Human-readable clock for a status bar.
    pub fn status_line(&self) -> String {
        if self.state.stopped {
            return "t = 0.00 (Click graph to set initial conditions)".to_string();
        }
        match self.frame_rate() {
            Some(fps) => format!(
                "t = {:.2}, Framerate = {:.2} (Click graph to set initial conditions)",
                self.state.t, fps
            ),
            None => format!(
                "t = {:.2} (Click graph to set initial conditions)",
                self.state.t
            ),
        }
    }
}

impl Default for AnimationController {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SPEED)
    }
}
