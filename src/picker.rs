//! The spinner: a randomized selection loop that slows down and then stops.
//!
//! Every tick picks one still-hidden cell uniformly at random. Elapsed time
//! grows by the current cadence on each tick; once it reaches
//! `slowdown_after_ms` the cadence grows by `cadence_step_ms` per tick, and
//! once it reaches `stop_after_ms` the run ends on the last pick.
//!
//! The picker never sleeps. Callers own the clock: they schedule the next tick
//! `next_in` after a [`PickerStep::Selected`] and hand back the [`RunToken`] of
//! the run that asked for it. Ticks carrying any other token are ignored.
use std::time::Duration;

use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;

pub const DEFAULT_START_CADENCE_MS: u64 = 100;
pub const DEFAULT_SLOWDOWN_AFTER_MS: u64 = 2_000;
pub const DEFAULT_STOP_AFTER_MS: u64 = 5_000;
pub const DEFAULT_CADENCE_STEP_MS: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    pub start_cadence_ms: u64,
    pub slowdown_after_ms: u64,
    pub stop_after_ms: u64,
    pub cadence_step_ms: u64,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            start_cadence_ms: DEFAULT_START_CADENCE_MS,
            slowdown_after_ms: DEFAULT_SLOWDOWN_AFTER_MS,
            stop_after_ms: DEFAULT_STOP_AFTER_MS,
            cadence_step_ms: DEFAULT_CADENCE_STEP_MS,
        }
    }
}

impl PickerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_cadence_ms == 0 {
            return Err(ConfigError::InvalidPicker(
                "start cadence must be at least 1ms".into(),
            ));
        }
        if self.stop_after_ms == 0 {
            return Err(ConfigError::InvalidPicker(
                "stop threshold must be at least 1ms".into(),
            ));
        }
        if self.slowdown_after_ms > self.stop_after_ms {
            return Err(ConfigError::InvalidPicker(format!(
                "slowdown threshold ({}ms) is past the stop threshold ({}ms)",
                self.slowdown_after_ms, self.stop_after_ms
            )));
        }
        Ok(())
    }

    /// Upper bound on the number of ticks a single run can take.
    pub fn max_ticks(&self) -> u64 {
        self.stop_after_ms.div_ceil(self.start_cadence_ms.max(1))
    }
}

/// Identifies one picker run. A new run always gets a fresh token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerStep {
    /// A cell was highlighted; tick again after `next_in`.
    Selected { index: usize, next_in: Duration },
    /// The time budget ran out; `index` is the final pick.
    Stopped { index: usize },
    /// Nothing was left to pick; the run ended without a selection.
    Exhausted,
    /// The tick belonged to a cancelled or finished run.
    Stale,
}

#[derive(Debug, Clone)]
pub struct Picker {
    config: PickerConfig,
    run: Option<RunToken>,
    runs_started: u64,
    elapsed_ms: u64,
    cadence_ms: u64,
    last_pick: Option<usize>,
}

impl Picker {
    pub fn new(config: PickerConfig) -> Self {
        Self {
            config,
            run: None,
            runs_started: 0,
            elapsed_ms: 0,
            cadence_ms: config.start_cadence_ms.max(1),
            last_pick: None,
        }
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// Begin a new run, cancelling whatever run was live.
    pub fn start(&mut self) -> RunToken {
        if let Some(previous) = self.cancel() {
            debug!(?previous, "restarting picker over a live run");
        }

        self.runs_started += 1;
        let token = RunToken(self.runs_started);
        self.run = Some(token);
        self.elapsed_ms = 0;
        self.cadence_ms = self.config.start_cadence_ms.max(1);
        self.last_pick = None;

        info!(?token, cadence_ms = self.cadence_ms, "picker started");
        token
    }

    /// End the live run, if any, and return its token.
    pub fn cancel(&mut self) -> Option<RunToken> {
        self.run.take()
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    pub fn current_token(&self) -> Option<RunToken> {
        self.run
    }

    /// Delay before the first tick of a fresh run.
    pub fn first_tick_in(&self) -> Duration {
        Duration::from_millis(self.cadence_ms)
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }

    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.cadence_ms)
    }

    pub fn last_pick(&self) -> Option<usize> {
        self.last_pick
    }

    /// Advance the run owning `token` against the current hidden cells.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        token: RunToken,
        hidden: &[usize],
        rng: &mut R,
    ) -> PickerStep {
        if self.run != Some(token) {
            return PickerStep::Stale;
        }

        let Some(&index) = hidden.choose(rng) else {
            self.run = None;
            info!(?token, "picker ran out of hidden cells");
            return PickerStep::Exhausted;
        };

        self.last_pick = Some(index);
        self.elapsed_ms = self.elapsed_ms.saturating_add(self.cadence_ms);

        if self.elapsed_ms >= self.config.stop_after_ms {
            self.run = None;
            info!(?token, index, elapsed_ms = self.elapsed_ms, "picker stopped");
            return PickerStep::Stopped { index };
        }

        if self.elapsed_ms >= self.config.slowdown_after_ms {
            self.cadence_ms = self.cadence_ms.saturating_add(self.config.cadence_step_ms);
        }

        PickerStep::Selected {
            index,
            next_in: Duration::from_millis(self.cadence_ms),
        }
    }
}

impl Default for Picker {
    fn default() -> Self {
        Self::new(PickerConfig::default())
    }
}
