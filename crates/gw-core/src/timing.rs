//! Opt-in wall clock timing for load, solve and write stages.
//!
//! Timing is off unless enabled programmatically or via the `GW_TIMING`
//! environment variable.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);

/// Turn timing on for the whole process.
pub fn enable_timing() {
    ENABLED.store(true, Ordering::Relaxed);
}

/// Turn programmatic timing back off. `GW_TIMING` still wins.
pub fn disable_timing() {
    ENABLED.store(false, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed) || std::env::var("GW_TIMING").is_ok()
}

/// Wall clock timer for one labelled stage.
pub struct Timer {
    label: &'static str,
    start: Instant,
    enabled: bool,
}

impl Timer {
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
            enabled: is_enabled(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Elapsed seconds, or `None` when timing was off at `start`.
    pub fn stop(self) -> Option<f64> {
        if self.enabled {
            Some(self.start.elapsed().as_secs_f64())
        } else {
            None
        }
    }
}

/// Per-run wall clock breakdown.
#[derive(Debug, Clone, Default)]
pub struct RunTiming {
    pub load_time_s: f64,
    pub solve_time_s: f64,
    pub write_time_s: f64,
}

impl RunTiming {
    pub fn total_s(&self) -> f64 {
        self.load_time_s + self.solve_time_s + self.write_time_s
    }

    /// Record a stopped timer's elapsed time under its label.
    pub fn record(&mut self, label: &'static str, elapsed_s: Option<f64>) {
        let Some(dt) = elapsed_s else {
            return;
        };
        match label {
            "load" => self.load_time_s += dt,
            "solve" => self.solve_time_s += dt,
            "write" => self.write_time_s += dt,
            _ => {}
        }
    }
}
