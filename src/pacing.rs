use crate::constants::{MAX_FRAME_DELTA_SEC, SLOW_FRAME_WARN_INTERVAL_MS};

/// Turns requestAnimationFrame timestamps into scene time.
///
/// Elapsed time follows the wall clock from the first frame on, so free
/// running rotations stay in phase across idle periods. The per-frame delta is
/// capped, which keeps step-based simulations from jumping after the loop
/// slept.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    origin_ms: Option<f64>,
    last_ms: Option<f64>,
}

impl FrameClock {
    /// Returns `(elapsed_sec, delta_sec)` for a frame at `timestamp_ms`.
    pub fn tick(&mut self, timestamp_ms: f64) -> (f32, f32) {
        if !timestamp_ms.is_finite() {
            return (self.elapsed_at(self.last_ms.unwrap_or(0.0)), 0.0);
        }
        let origin = *self.origin_ms.get_or_insert(timestamp_ms);
        let delta_ms = self
            .last_ms
            .map(|last| (timestamp_ms - last).max(0.0))
            .unwrap_or(0.0);
        self.last_ms = Some(timestamp_ms.max(self.last_ms.unwrap_or(origin)));
        let delta = ((delta_ms / 1000.0) as f32).min(MAX_FRAME_DELTA_SEC);
        (self.elapsed_at(timestamp_ms), delta)
    }

    fn elapsed_at(&self, timestamp_ms: f64) -> f32 {
        match self.origin_ms {
            Some(origin) => ((timestamp_ms - origin).max(0.0) / 1000.0) as f32,
            None => 0.0,
        }
    }
}

/// Flags frames that exceed the profile's budget, rate limited so a slow
/// device does not flood the console.
#[derive(Clone, Debug)]
pub struct BudgetMonitor {
    budget_ms: f64,
    last_warning_ms: Option<f64>,
    slow_frames: u32,
}

impl BudgetMonitor {
    pub fn new(budget_ms: f64) -> Self {
        Self {
            budget_ms,
            last_warning_ms: None,
            slow_frames: 0,
        }
    }

    #[inline]
    pub fn budget_ms(&self) -> f64 {
        self.budget_ms
    }

    pub fn set_budget_ms(&mut self, budget_ms: f64) {
        self.budget_ms = budget_ms;
    }

    /// Record one frame. Returns the number of slow frames since the last
    /// warning when a warning is due.
    pub fn record(&mut self, frame_ms: f64, now_ms: f64) -> Option<u32> {
        if !frame_ms.is_finite() || frame_ms <= self.budget_ms {
            return None;
        }
        self.slow_frames += 1;
        let due = self
            .last_warning_ms
            .map_or(true, |last| now_ms - last >= SLOW_FRAME_WARN_INTERVAL_MS);
        if !due {
            return None;
        }
        self.last_warning_ms = Some(now_ms);
        Some(std::mem::take(&mut self.slow_frames))
    }
}

/// CSS value for the published progress.
pub fn format_progress(progress: f32) -> String {
    let p = if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    };
    format!("{:.*}", crate::constants::PROGRESS_DECIMALS, p)
}
