//! Scroll windows and the eased entry/exit amounts derived from them.
//!
//! A [`TimelineWindow`] names the progress interval over which a body slides
//! on stage, holds, and slides off again. Sampling it yields both the raw
//! linear amounts (used for visibility decisions and a few linear scale
//! curves) and their quintic-smoothstep eased counterparts (used for motion).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimelineError {
    #[error("breakpoint {name} is not finite")]
    NotFinite { name: &'static str },
    #[error("breakpoint {name}={value} lies outside [0, 1]")]
    OutOfRange { name: &'static str, value: f32 },
    #[error("breakpoints out of order: {0}")]
    Misordered(&'static str),
}

/// Quintic smoothstep `x³(x(6x − 15) + 10)`; first and second derivatives
/// vanish at both ends. Input is clamped to \[0, 1\].
#[inline]
pub fn quintic_smoothstep(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    x * x * x * (x * (x * 6.0 - 15.0) + 10.0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineWindow {
    pub enter_start: f32,
    pub peak_start: f32,
    pub peak_end: f32,
    /// `None` for bodies that never leave once they arrive.
    pub exit_end: Option<f32>,
}

/// One evaluation of a window at a given progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineSample {
    pub entry_raw: f32,
    pub exit_raw: f32,
    pub entry: f32,
    pub exit: f32,
}

impl TimelineSample {
    pub const HIDDEN: TimelineSample = TimelineSample {
        entry_raw: 0.0,
        exit_raw: 0.0,
        entry: 0.0,
        exit: 0.0,
    };

    fn from_raw(entry_raw: f32, exit_raw: f32) -> Self {
        let entry_raw = entry_raw.clamp(0.0, 1.0);
        let exit_raw = exit_raw.clamp(0.0, 1.0);
        Self {
            entry_raw,
            exit_raw,
            entry: quintic_smoothstep(entry_raw),
            exit: quintic_smoothstep(exit_raw),
        }
    }

    /// Visibility is decided on the raw amounts, never the eased ones.
    #[inline]
    pub fn visible(&self) -> bool {
        self.entry_raw > 0.0 && self.exit_raw < 1.0
    }
}

impl TimelineWindow {
    /// Build a window with an exit phase, rejecting anything that is not
    /// `enter_start < peak_start <= peak_end < exit_end` inside \[0, 1\].
    pub fn new(
        enter_start: f32,
        peak_start: f32,
        peak_end: f32,
        exit_end: f32,
    ) -> Result<Self, TimelineError> {
        let window = Self {
            enter_start,
            peak_start,
            peak_end,
            exit_end: Some(exit_end),
        };
        window.validate()?;
        Ok(window)
    }

    /// Window that holds at full entry forever after `peak_start`.
    pub fn entry_only(enter_start: f32, peak_start: f32) -> Result<Self, TimelineError> {
        let window = Self {
            enter_start,
            peak_start,
            peak_end: peak_start,
            exit_end: None,
        };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> Result<(), TimelineError> {
        let mut points = vec![
            ("enter_start", self.enter_start),
            ("peak_start", self.peak_start),
            ("peak_end", self.peak_end),
        ];
        if let Some(exit_end) = self.exit_end {
            points.push(("exit_end", exit_end));
        }
        for (name, value) in points {
            if !value.is_finite() {
                return Err(TimelineError::NotFinite { name });
            }
            if !(0.0..=1.0).contains(&value) {
                return Err(TimelineError::OutOfRange { name, value });
            }
        }
        if self.enter_start >= self.peak_start {
            return Err(TimelineError::Misordered("enter_start must precede peak_start"));
        }
        if self.peak_start > self.peak_end {
            return Err(TimelineError::Misordered("peak_start must not follow peak_end"));
        }
        if let Some(exit_end) = self.exit_end {
            if self.peak_end >= exit_end {
                return Err(TimelineError::Misordered("peak_end must precede exit_end"));
            }
        }
        Ok(())
    }

    /// Clamp every breakpoint into \[0, 1\] and force a non-decreasing order.
    /// Zero-width phases are tolerated by [`TimelineWindow::sample`].
    pub fn sanitized(&self) -> Self {
        let fix = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 1.0 };
        let enter_start = fix(self.enter_start);
        let peak_start = fix(self.peak_start).max(enter_start);
        let peak_end = fix(self.peak_end).max(peak_start);
        let exit_end = self.exit_end.map(|e| fix(e).max(peak_end));
        Self {
            enter_start,
            peak_start,
            peak_end,
            exit_end,
        }
    }

    /// Evaluate the window at progress `t`. Non-finite input yields
    /// [`TimelineSample::HIDDEN`].
    pub fn sample(&self, t: f32) -> TimelineSample {
        if !t.is_finite() {
            return TimelineSample::HIDDEN;
        }
        if t < self.enter_start {
            return TimelineSample::from_raw(0.0, 0.0);
        }
        if t < self.peak_start {
            let span = self.peak_start - self.enter_start;
            let entry = if span > 0.0 { (t - self.enter_start) / span } else { 1.0 };
            return TimelineSample::from_raw(entry, 0.0);
        }
        if t <= self.peak_end {
            return TimelineSample::from_raw(1.0, 0.0);
        }
        match self.exit_end {
            None => TimelineSample::from_raw(1.0, 0.0),
            Some(exit_end) if t <= exit_end => {
                let span = exit_end - self.peak_end;
                let exit = if span > 0.0 { (t - self.peak_end) / span } else { 1.0 };
                TimelineSample::from_raw(1.0, exit)
            }
            Some(_) => TimelineSample::from_raw(1.0, 1.0),
        }
    }
}
