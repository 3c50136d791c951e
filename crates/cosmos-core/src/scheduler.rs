use crate::constants::CONVERGENCE_EPSILON;
use crate::smoothing::SmoothedScroll;

/// How the host drives frames for the whole session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameMode {
    /// A frame every display refresh.
    Continuous,
    /// Frames only while the smoothed scroll is still catching up.
    OnDemand,
}

/// Decides whether another frame is needed and owns the smoothed progress
/// that the on-demand path converges on.
#[derive(Clone, Debug)]
pub struct RenderScheduler {
    mode: FrameMode,
    smoothed: SmoothedScroll,
    target: f32,
    epsilon: f32,
}

impl RenderScheduler {
    pub fn new(mode: FrameMode, lerp_factor: f32) -> Self {
        Self {
            mode,
            smoothed: SmoothedScroll::new(0.0, lerp_factor),
            target: 0.0,
            epsilon: CONVERGENCE_EPSILON,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon.abs();
        self
    }

    #[inline]
    pub fn mode(&self) -> FrameMode {
        self.mode
    }

    #[inline]
    pub fn smoothed(&self) -> f32 {
        self.smoothed.value()
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Dirty means the smoothed value has not yet reached the target.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.smoothed.distance(self.target) > self.epsilon
    }

    /// Record a new scroll target. Returns true when the host must arm a
    /// frame, i.e. an idle on-demand loop has to wake up.
    pub fn set_target(&mut self, target: f32) -> bool {
        if !target.is_finite() {
            return false;
        }
        self.target = target;
        match self.mode {
            FrameMode::Continuous => true,
            FrameMode::OnDemand => self.is_dirty(),
        }
    }

    /// Advance the smoothed value one tick. Returns whether another frame
    /// should be requested after this one.
    pub fn tick(&mut self) -> bool {
        self.smoothed.tick(self.target);
        let dirty = self.is_dirty();
        if !dirty {
            self.smoothed.snap(self.target);
        }
        match self.mode {
            FrameMode::Continuous => true,
            FrameMode::OnDemand => dirty,
        }
    }
}
