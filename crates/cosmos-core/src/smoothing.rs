/// Per-consumer exponentially smoothed copy of scroll progress.
///
/// Every tick moves the value a fixed fraction of the remaining distance
/// toward the target: `value += (target - value) * lerp_factor`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothedScroll {
    value: f32,
    lerp_factor: f32,
}

impl SmoothedScroll {
    pub fn new(initial: f32, lerp_factor: f32) -> Self {
        let lerp_factor = if lerp_factor.is_finite() {
            lerp_factor.clamp(f32::EPSILON, 1.0)
        } else {
            1.0
        };
        let value = if initial.is_finite() { initial } else { 0.0 };
        Self { value, lerp_factor }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn lerp_factor(&self) -> f32 {
        self.lerp_factor
    }

    /// Advance one tick toward `target`. A non-finite target leaves the value
    /// untouched.
    pub fn tick(&mut self, target: f32) -> f32 {
        if target.is_finite() {
            self.value += (target - self.value) * self.lerp_factor;
        }
        self.value
    }

    #[inline]
    pub fn distance(&self, target: f32) -> f32 {
        (target - self.value).abs()
    }

    #[inline]
    pub fn is_settled(&self, target: f32, epsilon: f32) -> bool {
        !target.is_finite() || self.distance(target) <= epsilon
    }

    pub fn snap(&mut self, target: f32) {
        if target.is_finite() {
            self.value = target;
        }
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
