use std::cmp::Ordering;

/// Uninherited timing point, i.e. a new beat length.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimingPoint {
    pub time: f64,
    pub beat_len: f64,
}

impl Default for TimingPoint {
    #[inline]
    fn default() -> Self {
        Self {
            time: 0.0,
            beat_len: 1000.0,
        }
    }
}

impl PartialOrd for TimingPoint {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.time.partial_cmp(&other.time)
    }
}

/// Inherited timing point that changes the slider velocity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DifficultyPoint {
    pub time: f64,
    pub slider_vel: f64,
}

impl DifficultyPoint {
    pub(crate) const MIN_SLIDER_VEL: f64 = 0.1;
    pub(crate) const MAX_SLIDER_VEL: f64 = 10.0;

    /// Create a point from the negative beat length of an inherited timing line.
    #[inline]
    pub(crate) fn from_beat_len(time: f64, beat_len: f64) -> Self {
        let slider_vel = (-100.0 / beat_len).clamp(Self::MIN_SLIDER_VEL, Self::MAX_SLIDER_VEL);

        Self { time, slider_vel }
    }
}

impl Default for DifficultyPoint {
    #[inline]
    fn default() -> Self {
        Self {
            time: 0.0,
            slider_vel: 1.0,
        }
    }
}

impl PartialOrd for DifficultyPoint {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.time.partial_cmp(&other.time)
    }
}
