/// Judgements of an osu!mania play.
///
/// Combo does not affect osu!mania performance so it is not tracked.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManiaScoreState {
    /// Amount of current 320s.
    pub n320: u32,
    /// Amount of current 300s.
    pub n300: u32,
    /// Amount of current 200s.
    pub n200: u32,
    /// Amount of current 100s.
    pub n100: u32,
    /// Amount of current 50s.
    pub n50: u32,
    /// Amount of current misses.
    pub misses: u32,
}

impl ManiaScoreState {
    /// Return the total amount of hits by adding everything up.
    pub const fn total_hits(&self) -> u32 {
        self.n320 + self.n300 + self.n200 + self.n100 + self.n50 + self.misses
    }

    /// Calculate the accuracy between `0.0` and `1.0` for this state.
    ///
    /// 320s and 300s are worth the same.
    pub fn accuracy(&self) -> f64 {
        let total_hits = self.total_hits();

        if total_hits == 0 {
            return 0.0;
        }

        let numerator = 6 * (self.n320 + self.n300) + 4 * self.n200 + 2 * self.n100 + self.n50;

        f64::from(numerator) / f64::from(6 * total_hits)
    }

    /// Accuracy that values 320s above 300s, used for performance.
    pub fn custom_accuracy(&self) -> f64 {
        let total_hits = self.total_hits();

        if total_hits == 0 {
            return 0.0;
        }

        let numerator =
            self.n320 * 32 + self.n300 * 30 + self.n200 * 20 + self.n100 * 10 + self.n50 * 5;

        f64::from(numerator) / f64::from(total_hits * 32)
    }
}

#[cfg(test)]
mod tests {
    use super::ManiaScoreState;

    #[test]
    fn custom_accuracy_prefers_320s() {
        let perfect = ManiaScoreState {
            n320: 10,
            ..Default::default()
        };

        let great = ManiaScoreState {
            n300: 10,
            ..Default::default()
        };

        assert!((perfect.accuracy() - great.accuracy()).abs() < f64::EPSILON);
        assert!((perfect.custom_accuracy() - 1.0).abs() < f64::EPSILON);
        assert!((great.custom_accuracy() - 30.0 / 32.0).abs() < 1e-12);
    }
}
