/// Judgements and combo of an osu!standard play.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OsuScoreState {
    /// Highest combo reached during the play, **not** the map's maximum combo.
    pub max_combo: u32,
    pub n300: u32,
    pub n100: u32,
    pub n50: u32,
    pub misses: u32,
}

impl OsuScoreState {
    /// Return the total amount of hits by adding everything up.
    pub const fn total_hits(&self) -> u32 {
        self.n300 + self.n100 + self.n50 + self.misses
    }

    /// Accuracy between `0.0` and `1.0`.
    pub fn accuracy(&self) -> f64 {
        accuracy(self.n300, self.n100, self.n50, self.misses)
    }
}

pub(crate) fn accuracy(n300: u32, n100: u32, n50: u32, misses: u32) -> f64 {
    let total = n300 + n100 + n50 + misses;

    if total == 0 {
        return 0.0;
    }

    f64::from(6 * n300 + 2 * n100 + n50) / f64::from(6 * total)
}

#[cfg(test)]
mod tests {
    use super::OsuScoreState;

    #[test]
    fn accuracy_weights() {
        let state = OsuScoreState {
            max_combo: 10,
            n300: 2,
            n100: 1,
            n50: 1,
            misses: 0,
        };

        assert_eq!(state.total_hits(), 4);
        assert!((state.accuracy() - 15.0 / 24.0).abs() < 1e-12);
        assert!(OsuScoreState::default().accuracy().abs() < f64::EPSILON);
    }
}
