/// Judgements of an osu!taiko score.
///
/// Only circles are judged, drumrolls and swells don't affect accuracy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaikoScoreState {
    /// Highest combo reached by the score.
    pub max_combo: u32,
    pub n300: u32,
    pub n100: u32,
    pub misses: u32,
}

impl TaikoScoreState {
    pub const fn total_hits(&self) -> u32 {
        self.n300 + self.n100 + self.misses
    }

    /// Accuracy between `0.0` and `1.0` where a good is worth half a great.
    pub fn accuracy(&self) -> f64 {
        accuracy(self.n300, self.n100, self.misses)
    }
}

pub(crate) fn accuracy(n300: u32, n100: u32, misses: u32) -> f64 {
    match n300 + n100 + misses {
        0 => 0.0,
        total => f64::from(2 * n300 + n100) / f64::from(2 * total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goods_are_half_worth() {
        let state = TaikoScoreState {
            max_combo: 4,
            n300: 2,
            n100: 2,
            misses: 0,
        };

        assert!((state.accuracy() - 0.75).abs() < f64::EPSILON);
        assert_eq!(state.total_hits(), 4);
    }

    #[test]
    fn no_hits_no_accuracy() {
        assert!(TaikoScoreState::default().accuracy().abs() < f64::EPSILON);
    }
}
