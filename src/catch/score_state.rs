/// Judgements and combo of an osu!catch play.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatchScoreState {
    /// Maximum combo that the score has had so far.
    /// **Not** the maximum possible combo of the map so far.
    pub max_combo: u32,
    /// Amount of caught fruits.
    pub n_fruits: u32,
    /// Amount of caught droplets.
    pub n_droplets: u32,
    /// Amount of caught tiny droplets.
    pub n_tiny_droplets: u32,
    /// Amount of missed tiny droplets.
    pub n_tiny_droplet_misses: u32,
    /// Amount of missed fruits and droplets.
    pub misses: u32,
}

impl CatchScoreState {
    /// Return the total amount of hits by adding everything up.
    pub const fn total_hits(&self) -> u32 {
        self.n_fruits
            + self.n_droplets
            + self.n_tiny_droplets
            + self.n_tiny_droplet_misses
            + self.misses
    }

    /// Amount of fruits and droplets, caught or not.
    pub const fn combo_hits(&self) -> u32 {
        self.n_fruits + self.n_droplets + self.misses
    }

    /// Calculate the accuracy between `0.0` and `1.0` for this state.
    pub fn accuracy(&self) -> f64 {
        let total_hits = self.total_hits();

        if total_hits == 0 {
            return 0.0;
        }

        let numerator = self.n_fruits + self.n_droplets + self.n_tiny_droplets;

        f64::from(numerator) / f64::from(total_hits)
    }
}

#[cfg(test)]
mod tests {
    use super::CatchScoreState;

    #[test]
    fn tiny_droplet_misses_lower_accuracy() {
        let state = CatchScoreState {
            max_combo: 100,
            n_fruits: 80,
            n_droplets: 20,
            n_tiny_droplets: 90,
            n_tiny_droplet_misses: 10,
            misses: 0,
        };

        assert_eq!(state.combo_hits(), 100);
        assert!((state.accuracy() - 0.95).abs() < 1e-12);
    }
}
