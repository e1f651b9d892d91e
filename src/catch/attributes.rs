use crate::Beatmap;

use super::CatchPP;

/// Difficulty of an osu!catch map or of an osu!standard map played as catch.
///
/// Fruits and droplets give combo. Tiny droplets only affect accuracy.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatchDifficultyAttributes {
    pub stars: f64,
    /// Effective approach rate.
    pub ar: f64,
    pub n_fruits: u32,
    pub n_droplets: u32,
    pub n_tiny_droplets: u32,
    pub is_convert: bool,
}

impl CatchDifficultyAttributes {
    pub const fn max_combo(&self) -> u32 {
        self.n_fruits + self.n_droplets
    }

    /// Catch only has the movement skill whose value is the star rating.
    pub const fn skills(&self) -> [(&'static str, f64); 1] {
        [("movement", self.stars)]
    }

    /// Continue with a performance calculation on the same map.
    pub fn performance(self, map: &Beatmap) -> CatchPP<'_> {
        CatchPP::new(map).attributes(self)
    }
}

/// Performance points of an osu!catch score.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatchPerformanceAttributes {
    pub difficulty: CatchDifficultyAttributes,
    pub pp: f64,
}

impl CatchPerformanceAttributes {
    pub const fn pp(&self) -> f64 {
        self.pp
    }

    pub const fn stars(&self) -> f64 {
        self.difficulty.stars
    }

    pub const fn max_combo(&self) -> u32 {
        self.difficulty.max_combo()
    }
}

impl From<CatchPerformanceAttributes> for CatchDifficultyAttributes {
    fn from(attrs: CatchPerformanceAttributes) -> Self {
        attrs.difficulty
    }
}
