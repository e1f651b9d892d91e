use crate::Beatmap;

use super::ManiaPP;

/// Difficulty of an osu!mania map or convert.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManiaDifficultyAttributes {
    pub stars: f64,
    /// Great hit window in milliseconds, scaled by the clock rate.
    pub hit_window: f64,
    pub n_objects: u32,
    /// Notes count once, hold notes once plus one per tick.
    pub max_combo: u32,
    pub is_convert: bool,
}

impl ManiaDifficultyAttributes {
    pub const fn max_combo(&self) -> u32 {
        self.max_combo
    }

    /// Mania only has the strain skill whose value is the star rating.
    pub const fn skills(&self) -> [(&'static str, f64); 1] {
        [("strain", self.stars)]
    }

    /// Continue with a performance calculation on the same map.
    pub fn performance(self, map: &Beatmap) -> ManiaPP<'_> {
        ManiaPP::new(map).attributes(self)
    }
}

/// Performance points of an osu!mania score.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManiaPerformanceAttributes {
    pub difficulty: ManiaDifficultyAttributes,
    pub pp: f64,
    /// Part of the pp coming from the star rating.
    pub pp_difficulty: f64,
}

impl ManiaPerformanceAttributes {
    pub const fn pp(&self) -> f64 {
        self.pp
    }

    pub const fn stars(&self) -> f64 {
        self.difficulty.stars
    }

    pub const fn max_combo(&self) -> u32 {
        self.difficulty.max_combo
    }
}

impl From<ManiaPerformanceAttributes> for ManiaDifficultyAttributes {
    fn from(attrs: ManiaPerformanceAttributes) -> Self {
        attrs.difficulty
    }
}
