use crate::Beatmap;

use super::TaikoPP;

/// Skill values of an osu!taiko map or convert.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaikoDifficultyAttributes {
    pub stars: f64,
    pub stamina: f64,
    pub rhythm: f64,
    pub colour: f64,
    /// Skills combined per section before being reduced.
    pub peak: f64,
    /// Great hit window in milliseconds, scaled by the clock rate.
    pub hit_window: f64,
    /// Amount of circles, the only objects giving combo.
    pub max_combo: u32,
    pub is_convert: bool,
}

impl TaikoDifficultyAttributes {
    pub const fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub const fn skills(&self) -> [(&'static str, f64); 3] {
        [
            ("stamina", self.stamina),
            ("rhythm", self.rhythm),
            ("colour", self.colour),
        ]
    }

    /// Continue with a performance calculation on the same map.
    pub fn performance(self, map: &Beatmap) -> TaikoPP<'_> {
        TaikoPP::new(map).attributes(self)
    }
}

/// Performance points of an osu!taiko score, split into strain and accuracy.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaikoPerformanceAttributes {
    pub difficulty: TaikoDifficultyAttributes,
    pub pp: f64,
    pub pp_strain: f64,
    pub pp_acc: f64,
}

impl TaikoPerformanceAttributes {
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

impl From<TaikoPerformanceAttributes> for TaikoDifficultyAttributes {
    fn from(attrs: TaikoPerformanceAttributes) -> Self {
        attrs.difficulty
    }
}
