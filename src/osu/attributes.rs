use crate::Beatmap;

use super::OsuPP;

/// Skill values and map properties of an osu!standard map, as produced by
/// [`OsuStars`](crate::OsuStars).
///
/// `ar`, `od` and `hp` are the effective values, i.e. mods and clock rate
/// are already applied.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OsuDifficultyAttributes {
    pub stars: f64,
    /// Aim skill, sliders included.
    pub aim: f64,
    pub speed: f64,
    /// Zero unless the flashlight mod is enabled.
    pub flashlight: f64,
    /// Aim without sliders divided by aim with sliders.
    pub slider_factor: f64,
    /// Amount of objects that matter for the speed skill.
    pub speed_note_count: f64,
    pub ar: f64,
    pub od: f64,
    pub hp: f64,
    pub n_circles: u32,
    pub n_sliders: u32,
    pub n_spinners: u32,
    /// Combo of a full combo, slider ticks and ends included.
    pub max_combo: u32,
}

impl OsuDifficultyAttributes {
    /// Amount of circles, sliders, and spinners.
    pub const fn n_objects(&self) -> u32 {
        self.n_circles + self.n_sliders + self.n_spinners
    }

    /// Named skill values, excluding the star rating.
    pub const fn skills(&self) -> [(&'static str, f64); 3] {
        [
            ("aim", self.aim),
            ("speed", self.speed),
            ("flashlight", self.flashlight),
        ]
    }

    /// Continue with a performance calculation on the same map.
    pub fn performance(self, map: &Beatmap) -> OsuPP<'_> {
        OsuPP::new(map).attributes(self)
    }
}

/// Performance points of an osu!standard score and their parts.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OsuPerformanceAttributes {
    pub difficulty: OsuDifficultyAttributes,
    pub pp: f64,
    pub pp_aim: f64,
    pub pp_speed: f64,
    pub pp_acc: f64,
    pub pp_flashlight: f64,
    /// Misses plus the slider breaks estimated from the combo.
    pub effective_miss_count: f64,
}

impl OsuPerformanceAttributes {
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

impl From<OsuPerformanceAttributes> for OsuDifficultyAttributes {
    fn from(attrs: OsuPerformanceAttributes) -> Self {
        attrs.difficulty
    }
}
