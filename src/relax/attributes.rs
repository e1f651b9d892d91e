use crate::Beatmap;

use super::RelaxPP;

/// Difficulty of an osu!standard map when played with relax.
///
/// Besides the skills, the map's id and creator are kept because some
/// maps and mappers are weighted differently for performance.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelaxDifficultyAttributes {
    pub stars: f64,
    pub aim_strain: f64,
    pub speed_strain: f64,
    pub ar: f64,
    pub od: f64,
    pub hp: f64,
    pub cs: f64,
    pub n_circles: u32,
    pub n_sliders: u32,
    pub n_spinners: u32,
    pub max_combo: u32,
    pub beatmap_id: i32,
    pub creator: String,
}

impl RelaxDifficultyAttributes {
    pub const fn n_objects(&self) -> u32 {
        self.n_circles + self.n_sliders + self.n_spinners
    }

    pub const fn skills(&self) -> [(&'static str, f64); 2] {
        [("aim", self.aim_strain), ("speed", self.speed_strain)]
    }

    /// Continue with a performance calculation on the same map.
    pub fn performance(self, map: &Beatmap) -> RelaxPP<'_> {
        RelaxPP::new(map).attributes(self)
    }
}

/// Performance of a relax score on an osu!standard map.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelaxPerformanceAttributes {
    pub difficulty: RelaxDifficultyAttributes,
    pub pp: f64,
    pub pp_aim: f64,
    pub pp_speed: f64,
    pub pp_acc: f64,
    pub effective_miss_count: f64,
}

impl RelaxPerformanceAttributes {
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

impl From<RelaxPerformanceAttributes> for RelaxDifficultyAttributes {
    fn from(attrs: RelaxPerformanceAttributes) -> Self {
        attrs.difficulty
    }
}
