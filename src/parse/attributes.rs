use crate::{Beatmap, GameMode, Mods};

/// Mod-adjusted difficulty settings of a [`Beatmap`].
#[derive(Clone, Debug, PartialEq)]
pub struct BeatmapAttributes {
    /// The approach rate.
    pub ar: f64,
    /// The overall difficulty.
    pub od: f64,
    /// The circle size.
    pub cs: f64,
    /// The health drain rate
    pub hp: f64,
    /// The clock rate with respect to mods.
    pub clock_rate: f64,
    /// The hit windows for approach rate and overall difficulty.
    pub hit_windows: BeatmapHitWindows,
}

/// AR and OD hit windows
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BeatmapHitWindows {
    /// Time between an object appearing and its hit time in milliseconds.
    pub ar: f64,
    /// Hit window for a 300 in milliseconds.
    pub od: f64,
}

/// Specify values for this builder to get [`BeatmapAttributes`] or [`BeatmapHitWindows`]
/// based on mods.
#[derive(Clone, Debug, PartialEq)]
pub struct BeatmapAttributesBuilder {
    mode: GameMode,
    ar: f32,
    od: f32,
    cs: f32,
    hp: f32,
    mods: u32,
    clock_rate: Option<f64>,
}

impl BeatmapAttributesBuilder {
    pub(crate) const PREEMPT_MIN: f64 = 1800.0;
    pub(crate) const PREEMPT_MID: f64 = 1200.0;
    pub(crate) const PREEMPT_MAX: f64 = 450.0;

    const OSU_MIN: f64 = 80.0;
    const OSU_AVG: f64 = 50.0;
    const OSU_MAX: f64 = 20.0;

    const TAIKO_MIN: f64 = 50.0;
    const TAIKO_AVG: f64 = 35.0;
    const TAIKO_MAX: f64 = 20.0;

    /// Create a new [`BeatmapAttributesBuilder`].
    #[inline]
    pub fn new(map: &Beatmap) -> Self {
        Self {
            mode: map.mode,
            ar: map.ar,
            od: map.od,
            cs: map.cs,
            hp: map.hp,
            mods: 0,
            clock_rate: None,
        }
    }

    /// Specify the mode, e.g. when the chart is converted.
    #[inline]
    pub fn mode(&mut self, mode: GameMode) -> &mut Self {
        self.mode = mode;

        self
    }

    #[inline]
    pub fn mods(&mut self, mods: u32) -> &mut Self {
        self.mods = mods;

        self
    }

    /// Override the clock rate that would otherwise be derived from the mods.
    #[inline]
    pub fn clock_rate(&mut self, clock_rate: f64) -> &mut Self {
        self.clock_rate = Some(clock_rate);

        self
    }

    /// Calculate the AR and OD hit windows.
    pub fn hit_windows(&self) -> BeatmapHitWindows {
        let clock_rate = self.clock_rate.unwrap_or_else(|| self.mods.clock_rate());
        let multiplier = self.mods.od_ar_hp_multiplier();

        let raw_ar = (f64::from(self.ar) * multiplier).min(10.0);
        let preempt = difficulty_range(
            raw_ar,
            Self::PREEMPT_MIN,
            Self::PREEMPT_MID,
            Self::PREEMPT_MAX,
        ) / clock_rate;

        let raw_od = (f64::from(self.od) * multiplier).min(10.0);

        let hit_window = match self.mode {
            GameMode::Osu | GameMode::Catch | GameMode::Mania => {
                difficulty_range(raw_od, Self::OSU_MIN, Self::OSU_AVG, Self::OSU_MAX)
            }
            GameMode::Taiko => {
                difficulty_range(raw_od, Self::TAIKO_MIN, Self::TAIKO_AVG, Self::TAIKO_MAX)
            }
        };

        BeatmapHitWindows {
            ar: preempt,
            od: hit_window / clock_rate,
        }
    }

    /// Calculate the [`BeatmapAttributes`].
    pub fn build(&self) -> BeatmapAttributes {
        let clock_rate = self.clock_rate.unwrap_or_else(|| self.mods.clock_rate());
        let multiplier = self.mods.od_ar_hp_multiplier();

        // HP
        let hp = (f64::from(self.hp) * multiplier).min(10.0);

        // CS
        let mut cs = f64::from(self.cs);

        if self.mods.hr() {
            cs = (cs * 1.3).min(10.0);
        } else if self.mods.ez() {
            cs *= 0.5;
        }

        let hit_windows = self.hit_windows();
        let BeatmapHitWindows { ar: preempt, od } = hit_windows;

        // AR
        let ar = if preempt > Self::PREEMPT_MID {
            (Self::PREEMPT_MIN - preempt) / 120.0
        } else {
            (Self::PREEMPT_MID - preempt) / 150.0 + 5.0
        };

        // OD
        let od = match self.mode {
            GameMode::Osu => (Self::OSU_MIN - od) / 6.0,
            GameMode::Taiko => (Self::TAIKO_MIN - od) / (Self::TAIKO_MIN - Self::TAIKO_AVG) * 5.0,
            GameMode::Catch | GameMode::Mania => (f64::from(self.od) * multiplier).min(10.0),
        };

        BeatmapAttributes {
            ar,
            od,
            cs,
            hp,
            clock_rate,
            hit_windows,
        }
    }
}

impl From<&Beatmap> for BeatmapAttributesBuilder {
    #[inline]
    fn from(map: &Beatmap) -> Self {
        Self::new(map)
    }
}

pub(crate) fn difficulty_range(difficulty: f64, min: f64, mid: f64, max: f64) -> f64 {
    if difficulty > 5.0 {
        mid + (max - mid) * (difficulty - 5.0) / 5.0
    } else if difficulty < 5.0 {
        mid - (mid - min) * (5.0 - difficulty) / 5.0
    } else {
        mid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(ar: f32, od: f32) -> Beatmap {
        Beatmap {
            ar,
            od,
            cs: 4.0,
            hp: 6.0,
            ..Default::default()
        }
    }

    #[test]
    fn nomod_is_unchanged() {
        let attrs = map(9.0, 8.0).attributes().build();

        assert!((attrs.ar - 9.0).abs() < 1e-9);
        assert!((attrs.od - 8.0).abs() < 1e-9);
        assert!((attrs.cs - 4.0).abs() < 1e-9);
        assert!((attrs.clock_rate - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn double_time() {
        let attrs = map(9.0, 8.0).attributes().mods(u32::DT).build();

        // 600ms preempt at 1.5x is 400ms
        assert!((attrs.hit_windows.ar - 400.0).abs() < 1e-9);
        assert!((attrs.ar - (1200.0 - 400.0) / 150.0 - 5.0).abs() < 1e-9);
        assert!((attrs.od - (80.0 - 32.0 / 1.5) / 6.0).abs() < 1e-9);
    }

    #[test]
    fn hard_rock_caps_values() {
        let attrs = map(9.0, 8.0).attributes().mods(u32::HR).build();

        assert!((attrs.ar - 10.0).abs() < 1e-9);
        assert!((attrs.od - 10.0).abs() < 1e-9);
        assert!((attrs.cs - 5.2).abs() < 1e-6);
        assert!((attrs.hp - 8.4).abs() < 1e-6);
    }

    #[test]
    fn easy_halves_values() {
        let attrs = map(8.0, 6.0).attributes().mods(u32::EZ).build();

        assert!((attrs.ar - 4.0).abs() < 1e-9);
        assert!((attrs.od - 3.0).abs() < 1e-9);
        assert!((attrs.cs - 2.0).abs() < 1e-9);
    }

    #[test]
    fn taiko_hit_window() {
        let mut map = map(5.0, 5.0);
        map.mode = GameMode::Taiko;
        let attrs = map.attributes().build();

        assert!((attrs.hit_windows.od - 35.0).abs() < 1e-9);
        assert!((attrs.od - 5.0).abs() < 1e-9);
    }
}
