mod attributes;
mod convert;
mod difficulty_object;
mod object;
mod pp;
mod scaling_factor;
mod score_state;
mod skills;

use crate::{parse::BeatmapAttributesBuilder, Beatmap, GameMode, Mods};

use self::{
    convert::convert_objects,
    difficulty_object::OsuDifficultyObject,
    object::{OsuObject, OsuObjectKind},
    scaling_factor::ScalingFactor,
    skills::{Aim, Flashlight, Skill, Speed},
};

pub use self::{
    attributes::{OsuDifficultyAttributes, OsuPerformanceAttributes},
    pp::{OsuAttributeProvider, OsuPP},
    score_state::OsuScoreState,
};

pub(crate) use self::pp::hit_results;

const SECTION_LEN: f64 = 400.0;
const DIFFICULTY_MULTIPLIER: f64 = 0.0675;
const NORMALIZED_RADIUS: f32 = 50.0;
const STACK_DISTANCE: f32 = 3.0;
const PLAYFIELD_HEIGHT: f32 = 384.0;
const HD_FADE_IN_DURATION_MULTIPLIER: f64 = 0.4;

pub(crate) const PERFORMANCE_BASE_MULTIPLIER: f64 = 1.14;

/// Star calculation for osu!standard maps.
///
/// Slider paths and stack leniency are both taken into account.
/// In case of a partial play, e.g. a fail, one can specify the amount of passed objects.
///
/// # Example
///
/// ```
/// use akatsuki_pp::{Beatmap, OsuStars};
///
/// let map = Beatmap::default();
///
/// let attrs = OsuStars::new(&map)
///     .mods(8 + 64) // HDDT
///     .passed_objects(0)
///     .calculate();
///
/// assert_eq!(attrs.stars, 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct OsuStars<'m> {
    pub(crate) map: &'m Beatmap,
    pub(crate) mods: u32,
    pub(crate) passed_objects: Option<u32>,
}

impl<'m> OsuStars<'m> {
    #[inline]
    pub fn new(map: &'m Beatmap) -> Self {
        Self {
            map,
            mods: 0,
            passed_objects: None,
        }
    }

    /// Specify mods through their bit values.
    ///
    /// See [https://github.com/ppy/osu-api/wiki#mods](https://github.com/ppy/osu-api/wiki#mods)
    #[inline]
    pub fn mods(mut self, mods: u32) -> Self {
        self.mods = mods;

        self
    }

    /// Amount of passed objects for partial plays, e.g. a fail.
    #[inline]
    pub fn passed_objects(mut self, passed_objects: u32) -> Self {
        self.passed_objects = Some(passed_objects);

        self
    }

    /// Calculate all difficulty related values, including stars.
    pub fn calculate(&self) -> OsuDifficultyAttributes {
        let map = self.map;
        let mods = self.mods;

        let take = self
            .passed_objects
            .map_or(map.hit_objects.len(), |n| n as usize)
            .min(map.hit_objects.len());

        let map_attrs = BeatmapAttributesBuilder::new(map)
            .mode(GameMode::Osu)
            .mods(mods)
            .build();

        let mut attrs = OsuDifficultyAttributes {
            ar: map_attrs.ar,
            od: map_attrs.od,
            hp: map_attrs.hp,
            ..Default::default()
        };

        if take == 0 {
            return attrs;
        }

        let scaling_factor = ScalingFactor::new(map_attrs.cs);
        let clock_rate = map_attrs.clock_rate;

        // Stacking and fading use the preempt before the clock rate applies
        let time_preempt = map_attrs.hit_windows.ar * clock_rate;

        let osu_objects = convert_objects(map, &scaling_factor, mods.hr(), time_preempt);
        let passed = &osu_objects[..take];

        for h in passed {
            attrs.max_combo += h.combo();

            match h.kind {
                OsuObjectKind::Circle => attrs.n_circles += 1,
                OsuObjectKind::Slider(_) => attrs.n_sliders += 1,
                OsuObjectKind::Spinner { .. } => attrs.n_spinners += 1,
            }
        }

        let diff_objects = create_difficulty_objects(passed, clock_rate, &scaling_factor);

        // * Preempt time can go below 450ms. Normally, this is achieved via the DT mod
        // * which uniformly speeds up all animations game wide regardless of AR.
        let time_fade_in = if mods.hd() {
            time_preempt * HD_FADE_IN_DURATION_MULTIPLIER
        } else {
            400.0 * (time_preempt / BeatmapAttributesBuilder::PREEMPT_MAX).min(1.0)
        };

        let mut aim = Aim::new(true);
        let mut aim_no_sliders = Aim::new(false);
        let mut speed = Speed::new(map_attrs.hit_windows.od);
        let mut flashlight =
            Flashlight::new(mods.hd(), scaling_factor.radius, time_preempt, time_fade_in);

        for curr in diff_objects.iter() {
            aim.process(curr, &diff_objects);
            aim_no_sliders.process(curr, &diff_objects);
            speed.process(curr, &diff_objects);
            flashlight.process(curr, &diff_objects);
        }

        let (speed_value, speed_note_count) = speed.difficulty_and_note_count();

        let values = SkillValues {
            aim: aim.difficulty_value(),
            aim_no_sliders: aim_no_sliders.difficulty_value(),
            speed: speed_value,
            flashlight: flashlight.difficulty_value(),
        };

        tracing::trace!(
            aim = values.aim,
            aim_no_sliders = values.aim_no_sliders,
            speed = values.speed,
            flashlight = values.flashlight,
            "osu!standard skill values"
        );

        values.eval(&mut attrs, mods);
        attrs.speed_note_count = speed_note_count;

        attrs
    }
}

fn create_difficulty_objects<'o>(
    objects: &'o [OsuObject],
    clock_rate: f64,
    scaling_factor: &ScalingFactor,
) -> Vec<OsuDifficultyObject<'o>> {
    // The first hit object has no difficulty object
    objects
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, h)| {
            let last = &objects[i - 1];
            let last_last = i.checked_sub(2).map(|j| &objects[j]);

            OsuDifficultyObject::new(h, last, last_last, clock_rate, i - 1, scaling_factor)
        })
        .collect()
}

struct SkillValues {
    aim: f64,
    aim_no_sliders: f64,
    speed: f64,
    flashlight: f64,
}

impl SkillValues {
    fn eval(self, attrs: &mut OsuDifficultyAttributes, mods: u32) {
        let mut aim_rating = self.aim.sqrt() * DIFFICULTY_MULTIPLIER;
        let aim_rating_no_sliders = self.aim_no_sliders.sqrt() * DIFFICULTY_MULTIPLIER;
        let speed_rating = self.speed.sqrt() * DIFFICULTY_MULTIPLIER;
        let mut flashlight_rating = self.flashlight.sqrt() * DIFFICULTY_MULTIPLIER;

        let slider_factor = if aim_rating > 0.0 {
            aim_rating_no_sliders / aim_rating
        } else {
            1.0
        };

        if mods.td() {
            aim_rating = aim_rating.powf(0.8);
            flashlight_rating = flashlight_rating.powf(0.8);
        }

        if mods.ap() {
            aim_rating = 0.0;
        }

        let base_aim_performance = base_performance(aim_rating);
        let base_speed_performance = base_performance(speed_rating);

        let base_flashlight_performance = if mods.fl() {
            flashlight_rating.powi(2) * 25.0
        } else {
            0.0
        };

        let base_performance = (base_aim_performance.powf(1.1)
            + base_speed_performance.powf(1.1)
            + base_flashlight_performance.powf(1.1))
        .powf(1.0 / 1.1);

        let stars = if base_performance > 0.00001 {
            PERFORMANCE_BASE_MULTIPLIER.cbrt()
                * 0.027
                * ((100_000.0 / 2.0_f64.powf(1.0 / 1.1) * base_performance).cbrt() + 4.0)
        } else {
            0.0
        };

        attrs.aim = aim_rating;
        attrs.speed = speed_rating;
        attrs.flashlight = flashlight_rating;
        attrs.slider_factor = slider_factor;
        attrs.stars = stars;
    }
}

/// Performance worth of a skill rating, shared by stars and pp.
#[inline]
pub(crate) fn base_performance(rating: f64) -> f64 {
    (5.0 * (rating / DIFFICULTY_MULTIPLIER).max(1.0) - 4.0).powi(3) / 100_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{HitObject, HitObjectKind, TimingPoint};
    use crate::Pos2;

    fn jumps(n: usize) -> Beatmap {
        let hit_objects = (0..n)
            .map(|i| HitObject {
                pos: if i % 2 == 0 {
                    Pos2::new(64.0, 192.0)
                } else {
                    Pos2::new(448.0, 192.0)
                },
                start_time: 1000.0 + i as f64 * 200.0,
                kind: HitObjectKind::Circle,
                sound: 0,
            })
            .collect();

        Beatmap {
            n_circles: n as u32,
            ar: 9.0,
            od: 8.0,
            cs: 4.0,
            hit_objects,
            timing_points: vec![TimingPoint {
                time: 0.0,
                beat_len: 400.0,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn counts_and_combo() {
        let attrs = OsuStars::new(&jumps(20)).calculate();

        assert_eq!(attrs.n_circles, 20);
        assert_eq!(attrs.max_combo, 20);
        assert!(attrs.stars > 0.0);
        assert!(attrs.aim > attrs.speed);
    }

    #[test]
    fn single_object_has_no_stars() {
        let attrs = OsuStars::new(&jumps(1)).calculate();

        assert_eq!(attrs.max_combo, 1);
        assert!(attrs.stars.abs() < f64::EPSILON);
    }

    #[test]
    fn double_time_is_harder() {
        let map = jumps(50);
        let nomod = OsuStars::new(&map).calculate();
        let dt = OsuStars::new(&map).mods(64).calculate();

        assert!(dt.stars > nomod.stars);
        assert!(dt.ar > nomod.ar);
    }

    #[test]
    fn autopilot_drops_aim() {
        let map = jumps(50);
        let ap = OsuStars::new(&map).mods(1 << 13).calculate();
        let nomod = OsuStars::new(&map).calculate();

        assert!(ap.aim.abs() < f64::EPSILON);
        assert!(ap.stars < nomod.stars);
    }

    #[test]
    fn prefix_counts_only_passed_objects() {
        let attrs = OsuStars::new(&jumps(30)).passed_objects(10).calculate();

        assert_eq!(attrs.n_circles, 10);
        assert_eq!(attrs.max_combo, 10);
    }
}
