mod attributes;
mod difficulty_object;
mod pp;
mod rhythm;
mod score_state;
mod skills;
mod stamina_cheese;

use std::f64::consts::PI;

use crate::{parse::BeatmapAttributesBuilder, Beatmap, GameMode};

use self::{
    difficulty_object::TaikoDifficultyObject,
    skills::{weighted_sum, Colour, Rhythm, Stamina, Strain},
    stamina_cheese::mark_stamina_cheese,
};

pub use self::{
    attributes::{TaikoDifficultyAttributes, TaikoPerformanceAttributes},
    pp::{TaikoAttributeProvider, TaikoPP},
    score_state::TaikoScoreState,
};

const SECTION_LEN: f64 = 400.0;

const COLOUR_SKILL_MULTIPLIER: f64 = 0.01;
const RHYTHM_SKILL_MULTIPLIER: f64 = 0.014;
const STAMINA_SKILL_MULTIPLIER: f64 = 0.02;

/// Star calculation for osu!taiko maps.
///
/// osu!standard maps are played as converts: sliders and spinners become
/// drum rolls and swells which don't count as hits.
/// In case of a partial play, e.g. a fail, one can specify the amount of passed objects.
///
/// # Example
///
/// ```
/// use akatsuki_pp::{Beatmap, TaikoStars};
///
/// let map = Beatmap::default();
///
/// let attrs = TaikoStars::new(&map).mods(64).calculate();
///
/// assert_eq!(attrs.stars, 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct TaikoStars<'m> {
    map: &'m Beatmap,
    mods: u32,
    passed_objects: Option<u32>,
}

impl<'m> TaikoStars<'m> {
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
    pub fn calculate(&self) -> TaikoDifficultyAttributes {
        let map = self.map;

        let take = self
            .passed_objects
            .map_or(map.hit_objects.len(), |n| n as usize)
            .min(map.hit_objects.len());

        let hit_objects = &map.hit_objects[..take];

        let map_attrs = BeatmapAttributesBuilder::new(map)
            .mode(GameMode::Taiko)
            .mods(self.mods)
            .build();

        let is_convert = map.mode == GameMode::Osu;

        let mut attrs = TaikoDifficultyAttributes {
            hit_window: map_attrs.hit_windows.od,
            max_combo: hit_objects.iter().filter(|h| h.is_circle()).count() as u32,
            is_convert,
            ..Default::default()
        };

        let clock_rate = map_attrs.clock_rate;

        // The first two objects have no difficulty object
        let mut diff_objects: Vec<_> = hit_objects
            .iter()
            .enumerate()
            .skip(2)
            .map(|(i, h)| {
                TaikoDifficultyObject::new(
                    h,
                    &hit_objects[i - 1],
                    &hit_objects[i - 2],
                    clock_rate,
                    i,
                )
            })
            .collect();

        let Some(first_start) = diff_objects.first().map(|h| h.start_time) else {
            return attrs;
        };

        mark_stamina_cheese(&mut diff_objects);

        let mut skills = Skills::new();
        let mut curr_section_end = (first_start / SECTION_LEN).ceil() * SECTION_LEN;

        for h in diff_objects.iter() {
            while h.start_time > curr_section_end {
                skills.save_peaks_and_start_from(curr_section_end);
                curr_section_end += SECTION_LEN;
            }

            skills.process(h);
        }

        skills.save_current_peaks();

        let colour_rating = skills.colour.difficulty_value() * COLOUR_SKILL_MULTIPLIER;
        let rhythm_rating = skills.rhythm.difficulty_value() * RHYTHM_SKILL_MULTIPLIER;

        let mut stamina_rating = (skills.stamina_right.difficulty_value()
            + skills.stamina_left.difficulty_value())
            * STAMINA_SKILL_MULTIPLIER;

        let stamina_penalty = simple_colour_penalty(stamina_rating, colour_rating);
        stamina_rating *= stamina_penalty;

        let combined_rating = skills.locally_combined_difficulty(stamina_penalty);
        let separate_rating = norm(1.5, [colour_rating, rhythm_rating, stamina_rating]);

        tracing::trace!(
            colour = colour_rating,
            rhythm = rhythm_rating,
            stamina = stamina_rating,
            combined = combined_rating,
            "osu!taiko skill values"
        );

        attrs.stamina = stamina_rating;
        attrs.rhythm = rhythm_rating;
        attrs.colour = colour_rating;
        attrs.peak = combined_rating;
        attrs.stars = rescale(1.4 * separate_rating + 0.5 * combined_rating);

        attrs
    }
}

struct Skills {
    colour: Strain<Colour>,
    rhythm: Strain<Rhythm>,
    stamina_right: Strain<Stamina>,
    stamina_left: Strain<Stamina>,
}

impl Skills {
    fn new() -> Self {
        Self {
            colour: Strain::new(Colour::default()),
            rhythm: Strain::new(Rhythm::default()),
            stamina_right: Strain::new(Stamina::new(true)),
            stamina_left: Strain::new(Stamina::new(false)),
        }
    }

    fn process(&mut self, h: &TaikoDifficultyObject<'_>) {
        self.colour.process(h);
        self.rhythm.process(h);
        self.stamina_right.process(h);
        self.stamina_left.process(h);
    }

    fn save_current_peaks(&mut self) {
        self.colour.save_current_peak();
        self.rhythm.save_current_peak();
        self.stamina_right.save_current_peak();
        self.stamina_left.save_current_peak();
    }

    fn save_peaks_and_start_from(&mut self, time: f64) {
        self.save_current_peaks();

        self.colour.start_new_section_from(time);
        self.rhythm.start_new_section_from(time);
        self.stamina_right.start_new_section_from(time);
        self.stamina_left.start_new_section_from(time);
    }

    /// Combine the skills section by section and weigh the results like a single skill.
    fn locally_combined_difficulty(&self, stamina_penalty: f64) -> f64 {
        let mut peaks: Vec<_> = self
            .colour
            .peaks()
            .iter()
            .zip(self.rhythm.peaks())
            .zip(self.stamina_right.peaks())
            .zip(self.stamina_left.peaks())
            .map(|(((colour, rhythm), stamina_right), stamina_left)| {
                norm(
                    2.0,
                    [
                        colour * COLOUR_SKILL_MULTIPLIER,
                        rhythm * RHYTHM_SKILL_MULTIPLIER,
                        (stamina_right + stamina_left) * STAMINA_SKILL_MULTIPLIER * stamina_penalty,
                    ],
                )
            })
            .collect();

        weighted_sum(&mut peaks)
    }
}

#[inline]
fn rescale(stars: f64) -> f64 {
    if stars < 0.0 {
        stars
    } else {
        10.43 * (stars / 8.0 + 1.0).ln()
    }
}

#[inline]
fn simple_colour_penalty(stamina: f64, colour: f64) -> f64 {
    if colour <= 0.0 {
        0.79 - 0.25
    } else {
        0.79 - (stamina / colour - 12.0).atan() / PI / 2.0
    }
}

#[inline]
fn norm<const N: usize>(p: f64, values: [f64; N]) -> f64 {
    values
        .iter()
        .map(|value| value.powf(p))
        .sum::<f64>()
        .powf(p.recip())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{HitObject, HitObjectKind, TimingPoint};
    use crate::Pos2;

    const KAT: u8 = 1 << 3;

    fn stream(n: usize, spacing: f64, sound: impl Fn(usize) -> u8) -> Beatmap {
        let hit_objects = (0..n)
            .map(|i| HitObject {
                pos: Pos2::new(256.0, 192.0),
                start_time: 1000.0 + i as f64 * spacing,
                kind: HitObjectKind::Circle,
                sound: sound(i),
            })
            .collect();

        Beatmap {
            mode: GameMode::Taiko,
            n_circles: n as u32,
            od: 5.0,
            hit_objects,
            timing_points: vec![TimingPoint {
                time: 0.0,
                beat_len: 500.0,
            }],
            ..Default::default()
        }
    }

    fn pattern(i: usize) -> u8 {
        // d k d d k k d k k d ...
        [0, KAT, 0, 0, KAT, KAT, 0, KAT, KAT, 0, 0][i % 11]
    }

    #[test]
    fn two_objects_have_no_stars() {
        let attrs = TaikoStars::new(&stream(2, 150.0, pattern)).calculate();

        assert!(attrs.stars.abs() < f64::EPSILON);
        assert_eq!(attrs.max_combo, 2);
    }

    #[test]
    fn stream_has_stars() {
        let attrs = TaikoStars::new(&stream(200, 120.0, pattern)).calculate();

        assert!(attrs.stars > 0.0);
        assert!(attrs.colour > 0.0);
        assert!(attrs.stamina > 0.0);
        assert_eq!(attrs.max_combo, 200);
        assert!(!attrs.is_convert);
    }

    #[test]
    fn faster_is_harder() {
        let map = stream(200, 120.0, pattern);

        let nomod = TaikoStars::new(&map).calculate();
        let dt = TaikoStars::new(&map).mods(64).calculate();

        assert!(dt.stars > nomod.stars);
        assert!(dt.hit_window < nomod.hit_window);
    }

    #[test]
    fn hit_window_follows_od() {
        let attrs = TaikoStars::new(&stream(10, 150.0, pattern)).calculate();

        // OD 5 is the middle of 50/35/20
        assert!((attrs.hit_window - 35.0).abs() < 1e-9);
    }

    #[test]
    fn spinners_are_not_combo() {
        let mut map = stream(20, 150.0, pattern);
        map.hit_objects[10].kind = HitObjectKind::Spinner { end_time: 2600.0 };

        let attrs = TaikoStars::new(&map).calculate();

        assert_eq!(attrs.max_combo, 19);
    }

    #[test]
    fn converts_are_rated_like_taiko_maps() {
        let taiko = stream(200, 120.0, |_| 0);
        let convert = Beatmap {
            mode: GameMode::Osu,
            ..stream(200, 120.0, |_| 0)
        };

        let taiko = TaikoStars::new(&taiko).calculate();
        let convert = TaikoStars::new(&convert).calculate();

        assert!(convert.is_convert);
        assert!(convert.stars > 0.0);
        assert!((taiko.stars - convert.stars).abs() < f64::EPSILON);
        assert!((taiko.stamina - convert.stamina).abs() < f64::EPSILON);
    }

    #[test]
    fn norm_of_three() {
        assert!((norm(2.0, [3.0, 4.0, 0.0]) - 5.0).abs() < 1e-12);
    }
}
