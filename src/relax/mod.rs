mod attributes;
mod difficulty_object;
mod object;
mod pp;
mod skill;

use crate::{parse::BeatmapAttributesBuilder, Beatmap, GameMode, OsuPP, OsuStars};

use self::{
    difficulty_object::RelaxDifficultyObject,
    object::RelaxObject,
    skill::{Skill, SkillKind},
};

pub use self::{
    attributes::{RelaxDifficultyAttributes, RelaxPerformanceAttributes},
    pp::{RelaxAttributeProvider, RelaxPP},
};

const OBJECT_RADIUS: f32 = 64.0;
const SECTION_LEN: f32 = 400.0;
const DIFFICULTY_MULTIPLIER: f32 = 0.0675;
const NORMALIZED_RADIUS: f32 = 52.0;

/// Star calculation for osu!standard maps played with relax.
///
/// This is the 2019 osu!standard algorithm: slider paths are followed
/// but stack leniency is ignored, and the star rating only consists
/// of aim and speed. Relax scores are valued with it instead of the
/// current algorithm that [`OsuStars`](crate::OsuStars) implements.
///
/// # Example
///
/// ```
/// use akatsuki_pp::{Beatmap, RelaxStars};
///
/// let map = Beatmap::default();
///
/// let attrs = RelaxStars::new(&map)
///     .mods(128 + 64) // RXDT
///     .calculate();
///
/// assert_eq!(attrs.stars, 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct RelaxStars<'m> {
    pub(crate) map: &'m Beatmap,
    pub(crate) mods: u32,
    pub(crate) passed_objects: Option<u32>,
}

impl<'m> RelaxStars<'m> {
    #[inline]
    pub fn new(map: &'m Beatmap) -> Self {
        Self {
            map,
            mods: 0,
            passed_objects: None,
        }
    }

    /// Specify mods through their bit values.
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

    pub fn calculate(&self) -> RelaxDifficultyAttributes {
        let map = self.map;

        let map_attrs = BeatmapAttributesBuilder::new(map)
            .mode(GameMode::Osu)
            .mods(self.mods)
            .build();

        let mut attrs = RelaxDifficultyAttributes {
            ar: map_attrs.ar,
            od: map_attrs.od,
            hp: map_attrs.hp,
            cs: map_attrs.cs,
            beatmap_id: map.beatmap_id,
            creator: map.creator.clone(),
            ..Default::default()
        };

        let take = self
            .passed_objects
            .map_or(map.hit_objects.len(), |n| n as usize)
            .min(map.hit_objects.len());

        let radius = OBJECT_RADIUS * (1.0 - 0.7 * (map_attrs.cs as f32 - 5.0) / 5.0) / 2.0;
        let mut scaling_factor = NORMALIZED_RADIUS / radius;

        if radius < 30.0 {
            let small_circle_bonus = (30.0 - radius).min(5.0) / 50.0;
            scaling_factor *= 1.0 + small_circle_bonus;
        }

        let mut ticks = Vec::new();

        let objects: Vec<_> = map.hit_objects[..take]
            .iter()
            .map(|h| {
                RelaxObject::new(h, map, radius, scaling_factor, &mut ticks, &mut attrs)
            })
            .collect();

        // Strain requires a predecessor
        if objects.len() < 2 {
            return attrs;
        }

        let clock_rate = map_attrs.clock_rate as f32;
        let section_len = SECTION_LEN * clock_rate;

        let mut aim = Skill::new(SkillKind::Aim);
        let mut speed = Skill::new(SkillKind::Speed);

        let mut current_section_end = (objects[0].time / section_len).ceil() * section_len;

        let mut prev_prev = None;
        let mut prev = &objects[0];
        let mut prev_vals = None;

        for (i, curr) in objects.iter().enumerate().skip(1) {
            let h = RelaxDifficultyObject::new(
                curr,
                prev,
                prev_vals,
                prev_prev,
                clock_rate,
                scaling_factor,
            );

            while h.base.time > current_section_end {
                // The section of the first object has no peak
                if i > 1 {
                    aim.save_current_peak();
                    aim.start_new_section_from(current_section_end);
                    speed.save_current_peak();
                    speed.start_new_section_from(current_section_end);
                }

                current_section_end += section_len;
            }

            aim.process(&h);
            speed.process(&h);

            prev_prev = Some(prev);
            prev_vals = Some((h.jump_dist, h.strain_time));
            prev = curr;
        }

        aim.save_current_peak();
        speed.save_current_peak();

        let aim_strain = aim.difficulty_value().sqrt() * DIFFICULTY_MULTIPLIER;
        let speed_strain = speed.difficulty_value().sqrt() * DIFFICULTY_MULTIPLIER;
        let stars = aim_strain + speed_strain + (aim_strain - speed_strain).abs() / 2.0;

        tracing::trace!(aim_strain, speed_strain, "Relax skill values");

        attrs.aim_strain = f64::from(aim_strain);
        attrs.speed_strain = f64::from(speed_strain);
        attrs.stars = f64::from(stars);

        attrs
    }
}

impl<'m> From<OsuStars<'m>> for RelaxStars<'m> {
    fn from(osu: OsuStars<'m>) -> Self {
        Self {
            map: osu.map,
            mods: osu.mods,
            passed_objects: osu.passed_objects,
        }
    }
}

impl<'m> From<RelaxStars<'m>> for OsuStars<'m> {
    fn from(relax: RelaxStars<'m>) -> Self {
        Self {
            map: relax.map,
            mods: relax.mods,
            passed_objects: relax.passed_objects,
        }
    }
}

impl<'m> From<OsuPP<'m>> for RelaxPP<'m> {
    fn from(osu: OsuPP<'m>) -> Self {
        let mut relax = Self::new(osu.map);

        relax.mods = osu.mods;
        relax.combo = osu.combo;
        relax.acc = osu.acc;
        relax.n300 = osu.n300;
        relax.n100 = osu.n100;
        relax.n50 = osu.n50;
        relax.n_misses = osu.n_misses;
        relax.passed_objects = osu.passed_objects;

        relax
    }
}

impl<'m> From<RelaxPP<'m>> for OsuPP<'m> {
    fn from(relax: RelaxPP<'m>) -> Self {
        let mut osu = Self::new(relax.map);

        osu.mods = relax.mods;
        osu.combo = relax.combo;
        osu.acc = relax.acc;
        osu.n300 = relax.n300;
        osu.n100 = relax.n100;
        osu.n50 = relax.n50;
        osu.n_misses = relax.n_misses;
        osu.passed_objects = relax.passed_objects;

        osu
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{HitObject, HitObjectKind, PathType, TimingPoint};
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
        let attrs = RelaxStars::new(&jumps(20)).calculate();

        assert_eq!(attrs.n_circles, 20);
        assert_eq!(attrs.max_combo, 20);
        assert!(attrs.stars > 0.0);
        assert!(attrs.aim_strain > attrs.speed_strain);
    }

    #[test]
    fn single_object_has_no_stars() {
        let attrs = RelaxStars::new(&jumps(1)).calculate();

        assert_eq!(attrs.n_circles, 1);
        assert!(attrs.stars.abs() < f64::EPSILON);
    }

    #[test]
    fn double_time_is_harder() {
        let map = jumps(50);
        let nomod = RelaxStars::new(&map).mods(128).calculate();
        let dt = RelaxStars::new(&map).mods(128 + 64).calculate();

        assert!(dt.stars > nomod.stars);
        assert!(dt.ar > nomod.ar);
    }

    #[test]
    fn prefix_counts_only_passed_objects() {
        let attrs = RelaxStars::new(&jumps(30)).passed_objects(10).calculate();

        assert_eq!(attrs.n_circles, 10);
        assert_eq!(attrs.max_combo, 10);
    }

    #[test]
    fn keeps_map_identity() {
        let map = Beatmap {
            beatmap_id: 1_821_147,
            creator: String::from("gwb"),
            ..jumps(5)
        };

        let attrs = RelaxStars::new(&map).calculate();

        assert_eq!(attrs.beatmap_id, 1_821_147);
        assert_eq!(attrs.creator, "gwb");
    }

    #[test]
    fn slider_combo_matches_current_algorithm() {
        let mut map = jumps(4);

        map.hit_objects[1].kind = HitObjectKind::Slider {
            pixel_len: 280.0,
            repeats: 1,
            curve_points: vec![Pos2::new(448.0, 192.0), Pos2::new(168.0, 192.0)],
            path_type: PathType::Linear,
        };
        map.hit_objects[2].start_time = 2400.0;
        map.hit_objects[3].start_time = 2600.0;
        map.n_circles = 3;
        map.n_sliders = 1;

        let relax = RelaxStars::new(&map).calculate();
        let osu = OsuStars::new(&map).calculate();

        assert_eq!(relax.n_sliders, 1);
        assert_eq!(relax.max_combo, osu.max_combo);
    }
}
