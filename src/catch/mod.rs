mod attributes;
mod catcher;
mod convert;
mod difficulty_object;
mod juice_stream;
mod movement;
mod palpable;
mod pp;
mod random;
mod score_state;

use crate::{parse::BeatmapAttributesBuilder, Beatmap, GameMode, Mods};

use self::{
    convert::{convert_objects, ObjectCount},
    difficulty_object::{CatchDifficultyObject, NORMALIZED_HITOBJECT_RADIUS},
    movement::Movement,
};

pub use self::{
    attributes::{CatchDifficultyAttributes, CatchPerformanceAttributes},
    pp::{CatchAttributeProvider, CatchPP},
    score_state::CatchScoreState,
};

const SECTION_LEN: f64 = 750.0;
const STAR_SCALING_FACTOR: f64 = 0.153;

pub(crate) const PLAYFIELD_WIDTH: f32 = 512.0;

/// Star calculation for osu!catch maps.
///
/// Sliders are expanded into juice streams and spinners into banana showers,
/// as the game does for converted osu!standard maps.
/// In case of a partial play, e.g. a fail, one can specify the amount of passed
/// fruits and droplets.
///
/// # Example
///
/// ```
/// use akatsuki_pp::{Beatmap, CatchStars};
///
/// let map = Beatmap::default();
///
/// let attrs = CatchStars::new(&map).mods(16).calculate();
///
/// assert_eq!(attrs.max_combo(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct CatchStars<'m> {
    map: &'m Beatmap,
    mods: u32,
    passed_objects: Option<u32>,
}

impl<'m> CatchStars<'m> {
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

    /// Amount of passed fruits and droplets for partial plays, e.g. a fail.
    #[inline]
    pub fn passed_objects(mut self, passed_objects: u32) -> Self {
        self.passed_objects = Some(passed_objects);

        self
    }

    /// Calculate all difficulty related values, including stars.
    pub fn calculate(&self) -> CatchDifficultyAttributes {
        let map = self.map;
        let take = self.passed_objects.map_or(usize::MAX, |n| n as usize);

        let map_attrs = BeatmapAttributesBuilder::new(map)
            .mode(GameMode::Catch)
            .mods(self.mods)
            .build();

        let cs = map_attrs.cs as f32;
        let clock_rate = map_attrs.clock_rate;

        let mut count = ObjectCount::new(take);
        let palpable_objects = convert_objects(map, &mut count, self.mods.hr(), cs);

        let mut attrs = CatchDifficultyAttributes {
            ar: map_attrs.ar,
            n_fruits: count.fruits,
            n_droplets: count.droplets,
            n_tiny_droplets: count.tiny_droplets,
            is_convert: map.mode == GameMode::Osu,
            ..Default::default()
        };

        let mut palpable_iter = palpable_objects.iter().take(take);

        let Some(mut last) = palpable_iter.next() else {
            return attrs;
        };

        let half_catcher_width = catcher::half_catcher_width(cs);
        let scaling_factor = NORMALIZED_HITOBJECT_RADIUS / half_catcher_width;

        let mut movement = Movement::new(half_catcher_width, clock_rate);

        for (i, h) in palpable_iter.enumerate() {
            let diff_object = CatchDifficultyObject::new(h, last, clock_rate, scaling_factor, i);
            movement.process(&diff_object);
            last = h;
        }

        let movement_value = movement.difficulty_value();

        tracing::trace!(movement = movement_value, "osu!catch skill values");

        attrs.stars = movement_value.sqrt() * STAR_SCALING_FACTOR;

        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{HitObject, HitObjectKind, PathType, TimingPoint};
    use crate::Pos2;

    fn map(hit_objects: Vec<HitObject>) -> Beatmap {
        Beatmap {
            mode: GameMode::Catch,
            ar: 8.0,
            od: 8.0,
            cs: 4.0,
            slider_mult: 1.4,
            tick_rate: 1.0,
            hit_objects,
            timing_points: vec![TimingPoint {
                time: 0.0,
                beat_len: 400.0,
            }],
            ..Default::default()
        }
    }

    fn jumps(n: usize) -> Beatmap {
        let hit_objects = (0..n)
            .map(|i| HitObject {
                pos: Pos2::new(if i % 2 == 0 { 96.0 } else { 416.0 }, 192.0),
                start_time: 1000.0 + i as f64 * 300.0,
                kind: HitObjectKind::Circle,
                sound: 0,
            })
            .collect();

        map(hit_objects)
    }

    fn slider(start_time: f64) -> HitObject {
        let points = vec![Pos2::new(100.0, 192.0), Pos2::new(300.0, 192.0)];

        HitObject {
            pos: points[0],
            start_time,
            kind: HitObjectKind::Slider {
                pixel_len: 200.0,
                repeats: 0,
                curve_points: points,
                path_type: PathType::Linear,
            },
            sound: 0,
        }
    }

    #[test]
    fn jumps_have_stars() {
        let attrs = CatchStars::new(&jumps(50)).calculate();

        assert!(attrs.stars > 0.0);
        assert_eq!(attrs.n_fruits, 50);
        assert_eq!(attrs.max_combo(), 50);
        assert!(!attrs.is_convert);
    }

    #[test]
    fn double_time_is_harder() {
        let map = jumps(50);

        let nomod = CatchStars::new(&map).calculate();
        let dt = CatchStars::new(&map).mods(64).calculate();

        assert!(dt.stars > nomod.stars);
        assert!(dt.ar > nomod.ar);
    }

    #[test]
    fn sliders_become_juice_streams() {
        let attrs = CatchStars::new(&map(vec![slider(1000.0), slider(3000.0)])).calculate();

        assert_eq!(attrs.n_fruits, 4);
        assert!(attrs.n_droplets > 0);
        assert!(attrs.n_tiny_droplets > 0);
        assert_eq!(attrs.max_combo(), attrs.n_fruits + attrs.n_droplets);
    }

    #[test]
    fn passed_objects_limit_counts() {
        let attrs = CatchStars::new(&jumps(50)).passed_objects(20).calculate();
        let full = CatchStars::new(&jumps(50)).calculate();

        assert_eq!(attrs.max_combo(), 20);
        assert!(attrs.stars <= full.stars);
    }

    #[test]
    fn no_passed_objects_no_stars() {
        let attrs = CatchStars::new(&jumps(50)).passed_objects(0).calculate();

        assert_eq!(attrs.max_combo(), 0);
        assert!(attrs.stars.abs() < f64::EPSILON);
    }
}
