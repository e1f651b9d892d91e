mod attributes;
mod difficulty_object;
mod object;
mod pp;
mod score_state;
mod strain;

use crate::{parse::HitObjectKind, Beatmap, GameMode, Mods};

use self::{difficulty_object::ManiaDifficultyObject, object::ManiaObject, strain::Strain};

pub use self::{
    attributes::{ManiaDifficultyAttributes, ManiaPerformanceAttributes},
    pp::{ManiaAttributeProvider, ManiaPP},
    score_state::ManiaScoreState,
};

const SECTION_LEN: f64 = 400.0;
const STAR_SCALING_FACTOR: f64 = 0.018;

/// Star calculation for osu!mania maps.
///
/// osu!standard maps are converted by assigning a column to each object
/// based on its x-coordinate. Sliders and spinners become hold notes.
/// In case of a partial play, e.g. a fail, one can specify the amount of passed objects.
///
/// # Example
///
/// ```
/// use akatsuki_pp::{Beatmap, ManiaStars};
///
/// let map = Beatmap::default();
///
/// let attrs = ManiaStars::new(&map).mods(64).calculate();
///
/// assert_eq!(attrs.n_objects, 0);
/// ```
#[derive(Clone, Debug)]
pub struct ManiaStars<'m> {
    map: &'m Beatmap,
    mods: u32,
    passed_objects: Option<u32>,
}

impl<'m> ManiaStars<'m> {
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
    pub fn calculate(&self) -> ManiaDifficultyAttributes {
        let map = self.map;
        let mods = self.mods;
        let is_convert = map.mode == GameMode::Osu;

        let take = self
            .passed_objects
            .map_or(map.hit_objects.len(), |n| n as usize)
            .min(map.hit_objects.len());

        let total_columns = total_columns(map, mods);
        let clock_rate = mods.clock_rate();

        let objects: Vec<_> = map.hit_objects[..take]
            .iter()
            .map(|h| ManiaObject::new(h, total_columns, map))
            .collect();

        let mut attrs = ManiaDifficultyAttributes {
            hit_window: hit_window(map.od, is_convert, mods),
            n_objects: take as u32,
            max_combo: objects.iter().map(ManiaObject::combo).sum(),
            is_convert,
            ..Default::default()
        };

        if objects.len() < 2 {
            return attrs;
        }

        let mut strain = Strain::new(total_columns as usize);

        // The first object has no difficulty object
        for (i, pair) in objects.windows(2).enumerate() {
            let diff_object = ManiaDifficultyObject::new(&pair[1], &pair[0], clock_rate, i);
            strain.process(&diff_object);
        }

        let strain_value = strain.difficulty_value();

        tracing::trace!(strain = strain_value, "osu!mania skill values");

        attrs.stars = strain_value * STAR_SCALING_FACTOR;

        attrs
    }
}

pub(crate) fn max_combo(map: &Beatmap, mods: u32) -> u32 {
    let total_columns = total_columns(map, mods);

    map.hit_objects
        .iter()
        .map(|h| ManiaObject::new(h, total_columns, map).combo())
        .sum()
}

/// Amount of keys the map is played with.
///
/// Converted maps derive it from their circle size and the ratio of sliders
/// and spinners unless a key mod is set.
pub(crate) fn total_columns(map: &Beatmap, mods: u32) -> f32 {
    if map.mode != GameMode::Osu {
        return map.cs.round_ties_even().max(1.0);
    }

    if let Some(keys) = mods.key_count() {
        return keys as f32;
    }

    let rounded_cs = map.cs.round_ties_even();
    let rounded_od = map.od.round_ties_even();

    let n_long = map
        .hit_objects
        .iter()
        .filter(|h| {
            matches!(
                h.kind,
                HitObjectKind::Slider { .. } | HitObjectKind::Spinner { .. }
            )
        })
        .count();

    let len = map.hit_objects.len().max(1);
    let percent_slider_or_spinner = n_long as f32 / len as f32;

    if percent_slider_or_spinner < 0.2 {
        7.0
    } else if percent_slider_or_spinner < 0.3 || rounded_cs >= 5.0 {
        f32::from(6 + u8::from(rounded_od > 5.0))
    } else if percent_slider_or_spinner > 0.6 {
        f32::from(4 + u8::from(rounded_od > 4.0))
    } else {
        (rounded_od + 1.0).clamp(4.0, 7.0)
    }
}

/// Window of a 300 in milliseconds as perceived with the clock rate applied.
fn hit_window(od: f32, is_convert: bool, mods: u32) -> f64 {
    let mut value = if !is_convert {
        34.0 + 3.0 * (10.0 - f64::from(od)).clamp(0.0, 10.0)
    } else if od.round_ties_even() > 4.0 {
        34.0
    } else {
        47.0
    };

    if mods.hr() {
        value /= 1.4;
    } else if mods.ez() {
        value *= 1.4;
    }

    (value / mods.clock_rate()).ceil()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{HitObject, PathType, TimingPoint};
    use crate::Pos2;

    fn column_x(column: usize, keys: usize) -> f32 {
        (column as f32 + 0.5) * 512.0 / keys as f32
    }

    fn stream(n: usize, keys: usize) -> Beatmap {
        let hit_objects = (0..n)
            .map(|i| HitObject {
                pos: Pos2::new(column_x(i % keys, keys), 192.0),
                start_time: 1000.0 + i as f64 * 80.0,
                kind: HitObjectKind::Circle,
                sound: 0,
            })
            .collect();

        Beatmap {
            mode: GameMode::Mania,
            cs: keys as f32,
            od: 8.0,
            hit_objects,
            timing_points: vec![TimingPoint {
                time: 0.0,
                beat_len: 500.0,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn stream_has_stars() {
        let attrs = ManiaStars::new(&stream(200, 4)).calculate();

        assert!(attrs.stars > 0.0);
        assert_eq!(attrs.n_objects, 200);
        assert_eq!(attrs.max_combo, 200);
        assert!(!attrs.is_convert);
    }

    #[test]
    fn double_time_is_harder() {
        let map = stream(200, 4);

        let nomod = ManiaStars::new(&map).calculate();
        let dt = ManiaStars::new(&map).mods(64).calculate();

        assert!(dt.stars > nomod.stars);
    }

    #[test]
    fn hit_window_from_od() {
        let attrs = ManiaStars::new(&stream(10, 4)).calculate();

        // 34 + 3 * (10 - 8)
        assert!((attrs.hit_window - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn hard_rock_keeps_stars() {
        let map = stream(100, 7);

        let nomod = ManiaStars::new(&map).calculate();
        let hr = ManiaStars::new(&map).mods(16).calculate();

        assert!((nomod.stars - hr.stars).abs() < f64::EPSILON);
        assert!(hr.hit_window < nomod.hit_window);
    }

    #[test]
    fn convert_columns() {
        let mut map = stream(10, 4);
        map.mode = GameMode::Osu;
        map.od = 5.0;

        // only circles
        assert!((total_columns(&map, 0) - 7.0).abs() < f32::EPSILON);

        // key mods override the heuristic
        assert!((total_columns(&map, 1 << 15) - 4.0).abs() < f32::EPSILON);

        let points = vec![Pos2::new(0.0, 0.0), Pos2::new(100.0, 0.0)];

        for h in map.hit_objects.iter_mut().take(7) {
            h.kind = HitObjectKind::Slider {
                pixel_len: 100.0,
                repeats: 0,
                curve_points: points.clone(),
                path_type: PathType::Linear,
            };
        }

        // 70% sliders with OD 5
        assert!((total_columns(&map, 0) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn native_maps_ignore_key_mods() {
        let map = stream(10, 4);

        assert!((total_columns(&map, 1 << 15) - 4.0).abs() < f32::EPSILON);
        assert!((total_columns(&map, 1 << 17) - 4.0).abs() < f32::EPSILON);
    }
}
