use crate::{
    curve::Curve,
    parse::{HitObject, HitObjectKind},
    Beatmap, Pos2,
};

use super::RelaxDifficultyAttributes;

const LEGACY_LAST_TICK_OFFSET: f64 = 36.0;
const BASE_SCORING_DISTANCE: f64 = 100.0;
const MAX_TICK_LEN: f64 = 100_000.0;

/// Hit object as seen by the relax skills: where the cursor has to go and
/// how far it travels on its own.
pub(crate) struct RelaxObject {
    pub(crate) time: f32,
    pub(crate) pos: Pos2,
    pub(crate) end_pos: Pos2,
    /// `Some(0.0)` for circles, `None` for spinners.
    pub(crate) travel_dist: Option<f32>,
}

impl RelaxObject {
    /// Convert a hit object while counting it and its combo into `attrs`.
    pub(crate) fn new(
        h: &HitObject,
        map: &Beatmap,
        radius: f32,
        scaling_factor: f32,
        ticks: &mut Vec<f64>,
        attrs: &mut RelaxDifficultyAttributes,
    ) -> Self {
        // Circle, slider head, or spinner
        attrs.max_combo += 1;

        let time = h.start_time as f32;

        match &h.kind {
            HitObjectKind::Circle => {
                attrs.n_circles += 1;

                Self {
                    time,
                    pos: h.pos,
                    end_pos: h.pos,
                    travel_dist: Some(0.0),
                }
            }
            HitObjectKind::Slider {
                pixel_len,
                repeats,
                curve_points,
                path_type,
            } => {
                attrs.n_sliders += 1;

                let curve = Curve::new(curve_points, *path_type, *pixel_len);
                let slider = SliderPath {
                    start_time: h.start_time,
                    start_pos: h.pos,
                    repeats: *repeats,
                    curve: &curve,
                };

                let (end_pos, travel_dist) =
                    slider.follow(map, radius * 3.0, ticks, &mut attrs.max_combo);

                Self {
                    time,
                    pos: h.pos,
                    end_pos,
                    travel_dist: Some(travel_dist * scaling_factor),
                }
            }
            HitObjectKind::Spinner { .. } | HitObjectKind::Hold { .. } => {
                attrs.n_spinners += 1;

                Self {
                    time,
                    pos: h.pos,
                    end_pos: h.pos,
                    travel_dist: None,
                }
            }
        }
    }

    #[inline]
    pub(crate) const fn is_spinner(&self) -> bool {
        self.travel_dist.is_none()
    }
}

struct SliderPath<'c> {
    start_time: f64,
    start_pos: Pos2,
    repeats: usize,
    curve: &'c Curve,
}

impl SliderPath<'_> {
    /// Move a cursor that stays within the follow circle along every tick,
    /// repeat, and the tail. Returns where the cursor ends up and how far it moved.
    fn follow(
        &self,
        map: &Beatmap,
        follow_radius: f32,
        ticks: &mut Vec<f64>,
        combo: &mut u32,
    ) -> (Pos2, f32) {
        let start_time = self.start_time;
        let beat_len = map.timing_point_at(start_time).beat_len;
        let slider_vel = map.difficulty_point_at(start_time).slider_vel;

        let scoring_dist = BASE_SCORING_DISTANCE * map.slider_mult * slider_vel;
        let vel = scoring_dist / beat_len;

        // Old maps don't scale tick distance with the slider velocity
        let tick_dist_mult = if map.version < 8 {
            slider_vel.recip()
        } else {
            1.0
        };

        let span_count = (self.repeats + 1) as f64;
        let total_duration = span_count * self.curve.dist() / vel;
        let span_duration = total_duration / span_count;

        let mut end_pos = self.start_pos;
        let mut travel_dist = 0.0;
        let curve = self.curve;

        let mut visit = |time: f64| {
            *combo += 1;

            let mut progress = (time - start_time) / span_duration;

            if progress % 2.0 >= 1.0 {
                progress = 1.0 - progress % 1.0;
            } else {
                progress %= 1.0;
            }

            let diff = curve.position_at(progress) - end_pos;
            let dist = diff.length();

            if dist > follow_radius {
                let moved = dist - follow_radius;
                end_pos += diff.normalize() * moved;
                travel_dist += moved;
            }
        };

        let len = curve.dist().min(MAX_TICK_LEN);
        let tick_dist = (scoring_dist / map.tick_rate * tick_dist_mult).clamp(0.0, len);
        let min_dist_from_end = vel * 10.0;

        if tick_dist > 0.0 {
            let mut curr_dist = tick_dist;

            // Ticks of the first span
            while curr_dist < len - min_dist_from_end {
                let time = start_time + curr_dist / len * span_duration;
                visit(time);
                ticks.push(time);

                curr_dist += tick_dist;
            }

            for span_idx in 1..=self.repeats {
                let span_offset = span_idx as f64 * span_duration;

                // Repeat point
                visit(start_time + span_offset);

                // Reversed spans mirror the ticks of the first span
                if span_idx % 2 == 1 {
                    let base = 2.0 * start_time + span_duration;

                    for time in ticks.iter().rev() {
                        visit(span_offset + base - time);
                    }
                } else {
                    for time in ticks.iter() {
                        visit(span_offset + time);
                    }
                }
            }

            ticks.clear();
        }

        // Tail
        let final_span_start = start_time + self.repeats as f64 * span_duration;
        let final_span_end = (start_time + total_duration / 2.0)
            .max(final_span_start + span_duration - LEGACY_LAST_TICK_OFFSET);
        visit(final_span_end);

        (end_pos, travel_dist)
    }
}
