use crate::{
    curve::Curve,
    parse::{HitObject, HitObjectKind},
    Beatmap, Pos2,
};

use super::{scaling_factor::ScalingFactor, NORMALIZED_RADIUS, PLAYFIELD_HEIGHT};

const LEGACY_LAST_TICK_OFFSET: f64 = 36.0;
const BASE_SCORING_DISTANCE: f64 = 100.0;

// * A very lenient maximum length of a slider for ticks to be generated.
const MAX_TICK_LEN: f64 = 100_000.0;

const MAXIMUM_SLIDER_RADIUS: f32 = NORMALIZED_RADIUS * 2.4;
const ASSUMED_SLIDER_RADIUS: f32 = NORMALIZED_RADIUS * 1.8;

/// Hit object with everything osu!standard difficulty needs.
///
/// Positions are already flipped for HR but do not include the stack offset.
#[derive(Clone, Debug)]
pub(crate) struct OsuObject {
    pub(crate) pos: Pos2,
    pub(crate) start_time: f64,
    pub(crate) stack_height: i32,
    pub(crate) stack_offset: Pos2,
    pub(crate) kind: OsuObjectKind,
}

#[derive(Clone, Debug)]
pub(crate) enum OsuObjectKind {
    Circle,
    Slider(OsuSlider),
    Spinner { end_time: f64 },
}

#[derive(Clone, Debug)]
pub(crate) struct OsuSlider {
    pub(crate) end_time: f64,
    /// Position at the end of the last span.
    pub(crate) end_pos: Pos2,
    /// Position at the end of the path, regardless of repeats.
    pub(crate) path_end_pos: Pos2,
    /// Stacked position the cursor ends up at when following the slider lazily.
    pub(crate) lazy_end_pos: Pos2,
    pub(crate) lazy_travel_dist: f32,
    pub(crate) lazy_travel_time: f64,
    pub(crate) repeats: usize,
    /// Ticks, repeats, and the tail, ordered by time. The head is not included.
    pub(crate) nested_objects: Vec<NestedObject>,
}

#[derive(Clone, Debug)]
pub(crate) struct NestedObject {
    pub(crate) pos: Pos2,
    pub(crate) start_time: f64,
    pub(crate) kind: NestedObjectKind,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum NestedObjectKind {
    Tick,
    Repeat,
    Tail,
}

impl OsuObject {
    pub(crate) fn new(h: &HitObject, map: &Beatmap, hr: bool) -> Self {
        let flip = |pos: Pos2| {
            if hr {
                Pos2::new(pos.x, PLAYFIELD_HEIGHT - pos.y)
            } else {
                pos
            }
        };

        let kind = match &h.kind {
            HitObjectKind::Circle => OsuObjectKind::Circle,
            HitObjectKind::Slider {
                pixel_len,
                repeats,
                curve_points,
                path_type,
            } => {
                let points: Vec<_> = curve_points.iter().copied().map(flip).collect();
                let curve = Curve::new(&points, *path_type, *pixel_len);

                OsuObjectKind::Slider(OsuSlider::new(h.start_time, *repeats, &curve, map))
            }
            HitObjectKind::Spinner { end_time } | HitObjectKind::Hold { end_time } => {
                OsuObjectKind::Spinner {
                    end_time: *end_time,
                }
            }
        };

        Self {
            pos: flip(h.pos),
            start_time: h.start_time,
            stack_height: 0,
            stack_offset: Pos2::zero(),
            kind,
        }
    }

    /// Combo the object is worth.
    pub(crate) fn combo(&self) -> u32 {
        match &self.kind {
            OsuObjectKind::Circle | OsuObjectKind::Spinner { .. } => 1,
            OsuObjectKind::Slider(slider) => 1 + slider.nested_objects.len() as u32,
        }
    }

    pub(crate) fn end_time(&self) -> f64 {
        match &self.kind {
            OsuObjectKind::Circle => self.start_time,
            OsuObjectKind::Slider(slider) => slider.end_time,
            OsuObjectKind::Spinner { end_time } => *end_time,
        }
    }

    pub(crate) fn end_pos(&self) -> Pos2 {
        match &self.kind {
            OsuObjectKind::Circle | OsuObjectKind::Spinner { .. } => self.pos,
            OsuObjectKind::Slider(slider) => slider.end_pos,
        }
    }

    pub(crate) fn stacked_pos(&self) -> Pos2 {
        self.pos + self.stack_offset
    }

    pub(crate) fn stacked_end_pos(&self) -> Pos2 {
        self.end_pos() + self.stack_offset
    }

    /// Where the cursor is assumed to be after the object.
    pub(crate) fn lazy_end_pos(&self) -> Pos2 {
        match &self.kind {
            OsuObjectKind::Circle | OsuObjectKind::Spinner { .. } => self.stacked_pos(),
            OsuObjectKind::Slider(slider) => slider.lazy_end_pos,
        }
    }

    pub(crate) fn lazy_travel_time(&self) -> f64 {
        match &self.kind {
            OsuObjectKind::Slider(slider) => slider.lazy_travel_time,
            OsuObjectKind::Circle | OsuObjectKind::Spinner { .. } => 0.0,
        }
    }

    #[inline]
    pub(crate) fn is_circle(&self) -> bool {
        matches!(self.kind, OsuObjectKind::Circle)
    }

    #[inline]
    pub(crate) fn is_slider(&self) -> bool {
        matches!(self.kind, OsuObjectKind::Slider(_))
    }

    #[inline]
    pub(crate) fn is_spinner(&self) -> bool {
        matches!(self.kind, OsuObjectKind::Spinner { .. })
    }

    /// Apply the stack offset and compute how far the cursor travels
    /// when following a slider lazily.
    pub(crate) fn finalize(&mut self, scaling_factor: &ScalingFactor) {
        self.stack_offset = scaling_factor.stack_offset(self.stack_height);

        let stacked_pos = self.stacked_pos();
        let stack_offset = self.stack_offset;

        let OsuObjectKind::Slider(ref mut slider) = self.kind else {
            return;
        };

        slider.lazy_end_pos += stack_offset;

        let mut curr_cursor_pos = stacked_pos;
        let scaling_factor = NORMALIZED_RADIUS / scaling_factor.radius;
        let nested_len = slider.nested_objects.len();

        for (i, nested) in slider.nested_objects.iter().enumerate() {
            let mut curr_movement = nested.pos + stack_offset - curr_cursor_pos;
            let mut curr_movement_len = scaling_factor * curr_movement.length();

            // * Amount of movement required so that the cursor position needs to be updated.
            let mut required_movement = ASSUMED_SLIDER_RADIUS;

            if i == nested_len - 1 {
                // * The end of a slider has special aim rules due to the relaxed time constraint on position.
                // * There is both a lazy end position as well as the actual end slider position.
                // * We assume the player takes the simpler movement.
                let lazy_movement = slider.lazy_end_pos - curr_cursor_pos;

                if lazy_movement.length() < curr_movement.length() {
                    curr_movement = lazy_movement;
                }

                curr_movement_len = scaling_factor * curr_movement.length();
            } else if nested.kind == NestedObjectKind::Repeat {
                // * For a slider repeat, assume a tighter movement threshold to better assess repeat sliders.
                required_movement = NORMALIZED_RADIUS;
            }

            if curr_movement_len > required_movement {
                let ratio = (curr_movement_len - required_movement) / curr_movement_len;
                curr_cursor_pos += curr_movement * ratio;
                curr_movement_len *= ratio;
                slider.lazy_travel_dist += curr_movement_len;
            }
        }

        slider.lazy_end_pos = curr_cursor_pos;
    }

    /// Normalized distance between the end of `last` and this object where the
    /// end of a slider is only approximately reached.
    pub(crate) fn tail_jump_dist(&self, last: &Self, scaling_factor: f32) -> Option<f32> {
        let OsuObjectKind::Slider(slider) = &last.kind else {
            return None;
        };

        let tail_pos = slider
            .nested_objects
            .iter()
            .rev()
            .find(|nested| nested.kind == NestedObjectKind::Tail)
            .map_or(last.pos, |tail| tail.pos);

        let tail_jump_dist = (tail_pos + last.stack_offset - self.stacked_pos()).length();

        Some(tail_jump_dist * scaling_factor)
    }
}

impl OsuSlider {
    fn new(start_time: f64, repeats: usize, curve: &Curve, map: &Beatmap) -> Self {
        let timing_point = map.timing_point_at(start_time);
        let difficulty_point = map.difficulty_point_at(start_time);

        let scoring_dist = BASE_SCORING_DISTANCE * map.slider_mult * difficulty_point.slider_vel;
        let vel = scoring_dist / timing_point.beat_len;

        // * prior to v8, speed multipliers don't adjust for how many ticks are generated over the same distance.
        let tick_dist_mult = if map.version < 8 {
            difficulty_point.slider_vel.recip()
        } else {
            1.0
        };

        let span_count = repeats + 1;
        let span_duration = curve.dist() / vel;
        let duration = span_count as f64 * span_duration;
        let end_time = start_time + duration;

        let len = curve.dist().min(MAX_TICK_LEN);
        let tick_dist = (scoring_dist / map.tick_rate * tick_dist_mult).clamp(0.0, len);
        let min_dist_from_end = vel * 10.0;

        let mut nested_objects = Vec::new();

        for span in 0..span_count {
            let span_start_time = start_time + span as f64 * span_duration;
            let reversed = span % 2 == 1;
            let ticks_start = nested_objects.len();

            if tick_dist > 0.0 {
                let mut dist = tick_dist;

                while dist <= len && dist < len - min_dist_from_end {
                    let path_progress = dist / len;

                    let time_progress = if reversed {
                        1.0 - path_progress
                    } else {
                        path_progress
                    };

                    nested_objects.push(NestedObject {
                        pos: curve.position_at(path_progress),
                        start_time: span_start_time + time_progress * span_duration,
                        kind: NestedObjectKind::Tick,
                    });

                    dist += tick_dist;
                }
            }

            if reversed {
                nested_objects[ticks_start..].reverse();
            }

            if span < span_count - 1 {
                nested_objects.push(NestedObject {
                    pos: curve.position_at(((span + 1) % 2) as f64),
                    start_time: span_start_time + span_duration,
                    kind: NestedObjectKind::Repeat,
                });
            }
        }

        let end_pos = curve.position_at((span_count % 2) as f64);

        // * we need to use the LegacyLastTick here for compatibility reasons (difficulty).
        // * it is *okay* to use this because the TailCircle is not used for any meaningful purpose in gameplay.
        let final_span_start_time = start_time + repeats as f64 * span_duration;
        let final_span_end_time = (start_time + duration / 2.0)
            .max(final_span_start_time + span_duration - LEGACY_LAST_TICK_OFFSET);

        nested_objects.push(NestedObject {
            pos: end_pos,
            start_time: final_span_end_time,
            kind: NestedObjectKind::Tail,
        });

        // On very short sliders the legacy last tick may come before other nested objects
        nested_objects.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

        let lazy_travel_time = nested_objects
            .last()
            .map_or(0.0, |nested| nested.start_time - start_time);

        let mut end_time_min = if span_duration > 0.0 {
            lazy_travel_time / span_duration
        } else {
            0.0
        };

        if end_time_min % 2.0 >= 1.0 {
            end_time_min = 1.0 - end_time_min % 1.0;
        } else {
            end_time_min %= 1.0;
        }

        Self {
            end_time,
            end_pos,
            path_end_pos: curve.position_at(1.0),
            // * temporary lazy end position until a real result can be derived.
            lazy_end_pos: curve.position_at(end_time_min),
            lazy_travel_dist: 0.0,
            lazy_travel_time,
            repeats,
            nested_objects,
        }
    }
}

/// Minimum jump distance to the current object if the previous one is a slider.
pub(crate) fn min_slider_jump_dist(lazy_jump_dist: f64, tail_jump_dist: f32) -> f64 {
    // * There are two types of slider-to-object patterns to consider in order to better
    // * approximate the real movement a player will take to jump between the hitobjects.
    // * Players either cut the slider short or follow through to its visual extent,
    // * so the player is assumed to jump the minimum of these two distances in all cases.
    (lazy_jump_dist - f64::from(MAXIMUM_SLIDER_RADIUS - ASSUMED_SLIDER_RADIUS))
        .min(f64::from(tail_jump_dist - MAXIMUM_SLIDER_RADIUS))
        .max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::PathType;

    fn slider(repeats: usize, pixel_len: f64) -> HitObject {
        HitObject {
            pos: Pos2::new(100.0, 100.0),
            start_time: 1000.0,
            kind: HitObjectKind::Slider {
                pixel_len,
                repeats,
                curve_points: vec![Pos2::new(100.0, 100.0), Pos2::new(300.0, 100.0)],
                path_type: PathType::Linear,
            },
            sound: 0,
        }
    }

    fn map() -> Beatmap {
        Beatmap {
            slider_mult: 1.0,
            tick_rate: 1.0,
            timing_points: vec![crate::parse::TimingPoint {
                time: 0.0,
                beat_len: 500.0,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn slider_ticks_and_tail() {
        let obj = OsuObject::new(&slider(0, 200.0), &map(), false);

        let OsuObjectKind::Slider(slider) = &obj.kind else {
            panic!("expected slider");
        };

        // 100px per beat, 500ms per beat => 200px take 1000ms
        assert!((slider.end_time - 2000.0).abs() < 1e-6);
        assert_eq!(slider.nested_objects.len(), 2);
        assert_eq!(slider.nested_objects[0].kind, NestedObjectKind::Tick);
        assert_eq!(slider.nested_objects[1].kind, NestedObjectKind::Tail);
        assert!((slider.nested_objects[1].start_time - 1964.0).abs() < 1e-6);
        assert_eq!(obj.combo(), 3);
    }

    #[test]
    fn repeat_slider_ends_at_head() {
        let obj = OsuObject::new(&slider(1, 200.0), &map(), false);

        let OsuObjectKind::Slider(slider) = &obj.kind else {
            panic!("expected slider");
        };

        assert!((slider.end_pos.x - 100.0).abs() < 1e-4);
        assert!((slider.path_end_pos.x - 300.0).abs() < 1e-4);

        let kinds: Vec<_> = slider.nested_objects.iter().map(|n| n.kind).collect();

        assert_eq!(
            kinds,
            [
                NestedObjectKind::Tick,
                NestedObjectKind::Repeat,
                NestedObjectKind::Tick,
                NestedObjectKind::Tail
            ]
        );
    }

    #[test]
    fn hard_rock_flips_vertically() {
        let mut h = slider(0, 200.0);
        h.pos = Pos2::new(100.0, 50.0);

        if let HitObjectKind::Slider { curve_points, .. } = &mut h.kind {
            curve_points[0] = h.pos;
        }

        let obj = OsuObject::new(&h, &map(), true);

        assert!((obj.pos.y - 334.0).abs() < f32::EPSILON);
    }
}
