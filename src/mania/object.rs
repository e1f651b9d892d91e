use crate::{
    curve::Curve,
    parse::{HitObject, HitObjectKind},
    Beatmap,
};

const BASE_SCORING_DIST: f64 = 100.0;

/// Note or hold note in a column.
#[derive(Clone, Debug)]
pub(crate) struct ManiaObject {
    pub(crate) start_time: f64,
    pub(crate) end_time: f64,
    pub(crate) column: usize,
}

impl ManiaObject {
    /// Sliders and spinners of converted maps are held for their duration.
    pub(crate) fn new(h: &HitObject, total_columns: f32, map: &Beatmap) -> Self {
        let end_time = match h.kind {
            HitObjectKind::Circle => h.start_time,
            HitObjectKind::Slider {
                pixel_len,
                repeats,
                ref curve_points,
                path_type,
            } => {
                let dist = Curve::new(curve_points, path_type, pixel_len).dist();

                let beat_len = map.timing_point_at(h.start_time).beat_len;
                let slider_vel = map.difficulty_point_at(h.start_time).slider_vel;

                let scoring_dist = BASE_SCORING_DIST * map.slider_mult * slider_vel;
                let velocity = scoring_dist / beat_len;

                h.start_time + (repeats + 1) as f64 * dist / velocity
            }
            HitObjectKind::Spinner { end_time } | HitObjectKind::Hold { end_time } => end_time,
        };

        Self {
            start_time: h.start_time,
            end_time,
            column: Self::column(h.pos.x, total_columns),
        }
    }

    pub(crate) fn column(x: f32, total_columns: f32) -> usize {
        let x_divisor = 512.0 / total_columns;

        (x / x_divisor).floor().clamp(0.0, total_columns - 1.0) as usize
    }

    /// One for the note plus a tick every 100ms of holding.
    pub(crate) fn combo(&self) -> u32 {
        1 + ((self.end_time - self.start_time) / 100.0) as u32
    }
}
