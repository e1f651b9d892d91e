use super::{
    object::{min_slider_jump_dist, OsuObject, OsuObjectKind},
    scaling_factor::ScalingFactor,
};

#[derive(Clone, Debug)]
pub(crate) struct OsuDifficultyObject<'o> {
    pub(crate) idx: usize,
    pub(crate) base: &'o OsuObject,
    pub(crate) start_time: f64,
    pub(crate) delta_time: f64,
    pub(crate) strain_time: f64,
    pub(crate) lazy_jump_dist: f64,
    pub(crate) min_jump_dist: f64,
    pub(crate) min_jump_time: f64,
    pub(crate) travel_dist: f64,
    pub(crate) travel_time: f64,
    pub(crate) angle: Option<f64>,
}

impl<'o> OsuDifficultyObject<'o> {
    pub(crate) const MIN_DELTA_TIME: f64 = 25.0;

    pub(crate) fn new(
        base: &'o OsuObject,
        last: &'o OsuObject,
        last_last: Option<&'o OsuObject>,
        clock_rate: f64,
        idx: usize,
        scaling_factor: &ScalingFactor,
    ) -> Self {
        let start_time = base.start_time / clock_rate;
        let delta_time = (base.start_time - last.start_time) / clock_rate;

        // * Capped to 25ms to prevent difficulty calculation breaking from simultaneous objects.
        let strain_time = delta_time.max(Self::MIN_DELTA_TIME);

        let mut this = Self {
            idx,
            base,
            start_time,
            delta_time,
            strain_time,
            lazy_jump_dist: 0.0,
            min_jump_dist: 0.0,
            min_jump_time: 0.0,
            travel_dist: 0.0,
            travel_time: 0.0,
            angle: None,
        };

        this.set_distances(last, last_last, clock_rate, scaling_factor);

        this
    }

    fn set_distances(
        &mut self,
        last: &OsuObject,
        last_last: Option<&OsuObject>,
        clock_rate: f64,
        scaling_factor: &ScalingFactor,
    ) {
        if let OsuObjectKind::Slider(slider) = &self.base.kind {
            // * Bonus for repeat sliders until a better per nested object strain system can be achieved.
            let repeat_bonus = (1.0 + slider.repeats as f64 / 2.5).powf(1.0 / 2.5);

            self.travel_dist = f64::from(slider.lazy_travel_dist) * repeat_bonus;
            self.travel_time =
                (self.base.lazy_travel_time() / clock_rate).max(Self::MIN_DELTA_TIME);
        }

        // * We don't need to calculate either angle or distance when one of the last->curr objects is a spinner
        if self.base.is_spinner() || last.is_spinner() {
            return;
        }

        // * We will scale distances by this factor, so we can assume a uniform CircleSize among beatmaps.
        let factor = scaling_factor.factor;
        let last_cursor_pos = last.lazy_end_pos();

        self.lazy_jump_dist =
            f64::from((self.base.stacked_pos() * factor - last_cursor_pos * factor).length());
        self.min_jump_time = self.strain_time;
        self.min_jump_dist = self.lazy_jump_dist;

        if let Some(tail_jump_dist) = self.base.tail_jump_dist(last, factor) {
            let last_travel_time =
                (last.lazy_travel_time() / clock_rate).max(Self::MIN_DELTA_TIME);

            self.min_jump_time = (self.strain_time - last_travel_time).max(Self::MIN_DELTA_TIME);
            self.min_jump_dist = min_slider_jump_dist(self.lazy_jump_dist, tail_jump_dist);
        }

        if let Some(last_last) = last_last.filter(|obj| !obj.is_spinner()) {
            let last_last_cursor_pos = last_last.lazy_end_pos();

            let v1 = last_last_cursor_pos - last.stacked_pos();
            let v2 = self.base.stacked_pos() - last_cursor_pos;

            let dot = f64::from(v1.dot(v2));
            let det = f64::from(v1.x * v2.y - v1.y * v2.x);

            self.angle = Some(det.atan2(dot).abs());
        }
    }

    /// Visibility of this object at the given map time.
    pub(crate) fn opacity_at(
        &self,
        time: f64,
        hidden: bool,
        time_preempt: f64,
        time_fade_in: f64,
    ) -> f64 {
        if time > self.base.start_time {
            // * Consider a hitobject as being invisible when its start time is passed.
            return 0.0;
        }

        let fade_in_start_time = self.base.start_time - time_preempt;
        let fade_in = ((time - fade_in_start_time) / time_fade_in).clamp(0.0, 1.0);

        if hidden {
            // * Taken from OsuModHidden.
            const FADE_OUT_DURATION_MULTIPLIER: f64 = 0.3;

            let fade_out_start_time = fade_in_start_time + time_fade_in;
            let fade_out_duration = time_preempt * FADE_OUT_DURATION_MULTIPLIER;

            fade_in.min(1.0 - ((time - fade_out_start_time) / fade_out_duration).clamp(0.0, 1.0))
        } else {
            fade_in
        }
    }

    pub(crate) fn previous<'a>(
        &self,
        backwards_idx: usize,
        diff_objects: &'a [OsuDifficultyObject<'o>],
    ) -> Option<&'a OsuDifficultyObject<'o>> {
        self.idx
            .checked_sub(backwards_idx + 1)
            .and_then(|idx| diff_objects.get(idx))
    }

    pub(crate) fn next<'a>(
        &self,
        forwards_idx: usize,
        diff_objects: &'a [OsuDifficultyObject<'o>],
    ) -> Option<&'a OsuDifficultyObject<'o>> {
        diff_objects.get(self.idx + forwards_idx + 1)
    }
}
