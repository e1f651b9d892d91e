use super::palpable::PalpableObject;

pub(crate) const NORMALIZED_HITOBJECT_RADIUS: f32 = 41.0;

pub(crate) struct CatchDifficultyObject {
    pub(crate) idx: usize,
    pub(crate) start_time: f64,
    pub(crate) delta_time: f64,
    pub(crate) normalized_pos: f32,
    pub(crate) last_normalized_pos: f32,
    /// Delta time capped at the equivalent of 375 BPM streaming speed.
    pub(crate) strain_time: f64,
    pub(crate) last_hyper_dash: bool,
    pub(crate) last_dist_to_hyper_dash: f32,
}

impl CatchDifficultyObject {
    pub(crate) fn new(
        h: &PalpableObject,
        last: &PalpableObject,
        clock_rate: f64,
        scaling_factor: f32,
        idx: usize,
    ) -> Self {
        let delta_time = (h.start_time - last.start_time) / clock_rate;

        Self {
            idx,
            start_time: h.start_time / clock_rate,
            delta_time,
            normalized_pos: h.effective_x() * scaling_factor,
            last_normalized_pos: last.effective_x() * scaling_factor,
            strain_time: delta_time.max(40.0),
            last_hyper_dash: last.hyper_dash,
            last_dist_to_hyper_dash: last.dist_to_hyper_dash,
        }
    }
}
