use super::object::RelaxObject;

pub(crate) struct RelaxDifficultyObject<'h> {
    pub(crate) base: &'h RelaxObject,
    /// Jump distance and strain time of the previous difficulty object.
    pub(crate) prev: Option<(f32, f32)>,

    pub(crate) jump_dist: f32,
    pub(crate) travel_dist: f32,
    pub(crate) angle: Option<f32>,

    pub(crate) delta: f32,
    pub(crate) strain_time: f32,
}

impl<'h> RelaxDifficultyObject<'h> {
    pub(crate) fn new(
        base: &'h RelaxObject,
        prev: &RelaxObject,
        prev_vals: Option<(f32, f32)>,
        prev_prev: Option<&RelaxObject>,
        clock_rate: f32,
        scaling_factor: f32,
    ) -> Self {
        let delta = (base.time - prev.time) / clock_rate;
        let strain_time = delta.max(50.0);

        let jump_dist = if base.is_spinner() {
            0.0
        } else {
            ((base.pos - prev.end_pos) * scaling_factor).length()
        };

        let angle = prev_prev.map(|prev_prev| {
            let v1 = prev_prev.end_pos - prev.pos;
            let v2 = base.pos - prev.end_pos;

            let dot = v1.dot(v2);
            let det = v1.x * v2.y - v1.y * v2.x;

            det.atan2(dot).abs()
        });

        Self {
            base,
            prev: prev_vals,
            jump_dist,
            travel_dist: prev.travel_dist.unwrap_or(0.0),
            angle,
            delta,
            strain_time,
        }
    }
}
