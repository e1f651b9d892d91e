use crate::{Beatmap, Mods};

use super::{
    base_performance,
    score_state::{accuracy, OsuScoreState},
    OsuDifficultyAttributes, OsuPerformanceAttributes, OsuStars, PERFORMANCE_BASE_MULTIPLIER,
};

/// Performance calculator on osu!standard maps.
///
/// # Example
///
/// ```
/// use akatsuki_pp::{Beatmap, OsuPP};
///
/// # /*
/// let map: Beatmap = ...
/// # */
/// # let map = Beatmap::default();
/// let attrs = OsuPP::new(&map)
///     .mods(8 + 64) // HDDT
///     .combo(1234)
///     .misses(1)
///     .accuracy(98.5)
///     .calculate();
///
/// println!("PP: {} | Stars: {}", attrs.pp(), attrs.stars());
///
/// let next_result = OsuPP::new(&map)
///     .attributes(attrs) // reusing previous results for performance
///     .mods(8 + 64)      // has to be the same to reuse attributes
///     .accuracy(99.5)
///     .calculate();
///
/// println!("PP: {} | Stars: {}", next_result.pp(), next_result.stars());
/// ```
#[derive(Clone, Debug)]
#[allow(clippy::upper_case_acronyms)]
pub struct OsuPP<'m> {
    pub(crate) map: &'m Beatmap,
    attributes: Option<OsuDifficultyAttributes>,
    pub(crate) mods: u32,
    pub(crate) combo: Option<u32>,
    pub(crate) acc: Option<f64>,

    pub(crate) n300: Option<u32>,
    pub(crate) n100: Option<u32>,
    pub(crate) n50: Option<u32>,
    pub(crate) n_misses: u32,
    pub(crate) passed_objects: Option<u32>,
}

impl<'m> OsuPP<'m> {
    #[inline]
    pub fn new(map: &'m Beatmap) -> Self {
        Self {
            map,
            attributes: None,
            mods: 0,
            combo: None,
            acc: None,
            n300: None,
            n100: None,
            n50: None,
            n_misses: 0,
            passed_objects: None,
        }
    }

    /// Hand in attributes from a previous calculation on this map so the
    /// difficulty isn't calculated again. Mods and passed objects must match.
    #[inline]
    pub fn attributes(mut self, attributes: impl OsuAttributeProvider) -> Self {
        if let Some(attributes) = attributes.attributes() {
            self.attributes = Some(attributes);
        }

        self
    }

    /// Mod bits as used by the osu! API, see [`Mods`](crate::Mods).
    #[inline]
    pub fn mods(mut self, mods: u32) -> Self {
        self.mods = mods;

        self
    }

    /// Specify the max combo of the play.
    #[inline]
    pub fn combo(mut self, combo: u32) -> Self {
        self.combo = Some(combo);

        self
    }

    /// Specify the amount of 300s of a play.
    #[inline]
    pub fn n300(mut self, n300: u32) -> Self {
        self.n300 = Some(n300);

        self
    }

    /// Specify the amount of 100s of a play.
    #[inline]
    pub fn n100(mut self, n100: u32) -> Self {
        self.n100 = Some(n100);

        self
    }

    /// Specify the amount of 50s of a play.
    #[inline]
    pub fn n50(mut self, n50: u32) -> Self {
        self.n50 = Some(n50);

        self
    }

    /// Specify the amount of misses of a play.
    #[inline]
    pub fn misses(mut self, n_misses: u32) -> Self {
        self.n_misses = n_misses;

        self
    }

    /// Amount of passed objects for partial plays, e.g. a fail.
    #[inline]
    pub fn passed_objects(mut self, passed_objects: u32) -> Self {
        self.passed_objects = Some(passed_objects);

        self
    }

    /// Specify the accuracy of a play between `0.0` and `100.0`.
    /// Judgements that were not specified are generated to match it.
    #[inline]
    pub fn accuracy(mut self, acc: f64) -> Self {
        self.acc = Some(acc / 100.0);

        self
    }

    fn difficulty_attributes(&mut self) -> OsuDifficultyAttributes {
        if let Some(ref attrs) = self.attributes {
            return attrs.clone();
        }

        let mut stars = OsuStars::new(self.map).mods(self.mods);

        if let Some(passed_objects) = self.passed_objects {
            stars = stars.passed_objects(passed_objects);
        }

        let attrs = stars.calculate();
        self.attributes = Some(attrs.clone());

        attrs
    }

    /// Create the [`OsuScoreState`] that will be used for performance calculation.
    ///
    /// Missing judgements are filled in so that the best case for the given accuracy is assumed.
    pub fn generate_state(&mut self) -> OsuScoreState {
        self.state_with_misses(self.n_misses)
    }

    fn state_with_misses(&mut self, n_misses: u32) -> OsuScoreState {
        let attrs = self.difficulty_attributes();

        let n_objects = self
            .passed_objects
            .map_or(attrs.n_objects(), |n| n.min(attrs.n_objects()));

        let misses = n_misses.min(n_objects);
        let [n300, n100, n50] = hit_results(
            n_objects,
            misses,
            self.acc,
            [self.n300, self.n100, self.n50],
        );

        let max_possible_combo = attrs.max_combo.saturating_sub(misses);

        let max_combo = self
            .combo
            .map_or(max_possible_combo, |combo| combo.min(max_possible_combo));

        OsuScoreState {
            max_combo,
            n300,
            n100,
            n50,
            misses,
        }
    }

    /// Calculate the pp of the score alongside its parts.
    ///
    /// A score is never worth more than the same score with fewer misses.
    pub fn calculate(mut self) -> OsuPerformanceAttributes {
        let state = self.generate_state();
        let attrs = self.difficulty_attributes();

        let mut min_pp = f64::INFINITY;

        for misses in 0..state.misses {
            let fewer_misses = self.state_with_misses(misses);
            let inner = OsuPpInner::new(attrs.clone(), self.mods, fewer_misses);
            min_pp = min_pp.min(inner.calculate().pp);
        }

        let mut perf = OsuPpInner::new(attrs, self.mods, state).calculate();
        perf.pp = perf.pp.min(min_pp);

        perf
    }
}

/// Fill in judgements that weren't given so that `acc` is matched as closely
/// as possible. Without any given judgement, 300s turn into 100s first and 50s
/// are only used once no 300s are left so that a higher accuracy never results
/// in worse judgements.
pub(crate) fn hit_results(
    n_objects: u32,
    misses: u32,
    acc: Option<f64>,
    given: [Option<u32>; 3],
) -> [u32; 3] {
    let n_remaining = n_objects - misses;
    let [given300, given100, given50] = given;

    let mut n300 = given300.map_or(0, |n| n.min(n_remaining));
    let mut n100 = given100.map_or(0, |n| n.min(n_remaining));
    let mut n50 = given50.map_or(0, |n| n.min(n_remaining));

    let Some(acc) = acc else {
        let remaining = n_objects.saturating_sub(n300 + n100 + n50 + misses);

        match given {
            [None, ..] => n300 = remaining,
            [_, None, _] => n100 = remaining,
            [.., None] => n50 = remaining,
            _ => n300 += remaining,
        }

        return [n300, n100, n50];
    };

    let target_total = acc * f64::from(6 * n_objects);

    match given {
        [Some(_), Some(_), Some(_)] => {
            n300 += n_objects.saturating_sub(n300 + n100 + n50 + misses);
        }
        [Some(_), Some(_), None] => n50 = n_objects.saturating_sub(n300 + n100 + misses),
        [Some(_), None, Some(_)] => n100 = n_objects.saturating_sub(n300 + n50 + misses),
        [None, Some(_), Some(_)] => n300 = n_objects.saturating_sub(n100 + n50 + misses),
        [Some(_), None, None] => {
            let n_remaining = n_remaining.saturating_sub(n300);
            let raw_n100 = target_total - f64::from(n_remaining + 6 * n300);

            (n100, n50) = closest(raw_n100, n_remaining, acc, |new100| {
                let new50 = n_remaining - new100;

                (accuracy(n300, new100, new50, misses), (new100, new50))
            })
            .unwrap_or((0, n_remaining));
        }
        [None, Some(_), None] => {
            let n_remaining = n_remaining.saturating_sub(n100);
            let raw_n300 = (target_total - f64::from(n_remaining + 2 * n100)) / 5.0;

            (n300, n50) = closest(raw_n300, n_remaining, acc, |new300| {
                let new50 = n_remaining - new300;

                (accuracy(new300, n100, new50, misses), (new300, new50))
            })
            .unwrap_or((0, n_remaining));
        }
        [None, None, Some(_)] => {
            let n_remaining = n_remaining.saturating_sub(n50);
            let raw_n300 =
                (target_total + f64::from(2 * misses + n50) - f64::from(2 * n_objects)) / 4.0;

            (n300, n100) = closest(raw_n300, n_remaining, acc, |new300| {
                let new100 = n_remaining - new300;

                (accuracy(new300, new100, n50, misses), (new300, new100))
            })
            .unwrap_or((0, n_remaining));
        }
        [None, None, None] => {
            // Points that only 300s and 100s would give
            let only_n100 = f64::from(2 * n_remaining);

            if target_total >= only_n100 {
                n300 = (((target_total - only_n100) / 4.0).round() as u32).min(n_remaining);
                n100 = n_remaining - n300;
                n50 = 0;
            } else {
                let points = (target_total.round() as u32).max(n_remaining);
                n300 = 0;
                n100 = points - n_remaining;
                n50 = 2 * n_remaining - points;
            }
        }
    }

    [n300, n100, n50]
}

/// Integers around `raw`, capped at `max`.
fn candidates(raw: f64, max: u32) -> std::ops::RangeInclusive<u32> {
    let raw = raw.max(0.0);

    max.min(raw.floor() as u32)..=max.min(raw.ceil() as u32)
}

/// Pick the candidate whose accuracy is closest to `target`.
fn closest<T>(
    raw: f64,
    max: u32,
    target: f64,
    mut eval: impl FnMut(u32) -> (f64, T),
) -> Option<T> {
    let mut best: Option<(f64, T)> = None;

    for n in candidates(raw, max) {
        let (acc, value) = eval(n);
        let dist = (target - acc).abs();

        if best.as_ref().map_or(true, |(best_dist, _)| dist < *best_dist) {
            best = Some((dist, value));
        }
    }

    best.map(|(_, value)| value)
}

struct OsuPpInner {
    attrs: OsuDifficultyAttributes,
    mods: u32,
    acc: f64,
    state: OsuScoreState,
    effective_miss_count: f64,
}

impl OsuPpInner {
    fn new(attrs: OsuDifficultyAttributes, mods: u32, state: OsuScoreState) -> Self {
        Self {
            effective_miss_count: calculate_effective_misses(&attrs, &state),
            acc: state.accuracy(),
            attrs,
            mods,
            state,
        }
    }

    fn calculate(self) -> OsuPerformanceAttributes {
        let total_hits = self.state.total_hits();

        if total_hits == 0 {
            return OsuPerformanceAttributes {
                difficulty: self.attrs,
                ..Default::default()
            };
        }

        let total_hits = f64::from(total_hits);
        let mut multiplier = PERFORMANCE_BASE_MULTIPLIER;

        if self.mods.nf() {
            multiplier *= (1.0 - 0.02 * self.effective_miss_count).max(0.9);
        }

        if self.mods.so() {
            multiplier *= 1.0 - (f64::from(self.attrs.n_spinners) / total_hits).powf(0.85);
        }

        let aim_value = self.compute_aim_value(total_hits);
        let speed_value = self.compute_speed_value(total_hits);
        let acc_value = self.compute_accuracy_value();
        let flashlight_value = self.compute_flashlight_value(total_hits);

        let pp = (aim_value.powf(1.1)
            + speed_value.powf(1.1)
            + acc_value.powf(1.1)
            + flashlight_value.powf(1.1))
        .powf(1.0 / 1.1)
            * multiplier;

        OsuPerformanceAttributes {
            difficulty: self.attrs,
            pp: pp.max(0.0),
            pp_acc: acc_value,
            pp_aim: aim_value,
            pp_flashlight: flashlight_value,
            pp_speed: speed_value,
            effective_miss_count: self.effective_miss_count,
        }
    }

    fn compute_aim_value(&self, total_hits: f64) -> f64 {
        if self.mods.ap() {
            return 0.0;
        }

        let mut aim_value = base_performance(self.attrs.aim);

        let len_bonus = length_bonus(total_hits);
        aim_value *= len_bonus;

        // * Penalize misses by assessing # of misses relative to the total # of objects.
        // * Default a 3% reduction for any # of misses.
        if self.effective_miss_count > 0.0 {
            aim_value *= 0.97
                * (1.0 - (self.effective_miss_count / total_hits).powf(0.775))
                    .powf(self.effective_miss_count);
        }

        aim_value *= self.combo_scaling_factor();

        let ar_factor = if self.attrs.ar > 10.33 {
            0.3 * (self.attrs.ar - 10.33)
        } else if self.attrs.ar < 8.0 {
            0.05 * (8.0 - self.attrs.ar)
        } else {
            0.0
        };

        // * Buff for longer maps with high AR.
        aim_value *= 1.0 + ar_factor * len_bonus;

        if self.mods.hd() {
            // * We want to give more reward for lower AR when it comes to aim and HD. This nerfs high AR and buffs lower AR.
            aim_value *= 1.0 + 0.04 * (12.0 - self.attrs.ar);
        }

        // * We assume 15% of sliders in a map are difficult since there's no way to tell from the performance calculator.
        let estimate_diff_sliders = f64::from(self.attrs.n_sliders) * 0.15;

        if self.attrs.n_sliders > 0 {
            let estimate_slider_ends_dropped = f64::from(
                (self.state.n100 + self.state.n50 + self.state.misses)
                    .min(self.attrs.max_combo.saturating_sub(self.state.max_combo)),
            )
            .clamp(0.0, estimate_diff_sliders);

            let slider_nerf_factor = (1.0 - self.attrs.slider_factor)
                * (1.0 - estimate_slider_ends_dropped / estimate_diff_sliders).powi(3)
                + self.attrs.slider_factor;

            aim_value *= slider_nerf_factor;
        }

        aim_value *= self.acc;
        // * It is important to consider accuracy difficulty when scaling with accuracy.
        aim_value *= 0.98 + self.attrs.od.powi(2) / 2500.0;

        aim_value
    }

    fn compute_speed_value(&self, total_hits: f64) -> f64 {
        let mut speed_value = base_performance(self.attrs.speed);

        let len_bonus = length_bonus(total_hits);
        speed_value *= len_bonus;

        // * Penalize misses by assessing # of misses relative to the total # of objects.
        // * Default a 3% reduction for any # of misses.
        if self.effective_miss_count > 0.0 {
            speed_value *= 0.97
                * (1.0 - (self.effective_miss_count / total_hits).powf(0.775))
                    .powf(self.effective_miss_count.powf(0.875));
        }

        speed_value *= self.combo_scaling_factor();

        let ar_factor = if self.mods.ap() {
            0.0
        } else if self.attrs.ar > 10.33 {
            0.3 * (self.attrs.ar - 10.33)
        } else {
            0.0
        };

        // * Buff for longer maps with high AR.
        speed_value *= 1.0 + ar_factor * len_bonus;

        if self.mods.hd() {
            // * We want to give more reward for lower AR when it comes to aim and HD.
            // * This nerfs high AR and buffs lower AR.
            speed_value *= 1.0 + 0.04 * (12.0 - self.attrs.ar);
        }

        // * Calculate accuracy assuming the worst case scenario
        let relevant_total_diff = total_hits - self.attrs.speed_note_count;
        let n300 = f64::from(self.state.n300);
        let n100 = f64::from(self.state.n100);
        let n50 = f64::from(self.state.n50);

        let relevant_n300 = (n300 - relevant_total_diff).max(0.0);
        let relevant_n100 = (n100 - (relevant_total_diff - n300).max(0.0)).max(0.0);
        let relevant_n50 = (n50 - (relevant_total_diff - n300 - n100).max(0.0)).max(0.0);

        let relevant_acc = if self.attrs.speed_note_count > 0.0 {
            (relevant_n300 * 6.0 + relevant_n100 * 2.0 + relevant_n50)
                / (self.attrs.speed_note_count * 6.0)
        } else {
            0.0
        };

        // * Scale the speed value with accuracy and OD.
        speed_value *= (0.95 + self.attrs.od.powi(2) / 750.0)
            * ((self.acc + relevant_acc) / 2.0).powf((14.5 - self.attrs.od.max(8.0)) / 2.0);

        // * Scale the speed value with # of 50s to punish doubletapping.
        if n50 >= total_hits / 500.0 {
            speed_value *= 0.99_f64.powf(n50 - total_hits / 500.0);
        }

        speed_value
    }

    fn compute_accuracy_value(&self) -> f64 {
        // * This percentage only considers HitCircles of any value - in this part
        // * of the calculation we focus on hitting the timing hit window.
        let n_circles = self.attrs.n_circles;

        let better_acc_percentage = if n_circles > 0 {
            let sub = self.state.total_hits().saturating_sub(n_circles);

            // * It is possible to reach a negative accuracy with this formula. Cap it at zero - zero points.
            if self.state.n300 < sub {
                0.0
            } else {
                f64::from((self.state.n300 - sub) * 6 + self.state.n100 * 2 + self.state.n50)
                    / f64::from(n_circles * 6)
            }
        } else {
            0.0
        };

        // * Lots of arbitrary values from testing.
        // * Considering to use derivation from perfect accuracy in a probabilistic manner - assume normal distribution.
        let mut acc_value = 1.52163_f64.powf(self.attrs.od) * better_acc_percentage.powi(24) * 2.83;

        // * Bonus for many hitcircles - it's harder to keep good accuracy up for longer.
        acc_value *= (f64::from(n_circles) / 1000.0).powf(0.3).min(1.15);

        // * Increasing the accuracy value by object count for Blinds isn't ideal, so the minimum buff is given.
        if self.mods.hd() {
            acc_value *= 1.08;
        }

        if self.mods.fl() {
            acc_value *= 1.02;
        }

        acc_value
    }

    fn compute_flashlight_value(&self, total_hits: f64) -> f64 {
        if !self.mods.fl() {
            return 0.0;
        }

        let mut flashlight_value = self.attrs.flashlight.powi(2) * 25.0;

        // * Penalize misses by assessing # of misses relative to the total # of objects. Default a 3% reduction for any # of misses.
        if self.effective_miss_count > 0.0 {
            flashlight_value *= 0.97
                * (1.0 - (self.effective_miss_count / total_hits).powf(0.775))
                    .powf(self.effective_miss_count.powf(0.875));
        }

        flashlight_value *= self.combo_scaling_factor();

        // * Account for shorter maps having a higher ratio of 0 combo/100 combo flashlight radius.
        let mut len_factor = 0.7 + 0.1 * (total_hits / 200.0).min(1.0);

        if total_hits > 200.0 {
            len_factor += 0.2 * ((total_hits - 200.0) / 200.0).min(1.0);
        }

        flashlight_value *= len_factor;

        // * Scale the flashlight value with accuracy _slightly_.
        flashlight_value *= 0.5 + self.acc / 2.0;
        // * It is important to also consider accuracy difficulty when doing that.
        flashlight_value *= 0.98 + self.attrs.od.powi(2) / 2500.0;

        flashlight_value
    }

    fn combo_scaling_factor(&self) -> f64 {
        if self.attrs.max_combo == 0 {
            1.0
        } else {
            (f64::from(self.state.max_combo) / f64::from(self.attrs.max_combo))
                .powf(0.8)
                .min(1.0)
        }
    }
}

/// Longer maps are worth more.
fn length_bonus(total_hits: f64) -> f64 {
    let mut bonus = 0.95 + 0.4 * (total_hits / 2000.0).min(1.0);

    if total_hits > 2000.0 {
        bonus += (total_hits / 2000.0).log10() * 0.5;
    }

    bonus
}

fn calculate_effective_misses(attrs: &OsuDifficultyAttributes, state: &OsuScoreState) -> f64 {
    // * Guess the number of misses + slider breaks from combo
    let mut combo_based_miss_count = 0.0;

    if attrs.n_sliders > 0 {
        let full_combo_threshold = f64::from(attrs.max_combo) - 0.1 * f64::from(attrs.n_sliders);

        if f64::from(state.max_combo) < full_combo_threshold {
            combo_based_miss_count = full_combo_threshold / f64::from(state.max_combo).max(1.0);
        }
    }

    // * Clamp miss count to maximum amount of possible breaks
    combo_based_miss_count =
        combo_based_miss_count.min(f64::from(state.n100 + state.n50 + state.misses));

    combo_based_miss_count.max(f64::from(state.misses))
}

/// Anything that may contain [`OsuDifficultyAttributes`].
pub trait OsuAttributeProvider {
    fn attributes(self) -> Option<OsuDifficultyAttributes>;
}

impl OsuAttributeProvider for OsuDifficultyAttributes {
    #[inline]
    fn attributes(self) -> Option<OsuDifficultyAttributes> {
        Some(self)
    }
}

impl OsuAttributeProvider for OsuPerformanceAttributes {
    #[inline]
    fn attributes(self) -> Option<OsuDifficultyAttributes> {
        Some(self.difficulty)
    }
}
