use crate::{osu::hit_results, Beatmap, Mods, OsuScoreState};

use super::{RelaxDifficultyAttributes, RelaxPerformanceAttributes, RelaxStars};

/// Performance calculator for relax scores on osu!standard maps.
///
/// # Example
///
/// ```
/// use akatsuki_pp::{Beatmap, RelaxPP};
///
/// # /*
/// let map: Beatmap = ...
/// # */
/// # let map = Beatmap::default();
/// let attrs = RelaxPP::new(&map)
///     .mods(128 + 8) // RXHD
///     .combo(1234)
///     .misses(1)
///     .accuracy(98.5)
///     .calculate();
///
/// println!("PP: {} | Stars: {}", attrs.pp(), attrs.stars());
/// ```
#[derive(Clone, Debug)]
#[allow(clippy::upper_case_acronyms)]
pub struct RelaxPP<'m> {
    pub(crate) map: &'m Beatmap,
    attributes: Option<RelaxDifficultyAttributes>,
    pub(crate) mods: u32,
    pub(crate) combo: Option<u32>,
    pub(crate) acc: Option<f64>,

    pub(crate) n300: Option<u32>,
    pub(crate) n100: Option<u32>,
    pub(crate) n50: Option<u32>,
    pub(crate) n_misses: u32,
    pub(crate) passed_objects: Option<u32>,
}

impl<'m> RelaxPP<'m> {
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
    pub fn attributes(mut self, attributes: impl RelaxAttributeProvider) -> Self {
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

    fn difficulty_attributes(&mut self) -> RelaxDifficultyAttributes {
        if let Some(ref attrs) = self.attributes {
            return attrs.clone();
        }

        let mut stars = RelaxStars::new(self.map).mods(self.mods);

        if let Some(passed_objects) = self.passed_objects {
            stars = stars.passed_objects(passed_objects);
        }

        let attrs = stars.calculate();
        self.attributes = Some(attrs.clone());

        attrs
    }

    /// Create the [`OsuScoreState`] that will be used for performance calculation.
    ///
    /// Judgements are filled in the same way as for [`OsuPP`](crate::OsuPP).
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
    /// A score is never worth more than the same score with fewer misses,
    /// and never worth less than the same score with a lower accuracy.
    pub fn calculate(mut self) -> RelaxPerformanceAttributes {
        let state = self.generate_state();
        let attrs = self.difficulty_attributes();

        let mut min_pp = f64::INFINITY;

        for misses in 0..state.misses {
            let fewer_misses = self.state_with_misses(misses);
            min_pp = min_pp.min(self.accuracy_floor(&attrs, fewer_misses));
        }

        let pp = self.accuracy_floor(&attrs, state).min(min_pp);

        let mut perf = RelaxPpInner::new(attrs, self.mods, state).calculate();
        perf.pp = pp;

        perf
    }

    /// Highest pp among `state` and the generated states of lower accuracy.
    ///
    /// On stream maps the accuracy also lowers the exponent of the speed
    /// value so worse judgements may be worth more once that value is below 1.
    fn accuracy_floor(&self, attrs: &RelaxDifficultyAttributes, state: OsuScoreState) -> f64 {
        let pp = |state| {
            RelaxPpInner::new(attrs.clone(), self.mods, state)
                .calculate()
                .pp
        };

        let given = self.n300.is_some() || self.n100.is_some() || self.n50.is_some();

        if given || !accuracy_depresses(attrs) {
            return pp(state);
        }

        lower_accuracy_states(state).fold(pp(state), |best, lower| best.max(pp(lower)))
    }
}

/// States that [`hit_results`] generates for lower accuracies with the same
/// misses, starting from only 50s.
fn lower_accuracy_states(state: OsuScoreState) -> impl Iterator<Item = OsuScoreState> {
    let n_remaining = state.n300 + state.n100 + state.n50;

    let n100_end = if state.n300 == 0 {
        state.n100
    } else {
        n_remaining + 1
    };

    let without_300s = (0..n100_end).map(move |n100| (0, n100, n_remaining - n100));
    let without_50s = (1..state.n300).map(move |n300| (n300, n_remaining - n300, 0));

    without_300s
        .chain(without_50s)
        .map(move |(n300, n100, n50)| OsuScoreState {
            n300,
            n100,
            n50,
            ..state
        })
}

/// Whether aim is too close to speed, i.e. the map is mostly streams.
fn accuracy_depresses(attrs: &RelaxDifficultyAttributes) -> bool {
    let streams_nerf = (attrs.aim_strain / attrs.speed_strain * 100.0).round() / 100.0;

    streams_nerf < 1.09
}

struct RelaxPpInner {
    attrs: RelaxDifficultyAttributes,
    mods: u32,
    acc: f64,
    state: OsuScoreState,
    effective_miss_count: f64,
}

impl RelaxPpInner {
    fn new(attrs: RelaxDifficultyAttributes, mods: u32, state: OsuScoreState) -> Self {
        Self {
            effective_miss_count: calculate_effective_misses(&attrs, &state),
            acc: state.accuracy(),
            attrs,
            mods,
            state,
        }
    }

    fn calculate(self) -> RelaxPerformanceAttributes {
        let total_hits = self.state.total_hits();

        if total_hits == 0 {
            return RelaxPerformanceAttributes {
                difficulty: self.attrs,
                ..Default::default()
            };
        }

        let total_hits = f64::from(total_hits);
        let mut multiplier = 1.09;

        if self.mods.so() {
            multiplier *= 1.0 - (f64::from(self.attrs.n_spinners) / total_hits).powf(0.85);
        }

        let mut aim_value = self.compute_aim_value(total_hits);
        let speed_value = self.compute_speed_value(total_hits);
        let acc_value = self.compute_accuracy_value(total_hits);

        let mut acc_depression = 1.0;

        if accuracy_depresses(&self.attrs) {
            let acc_factor = (1.0 - self.acc).abs();
            acc_depression = (0.86 - acc_factor).max(0.5);
            aim_value *= acc_depression;
        }

        let nodt_bonus = if self.mods.dt() || self.mods.nc() || self.mods.ht() {
            1.0
        } else {
            1.02
        };

        let mut pp = (aim_value.powf(1.185 * nodt_bonus)
            + speed_value.powf(0.83 * acc_depression)
            + acc_value.powf(1.14 * nodt_bonus))
        .powf(1.0 / 1.1)
            * multiplier;

        if self.mods.dt() && self.mods.hr() {
            pp *= 1.025;
        }

        pp *= self.map_factor();

        RelaxPerformanceAttributes {
            difficulty: self.attrs,
            pp: pp.max(0.0),
            pp_aim: aim_value,
            pp_speed: speed_value,
            pp_acc: acc_value,
            effective_miss_count: self.effective_miss_count,
        }
    }

    /// Maps and mappers whose relax scores are overweighted.
    fn map_factor(&self) -> f64 {
        let mut factor = 1.0;

        if matches!(self.attrs.creator.as_str(), "gwb" | "Plasma") {
            factor *= 0.9;
        }

        factor
            * match self.attrs.beatmap_id {
                // Louder than steel [ok this is epic]
                1_808_605 => 0.85,
                // over the top [Above the stars]
                1_821_147 => 0.70,
                // Just press F [Parkour's ok this is epic]
                1_844_776 => 0.64,
                // Hardware Store [skyapple mode]
                1_777_768 => 0.90,
                // Akatsuki compilation [ok this is akatsuki]
                1_962_833 if self.mods.dt() => 0.885 * 0.83,
                1_962_833 => 0.885,
                // Songs Compilation [Marathon], Songs Compilation [Remembrance],
                // Apocalypse 1992 [Universal Annihilation]
                2_403_677 | 2_174_272 | 2_382_377 => 0.85,
                _ => 1.0,
            }
    }

    fn compute_aim_value(&self, total_hits: f64) -> f64 {
        let attrs = &self.attrs;

        let raw_aim = if self.mods.td() {
            attrs.aim_strain.powf(0.8)
        } else {
            attrs.aim_strain
        };

        let mut aim_value = base_value(raw_aim);

        let len_bonus = length_bonus(total_hits);
        aim_value *= len_bonus;

        if self.effective_miss_count > 0.0 {
            aim_value *= self.miss_penalty(total_hits);
        }

        let ar_factor = if attrs.ar > 10.33 {
            0.3 * (attrs.ar - 10.33)
        } else if attrs.ar < 8.0 {
            0.025 * (8.0 - attrs.ar)
        } else {
            0.0
        };

        aim_value *= 1.0 + ar_factor * len_bonus;

        if self.mods.hd() {
            aim_value *= 1.0 + 0.05 * (11.0 - attrs.ar);
        }

        if self.mods.fl() {
            let mut fl_bonus = 1.0 + 0.3 * (total_hits / 200.0).min(1.0);

            if total_hits > 200.0 {
                fl_bonus += 0.25 * ((total_hits - 200.0) / 300.0).min(1.0);
            }

            if total_hits > 500.0 {
                fl_bonus += (total_hits - 500.0) / 1600.0;
            }

            aim_value *= fl_bonus;
        }

        if self.mods.ez() {
            let mut base_buff = 1.08;

            if attrs.ar <= 8.0 {
                base_buff += (7.0 - attrs.ar) / 100.0;
            }

            aim_value *= base_buff;
        }

        aim_value *= 0.3 + self.acc / 2.0;
        aim_value *= 0.98 + attrs.od * attrs.od / 2500.0;

        aim_value
    }

    fn compute_speed_value(&self, total_hits: f64) -> f64 {
        let attrs = &self.attrs;

        let mut speed_value = base_value(attrs.speed_strain);

        let len_bonus = length_bonus(total_hits);
        speed_value *= len_bonus;

        if self.effective_miss_count > 0.0 {
            speed_value *= self.miss_penalty(total_hits);
        }

        if attrs.ar > 10.33 {
            speed_value *= 1.0 + 0.3 * (attrs.ar - 10.33) * len_bonus;
        }

        if self.mods.hd() {
            speed_value *= 1.0 + 0.05 * (11.0 - attrs.ar);
        }

        speed_value *= (0.93 + attrs.od * attrs.od / 750.0)
            * self.acc.powf((14.5 - attrs.od.max(8.0)) / 2.0);

        let n50 = f64::from(self.state.n50);

        // Punish doubletapping
        if n50 >= total_hits / 500.0 {
            speed_value *= 0.98_f64.powf(n50 - total_hits / 500.0);
        }

        speed_value
    }

    fn compute_accuracy_value(&self, total_hits: f64) -> f64 {
        let n_circles = f64::from(self.attrs.n_circles);

        let better_acc_percentage = if n_circles > 0.0 {
            let n300 = f64::from(self.state.n300);
            let n100 = f64::from(self.state.n100);
            let n50 = f64::from(self.state.n50);

            (((n300 - (total_hits - n_circles)) * 6.0 + n100 * 2.0 + n50) / (n_circles * 6.0))
                .max(0.0)
        } else {
            0.0
        };

        let mut acc_value = 1.52163_f64.powf(self.attrs.od) * better_acc_percentage.powi(24) * 2.83;

        // Bonus for many hitcircles
        acc_value *= (n_circles / 1000.0).powf(0.3).min(1.15);

        if self.mods.hd() {
            acc_value *= 1.08;
        }

        if self.mods.fl() {
            acc_value *= 1.02;
        }

        acc_value
    }

    fn miss_penalty(&self, total_hits: f64) -> f64 {
        let misses = self.effective_miss_count;

        0.97 * (1.0 - (misses / total_hits).sqrt()).powf(1.0 + misses / 1.5)
    }
}

fn base_value(strain: f64) -> f64 {
    (5.0 * (strain / 0.0675).max(1.0) - 4.0).powi(3) / 100_000.0
}

/// Longer maps are worth more.
fn length_bonus(total_hits: f64) -> f64 {
    let mut bonus = 0.88 + 0.4 * (total_hits / 2000.0).min(1.0);

    if total_hits > 2000.0 {
        bonus += 0.5 * (total_hits / 2000.0).log10();
    }

    bonus
}

fn calculate_effective_misses(attrs: &RelaxDifficultyAttributes, state: &OsuScoreState) -> f64 {
    // Guess the number of misses and slider breaks from combo
    let mut combo_based_miss_count = 0.0;

    if attrs.n_sliders > 0 {
        let full_combo_threshold = f64::from(attrs.max_combo) - 0.1 * f64::from(attrs.n_sliders);

        if f64::from(state.max_combo) < full_combo_threshold {
            combo_based_miss_count = full_combo_threshold / f64::from(state.max_combo).max(1.0);
        }
    }

    combo_based_miss_count =
        combo_based_miss_count.min(f64::from(state.n100 + state.n50 + state.misses));

    combo_based_miss_count.max(f64::from(state.misses))
}

/// Anything that may contain [`RelaxDifficultyAttributes`].
pub trait RelaxAttributeProvider {
    fn attributes(self) -> Option<RelaxDifficultyAttributes>;
}

impl RelaxAttributeProvider for RelaxDifficultyAttributes {
    #[inline]
    fn attributes(self) -> Option<RelaxDifficultyAttributes> {
        Some(self)
    }
}

impl RelaxAttributeProvider for RelaxPerformanceAttributes {
    #[inline]
    fn attributes(self) -> Option<RelaxDifficultyAttributes> {
        Some(self.difficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RX: u32 = 1 << 7;

    fn attrs() -> RelaxDifficultyAttributes {
        RelaxDifficultyAttributes {
            stars: 6.6,
            aim_strain: 3.2,
            speed_strain: 2.4,
            ar: 9.5,
            od: 9.0,
            hp: 5.0,
            cs: 4.0,
            n_circles: 600,
            n_sliders: 200,
            n_spinners: 2,
            max_combo: 1100,
            ..Default::default()
        }
    }

    fn calculator(map: &Beatmap) -> RelaxPP<'_> {
        RelaxPP::new(map).attributes(attrs())
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= expected.abs() * 1e-9,
            "{actual} != {expected}"
        );
    }

    #[test]
    fn full_combo_ss() {
        let map = Beatmap::default();
        let perf = calculator(&map).mods(RX).calculate();

        assert_close(perf.pp_aim, 106.639_307_551_171_46);
        assert_close(perf.pp_speed, 56.673_549_664_464_55);
        assert_close(perf.pp_acc, 106.172_824_141_138_46);
        assert_close(perf.pp, 331.108_057_148_305_53);
        assert!(perf.effective_miss_count.abs() < f64::EPSILON);
    }

    #[test]
    fn hidden_double_time_play() {
        let map = Beatmap::default();

        let perf = calculator(&map)
            .mods(RX + 8 + 64)
            .accuracy(97.0)
            .combo(700)
            .misses(2)
            .calculate();

        let state = calculator(&map).accuracy(97.0).misses(2).generate_state();

        assert_eq!((state.n300, state.n100, state.n50), (767, 33, 0));
        assert_close(perf.effective_miss_count, 2.0);
        assert_close(perf.pp, 208.500_270_686_909_77);
    }

    #[test]
    fn double_time_hard_rock_bonus() {
        let map = Beatmap::default();

        let dt = calculator(&map).mods(RX + 64).calculate();
        let dthr = calculator(&map).mods(RX + 64 + 16).calculate();

        assert_close(dthr.pp, dt.pp * 1.025);
    }

    #[test]
    fn overweighted_maps() {
        let map = Beatmap::default();
        let base = calculator(&map).calculate().pp;

        let pp = |beatmap_id, creator: &str, mods| {
            let attrs = RelaxDifficultyAttributes {
                beatmap_id,
                creator: creator.to_owned(),
                ..attrs()
            };

            RelaxPP::new(&map).attributes(attrs).mods(mods).calculate().pp
        };

        assert_close(pp(1_821_147, "", 0), base * 0.7);
        assert_close(pp(0, "gwb", 0), base * 0.9);
        assert_close(pp(2_382_377, "Plasma", 0), base * 0.9 * 0.85);
        assert_close(pp(0, "someone else", 0), base);

        let dt = calculator(&map).mods(64).calculate().pp;
        assert_close(pp(1_962_833, "", 64), dt * 0.885 * 0.83);
    }

    #[test]
    fn more_misses_never_increase_pp() {
        let map = Beatmap::default();

        for mods in [RX, RX + 8 + 16, RX + 64] {
            for acc in [90.0, 95.0, 99.0] {
                let pps: Vec<_> = (0..=40)
                    .map(|misses| {
                        calculator(&map)
                            .mods(mods)
                            .accuracy(acc)
                            .combo(550)
                            .misses(misses)
                            .calculate()
                            .pp
                    })
                    .collect();

                for pair in pps.windows(2) {
                    assert!(pair[1] <= pair[0], "{mods} {acc}: {pps:?}");
                }
            }
        }
    }

    #[test]
    fn streams_never_lose_pp_with_accuracy() {
        let map = Beatmap::default();

        // Balanced aim and speed below one so that accuracy depresses speed
        let attrs = RelaxDifficultyAttributes {
            stars: 2.5,
            aim_strain: 1.0,
            speed_strain: 1.0,
            ar: 9.0,
            od: 8.0,
            n_circles: 150,
            n_sliders: 40,
            max_combo: 250,
            ..Default::default()
        };

        assert!(accuracy_depresses(&attrs));

        for (misses, combo) in [(0, 250), (8, 40), (20, 30)] {
            let mut prev = 0.0;

            for i in 700..=1000 {
                let acc = f64::from(i) / 10.0;

                let pp = RelaxPP::new(&map)
                    .attributes(attrs.clone())
                    .mods(RX)
                    .accuracy(acc)
                    .combo(combo)
                    .misses(misses)
                    .calculate()
                    .pp;

                assert!(pp >= prev, "{misses} misses at {acc}%: {prev} -> {pp}");
                prev = pp;
            }
        }
    }

    #[test]
    fn no_passed_objects_no_pp() {
        let map = Beatmap::default();

        let attrs = RelaxPP::new(&map).mods(RX).passed_objects(0).calculate();

        assert!(attrs.pp.abs() < f64::EPSILON);
        assert!(attrs.stars().abs() < f64::EPSILON);
    }
}
