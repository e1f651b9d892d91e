use crate::{Beatmap, Mods};

use super::{ManiaDifficultyAttributes, ManiaPerformanceAttributes, ManiaScoreState, ManiaStars};

/// Performance calculator on osu!mania maps.
///
/// # Example
///
/// ```
/// use akatsuki_pp::{Beatmap, ManiaPP};
///
/// # /*
/// let map: Beatmap = ...
/// # */
/// # let map = Beatmap::default();
/// let attrs = ManiaPP::new(&map)
///     .mods(64) // DT
///     .accuracy(98.5)
///     .misses(3)
///     .calculate();
///
/// println!("PP: {} | Stars: {}", attrs.pp(), attrs.stars());
/// ```
#[derive(Clone, Debug)]
#[allow(clippy::upper_case_acronyms)]
pub struct ManiaPP<'m> {
    map: &'m Beatmap,
    attributes: Option<ManiaDifficultyAttributes>,
    mods: u32,
    acc: Option<f64>,
    passed_objects: Option<u32>,

    n320: Option<u32>,
    n300: Option<u32>,
    n200: Option<u32>,
    n100: Option<u32>,
    n50: Option<u32>,
    n_misses: u32,
}

impl<'m> ManiaPP<'m> {
    pub fn new(map: &'m Beatmap) -> Self {
        Self {
            map,
            attributes: None,
            mods: 0,
            acc: None,
            passed_objects: None,
            n320: None,
            n300: None,
            n200: None,
            n100: None,
            n50: None,
            n_misses: 0,
        }
    }

    /// Skip the difficulty calculation by passing in earlier attributes.
    pub fn attributes(mut self, attributes: impl ManiaAttributeProvider) -> Self {
        if let Some(attributes) = attributes.attributes() {
            self.attributes = Some(attributes);
        }

        self
    }

    /// Mod bits, see [`Mods`](crate::Mods).
    pub fn mods(mut self, mods: u32) -> Self {
        self.mods = mods;

        self
    }

    /// Amount of 320s.
    pub fn n320(mut self, n320: u32) -> Self {
        self.n320 = Some(n320);

        self
    }

    /// Amount of 300s.
    pub fn n300(mut self, n300: u32) -> Self {
        self.n300 = Some(n300);

        self
    }

    /// Amount of 200s.
    pub fn n200(mut self, n200: u32) -> Self {
        self.n200 = Some(n200);

        self
    }

    /// Amount of 100s.
    pub fn n100(mut self, n100: u32) -> Self {
        self.n100 = Some(n100);

        self
    }

    /// Amount of 50s.
    pub fn n50(mut self, n50: u32) -> Self {
        self.n50 = Some(n50);

        self
    }

    /// Amount of misses.
    pub fn misses(mut self, n_misses: u32) -> Self {
        self.n_misses = n_misses;

        self
    }

    /// Accuracy between `0.0` and `100.0`.
    pub fn accuracy(mut self, acc: f64) -> Self {
        self.acc = Some(acc / 100.0);

        self
    }

    /// Amount of passed objects for partial plays, e.g. a fail.
    pub fn passed_objects(mut self, passed_objects: u32) -> Self {
        self.passed_objects = Some(passed_objects);

        self
    }

    fn difficulty_attributes(&mut self) -> ManiaDifficultyAttributes {
        if let Some(ref attrs) = self.attributes {
            return attrs.clone();
        }

        let mut stars = ManiaStars::new(self.map).mods(self.mods);

        if let Some(passed_objects) = self.passed_objects {
            stars = stars.passed_objects(passed_objects);
        }

        let attrs = stars.calculate();
        self.attributes = Some(attrs.clone());

        attrs
    }

    /// Create the [`ManiaScoreState`] that will be used for performance calculation.
    ///
    /// Judgements that were not specified are filled in as favorably as
    /// the accuracy allows, preferring 320s over 300s.
    pub fn generate_state(&mut self) -> ManiaScoreState {
        self.state_with_misses(self.n_misses)
    }

    fn state_with_misses(&mut self, n_misses: u32) -> ManiaScoreState {
        let n_objects = self.difficulty_attributes().n_objects;
        let misses = n_misses.min(n_objects);

        let mut n_remaining = n_objects - misses;
        let mut take = |given: Option<u32>| {
            let n = given.map_or(0, |n| n.min(n_remaining));
            n_remaining -= n;

            n
        };

        let mut state = ManiaScoreState {
            n320: take(self.n320),
            n300: take(self.n300),
            n200: take(self.n200),
            n100: take(self.n100),
            n50: take(self.n50),
            misses,
        };

        if n_remaining == 0 {
            return state;
        }

        // Tiers that may receive the remaining judgements, weighted like accuracy
        let top = if self.n320.is_some() && self.n300.is_none() {
            Tier::N300
        } else {
            Tier::N320
        };

        let Some(acc) = self.acc else {
            top.add(&mut state, n_remaining);

            return state;
        };

        let lower: Vec<_> = [
            (Tier::N200, self.n200),
            (Tier::N100, self.n100),
            (Tier::N50, self.n50),
        ]
        .into_iter()
        .filter_map(|(tier, given)| given.is_none().then_some(tier))
        .collect();

        let Some(&base) = lower.last() else {
            top.add(&mut state, n_remaining);

            return state;
        };

        let fixed_points =
            6 * (state.n320 + state.n300) + 4 * state.n200 + 2 * state.n100 + state.n50;
        // Accuracy is only matched up to half a point
        let target = (acc * f64::from(n_objects) * 6.0).round().max(0.0) as u32;

        // Start with every remaining judgement at the lowest tier, then upgrade greedily
        let mut needed = target.saturating_sub(fixed_points + base.weight() * n_remaining);
        let mut slots = n_remaining;

        for tier in std::iter::once(top).chain(lower.iter().copied()) {
            let gain = tier.weight().saturating_sub(base.weight());

            if gain == 0 {
                continue;
            }

            let n = (needed / gain).min(slots);
            tier.add(&mut state, n);
            needed -= n * gain;
            slots -= n;
        }

        base.add(&mut state, slots);

        state
    }

    /// Calculate the pp of the score alongside its parts.
    ///
    /// Generated judgements follow the standard accuracy while pp follows
    /// a custom one that favors 320s, so the pp is capped by the same score
    /// with fewer misses.
    pub fn calculate(mut self) -> ManiaPerformanceAttributes {
        let state = self.generate_state();
        let attrs = self.difficulty_attributes();

        let mut min_pp = f64::INFINITY;

        for misses in 0..state.misses {
            let inner = ManiaPpInner {
                mods: self.mods,
                state: self.state_with_misses(misses),
                attrs: attrs.clone(),
            };

            min_pp = min_pp.min(inner.calculate().pp);
        }

        let inner = ManiaPpInner {
            mods: self.mods,
            state,
            attrs,
        };

        let mut perf = inner.calculate();

        if perf.pp > min_pp {
            // Keep the parts consistent with the lowered pp
            perf.pp_difficulty *= min_pp / perf.pp;
            perf.pp = min_pp;
        }

        perf
    }
}

#[derive(Copy, Clone)]
enum Tier {
    N320,
    N300,
    N200,
    N100,
    N50,
}

impl Tier {
    const fn weight(self) -> u32 {
        match self {
            Tier::N320 | Tier::N300 => 6,
            Tier::N200 => 4,
            Tier::N100 => 2,
            Tier::N50 => 1,
        }
    }

    fn add(self, state: &mut ManiaScoreState, n: u32) {
        match self {
            Tier::N320 => state.n320 += n,
            Tier::N300 => state.n300 += n,
            Tier::N200 => state.n200 += n,
            Tier::N100 => state.n100 += n,
            Tier::N50 => state.n50 += n,
        }
    }
}

struct ManiaPpInner {
    attrs: ManiaDifficultyAttributes,
    mods: u32,
    state: ManiaScoreState,
}

impl ManiaPpInner {
    fn calculate(self) -> ManiaPerformanceAttributes {
        if self.state.total_hits() == 0 {
            return ManiaPerformanceAttributes {
                difficulty: self.attrs,
                ..Default::default()
            };
        }

        // * Arbitrary initial value for scaling pp in order to standardize distributions across game modes.
        // * The specific number has no intrinsic meaning and can be adjusted as needed.
        let mut multiplier = 8.0;

        if self.mods.nf() {
            multiplier *= 0.75;
        }

        if self.mods.ez() {
            multiplier *= 0.5;
        }

        let difficulty_value = self.compute_difficulty_value();

        ManiaPerformanceAttributes {
            difficulty: self.attrs,
            pp: difficulty_value * multiplier,
            pp_difficulty: difficulty_value,
        }
    }

    fn compute_difficulty_value(&self) -> f64 {
        let total_hits = f64::from(self.state.total_hits());

        // * Star rating to pp curve
        (self.attrs.stars - 0.15).max(0.05).powf(2.2)
            // * From 80% accuracy, 1/20th of total pp is awarded per additional 1% accuracy
            * (5.0 * self.state.custom_accuracy() - 4.0).max(0.0)
            // * Length bonus, capped at 1500 notes
            * (1.0 + 0.1 * (total_hits / 1500.0).min(1.0))
    }
}

/// Anything that may contain [`ManiaDifficultyAttributes`].
pub trait ManiaAttributeProvider {
    fn attributes(self) -> Option<ManiaDifficultyAttributes>;
}

impl ManiaAttributeProvider for ManiaDifficultyAttributes {
    fn attributes(self) -> Option<ManiaDifficultyAttributes> {
        Some(self)
    }
}

impl ManiaAttributeProvider for ManiaPerformanceAttributes {
    fn attributes(self) -> Option<ManiaDifficultyAttributes> {
        Some(self.difficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const N_OBJECTS: u32 = 1000;

    fn attrs() -> ManiaDifficultyAttributes {
        ManiaDifficultyAttributes {
            stars: 4.0,
            hit_window: 40.0,
            n_objects: N_OBJECTS,
            max_combo: 1200,
            is_convert: false,
        }
    }

    #[test]
    fn no_accuracy_is_all_320s() {
        let map = Beatmap::default();

        let state = ManiaPP::new(&map)
            .attributes(attrs())
            .misses(10)
            .generate_state();

        assert_eq!(state.n320, N_OBJECTS - 10);
        assert_eq!(state.misses, 10);
    }

    #[test]
    fn accuracy_is_matched() {
        let map = Beatmap::default();

        for acc in [99.0, 96.5, 90.0, 75.0] {
            let state = ManiaPP::new(&map)
                .attributes(attrs())
                .accuracy(acc)
                .misses(3)
                .generate_state();

            assert_eq!(state.total_hits(), N_OBJECTS, "acc={acc}");
            assert!((state.accuracy() - acc / 100.0).abs() < 0.001, "acc={acc}");
        }
    }

    #[test]
    fn given_judgements_are_kept() {
        let map = Beatmap::default();

        let state = ManiaPP::new(&map)
            .attributes(attrs())
            .n300(100)
            .n100(20)
            .n50(5)
            .generate_state();

        assert_eq!(state.n300, 100);
        assert_eq!(state.n100, 20);
        assert_eq!(state.n50, 5);
        assert_eq!(state.n320, N_OBJECTS - 125);
    }

    #[test]
    fn modifiers() {
        let map = Beatmap::default();

        let nomod = ManiaPP::new(&map).attributes(attrs()).calculate();
        let nf = ManiaPP::new(&map).attributes(attrs()).mods(1).calculate();
        let ez = ManiaPP::new(&map).attributes(attrs()).mods(2).calculate();

        assert!((nf.pp / nomod.pp - 0.75).abs() < 1e-9);
        assert!((ez.pp / nomod.pp - 0.5).abs() < 1e-9);
    }

    #[test]
    fn more_misses_never_increase_pp() {
        let map = Beatmap::default();

        for acc in [85.0, 90.0, 95.0, 98.0] {
            let pps: Vec<_> = (0..=60)
                .map(|misses| {
                    ManiaPP::new(&map)
                        .attributes(attrs())
                        .accuracy(acc)
                        .misses(misses)
                        .calculate()
                        .pp
                })
                .collect();

            for pair in pps.windows(2) {
                assert!(pair[1] <= pair[0], "acc={acc}: {pps:?}");
            }
        }
    }

    #[test]
    fn higher_accuracy_never_lowers_pp() {
        let map = Beatmap::default();

        for misses in [0, 5, 20] {
            let pps: Vec<_> = (800..=1000)
                .map(|acc| {
                    ManiaPP::new(&map)
                        .attributes(attrs())
                        .accuracy(f64::from(acc) / 10.0)
                        .misses(misses)
                        .calculate()
                        .pp
                })
                .collect();

            for pair in pps.windows(2) {
                assert!(pair[0] <= pair[1], "misses={misses}: {pps:?}");
            }
        }
    }

    #[test]
    fn low_accuracy_gives_nothing() {
        let map = Beatmap::default();

        let attrs = ManiaPP::new(&map)
            .attributes(attrs())
            .accuracy(70.0)
            .calculate();

        assert!(attrs.pp.abs() < f64::EPSILON);
    }
}
