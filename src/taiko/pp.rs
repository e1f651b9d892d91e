use crate::{Beatmap, Mods};

use super::{
    score_state::{accuracy, TaikoScoreState},
    TaikoDifficultyAttributes, TaikoPerformanceAttributes, TaikoStars,
};

/// Performance calculator on osu!taiko maps.
///
/// # Example
///
/// ```
/// use akatsuki_pp::{Beatmap, TaikoPP};
///
/// # /*
/// let map: Beatmap = ...
/// # */
/// # let map = Beatmap::default();
/// let attrs = TaikoPP::new(&map)
///     .mods(8 + 64) // HDDT
///     .combo(1234)
///     .accuracy(98.5)
///     .misses(1)
///     .calculate();
///
/// println!("PP: {} | Stars: {}", attrs.pp(), attrs.stars());
///
/// let next_result = TaikoPP::new(&map)
///     .attributes(attrs) // reusing previous results for performance
///     .mods(8 + 64)      // has to be the same to reuse attributes
///     .accuracy(99.5)
///     .calculate();
///
/// println!("PP: {} | Stars: {}", next_result.pp(), next_result.stars());
/// ```
#[derive(Clone, Debug)]
#[allow(clippy::upper_case_acronyms)]
pub struct TaikoPP<'m> {
    map: &'m Beatmap,
    attributes: Option<TaikoDifficultyAttributes>,
    mods: u32,
    passed_objects: Option<u32>,
    combo: Option<u32>,
    acc: Option<f64>,
    n300: Option<u32>,
    n100: Option<u32>,
    n_misses: u32,
}

impl<'m> TaikoPP<'m> {
    pub fn new(map: &'m Beatmap) -> Self {
        Self {
            map,
            attributes: None,
            mods: 0,
            passed_objects: None,
            combo: None,
            acc: None,
            n300: None,
            n100: None,
            n_misses: 0,
        }
    }

    /// Skip the difficulty calculation by handing in attributes of the same
    /// map, mods, and passed objects.
    ///
    /// Attributes of another mode are ignored.
    pub fn attributes(mut self, attributes: impl TaikoAttributeProvider) -> Self {
        if let Some(attributes) = attributes.attributes() {
            self.attributes = Some(attributes);
        }

        self
    }

    /// Mod bits as used by the osu! API.
    pub fn mods(mut self, mods: u32) -> Self {
        self.mods = mods;

        self
    }

    /// Only consider the first `passed_objects` objects, e.g. for a fail.
    pub fn passed_objects(mut self, passed_objects: u32) -> Self {
        self.passed_objects = Some(passed_objects);

        self
    }

    /// Highest combo of the score. Defaults to a full combo minus misses.
    pub fn combo(mut self, combo: u32) -> Self {
        self.combo = Some(combo);

        self
    }

    /// Accuracy in percent, i.e. between `0.0` and `100.0`.
    pub fn accuracy(mut self, acc: f64) -> Self {
        self.acc = Some(acc / 100.0);

        self
    }

    /// Amount of greats.
    pub fn n300(mut self, n300: u32) -> Self {
        self.n300 = Some(n300);

        self
    }

    /// Amount of goods.
    pub fn n100(mut self, n100: u32) -> Self {
        self.n100 = Some(n100);

        self
    }

    pub fn misses(mut self, n_misses: u32) -> Self {
        self.n_misses = n_misses;

        self
    }

    fn difficulty_attributes(&mut self) -> TaikoDifficultyAttributes {
        if let Some(ref attrs) = self.attributes {
            return attrs.clone();
        }

        let mut stars = TaikoStars::new(self.map).mods(self.mods);

        if let Some(passed_objects) = self.passed_objects {
            stars = stars.passed_objects(passed_objects);
        }

        let attrs = stars.calculate();
        self.attributes = Some(attrs.clone());

        attrs
    }

    /// Fill in the judgements that were not specified.
    ///
    /// Missing counts are derived from the accuracy if one was given,
    /// otherwise every remaining object counts as great.
    pub fn generate_state(&mut self) -> TaikoScoreState {
        let max_combo = self.difficulty_attributes().max_combo;

        let n_objects = self
            .passed_objects
            .map_or(max_combo, |passed| passed.min(max_combo));

        let misses = self.n_misses.min(n_objects);
        let n_remaining = n_objects - misses;

        let mut n300 = self.n300.map_or(0, |n| n.min(n_remaining));
        let mut n100 = self.n100.map_or(0, |n| n.min(n_remaining));

        match (self.acc, self.n300, self.n100) {
            (Some(acc), None, None) => {
                (n300, n100) = closest_hits(acc, n_objects, misses);
            }
            (Some(_), Some(_), None) => n100 = n_objects.saturating_sub(n300 + misses),
            (Some(_), None, Some(_)) | (None, None, _) => {
                n300 = n_objects.saturating_sub(n100 + misses);
            }
            (_, Some(_), Some(_)) => n300 += n_objects.saturating_sub(n300 + n100 + misses),
            (None, Some(_), None) => n100 = n_objects.saturating_sub(n300 + misses),
        }

        let combo_cap = max_combo.saturating_sub(misses);

        TaikoScoreState {
            max_combo: self.combo.map_or(combo_cap, |combo| combo.min(combo_cap)),
            n300,
            n100,
            misses,
        }
    }

    pub fn calculate(mut self) -> TaikoPerformanceAttributes {
        let state = self.generate_state();
        let difficulty = self.difficulty_attributes();

        if state.total_hits() == 0 {
            return TaikoPerformanceAttributes {
                difficulty,
                ..Default::default()
            };
        }

        let score = Score {
            attrs: &difficulty,
            state: &state,
            mods: self.mods,
        };

        let pp_strain = score.strain_value();
        let pp_acc = score.accuracy_value();

        // * Custom multipliers for NoFail and Hidden.
        let mut multiplier = 1.1;

        if self.mods.nf() {
            multiplier *= 0.9;
        }

        if self.mods.hd() {
            multiplier *= 1.1;
        }

        let pp = (pp_strain.powf(1.1) + pp_acc.powf(1.1)).powf(1.0 / 1.1) * multiplier;

        TaikoPerformanceAttributes {
            difficulty,
            pp: pp.max(0.0),
            pp_strain,
            pp_acc,
        }
    }
}

/// Split the non-missed objects into greats and goods so that the accuracy
/// is as close as possible to `acc`.
fn closest_hits(acc: f64, n_objects: u32, misses: u32) -> (u32, u32) {
    let n_remaining = n_objects - misses;

    // 2 * n300 + n100 = acc * 2 * n_objects with n300 + n100 = n_remaining
    let raw_n300 = (acc * f64::from(2 * n_objects) - f64::from(n_remaining)).max(0.0);
    let lo = n_remaining.min(raw_n300.floor() as u32);
    let hi = n_remaining.min(raw_n300.ceil() as u32);

    let dist = |n300: u32| (acc - accuracy(n300, n_remaining - n300, misses)).abs();
    let n300 = if dist(hi) < dist(lo) { hi } else { lo };

    (n300, n_remaining - n300)
}

struct Score<'a> {
    attrs: &'a TaikoDifficultyAttributes,
    state: &'a TaikoScoreState,
    mods: u32,
}

impl Score<'_> {
    fn strain_value(&self) -> f64 {
        let exp_base = 5.0 * (self.attrs.stars / 0.0075).max(1.0) - 4.0;
        let mut value = exp_base * exp_base / 100_000.0;

        // * Longer maps are worth more
        let len_bonus = 1.0 + 0.1 * (self.total_hits() / 1500.0).min(1.0);
        value *= len_bonus;

        // * Penalize misses exponentially. This mainly fixes tag4 maps and the likes until a per-hitobject solution is available
        value *= 0.985_f64.powi(self.state.misses as i32);

        if self.mods.hd() {
            value *= 1.025;
        }

        if self.mods.fl() {
            // * Apply length bonus again if flashlight is on simply because it becomes a lot harder on longer maps.
            value *= 1.05 * len_bonus;
        }

        // * Scale the speed value with accuracy _slightly_
        value * self.state.accuracy()
    }

    fn accuracy_value(&self) -> f64 {
        if self.attrs.hit_window <= 0.0 {
            return 0.0;
        }

        let value = (150.0 / self.attrs.hit_window).powf(1.1) * self.state.accuracy().powi(15) * 22.0;

        // * Bonus for many hitcircles - it's harder to keep good accuracy up for longer
        value * (self.total_hits() / 1500.0).powf(0.3).min(1.15)
    }

    fn total_hits(&self) -> f64 {
        f64::from(self.state.total_hits())
    }
}

/// Anything that may contain [`TaikoDifficultyAttributes`].
pub trait TaikoAttributeProvider {
    fn attributes(self) -> Option<TaikoDifficultyAttributes>;
}

impl TaikoAttributeProvider for TaikoDifficultyAttributes {
    fn attributes(self) -> Option<TaikoDifficultyAttributes> {
        Some(self)
    }
}

impl TaikoAttributeProvider for TaikoPerformanceAttributes {
    fn attributes(self) -> Option<TaikoDifficultyAttributes> {
        Some(self.difficulty)
    }
}
