use crate::{Beatmap, Mods};

use super::{CatchDifficultyAttributes, CatchPerformanceAttributes, CatchScoreState, CatchStars};

/// Performance calculator on osu!catch maps.
///
/// # Example
///
/// ```
/// use akatsuki_pp::{Beatmap, CatchPP};
///
/// # /*
/// let map: Beatmap = ...
/// # */
/// # let map = Beatmap::default();
/// let attrs = CatchPP::new(&map)
///     .mods(8 + 64) // HDDT
///     .combo(1234)
///     .misses(1)
///     .accuracy(98.5)
///     .calculate();
///
/// println!("PP: {} | Stars: {}", attrs.pp(), attrs.stars());
///
/// let next_result = CatchPP::new(&map)
///     .attributes(attrs) // reusing previous results for performance
///     .mods(8 + 64)      // has to be the same to reuse attributes
///     .accuracy(99.5)
///     .calculate();
///
/// println!("PP: {} | Stars: {}", next_result.pp(), next_result.stars());
/// ```
#[derive(Clone, Debug)]
#[allow(clippy::upper_case_acronyms)]
pub struct CatchPP<'m> {
    map: &'m Beatmap,
    attributes: Option<CatchDifficultyAttributes>,
    mods: u32,
    combo: Option<u32>,
    acc: Option<f64>,
    passed_objects: Option<u32>,

    n_fruits: Option<u32>,
    n_droplets: Option<u32>,
    n_tiny_droplets: Option<u32>,
    n_tiny_droplet_misses: Option<u32>,
    n_misses: u32,
}

impl<'m> CatchPP<'m> {
    pub fn new(map: &'m Beatmap) -> Self {
        Self {
            map,
            attributes: None,
            mods: 0,
            combo: None,
            acc: None,
            passed_objects: None,
            n_fruits: None,
            n_droplets: None,
            n_tiny_droplets: None,
            n_tiny_droplet_misses: None,
            n_misses: 0,
        }
    }

    /// Reuse attributes of an earlier calculation with the same map, mods,
    /// and passed objects.
    pub fn attributes(mut self, attributes: impl CatchAttributeProvider) -> Self {
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

    /// Highest combo of the score.
    pub fn combo(mut self, combo: u32) -> Self {
        self.combo = Some(combo);

        self
    }

    /// Caught fruits, the n300 of the API.
    pub fn fruits(mut self, n_fruits: u32) -> Self {
        self.n_fruits = Some(n_fruits);

        self
    }

    /// Caught droplets, the n100 of the API.
    pub fn droplets(mut self, n_droplets: u32) -> Self {
        self.n_droplets = Some(n_droplets);

        self
    }

    /// Caught tiny droplets, the n50 of the API.
    pub fn tiny_droplets(mut self, n_tiny_droplets: u32) -> Self {
        self.n_tiny_droplets = Some(n_tiny_droplets);

        self
    }

    /// Missed tiny droplets, the n_katu of the API.
    pub fn tiny_droplet_misses(mut self, n_tiny_droplet_misses: u32) -> Self {
        self.n_tiny_droplet_misses = Some(n_tiny_droplet_misses);

        self
    }

    /// Missed fruits and droplets.
    pub fn misses(mut self, n_misses: u32) -> Self {
        self.n_misses = n_misses;

        self
    }

    /// Accuracy in percent.
    pub fn accuracy(mut self, acc: f64) -> Self {
        self.acc = Some(acc / 100.0);

        self
    }

    /// Amount of passed fruits and droplets for partial plays, e.g. a fail.
    pub fn passed_objects(mut self, passed_objects: u32) -> Self {
        self.passed_objects = Some(passed_objects);

        self
    }

    fn difficulty_attributes(&mut self) -> CatchDifficultyAttributes {
        if let Some(ref attrs) = self.attributes {
            return attrs.clone();
        }

        let mut stars = CatchStars::new(self.map).mods(self.mods);

        if let Some(passed_objects) = self.passed_objects {
            stars = stars.passed_objects(passed_objects);
        }

        let attrs = stars.calculate();
        self.attributes = Some(attrs.clone());

        attrs
    }

    /// Create the [`CatchScoreState`] that will be used for performance calculation.
    pub fn generate_state(&mut self) -> CatchScoreState {
        let attrs = self.difficulty_attributes();
        let max_combo = attrs.max_combo();
        let misses = self.n_misses.min(max_combo);

        // Misses are attributed to droplets first
        let n_droplets = self.n_droplets.map_or_else(
            || attrs.n_droplets.saturating_sub(misses),
            |n| n.min(attrs.n_droplets),
        );

        let n_fruits = self.n_fruits.map_or_else(
            || max_combo.saturating_sub(misses + n_droplets),
            |n| n.min(attrs.n_fruits),
        );

        let max_tiny = attrs.n_tiny_droplets;

        let n_tiny_droplets = match (self.n_tiny_droplets, self.acc) {
            (Some(n), _) => n.min(max_tiny),
            (None, Some(acc)) => {
                let total = f64::from(max_combo + max_tiny);
                let target = (acc * total).round() as u32;

                target.saturating_sub(n_fruits + n_droplets).min(max_tiny)
            }
            (None, None) => max_tiny.saturating_sub(self.n_tiny_droplet_misses.unwrap_or(0)),
        };

        let n_tiny_droplet_misses = self
            .n_tiny_droplet_misses
            .map_or(max_tiny - n_tiny_droplets, |n| {
                n.min(max_tiny - n_tiny_droplets)
            });

        let max_possible_combo = max_combo.saturating_sub(misses);

        let max_combo = self
            .combo
            .map_or(max_possible_combo, |combo| combo.min(max_possible_combo));

        CatchScoreState {
            max_combo,
            n_fruits,
            n_droplets,
            n_tiny_droplets,
            n_tiny_droplet_misses,
            misses,
        }
    }

    pub fn calculate(mut self) -> CatchPerformanceAttributes {
        let state = self.generate_state();
        let attrs = self.difficulty_attributes();

        let inner = CatchPpInner {
            mods: self.mods,
            state,
            attrs,
        };

        inner.calculate()
    }
}

struct CatchPpInner {
    attrs: CatchDifficultyAttributes,
    mods: u32,
    state: CatchScoreState,
}

impl CatchPpInner {
    fn calculate(self) -> CatchPerformanceAttributes {
        let attrs = &self.attrs;

        if self.state.total_hits() == 0 {
            return CatchPerformanceAttributes {
                difficulty: self.attrs,
                pp: 0.0,
            };
        }

        // * We are heavily relying on aim in catch the beat
        let mut pp = (5.0 * (attrs.stars / 0.0049).max(1.0) - 4.0).powi(2) / 100_000.0;

        // * Longer maps are worth more. "Longer" means how many hits there are which can contribute to combo
        let combo_hits = f64::from(self.state.combo_hits());

        let mut len_bonus = 0.95 + 0.3 * (combo_hits / 2500.0).min(1.0);

        if combo_hits > 2500.0 {
            len_bonus += (combo_hits / 2500.0).log10() * 0.475;
        }

        pp *= len_bonus;

        // * Penalize misses exponentially. This mainly fixes tag4 maps and the likes until a per-hitobject solution is available
        pp *= 0.97_f64.powi(self.state.misses as i32);

        // * Combo scaling
        let max_combo = attrs.max_combo();

        if max_combo > 0 {
            pp *= (f64::from(self.state.max_combo).powf(0.8) / f64::from(max_combo).powf(0.8))
                .min(1.0);
        }

        let ar = attrs.ar;
        let mut ar_factor = 1.0;

        if ar > 9.0 {
            // * 10% for each AR above 9
            ar_factor += 0.1 * (ar - 9.0);
        }

        if ar > 10.0 {
            // * Additional 10% at AR 11, 30% total
            ar_factor += 0.1 * (ar - 10.0);
        } else if ar < 8.0 {
            // * 2.5% for each AR below 8
            ar_factor += 0.025 * (8.0 - ar);
        }

        pp *= ar_factor;

        if self.mods.hd() {
            // * Hiddens gives almost nothing on max approach rate, and more the lower it is
            if ar <= 10.0 {
                // * 7.5% for each AR below 10
                pp *= 1.05 + 0.075 * (10.0 - ar);
            } else {
                // * 5% at AR 10, 1% at AR 11
                pp *= 1.01 + 0.04 * (11.0 - ar.min(11.0));
            }
        }

        if self.mods.fl() {
            pp *= 1.35 * len_bonus;
        }

        pp *= self.state.accuracy().powf(5.5);

        if self.mods.nf() {
            pp *= 0.9;
        }

        CatchPerformanceAttributes {
            difficulty: self.attrs,
            pp,
        }
    }
}

/// Anything that may contain [`CatchDifficultyAttributes`].
pub trait CatchAttributeProvider {
    fn attributes(self) -> Option<CatchDifficultyAttributes>;
}

impl CatchAttributeProvider for CatchDifficultyAttributes {
    fn attributes(self) -> Option<CatchDifficultyAttributes> {
        Some(self)
    }
}

impl CatchAttributeProvider for CatchPerformanceAttributes {
    fn attributes(self) -> Option<CatchDifficultyAttributes> {
        Some(self.difficulty)
    }
}
