use crate::{Beatmap, CatchPP, GameMode, ManiaPP, Mods, OsuPP, RelaxPP, TaikoPP};

use super::{AttributeProvider, DifficultyAttributes, PerformanceAttributes};

/// Performance calculator on maps of any mode.
///
/// # Example
///
/// ```
/// use akatsuki_pp::{AnyPP, Beatmap};
///
/// # /*
/// let map: Beatmap = ...
/// # */
/// # let map = Beatmap::default();
/// let pp_result = AnyPP::new(&map)
///     .mods(8 + 64) // HDDT
///     .combo(1234)
///     .misses(1)
///     .accuracy(98.5)
///     .calculate();
///
/// println!("PP: {} | Stars: {}", pp_result.pp(), pp_result.stars());
///
/// let next_result = AnyPP::new(&map)
///     .attributes(pp_result) // reusing previous results for performance
///     .mods(8 + 64)          // has to be the same to reuse attributes
///     .accuracy(99.5)
///     .calculate();
///
/// println!("PP: {} | Stars: {}", next_result.pp(), next_result.stars());
/// ```
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Debug)]
pub enum AnyPP<'m> {
    /// osu!standard performance calculator
    Osu(OsuPP<'m>),
    /// osu!standard performance calculator for relax
    Relax(RelaxPP<'m>),
    /// osu!taiko performance calculator
    Taiko(TaikoPP<'m>),
    /// osu!catch performance calculator
    Catch(CatchPP<'m>),
    /// osu!mania performance calculator
    Mania(ManiaPP<'m>),
}

impl<'m> AnyPP<'m> {
    /// Create a new performance calculator for the map's own mode.
    #[inline]
    pub fn new(map: &'m Beatmap) -> Self {
        Self::with_mode(map, map.mode)
    }

    /// Create a new performance calculator that plays the map in the given mode.
    #[inline]
    pub fn with_mode(map: &'m Beatmap, mode: GameMode) -> Self {
        match mode {
            GameMode::Osu => Self::Osu(OsuPP::new(map)),
            GameMode::Taiko => Self::Taiko(TaikoPP::new(map)),
            GameMode::Catch => Self::Catch(CatchPP::new(map)),
            GameMode::Mania => Self::Mania(ManiaPP::new(map)),
        }
    }

    /// Consume the performance calculator and calculate
    /// performance attributes for the given parameters.
    #[inline]
    pub fn calculate(self) -> PerformanceAttributes {
        match self {
            Self::Osu(o) => PerformanceAttributes::Osu(o.calculate()),
            Self::Relax(r) => PerformanceAttributes::Relax(r.calculate()),
            Self::Taiko(t) => PerformanceAttributes::Taiko(t.calculate()),
            Self::Catch(c) => PerformanceAttributes::Catch(c.calculate()),
            Self::Mania(m) => PerformanceAttributes::Mania(m.calculate()),
        }
    }

    /// Provide the result of a previous difficulty or performance calculation.
    /// If you already calculated the attributes for the current map-mod combination,
    /// be sure to put them in here so that they don't have to be recalculated.
    ///
    /// Attributes of a different mode are ignored. Relax attributes
    /// switch an osu!standard calculator to [`RelaxPP`] and vice versa.
    #[inline]
    pub fn attributes(self, attributes: impl AttributeProvider) -> Self {
        let attributes = attributes.attributes();

        match (self, attributes) {
            (Self::Osu(o), attrs @ DifficultyAttributes::Relax(_)) => {
                Self::Relax(RelaxPP::from(o).attributes(attrs))
            }
            (Self::Relax(r), attrs @ DifficultyAttributes::Osu(_)) => {
                Self::Osu(OsuPP::from(r).attributes(attrs))
            }
            (calc, attributes) => calc.with_attributes(attributes),
        }
    }

    fn with_attributes(self, attributes: DifficultyAttributes) -> Self {
        match self {
            Self::Osu(o) => Self::Osu(o.attributes(attributes)),
            Self::Relax(r) => Self::Relax(r.attributes(attributes)),
            Self::Taiko(t) => Self::Taiko(t.attributes(attributes)),
            Self::Catch(c) => Self::Catch(c.attributes(attributes)),
            Self::Mania(m) => Self::Mania(m.attributes(attributes)),
        }
    }

    /// Specify mods through their bit values.
    ///
    /// On osu!standard, relax switches to [`RelaxPP`] and back.
    /// Attributes that were handed in beforehand are dropped on a switch.
    ///
    /// See [https://github.com/ppy/osu-api/wiki#mods](https://github.com/ppy/osu-api/wiki#mods)
    #[inline]
    pub fn mods(self, mods: u32) -> Self {
        match self {
            Self::Osu(o) if mods.rx() => Self::Relax(RelaxPP::from(o).mods(mods)),
            Self::Osu(o) => Self::Osu(o.mods(mods)),
            Self::Relax(r) if mods.rx() => Self::Relax(r.mods(mods)),
            Self::Relax(r) => Self::Osu(OsuPP::from(r).mods(mods)),
            Self::Taiko(t) => Self::Taiko(t.mods(mods)),
            Self::Catch(c) => Self::Catch(c.mods(mods)),
            Self::Mania(m) => Self::Mania(m.mods(mods)),
        }
    }

    /// Amount of passed objects for partial plays, e.g. a fail.
    #[inline]
    pub fn passed_objects(self, passed_objects: u32) -> Self {
        match self {
            Self::Osu(o) => Self::Osu(o.passed_objects(passed_objects)),
            Self::Relax(r) => Self::Relax(r.passed_objects(passed_objects)),
            Self::Taiko(t) => Self::Taiko(t.passed_objects(passed_objects)),
            Self::Catch(c) => Self::Catch(c.passed_objects(passed_objects)),
            Self::Mania(m) => Self::Mania(m.passed_objects(passed_objects)),
        }
    }

    /// Set the accuracy between `0.0` and `100.0`.
    #[inline]
    pub fn accuracy(self, acc: f64) -> Self {
        match self {
            Self::Osu(o) => Self::Osu(o.accuracy(acc)),
            Self::Relax(r) => Self::Relax(r.accuracy(acc)),
            Self::Taiko(t) => Self::Taiko(t.accuracy(acc)),
            Self::Catch(c) => Self::Catch(c.accuracy(acc)),
            Self::Mania(m) => Self::Mania(m.accuracy(acc)),
        }
    }

    /// Specify the amount of misses of a play.
    #[inline]
    pub fn misses(self, misses: u32) -> Self {
        match self {
            Self::Osu(o) => Self::Osu(o.misses(misses)),
            Self::Relax(r) => Self::Relax(r.misses(misses)),
            Self::Taiko(t) => Self::Taiko(t.misses(misses)),
            Self::Catch(c) => Self::Catch(c.misses(misses)),
            Self::Mania(m) => Self::Mania(m.misses(misses)),
        }
    }

    /// Specify the max combo of the play.
    ///
    /// Irrelevant for osu!mania.
    #[inline]
    pub fn combo(self, combo: u32) -> Self {
        match self {
            Self::Osu(o) => Self::Osu(o.combo(combo)),
            Self::Relax(r) => Self::Relax(r.combo(combo)),
            Self::Taiko(t) => Self::Taiko(t.combo(combo)),
            Self::Catch(c) => Self::Catch(c.combo(combo)),
            Self::Mania(_) => self,
        }
    }

    /// Specify the amount of 300s of a play.
    ///
    /// For osu!catch this is the amount of fruits.
    #[inline]
    pub fn n300(self, n300: u32) -> Self {
        match self {
            Self::Osu(o) => Self::Osu(o.n300(n300)),
            Self::Relax(r) => Self::Relax(r.n300(n300)),
            Self::Taiko(t) => Self::Taiko(t.n300(n300)),
            Self::Catch(c) => Self::Catch(c.fruits(n300)),
            Self::Mania(m) => Self::Mania(m.n300(n300)),
        }
    }

    /// Specify the amount of 100s of a play.
    ///
    /// For osu!catch this is the amount of droplets.
    #[inline]
    pub fn n100(self, n100: u32) -> Self {
        match self {
            Self::Osu(o) => Self::Osu(o.n100(n100)),
            Self::Relax(r) => Self::Relax(r.n100(n100)),
            Self::Taiko(t) => Self::Taiko(t.n100(n100)),
            Self::Catch(c) => Self::Catch(c.droplets(n100)),
            Self::Mania(m) => Self::Mania(m.n100(n100)),
        }
    }

    /// Specify the amount of 50s of a play.
    ///
    /// For osu!catch this is the amount of tiny droplets.
    /// Irrelevant for osu!taiko.
    #[inline]
    pub fn n50(self, n50: u32) -> Self {
        match self {
            Self::Osu(o) => Self::Osu(o.n50(n50)),
            Self::Relax(r) => Self::Relax(r.n50(n50)),
            Self::Taiko(_) => self,
            Self::Catch(c) => Self::Catch(c.tiny_droplets(n50)),
            Self::Mania(m) => Self::Mania(m.n50(n50)),
        }
    }

    /// Specify the amount of gekis of a play.
    ///
    /// Only relevant for osu!mania for which it represents the amount of 320s.
    #[inline]
    pub fn n_geki(self, n_geki: u32) -> Self {
        match self {
            Self::Mania(m) => Self::Mania(m.n320(n_geki)),
            _ => self,
        }
    }

    /// Specify the amount of katus of a play.
    ///
    /// For osu!mania this is the amount of 200s, for osu!catch
    /// the amount of tiny droplet misses. Irrelevant otherwise.
    #[inline]
    pub fn n_katu(self, n_katu: u32) -> Self {
        match self {
            Self::Catch(c) => Self::Catch(c.tiny_droplet_misses(n_katu)),
            Self::Mania(m) => Self::Mania(m.n200(n_katu)),
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        parse::{HitObject, HitObjectKind, TimingPoint},
        AnyStars, DifficultyAttributes, Pos2,
    };

    fn map(mode: GameMode) -> Beatmap {
        let hit_objects = (0..40)
            .map(|i| HitObject {
                pos: Pos2::new(64.0 + (i % 4) as f32 * 128.0, 192.0),
                start_time: 1000.0 + f64::from(i) * 200.0,
                kind: HitObjectKind::Circle,
                sound: if i % 3 == 0 { 2 } else { 0 },
            })
            .collect();

        Beatmap {
            mode,
            n_circles: 40,
            cs: 4.0,
            hit_objects,
            timing_points: vec![TimingPoint {
                time: 0.0,
                beat_len: 400.0,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn every_mode_has_pp() {
        for mode in [GameMode::Osu, GameMode::Taiko, GameMode::Catch, GameMode::Mania] {
            let map = map(mode);
            let attrs = AnyPP::new(&map).accuracy(97.0).calculate();

            assert!(attrs.pp() > 0.0, "{mode}");
            assert_eq!(attrs.max_combo(), 40, "{mode}");
        }
    }

    #[test]
    fn mismatched_attributes_are_ignored() {
        let map = map(GameMode::Taiko);

        let osu_attrs = AnyStars::with_mode(&map, GameMode::Osu).calculate();
        let taiko = AnyPP::new(&map).attributes(osu_attrs).calculate();
        let expected = AnyPP::new(&map).calculate();

        assert!(matches!(taiko, PerformanceAttributes::Taiko(_)));
        assert!((taiko.pp() - expected.pp()).abs() < f64::EPSILON);
    }

    #[test]
    fn reused_attributes_give_same_result() {
        let map = map(GameMode::Osu);

        let first = AnyPP::new(&map).mods(64).misses(2).calculate();
        let difficulty: DifficultyAttributes = first.clone().into();
        let second = AnyPP::new(&map)
            .attributes(difficulty)
            .mods(64)
            .misses(2)
            .calculate();

        assert_eq!(first, second);
    }

    #[test]
    fn relax_keeps_play_settings() {
        let map = map(GameMode::Osu);

        let calc = AnyPP::new(&map)
            .combo(20)
            .misses(1)
            .accuracy(95.0)
            .mods(128 + 8);

        let AnyPP::Relax(relax) = calc.clone() else {
            panic!("expected relax calculator");
        };

        let expected = relax.calculate();
        let direct = crate::RelaxPP::new(&map)
            .mods(128 + 8)
            .combo(20)
            .misses(1)
            .accuracy(95.0)
            .calculate();

        assert_eq!(expected, direct);
        assert_eq!(calc.calculate(), PerformanceAttributes::Relax(direct));

        let back = AnyPP::new(&map).mods(128).mods(8);
        assert!(matches!(back, AnyPP::Osu(_)));
    }

    #[test]
    fn relax_attributes_switch_calculator() {
        let map = map(GameMode::Osu);

        let attrs = AnyStars::new(&map).mods(128).calculate();
        let calc = AnyPP::new(&map).attributes(attrs.clone());

        assert!(matches!(calc, AnyPP::Relax(_)));

        let perf = calc.mods(128).calculate();

        assert!(matches!(perf, PerformanceAttributes::Relax(_)));
        assert_eq!(perf.difficulty_attributes(), attrs);
        assert!(perf.pp() > 0.0);
    }

    #[test]
    fn combo_is_ignored_for_mania() {
        let map = map(GameMode::Mania);

        let full = AnyPP::new(&map).calculate();
        let broken = AnyPP::new(&map).combo(5).calculate();

        assert!((full.pp() - broken.pp()).abs() < f64::EPSILON);
    }
}
