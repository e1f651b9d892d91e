mod attributes;
mod pp;

use crate::{Beatmap, CatchStars, GameMode, ManiaStars, Mods, OsuStars, RelaxStars, TaikoStars};

pub use self::{
    attributes::{AttributeProvider, DifficultyAttributes, PerformanceAttributes},
    pp::AnyPP,
};

/// Difficulty calculator on maps of any mode.
///
/// # Example
///
/// ```
/// use akatsuki_pp::{AnyStars, Beatmap, GameMode};
///
/// # /*
/// let map: Beatmap = ...
/// # */
/// # let map = Beatmap::default();
///
/// let difficulty_attrs = AnyStars::new(&map)
///     .mods(8 + 64) // HDDT
///     .calculate();
///
/// println!("Stars: {}", difficulty_attrs.stars());
///
/// // osu!standard maps can be played in any mode
/// let taiko_attrs = AnyStars::with_mode(&map, GameMode::Taiko).calculate();
///
/// assert_eq!(taiko_attrs.mode(), GameMode::Taiko);
/// ```
#[derive(Clone, Debug)]
pub enum AnyStars<'m> {
    /// osu!standard difficulty calculator
    Osu(OsuStars<'m>),
    /// osu!standard difficulty calculator for relax
    Relax(RelaxStars<'m>),
    /// osu!taiko difficulty calculator
    Taiko(TaikoStars<'m>),
    /// osu!catch difficulty calculator
    Catch(CatchStars<'m>),
    /// osu!mania difficulty calculator
    Mania(ManiaStars<'m>),
}

impl<'m> AnyStars<'m> {
    /// Create a new difficulty calculator for the map's own mode.
    #[inline]
    pub fn new(map: &'m Beatmap) -> Self {
        Self::with_mode(map, map.mode)
    }

    /// Create a new difficulty calculator that plays the map in the given mode.
    ///
    /// Only osu!standard maps can be converted to other modes.
    /// Whether the combination makes sense is not checked here,
    /// [`Engine`](crate::Engine) rejects invalid conversions.
    #[inline]
    pub fn with_mode(map: &'m Beatmap, mode: GameMode) -> Self {
        match mode {
            GameMode::Osu => Self::Osu(OsuStars::new(map)),
            GameMode::Taiko => Self::Taiko(TaikoStars::new(map)),
            GameMode::Catch => Self::Catch(CatchStars::new(map)),
            GameMode::Mania => Self::Mania(ManiaStars::new(map)),
        }
    }

    /// Specify mods through their bit values.
    ///
    /// On osu!standard, relax switches to [`RelaxStars`] and back.
    ///
    /// See [https://github.com/ppy/osu-api/wiki#mods](https://github.com/ppy/osu-api/wiki#mods)
    #[inline]
    pub fn mods(self, mods: u32) -> Self {
        match self {
            Self::Osu(o) if mods.rx() => Self::Relax(RelaxStars::from(o).mods(mods)),
            Self::Osu(o) => Self::Osu(o.mods(mods)),
            Self::Relax(r) if mods.rx() => Self::Relax(r.mods(mods)),
            Self::Relax(r) => Self::Osu(OsuStars::from(r).mods(mods)),
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

    /// Calculate difficulty attributes for the given parameters.
    #[inline]
    pub fn calculate(&self) -> DifficultyAttributes {
        match self {
            Self::Osu(o) => DifficultyAttributes::Osu(o.calculate()),
            Self::Relax(r) => DifficultyAttributes::Relax(r.calculate()),
            Self::Taiko(t) => DifficultyAttributes::Taiko(t.calculate()),
            Self::Catch(c) => DifficultyAttributes::Catch(c.calculate()),
            Self::Mania(m) => DifficultyAttributes::Mania(m.calculate()),
        }
    }
}

impl Beatmap {
    /// The maximum combo of the map when played in the given mode with the given mods.
    ///
    /// Mods only matter for osu!catch where hard rock may change the
    /// amount of tiny droplets, for osu!mania converts where key
    /// mods change the column count, and for relax on osu!standard.
    pub fn max_combo(&self, mode: GameMode, mods: u32) -> u32 {
        match mode {
            // Nested slider objects require the full conversion
            GameMode::Osu if mods.rx() => RelaxStars::new(self).mods(mods).calculate().max_combo,
            GameMode::Osu => OsuStars::new(self).mods(mods).calculate().max_combo,
            GameMode::Taiko => self.hit_objects.iter().filter(|h| h.is_circle()).count() as u32,
            GameMode::Catch => CatchStars::new(self).mods(mods).calculate().max_combo(),
            GameMode::Mania => crate::mania::max_combo(self, mods),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{HitObject, HitObjectKind, TimingPoint};
    use crate::Pos2;

    fn circles(n: usize) -> Beatmap {
        let hit_objects = (0..n)
            .map(|i| HitObject {
                pos: Pos2::new(if i % 2 == 0 { 100.0 } else { 400.0 }, 192.0),
                start_time: 1000.0 + i as f64 * 250.0,
                kind: HitObjectKind::Circle,
                sound: 0,
            })
            .collect();

        Beatmap {
            n_circles: n as u32,
            hit_objects,
            timing_points: vec![TimingPoint {
                time: 0.0,
                beat_len: 500.0,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn dispatches_on_map_mode() {
        let map = circles(10);

        assert!(matches!(AnyStars::new(&map), AnyStars::Osu(_)));
        assert_eq!(AnyStars::new(&map).calculate().mode(), GameMode::Osu);
    }

    #[test]
    fn converts_to_every_mode() {
        let map = circles(10);

        for mode in [GameMode::Taiko, GameMode::Catch, GameMode::Mania] {
            let attrs = AnyStars::with_mode(&map, mode).calculate();

            assert_eq!(attrs.mode(), mode);
            assert_eq!(attrs.max_combo(), 10);
        }
    }

    #[test]
    fn max_combo_matches_attributes() {
        let map = circles(25);

        for mode in [GameMode::Osu, GameMode::Taiko, GameMode::Catch, GameMode::Mania] {
            let attrs = AnyStars::with_mode(&map, mode).calculate();

            assert_eq!(map.max_combo(mode, 0), attrs.max_combo());
        }
    }

    #[test]
    fn skills_are_named_per_mode() {
        let map = circles(10);

        let names = |mode| {
            AnyStars::with_mode(&map, mode)
                .calculate()
                .skills()
                .into_iter()
                .map(|(name, _)| name)
                .collect::<Vec<_>>()
        };

        assert_eq!(names(GameMode::Osu), ["aim", "speed", "flashlight"]);
        assert_eq!(names(GameMode::Taiko), ["stamina", "rhythm", "colour"]);
        assert_eq!(names(GameMode::Catch), ["movement"]);
        assert_eq!(names(GameMode::Mania), ["strain"]);
    }

    #[test]
    fn relax_switches_calculator() {
        let map = circles(10);

        let rx = AnyStars::new(&map).passed_objects(8).mods(128 + 64);
        assert!(matches!(rx, AnyStars::Relax(ref r) if r.passed_objects == Some(8)));

        let attrs = rx.calculate();
        assert!(matches!(attrs, DifficultyAttributes::Relax(_)));
        assert_eq!(attrs.mode(), GameMode::Osu);
        assert_eq!(attrs.max_combo(), 8);

        let names: Vec<_> = attrs.skills().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["aim", "speed"]);

        let back = AnyStars::new(&map).mods(128).mods(64);
        assert!(matches!(back, AnyStars::Osu(ref o) if o.mods == 64));

        let taiko = AnyStars::with_mode(&map, GameMode::Taiko).mods(128);
        assert!(matches!(taiko, AnyStars::Taiko(_)));
    }

    #[test]
    fn relax_max_combo() {
        let map = circles(25);

        assert_eq!(map.max_combo(GameMode::Osu, 128), 25);
    }

    #[test]
    fn performance_keeps_mode() {
        let map = circles(30);
        let attrs = AnyStars::with_mode(&map, GameMode::Catch).calculate();
        let stars = attrs.stars();

        let perf = attrs.performance(&map).calculate();

        assert!(matches!(perf, PerformanceAttributes::Catch(_)));
        assert!((perf.stars() - stars).abs() < f64::EPSILON);
        assert!(perf.pp() > 0.0);
    }
}
