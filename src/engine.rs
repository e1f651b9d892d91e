use std::path::Path;

use crate::{
    error::{Error, InvalidPlayResultError, Result},
    mods::{self, ModConflictPolicy},
    AnyPP, AnyStars, Beatmap, DifficultyAttributes, GameMode,
};

/// Runtime settings of an [`Engine`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// How to treat mods that can't be combined.
    pub mod_conflicts: ModConflictPolicy,
    /// Whether osu!standard maps may be calculated in other modes.
    pub allow_converts: bool,
}

impl Default for EngineConfig {
    #[inline]
    fn default() -> Self {
        Self {
            mod_conflicts: ModConflictPolicy::Reject,
            allow_converts: true,
        }
    }
}

impl EngineConfig {
    #[inline]
    pub const fn mod_conflicts(mut self, policy: ModConflictPolicy) -> Self {
        self.mod_conflicts = policy;

        self
    }

    #[inline]
    pub const fn allow_converts(mut self, allow_converts: bool) -> Self {
        self.allow_converts = allow_converts;

        self
    }
}

/// Parameters of a performance calculation.
///
/// Judgements that are not specified are generated from the accuracy,
/// or assumed to be the best case if no accuracy is given.
/// For osu!catch, `count_300`, `count_100` and `count_50` are the amounts
/// of caught fruits, droplets and tiny droplets.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerformanceRequest {
    pub mode: GameMode,
    pub mods: u32,
    /// Highest combo of the play.
    pub max_combo: u32,
    /// Accuracy between `0.0` and `100.0`.
    pub accuracy: Option<f64>,
    pub count_300: Option<u32>,
    pub count_100: Option<u32>,
    pub count_50: Option<u32>,
    pub miss_count: u32,
    /// Amount of passed objects for partial plays, e.g. a fail.
    pub passed_objects: Option<u32>,
}

/// Parameters of a score calculation, i.e. a play that is described by its accuracy.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreRequest {
    pub mode: GameMode,
    pub mods: u32,
    pub max_combo: u32,
    pub accuracy: f64,
    pub miss_count: u32,
    pub passed_objects: Option<u32>,
}

impl From<&ScoreRequest> for PerformanceRequest {
    #[inline]
    fn from(req: &ScoreRequest) -> Self {
        Self {
            mode: req.mode,
            mods: req.mods,
            max_combo: req.max_combo,
            accuracy: Some(req.accuracy),
            miss_count: req.miss_count,
            passed_objects: req.passed_objects,
            ..Default::default()
        }
    }
}

/// Result of [`Engine::calculate_performance`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalculatePerformanceResult {
    pub pp: f64,
    pub stars: f64,
    /// Approach rate with mods and clock rate applied.
    pub ar: f64,
    /// Overall difficulty with mods and clock rate applied.
    pub od: f64,
    /// Maximum combo of the whole map for the requested mode and mods.
    pub max_combo: u32,
}

/// Result of [`Engine::calculate_score`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalculateScoreResult {
    pub pp: f64,
    pub stars: f64,
}

impl From<CalculatePerformanceResult> for CalculateScoreResult {
    #[inline]
    fn from(result: CalculatePerformanceResult) -> Self {
        Self {
            pp: result.pp,
            stars: result.stars,
        }
    }
}

/// Entry point that checks a request, parses the map and calculates
/// difficulty and performance in one go.
///
/// Either the whole calculation succeeds or an [`Error`] is returned.
///
/// # Example
///
/// ```
/// use akatsuki_pp::{Engine, EngineConfig, GameMode, ModConflictPolicy, PerformanceRequest};
///
/// let engine = Engine::with_config(
///     EngineConfig::default().mod_conflicts(ModConflictPolicy::Normalize),
/// );
///
/// let bytes = b"osu file format v14\n\n[Difficulty]\nOverallDifficulty:8\n\n[HitObjects]\n256,192,1000,1,0\n";
///
/// let request = PerformanceRequest {
///     mode: GameMode::Osu,
///     mods: 8 + 16, // HDHR
///     max_combo: 1,
///     accuracy: Some(100.0),
///     ..Default::default()
/// };
///
/// let result = engine.from_bytes(bytes, &request).unwrap();
///
/// assert_eq!(result.max_combo, 1);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create an [`Engine`] with the default config.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub const fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse the `.osu` file at the given path and calculate its performance.
    pub fn from_path(
        &self,
        path: impl AsRef<Path>,
        req: &PerformanceRequest,
    ) -> Result<CalculatePerformanceResult> {
        check_accuracy(req.accuracy)?;
        let map = Beatmap::from_path(path)?;

        self.calculate_performance(&map, req)
    }

    /// Parse the `.osu` file content and calculate its performance.
    pub fn from_bytes(
        &self,
        bytes: &[u8],
        req: &PerformanceRequest,
    ) -> Result<CalculatePerformanceResult> {
        check_accuracy(req.accuracy)?;
        let map = Beatmap::from_bytes(bytes)?;

        self.calculate_performance(&map, req)
    }

    /// Asynchronously read the `.osu` file at the given path and calculate its performance.
    #[cfg(feature = "async_tokio")]
    pub async fn from_path_async(
        &self,
        path: impl AsRef<Path>,
        req: &PerformanceRequest,
    ) -> Result<CalculatePerformanceResult> {
        check_accuracy(req.accuracy)?;
        let map = Beatmap::from_path_async(path).await?;

        self.calculate_performance(&map, req)
    }

    /// Asynchronously read the `.osu` file at the given path and calculate its performance.
    #[cfg(feature = "async_std")]
    pub async fn from_path_async(
        &self,
        path: impl AsRef<async_std::path::Path>,
        req: &PerformanceRequest,
    ) -> Result<CalculatePerformanceResult> {
        check_accuracy(req.accuracy)?;
        let map = Beatmap::from_path_async(path).await?;

        self.calculate_performance(&map, req)
    }

    /// Parse the `.osu` file at the given path and calculate the pp of a score.
    pub fn calculate_score(
        &self,
        path: impl AsRef<Path>,
        req: &ScoreRequest,
    ) -> Result<CalculateScoreResult> {
        self.from_path(path, &PerformanceRequest::from(req))
            .map(CalculateScoreResult::from)
    }

    /// Calculate the performance of a play on an already parsed map.
    pub fn calculate_performance(
        &self,
        map: &Beatmap,
        req: &PerformanceRequest,
    ) -> Result<CalculatePerformanceResult> {
        check_accuracy(req.accuracy)?;

        let mode = req.mode;

        if map.mode != mode && !(map.mode == GameMode::Osu && self.config.allow_converts) {
            return Err(Error::Conversion { from: map.mode, to: mode });
        }

        let mods = mods::validate(req.mods, mode, self.config.mod_conflicts)?;

        let mut stars = AnyStars::with_mode(map, mode).mods(mods);

        if let Some(passed_objects) = req.passed_objects {
            stars = stars.passed_objects(passed_objects);
        }

        let difficulty = stars.calculate();

        tracing::trace!(
            %mode,
            stars = difficulty.stars(),
            skills = ?difficulty.skills(),
            "Estimated difficulty"
        );

        check_judgements(&difficulty, req)?;

        let prefix_max_combo = difficulty.max_combo();

        let combo = if req.max_combo > prefix_max_combo {
            tracing::warn!(
                combo = req.max_combo,
                max_combo = prefix_max_combo,
                "Combo exceeds the maximum, clamping"
            );

            prefix_max_combo
        } else {
            req.max_combo
        };

        let max_combo = if req.passed_objects.is_some() {
            map.max_combo(mode, mods)
        } else {
            prefix_max_combo
        };

        let mut calc = AnyPP::with_mode(map, mode)
            .attributes(difficulty)
            .mods(mods)
            .combo(combo)
            .misses(req.miss_count);

        if let Some(passed_objects) = req.passed_objects {
            calc = calc.passed_objects(passed_objects);
        }

        if let Some(n300) = req.count_300 {
            calc = calc.n300(n300);
        }

        if let Some(n100) = req.count_100 {
            calc = calc.n100(n100);
        }

        if let Some(n50) = req.count_50 {
            calc = calc.n50(n50);
        }

        if let Some(acc) = req.accuracy {
            calc = calc.accuracy(acc);
        }

        let attrs = calc.calculate();

        let map_attrs = map.attributes().mode(mode).mods(mods).build();

        let result = CalculatePerformanceResult {
            pp: attrs.pp(),
            stars: attrs.stars(),
            ar: map_attrs.ar,
            od: map_attrs.od,
            max_combo,
        };

        tracing::debug!(
            %mode,
            mods,
            pp = result.pp,
            stars = result.stars,
            "Calculated performance"
        );

        Ok(result)
    }
}

fn check_accuracy(acc: Option<f64>) -> std::result::Result<(), InvalidPlayResultError> {
    match acc {
        Some(acc) if !acc.is_finite() || !(0.0..=100.0).contains(&acc) => {
            Err(InvalidPlayResultError::Accuracy(acc))
        }
        _ => Ok(()),
    }
}

/// Ensure misses and judgements fit into the amount of judged objects.
fn check_judgements(
    difficulty: &DifficultyAttributes,
    req: &PerformanceRequest,
) -> std::result::Result<(), InvalidPlayResultError> {
    let (objects, tiny_droplets) = match difficulty {
        DifficultyAttributes::Osu(attrs) => (attrs.n_objects(), None),
        DifficultyAttributes::Relax(attrs) => (attrs.n_objects(), None),
        DifficultyAttributes::Taiko(attrs) => (attrs.max_combo, None),
        DifficultyAttributes::Catch(attrs) => (attrs.max_combo(), Some(attrs.n_tiny_droplets)),
        DifficultyAttributes::Mania(attrs) => (attrs.n_objects, None),
    };

    if req.miss_count > objects {
        return Err(InvalidPlayResultError::Misses {
            misses: req.miss_count,
            objects,
        });
    }

    // Tiny droplets don't count towards the judged objects
    let counts: &[(&'static str, Option<u32>)] = if tiny_droplets.is_some() {
        &[("count_300", req.count_300), ("count_100", req.count_100)]
    } else {
        &[
            ("count_300", req.count_300),
            ("count_100", req.count_100),
            ("count_50", req.count_50),
        ]
    };

    let mut sum = u64::from(req.miss_count);

    for &(field, count) in counts {
        let Some(value) = count else { continue };
        sum += u64::from(value);

        if sum > u64::from(objects) {
            return Err(InvalidPlayResultError::Judgements {
                field,
                value,
                objects,
            });
        }
    }

    if let (Some(max), Some(value)) = (tiny_droplets, req.count_50) {
        if value > max {
            return Err(InvalidPlayResultError::Judgements {
                field: "count_50",
                value,
                objects: max,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = "osu file format v14

[General]
Mode: 0
StackLeniency: 0.7

[Difficulty]
HPDrainRate:5
CircleSize:4
OverallDifficulty:8
ApproachRate:9
SliderMultiplier:1.4
SliderTickRate:1

[TimingPoints]
0,400,4,2,0,50,1,0

[HitObjects]
64,192,1000,1,0,0:0:0:0:
448,192,1200,1,0,0:0:0:0:
64,192,1400,1,0,0:0:0:0:
448,192,1600,1,0,0:0:0:0:
64,192,1800,1,0,0:0:0:0:
448,192,2000,1,0,0:0:0:0:
64,192,2200,1,0,0:0:0:0:
448,192,2400,1,0,0:0:0:0:
";

    fn request(mode: GameMode) -> PerformanceRequest {
        PerformanceRequest {
            mode,
            max_combo: 8,
            ..Default::default()
        }
    }

    #[test]
    fn default_config() {
        let config = EngineConfig::default();

        assert_eq!(config.mod_conflicts, ModConflictPolicy::Reject);
        assert!(config.allow_converts);
    }

    #[test]
    fn rejects_accuracy_out_of_range() {
        let engine = Engine::new();

        for acc in [150.0, -1.0, f64::NAN, f64::INFINITY] {
            let req = PerformanceRequest {
                accuracy: Some(acc),
                ..request(GameMode::Osu)
            };

            let err = engine.from_bytes(MAP.as_bytes(), &req).unwrap_err();

            assert!(
                matches!(err, Error::PlayResult(InvalidPlayResultError::Accuracy(_))),
                "{acc}"
            );
        }
    }

    #[test]
    fn rejects_too_many_misses() {
        let req = PerformanceRequest {
            miss_count: 9,
            ..request(GameMode::Osu)
        };

        let err = Engine::new().from_bytes(MAP.as_bytes(), &req).unwrap_err();

        let Error::PlayResult(err) = err else {
            panic!("expected play result error, got {err:?}");
        };

        assert_eq!(err.field(), "miss_count");
    }

    #[test]
    fn rejects_judgement_sum() {
        let req = PerformanceRequest {
            count_300: Some(6),
            count_100: Some(2),
            miss_count: 1,
            ..request(GameMode::Osu)
        };

        let err = Engine::new().from_bytes(MAP.as_bytes(), &req).unwrap_err();

        assert!(matches!(
            err,
            Error::PlayResult(InvalidPlayResultError::Judgements {
                field: "count_100",
                value: 2,
                objects: 8,
            })
        ));
    }

    #[test]
    fn judgements_are_checked_against_passed_objects() {
        let req = PerformanceRequest {
            miss_count: 5,
            passed_objects: Some(4),
            ..request(GameMode::Osu)
        };

        let err = Engine::new().from_bytes(MAP.as_bytes(), &req).unwrap_err();

        assert!(matches!(
            err,
            Error::PlayResult(InvalidPlayResultError::Misses {
                misses: 5,
                objects: 4
            })
        ));
    }

    #[test]
    fn converts_can_be_disabled() {
        let engine = Engine::with_config(EngineConfig::default().allow_converts(false));
        let err = engine
            .from_bytes(MAP.as_bytes(), &request(GameMode::Taiko))
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Conversion {
                from: GameMode::Osu,
                to: GameMode::Taiko
            }
        ));

        let result = Engine::new()
            .from_bytes(MAP.as_bytes(), &request(GameMode::Taiko))
            .unwrap();

        assert!(result.pp > 0.0);
    }

    #[test]
    fn non_osu_maps_cannot_be_converted() {
        let map = Beatmap {
            mode: GameMode::Taiko,
            ..Beatmap::default()
        };

        let err = Engine::new()
            .calculate_performance(&map, &request(GameMode::Osu))
            .unwrap_err();

        assert!(matches!(err, Error::Conversion { .. }));
    }

    #[test]
    fn mod_conflicts_follow_config() {
        let req = PerformanceRequest {
            mods: 64 + 256, // DTHT
            ..request(GameMode::Osu)
        };

        let err = Engine::new().from_bytes(MAP.as_bytes(), &req).unwrap_err();
        assert!(matches!(err, Error::Mods(_)));

        let engine = Engine::with_config(
            EngineConfig::default().mod_conflicts(ModConflictPolicy::Normalize),
        );

        let normalized = engine.from_bytes(MAP.as_bytes(), &req).unwrap();
        let dt = PerformanceRequest {
            mods: 64,
            ..request(GameMode::Osu)
        };
        let expected = engine.from_bytes(MAP.as_bytes(), &dt).unwrap();

        assert_eq!(normalized, expected);
    }

    #[test]
    fn combo_is_clamped() {
        let engine = Engine::new();

        let over = PerformanceRequest {
            max_combo: 500,
            ..request(GameMode::Osu)
        };

        let clamped = engine.from_bytes(MAP.as_bytes(), &over).unwrap();
        let full = engine
            .from_bytes(MAP.as_bytes(), &request(GameMode::Osu))
            .unwrap();

        assert_eq!(clamped, full);
    }

    #[test]
    fn max_combo_is_of_whole_map() {
        let req = PerformanceRequest {
            max_combo: 3,
            passed_objects: Some(3),
            ..request(GameMode::Osu)
        };

        let result = Engine::new().from_bytes(MAP.as_bytes(), &req).unwrap();

        assert_eq!(result.max_combo, 8);
    }

    #[test]
    fn effective_ar_and_od() {
        let req = PerformanceRequest {
            mods: 16, // HR
            ..request(GameMode::Osu)
        };

        let result = Engine::new().from_bytes(MAP.as_bytes(), &req).unwrap();

        assert!((result.ar - 10.0).abs() < 1e-9);
        assert!((result.od - 10.0).abs() < 1e-9);
    }

    #[test]
    fn score_request_uses_accuracy() {
        let score = ScoreRequest {
            mode: GameMode::Osu,
            max_combo: 8,
            accuracy: 95.0,
            ..Default::default()
        };

        let map = Beatmap::from_bytes(MAP.as_bytes()).unwrap();
        let perf = Engine::new()
            .calculate_performance(&map, &PerformanceRequest::from(&score))
            .unwrap();

        let ss = Engine::new()
            .calculate_performance(&map, &request(GameMode::Osu))
            .unwrap();

        assert!(perf.pp < ss.pp);
        assert!((perf.stars - ss.stars).abs() < f64::EPSILON);
    }

    #[test]
    fn relax_uses_relax_calculator() {
        let map = Beatmap::from_bytes(MAP.as_bytes()).unwrap();

        let req = PerformanceRequest {
            mods: 128 + 8, // RXHD
            accuracy: Some(97.0),
            ..request(GameMode::Osu)
        };

        let result = Engine::new().calculate_performance(&map, &req).unwrap();

        let stars = crate::RelaxStars::new(&map).mods(128 + 8).calculate();
        let pp = crate::RelaxPP::new(&map)
            .attributes(stars.clone())
            .mods(128 + 8)
            .combo(8)
            .accuracy(97.0)
            .calculate();

        assert!((result.stars - stars.stars).abs() < f64::EPSILON);
        assert!((result.pp - pp.pp).abs() < f64::EPSILON);
        assert_eq!(result.max_combo, 8);
    }
}
