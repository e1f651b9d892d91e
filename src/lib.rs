//! Library to calculate difficulty and performance attributes for all [osu!] gamemodes.
//!
//! ## Description
//!
//! Star ratings are derived from strain-based skills per gamemode and turned
//! into performance points (pp) through the gamemode's performance formula.
//! osu!standard maps can be calculated in any other gamemode as converts.
//!
//! ## Usage
//!
//! ```no_run
//! use akatsuki_pp::{Beatmap, OsuPP, OsuStars};
//!
//! // Decode the map
//! let map = Beatmap::from_path("./maps/example.osu").unwrap();
//!
//! // Calculate difficulty attributes
//! let diff_attrs = OsuStars::new(&map)
//!     .mods(8 + 16) // HDHR
//!     .calculate();
//!
//! let stars = diff_attrs.stars;
//!
//! // Calculate performance attributes
//! let perf_attrs = OsuPP::new(&map)
//!     // To speed up the calculation significantly, we can re-use the previous
//!     // attributes.
//!     // **Note** that this should only be done if the map, mode, mods, and
//!     // amount of passed objects stay the same. Otherwise, the resulting
//!     // attributes will be incorrect.
//!     .attributes(diff_attrs)
//!     .mods(24) // HDHR, same as before
//!     .combo(789)
//!     .accuracy(99.2)
//!     .misses(2)
//!     .calculate();
//!
//! println!("Stars: {stars} | PP: {}", perf_attrs.pp);
//! ```
//!
//! osu!standard scores with relax are valued by [`RelaxStars`] and [`RelaxPP`]
//! instead, which keep the 2019 algorithm.
//!
//! If the mode is only known at runtime, [`AnyStars`] and [`AnyPP`] dispatch
//! to the gamemode's calculator, relax included. [`Engine`] additionally checks
//! mods and play results and reports failures through [`Error`]:
//!
//! ```no_run
//! use akatsuki_pp::{Engine, GameMode, PerformanceRequest};
//!
//! let request = PerformanceRequest {
//!     mode: GameMode::Taiko,
//!     mods: 64, // DT
//!     max_combo: 420,
//!     accuracy: Some(97.5),
//!     miss_count: 3,
//!     ..Default::default()
//! };
//!
//! match Engine::new().from_path("./maps/example.osu", &request) {
//!     Ok(result) => println!("PP: {} | Stars: {}", result.pp, result.stars),
//!     Err(err) => eprintln!("{err}"),
//! }
//! ```
//!
//! ## Features
//!
//! | Flag | Description | Dependencies
//! | - | - | -
//! | `default` | No features |
//! | `async_tokio` | Beatmap parsing will be async through [tokio] | [`tokio`]
//! | `async_std` | Beatmap parsing will be async through [async-std] | [`async-std`]
//! | `serde` | Attributes, requests and results implement `Serialize` and `Deserialize` | [`serde`]
//!
//! Events are emitted through [`tracing`], no subscriber is installed by this crate.
//!
//! [osu!]: https://osu.ppy.sh/home
//! [tokio]: https://github.com/tokio-rs/tokio
//! [async-std]: https://github.com/async-rs/async-std
//! [`tokio`]: https://docs.rs/tokio
//! [`async-std`]: https://docs.rs/async-std
//! [`serde`]: https://docs.rs/serde
//! [`tracing`]: https://docs.rs/tracing

#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::missing_const_for_fn, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::struct_excessive_bools,
    clippy::match_same_arms,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::explicit_iter_loop,
    clippy::similar_names,
    clippy::cast_possible_wrap
)]

#[cfg(all(feature = "async_tokio", feature = "async_std"))]
compile_error!("Only one of the features `async_tokio` and `async_std` should be enabled");

/// Parsing `.osu` files into a [`Beatmap`].
pub mod parse;

/// Mod bit values and their validation.
pub mod mods;

mod any;
mod catch;
mod curve;
mod engine;
mod error;
mod limited_queue;
mod mania;
mod math_util;
mod osu;
mod relax;
mod taiko;

pub use self::{
    any::{AnyPP, AnyStars, AttributeProvider, DifficultyAttributes, PerformanceAttributes},
    catch::{
        CatchAttributeProvider, CatchDifficultyAttributes, CatchPP, CatchPerformanceAttributes,
        CatchScoreState, CatchStars,
    },
    engine::{
        CalculatePerformanceResult, CalculateScoreResult, Engine, EngineConfig,
        PerformanceRequest, ScoreRequest,
    },
    error::{Error, InvalidPlayResultError, Result},
    mania::{
        ManiaAttributeProvider, ManiaDifficultyAttributes, ManiaPP, ManiaPerformanceAttributes,
        ManiaScoreState, ManiaStars,
    },
    mods::{InvalidModError, ModConflictPolicy, Mods},
    osu::{
        OsuAttributeProvider, OsuDifficultyAttributes, OsuPP, OsuPerformanceAttributes,
        OsuScoreState, OsuStars,
    },
    parse::{Beatmap, GameMode, ParseError, Pos2},
    relax::{
        RelaxAttributeProvider, RelaxDifficultyAttributes, RelaxPP, RelaxPerformanceAttributes,
        RelaxStars,
    },
    taiko::{
        TaikoAttributeProvider, TaikoDifficultyAttributes, TaikoPP, TaikoPerformanceAttributes,
        TaikoScoreState, TaikoStars,
    },
};
