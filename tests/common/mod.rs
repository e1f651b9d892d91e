#![allow(unused)]

use std::{
    fmt::Write,
    fs,
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
};

use akatsuki_pp::{Beatmap, GameMode};

pub use self::mods::*;

/// Amount of hit objects in every test chart.
pub const N_OBJECTS: u32 = 100;

pub const ALL_MODES: [GameMode; 4] = [
    GameMode::Osu,
    GameMode::Taiko,
    GameMode::Catch,
    GameMode::Mania,
];

/// Bit values for mods
mod mods {
    pub const NM: u32 = 0;
    pub const NF: u32 = 1 << 0;
    pub const EZ: u32 = 1 << 1;
    pub const HD: u32 = 1 << 3;
    pub const HR: u32 = 1 << 4;
    pub const DT: u32 = 1 << 6;
    pub const RX: u32 = 1 << 7;
    pub const HT: u32 = 1 << 8;
    pub const FL: u32 = 1 << 10;
    pub const K4: u32 = 1 << 15;
}

/// Content of a `.osu` file with [`N_OBJECTS`] objects.
///
/// Every tenth object is a slider, or a hold note for osu!mania.
/// Every third circle has a clap so that osu!taiko has both colours.
pub fn chart(mode: GameMode) -> String {
    let mut chart = String::from("osu file format v14\n\n[General]\n");
    let _ = writeln!(chart, "Mode: {}", mode as u8);
    chart.push_str("StackLeniency: 0.7\n\n");

    let cs = if mode == GameMode::Mania { 4.0 } else { 4.2 };

    chart.push_str("[Difficulty]\nHPDrainRate:6\n");
    let _ = writeln!(chart, "CircleSize:{cs}");
    chart.push_str(
        "OverallDifficulty:8\nApproachRate:9\nSliderMultiplier:1.4\nSliderTickRate:1\n\n",
    );

    chart.push_str("[TimingPoints]\n0,400,4,2,0,50,1,0\n\n[HitObjects]\n");

    const XS: [u32; 4] = [96, 256, 416, 256];
    const YS: [u32; 4] = [192, 96, 192, 288];

    for i in 0..N_OBJECTS {
        let time = 1000 + i * 300;
        let sound = if i % 3 == 0 { 8 } else { 0 };
        let is_long = i % 10 == 9;

        let _ = match mode {
            GameMode::Mania => {
                let x = 64 + (i % 4) * 128;

                if is_long {
                    writeln!(chart, "{x},192,{time},128,0,{}:0:0:0:0:", time + 150)
                } else {
                    writeln!(chart, "{x},192,{time},1,{sound},0:0:0:0:")
                }
            }
            _ => {
                let x = XS[(i % 4) as usize];
                let y = YS[(i % 4) as usize];

                if is_long {
                    writeln!(chart, "{x},{y},{time},2,0,L|{}:{y},1,60", x + 60)
                } else {
                    writeln!(chart, "{x},{y},{time},1,{sound},0:0:0:0:")
                }
            }
        };
    }

    chart
}

pub fn test_map(mode: GameMode) -> Beatmap {
    Beatmap::from_bytes(chart(mode).as_bytes()).unwrap()
}

/// Write the chart into a new file of the temp directory.
pub fn chart_file(mode: GameMode) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    let name = format!(
        "akatsuki-pp-{}-{}-{}.osu",
        std::process::id(),
        mode as u8,
        COUNTER.fetch_add(1, Ordering::Relaxed)
    );

    let path = std::env::temp_dir().join(name);
    fs::write(&path, chart(mode)).unwrap();

    path
}

#[track_caller]
pub fn assert_eq_float<F: Float>(a: F, b: F) {
    assert!((a - b).abs() < F::EPSILON, "{a} != {b}")
}

#[track_caller]
pub fn assert_close(a: f64, b: f64, tolerance: f64) {
    assert!((a - b).abs() <= tolerance, "{a} != {b} (tolerance {tolerance})")
}

/// Trait to provide flexibility in the `assert_eq_float` function.
pub trait Float:
    Copy + std::fmt::Display + std::ops::Sub<Output = Self> + PartialOrd + Sized
{
    const EPSILON: Self;

    fn abs(self) -> Self;
}

macro_rules! impl_float {
    ( $( $ty:ty )* ) => {
        $(
            impl Float for $ty {
                const EPSILON: Self = Self::EPSILON;

                fn abs(self) -> Self {
                    self.abs()
                }
            }
        )*
    }
}

impl_float!(f32 f64);
