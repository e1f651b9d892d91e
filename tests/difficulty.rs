use akatsuki_pp::{CatchStars, GameMode, ManiaStars, OsuStars, RelaxStars, TaikoStars};

use self::common::*;

mod common;

macro_rules! test_cases {
    ( $stars:ident: $mode:ident {
        $( $( $mods:ident )+ => {
            $( $key:ident: $value:literal $( , )? )*
        } ;)*
    } ) => {
        let map = test_map(GameMode::$mode);

        $(
            let mods = 0 $( + $mods )*;
            let attrs = $stars::new(&map).mods(mods).calculate();

            $(
                check(mods, stringify!($key), f64::from(attrs.$key), f64::from($value));
            )*
        )*
    };
}

/// Relative tolerance for the f32 parts of the calculations.
const TOLERANCE: f64 = 1e-5;

#[track_caller]
fn check(mods: u32, key: &str, actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= expected.abs() * TOLERANCE,
        "{key} (mods {mods}): {actual} != {expected}"
    );
}

#[test]
fn osu() {
    test_cases! {
        OsuStars: Osu {
            NM => {
                stars: 3.6997184995034473,
                aim: 2.0844154108098705,
                speed: 1.195922454537017,
                slider_factor: 0.9928405159084998,
                speed_note_count: 97.08691510413955,
                ar: 9.0,
                od: 8.0,
                n_circles: 90_u32,
                n_sliders: 10_u32,
                max_combo: 110_u32,
            };
            HD HR => {
                stars: 4.004898051324533,
                aim: 2.2803916900431065,
                speed: 1.196362718705026,
                slider_factor: 0.9899778519479647,
                speed_note_count: 97.16576366049725,
                ar: 10.0,
                od: 10.0,
                max_combo: 110_u32,
            };
            DT => {
                stars: 5.229512836558765,
                aim: 2.9362266681170173,
                speed: 1.733957607683157,
                slider_factor: 0.9957317229600406,
                speed_note_count: 96.07044321890646,
                ar: 10.333333333333332,
                od: 9.777777777777779,
                max_combo: 110_u32,
            };
        }
    };
}

#[test]
fn relax() {
    test_cases! {
        RelaxStars: Osu {
            RX => {
                stars: 3.530679702758789,
                aim_strain: 1.9218896627426147,
                speed_strain: 1.2956907749176025,
                ar: 9.0,
                od: 8.0,
                n_circles: 90_u32,
                n_sliders: 10_u32,
                max_combo: 110_u32,
            };
            RX HD HR => {
                stars: 3.833512783050537,
                aim_strain: 2.1237783432006836,
                speed_strain: 1.2956907749176025,
                ar: 10.0,
                od: 10.0,
                max_combo: 110_u32,
            };
            RX DT => {
                stars: 5.019456386566162,
                aim_strain: 2.719475269317627,
                speed_strain: 1.8804872035980225,
                ar: 10.333333333333332,
                od: 9.777777777777779,
                max_combo: 110_u32,
            };
        }
    };
}

#[test]
fn taiko() {
    test_cases! {
        TaikoStars: Taiko {
            NM => {
                stars: 2.1321524840647434,
                stamina: 0.9223733918718904,
                rhythm: 0.014,
                colour: 0.15155719004026064,
                peak: 0.9298740443080044,
                hit_window: 26.0,
                max_combo: 90_u32,
            };
            HD HR => {
                stars: 2.1321524840647434,
                stamina: 0.9223733918718904,
                colour: 0.15155719004026064,
                hit_window: 20.0,
                max_combo: 90_u32,
            };
            DT => {
                stars: 2.7381255897168306,
                stamina: 1.230684193833987,
                rhythm: 0.014,
                colour: 0.16966734869986483,
                peak: 1.2380523310406684,
                hit_window: 17.333333333333332,
                max_combo: 90_u32,
            };
        }
    };
}

#[test]
fn catch() {
    test_cases! {
        CatchStars: Catch {
            NM => {
                stars: 2.4849351572128975,
                ar: 9.0,
                n_fruits: 110_u32,
                n_tiny_droplets: 10_u32,
            };
            HD HR => {
                stars: 2.700838543631935,
                ar: 10.0,
                n_fruits: 110_u32,
                n_tiny_droplets: 10_u32,
            };
            DT => {
                stars: 3.497022102240195,
                ar: 10.333333333333332,
                n_fruits: 110_u32,
                n_tiny_droplets: 10_u32,
            };
        }
    };
}

#[test]
fn mania() {
    test_cases! {
        ManiaStars: Mania {
            NM => {
                stars: 0.9856705148591061,
                hit_window: 40.0,
                n_objects: 100_u32,
                max_combo: 110_u32,
            };
            HD HR => {
                stars: 0.9856705148591061,
                hit_window: 29.0,
                n_objects: 100_u32,
            };
            DT => {
                stars: 1.2777816683805492,
                hit_window: 27.0,
                n_objects: 100_u32,
            };
        }
    };
}

#[test]
fn converts_match_their_mode() {
    let osu = test_map(GameMode::Osu);

    for mods in [NM, HD | HR, DT] {
        let taiko = TaikoStars::new(&test_map(GameMode::Taiko)).mods(mods).calculate();
        let converted = TaikoStars::new(&osu).mods(mods).calculate();

        check(mods, "taiko stars", converted.stars, taiko.stars);
        assert!(converted.is_convert);

        let catch = CatchStars::new(&test_map(GameMode::Catch)).mods(mods).calculate();
        let converted = CatchStars::new(&osu).mods(mods).calculate();

        check(mods, "catch stars", converted.stars, catch.stars);
        assert!(converted.is_convert);
    }
}
