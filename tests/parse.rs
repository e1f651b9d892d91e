use akatsuki_pp::{
    parse::{HitObjectKind, ParseError},
    Beatmap, GameMode,
};

use self::common::*;

mod common;

#[test]
fn parse_osu() {
    assert_chart(test_map(GameMode::Osu), GameMode::Osu);
}

#[test]
fn parse_mania() {
    assert_chart(test_map(GameMode::Mania), GameMode::Mania);
}

#[test]
fn parse_from_path() {
    let path = chart_file(GameMode::Taiko);
    let map = Beatmap::from_path(&path).unwrap();
    let _ = std::fs::remove_file(path);

    assert_chart(map, GameMode::Taiko);
}

#[test]
fn missing_difficulty_section() {
    let err = Beatmap::from_bytes(b"osu file format v14\n\n[HitObjects]\n256,192,1000,1,0\n")
        .unwrap_err();

    assert!(matches!(err, ParseError::TruncatedData { .. }), "{err:?}");
}

#[test]
fn invalid_header() {
    let err = Beatmap::from_bytes(b"[General]\nMode: 0\n").unwrap_err();

    assert!(matches!(err, ParseError::MalformedHeader), "{err:?}");
}

#[test]
fn unsorted_objects_are_sorted() {
    let content = "osu file format v14

[Difficulty]
OverallDifficulty:5

[HitObjects]
256,192,2000,1,0
256,192,1000,1,0
256,192,1500,1,0
";

    let map = Beatmap::from_bytes(content.as_bytes()).unwrap();
    let times: Vec<_> = map.hit_objects.iter().map(|h| h.start_time).collect();

    assert_eq!(times, [1000.0, 1500.0, 2000.0]);
}

#[cfg(feature = "async_tokio")]
mod async_tokio {
    use tokio::runtime::Builder as RuntimeBuilder;

    use super::*;

    #[test]
    fn parse_osu() {
        let path = chart_file(GameMode::Osu);

        let map = RuntimeBuilder::new_current_thread()
            .build()
            .unwrap()
            .block_on(Beatmap::from_path_async(&path))
            .unwrap();

        let _ = std::fs::remove_file(path);

        assert_chart(map, GameMode::Osu);
    }

    #[test]
    fn engine_from_path() {
        let path = chart_file(GameMode::Catch);

        let req = akatsuki_pp::PerformanceRequest {
            mode: GameMode::Catch,
            max_combo: 50,
            ..Default::default()
        };

        let engine = akatsuki_pp::Engine::new();

        let async_result = RuntimeBuilder::new_current_thread()
            .build()
            .unwrap()
            .block_on(engine.from_path_async(&path, &req))
            .unwrap();

        let sync_result = engine.from_path(&path, &req).unwrap();
        let _ = std::fs::remove_file(path);

        assert_eq!(async_result, sync_result);
    }
}

#[cfg(feature = "async_std")]
mod async_std {
    use super::*;

    #[test]
    fn parse_osu() {
        let path = chart_file(GameMode::Osu);
        let map = ::async_std::task::block_on(Beatmap::from_path_async(path.as_path())).unwrap();
        let _ = std::fs::remove_file(path);

        assert_chart(map, GameMode::Osu);
    }
}

fn assert_chart(map: Beatmap, mode: GameMode) {
    assert_eq!(map.mode, mode);
    assert_eq!(map.version, 14);
    assert_eq!(map.hit_objects.len(), N_OBJECTS as usize);
    assert_eq!(map.n_circles + map.n_sliders + map.n_spinners, N_OBJECTS);
    assert_eq!(map.n_sliders, N_OBJECTS / 10);
    assert!((map.ar - 9.0).abs() <= f32::EPSILON);
    assert!((map.od - 8.0).abs() <= f32::EPSILON);
    assert!((map.hp - 6.0).abs() <= f32::EPSILON);
    assert!((map.slider_mult - 1.4).abs() <= f64::EPSILON);
    assert!((map.tick_rate - 1.0).abs() <= f64::EPSILON);
    assert!((map.stack_leniency - 0.7).abs() <= f32::EPSILON);
    assert_eq!(map.timing_points.len(), 1);
    assert_eq!(map.difficulty_points.len(), 1);

    let long_kind = |kind: &HitObjectKind| match mode {
        GameMode::Mania => matches!(kind, HitObjectKind::Hold { .. }),
        _ => matches!(kind, HitObjectKind::Slider { .. }),
    };

    assert!(map.hit_objects[9..].iter().step_by(10).all(|h| long_kind(&h.kind)));

    assert!(map
        .hit_objects
        .windows(2)
        .all(|pair| pair[0].start_time <= pair[1].start_time));
}
