mod attributes;
mod control_point;
mod error;
mod hitobject;
mod hitsound;
mod pos2;
mod reader;
mod sort;

pub use attributes::{BeatmapAttributes, BeatmapAttributesBuilder, BeatmapHitWindows};
pub use control_point::{DifficultyPoint, TimingPoint};
pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use hitobject::{HitObject, HitObjectKind, PathType};
pub use hitsound::HitSound;
pub use pos2::Pos2;

use std::{
    cmp::Ordering,
    fmt,
    fs::File,
    io::{BufReader, Read},
    path::Path,
    str::FromStr,
};

use reader::FileReader;

macro_rules! next_field {
    ($opt:expr, $what:literal) => {
        $opt.ok_or(ParseError::missing($what))?
    };
}

macro_rules! parse_float {
    ($s:expr) => {{
        let value: f64 = $s
            .trim()
            .parse()
            .map_err(|_| ParseError::invalid("invalid number"))?;

        if !value.is_finite() {
            return Err(ParseError::invalid("non-finite number"));
        }

        value
    }};
}

macro_rules! sort {
    ($slice:expr) => {
        $slice.sort_by(|p1, p2| p1.partial_cmp(p2).unwrap_or(Ordering::Equal))
    };
}

/// The four osu! rule sets.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameMode {
    #[default]
    Osu = 0,
    Taiko = 1,
    Catch = 2,
    Mania = 3,
}

impl TryFrom<u8> for GameMode {
    type Error = u8;

    #[inline]
    fn try_from(mode: u8) -> Result<Self, Self::Error> {
        match mode {
            0 => Ok(Self::Osu),
            1 => Ok(Self::Taiko),
            2 => Ok(Self::Catch),
            3 => Ok(Self::Mania),
            other => Err(other),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Osu => "osu!standard",
            Self::Taiko => "osu!taiko",
            Self::Catch => "osu!catch",
            Self::Mania => "osu!mania",
        };

        f.write_str(name)
    }
}

/// A parsed `.osu` file with everything required for difficulty and pp calculation.
#[derive(Clone, Debug, PartialEq)]
pub struct Beatmap {
    pub mode: GameMode,
    pub version: u32,
    /// `0` if the file doesn't specify one.
    pub beatmap_id: i32,
    pub creator: String,

    pub n_circles: u32,
    /// Amount of sliders, or holds for osu!mania charts.
    pub n_sliders: u32,
    pub n_spinners: u32,

    pub ar: f32,
    pub od: f32,
    pub cs: f32,
    pub hp: f32,
    pub slider_mult: f64,
    pub tick_rate: f64,
    pub stack_leniency: f32,

    pub hit_objects: Vec<HitObject>,
    pub timing_points: Vec<TimingPoint>,
    pub difficulty_points: Vec<DifficultyPoint>,
}

impl Default for Beatmap {
    fn default() -> Self {
        Self {
            mode: GameMode::Osu,
            version: Self::LATEST_VERSION,
            beatmap_id: 0,
            creator: String::new(),
            n_circles: 0,
            n_sliders: 0,
            n_spinners: 0,
            ar: 5.0,
            od: 5.0,
            cs: 5.0,
            hp: 5.0,
            slider_mult: 1.4,
            tick_rate: 1.0,
            stack_leniency: 0.7,
            hit_objects: Vec::new(),
            timing_points: Vec::new(),
            difficulty_points: Vec::new(),
        }
    }
}

impl Beatmap {
    /// Most recent `.osu` format version.
    pub const LATEST_VERSION: u32 = 14;

    const CIRCLE_FLAG: u32 = 1 << 0;
    const SLIDER_FLAG: u32 = 1 << 1;
    const SPINNER_FLAG: u32 = 1 << 3;
    const HOLD_FLAG: u32 = 1 << 7;

    const MAX_REPEATS: usize = 9000;

    /// Parse a beatmap from anything that can be read.
    pub fn parse<R: Read>(src: R) -> ParseResult<Self> {
        let mut reader = FileReader::new(BufReader::new(src));

        Self::parse_inner(&mut reader).map_err(|err| err.at_line(reader.line()))
    }

    /// Parse a beatmap from an in-memory `.osu` file.
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> ParseResult<Self> {
        let mut reader = FileReader::new(bytes);

        Self::parse_inner(&mut reader).map_err(|err| err.at_line(reader.line()))
    }

    /// Read and parse the `.osu` file at the given path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ParseResult<Self> {
        let file = File::open(path)?;

        Self::parse(file)
    }

    /// Read and parse the `.osu` file at the given path.
    #[cfg(feature = "async_tokio")]
    pub async fn from_path_async<P: AsRef<Path>>(path: P) -> ParseResult<Self> {
        let bytes = tokio::fs::read(path).await?;

        Self::from_bytes(&bytes)
    }

    /// Read and parse the `.osu` file at the given path.
    #[cfg(feature = "async_std")]
    pub async fn from_path_async<P: AsRef<async_std::path::Path>>(path: P) -> ParseResult<Self> {
        let bytes = async_std::fs::read(path).await?;

        Self::from_bytes(&bytes)
    }

    fn parse_inner<R: std::io::BufRead>(reader: &mut FileReader<R>) -> ParseResult<Self> {
        let version = loop {
            if !reader.next_line()? {
                return Err(ParseError::MalformedHeader);
            }

            match reader.version() {
                Some(Some(version)) => break version,
                Some(None) => return Err(ParseError::MalformedHeader),
                None if reader.is_initial_empty_line() => continue,
                None => return Err(ParseError::MalformedHeader),
            }
        };

        if version == 0 || version > Self::LATEST_VERSION {
            return Err(ParseError::UnsupportedVersion { version });
        }

        let mut state = ParseState::new(version);
        let mut section = Section::None;

        while reader.next_line()? {
            if let Some(bytes) = reader.get_section() {
                section = Section::from_bytes(bytes);
                state.seen(section);

                continue;
            }

            match section {
                Section::General => {
                    if let Some((key, value)) = reader.split_colon() {
                        state.general(key, value)?;
                    }
                }
                Section::Metadata => {
                    if let Some((key, value)) = reader.split_colon() {
                        state.metadata(key, value);
                    }
                }
                Section::Difficulty => {
                    if let Some((key, value)) = reader.split_colon() {
                        state.difficulty(key, value)?;
                    }
                }
                Section::TimingPoints => {
                    let line = reader
                        .get_line()
                        .ok_or(ParseError::invalid("timing point is not valid UTF-8"))?;

                    state.timing_point(line)?;
                }
                Section::HitObjects => {
                    let line = reader
                        .get_line()
                        .ok_or(ParseError::invalid("hit object is not valid UTF-8"))?;

                    state.hit_object(line)?;
                }
                Section::None => {}
            }
        }

        let map = state.finish()?;

        tracing::debug!(
            mode = ?map.mode,
            version = map.version,
            objects = map.hit_objects.len(),
            timing_points = map.timing_points.len(),
            "Parsed beatmap"
        );

        Ok(map)
    }

    /// Start of the most recent uninherited timing point at the given time.
    pub fn timing_point_at(&self, time: f64) -> TimingPoint {
        let idx = self.timing_points.partition_point(|p| p.time <= time);

        match idx.checked_sub(1) {
            Some(idx) => self.timing_points[idx],
            // Objects before the first timing point use the first one
            None => self.timing_points.first().copied().unwrap_or_default(),
        }
    }

    /// Slider velocity multiplier active at the given time.
    pub fn difficulty_point_at(&self, time: f64) -> DifficultyPoint {
        let idx = self.difficulty_points.partition_point(|p| p.time <= time);

        idx.checked_sub(1)
            .map_or_else(DifficultyPoint::default, |idx| self.difficulty_points[idx])
    }

    /// Builder for mod-adjusted difficulty settings.
    #[inline]
    pub fn attributes(&self) -> BeatmapAttributesBuilder {
        BeatmapAttributesBuilder::new(self)
    }
}

struct ParseState {
    map: Beatmap,
    offset: f64,
    ar: Option<f32>,
    seen_difficulty: bool,
    seen_hit_objects: bool,
    unsorted_timings: bool,
    unsorted_difficulties: bool,
    unsorted_hits: bool,
}

impl ParseState {
    fn new(version: u32) -> Self {
        // * Version 4 and lower had an incorrect offset (stable has this set as 24ms off)
        let offset = if version < 5 { 24.0 } else { 0.0 };

        Self {
            map: Beatmap {
                version,
                ..Beatmap::default()
            },
            offset,
            ar: None,
            seen_difficulty: false,
            seen_hit_objects: false,
            unsorted_timings: false,
            unsorted_difficulties: false,
            unsorted_hits: false,
        }
    }

    fn seen(&mut self, section: Section) {
        match section {
            Section::Difficulty => self.seen_difficulty = true,
            Section::HitObjects => self.seen_hit_objects = true,
            Section::General | Section::Metadata | Section::TimingPoints | Section::None => {}
        }
    }

    fn general(&mut self, key: &[u8], value: &str) -> ParseResult<()> {
        match key {
            b"Mode" => {
                self.map.mode = value
                    .parse::<u8>()
                    .ok()
                    .and_then(|mode| GameMode::try_from(mode).ok())
                    .ok_or(ParseError::invalid("invalid mode"))?;
            }
            b"StackLeniency" => self.map.stack_leniency = parse_float!(value) as f32,
            _ => {}
        }

        Ok(())
    }

    // Metadata is informational, malformed values are ignored
    fn metadata(&mut self, key: &[u8], value: &str) {
        match key {
            b"BeatmapID" => self.map.beatmap_id = value.parse().unwrap_or(0),
            b"Creator" => self.map.creator = value.to_owned(),
            _ => {}
        }
    }

    fn difficulty(&mut self, key: &[u8], value: &str) -> ParseResult<()> {
        match key {
            b"ApproachRate" => self.ar = Some(parse_float!(value) as f32),
            b"OverallDifficulty" => self.map.od = parse_float!(value) as f32,
            b"CircleSize" => self.map.cs = parse_float!(value) as f32,
            b"HPDrainRate" => self.map.hp = parse_float!(value) as f32,
            b"SliderMultiplier" => self.map.slider_mult = parse_float!(value).clamp(0.4, 3.6),
            b"SliderTickRate" => self.map.tick_rate = parse_float!(value).clamp(0.5, 8.0),
            _ => {}
        }

        Ok(())
    }

    fn timing_point(&mut self, line: &str) -> ParseResult<()> {
        let mut split = line.split(',');

        let time = self.offset + parse_float!(next_field!(split.next(), "timing point time"));
        let beat_len = parse_float!(next_field!(split.next(), "timing point beat length"));

        let uninherited = split.nth(4).map_or(true, |value| value.trim() != "0");

        if uninherited && beat_len > 0.0 {
            if self
                .map
                .timing_points
                .last()
                .map_or(false, |prev| time < prev.time)
            {
                self.unsorted_timings = true;
            }

            self.map.timing_points.push(TimingPoint {
                time,
                beat_len: beat_len.clamp(6.0, 60_000.0),
            });
        }

        let point = if beat_len < 0.0 {
            DifficultyPoint::from_beat_len(time, beat_len)
        } else {
            // * Uninherited points reset the slider velocity
            DifficultyPoint {
                time,
                slider_vel: 1.0,
            }
        };

        if self
            .map
            .difficulty_points
            .last()
            .map_or(false, |prev| time < prev.time)
        {
            self.unsorted_difficulties = true;
        }

        self.map.difficulty_points.push(point);

        Ok(())
    }

    fn hit_object(&mut self, line: &str) -> ParseResult<()> {
        let mut split = line.split(',');

        let pos = Pos2 {
            x: parse_float!(next_field!(split.next(), "hit object x")) as f32,
            y: parse_float!(next_field!(split.next(), "hit object y")) as f32,
        };

        let start_time = self.offset + parse_float!(next_field!(split.next(), "hit object time"));

        let kind: u32 = next_field!(split.next(), "hit object type")
            .trim()
            .parse()
            .map_err(|_| ParseError::invalid("invalid hit object type"))?;

        let sound = split
            .next()
            .map(|sound| sound.trim().parse::<u32>())
            .transpose()
            .map_err(|_| ParseError::invalid("invalid hitsound"))?
            .map_or(0, |sound| (sound & 0xFF) as u8);

        let kind = if kind & Beatmap::CIRCLE_FLAG > 0 {
            self.map.n_circles += 1;

            HitObjectKind::Circle
        } else if kind & Beatmap::SLIDER_FLAG > 0 {
            self.map.n_sliders += 1;

            self.slider(pos, &mut split)?
        } else if kind & Beatmap::SPINNER_FLAG > 0 {
            self.map.n_spinners += 1;
            let end_time = self.offset + parse_float!(next_field!(split.next(), "spinner end"));

            HitObjectKind::Spinner {
                end_time: end_time.max(start_time),
            }
        } else if kind & Beatmap::HOLD_FLAG > 0 {
            self.map.n_sliders += 1;

            let end_time = match split.next().and_then(|rest| rest.split(':').next()) {
                Some(end) if !end.trim().is_empty() => self.offset + parse_float!(end),
                _ => start_time,
            };

            HitObjectKind::Hold {
                end_time: end_time.max(start_time),
            }
        } else {
            return Err(ParseError::invalid("unknown hit object type"));
        };

        if self
            .map
            .hit_objects
            .last()
            .map_or(false, |prev| start_time < prev.start_time)
        {
            self.unsorted_hits = true;
        }

        self.map.hit_objects.push(HitObject {
            pos,
            start_time,
            kind,
            sound,
        });

        Ok(())
    }

    fn slider<'a>(
        &self,
        pos: Pos2,
        split: &mut impl Iterator<Item = &'a str>,
    ) -> ParseResult<HitObjectKind> {
        let mut curve_point_iter = next_field!(split.next(), "slider curve").split('|');
        let mut path_type = PathType::from_str(next_field!(curve_point_iter.next(), "path type"))?;

        let mut curve_points = Vec::with_capacity(8);
        curve_points.push(pos);

        for point in curve_point_iter {
            let mut v = point.split(':').map(|n| n.trim().parse::<f32>());

            match (v.next(), v.next()) {
                (Some(Ok(x)), Some(Ok(y))) if x.is_finite() && y.is_finite() => {
                    curve_points.push(Pos2 { x, y });
                }
                _ => return Err(ParseError::invalid("invalid curve point")),
            }
        }

        if self.map.version <= 6 && curve_points.len() >= 2 {
            if path_type == PathType::Linear {
                path_type = PathType::Bezier;
            }

            if curve_points.len() == 3 && (pos == curve_points[1] || pos == curve_points[2]) {
                path_type = PathType::Linear;
            }
        }

        let slides: usize = next_field!(split.next(), "slider repeat count")
            .trim()
            .parse()
            .map_err(|_| ParseError::invalid("invalid slider repeat count"))?;

        let repeats = slides.saturating_sub(1);

        if repeats > Beatmap::MAX_REPEATS {
            return Err(ParseError::invalid("repeat count is way too high"));
        }

        let pixel_len = match split.next() {
            Some(len) if !len.trim().is_empty() => parse_float!(len),
            _ => 0.0,
        };

        Ok(HitObjectKind::Slider {
            pixel_len,
            repeats,
            curve_points,
            path_type,
        })
    }

    fn finish(mut self) -> ParseResult<Beatmap> {
        if !self.seen_difficulty {
            return Err(ParseError::missing("[Difficulty] section"));
        }

        if !self.seen_hit_objects {
            return Err(ParseError::missing("[HitObjects] section"));
        }

        let mut map = self.map;
        map.ar = self.ar.unwrap_or(map.od);

        if self.unsorted_timings {
            sort!(map.timing_points);
        }

        if self.unsorted_difficulties {
            sort!(map.difficulty_points);
        }

        if map.mode == GameMode::Mania {
            sort::legacy_sort(&mut map.hit_objects);
        } else if self.unsorted_hits {
            sort!(map.hit_objects);
        }

        Ok(map)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Section {
    None,
    General,
    Metadata,
    Difficulty,
    TimingPoints,
    HitObjects,
}

impl Section {
    #[inline]
    fn from_bytes(bytes: &[u8]) -> Self {
        match bytes {
            b"General" => Self::General,
            b"Metadata" => Self::Metadata,
            b"Difficulty" => Self::Difficulty,
            b"TimingPoints" => Self::TimingPoints,
            b"HitObjects" => Self::HitObjects,
            _ => Self::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = "osu file format v14

[General]
AudioFilename: audio.mp3
Mode: 0
StackLeniency: 0.5

[Metadata]
Title:Something
Creator:Someone
BeatmapID:1808605

[Difficulty]
HPDrainRate:6
CircleSize:4
OverallDifficulty:8
ApproachRate:9
SliderMultiplier:1.8
SliderTickRate:1

[TimingPoints]
1000,500,4,2,0,60,1,0
2000,-50,4,2,0,60,0,0

[HitObjects]
256,192,1000,1,0,0:0:0:0:
100,100,1500,2,0,B|200:100|200:200,2,180
256,192,2500,12,0,3500,0:0:0:0:
";

    fn parse(input: &str) -> ParseResult<Beatmap> {
        Beatmap::from_bytes(input.as_bytes())
    }

    #[test]
    fn parses_sections() {
        let map = parse(MAP).unwrap();

        assert_eq!(map.mode, GameMode::Osu);
        assert_eq!(map.version, 14);
        assert_eq!(map.beatmap_id, 1_808_605);
        assert_eq!(map.creator, "Someone");
        assert_eq!((map.n_circles, map.n_sliders, map.n_spinners), (1, 1, 1));
        assert!((map.ar - 9.0).abs() < f32::EPSILON);
        assert!((map.od - 8.0).abs() < f32::EPSILON);
        assert!((map.stack_leniency - 0.5).abs() < f32::EPSILON);
        assert_eq!(map.timing_points.len(), 1);
        assert_eq!(map.difficulty_points.len(), 2);
        assert!((map.difficulty_point_at(2500.0).slider_vel - 2.0).abs() < f64::EPSILON);

        match &map.hit_objects[1].kind {
            HitObjectKind::Slider {
                repeats,
                curve_points,
                path_type,
                pixel_len,
            } => {
                assert_eq!(*repeats, 1);
                assert_eq!(curve_points.len(), 3);
                assert_eq!(*path_type, PathType::Bezier);
                assert!((pixel_len - 180.0).abs() < f64::EPSILON);
            }
            other => panic!("expected slider, got {other:?}"),
        }

        assert!((map.hit_objects[2].end_time() - 3500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parsing_is_deterministic() {
        assert_eq!(parse(MAP).unwrap(), parse(MAP).unwrap());
    }

    #[test]
    fn missing_header() {
        let err = parse("[General]\nMode: 0\n").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::MalformedHeader);
    }

    #[test]
    fn unsupported_version() {
        let err = parse("osu file format v15\n").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::UnsupportedVersion);
    }

    #[test]
    fn missing_required_section() {
        let input = MAP.split("[HitObjects]").next().unwrap();
        let err = parse(input).unwrap_err();

        assert_eq!(err.kind(), ParseErrorKind::TruncatedData);
    }

    #[test]
    fn truncated_hit_object() {
        let input = format!("{MAP}256,192\n");
        let err = parse(&input).unwrap_err();

        assert!(matches!(err, ParseError::TruncatedData { line: 29, .. }), "{err:?}");
    }

    #[test]
    fn invalid_object_syntax() {
        let input = format!("{MAP}256,192,abc,1,0\n");
        let err = parse(&input).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::InvalidObjectSyntax);

        let input = format!("{MAP}256,192,4000,64,0\n");
        let err = parse(&input).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::InvalidObjectSyntax);
    }

    #[test]
    fn tolerates_unknown_sections() {
        let input = format!("\u{feff}\n{MAP}\n[Colours]\nCombo1 : 255,0,0\n[Future]\nwhatever\n");
        let map = parse(&input).unwrap();

        assert_eq!(map.hit_objects.len(), 3);
    }

    #[test]
    fn old_versions_are_offset() {
        let input = MAP.replace("v14", "v4");
        let map = parse(&input).unwrap();

        assert!((map.hit_objects[0].start_time - 1024.0).abs() < f64::EPSILON);
        assert!((map.timing_points[0].time - 1024.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sorts_objects() {
        let input = format!("{MAP}64,64,500,1,0\n");
        let map = parse(&input).unwrap();

        assert!(map
            .hit_objects
            .windows(2)
            .all(|w| w[0].start_time <= w[1].start_time));
    }

    #[test]
    fn approach_rate_defaults_to_od() {
        let input = MAP.replace("ApproachRate:9\n", "");
        let map = parse(&input).unwrap();

        assert!((map.ar - map.od).abs() < f32::EPSILON);
    }
}
