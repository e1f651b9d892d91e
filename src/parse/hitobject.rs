use std::{cmp::Ordering, str::FromStr};

use super::{ParseError, Pos2};

/// Hit object as it appears in the `[HitObjects]` section.
///
/// Every mode interprets these differently.
#[derive(Clone, Debug, PartialEq)]
pub struct HitObject {
    pub pos: Pos2,
    pub start_time: f64,
    pub kind: HitObjectKind,
    pub sound: u8,
}

impl HitObject {
    /// End time of spinners and holds, start time for everything else.
    ///
    /// Slider durations depend on timing points so they are resolved per mode.
    #[inline]
    pub fn end_time(&self) -> f64 {
        match &self.kind {
            HitObjectKind::Circle | HitObjectKind::Slider { .. } => self.start_time,
            HitObjectKind::Spinner { end_time } | HitObjectKind::Hold { end_time } => *end_time,
        }
    }

    #[inline]
    pub fn is_circle(&self) -> bool {
        matches!(self.kind, HitObjectKind::Circle)
    }

    #[inline]
    pub fn is_slider(&self) -> bool {
        matches!(self.kind, HitObjectKind::Slider { .. })
    }

    #[inline]
    pub fn is_spinner(&self) -> bool {
        matches!(self.kind, HitObjectKind::Spinner { .. })
    }

    #[inline]
    pub fn is_hold(&self) -> bool {
        matches!(self.kind, HitObjectKind::Hold { .. })
    }
}

impl PartialOrd for HitObject {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.start_time.partial_cmp(&other.start_time)
    }
}

/// Type specific data of a [`HitObject`].
#[derive(Clone, Debug, PartialEq)]
pub enum HitObjectKind {
    Circle,
    Slider {
        /// Length of the path in osu!pixels as stated in the file.
        pixel_len: f64,
        /// Amount of reverse arrows.
        repeats: usize,
        /// Control points, starting with the head position.
        curve_points: Vec<Pos2>,
        path_type: PathType,
    },
    Spinner {
        end_time: f64,
    },
    Hold {
        end_time: f64,
    },
}

/// Shape of a slider path.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PathType {
    Catmull,
    Bezier,
    Linear,
    PerfectCurve,
}

impl FromStr for PathType {
    type Err = ParseError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(Self::Linear),
            "C" => Ok(Self::Catmull),
            "B" => Ok(Self::Bezier),
            "P" => Ok(Self::PerfectCurve),
            _ => Err(ParseError::InvalidObjectSyntax {
                line: 0,
                reason: "unknown slider path type",
            }),
        }
    }
}
