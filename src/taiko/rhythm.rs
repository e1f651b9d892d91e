/// Ratio between the current and previous note spacing, weighted by how
/// awkward it is to play.
#[derive(Copy, Clone, Debug)]
pub(crate) struct HitObjectRhythm {
    id: u8,
    ratio: f64,
    pub(crate) difficulty: f64,
}

impl PartialEq for HitObjectRhythm {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for HitObjectRhythm {}

#[rustfmt::skip]
static COMMON_RHYTHMS: [HitObjectRhythm; 9] = [
    HitObjectRhythm { id: 0, ratio: 1.0, difficulty: 0.0 },
    HitObjectRhythm { id: 1, ratio: 2.0 / 1.0, difficulty: 0.3 },
    HitObjectRhythm { id: 2, ratio: 1.0 / 2.0, difficulty: 0.5 },
    HitObjectRhythm { id: 3, ratio: 3.0 / 1.0, difficulty: 0.3 },
    HitObjectRhythm { id: 4, ratio: 1.0 / 3.0, difficulty: 0.35 },
    // * purposefully higher (requires hand switch in full alternating gameplay style)
    HitObjectRhythm { id: 5, ratio: 3.0 / 2.0, difficulty: 0.6 },
    HitObjectRhythm { id: 6, ratio: 2.0 / 3.0, difficulty: 0.4 },
    HitObjectRhythm { id: 7, ratio: 5.0 / 4.0, difficulty: 0.5 },
    HitObjectRhythm { id: 8, ratio: 4.0 / 5.0, difficulty: 0.7 },
];

/// The common rhythm closest to `delta / prev_delta`.
pub(crate) fn closest_rhythm(delta: f64, prev_delta: f64) -> &'static HitObjectRhythm {
    let ratio = delta / prev_delta;
    let dist = |rhythm: &HitObjectRhythm| (rhythm.ratio - ratio).abs();

    COMMON_RHYTHMS
        .iter()
        .reduce(|best, rhythm| {
            if dist(rhythm) < dist(best) {
                rhythm
            } else {
                best
            }
        })
        .unwrap_or(&COMMON_RHYTHMS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_nearest_ratio() {
        assert_eq!(closest_rhythm(100.0, 100.0).id, 0);
        assert_eq!(closest_rhythm(200.0, 100.0).id, 1);
        assert_eq!(closest_rhythm(150.0, 100.0).id, 5);
        assert_eq!(closest_rhythm(80.0, 100.0).id, 8);
    }

    #[test]
    fn unchanged_rhythm_is_free() {
        assert!(closest_rhythm(125.0, 125.0).difficulty.abs() < f64::EPSILON);
    }

    #[test]
    fn zero_spacing_falls_back_to_first() {
        assert_eq!(closest_rhythm(0.0, 0.0).id, 0);
    }
}
