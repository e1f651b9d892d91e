use crate::parse::{HitObject, HitSound};

use super::rhythm::{closest_rhythm, HitObjectRhythm};

/// Which drum a hit has to be played on.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum HitType {
    Centre,
    Rim,
}

impl HitType {
    /// `None` for drum rolls and swells, including converted sliders and spinners.
    fn of(h: &HitObject) -> Option<Self> {
        if !h.is_circle() {
            None
        } else if h.sound.is_rim() {
            Some(Self::Rim)
        } else {
            Some(Self::Centre)
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct TaikoDifficultyObject<'o> {
    pub(crate) idx: usize,
    pub(crate) start_time: f64,
    pub(crate) delta: f64,
    pub(crate) hit_type: Option<HitType>,
    pub(crate) last_is_hit: bool,
    pub(crate) rhythm: &'static HitObjectRhythm,
    pub(crate) stamina_cheese: bool,
    pub(crate) base: &'o HitObject,
}

impl<'o> TaikoDifficultyObject<'o> {
    /// `idx` is the index of `base` within the chart's hit objects.
    pub(crate) fn new(
        base: &'o HitObject,
        last: &HitObject,
        last_last: &HitObject,
        clock_rate: f64,
        idx: usize,
    ) -> Self {
        let delta = (base.start_time - last.start_time) / clock_rate;
        let prev_delta = (last.start_time - last_last.start_time) / clock_rate;

        Self {
            idx,
            start_time: base.start_time / clock_rate,
            delta,
            hit_type: HitType::of(base),
            last_is_hit: last.is_circle(),
            rhythm: closest_rhythm(delta, prev_delta),
            stamina_cheese: false,
            base,
        }
    }

    #[inline]
    pub(crate) const fn is_hit(&self) -> bool {
        self.hit_type.is_some()
    }
}
