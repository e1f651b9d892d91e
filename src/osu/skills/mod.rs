mod aim;
mod flashlight;
mod speed;

use std::mem;

pub(crate) use self::{aim::Aim, flashlight::Flashlight, speed::Speed};

use crate::math_util::lerp;

use super::{difficulty_object::OsuDifficultyObject, SECTION_LEN};

/// Peak bookkeeping over fixed-length sections of clock-adjusted time.
#[derive(Clone, Debug, Default)]
pub(crate) struct StrainSections {
    peaks: Vec<f64>,
    curr_peak: f64,
    curr_end: f64,
}

impl StrainSections {
    /// All saved peaks plus the peak of the section in progress.
    fn into_peaks(mut self) -> Vec<f64> {
        self.peaks.push(self.curr_peak);

        self.peaks
    }
}

pub(crate) trait Skill: Sized {
    fn sections(&mut self) -> &mut StrainSections;

    fn strain_value_at(
        &mut self,
        curr: &OsuDifficultyObject<'_>,
        diff_objects: &[OsuDifficultyObject<'_>],
    ) -> f64;

    /// Strain at `time`, decayed from the previous object.
    fn initial_strain(
        &self,
        time: f64,
        curr: &OsuDifficultyObject<'_>,
        diff_objects: &[OsuDifficultyObject<'_>],
    ) -> f64;

    fn process(&mut self, curr: &OsuDifficultyObject<'_>, diff_objects: &[OsuDifficultyObject<'_>]) {
        // * The first object doesn't generate a strain, so we begin with an incremented section end
        if curr.idx == 0 {
            self.sections().curr_end = (curr.start_time / SECTION_LEN).ceil() * SECTION_LEN;
        }

        while curr.start_time > self.sections().curr_end {
            let section_end = self.sections().curr_end;

            // * The maximum strain of the new section is not zero by default
            // * This means we need to capture the strain level at the beginning of the new section,
            // * and use that as the initial peak level.
            let initial = self.initial_strain(section_end, curr, diff_objects);

            let sections = self.sections();
            sections.peaks.push(sections.curr_peak);
            sections.curr_peak = initial;
            sections.curr_end += SECTION_LEN;
        }

        let strain = self.strain_value_at(curr, diff_objects);
        let sections = self.sections();
        sections.curr_peak = sections.curr_peak.max(strain);
    }

    fn difficulty_value(self) -> f64;
}

/// Weighted sum of section peaks where the highest few peaks are
/// reduced to dampen short difficulty spikes.
pub(crate) fn reduced_difficulty_value(
    sections: &mut StrainSections,
    reduced_section_count: usize,
    difficulty_multiplier: f64,
) -> f64 {
    const REDUCED_STRAIN_BASELINE: f64 = 0.75;
    const DECAY_WEIGHT: f64 = 0.9;

    // * Sections with 0 strain are excluded to avoid worst-case time complexity of the following sort (e.g. /b/2351871).
    // * These sections will not contribute to the difficulty.
    let mut peaks = mem::take(sections).into_peaks();
    peaks.retain(|&peak| peak > 0.0);
    peaks.sort_unstable_by(|a, b| b.total_cmp(a));

    // * We are reducing the highest strains first to account for extreme difficulty spikes
    for (i, strain) in peaks.iter_mut().take(reduced_section_count).enumerate() {
        let clamped = (i as f64 / reduced_section_count as f64).clamp(0.0, 1.0);
        let scale = lerp(1.0, 10.0, clamped).log10();
        *strain *= lerp(REDUCED_STRAIN_BASELINE, 1.0, scale);
    }

    peaks.sort_unstable_by(|a, b| b.total_cmp(a));

    let mut difficulty = 0.0;
    let mut weight = 1.0;

    for strain in peaks {
        difficulty += strain * weight;
        weight *= DECAY_WEIGHT;
    }

    difficulty * difficulty_multiplier
}

/// Strain decay since the previous object, or since time zero for the first one.
fn decay_since_previous(
    decay_base: f64,
    time: f64,
    curr: &OsuDifficultyObject<'_>,
    diff_objects: &[OsuDifficultyObject<'_>],
) -> f64 {
    let prev_start = curr
        .previous(0, diff_objects)
        .map_or(0.0, |prev| prev.start_time);

    strain_decay(decay_base, time - prev_start)
}

#[inline]
fn strain_decay(decay_base: f64, ms: f64) -> f64 {
    decay_base.powf(ms / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduction_dampens_top_peaks() {
        let mut sections = StrainSections {
            peaks: vec![100.0; 20],
            curr_peak: 100.0,
            curr_end: 0.0,
        };

        let reduced = reduced_difficulty_value(&mut sections, 10, 1.0);
        let plain: f64 = (0..21).map(|i| 100.0 * 0.9_f64.powi(i)).sum();

        assert!(reduced < plain);
        assert!(reduced > 0.75 * plain);
    }

    #[test]
    fn empty_sections_are_zero() {
        let mut sections = StrainSections::default();

        assert!(reduced_difficulty_value(&mut sections, 10, 1.06).abs() < f64::EPSILON);
    }
}
