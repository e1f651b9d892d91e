use super::{difficulty_object::ManiaDifficultyObject, SECTION_LEN};

const INDIVIDUAL_DECAY_BASE: f64 = 0.125;
const OVERALL_DECAY_BASE: f64 = 0.3;
const RELEASE_THRESHOLD: f64 = 24.0;
const DECAY_WEIGHT: f64 = 0.9;

/// Strain of each column individually plus the strain of all columns combined.
#[derive(Clone, Debug)]
pub(crate) struct Strain {
    start_times: Vec<f64>,
    end_times: Vec<f64>,
    individual_strains: Vec<f64>,

    individual_strain: f64,
    overall_strain: f64,

    curr_strain: f64,
    curr_section_peak: f64,
    curr_section_end: f64,
    prev_time: f64,
    strain_peaks: Vec<f64>,
}

impl Strain {
    pub(crate) fn new(total_columns: usize) -> Self {
        Self {
            start_times: vec![0.0; total_columns],
            end_times: vec![0.0; total_columns],
            individual_strains: vec![0.0; total_columns],
            individual_strain: 0.0,
            overall_strain: 1.0,
            curr_strain: 0.0,
            curr_section_peak: 0.0,
            curr_section_end: 0.0,
            prev_time: 0.0,
            strain_peaks: Vec::new(),
        }
    }

    pub(crate) fn process(&mut self, curr: &ManiaDifficultyObject) {
        // * The first object doesn't generate a strain, so we begin with an incremented section end
        if curr.idx == 0 {
            self.curr_section_end = (curr.start_time / SECTION_LEN).ceil() * SECTION_LEN;
        }

        while curr.start_time > self.curr_section_end {
            self.strain_peaks.push(self.curr_section_peak);
            self.curr_section_peak = self.initial_strain(self.curr_section_end);
            self.curr_section_end += SECTION_LEN;
        }

        // * By subtracting CurrentStrain, this skill effectively only considers the maximum strain of any one hitobject within each strain section.
        self.curr_strain = self.strain_value_of(curr);
        self.curr_section_peak = self.curr_section_peak.max(self.curr_strain);
        self.prev_time = curr.start_time;
    }

    fn strain_value_of(&mut self, curr: &ManiaDifficultyObject) -> f64 {
        let start_time = curr.start_time;
        let end_time = curr.end_time;
        let col = curr.column;
        let mut is_overlapping = false;

        // * Lowest value we can assume with the current information
        let mut closest_end_time = (end_time - start_time).abs();
        // * Factor to all additional strains in case something else is held
        let mut hold_factor = 1.0;
        // * Addition to the current note in case it's a hold and has to be released awkwardly
        let mut hold_addition = 0.0;

        for &other_end_time in self.end_times.iter() {
            // * The current note is overlapped if a previous note or end is overlapping the current note body
            is_overlapping |= other_end_time > start_time + 1.0 && end_time > other_end_time + 1.0;

            // * We give a slight bonus to everything if something is held meanwhile
            if other_end_time > end_time + 1.0 {
                hold_factor = 1.25;
            }

            closest_end_time = (end_time - other_end_time).abs().min(closest_end_time);
        }

        // * The hold addition is given if there was an overlap, however it is only valid if there are no other note with a similar ending.
        // * Releasing multiple notes is just as easy as releasing 1. Nerfs the hold addition by half if the closest release is release_threshold away.
        if is_overlapping {
            hold_addition = (1.0 + (0.5 * (RELEASE_THRESHOLD - closest_end_time)).exp()).recip();
        }

        // * Decay and increase individualStrains in own column
        self.individual_strains[col] = apply_decay(
            self.individual_strains[col],
            start_time - self.start_times[col],
            INDIVIDUAL_DECAY_BASE,
        );
        self.individual_strains[col] += 2.0 * hold_factor;

        // * For notes at the same time (in a chord), the individualStrain should be the hardest individualStrain out of those columns
        self.individual_strain = if curr.delta_time <= 1.0 {
            self.individual_strain.max(self.individual_strains[col])
        } else {
            self.individual_strains[col]
        };

        // * Decay and increase overallStrain
        self.overall_strain = apply_decay(self.overall_strain, curr.delta_time, OVERALL_DECAY_BASE);
        self.overall_strain += (1.0 + hold_addition) * hold_factor;

        // * Update startTimes and endTimes arrays
        self.start_times[col] = start_time;
        self.end_times[col] = end_time;

        self.individual_strain + self.overall_strain
    }

    fn initial_strain(&self, offset: f64) -> f64 {
        apply_decay(self.individual_strain, offset - self.prev_time, INDIVIDUAL_DECAY_BASE)
            + apply_decay(self.overall_strain, offset - self.prev_time, OVERALL_DECAY_BASE)
    }

    pub(crate) fn difficulty_value(mut self) -> f64 {
        self.strain_peaks.push(self.curr_section_peak);
        self.strain_peaks.sort_unstable_by(|a, b| b.total_cmp(a));

        let mut difficulty = 0.0;
        let mut weight = 1.0;

        for strain in self.strain_peaks {
            difficulty += strain * weight;
            weight *= DECAY_WEIGHT;
        }

        difficulty
    }
}

#[inline]
fn apply_decay(value: f64, delta_time: f64, decay_base: f64) -> f64 {
    value * decay_base.powf(delta_time / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(
        idx: usize,
        column: usize,
        start_time: f64,
        end_time: f64,
        delta_time: f64,
    ) -> ManiaDifficultyObject {
        ManiaDifficultyObject {
            idx,
            column,
            delta_time,
            start_time,
            end_time,
        }
    }

    #[test]
    fn jacks_are_harder_than_trills() {
        let mut jack = Strain::new(2);
        let mut trill = Strain::new(2);

        for i in 0..40 {
            let time = 1000.0 + i as f64 * 100.0;
            jack.process(&note(i, 0, time, time, 100.0));
            trill.process(&note(i, i % 2, time, time, 100.0));
        }

        assert!(jack.difficulty_value() > trill.difficulty_value());
    }

    #[test]
    fn held_notes_add_strain() {
        let mut plain = Strain::new(2);
        let mut held = Strain::new(2);

        plain.process(&note(0, 0, 1000.0, 1000.0, 100.0));
        held.process(&note(0, 0, 1000.0, 1800.0, 100.0));

        for i in 1..10 {
            let time = 1000.0 + i as f64 * 100.0;
            plain.process(&note(i, 1, time, time, 100.0));
            held.process(&note(i, 1, time, time, 100.0));
        }

        assert!(held.difficulty_value() > plain.difficulty_value());
    }
}
