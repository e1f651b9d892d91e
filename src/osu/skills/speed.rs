use std::f64::consts::PI;

use crate::osu::difficulty_object::OsuDifficultyObject;

use super::{decay_since_previous, reduced_difficulty_value, strain_decay, Skill, StrainSections};

/// Difficulty of tapping quickly and keeping complex rhythms.
#[derive(Clone, Debug)]
pub(crate) struct Speed {
    curr_strain: f64,
    curr_rhythm: f64,
    sections: StrainSections,
    object_strains: Vec<f64>,
    hit_window: f64,
}

impl Speed {
    const SKILL_MULTIPLIER: f64 = 1375.0;
    const STRAIN_DECAY_BASE: f64 = 0.3;

    pub(crate) fn new(hit_window: f64) -> Self {
        Self {
            curr_strain: 0.0,
            curr_rhythm: 0.0,
            sections: StrainSections::default(),
            object_strains: Vec::new(),
            hit_window,
        }
    }

    /// Amount of notes weighted by how close their strain is to the peak strain.
    pub(crate) fn relevant_note_count(&self) -> f64 {
        let max_strain = self.object_strains.iter().copied().fold(0.0, f64::max);

        if max_strain <= 0.0 {
            return 0.0;
        }

        self.object_strains
            .iter()
            .map(|strain| (1.0 + (-(strain / max_strain * 12.0 - 6.0)).exp()).recip())
            .sum()
    }

    /// Final difficulty alongside the relevant note count.
    pub(crate) fn difficulty_and_note_count(self) -> (f64, f64) {
        let note_count = self.relevant_note_count();

        (self.difficulty_value(), note_count)
    }
}

impl Skill for Speed {
    #[inline]
    fn sections(&mut self) -> &mut StrainSections {
        &mut self.sections
    }

    fn strain_value_at(
        &mut self,
        curr: &OsuDifficultyObject<'_>,
        diff_objects: &[OsuDifficultyObject<'_>],
    ) -> f64 {
        self.curr_strain *= strain_decay(Self::STRAIN_DECAY_BASE, curr.strain_time);
        self.curr_strain +=
            evaluate_speed(curr, diff_objects, self.hit_window) * Self::SKILL_MULTIPLIER;
        self.curr_rhythm = evaluate_rhythm(curr, diff_objects, self.hit_window);

        let total_strain = self.curr_strain * self.curr_rhythm;
        self.object_strains.push(total_strain);

        total_strain
    }

    fn initial_strain(
        &self,
        time: f64,
        curr: &OsuDifficultyObject<'_>,
        diff_objects: &[OsuDifficultyObject<'_>],
    ) -> f64 {
        self.curr_strain
            * self.curr_rhythm
            * decay_since_previous(Self::STRAIN_DECAY_BASE, time, curr, diff_objects)
    }

    fn difficulty_value(mut self) -> f64 {
        reduced_difficulty_value(&mut self.sections, 5, 1.04)
    }
}

const SINGLE_SPACING_THRESHOLD: f64 = 125.0;
// ~200BPM
const MIN_SPEED_BONUS: f64 = 75.0;
const SPEED_BALANCING_FACTOR: f64 = 40.0;

fn evaluate_speed(
    curr: &OsuDifficultyObject<'_>,
    diff_objects: &[OsuDifficultyObject<'_>],
    hit_window: f64,
) -> f64 {
    if curr.base.is_spinner() {
        return 0.0;
    }

    let prev = curr.previous(0, diff_objects);
    let mut strain_time = curr.strain_time;
    let mut doubletapness = 1.0;

    // * Nerf doubletappable doubles.
    if let Some(next) = curr.next(0, diff_objects) {
        let curr_delta_time = curr.delta_time.max(1.0);
        let next_delta_time = next.delta_time.max(1.0);
        let delta_diff = (next_delta_time - curr_delta_time).abs();
        let speed_ratio = curr_delta_time / curr_delta_time.max(delta_diff);
        let window_ratio = (curr_delta_time / hit_window).min(1.0).powi(2);
        doubletapness = speed_ratio.powf(1.0 - window_ratio);
    }

    // * Cap deltatime to the OD 300 hitwindow.
    // * 0.93 is derived from making sure 260bpm OD8 streams aren't nerfed harshly, whilst 0.92 limits the effect of the cap.
    strain_time /= ((strain_time / hit_window) / 0.93).clamp(0.92, 1.0);

    let speed_bonus = if strain_time < MIN_SPEED_BONUS {
        1.0 + 0.75 * ((MIN_SPEED_BONUS - strain_time) / SPEED_BALANCING_FACTOR).powi(2)
    } else {
        1.0
    };

    let travel_dist = prev.map_or(0.0, |prev| prev.travel_dist);
    let dist = SINGLE_SPACING_THRESHOLD.min(travel_dist + curr.min_jump_dist);

    (speed_bonus + speed_bonus * (dist / SINGLE_SPACING_THRESHOLD).powf(3.5)) * doubletapness
        / strain_time
}

// * 5 seconds of calculatingRhythmBonus max.
const HISTORY_TIME_MAX: f64 = 5000.0;
const RHYTHM_MULTIPLIER: f64 = 0.75;

/// Multiplier in `[1, inf)` rewarding irregular rhythms within the recent history.
fn evaluate_rhythm(
    curr: &OsuDifficultyObject<'_>,
    diff_objects: &[OsuDifficultyObject<'_>],
    hit_window: f64,
) -> f64 {
    if curr.base.is_spinner() {
        return 0.0;
    }

    let mut prev_island_size = 0;
    let mut rhythm_complexity_sum = 0.0;
    let mut island_size = 1;
    // * store the ratio of the current start of an island to buff for tighter rhythms
    let mut start_ratio = 0.0;
    let mut first_delta_switch = false;

    let historical_note_count = curr.idx.min(32);

    let mut rhythm_start = 0;

    while rhythm_start + 2 < historical_note_count
        && curr
            .previous(rhythm_start, diff_objects)
            .is_some_and(|prev| curr.start_time - prev.start_time < HISTORY_TIME_MAX)
    {
        rhythm_start += 1;
    }

    for i in (1..=rhythm_start).rev() {
        let (Some(curr_obj), Some(prev_obj), Some(last_obj)) = (
            curr.previous(i - 1, diff_objects),
            curr.previous(i, diff_objects),
            curr.previous(i + 1, diff_objects),
        ) else {
            break;
        };

        // * scales note 0 to 1 from history to now
        let curr_historical_decay = ((HISTORY_TIME_MAX - (curr.start_time - curr_obj.start_time))
            / HISTORY_TIME_MAX)
            // * either we're limited by time or limited by object count.
            .min((historical_note_count - i) as f64 / historical_note_count as f64);

        let curr_delta = curr_obj.strain_time;
        let prev_delta = prev_obj.strain_time;
        let last_delta = last_obj.strain_time;

        // * fancy function to calculate rhythmbonuses.
        let ratio_base = (PI / (prev_delta.min(curr_delta) / prev_delta.max(curr_delta))).sin();
        let curr_ratio = 1.0 + 6.0 * ratio_base.powi(2).min(0.5);

        let window = if curr_obj.base.is_spinner() {
            0.0
        } else {
            hit_window
        };

        let window_penalty =
            (((prev_delta - curr_delta).abs() - window * 0.3).max(0.0) / (window * 0.3)).min(1.0);

        let mut effective_ratio = window_penalty * curr_ratio;

        if first_delta_switch {
            if !(prev_delta > 1.25 * curr_delta || prev_delta * 1.25 < curr_delta) {
                // * island is still progressing, count size.
                if island_size < 7 {
                    island_size += 1;
                }
            } else {
                // * bpm change is into slider, this is easy acc window
                if curr_obj.base.is_slider() {
                    effective_ratio *= 0.125;
                }

                // * bpm change was from a slider, this is easier typically than circle -> circle
                if prev_obj.base.is_slider() {
                    effective_ratio *= 0.25;
                }

                // * repeated island size (ex: triplet -> triplet)
                if prev_island_size == island_size {
                    effective_ratio *= 0.25;
                }

                // * repeated island polartiy (2 -> 4, 3 -> 5)
                if prev_island_size % 2 == island_size % 2 {
                    effective_ratio *= 0.5;
                }

                // * previous increase happened a note ago, 1/1->1/2-1/4, dont want to buff this.
                if last_delta > prev_delta + 10.0 && prev_delta > curr_delta + 10.0 {
                    effective_ratio *= 0.125;
                }

                rhythm_complexity_sum += (effective_ratio * start_ratio).sqrt()
                    * curr_historical_decay
                    * f64::from(4 + island_size).sqrt()
                    / 2.0
                    * f64::from(4 + prev_island_size).sqrt()
                    / 2.0;

                start_ratio = effective_ratio;
                prev_island_size = island_size;

                // * we're slowing down, stop counting
                // * if we're speeding up, this stays true and we keep counting island size.
                if prev_delta * 1.25 < curr_delta {
                    first_delta_switch = false;
                }

                island_size = 1;
            }
        } else if prev_delta > 1.25 * curr_delta {
            // * we want to be speeding up.
            // * Begin counting island until we change speed again.
            first_delta_switch = true;
            start_ratio = effective_ratio;
            island_size = 1;
        }
    }

    // * produces multiplier that can be applied to strain. range [1, infinity) (not really though)
    (4.0 + rhythm_complexity_sum * RHYTHM_MULTIPLIER).sqrt() / 2.0
}

#[cfg(test)]
mod tests {
    use super::Speed;

    #[test]
    fn relevant_notes_of_uniform_strains() {
        let mut speed = Speed::new(30.0);
        speed.object_strains = vec![2.0; 10];

        // every note at max strain counts as ~1 / (1 + e^-6)
        let expected = 10.0 / (1.0 + (-6.0_f64).exp());

        assert!((speed.relevant_note_count() - expected).abs() < 1e-9);
    }

    #[test]
    fn no_strains_no_notes() {
        assert!(Speed::new(30.0).relevant_note_count().abs() < f64::EPSILON);
    }
}
