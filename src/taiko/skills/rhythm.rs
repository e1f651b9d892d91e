use crate::{
    limited_queue::LimitedQueue,
    taiko::{difficulty_object::TaikoDifficultyObject, rhythm::HitObjectRhythm},
};

use super::{repetition_penalty, Skill};

const RHYTHM_HISTORY_MAX_LEN: usize = 8;
const STRAIN_DECAY: f64 = 0.96;

/// Difficulty of irregular note spacing.
#[derive(Clone, Debug, Default)]
pub(crate) struct Rhythm {
    // (object index, rhythm)
    history: LimitedQueue<(usize, Option<&'static HitObjectRhythm>), RHYTHM_HISTORY_MAX_LEN>,
    notes_since_rhythm_change: usize,
    curr_strain: f64,
}

impl Skill for Rhythm {
    const SKILL_MULTIPLIER: f64 = 10.0;
    const STRAIN_DECAY_BASE: f64 = 0.0;

    fn strain_value_of(&mut self, curr: &TaikoDifficultyObject<'_>) -> f64 {
        if !curr.is_hit() {
            self.reset();

            return 0.0;
        }

        self.curr_strain *= STRAIN_DECAY;
        self.notes_since_rhythm_change += 1;

        // * rhythm difficulty zero (due to rhythm not changing) => no rhythm strain.
        if curr.rhythm.difficulty.abs() < f64::EPSILON {
            return 0.0;
        }

        let mut strain = curr.rhythm.difficulty;

        strain *= self.repetition_penalties(curr);
        strain *= pattern_len_penalty(self.notes_since_rhythm_change);
        strain *= self.speed_penalty(curr.delta);

        // * careful - needs to be done here since calls above read this value
        self.notes_since_rhythm_change = 0;
        self.curr_strain += strain;

        self.curr_strain
    }
}

impl Rhythm {
    fn reset(&mut self) {
        self.curr_strain = 0.0;
        self.notes_since_rhythm_change = 0;
    }

    fn repetition_penalties(&mut self, curr: &TaikoDifficultyObject<'_>) -> f64 {
        self.history.push((curr.idx, Some(curr.rhythm)));

        let history = &self.history;
        let len = history.len();
        let mut penalty = 1.0;

        for patterns_to_compare in 2..=RHYTHM_HISTORY_MAX_LEN / 2 {
            for start in (0..len.saturating_sub(patterns_to_compare)).rev() {
                let same_pattern = (0..patterns_to_compare)
                    .all(|i| history[start + i].1 == history[len - patterns_to_compare + i].1);

                if same_pattern {
                    penalty *= repetition_penalty(curr.idx - history[start].0);

                    break;
                }
            }
        }

        penalty
    }

    fn speed_penalty(&mut self, note_len: f64) -> f64 {
        if note_len < 80.0 {
            1.0
        } else if note_len < 210.0 {
            (1.4 - 0.005 * note_len).max(0.0)
        } else {
            self.reset();

            0.0
        }
    }
}

fn pattern_len_penalty(pattern_len: usize) -> f64 {
    let short_pattern_penalty = (0.15 * pattern_len as f64).min(1.0);
    let long_pattern_penalty = (2.5 - 0.15 * pattern_len as f64).clamp(0.0, 1.0);

    short_pattern_penalty.min(long_pattern_penalty)
}
