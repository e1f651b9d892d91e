use crate::{
    limited_queue::LimitedQueue,
    taiko::difficulty_object::{HitType, TaikoDifficultyObject},
};

use super::{repetition_penalty, Skill};

const MONO_HISTORY_MAX_LEN: usize = 5;
const MOST_RECENT_PATTERNS_TO_COMPARE: usize = 2;

/// Difficulty of switching between centre and rim hits.
#[derive(Clone, Debug, Default)]
pub(crate) struct Colour {
    mono_history: LimitedQueue<usize, MONO_HISTORY_MAX_LEN>,
    prev_hit_type: Option<HitType>,
    curr_mono_len: usize,
}

impl Skill for Colour {
    const SKILL_MULTIPLIER: f64 = 1.0;
    const STRAIN_DECAY_BASE: f64 = 0.4;

    fn strain_value_of(&mut self, curr: &TaikoDifficultyObject<'_>) -> f64 {
        // * changing from/to a drum roll or a swell does not constitute a colour change.
        // * hits spaced more than a second apart are also exempt from colour strain.
        if !(curr.last_is_hit && curr.is_hit() && curr.delta < 1000.0) {
            self.mono_history.clear();
            self.curr_mono_len = usize::from(curr.is_hit());
            self.prev_hit_type = curr.hit_type;

            return 0.0;
        }

        let mut strain = 0.0;

        if self.prev_hit_type.is_some() && curr.hit_type != self.prev_hit_type {
            // * The colour has changed.
            // * If the last two streaks were either both odd or both even, there is no strain.
            strain = match self.mono_history.last() {
                Some(last) if self.mono_history.len() >= 2 => {
                    if (last + self.curr_mono_len) % 2 == 0 {
                        0.0
                    } else {
                        1.0
                    }
                }
                _ => 0.0,
            };

            strain *= self.repetition_penalties();
            self.curr_mono_len = 1;
        } else {
            self.curr_mono_len += 1;
        }

        self.prev_hit_type = curr.hit_type;

        strain
    }
}

impl Colour {
    fn repetition_penalties(&mut self) -> f64 {
        self.mono_history.push(self.curr_mono_len);

        let history = &self.mono_history;
        let len = history.len();

        for start in (0..len.saturating_sub(MOST_RECENT_PATTERNS_TO_COMPARE)).rev() {
            let same_pattern = (0..MOST_RECENT_PATTERNS_TO_COMPARE).all(|i| {
                history[start + i] == history[len - MOST_RECENT_PATTERNS_TO_COMPARE + i]
            });

            if same_pattern {
                let notes_since = history.iter().skip(start).sum();

                return repetition_penalty(notes_since);
            }
        }

        1.0
    }
}
