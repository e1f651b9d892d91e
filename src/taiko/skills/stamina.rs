use crate::{limited_queue::LimitedQueue, taiko::difficulty_object::TaikoDifficultyObject};

use super::Skill;

const HISTORY_MAX_LEN: usize = 2;

/// Difficulty of keeping up the tapping speed with one hand.
///
/// Each hand gets its own instance that only considers every other object.
#[derive(Clone, Debug)]
pub(crate) struct Stamina {
    hand: usize,
    note_pair_duration_history: LimitedQueue<f64, HISTORY_MAX_LEN>,
    off_hand_object_duration: f64,
}

impl Stamina {
    pub(crate) fn new(right_hand: bool) -> Self {
        Self {
            hand: usize::from(right_hand),
            note_pair_duration_history: LimitedQueue::new(),
            off_hand_object_duration: f64::MAX,
        }
    }
}

impl Skill for Stamina {
    const SKILL_MULTIPLIER: f64 = 1.0;
    const STRAIN_DECAY_BASE: f64 = 0.4;

    fn strain_value_of(&mut self, curr: &TaikoDifficultyObject<'_>) -> f64 {
        if !curr.is_hit() {
            return 0.0;
        }

        if curr.idx % 2 != self.hand {
            self.off_hand_object_duration = curr.delta;

            return 0.0;
        }

        if curr.idx == 1 {
            return 1.0;
        }

        let note_pair_duration = curr.delta + self.off_hand_object_duration;
        self.note_pair_duration_history.push(note_pair_duration);

        let shortest_recent_note = self
            .note_pair_duration_history
            .iter()
            .copied()
            .fold(f64::MAX, f64::min);

        let mut strain = 1.0 + speed_bonus(shortest_recent_note);

        if curr.stamina_cheese {
            strain *= cheese_penalty(note_pair_duration);
        }

        strain
    }
}

fn cheese_penalty(note_pair_duration: f64) -> f64 {
    if note_pair_duration > 125.0 {
        1.0
    } else if note_pair_duration < 100.0 {
        0.6
    } else {
        0.6 + (note_pair_duration - 100.0) * 0.016
    }
}

fn speed_bonus(note_pair_duration: f64) -> f64 {
    if note_pair_duration > 200.0 {
        return 0.0;
    }

    let bonus = 200.0 - note_pair_duration;

    bonus * bonus / 100_000.0
}
