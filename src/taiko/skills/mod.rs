mod colour;
mod rhythm;
mod stamina;

pub(crate) use self::{colour::Colour, rhythm::Rhythm, stamina::Stamina};

use super::difficulty_object::TaikoDifficultyObject;

const DECAY_WEIGHT: f64 = 0.9;

pub(crate) trait Skill {
    const SKILL_MULTIPLIER: f64;
    const STRAIN_DECAY_BASE: f64;

    fn strain_value_of(&mut self, curr: &TaikoDifficultyObject<'_>) -> f64;
}

/// Strain bookkeeping shared by all osu!taiko skills.
#[derive(Clone, Debug)]
pub(crate) struct Strain<S> {
    skill: S,
    curr_strain: f64,
    curr_section_peak: f64,
    peaks: Vec<f64>,
    prev_time: Option<f64>,
}

impl<S: Skill> Strain<S> {
    pub(crate) fn new(skill: S) -> Self {
        Self {
            skill,
            curr_strain: 1.0,
            curr_section_peak: 1.0,
            peaks: Vec::with_capacity(128),
            prev_time: None,
        }
    }

    #[inline]
    pub(crate) fn save_current_peak(&mut self) {
        self.peaks.push(self.curr_section_peak);
    }

    #[inline]
    pub(crate) fn start_new_section_from(&mut self, time: f64) {
        let prev_time = self.prev_time.unwrap_or(0.0);
        self.curr_section_peak = self.curr_strain * strain_decay::<S>(time - prev_time);
    }

    pub(crate) fn process(&mut self, curr: &TaikoDifficultyObject<'_>) {
        self.curr_strain *= strain_decay::<S>(curr.delta);
        self.curr_strain += self.skill.strain_value_of(curr) * S::SKILL_MULTIPLIER;
        self.curr_section_peak = self.curr_section_peak.max(self.curr_strain);
        self.prev_time = Some(curr.start_time);
    }

    /// Saved section peaks in chronological order.
    pub(crate) fn peaks(&self) -> &[f64] {
        &self.peaks
    }

    pub(crate) fn difficulty_value(&self) -> f64 {
        let mut peaks = self.peaks.clone();

        weighted_sum(&mut peaks)
    }
}

/// Sort descending and sum with exponentially decaying weights.
pub(crate) fn weighted_sum(peaks: &mut [f64]) -> f64 {
    peaks.sort_unstable_by(|a, b| b.total_cmp(a));

    let mut difficulty = 0.0;
    let mut weight = 1.0;

    for &strain in peaks.iter() {
        difficulty += strain * weight;
        weight *= DECAY_WEIGHT;
    }

    difficulty
}

#[inline]
fn strain_decay<S: Skill>(ms: f64) -> f64 {
    S::STRAIN_DECAY_BASE.powf(ms / 1000.0)
}

/// Penalty for repeating a pattern only `notes_since` notes ago.
#[inline]
fn repetition_penalty(notes_since: usize) -> f64 {
    (0.032 * notes_since as f64).min(1.0)
}
