use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6};

use super::difficulty_object::RelaxDifficultyObject;

const DECAY_WEIGHT: f32 = 0.9;

const SINGLE_SPACING_THRESHOLD: f32 = 125.0;
const SPEED_ANGLE_BONUS_BEGIN: f32 = 5.0 * FRAC_PI_6;
const MIN_SPEED_BONUS: f32 = 75.0;
const MAX_SPEED_BONUS: f32 = 45.0;
const SPEED_BALANCING_FACTOR: f32 = 40.0;

const AIM_ANGLE_BONUS_BEGIN: f32 = FRAC_PI_3;
const TIMING_THRESHOLD: f32 = 107.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum SkillKind {
    Aim,
    Speed,
}

impl SkillKind {
    const fn multiplier(self) -> f32 {
        match self {
            Self::Aim => 26.25,
            Self::Speed => 1400.0,
        }
    }

    const fn decay_base(self) -> f32 {
        match self {
            Self::Aim => 0.15,
            Self::Speed => 0.3,
        }
    }

    fn strain_value_of(self, current: &RelaxDifficultyObject<'_>) -> f32 {
        if current.base.is_spinner() {
            return 0.0;
        }

        match self {
            Self::Aim => aim_strain(current),
            Self::Speed => speed_strain(current),
        }
    }
}

fn aim_strain(current: &RelaxDifficultyObject<'_>) -> f32 {
    let mut result = 0.0;

    if let Some((prev_jump_dist, prev_strain_time)) = current.prev {
        if let Some(angle) = current.angle.filter(|&a| a > AIM_ANGLE_BONUS_BEGIN) {
            let scale = 90.0;

            let angle_bonus = ((angle - AIM_ANGLE_BONUS_BEGIN).sin().powi(2)
                * (prev_jump_dist - scale).max(0.0)
                * (current.jump_dist - scale).max(0.0))
            .sqrt();

            result = 1.5 * diminishing_exp(angle_bonus.max(0.0))
                / TIMING_THRESHOLD.max(prev_strain_time);
        }
    }

    let jump_dist_exp = diminishing_exp(current.jump_dist);
    let travel_dist_exp = diminishing_exp(current.travel_dist);

    let dist_exp = jump_dist_exp + travel_dist_exp + (travel_dist_exp * jump_dist_exp).sqrt();

    (result + dist_exp / current.strain_time.max(TIMING_THRESHOLD))
        .max(dist_exp / current.strain_time)
}

fn speed_strain(current: &RelaxDifficultyObject<'_>) -> f32 {
    let dist = SINGLE_SPACING_THRESHOLD.min(current.travel_dist + current.jump_dist);
    let delta_time = MAX_SPEED_BONUS.max(current.delta);

    let mut speed_bonus = 1.0;

    if delta_time < MIN_SPEED_BONUS {
        let exp_base = (MIN_SPEED_BONUS - delta_time) / SPEED_BALANCING_FACTOR;
        speed_bonus += exp_base * exp_base;
    }

    let mut angle_bonus = 1.0;

    if let Some(angle) = current.angle.filter(|&a| a < SPEED_ANGLE_BONUS_BEGIN) {
        let exp_base = (1.5 * (SPEED_ANGLE_BONUS_BEGIN - angle)).sin();
        angle_bonus = 1.0 + exp_base * exp_base / 3.57;

        if angle < FRAC_PI_2 {
            angle_bonus = 1.28;

            if dist < 90.0 && angle < FRAC_PI_4 {
                angle_bonus += (1.0 - angle_bonus) * ((90.0 - dist) / 10.0).min(1.0);
            } else if dist < 90.0 {
                angle_bonus += (1.0 - angle_bonus)
                    * ((90.0 - dist) / 10.0).min(1.0)
                    * ((FRAC_PI_2 - angle) / FRAC_PI_4).sin();
            }
        }
    }

    (1.0 + (speed_bonus - 1.0) * 0.75)
        * angle_bonus
        * (0.95 + speed_bonus * (dist / SINGLE_SPACING_THRESHOLD).powf(3.5))
        / current.strain_time
}

#[inline]
fn diminishing_exp(val: f32) -> f32 {
    val.powf(0.99)
}

/// Strain of one skill, summarized into peaks per section.
pub(crate) struct Skill {
    kind: SkillKind,
    current_strain: f32,
    current_section_peak: f32,
    strain_peaks: Vec<f32>,
    prev_time: Option<f32>,
}

impl Skill {
    pub(crate) fn new(kind: SkillKind) -> Self {
        Self {
            kind,
            current_strain: 1.0,
            current_section_peak: 1.0,
            strain_peaks: Vec::with_capacity(128),
            prev_time: None,
        }
    }

    pub(crate) fn save_current_peak(&mut self) {
        self.strain_peaks.push(self.current_section_peak);
    }

    pub(crate) fn start_new_section_from(&mut self, time: f32) {
        let delta = time - self.prev_time.unwrap_or(time);
        self.current_section_peak = self.current_strain * self.strain_decay(delta);
    }

    pub(crate) fn process(&mut self, current: &RelaxDifficultyObject<'_>) {
        self.current_strain *= self.strain_decay(current.delta);
        self.current_strain += self.kind.strain_value_of(current) * self.kind.multiplier();

        self.current_section_peak = self.current_section_peak.max(self.current_strain);
        self.prev_time = Some(current.base.time);
    }

    /// Weighted sum of the section peaks, highest first.
    pub(crate) fn difficulty_value(&mut self) -> f32 {
        self.strain_peaks.sort_unstable_by(|a, b| b.total_cmp(a));

        let mut difficulty = 0.0;
        let mut weight = 1.0;

        for &strain in self.strain_peaks.iter() {
            difficulty += strain * weight;
            weight *= DECAY_WEIGHT;
        }

        difficulty
    }

    fn strain_decay(&self, ms: f32) -> f32 {
        self.kind.decay_base().powf(ms / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{relax::object::RelaxObject, Pos2};

    fn circle(time: f32, x: f32) -> RelaxObject {
        RelaxObject {
            time,
            pos: Pos2::new(x, 192.0),
            end_pos: Pos2::new(x, 192.0),
            travel_dist: Some(0.0),
        }
    }

    #[test]
    fn spinners_have_no_strain() {
        let prev = circle(0.0, 100.0);
        let spinner = RelaxObject {
            travel_dist: None,
            ..circle(200.0, 400.0)
        };

        let h = RelaxDifficultyObject::new(&spinner, &prev, None, None, 1.0, 1.0);

        assert!(h.jump_dist.abs() < f32::EPSILON);
        assert!(SkillKind::Aim.strain_value_of(&h).abs() < f32::EPSILON);
        assert!(SkillKind::Speed.strain_value_of(&h).abs() < f32::EPSILON);
    }

    #[test]
    fn peaks_are_weighted_highest_first() {
        let mut skill = Skill::new(SkillKind::Aim);
        skill.strain_peaks = vec![1.0, 3.0, 2.0];

        let expected = 3.0 + 2.0 * 0.9 + 1.0 * 0.81;

        assert!((skill.difficulty_value() - expected).abs() < 1e-5);
    }

    #[test]
    fn wider_jumps_strain_more() {
        let prev = circle(0.0, 200.0);
        let near = circle(150.0, 260.0);
        let far = circle(150.0, 460.0);

        let near = RelaxDifficultyObject::new(&near, &prev, None, None, 1.0, 1.0);
        let far = RelaxDifficultyObject::new(&far, &prev, None, None, 1.0, 1.0);

        assert!(SkillKind::Aim.strain_value_of(&far) > SkillKind::Aim.strain_value_of(&near));
        assert!(SkillKind::Speed.strain_value_of(&far) > SkillKind::Speed.strain_value_of(&near));
    }
}
