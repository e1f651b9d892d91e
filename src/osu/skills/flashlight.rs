use crate::osu::{difficulty_object::OsuDifficultyObject, object::OsuObjectKind};

use super::{decay_since_previous, strain_decay, Skill, StrainSections};

/// Difficulty of memorizing and reading the map with a limited view.
#[derive(Clone, Debug)]
pub(crate) struct Flashlight {
    curr_strain: f64,
    sections: StrainSections,
    hidden: bool,
    scaling_factor: f64,
    time_preempt: f64,
    time_fade_in: f64,
}

impl Flashlight {
    const SKILL_MULTIPLIER: f64 = 0.052;
    const STRAIN_DECAY_BASE: f64 = 0.15;
    const DIFFICULTY_MULTIPLIER: f64 = 1.06;

    pub(crate) fn new(hidden: bool, radius: f32, time_preempt: f64, time_fade_in: f64) -> Self {
        Self {
            curr_strain: 0.0,
            sections: StrainSections::default(),
            hidden,
            scaling_factor: 52.0 / f64::from(radius),
            time_preempt,
            time_fade_in,
        }
    }
}

impl Skill for Flashlight {
    #[inline]
    fn sections(&mut self) -> &mut StrainSections {
        &mut self.sections
    }

    fn strain_value_at(
        &mut self,
        curr: &OsuDifficultyObject<'_>,
        diff_objects: &[OsuDifficultyObject<'_>],
    ) -> f64 {
        self.curr_strain *= strain_decay(Self::STRAIN_DECAY_BASE, curr.delta_time);
        self.curr_strain += self.evaluate(curr, diff_objects) * Self::SKILL_MULTIPLIER;

        self.curr_strain
    }

    fn initial_strain(
        &self,
        time: f64,
        curr: &OsuDifficultyObject<'_>,
        diff_objects: &[OsuDifficultyObject<'_>],
    ) -> f64 {
        self.curr_strain * decay_since_previous(Self::STRAIN_DECAY_BASE, time, curr, diff_objects)
    }

    fn difficulty_value(self) -> f64 {
        self.sections.into_peaks().into_iter().sum::<f64>() * Self::DIFFICULTY_MULTIPLIER
    }
}

const MAX_OPACITY_BONUS: f64 = 0.4;
const HIDDEN_BONUS: f64 = 0.2;
const MIN_VELOCITY: f64 = 0.5;
const SLIDER_MULTIPLIER: f64 = 1.3;
const MIN_ANGLE_MULTIPLIER: f64 = 0.2;

impl Flashlight {
    fn evaluate(
        &self,
        curr: &OsuDifficultyObject<'_>,
        diff_objects: &[OsuDifficultyObject<'_>],
    ) -> f64 {
        if curr.base.is_spinner() {
            return 0.0;
        }

        let scaling_factor = self.scaling_factor;

        let mut small_dist_nerf = 1.0;
        let mut cumulative_strain_time = 0.0;
        let mut result = 0.0;
        let mut last_obj = curr;
        let mut angle_repeat_count = 0.0;

        // * This is iterating backwards in time from the current object.
        for i in 0..curr.idx.min(10) {
            let Some(curr_obj) = curr.previous(i, diff_objects) else {
                break;
            };

            if !curr_obj.base.is_spinner() {
                let jump_dist =
                    f64::from((curr.base.stacked_pos() - curr_obj.base.stacked_end_pos()).length());

                cumulative_strain_time += last_obj.strain_time;

                // * We want to nerf objects that can be easily seen within the Flashlight circle radius.
                if i == 0 {
                    small_dist_nerf = (jump_dist / 75.0).min(1.0);
                }

                // * We also want to nerf stacks so that only the first object of the stack is accounted for.
                let stack_nerf = ((curr_obj.lazy_jump_dist / scaling_factor) / 25.0).min(1.0);

                // * Bonus based on how visible the object is.
                let opacity = curr.opacity_at(
                    curr_obj.base.start_time,
                    self.hidden,
                    self.time_preempt,
                    self.time_fade_in,
                );
                let opacity_bonus = 1.0 + MAX_OPACITY_BONUS * (1.0 - opacity);

                result += stack_nerf * opacity_bonus * scaling_factor * jump_dist
                    / cumulative_strain_time;

                // * Objects further back in time should count less for the nerf.
                if let (Some(prev_angle), Some(curr_angle)) = (curr_obj.angle, curr.angle) {
                    if (prev_angle - curr_angle).abs() < 0.02 {
                        angle_repeat_count += (1.0 - 0.1 * i as f64).max(0.0);
                    }
                }
            }

            last_obj = curr_obj;
        }

        result = (small_dist_nerf * result).powi(2);

        // * Additional bonus for Hidden due to there being no approach circles.
        if self.hidden {
            result *= 1.0 + HIDDEN_BONUS;
        }

        // * Nerf patterns with repeated angles.
        result *= MIN_ANGLE_MULTIPLIER + (1.0 - MIN_ANGLE_MULTIPLIER) / (angle_repeat_count + 1.0);

        if let OsuObjectKind::Slider(slider) = &curr.base.kind {
            // * Invert the scaling factor to determine the true travel distance independent of circle size.
            let pixel_travel_dist = f64::from(slider.lazy_travel_dist) / scaling_factor;

            // * Reward sliders based on velocity.
            let mut slider_bonus =
                (pixel_travel_dist / curr.travel_time - MIN_VELOCITY).max(0.0).sqrt();

            // * Longer sliders require more memorisation.
            slider_bonus *= pixel_travel_dist;

            // * Nerf sliders with repeats, as less memorisation is required.
            if slider.repeats > 0 {
                slider_bonus /= (slider.repeats + 1) as f64;
            }

            result += slider_bonus * SLIDER_MULTIPLIER;
        }

        result
    }
}
