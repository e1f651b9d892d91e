use std::f64::consts::{FRAC_PI_2, PI};

use crate::osu::difficulty_object::OsuDifficultyObject;

use super::{decay_since_previous, reduced_difficulty_value, strain_decay, Skill, StrainSections};

/// Difficulty of moving the cursor between objects.
#[derive(Clone, Debug)]
pub(crate) struct Aim {
    curr_strain: f64,
    sections: StrainSections,
    with_sliders: bool,
}

impl Aim {
    const SKILL_MULTIPLIER: f64 = 23.55;
    const STRAIN_DECAY_BASE: f64 = 0.15;

    pub(crate) fn new(with_sliders: bool) -> Self {
        Self {
            curr_strain: 0.0,
            sections: StrainSections::default(),
            with_sliders,
        }
    }
}

impl Skill for Aim {
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
        self.curr_strain +=
            evaluate_aim(curr, diff_objects, self.with_sliders) * Self::SKILL_MULTIPLIER;

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

    fn difficulty_value(mut self) -> f64 {
        reduced_difficulty_value(&mut self.sections, 10, 1.06)
    }
}

const WIDE_ANGLE_MULTIPLIER: f64 = 1.5;
const ACUTE_ANGLE_MULTIPLIER: f64 = 1.95;
const SLIDER_MULTIPLIER: f64 = 1.35;
const VELOCITY_CHANGE_MULTIPLIER: f64 = 0.75;

fn evaluate_aim(
    curr: &OsuDifficultyObject<'_>,
    diff_objects: &[OsuDifficultyObject<'_>],
    with_sliders: bool,
) -> f64 {
    let Some((last_last, last)) = curr
        .previous(1, diff_objects)
        .zip(curr.previous(0, diff_objects))
    else {
        return 0.0;
    };

    if curr.base.is_spinner() || last.base.is_spinner() {
        return 0.0;
    }

    // * Calculate the velocity to the current hitobject, which starts
    // * with a base distance / time assuming the last object is a hitcircle.
    let mut curr_vel = curr.lazy_jump_dist / curr.strain_time;

    // * But if the last object is a slider, then we extend the travel
    // * velocity through the slider into the current object.
    if last.base.is_slider() && with_sliders {
        // * calculate the slider velocity from slider head to slider end.
        let travel_vel = last.travel_dist / last.travel_time;
        // * calculate the movement velocity from slider end to current object
        let movement_vel = curr.min_jump_dist / curr.min_jump_time;

        // * take the larger total combined velocity.
        curr_vel = curr_vel.max(movement_vel + travel_vel);
    }

    // * As above, do the same for the previous hitobject.
    let mut prev_vel = last.lazy_jump_dist / last.strain_time;

    if last_last.base.is_slider() && with_sliders {
        let travel_vel = last_last.travel_dist / last_last.travel_time;
        let movement_vel = last.min_jump_dist / last.min_jump_time;

        prev_vel = prev_vel.max(movement_vel + travel_vel);
    }

    let mut wide_angle_bonus = 0.0;
    let mut acute_angle_bonus = 0.0;
    let mut vel_change_bonus = 0.0;

    // * Start strain with regular velocity.
    let mut aim_strain = curr_vel;

    let max_strain_time = curr.strain_time.max(last.strain_time);
    let min_strain_time = curr.strain_time.min(last.strain_time);

    // * If rhythms are the same.
    if max_strain_time < 1.25 * min_strain_time {
        if let (Some(curr_angle), Some(last_angle), Some(last_last_angle)) =
            (curr.angle, last.angle, last_last.angle)
        {
            // * Rewarding angles, take the smaller velocity as base.
            let angle_bonus = curr_vel.min(prev_vel);

            wide_angle_bonus = wide_angle(curr_angle);
            acute_angle_bonus = acute_angle(curr_angle);

            // * Only buff deltaTime exceeding 300 bpm 1/2.
            if curr.strain_time > 100.0 {
                acute_angle_bonus = 0.0;
            } else {
                let bpm_factor = (FRAC_PI_2 * ((100.0 - curr.strain_time) / 25.0).min(1.0)).sin();
                let dist_factor =
                    (FRAC_PI_2 * (curr.lazy_jump_dist.clamp(50.0, 100.0) - 50.0) / 50.0).sin();

                // * Multiply by previous angle, we don't want to buff unless this is a wiggle type pattern.
                acute_angle_bonus *= acute_angle(last_angle)
                    // * The maximum velocity we buff is equal to 125 / strainTime
                    * angle_bonus.min(125.0 / curr.strain_time)
                    // * scale buff from 150 bpm 1/4 to 200 bpm 1/4
                    * bpm_factor.powi(2)
                    // * Buff distance exceeding 50 (radius) up to 100 (diameter).
                    * dist_factor.powi(2);
            }

            // * Penalize wide angles if they're repeated, reducing the penalty as the lastAngle gets more acute.
            wide_angle_bonus *=
                angle_bonus * (1.0 - wide_angle_bonus.min(wide_angle(last_angle).powi(3)));

            // * Penalize acute angles if they're repeated, reducing the penalty as the lastLastAngle gets more obtuse.
            acute_angle_bonus *=
                0.5 + 0.5 * (1.0 - acute_angle_bonus.min(acute_angle(last_last_angle).powi(3)));
        }
    }

    if prev_vel.max(curr_vel) > 0.0 {
        // * We want to use the average velocity over the whole object when awarding
        // * differences, not the individual jump and slider path velocities.
        prev_vel = (last.lazy_jump_dist + last_last.travel_dist) / last.strain_time;
        curr_vel = (curr.lazy_jump_dist + last.travel_dist) / curr.strain_time;

        // * Scale with ratio of difference compared to 0.5 * max dist.
        let dist_ratio =
            (FRAC_PI_2 * (prev_vel - curr_vel).abs() / prev_vel.max(curr_vel)).sin().powi(2);

        // * Reward for % distance up to 125 / strainTime for overlaps where velocity is still changing.
        let overlap_vel_buff = (125.0 / min_strain_time).min((prev_vel - curr_vel).abs());

        // * Penalize for rhythm changes.
        vel_change_bonus =
            overlap_vel_buff * dist_ratio * (min_strain_time / max_strain_time).powi(2);
    }

    // * Add in acute angle bonus or wide angle bonus + velocity change bonus, whichever is larger.
    aim_strain += (acute_angle_bonus * ACUTE_ANGLE_MULTIPLIER).max(
        wide_angle_bonus * WIDE_ANGLE_MULTIPLIER + vel_change_bonus * VELOCITY_CHANGE_MULTIPLIER,
    );

    // * Add in additional slider velocity bonus.
    if last.base.is_slider() && with_sliders {
        // * Reward sliders based on velocity.
        aim_strain += last.travel_dist / last.travel_time * SLIDER_MULTIPLIER;
    }

    aim_strain
}

fn wide_angle(angle: f64) -> f64 {
    (3.0 / 4.0 * ((5.0 / 6.0 * PI).min(angle.max(PI / 6.0)) - PI / 6.0))
        .sin()
        .powi(2)
}

fn acute_angle(angle: f64) -> f64 {
    1.0 - wide_angle(angle)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::{acute_angle, wide_angle};

    #[test]
    fn angle_bonuses_are_complementary() {
        for angle in [0.0, PI / 4.0, PI / 2.0, PI] {
            assert!((wide_angle(angle) + acute_angle(angle) - 1.0).abs() < 1e-12);
        }

        assert!(wide_angle(PI) > wide_angle(PI / 3.0));
        assert!(wide_angle(0.0).abs() < 1e-12);
    }
}
