use crate::Pos2;

use super::NORMALIZED_RADIUS;

const OBJECT_RADIUS: f32 = 64.0;

/// Circle size dependent values for distance normalization and stacking.
#[derive(Copy, Clone, Debug)]
pub(crate) struct ScalingFactor {
    /// Multiplier to normalize distances to a common circle size.
    pub(crate) factor: f32,
    pub(crate) radius: f32,
    scale: f32,
}

impl ScalingFactor {
    pub(crate) fn new(cs: f64) -> Self {
        let scale = (1.0 - 0.7 * (cs as f32 - 5.0) / 5.0) / 2.0;
        let radius = OBJECT_RADIUS * scale;
        let mut factor = NORMALIZED_RADIUS / radius;

        // * High circle size (small CS) bonus
        if radius < 30.0 {
            factor *= 1.0 + (30.0 - radius).min(5.0) / 50.0;
        }

        Self {
            factor,
            radius,
            scale,
        }
    }

    pub(crate) fn stack_offset(&self, stack_height: i32) -> Pos2 {
        let offset = stack_height as f32 * self.scale * -6.4;

        Pos2::new(offset, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_circles_get_bonus() {
        let cs4 = ScalingFactor::new(4.0);
        let cs7 = ScalingFactor::new(7.0);

        assert!((cs4.radius - 36.48).abs() < 1e-4);
        assert!((cs4.factor - 50.0 / 36.48).abs() < 1e-4);
        assert!(cs7.factor > 50.0 / cs7.radius);
    }

    #[test]
    fn stack_offset_moves_up_left() {
        let offset = ScalingFactor::new(4.0).stack_offset(2);

        assert!(offset.x < 0.0);
        assert!((offset.x - offset.y).abs() < f32::EPSILON);
    }
}
