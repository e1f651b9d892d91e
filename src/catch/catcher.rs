const AREA_CATCHER_SIZE: f32 = 106.75;

pub(crate) const BASE_SPEED: f64 = 1.0;
pub(crate) const ALLOWED_CATCH_RANGE: f32 = 0.8;

/// Width of the area in which the catcher catches objects for the given circle size.
pub(crate) fn catch_width(cs: f32) -> f32 {
    let scale = 1.0 - 0.7 * (cs - 5.0) / 5.0;

    AREA_CATCHER_SIZE * scale.abs() * ALLOWED_CATCH_RANGE
}

/// Half the catch width, further reduced for high circle sizes to
/// simulate imperfect gameplay.
pub(crate) fn half_catcher_width(cs: f32) -> f32 {
    let half_width = catch_width(cs) * 0.5;

    half_width * (1.0 - (cs - 5.5).max(0.0) * 0.0625)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cs5_is_base_size() {
        assert!((catch_width(5.0) - 85.4).abs() < 1e-4);
        assert!((half_catcher_width(5.0) - 42.7).abs() < 1e-4);
    }

    #[test]
    fn higher_cs_is_smaller() {
        assert!(half_catcher_width(7.0) < half_catcher_width(4.0));
    }
}
