/// Fruit or droplet that has to be caught.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PalpableObject {
    pub(crate) x: f32,
    /// Offset applied by Hard Rock.
    pub(crate) x_offset: f32,
    pub(crate) start_time: f64,
    pub(crate) dist_to_hyper_dash: f32,
    pub(crate) hyper_dash: bool,
}

impl PalpableObject {
    pub(crate) const fn new(x: f32, x_offset: f32, start_time: f64) -> Self {
        Self {
            x,
            x_offset,
            start_time,
            dist_to_hyper_dash: 0.0,
            hyper_dash: false,
        }
    }

    #[inline]
    pub(crate) fn effective_x(&self) -> f32 {
        self.x + self.x_offset
    }
}

/// Amount of bananas in a shower between the two times.
pub(crate) fn banana_count(start_time: f64, end_time: f64) -> usize {
    // * Int truncation added to match osu!stable.
    let start_time = start_time as i32;
    let end_time = end_time as i32;
    let mut spacing = (end_time - start_time) as f32;

    while spacing > 100.0 {
        spacing /= 2.0;
    }

    if spacing <= 0.0 {
        return 0;
    }

    let end_time = end_time as f32;
    let mut time = start_time as f32;
    let mut count = 0;

    while time <= end_time {
        time += spacing;
        count += 1;
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_moves_effective_x() {
        let h = PalpableObject::new(100.0, -12.5, 0.0);

        assert!((h.effective_x() - 87.5).abs() < f32::EPSILON);
    }

    #[test]
    fn bananas() {
        assert_eq!(banana_count(1000.0, 1000.0), 0);
        // spacing is halved down to 62.5 so there are 17 steps in 1000ms
        assert_eq!(banana_count(1000.0, 2000.0), 17);
        assert_eq!(banana_count(1000.0, 1050.0), 2);
    }
}
