use crate::Pos2;

/// Binomial coefficient `n choose p`.
#[inline]
pub(crate) fn cpn(mut p: i32, n: i32) -> f64 {
    if p < 0 || p > n {
        return 0.0;
    }

    p = p.min(n - p);
    let mut out = 1.0;

    for i in 1..=p {
        out *= f64::from(n - p + i) / f64::from(i);
    }

    out
}

#[inline]
pub(crate) fn catmull(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;

    0.5 * (2.0 * p1
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Center and radius of the circle through three points.
///
/// `None` if the points are (nearly) collinear.
pub(crate) fn circum_circle(a: Pos2, b: Pos2, c: Pos2) -> Option<(Pos2, f32)> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));

    if d.abs() < 1e-3 {
        return None;
    }

    let a_sq = a.length_squared();
    let b_sq = b.length_squared();
    let c_sq = c.length_squared();

    let center = Pos2 {
        x: (a_sq * (b.y - c.y) + b_sq * (c.y - a.y) + c_sq * (a.y - b.y)) / d,
        y: (a_sq * (c.x - b.x) + b_sq * (a.x - c.x) + c_sq * (b.x - a.x)) / d,
    };

    Some((center, a.distance(center)))
}

#[inline]
pub(crate) fn lerp(start: f64, end: f64, amount: f64) -> f64 {
    start + (end - start) * amount
}

/// Logistic function `max / (1 + e^(-multiplier * (x - midpoint)))`.
#[inline]
pub(crate) fn logistic(x: f64, midpoint: f64, multiplier: f64, max: f64) -> f64 {
    max / (1.0 + (-multiplier * (x - midpoint)).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binomial() {
        assert!((cpn(2, 4) - 6.0).abs() < f64::EPSILON);
        assert!((cpn(0, 3) - 1.0).abs() < f64::EPSILON);
        assert!(cpn(4, 3).abs() < f64::EPSILON);
    }

    #[test]
    fn catmull_hits_control_points() {
        assert!((catmull(0.0, 1.0, 2.0, 3.0, 0.0) - 1.0).abs() < f32::EPSILON);
        assert!((catmull(0.0, 1.0, 2.0, 3.0, 1.0) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn circle_through_points() {
        let (center, radius) = circum_circle(
            Pos2 { x: 0.0, y: 10.0 },
            Pos2 { x: 10.0, y: 0.0 },
            Pos2 { x: 0.0, y: -10.0 },
        )
        .unwrap();

        assert!(center.length() < 1e-4);
        assert!((radius - 10.0).abs() < 1e-4);

        let collinear = circum_circle(
            Pos2 { x: 0.0, y: 0.0 },
            Pos2 { x: 1.0, y: 1.0 },
            Pos2 { x: 2.0, y: 2.0 },
        );

        assert!(collinear.is_none());
    }
}
