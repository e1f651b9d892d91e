use std::f64::consts::PI;

use crate::{math_util, parse::PathType, Pos2};

const BEZIER_TOLERANCE: f64 = 0.25;
const CATMULL_DETAIL: usize = 50;
const CIRCULAR_ARC_TOLERANCE: f32 = 0.1;

/// Slider path approximated as a polyline.
///
/// The polyline is cut or extended so that its length matches the
/// pixel length given in the `.osu` file.
#[derive(Clone, Debug, Default)]
pub(crate) struct Curve {
    path: Vec<Pos2>,
    cumulative_len: Vec<f64>,
}

impl Curve {
    /// `control_points` start with the slider head. An `expected_len` that is
    /// not positive keeps the calculated length.
    pub(crate) fn new(control_points: &[Pos2], path_type: PathType, expected_len: f64) -> Self {
        let path = match control_points {
            [] => Vec::new(),
            [single] => vec![*single],
            _ => match path_type {
                PathType::Linear => control_points.to_vec(),
                PathType::PerfectCurve => match control_points {
                    [a, b, c] => {
                        circular_arc(*a, *b, *c).unwrap_or_else(|| bezier(control_points))
                    }
                    _ => bezier(control_points),
                },
                PathType::Catmull => catmull(control_points),
                PathType::Bezier => bezier(control_points),
            },
        };

        let mut curve = Self {
            path,
            cumulative_len: Vec::new(),
        };

        curve.calculate_len(expected_len);

        curve
    }

    /// Total length of the path in osu!pixels.
    #[inline]
    pub(crate) fn dist(&self) -> f64 {
        self.cumulative_len.last().copied().unwrap_or(0.0)
    }

    /// Position at the given progress between `0.0` (head) and `1.0` (end).
    pub(crate) fn position_at(&self, progress: f64) -> Pos2 {
        let d = progress.clamp(0.0, 1.0) * self.dist();
        let i = self.cumulative_len.partition_point(|&len| len < d);

        self.interpolate_vertices(i, d)
    }

    fn interpolate_vertices(&self, i: usize, d: f64) -> Pos2 {
        let (Some(first), Some(last)) = (self.path.first(), self.path.last()) else {
            return Pos2::zero();
        };

        if i == 0 {
            return *first;
        } else if i >= self.path.len() {
            return *last;
        }

        let p0 = self.path[i - 1];
        let p1 = self.path[i];

        let d0 = self.cumulative_len[i - 1];
        let d1 = self.cumulative_len[i];

        if (d0 - d1).abs() < 1e-3 {
            return p0;
        }

        let weight = (d - d0) / (d1 - d0);

        p0 + (p1 - p0) * weight as f32
    }

    fn calculate_len(&mut self, expected_len: f64) {
        let mut calculated_len = 0.0;
        self.cumulative_len.clear();
        self.cumulative_len.reserve(self.path.len());
        self.cumulative_len.push(0.0);

        for w in self.path.windows(2) {
            calculated_len += f64::from(w[0].distance(w[1]));
            self.cumulative_len.push(calculated_len);
        }

        if expected_len <= 0.0 || (calculated_len - expected_len).abs() < f64::EPSILON {
            return;
        }

        // * In osu-stable, if the last two path points of a slider are equal, extension is not performed
        if let [.., a, b] = self.path.as_slice() {
            if a == b && expected_len > calculated_len {
                return;
            }
        }

        // * The last length is always incorrect
        self.cumulative_len.pop();

        let mut path_end_idx = self.path.len().saturating_sub(1);

        if calculated_len > expected_len {
            // * The path will be shortened further, in which case we should trim
            // * any more unnecessary lengths and their associated path segments
            while self
                .cumulative_len
                .last()
                .map_or(false, |&len| len >= expected_len)
            {
                self.cumulative_len.pop();
                self.path.truncate(path_end_idx);
                path_end_idx = path_end_idx.saturating_sub(1);
            }
        }

        if path_end_idx == 0 {
            // * The expected distance is negative or zero
            self.path.truncate(1);
            self.cumulative_len.clear();
            self.cumulative_len.push(0.0);

            return;
        }

        let prev = self.path[path_end_idx - 1];
        let dir = (self.path[path_end_idx] - prev).normalize();
        let remaining = expected_len - self.cumulative_len.last().copied().unwrap_or(0.0);

        self.path[path_end_idx] = prev + dir * remaining as f32;
        self.cumulative_len.push(expected_len);
    }
}

fn bezier(points: &[Pos2]) -> Vec<Pos2> {
    let mut result = Vec::with_capacity(points.len() * 8);
    let mut start = 0;

    // Two consecutive equal points start a new segment
    for end in 1..points.len() {
        if end - start > 1 && points[end] == points[end - 1] {
            bezier_segment(&mut result, &points[start..end]);
            start = end;
        }
    }

    bezier_segment(&mut result, &points[start..]);

    result
}

fn bezier_segment(result: &mut Vec<Pos2>, points: &[Pos2]) {
    if points.len() < 2 {
        result.extend_from_slice(points);

        return;
    }

    let n = points.len() as i32 - 1;
    let step = (BEZIER_TOLERANCE / f64::from(n + 1)).max(0.01);
    let steps = (1.0 / step).ceil() as usize;

    for s in 0..=steps {
        let t = (s as f64 * step).min(1.0);

        let point = (0..).zip(points).fold(Pos2::zero(), |point, (p, curr)| {
            let factor = math_util::cpn(p, n) * (1.0 - t).powi(n - p) * t.powi(p);

            point + *curr * factor as f32
        });

        result.push(point);
    }
}

fn catmull(points: &[Pos2]) -> Vec<Pos2> {
    let order = points.len();
    let mut result = Vec::with_capacity((order - 1) * CATMULL_DETAIL * 2);

    for i in 0..order - 1 {
        let v1 = if i > 0 { points[i - 1] } else { points[i] };
        let v2 = points[i];
        let v3 = points[i + 1];

        let v4 = if i + 2 < order {
            points[i + 2]
        } else {
            v3 * 2.0 - v2
        };

        for c in 0..CATMULL_DETAIL {
            let t0 = c as f32 / CATMULL_DETAIL as f32;
            let t1 = (c + 1) as f32 / CATMULL_DETAIL as f32;

            result.push(catmull_point(v1, v2, v3, v4, t0));
            result.push(catmull_point(v1, v2, v3, v4, t1));
        }
    }

    result
}

#[inline]
fn catmull_point(p0: Pos2, p1: Pos2, p2: Pos2, p3: Pos2, t: f32) -> Pos2 {
    Pos2 {
        x: math_util::catmull(p0.x, p1.x, p2.x, p3.x, t),
        y: math_util::catmull(p0.y, p1.y, p2.y, p3.y, t),
    }
}

fn circular_arc(a: Pos2, b: Pos2, c: Pos2) -> Option<Vec<Pos2>> {
    let (center, radius) = math_util::circum_circle(a, b, c)?;

    let theta_start = f64::from((a.y - center.y).atan2(a.x - center.x));
    let mut theta_end = f64::from((c.y - center.y).atan2(c.x - center.x));

    while theta_end < theta_start {
        theta_end += 2.0 * PI;
    }

    let mut dir = 1.0;
    let mut theta_range = theta_end - theta_start;

    // * Decide in which direction to draw the circle, depending on which side of AC B lies
    let a_to_c = c - a;
    let ortho_a_to_c = Pos2 {
        x: a_to_c.y,
        y: -a_to_c.x,
    };

    if ortho_a_to_c.dot(b - a) < 0.0 {
        dir = -1.0;
        theta_range = 2.0 * PI - theta_range;
    }

    let amount_points = if 2.0 * radius <= CIRCULAR_ARC_TOLERANCE {
        2
    } else {
        let max_step = 2.0 * f64::from(1.0 - CIRCULAR_ARC_TOLERANCE / radius).acos();

        ((theta_range / max_step).ceil() as usize).max(2)
    };

    let radius = f64::from(radius);

    let points = (0..amount_points)
        .map(|i| {
            let fract = i as f64 / (amount_points - 1) as f64;
            let theta = theta_start + dir * fract * theta_range;

            center
                + Pos2 {
                    x: (theta.cos() * radius) as f32,
                    y: (theta.sin() * radius) as f32,
                }
        })
        .collect();

    Some(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: f32, y: f32) -> Pos2 {
        Pos2 { x, y }
    }

    #[test]
    fn linear_is_trimmed() {
        let points = [pos(0.0, 0.0), pos(100.0, 0.0), pos(100.0, 100.0)];
        let curve = Curve::new(&points, PathType::Linear, 150.0);

        assert!((curve.dist() - 150.0).abs() < 1e-6);

        let end = curve.position_at(1.0);
        assert!((end.x - 100.0).abs() < 1e-4);
        assert!((end.y - 50.0).abs() < 1e-4);

        let mid = curve.position_at(0.5);
        assert!((mid.x - 75.0).abs() < 1e-4);
        assert!(mid.y.abs() < 1e-4);
    }

    #[test]
    fn linear_is_extended() {
        let points = [pos(0.0, 0.0), pos(50.0, 0.0)];
        let curve = Curve::new(&points, PathType::Linear, 80.0);

        assert!((curve.dist() - 80.0).abs() < 1e-6);
        assert!((curve.position_at(1.0).x - 80.0).abs() < 1e-4);
    }

    #[test]
    fn calculated_length_without_expected() {
        let points = [pos(0.0, 0.0), pos(30.0, 40.0)];
        let curve = Curve::new(&points, PathType::Bezier, 0.0);

        assert!((curve.dist() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn perfect_curve_half_circle() {
        let points = [pos(0.0, 0.0), pos(50.0, 50.0), pos(100.0, 0.0)];
        let expected = 50.0 * PI;
        let curve = Curve::new(&points, PathType::PerfectCurve, expected);

        assert!((curve.dist() - expected).abs() < 1e-3);

        let mid = curve.position_at(0.5);
        assert!((mid.x - 50.0).abs() < 0.5, "{mid:?}");
        assert!((mid.y - 50.0).abs() < 0.5, "{mid:?}");
    }

    #[test]
    fn collinear_perfect_curve_falls_back() {
        let points = [pos(0.0, 0.0), pos(50.0, 0.0), pos(100.0, 0.0)];
        let curve = Curve::new(&points, PathType::PerfectCurve, 100.0);

        assert!((curve.position_at(1.0).x - 100.0).abs() < 1e-3);
    }

    #[test]
    fn catmull_passes_through_end() {
        let points = [pos(0.0, 0.0), pos(50.0, 20.0), pos(100.0, 0.0)];
        let curve = Curve::new(&points, PathType::Catmull, 0.0);
        let end = curve.position_at(1.0);

        assert!((end.x - 100.0).abs() < 1e-3);
        assert!(end.y.abs() < 1e-3);
    }
}
