//! Movement line: the polyline characters patrol and walk along
//!
//! A line is parameterized by arc length in line-space `[0, 1]`. When the
//! line is cyclic the last point connects back to the first, and that
//! closing segment is part of the parameterization.

use crate::quaternion::Quat;
use crate::vector::Vec3;
use thiserror::Error;

/// Tolerance for the point-on-segment test in [`MovementLine::reverse_interpolate`]
const ON_SEGMENT_TOLERANCE: f32 = 1e-3;

/// Line construction errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LineError {
    #[error("movement line needs at least 2 points, got {0}")]
    TooFewPoints(usize),

    #[error("movement line has zero total length")]
    ZeroLength,
}

/// Ordered polyline with arc-length queries
#[derive(Clone, Debug, PartialEq)]
pub struct MovementLine {
    points: Vec<Vec3>,
    cyclic: bool,
    total_length: f32,
}

impl MovementLine {
    /// Create a line from waypoints
    pub fn new(points: Vec<Vec3>, cyclic: bool) -> Result<Self, LineError> {
        if points.len() < 2 {
            return Err(LineError::TooFewPoints(points.len()));
        }

        let mut line = Self {
            points,
            cyclic,
            total_length: 0.0,
        };
        line.total_length = line.measure();

        if line.total_length <= f32::EPSILON {
            return Err(LineError::ZeroLength);
        }
        Ok(line)
    }

    /// The same waypoints with the closing segment added. Closing only
    /// lengthens the line, so it stays valid.
    pub fn closed(mut self) -> Self {
        if !self.cyclic {
            self.cyclic = true;
            self.total_length = self.measure();
        }
        self
    }

    fn measure(&self) -> f32 {
        (0..self.segment_count())
            .map(|i| {
                let (a, b) = self.segment(i);
                a.distance(b)
            })
            .sum()
    }

    /// Waypoints in order
    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Whether the last point connects back to the first
    #[inline]
    pub fn is_cyclic(&self) -> bool {
        self.cyclic
    }

    /// Arc length of every segment combined
    #[inline]
    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// Number of segments, including the closing one on cyclic lines
    #[inline]
    pub fn segment_count(&self) -> usize {
        if self.cyclic {
            self.points.len()
        } else {
            self.points.len() - 1
        }
    }

    /// Endpoints of segment `index`
    #[inline]
    pub fn segment(&self, index: usize) -> (Vec3, Vec3) {
        let a = self.points[index];
        let b = self.points[(index + 1) % self.points.len()];
        (a, b)
    }

    /// Wrap a line-space parameter into `[0, 1]`
    pub fn wrap(&self, t: f32) -> f32 {
        if self.cyclic {
            t.rem_euclid(1.0)
        } else {
            t.clamp(0.0, 1.0)
        }
    }

    /// Convert a world distance into a line-space offset
    #[inline]
    pub fn world_offset_to_line_space(&self, units: f32) -> f32 {
        units / self.total_length
    }

    /// Point at arc-length parameter `t`.
    ///
    /// `t <= 0` yields the first point; values past the end yield the end of
    /// the final segment.
    pub fn interpolate(&self, t: f32) -> Vec3 {
        if t <= 0.0 {
            return self.points[0];
        }

        let target = t * self.total_length;
        let mut walked = 0.0;
        for i in 0..self.segment_count() {
            let (a, b) = self.segment(i);
            let length = a.distance(b);
            if walked + length >= target {
                if length <= f32::EPSILON {
                    return a;
                }
                return a.lerp(b, (target - walked) / length);
            }
            walked += length;
        }

        self.segment(self.segment_count() - 1).1
    }

    /// Line-space parameter of a point lying on the line.
    ///
    /// Each segment is tested by direction; the first segment the point lies
    /// along wins. Returns `1.0` when no segment matches.
    pub fn reverse_interpolate(&self, point: Vec3) -> f32 {
        let mut walked = 0.0;
        for i in 0..self.segment_count() {
            let (a, b) = self.segment(i);
            let length = a.distance(b);
            let offset = point - a;
            let along = offset.length();

            if along <= ON_SEGMENT_TOLERANCE {
                return walked / self.total_length;
            }

            if length > f32::EPSILON {
                let direction = (b - a) / length;
                let aligned = offset.normalize().dot(direction) >= 1.0 - ON_SEGMENT_TOLERANCE;
                if aligned && along <= length + ON_SEGMENT_TOLERANCE {
                    return (walked + along) / self.total_length;
                }
            }

            walked += length;
        }

        1.0
    }

    /// Approximate projection of `point` onto the line.
    ///
    /// Only the two segments adjacent to the nearest vertex are evaluated. On
    /// lines whose segments are much longer than the vertex spacing this can
    /// pick the wrong segment.
    pub fn closest_point_on_line(&self, point: Vec3) -> Vec3 {
        self.nearest_projection(point).0
    }

    /// Unit direction of the segment holding the nearest projection of `point`
    pub fn edge_normal_at(&self, point: Vec3) -> Vec3 {
        let (_, segment) = self.nearest_projection(point);
        let (a, b) = self.segment(segment);
        (b - a).normalize_or_zero()
    }

    /// Unit direction of travel at parameter `t`
    pub fn tangent_at(&self, t: f32) -> Vec3 {
        let (a, b) = self.segment(self.segment_index_at(t));
        (b - a).normalize_or_zero()
    }

    /// Unit normal at parameter `t`, perpendicular to both the tangent and `up`
    pub fn normal_at(&self, t: f32, up: Vec3) -> Vec3 {
        up.cross(self.tangent_at(t)).normalize_or_zero()
    }

    /// Rotate every waypoint around `pivot`. Lengths, and so every
    /// line-space parameter, are unchanged.
    pub fn rotate_around(&mut self, pivot: Vec3, rotation: Quat) {
        for point in &mut self.points {
            *point = pivot + rotation * (*point - pivot);
        }
    }

    fn segment_index_at(&self, t: f32) -> usize {
        let target = t.max(0.0) * self.total_length;
        let mut walked = 0.0;
        for i in 0..self.segment_count() {
            let (a, b) = self.segment(i);
            walked += a.distance(b);
            if walked >= target {
                return i;
            }
        }
        self.segment_count() - 1
    }

    fn nearest_vertex(&self, point: Vec3) -> usize {
        let mut best = 0;
        let mut best_distance = f32::MAX;
        for (i, vertex) in self.points.iter().enumerate() {
            let d = vertex.distance(point);
            if d < best_distance {
                best_distance = d;
                best = i;
            }
        }
        best
    }

    /// Closest point and the segment index it lies on
    fn nearest_projection(&self, point: Vec3) -> (Vec3, usize) {
        let count = self.points.len();
        let vertex = self.nearest_vertex(point);

        let mut candidates: [Option<usize>; 2] = [None, None];
        if vertex > 0 {
            candidates[0] = Some(vertex - 1);
        } else if self.cyclic {
            candidates[0] = Some(count - 1);
        }
        if vertex < self.segment_count() {
            candidates[1] = Some(vertex);
        }

        let mut best = (self.points[vertex], candidates.iter().flatten().copied().next().unwrap_or(0));
        let mut best_distance = f32::MAX;
        for segment in candidates.iter().flatten().copied() {
            let (a, b) = self.segment(segment);
            let projected = project_onto_segment(point, a, b);
            let d = projected.distance(point);
            if d < best_distance {
                best_distance = d;
                best = (projected, segment);
            }
        }
        best
    }
}

fn project_onto_segment(point: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let ab = b - a;
    let length_sq = ab.length_squared();
    if length_sq <= f32::EPSILON {
        return a;
    }
    let t = ((point - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    a + ab * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn square() -> MovementLine {
        MovementLine::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(10.0, 10.0, 0.0),
                Vec3::new(0.0, 10.0, 0.0),
            ],
            true,
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_degenerate_lines() {
        assert_eq!(MovementLine::new(vec![Vec3::ZERO], true), Err(LineError::TooFewPoints(1)));
        assert_eq!(MovementLine::new(vec![Vec3::ZERO, Vec3::ZERO], false), Err(LineError::ZeroLength));
    }

    #[test]
    fn test_total_length_includes_closing_segment() {
        assert_abs_diff_eq!(square().total_length(), 40.0, epsilon = 1e-4);
        let open = MovementLine::new(square().points().to_vec(), false).unwrap();
        assert_abs_diff_eq!(open.total_length(), 30.0, epsilon = 1e-4);

        let closed = open.closed();
        assert!(closed.is_cyclic());
        assert_abs_diff_eq!(closed.total_length(), 40.0, epsilon = 1e-4);
    }

    #[test]
    fn test_interpolate_walks_arc_length() {
        let line = square();
        assert_eq!(line.interpolate(-0.5), Vec3::ZERO);
        let p = line.interpolate(0.375);
        assert_abs_diff_eq!(p.x, 10.0, epsilon = 1e-4);
        assert_abs_diff_eq!(p.y, 5.0, epsilon = 1e-4);
        // Overflow returns the end of the closing segment
        assert_eq!(line.interpolate(2.0), Vec3::ZERO);
    }

    #[test]
    fn test_reverse_interpolate_round_trip() {
        let line = square();
        for &t in &[0.1_f32, 0.3, 0.6, 0.85] {
            let back = line.reverse_interpolate(line.interpolate(t));
            assert_abs_diff_eq!(back, t, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_reverse_interpolate_falls_back_to_one() {
        assert_eq!(square().reverse_interpolate(Vec3::new(5.0, 5.0, 0.0)), 1.0);
    }

    #[test]
    fn test_closest_point_uses_adjacent_segments() {
        let line = square();
        let p = line.closest_point_on_line(Vec3::new(9.0, 3.0, 0.0));
        assert_abs_diff_eq!(p.x, 10.0, epsilon = 1e-4);
        assert_abs_diff_eq!(p.y, 3.0, epsilon = 1e-4);
    }

    #[test]
    fn test_edge_normal_is_segment_direction() {
        let line = square();
        let n = line.edge_normal_at(Vec3::new(4.0, -1.0, 0.0));
        assert_eq!(n, Vec3::X);
        let n = line.edge_normal_at(Vec3::new(-1.0, 6.0, 0.0));
        assert_eq!(n, Vec3::NEG_Y);
    }

    #[test]
    fn test_world_offset_and_wrap() {
        let line = square();
        assert_abs_diff_eq!(line.world_offset_to_line_space(10.0), 0.25, epsilon = 1e-6);
        assert_abs_diff_eq!(line.wrap(1.25), 0.25, epsilon = 1e-6);
        assert_abs_diff_eq!(line.wrap(-0.25), 0.75, epsilon = 1e-6);
        let open = MovementLine::new(line.points().to_vec(), false).unwrap();
        assert_eq!(open.wrap(1.25), 1.0);
    }

    #[test]
    fn test_tangent_and_normal() {
        let line = square();
        assert_eq!(line.tangent_at(0.1), Vec3::X);
        let n = line.normal_at(0.1, Vec3::Z);
        assert_abs_diff_eq!(n.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rotation_keeps_parameters() {
        let mut line = MovementLine::new(vec![Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)], false).unwrap();
        line.rotate_around(Vec3::ZERO, Quat::from_rotation_y(core::f32::consts::FRAC_PI_2));
        assert_abs_diff_eq!(line.total_length(), 4.0, epsilon = 1e-5);
        let mid = line.interpolate(0.5);
        assert_abs_diff_eq!(mid.x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(mid.z, -2.0, epsilon = 1e-5);
    }
}
