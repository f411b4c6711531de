// MIT License
//
// Copyright (c) 2024 Erik Holum
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Planar primitives: points, disc obstacles, the sampling workspace and the
//! discretized edge collision check.

use crate::error::PlanningError;
use crate::tree::Distance;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Basic 2D point for representing positions in the plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Point2D { x, y }
    }
}

// Norm distance function for 2D points
impl Distance for Point2D {
    fn distance(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

// Handy for debugging
impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Point2D::new(x, y)
    }
}

/// A closed disc that no part of the path may touch.
///
/// Serialized as a `[center_x, center_y, radius]` triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64, f64)", into = "(f64, f64, f64)")]
pub struct CircleObstacle {
    pub center: Point2D,
    pub radius: f64,
}

impl CircleObstacle {
    #[must_use]
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        CircleObstacle {
            center: Point2D::new(x, y),
            radius,
        }
    }

    /// True if the point is inside the disc or on its boundary.
    #[must_use]
    pub fn contains(&self, p: &Point2D) -> bool {
        self.center.distance(p) <= self.radius
    }
}

impl From<(f64, f64, f64)> for CircleObstacle {
    fn from((x, y, radius): (f64, f64, f64)) -> Self {
        CircleObstacle::new(x, y, radius)
    }
}

impl From<CircleObstacle> for (f64, f64, f64) {
    fn from(o: CircleObstacle) -> Self {
        (o.center.x, o.center.y, o.radius)
    }
}

/// Axis aligned rectangle that random samples are drawn from.
///
/// This only bounds sampling, it is not an obstacle: steering toward the goal may leave it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Workspace {
    #[must_use]
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Workspace {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Bounds must be finite and ordered. A zero width or height is accepted and
    /// samples collapse onto a line or point.
    ///
    /// # Errors
    ///
    /// If any bound is not finite or a minimum exceeds its maximum.
    pub fn validate(&self) -> Result<(), PlanningError> {
        let bounds = [self.min_x, self.max_x, self.min_y, self.max_y];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(PlanningError::Workspace(format!(
                "bounds must be finite, got {self:?}"
            )));
        }
        if self.min_x > self.max_x || self.min_y > self.max_y {
            return Err(PlanningError::Workspace(format!(
                "minimum exceeds maximum in {self:?}"
            )));
        }
        Ok(())
    }

    /// Uniformly sample a point from the rectangle.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Point2D {
        Point2D::new(
            rng.gen_range(self.min_x..=self.max_x),
            rng.gen_range(self.min_y..=self.max_y),
        )
    }

    #[must_use]
    pub fn contains(&self, p: &Point2D) -> bool {
        (self.min_x..=self.max_x).contains(&p.x) && (self.min_y..=self.max_y).contains(&p.y)
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Workspace::new(0.0, 100.0, 0.0, 100.0)
    }
}

/// True if `p` lies within or on the boundary of any obstacle.
#[must_use]
pub fn in_obstacle(p: &Point2D, obstacles: &[CircleObstacle]) -> bool {
    obstacles.iter().any(|o| o.contains(p))
}

/// Discretized collision test along the segment `a -> b`.
///
/// Checks `ceil(length / resolution) + 1` evenly spaced points including both endpoints, so
/// consecutive samples are never more than `resolution` apart. A zero length edge is a single
/// point test. This is an approximation: an obstacle narrower than `resolution` can slip
/// between two samples, so `resolution` should stay below the smallest obstacle radius.
#[must_use]
pub fn edge_blocked(
    a: &Point2D,
    b: &Point2D,
    obstacles: &[CircleObstacle],
    resolution: f64,
) -> bool {
    let length = a.distance(b);
    if length == 0.0 {
        return in_obstacle(a, obstacles);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let segments = (length / resolution).ceil().max(1.0) as usize;
    (0..=segments).any(|i| {
        #[allow(clippy::cast_precision_loss)]
        let t = i as f64 / segments as f64;
        let p = Point2D::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
        in_obstacle(&p, obstacles)
    })
}

/// Returns `to` if it is within `step_size` of `from`, otherwise the point `step_size` along
/// the bearing from `from` toward `to`.
#[must_use]
pub fn steer(from: &Point2D, to: &Point2D, step_size: f64) -> Point2D {
    if from.distance(to) <= step_size {
        return *to;
    }
    let theta = (to.y - from.y).atan2(to.x - from.x);
    Point2D::new(
        from.x + step_size * theta.cos(),
        from.y + step_size * theta.sin(),
    )
}

/// Euclidean length of a polyline.
#[must_use]
pub fn path_length(path: &[Point2D]) -> f64 {
    path.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_distance() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(b.distance(&a), 5.0);
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn test_obstacle_boundary_is_blocked() {
        let obstacles = [CircleObstacle::new(0.0, 0.0, 2.0)];
        assert!(in_obstacle(&Point2D::new(2.0, 0.0), &obstacles));
        assert!(in_obstacle(&Point2D::new(0.5, 0.5), &obstacles));
        assert!(!in_obstacle(&Point2D::new(2.0, 0.1), &obstacles));
        assert!(!in_obstacle(&Point2D::new(0.0, 0.0), &[]));
    }

    #[test]
    fn test_edge_blocked() {
        let obstacles = [CircleObstacle::new(5.0, 0.0, 1.0)];

        // Straight through the middle of the disc
        assert!(edge_blocked(
            &Point2D::new(0.0, 0.0),
            &Point2D::new(10.0, 0.0),
            &obstacles,
            1.0
        ));

        // Passes well clear above it
        assert!(!edge_blocked(
            &Point2D::new(0.0, 3.0),
            &Point2D::new(10.0, 3.0),
            &obstacles,
            1.0
        ));

        // Endpoint inside the disc counts
        assert!(edge_blocked(
            &Point2D::new(0.0, 0.0),
            &Point2D::new(4.5, 0.0),
            &obstacles,
            100.0
        ));

        // No obstacles, nothing blocks
        assert!(!edge_blocked(
            &Point2D::new(0.0, 0.0),
            &Point2D::new(4.5, 0.0),
            &[],
            1.0
        ));
    }

    #[test]
    fn test_edge_blocked_zero_length() {
        let obstacles = [CircleObstacle::new(0.0, 0.0, 1.0)];
        let inside = Point2D::new(0.5, 0.0);
        let outside = Point2D::new(3.0, 0.0);
        assert!(edge_blocked(&inside, &inside, &obstacles, 1.0));
        assert!(!edge_blocked(&outside, &outside, &obstacles, 1.0));
    }

    #[test]
    fn test_coarse_resolution_can_miss_thin_obstacles() {
        // Samples land on x = 0 and x = 10 only
        let obstacles = [CircleObstacle::new(5.0, 0.0, 0.5)];
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(10.0, 0.0);
        assert!(!edge_blocked(&a, &b, &obstacles, 10.0));
        assert!(edge_blocked(&a, &b, &obstacles, 0.25));
    }

    #[test]
    fn test_steer() {
        let from = Point2D::new(0.0, 0.0);

        // Close enough to reach directly
        let near = Point2D::new(1.0, 1.0);
        assert_eq!(steer(&from, &near, 2.0), near);

        // Too far, clipped to the step size
        let far = Point2D::new(0.0, 10.0);
        let stepped = steer(&from, &far, 2.0);
        assert!(approx_eq!(f64, stepped.x, 0.0, epsilon = 1e-12));
        assert!(approx_eq!(f64, stepped.y, 2.0, epsilon = 1e-12));
        assert!(approx_eq!(f64, from.distance(&stepped), 2.0, epsilon = 1e-12));
    }

    #[test]
    fn test_path_length() {
        let path = [
            Point2D::new(0.0, 0.0),
            Point2D::new(3.0, 4.0),
            Point2D::new(3.0, 0.0),
        ];
        assert_eq!(path_length(&path), 9.0);
        assert_eq!(path_length(&path[..1]), 0.0);
        assert_eq!(path_length(&[]), 0.0);
    }

    #[test]
    fn test_workspace_sampling_stays_in_bounds() {
        let workspace = Workspace::new(-5.0, 5.0, 10.0, 12.0);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(workspace.contains(&workspace.sample(&mut rng)));
        }
    }

    #[test]
    fn test_workspace_validate() {
        assert!(Workspace::default().validate().is_ok());
        assert!(Workspace::new(1.0, 1.0, 0.0, 0.0).validate().is_ok());
        assert!(Workspace::new(1.0, 0.0, 0.0, 1.0).validate().is_err());
        assert!(Workspace::new(0.0, f64::NAN, 0.0, 1.0).validate().is_err());
    }

    #[test]
    fn test_obstacle_triple_format() {
        let obstacles: Vec<CircleObstacle> =
            serde_yaml::from_str("- [40.0, 40.0, 10.0]\n- [70, 70, 15]\n").unwrap();
        assert_eq!(
            obstacles,
            vec![
                CircleObstacle::new(40.0, 40.0, 10.0),
                CircleObstacle::new(70.0, 70.0, 15.0)
            ]
        );
    }
}
