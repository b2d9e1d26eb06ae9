//! Bounding shape types and geometric tolerances.
//!
//! - `Aabb`: axis-aligned box, serialized as `[minX, minY, maxX, maxY]`.
//! - `RotatedRect`: center, size along the rotated axes, angle in degrees.
//! - `Circle`: center and radius.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Tolerance for collapsing coincident points during hull construction.
pub(crate) const DEDUP_EPS: f64 = 1e-12;
/// Angle (degrees) below which a rectangle rotation snaps to 0.
pub(crate) const ANGLE_SNAP_EPS: f64 = 1e-9;
/// Relative tolerance for circle containment during incremental construction.
pub(crate) const CIRCLE_EPS: f64 = 1e-10;

/// Axis-aligned bounding box.
///
/// Invariant: `min.x <= max.x` and `min.y <= max.y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vector2<f64>,
    pub max: Vector2<f64>,
}

impl Aabb {
    /// Degenerate box at a single point.
    #[inline]
    pub fn at(p: Vector2<f64>) -> Self {
        Self { min: p, max: p }
    }

    #[inline]
    pub fn extend(&mut self, p: Vector2<f64>) {
        self.min = self.min.inf(&p);
        self.max = self.max.sup(&p);
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn contains(&self, p: Vector2<f64>) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// `[minX, minY, maxX, maxY]`.
    #[inline]
    pub fn to_array(&self) -> [f64; 4] {
        [self.min.x, self.min.y, self.max.x, self.max.y]
    }
}

/// Minimum-area rectangle at arbitrary rotation.
///
/// `size[0]` is measured along the direction `angle` degrees from +x toward +y,
/// `size[1]` along its perpendicular. Both are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotatedRect {
    pub center: [f64; 2],
    pub size: [f64; 2],
    pub angle: f64,
}

impl RotatedRect {
    #[inline]
    pub fn area(&self) -> f64 {
        self.size[0] * self.size[1]
    }

    /// Unit vectors of the rectangle's local x and y axes.
    pub fn axes(&self) -> (Vector2<f64>, Vector2<f64>) {
        let th = self.angle.to_radians();
        let u = Vector2::new(th.cos(), th.sin());
        (u, Vector2::new(-u.y, u.x))
    }

    /// Membership with absolute slack `eps` on each half-extent.
    pub fn contains_eps(&self, p: Vector2<f64>, eps: f64) -> bool {
        let (u, v) = self.axes();
        let d = p - Vector2::new(self.center[0], self.center[1]);
        d.dot(&u).abs() <= self.size[0] / 2.0 + eps && d.dot(&v).abs() <= self.size[1] / 2.0 + eps
    }
}

/// Circle given by center and radius.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: [f64; 2],
    pub radius: f64,
}

impl Circle {
    #[inline]
    pub(crate) fn from_center(c: Vector2<f64>, radius: f64) -> Self {
        Self {
            center: [c.x, c.y],
            radius,
        }
    }

    #[inline]
    pub fn center_vec(&self) -> Vector2<f64> {
        Vector2::new(self.center[0], self.center[1])
    }
}
