use std::cmp::Ordering;

use nalgebra::Vector2;

use super::types::Aabb;
use crate::error::{PolyError, Result};

/// Axis-aligned bounds of a point set (order independent).
pub fn compute_bounds(points: &[Vector2<f64>]) -> Result<Aabb> {
    let (first, rest) = points
        .split_first()
        .ok_or_else(|| PolyError::DegenerateGeometry("bounds of an empty ring".into()))?;
    let mut b = Aabb::at(*first);
    for p in rest {
        b.extend(*p);
    }
    Ok(b)
}

/// Fail unless `points` has at least `min` entries.
pub(crate) fn ensure_len(points: &[Vector2<f64>], min: usize, what: &str) -> Result<()> {
    if points.len() < min {
        return Err(PolyError::DegenerateGeometry(format!(
            "{what} needs at least {min} points, got {}",
            points.len()
        )));
    }
    Ok(())
}

/// Z-component of `(b - a) × (c - a)`; positive when `a→b→c` turns left.
#[inline]
pub(crate) fn cross(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}

/// Lexicographic `(x, y)` order; NaN compares equal.
#[inline]
pub(crate) fn lex_cmp(a: &Vector2<f64>, b: &Vector2<f64>) -> Ordering {
    match a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal) {
        Ordering::Equal => a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal),
        o => o,
    }
}
