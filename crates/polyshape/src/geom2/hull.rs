use nalgebra::Vector2;

use super::types::DEDUP_EPS;
use super::util::{cross, ensure_len, lex_cmp};
use crate::error::Result;

/// Andrew’s monotone chain convex hull, as indices into `points`.
///
/// Output is CCW (y-up), starting at the lexicographically smallest point.
/// Collinear points are dropped; among coincident points the lowest index is
/// kept. If every point is collinear the result is the two extreme indices.
pub fn convex_hull_indices(points: &[Vector2<f64>]) -> Result<Vec<usize>> {
    ensure_len(points, 2, "convex hull")?;
    let mut idx: Vec<usize> = (0..points.len()).collect();
    // stable sort keeps the lowest index first among equal points
    idx.sort_by(|&a, &b| lex_cmp(&points[a], &points[b]));
    idx.dedup_by(|a, b| (points[*a] - points[*b]).norm() < DEDUP_EPS);
    if idx.len() < 2 {
        return Ok(idx);
    }

    let mut lower: Vec<usize> = Vec::with_capacity(idx.len());
    for &i in &idx {
        while lower.len() >= 2
            && cross(
                points[lower[lower.len() - 2]],
                points[lower[lower.len() - 1]],
                points[i],
            ) <= 0.0
        {
            lower.pop();
        }
        lower.push(i);
    }
    let mut upper: Vec<usize> = Vec::with_capacity(idx.len());
    for &i in idx.iter().rev() {
        while upper.len() >= 2
            && cross(
                points[upper[upper.len() - 2]],
                points[upper[upper.len() - 1]],
                points[i],
            ) <= 0.0
        {
            upper.pop();
        }
        upper.push(i);
    }
    lower.pop();
    upper.pop();
    let mut hull = lower;
    hull.extend(upper);
    Ok(hull)
}

/// Hull vertices in hull order.
pub fn hull_points(points: &[Vector2<f64>]) -> Result<Vec<Vector2<f64>>> {
    Ok(convex_hull_indices(points)?
        .into_iter()
        .map(|i| points[i])
        .collect())
}
