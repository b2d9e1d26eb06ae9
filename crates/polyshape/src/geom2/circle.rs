use nalgebra::Vector2;

use super::types::{Circle, CIRCLE_EPS};
use super::util::{cross, ensure_len};
use crate::error::Result;

/// Smallest circle containing every point (incremental Welzl, input order).
///
/// Deterministic: no shuffling, so reruns give identical output. The returned
/// radius is raised to the largest center distance, so every input point is
/// inside or on the circle without tolerance.
pub fn min_enclosing_circle(points: &[Vector2<f64>]) -> Result<Circle> {
    ensure_len(points, 2, "enclosing circle")?;
    let (mut c, mut r) = (points[0], 0.0_f64);
    for i in 1..points.len() {
        if inside(c, r, points[i]) {
            continue;
        }
        (c, r) = (points[i], 0.0);
        for j in 0..i {
            if inside(c, r, points[j]) {
                continue;
            }
            (c, r) = diametral(points[i], points[j]);
            for k in 0..j {
                if inside(c, r, points[k]) {
                    continue;
                }
                (c, r) = circumscribed(points[i], points[j], points[k]);
            }
        }
    }
    let r_max = points.iter().map(|p| (p - c).norm()).fold(r, f64::max);
    Ok(Circle::from_center(c, r_max))
}

#[inline]
fn inside(c: Vector2<f64>, r: f64, p: Vector2<f64>) -> bool {
    (p - c).norm() <= r + CIRCLE_EPS * r.max(1.0)
}

#[inline]
fn diametral(a: Vector2<f64>, b: Vector2<f64>) -> (Vector2<f64>, f64) {
    let c = (a + b) / 2.0;
    (c, (a - c).norm())
}

/// Circle through three points; for (near-)collinear triples, the diametral
/// circle of the farthest pair.
fn circumscribed(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> (Vector2<f64>, f64) {
    let d = 2.0 * cross(a, b, c);
    let scale = (b - a).norm_squared().max((c - a).norm_squared());
    if d.abs() <= 1e-12 * scale {
        let pairs = [(a, b), (a, c), (b, c)];
        let (p, q) = pairs
            .into_iter()
            .fold(pairs[0], |best, pq| {
                if (pq.0 - pq.1).norm_squared() > (best.0 - best.1).norm_squared() {
                    pq
                } else {
                    best
                }
            });
        return diametral(p, q);
    }
    let ab = b - a;
    let ac = c - a;
    let ab2 = ab.norm_squared();
    let ac2 = ac.norm_squared();
    let ux = (ac.y * ab2 - ab.y * ac2) / d;
    let uy = (ab.x * ac2 - ac.x * ab2) / d;
    let center = a + Vector2::new(ux, uy);
    let r = [a, b, c]
        .iter()
        .map(|p| (p - center).norm())
        .fold(0.0, f64::max);
    (center, r)
}
