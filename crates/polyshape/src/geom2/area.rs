use nalgebra::Vector2;

use super::util::ensure_len;
use crate::error::Result;
use crate::model::Polygon;

/// Shoelace signed area; positive for CCW (y-up) rings.
pub fn signed_area(ring: &[Vector2<f64>]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut a = 0.0;
    for i in 0..n {
        let p = ring[i];
        let q = ring[(i + 1) % n];
        a += p.x * q.y - q.x * p.y;
    }
    a * 0.5
}

/// Area centroid of a simple ring, or `None` when its area vanishes.
pub fn ring_centroid(ring: &[Vector2<f64>]) -> Option<Vector2<f64>> {
    if ring.len() < 3 {
        return None;
    }
    let mut a: f64 = 0.0;
    let mut cx: f64 = 0.0;
    let mut cy: f64 = 0.0;
    for i in 0..ring.len() {
        let p = ring[i];
        let q = ring[(i + 1) % ring.len()];
        let cross = p.x * q.y - q.x * p.y;
        a += cross;
        cx += (p.x + q.x) * cross;
        cy += (p.y + q.y) * cross;
    }
    a *= 0.5;
    if a.abs() < 1e-18 {
        return None;
    }
    Some(Vector2::new(cx / (6.0 * a), cy / (6.0 * a)))
}

/// Region centroid and area: primary ring as outline, later rings as holes.
///
/// Orientation of the input rings does not matter. If the outline has no
/// area (fewer than three points, or collinear) the centroid falls back to
/// the mean of the outline's points and the area is 0. Holes that would
/// consume the whole outline are ignored.
pub fn centroid_and_area(polygon: &Polygon) -> Result<(Vector2<f64>, f64)> {
    let outline = polygon.primary();
    ensure_len(outline, 1, "centroid")?;
    let Some(c0) = ring_centroid(outline) else {
        let mean = outline.iter().sum::<Vector2<f64>>() / outline.len() as f64;
        return Ok((mean, 0.0));
    };
    let a0 = signed_area(outline).abs();
    let mut area = a0;
    let mut moment = c0 * a0;
    for hole in &polygon.rings[1..] {
        if let Some(ch) = ring_centroid(hole) {
            let ah = signed_area(hole).abs();
            area -= ah;
            moment -= ch * ah;
        }
    }
    if area <= 0.0 {
        return Ok((c0, a0));
    }
    Ok((moment / area, area))
}
