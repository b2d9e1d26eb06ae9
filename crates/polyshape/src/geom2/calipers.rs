use nalgebra::Vector2;

use super::hull::hull_points;
use super::types::{RotatedRect, ANGLE_SNAP_EPS};
use super::util::ensure_len;
use crate::error::{PolyError, Result};

/// Minimum-area enclosing rectangle via rotating calipers over hull edges.
///
/// One side of an optimal rectangle is collinear with a hull edge, so it is
/// enough to project the hull onto each edge frame. Ties keep the first edge
/// in hull order. The angle is normalized into `[0, 90)` degrees, swapping
/// width and height on each quarter turn.
pub fn min_area_rect(points: &[Vector2<f64>]) -> Result<RotatedRect> {
    ensure_len(points, 2, "minimum-area rectangle")?;
    let hull = hull_points(points)?;
    if hull.len() == 1 {
        let p = hull[0];
        return Ok(RotatedRect {
            center: [p.x, p.y],
            size: [0.0, 0.0],
            angle: 0.0,
        });
    }

    // (area, u, [min_u, max_u, min_v, max_v])
    let mut best: Option<(f64, Vector2<f64>, [f64; 4])> = None;
    for k in 0..hull.len() {
        let edge = hull[(k + 1) % hull.len()] - hull[k];
        let len = edge.norm();
        if !(len.is_finite()) || len <= 0.0 {
            continue;
        }
        let u = edge / len;
        let v = Vector2::new(-u.y, u.x);
        let mut ext = [f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY];
        for p in &hull {
            let pu = p.dot(&u);
            let pv = p.dot(&v);
            ext[0] = ext[0].min(pu);
            ext[1] = ext[1].max(pu);
            ext[2] = ext[2].min(pv);
            ext[3] = ext[3].max(pv);
        }
        let area = (ext[1] - ext[0]) * (ext[3] - ext[2]);
        if best.map_or(true, |(a, _, _)| area < a) {
            best = Some((area, u, ext));
        }
    }
    let (_, u, ext) = best.ok_or_else(|| {
        PolyError::DegenerateGeometry("minimum-area rectangle: hull has no usable edge".into())
    })?;
    let v = Vector2::new(-u.y, u.x);
    let center = u * ((ext[0] + ext[1]) / 2.0) + v * ((ext[2] + ext[3]) / 2.0);
    let mut size = [ext[1] - ext[0], ext[3] - ext[2]];
    let mut angle = u.y.atan2(u.x).to_degrees();
    while angle < 0.0 {
        angle += 90.0;
        size.swap(0, 1);
    }
    while angle >= 90.0 {
        angle -= 90.0;
        size.swap(0, 1);
    }
    if 90.0 - angle < ANGLE_SNAP_EPS {
        angle = 0.0;
        size.swap(0, 1);
    } else if angle < ANGLE_SNAP_EPS {
        angle = 0.0;
    }
    Ok(RotatedRect {
        center: [center.x, center.y],
        size: [size[0].max(0.0), size[1].max(0.0)],
        angle,
    })
}
