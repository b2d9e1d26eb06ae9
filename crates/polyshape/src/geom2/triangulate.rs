//! Ear-clipping triangulation for polygons with holes.
//!
//! Purpose
//! - Triangles as index triples into the polygon's points taken ring by ring
//!   (`Polygon::points`, the same numbering as the PLY output).
//!
//! Method
//! - Holes are linked into the outline by bridges, left-most hole first, which
//!   yields one weakly simple loop where bridge endpoints appear twice.
//! - Ears are clipped smallest interior angle first (Mei, Tipper, Xu).
//! - A second pass swaps the diagonal of convex quads whose triangles carry a
//!   sliver angle, whenever that raises the smallest angle of the pair.
//!
//! Orientation: the outline runs CCW and holes CW (y-up); every produced
//! triangle is CCW.

use nalgebra::Vector2;

use super::area::signed_area;
use super::util::{cross, ensure_len, lex_cmp};
use crate::error::{PolyError, Result};
use crate::model::Polygon;

/// Triangles whose smallest angle is at most this (radians) get a diagonal swap attempt.
pub const SLIVER_ANGLE: f64 = std::f64::consts::FRAC_PI_4;
/// Upper bound on diagonal swaps per triangulation.
const SWAP_LIMIT: usize = 9999;
/// Relative tolerance for treating a corner as straight when no ear is left.
const FLAT_EPS: f64 = 1e-12;

/// Triangulate `polygon`: the primary ring is the outline, later rings with
/// at least three points are holes.
///
/// A simple outline with `n` points and holes of `h_k` points yields
/// `n - 2 + Σ (h_k + 2)` triangles whose areas sum to the region area.
pub fn triangulate(polygon: &Polygon) -> Result<Vec<[usize; 3]>> {
    let pts = polygon.points();
    let ring = bridged_loop(polygon)?;
    let mut tris = clip_ears(&pts, &ring).map_err(|e| match e {
        PolyError::DegenerateGeometry(msg) => {
            PolyError::DegenerateGeometry(format!("`{}`: {msg}", polygon.name))
        }
        other => other,
    })?;
    swap_slivers(&pts, &mut tris);
    Ok(tris)
}

/// Outline and holes merged into one loop of indices into `Polygon::points`.
///
/// Each hole is spliced in at a visible loop vertex `b` as
/// `b, h_l, ..., h_l, b`, where `h_l` is the hole's left-most point.
pub fn bridged_loop(polygon: &Polygon) -> Result<Vec<usize>> {
    let pts = polygon.points();
    let mut offsets = Vec::with_capacity(polygon.rings.len());
    let mut start = 0usize;
    for r in &polygon.rings {
        offsets.push(start);
        start += r.len();
    }

    let outline = polygon.primary();
    ensure_len(outline, 3, "triangulation")?;
    let mut ring: Vec<usize> = (0..outline.len()).collect();
    if signed_area(outline) < 0.0 {
        ring.reverse();
    }

    // (indices in CW order, position of the left-most point)
    let mut holes: Vec<(Vec<usize>, usize)> = polygon
        .rings
        .iter()
        .zip(&offsets)
        .skip(1)
        .filter(|(r, _)| r.len() >= 3)
        .map(|(r, &off)| {
            let mut idx: Vec<usize> = (off..off + r.len()).collect();
            if signed_area(r) > 0.0 {
                idx.reverse();
            }
            let left = (0..idx.len())
                .min_by(|&a, &b| lex_cmp(&pts[idx[a]], &pts[idx[b]]))
                .unwrap_or(0);
            (idx, left)
        })
        .collect();
    holes.sort_by(|a, b| pts[a.0[a.1]].x.total_cmp(&pts[b.0[b.1]].x));

    for h in 0..holes.len() {
        let (hole, lp) = &holes[h];
        let left = pts[hole[*lp]];
        let mut candidates: Vec<usize> = (0..ring.len()).collect();
        let key = |k: usize| {
            let p = pts[ring[k]];
            (p.x > left.x, (p - left).norm_squared())
        };
        candidates.sort_by(|&i, &j| {
            let ((ri, di), (rj, dj)) = (key(i), key(j));
            ri.cmp(&rj).then(di.total_cmp(&dj))
        });
        let k = candidates
            .into_iter()
            .find(|&k| bridge_visible(&pts, &ring, k, left, &holes[h..]))
            .ok_or_else(|| {
                PolyError::DegenerateGeometry(format!(
                    "`{}`: a hole cannot be bridged to the outline",
                    polygon.name
                ))
            })?;

        let bank = ring[k];
        let mut spliced = Vec::with_capacity(ring.len() + hole.len() + 2);
        spliced.extend_from_slice(&ring[..=k]);
        spliced.extend(hole[*lp..].iter().chain(&hole[..=*lp]).copied());
        spliced.push(bank);
        spliced.extend_from_slice(&ring[k + 1..]);
        ring = spliced;
    }
    Ok(ring)
}

/// Whether the segment from loop vertex `k` to `left` can serve as a bridge.
fn bridge_visible(
    pts: &[Vector2<f64>],
    ring: &[usize],
    k: usize,
    left: Vector2<f64>,
    holes: &[(Vec<usize>, usize)],
) -> bool {
    let n = ring.len();
    let b = pts[ring[k]];
    if b == left {
        return false;
    }
    let a = pts[ring[(k + n - 1) % n]];
    let c = pts[ring[(k + 1) % n]];
    if !locally_inside(a, b, c, left) {
        return false;
    }
    for i in 0..n {
        let (p, q) = (pts[ring[i]], pts[ring[(i + 1) % n]]);
        if p != b && q != b && segments_touch(left, b, p, q) {
            return false;
        }
    }
    for (hole, _) in holes {
        let m = hole.len();
        for i in 0..m {
            let (p, q) = (pts[hole[i]], pts[hole[(i + 1) % m]]);
            if p != left && q != left && segments_touch(left, b, p, q) {
                return false;
            }
        }
    }
    true
}

/// `p` lies strictly inside the interior wedge at corner `a → b → c` of a CCW loop.
fn locally_inside(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>, p: Vector2<f64>) -> bool {
    if cross(a, b, c) >= 0.0 {
        cross(a, b, p) > 0.0 && cross(b, c, p) > 0.0
    } else {
        cross(a, b, p) > 0.0 || cross(b, c, p) > 0.0
    }
}

/// Closed segments `p0p1` and `q0q1` share a point; parallel pairs never do.
fn segments_touch(p0: Vector2<f64>, p1: Vector2<f64>, q0: Vector2<f64>, q1: Vector2<f64>) -> bool {
    let (d0, d1) = (p1 - p0, q1 - q0);
    let den = d0.x * d1.y - d0.y * d1.x;
    if den == 0.0 {
        return false;
    }
    let w = q0 - p0;
    let t = (w.x * d1.y - w.y * d1.x) / den;
    let s = (w.x * d0.y - w.y * d0.x) / den;
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&s)
}

/// Interior angle at `b` in radians.
fn vertex_angle(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> f64 {
    let (u, v) = (a - b, c - b);
    (u.dot(&v) / (u.norm() * v.norm())).clamp(-1.0, 1.0).acos()
}

fn interior_angles(tri: [usize; 3], pts: &[Vector2<f64>]) -> [f64; 3] {
    let [a, b, c] = tri.map(|i| pts[i]);
    [vertex_angle(c, a, b), vertex_angle(a, b, c), vertex_angle(b, c, a)]
}

fn min3(v: [f64; 3]) -> f64 {
    v[0].min(v[1]).min(v[2])
}

#[derive(Clone, Copy, Debug)]
struct Node {
    prev: usize,
    next: usize,
    convex: bool,
    ear: bool,
    angle: f64,
    removed: bool,
}

/// Doubly linked loop over positions of `ring`.
struct Clipper<'a> {
    pts: &'a [Vector2<f64>],
    ring: &'a [usize],
    nodes: Vec<Node>,
    remaining: usize,
}

impl<'a> Clipper<'a> {
    fn new(pts: &'a [Vector2<f64>], ring: &'a [usize]) -> Self {
        let n = ring.len();
        let nodes = (0..n)
            .map(|i| Node {
                prev: (i + n - 1) % n,
                next: (i + 1) % n,
                convex: false,
                ear: false,
                angle: 0.0,
                removed: false,
            })
            .collect();
        let mut clipper = Self {
            pts,
            ring,
            nodes,
            remaining: n,
        };
        clipper.refresh();
        clipper
    }

    #[inline]
    fn at(&self, i: usize) -> Vector2<f64> {
        self.pts[self.ring[i]]
    }

    fn corner(&self, i: usize) -> (Vector2<f64>, Vector2<f64>, Vector2<f64>) {
        let node = self.nodes[i];
        (self.at(node.prev), self.at(i), self.at(node.next))
    }

    fn alive(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.nodes.len()).filter(|&i| !self.nodes[i].removed)
    }

    fn update_convex(&mut self, i: usize) {
        let (a, b, c) = self.corner(i);
        self.nodes[i].convex = cross(a, b, c) > 0.0;
    }

    /// Convex corner whose triangle holds no reflex vertex other than its own corners.
    fn update_ear(&mut self, i: usize) {
        let Node { prev, next, convex, .. } = self.nodes[i];
        let (a, b, c) = self.corner(i);
        let ear = convex
            && !self.alive().any(|j| {
                j != i
                    && j != prev
                    && j != next
                    && !self.nodes[j].convex
                    && in_triangle(self.at(j), a, b, c)
            });
        self.nodes[i].ear = ear;
        if ear {
            self.nodes[i].angle = vertex_angle(a, b, c);
        }
    }

    fn refresh(&mut self) {
        let all: Vec<usize> = self.alive().collect();
        for &i in &all {
            self.update_convex(i);
        }
        for &i in &all {
            self.update_ear(i);
        }
    }

    /// Ear with the smallest angle; ties keep the earliest loop position.
    fn pick_ear(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for i in self.alive().filter(|&i| self.nodes[i].ear) {
            if best.map_or(true, |b| self.nodes[i].angle < self.nodes[b].angle) {
                best = Some(i);
            }
        }
        best
    }

    /// A straight (or doubled-back) corner; clipping it adds a zero-area triangle.
    fn pick_flat(&self) -> Option<usize> {
        self.alive().find(|&i| {
            let (a, b, c) = self.corner(i);
            let scale = (b - a).norm_squared() + (c - b).norm_squared();
            cross(a, b, c).abs() <= FLAT_EPS * scale
        })
    }

    fn triangle(&self, i: usize) -> [usize; 3] {
        let node = self.nodes[i];
        [self.ring[node.prev], self.ring[i], self.ring[node.next]]
    }

    fn clip(&mut self, i: usize) -> [usize; 3] {
        let tri = self.triangle(i);
        let Node { prev, next, .. } = self.nodes[i];
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
        self.nodes[i].removed = true;
        self.remaining -= 1;
        self.update_convex(prev);
        self.update_convex(next);
        self.update_ear(prev);
        self.update_ear(next);
        tri
    }
}

/// Closed triangle test that excludes the corners themselves.
fn in_triangle(p: Vector2<f64>, a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> bool {
    cross(a, b, p) >= 0.0
        && cross(b, c, p) >= 0.0
        && cross(c, a, p) >= 0.0
        && p != a
        && p != b
        && p != c
}

/// Ear clipping over a CCW loop of indices into `pts`; yields `ring.len() - 2` triangles.
pub fn clip_ears(pts: &[Vector2<f64>], ring: &[usize]) -> Result<Vec<[usize; 3]>> {
    if ring.len() < 3 {
        return Err(PolyError::DegenerateGeometry(format!(
            "triangulation needs at least 3 points, got {}",
            ring.len()
        )));
    }
    let mut clipper = Clipper::new(pts, ring);
    let mut tris = Vec::with_capacity(ring.len() - 2);
    while clipper.remaining > 3 {
        let i = match clipper.pick_ear() {
            Some(i) => i,
            None => {
                // ears elsewhere may have been unblocked by earlier clips
                clipper.refresh();
                clipper
                    .pick_ear()
                    .or_else(|| clipper.pick_flat())
                    .ok_or_else(|| {
                        PolyError::DegenerateGeometry(format!(
                            "no ear left after {} of {} triangles (self-intersecting ring?)",
                            tris.len(),
                            ring.len() - 2
                        ))
                    })?
            }
        };
        tris.push(clipper.clip(i));
    }
    if let Some(i) = clipper.alive().next() {
        tris.push(clipper.triangle(i));
    }
    Ok(tris)
}

/// Repeated diagonal swaps on sliver triangles. Stops at the first
/// triangle with an undefined angle (coincident corners).
pub fn swap_slivers(pts: &[Vector2<f64>], tris: &mut [[usize; 3]]) {
    for _ in 0..SWAP_LIMIT {
        if !swap_once(pts, tris) {
            break;
        }
    }
}

fn swap_once(pts: &[Vector2<f64>], tris: &mut [[usize; 3]]) -> bool {
    for i in 0..tris.len() {
        let [a, b, c] = tris[i];
        let angles = interior_angles(tris[i], pts);
        if angles.iter().any(|x| x.is_nan()) {
            return false;
        }
        let smallest = min3(angles);
        if smallest > SLIVER_ANGLE {
            continue;
        }
        // x: corner with the largest angle; y→z: the edge opposite it
        let (x, y, z) = if angles[0] >= angles[1] && angles[0] >= angles[2] {
            (a, b, c)
        } else if angles[1] >= angles[2] {
            (b, c, a)
        } else {
            (c, a, b)
        };
        let Some((k, d)) = tris.iter().enumerate().filter(|&(k, _)| k != i).find_map(|(k, t)| {
            (0..3)
                .find(|&j| t[j] == z && t[(j + 1) % 3] == y)
                .map(|j| (k, t[(j + 2) % 3]))
        }) else {
            continue;
        };
        let t0 = [x, y, d];
        let t1 = [d, z, x];
        let ccw = |t: [usize; 3]| cross(pts[t[0]], pts[t[1]], pts[t[2]]) > 0.0;
        if !ccw(t0) || !ccw(t1) {
            continue;
        }
        let before = smallest.min(min3(interior_angles(tris[k], pts)));
        let after = min3(interior_angles(t0, pts)).min(min3(interior_angles(t1, pts)));
        if after > before {
            tris[k] = t0;
            tris[i] = t1;
            return true;
        }
    }
    false
}
