use super::rand::{draw_polygon_radial, draw_ring_radial, RadialCfg, ReplayToken, VertexCount};
use super::*;
use crate::error::PolyError;
use crate::model::Polygon;
use nalgebra::{vector, Vector2};
use proptest::prelude::*;

fn ring(pts: &[[f64; 2]]) -> Vec<Vector2<f64>> {
    pts.iter().map(|p| Vector2::new(p[0], p[1])).collect()
}

fn square() -> Vec<Vector2<f64>> {
    ring(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]])
}

/// `p` is inside or on the CCW convex polygon `hull`, within `eps` (scaled by edge length).
fn inside_convex(hull: &[Vector2<f64>], p: Vector2<f64>, eps: f64) -> bool {
    (0..hull.len()).all(|k| {
        let a = hull[k];
        let b = hull[(k + 1) % hull.len()];
        let e = b - a;
        let d = p - a;
        e.x * d.y - e.y * d.x >= -eps * e.norm().max(1.0)
    })
}

fn is_strictly_convex_ccw(hull: &[Vector2<f64>]) -> bool {
    let n = hull.len();
    n < 3
        || (0..n).all(|k| {
            let a = hull[k];
            let b = hull[(k + 1) % n];
            let c = hull[(k + 2) % n];
            let (ab, ac) = (b - a, c - a);
            ab.x * ac.y - ab.y * ac.x > 0.0
        })
}

#[test]
fn square_scenario() {
    let sq = square();
    let b = compute_bounds(&sq).unwrap();
    assert_eq!(b.to_array(), [0.0, 0.0, 10.0, 10.0]);

    assert_eq!(convex_hull_indices(&sq).unwrap(), vec![0, 1, 2, 3]);

    let c = min_enclosing_circle(&sq).unwrap();
    assert!((c.center[0] - 5.0).abs() < 1e-12 && (c.center[1] - 5.0).abs() < 1e-12);
    assert!((c.radius - 5.0 * 2f64.sqrt()).abs() < 1e-9);

    let r = min_area_rect(&sq).unwrap();
    assert!((r.size[0] - 10.0).abs() < 1e-9 && (r.size[1] - 10.0).abs() < 1e-9);
    assert_eq!(r.angle, 0.0);
    assert!((r.center[0] - 5.0).abs() < 1e-9 && (r.center[1] - 5.0).abs() < 1e-9);
}

#[test]
fn hull_drops_collinear_midpoint() {
    let pts = ring(&[[0.0, 0.0], [5.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]);
    let hull = convex_hull_indices(&pts).unwrap();
    assert_eq!(hull, vec![0, 2, 3, 4]);
    assert!(!hull.contains(&1));
}

#[test]
fn hull_keeps_first_duplicate_and_skips_reflex() {
    // Arrow shape: index 3 is a reflex vertex, index 5 duplicates index 0.
    let pts = ring(&[
        [0.0, 0.0],
        [4.0, 0.0],
        [4.0, 4.0],
        [2.0, 1.0],
        [0.0, 4.0],
        [0.0, 0.0],
    ]);
    let hull = convex_hull_indices(&pts).unwrap();
    assert_eq!(hull, vec![0, 1, 2, 4]);
}

#[test]
fn hull_winding_is_ccw_even_for_cw_input() {
    let mut sq = square();
    sq.reverse(); // CW: (0,10),(10,10),(10,0),(0,0)
    let hull = convex_hull_indices(&sq).unwrap();
    assert_eq!(hull, vec![3, 2, 1, 0]);
    let pts: Vec<_> = hull.iter().map(|&i| sq[i]).collect();
    assert!(signed_area(&pts) > 0.0);
}

#[test]
fn collinear_and_tiny_inputs() {
    let line = ring(&[[0.0, 0.0], [1.0, 1.0], [3.0, 3.0], [2.0, 2.0]]);
    assert_eq!(convex_hull_indices(&line).unwrap(), vec![0, 2]);
    let r = min_area_rect(&line).unwrap();
    assert!(r.size[0] >= 0.0 && r.size[1] >= 0.0);
    assert!(r.area().abs() < 1e-9);
    assert!((r.angle - 45.0).abs() < 1e-9);
    let c = min_enclosing_circle(&line).unwrap();
    assert!((c.radius - 1.5 * 2f64.sqrt()).abs() < 1e-9);

    let dup = ring(&[[2.0, 3.0], [2.0, 3.0]]);
    assert_eq!(convex_hull_indices(&dup).unwrap(), vec![0]);
    let r = min_area_rect(&dup).unwrap();
    assert_eq!(r.size, [0.0, 0.0]);
    assert_eq!(min_enclosing_circle(&dup).unwrap().radius, 0.0);
}

#[test]
fn degenerate_inputs_are_errors() {
    let one = ring(&[[1.0, 1.0]]);
    for res in [
        convex_hull_indices(&one).map(|_| ()),
        min_area_rect(&one).map(|_| ()),
        min_enclosing_circle(&one).map(|_| ()),
        compute_bounds(&[]).map(|_| ()),
    ] {
        assert!(matches!(res, Err(PolyError::DegenerateGeometry(_))));
    }
    assert!(compute_bounds(&one).is_ok());
}

#[test]
fn rotated_square_rect_angle_in_range() {
    // Unit-diagonal diamond: min rect is the diamond itself at 45°.
    let diamond = ring(&[[0.0, -1.0], [1.0, 0.0], [0.0, 1.0], [-1.0, 0.0]]);
    let r = min_area_rect(&diamond).unwrap();
    assert!((r.angle - 45.0).abs() < 1e-9);
    assert!((r.area() - 2.0).abs() < 1e-9);
    assert!(r.center[0].abs() < 1e-12 && r.center[1].abs() < 1e-12);

    // Thin rectangle tilted by 30°: width along the long side after normalization.
    let th = 30f64.to_radians();
    let (u, v) = (vector![th.cos(), th.sin()], vector![-th.sin(), th.cos()]);
    let pts = vec![u * -4.0 + v * -1.0, u * 4.0 + v * -1.0, u * 4.0 + v, u * -4.0 + v];
    let r = min_area_rect(&pts).unwrap();
    assert!((0.0..90.0).contains(&r.angle));
    assert!((r.angle - 30.0).abs() < 1e-9);
    assert!((r.size[0] - 8.0).abs() < 1e-9 && (r.size[1] - 2.0).abs() < 1e-9);
}

#[test]
fn circle_through_three_points() {
    // Acute triangle: the circumcircle is minimal.
    let tri = ring(&[[0.0, 0.0], [4.0, 0.0], [2.0, 3.0]]);
    let c = min_enclosing_circle(&tri).unwrap();
    let center = c.center_vec();
    for p in &tri {
        assert!(((p - center).norm() - c.radius).abs() < 1e-9);
    }
    // Obtuse triangle: the longest side is a diameter.
    let obtuse = ring(&[[0.0, 0.0], [10.0, 0.0], [5.0, 1.0]]);
    let c = min_enclosing_circle(&obtuse).unwrap();
    assert!((c.radius - 5.0).abs() < 1e-9);
    assert!((c.center[0] - 5.0).abs() < 1e-9 && c.center[1].abs() < 1e-9);
}

#[test]
fn centroid_and_area_with_hole() {
    let outer = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
    let hole = [[4.0, 4.0], [4.0, 6.0], [6.0, 6.0], [6.0, 4.0]];
    let p = Polygon::new("holed", vec![outer.to_vec(), hole.to_vec()]).unwrap();
    let (c, a) = centroid_and_area(&p).unwrap();
    assert!((a - 96.0).abs() < 1e-9);
    assert!((c - vector![5.0, 5.0]).norm() < 1e-9);

    // Off-center hole pulls the centroid the other way.
    let hole = [[0.0, 0.0], [0.0, 5.0], [5.0, 5.0], [5.0, 0.0]];
    let p = Polygon::new("notch", vec![outer.to_vec(), hole.to_vec()]).unwrap();
    let (c, a) = centroid_and_area(&p).unwrap();
    assert!((a - 75.0).abs() < 1e-9);
    let expected = (vector![5.0, 5.0] * 100.0 - vector![2.5, 2.5] * 25.0) / 75.0;
    assert!((c - expected).norm() < 1e-9);
}

#[test]
fn centroid_falls_back_to_mean_without_area() {
    let p = Polygon::new("seg", vec![vec![[0.0, 0.0], [2.0, 4.0]]]).unwrap();
    let (c, a) = centroid_and_area(&p).unwrap();
    assert_eq!(a, 0.0);
    assert_eq!(c, vector![1.0, 2.0]);
    let empty = Polygon::new("empty", vec![vec![]]).unwrap();
    assert!(matches!(
        centroid_and_area(&empty),
        Err(PolyError::DegenerateGeometry(_))
    ));
}

#[test]
fn sampled_polygons_respect_invariants() {
    let cfg = RadialCfg {
        vertex_count: VertexCount::Uniform { min: 6, max: 40 },
        ..RadialCfg::default()
    };
    for index in 0..64 {
        let poly = draw_polygon_radial("s", cfg, ReplayToken { seed: 11, index }, true);
        let pts = poly.primary();
        let hull: Vec<_> = convex_hull_indices(pts)
            .unwrap()
            .into_iter()
            .map(|i| pts[i])
            .collect();
        assert!(is_strictly_convex_ccw(&hull));
        let (c, a) = centroid_and_area(&poly).unwrap();
        assert!(a > 0.0 && a < signed_area(pts));
        assert!(inside_convex(&hull, c, 1e-9));
    }
}

fn arb_ring() -> impl Strategy<Value = Vec<Vector2<f64>>> {
    prop::collection::vec((-1.0e3..1.0e3f64, -1.0e3..1.0e3f64), 2..60)
        .prop_map(|v| v.into_iter().map(|(x, y)| Vector2::new(x, y)).collect())
}

fn arb_sampled_ring() -> impl Strategy<Value = Vec<Vector2<f64>>> {
    (any::<u64>(), 3usize..80).prop_map(|(seed, n)| {
        let cfg = RadialCfg {
            vertex_count: VertexCount::Fixed(n),
            center: [(seed % 997) as f64, -((seed % 389) as f64)],
            ..RadialCfg::default()
        };
        draw_ring_radial(cfg, ReplayToken { seed, index: 0 })
    })
}

proptest! {
    #[test]
    fn bounds_contain_every_point(pts in arb_ring()) {
        let b = compute_bounds(&pts).unwrap();
        prop_assert!(b.min.x <= b.max.x && b.min.y <= b.max.y);
        for p in &pts {
            prop_assert!(b.contains(*p));
        }
    }

    #[test]
    fn hull_indices_valid_and_contain_ring(pts in prop_oneof![arb_ring(), arb_sampled_ring()]) {
        let idx = convex_hull_indices(&pts).unwrap();
        prop_assert!(idx.iter().all(|&i| i < pts.len()));
        let hull: Vec<_> = idx.iter().map(|&i| pts[i]).collect();
        prop_assert!(is_strictly_convex_ccw(&hull));
        for p in &pts {
            prop_assert!(inside_convex(&hull, *p, 1e-9));
        }
    }

    #[test]
    fn circle_radius_covers_ring(pts in prop_oneof![arb_ring(), arb_sampled_ring()]) {
        let c = min_enclosing_circle(&pts).unwrap();
        let center = c.center_vec();
        for p in &pts {
            prop_assert!((p - center).norm() <= c.radius);
        }
        // no larger than the circle around the bounding box
        let b = compute_bounds(&pts).unwrap();
        prop_assert!(c.radius <= 0.5 * (b.max - b.min).norm() * (1.0 + 1e-8) + 1e-9);
    }

    #[test]
    fn min_rect_contains_ring_and_beats_aabb(pts in prop_oneof![arb_ring(), arb_sampled_ring()]) {
        let r = min_area_rect(&pts).unwrap();
        prop_assert!(r.size[0] >= 0.0 && r.size[1] >= 0.0);
        prop_assert!((0.0..90.0).contains(&r.angle));
        let scale = compute_bounds(&pts).map(|b| b.width().max(b.height()).max(1.0)).unwrap();
        for p in &pts {
            prop_assert!(r.contains_eps(*p, 1e-9 * scale));
        }
        let b = compute_bounds(&pts).unwrap();
        prop_assert!(r.area() <= b.width() * b.height() * (1.0 + 1e-9) + 1e-9);
    }
}

fn triangle_area(pts: &[Vector2<f64>], t: [usize; 3]) -> f64 {
    let (a, b, c) = (pts[t[0]], pts[t[1]], pts[t[2]]);
    0.5 * ((b - a).x * (c - a).y - (b - a).y * (c - a).x)
}

fn check_triangulation(poly: &Polygon, expected_count: usize) -> Vec<[usize; 3]> {
    let pts = poly.points();
    let tris = triangulate(poly).unwrap();
    assert_eq!(tris.len(), expected_count);
    assert!(tris.iter().flatten().all(|&i| i < pts.len()));
    let scale = compute_bounds(&pts).map(|b| b.width() * b.height()).unwrap();
    let mut total = 0.0;
    for &t in &tris {
        let a = triangle_area(&pts, t);
        assert!(a >= -1e-12 * scale, "clockwise triangle {t:?}");
        total += a;
    }
    let (_, area) = centroid_and_area(poly).unwrap();
    assert!((total - area).abs() <= 1e-9 * scale, "{total} vs {area}");
    tris
}

#[test]
fn triangulate_simple_rings() {
    let sq = Polygon::new("sq", vec![square().iter().map(|p| [p.x, p.y]).collect()]).unwrap();
    check_triangulation(&sq, 2);

    // collinear (5,0) and reflex (5,5)
    let l_shape = vec![
        [0.0, 0.0],
        [5.0, 0.0],
        [10.0, 0.0],
        [10.0, 5.0],
        [5.0, 5.0],
        [5.0, 10.0],
        [0.0, 10.0],
    ];
    check_triangulation(&Polygon::new("l", vec![l_shape.clone()]).unwrap(), 5);

    // clockwise input is reoriented
    let mut cw = l_shape;
    cw.reverse();
    check_triangulation(&Polygon::new("cw", vec![cw]).unwrap(), 5);
}

#[test]
fn triangulate_bridges_holes() {
    let outer = vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
    let hole = vec![[4.0, 4.0], [4.0, 6.0], [6.0, 6.0], [6.0, 4.0]];
    let p = Polygon::new("holed", vec![outer.clone(), hole]).unwrap();
    let ring = bridged_loop(&p).unwrap();
    assert_eq!(ring.len(), 4 + 4 + 2);
    // every hole point is reachable from the merged loop
    assert!((4..8).all(|i| ring.contains(&i)));
    check_triangulation(&p, 8);

    // two holes, one listed right of the other; the left one is bridged first
    let right = vec![[6.0, 6.0], [8.0, 6.0], [8.0, 8.0], [6.0, 8.0]];
    let left = vec![[2.0, 2.0], [3.0, 2.0], [3.0, 3.0], [2.0, 3.0]];
    let p = Polygon::new("two", vec![outer, right, left]).unwrap();
    check_triangulation(&p, 2 + 6 + 6);
}

#[test]
fn triangulate_skips_short_hole_rings_and_rejects_tiny_outlines() {
    let p = Polygon::new(
        "stray",
        vec![vec![[0.0, 0.0], [4.0, 0.0], [0.0, 4.0]], vec![[1.0, 1.0], [1.5, 1.0]]],
    )
    .unwrap();
    let tris = triangulate(&p).unwrap();
    assert_eq!(tris.len(), 1);
    let mut t = tris[0];
    t.sort_unstable();
    assert_eq!(t, [0, 1, 2]);

    let seg = Polygon::new("seg", vec![vec![[0.0, 0.0], [1.0, 1.0]]]).unwrap();
    assert!(matches!(triangulate(&seg), Err(PolyError::DegenerateGeometry(_))));
}

#[test]
fn sliver_swap_improves_min_angle() {
    // Flat quad split along its long diagonal first; the swap picks the short one.
    let pts = ring(&[[0.0, 0.0], [10.0, -1.0], [20.0, 0.0], [10.0, 1.0]]);
    let mut tris = vec![[0, 1, 2], [0, 2, 3]];
    swap_slivers(&pts, &mut tris);
    let mut used: Vec<[usize; 3]> = tris.clone();
    for t in &mut used {
        t.sort_unstable();
    }
    used.sort_unstable();
    assert_eq!(used, vec![[0, 1, 3], [1, 2, 3]]);
    let total: f64 = tris.iter().map(|&t| triangle_area(&pts, t)).sum();
    assert!((total - 20.0).abs() < 1e-9);
}

proptest! {
    #[test]
    fn triangulation_covers_sampled_polygons(
        seed in any::<u64>(),
        n in 3usize..60,
        with_hole in any::<bool>(),
    ) {
        let cfg = RadialCfg {
            vertex_count: VertexCount::Fixed(n),
            ..RadialCfg::default()
        };
        // the hole only fits reliably inside outlines with six or more points
        let with_hole = with_hole && n >= 6;
        let poly = draw_polygon_radial("s", cfg, ReplayToken { seed, index: 2 }, with_hole);
        let pts = poly.points();
        let tris = triangulate(&poly).unwrap();
        let expected = if with_hole { n - 2 + 6 + 2 } else { n - 2 };
        prop_assert_eq!(tris.len(), expected);
        let (_, area) = centroid_and_area(&poly).unwrap();
        let total: f64 = tris.iter().map(|&t| triangle_area(&pts, t)).sum();
        prop_assert!((total - area).abs() <= 1e-9 * area.max(1.0));
        for &t in &tris {
            prop_assert!(triangle_area(&pts, t) >= -1e-9);
        }
    }
}
