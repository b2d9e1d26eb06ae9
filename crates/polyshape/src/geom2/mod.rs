//! 2D geometry kernel for polygon metadata.
//!
//! Purpose
//! - Bounding shapes (axis-aligned box, minimum-area rotated rectangle,
//!   minimum enclosing circle), convex hull indices, and region centroid/area
//!   for a ring of points; triangulation of a polygon with holes.
//!
//! Conventions
//! - Coordinates are y-up for all orientation statements. SVG output is
//!   y-down, so "counter-clockwise" here renders clockwise on screen.
//! - Hulls are CCW, start at the lexicographically smallest `(x, y)` point,
//!   and exclude collinear and duplicate points.
//! - Rotated rectangle angles lie in `[0, 90)` degrees.
//! - Triangles are CCW index triples into `Polygon::points`.
//!
//! Code cross-refs: `hull::convex_hull_indices`, `calipers::min_area_rect`,
//! `circle::min_enclosing_circle`, `area::centroid_and_area`,
//! `triangulate::triangulate`.

mod area;
mod calipers;
mod circle;
mod hull;
pub mod rand;
mod triangulate;
mod types;
mod util;

pub use area::{centroid_and_area, ring_centroid, signed_area};
pub use calipers::min_area_rect;
pub use circle::min_enclosing_circle;
pub use hull::{convex_hull_indices, hull_points};
pub use triangulate::{bridged_loop, clip_ears, swap_slivers, triangulate, SLIVER_ANGLE};
pub use types::{Aabb, Circle, RotatedRect};
pub use util::compute_bounds;

#[cfg(test)]
mod tests;
