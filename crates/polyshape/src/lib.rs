//! Polygon shape conversion and metadata.
//!
//! Polygons are loaded from JSON files (`[[[x, y], ...], ...]`, one array per
//! ring) and turned into derived artifacts:
//! - `formats`: CSV rows, ASCII PLY edge loops, a Java array-literal block;
//! - `render`: outline SVG and the metadata debug overlay;
//! - `meta`: bounding box, minimum-area rectangle, enclosing circle, convex
//!   hull, centroid and area, merged into a JSON record;
//! - `geom2::triangulate` + `render::triangulation_svg`: ear-clipping
//!   triangulation of each polygon (holes bridged into the outline).
//!
//! Geometry lives in `geom2`; the centroid/area source is pluggable via
//! `centroid::CentroidSource`.

pub mod centroid;
pub mod error;
pub mod formats;
pub mod geom2;
pub mod meta;
pub mod model;
pub mod render;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{PolyError, Result};
pub use model::{Polygon, Ring};
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::centroid::{CentroidSource, InProcess, Measure, Subprocess};
    pub use crate::error::{PolyError, Result};
    pub use crate::formats::{constant_name, csv_text, ply_text, ArrayBlock};
    pub use crate::geom2::{
        centroid_and_area, compute_bounds, convex_hull_indices, min_area_rect,
        min_enclosing_circle, triangulate, Aabb, Circle, RotatedRect,
    };
    pub use crate::meta::{build_outputs, MetaOutputs, ShapeMeta};
    pub use crate::model::{list_polygon_files, polygon_name, Polygon, Ring};
    pub use crate::render::{gallery_table, outline_svg, render_debug_svg, triangulation_svg};
    pub use nalgebra::Vector2 as Vec2;
}
