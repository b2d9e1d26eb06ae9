//! SVG rendering: plain outline and the metadata debug overlay.

use std::fmt::Write as _;

use nalgebra::Vector2;

use crate::centroid::polygon_bounds;
use crate::error::Result;
use crate::meta::ShapeMeta;
use crate::model::Polygon;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
/// Debug render canvas size in pixels (square).
const DEBUG_CANVAS: u32 = 600;
/// Debug viewBox side as a multiple of the bounding circle diameter.
const DEBUG_VIEW_SCALE: f64 = 2.5;
/// Bounding circle radius divided by this gives the centroid dot radius.
const CENTROID_DOT_DIVISOR: f64 = 30.0;
/// Triangulation viewBox padding around the bounding box, in user units.
const TRIANGLE_VIEW_PAD: f64 = 2.0;
const GALLERY_COLUMNS: usize = 4;

/// Path data for every ring: `M x,y L x,y ...z M ...z`. Empty rings are skipped.
pub fn path_data(polygon: &Polygon) -> String {
    let mut d = String::new();
    for ring in polygon.rings.iter().filter(|r| !r.is_empty()) {
        if !d.is_empty() {
            d.push(' ');
        }
        push_subpath(&mut d, ring.iter().copied());
    }
    d
}

fn push_subpath(d: &mut String, points: impl Iterator<Item = Vector2<f64>>) {
    for (i, p) in points.enumerate() {
        let cmd = if i == 0 { "M" } else { " L" };
        let _ = write!(d, "{cmd}{},{}", p.x, p.y);
    }
    d.push('z');
}

/// Unstyled outline SVG with a single path covering all rings.
pub fn outline_svg(polygon: &Polygon) -> String {
    format!(
        "<svg version=\"1.1\" xmlns=\"{SVG_NS}\">\n<path d=\"{}\"/>\n</svg>",
        path_data(polygon)
    )
}

/// Debug overlay of the shape and its metadata.
///
/// Layers, bottom to top: filled outline, hull (red), bounding circle,
/// centroid dot, dashed axis-aligned bounds, rotated rectangle. The viewBox
/// is centered on the bounding circle and spans 2.5 diameters.
pub fn render_debug_svg(polygon: &Polygon, meta: &ShapeMeta) -> String {
    let [cx, cy] = meta.bounding_circle.center;
    let r = meta.bounding_circle.radius;
    let side = DEBUG_VIEW_SCALE * 2.0 * r;
    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg version=\"1.1\" width=\"{DEBUG_CANVAS}\" height=\"{DEBUG_CANVAS}\" viewBox=\"{} {} {side} {side}\" xmlns=\"{SVG_NS}\">",
        cx - side / 2.0,
        cy - side / 2.0,
    );
    let _ = write!(
        svg,
        "<path d=\"{}\" fill=\"gainsboro\" stroke=\"black\" stroke-width=\"2\" vector-effect=\"non-scaling-stroke\"/>",
        path_data(polygon)
    );

    let ring = polygon.primary();
    let mut hull_d = String::new();
    push_subpath(&mut hull_d, meta.hull.iter().filter_map(|&i| ring.get(i).copied()));
    let _ = write!(
        svg,
        "<path d=\"{hull_d}\" fill=\"none\" stroke=\"red\" stroke-width=\"2\" vector-effect=\"non-scaling-stroke\"/>"
    );
    let _ = write!(
        svg,
        "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{r}\" fill=\"none\" stroke=\"gray\" stroke-width=\"1\" vector-effect=\"non-scaling-stroke\"/>"
    );
    let _ = write!(
        svg,
        "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"red\" stroke=\"none\"/>",
        meta.centroid[0],
        meta.centroid[1],
        r / CENTROID_DOT_DIVISOR
    );
    let [x0, y0, x1, y1] = meta.bounds;
    let _ = write!(
        svg,
        "<rect x=\"{x0}\" y=\"{y0}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"gray\" stroke-width=\"1\" stroke-dasharray=\"4 1\" vector-effect=\"non-scaling-stroke\"/>",
        x1 - x0,
        y1 - y0
    );
    let rb = &meta.rotated_bounding_box;
    let [w, h] = rb.size;
    let _ = write!(
        svg,
        "<rect x=\"{}\" y=\"{}\" width=\"{w}\" height=\"{h}\" fill=\"none\" stroke=\"gray\" stroke-width=\"1\" transform=\"translate({},{}) rotate({} 0 0)\" vector-effect=\"non-scaling-stroke\"/>",
        -w / 2.0,
        -h / 2.0,
        rb.center[0],
        rb.center[1],
        truncate_tenths(rb.angle)
    );
    svg.push_str("</svg>");
    svg
}

/// Triangulation render: all rings filled, every triangle outlined.
///
/// The canvas keeps the shape's aspect ratio with the long side at 600 px;
/// the viewBox is the bounding box padded by 2 units on each side.
/// Triangle indices refer to `Polygon::points`; out-of-range ones are skipped.
pub fn triangulation_svg(polygon: &Polygon, triangles: &[[usize; 3]]) -> Result<String> {
    let b = polygon_bounds(polygon)?;
    let (w, h) = (b.width(), b.height());
    let canvas = f64::from(DEBUG_CANVAS);
    let (vw, vh) = if w < h {
        (canvas * w / h, canvas)
    } else if w > 0.0 {
        (canvas, canvas * h / w)
    } else {
        (canvas, canvas)
    };
    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg version=\"1.1\" width=\"{vw}\" height=\"{vh}\" viewBox=\"{} {} {} {}\" xmlns=\"{SVG_NS}\">",
        b.min.x - TRIANGLE_VIEW_PAD,
        b.min.y - TRIANGLE_VIEW_PAD,
        w + 2.0 * TRIANGLE_VIEW_PAD,
        h + 2.0 * TRIANGLE_VIEW_PAD,
    );
    let _ = write!(
        svg,
        "<path d=\"{}\" fill=\"gainsboro\" fill-rule=\"evenodd\" stroke=\"black\" stroke-width=\"3\" vector-effect=\"non-scaling-stroke\"/>",
        path_data(polygon)
    );
    svg.push_str("<g fill=\"none\" stroke=\"black\" stroke-width=\"1\">");
    let pts = polygon.points();
    for tri in triangles {
        let Some(corners) = tri.iter().map(|&i| pts.get(i).copied()).collect::<Option<Vec<_>>>()
        else {
            continue;
        };
        let mut d = String::new();
        push_subpath(&mut d, corners.into_iter());
        let _ = write!(
            svg,
            "<path d=\"{d}\" vector-effect=\"non-scaling-stroke\"/>"
        );
    }
    svg.push_str("</g></svg>");
    Ok(svg)
}

/// Markdown table of `(image link, label)` cells, four per row.
pub fn gallery_table(cells: &[(String, String)]) -> String {
    let mut out = String::new();
    for (i, (link, label)) in cells.iter().enumerate() {
        if i % GALLERY_COLUMNS == 0 && i != 0 {
            out.push_str("|\n");
        }
        let _ = write!(out, "| ![]({link}) {label} ");
    }
    out.push_str("|\n");
    out
}

/// Truncate toward zero to one decimal digit: `12.39 → 12.3`, `-0.05 → 0`.
pub fn truncate_tenths(angle: f64) -> f64 {
    let t = (angle * 10.0).trunc() / 10.0;
    // avoid printing "-0"
    if t == 0.0 {
        0.0
    } else {
        t
    }
}
