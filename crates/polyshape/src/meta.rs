//! Per-polygon metadata record: bounding shapes, hull, centroid.
//!
//! The record is rebuilt from scratch on every run and merged over whatever
//! the previous metadata file held, so unrelated keys survive while every
//! computed key is overwritten.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::centroid::{CentroidSource, Measure};
use crate::error::{PolyError, Result};
use crate::geom2::{convex_hull_indices, min_area_rect, min_enclosing_circle, Circle, RotatedRect};
use crate::model::Polygon;
use crate::render::render_debug_svg;

/// Metadata for one polygon. Geometry fields refer to the primary ring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeMeta {
    pub centroid: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    pub bounds: [f64; 4],
    pub rotated_bounding_box: RotatedRect,
    pub bounding_circle: Circle,
    pub hull: Vec<usize>,
}

impl ShapeMeta {
    /// Compute the full record for `polygon`, taking centroid/area/bounds from `source`.
    pub fn compute(polygon: &Polygon, source: &dyn CentroidSource) -> Result<Self> {
        let ring = polygon.primary();
        if ring.is_empty() {
            return Err(PolyError::DegenerateGeometry(format!(
                "`{}` has an empty primary ring",
                polygon.name
            )));
        }
        let Measure {
            centroid,
            area,
            bounds,
        } = source.measure(polygon)?;
        Ok(Self {
            centroid,
            area,
            bounds,
            rotated_bounding_box: min_area_rect(ring)?,
            bounding_circle: min_enclosing_circle(ring)?,
            hull: convex_hull_indices(ring)?,
        })
    }

    /// Overlay this record onto `base`, replacing same-named keys.
    pub fn merge_into(&self, mut base: Map<String, Value>) -> Map<String, Value> {
        if let Ok(Value::Object(fields)) = serde_json::to_value(self) {
            base.extend(fields);
        }
        base
    }
}

/// Both output documents for one polygon, built before anything is written.
#[derive(Clone, Debug)]
pub struct MetaOutputs {
    pub meta: ShapeMeta,
    /// Merged record, pretty-printed with a trailing newline.
    pub json: String,
    pub svg: String,
}

/// Compute metadata, merge it over `previous`, and render the debug SVG.
///
/// `previous` is the existing metadata file content, if any; anything that
/// is not a JSON object is ignored.
pub fn build_outputs(
    polygon: &Polygon,
    source: &dyn CentroidSource,
    previous: Option<&str>,
) -> Result<MetaOutputs> {
    let meta = ShapeMeta::compute(polygon, source)?;
    let base = previous
        .and_then(|text| serde_json::from_str::<Value>(text).ok())
        .and_then(|v| match v {
            Value::Object(m) => Some(m),
            _ => None,
        })
        .unwrap_or_default();
    let merged = Value::Object(meta.merge_into(base));
    let mut json = serde_json::to_string_pretty(&merged)
        .map_err(|e| PolyError::malformed(&polygon.name, e.to_string()))?;
    json.push('\n');
    let svg = render_debug_svg(polygon, &meta);
    Ok(MetaOutputs { meta, json, svg })
}
