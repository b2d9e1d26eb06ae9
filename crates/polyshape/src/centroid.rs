//! Centroid/area collaborator.
//!
//! The metadata pipeline needs a region centroid, area, and bounds for each
//! polygon. `InProcess` computes them directly; `Subprocess` delegates to an
//! external program that takes the polygon file path as its last argument
//! and prints `{"centroid":[x,y],"bounds":[minX,minY,maxX,maxY],"area":a}`.

use std::ffi::OsString;
use std::process::Command;

use serde::{Deserialize, Serialize};

use crate::error::{PolyError, Result};
use crate::geom2::{centroid_and_area, Aabb};
use crate::model::Polygon;

/// Collaborator output merged into the metadata record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub centroid: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    pub bounds: [f64; 4],
}

impl Measure {
    fn validate(self, name: &str) -> Result<Self> {
        let finite = self.centroid.iter().chain(self.bounds.iter()).all(|v| v.is_finite())
            && self.area.map_or(true, f64::is_finite);
        if !finite {
            return Err(PolyError::collaborator(name, "non-finite value in output"));
        }
        if self.bounds[0] > self.bounds[2] || self.bounds[1] > self.bounds[3] {
            return Err(PolyError::collaborator(name, "bounds min exceeds max"));
        }
        Ok(self)
    }
}

/// Source of centroid, area, and bounds for a polygon.
pub trait CentroidSource {
    fn measure(&self, polygon: &Polygon) -> Result<Measure>;
}

/// Computes everything in-process (no external dependency).
///
/// Bounds cover every ring; centroid and area treat later rings as holes.
#[derive(Clone, Copy, Debug, Default)]
pub struct InProcess;

impl CentroidSource for InProcess {
    fn measure(&self, polygon: &Polygon) -> Result<Measure> {
        let (c, area) = centroid_and_area(polygon)?;
        let bounds = polygon_bounds(polygon)?;
        Ok(Measure {
            centroid: [c.x, c.y],
            area: Some(area),
            bounds: bounds.to_array(),
        })
    }
}

/// Bounds over every point of every ring.
pub fn polygon_bounds(polygon: &Polygon) -> Result<Aabb> {
    let mut pts = polygon.rings.iter().flatten();
    let first = pts
        .next()
        .ok_or_else(|| PolyError::DegenerateGeometry(format!("`{}` has no points", polygon.name)))?;
    let mut b = Aabb::at(*first);
    for p in pts {
        b.extend(*p);
    }
    Ok(b)
}

/// One-shot external process per polygon. Blocking, no retry.
#[derive(Clone, Debug)]
pub struct Subprocess {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl Subprocess {
    pub fn new(
        program: impl Into<OsString>,
        args: impl IntoIterator<Item = impl Into<OsString>>,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl CentroidSource for Subprocess {
    fn measure(&self, polygon: &Polygon) -> Result<Measure> {
        let name = polygon.name.as_str();
        let path = polygon
            .source
            .as_ref()
            .ok_or_else(|| PolyError::collaborator(name, "polygon has no source file"))?;
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .output()
            .map_err(|e| {
                PolyError::collaborator(
                    name,
                    format!("spawning {}: {e}", self.program.to_string_lossy()),
                )
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PolyError::collaborator(
                name,
                format!("exited with status {:?}: {}", output.status.code(), stderr.trim()),
            ));
        }
        let measure: Measure = serde_json::from_slice(&output.stdout)
            .map_err(|e| PolyError::collaborator(name, format!("unparsable output: {e}")))?;
        measure.validate(name)
    }
}
