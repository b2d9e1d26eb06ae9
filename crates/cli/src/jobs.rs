//! Batch jobs over a polygon directory.
//!
//! Each polygon is handled independently: a failure is logged with the
//! polygon's name, its outputs are skipped, and the batch moves on. All
//! outputs for one polygon are rendered in memory before any file is written.

use anyhow::{bail, Context, Result};
use polyshape::centroid::CentroidSource;
use polyshape::formats::{csv_text, ply_text, ArrayBlock};
use polyshape::geom2::triangulate;
use polyshape::meta::build_outputs;
use polyshape::model::{list_polygon_files, polygon_name, Polygon};
use polyshape::render::{gallery_table, outline_svg, triangulation_svg};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::layout::Layout;

/// Outcome of a batch run; serialized as the `--report` document.
#[derive(Debug, Default, Serialize)]
pub struct Summary {
    pub version: &'static str,
    pub processed: Vec<String>,
    pub failed: Vec<Failure>,
}

#[derive(Debug, Serialize)]
pub struct Failure {
    pub polygon: String,
    /// Full error chain.
    pub error: String,
}

impl Summary {
    fn new() -> Self {
        Self {
            version: polyshape::VERSION,
            ..Self::default()
        }
    }

    fn record(&mut self, name: String, outcome: Result<()>) {
        match outcome {
            Ok(()) => {
                tracing::debug!(polygon = %name, "done");
                self.processed.push(name);
            }
            Err(err) => {
                let error = format!("{err:#}");
                tracing::error!(polygon = %name, error = %error, "polygon failed");
                self.failed.push(Failure {
                    polygon: name,
                    error,
                });
            }
        }
    }

    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }

    /// Error if any polygon failed.
    pub fn into_result(self, job: &str) -> Result<()> {
        tracing::info!(
            job,
            processed = self.processed.len(),
            failed = self.failed.len(),
            "batch finished"
        );
        if !self.failed.is_empty() {
            bail!("{job}: {} of {} polygons failed", self.failed.len(), self.total());
        }
        Ok(())
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Write `contents` to `path`, creating parent directories.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    create_parent(path)?;
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

fn staging_path(path: &Path) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(".tmp");
    PathBuf::from(s)
}

/// Write several files so that either all of them are replaced or none is.
///
/// Every file is first written next to its target as `<name>.tmp`; targets
/// are only replaced (by rename) once all staging writes succeeded.
pub fn write_outputs(files: &[(PathBuf, &str)]) -> Result<()> {
    for (path, _) in files {
        create_parent(path)?;
    }
    let mut staged: Vec<PathBuf> = Vec::with_capacity(files.len());
    for (path, contents) in files {
        let tmp = staging_path(path);
        if let Err(e) = fs::write(&tmp, contents) {
            for done in &staged {
                let _ = fs::remove_file(done);
            }
            return Err(e).with_context(|| format!("writing {}", tmp.display()));
        }
        staged.push(tmp);
    }
    for ((path, _), tmp) in files.iter().zip(&staged) {
        fs::rename(tmp, path)
            .with_context(|| format!("replacing {} with {}", path.display(), tmp.display()))?;
    }
    Ok(())
}

fn polygon_files(layout: &Layout) -> Result<Vec<PathBuf>> {
    let files = list_polygon_files(&layout.input)
        .with_context(|| format!("listing polygons in {}", layout.input.display()))?;
    tracing::info!(input = %layout.input.display(), count = files.len(), "polygons found");
    Ok(files)
}

/// CSV, outline SVG, and PLY per polygon, plus the array block for all
/// polygons that loaded. The block goes to `layout.arrays` and every path in
/// `also_write`; failing to write it aborts the run.
pub fn emit_formats(layout: &Layout, also_write: &[PathBuf]) -> Result<Summary> {
    let mut summary = Summary::new();
    let mut block = ArrayBlock::new();
    for path in polygon_files(layout)? {
        let name = polygon_name(&path);
        let outcome = emit_one(layout, &path, &block)
            .and_then(|poly| block.push(&poly).map_err(anyhow::Error::from));
        summary.record(name, outcome);
    }
    let text = block.render();
    for target in std::iter::once(&layout.arrays).chain(also_write) {
        write_output(target, &text)?;
        tracing::info!(path = %target.display(), polygons = block.len(), "array block written");
    }
    Ok(summary)
}

fn emit_one(layout: &Layout, path: &Path, block: &ArrayBlock) -> Result<Polygon> {
    let poly = Polygon::load(path)?;
    block.check(&poly)?;
    write_outputs(&[
        (layout.csv_file(&poly.name), csv_text(&poly).as_str()),
        (layout.svg_file(&poly.name), outline_svg(&poly).as_str()),
        (layout.ply_file(&poly.name), ply_text(&poly).as_str()),
    ])?;
    Ok(poly)
}

/// Metadata JSON and debug SVG per polygon.
pub fn extract_meta(layout: &Layout, source: &dyn CentroidSource) -> Result<Summary> {
    let mut summary = Summary::new();
    for path in polygon_files(layout)? {
        let name = polygon_name(&path);
        let outcome = meta_one(layout, &path, source);
        summary.record(name, outcome);
    }
    Ok(summary)
}

fn meta_one(layout: &Layout, path: &Path, source: &dyn CentroidSource) -> Result<()> {
    let poly = Polygon::load(path)?;
    let meta_path = layout.meta_file(&poly.name);
    let previous = fs::read_to_string(&meta_path).ok();
    let out = build_outputs(&poly, source, previous.as_deref())?;
    tracing::debug!(
        polygon = %poly.name,
        hull = out.meta.hull.len(),
        radius = out.meta.bounding_circle.radius,
        angle = out.meta.rotated_bounding_box.angle,
        "metadata computed"
    );
    write_outputs(&[
        (meta_path, out.json.as_str()),
        (layout.render_file(&poly.name), out.svg.as_str()),
    ])
}

/// Triangulation SVG per polygon, plus an optional markdown gallery linking
/// every rendered polygon.
pub fn triangulate_shapes(layout: &Layout, gallery: Option<&Path>) -> Result<Summary> {
    let mut summary = Summary::new();
    for path in polygon_files(layout)? {
        let name = polygon_name(&path);
        let outcome = triangulate_one(layout, &path);
        summary.record(name, outcome);
    }
    if let Some(gallery) = gallery {
        let base = gallery.parent().unwrap_or(Path::new(""));
        let cells: Vec<(String, String)> = summary
            .processed
            .iter()
            .map(|name| {
                let file = layout.triangles_file(name);
                let link = file.strip_prefix(base).unwrap_or(&file).display().to_string();
                (link, name.clone())
            })
            .collect();
        write_output(gallery, &gallery_table(&cells))?;
        tracing::info!(path = %gallery.display(), polygons = cells.len(), "gallery written");
    }
    Ok(summary)
}

fn triangulate_one(layout: &Layout, path: &Path) -> Result<()> {
    let poly = Polygon::load(path)?;
    let tris = triangulate(&poly)?;
    tracing::debug!(polygon = %poly.name, triangles = tris.len(), "triangulated");
    let svg = triangulation_svg(&poly, &tris)?;
    write_output(&layout.triangles_file(&poly.name), &svg)
}
