//! Typed polygon model and directory loading.
//!
//! Purpose
//! - Parse polygon files (`[[[x, y], ...], ...]`) into explicit `Polygon`/`Ring`
//!   values once, at the boundary, so geometry code never sees untyped JSON.
//!
//! Conventions
//! - The first ring is the primary ring (outline); further rings are holes or
//!   disjoint loops and only matter for rendering, bounds, and area.
//! - Rings are closed implicitly: the last point connects back to the first.

use std::fs;
use std::path::{Path, PathBuf};

use nalgebra::Vector2;

use crate::error::{PolyError, Result};

/// Closed loop of points; the closing edge is implicit.
pub type Ring = Vec<Vector2<f64>>;

/// A named shape made of one or more rings.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub name: String,
    pub rings: Vec<Ring>,
    /// File the polygon was read from, if any. Needed by subprocess collaborators.
    pub source: Option<PathBuf>,
}

impl Polygon {
    /// Build an in-memory polygon from raw coordinate pairs.
    ///
    /// Fails with `MalformedInput` when there are no rings or a coordinate is
    /// not finite. Empty rings are accepted here; geometry rejects them later.
    pub fn new(name: impl Into<String>, rings: Vec<Vec<[f64; 2]>>) -> Result<Self> {
        let name = name.into();
        if rings.is_empty() {
            return Err(PolyError::malformed(&name, "expected at least one ring"));
        }
        let mut out: Vec<Ring> = Vec::with_capacity(rings.len());
        for (ri, ring) in rings.into_iter().enumerate() {
            let mut pts = Vec::with_capacity(ring.len());
            for (pi, [x, y]) in ring.into_iter().enumerate() {
                if !(x.is_finite() && y.is_finite()) {
                    return Err(PolyError::malformed(
                        &name,
                        format!("non-finite coordinate at ring {ri}, point {pi}"),
                    ));
                }
                pts.push(Vector2::new(x, y));
            }
            out.push(pts);
        }
        Ok(Self {
            name,
            rings: out,
            source: None,
        })
    }

    /// Parse a polygon from JSON text.
    pub fn from_json_str(name: impl Into<String>, text: &str) -> Result<Self> {
        let name = name.into();
        let raw: Vec<Vec<[f64; 2]>> =
            serde_json::from_str(text).map_err(|e| PolyError::malformed(&name, e.to_string()))?;
        Self::new(name, raw)
    }

    /// Read and parse one polygon file. The name is the file stem up to the first `.`.
    pub fn load(path: &Path) -> Result<Self> {
        let name = polygon_name(path);
        let text = fs::read_to_string(path).map_err(|e| PolyError::io(path, e))?;
        let mut poly = Self::from_json_str(name, &text)?;
        poly.source = Some(path.to_path_buf());
        Ok(poly)
    }

    /// First ring (outline used for hull, bounding shapes, and centroid).
    #[inline]
    pub fn primary(&self) -> &[Vector2<f64>] {
        &self.rings[0]
    }

    /// Total number of points over all rings.
    pub fn point_count(&self) -> usize {
        self.rings.iter().map(Vec::len).sum()
    }

    /// Every point, ring by ring (the numbering used by PLY edges and triangles).
    pub fn points(&self) -> Vec<Vector2<f64>> {
        self.rings.iter().flatten().copied().collect()
    }

    /// Raw coordinate pairs, ring by ring.
    pub fn to_pairs(&self) -> Vec<Vec<[f64; 2]>> {
        self.rings
            .iter()
            .map(|r| r.iter().map(|p| [p.x, p.y]).collect())
            .collect()
    }
}

/// Polygon name for a file: `dir/star-5.v2.json` → `star-5`.
pub fn polygon_name(path: &Path) -> String {
    let file = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => file,
    }
}

/// `*.json` files in `dir`, sorted by file name.
///
/// An unreadable directory is an error; unreadable entries are skipped.
pub fn list_polygon_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| PolyError::io(dir, e))?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_rings_and_points() {
        let p = Polygon::from_json_str("sq", "[[[0,0],[10,0],[10,10],[0,10]],[[2,2],[3,2],[3,3]]]")
            .unwrap();
        assert_eq!(p.rings.len(), 2);
        assert_eq!(p.primary().len(), 4);
        assert_eq!(p.point_count(), 7);
        assert_eq!(p.primary()[2], Vector2::new(10.0, 10.0));
        assert_eq!(p.points()[5], Vector2::new(3.0, 2.0));
    }

    #[test]
    fn rejects_structural_errors() {
        for bad in ["{}", "[]", "[[[1,2,3]]]", "[[1,2]]", "[[[\"a\",1]]]"] {
            let err = Polygon::from_json_str("bad", bad).unwrap_err();
            assert!(
                matches!(err, PolyError::MalformedInput { ref name, .. } if name == "bad"),
                "input {bad} gave {err:?}"
            );
        }
    }

    #[test]
    fn rejects_non_finite() {
        let err = Polygon::new("inf", vec![vec![[0.0, f64::INFINITY]]]).unwrap_err();
        assert!(matches!(err, PolyError::MalformedInput { .. }));
    }

    #[test]
    fn name_is_stem_before_first_dot() {
        assert_eq!(polygon_name(Path::new("/a/b/star-5.v2.json")), "star-5");
        assert_eq!(polygon_name(Path::new("plain")), "plain");
    }

    #[test]
    fn lists_only_json_sorted() {
        let dir = tempdir().unwrap();
        for f in ["b.json", "a.json", "notes.txt"] {
            fs::write(dir.path().join(f), "[[[0,0]]]").unwrap();
        }
        fs::create_dir(dir.path().join("sub.json")).unwrap();
        let files = list_polygon_files(dir.path()).unwrap();
        let names: Vec<_> = files.iter().map(|p| polygon_name(p)).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn load_records_source() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tri.json");
        fs::write(&path, "[[[0,0],[1,0],[0,1]]]").unwrap();
        let p = Polygon::load(&path).unwrap();
        assert_eq!(p.name, "tri");
        assert_eq!(p.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn missing_dir_is_io_error() {
        let dir = tempdir().unwrap();
        let err = list_polygon_files(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, PolyError::Io { .. }));
    }
}
