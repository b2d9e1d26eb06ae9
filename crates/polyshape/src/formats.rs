//! Mechanical serializers: CSV rows, ASCII PLY edge meshes, and a Java
//! array-literal block embedding every polygon.

use std::fmt::Write as _;

use crate::error::{PolyError, Result};
use crate::model::Polygon;

/// One line per ring, `x,y,x,y,...`; no trailing newline.
pub fn csv_text(polygon: &Polygon) -> String {
    polygon
        .rings
        .iter()
        .map(|ring| {
            ring.iter()
                .map(|p| format!("{},{}", p.x, p.y))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// ASCII PLY with one closed edge loop per ring (z = 0).
pub fn ply_text(polygon: &Polygon) -> String {
    let n = polygon.point_count();
    let mut out = String::new();
    let _ = write!(
        out,
        "ply\nformat ascii 1.0\nelement vertex {n}\nproperty float x\nproperty float y\nproperty float z\nelement edge {n}\nproperty int vertex1\nproperty int vertex2\nend_header\n"
    );
    for p in polygon.rings.iter().flatten() {
        let _ = writeln!(out, "{} {} 0", p.x, p.y);
    }
    let mut offset = 0usize;
    for ring in &polygon.rings {
        let len = ring.len();
        for i in 0..len {
            let _ = writeln!(out, "{} {}", offset + i, offset + (i + 1) % len);
        }
        offset += len;
    }
    out
}

/// Java constant name for a polygon: `star-5` → `POLYGON_STAR_5`.
///
/// Dashes, and anything else that cannot appear in a Java identifier, become
/// underscores.
pub fn constant_name(name: &str) -> String {
    let body: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("POLYGON_{body}")
}

/// Java `float` literal: integers stay bare while they fit an `int`,
/// everything else gets an `f` suffix.
///
/// Values outside `f32` range (overflow, or nonzero values that round to
/// zero) give literals javac rejects; `ArrayBlock::check` refuses them.
pub fn float_literal(v: f64) -> String {
    if v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64 {
        format!("{}", v as i32)
    } else {
        format!("{v}f")
    }
}

/// Java string literal with escapes for quotes, backslashes, and control chars.
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn fits_f32(v: f64) -> bool {
    let f = v as f32;
    f.is_finite() && (f != 0.0 || v == 0.0)
}

/// Accumulates polygons and renders them as Java array declarations.
///
/// Output: one `float[][][]` constant per polygon (ring → point → `{x,y}`),
/// then `POLYGONS` referencing all constants and `POLYGON_NAMES` holding the
/// polygon names as loaded, both in insertion order.
#[derive(Clone, Debug, Default)]
pub struct ArrayBlock {
    entries: Vec<(String, String)>,
}

impl ArrayBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `polygon` can join the block: every coordinate must be a valid
    /// `float` literal and its constant name must not be taken yet.
    pub fn check(&self, polygon: &Polygon) -> Result<()> {
        let ident = constant_name(&polygon.name);
        if let Some((taken, _)) = self.entries.iter().find(|(n, _)| constant_name(n) == ident) {
            return Err(PolyError::malformed(
                &polygon.name,
                format!("constant {ident} already used by `{taken}`"),
            ));
        }
        for (ri, ring) in polygon.rings.iter().enumerate() {
            for (pi, p) in ring.iter().enumerate() {
                if !fits_f32(p.x) || !fits_f32(p.y) {
                    return Err(PolyError::malformed(
                        &polygon.name,
                        format!("ring {ri}, point {pi} is outside float range"),
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn push(&mut self, polygon: &Polygon) -> Result<()> {
        self.check(polygon)?;
        let rings: Vec<String> = polygon
            .rings
            .iter()
            .map(|ring| {
                ring.iter()
                    .map(|p| format!("{{{},{}}}", float_literal(p.x), float_literal(p.y)))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect();
        let decl = format!(
            "public static final float[][][] {}={{{{{}}}}};\n\n",
            constant_name(&polygon.name),
            rings.join("},\n\t{")
        );
        self.entries.push((polygon.name.clone(), decl));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out: String = self.entries.iter().map(|(_, decl)| decl.as_str()).collect();
        let idents: Vec<String> = self.entries.iter().map(|(n, _)| constant_name(n)).collect();
        let names: Vec<String> = self.entries.iter().map(|(n, _)| string_literal(n)).collect();
        let _ = writeln!(
            out,
            "public static final float[][][][] POLYGONS = {{{}}};",
            idents.join(",")
        );
        let _ = write!(
            out,
            "public static final String[] POLYGON_NAMES = {{{}}};",
            names.join(",")
        );
        out
    }
}
