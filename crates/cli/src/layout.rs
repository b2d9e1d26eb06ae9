use std::path::{Path, PathBuf};

/// Directory layout for a conversion run.
///
/// Defaults follow the sibling-directory convention under one root:
/// `json/` in, `csv/`, `svg/`, `ply/`, `hardcode/polygons.java`, `meta/`,
/// `meta/render/`, and `render/` (triangulations) out.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub input: PathBuf,
    pub csv: PathBuf,
    pub svg: PathBuf,
    pub ply: PathBuf,
    pub arrays: PathBuf,
    pub meta: PathBuf,
    pub render: PathBuf,
    pub triangles: PathBuf,
}

impl Layout {
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            input: root.join("json"),
            csv: root.join("csv"),
            svg: root.join("svg"),
            ply: root.join("ply"),
            arrays: root.join("hardcode").join("polygons.java"),
            meta: root.join("meta"),
            render: root.join("meta").join("render"),
            triangles: root.join("render"),
        }
    }

    pub fn csv_file(&self, name: &str) -> PathBuf {
        self.csv.join(format!("{name}.csv"))
    }

    pub fn svg_file(&self, name: &str) -> PathBuf {
        self.svg.join(format!("{name}.svg"))
    }

    pub fn ply_file(&self, name: &str) -> PathBuf {
        self.ply.join(format!("{name}.ply"))
    }

    pub fn meta_file(&self, name: &str) -> PathBuf {
        self.meta.join(format!("{name}.json"))
    }

    pub fn render_file(&self, name: &str) -> PathBuf {
        self.render.join(format!("{name}.svg"))
    }

    pub fn triangles_file(&self, name: &str) -> PathBuf {
        self.triangles.join(format!("{name}.svg"))
    }
}
