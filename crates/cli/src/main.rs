use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use polyshape::centroid::{CentroidSource, InProcess, Subprocess};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod jobs;
mod layout;

use jobs::{emit_formats, extract_meta, triangulate_shapes, write_output, Summary};
use layout::Layout;

#[derive(Parser)]
#[command(name = "polyshape")]
#[command(
    about = "Convert polygon JSON files into derived formats and metadata",
    version = polyshape::VERSION
)]
struct Cmd {
    /// Root holding json/ and the sibling output directories
    #[arg(long, default_value = ".")]
    root: PathBuf,
    /// Input directory of polygon files [default: <root>/json]
    #[arg(long)]
    input: Option<PathBuf>,
    /// Write a JSON summary of processed and failed polygons here
    #[arg(long)]
    report: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Write CSV, outline SVG, PLY per polygon and the Java array block
    Formats {
        #[arg(long)]
        csv_dir: Option<PathBuf>,
        #[arg(long)]
        svg_dir: Option<PathBuf>,
        #[arg(long)]
        ply_dir: Option<PathBuf>,
        /// Array block path [default: <root>/hardcode/polygons.java]
        #[arg(long)]
        arrays: Option<PathBuf>,
        /// Extra copies of the array block (e.g. a Processing sketch's POLYGONS.pde)
        #[arg(long = "also-write")]
        also_write: Vec<PathBuf>,
    },
    /// Compute metadata JSON and debug SVG renders
    Meta {
        #[arg(long)]
        meta_dir: Option<PathBuf>,
        /// Debug render directory [default: <meta-dir>/render]
        #[arg(long)]
        render_dir: Option<PathBuf>,
        /// External centroid/area program and its leading arguments; the
        /// polygon path is appended. Computed in-process when omitted.
        #[arg(long, num_args = 1.., allow_hyphen_values = true, value_name = "PROGRAM [ARGS]")]
        collaborator: Option<Vec<String>>,
    },
    /// Triangulate every polygon and render the triangles as SVG
    Triangulate {
        /// Render directory [default: <root>/render]
        #[arg(long)]
        render_dir: Option<PathBuf>,
        /// Also write a markdown table linking every render
        #[arg(long)]
        gallery: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    let mut layout = Layout::rooted_at(&cmd.root);
    if let Some(input) = cmd.input {
        layout.input = input;
    }
    let (job, summary) = match cmd.action {
        Action::Formats {
            csv_dir,
            svg_dir,
            ply_dir,
            arrays,
            also_write,
        } => {
            override_path(&mut layout.csv, csv_dir);
            override_path(&mut layout.svg, svg_dir);
            override_path(&mut layout.ply, ply_dir);
            override_path(&mut layout.arrays, arrays);
            tracing::info!(layout = ?layout, "formats");
            ("formats", emit_formats(&layout, &also_write)?)
        }
        Action::Meta {
            meta_dir,
            render_dir,
            collaborator,
        } => {
            if let Some(dir) = meta_dir {
                layout.render = dir.join("render");
                layout.meta = dir;
            }
            override_path(&mut layout.render, render_dir);
            let source = centroid_source(collaborator)?;
            tracing::info!(layout = ?layout, "meta");
            ("meta", extract_meta(&layout, source.as_ref())?)
        }
        Action::Triangulate {
            render_dir,
            gallery,
        } => {
            override_path(&mut layout.triangles, render_dir);
            tracing::info!(layout = ?layout, "triangulate");
            ("triangulate", triangulate_shapes(&layout, gallery.as_deref())?)
        }
    };
    if let Some(path) = &cmd.report {
        write_report(path, &summary)?;
    }
    summary.into_result(job)
}

fn override_path(slot: &mut PathBuf, value: Option<PathBuf>) {
    if let Some(v) = value {
        *slot = v;
    }
}

fn centroid_source(collaborator: Option<Vec<String>>) -> Result<Box<dyn CentroidSource>> {
    match collaborator {
        None => Ok(Box::new(InProcess)),
        Some(argv) => {
            let (program, args) = argv
                .split_first()
                .context("--collaborator needs a program")?;
            tracing::info!(program, ?args, "using external centroid collaborator");
            Ok(Box::new(Subprocess::new(program, args)))
        }
    }
}

fn write_report(path: &Path, summary: &Summary) -> Result<()> {
    write_output(path, &serde_json::to_string_pretty(summary)?)?;
    tracing::info!(path = %path.display(), "report written");
    Ok(())
}
