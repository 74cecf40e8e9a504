//! SVG ingestion: parse a document with usvg, flatten every path node into
//! kurbo geometry (absolute transforms applied), then sample and sequence.
//!
//! Parse failures never escape [`load_curve`]: the policy is a silent
//! degrade to the built-in heart curve, logged at warn level.

use std::path::Path as FsPath;

use kurbo::{Affine, BezPath};
use usvg::tiny_skia_path::PathSegment;

use crate::config::Config;
use crate::error::{EpicyclerError, EpicyclerResult};
use crate::point::Point;
use crate::sample;
use crate::sequence::{self, SampledCurve};

/// Loads a curve from the given SVG file, or the fallback shape when the
/// input is absent or unusable. Progress (if any) runs 0 to 1 across
/// parsing, sampling and sequencing.
#[tracing::instrument(skip(config, progress))]
pub fn load_curve(
    input: Option<&FsPath>,
    config: &Config,
    mut progress: Option<&mut dyn FnMut(f64)>,
) -> SampledCurve {
    let ingested = match input {
        Some(path) => {
            // Reborrow through a fresh coercion site so the trait object's
            // lifetime is not pinned to the whole incoming borrow.
            let reborrow: Option<&mut dyn FnMut(f64)> =
                progress.as_deref_mut().map(|cb| cb as _);
            match ingest_file(path, config, reborrow) {
                Ok(curve) => Some(curve),
                Err(err) => {
                    tracing::warn!(%err, path = %path.display(), "svg ingestion failed, using fallback curve");
                    None
                }
            }
        }
        None => None,
    };

    let curve = ingested.unwrap_or_else(|| fallback_curve(config));
    report(&mut progress, 1.0);
    curve
}

/// The heart curve, run through the same sequencing pass as real input.
pub fn fallback_curve(config: &Config) -> SampledCurve {
    sequence::finalize(vec![sample::heart_curve()], config.radius, None)
}

fn ingest_file(
    path: &FsPath,
    config: &Config,
    progress: Option<&mut dyn FnMut(f64)>,
) -> EpicyclerResult<SampledCurve> {
    let data = std::fs::read(path)
        .map_err(|e| EpicyclerError::svg(format!("read '{}': {e}", path.display())))?;
    ingest_data(&data, config, progress)
}

/// Parses SVG bytes and produces the normalized curve. Public so callers
/// with in-memory documents can skip the filesystem.
pub fn ingest_data(
    data: &[u8],
    config: &Config,
    mut progress: Option<&mut dyn FnMut(f64)>,
) -> EpicyclerResult<SampledCurve> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(data, &opts)
        .map_err(|e| EpicyclerError::svg(format!("parse svg tree: {e}")))?;
    report(&mut progress, 0.1);

    let mut paths = Vec::new();
    collect_paths(tree.root(), &mut paths);
    if paths.is_empty() {
        return Err(EpicyclerError::svg("document contains no path geometry"));
    }

    let total = paths.len();
    let mut subpaths: Vec<Vec<Point>> = Vec::new();
    for (idx, bez) in paths.iter().enumerate() {
        for sub in sample::split_subpaths(bez) {
            let pts = sample::sample_subpath(&sub);
            if !pts.is_empty() {
                subpaths.push(pts);
            }
        }
        if idx % 2 == 0 {
            report(&mut progress, 0.1 + idx as f64 / total as f64 * 0.8);
        }
    }
    if subpaths.is_empty() {
        return Err(EpicyclerError::svg("all path geometry has zero length"));
    }
    tracing::debug!(
        paths = total,
        subpaths = subpaths.len(),
        "sampled svg geometry"
    );

    let mut seq_progress = |p: f64| report(&mut progress, 0.9 + p * 0.1);
    Ok(sequence::finalize(
        subpaths,
        config.radius,
        Some(&mut seq_progress),
    ))
}

fn collect_paths(group: &usvg::Group, out: &mut Vec<BezPath>) {
    for child in group.children() {
        match child {
            usvg::Node::Group(g) => collect_paths(g.as_ref(), out),
            usvg::Node::Path(p) => out.push(to_bezier(p.as_ref())),
            usvg::Node::Image(_) | usvg::Node::Text(_) => {}
        }
    }
}

/// Converts a usvg path (tiny-skia segment data) into a kurbo path in
/// absolute document coordinates.
fn to_bezier(path: &usvg::Path) -> BezPath {
    let ts = path.abs_transform();
    let affine = Affine::new([
        ts.sx as f64,
        ts.ky as f64,
        ts.kx as f64,
        ts.sy as f64,
        ts.tx as f64,
        ts.ty as f64,
    ]);

    let mut bez = BezPath::new();
    for seg in path.data().segments() {
        match seg {
            PathSegment::MoveTo(p) => bez.move_to((p.x as f64, p.y as f64)),
            PathSegment::LineTo(p) => bez.line_to((p.x as f64, p.y as f64)),
            PathSegment::QuadTo(p1, p2) => {
                bez.quad_to((p1.x as f64, p1.y as f64), (p2.x as f64, p2.y as f64));
            }
            PathSegment::CubicTo(p1, p2, p3) => {
                bez.curve_to(
                    (p1.x as f64, p1.y as f64),
                    (p2.x as f64, p2.y as f64),
                    (p3.x as f64, p3.y as f64),
                );
            }
            PathSegment::Close => bez.close_path(),
        }
    }
    bez.apply_affine(affine);
    bez
}

fn report(progress: &mut Option<&mut dyn FnMut(f64)>, value: f64) {
    if let Some(cb) = progress.as_deref_mut() {
        cb(value);
    }
}
