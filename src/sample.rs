//! Turns Bezier subpaths into evenly spaced point sequences, plus the
//! closed-form fallback curve used when no usable input exists.

use std::f64::consts::TAU;

use kurbo::{BezPath, ParamCurve, ParamCurveArclen, PathEl, PathSeg};

use crate::point::Point;

const ARCLEN_ACCURACY: f64 = 1e-2;
/// Sample count per subpath is `floor(arc length) + EXTRA_SAMPLES`.
const EXTRA_SAMPLES: usize = 10;
const HEART_SAMPLES: usize = 1000;

/// Splits a path into its subpaths, one per MoveTo.
pub fn split_subpaths(path: &BezPath) -> Vec<BezPath> {
    let mut subpaths = Vec::new();
    let mut current: Vec<PathEl> = Vec::new();
    for el in path.elements() {
        if matches!(el, PathEl::MoveTo(_)) && !current.is_empty() {
            subpaths.push(BezPath::from_vec(std::mem::take(&mut current)));
        }
        current.push(*el);
    }
    if !current.is_empty() {
        subpaths.push(BezPath::from_vec(current));
    }
    subpaths
}

/// Samples one subpath at `floor(L) + 10` points evenly spread along its
/// arc length. Zero-length subpaths contribute no points at all.
pub fn sample_subpath(subpath: &BezPath) -> Vec<Point> {
    let segments: Vec<PathSeg> = subpath.segments().collect();
    if segments.is_empty() {
        return Vec::new();
    }
    let lengths: Vec<f64> = segments.iter().map(|s| s.arclen(ARCLEN_ACCURACY)).collect();
    let length: f64 = lengths.iter().sum();
    if length == 0.0 {
        return Vec::new();
    }

    // The global parameter maps through per-segment length fractions, so
    // samples land at roughly even arc-length spacing regardless of how
    // unevenly the segments split the subpath.
    let count = length.floor() as usize + EXTRA_SAMPLES;
    let mut points = Vec::with_capacity(count);
    let mut seg_idx = 0;
    let mut covered = 0.0;
    for i in 0..count {
        let target = i as f64 / count as f64 * length;
        while seg_idx + 1 < segments.len() && covered + lengths[seg_idx] <= target {
            covered += lengths[seg_idx];
            seg_idx += 1;
        }
        let local = if lengths[seg_idx] > 0.0 {
            ((target - covered) / lengths[seg_idx]).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let p = segments[seg_idx].eval(local);
        points.push(Point::new(p.x, p.y));
    }
    points
}

/// The fallback shape traced when the input is missing or unparseable: a
/// closed heart curve, sampled once around.
pub fn heart_curve() -> Vec<Point> {
    (0..HEART_SAMPLES)
        .map(|i| {
            let t = i as f64 / HEART_SAMPLES as f64 * TAU;
            let x = 16.0 * t.sin().powi(3);
            let y = -(13.0 * t.cos()
                - 5.0 * (2.0 * t).cos()
                - 2.0 * (3.0 * t).cos()
                - (4.0 * t).cos());
            Point::new(x, y)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_move_to() {
        let path = BezPath::from_svg("M0,0 L1,0 M5,5 L6,5 L6,6").unwrap();
        let subs = split_subpaths(&path);
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].elements().len(), 2);
        assert_eq!(subs[1].elements().len(), 3);
    }

    #[test]
    fn sample_count_follows_arc_length() {
        let path = BezPath::from_svg("M0,0 L100,0").unwrap();
        let pts = sample_subpath(&path);
        assert_eq!(pts.len(), 110);
        assert!((pts[0] - Point::new(0.0, 0.0)).norm() < 1e-9);
        // Last sample sits just short of the endpoint (parameter < 1).
        assert!(pts[109].re < 100.0);
        assert!(pts[109].re > 99.0);
    }

    #[test]
    fn samples_spread_by_arc_length_not_segment_count() {
        // A 100-unit segment followed by a 1-unit one: the short tail must
        // not soak up half the samples.
        let path = BezPath::from_svg("M0,0 L100,0 L101,0").unwrap();
        let pts = sample_subpath(&path);
        assert_eq!(pts.len(), 111);

        let tail = pts.iter().filter(|p| p.re > 100.0).count();
        assert!(tail <= 2, "{tail} of 111 samples on the final 1% of arc");

        let spacing = 101.0 / 111.0;
        let max_gap = pts
            .windows(2)
            .map(|w| (w[1] - w[0]).norm())
            .fold(0.0, f64::max);
        assert!(max_gap < 2.0 * spacing, "max gap {max_gap}");
    }

    #[test]
    fn zero_length_subpath_is_skipped() {
        let path = BezPath::from_svg("M3,3 L3,3").unwrap();
        assert!(sample_subpath(&path).is_empty());

        let lone_move = BezPath::from_svg("M3,3").unwrap();
        assert!(sample_subpath(&lone_move).is_empty());
    }

    #[test]
    fn heart_is_closed_and_sized() {
        let pts = heart_curve();
        assert_eq!(pts.len(), 1000);
        assert!((pts[0] - Point::new(0.0, -5.0)).norm() < 1e-9);
        // Closed curve: last sample approaches the first.
        let gap = (pts[999] - pts[0]).norm();
        assert!(gap < 0.5, "gap = {gap}");
    }
}
