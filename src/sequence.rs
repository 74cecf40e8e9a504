//! Stitches disjoint subpath samples into one normalized traversal.

use crate::point::Point;

/// The loading flow's end product: one ordered, centered, scaled point
/// sequence plus its estimated geometric length.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SampledCurve {
    #[serde(with = "crate::point::as_pairs")]
    pub points: Vec<Point>,
    pub total_length: f64,
}

/// Greedy nearest-successor ordering: the chain starts with the first
/// subpath; each step appends the remaining subpath whose first point is
/// closest to the chain's last point. O(P²) in the subpath count, which is
/// small next to the point counts.
///
/// Equal distances keep the earliest candidate (strict `<` comparison), so
/// the result is deterministic for a given input order.
pub fn order_greedy(
    mut pool: Vec<Vec<Point>>,
    mut progress: Option<&mut dyn FnMut(f64)>,
) -> Vec<Vec<Point>> {
    pool.retain(|p| !p.is_empty());
    if pool.is_empty() {
        return Vec::new();
    }

    let total = pool.len();
    let mut ordered: Vec<Vec<Point>> = Vec::with_capacity(total);
    let mut current = pool.remove(0);

    while !pool.is_empty() {
        let last = current[current.len() - 1];
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, candidate) in pool.iter().enumerate() {
            let dist = (candidate[0] - last).norm();
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }
        ordered.push(std::mem::replace(&mut current, pool.remove(best)));

        if ordered.len() % 5 == 0
            && let Some(cb) = progress.as_deref_mut()
        {
            cb(ordered.len() as f64 / total as f64);
        }
    }
    ordered.push(current);
    ordered
}

/// Drops consecutive duplicates, subtracts the centroid and scales so the
/// farthest point sits at `radius`. Empty input and zero extent both skip
/// the respective step instead of failing.
pub fn normalize(points: &mut Vec<Point>, radius: f64) {
    points.dedup();
    if points.is_empty() {
        return;
    }

    let centroid = points.iter().sum::<Point>() / points.len() as f64;
    for p in points.iter_mut() {
        *p -= centroid;
    }

    let max_norm = points.iter().map(|p| p.norm()).fold(0.0, f64::max);
    if max_norm > 0.0 {
        let scale = radius / max_norm;
        for p in points.iter_mut() {
            *p *= scale;
        }
    }
}

/// Polyline length of the sequence, clamped to a nominal minimum of 1 so
/// downstream threshold math never sees zero.
pub fn estimated_length(points: &[Point]) -> f64 {
    let length: f64 = points.windows(2).map(|w| (w[1] - w[0]).norm()).sum();
    length.max(1.0)
}

/// Full sequencing pass: greedy order, concatenate, normalize, measure.
pub fn finalize(
    subpaths: Vec<Vec<Point>>,
    radius: f64,
    progress: Option<&mut dyn FnMut(f64)>,
) -> SampledCurve {
    let ordered = order_greedy(subpaths, progress);
    let mut points: Vec<Point> = ordered.into_iter().flatten().collect();
    normalize(&mut points, radius);
    let total_length = estimated_length(&points);
    SampledCurve {
        points,
        total_length,
    }
}
