use std::cmp::Ordering;
use std::f64::consts::TAU;

use crate::point::Point;

/// One rotating vector of the epicycle sum.
///
/// Immutable after extraction. `phase` is in (-π, π], `amplitude` is
/// non-negative.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct Coefficient {
    pub frequency: i64,
    pub amplitude: f64,
    pub phase: f64,
}

impl Coefficient {
    /// The vector this term contributes at cycle time `t` (one full cycle
    /// per unit of `t`).
    pub fn vector_at(&self, time: f64) -> Point {
        Point::from_polar(self.amplitude, self.frequency as f64 * TAU * time + self.phase)
    }
}

/// Target frequencies in extraction order: `0, 1, -1, 2, -2, ..., n, -n`.
pub fn frequency_order(harmonics: usize) -> impl Iterator<Item = i64> {
    std::iter::once(0).chain((1..=harmonics as i64).flat_map(|k| [k, -k]))
}

/// Extracts `2n+1` DFT coefficients from a non-empty point sequence and
/// returns them sorted by amplitude descending, so the dominant circles come
/// first.
///
/// Amplitude ties are broken by lower |frequency| first, then positive
/// before negative, keeping the order deterministic.
///
/// O(N * n) complex multiply-adds; the most expensive step of the loading
/// flow. The optional progress sink is called every 20th coefficient with
/// the fraction completed.
#[tracing::instrument(skip(points, progress), fields(n = points.len(), harmonics))]
pub fn compute_coefficients(
    points: &[Point],
    harmonics: usize,
    mut progress: Option<&mut dyn FnMut(f64)>,
) -> Vec<Coefficient> {
    debug_assert!(!points.is_empty(), "caller guarantees a non-empty sequence");
    let n = points.len() as f64;
    let total = 2 * harmonics + 1;
    let mut coeffs = Vec::with_capacity(total);

    for (idx, k) in frequency_order(harmonics).enumerate() {
        let mut c = Point::new(0.0, 0.0);
        for (t, p) in points.iter().enumerate() {
            let angle = -TAU * k as f64 * t as f64 / n;
            c += p * Point::from_polar(1.0, angle);
        }
        c /= n;
        coeffs.push(Coefficient {
            frequency: k,
            amplitude: c.norm(),
            phase: c.arg(),
        });

        if idx % 20 == 0
            && let Some(cb) = progress.as_deref_mut()
        {
            cb(idx as f64 / total as f64);
        }
    }

    coeffs.sort_by(|a, b| {
        b.amplitude
            .partial_cmp(&a.amplitude)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.frequency.abs().cmp(&b.frequency.abs()))
            .then_with(|| b.frequency.cmp(&a.frequency))
    });
    coeffs
}
