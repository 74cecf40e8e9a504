//! Pure evaluation of the epicycle sum. No state lives here: the physics
//! engine and any renderer can both call into this module without aliasing
//! concerns.

use crate::fourier::Coefficient;
use crate::point::Point;

/// Composed position of the whole sum at cycle time `time`. Periodic with
/// period 1.
pub fn position_at(coeffs: &[Coefficient], time: f64) -> Point {
    coeffs.iter().map(|c| c.vector_at(time)).sum()
}

/// One link of the rotating-vector chain, in amplitude-sorted order.
/// `center` is the partial sum before this term, `tip` after; `radius` is
/// the term's amplitude. This is what a renderer draws as circle + arm.
#[derive(Clone, Copy, Debug)]
pub struct Arm {
    pub center: Point,
    pub tip: Point,
    pub radius: f64,
}

/// Yields the chain of partial sums at `time`, largest circle first. The
/// final arm's `tip` equals [`position_at`].
pub fn arms_at(coeffs: &[Coefficient], time: f64) -> impl Iterator<Item = Arm> + '_ {
    coeffs.iter().scan(Point::new(0.0, 0.0), move |acc, c| {
        let center = *acc;
        *acc += c.vector_at(time);
        Some(Arm {
            center,
            tip: *acc,
            radius: c.amplitude,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_coeffs() -> Vec<Coefficient> {
        vec![
            Coefficient {
                frequency: 0,
                amplitude: 1.5,
                phase: 0.3,
            },
            Coefficient {
                frequency: 1,
                amplitude: 2.0,
                phase: -1.1,
            },
            Coefficient {
                frequency: -2,
                amplitude: 0.25,
                phase: 2.0,
            },
        ]
    }

    #[test]
    fn periodic_with_period_one() {
        let coeffs = sample_coeffs();
        for t in [0.0, 0.123, 0.77, 3.4] {
            let a = position_at(&coeffs, t);
            let b = position_at(&coeffs, t + 1.0);
            assert!((a - b).norm() < 1e-6, "t={t}: {a} vs {b}");
        }
    }

    #[test]
    fn single_term_traces_a_circle() {
        let coeffs = vec![Coefficient {
            frequency: 1,
            amplitude: 2.0,
            phase: 0.0,
        }];
        let p = position_at(&coeffs, 0.25);
        assert!((p - Point::new(0.0, 2.0)).norm() < 1e-12);
        let p = position_at(&coeffs, 0.5);
        assert!((p - Point::new(-2.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn arms_chain_partial_sums() {
        let coeffs = sample_coeffs();
        let arms: Vec<Arm> = arms_at(&coeffs, 0.4).collect();
        assert_eq!(arms.len(), coeffs.len());
        assert_eq!(arms[0].center, Point::new(0.0, 0.0));
        for pair in arms.windows(2) {
            assert_eq!(pair[0].tip, pair[1].center);
        }
        let tail = arms[arms.len() - 1].tip;
        assert!((tail - position_at(&coeffs, 0.4)).norm() < 1e-12);
        assert!((arms[1].radius - 2.0).abs() < f64::EPSILON);
    }
}
