//! Adaptive trail batching: the ever-growing stream of traced points is
//! folded into a bounded list of immutable segments plus one small active
//! segment, so a renderer redraws O(active) per frame instead of O(total).

use crate::color::{Rgb, hsv_to_rgb};
use crate::point::Point;

/// Hue advances this many turns per cycle of trace time.
const HUE_RATE: f64 = 1.5;
const BATCH_SATURATION: f64 = 0.7;
const BATCH_VALUE: f64 = 1.0;

/// An immutable chunk of previously traced points (always >= 2), colored by
/// the time its first point was recorded.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TrailSegment {
    #[serde(with = "crate::point::as_pairs")]
    pub points: Vec<Point>,
    pub color: Rgb,
}

/// Owns the whole trail state; mutated only through `add_point`, `cut` and
/// `reset`.
#[derive(Debug)]
pub struct TrailBatcher {
    batches: Vec<TrailSegment>,
    active: Vec<Point>,
    batch_start_time: f64,
    total_recorded: usize,
    batch_size: usize,
}

impl TrailBatcher {
    /// `batch_size` is usually derived via [`crate::Config::batch_size`].
    pub fn new(batch_size: usize) -> Self {
        Self {
            batches: Vec::new(),
            active: Vec::new(),
            batch_start_time: 0.0,
            total_recorded: 0,
            batch_size: batch_size.max(2),
        }
    }

    pub fn reset(&mut self) {
        self.batches.clear();
        self.active.clear();
        self.batch_start_time = 0.0;
        self.total_recorded = 0;
    }

    /// Appends a traced point; flushes the active segment once it reaches
    /// the batch size, carrying the last point into the next segment so
    /// consecutive batches stay visually contiguous.
    pub fn add_point(&mut self, point: Point, time: f64) {
        if self.active.is_empty() {
            self.batch_start_time = time;
        }
        self.active.push(point);
        self.total_recorded += 1;

        if self.active.len() >= self.batch_size {
            self.flush(time);
        }
    }

    /// Pen lift: closes the active segment (if it is drawable) with no
    /// carry-over. The next recorded point starts a wholly new segment.
    pub fn cut(&mut self, _time: f64) {
        if self.active.len() > 1 {
            let segment = TrailSegment {
                points: std::mem::take(&mut self.active),
                color: self.current_color(),
            };
            self.batches.push(segment);
        } else {
            self.active.clear();
        }
    }

    fn flush(&mut self, now: f64) {
        if self.active.len() < 2 {
            return;
        }
        let segment = TrailSegment {
            points: self.active.clone(),
            color: self.current_color(),
        };
        self.batches.push(segment);

        let last = self.active[self.active.len() - 1];
        self.active.clear();
        self.active.push(last);
        self.batch_start_time = now;
    }

    fn current_color(&self) -> Rgb {
        let hue = (self.batch_start_time * HUE_RATE).rem_euclid(1.0);
        hsv_to_rgb(hue, BATCH_SATURATION, BATCH_VALUE)
    }

    pub fn batches(&self) -> &[TrailSegment] {
        &self.batches
    }

    pub fn active_points(&self) -> &[Point] {
        &self.active
    }

    pub fn total_recorded(&self) -> usize {
        self.total_recorded
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64) -> Point {
        Point::new(x, 0.0)
    }

    #[test]
    fn accumulates_until_batch_size() {
        let mut trail = TrailBatcher::new(4);
        for i in 0..3 {
            trail.add_point(p(i as f64), 0.1 * i as f64);
        }
        assert_eq!(trail.active_points().len(), 3);
        assert!(trail.batches().is_empty());
        assert_eq!(trail.total_recorded(), 3);
    }

    #[test]
    fn flush_carries_last_point_forward() {
        let mut trail = TrailBatcher::new(4);
        for i in 0..4 {
            trail.add_point(p(i as f64), 0.1 * i as f64);
        }
        assert_eq!(trail.batches().len(), 1);
        assert_eq!(trail.batches()[0].points.len(), 4);
        assert_eq!(trail.active_points().len(), 1);
        assert_eq!(trail.active_points()[0], p(3.0));
    }

    #[test]
    fn cut_closes_without_carry() {
        let mut trail = TrailBatcher::new(100);
        trail.add_point(p(0.0), 0.0);
        trail.add_point(p(1.0), 0.1);
        trail.cut(0.2);
        assert_eq!(trail.batches().len(), 1);
        assert!(trail.active_points().is_empty());
    }

    #[test]
    fn cut_discards_single_point_runs() {
        let mut trail = TrailBatcher::new(100);
        trail.add_point(p(0.0), 0.0);
        trail.cut(0.1);
        assert!(trail.batches().is_empty());
        assert!(trail.active_points().is_empty());
    }

    #[test]
    fn reset_clears_everything() {
        let mut trail = TrailBatcher::new(2);
        for i in 0..5 {
            trail.add_point(p(i as f64), 0.1 * i as f64);
        }
        trail.reset();
        assert!(trail.batches().is_empty());
        assert!(trail.active_points().is_empty());
        assert_eq!(trail.total_recorded(), 0);
    }

    #[test]
    fn batch_color_tracks_start_time() {
        let mut trail = TrailBatcher::new(2);
        trail.add_point(p(0.0), 0.0);
        trail.add_point(p(1.0), 0.1);
        // Second segment opened at t=0.1, flushes on its second point.
        trail.add_point(p(2.0), 0.3);
        assert_eq!(trail.batches().len(), 2);
        assert_ne!(trail.batches()[0].color, trail.batches()[1].color);
    }
}
