//! Segmentation / physics engine: advances cycle time, classifies each step
//! as trace, pen lift or cycle reset, and decides which positions are worth
//! persisting into the trail.

use crate::config::Config;
use crate::epicycle;
use crate::fourier::Coefficient;
use crate::point::Point;
use crate::trail::TrailBatcher;

/// Guards the velocity division when a caller passes dt == 0.
const DT_EPSILON: f64 = 1e-9;

/// How one tick was classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickEvent {
    /// A point was recorded into the trail.
    Traced,
    /// Movement stayed under the minimum draw distance; nothing recorded.
    Skipped,
    /// Velocity spike: the trail was cut, nothing recorded.
    PenLift,
    /// Time wrapped past 1.0; the trail was reset for a fresh cycle.
    CycleReset,
}

#[derive(Clone, Copy, Debug)]
pub struct Tick {
    pub position: Point,
    pub event: TickEvent,
}

/// Advances the epicycle sum through time and feeds a [`TrailBatcher`].
///
/// Pen lifts are detected by velocity rather than raw distance: true
/// discontinuities in the source curve show up as instantaneous jumps of
/// the composed sum, while the separate minimum draw distance only thins
/// legitimate slow motion.
#[derive(Debug)]
pub struct TraceEngine {
    coefficients: Vec<Coefficient>,
    total_length: f64,
    velocity_threshold: f64,
    min_draw_dist: f64,
    time: f64,
    prev_position: Option<Point>,
    last_recorded: Option<Point>,
}

impl TraceEngine {
    pub fn new(coefficients: Vec<Coefficient>, total_length: f64, config: &Config) -> Self {
        let total_length = total_length.max(1.0);
        Self {
            coefficients,
            total_length,
            velocity_threshold: config.velocity_threshold(total_length),
            min_draw_dist: config.min_draw_dist,
            time: 0.0,
            prev_position: None,
            last_recorded: None,
        }
    }

    /// Cycle time in [0, 1).
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Amplitude-sorted coefficient set, for renderers drawing the circles.
    pub fn coefficients(&self) -> &[Coefficient] {
        &self.coefficients
    }

    /// One simulation step of size `dt` (in cycle units).
    pub fn tick(&mut self, dt: f64, trail: &mut TrailBatcher) -> Tick {
        self.time += dt;
        let mut wrapped = false;
        if self.time > 1.0 {
            self.time -= 1.0;
            trail.reset();
            self.prev_position = None;
            self.last_recorded = None;
            wrapped = true;
        }

        let position = epicycle::position_at(&self.coefficients, self.time);

        let lifting = match self.prev_position {
            Some(prev) => {
                let velocity = (position - prev).norm() / (dt + DT_EPSILON);
                velocity > self.velocity_threshold
            }
            None => false,
        };
        self.prev_position = Some(position);

        if lifting {
            trail.cut(self.time);
            self.last_recorded = None;
            return Tick {
                position,
                event: TickEvent::PenLift,
            };
        }

        let recorded = match self.last_recorded {
            None => true,
            Some(last) => (position - last).norm() > self.min_draw_dist,
        };
        if recorded {
            trail.add_point(position, self.time);
            self.last_recorded = Some(position);
        }

        let event = if wrapped {
            TickEvent::CycleReset
        } else if recorded {
            TickEvent::Traced
        } else {
            TickEvent::Skipped
        };
        Tick { position, event }
    }

    /// Runs one rendered frame's worth of sub-steps at the given visual
    /// speed, so animation pace stays decoupled from frame rate. Returns
    /// the final head position.
    pub fn advance_frame(&mut self, visual_speed: f64, trail: &mut TrailBatcher) -> Point {
        let dt_frame = visual_speed / self.total_length;
        let steps = (visual_speed * 3.0).clamp(2.0, 50.0) as usize;
        let sub_dt = dt_frame / steps as f64;

        let mut position = Point::new(0.0, 0.0);
        for _ in 0..steps {
            position = self.tick(sub_dt, trail).position;
        }
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            harmonics: 1,
            min_draw_dist: 0.5,
            velocity_factor: 3.0,
            target_batches: 150,
            radius: 300.0,
        }
    }

    fn spinning(amplitude: f64) -> Vec<Coefficient> {
        vec![Coefficient {
            frequency: 1,
            amplitude,
            phase: 0.0,
        }]
    }

    #[test]
    fn first_tick_always_records() {
        let mut engine = TraceEngine::new(spinning(100.0), 100.0, &config());
        let mut trail = TrailBatcher::new(1000);
        let tick = engine.tick(0.01, &mut trail);
        assert_eq!(tick.event, TickEvent::Traced);
        assert_eq!(trail.total_recorded(), 1);
    }

    #[test]
    fn velocity_spike_cuts_instead_of_recording() {
        // Threshold 3.0 * 1.0; a radius-100 circle moves ~628 units per
        // cycle, far above it at any dt.
        let mut engine = TraceEngine::new(spinning(100.0), 1.0, &config());
        let mut trail = TrailBatcher::new(1000);
        engine.tick(0.01, &mut trail);
        let tick = engine.tick(0.01, &mut trail);
        assert_eq!(tick.event, TickEvent::PenLift);
        assert_eq!(trail.total_recorded(), 1);
        assert!(trail.active_points().is_empty());
    }

    #[test]
    fn lift_forces_unconditional_rerecord() {
        // Standing oscillation x(t) = 100 cos(2πt): fast mid-swing, still
        // at the turning points.
        let standing = vec![
            Coefficient {
                frequency: 1,
                amplitude: 50.0,
                phase: 0.0,
            },
            Coefficient {
                frequency: -1,
                amplitude: 50.0,
                phase: 0.0,
            },
        ];
        let mut engine = TraceEngine::new(standing, 1.0, &config());
        let mut trail = TrailBatcher::new(1000);
        engine.tick(0.45, &mut trail);
        let tick = engine.tick(0.025, &mut trail);
        assert_eq!(tick.event, TickEvent::PenLift);
        // Symmetric step across the turning point: zero net movement, so
        // no lift, and the cleared memory forces a record despite the
        // sub-threshold distance.
        let tick = engine.tick(0.05, &mut trail);
        assert_eq!(tick.event, TickEvent::Traced);
    }

    #[test]
    fn small_motion_is_skipped() {
        let mut engine = TraceEngine::new(spinning(100.0), 10_000.0, &config());
        let mut trail = TrailBatcher::new(1000);
        engine.tick(1e-7, &mut trail);
        let tick = engine.tick(1e-7, &mut trail);
        assert_eq!(tick.event, TickEvent::Skipped);
        assert_eq!(trail.total_recorded(), 1);
    }

    #[test]
    fn wrap_resets_trail_and_memories() {
        let mut engine = TraceEngine::new(spinning(100.0), 10_000.0, &config());
        let mut trail = TrailBatcher::new(3);
        for _ in 0..5 {
            engine.tick(0.05, &mut trail);
        }
        assert!(trail.total_recorded() > 0);

        let tick = engine.tick(1.0, &mut trail);
        assert_eq!(tick.event, TickEvent::CycleReset);
        assert!(engine.time() < 1.0);
        // Reset trail holds exactly the freshly recorded head point.
        assert_eq!(trail.total_recorded(), 1);
        assert!(trail.batches().is_empty());
    }

    #[test]
    fn advance_frame_clamps_substeps() {
        let mut engine = TraceEngine::new(spinning(50.0), 1000.0, &config());
        let mut trail = TrailBatcher::new(1000);
        let pos = engine.advance_frame(2.0, &mut trail);
        // speed 2.0 -> 6 substeps of dt = (2/1000)/6 each.
        assert!((engine.time() - 2.0 / 1000.0).abs() < 1e-12);
        assert!(pos.norm() > 0.0);
    }
}
