use crate::error::{EpicyclerError, EpicyclerResult};

/// Trail segments never shrink below this many points, however short the
/// source curve is.
const MIN_BATCH_SIZE: usize = 100;

/// All tunables consumed by the core, injected at construction time.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of harmonics `n`; the coefficient set has `2n+1` entries.
    pub harmonics: usize,
    /// Minimum distance between two recorded trail points.
    pub min_draw_dist: f64,
    /// Pen-lift threshold as a multiple of the curve's estimated length.
    pub velocity_factor: f64,
    /// Rough number of closed batches one full cycle should produce.
    pub target_batches: usize,
    /// Normalization radius: after centering, the farthest sample sits at
    /// this magnitude.
    pub radius: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            harmonics: 400,
            min_draw_dist: 0.5,
            velocity_factor: 3.0,
            target_batches: 150,
            radius: 300.0,
        }
    }
}

impl Config {
    pub fn validate(&self) -> EpicyclerResult<()> {
        if self.min_draw_dist <= 0.0 {
            return Err(EpicyclerError::validation("min_draw_dist must be > 0"));
        }
        if self.velocity_factor <= 0.0 {
            return Err(EpicyclerError::validation("velocity_factor must be > 0"));
        }
        if self.target_batches == 0 {
            return Err(EpicyclerError::validation("target_batches must be > 0"));
        }
        if self.radius <= 0.0 {
            return Err(EpicyclerError::validation("radius must be > 0"));
        }
        Ok(())
    }

    /// Points one full cycle is expected to record for a curve of the given
    /// estimated length.
    pub fn estimated_trace_points(&self, total_length: f64) -> usize {
        (total_length / self.min_draw_dist) as usize
    }

    /// Batch size chosen so a full cycle yields roughly `target_batches`
    /// closed segments, independent of path complexity.
    pub fn batch_size(&self, total_length: f64) -> usize {
        let estimated = self.estimated_trace_points(total_length);
        (estimated / self.target_batches).max(MIN_BATCH_SIZE)
    }

    /// Composed-sum speed above which a step counts as a pen lift.
    pub fn velocity_threshold(&self, total_length: f64) -> f64 {
        self.velocity_factor * total_length
    }
}
