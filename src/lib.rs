#![forbid(unsafe_code)]

pub mod color;
pub mod config;
pub mod engine;
pub mod epicycle;
pub mod error;
pub mod fourier;
pub mod loader;
pub mod point;
pub mod sample;
pub mod sequence;
pub mod svg;
pub mod trail;

pub use color::Rgb;
pub use config::Config;
pub use engine::{Tick, TickEvent, TraceEngine};
pub use epicycle::{Arm, arms_at, position_at};
pub use error::{EpicyclerError, EpicyclerResult};
pub use fourier::{Coefficient, compute_coefficients};
pub use loader::{LoadResult, Loader};
pub use point::Point;
pub use sequence::SampledCurve;
pub use svg::load_curve;
pub use trail::{TrailBatcher, TrailSegment};
