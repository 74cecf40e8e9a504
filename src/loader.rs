//! Background loading flow: SVG ingestion plus coefficient extraction on
//! one worker thread, with a lock-free progress fraction for a foreground
//! task to poll.
//!
//! The result payload travels through a channel, so a receiver can never
//! observe completion with a partially written payload. Progress reads may
//! be stale; they only ever have to reach 1.0 eventually.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::Config;
use crate::error::{EpicyclerError, EpicyclerResult};
use crate::fourier::{self, Coefficient};
use crate::sequence::SampledCurve;
use crate::svg;

/// Everything the simulation flow needs, published atomically on
/// completion.
#[derive(Clone, Debug)]
pub struct LoadResult {
    pub curve: SampledCurve,
    pub coefficients: Vec<Coefficient>,
}

pub struct Loader {
    progress: Arc<AtomicU64>,
    rx: mpsc::Receiver<LoadResult>,
    handle: Option<JoinHandle<()>>,
    taken: bool,
}

impl Loader {
    /// Starts the loading flow on a background thread. Not cancellable
    /// once started.
    pub fn spawn(input: Option<PathBuf>, config: Config) -> Self {
        let progress = Arc::new(AtomicU64::new(0.0f64.to_bits()));
        let (tx, rx) = mpsc::channel();

        let shared = Arc::clone(&progress);
        let handle = std::thread::spawn(move || {
            let publish = |p: f64| shared.store(p.to_bits(), Ordering::Relaxed);

            // Ingestion owns the first half of the bar, extraction the
            // second, matching perceived cost.
            let mut ingest_progress = |p: f64| publish(p * 0.5);
            let curve = svg::load_curve(input.as_deref(), &config, Some(&mut ingest_progress));

            let mut dft_progress = |p: f64| publish(0.5 + p * 0.5);
            let coefficients = fourier::compute_coefficients(
                &curve.points,
                config.harmonics,
                Some(&mut dft_progress),
            );
            publish(1.0);

            // The receiver may already be gone during shutdown.
            let _ = tx.send(LoadResult {
                curve,
                coefficients,
            });
        });

        Self {
            progress,
            rx,
            handle: Some(handle),
            taken: false,
        }
    }

    /// Latest published progress fraction in [0, 1]. Approximate by design.
    pub fn progress(&self) -> f64 {
        f64::from_bits(self.progress.load(Ordering::Relaxed))
    }

    /// Non-blocking poll. `Ok(None)` while loading is in flight (or after
    /// the payload was already taken); an error means the worker exited
    /// without ever publishing a result.
    pub fn try_take(&mut self) -> EpicyclerResult<Option<LoadResult>> {
        if self.taken {
            return Ok(None);
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.taken = true;
                self.join_worker();
                Ok(Some(result))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(EpicyclerError::loader(
                "worker exited without publishing a result",
            )),
        }
    }

    /// Bounded wait for completion. On timeout the worker is left to finish
    /// on its own rather than block shutdown; after the payload has been
    /// consumed via [`Self::try_take`], this returns immediately.
    pub fn join(mut self, timeout: Duration) -> Option<LoadResult> {
        if self.taken {
            self.join_worker();
            return None;
        }
        match self.rx.recv_timeout(timeout) {
            Ok(result) => {
                self.join_worker();
                Some(result)
            }
            Err(RecvTimeoutError::Disconnected) => {
                self.join_worker();
                None
            }
            Err(RecvTimeoutError::Timeout) => None,
        }
    }

    /// The worker has already sent (or died), so this never waits long.
    fn join_worker(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
