//! Upload progress reporting

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;

type Callback = Arc<dyn Fn(f64) + Send + Sync>;

/// Forwards upload progress to a callback, never reporting a lower value
/// than one already reported
///
/// Values are clamped to `0.0..=1.0`. A request retransmitted after a token
/// refresh restarts its byte count; the reporter stays silent until the
/// retransmission passes the previous high-water mark.
#[derive(Clone)]
pub struct ProgressReporter {
    callback: Callback,
    reported: Arc<Mutex<Option<f64>>>,
}

impl ProgressReporter {
    pub fn new(callback: impl Fn(f64) + Send + Sync + 'static) -> Self {
        Self { callback: Arc::new(callback), reported: Arc::new(Mutex::new(None)) }
    }

    /// Report `sent` out of `total` bytes
    pub fn bytes(&self, sent: usize, total: usize) {
        if total > 0 {
            #[allow(clippy::cast_precision_loss)]
            let fraction = sent as f64 / total as f64;
            self.report(fraction);
        }
    }

    pub fn report(&self, fraction: f64) {
        if fraction.is_nan() {
            return;
        }
        let fraction = fraction.clamp(0.0, 1.0);
        {
            let mut reported = self.reported.lock();
            if reported.is_some_and(|last| fraction <= last) {
                return;
            }
            *reported = Some(fraction);
        }
        (self.callback)(fraction);
    }

    /// Report completion
    pub fn finish(&self) {
        self.report(1.0);
    }

    /// Highest fraction reported so far
    pub fn last(&self) -> Option<f64> {
        *self.reported.lock()
    }
}

impl fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReporter").field("last", &self.last()).finish_non_exhaustive()
    }
}

/// Split `bytes` into chunks of at most `chunk_size` bytes without copying
pub(crate) fn chunks(bytes: &Bytes, chunk_size: usize) -> Vec<Bytes> {
    let chunk_size = chunk_size.max(1);
    (0..bytes.len())
        .step_by(chunk_size)
        .map(|start| bytes.slice(start..(start + chunk_size).min(bytes.len())))
        .collect()
}
