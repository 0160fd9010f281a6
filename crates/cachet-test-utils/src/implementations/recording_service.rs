//! Services that record their lifecycle for assertions.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use cachet_core::{CoreError, CoreResult, DefaultConfiguration, Service};
use parking_lot::Mutex;

/// A service counting its starts and stops.
///
/// On every start it also records the cache aliases of the configuration it
/// was started with, sorted.
#[derive(Default)]
pub struct RecordingService {
    starts: AtomicUsize,
    stops: AtomicUsize,
    seen_aliases: Mutex<Vec<Vec<String>>>,
}

impl RecordingService {
    /// Creates a service with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `start` was called.
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    /// Number of times `stop` was called.
    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    /// Aliases seen on each start, in call order.
    pub fn seen_aliases(&self) -> Vec<Vec<String>> {
        self.seen_aliases.lock().clone()
    }
}

impl Service for RecordingService {
    fn start(&self, configuration: &DefaultConfiguration) -> CoreResult<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        let mut aliases: Vec<String> = configuration.cache_configurations().keys().cloned().collect();
        aliases.sort();
        self.seen_aliases.lock().push(aliases);
        Ok(())
    }

    fn stop(&self) -> CoreResult<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl fmt::Debug for RecordingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingService")
            .field("starts", &self.starts())
            .field("stops", &self.stops())
            .finish()
    }
}

/// A service whose start always fails with the given message.
#[derive(Debug)]
pub struct FailingService {
    message: String,
    attempts: AtomicUsize,
}

impl FailingService {
    /// Creates a service failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Number of start attempts.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Service for FailingService {
    fn start(&self, _configuration: &DefaultConfiguration) -> CoreResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(CoreError::Other(self.message.clone()))
    }

    fn stop(&self) -> CoreResult<()> {
        Ok(())
    }
}
