use serde::Serialize;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// One finished stopwatch measurement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timing {
    pub label: String,
    pub seconds: f64,
}

/// Collected stopwatch measurements, shareable across threads.
#[derive(Debug, Default)]
pub struct Timings {
    entries: Mutex<Vec<Timing>>,
}

impl Timings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, label: impl Into<String>) -> Stopwatch<'_> {
        Stopwatch::start_into(label, self)
    }

    // A panic elsewhere while holding the lock must not cost a measurement
    fn push(&self, timing: Timing) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(timing);
    }

    pub fn entries(&self) -> Vec<Timing> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Times a scope and reports when dropped, so early returns and `?` exits
/// are measured the same as a normal finish.
#[derive(Debug)]
pub struct Stopwatch<'a> {
    label: String,
    start: Instant,
    sink: Option<&'a Timings>,
}

impl Stopwatch<'static> {
    /// Stopwatch that only logs.
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            start: Instant::now(),
            sink: None,
        }
    }
}

impl<'a> Stopwatch<'a> {
    /// Stopwatch that logs and also records into `sink`.
    pub fn start_into(label: impl Into<String>, sink: &'a Timings) -> Self {
        Self {
            label: label.into(),
            start: Instant::now(),
            sink: Some(sink),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Stopwatch<'_> {
    fn drop(&mut self) {
        let seconds = self.start.elapsed().as_secs_f64();
        tracing::debug!(label = %self.label, seconds, "finished");
        if let Some(sink) = self.sink {
            sink.push(Timing {
                label: std::mem::take(&mut self.label),
                seconds,
            });
        }
    }
}
