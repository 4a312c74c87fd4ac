use serde::Serialize;
use std::sync::Mutex;

/// Counters accumulated across the conditioning stage.
#[derive(Debug)]
pub struct MetricsRecorder {
    inner: Mutex<Counters>,
}

#[derive(Default, Debug)]
struct Counters {
    satellites: usize,
    slips: usize,
    queries: usize,
    refusals: usize,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub satellites: usize,
    pub slips: usize,
    pub queries: usize,
    pub refusals: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Counters::default()),
        }
    }

    pub fn record_satellite(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.satellites += 1;
        }
    }

    pub fn record_slip(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.slips += 1;
        }
    }

    pub fn record_query(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.queries += 1;
        }
    }

    pub fn record_refusal(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.refusals += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(counters) = self.inner.lock() {
            MetricsSnapshot {
                satellites: counters.satellites,
                slips: counters.slips,
                queries: counters.queries,
                refusals: counters.refusals,
            }
        } else {
            MetricsSnapshot {
                satellites: 0,
                slips: 0,
                queries: 0,
                refusals: 0,
            }
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
