//! Lock-free running statistics for detection calls
//!
//! Every counter is an atomic add; min/max use `fetch_min`/`fetch_max`, so
//! recording never takes a lock and never blocks a scan.

use sensiscan_core::{DetectedItem, DetectionRecorder, ScanMode};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Running totals over every recorded scan
#[derive(Debug)]
pub struct DetectionStats {
    total_requests: AtomicU64,
    successful_requests: AtomicU64,
    failed_requests: AtomicU64,
    total_processing_ms: AtomicU64,
    max_processing_ms: AtomicU64,
    min_processing_ms: AtomicU64,
    total_detected_items: AtomicU64,
}

/// Point-in-time copy of [`DetectionStats`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub total_processing_ms: u64,
    pub avg_processing_ms: f64,
    pub max_processing_ms: u64,
    pub min_processing_ms: u64,
    pub total_detected_items: u64,
    pub avg_items_per_request: f64,
}

impl DetectionStats {
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            successful_requests: AtomicU64::new(0),
            failed_requests: AtomicU64::new(0),
            total_processing_ms: AtomicU64::new(0),
            max_processing_ms: AtomicU64::new(0),
            min_processing_ms: AtomicU64::new(u64::MAX),
            total_detected_items: AtomicU64::new(0),
        }
    }

    /// Record one request
    pub fn record(&self, processing_ms: u64, item_count: usize, success: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }

        self.total_processing_ms
            .fetch_add(processing_ms, Ordering::Relaxed);
        self.max_processing_ms
            .fetch_max(processing_ms, Ordering::Relaxed);
        self.min_processing_ms
            .fetch_min(processing_ms, Ordering::Relaxed);

        self.total_detected_items
            .fetch_add(item_count as u64, Ordering::Relaxed);
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    pub fn successful_requests(&self) -> u64 {
        self.successful_requests.load(Ordering::Relaxed)
    }

    pub fn failed_requests(&self) -> u64 {
        self.failed_requests.load(Ordering::Relaxed)
    }

    pub fn total_detected_items(&self) -> u64 {
        self.total_detected_items.load(Ordering::Relaxed)
    }

    pub fn max_processing_ms(&self) -> u64 {
        self.max_processing_ms.load(Ordering::Relaxed)
    }

    /// Smallest recorded latency, 0 before the first sample
    pub fn min_processing_ms(&self) -> u64 {
        match self.min_processing_ms.load(Ordering::Relaxed) {
            u64::MAX => 0,
            min => min,
        }
    }

    pub fn average_processing_ms(&self) -> f64 {
        let requests = self.total_requests();
        if requests == 0 {
            return 0.0;
        }
        self.total_processing_ms.load(Ordering::Relaxed) as f64 / requests as f64
    }

    pub fn average_items_per_request(&self) -> f64 {
        let requests = self.total_requests();
        if requests == 0 {
            return 0.0;
        }
        self.total_detected_items() as f64 / requests as f64
    }

    /// Copy every counter
    ///
    /// Counters are read one by one, so a snapshot taken under load may mix
    /// values from neighbouring requests.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_requests: self.total_requests(),
            successful_requests: self.successful_requests(),
            failed_requests: self.failed_requests(),
            total_processing_ms: self.total_processing_ms.load(Ordering::Relaxed),
            avg_processing_ms: self.average_processing_ms(),
            max_processing_ms: self.max_processing_ms(),
            min_processing_ms: self.min_processing_ms(),
            total_detected_items: self.total_detected_items(),
            avg_items_per_request: self.average_items_per_request(),
        }
    }

    /// Zero every counter
    pub fn reset(&self) {
        self.total_requests.store(0, Ordering::Relaxed);
        self.successful_requests.store(0, Ordering::Relaxed);
        self.failed_requests.store(0, Ordering::Relaxed);
        self.total_processing_ms.store(0, Ordering::Relaxed);
        self.max_processing_ms.store(0, Ordering::Relaxed);
        self.min_processing_ms.store(u64::MAX, Ordering::Relaxed);
        self.total_detected_items.store(0, Ordering::Relaxed);
    }
}

impl Default for DetectionStats {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionRecorder for DetectionStats {
    fn record_detection(
        &self,
        _mode: ScanMode,
        elapsed: Duration,
        items: &[DetectedItem],
        success: bool,
    ) {
        self.record(elapsed.as_millis() as u64, items.len(), success);
    }
}
