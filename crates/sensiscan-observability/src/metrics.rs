//! Metrics collection with Prometheus
//!
//! This module provides Prometheus metrics for Sensiscan:
//! - Detection counts (by scan mode and outcome)
//! - Detection latency histograms
//! - Detected item counts by category
//! - Keyword automaton reloads and current pattern count

use prometheus::{
    CounterVec, Gauge, HistogramOpts, HistogramVec, IntCounter, Opts, Registry, TextEncoder,
};
use sensiscan_core::{DetectedItem, DetectionRecorder, ScanMode};
use std::sync::Arc;
use std::time::Duration;

/// Metrics collector for Sensiscan
#[derive(Clone)]
pub struct Metrics {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Completed detections
    pub detections_total: CounterVec,
    /// Detection wall-clock duration
    pub detection_duration_seconds: HistogramVec,
    /// Items reported, by category
    pub detected_items_total: CounterVec,
    /// Keyword automaton swaps
    pub keyword_reloads_total: IntCounter,
    /// Keyword patterns in the serving automaton
    pub keyword_patterns: Gauge,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let detections_total = CounterVec::new(
            Opts::new("sensiscan_detections_total", "Total number of detections"),
            &["mode", "outcome"],
        )?;

        let detection_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "sensiscan_detection_duration_seconds",
                "Detection duration in seconds",
            )
            .buckets(vec![
                0.00005, 0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.5,
            ]),
            &["mode"],
        )?;

        let detected_items_total = CounterVec::new(
            Opts::new(
                "sensiscan_detected_items_total",
                "Total number of detected items",
            ),
            &["category"],
        )?;

        let keyword_reloads_total = IntCounter::with_opts(Opts::new(
            "sensiscan_keyword_reloads_total",
            "Number of keyword automaton rebuilds",
        ))?;

        let keyword_patterns = Gauge::with_opts(Opts::new(
            "sensiscan_keyword_patterns",
            "Keyword patterns in the active automaton",
        ))?;

        registry.register(Box::new(detections_total.clone()))?;
        registry.register(Box::new(detection_duration_seconds.clone()))?;
        registry.register(Box::new(detected_items_total.clone()))?;
        registry.register(Box::new(keyword_reloads_total.clone()))?;
        registry.register(Box::new(keyword_patterns.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            detections_total,
            detection_duration_seconds,
            detected_items_total,
            keyword_reloads_total,
            keyword_patterns,
        })
    }

    /// Get the Prometheus registry for exporting metrics
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render every registered metric in the text exposition format
    pub fn gather_text(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }

    /// Record a completed detection
    pub fn record_detection_outcome(
        &self,
        mode: ScanMode,
        duration_secs: f64,
        items: &[DetectedItem],
        success: bool,
    ) {
        let outcome = if success { "success" } else { "failure" };
        self.detections_total
            .with_label_values(&[mode.as_str(), outcome])
            .inc();
        self.detection_duration_seconds
            .with_label_values(&[mode.as_str()])
            .observe(duration_secs);

        for item in items {
            self.detected_items_total
                .with_label_values(&[item.category.as_str()])
                .inc();
        }
    }

    /// Record a keyword automaton swap
    pub fn record_reload(&self, pattern_count: usize) {
        self.keyword_reloads_total.inc();
        self.keyword_patterns.set(pattern_count as f64);
    }
}

impl DetectionRecorder for Metrics {
    fn record_detection(
        &self,
        mode: ScanMode,
        elapsed: Duration,
        items: &[DetectedItem],
        success: bool,
    ) {
        self.record_detection_outcome(mode, elapsed.as_secs_f64(), items, success);
    }

    fn record_keyword_reload(&self, pattern_count: usize) {
        self.record_reload(pattern_count);
    }
}
