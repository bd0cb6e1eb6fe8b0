//! Collaborator traits
//!
//! The detection engine talks to the surrounding system only through these
//! seams:
//! - [`SuggestionLookup`]: category → advisory text
//! - [`KeywordSource`] / [`KeywordSink`]: rule store → engine keyword refresh
//! - [`DetectionRecorder`]: per-scan metrics sinks

use crate::category::SensitiveCategory;
use crate::result::DetectedItem;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Maps a category to a fixed piece of handling advice
pub trait SuggestionLookup: Send + Sync {
    /// Advice for the category; implementations fall back to a default
    /// string for categories they do not map explicitly.
    fn suggestion_for(&self, category: SensitiveCategory) -> &str;
}

/// Anything that owns the list of enabled keywords
pub trait KeywordSource: Send + Sync {
    /// Enabled keyword contents, in the source's own order
    fn enabled_keywords(&self) -> Vec<String>;
}

/// Anything that accepts a refreshed keyword list
pub trait KeywordSink: Send + Sync {
    /// Replace the active keyword set
    fn replace_keywords(&self, keywords: Vec<String>);
}

/// Which detection path produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// Every structured pattern plus the keyword scan
    Full,
    /// High-risk structured patterns only
    Realtime,
}

impl ScanMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanMode::Full => "full",
            ScanMode::Realtime => "realtime",
        }
    }
}

/// Receives one event per completed scan
///
/// Implementations must be cheap and must not block: they run inline on the
/// detection path.
pub trait DetectionRecorder: Send + Sync {
    /// Record a finished scan
    fn record_detection(
        &self,
        mode: ScanMode,
        elapsed: Duration,
        items: &[DetectedItem],
        success: bool,
    );

    /// Record a keyword automaton swap
    fn record_keyword_reload(&self, _pattern_count: usize) {}
}
