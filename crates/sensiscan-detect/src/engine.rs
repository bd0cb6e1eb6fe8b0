//! Detection orchestration
//!
//! A scan runs every enabled structured pattern (checksum-filtered) and then,
//! in full mode, the keyword automaton. Results carry per-category advice and
//! every scan is reported to the engine's recorders.

use crate::automaton::KeywordAutomaton;
use crate::classifier::{DEFAULT_KEYWORDS, KeywordClassifier};
use crate::patterns::PatternRegistry;
use crate::suggestion::StaticSuggestions;
use sensiscan_core::{
    DetectedItem, DetectionRecorder, DetectionResult, KeywordSink, KeywordSource, Result,
    ScanMode, SensitiveCategory, SuggestionLookup,
};
use sensiscan_observability::DetectionStats;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Default cap on the number of keywords loaded into the automaton
pub const DEFAULT_MAX_RULES: usize = 10_000;

/// Categories scanned by [`DetectionEngine::detect_realtime`]
pub const REALTIME_CATEGORIES: [SensitiveCategory; 4] = [
    SensitiveCategory::IdCard,
    SensitiveCategory::BankCard,
    SensitiveCategory::CreditCard,
    SensitiveCategory::Password,
];

/// Engine construction settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Initial keyword set
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    /// Keywords beyond this many are dropped on every reload
    #[serde(default = "default_max_rules")]
    pub max_rules: usize,
}

fn default_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

fn default_max_rules() -> usize {
    DEFAULT_MAX_RULES
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            max_rules: default_max_rules(),
        }
    }
}

/// Sensitive-data detection engine
///
/// Safe to share across threads: scans take `&self` and never block on
/// keyword reloads.
pub struct DetectionEngine {
    registry: PatternRegistry,
    automaton: KeywordAutomaton,
    classifier: KeywordClassifier,
    suggestions: Arc<dyn SuggestionLookup>,
    stats: Arc<DetectionStats>,
    recorders: Vec<Arc<dyn DetectionRecorder>>,
    max_rules: usize,
}

impl DetectionEngine {
    /// Compile the pattern registry and load the configured keywords
    pub fn new(config: EngineConfig) -> Result<Self> {
        let registry = PatternRegistry::new()?;
        let keywords = truncate_keywords(config.keywords, config.max_rules);
        let automaton = KeywordAutomaton::new(&keywords);

        info!(
            patterns = registry.supported_categories().len(),
            keywords = automaton.pattern_count(),
            max_rules = config.max_rules,
            "Detection engine initialized"
        );

        Ok(Self {
            registry,
            automaton,
            classifier: KeywordClassifier::new(),
            suggestions: Arc::new(StaticSuggestions::new()),
            stats: Arc::new(DetectionStats::new()),
            recorders: Vec::new(),
            max_rules: config.max_rules,
        })
    }

    /// Use a different advice source
    pub fn with_suggestions(mut self, suggestions: Arc<dyn SuggestionLookup>) -> Self {
        self.suggestions = suggestions;
        self
    }

    /// Use a different keyword classifier
    pub fn with_classifier(mut self, classifier: KeywordClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Report every scan and reload to an additional recorder
    pub fn with_recorder(mut self, recorder: Arc<dyn DetectionRecorder>) -> Self {
        self.recorders.push(recorder);
        self
    }

    /// Full scan: every structured pattern, then every keyword
    pub fn detect(&self, text: &str) -> DetectionResult {
        self.scan(ScanMode::Full, text)
    }

    /// Latency-sensitive scan over the high-risk structured patterns only
    ///
    /// Checksums still apply; keywords are not searched.
    pub fn detect_realtime(&self, text: &str) -> DetectionResult {
        self.scan(ScanMode::Realtime, text)
    }

    /// Full scan of each input, results in input order
    pub fn detect_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<DetectionResult> {
        texts.iter().map(|text| self.detect(text.as_ref())).collect()
    }

    /// Replace the keyword set, keeping at most `max_rules` keywords
    ///
    /// The automaton is rebuilt off to the side and swapped in atomically.
    /// Returns the number of distinct keywords now being served.
    pub fn update_keywords(&self, keywords: Vec<String>, max_rules: usize) -> usize {
        let keywords = truncate_keywords(keywords, max_rules);
        let count = self.automaton.update_patterns(&keywords);

        self.stats.record_keyword_reload(count);
        for recorder in &self.recorders {
            recorder.record_keyword_reload(count);
        }

        info!(
            keywords = count,
            version = self.automaton.version(),
            "Keyword set updated"
        );
        count
    }

    /// Pull the enabled keywords from `source` and load them
    pub fn refresh_from(&self, source: &dyn KeywordSource) -> usize {
        self.update_keywords(source.enabled_keywords(), self.max_rules)
    }

    /// Distinct keywords in the serving automaton
    pub fn keyword_count(&self) -> usize {
        self.automaton.pattern_count()
    }

    /// Keyword cap applied by [`KeywordSink::replace_keywords`]
    pub fn max_rules(&self) -> usize {
        self.max_rules
    }

    /// Running statistics over every scan made by this engine
    pub fn stats(&self) -> &DetectionStats {
        &self.stats
    }

    /// Shared handle on the statistics, for exporting elsewhere
    pub fn stats_handle(&self) -> Arc<DetectionStats> {
        Arc::clone(&self.stats)
    }

    /// The compiled structured patterns
    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    fn scan(&self, mode: ScanMode, text: &str) -> DetectionResult {
        if text.trim().is_empty() {
            self.record(mode, Duration::ZERO, &[]);
            return DetectionResult::empty(text);
        }

        let started = Instant::now();

        let mut items = match mode {
            ScanMode::Full => self.scan_structured(text, &SensitiveCategory::ALL),
            ScanMode::Realtime => self.scan_structured(text, &REALTIME_CATEGORIES),
        };
        if mode == ScanMode::Full {
            items.extend(self.scan_keywords(text));
        }
        for item in &mut items {
            item.suggestion = self.suggestions.suggestion_for(item.category).to_string();
        }

        let elapsed = started.elapsed();
        self.record(mode, elapsed, &items);

        debug!(
            mode = mode.as_str(),
            text_len = text.len(),
            items = items.len(),
            elapsed_us = elapsed.as_micros() as u64,
            "Scan completed"
        );

        DetectionResult::new(text, items, elapsed.as_millis() as u64)
    }

    /// Structured matches in category order
    ///
    /// A pattern that yields to another category drops every match
    /// overlapping one of that category's matches.
    fn scan_structured(&self, text: &str, categories: &[SensitiveCategory]) -> Vec<DetectedItem> {
        let per_category: Vec<(SensitiveCategory, Vec<DetectedItem>)> = categories
            .iter()
            .filter_map(|category| self.registry.get_pattern(*category))
            .map(|pattern| (pattern.category(), pattern.extract(text)))
            .collect();

        let mut items = Vec::new();
        for (category, found) in &per_category {
            let preferred = self
                .registry
                .get_pattern(*category)
                .and_then(|pattern| pattern.yields_to())
                .and_then(|other| per_category.iter().find(|(c, _)| *c == other))
                .map(|(_, preferred)| preferred.as_slice())
                .unwrap_or_default();

            items.extend(
                found
                    .iter()
                    .filter(|item| !preferred.iter().any(|p| overlaps(item, p)))
                    .cloned(),
            );
        }
        items
    }

    fn scan_keywords(&self, text: &str) -> Vec<DetectedItem> {
        let snapshot = self.automaton.snapshot();
        snapshot
            .find_iter(text)
            .map(|m| {
                let category = self.classifier.classify(&m.pattern);
                DetectedItem::new(&*m.pattern, category, m.start, m.end)
            })
            .collect()
    }

    fn record(&self, mode: ScanMode, elapsed: Duration, items: &[DetectedItem]) {
        self.stats.record_detection(mode, elapsed, items, true);
        for recorder in &self.recorders {
            recorder.record_detection(mode, elapsed, items, true);
        }
    }
}

impl KeywordSink for DetectionEngine {
    fn replace_keywords(&self, keywords: Vec<String>) {
        self.update_keywords(keywords, self.max_rules);
    }
}

impl std::fmt::Debug for DetectionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectionEngine")
            .field("automaton", &self.automaton)
            .field("max_rules", &self.max_rules)
            .field("recorders", &self.recorders.len())
            .finish()
    }
}

fn overlaps(a: &DetectedItem, b: &DetectedItem) -> bool {
    a.start < b.end && b.start < a.end
}

fn truncate_keywords(mut keywords: Vec<String>, max_rules: usize) -> Vec<String> {
    if keywords.len() > max_rules {
        warn!(
            requested = keywords.len(),
            max_rules, "Keyword list exceeds max_rules, truncating"
        );
        keywords.truncate(max_rules);
    }
    keywords
}

#[cfg(test)]
mod tests;
