//! Sensiscan Detection Engine
//!
//! This crate finds sensitive data in free-form text:
//! - Structured patterns (ID numbers, phones, cards, ...) with checksum post-validation
//! - Keyword search over a hot-swappable Aho-Corasick automaton
//! - Orchestration that merges both into one `DetectionResult`
//! - Static handling suggestions and masking helpers

pub mod automaton;
pub mod checksum;
pub mod classifier;
pub mod engine;
pub mod masking;
pub mod patterns;
pub mod suggestion;

pub use automaton::{AutomatonSnapshot, KeywordAutomaton, KeywordMatch};
pub use classifier::{DEFAULT_KEYWORDS, KeywordClassifier};
pub use engine::{DetectionEngine, EngineConfig, REALTIME_CATEGORIES};
pub use masking::{mask, mask_text};
pub use patterns::{Checksum, PatternRegistry, StructuredPattern};
pub use suggestion::StaticSuggestions;
