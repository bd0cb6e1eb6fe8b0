//! Sensiscan Core Types and Traits
//!
//! This crate provides the fundamental types and traits used throughout Sensiscan:
//! - Sensitive data categories and risk levels
//! - Detected items and detection results
//! - Collaborator traits (suggestion lookup, keyword source/sink, recorders)
//! - Core error types

pub mod category;
pub mod error;
pub mod result;
pub mod traits;

pub use category::{RiskLevel, SensitiveCategory};
pub use error::{Error, Result};
pub use result::{DetectedItem, DetectionResult};
pub use traits::{DetectionRecorder, KeywordSink, KeywordSource, ScanMode, SuggestionLookup};
