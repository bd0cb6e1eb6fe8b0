//! Detection output types

use crate::category::SensitiveCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One sensitive-data occurrence found in a text
///
/// `start`/`end` are UTF-8 byte offsets into the scanned text, so
/// `&text[start..end] == content` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedItem {
    /// The matched payload
    pub content: String,

    /// Category of the match
    pub category: SensitiveCategory,

    /// Start byte offset (inclusive)
    pub start: usize,

    /// End byte offset (exclusive)
    pub end: usize,

    /// Handling advice for this category
    pub suggestion: String,
}

impl DetectedItem {
    /// Create an item without a suggestion attached yet
    pub fn new(
        content: impl Into<String>,
        category: SensitiveCategory,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            content: content.into(),
            category,
            start,
            end,
            suggestion: String::new(),
        }
    }

    /// Return a copy carrying the given suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = suggestion.into();
        self
    }

    /// Byte length of the match
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for a zero-width item (never produced by the engine)
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Outcome of scanning one text
///
/// Items are kept in discovery order: structured matches first, by category
/// declaration order, then keyword matches in scan order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    original_text: String,
    items: Vec<DetectedItem>,
    total_detected: usize,
    processing_time_ms: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DetectionResult {
    /// Build a result stamped with the current time
    pub fn new(
        original_text: impl Into<String>,
        items: Vec<DetectedItem>,
        processing_time_ms: u64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            original_text: original_text.into(),
            total_detected: items.len(),
            items,
            processing_time_ms,
            created_at: now,
            updated_at: now,
        }
    }

    /// A result with no items and zero processing time
    pub fn empty(original_text: impl Into<String>) -> Self {
        Self::new(original_text, Vec::new(), 0)
    }

    /// Return a new result carrying a store-assigned id
    pub fn with_id(self, id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            updated_at: Utc::now(),
            ..self
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn items(&self) -> &[DetectedItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<DetectedItem> {
        self.items
    }

    pub fn total_detected(&self) -> usize {
        self.total_detected
    }

    pub fn processing_time_ms(&self) -> u64 {
        self.processing_time_ms
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether anything was found
    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }

    /// Items of one category, in discovery order
    pub fn items_of(&self, category: SensitiveCategory) -> impl Iterator<Item = &DetectedItem> {
        self.items.iter().filter(move |item| item.category == category)
    }
}
