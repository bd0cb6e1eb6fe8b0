//! Rule model

use chrono::{DateTime, Utc};
use sensiscan_core::{RiskLevel, SensitiveCategory};
use serde::{Deserialize, Serialize};

/// How a rule's content is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleType {
    /// Content is a regular expression
    Regex,
    /// Content is a literal keyword
    Keyword,
    /// Content combines other rules; stored but not evaluated
    Composite,
}

impl RuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::Regex => "REGEX",
            RuleType::Keyword => "KEYWORD",
            RuleType::Composite => "COMPOSITE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleStatus {
    #[default]
    Enabled,
    Disabled,
}

/// A stored rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub rule_type: RuleType,
    pub content: String,
    pub category: SensitiveCategory,
    pub risk_level: RiskLevel,
    pub status: RuleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Starts at 1, bumped by every content update
    pub version: u64,
}

impl Rule {
    pub fn is_enabled(&self) -> bool {
        self.status == RuleStatus::Enabled
    }

    /// Enabled keyword rule
    pub fn is_active_keyword(&self) -> bool {
        self.is_enabled() && self.rule_type == RuleType::Keyword
    }
}

/// Caller-supplied fields for creating or updating a rule
///
/// Timestamps and version are always owned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDraft {
    /// Explicit id; generated on create when absent
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub rule_type: RuleType,
    pub content: String,
    pub category: SensitiveCategory,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub status: RuleStatus,
}

impl RuleDraft {
    /// Enabled keyword draft named after its content
    pub fn keyword(
        content: impl Into<String>,
        category: SensitiveCategory,
        risk_level: RiskLevel,
    ) -> Self {
        let content = content.into();
        Self {
            id: None,
            name: content.clone(),
            rule_type: RuleType::Keyword,
            content,
            category,
            risk_level,
            status: RuleStatus::Enabled,
        }
    }

    /// Enabled regex draft
    pub fn regex(
        name: impl Into<String>,
        pattern: impl Into<String>,
        category: SensitiveCategory,
        risk_level: RiskLevel,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            rule_type: RuleType::Regex,
            content: pattern.into(),
            category,
            risk_level,
            status: RuleStatus::Enabled,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_status(mut self, status: RuleStatus) -> Self {
        self.status = status;
        self
    }
}
