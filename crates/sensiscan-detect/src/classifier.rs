//! Keyword → category classification
//!
//! Rules are evaluated in order and the first rule whose term list contains
//! a substring of the keyword wins.

use sensiscan_core::SensitiveCategory;

/// Category reported for a keyword no rule recognizes
pub const FALLBACK_CATEGORY: SensitiveCategory = SensitiveCategory::Political;

const RULES: [(SensitiveCategory, &[&str]); 4] = [
    (SensitiveCategory::Political, &["台独", "法轮功", "颠覆政府"]),
    (SensitiveCategory::Pornography, &["色情", "黄色", "成人"]),
    (SensitiveCategory::Violence, &["暴力", "杀人", "血腥"]),
    (SensitiveCategory::Copyright, &["盗版", "侵权", "破解版"]),
];

/// Keywords loaded into a fresh engine
pub const DEFAULT_KEYWORDS: [&str; 12] = [
    "台独", "法轮功", "颠覆政府", "色情", "黄色", "成人", "暴力", "杀人", "血腥", "盗版", "侵权",
    "破解版",
];

/// Ordered substring rules mapping a keyword to a content category
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    rules: Vec<(SensitiveCategory, Vec<String>)>,
    fallback: SensitiveCategory,
}

impl KeywordClassifier {
    pub fn new() -> Self {
        Self {
            rules: RULES
                .iter()
                .map(|(category, terms)| {
                    (*category, terms.iter().map(|t| t.to_string()).collect())
                })
                .collect(),
            fallback: FALLBACK_CATEGORY,
        }
    }

    /// Add a rule evaluated after the built-in ones
    pub fn with_rule<I, S>(mut self, category: SensitiveCategory, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules
            .push((category, terms.into_iter().map(Into::into).collect()));
        self
    }

    /// Category for a matched keyword
    ///
    /// Keywords that no rule recognizes fall back to [`FALLBACK_CATEGORY`].
    pub fn classify(&self, keyword: &str) -> SensitiveCategory {
        self.rules
            .iter()
            .find(|(_, terms)| terms.iter().any(|term| keyword.contains(term.as_str())))
            .map(|(category, _)| *category)
            .unwrap_or(self.fallback)
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}
