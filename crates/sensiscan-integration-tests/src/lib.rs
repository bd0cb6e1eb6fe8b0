//! Cross-crate integration tests for Sensiscan
//!
//! These tests wire the detection engine to the rule store, the config file
//! and the metrics registry to verify the full flow.

use sensiscan_core::DetectionResult;
use sensiscan_detect::{DetectionEngine, EngineConfig};
use std::collections::BTreeSet;

/// Engine serving exactly `keywords`
pub fn engine_with(keywords: &[&str]) -> DetectionEngine {
    let config = EngineConfig {
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        ..EngineConfig::default()
    };
    DetectionEngine::new(config).unwrap()
}

/// Distinct matched contents of a result
pub fn contents(result: &DetectionResult) -> BTreeSet<String> {
    result.items().iter().map(|i| i.content.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_with_serves_only_given_keywords() {
        let engine = engine_with(&["盗版"]);
        assert_eq!(engine.keyword_count(), 1);

        let result = engine.detect("盗版和暴力");
        assert_eq!(contents(&result), BTreeSet::from(["盗版".to_string()]));
    }
}
