//! Rule store mutations flowing into a live engine

use sensiscan_core::{Error, KeywordSource, RiskLevel, SensitiveCategory};
use sensiscan_detect::{DetectionEngine, EngineConfig};
use sensiscan_integration_tests::{contents, engine_with};
use sensiscan_rules::{InMemoryRuleStore, RuleDraft, RuleStatus, RuleStore};
use std::sync::Arc;

fn wired() -> (Arc<DetectionEngine>, InMemoryRuleStore) {
    let engine = Arc::new(engine_with(&[]));
    let store = InMemoryRuleStore::with_defaults().with_sink(engine.clone());
    (engine, store)
}

#[test]
fn test_refresh_loads_seeded_rules() {
    let (engine, store) = wired();
    assert_eq!(engine.keyword_count(), 0);

    assert_eq!(store.refresh(), 12);
    assert_eq!(engine.keyword_count(), 12);
    assert_eq!(engine.detect("台独").total_detected(), 1);
}

#[test]
fn test_disable_and_enable_follow_through() {
    let (engine, store) = wired();
    store.refresh();

    store.disable("POLITICAL_KEYWORD_001").unwrap();
    assert_eq!(engine.keyword_count(), 11);
    assert_eq!(engine.detect("台独").total_detected(), 0);

    store.enable("POLITICAL_KEYWORD_001").unwrap();
    assert_eq!(engine.detect("台独").total_detected(), 1);
}

#[test]
fn test_create_update_delete_follow_through() {
    let (engine, store) = wired();

    let rule = store
        .create(RuleDraft::keyword(
            "杀人犯",
            SensitiveCategory::Violence,
            RiskLevel::High,
        ))
        .unwrap();
    assert_eq!(engine.keyword_count(), 13);

    let result = engine.detect("他是杀人犯");
    assert!(contents(&result).contains("杀人犯"));
    assert!(
        result
            .items_of(SensitiveCategory::Violence)
            .any(|i| i.content == "杀人犯")
    );

    store
        .update(
            &rule.id,
            RuleDraft::keyword("盗版软件", SensitiveCategory::Copyright, RiskLevel::Medium),
        )
        .unwrap();
    assert!(!contents(&engine.detect("他是杀人犯")).contains("杀人犯"));
    assert!(contents(&engine.detect("出售盗版软件")).contains("盗版软件"));

    store.delete(&rule.id).unwrap();
    assert_eq!(engine.keyword_count(), 12);
    assert!(matches!(store.delete(&rule.id), Err(Error::RuleNotFound(_))));
}

#[test]
fn test_regex_rules_do_not_reach_the_automaton() {
    let (engine, store) = wired();
    store.refresh();

    store
        .create(RuleDraft::regex(
            "工号",
            r"EMP\d{6}",
            SensitiveCategory::InternalCode,
            RiskLevel::Medium,
        ))
        .unwrap();

    assert_eq!(engine.keyword_count(), 12);
    assert_eq!(store.enabled_regex_patterns(), vec![r"EMP\d{6}".to_string()]);
}

#[test]
fn test_batch_upsert_pushes_once_with_engine_cap() {
    let config = EngineConfig {
        keywords: Vec::new(),
        max_rules: 13,
    };
    let engine = Arc::new(DetectionEngine::new(config).unwrap());
    let store = InMemoryRuleStore::with_defaults().with_sink(engine.clone());

    let drafts = vec![
        RuleDraft::keyword("赌博", SensitiveCategory::Political, RiskLevel::High),
        RuleDraft::keyword("毒品", SensitiveCategory::Political, RiskLevel::High)
            .with_status(RuleStatus::Enabled),
    ];
    store.batch_upsert(drafts).unwrap();

    assert_eq!(store.enabled_keywords().len(), 14);
    // Prefix truncation to the engine's cap drops the last keyword
    assert_eq!(engine.keyword_count(), 13);
    assert_eq!(engine.detect("赌博").total_detected(), 1);
    assert_eq!(engine.detect("毒品").total_detected(), 0);
}

#[test]
fn test_engine_refresh_from_store() {
    let engine = engine_with(&[]);
    let store = InMemoryRuleStore::with_defaults();

    assert_eq!(engine.refresh_from(&store), 12);
    assert_eq!(engine.detect("破解版游戏").total_detected(), 1);
}
