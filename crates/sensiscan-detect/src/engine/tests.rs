//! Tests for the detection engine

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

fn engine() -> DetectionEngine {
    DetectionEngine::new(EngineConfig::default()).unwrap()
}

fn contents(result: &DetectionResult, category: SensitiveCategory) -> Vec<String> {
    result
        .items_of(category)
        .map(|item| item.content.clone())
        .collect()
}

#[derive(Default)]
struct CountingRecorder {
    scans: AtomicUsize,
    items: AtomicUsize,
    reloads: AtomicUsize,
}

impl DetectionRecorder for CountingRecorder {
    fn record_detection(
        &self,
        _mode: ScanMode,
        _elapsed: Duration,
        items: &[DetectedItem],
        _success: bool,
    ) {
        self.scans.fetch_add(1, Ordering::SeqCst);
        self.items.fetch_add(items.len(), Ordering::SeqCst);
    }

    fn record_keyword_reload(&self, _pattern_count: usize) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }
}

struct FixedSource(Vec<String>);

impl KeywordSource for FixedSource {
    fn enabled_keywords(&self) -> Vec<String> {
        self.0.clone()
    }
}

struct Shouting;

impl SuggestionLookup for Shouting {
    fn suggestion_for(&self, _category: SensitiveCategory) -> &str {
        "REMOVE IT"
    }
}

#[test]
fn test_keywords_with_byte_offsets() {
    let text = "台独和色情内容";
    let result = engine().detect(text);

    assert_eq!(result.total_detected(), 2);
    let items = result.items();
    assert_eq!(items[0].content, "台独");
    assert_eq!(items[0].category, SensitiveCategory::Political);
    assert_eq!((items[0].start, items[0].end), (0, 6));
    assert_eq!(items[1].content, "色情");
    assert_eq!(items[1].category, SensitiveCategory::Pornography);
    assert_eq!((items[1].start, items[1].end), (9, 15));
}

#[test]
fn test_valid_national_id() {
    let text = "身份证号110101199001011237";
    let result = engine().detect(text);

    let ids: Vec<&DetectedItem> = result.items_of(SensitiveCategory::IdCard).collect();
    assert_eq!(ids.len(), 1);
    assert_eq!(ids[0].content, "110101199001011237");
    assert_eq!((ids[0].start, ids[0].end), (12, 30));
    assert!(
        result
            .items()
            .iter()
            .all(|item| item.content != "11010119900101123")
    );
}

#[test]
fn test_national_id_bad_checksum_is_dropped() {
    let result = engine().detect("身份证号110101199001011234");
    assert_eq!(result.items_of(SensitiveCategory::IdCard).count(), 0);
}

#[test]
fn test_phone_number() {
    let result = engine().detect("手机号13812345678");

    assert_eq!(
        contents(&result, SensitiveCategory::PhoneNumber),
        vec!["13812345678"]
    );
    assert_eq!(result.total_detected(), 1);
}

#[test]
fn test_luhn_invalid_card_is_dropped() {
    let result = engine().detect("6222021234567890124");

    assert_eq!(result.items_of(SensitiveCategory::BankCard).count(), 0);
    assert_eq!(result.items_of(SensitiveCategory::CreditCard).count(), 0);
}

#[test]
fn test_sixteen_digit_card_reported_once_as_credit_card() {
    let result = engine().detect("4111111111111111");

    assert_eq!(
        contents(&result, SensitiveCategory::CreditCard),
        vec!["4111111111111111"]
    );
    assert_eq!(result.items_of(SensitiveCategory::BankCard).count(), 0);
}

#[test]
fn test_grouped_credit_card_suppresses_bank_card() {
    let result = engine().detect("卡号 4111 1111 1111 1111 请核对");

    assert_eq!(
        contents(&result, SensitiveCategory::CreditCard),
        vec!["4111 1111 1111 1111"]
    );
    assert_eq!(result.items_of(SensitiveCategory::BankCard).count(), 0);
}

#[test]
fn test_nineteen_digit_card_is_bank_card() {
    let result = engine().detect("卡号6222021234567890128");

    assert_eq!(
        contents(&result, SensitiveCategory::BankCard),
        vec!["6222021234567890128"]
    );
    assert_eq!(result.items_of(SensitiveCategory::CreditCard).count(), 0);
}

#[test]
fn test_blank_and_clean_input() {
    let engine = engine();

    for text in ["", "   ", "\n\t", "今天天气很好，我们去公园散步。"] {
        let result = engine.detect(text);
        assert_eq!(result.total_detected(), 0, "{text:?}");
        assert_eq!(result.original_text(), text);
    }

    let blank = engine.detect("   ");
    assert_eq!(blank.processing_time_ms(), 0);
    assert_eq!(engine.stats().total_requests(), 5);
}

#[test]
fn test_structured_items_come_before_keywords() {
    let result = engine().detect("台独 13812345678");

    assert_eq!(result.total_detected(), 2);
    assert_eq!(result.items()[0].category, SensitiveCategory::PhoneNumber);
    assert_eq!(result.items()[1].category, SensitiveCategory::Political);
}

#[test]
fn test_offsets_slice_back_to_content() {
    let text = "联系人：张三，电话13812345678，邮箱 zhangsan@example.com，身份证110101199001011237，讨论盗版和暴力";
    let result = engine().detect(text);

    assert!(result.total_detected() >= 5);
    for item in result.items() {
        assert_eq!(&text[item.start..item.end], item.content);
    }
}

#[test]
fn test_suggestions_attached() {
    let result = engine().detect("手机号13812345678，暴力");

    for item in result.items() {
        assert!(!item.suggestion.is_empty());
    }
    let phone = result.items_of(SensitiveCategory::PhoneNumber).next().unwrap();
    assert!(phone.suggestion.contains("前3位和后4位"));
}

#[test]
fn test_custom_suggestion_lookup() {
    let engine = engine().with_suggestions(Arc::new(Shouting));
    let result = engine.detect("血腥");

    assert_eq!(result.items()[0].suggestion, "REMOVE IT");
}

#[test]
fn test_realtime_scans_high_risk_patterns_only() {
    let engine = engine();
    let result = engine.detect_realtime("手机号13812345678 台独 4111111111111111");

    assert_eq!(result.total_detected(), 1);
    assert_eq!(result.items()[0].category, SensitiveCategory::CreditCard);
}

#[test]
fn test_realtime_ignores_overlong_password() {
    let result = engine().detect_realtime("password: abcdefghijklmnopqrstuvwxyz");
    assert_eq!(result.total_detected(), 0);
}

#[test]
fn test_short_card_before_digit_group_is_bank_card() {
    let result = engine().detect("卡号378282246310005 12期");

    assert_eq!(
        contents(&result, SensitiveCategory::BankCard),
        vec!["378282246310005"]
    );
    assert!(contents(&result, SensitiveCategory::CreditCard).is_empty());
}

#[test]
fn test_realtime_applies_checksums() {
    let engine = engine();

    let result = engine.detect_realtime("110101199001011234");
    assert_eq!(result.total_detected(), 0);

    let result = engine.detect_realtime("密码：Abc123456 身份证110101199001011237");
    assert_eq!(contents(&result, SensitiveCategory::Password), vec!["Abc123456"]);
    assert_eq!(
        contents(&result, SensitiveCategory::IdCard),
        vec!["110101199001011237"]
    );
}

#[test]
fn test_detect_batch_preserves_order() {
    let engine = engine();
    let results = engine.detect_batch(&["台独", "", "手机号13812345678"]);

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].items()[0].category, SensitiveCategory::Political);
    assert_eq!(results[1].total_detected(), 0);
    assert_eq!(results[2].items()[0].category, SensitiveCategory::PhoneNumber);
}

#[test]
fn test_update_keywords_replaces_set() {
    let engine = engine();
    assert_eq!(engine.keyword_count(), 12);

    let count = engine.update_keywords(vec!["赌博".to_string()], 100);
    assert_eq!(count, 1);
    assert_eq!(engine.keyword_count(), 1);

    let result = engine.detect("赌博和台独");
    assert_eq!(result.total_detected(), 1);
    assert_eq!(result.items()[0].content, "赌博");
    // Unrecognized keywords fall back to the political category
    assert_eq!(result.items()[0].category, SensitiveCategory::Political);
}

#[test]
fn test_update_keywords_truncates_to_prefix() {
    let engine = engine();
    let keywords = vec!["盗版".to_string(), "侵权".to_string(), "破解版".to_string()];

    assert_eq!(engine.update_keywords(keywords, 2), 2);

    let result = engine.detect("盗版 侵权 破解版");
    assert_eq!(
        contents(&result, SensitiveCategory::Copyright),
        vec!["盗版", "侵权"]
    );
}

#[test]
fn test_config_max_rules_applies_to_initial_and_sink_updates() {
    let config = EngineConfig {
        keywords: vec!["台独".to_string(), "色情".to_string()],
        max_rules: 1,
    };
    let engine = DetectionEngine::new(config).unwrap();
    assert_eq!(engine.keyword_count(), 1);
    assert_eq!(engine.max_rules(), 1);

    engine.replace_keywords(vec!["暴力".to_string(), "杀人".to_string()]);
    assert_eq!(engine.keyword_count(), 1);
    assert_eq!(engine.detect("暴力杀人").total_detected(), 1);
}

#[test]
fn test_refresh_from_source() {
    let engine = engine();
    let source = FixedSource(vec!["破解版".to_string()]);

    assert_eq!(engine.refresh_from(&source), 1);
    assert_eq!(
        contents(&engine.detect("破解版软件"), SensitiveCategory::Copyright),
        vec!["破解版"]
    );
}

#[test]
fn test_recorders_receive_every_scan_and_reload() {
    let recorder = Arc::new(CountingRecorder::default());
    let engine = engine().with_recorder(recorder.clone());

    engine.detect("台独和色情内容");
    engine.detect_realtime("4111111111111111");
    engine.detect("");
    engine.update_keywords(vec!["暴力".to_string()], 10);

    assert_eq!(recorder.scans.load(Ordering::SeqCst), 3);
    assert_eq!(recorder.items.load(Ordering::SeqCst), 3);
    assert_eq!(recorder.reloads.load(Ordering::SeqCst), 1);

    let stats = engine.stats().snapshot();
    assert_eq!(stats.total_requests, 3);
    assert_eq!(stats.successful_requests, 3);
    assert_eq!(stats.total_detected_items, 3);
}

#[test]
fn test_metrics_recorder() {
    let metrics = sensiscan_observability::Metrics::new().unwrap();
    let engine = engine().with_recorder(Arc::new(metrics.clone()));

    engine.detect("台独");
    engine.update_keywords(vec!["暴力".to_string(), "血腥".to_string()], 10);

    assert_eq!(metrics.keyword_reloads_total.get(), 1);
    assert_eq!(metrics.keyword_patterns.get(), 2.0);
    let text = metrics.gather_text().unwrap();
    assert!(text.contains("sensiscan_detected_items_total{category=\"POLITICAL\"} 1"));
}

#[test]
fn test_engine_config_defaults() {
    let config: EngineConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, EngineConfig::default());
    assert_eq!(config.keywords.len(), 12);
    assert_eq!(config.max_rules, DEFAULT_MAX_RULES);
}

#[test]
fn test_concurrent_detect_during_updates() {
    let old_set = ["台独", "色情"];
    let new_set = ["暴力", "血腥"];
    let config = EngineConfig {
        keywords: old_set.iter().map(|k| k.to_string()).collect(),
        max_rules: 100,
    };
    let engine = Arc::new(DetectionEngine::new(config).unwrap());

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                for _ in 0..250 {
                    let result = engine.detect("台独色情暴力血腥");
                    let found: Vec<&str> =
                        result.items().iter().map(|i| i.content.as_str()).collect();
                    assert!(
                        found.len() == 2
                            && (found.iter().all(|k| old_set.contains(k))
                                || found.iter().all(|k| new_set.contains(k))),
                        "torn keyword set: {found:?}"
                    );
                }
            })
        })
        .collect();

    for i in 0..50 {
        let set = if i % 2 == 0 { new_set } else { old_set };
        engine.update_keywords(set.iter().map(|k| k.to_string()).collect(), 100);
    }

    for reader in readers {
        reader.join().unwrap();
    }
}
