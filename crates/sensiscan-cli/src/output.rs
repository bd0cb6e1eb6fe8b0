//! Terminal rendering for scan results, categories and rules

use sensiscan_core::{DetectionResult, SensitiveCategory};
use sensiscan_detect::{PatternRegistry, mask};
use sensiscan_rules::Rule;
use serde_json::json;
use std::fmt::Write;

/// One line per item, with the matched content masked
pub fn render_human(result: &DetectionResult) -> String {
    let mut out = String::new();

    if !result.has_items() {
        let _ = writeln!(out, "No sensitive data found ({} ms)", result.processing_time_ms());
        return out;
    }

    let _ = writeln!(
        out,
        "Found {} item(s) in {} ms",
        result.total_detected(),
        result.processing_time_ms()
    );
    for item in result.items() {
        let _ = writeln!(
            out,
            "  {:<14} {:>5}..{:<5} {:<24} {}",
            item.category.as_str(),
            item.start,
            item.end,
            mask(&item.content, item.category),
            item.suggestion
        );
    }
    out
}

pub fn render_json(result: &DetectionResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

/// Every category with its risk tier and whether a structured pattern backs it
pub fn categories_table(registry: &PatternRegistry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<14} {:<14} {:<7} PATTERN", "CATEGORY", "CODE", "RISK");

    for category in SensitiveCategory::ALL {
        let _ = writeln!(
            out,
            "{:<14} {:<14} {:<7} {}",
            category.as_str(),
            category.code(),
            format!("{:?}", category.risk_level()).to_uppercase(),
            if registry.is_supported(category) { "yes" } else { "-" }
        );
    }
    out
}

pub fn categories_json(registry: &PatternRegistry) -> serde_json::Result<String> {
    let entries: Vec<_> = SensitiveCategory::ALL
        .iter()
        .map(|category| {
            json!({
                "category": category,
                "code": category.code(),
                "name": category.display_name(),
                "risk_level": category.risk_level(),
                "structured": registry.is_supported(*category),
            })
        })
        .collect();
    serde_json::to_string_pretty(&entries)
}

pub fn rules_table(rules: &[Rule]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<26} {:<8} {:<9} {:<14} CONTENT",
        "ID", "TYPE", "STATUS", "CATEGORY"
    );

    for rule in rules {
        let status = if rule.is_enabled() { "enabled" } else { "disabled" };
        let _ = writeln!(
            out,
            "{:<26} {:<8} {:<9} {:<14} {}",
            rule.id,
            rule.rule_type.as_str(),
            status,
            rule.category.as_str(),
            rule.content
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensiscan_core::DetectedItem;
    use sensiscan_rules::{InMemoryRuleStore, RuleStore};

    #[test]
    fn test_render_human_masks_content() {
        let items = vec![
            DetectedItem::new("13812345678", SensitiveCategory::PhoneNumber, 9, 20)
                .with_suggestion("脱敏处理"),
        ];
        let result = DetectionResult::new("我的手机号是13812345678", items, 2);

        let text = render_human(&result);
        assert!(text.starts_with("Found 1 item(s) in 2 ms"));
        assert!(text.contains("PHONE_NUMBER"));
        assert!(text.contains("138****5678"));
        assert!(!text.contains("13812345678"));
        assert!(text.contains("脱敏处理"));
    }

    #[test]
    fn test_render_human_empty() {
        let text = render_human(&DetectionResult::empty("hello"));
        assert_eq!(text, "No sensitive data found (0 ms)\n");
    }

    #[test]
    fn test_render_json_keeps_raw_content() {
        let items = vec![DetectedItem::new("a@b.cn", SensitiveCategory::Email, 0, 6)];
        let result = DetectionResult::new("a@b.cn", items, 1);

        let value: serde_json::Value = serde_json::from_str(&render_json(&result).unwrap()).unwrap();
        assert_eq!(value["items"][0]["content"], "a@b.cn");
        assert_eq!(value["total_detected"], 1);
    }

    #[test]
    fn test_categories_table_lists_every_category() {
        let registry = PatternRegistry::new().unwrap();
        let table = categories_table(&registry);

        assert_eq!(table.lines().count(), SensitiveCategory::COUNT + 1);
        let phone = table.lines().find(|l| l.starts_with("PHONE_NUMBER")).unwrap();
        assert!(phone.ends_with("yes"));
        let political = table.lines().find(|l| l.starts_with("POLITICAL")).unwrap();
        assert!(political.ends_with('-'));
    }

    #[test]
    fn test_categories_json() {
        let registry = PatternRegistry::new().unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&categories_json(&registry).unwrap()).unwrap();

        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), SensitiveCategory::COUNT);
        assert_eq!(entries[0]["category"], "ID_CARD");
        assert_eq!(entries[0]["risk_level"], "HIGH");
        assert_eq!(entries[0]["structured"], true);
    }

    #[test]
    fn test_rules_table() {
        let store = InMemoryRuleStore::with_defaults();
        store.disable("POLITICAL_KEYWORD_001").unwrap();

        let rules = store.list();
        let table = rules_table(&rules);
        assert_eq!(table.lines().count(), rules.len() + 1);

        let line = table
            .lines()
            .find(|l| l.starts_with("POLITICAL_KEYWORD_001"))
            .unwrap();
        assert!(line.contains("KEYWORD"));
        assert!(line.contains("disabled"));
    }
}
