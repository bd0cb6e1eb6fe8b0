//! Built-in keyword rules

use crate::rule::RuleDraft;
use sensiscan_core::{RiskLevel, SensitiveCategory};

const DEFAULTS: [(&str, &str, SensitiveCategory, RiskLevel); 12] = [
    ("POLITICAL_KEYWORD_001", "台独", SensitiveCategory::Political, RiskLevel::High),
    ("POLITICAL_KEYWORD_002", "法轮功", SensitiveCategory::Political, RiskLevel::High),
    ("POLITICAL_KEYWORD_003", "颠覆政府", SensitiveCategory::Political, RiskLevel::High),
    ("PORNOGRAPHY_KEYWORD_001", "色情", SensitiveCategory::Pornography, RiskLevel::High),
    ("PORNOGRAPHY_KEYWORD_002", "黄色", SensitiveCategory::Pornography, RiskLevel::Medium),
    ("PORNOGRAPHY_KEYWORD_003", "成人", SensitiveCategory::Pornography, RiskLevel::Medium),
    ("VIOLENCE_KEYWORD_001", "暴力", SensitiveCategory::Violence, RiskLevel::Medium),
    ("VIOLENCE_KEYWORD_002", "杀人", SensitiveCategory::Violence, RiskLevel::High),
    ("VIOLENCE_KEYWORD_003", "血腥", SensitiveCategory::Violence, RiskLevel::Medium),
    ("COPYRIGHT_KEYWORD_001", "盗版", SensitiveCategory::Copyright, RiskLevel::Medium),
    ("COPYRIGHT_KEYWORD_002", "侵权", SensitiveCategory::Copyright, RiskLevel::Medium),
    ("COPYRIGHT_KEYWORD_003", "破解版", SensitiveCategory::Copyright, RiskLevel::Medium),
];

/// The twelve seeded keyword rules, all enabled
pub fn default_rules() -> Vec<RuleDraft> {
    DEFAULTS
        .iter()
        .map(|(id, keyword, category, risk)| {
            RuleDraft::keyword(*keyword, *category, *risk).with_id(*id)
        })
        .collect()
}
