//! Static handling advice per category

use sensiscan_core::{SensitiveCategory, SuggestionLookup};

/// Advice for categories without a dedicated entry
pub const DEFAULT_SUGGESTION: &str = "建议根据数据敏感程度采取适当的保护措施";

const ENTRIES: &[(SensitiveCategory, &str)] = &[
    (
        SensitiveCategory::IdCard,
        "建议使用掩码处理，保留前6位和后4位，中间用*代替",
    ),
    (
        SensitiveCategory::Passport,
        "建议使用掩码处理，保留前2位和后2位，中间用*代替",
    ),
    (
        SensitiveCategory::PhoneNumber,
        "建议使用掩码处理，保留前3位和后4位，中间用*代替",
    ),
    (
        SensitiveCategory::Email,
        "建议使用掩码处理，保留域名和邮箱首字母，其余用*代替",
    ),
    (
        SensitiveCategory::BankCard,
        "建议使用掩码处理，保留前4位和后4位，中间用*代替",
    ),
    (
        SensitiveCategory::CreditCard,
        "建议使用掩码处理，保留前4位和后4位，中间用*代替",
    ),
    (SensitiveCategory::Password, "建议使用加密存储，禁止明文传输和显示"),
    (SensitiveCategory::Username, "建议使用哈希处理后存储"),
    (SensitiveCategory::TradeSecret, "建议使用访问控制和加密存储"),
    (SensitiveCategory::InternalCode, "建议使用访问控制和版本管理"),
    (SensitiveCategory::Political, "建议删除或替换为中性词汇"),
    (SensitiveCategory::Pornography, "建议删除或替换为健康词汇"),
    (SensitiveCategory::Violence, "建议删除或替换为文明词汇"),
    (SensitiveCategory::Copyright, "建议获取授权或删除相关内容"),
    (SensitiveCategory::HealthRecord, "建议使用加密存储和严格的访问控制"),
    (SensitiveCategory::Religion, "建议避免使用极端表述，保持中立"),
];

/// Fixed category → advice table
#[derive(Debug, Clone)]
pub struct StaticSuggestions {
    table: [&'static str; SensitiveCategory::COUNT],
}

impl StaticSuggestions {
    pub fn new() -> Self {
        let mut table = [DEFAULT_SUGGESTION; SensitiveCategory::COUNT];
        for (category, advice) in ENTRIES {
            table[category.index()] = *advice;
        }
        Self { table }
    }
}

impl Default for StaticSuggestions {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionLookup for StaticSuggestions {
    fn suggestion_for(&self, category: SensitiveCategory) -> &str {
        self.table[category.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_advice() {
        let suggestions = StaticSuggestions::new();
        for category in SensitiveCategory::ALL {
            assert!(!suggestions.suggestion_for(category).is_empty());
        }
    }

    #[test]
    fn test_dedicated_entries() {
        let suggestions = StaticSuggestions::new();
        assert_eq!(
            suggestions.suggestion_for(SensitiveCategory::Password),
            "建议使用加密存储，禁止明文传输和显示"
        );
        assert_eq!(
            suggestions.suggestion_for(SensitiveCategory::Political),
            "建议删除或替换为中性词汇"
        );
        assert_eq!(
            suggestions.suggestion_for(SensitiveCategory::BankCard),
            suggestions.suggestion_for(SensitiveCategory::CreditCard)
        );
    }

    #[test]
    fn test_unmapped_categories_use_default() {
        let suggestions = StaticSuggestions::new();
        for category in [
            SensitiveCategory::Address,
            SensitiveCategory::DriverLicense,
            SensitiveCategory::BankAccount,
        ] {
            assert_eq!(suggestions.suggestion_for(category), DEFAULT_SUGGESTION);
        }
    }
}
