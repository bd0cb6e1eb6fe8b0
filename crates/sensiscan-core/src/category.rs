//! Sensitive data categories and risk tiers
//!
//! The category set is closed: every table keyed by category (patterns,
//! suggestions, masking) is indexed by [`SensitiveCategory::index`] and sized
//! by [`SensitiveCategory::COUNT`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk tier attached to every category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Low risk
    Low,
    /// Medium risk
    Medium,
    /// High risk
    High,
}

impl RiskLevel {
    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            RiskLevel::High => "高风险",
            RiskLevel::Medium => "中风险",
            RiskLevel::Low => "低风险",
        }
    }

    /// Colour used by dashboards when rendering this tier
    pub fn color(&self) -> &'static str {
        match self {
            RiskLevel::High => "#ff4d4f",
            RiskLevel::Medium => "#faad14",
            RiskLevel::Low => "#52c41a",
        }
    }
}

/// Kinds of sensitive data the engine can report
///
/// Declaration order is significant: structured scans run, and report, in
/// this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensitiveCategory {
    // Personal identity
    IdCard,
    Passport,
    DriverLicense,

    // Contact details
    PhoneNumber,
    Email,
    Address,

    // Financial
    BankCard,
    CreditCard,
    BankAccount,

    // Credentials
    Username,
    Password,

    // Corporate
    TradeSecret,
    InternalCode,

    // Content
    Political,
    Pornography,
    Violence,
    Copyright,
    HealthRecord,
    Religion,
}

impl SensitiveCategory {
    /// Number of categories
    pub const COUNT: usize = 19;

    /// Every category in declaration order
    pub const ALL: [SensitiveCategory; Self::COUNT] = [
        SensitiveCategory::IdCard,
        SensitiveCategory::Passport,
        SensitiveCategory::DriverLicense,
        SensitiveCategory::PhoneNumber,
        SensitiveCategory::Email,
        SensitiveCategory::Address,
        SensitiveCategory::BankCard,
        SensitiveCategory::CreditCard,
        SensitiveCategory::BankAccount,
        SensitiveCategory::Username,
        SensitiveCategory::Password,
        SensitiveCategory::TradeSecret,
        SensitiveCategory::InternalCode,
        SensitiveCategory::Political,
        SensitiveCategory::Pornography,
        SensitiveCategory::Violence,
        SensitiveCategory::Copyright,
        SensitiveCategory::HealthRecord,
        SensitiveCategory::Religion,
    ];

    /// Position of this category in [`Self::ALL`]
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Upper-case identifier, identical to the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            SensitiveCategory::IdCard => "ID_CARD",
            SensitiveCategory::Passport => "PASSPORT",
            SensitiveCategory::DriverLicense => "DRIVER_LICENSE",
            SensitiveCategory::PhoneNumber => "PHONE_NUMBER",
            SensitiveCategory::Email => "EMAIL",
            SensitiveCategory::Address => "ADDRESS",
            SensitiveCategory::BankCard => "BANK_CARD",
            SensitiveCategory::CreditCard => "CREDIT_CARD",
            SensitiveCategory::BankAccount => "BANK_ACCOUNT",
            SensitiveCategory::Username => "USERNAME",
            SensitiveCategory::Password => "PASSWORD",
            SensitiveCategory::TradeSecret => "TRADE_SECRET",
            SensitiveCategory::InternalCode => "INTERNAL_CODE",
            SensitiveCategory::Political => "POLITICAL",
            SensitiveCategory::Pornography => "PORNOGRAPHY",
            SensitiveCategory::Violence => "VIOLENCE",
            SensitiveCategory::Copyright => "COPYRIGHT",
            SensitiveCategory::HealthRecord => "HEALTH_RECORD",
            SensitiveCategory::Religion => "RELIGION",
        }
    }

    /// Stable camelCase code used by rule records and external APIs
    pub fn code(&self) -> &'static str {
        match self {
            SensitiveCategory::IdCard => "idCard",
            SensitiveCategory::Passport => "passport",
            SensitiveCategory::DriverLicense => "driverLicense",
            SensitiveCategory::PhoneNumber => "phoneNumber",
            SensitiveCategory::Email => "email",
            SensitiveCategory::Address => "address",
            SensitiveCategory::BankCard => "bankCard",
            SensitiveCategory::CreditCard => "creditCard",
            SensitiveCategory::BankAccount => "bankAccount",
            SensitiveCategory::Username => "username",
            SensitiveCategory::Password => "password",
            SensitiveCategory::TradeSecret => "tradeSecret",
            SensitiveCategory::InternalCode => "internalCode",
            SensitiveCategory::Political => "political",
            SensitiveCategory::Pornography => "pornography",
            SensitiveCategory::Violence => "violence",
            SensitiveCategory::Copyright => "copyright",
            SensitiveCategory::HealthRecord => "healthRecord",
            SensitiveCategory::Religion => "religion",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            SensitiveCategory::IdCard => "身份证号",
            SensitiveCategory::Passport => "护照号",
            SensitiveCategory::DriverLicense => "驾照号",
            SensitiveCategory::PhoneNumber => "手机号",
            SensitiveCategory::Email => "邮箱",
            SensitiveCategory::Address => "地址",
            SensitiveCategory::BankCard => "银行卡号",
            SensitiveCategory::CreditCard => "信用卡号",
            SensitiveCategory::BankAccount => "银行账号",
            SensitiveCategory::Username => "用户名",
            SensitiveCategory::Password => "密码",
            SensitiveCategory::TradeSecret => "商业机密",
            SensitiveCategory::InternalCode => "内部代码",
            SensitiveCategory::Political => "政治敏感",
            SensitiveCategory::Pornography => "色情内容",
            SensitiveCategory::Violence => "暴力内容",
            SensitiveCategory::Copyright => "版权内容",
            SensitiveCategory::HealthRecord => "健康记录",
            SensitiveCategory::Religion => "宗教信仰",
        }
    }

    /// Risk tier
    pub fn risk_level(&self) -> RiskLevel {
        match self {
            SensitiveCategory::IdCard
            | SensitiveCategory::Passport
            | SensitiveCategory::BankCard
            | SensitiveCategory::CreditCard
            | SensitiveCategory::BankAccount
            | SensitiveCategory::Password
            | SensitiveCategory::TradeSecret
            | SensitiveCategory::Political
            | SensitiveCategory::Pornography
            | SensitiveCategory::Violence
            | SensitiveCategory::HealthRecord => RiskLevel::High,

            SensitiveCategory::DriverLicense
            | SensitiveCategory::PhoneNumber
            | SensitiveCategory::Username
            | SensitiveCategory::InternalCode
            | SensitiveCategory::Copyright
            | SensitiveCategory::Religion => RiskLevel::Medium,

            SensitiveCategory::Email | SensitiveCategory::Address => RiskLevel::Low,
        }
    }

    /// Resolve a category from its stable code
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }
}

impl fmt::Display for SensitiveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
