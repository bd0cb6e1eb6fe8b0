//! Masking helpers for reported items
//!
//! All lengths are counted in chars, so masking never splits a multi-byte
//! character.

use sensiscan_core::{DetectedItem, SensitiveCategory};

const PASSWORD_MASK: &str = "********";
const MAX_GENERAL_STARS: usize = 6;

/// Mask one detected value according to its category
///
/// Values whose shape the category rule does not recognize (a phone number
/// that is not 11 chars, an email without a local part, ...) come back
/// unchanged. Blank input is returned as-is.
pub fn mask(content: &str, category: SensitiveCategory) -> String {
    if content.trim().is_empty() {
        return content.to_string();
    }

    let chars: Vec<char> = content.chars().collect();

    match category {
        SensitiveCategory::IdCard => match chars.len() {
            15 | 18 => keep_ends(&chars, 6, 4),
            _ => content.to_string(),
        },
        SensitiveCategory::Passport => {
            if chars.len() <= 4 {
                content.to_string()
            } else {
                keep_ends(&chars, 2, 2)
            }
        }
        SensitiveCategory::PhoneNumber => {
            if chars.len() == 11 {
                keep_ends(&chars, 3, 4)
            } else {
                content.to_string()
            }
        }
        SensitiveCategory::Email => mask_email(content),
        SensitiveCategory::BankCard | SensitiveCategory::CreditCard => {
            if chars.len() <= 8 {
                content.to_string()
            } else {
                keep_ends(&chars, 4, 4)
            }
        }
        SensitiveCategory::Password => PASSWORD_MASK.to_string(),
        SensitiveCategory::Username => {
            if chars.len() <= 2 {
                content.to_string()
            } else {
                keep_ends(&chars, 1, 1)
            }
        }
        SensitiveCategory::DriverLicense
        | SensitiveCategory::Address
        | SensitiveCategory::BankAccount
        | SensitiveCategory::TradeSecret
        | SensitiveCategory::InternalCode
        | SensitiveCategory::Political
        | SensitiveCategory::Pornography
        | SensitiveCategory::Violence
        | SensitiveCategory::Copyright
        | SensitiveCategory::HealthRecord
        | SensitiveCategory::Religion => mask_general(&chars),
    }
}

/// Replace every item span in `text` with its masked form
///
/// Items are applied in start order; an item overlapping one already applied
/// is skipped, as is any item whose span does not fit `text`.
pub fn mask_text(text: &str, items: &[DetectedItem]) -> String {
    let mut spans: Vec<&DetectedItem> = items.iter().collect();
    spans.sort_by_key(|item| (item.start, std::cmp::Reverse(item.end)));

    let mut masked = String::with_capacity(text.len());
    let mut cursor = 0;

    for item in spans {
        if item.start < cursor {
            continue;
        }
        let Some(original) = text.get(item.start..item.end) else {
            continue;
        };

        masked.push_str(&text[cursor..item.start]);
        masked.push_str(&mask(original, item.category));
        cursor = item.end;
    }

    masked.push_str(&text[cursor..]);
    masked
}

fn keep_ends(chars: &[char], head: usize, tail: usize) -> String {
    let stars = chars.len().saturating_sub(head + tail);
    let mut masked: String = chars[..head].iter().collect();
    masked.extend(std::iter::repeat_n('*', stars));
    masked.extend(&chars[chars.len() - tail..]);
    masked
}

fn mask_email(email: &str) -> String {
    let Some(at) = email.rfind('@') else {
        return email.to_string();
    };
    let (local, domain) = email.split_at(at);

    let mut chars = local.chars();
    let Some(first) = chars.next() else {
        return email.to_string();
    };
    let stars = chars.count().max(1);

    let mut masked = String::with_capacity(email.len());
    masked.push(first);
    masked.extend(std::iter::repeat_n('*', stars));
    masked.push_str(domain);
    masked
}

fn mask_general(chars: &[char]) -> String {
    match chars.len() {
        0 => String::new(),
        1 => "*".to_string(),
        2 => format!("{}*", chars[0]),
        len => {
            let stars = (len - 2).min(MAX_GENERAL_STARS);
            let mut masked = String::new();
            masked.push(chars[0]);
            masked.extend(std::iter::repeat_n('*', stars));
            masked.push(chars[len - 1]);
            masked
        }
    }
}
