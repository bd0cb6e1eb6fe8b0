//! Checksum validators used to post-filter structured matches
//!
//! Both functions are pure and never panic on arbitrary input.

/// Weights applied to the first 17 digits of an 18-character national ID
const NATIONAL_ID_WEIGHTS: [u32; 17] = [7, 9, 10, 5, 8, 4, 2, 1, 6, 3, 7, 9, 10, 5, 8, 4, 2];

/// Check character for each weighted sum modulo 11
const NATIONAL_ID_CHECK_CHARS: [u8; 11] = *b"10X98765432";

/// Validate a card number with the Luhn algorithm
///
/// Spaces and hyphens are ignored. What remains must be 13 to 19 ASCII
/// digits; anything else fails.
pub fn is_valid_card_number(candidate: &str) -> bool {
    let digits: Vec<u32> = candidate
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .map(|c| if c.is_ascii_digit() { c.to_digit(10) } else { None })
        .collect::<Option<Vec<u32>>>()
        .unwrap_or_default();

    if digits.len() < 13 || digits.len() > 19 {
        return false;
    }

    let checksum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();

    checksum.is_multiple_of(10)
}

/// Validate a mainland China resident ID number
///
/// Length is counted in characters and nothing is trimmed. 15-character
/// (first generation) numbers carry no check digit and are accepted as-is.
/// 18-character numbers must be ASCII: 17 digits followed by the weighted
/// mod-11 check character, compared case-insensitively.
pub fn is_valid_national_id(candidate: &str) -> bool {
    match candidate.chars().count() {
        15 => true,
        18 if candidate.is_ascii() => {
            let (body, check) = candidate.as_bytes().split_at(17);
            if !body.iter().all(u8::is_ascii_digit) {
                return false;
            }

            let sum: u32 = body
                .iter()
                .zip(NATIONAL_ID_WEIGHTS)
                .map(|(digit, weight)| u32::from(digit - b'0') * weight)
                .sum();

            let expected = NATIONAL_ID_CHECK_CHARS[(sum % 11) as usize];
            check[0].eq_ignore_ascii_case(&expected)
        }
        _ => false,
    }
}
