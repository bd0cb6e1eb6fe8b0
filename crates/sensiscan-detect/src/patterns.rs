//! Structured pattern registry
//!
//! One compiled pattern per structured category. Every regex captures the
//! reportable text in a group named `payload`; the surrounding groups only
//! assert that the payload is not glued to a longer run of digits or word
//! characters. Non-ASCII text (CJK in particular) never blocks a match, so
//! `手机号13812345678` still yields the phone number.

use crate::checksum::{is_valid_card_number, is_valid_national_id};
use regex::Regex;
use sensiscan_core::{DetectedItem, Result, SensitiveCategory};

/// Name of the capture group holding the reportable match
const PAYLOAD: &str = "payload";

/// Left/right guards for digit-shaped payloads
const DIGIT_LEFT: &str = r"(?:^|[^0-9])";
const DIGIT_RIGHT: &str = r"(?:[^0-9]|$)";

/// Left/right guards for ASCII-word-shaped payloads
const WORD_LEFT: &str = r"(?:^|[^A-Za-z0-9_])";
const WORD_RIGHT: &str = r"(?:[^A-Za-z0-9_]|$)";

/// Post-match validation applied to a candidate payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checksum {
    /// Luhn check over 13-19 digits
    Luhn,
    /// Weighted mod-11 check of an 18-character resident ID
    NationalId,
}

impl Checksum {
    pub fn verify(&self, candidate: &str) -> bool {
        match self {
            Checksum::Luhn => is_valid_card_number(candidate),
            Checksum::NationalId => is_valid_national_id(candidate),
        }
    }
}

/// A compiled structured pattern and its validation rules
#[derive(Debug, Clone)]
pub struct StructuredPattern {
    category: SensitiveCategory,
    regex: Regex,
    checksum: Option<Checksum>,
    yields_to: Option<SensitiveCategory>,
}

impl StructuredPattern {
    fn new(category: SensitiveCategory, source: &str) -> Result<Self> {
        Ok(Self {
            category,
            regex: Regex::new(source)?,
            checksum: None,
            yields_to: None,
        })
    }

    fn guarded(
        category: SensitiveCategory,
        left: &str,
        payload: &str,
        right: &str,
    ) -> Result<Self> {
        Self::new(category, &format!("{left}(?P<{PAYLOAD}>{payload}){right}"))
    }

    fn with_checksum(mut self, checksum: Checksum) -> Self {
        self.checksum = Some(checksum);
        self
    }

    fn yielding_to(mut self, other: SensitiveCategory) -> Self {
        self.yields_to = Some(other);
        self
    }

    pub fn category(&self) -> SensitiveCategory {
        self.category
    }

    pub fn checksum(&self) -> Option<Checksum> {
        self.checksum
    }

    /// Category whose matches take precedence over overlapping matches of
    /// this pattern
    pub fn yields_to(&self) -> Option<SensitiveCategory> {
        self.yields_to
    }

    /// Regex source, including the boundary guards
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// All non-overlapping payload matches, before checksum filtering
    ///
    /// The search resumes right after each payload rather than after the
    /// consumed right guard, so adjacent payloads separated by one character
    /// are all found.
    pub fn candidates<'t>(&self, text: &'t str) -> Candidates<'_, 't> {
        Candidates {
            regex: &self.regex,
            text,
            pos: 0,
        }
    }

    /// Payload matches that pass this pattern's checksum, as items without
    /// suggestions
    pub fn extract(&self, text: &str) -> Vec<DetectedItem> {
        self.candidates(text)
            .filter_map(|m| {
                let content = self.validated(m.as_str())?;
                Some(DetectedItem::new(
                    content,
                    self.category,
                    m.start(),
                    m.start() + content.len(),
                ))
            })
            .collect()
    }

    /// The candidate if it passes the checksum, otherwise its longest prefix
    /// ending just before a separator that does
    ///
    /// Trailing digit groups are matched greedily, so a short card followed
    /// by ` 12` is first seen with the extra group attached.
    fn validated<'t>(&self, candidate: &'t str) -> Option<&'t str> {
        let Some(check) = self.checksum else {
            return Some(candidate);
        };
        if check.verify(candidate) {
            return Some(candidate);
        }

        candidate
            .char_indices()
            .rev()
            .filter(|(_, c)| matches!(c, ' ' | '-'))
            .map(|(i, _)| &candidate[..i])
            .find(|prefix| check.verify(prefix))
    }
}

/// Iterator over payload matches of one pattern
pub struct Candidates<'r, 't> {
    regex: &'r Regex,
    text: &'t str,
    pos: usize,
}

impl<'t> Iterator for Candidates<'_, 't> {
    type Item = regex::Match<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos <= self.text.len() {
            let captures = self.regex.captures_at(self.text, self.pos)?;
            match captures.name(PAYLOAD) {
                Some(payload) if !payload.is_empty() => {
                    self.pos = payload.end();
                    return Some(payload);
                }
                // A match without a usable payload cannot happen with the
                // built-in sources; step past it to guarantee progress.
                _ => {
                    let whole = captures.get(0)?;
                    self.pos = next_char_boundary(self.text, whole.end().max(self.pos + 1));
                }
            }
        }
        None
    }
}

fn next_char_boundary(text: &str, mut pos: usize) -> usize {
    while pos < text.len() && !text.is_char_boundary(pos) {
        pos += 1;
    }
    pos
}

/// Compiled patterns for every structured category, indexed by category
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    patterns: [Option<StructuredPattern>; SensitiveCategory::COUNT],
}

impl PatternRegistry {
    /// Compile the built-in pattern set
    pub fn new() -> Result<Self> {
        use SensitiveCategory::*;

        let compiled = [
            StructuredPattern::guarded(
                IdCard,
                DIGIT_LEFT,
                r"[1-9][0-9]{5}(?:19|20)[0-9]{2}(?:0[1-9]|1[0-2])(?:0[1-9]|[12][0-9]|3[01])[0-9]{3}[0-9Xx]|[1-9][0-9]{5}[0-9]{2}(?:0[1-9]|1[0-2])(?:0[1-9]|[12][0-9]|3[01])[0-9]{3}",
                DIGIT_RIGHT,
            )?
            .with_checksum(Checksum::NationalId),
            StructuredPattern::guarded(Passport, WORD_LEFT, r"[A-Za-z][0-9]{8}", WORD_RIGHT)?,
            StructuredPattern::guarded(DriverLicense, WORD_LEFT, r"[A-Za-z0-9]{17}", WORD_RIGHT)?,
            StructuredPattern::guarded(PhoneNumber, DIGIT_LEFT, r"1[3-9][0-9]{9}", DIGIT_RIGHT)?,
            StructuredPattern::guarded(
                Email,
                r"(?:^|[^A-Za-z0-9._%+-])",
                r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}",
                WORD_RIGHT,
            )?,
            StructuredPattern::guarded(
                BankCard,
                DIGIT_LEFT,
                r"[0-9]{4}(?:[ -]?[0-9]{4}){2}(?:[ -]?[0-9]{1,4}){1,2}",
                DIGIT_RIGHT,
            )?
            .with_checksum(Checksum::Luhn)
            .yielding_to(CreditCard),
            StructuredPattern::guarded(
                CreditCard,
                DIGIT_LEFT,
                r"[0-9]{4}(?:[ -]?[0-9]{4}){3}",
                DIGIT_RIGHT,
            )?
            .with_checksum(Checksum::Luhn),
            StructuredPattern::guarded(
                BankAccount,
                WORD_LEFT,
                r"[A-Za-z0-9][A-Za-z0-9 -]{14,20}[A-Za-z0-9]",
                WORD_RIGHT,
            )?,
            StructuredPattern::guarded(
                Username,
                WORD_LEFT,
                r"[A-Za-z][A-Za-z0-9_]{3,19}",
                WORD_RIGHT,
            )?,
            StructuredPattern::new(
                Password,
                r"(?i)(?:密码|password)[:：=\s]+(?P<payload>[A-Za-z0-9_!@#$%^&*]{6,20})(?:[^A-Za-z0-9_!@#$%^&*]|$)",
            )?,
        ];

        let mut patterns: [Option<StructuredPattern>; SensitiveCategory::COUNT] =
            std::array::from_fn(|_| None);
        for pattern in compiled {
            let index = pattern.category.index();
            patterns[index] = Some(pattern);
        }

        Ok(Self { patterns })
    }

    /// The compiled pattern for a category, if it has one
    pub fn get_pattern(&self, category: SensitiveCategory) -> Option<&StructuredPattern> {
        self.patterns[category.index()].as_ref()
    }

    /// Whether a category is detected by a structured pattern
    pub fn is_supported(&self, category: SensitiveCategory) -> bool {
        self.patterns[category.index()].is_some()
    }

    /// Every compiled pattern in category declaration order
    pub fn iter(&self) -> impl Iterator<Item = &StructuredPattern> {
        self.patterns.iter().flatten()
    }

    /// Categories with a structured pattern, in declaration order
    pub fn supported_categories(&self) -> Vec<SensitiveCategory> {
        self.iter().map(StructuredPattern::category).collect()
    }
}
