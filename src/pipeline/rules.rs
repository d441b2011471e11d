//! Rule-based payload classifier.
//!
//! Ordered prefix checks, first match wins:
//! - `http://`, `https://` → Url
//! - `WIFI:` → WifiConfig
//! - `BEGIN:VCARD` → VCard
//! - `SMSTO:` → Sms
//! - `MATMSG:`, `mailto:` → Email
//! - `tel:` → PhoneNumber
//! - `geo:` → Geo
//!
//! Anything else is `Text`. Matching is case-sensitive.

use tracing::debug;

use crate::pipeline::types::{Category, Classifier};

/// A single prefix rule.
#[derive(Debug, Clone)]
pub struct PrefixRule {
    /// Any of these prefixes triggers the rule.
    pub prefixes: &'static [&'static str],
    /// Category assigned on match.
    pub category: Category,
}

impl PrefixRule {
    fn matches(&self, text: &str) -> bool {
        self.prefixes.iter().any(|p| text.starts_with(p))
    }
}

/// Deterministic classifier driven by ordered prefix rules.
#[derive(Debug, Clone)]
pub struct RuleClassifier {
    rules: Vec<PrefixRule>,
}

impl RuleClassifier {
    /// Classifier over a custom rule list, checked in order.
    pub fn new(rules: Vec<PrefixRule>) -> Self {
        Self { rules }
    }

    /// Create a classifier with the standard QR payload prefixes.
    pub fn default_rules() -> Self {
        let rules = vec![
            PrefixRule {
                prefixes: &["http://", "https://"],
                category: Category::Url,
            },
            PrefixRule {
                prefixes: &["WIFI:"],
                category: Category::WifiConfig,
            },
            PrefixRule {
                prefixes: &["BEGIN:VCARD"],
                category: Category::VCard,
            },
            PrefixRule {
                prefixes: &["SMSTO:"],
                category: Category::Sms,
            },
            PrefixRule {
                prefixes: &["MATMSG:", "mailto:"],
                category: Category::Email,
            },
            PrefixRule {
                prefixes: &["tel:"],
                category: Category::PhoneNumber,
            },
            PrefixRule {
                prefixes: &["geo:"],
                category: Category::Geo,
            },
        ];

        Self::new(rules)
    }
}

impl Default for RuleClassifier {
    fn default() -> Self {
        Self::default_rules()
    }
}

impl Classifier for RuleClassifier {
    fn name(&self) -> &str {
        "rules"
    }

    fn classify(&self, text: &str) -> Category {
        for rule in &self.rules {
            if rule.matches(text) {
                debug!(category = %rule.category, "Payload matched prefix rule");
                return rule.category;
            }
        }

        // No rule matched — plain text
        Category::Text
    }
}
