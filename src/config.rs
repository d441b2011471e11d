//! Configuration types.

use crate::error::ConfigError;
use crate::pipeline::resolver::DEFAULT_MAPS_SEARCH_URL;
use crate::pipeline::rules::RuleClassifier;
use crate::pipeline::statistical::NaiveBayesClassifier;
use crate::pipeline::types::Classifier;

/// Which classification strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierKind {
    /// Ordered prefix rules (canonical).
    #[default]
    Rules,
    /// TF-IDF + naive Bayes over the built-in exemplar corpus.
    Statistical,
}

impl std::str::FromStr for ClassifierKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rules" | "rule" => Ok(Self::Rules),
            "statistical" | "bayes" => Ok(Self::Statistical),
            other => Err(ConfigError::InvalidValue {
                key: "QR_DISPATCH_CLASSIFIER".into(),
                message: format!(
                    "unknown classifier '{other}' (expected 'rules' or 'statistical')"
                ),
            }),
        }
    }
}

/// Scan pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub classifier: ClassifierKind,
    /// Map search endpoint that geo coordinates are appended to.
    pub maps_search_url: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierKind::default(),
            maps_search_url: DEFAULT_MAPS_SEARCH_URL.to_string(),
        }
    }
}

impl ScanConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// - `QR_DISPATCH_CLASSIFIER`: `rules` (default) or `statistical`
    /// - `QR_DISPATCH_MAPS_URL`: map search endpoint
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let classifier = match lookup("QR_DISPATCH_CLASSIFIER") {
            Some(value) => value.parse::<ClassifierKind>()?,
            None => ClassifierKind::default(),
        };

        let maps_search_url = lookup("QR_DISPATCH_MAPS_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_MAPS_SEARCH_URL.to_string());

        Ok(Self {
            classifier,
            maps_search_url,
        })
    }

    /// Instantiate the configured classifier.
    pub fn build_classifier(&self) -> Box<dyn Classifier> {
        match self.classifier {
            ClassifierKind::Rules => Box::new(RuleClassifier::default_rules()),
            ClassifierKind::Statistical => Box::new(NaiveBayesClassifier::new()),
        }
    }
}
