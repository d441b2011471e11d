//! Scan processor — runs decoded payloads through the dispatch pipeline.
//!
//! Flow, per payload and in input order:
//! 1. Classifier → category
//! 2. Structured parser → category-tagged fields
//! 3. Action resolver → action intents
//! 4. Dedup session (live scans only, URLs only) → may suppress
//!
//! Dedup is cross-batch only: duplicates inside one batch (two identical
//! codes in one image) are each dispatched, and the session is updated once
//! the whole batch has been resolved.

use tracing::{debug, info};

use crate::config::ScanConfig;
use crate::pipeline::parser::parse_with_diagnostics;
use crate::pipeline::resolver::ActionResolver;
use crate::pipeline::rules::RuleClassifier;
use crate::pipeline::session::DedupSession;
use crate::pipeline::types::{Action, Category, Classifier, Payload, ScanResult};

/// Composes classifier, parser and resolver into one batch operation.
pub struct ScanProcessor {
    classifier: Box<dyn Classifier>,
    resolver: ActionResolver,
}

impl ScanProcessor {
    pub fn new(classifier: Box<dyn Classifier>, resolver: ActionResolver) -> Self {
        Self {
            classifier,
            resolver,
        }
    }

    /// Prefix-rule classifier with the default map endpoint.
    pub fn with_rules() -> Self {
        Self::new(
            Box::new(RuleClassifier::default_rules()),
            ActionResolver::default(),
        )
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(
            config.build_classifier(),
            ActionResolver::new(config.maps_search_url.clone()),
        )
    }

    /// Name of the active classification strategy.
    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Classify, parse and resolve one payload. No dedup.
    pub fn process(&self, payload: Payload) -> ScanResult {
        let category = self.classifier.classify(payload.text());
        let outcome = parse_with_diagnostics(payload.text(), category);
        let actions = self.resolver.resolve(category, &outcome.fields, &payload);

        ScanResult {
            payload,
            category,
            fields: outcome.fields,
            actions,
            suppressed: false,
            diagnostics: outcome.diagnostics,
        }
    }

    /// Process one batch: one image scan (`session = None`) or one live
    /// frame (`session = Some(..)`).
    ///
    /// Output order matches input order. An empty batch gives an empty result.
    pub fn process_batch<I>(
        &self,
        payloads: I,
        mut session: Option<&mut DedupSession>,
    ) -> Vec<ScanResult>
    where
        I: IntoIterator,
        I::Item: Into<Payload>,
    {
        let mut results = Vec::new();
        let mut newly_dispatched: Vec<Payload> = Vec::new();

        for payload in payloads {
            let mut result = self.process(payload.into());

            if result.category == Category::Url
                && let Some(session) = session.as_deref()
            {
                if session.should_dispatch(&result.payload, result.category) {
                    newly_dispatched.push(result.payload.clone());
                } else {
                    debug!(
                        session = %session.id(),
                        "URL already dispatched this session, suppressing"
                    );
                    result.actions = vec![Action::NoAction];
                    result.suppressed = true;
                }
            }

            if result.category == Category::Url && !result.suppressed {
                info!(url = %result.payload.text(), "URL dispatched (open + copy to clipboard)");
            }

            results.push(result);
        }

        if let Some(session) = session.as_deref_mut() {
            for payload in &newly_dispatched {
                session.mark_dispatched(payload);
            }
        }

        debug!(
            processed = results.len(),
            actionable = results.iter().filter(|r| r.is_actionable()).count(),
            live = session.is_some(),
            "Batch processing complete"
        );
        results
    }
}

impl Default for ScanProcessor {
    fn default() -> Self {
        Self::with_rules()
    }
}
