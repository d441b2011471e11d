//! Payload classification and action-dispatch pipeline.
//!
//! Every decoded payload flows through:
//! 1. `Classifier::classify()` — prefix rules or naive Bayes
//! 2. `parser::parse()` — category-specific field extraction
//! 3. `ActionResolver::resolve()` — action intents for the host
//! 4. `DedupSession` — live scans only, suppresses repeat URL dispatches
//!
//! **Nothing here performs a side effect.** Browsers, clipboards and dialogs
//! belong to the host; the pipeline only returns `Action` values.

pub mod parser;
pub mod processor;
pub mod resolver;
pub mod rules;
pub mod session;
pub mod statistical;
pub mod types;

pub use parser::{ParseOutcome, parse, parse_with_diagnostics};
pub use processor::ScanProcessor;
pub use resolver::{ActionResolver, resolve};
pub use rules::{PrefixRule, RuleClassifier};
pub use session::DedupSession;
pub use statistical::NaiveBayesClassifier;
pub use types::{
    Action, Category, Classifier, EmailFields, EmailFormat, ParsedFields, Payload, ScanResult,
    WifiCredentials,
};
