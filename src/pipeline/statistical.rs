//! Statistical payload classifier: TF-IDF features + multinomial naive Bayes.
//!
//! Trained once at construction on a small fixed corpus of exemplar payloads.
//! The corpus is tiny, so this exists for parity with the rule classifier
//! rather than accuracy. When the top score is shared by several labels the
//! rule classifier decides.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::pipeline::rules::RuleClassifier;
use crate::pipeline::types::{Category, Classifier};

/// Laplace smoothing for the naive Bayes feature likelihoods.
const ALPHA: f64 = 1.0;

/// Relative tolerance when comparing class scores for a tie.
const TIE_EPSILON: f64 = 1e-9;

/// Labeled exemplars the default model is trained on.
pub const TRAINING_CORPUS: [(&str, Category); 12] = [
    ("https://example.com", Category::Url),
    ("http://google.com", Category::Url),
    ("WIFI:S:HomeNetwork;T:WPA;P:123456;;", Category::WifiConfig),
    ("WIFI", Category::WifiConfig),
    ("SMSTO:+1234567890:Hello there", Category::Sms),
    ("BEGIN:VCARD\nFN:John Doe\nTEL:1234", Category::VCard),
    ("mailto:someone@example.com", Category::Email),
    (
        "MATMSG:TO:email@example.com;SUB:Test;BODY:Hello;;",
        Category::Email,
    ),
    ("tel:+1234567890", Category::PhoneNumber),
    ("tel:+977", Category::PhoneNumber),
    ("geo:37.7749,-122.4194", Category::Geo),
    ("Just some random text here", Category::Text),
];

/// Tokens are runs of two or more word characters.
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Naive Bayes classifier over TF-IDF weighted bag-of-words features.
pub struct NaiveBayesClassifier {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    classes: Vec<Category>,
    class_log_prior: Vec<f64>,
    /// `feature_log_prob[class][term]`
    feature_log_prob: Vec<Vec<f64>>,
    fallback: RuleClassifier,
}

impl NaiveBayesClassifier {
    /// Train on the built-in exemplar corpus.
    pub fn new() -> Self {
        Self::train(&TRAINING_CORPUS)
    }

    /// Train on an arbitrary labeled corpus.
    pub fn train(corpus: &[(&str, Category)]) -> Self {
        let documents: Vec<Vec<String>> = corpus.iter().map(|(text, _)| tokenize(text)).collect();

        // Vocabulary + document frequencies
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: Vec<usize> = Vec::new();
        for tokens in &documents {
            let mut seen_in_doc: Vec<usize> = Vec::new();
            for token in tokens {
                let next_index = vocabulary.len();
                let index = *vocabulary.entry(token.clone()).or_insert(next_index);
                if index == doc_freq.len() {
                    doc_freq.push(0);
                }
                if !seen_in_doc.contains(&index) {
                    seen_in_doc.push(index);
                    doc_freq[index] += 1;
                }
            }
        }

        let n_docs = corpus.len() as f64;
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let classes: Vec<Category> = Category::ALL
            .into_iter()
            .filter(|c| corpus.iter().any(|(_, label)| label == c))
            .collect();

        let n_terms = vocabulary.len();
        let mut feature_count = vec![vec![0.0_f64; n_terms]; classes.len()];
        let mut class_count = vec![0usize; classes.len()];

        for (tokens, (_, label)) in documents.iter().zip(corpus) {
            let Some(class_index) = classes.iter().position(|c| c == label) else {
                continue;
            };
            class_count[class_index] += 1;
            for (term, weight) in weigh(tokens, &vocabulary, &idf) {
                feature_count[class_index][term] += weight;
            }
        }

        let class_log_prior = class_count
            .iter()
            .map(|&count| (count as f64 / n_docs).ln())
            .collect();

        let feature_log_prob = feature_count
            .iter()
            .map(|counts| {
                let total: f64 = counts.iter().sum::<f64>() + ALPHA * n_terms as f64;
                counts.iter().map(|&c| ((c + ALPHA) / total).ln()).collect()
            })
            .collect();

        debug!(
            documents = corpus.len(),
            terms = n_terms,
            classes = classes.len(),
            "Trained naive Bayes payload classifier"
        );

        Self {
            vocabulary,
            idf,
            classes,
            class_log_prior,
            feature_log_prob,
            fallback: RuleClassifier::default_rules(),
        }
    }

    /// Joint log-likelihood per class, in `classes` order.
    fn scores(&self, text: &str) -> Vec<f64> {
        let features = weigh(&tokenize(text), &self.vocabulary, &self.idf);
        self.class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_probs)| {
                prior
                    + features
                        .iter()
                        .map(|&(term, weight)| weight * log_probs[term])
                        .sum::<f64>()
            })
            .collect()
    }
}

impl Default for NaiveBayesClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for NaiveBayesClassifier {
    fn name(&self) -> &str {
        "statistical"
    }

    fn classify(&self, text: &str) -> Category {
        let scores = self.scores(text);
        let Some(best) = scores.iter().copied().reduce(f64::max) else {
            return self.fallback.classify(text);
        };

        let tolerance = TIE_EPSILON * best.abs().max(1.0);
        let mut leaders = scores
            .iter()
            .zip(&self.classes)
            .filter(|(score, _)| (best - **score).abs() <= tolerance)
            .map(|(_, class)| *class);

        match (leaders.next(), leaders.next()) {
            (Some(class), None) => {
                debug!(category = %class, score = best, "Naive Bayes prediction");
                class
            }
            _ => {
                let class = self.fallback.classify(text);
                debug!(category = %class, "Naive Bayes tie, deferring to prefix rules");
                class
            }
        }
    }
}

/// Sparse L2-normalized TF-IDF vector; unknown tokens are dropped.
fn weigh(tokens: &[String], vocabulary: &HashMap<String, usize>, idf: &[f64]) -> Vec<(usize, f64)> {
    let mut counts: Vec<(usize, f64)> = Vec::new();
    for token in tokens {
        let Some(&term) = vocabulary.get(token) else {
            continue;
        };
        match counts.iter_mut().find(|(t, _)| *t == term) {
            Some((_, count)) => *count += 1.0,
            None => counts.push((term, 1.0)),
        }
    }

    for (term, weight) in counts.iter_mut() {
        *weight *= idf[*term];
    }

    let norm = counts.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, weight) in counts.iter_mut() {
            *weight /= norm;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_lowercases_and_drops_short_tokens() {
        assert_eq!(
            tokenize("WIFI:S:HomeNetwork;T:WPA;P:123456;;"),
            vec!["wifi", "homenetwork", "wpa", "123456"]
        );
        assert!(tokenize("a b c").is_empty());
    }

    #[test]
    fn weights_are_unit_length() {
        let model = NaiveBayesClassifier::new();
        let weights = weigh(
            &tokenize("https://example.com"),
            &model.vocabulary,
            &model.idf,
        );
        let norm: f64 = weights.iter().map(|(_, w)| w * w).sum();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn training_corpus_predictions() {
        // SMS and vCard exemplars share `1234567890` / `tel` with the phone
        // exemplars, and PhoneNumber carries twice their prior.
        let model = NaiveBayesClassifier::new();
        let predicted: Vec<(&str, Category)> = TRAINING_CORPUS
            .iter()
            .map(|&(text, _)| (text, model.classify(text)))
            .collect();
        assert_eq!(
            predicted,
            vec![
                ("https://example.com", Category::Url),
                ("http://google.com", Category::Url),
                ("WIFI:S:HomeNetwork;T:WPA;P:123456;;", Category::WifiConfig),
                ("WIFI", Category::WifiConfig),
                ("SMSTO:+1234567890:Hello there", Category::PhoneNumber),
                ("BEGIN:VCARD\nFN:John Doe\nTEL:1234", Category::PhoneNumber),
                ("mailto:someone@example.com", Category::Email),
                (
                    "MATMSG:TO:email@example.com;SUB:Test;BODY:Hello;;",
                    Category::Email,
                ),
                ("tel:+1234567890", Category::PhoneNumber),
                ("tel:+977", Category::PhoneNumber),
                ("geo:37.7749,-122.4194", Category::Geo),
                ("Just some random text here", Category::Text),
            ]
        );
    }

    #[test]
    fn generalizes_on_known_scheme_tokens() {
        let model = NaiveBayesClassifier::new();
        assert_eq!(model.classify("http://rust-lang.org"), Category::Url);
    }

    #[test]
    fn empty_input_ties_and_defers_to_rules() {
        // No known tokens: only the priors remain, and four labels share
        // the largest prior.
        let model = NaiveBayesClassifier::new();
        assert_eq!(model.classify(""), Category::Text);
        assert_eq!(model.classify("???"), Category::Text);
    }

    #[test]
    fn empty_corpus_always_defers_to_rules() {
        let model = NaiveBayesClassifier::train(&[]);
        assert_eq!(model.classify("https://example.com"), Category::Url);
        assert_eq!(model.classify("anything"), Category::Text);
    }

    #[test]
    fn single_class_corpus_predicts_that_class() {
        let model = NaiveBayesClassifier::train(&[("geo:1,2", Category::Geo)]);
        assert_eq!(model.classify("hello"), Category::Geo);
    }
}
