mod config;
mod lexicon;

pub use config::ClassifierConfig;
pub use lexicon::{UrgencyLexicon, UrgencyLexiconError};

use super::domain::UrgencyTier;

/// Stateless keyword matcher assigning a severity tier to free text.
///
/// Matching is case-folded substring containment with first-match-wins
/// precedence Critical > High > Medium; text matching no tier is Low. The
/// function is pure: no I/O, same input always yields the same tier.
#[derive(Debug, Clone)]
pub struct UrgencyClassifier {
    critical_terms: Vec<String>,
    high_terms: Vec<String>,
    medium_terms: Vec<String>,
}

impl UrgencyClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            critical_terms: normalize(config.critical_terms),
            high_terms: normalize(config.high_terms),
            medium_terms: normalize(config.medium_terms),
        }
    }

    /// Classify already-concatenated text.
    pub fn classify(&self, text: &str) -> UrgencyTier {
        let folded = text.to_lowercase();
        if contains_any(&folded, &self.critical_terms) {
            UrgencyTier::Critical
        } else if contains_any(&folded, &self.high_terms) {
            UrgencyTier::High
        } else if contains_any(&folded, &self.medium_terms) {
            UrgencyTier::Medium
        } else {
            UrgencyTier::Low
        }
    }

    /// Classify a report's title and description together, the way intake
    /// does at submission time.
    pub fn classify_report(&self, title: &str, description: &str) -> UrgencyTier {
        self.classify(&format!("{title} {description}"))
    }
}

impl Default for UrgencyClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

fn normalize(terms: Vec<String>) -> Vec<String> {
    terms
        .into_iter()
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

fn contains_any(text: &str, terms: &[String]) -> bool {
    terms.iter().any(|term| text.contains(term.as_str()))
}
