use super::ClassifierConfig;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum UrgencyLexiconError {
    Io(std::io::Error),
    Csv(csv::Error),
    UnknownTier { tier: String, term: String },
}

impl std::fmt::Display for UrgencyLexiconError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UrgencyLexiconError::Io(err) => write!(f, "failed to read lexicon file: {err}"),
            UrgencyLexiconError::Csv(err) => write!(f, "invalid lexicon CSV data: {err}"),
            UrgencyLexiconError::UnknownTier { tier, term } => write!(
                f,
                "unknown urgency tier '{tier}' for term '{term}' (expected critical, high, or medium)"
            ),
        }
    }
}

impl std::error::Error for UrgencyLexiconError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UrgencyLexiconError::Io(err) => Some(err),
            UrgencyLexiconError::Csv(err) => Some(err),
            UrgencyLexiconError::UnknownTier { .. } => None,
        }
    }
}

impl From<std::io::Error> for UrgencyLexiconError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for UrgencyLexiconError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads `tier,term` CSV rows into a classifier configuration so deployments
/// can swap the keyword vocabulary without a rebuild.
pub struct UrgencyLexicon;

impl UrgencyLexicon {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ClassifierConfig, UrgencyLexiconError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<ClassifierConfig, UrgencyLexiconError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut config = ClassifierConfig::empty();
        for row in csv_reader.deserialize::<LexiconRow>() {
            let row = row?;
            let term = row.term.to_lowercase();
            if term.is_empty() {
                continue;
            }

            // Low is the default tier and carries no keywords by definition.
            match row.tier.to_lowercase().as_str() {
                "critical" => config.critical_terms.push(term),
                "high" => config.high_terms.push(term),
                "medium" => config.medium_terms.push(term),
                other => {
                    return Err(UrgencyLexiconError::UnknownTier {
                        tier: other.to_string(),
                        term,
                    })
                }
            }
        }

        Ok(config)
    }
}

#[derive(Debug, Deserialize)]
struct LexiconRow {
    #[serde(rename = "Tier")]
    tier: String,
    #[serde(rename = "Term")]
    term: String,
}
