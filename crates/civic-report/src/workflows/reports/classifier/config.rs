use serde::{Deserialize, Serialize};

/// Keyword tiers backing the urgency classifier.
///
/// This is configuration data, not logic: the sets can be replaced wholesale
/// (e.g. from a lexicon CSV) without touching the matching algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub critical_terms: Vec<String>,
    pub high_terms: Vec<String>,
    pub medium_terms: Vec<String>,
}

impl ClassifierConfig {
    /// Configuration with no keywords at all; every text classifies Low.
    pub fn empty() -> Self {
        Self {
            critical_terms: Vec::new(),
            high_terms: Vec::new(),
            medium_terms: Vec::new(),
        }
    }
}

impl Default for ClassifierConfig {
    // Reference vocabulary from the municipal deployment this service grew
    // out of: life-threatening emergencies, serious hazards, and nuisance
    // infrastructure complaints, in Indonesian.
    fn default() -> Self {
        Self {
            critical_terms: terms(&[
                "kebakaran",
                "pembunuhan",
                "begal",
                "tenggelam",
                "darurat",
                "korban",
                "jiwa",
            ]),
            high_terms: terms(&[
                "banjir",
                "longsor",
                "kecelakaan",
                "pencurian",
                "rampok",
                "hanyut",
            ]),
            medium_terms: terms(&[
                "macet",
                "sampah",
                "jalan rusak",
                "lampu mati",
                "berlubang",
                "pohon tumbang",
            ]),
        }
    }
}

fn terms(list: &[&str]) -> Vec<String> {
    list.iter().map(|term| (*term).to_string()).collect()
}
