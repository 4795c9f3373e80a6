//! Read-only text content, parsed once at startup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

const PRECAUTIONS_JSON: &str = include_str!("precautions.json");
const EDUCATION_JSON: &str = include_str!("education.json");

/// Lower-cased disorder label → ordered precaution tips.
#[derive(Debug, Clone, Default)]
pub struct PrecautionTable(HashMap<String, Vec<String>>);

impl PrecautionTable {
    /// Keys are normalised on construction so lookups only need to
    /// normalise the query side.
    pub fn new(entries: HashMap<String, Vec<String>>) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(label, tips)| (label.trim().to_lowercase(), tips))
                .collect(),
        )
    }

    pub fn get(&self, normalised_label: &str) -> Option<&[String]> {
        self.0.get(normalised_label).map(Vec::as_slice)
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationSection {
    pub heading: String,
    pub points: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub title: String,
    pub summary: String,
    pub sections: Vec<EducationSection>,
}

#[derive(Debug, Clone)]
pub struct StaticContent {
    pub precautions: PrecautionTable,
    pub education: Education,
}

impl StaticContent {
    pub fn load() -> Result<Self, serde_json::Error> {
        let precautions: HashMap<String, Vec<String>> = serde_json::from_str(PRECAUTIONS_JSON)?;
        let education: Education = serde_json::from_str(EDUCATION_JSON)?;
        let precautions = PrecautionTable::new(precautions);
        tracing::info!(
            "Loaded precautions for {} labels and {} education sections",
            precautions.len(),
            education.sections.len()
        );
        Ok(Self {
            precautions,
            education,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_content_parses() {
        let content = StaticContent::load().unwrap();
        assert_eq!(content.precautions.len(), 6);
        assert_eq!(content.precautions.get("parkinson disease").unwrap().len(), 7);
        assert_eq!(content.education.sections.len(), 3);
    }

    #[test]
    fn keys_are_normalised() {
        let table = PrecautionTable::new(HashMap::from([(
            " Essential Tremor ".to_string(),
            vec!["Avoid caffeine.".to_string()],
        )]));
        assert!(table.get("essential tremor").is_some());
        assert!(table.get("Essential Tremor").is_none());
    }

    #[test]
    fn every_tip_starts_with_a_symbol() {
        let content = StaticContent::load().unwrap();
        for tips in content.precautions.0.values() {
            for tip in tips {
                let first = tip.chars().next().unwrap();
                assert!(!first.is_ascii(), "tip without leading symbol: {tip}");
                assert!(tip.contains(' '));
            }
        }
    }
}
