//! Keyword-scored sector classification of company descriptions
//!
//! Each sector scores one point per distinct keyword found as a substring of
//! the lowercased description. The highest score wins; ties go to the sector
//! declared first in the taxonomy.
//!
//! # Example
//! ```rust
//! use ipotrack::application::sector_classifier::SectorClassifier;
//!
//! let classifier = SectorClassifier::default();
//! let sector = classifier.classify(Some("We manufacture solar panels and provide renewable power solutions"));
//! assert_eq!(sector, "Energy");
//! ```

use crate::domain::sector::{SectorTaxonomy, UNKNOWN_SECTOR};
use serde::Serialize;
use std::sync::Arc;

/// Keyword hits of one sector for a given text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectorScore {
    pub sector: String,
    pub score: usize,
}

/// Classify `text` against `taxonomy`. Never fails: returns `"Unknown"` for
/// empty input or when no keyword matches.
pub fn classify_sector(text: Option<&str>, taxonomy: &SectorTaxonomy) -> String {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return UNKNOWN_SECTOR.to_string();
    };
    let normalized = text.to_lowercase();

    let mut best: Option<(&str, usize)> = None;
    for sector in taxonomy.sectors() {
        let score = sector.score(&normalized);
        // strict comparison keeps the earliest declared sector on ties
        if score > 0 && best.is_none_or(|(_, top)| score > top) {
            best = Some((sector.name(), score));
        }
    }

    best.map(|(name, _)| name.to_string())
        .unwrap_or_else(|| UNKNOWN_SECTOR.to_string())
}

/// Thread-safe classifier over a shared, immutable taxonomy.
#[derive(Debug, Clone)]
pub struct SectorClassifier {
    taxonomy: Arc<SectorTaxonomy>,
}

impl SectorClassifier {
    pub fn new(taxonomy: Arc<SectorTaxonomy>) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &SectorTaxonomy {
        &self.taxonomy
    }

    pub fn classify(&self, text: Option<&str>) -> String {
        classify_sector(text, &self.taxonomy)
    }

    /// Non-zero scores in taxonomy order, for explaining a classification.
    pub fn scores(&self, text: &str) -> Vec<SectorScore> {
        let normalized = text.to_lowercase();
        self.taxonomy
            .sectors()
            .iter()
            .map(|s| SectorScore {
                sector: s.name().to_string(),
                score: s.score(&normalized),
            })
            .filter(|s| s.score > 0)
            .collect()
    }
}

impl Default for SectorClassifier {
    fn default() -> Self {
        Self::new(Arc::new(SectorTaxonomy::reference()))
    }
}
