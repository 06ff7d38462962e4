//! Sector taxonomy used to label issuers from their company description.
//!
//! The taxonomy is an ordered list: declaration order is the tie-break order
//! when two sectors reach the same keyword score.

use super::errors::TaxonomyError;
use serde::Deserialize;

/// Label returned when no sector keyword matches.
pub const UNKNOWN_SECTOR: &str = "Unknown";

/// Reference taxonomy, in declaration order.
const REFERENCE_SECTORS: &[(&str, &[&str])] = &[
    (
        "Mining",
        &[
            "mining",
            "granite",
            "stone",
            "ores",
            "natural resources",
            "minerals",
            "quarry",
            "excavation",
        ],
    ),
    (
        "Technology",
        &[
            "software",
            "it",
            "technology",
            "digital",
            "it services",
            "tech",
            "saas",
            "cloud computing",
        ],
    ),
    (
        "Pharmaceuticals",
        &[
            "pharmaceutical",
            "biotech",
            "laboratory",
            "clinical",
            "drug",
            "medicine",
            "healthcare",
        ],
    ),
    (
        "Finance",
        &[
            "bank",
            "finance",
            "nbfc",
            "financial services",
            "investment",
            "lending",
            "credit",
        ],
    ),
    (
        "Infrastructure",
        &[
            "construction",
            "infrastructure",
            "real estate",
            "builder",
            "housing",
            "property",
        ],
    ),
    (
        "Energy",
        &[
            "energy",
            "power",
            "electricity",
            "solar",
            "renewable",
            "oil",
            "gas",
            "coal",
        ],
    ),
    (
        "Consumer Goods",
        &[
            "fmcg",
            "consumer goods",
            "consumer products",
            "retail",
            "e-commerce",
        ],
    ),
    (
        "Automobiles",
        &["automobile", "auto", "vehicle", "car", "bike", "automotive"],
    ),
    (
        "Chemical",
        &["chemical", "fertilizer", "agrochemical", "pesticide"],
    ),
    (
        "Telecom",
        &["telecom", "telecommunication", "mobile", "network"],
    ),
    (
        "Media",
        &["media", "entertainment", "broadcasting", "film", "content"],
    ),
    (
        "Manufacturing",
        &["manufacturing", "production", "factory", "industrial"],
    ),
    (
        "Textiles",
        &["textile", "apparel", "garment", "fabric", "clothing"],
    ),
    (
        "Education",
        &[
            "education",
            "training",
            "learning",
            "institute",
            "school",
            "college",
        ],
    ),
    (
        "Logistics",
        &[
            "logistics",
            "transportation",
            "shipping",
            "supply chain",
            "courier",
        ],
    ),
];

/// One sector and its lowercase keywords
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sector {
    name: String,
    keywords: Vec<String>,
}

impl Sector {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Number of distinct keywords occurring in `normalized` (already lowercase).
    pub fn score(&self, normalized: &str) -> usize {
        self.keywords
            .iter()
            .filter(|k| normalized.contains(k.as_str()))
            .count()
    }
}

/// Immutable, ordered mapping from sector name to keyword set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorTaxonomy {
    sectors: Vec<Sector>,
}

#[derive(Debug, Deserialize)]
struct TaxonomyFile {
    sectors: Vec<SectorEntry>,
}

#[derive(Debug, Deserialize)]
struct SectorEntry {
    name: String,
    keywords: Vec<String>,
}

impl SectorTaxonomy {
    /// Build a taxonomy from `(name, keywords)` pairs, in the given order.
    ///
    /// Keywords are trimmed, lowercased and de-duplicated per sector.
    pub fn new<N, K, I>(entries: I) -> Result<Self, TaxonomyError>
    where
        N: Into<String>,
        K: AsRef<str>,
        I: IntoIterator<Item = (N, Vec<K>)>,
    {
        let mut sectors: Vec<Sector> = Vec::new();

        for (name, raw_keywords) in entries {
            let name = name.into().trim().to_string();
            if sectors.iter().any(|s| s.name == name) {
                return Err(TaxonomyError::DuplicateSector { sector: name });
            }

            let mut keywords: Vec<String> = Vec::with_capacity(raw_keywords.len());
            for keyword in raw_keywords {
                let keyword = keyword.as_ref().trim().to_lowercase();
                if !keyword.is_empty() && !keywords.contains(&keyword) {
                    keywords.push(keyword);
                }
            }

            if keywords.is_empty() {
                return Err(TaxonomyError::NoKeywords { sector: name });
            }
            sectors.push(Sector { name, keywords });
        }

        if sectors.is_empty() {
            return Err(TaxonomyError::Empty);
        }

        Ok(Self { sectors })
    }

    /// The built-in fifteen-sector taxonomy.
    pub fn reference() -> Self {
        let sectors = REFERENCE_SECTORS
            .iter()
            .map(|(name, keywords)| Sector {
                name: (*name).to_string(),
                keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            })
            .collect();
        Self { sectors }
    }

    /// Parse a TOML document of `[[sectors]]` tables with `name` and `keywords`.
    pub fn from_toml_str(content: &str) -> Result<Self, TaxonomyError> {
        let file: TaxonomyFile = toml::from_str(content).map_err(|e| TaxonomyError::Parse {
            reason: e.to_string(),
        })?;
        Self::new(file.sectors.into_iter().map(|s| (s.name, s.keywords)))
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }
}

impl Default for SectorTaxonomy {
    fn default() -> Self {
        Self::reference()
    }
}
