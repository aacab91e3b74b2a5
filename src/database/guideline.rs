
use serde::{Deserialize, Serialize};

use crate::data_types::risk_label::RiskLabel;

/// Severity reported when no guideline applies
pub const DEFAULT_SEVERITY: &str = "low";
/// Gene reported when the drug has no guideline at all
pub const UNKNOWN_GENE: &str = "Unknown";

/// Short phenotype codes and the long names CPIC tables tend to use
const PHENOTYPE_LONG_NAMES: [(&str, &str); 5] = [
    ("PM", "Poor"),
    ("IM", "Intermediate"),
    ("NM", "Normal"),
    ("RM", "Rapid"),
    ("UM", "Ultrarapid")
];

/// Returns the long phenotype name for a short code, e.g. "PM" -> "Poor"
pub fn long_phenotype_name(short_code: &str) -> Option<&'static str> {
    PHENOTYPE_LONG_NAMES.iter()
        .find(|&&(code, _long)| code == short_code)
        .map(|&(_code, long)| long)
}

/// One row of a drug's CPIC guideline, keyed by phenotype in the table file
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GuidelineEntry {
    /// Free text dosing recommendation
    pub recommendation: String,
    /// Risk category according to the guideline
    pub risk: RiskLabel,
    /// Free-form severity, e.g. "none", "moderate", "critical"
    pub severity: String
}

/// Guideline block for a single drug
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct DrugGuideline {
    /// The pharmacogene this guideline is written for
    pub gene: String,
    /// Map from phenotype to the guideline row
    #[serde(default)]
    pub mappings: std::collections::BTreeMap<String, GuidelineEntry>
}

/// The resolved recommendation for a (drug, phenotype) pair
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Guideline {
    recommendation: String,
    risk: RiskLabel,
    severity: String,
    gene: String
}

impl Guideline {
    /// Builds the result from a matched table row
    pub fn from_entry(entry: &GuidelineEntry, gene: &str) -> Guideline {
        Guideline {
            recommendation: entry.recommendation.clone(),
            risk: entry.risk,
            severity: entry.severity.clone(),
            gene: gene.to_string()
        }
    }

    /// Result when the drug has no guideline block
    pub fn no_guideline() -> Guideline {
        Guideline {
            recommendation: "No CPIC guideline available for this drug.".to_string(),
            risk: RiskLabel::Unknown,
            severity: DEFAULT_SEVERITY.to_string(),
            gene: UNKNOWN_GENE.to_string()
        }
    }

    /// Result when the drug is known but the phenotype has no row
    pub fn phenotype_not_found(gene: &str) -> Guideline {
        Guideline {
            recommendation: "Phenotype not found in CPIC guidelines.".to_string(),
            risk: RiskLabel::Unknown,
            severity: DEFAULT_SEVERITY.to_string(),
            gene: gene.to_string()
        }
    }

    // getters
    pub fn recommendation(&self) -> &str {
        &self.recommendation
    }

    pub fn risk(&self) -> RiskLabel {
        self.risk
    }

    pub fn severity(&self) -> &str {
        &self.severity
    }

    pub fn gene(&self) -> &str {
        &self.gene
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_phenotype_name() {
        assert_eq!(long_phenotype_name("PM"), Some("Poor"));
        assert_eq!(long_phenotype_name("UM"), Some("Ultrarapid"));
        assert_eq!(long_phenotype_name("Poor"), None);
        assert_eq!(long_phenotype_name("pm"), None);
    }

    #[test]
    fn test_defaults() {
        let none = Guideline::no_guideline();
        assert_eq!(none.risk(), RiskLabel::Unknown);
        assert_eq!(none.severity(), "low");
        assert_eq!(none.gene(), "Unknown");

        let missing = Guideline::phenotype_not_found("TPMT");
        assert_eq!(missing.gene(), "TPMT");
        assert_eq!(missing.recommendation(), "Phenotype not found in CPIC guidelines.");
    }
}
