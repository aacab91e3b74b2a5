
/// Chat-completion backed explanation generator
pub mod llm_client;

use serde::{Deserialize, Serialize};

/// Summary text of the deterministic fallback, also used to detect that generation failed
pub const FALLBACK_SUMMARY: &str = "LLM explanation unavailable.";
const FALLBACK_MECHANISM: &str = "Deterministic pharmacogenomic interpretation used.";
const FALLBACK_CLINICAL_IMPACT: &str = "Refer to CPIC recommendation above.";

/// Three-part narrative attached to each result
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Explanation {
    pub summary: String,
    pub mechanism: String,
    pub clinical_impact: String
}

impl Explanation {
    pub fn new(summary: &str, mechanism: &str, clinical_impact: &str) -> Explanation {
        Explanation {
            summary: summary.to_string(),
            mechanism: mechanism.to_string(),
            clinical_impact: clinical_impact.to_string()
        }
    }

    /// The fixed text used whenever a generated explanation is unavailable
    pub fn fallback() -> Explanation {
        Explanation::new(FALLBACK_SUMMARY, FALLBACK_MECHANISM, FALLBACK_CLINICAL_IMPACT)
    }

    /// Placeholder for drugs outside the supported set
    pub fn not_applicable() -> Explanation {
        Explanation::new("N/A", "N/A", "N/A")
    }

    /// True if all three fields carry text
    pub fn is_complete(&self) -> bool {
        !self.summary.trim().is_empty() &&
            !self.mechanism.trim().is_empty() &&
            !self.clinical_impact.trim().is_empty()
    }

    /// True unless this is the fallback text
    pub fn is_generated(&self) -> bool {
        self.summary != FALLBACK_SUMMARY
    }
}

/// Clinical context handed to the generator for one drug
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExplanationContext {
    pub gene: String,
    pub diplotype: String,
    pub phenotype: String,
    pub drug: String,
    pub risk: String,
    pub recommendation: String
}

/// Anything that can produce an explanation. Implementations must never fail; any problem is reported as `Explanation::fallback()`.
pub trait ExplanationGenerator {
    fn generate(&self, context: &ExplanationContext) -> Explanation;
}

/// Generator that always returns the fallback, used when generation is disabled
#[derive(Clone, Copy, Debug, Default)]
pub struct FallbackExplainer;

impl ExplanationGenerator for FallbackExplainer {
    fn generate(&self, _context: &ExplanationContext) -> Explanation {
        Explanation::fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback() {
        let fallback = Explanation::fallback();
        assert_eq!(fallback.summary, "LLM explanation unavailable.");
        assert_eq!(fallback.mechanism, "Deterministic pharmacogenomic interpretation used.");
        assert_eq!(fallback.clinical_impact, "Refer to CPIC recommendation above.");
        assert!(!fallback.is_generated());
        assert!(fallback.is_complete());
    }

    #[test]
    fn test_is_complete() {
        assert!(Explanation::new("a", "b", "c").is_complete());
        assert!(!Explanation::new("a", " ", "c").is_complete());
        assert!(Explanation::not_applicable().is_generated());
    }
}
