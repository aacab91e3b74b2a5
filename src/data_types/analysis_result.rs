
use serde::Serialize;

use crate::data_types::pgx_variant::PgxVariant;
use crate::data_types::risk_label::RiskLabel;
use crate::errors::AnalysisError;
use crate::explanation::Explanation;

/// The full per-drug record, intended to be serialized to JSON
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Opaque display token, not a stable identity
    pub patient_id: String,
    pub drug: String,
    /// RFC 3339 UTC time of assembly
    pub timestamp: String,
    pub risk_assessment: RiskAssessment,
    pub pharmacogenomic_profile: PharmacogenomicProfile,
    pub clinical_recommendation: ClinicalRecommendation,
    pub llm_generated_explanation: Explanation,
    pub quality_metrics: QualityMetrics
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub risk_label: RiskLabel,
    /// Binary: 0.95 when the gene was detected, 0.0 otherwise
    pub confidence_score: f64,
    pub severity: String
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PharmacogenomicProfile {
    pub primary_gene: String,
    /// Always serialized, null when no diplotype could be built
    pub diplotype: Option<String>,
    pub phenotype: String,
    pub detected_variants: Vec<DetectedVariant>
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetectedVariant {
    /// "N/A" when the line had no RS= entry
    pub rsid: String,
    pub star: String
}

impl From<&PgxVariant> for DetectedVariant {
    fn from(variant: &PgxVariant) -> Self {
        DetectedVariant {
            rsid: variant.rs().unwrap_or("N/A").to_string(),
            star: variant.star().to_string()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClinicalRecommendation {
    pub text: String,
    pub source: String
}

/// Which pipeline stages succeeded for one result
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct QualityMetrics {
    pub vcf_parsing_success: bool,
    pub gene_detected: bool,
    pub phenotype_lookup_success: bool,
    pub risk_rule_applied: bool,
    /// The risk table and the guideline table agreed on the label
    pub cpic_alignment_verified: bool,
    pub llm_generation_success: bool
}

/// Response body for an analysis request, mirrors the JSON envelope of the web API
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Success {
        success: bool,
        analysis_results: Vec<AnalysisResult>
    },
    Failure {
        success: bool,
        error: ErrorBody
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    pub details: Option<String>
}

impl AnalysisResponse {
    pub fn success(analysis_results: Vec<AnalysisResult>) -> AnalysisResponse {
        AnalysisResponse::Success {
            success: true,
            analysis_results
        }
    }

    pub fn failure(error: &AnalysisError) -> AnalysisResponse {
        AnalysisResponse::Failure {
            success: false,
            error: ErrorBody {
                error_type: error.kind().to_string(),
                message: error.message().to_string(),
                details: error.details().map(|d| d.to_string())
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisResponse::Success { .. })
    }
}

impl From<Result<Vec<AnalysisResult>, AnalysisError>> for AnalysisResponse {
    fn from(result: Result<Vec<AnalysisResult>, AnalysisError>) -> Self {
        match result {
            Ok(results) => AnalysisResponse::success(results),
            Err(e) => AnalysisResponse::failure(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_detected_variant() {
        let with_rs = DetectedVariant::from(&PgxVariant::new("CYP2D6", "*4", Some("rs3892097")));
        assert_eq!(with_rs.rsid, "rs3892097");
        let without_rs = DetectedVariant::from(&PgxVariant::new("CYP2D6", "*4", None));
        assert_eq!(without_rs.rsid, "N/A");
        assert_eq!(without_rs.star, "*4");
    }

    #[test]
    fn test_failure_envelope() {
        let err = AnalysisError::new(ErrorKind::UnsupportedGene, "Uploaded gene is not supported.", Some("Supported genes: TPMT."));
        let response = AnalysisResponse::from(Err(err));
        assert!(!response.is_success());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["type"], "UNSUPPORTED_GENE");
        assert_eq!(value["error"]["message"], "Uploaded gene is not supported.");
        assert_eq!(value["error"]["details"], "Supported genes: TPMT.");
    }

    #[test]
    fn test_failure_null_details() {
        let err = AnalysisError::new(ErrorKind::NoDrugSelected, "Please select at least one drug.", None);
        let value = serde_json::to_value(AnalysisResponse::failure(&err)).unwrap();
        assert!(value["error"]["details"].is_null());
        assert!(value["error"].as_object().unwrap().contains_key("details"));
    }

    #[test]
    fn test_success_envelope() {
        let value = serde_json::to_value(AnalysisResponse::success(vec![])).unwrap();
        assert_eq!(value["success"], true);
        assert!(value["analysis_results"].as_array().unwrap().is_empty());
    }
}
