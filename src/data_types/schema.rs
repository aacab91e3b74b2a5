
use serde_json::Value;
use simple_error::{SimpleError, bail};

use crate::data_types::analysis_result::AnalysisResult;

/// Top-level fields every result must carry
const REQUIRED_FIELDS: [&str; 8] = [
    "patient_id",
    "drug",
    "timestamp",
    "risk_assessment",
    "pharmacogenomic_profile",
    "clinical_recommendation",
    "llm_generated_explanation",
    "quality_metrics"
];

/// Checks the serialized shape of a result.
/// The diplotype is allowed to be null, but the key itself must exist.
/// # Errors
/// * if serialization fails or any required field is missing or empty
pub fn validate_result_schema(result: &AnalysisResult) -> Result<(), SimpleError> {
    let value = serde_json::to_value(result)
        .map_err(|e| SimpleError::new(format!("Result could not be serialized: {e}")))?;
    validate_schema_value(&value)
}

/// Same as `validate_result_schema`, but on an already serialized value
pub fn validate_schema_value(value: &Value) -> Result<(), SimpleError> {
    let object = match value.as_object() {
        Some(o) => o,
        None => bail!("Result is not an object")
    };

    let missing_fields: Vec<&str> = REQUIRED_FIELDS.iter()
        .filter(|&&field| !object.contains_key(field))
        .cloned()
        .collect();
    if !missing_fields.is_empty() {
        bail!("Missing top-level fields: {}", missing_fields.join(", "));
    }

    let risk_assessment = &value["risk_assessment"];
    if !is_non_empty_str(&risk_assessment["risk_label"]) || !is_non_empty_str(&risk_assessment["severity"]) {
        bail!("Missing fields in risk_assessment");
    }

    let profile = match value["pharmacogenomic_profile"].as_object() {
        Some(p) => p,
        None => bail!("Missing fields in pharmacogenomic_profile")
    };
    if ["primary_gene", "diplotype", "phenotype"].iter().any(|&f| !profile.contains_key(f)) {
        bail!("Missing fields in pharmacogenomic_profile");
    }
    if !profile.get("detected_variants").is_some_and(|v| v.is_array()) {
        bail!("detected_variants must be an array");
    }

    let explanation = &value["llm_generated_explanation"];
    if ["summary", "mechanism", "clinical_impact"].iter().any(|&f| !is_non_empty_str(&explanation[f])) {
        bail!("Missing fields in llm_generated_explanation");
    }

    Ok(())
}

fn is_non_empty_str(value: &Value) -> bool {
    value.as_str().is_some_and(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_value() -> Value {
        json!({
            "patient_id": "PATIENT_1",
            "drug": "CODEINE",
            "timestamp": "2026-01-01T00:00:00.000Z",
            "risk_assessment": { "risk_label": "Safe", "confidence_score": 0.95, "severity": "none" },
            "pharmacogenomic_profile": { "primary_gene": "CYP2D6", "diplotype": null, "phenotype": "NM", "detected_variants": [] },
            "clinical_recommendation": { "text": "x", "source": "CPIC Guidelines" },
            "llm_generated_explanation": { "summary": "a", "mechanism": "b", "clinical_impact": "c" },
            "quality_metrics": {}
        })
    }

    #[test]
    fn test_valid() {
        assert!(validate_schema_value(&valid_value()).is_ok());
    }

    #[test]
    fn test_missing_top_level() {
        let mut value = valid_value();
        value.as_object_mut().unwrap().remove("timestamp");
        value.as_object_mut().unwrap().remove("drug");
        let err = validate_schema_value(&value).unwrap_err();
        assert_eq!(err.as_str(), "Missing top-level fields: drug, timestamp");
    }

    #[test]
    fn test_nested_failures() {
        let mut value = valid_value();
        value["pharmacogenomic_profile"]["detected_variants"] = json!("none");
        assert_eq!(validate_schema_value(&value).unwrap_err().as_str(), "detected_variants must be an array");

        let mut value = valid_value();
        value["pharmacogenomic_profile"].as_object_mut().unwrap().remove("diplotype");
        assert_eq!(validate_schema_value(&value).unwrap_err().as_str(), "Missing fields in pharmacogenomic_profile");

        let mut value = valid_value();
        value["risk_assessment"]["severity"] = json!("");
        assert_eq!(validate_schema_value(&value).unwrap_err().as_str(), "Missing fields in risk_assessment");

        let mut value = valid_value();
        value["llm_generated_explanation"]["mechanism"] = Value::Null;
        assert_eq!(validate_schema_value(&value).unwrap_err().as_str(), "Missing fields in llm_generated_explanation");
    }
}
