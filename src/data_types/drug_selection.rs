
use log::debug;

use crate::errors::{AnalysisError, ErrorKind};

/// Normalizes a raw drug selection into a non-empty list of drug identifiers.
/// The payload may be a JSON array of strings, a JSON string, a comma-separated list, or a single name.
/// Entries are trimmed and empty entries dropped; case is left as provided.
/// # Arguments
/// * `raw_selection` - the selection as received, `None` if the caller sent nothing
/// # Errors
/// * `NO_DRUG_SELECTED` if the selection is missing or normalizes to nothing
/// * `VALIDATION_ERROR` if the payload is JSON but not a string or a list of strings
pub fn parse_drug_selection(raw_selection: Option<&str>) -> Result<Vec<String>, AnalysisError> {
    let raw = match raw_selection {
        Some(r) if !r.trim().is_empty() => r.trim(),
        _ => return Err(no_drug_selected())
    };

    let drugs: Vec<String> = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(values)) => {
            let mut drugs = Vec::with_capacity(values.len());
            for value in values.iter() {
                match value.as_str() {
                    Some(s) => drugs.push(s.trim().to_string()),
                    None => return Err(invalid_format())
                }
            }
            drugs
        },
        Ok(serde_json::Value::String(single)) => vec![single.trim().to_string()],
        Ok(other) => {
            debug!("Rejecting drug selection JSON: {other}");
            return Err(invalid_format());
        },
        // not JSON, so treat it as a comma-separated list
        Err(_) => raw.split(',')
            .map(|d| d.trim().to_string())
            .collect()
    };

    let drugs: Vec<String> = drugs.into_iter()
        .filter(|d| !d.is_empty())
        .collect();
    if drugs.is_empty() {
        return Err(no_drug_selected());
    }
    Ok(drugs)
}

fn no_drug_selected() -> AnalysisError {
    AnalysisError::new(ErrorKind::NoDrugSelected, "Please select at least one drug.", None)
}

fn invalid_format() -> AnalysisError {
    AnalysisError::new(
        ErrorKind::ValidationError,
        "Invalid drug selection format.",
        Some("Drugs must be a list or comma-separated string.")
    )
}
