
use log::error;
use serde::Serialize;

/// Machine-readable category attached to every analysis failure
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, strum_macros::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Structural VCF problems: empty, no format marker, no header, no INFO column, no GENE annotations
    InvalidVcfFormat,
    /// Data lines exist, but none carry a STAR= annotation
    MissingStarAnnotation,
    /// Every gene referenced in the file is outside the supported set
    UnsupportedGene,
    /// Empty or missing drug selection
    NoDrugSelected,
    /// Malformed drug selection payload or a missing file
    ValidationError,
    /// Upload exceeds the configured limit
    FileTooLarge,
    /// Upload does not have a .vcf extension
    InvalidFileType,
    /// Upload could not be read
    FileUploadError,
    /// Anything unexpected; never carries internal detail
    InternalServerError
}

impl ErrorKind {
    /// The HTTP status a front end should report for this kind
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::FileTooLarge => 413,
            ErrorKind::InternalServerError => 500,
            _ => 400
        }
    }
}

/// Error surfaced to the caller of an analysis, mirrors the failure envelope
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("{kind}: {message}")]
pub struct AnalysisError {
    kind: ErrorKind,
    message: String,
    details: Option<String>
}

impl AnalysisError {
    pub fn new(kind: ErrorKind, message: &str, details: Option<&str>) -> AnalysisError {
        AnalysisError {
            kind,
            message: message.to_string(),
            details: details.map(|d| d.to_string())
        }
    }

    /// Wraps an unexpected failure. The detail goes to the log, the caller only sees a generic message.
    /// # Arguments
    /// * `detail` - the underlying failure
    pub fn internal(detail: &dyn std::fmt::Display) -> AnalysisError {
        error!("Internal error during analysis: {detail}");
        AnalysisError {
            kind: ErrorKind::InternalServerError,
            message: "Something went wrong.".to_string(),
            details: None
        }
    }

    // getters
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(ErrorKind::InvalidVcfFormat.to_string(), "INVALID_VCF_FORMAT");
        assert_eq!(ErrorKind::MissingStarAnnotation.to_string(), "MISSING_STAR_ANNOTATION");
        assert_eq!(serde_json::to_string(&ErrorKind::UnsupportedGene).unwrap(), "\"UNSUPPORTED_GENE\"");
        assert_eq!(serde_json::to_string(&ErrorKind::NoDrugSelected).unwrap(), "\"NO_DRUG_SELECTED\"");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::FileTooLarge.status_code(), 413);
        assert_eq!(ErrorKind::InternalServerError.status_code(), 500);
        assert_eq!(ErrorKind::InvalidFileType.status_code(), 400);
        assert_eq!(ErrorKind::ValidationError.status_code(), 400);
    }

    #[test]
    fn test_internal_hides_detail() {
        let err = AnalysisError::internal(&"disk exploded at /secret/path");
        assert_eq!(err.kind(), ErrorKind::InternalServerError);
        assert_eq!(err.message(), "Something went wrong.");
        assert_eq!(err.details(), None);
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_display() {
        let err = AnalysisError::new(ErrorKind::InvalidVcfFormat, "VCF file is empty.", Some("The uploaded file contains no data."));
        assert_eq!(err.to_string(), "INVALID_VCF_FORMAT: VCF file is empty.");
        assert_eq!(err.details(), Some("The uploaded file contains no data."));
    }
}
