
use log::debug;

use crate::errors::{AnalysisError, ErrorKind};

/// Required prefix of the first non-blank line
const FILE_FORMAT_PREFIX: &str = "##fileformat=VCF";
/// Required prefix of the column header line
const HEADER_PREFIX: &str = "#CHROM";

/// Checks the gross structure of raw VCF text before any parsing happens.
/// Checks run in order and the first failure is returned.
/// # Arguments
/// * `vcf_content` - the full text of the uploaded file
/// # Errors
/// * `INVALID_VCF_FORMAT` if the file is empty, lacks the format line, lacks the `#CHROM` header, lacks an INFO column, or no data line has a GENE= annotation
/// * `MISSING_STAR_ANNOTATION` if data lines have GENE= annotations but none have STAR=
pub fn validate_vcf_content(vcf_content: &str) -> Result<(), AnalysisError> {
    if vcf_content.trim().is_empty() {
        return Err(AnalysisError::new(
            ErrorKind::InvalidVcfFormat,
            "VCF file is empty.",
            Some("The uploaded file contains no data.")
        ));
    }

    let lines: Vec<&str> = vcf_content.lines().collect();

    let first_line = lines.iter().find(|l| !l.trim().is_empty());
    if !first_line.is_some_and(|l| l.starts_with(FILE_FORMAT_PREFIX)) {
        return Err(AnalysisError::new(
            ErrorKind::InvalidVcfFormat,
            "Invalid VCF format detected.",
            Some("File must start with '##fileformat=VCF'.")
        ));
    }

    let header_line = match lines.iter().find(|l| l.starts_with(HEADER_PREFIX)) {
        Some(hl) => hl,
        None => return Err(AnalysisError::new(
            ErrorKind::InvalidVcfFormat,
            "Invalid VCF format detected.",
            Some("Missing required header line starting with #CHROM.")
        ))
    };

    if !header_line.split_whitespace().any(|column| column == "INFO") {
        return Err(AnalysisError::new(
            ErrorKind::InvalidVcfFormat,
            "Invalid VCF format detected.",
            Some("INFO column missing in header.")
        ));
    }

    // GENE= and STAR= may come from different lines, we only need one of each somewhere
    let data_lines: Vec<&str> = lines.iter()
        .filter(|l| !l.starts_with('#') && !l.trim().is_empty())
        .cloned()
        .collect();
    debug!("Validating annotations on {} data lines", data_lines.len());

    if !data_lines.is_empty() {
        if !data_lines.iter().any(|l| l.contains("GENE=")) {
            return Err(AnalysisError::new(
                ErrorKind::InvalidVcfFormat,
                "Missing GENE annotations.",
                Some("VCF INFO column must contain 'GENE=Symbol' entries.")
            ));
        }
        if !data_lines.iter().any(|l| l.contains("STAR=")) {
            return Err(AnalysisError::new(
                ErrorKind::MissingStarAnnotation,
                "STAR allele annotation missing in VCF.",
                Some("Ensure STAR=*X format exists in INFO field.")
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n";

    fn kind_of(content: &str) -> ErrorKind {
        validate_vcf_content(content).unwrap_err().kind()
    }

    #[test]
    fn test_valid_file() {
        let content = format!("{HEADER}chr22\t100\trs123\tC\tT\t.\tPASS\tGENE=CYP2D6;STAR=*4;RS=rs123\n");
        assert!(validate_vcf_content(&content).is_ok());
    }

    #[test]
    fn test_header_only_is_valid() {
        assert!(validate_vcf_content(HEADER).is_ok());
    }

    #[test]
    fn test_empty() {
        let err = validate_vcf_content("  \n\t\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidVcfFormat);
        assert_eq!(err.message(), "VCF file is empty.");
    }

    #[test]
    fn test_missing_format_line() {
        let content = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n";
        assert_eq!(kind_of(content), ErrorKind::InvalidVcfFormat);

        // leading blank lines are skipped before the check
        let content = format!("\n\n{HEADER}");
        assert!(validate_vcf_content(&content).is_ok());
    }

    #[test]
    fn test_missing_header() {
        let err = validate_vcf_content("##fileformat=VCFv4.2\nchr1\t1\t.\tA\tG\t.\t.\tGENE=TPMT;STAR=*3A\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidVcfFormat);
        assert_eq!(err.details(), Some("Missing required header line starting with #CHROM."));
    }

    #[test]
    fn test_missing_info_column() {
        let err = validate_vcf_content("##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidVcfFormat);
        assert_eq!(err.details(), Some("INFO column missing in header."));
    }

    #[test]
    fn test_missing_gene() {
        let content = format!("{HEADER}chr1\t1\t.\tA\tG\t.\t.\tSTAR=*4\n");
        let err = validate_vcf_content(&content).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidVcfFormat);
        assert_eq!(err.message(), "Missing GENE annotations.");
    }

    #[test]
    fn test_missing_star() {
        let content = format!("{HEADER}chr1\t1\t.\tA\tG\t.\t.\tGENE=CYP2D6;RS=rs1\n");
        assert_eq!(kind_of(&content), ErrorKind::MissingStarAnnotation);
    }

    #[test]
    fn test_no_annotations_at_all() {
        // GENE is checked first
        let content = format!("{HEADER}chr1\t1\t.\tA\tG\t.\t.\tDP=10\n");
        assert_eq!(kind_of(&content), ErrorKind::InvalidVcfFormat);
    }

    #[test]
    fn test_split_annotations() {
        // GENE and STAR on different lines still passes the structural check
        let content = format!("{HEADER}chr1\t1\t.\tA\tG\t.\t.\tGENE=CYP2D6\nchr1\t2\t.\tA\tG\t.\t.\tSTAR=*4\n");
        assert!(validate_vcf_content(&content).is_ok());
    }
}
