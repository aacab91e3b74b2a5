
use itertools::Itertools;
use log::{debug, error, info, warn};
use rand::Rng;

use crate::data_types::analysis_result::{AnalysisResult, ClinicalRecommendation, DetectedVariant, PharmacogenomicProfile, QualityMetrics, RiskAssessment};
use crate::data_types::drug_selection::parse_drug_selection;
use crate::data_types::pgx_diplotype::{Diplotype, construct_diplotype};
use crate::data_types::risk_label::RiskLabel;
use crate::data_types::schema::validate_result_schema;
use crate::database::db_const::{SUPPORTED_GENE_LIST, gene_for_drug, is_supported_gene};
use crate::database::guideline::UNKNOWN_GENE;
use crate::database::pgx_tables::{PgxTables, UNKNOWN_PHENOTYPE};
use crate::errors::{AnalysisError, ErrorKind};
use crate::explanation::{Explanation, ExplanationContext, ExplanationGenerator};
use crate::vcf::parser::{ParsedVcf, parse_vcf, referenced_genes};
use crate::vcf::validator::validate_vcf_content;

/// Confidence reported when the gene was found in the file
const DETECTED_CONFIDENCE: f64 = 0.95;
/// Phenotype reported when the gene never appears in the file
const NOT_DETECTED_PHENOTYPE: &str = "Not Detected";
/// Patient marker used for drugs outside the supported set
const UNKNOWN_PATIENT_ID: &str = "PATIENT_UNKNOWN";
/// Severity reported when no guideline was consulted
const NO_SEVERITY: &str = "None";
const CPIC_SOURCE: &str = "CPIC Guidelines";
const SYSTEM_SOURCE: &str = "System";

/// Log target for disagreements between the risk table and the guideline table
pub const CROSS_CHECK_TARGET: &str = "pgx_cross_check";
/// Log target for results that fail the schema check
pub const SCHEMA_TARGET: &str = "pgx_schema";

/// The read-only collaborators shared by every request
pub struct AnalysisContext<'a> {
    tables: &'a PgxTables,
    explainer: &'a dyn ExplanationGenerator
}

impl<'a> AnalysisContext<'a> {
    pub fn new(tables: &'a PgxTables, explainer: &'a dyn ExplanationGenerator) -> AnalysisContext<'a> {
        AnalysisContext {
            tables,
            explainer
        }
    }
}

/// State that is computed once per request and shared by each drug
struct AnalysisRequest<'a> {
    /// Raw file text, used for the gene reference scan
    vcf_content: &'a str,
    parsed_vcf: ParsedVcf,
    /// Display token shared by all results of this request
    patient_id: String
}

/// This is the main function for analyzing one uploaded VCF against a drug selection.
/// The file is validated and parsed once, and then each drug is analyzed in the order provided.
/// # Arguments
/// * `context` - the lookup tables and explanation generator
/// * `vcf_content` - the raw text of the VCF
/// * `raw_drug_selection` - the drug selection as received, see `parse_drug_selection`
/// # Errors
/// * `INVALID_VCF_FORMAT` or `MISSING_STAR_ANNOTATION` if the VCF is structurally invalid
/// * `NO_DRUG_SELECTED` or `VALIDATION_ERROR` if the drug selection is empty or malformed
/// * `UNSUPPORTED_GENE` if the file only references genes outside the supported set
pub fn analyze_vcf(context: &AnalysisContext, vcf_content: &str, raw_drug_selection: Option<&str>) -> Result<Vec<AnalysisResult>, AnalysisError> {
    validate_vcf_content(vcf_content)?;
    let drugs: Vec<String> = parse_drug_selection(raw_drug_selection)?;
    info!("Analyzing {} drug(s): {}", drugs.len(), drugs.iter().join(", "));

    let parsed_vcf = parse_vcf(vcf_content);
    check_supported_genes(vcf_content, &parsed_vcf)?;

    let request = AnalysisRequest {
        vcf_content,
        parsed_vcf,
        patient_id: generate_patient_id()
    };

    let results: Vec<AnalysisResult> = drugs.iter()
        .map(|drug| analyze_drug(context, &request, drug))
        .collect();
    Ok(results)
}

/// Runs `analyze_vcf` for a front end. A panic anywhere in the analysis is reported as `INTERNAL_SERVER_ERROR`
/// with a generic message; the panic detail only goes to the log.
/// # Errors
/// * anything `analyze_vcf` returns
/// * `INTERNAL_SERVER_ERROR` if the analysis panicked
pub fn analyze_request(context: &AnalysisContext, vcf_content: &str, raw_drug_selection: Option<&str>) -> Result<Vec<AnalysisResult>, AnalysisError> {
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        analyze_vcf(context, vcf_content, raw_drug_selection)
    }));
    match outcome {
        Ok(result) => result,
        Err(payload) => {
            let detail: String = payload.downcast_ref::<&str>().map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            Err(AnalysisError::internal(&detail))
        }
    }
}

/// Fails the whole request if no supported gene produced variants and every gene referenced in the file is unsupported.
/// A file that references no genes at all passes; each drug will report the gene as not detected.
fn check_supported_genes(vcf_content: &str, parsed_vcf: &ParsedVcf) -> Result<(), AnalysisError> {
    if parsed_vcf.has_supported_variants() {
        return Ok(());
    }

    let detected_genes = referenced_genes(vcf_content);
    debug!("No supported variants found, referenced genes: {detected_genes:?}");
    if !detected_genes.is_empty() && !detected_genes.iter().any(|g| is_supported_gene(g)) {
        return Err(AnalysisError::new(
            ErrorKind::UnsupportedGene,
            "Uploaded gene is not supported.",
            Some(&format!("Supported genes: {}.", SUPPORTED_GENE_LIST.join(", ")))
        ));
    }
    Ok(())
}

/// Opaque per-request display token, not unique and not stable
fn generate_patient_id() -> String {
    format!("PATIENT_{}", rand::thread_rng().gen_range(0..1000))
}

fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Builds the result for a single drug
fn analyze_drug(context: &AnalysisContext, request: &AnalysisRequest, drug: &str) -> AnalysisResult {
    let gene: &str = match gene_for_drug(drug) {
        Some(g) => g,
        None => {
            info!("{drug} is not a supported drug, reporting as not applicable.");
            return not_applicable_result(drug);
        }
    };
    info!("Analyzing {drug} against {gene}...");

    let variants = request.parsed_vcf.variants(gene);
    let diplotype: Diplotype = if !variants.is_empty() {
        construct_diplotype(variants)
    } else if request.vcf_content.contains(&format!("GENE={gene}")) {
        // gene is present but carries no star alleles, so it is all reference
        debug!("{gene} is referenced without star alleles, assuming reference diplotype.");
        Diplotype::reference()
    } else {
        info!("{gene} was not found in the VCF.");
        return gene_not_detected_result(request, drug, gene);
    };

    let phenotype: String = context.tables.phenotype(gene, &diplotype);
    let risk_label: RiskLabel = context.tables.risk(drug, &phenotype);
    let guideline = context.tables.guideline(drug, &phenotype);
    debug!("{drug}: {gene} {diplotype} => {phenotype} => {risk_label}");

    let cpic_aligned = risk_label == guideline.risk();
    if !cpic_aligned {
        warn!(target: CROSS_CHECK_TARGET, "Risk mismatch for {drug}: risk table={risk_label} vs CPIC={}", guideline.risk());
    }

    let explanation_context = ExplanationContext {
        gene: gene.to_string(),
        diplotype: diplotype.diplotype().to_string(),
        phenotype: phenotype.clone(),
        drug: drug.to_string(),
        risk: risk_label.to_string(),
        recommendation: guideline.recommendation().to_string()
    };
    let explanation: Explanation = context.explainer.generate(&explanation_context);

    let quality_metrics = QualityMetrics {
        vcf_parsing_success: true,
        gene_detected: true,
        phenotype_lookup_success: phenotype != UNKNOWN_PHENOTYPE,
        risk_rule_applied: risk_label != RiskLabel::Unknown,
        cpic_alignment_verified: cpic_aligned,
        llm_generation_success: explanation.is_generated()
    };

    let result = AnalysisResult {
        patient_id: request.patient_id.clone(),
        drug: drug.to_string(),
        timestamp: current_timestamp(),
        risk_assessment: RiskAssessment {
            risk_label,
            confidence_score: DETECTED_CONFIDENCE,
            severity: guideline.severity().to_string()
        },
        pharmacogenomic_profile: PharmacogenomicProfile {
            primary_gene: gene.to_string(),
            diplotype: Some(diplotype.diplotype().to_string()),
            phenotype,
            detected_variants: variants.iter().map(DetectedVariant::from).collect()
        },
        clinical_recommendation: ClinicalRecommendation {
            text: guideline.recommendation().to_string(),
            source: CPIC_SOURCE.to_string()
        },
        llm_generated_explanation: explanation,
        quality_metrics
    };

    // lenient on purpose, a failure here is reported but never blocks the response
    if let Err(e) = validate_result_schema(&result) {
        error!(target: SCHEMA_TARGET, "Schema validation failed for {drug}: {e}");
    }
    result
}

/// Placeholder for a drug that has no gene mapping
fn not_applicable_result(drug: &str) -> AnalysisResult {
    AnalysisResult {
        patient_id: UNKNOWN_PATIENT_ID.to_string(),
        drug: drug.to_string(),
        timestamp: current_timestamp(),
        risk_assessment: RiskAssessment {
            risk_label: RiskLabel::NotApplicable,
            confidence_score: 0.0,
            severity: NO_SEVERITY.to_string()
        },
        pharmacogenomic_profile: PharmacogenomicProfile {
            primary_gene: UNKNOWN_GENE.to_string(),
            diplotype: None,
            phenotype: UNKNOWN_PHENOTYPE.to_string(),
            detected_variants: vec![]
        },
        clinical_recommendation: ClinicalRecommendation {
            text: "Drug not supported by current analysis engine.".to_string(),
            source: SYSTEM_SOURCE.to_string()
        },
        llm_generated_explanation: Explanation::not_applicable(),
        quality_metrics: QualityMetrics {
            vcf_parsing_success: true,
            ..Default::default()
        }
    }
}

/// Result for a supported drug whose gene never appears in the file
fn gene_not_detected_result(request: &AnalysisRequest, drug: &str, gene: &str) -> AnalysisResult {
    AnalysisResult {
        patient_id: request.patient_id.clone(),
        drug: drug.to_string(),
        timestamp: current_timestamp(),
        risk_assessment: RiskAssessment {
            risk_label: RiskLabel::NotApplicable,
            confidence_score: 0.0,
            severity: NO_SEVERITY.to_string()
        },
        pharmacogenomic_profile: PharmacogenomicProfile {
            primary_gene: gene.to_string(),
            diplotype: None,
            phenotype: NOT_DETECTED_PHENOTYPE.to_string(),
            detected_variants: vec![]
        },
        clinical_recommendation: ClinicalRecommendation {
            text: "Selected drug has no actionable variants in uploaded file.".to_string(),
            source: SYSTEM_SOURCE.to_string()
        },
        llm_generated_explanation: Explanation::new(
            "Analysis not possible.",
            "Gene data missing from VCF.",
            "Cannot determine pharmacogenomic risk."
        ),
        quality_metrics: QualityMetrics {
            vcf_parsing_success: true,
            // nothing was compared, so nothing could disagree
            cpic_alignment_verified: true,
            ..Default::default()
        }
    }
}
