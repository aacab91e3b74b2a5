
/// Contains the per-drug result record and the response envelope
pub mod analysis_result;
/// Contains normalization of the caller's drug selection
pub mod drug_selection;
/// Contains definitions related to the representation of a final diplotype
pub mod pgx_diplotype;
/// Contains the star-allele variant extracted from a VCF line
pub mod pgx_variant;
/// Contains the drug risk categories
pub mod risk_label;
/// Contains the structural check run against each assembled result
pub mod schema;
/// Contains star-allele normalization and ordering
pub mod star_allele;
