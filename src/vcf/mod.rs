
/// Extraction of annotated star-allele variants from VCF text
pub mod parser;
/// Structural checks on raw VCF text, run before parsing
pub mod validator;
