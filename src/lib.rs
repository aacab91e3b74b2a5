/// Contains the per-request analysis that ties the pipeline together
pub mod analyzer;
/// Contains all the CLI related functionality
pub mod cli;
/// Contains functionality for loading and querying the lookup tables
pub mod database;
/// Contains any specialized data types that are shared across the tooling
pub mod data_types;
/// Contains the error taxonomy reported to callers
pub mod errors;
/// Contains the natural-language explanation generators
pub mod explanation;
/// Contains functionality for displaying lookup table statistics
pub mod table_stat;
/// Contains generic utilities that are handy wrappers
pub mod util;
/// Contains VCF validation and star-allele extraction
pub mod vcf;
