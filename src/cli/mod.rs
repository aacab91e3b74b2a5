/// the main CLI module
pub mod core;
/// the analyze CLI subcommand for assessing drug risk from a VCF
pub mod analyze;
/// The table-stat CLI subcommand for summarizing the lookup tables
pub mod table_stat;
