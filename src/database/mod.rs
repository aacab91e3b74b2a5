
/// Constants that are hard-coded, like the supported drug to gene map
pub mod db_const;
/// Contains the CPIC guideline rows and their resolved form
pub mod guideline;
/// Contains the lookup tables for phenotype, drug risk, and CPIC guidelines
pub mod pgx_tables;
