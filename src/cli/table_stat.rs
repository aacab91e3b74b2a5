
use clap::Args;
use log::info;
use std::path::PathBuf;

use crate::cli::core::{check_required_filename, AFTER_HELP};

#[derive(Clone, Args)]
#[clap(author, about,
    after_help = &**AFTER_HELP)]
pub struct TableStatSettings {
    /// Phenotype lookup table (JSON)
    #[clap(long = "phenotype-table")]
    #[clap(value_name = "JSON")]
    #[clap(default_value = "data/phenotype_table.json")]
    #[clap(help_heading = Some("Input/Output"))]
    pub phenotype_table: PathBuf,

    /// Drug risk lookup table (JSON)
    #[clap(long = "risk-table")]
    #[clap(value_name = "JSON")]
    #[clap(default_value = "data/drug_risk_table.json")]
    #[clap(help_heading = Some("Input/Output"))]
    pub risk_table: PathBuf,

    /// CPIC guideline table (JSON)
    #[clap(long = "guideline-table")]
    #[clap(value_name = "JSON")]
    #[clap(default_value = "data/cpic_guidelines.json")]
    #[clap(help_heading = Some("Input/Output"))]
    pub guideline_table: PathBuf,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_table_stat_settings(settings: TableStatSettings) -> TableStatSettings {
    check_required_filename(&settings.phenotype_table, "Phenotype table");
    check_required_filename(&settings.risk_table, "Risk table");
    check_required_filename(&settings.guideline_table, "Guideline table");

    // dump stuff to the logger
    info!("Inputs:");
    info!("\tPhenotype table: {:?}", &settings.phenotype_table);
    info!("\tRisk table: {:?}", &settings.risk_table);
    info!("\tGuideline table: {:?}", &settings.guideline_table);

    settings
}
