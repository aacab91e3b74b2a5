
use log::{LevelFilter, error, info, warn};
use serde::Serialize;
use std::fs::File;
use std::path::Path;

use pbpharmaguard::analyzer::{AnalysisContext, analyze_request};
use pbpharmaguard::cli::analyze::{AnalyzeSettings, check_analyze_settings};
use pbpharmaguard::cli::core::{Commands, get_cli};
use pbpharmaguard::cli::table_stat::{TableStatSettings, check_table_stat_settings};
use pbpharmaguard::data_types::analysis_result::{AnalysisResponse, AnalysisResult};
use pbpharmaguard::database::pgx_tables::{PgxTables, TablePaths};
use pbpharmaguard::explanation::ExplanationGenerator;
use pbpharmaguard::explanation::FallbackExplainer;
use pbpharmaguard::explanation::llm_client::LlmExplainer;
use pbpharmaguard::util::file_io::{load_vcf_upload, save_json};

/// Sets up the logger at the level requested by the repeated -v flag
fn init_logging(verbosity: u8) {
    let filter_level: LevelFilter = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };

    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();
}

/// This will run the "analyze" mode of the tool
/// # Arguments
/// * `settings` - the AnalyzeSettings object
fn run_analyze(settings: AnalyzeSettings) {
    // immediately setup logging first
    init_logging(settings.verbosity);

    // okay, now we can check all the other settings
    let cli_settings: AnalyzeSettings = match check_analyze_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while processing CLI settings: {e}");
            std::process::exit(exitcode::USAGE);
        }
    };

    // tables are loaded once, missing ones degrade to empty
    let tables: PgxTables = PgxTables::load(&TablePaths {
        phenotype_table: &cli_settings.phenotype_table,
        risk_table: &cli_settings.risk_table,
        guideline_table: &cli_settings.guideline_table
    });

    let explainer: Box<dyn ExplanationGenerator> = if cli_settings.disable_llm {
        Box::new(FallbackExplainer)
    } else {
        Box::new(LlmExplainer::new(cli_settings.llm_config()))
    };
    let context = AnalysisContext::new(&tables, explainer.as_ref());

    // now hand it to the analyzer
    info!("Loading VCF from {:?}...", cli_settings.vcf_filename);
    let analysis_result = load_vcf_upload(&cli_settings.vcf_filename, cli_settings.max_file_size)
        .and_then(|vcf_content| analyze_request(&context, &vcf_content, Some(cli_settings.drugs.as_str())));

    let summary_results: Option<Vec<AnalysisResult>> = analysis_result.as_ref().ok().cloned();
    if let Err(e) = analysis_result.as_ref() {
        error!("Error while analyzing VCF: {e}");
        if let Some(details) = e.details() {
            error!("\t{details}");
        }
    }
    let response: AnalysisResponse = analysis_result.into();

    // the response is written in both cases, failures carry the error envelope
    info!("Saving analysis response to {:?}", cli_settings.output_filename);
    if let Err(e) = save_json(&response, &cli_settings.output_filename) {
        error!("Error while writing analysis response to file: {e}");
        std::process::exit(exitcode::IOERR);
    }

    let results: Vec<AnalysisResult> = match summary_results {
        Some(r) => r,
        None => std::process::exit(exitcode::DATAERR)
    };

    if let Some(filename) = cli_settings.output_tsv.as_ref() {
        info!("Saving analysis summary to {:?}", filename);
        if let Err(e) = save_summary_tsv(&results, filename) {
            error!("Error while writing analysis summary to file: {e}");
            std::process::exit(exitcode::IOERR);
        }
    }

    for result in results.iter() {
        let profile = &result.pharmacogenomic_profile;
        info!("{}: {} {} => {} => {}",
            result.drug,
            profile.primary_gene,
            profile.diplotype.as_deref().unwrap_or("N/A"),
            profile.phenotype,
            result.risk_assessment.risk_label
        );
    }
    let unaligned = results.iter().filter(|r| !r.quality_metrics.cpic_alignment_verified).count();
    if unaligned > 0 {
        warn!("{unaligned} result(s) where the risk table and the CPIC guideline disagree");
    }
}

/// Wrapper for one row of the summary output
#[derive(Serialize)]
struct SummaryRow<'a> {
    #[serde(rename = "#drug")]
    drug: &'a str,
    gene: &'a str,
    diplotype: &'a str,
    phenotype: &'a str,
    risk_label: String,
    severity: &'a str
}

/// Helper function to save a flat TSV file with one row per drug
/// # Arguments
/// * `results` - our analysis results
/// * `filename` - the output filename, TSV
/// # Errors
/// * if we have any errors opening or writing to the file
fn save_summary_tsv(results: &[AnalysisResult], filename: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let delimiter: u8 = b'\t';
    let mut csv_writer: csv::Writer<File> = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(filename)?;

    // results stay in the order the drugs were requested
    for result in results.iter() {
        let profile = &result.pharmacogenomic_profile;
        let row = SummaryRow {
            drug: &result.drug,
            gene: &profile.primary_gene,
            diplotype: profile.diplotype.as_deref().unwrap_or("N/A"),
            phenotype: &profile.phenotype,
            risk_label: result.risk_assessment.risk_label.to_string(),
            severity: &result.risk_assessment.severity
        };
        csv_writer.serialize(&row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// This will run the "table-stat" mode of the tool
/// # Arguments
/// * `settings` - the TableStatSettings object
fn run_table_stat(settings: TableStatSettings) {
    // immediately setup logging first
    init_logging(settings.verbosity);

    // okay, now we can check all the other settings
    let cli_settings: TableStatSettings = check_table_stat_settings(settings);

    let tables: PgxTables = PgxTables::load(&TablePaths {
        phenotype_table: &cli_settings.phenotype_table,
        risk_table: &cli_settings.risk_table,
        guideline_table: &cli_settings.guideline_table
    });
    info!("Tables loaded.");

    // display the table statistics
    pbpharmaguard::table_stat::print_stats(&tables);
}

fn main() {
    let cli = get_cli();
    match cli.command {
        Commands::Analyze(settings) => {
            run_analyze(*settings);
        },
        Commands::TableStat(settings) => {
            run_table_stat(*settings);
        }
    }

    info!("Process finished successfully.");
}
