
use clap::Args;
use log::{debug, info, warn};
use simple_error::bail;
use std::path::PathBuf;

use crate::cli::core::AFTER_HELP;
use crate::explanation::llm_client::{DEFAULT_LLM_ENDPOINT, DEFAULT_LLM_MODEL, LlmConfig};
use crate::util::file_io::DEFAULT_MAX_VCF_BYTES;

#[derive(Args, Clone, Default)]
#[clap(author, about,
    after_help = &**AFTER_HELP)]
pub struct AnalyzeSettings {
    /// Input variant file in VCF format, annotated with GENE/STAR/RS in the INFO column
    #[clap(required = true)]
    #[clap(short = 'c')]
    #[clap(long = "vcf")]
    #[clap(value_name = "VCF")]
    #[clap(help_heading = Some("Input/Output"))]
    pub vcf_filename: PathBuf,

    /// Drug selection; a JSON array, a JSON string, or a comma-separated list
    #[clap(required = true)]
    #[clap(short = 'd')]
    #[clap(long = "drugs")]
    #[clap(value_name = "DRUGS")]
    #[clap(help_heading = Some("Input/Output"))]
    pub drugs: String,

    /// Output analysis response (JSON)
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_filename: PathBuf,

    /// Optional per-drug summary table
    #[clap(long = "output-tsv")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_tsv: Option<PathBuf>,

    /// Phenotype lookup table (JSON)
    #[clap(long = "phenotype-table")]
    #[clap(value_name = "JSON")]
    #[clap(default_value = "data/phenotype_table.json")]
    #[clap(help_heading = Some("Lookup tables"))]
    pub phenotype_table: PathBuf,

    /// Drug risk lookup table (JSON)
    #[clap(long = "risk-table")]
    #[clap(value_name = "JSON")]
    #[clap(default_value = "data/drug_risk_table.json")]
    #[clap(help_heading = Some("Lookup tables"))]
    pub risk_table: PathBuf,

    /// CPIC guideline table (JSON)
    #[clap(long = "guideline-table")]
    #[clap(value_name = "JSON")]
    #[clap(default_value = "data/cpic_guidelines.json")]
    #[clap(help_heading = Some("Lookup tables"))]
    pub guideline_table: PathBuf,

    /// Base URL of an OpenAI-compatible chat-completion endpoint
    #[clap(long = "llm-endpoint")]
    #[clap(value_name = "URL")]
    #[clap(default_value = DEFAULT_LLM_ENDPOINT)]
    #[clap(help_heading = Some("Explanation"))]
    pub llm_endpoint: String,

    /// Model requested from the endpoint
    #[clap(long = "llm-model")]
    #[clap(value_name = "MODEL")]
    #[clap(default_value = DEFAULT_LLM_MODEL)]
    #[clap(help_heading = Some("Explanation"))]
    pub llm_model: String,

    /// Bearer token for the endpoint
    #[clap(long = "llm-token")]
    #[clap(value_name = "TOKEN")]
    #[clap(env = "HF_TOKEN")]
    #[clap(hide_env_values = true)]
    #[clap(help_heading = Some("Explanation"))]
    pub llm_token: Option<String>,

    /// Skips the endpoint and always uses the deterministic explanation
    #[clap(long = "disable-llm")]
    #[clap(help_heading = Some("Explanation"))]
    pub disable_llm: bool,

    /// Largest accepted VCF, in bytes
    #[clap(long = "max-file-size")]
    #[clap(value_name = "BYTES")]
    #[clap(default_value_t = DEFAULT_MAX_VCF_BYTES)]
    pub max_file_size: u64,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl AnalyzeSettings {
    /// Builds the explanation generator settings from the CLI
    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            endpoint: self.llm_endpoint.clone(),
            model: self.llm_model.clone(),
            api_token: self.llm_token.clone()
        }
    }
}

/// Checks the analyze settings and echoes them to the log.
/// Missing inputs are not fatal here; the VCF is checked as an upload and the tables degrade to empty.
/// # Errors
/// * if the file size limit is zero
/// * if the endpoint is not an http(s) URL while generation is enabled
pub fn check_analyze_settings(mut settings: AnalyzeSettings) -> Result<AnalyzeSettings, Box<dyn std::error::Error>> {
    info!("Inputs:");
    info!("\tVCF: {:?}", settings.vcf_filename);
    info!("\tDrugs: {:?}", settings.drugs);
    for (label, filename) in [
        ("Phenotype table", &settings.phenotype_table),
        ("Risk table", &settings.risk_table),
        ("Guideline table", &settings.guideline_table)
    ] {
        if filename.exists() {
            info!("\t{label}: {filename:?}");
        } else {
            warn!("\t{label}: {filename:?} does not exist, all lookups against it will be empty");
        }
    }

    if settings.max_file_size == 0 {
        bail!("--max-file-size must be greater than 0");
    }
    debug!("\tMax VCF size: {} bytes", settings.max_file_size);

    // outputs
    info!("Outputs:");
    info!("\tAnalysis response: {:?}", settings.output_filename);
    if let Some(filename) = settings.output_tsv.as_ref() {
        info!("\tSummary TSV: {:?}", filename);
    }

    info!("Explanation settings:");
    if settings.disable_llm {
        info!("\tGeneration: DISABLED");
    } else {
        if !(settings.llm_endpoint.starts_with("http://") || settings.llm_endpoint.starts_with("https://")) {
            bail!("--llm-endpoint must be an http:// or https:// URL");
        }
        info!("\tEndpoint: {}", settings.llm_endpoint);
        info!("\tModel: {}", settings.llm_model);
        if settings.llm_token.as_deref().map_or(true, |t| t.trim().is_empty()) {
            warn!("\tNo LLM token provided (--llm-token or HF_TOKEN), explanations will use the fallback text");
            settings.llm_token = None;
        }
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_settings() -> AnalyzeSettings {
        AnalyzeSettings {
            vcf_filename: PathBuf::from("test_data/vcf/codeine_pm.vcf"),
            drugs: "CODEINE".to_string(),
            output_filename: PathBuf::from("out.json"),
            phenotype_table: PathBuf::from("test_data/tables/phenotype_table.json"),
            risk_table: PathBuf::from("test_data/tables/drug_risk_table.json"),
            guideline_table: PathBuf::from("test_data/tables/cpic_guidelines.json"),
            llm_endpoint: DEFAULT_LLM_ENDPOINT.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            max_file_size: DEFAULT_MAX_VCF_BYTES,
            ..Default::default()
        }
    }

    #[test]
    fn test_check_analyze_settings() {
        let mut settings = base_settings();
        settings.llm_token = Some("  ".to_string());
        let checked = check_analyze_settings(settings).unwrap();
        // blank tokens are dropped
        assert_eq!(checked.llm_config().api_token, None);
        assert_eq!(checked.llm_config().endpoint, DEFAULT_LLM_ENDPOINT);
    }

    #[test]
    fn test_bad_settings() {
        let mut settings = base_settings();
        settings.max_file_size = 0;
        assert!(check_analyze_settings(settings).is_err());

        let mut settings = base_settings();
        settings.llm_endpoint = "router.huggingface.co".to_string();
        assert!(check_analyze_settings(settings.clone()).is_err());

        // endpoint is ignored when generation is off
        settings.disable_llm = true;
        assert!(check_analyze_settings(settings).is_ok());
    }
}
