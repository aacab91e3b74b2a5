
use log::{debug, trace};
use rustc_hash::FxHashMap as HashMap;
use std::collections::BTreeMap;

use crate::data_types::pgx_variant::PgxVariant;
use crate::data_types::star_allele::normalize_star;
use crate::database::db_const::{SUPPORTED_GENE_LIST, is_supported_gene};

/// Column index of INFO in a VCF data line
const INFO_COLUMN: usize = 7;

/// The variants extracted from one VCF, grouped by supported gene
#[derive(Clone, Debug, Default)]
pub struct ParsedVcf {
    /// Every supported gene is present as a key, values are in file order
    gene_variants: BTreeMap<String, Vec<PgxVariant>>,
    /// True if at least one variant for a supported gene was found
    parsing_success: bool
}

impl ParsedVcf {
    /// Returns the variants for a gene; unsupported genes yield an empty slice
    pub fn variants(&self, gene: &str) -> &[PgxVariant] {
        self.gene_variants.get(gene)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// True if any supported gene has at least one variant
    pub fn has_supported_variants(&self) -> bool {
        self.gene_variants.values().any(|v| !v.is_empty())
    }

    // getters
    pub fn gene_variants(&self) -> &BTreeMap<String, Vec<PgxVariant>> {
        &self.gene_variants
    }

    pub fn parsing_success(&self) -> bool {
        self.parsing_success
    }
}

/// Extracts the annotated star-allele variants for each supported gene.
/// This never fails; lines that are malformed or lack the required annotations are skipped.
/// # Arguments
/// * `vcf_content` - the full text of a VCF that already passed validation
pub fn parse_vcf(vcf_content: &str) -> ParsedVcf {
    let mut gene_variants: BTreeMap<String, Vec<PgxVariant>> = SUPPORTED_GENE_LIST.iter()
        .map(|g| (g.to_string(), vec![]))
        .collect();
    let mut parsing_success = false;

    let normalized_content = vcf_content.replace('\r', "");
    for line in normalized_content.split('\n') {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        // tab or space delimited are both accepted
        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.len() <= INFO_COLUMN {
            trace!("Skipping malformed line with {} columns: {line:?}", columns.len());
            continue;
        }

        let info_fields = parse_info_field(columns[INFO_COLUMN]);
        let gene = match info_fields.get("GENE") {
            Some(g) => g.to_uppercase(),
            None => continue
        };
        let raw_star = match info_fields.get("STAR") {
            Some(s) => s,
            None => continue
        };
        if !is_supported_gene(&gene) {
            trace!("Ignoring annotation for unsupported gene {gene}");
            continue;
        }

        let star = normalize_star(raw_star);
        let rs = info_fields.get("RS").map(|r| r.as_str());
        gene_variants.entry(gene.clone()).or_default()
            .push(PgxVariant::new(&gene, &star, rs));
        parsing_success = true;
    }

    debug!("Extracted variants: {:?}", gene_variants.iter().map(|(g, v)| (g.as_str(), v.len())).collect::<Vec<_>>());
    ParsedVcf {
        gene_variants,
        parsing_success
    }
}

/// Splits an INFO column into upper-case keys and trimmed values.
/// Entries without a key or a value are dropped, later duplicates win.
fn parse_info_field(info: &str) -> HashMap<String, String> {
    let mut fields: HashMap<String, String> = Default::default();
    for entry in info.split(';') {
        if let Some((key, value)) = entry.split_once('=') {
            let key = key.trim().to_uppercase();
            let value = value.trim();
            if !key.is_empty() && !value.is_empty() {
                fields.insert(key, value.to_string());
            }
        }
    }
    fields
}

/// Collects the upper-case gene symbols referenced by `GENE=` anywhere in the raw text.
/// This is a plain text scan, so it also sees lines the parser skipped.
pub fn referenced_genes(vcf_content: &str) -> Vec<String> {
    let mut genes: Vec<String> = vec![];
    for line in vcf_content.lines() {
        if let Some((_prefix, remainder)) = line.split_once("GENE=") {
            let gene = remainder.split(';').next().unwrap_or_default()
                .trim()
                .to_uppercase();
            if !gene.is_empty() && !genes.contains(&gene) {
                genes.push(gene);
            }
        }
    }
    genes
}
