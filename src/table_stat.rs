
use itertools::Itertools;
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

use crate::data_types::risk_label::RiskLabel;
use crate::database::db_const::{DRUG_GENE_PAIRS, SUPPORTED_GENE_LIST};
use crate::database::pgx_tables::PgxTables;

/// Prints the statistics for a set of lookup tables
/// # Arguments
/// * `tables` - the tables to print the statistics for
pub fn print_stats(tables: &PgxTables) {
    let phenotype_genes = tables.phenotypes().genes();
    let risk_drugs = tables.risks().drugs();
    let guideline_drugs = tables.guidelines().drugs();

    println!("Lookup table statistics:");
    println!("\tPhenotype table:");
    println!("\t\tGenes: {}", phenotype_genes.len());
    println!("\t\tDiplotypes: {}", phenotype_genes.values().map(|d| d.len()).sum::<usize>());
    println!("\tRisk table:");
    println!("\t\tDrugs: {}", risk_drugs.len());
    println!("\t\tPhenotype rows: {}", risk_drugs.values().map(|p| p.len()).sum::<usize>());
    println!("\tGuideline table:");
    println!("\t\tDrugs: {}", guideline_drugs.len());
    println!("\t\tPhenotype rows: {}", guideline_drugs.values().map(|g| g.mappings.len()).sum::<usize>());

    // coverage of the fixed drug-gene pairs
    println!("Supported pair coverage:");
    println!("drug\tgene\tdiplotypes\trisk_rows\tguideline_rows");
    for (drug, gene) in DRUG_GENE_PAIRS.iter() {
        let diplotypes = phenotype_genes.get(*gene).map(|d| d.len()).unwrap_or(0);
        let risk_rows = risk_drugs.get(*drug).map(|p| p.len()).unwrap_or(0);
        let guideline_rows = guideline_drugs.get(*drug).map(|g| g.mappings.len()).unwrap_or(0);
        println!("{drug}\t{gene}\t{diplotypes}\t{risk_rows}\t{guideline_rows}");
    }

    let missing_genes: Vec<&str> = SUPPORTED_GENE_LIST.iter()
        .filter(|g| !phenotype_genes.contains_key(**g))
        .cloned()
        .collect();
    if !missing_genes.is_empty() {
        println!("Supported genes missing from the phenotype table: {}", missing_genes.join(", "));
    }

    // the per-row breakdowns are just if we have elevated verbosity
    if log::log_enabled!(log::Level::Debug) {
        println!();
        println!("Phenotype statistics:");
        println!("gene\tphenotype\tdiplotypes");
        for (gene, diplotypes) in phenotype_genes.iter() {
            for (phenotype, count) in phenotype_counts(diplotypes) {
                println!("{gene}\t{phenotype}\t{count}");
            }
        }
        println!();

        println!("Risk statistics:");
        println!("drug\t{}", RiskLabel::iter().join("\t"));
        for (drug, phenotypes) in risk_drugs.iter() {
            let label_counts = phenotypes.values().copied().counts();
            let row = RiskLabel::iter()
                .map(|risk_label| label_counts.get(&risk_label).copied().unwrap_or(0))
                .join("\t");
            println!("{drug}\t{row}");
        }
        println!();

        println!("Guideline statistics:");
        println!("drug\tgene\tphenotype\trisk_label\tseverity\tmatches_risk_table");
        for (drug, guideline) in guideline_drugs.iter() {
            for (phenotype, entry) in guideline.mappings.iter() {
                let matches_risk_table = tables.risk(drug, phenotype) == entry.risk && entry.risk != RiskLabel::Unknown;
                println!("{drug}\t{}\t{phenotype}\t{}\t{}\t{matches_risk_table}", guideline.gene, entry.risk, entry.severity);
            }
        }
        println!();
    }
}

/// Counts how many diplotypes map to each phenotype, sorted by phenotype
fn phenotype_counts(diplotypes: &BTreeMap<String, String>) -> Vec<(&str, usize)> {
    diplotypes.values()
        .map(String::as_str)
        .counts()
        .into_iter()
        .sorted()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phenotype_counts() {
        let diplotypes: BTreeMap<String, String> = [("*1/*1", "NM"), ("*1/*4", "IM"), ("*4/*4", "PM"), ("*1/*10", "IM")]
            .into_iter()
            .map(|(d, p)| (d.to_string(), p.to_string()))
            .collect();
        assert_eq!(phenotype_counts(&diplotypes), vec![("IM", 2), ("NM", 1), ("PM", 1)]);
        assert!(phenotype_counts(&BTreeMap::new()).is_empty());
    }
}
