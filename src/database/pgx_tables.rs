
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::data_types::pgx_diplotype::Diplotype;
use crate::data_types::risk_label::RiskLabel;
use crate::database::guideline::{DrugGuideline, Guideline, long_phenotype_name};
use crate::util::file_io::load_json;

/// Phenotype reported when no table row matches
pub const UNKNOWN_PHENOTYPE: &str = "Unknown";

/// Map from gene to diplotype to metabolizer phenotype
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PhenotypeTable {
    genes: BTreeMap<String, BTreeMap<String, String>>
}

impl PhenotypeTable {
    pub fn new(genes: BTreeMap<String, BTreeMap<String, String>>) -> PhenotypeTable {
        PhenotypeTable { genes }
    }

    /// Looks up the phenotype for a diplotype, trying the swapped haplotype order if the exact form is absent.
    /// Absence is reported as "Unknown", never as an error.
    /// # Arguments
    /// * `gene` - the gene symbol, e.g. "CYP2D6"
    /// * `diplotype` - the diplotype to look up
    pub fn lookup(&self, gene: &str, diplotype: &Diplotype) -> String {
        let gene_mappings = match self.genes.get(gene) {
            Some(gm) => gm,
            None => {
                warn!("Gene {gene} not found in phenotype table.");
                return UNKNOWN_PHENOTYPE.to_string();
            }
        };

        if let Some(phenotype) = gene_mappings.get(diplotype.diplotype()) {
            return phenotype.clone();
        }

        // the table may be stored in the other orientation
        let swapped = diplotype.swapped();
        if let Some(phenotype) = gene_mappings.get(swapped.diplotype()) {
            debug!("{gene} {diplotype} matched table entry {swapped}");
            return phenotype.clone();
        }

        UNKNOWN_PHENOTYPE.to_string()
    }

    pub fn genes(&self) -> &BTreeMap<String, BTreeMap<String, String>> {
        &self.genes
    }
}

/// Map from drug to phenotype to risk label
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RiskTable {
    drugs: BTreeMap<String, BTreeMap<String, RiskLabel>>
}

impl RiskTable {
    pub fn new(drugs: BTreeMap<String, BTreeMap<String, RiskLabel>>) -> RiskTable {
        RiskTable { drugs }
    }

    /// Looks up the risk label for a drug and phenotype; a missing drug or phenotype is `Unknown`
    pub fn lookup(&self, drug: &str, phenotype: &str) -> RiskLabel {
        self.drugs.get(drug)
            .and_then(|row| row.get(phenotype))
            .copied()
            .unwrap_or(RiskLabel::Unknown)
    }

    pub fn drugs(&self) -> &BTreeMap<String, BTreeMap<String, RiskLabel>> {
        &self.drugs
    }
}

/// Map from drug to its CPIC guideline block
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GuidelineTable {
    drugs: BTreeMap<String, DrugGuideline>
}

impl GuidelineTable {
    pub fn new(drugs: BTreeMap<String, DrugGuideline>) -> GuidelineTable {
        GuidelineTable { drugs }
    }

    /// Looks up the guideline row for a drug and phenotype.
    /// Short phenotype codes (PM, IM, NM, RM, UM) fall back to their long names when the code itself is absent.
    /// # Arguments
    /// * `drug` - the drug name, e.g. "CODEINE"
    /// * `phenotype` - the resolved phenotype, e.g. "PM" or "Poor"
    pub fn lookup(&self, drug: &str, phenotype: &str) -> Guideline {
        let drug_guideline = match self.drugs.get(drug) {
            Some(dg) => dg,
            None => return Guideline::no_guideline()
        };

        if let Some(entry) = drug_guideline.mappings.get(phenotype) {
            return Guideline::from_entry(entry, &drug_guideline.gene);
        }

        let long_entry = long_phenotype_name(phenotype)
            .and_then(|long_name| drug_guideline.mappings.get(long_name));
        match long_entry {
            Some(entry) => Guideline::from_entry(entry, &drug_guideline.gene),
            None => Guideline::phenotype_not_found(&drug_guideline.gene)
        }
    }

    pub fn drugs(&self) -> &BTreeMap<String, DrugGuideline> {
        &self.drugs
    }
}

/// Locations of the three lookup tables on disk
#[derive(Clone, Debug)]
pub struct TablePaths<'a> {
    pub phenotype_table: &'a Path,
    pub risk_table: &'a Path,
    pub guideline_table: &'a Path
}

/// All of the read-only lookup data used by an analysis, built once at start-up
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PgxTables {
    phenotypes: PhenotypeTable,
    risks: RiskTable,
    guidelines: GuidelineTable
}

impl PgxTables {
    pub fn new(phenotypes: PhenotypeTable, risks: RiskTable, guidelines: GuidelineTable) -> PgxTables {
        PgxTables {
            phenotypes,
            risks,
            guidelines
        }
    }

    /// Loads all three tables. A table that fails to load is replaced by an empty one, so every lookup against it resolves to the defaults.
    /// # Arguments
    /// * `paths` - the table file locations, JSON or gzipped JSON
    pub fn load(paths: &TablePaths) -> PgxTables {
        info!("Loading phenotype table from {:?}...", paths.phenotype_table);
        let phenotypes: PhenotypeTable = load_table_or_empty(paths.phenotype_table, "phenotype");
        info!("Loading drug risk table from {:?}...", paths.risk_table);
        let risks: RiskTable = load_table_or_empty(paths.risk_table, "drug risk");
        info!("Loading CPIC guideline table from {:?}...", paths.guideline_table);
        let guidelines: GuidelineTable = load_table_or_empty(paths.guideline_table, "CPIC guideline");
        PgxTables::new(phenotypes, risks, guidelines)
    }

    /// Phenotype Resolver
    pub fn phenotype(&self, gene: &str, diplotype: &Diplotype) -> String {
        self.phenotypes.lookup(gene, diplotype)
    }

    /// Risk Resolver
    pub fn risk(&self, drug: &str, phenotype: &str) -> RiskLabel {
        self.risks.lookup(drug, phenotype)
    }

    /// Guideline Resolver
    pub fn guideline(&self, drug: &str, phenotype: &str) -> Guideline {
        self.guidelines.lookup(drug, phenotype)
    }

    // getters
    pub fn phenotypes(&self) -> &PhenotypeTable {
        &self.phenotypes
    }

    pub fn risks(&self) -> &RiskTable {
        &self.risks
    }

    pub fn guidelines(&self) -> &GuidelineTable {
        &self.guidelines
    }
}

/// Loads one table, degrading to the empty table on any failure
fn load_table_or_empty<T: serde::de::DeserializeOwned + Default>(filename: &Path, label: &str) -> T {
    match load_json(filename) {
        Ok(table) => table,
        Err(e) => {
            error!("Error while loading {label} table from {filename:?}, continuing with an empty table: {e}");
            T::default()
        }
    }
}
