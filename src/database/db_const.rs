
use lazy_static::lazy_static;
use rustc_hash::FxHashSet as HashSet;

// gene names to prevent dev typos
pub const CYP2C9: &str = "CYP2C9";
pub const CYP2C19: &str = "CYP2C19";
pub const CYP2D6: &str = "CYP2D6";
pub const DPYD: &str = "DPYD";
pub const SLCO1B1: &str = "SLCO1B1";
pub const TPMT: &str = "TPMT";

// drug names, upper case as they are expected from callers
pub const AZATHIOPRINE: &str = "AZATHIOPRINE";
pub const CLOPIDOGREL: &str = "CLOPIDOGREL";
pub const CODEINE: &str = "CODEINE";
pub const FLUOROURACIL: &str = "FLUOROURACIL";
pub const SIMVASTATIN: &str = "SIMVASTATIN";
pub const WARFARIN: &str = "WARFARIN";

/// Each supported drug and the one pharmacogene it is interpreted against
pub const DRUG_GENE_PAIRS: [(&str, &str); 6] = [
    (CODEINE, CYP2D6),
    (CLOPIDOGREL, CYP2C19),
    (WARFARIN, CYP2C9),
    (SIMVASTATIN, SLCO1B1),
    (AZATHIOPRINE, TPMT),
    (FLUOROURACIL, DPYD)
];

lazy_static!{
    /// Genes in the order they are reported in messages
    pub static ref SUPPORTED_GENE_LIST: Vec<&'static str> = DRUG_GENE_PAIRS.iter()
        .map(|&(_drug, gene)| gene)
        .collect();

    /// Same list, but in set format
    pub static ref SUPPORTED_GENES: HashSet<&'static str> = {
        SUPPORTED_GENE_LIST.iter().cloned().collect()
    };
}

/// Returns the pharmacogene of interest for a drug, if the drug is supported.
/// Matching is exact, callers are expected to send upper-case names.
pub fn gene_for_drug(drug: &str) -> Option<&'static str> {
    DRUG_GENE_PAIRS.iter()
        .find(|&&(d, _gene)| d == drug)
        .map(|&(_drug, gene)| gene)
}

/// Returns true if the gene symbol is one of the supported pharmacogenes
pub fn is_supported_gene(gene: &str) -> bool {
    SUPPORTED_GENES.contains(gene)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gene_for_drug() {
        assert_eq!(gene_for_drug("CODEINE"), Some(CYP2D6));
        assert_eq!(gene_for_drug("FLUOROURACIL"), Some(DPYD));
        assert_eq!(gene_for_drug("ASPIRIN"), None);
        // no case folding
        assert_eq!(gene_for_drug("codeine"), None);
    }

    #[test]
    fn test_supported_genes() {
        assert_eq!(SUPPORTED_GENES.len(), 6);
        assert!(is_supported_gene("TPMT"));
        assert!(!is_supported_gene("BRCA1"));
        assert_eq!(SUPPORTED_GENE_LIST[0], CYP2D6);
    }
}
