
use serde::Serialize;

/// A single star-allele annotation extracted from one VCF data line
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PgxVariant {
    /// Upper-case gene symbol, always one of the supported genes
    gene: String,
    /// Normalized star allele, e.g. "*4"
    star: String,
    /// Reference SNP identifier when the line carried an RS= entry
    rs: Option<String>
}

impl PgxVariant {
    /// Constructor, the star allele is expected to already be normalized
    pub fn new(gene: &str, star: &str, rs: Option<&str>) -> PgxVariant {
        PgxVariant {
            gene: gene.to_string(),
            star: star.to_string(),
            rs: rs.map(|r| r.to_string())
        }
    }

    // getters
    pub fn gene(&self) -> &str {
        &self.gene
    }

    pub fn star(&self) -> &str {
        &self.star
    }

    pub fn rs(&self) -> Option<&str> {
        self.rs.as_deref()
    }
}
