
use crate::data_types::pgx_variant::PgxVariant;
use crate::data_types::star_allele::{REFERENCE_ALLELE, natural_cmp, normalize_star_or_reference};

/// Contains the two star alleles called for a single gene
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diplotype {
    /// short string for haplotype 1
    hap1: String,
    /// short string for haplotype 2
    hap2: String,
    /// combination diplotype call
    diplotype: String
}

impl Diplotype {
    pub fn new(hap1: &str, hap2: &str) -> Diplotype {
        Diplotype {
            hap1: hap1.to_string(),
            hap2: hap2.to_string(),
            diplotype: format!("{hap1}/{hap2}")
        }
    }

    /// The all-reference diplotype, reported when a gene is present but carries no annotated variants
    pub fn reference() -> Diplotype {
        Diplotype::new(REFERENCE_ALLELE, REFERENCE_ALLELE)
    }

    /// Returns the same diplotype with the haplotypes in the opposite order
    pub fn swapped(&self) -> Diplotype {
        Diplotype::new(&self.hap2, &self.hap1)
    }

    // getters
    pub fn diplotype(&self) -> &str {
        &self.diplotype
    }
}

impl std::fmt::Display for Diplotype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.diplotype)
    }
}

/// Reduces the variants found for one gene into a sorted two-allele diplotype.
/// Zero variants is the reference diplotype, a single variant is assumed homozygous, and anything past the first two variants is ignored.
/// # Arguments
/// * `variants` - the variants for a single gene, in file order
pub fn construct_diplotype(variants: &[PgxVariant]) -> Diplotype {
    let mut alleles: Vec<String> = variants.iter()
        .take(2)
        .map(|v| normalize_star_or_reference(Some(v.star())))
        .collect();

    match alleles.len() {
        0 => return Diplotype::reference(),
        1 => alleles.push(alleles[0].clone()),
        _ => {}
    };

    alleles.sort_by(|a, b| natural_cmp(a, b));
    Diplotype::new(&alleles[0], &alleles[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variants(stars: &[&str]) -> Vec<PgxVariant> {
        stars.iter()
            .map(|s| PgxVariant::new("CYP2D6", s, None))
            .collect()
    }

    #[test]
    fn test_diplotype() {
        let diplotype = Diplotype::new("*4", "*1");
        assert_eq!(diplotype.diplotype(), "*4/*1");
        assert_eq!(diplotype.swapped().diplotype(), "*1/*4");
        // orientation matters, lookups try the swapped form explicitly
        assert_ne!(diplotype, diplotype.swapped());
        assert_eq!(diplotype.swapped().swapped(), diplotype);
        assert_eq!(Diplotype::reference(), Diplotype::new("*1", "*1"));
        assert_eq!(diplotype.to_string(), "*4/*1");
    }

    #[test]
    fn test_construct_empty() {
        assert_eq!(construct_diplotype(&[]).diplotype(), "*1/*1");
    }

    #[test]
    fn test_construct_homozygous() {
        assert_eq!(construct_diplotype(&variants(&["*4"])).diplotype(), "*4/*4");
        // raw forms are renormalized
        assert_eq!(construct_diplotype(&variants(&["**17"])).diplotype(), "*17/*17");
    }

    #[test]
    fn test_construct_sorted() {
        assert_eq!(construct_diplotype(&variants(&["*4", "*1"])).diplotype(), "*1/*4");
        assert_eq!(construct_diplotype(&variants(&["*1", "*4"])).diplotype(), "*1/*4");
        // numeric order, not lexicographic
        assert_eq!(construct_diplotype(&variants(&["*10", "*2"])).diplotype(), "*2/*10");
        assert_eq!(construct_diplotype(&variants(&["*2", "*10"])).diplotype(), "*2/*10");
    }

    #[test]
    fn test_construct_reversal_commutes() {
        let pairs = [("*3", "*2"), ("*41", "*5"), ("*2A", "*13"), ("*1", "*1")];
        for (a, b) in pairs {
            let forward = construct_diplotype(&variants(&[a, b]));
            let reverse = construct_diplotype(&variants(&[b, a]));
            assert_eq!(forward.diplotype(), reverse.diplotype());
        }
    }

    #[test]
    fn test_construct_truncates() {
        // only the first two in file order are used
        assert_eq!(construct_diplotype(&variants(&["*9", "*3", "*2"])).diplotype(), "*3/*9");
    }

    #[test]
    fn test_construct_blank_star() {
        assert_eq!(construct_diplotype(&variants(&["", "*4"])).diplotype(), "*1/*4");
    }
}
