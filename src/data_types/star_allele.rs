
use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Ordering;

lazy_static! {
    /// Splits an allele name into alternating digit and non-digit runs
    static ref NATURAL_CHUNK: Regex = Regex::new(r"\d+|\D+").unwrap();
}

/// The reference allele, used when nothing else is known
pub const REFERENCE_ALLELE: &str = "*1";

/// Normalizes a raw star-allele annotation into a canonical `*X` form.
/// This upper-cases, removes all whitespace, strips any leading `*` characters, and then prepends exactly one `*`.
/// # Arguments
/// * `raw_star` - the annotation as found in the file, e.g. " **4 " or "10"
/// # Examples
/// * `"4"` -> `"*4"`
/// * `"**17 "` -> `"*17"`
pub fn normalize_star(raw_star: &str) -> String {
    let collapsed: String = raw_star.to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    format!("*{}", collapsed.trim_start_matches('*'))
}

/// Same as `normalize_star`, but missing or blank values are treated as the reference allele
pub fn normalize_star_or_reference(raw_star: Option<&str>) -> String {
    match raw_star {
        Some(s) if !s.trim().is_empty() => normalize_star(s),
        _ => REFERENCE_ALLELE.to_string()
    }
}

/// Compares two star alleles by the text after the leading `*`, numeric runs by value and everything else case-insensitively.
/// This is what makes `*4` sort before `*10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a_body = a.trim_start_matches('*');
    let b_body = b.trim_start_matches('*');

    let mut a_chunks = NATURAL_CHUNK.find_iter(a_body).map(|m| m.as_str());
    let mut b_chunks = NATURAL_CHUNK.find_iter(b_body).map(|m| m.as_str());
    loop {
        match (a_chunks.next(), b_chunks.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ac), Some(bc)) => {
                let ordering = compare_chunk(ac, bc);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

/// Compares a single chunk pair; numeric when both are digit runs
fn compare_chunk(a: &str, b: &str) -> Ordering {
    let a_numeric = a.bytes().all(|c| c.is_ascii_digit());
    let b_numeric = b.bytes().all(|c| c.is_ascii_digit());
    if a_numeric && b_numeric {
        // compare by magnitude without parsing, so arbitrarily long runs are fine
        let a_trim = a.trim_start_matches('0');
        let b_trim = b.trim_start_matches('0');
        a_trim.len().cmp(&b_trim.len())
            .then_with(|| a_trim.cmp(b_trim))
    } else if a_numeric != b_numeric {
        // digits sort ahead of letters
        if a_numeric { Ordering::Less } else { Ordering::Greater }
    } else {
        a.to_lowercase().cmp(&b.to_lowercase())
    }
}
