//! Derivation of proposal codes and certificate numbers.
//!
//! Both are built from store-issued monotonic sequences, never from the
//! wall clock, so concurrent finalizations in the same instant cannot
//! collide.

/// Abbreviate a faculty name for use in proposal codes.
///
/// Multi-word names become their initials (`"Faculty of Science"` →
/// `"FOS"`); single words are truncated to three characters.
pub fn faculty_abbreviation(faculty: &str) -> String {
    let words: Vec<&str> = faculty.split_whitespace().collect();
    let abbrev: String = if words.len() > 1 {
        words
            .iter()
            .filter_map(|w| w.chars().next())
            .collect()
    } else {
        faculty.chars().take(3).collect()
    };
    let abbrev = abbrev.to_uppercase();
    if abbrev.is_empty() {
        "GEN".to_string()
    } else {
        abbrev
    }
}

/// Build the immutable human-readable proposal code.
pub fn proposal_code(faculty: &str, year: i32, sequence: u64) -> String {
    format!("{}-{year}-{sequence:04}", faculty_abbreviation(faculty))
}

/// Build a certificate number from the configured prefix and the
/// monotonic certificate sequence.
pub fn certificate_number(prefix: &str, sequence: u64) -> String {
    format!("{prefix}-{sequence:06}")
}
