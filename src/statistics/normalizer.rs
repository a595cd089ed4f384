/// Join-key normalization shared by taxonomy leaves and sale records.
///
/// Matching is case-fold only: punctuation and interior whitespace are kept,
/// so "st. patricks road" and "st patricks road" stay distinct keys.
pub(crate) fn normalize_street(value: &str) -> String {
    value.to_lowercase()
}

#[cfg(test)]
pub(crate) fn normalize_for_tests(value: &str) -> String {
    normalize_street(value)
}
