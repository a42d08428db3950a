/// Canonical token every New York spelling collapses to
pub const NEW_YORK: &str = "new york";

/// Normalize an internship location for comparison
///
/// Lower-cases the input; anything mentioning "nyc" or "new york" becomes
/// [`NEW_YORK`]. Everything else is compared as-is.
pub fn normalize_location(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    if lowered.contains("nyc") || lowered.contains(NEW_YORK) {
        return NEW_YORK.to_string();
    }
    lowered
}

/// Check whether two raw locations name the same place
#[inline]
pub fn same_location(a: &str, b: &str) -> bool {
    normalize_location(a) == normalize_location(b)
}
