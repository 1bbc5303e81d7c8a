#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region label resolution for the identity registry pipeline.
//!
//! Raw registry records carry free-text state labels of adversarial
//! quality: typos, historical names, pre-2020 union-territory names,
//! city names mistakenly entered as states, and stray pincodes. This
//! crate maps each label to a [`Region`] from the closed canonical set,
//! or rejects it.
//!
//! Resolution precedence (strict order):
//!
//! 1. Manual override table, checked against the **raw** input — an
//!    override must win before normalization, which could otherwise
//!    produce a string that coincidentally matches a different
//!    canonical name.
//! 2. Syntactic normalization, then exact match against the canonical
//!    set.
//! 3. Validity pre-filter: known-bad entries, purely numeric strings,
//!    and null-ish literals are rejected outright.
//! 4. Fuzzy match (Jaro–Winkler) against every canonical name; best
//!    score at or above [`FUZZY_THRESHOLD`] wins, ties broken by
//!    first-highest in canonical iteration order.

mod canonical;
mod resolver;

pub use canonical::Region;
pub use resolver::RegionResolver;

use strum::IntoEnumIterator as _;

/// Minimum fuzzy similarity (0-100 scale) for a match to be accepted.
///
/// Empirically chosen, not derived from a formal error-rate analysis;
/// tune with care against confusable canonical pairs.
pub const FUZZY_THRESHOLD: f64 = 80.0;

/// Known-bad state labels: cities, neighborhoods, and a literal pincode
/// observed in production data. Matched against the raw input.
const INVALID_LABELS: &[&str] = &[
    "100000",
    "BALANAGAR",
    "Darbhanga",
    "Jaipur",
    "Madanapalle",
    "Nagpur",
    "Puttenahalli",
    "Raja Annamalai Puram",
];

/// Manual override table: historical names, pre-2020 territory mergers,
/// and common typos. Takes precedence over everything else.
const OVERRIDES: &[(&str, Region)] = &[
    // Historical names
    ("Orissa", Region::Odisha),
    ("Uttaranchal", Region::Uttarakhand),
    ("Pondicherry", Region::Puducherry),
    // Old UT names (before the 2020 merger)
    (
        "Dadra & Nagar Haveli",
        Region::DadraAndNagarHaveliAndDamanAndDiu,
    ),
    (
        "Dadra and Nagar Haveli",
        Region::DadraAndNagarHaveliAndDamanAndDiu,
    ),
    ("Daman & Diu", Region::DadraAndNagarHaveliAndDamanAndDiu),
    ("Daman and Diu", Region::DadraAndNagarHaveliAndDamanAndDiu),
    // Variations that don't fuzzy match well
    ("Tamilnadu", Region::TamilNadu),
    (
        "The Dadra And Nagar Haveli And Daman And Diu",
        Region::DadraAndNagarHaveliAndDamanAndDiu,
    ),
];

/// Normalizes a raw state label.
///
/// The pipeline:
/// 1. Trim and collapse internal whitespace runs
/// 2. Replace `&` with `and`
/// 3. Title case each word
/// 4. Lowercase the conjunction `And` back to `and`
#[must_use]
pub fn normalize_label(input: &str) -> String {
    let replaced = input.trim().replace('&', "and");

    let titled: Vec<String> = replaced.split_whitespace().map(title_case_word).collect();

    titled.join(" ").replace(" And ", " and ")
}

/// Title-cases a single word: first character uppercase, rest lowercase.
fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str().to_lowercase().as_str()
    })
}

/// Returns `true` if the label passes the validity pre-filter.
///
/// Rejects blacklisted entries, purely numeric strings (stray
/// pincodes), and null-ish literals.
#[must_use]
pub fn is_valid_label(input: &str) -> bool {
    let trimmed = input.trim();

    if trimmed.is_empty() || INVALID_LABELS.contains(&trimmed) {
        return false;
    }

    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    !matches!(trimmed, "0" | "nan" | "NaN" | "None")
}

/// Resolves a raw free-text state label to a canonical [`Region`].
///
/// Pure function; for bulk resolution over millions of rows use
/// [`RegionResolver`], which memoizes per distinct input.
#[must_use]
pub fn resolve_region(input: &str) -> Option<Region> {
    // Overrides win before normalization
    if let Some((_, region)) = OVERRIDES.iter().find(|(raw, _)| *raw == input.trim()) {
        return Some(*region);
    }

    let normalized = normalize_label(input);

    if let Ok(region) = normalized.parse::<Region>() {
        return Some(region);
    }

    if !is_valid_label(input) {
        return None;
    }

    fuzzy_match(&normalized)
}

/// Finds the best fuzzy match for a normalized label.
///
/// Scores every canonical name with case-insensitive Jaro–Winkler on a
/// 0-100 scale. Iteration order over the canonical set is fixed, and
/// only a strictly greater score replaces the current best, so the
/// chosen match is stable across runs.
fn fuzzy_match(normalized: &str) -> Option<Region> {
    let needle = normalized.to_lowercase();

    let mut best: Option<(Region, f64)> = None;

    for region in Region::iter() {
        let score = strsim::jaro_winkler(&needle, &region.name().to_lowercase()) * 100.0;

        if score >= FUZZY_THRESHOLD && best.is_none_or(|(_, s)| score > s) {
            best = Some((region, score));
        }
    }

    if let Some((region, score)) = best {
        log::trace!("fuzzy matched '{normalized}' -> '{region}' (score {score:.1})");
    }

    best.map(|(region, _)| region)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_is_idempotent_on_canonical_names() {
        use strum::IntoEnumIterator as _;

        for region in Region::iter() {
            let name = region.name();
            assert_eq!(normalize_label(&name), name, "not idempotent: {name}");
            assert_eq!(resolve_region(&name), Some(region));
        }
    }

    #[test]
    fn resolves_case_and_spacing_variants() {
        assert_eq!(resolve_region("WEST BENGAL"), Some(Region::WestBengal));
        assert_eq!(resolve_region("Westbengal"), Some(Region::WestBengal));
        assert_eq!(resolve_region("  west   bengal "), Some(Region::WestBengal));
        assert_eq!(resolve_region("West Bangal"), Some(Region::WestBengal));
    }

    #[test]
    fn override_takes_precedence() {
        assert_eq!(resolve_region("Orissa"), Some(Region::Odisha));
        assert_eq!(resolve_region("Uttaranchal"), Some(Region::Uttarakhand));
        assert_eq!(resolve_region("Pondicherry"), Some(Region::Puducherry));
    }

    #[test]
    fn merged_territories_resolve_to_current_name() {
        for old in ["Dadra & Nagar Haveli", "Daman and Diu", "Daman & Diu"] {
            assert_eq!(
                resolve_region(old),
                Some(Region::DadraAndNagarHaveliAndDamanAndDiu),
                "old UT name: {old}"
            );
        }
    }

    #[test]
    fn rejects_invalid_labels() {
        for bad in ["100000", "Jaipur", "0", "nan", "NaN", "None", "560001", ""] {
            assert_eq!(resolve_region(bad), None, "should reject: {bad:?}");
        }
    }

    #[test]
    fn ampersand_normalizes_to_and() {
        assert_eq!(
            resolve_region("Jammu & Kashmir"),
            Some(Region::JammuAndKashmir)
        );
        assert_eq!(
            resolve_region("ANDAMAN & NICOBAR ISLANDS"),
            Some(Region::AndamanAndNicobarIslands)
        );
    }

    #[test]
    fn fuzzy_rejects_distant_strings() {
        assert_eq!(resolve_region("Hyderabad City Zone Nine"), None);
    }

    #[test]
    fn normalize_label_collapses_whitespace() {
        assert_eq!(normalize_label("  tamil    nadu "), "Tamil Nadu");
    }
}
