//! crates/grabtext_core/src/input.rs
//!
//! Parsing helpers for sender input. The numeric policy is strict: a token
//! is numeric only if it is non-empty and consists entirely of ASCII
//! digits. Partial matches are rejected, never truncated.

use crate::domain::Addon;

/// Parses a digits-only token. Rejects signs, decimals, surrounding text
/// and the empty string. `"03"` is accepted and parses as 3.
pub fn parse_index(token: &str) -> Option<usize> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Resolves an add-on selection message against the available add-ons.
///
/// `"0"` selects none. Otherwise the input is a comma-separated list of
/// 1-based indices; invalid and duplicate indices are silently dropped.
/// This never fails: an empty result is a valid selection.
pub fn select_addons(input: &str, available: &[Addon]) -> Vec<Addon> {
    let trimmed = input.trim();
    if trimmed == "0" {
        return Vec::new();
    }

    let mut picked_indices = Vec::new();
    for token in trimmed.split(',') {
        let Some(n) = parse_index(token.trim()) else {
            continue;
        };
        if n >= 1 && n <= available.len() && !picked_indices.contains(&n) {
            picked_indices.push(n);
        }
    }

    picked_indices
        .into_iter()
        .map(|n| available[n - 1].clone())
        .collect()
}

/// Renders a minor-unit price as a GH₵ amount, e.g. 4050 → "GH₵40.50".
pub fn format_price(minor: u64) -> String {
    format!("GH₵{}.{:02}", minor / 100, minor % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addons() -> Vec<Addon> {
        ["A", "B", "C"]
            .into_iter()
            .map(|name| Addon {
                name: name.into(),
                price: 100,
            })
            .collect()
    }

    fn names(selected: &[Addon]) -> Vec<&str> {
        selected.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn index_accepts_plain_digits() {
        assert_eq!(parse_index("3"), Some(3));
        assert_eq!(parse_index("03"), Some(3));
    }

    #[test]
    fn index_rejects_anything_else() {
        assert_eq!(parse_index("3a"), None);
        assert_eq!(parse_index("-3"), None);
        assert_eq!(parse_index("3.0"), None);
        assert_eq!(parse_index(""), None);
        assert_eq!(parse_index("+3"), None);
    }

    #[test]
    fn zero_selects_no_addons() {
        assert!(select_addons("0", &addons()).is_empty());
    }

    #[test]
    fn valid_indices_resolve_in_order() {
        assert_eq!(names(&select_addons("1,3", &addons())), vec!["A", "C"]);
    }

    #[test]
    fn invalid_indices_are_dropped_silently() {
        assert_eq!(names(&select_addons("1,9", &addons())), vec!["A"]);
        assert_eq!(names(&select_addons("1,x,2", &addons())), vec!["A", "B"]);
    }

    #[test]
    fn duplicate_indices_are_deduplicated() {
        assert_eq!(names(&select_addons("2,2", &addons())), vec!["B"]);
    }

    #[test]
    fn fully_malformed_input_selects_nothing() {
        assert!(select_addons("x,y", &addons()).is_empty());
    }

    #[test]
    fn price_formatting() {
        assert_eq!(format_price(4000), "GH₵40.00");
        assert_eq!(format_price(205), "GH₵2.05");
    }
}
