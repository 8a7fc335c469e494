//! Public share-link slugs and the passcode gate.

use rand::Rng;
use subtle::ConstantTimeEq;

/// Length of a public slug (alphanumeric, ~95 bits of entropy).
pub const SLUG_LENGTH: usize = 16;

/// Generate a fresh, unguessable public slug.
pub fn generate_public_slug() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(SLUG_LENGTH)
        .map(char::from)
        .collect()
}

/// Whether `candidate` unlocks a proposal protected by `stored`.
///
/// A proposal without a passcode cannot be unlocked. Stored passcodes are
/// trimmed on write, so the candidate is trimmed the same way before the
/// constant-time comparison.
pub fn passcode_matches(stored: Option<&str>, candidate: &str) -> bool {
    match stored {
        Some(stored) => stored.as_bytes().ct_eq(candidate.trim().as_bytes()).into(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn slug_has_expected_shape() {
        let slug = generate_public_slug();
        assert_eq!(slug.len(), SLUG_LENGTH);
        assert!(slug.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn slugs_do_not_repeat() {
        let slugs: HashSet<_> = (0..500).map(|_| generate_public_slug()).collect();
        assert_eq!(slugs.len(), 500);
    }

    #[test]
    fn passcode_must_match_exactly() {
        assert!(passcode_matches(Some("4711"), "4711"));
        assert!(!passcode_matches(Some("4711"), "4712"));
        assert!(!passcode_matches(Some("4711"), "47110"));
        assert!(!passcode_matches(Some("4711"), ""));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert!(passcode_matches(Some("4711"), " 4711"));
        assert!(passcode_matches(Some("4711"), "4711\n"));
        assert!(!passcode_matches(Some("4711"), "47 11"));
        assert!(!passcode_matches(Some("4711"), "   "));
    }

    #[test]
    fn unprotected_proposal_never_unlocks() {
        assert!(!passcode_matches(None, ""));
        assert!(!passcode_matches(None, "anything"));
    }
}
