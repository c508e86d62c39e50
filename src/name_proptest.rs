//! Property-based tests for repository name derivation.
//!
//! These tests use proptest to generate random clone URLs and verify that
//! the naming invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::git::repo_name;
    use proptest::prelude::*;

    // ============================================================================
    // repo_name property tests
    // ============================================================================

    proptest! {
        /// Property: the derived name is the final segment without ".git"
        #[test]
        fn repo_name_strips_suffix_from_final_segment(
            host in "[a-z]{1,10}\\.(com|org)",
            owner in "[a-zA-Z0-9_-]{1,12}",
            name in "[a-zA-Z0-9_-]{1,20}",
        ) {
            let url = format!("https://{}/{}/{}.git", host, owner, name);
            prop_assert_eq!(repo_name(&url), name);
        }

        /// Property: deriving again once the suffix is gone changes nothing
        #[test]
        fn repo_name_is_idempotent(
            owner in "[a-zA-Z0-9_-]{1,12}",
            name in "[a-zA-Z0-9_-]{1,20}",
        ) {
            let url = format!("https://gist.github.com/{}/{}.git", owner, name);
            let once = repo_name(&url);
            let twice = repo_name(&once);
            prop_assert_eq!(once, twice);
        }

        /// Property: the derived name never contains a path separator
        #[test]
        fn repo_name_has_no_separators(input in ".*") {
            let result = repo_name(&input);
            prop_assert!(!result.contains('/'), "'{}' -> '{}'", input, result);
            prop_assert!(!result.contains(':'), "'{}' -> '{}'", input, result);
        }

        /// Property: distinct gist ids give distinct clone directory names
        #[test]
        fn repo_name_is_collision_free_for_distinct_ids(
            a in "[0-9a-f]{20,32}",
            b in "[0-9a-f]{20,32}",
        ) {
            prop_assume!(a != b);
            let url_a = format!("https://gist.github.com/{}.git", a);
            let url_b = format!("https://gist.github.com/{}.git", b);
            prop_assert_ne!(repo_name(&url_a), repo_name(&url_b));
        }
    }
}
