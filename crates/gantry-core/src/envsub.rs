//! Environment placeholder substitution over serialized configuration text.
//!
//! Replaces `${NAME}` tokens with the value of the `NAME` environment
//! variable. Substitution runs over the serialized text, not the parsed
//! document, so placeholders work in keys and values alike.

use std::sync::LazyLock;

use regex::Regex;

static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([a-zA-Z0-9_]+)\}").unwrap());

/// Substitute environment placeholders in `text`.
///
/// Unknown variables are left as-is so the proxy fails with the original
/// placeholder visible. Empty values fall through to the placeholder,
/// same as unset.
pub fn substitute(text: &str) -> String {
    PLACEHOLDER_REGEX
        .replace_all(text, |caps: &regex::Captures<'_>| {
            std::env::var(&caps[1])
                .ok()
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_known_variable() {
        // SAFETY: test-only, no concurrent threads depend on this env var.
        unsafe { std::env::set_var("GANTRY_TEST_SUB_VAR", "secret-token") };
        let out = substitute(r#"{"key": "${GANTRY_TEST_SUB_VAR}"}"#);
        assert_eq!(out, r#"{"key": "secret-token"}"#);
        // SAFETY: test-only cleanup.
        unsafe { std::env::remove_var("GANTRY_TEST_SUB_VAR") };
    }

    #[test]
    fn test_unknown_variable_keeps_placeholder() {
        let out = substitute(r#"{"key": "${GANTRY_TEST_UNSET_VAR}"}"#);
        assert_eq!(out, r#"{"key": "${GANTRY_TEST_UNSET_VAR}"}"#);
    }

    #[test]
    fn test_empty_value_keeps_placeholder() {
        // SAFETY: test-only, no concurrent threads depend on this env var.
        unsafe { std::env::set_var("GANTRY_TEST_EMPTY_VAR", "") };
        let out = substitute("${GANTRY_TEST_EMPTY_VAR}");
        assert_eq!(out, "${GANTRY_TEST_EMPTY_VAR}");
        // SAFETY: test-only cleanup.
        unsafe { std::env::remove_var("GANTRY_TEST_EMPTY_VAR") };
    }

    #[test]
    fn test_multiple_occurrences_in_one_pass() {
        // SAFETY: test-only, no concurrent threads depend on this env var.
        unsafe { std::env::set_var("GANTRY_TEST_MULTI_VAR", "v") };
        let out = substitute("${GANTRY_TEST_MULTI_VAR}/${GANTRY_TEST_MULTI_VAR}");
        assert_eq!(out, "v/v");
        // SAFETY: test-only cleanup.
        unsafe { std::env::remove_var("GANTRY_TEST_MULTI_VAR") };
    }

    #[test]
    fn test_malformed_placeholders_untouched() {
        assert_eq!(substitute("${not-a-name}"), "${not-a-name}");
        assert_eq!(substitute("$PLAIN"), "$PLAIN");
        assert_eq!(substitute("${unclosed"), "${unclosed");
    }
}
