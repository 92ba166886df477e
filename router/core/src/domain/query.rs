// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

/// Normalized view of one incoming request.
///
/// Created per selection call and discarded with the response; nothing in the
/// core holds onto a `Query` across calls.
#[derive(Debug, Clone)]
pub struct Query {
    raw: String,
    tokens: Vec<String>,
    normalized: String,
}

impl Query {
    /// Lower-cases the input and splits it on non-alphanumeric boundaries.
    /// Hyphenated terms ("e2e-test") split into their parts; the joined
    /// normalized form is kept for phrase-level matching.
    pub fn parse(raw: &str) -> Self {
        let tokens: Vec<String> = raw
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        let normalized = tokens.join(" ");
        Self {
            raw: raw.to_string(),
            tokens,
            normalized,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// True when the pattern occurs in the query. Single-word patterns match
    /// on token equality; multi-word patterns match as a token subsequence of
    /// the normalized form, so "async mock" matches "async-mock" input too.
    pub fn contains_pattern(&self, pattern: &str) -> bool {
        let pattern = pattern.to_lowercase();
        if pattern.contains(char::is_whitespace) {
            let needle = Query::parse(&pattern).normalized;
            if needle.is_empty() {
                return false;
            }
            // Pad both with sentinels so "unit test" does not match "unit testing".
            format!(" {} ", self.normalized).contains(&format!(" {} ", needle))
        } else {
            self.tokens.iter().any(|t| t == &pattern)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case_and_punctuation() {
        let q = Query::parse("Pytest: Test FAILURES, async-mock config!");
        assert_eq!(
            q.tokens(),
            &["pytest", "test", "failures", "async", "mock", "config"]
        );
        assert_eq!(q.raw(), "Pytest: Test FAILURES, async-mock config!");
    }

    #[test]
    fn test_empty_query_is_allowed() {
        let q = Query::parse("   \t  ");
        assert!(q.is_empty());
        assert!(!q.contains_pattern("anything"));
    }

    #[test]
    fn test_single_word_pattern_matches_whole_tokens_only() {
        let q = Query::parse("integration testing pipeline");
        assert!(q.contains_pattern("testing"));
        assert!(!q.contains_pattern("test"));
    }

    #[test]
    fn test_phrase_pattern_matches_across_punctuation() {
        let q = Query::parse("failures with async-mock configuration");
        assert!(q.contains_pattern("async mock"));
        assert!(!q.contains_pattern("mock async"));
    }
}
