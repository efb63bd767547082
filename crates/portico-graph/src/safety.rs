//! Lexical safety filter for Cypher queries.
//!
//! Detects write queries the simple way: a case-insensitive substring search
//! for write keywords. This also blocks some valid read-queries (a query
//! touching a property named `settings` matches `set`). That over-blocking is
//! an accepted trade-off of the policy, not something to fix with a parser.

/// Substrings that mark a query as mutating.
const WRITE_KEYWORDS: [&str; 4] = ["merge", "create", "delete", "set"];

/// Classification of a single query, computed once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafetyVerdict {
    pub allowed: bool,
    /// The keyword that triggered rejection, or the name of the passing rule.
    pub rule: &'static str,
}

/// Classify a query as allowed (read-only) or rejected (mutating).
///
/// Never fails: every query gets a verdict.
pub fn classify(query: &str) -> SafetyVerdict {
    let lowered = query.to_lowercase();
    for keyword in WRITE_KEYWORDS {
        if lowered.contains(keyword) {
            return SafetyVerdict {
                allowed: false,
                rule: keyword,
            };
        }
    }
    SafetyVerdict {
        allowed: true,
        rule: "no-write-keyword",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_query_allowed() {
        assert!(classify("MATCH (n:Item) RETURN n LIMIT 10").allowed);
        assert!(classify("match (a)-[r]->(b) return a, r, b").allowed);
    }

    #[test]
    fn test_write_keywords_rejected_any_case() {
        for query in [
            "CREATE (n:Item)",
            "create (n:Item)",
            "MATCH (n) DELETE n",
            "MERGE (n:Item {id: 1})",
            "MATCH (n) SET n.x = 1",
            "MaTcH (n) dElEtE n",
        ] {
            let verdict = classify(query);
            assert!(!verdict.allowed, "expected rejection: {query}");
        }
    }

    #[test]
    fn test_substring_overblocking_is_intended() {
        // `settings` contains `set`: a valid read query, still rejected.
        let verdict = classify("MATCH (n) RETURN n.settings");
        assert!(!verdict.allowed);
        assert_eq!(verdict.rule, "set");

        // Same for `created_at` and `merged`.
        assert!(!classify("MATCH (n) RETURN n.created_at").allowed);
        assert!(!classify("MATCH (n) WHERE n.merged RETURN n").allowed);
    }

    #[test]
    fn test_rejection_names_the_keyword() {
        assert_eq!(classify("MERGE (n)").rule, "merge");
        assert_eq!(classify("MATCH (n) RETURN n").rule, "no-write-keyword");
    }
}
