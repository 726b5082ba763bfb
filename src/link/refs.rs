//! Issue reference extraction from pull-request text.
//!
//! Pure text analysis: no I/O, no external calls. Four strategies scan
//! the concatenated title and body in fixed precedence order; results
//! are deduplicated by case-insensitive `owner/repo#number`.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

/// A parsed pointer to a candidate issue extracted from PR text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueReference {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Issue number.
    pub number: u64,
    /// `true` if the reference was qualified by an action keyword such
    /// as "fixes" or "closes", signaling intent rather than mention.
    pub is_explicit: bool,
}

impl IssueReference {
    fn key(&self) -> String {
        format!("{}/{}#{}", self.owner.to_lowercase(), self.repo.to_lowercase(), self.number)
    }
}

/// Deduplicating reference collection.
///
/// Insert rule: first writer for a key wins, except that an explicit
/// reference replaces an implicit one for the same key.
#[derive(Debug, Default)]
struct RefSet {
    refs: HashMap<String, IssueReference>,
}

impl RefSet {
    fn insert(&mut self, reference: IssueReference) {
        match self.refs.entry(reference.key()) {
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(reference);
            }
            std::collections::hash_map::Entry::Occupied(mut entry) => {
                if reference.is_explicit && !entry.get().is_explicit {
                    entry.insert(reference);
                }
            }
        }
    }

    fn into_vec(self) -> Vec<IssueReference> {
        self.refs.into_values().collect()
    }
}

// Match: fixes #123, closes #456, resolves #789
fn keyword_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(fix|fixes|fixed|close|closes|closed|resolve|resolves|resolved)\s+#(\d+)",
        )
        .unwrap()
    })
}

// Match: owner/repo#123
fn cross_repo_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b([A-Za-z0-9_-]+)/([A-Za-z0-9_-]+)#(\d+)\b").unwrap())
}

// Match: https://github.com/owner/repo/issues/123
fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"https?://github\.com/([A-Za-z0-9_-]+)/([A-Za-z0-9_-]+)/issues/(\d+)").unwrap()
    })
}

// Match: #123 (not part of owner/repo#123)
fn bare_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\B#(\d+)\b").unwrap())
}

/// Extracts all issue references from a PR title and body.
///
/// References without their own owner/repo (keyword and bare forms) are
/// attributed to `default_owner`/`default_repo`. A number appearing in
/// multiple forms collapses to one reference, explicit if any form was
/// explicit. Malformed numbers (overflow) are silently skipped per
/// reference. Output order is unspecified.
#[must_use]
pub fn extract_references(
    title: &str,
    body: &str,
    default_owner: &str,
    default_repo: &str,
) -> Vec<IssueReference> {
    let text = format!("{title}\n{body}");
    let mut refs = RefSet::default();

    // Keyword references run first: the most authoritative signal.
    for caps in keyword_re().captures_iter(&text) {
        let Ok(number) = caps[2].parse::<u64>() else { continue };
        refs.insert(IssueReference {
            owner: default_owner.to_string(),
            repo: default_repo.to_string(),
            number,
            is_explicit: true,
        });
    }

    for caps in cross_repo_re().captures_iter(&text) {
        let Ok(number) = caps[3].parse::<u64>() else { continue };
        refs.insert(IssueReference {
            owner: caps[1].to_string(),
            repo: caps[2].to_string(),
            number,
            is_explicit: false,
        });
    }

    for caps in url_re().captures_iter(&text) {
        let Ok(number) = caps[3].parse::<u64>() else { continue };
        refs.insert(IssueReference {
            owner: caps[1].to_string(),
            repo: caps[2].to_string(),
            number,
            is_explicit: false,
        });
    }

    // Bare references run last so they never override qualified forms.
    for caps in bare_re().captures_iter(&text) {
        let Ok(number) = caps[1].parse::<u64>() else { continue };
        refs.insert(IssueReference {
            owner: default_owner.to_string(),
            repo: default_repo.to_string(),
            number,
            is_explicit: false,
        });
    }

    refs.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(title: &str, body: &str) -> Vec<IssueReference> {
        extract_references(title, body, "acme", "app")
    }

    fn sorted(mut refs: Vec<IssueReference>) -> Vec<IssueReference> {
        refs.sort_by(|a, b| a.key().cmp(&b.key()));
        refs
    }

    #[test]
    fn empty_input_yields_no_references() {
        assert!(extract("", "").is_empty());
    }

    #[test]
    fn keyword_reference_is_explicit_and_uses_default_repo() {
        let refs = extract("Fix login", "Closes #42");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].owner, "acme");
        assert_eq!(refs[0].repo, "app");
        assert_eq!(refs[0].number, 42);
        assert!(refs[0].is_explicit);
    }

    #[test]
    fn all_keyword_variants_match_case_insensitively() {
        for kw in [
            "fix", "Fixes", "FIXED", "close", "Closes", "closed", "resolve", "Resolves",
            "RESOLVED",
        ] {
            let refs = extract("", &format!("{kw} #7"));
            assert_eq!(refs.len(), 1, "keyword {kw} did not match");
            assert!(refs[0].is_explicit, "keyword {kw} not explicit");
        }
    }

    #[test]
    fn keyword_without_space_does_not_match() {
        assert!(extract("", "fixes#5").is_empty());
    }

    #[test]
    fn bare_reference_uses_default_repo() {
        let refs = extract("", "Related to #9");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].number, 9);
        assert!(!refs[0].is_explicit);
    }

    #[test]
    fn keyword_and_bare_forms_collapse_to_one_explicit_reference() {
        let refs = extract("", "fixes #7 and see #7");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].number, 7);
        assert!(refs[0].is_explicit);
    }

    #[test]
    fn cross_repo_reference_keeps_its_own_repo() {
        let refs = extract("", "Depends on acme/widgets#9");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].owner, "acme");
        assert_eq!(refs[0].repo, "widgets");
        assert_eq!(refs[0].number, 9);
        assert!(!refs[0].is_explicit);
    }

    #[test]
    fn cross_repo_and_bare_same_number_are_distinct() {
        let refs = sorted(extract("", "acme/widgets#9 relates to #9"));
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].repo, "app");
        assert_eq!(refs[1].repo, "widgets");
        assert_eq!(refs[0].number, 9);
        assert_eq!(refs[1].number, 9);
    }

    #[test]
    fn url_reference_is_parsed() {
        let refs = extract("", "See https://github.com/other/tool/issues/15 for context");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].owner, "other");
        assert_eq!(refs[0].repo, "tool");
        assert_eq!(refs[0].number, 15);
        assert!(!refs[0].is_explicit);
    }

    #[test]
    fn dedup_key_is_case_insensitive() {
        let refs = extract("", "Acme/Widgets#3 and acme/widgets#3");
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn number_overflow_is_skipped_without_aborting() {
        let refs = extract("", "#99999999999999999999999999 and #4");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].number, 4);
    }

    #[test]
    fn extraction_is_idempotent() {
        let body = "fixes #7, acme/widgets#9, https://github.com/a/b/issues/1, #12";
        let first = sorted(extract("t", body));
        let second = sorted(extract("t", body));
        assert_eq!(first, second);
    }

    #[test]
    fn title_and_body_are_both_scanned() {
        let refs = sorted(extract("Fixes #1", "and touches #2"));
        assert_eq!(refs.len(), 2);
    }
}
