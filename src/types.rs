//! # Common Types
//!
//! This module contains the common types used throughout the service for
//! representing upstream activity data, request filters, aggregated statistics
//! and the cache keys those statistics are stored under.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Color used for languages the upstream reports without one, and for the
/// synthetic "Other" bucket.
pub const DEFAULT_LANGUAGE_COLOR: &str = "#858585";

/// Name of the synthetic bucket holding every language outside the top five.
pub const OTHER_LANGUAGE_NAME: &str = "Other";

/// One language entry of a repository, in upstream order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLanguage {
    pub name: String,
    pub size: u64,
    pub color: Option<String>,
}

impl RawLanguage {
    pub fn new(name: impl Into<String>, size: u64, color: Option<&str>) -> Self {
        Self {
            name: name.into(),
            size,
            color: color.map(str::to_string),
        }
    }
}

/// A repository as reported by the upstream provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRepo {
    pub name: String,
    pub is_fork: bool,
    pub star_count: u64,
    /// Language breakdown in upstream order. The order decides ties when two
    /// languages end up with the same byte total.
    pub languages: Vec<RawLanguage>,
}

/// Everything the upstream provider knows about a user, before filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStats {
    /// Display name, already falling back to the login when the profile has none
    pub name: String,
    pub repositories: Vec<RawRepo>,
    pub total_issues: u64,
    pub total_prs: u64,
    pub total_commits: u64,
    pub last_month_commits: u64,
}

/// Caller-supplied filters for one stats request.
///
/// Both name sets are ordered sets so that the derived [`CacheKey`] never
/// depends on the order the caller listed them in. [`FilterConfig::new`]
/// stores hidden language names lower-cased, but matching lower-cases both
/// sides, so filters built any other way behave the same.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterConfig {
    pub excluded_repo_names: BTreeSet<String>,
    pub hidden_language_names: BTreeSet<String>,
    pub include_orgs: bool,
}

impl FilterConfig {
    pub fn new<E, H>(excluded_repos: E, hidden_languages: H, include_orgs: bool) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        H: IntoIterator,
        H::Item: AsRef<str>,
    {
        Self {
            excluded_repo_names: excluded_repos.into_iter().map(Into::into).collect(),
            hidden_language_names: hidden_languages
                .into_iter()
                .map(|name| name.as_ref().to_lowercase())
                .collect(),
            include_orgs,
        }
    }

    /// Filter with no exclusions, as used by the cache warmup.
    pub fn unfiltered(include_orgs: bool) -> Self {
        Self {
            include_orgs,
            ..Self::default()
        }
    }

    pub fn excludes_repo(&self, repo_name: &str) -> bool {
        self.excluded_repo_names.contains(repo_name)
    }

    pub fn hides_language(&self, language_name: &str) -> bool {
        let language_name = language_name.to_lowercase();
        self.hidden_language_names.contains(&language_name)
            || self
                .hidden_language_names
                .iter()
                .any(|hidden| hidden.to_lowercase() == language_name)
    }
}

/// A ranked language with the geometry a donut renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageStat {
    pub name: String,
    pub byte_total: u64,
    /// Share of all counted bytes, 0 to 100
    pub percentage: f64,
    /// Percentage rounded half-up, e.g. "67%"
    pub formatted_percentage: String,
    pub color: String,
    /// Length of this language's arc on the donut circumference
    pub arc_length: f64,
    /// Negated sum of the arc lengths drawn before this one
    pub arc_offset: f64,
}

/// The aggregated statistics for one request shape.
///
/// This is the unit stored in the stats cache and handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsResult {
    pub name: String,
    pub total_stars: u64,
    pub total_commits: u64,
    pub last_month_commits: u64,
    pub total_prs: u64,
    pub total_issues: u64,
    /// At most six entries: the top five languages plus an optional "Other"
    pub languages: Vec<LanguageStat>,
}

/// A key used for caching stats results based on the full request shape.
///
/// Built from a username and a [`FilterConfig`]; the name collections are kept
/// sorted and de-duplicated so logically identical requests always collide.
#[derive(Debug, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct CacheKey {
    /// The upstream login the stats belong to
    pub username: String,
    /// Whether organization repositories were requested
    pub include_orgs: bool,
    /// Excluded repository names, sorted
    pub excluded_repos: Vec<String>,
    /// Hidden language names, lower-cased and sorted
    pub hidden_languages: Vec<String>,
}

impl CacheKey {
    pub fn new(username: &str, filter: &FilterConfig) -> Self {
        // Lower-casing can reorder or merge names, so collect through a set again
        let hidden_languages: BTreeSet<String> = filter
            .hidden_language_names
            .iter()
            .map(|name| name.to_lowercase())
            .collect();

        Self {
            username: username.to_string(),
            include_orgs: filter.include_orgs,
            excluded_repos: filter.excluded_repo_names.iter().cloned().collect(),
            hidden_languages: hidden_languages.into_iter().collect(),
        }
    }
}

/// Key of one upstream fetch. Every filter shape for the same user and
/// organization setting shares it.
#[derive(Debug, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct FetchKey {
    pub username: String,
    pub include_orgs: bool,
}

impl FetchKey {
    pub fn new(username: &str, include_orgs: bool) -> Self {
        Self {
            username: username.to_string(),
            include_orgs,
        }
    }
}

impl From<&CacheKey> for FetchKey {
    fn from(key: &CacheKey) -> Self {
        Self::new(&key.username, key.include_orgs)
    }
}

impl fmt::Display for FetchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|orgs={}", self.username, self.include_orgs)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|orgs={}|exclude={}|hide={}",
            self.username,
            self.include_orgs,
            self.excluded_repos.join(","),
            self.hidden_languages.join(",")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_hidden_languages_match_regardless_of_construction() {
        let literal = FilterConfig {
            hidden_language_names: BTreeSet::from(["HTML".to_string()]),
            ..FilterConfig::default()
        };
        let parsed: FilterConfig = serde_json::from_str(
            r#"{"excluded_repo_names":[],"hidden_language_names":["HTML"],"include_orgs":false}"#,
        )
        .unwrap();
        let normalized = FilterConfig::new(Vec::<String>::new(), ["html"], false);

        for filter in [&literal, &parsed, &normalized] {
            assert!(filter.hides_language("HTML"));
            assert!(filter.hides_language("html"));
            assert!(!filter.hides_language("CSS"));
        }
    }

    #[test]
    fn test_cache_key_folds_hidden_language_case() {
        let literal = FilterConfig {
            excluded_repo_names: BTreeSet::from(["b".to_string(), "a".to_string()]),
            hidden_language_names: BTreeSet::from(["HTML".to_string(), "html".to_string(), "Css".to_string()]),
            include_orgs: false,
        };
        let key = CacheKey::new("octo", &literal);

        assert_eq!(key.excluded_repos, vec!["a", "b"]);
        assert_eq!(key.hidden_languages, vec!["css", "html"]);
        assert_eq!(
            key,
            CacheKey::new("octo", &FilterConfig::new(["a", "b"], ["css", "HTML"], false))
        );
    }

    #[test]
    fn test_fetch_key_ignores_filters() {
        let plain = CacheKey::new("octo", &FilterConfig::default());
        let filtered = CacheKey::new("octo", &FilterConfig::new(["repo"], ["go"], false));

        assert_eq!(FetchKey::from(&plain), FetchKey::from(&filtered));
        assert_ne!(FetchKey::from(&plain), FetchKey::new("octo", true));
        assert_eq!(FetchKey::new("octo", true).to_string(), "octo|orgs=true");
    }
}
