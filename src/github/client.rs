use async_trait::async_trait;
use chrono::{Months, NaiveDate, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use tracing::{debug, warn};

use super::types::{
    GraphQLRequest, GraphQLResponse, SearchResponse, UserData, UserQueryResponse,
    UserQueryVariables,
};
use super::{CountOutcome, StatsProvider};
use crate::error::{Result, StatsError};
use crate::types::{RawRepo, RawStats};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";
const MAX_REPOSITORY_PAGES: usize = 10;

const USER_REPOSITORIES_QUERY: &str = r#"
query($login: String!, $ownerAffiliations: [RepositoryAffiliation], $after: String) {
  user(login: $login) {
    name
    login
    repositories(first: 100, after: $after, ownerAffiliations: $ownerAffiliations, orderBy: {field: STARGAZERS, direction: DESC}) {
      nodes {
        name
        isFork
        stargazerCount
        languages(first: 10, orderBy: {field: SIZE, direction: DESC}) {
          edges {
            size
            node {
              name
              color
            }
          }
        }
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
  }
}
"#;

/// Activity counts gathered from the search API
#[derive(Debug, Clone, PartialEq, Eq)]
struct ActivityCounts {
    issues: CountOutcome,
    prs: CountOutcome,
    commits: CountOutcome,
    last_month_commits: CountOutcome,
}

/// GitHub client: GraphQL for the profile and repositories, REST search for
/// the activity counts.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
}

impl GithubClient {
    pub fn new(base_url: impl Into<String>, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));
        if let Some(token) = token.map(str::trim).filter(|token| !token.is_empty()) {
            let mut bearer = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|err| {
                StatsError::UpstreamUnavailable(format!("invalid GitHub token: {err}"))
            })?;
            bearer.set_sensitive(true);
            headers.insert(AUTHORIZATION, bearer);
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Display name and repositories, following pagination
    async fn fetch_user(&self, username: &str, include_orgs: bool) -> Result<(String, Vec<RawRepo>)> {
        let affiliations: &[&str] = if include_orgs {
            &["OWNER", "ORGANIZATION_MEMBER"]
        } else {
            &["OWNER"]
        };

        let mut display_name = None;
        let mut repositories = Vec::new();
        let mut cursor: Option<String> = None;

        for page in 0..MAX_REPOSITORY_PAGES {
            let request = GraphQLRequest {
                query: USER_REPOSITORIES_QUERY,
                variables: UserQueryVariables {
                    login: username,
                    owner_affiliations: affiliations,
                    after: cursor.as_deref(),
                },
            };
            let response = self
                .http
                .post(format!("{}/graphql", self.base_url))
                .json(&request)
                .send()
                .await?;
            let body = read_json::<GraphQLResponse<UserQueryResponse>>(username, response).await?;
            let user = user_from_response(username, body)?;

            display_name.get_or_insert_with(|| user.display_name());
            let page_info = user.repositories.page_info;
            repositories.extend(user.repositories.nodes.into_iter().map(RawRepo::from));
            debug!(username, page, repositories = repositories.len(), "fetched repository page");

            match page_info {
                Some(info) if info.has_next_page && info.end_cursor.is_some() => {
                    cursor = info.end_cursor;
                }
                _ => break,
            }
        }

        let name = display_name.unwrap_or_else(|| username.to_string());
        Ok((name, repositories))
    }

    async fn search_count(&self, endpoint: &str, query: &str) -> Result<u64> {
        let response = self
            .http
            .get(format!("{}/search/{endpoint}", self.base_url))
            .query(&[("q", query)])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StatsError::UpstreamUnavailable(format!(
                "search/{endpoint} returned {status}"
            )));
        }
        Ok(response.json::<SearchResponse>().await?.total_count)
    }

    async fn fetch_counts(&self, username: &str) -> ActivityCounts {
        let issues_query = format!("type:issue author:{username}");
        let prs_query = format!("type:pr author:{username}");
        let commits_query = format!("author:{username}");
        let recent_query = last_month_commits_query(username, Utc::now().date_naive());

        let (issues, prs, commits, last_month_commits) = futures::join!(
            self.search_count("issues", &issues_query),
            self.search_count("issues", &prs_query),
            self.search_count("commits", &commits_query),
            self.search_count("commits", &recent_query),
        );

        let counts = ActivityCounts {
            issues: issues.into(),
            prs: prs.into(),
            commits: commits.into(),
            last_month_commits: last_month_commits.into(),
        };
        for (label, outcome) in [
            ("issues", &counts.issues),
            ("prs", &counts.prs),
            ("commits", &counts.commits),
            ("last_month_commits", &counts.last_month_commits),
        ] {
            if let CountOutcome::Degraded(reason) = outcome {
                warn!(username, count = label, %reason, "count unavailable, reporting 0");
            }
        }
        counts
    }
}

#[async_trait]
impl StatsProvider for GithubClient {
    async fn fetch_raw_stats(&self, username: &str, include_orgs: bool) -> Result<RawStats> {
        let (name, repositories) = self.fetch_user(username, include_orgs).await?;
        let counts = self.fetch_counts(username).await;

        Ok(RawStats {
            name,
            repositories,
            total_issues: counts.issues.value(),
            total_prs: counts.prs.value(),
            total_commits: counts.commits.value(),
            last_month_commits: counts.last_month_commits.value(),
        })
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(username: &str, response: Response) -> Result<T> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(StatsError::UserNotFound(username.to_string()));
    }
    if !status.is_success() {
        return Err(StatsError::UpstreamUnavailable(format!(
            "GitHub GraphQL returned {status}"
        )));
    }
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Pull the user out of a GraphQL response, mapping missing users and
/// `NOT_FOUND` errors to [`StatsError::UserNotFound`].
fn user_from_response(username: &str, response: GraphQLResponse<UserQueryResponse>) -> Result<UserData> {
    let errors = response.errors.unwrap_or_default();
    if errors.iter().any(|err| err.is_not_found()) {
        return Err(StatsError::UserNotFound(username.to_string()));
    }
    if let Some(user) = response.data.and_then(|data| data.user) {
        return Ok(user);
    }
    if errors.is_empty() {
        return Err(StatsError::UserNotFound(username.to_string()));
    }
    let messages: Vec<&str> = errors.iter().map(|err| err.message.as_str()).collect();
    Err(StatsError::UpstreamUnavailable(messages.join("; ")))
}

/// Search query for commits authored within the month before `today`
fn last_month_commits_query(username: &str, today: NaiveDate) -> String {
    let month_ago = today.checked_sub_months(Months::new(1)).unwrap_or(today);
    format!(
        "author:{username} author-date:{}..{}",
        month_ago.format("%Y-%m-%d"),
        today.format("%Y-%m-%d")
    )
}
