use serde::{Deserialize, Serialize};

use crate::types::{RawLanguage, RawRepo};

/// GraphQL request body
#[derive(Debug, Serialize)]
pub struct GraphQLRequest<'a> {
    pub query: &'a str,
    pub variables: UserQueryVariables<'a>,
}

#[derive(Debug, Serialize)]
pub struct UserQueryVariables<'a> {
    pub login: &'a str,
    #[serde(rename = "ownerAffiliations")]
    pub owner_affiliations: &'a [&'a str],
    pub after: Option<&'a str>,
}

/// GraphQL response wrapper
#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
}

impl GraphQLError {
    pub fn is_not_found(&self) -> bool {
        self.error_type.as_deref() == Some("NOT_FOUND")
    }
}

#[derive(Debug, Deserialize)]
pub struct UserQueryResponse {
    pub user: Option<UserData>,
}

#[derive(Debug, Deserialize)]
pub struct UserData {
    pub name: Option<String>,
    pub login: String,
    pub repositories: RepositoriesConnection,
}

impl UserData {
    /// Profile name, or the login when the profile has none
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.login.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RepositoriesConnection {
    #[serde(default)]
    pub nodes: Vec<RepositoryNode>,
    #[serde(rename = "pageInfo", default)]
    pub page_info: Option<PageInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageInfo {
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,
    #[serde(rename = "endCursor")]
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryNode {
    pub name: String,
    #[serde(rename = "isFork")]
    pub is_fork: bool,
    #[serde(rename = "stargazerCount")]
    pub stargazer_count: u64,
    #[serde(default)]
    pub languages: Option<LanguagesConnection>,
}

impl From<RepositoryNode> for RawRepo {
    fn from(node: RepositoryNode) -> Self {
        RawRepo {
            name: node.name,
            is_fork: node.is_fork,
            star_count: node.stargazer_count,
            languages: node
                .languages
                .map(|connection| {
                    connection
                        .edges
                        .into_iter()
                        .map(|edge| RawLanguage {
                            name: edge.node.name,
                            size: edge.size,
                            color: edge.node.color,
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LanguagesConnection {
    #[serde(default)]
    pub edges: Vec<LanguageEdge>,
}

#[derive(Debug, Deserialize)]
pub struct LanguageEdge {
    pub size: u64,
    pub node: LanguageNode,
}

#[derive(Debug, Deserialize)]
pub struct LanguageNode {
    pub name: String,
    pub color: Option<String>,
}

/// REST search response; only the total is used
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub total_count: u64,
}
