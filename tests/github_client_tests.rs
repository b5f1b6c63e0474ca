use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use gitstats_card::github::{GithubClient, StatsProvider};
use gitstats_card::StatsError;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Requests the fake GitHub received
#[derive(Default)]
struct Recorded {
    graphql_variables: Vec<Value>,
    search_queries: Vec<String>,
    authorization: Option<String>,
    api_version: Option<String>,
}

type Shared = Arc<Mutex<Recorded>>;

fn repo(name: &str, stars: u64, is_fork: bool, languages: Value) -> Value {
    json!({
        "name": name,
        "isFork": is_fork,
        "stargazerCount": stars,
        "languages": { "edges": languages }
    })
}

async fn graphql(State(recorded): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let variables = body["variables"].clone();
    {
        let mut recorded = recorded.lock().unwrap();
        recorded.graphql_variables.push(variables.clone());
        recorded.authorization = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        recorded.api_version = headers
            .get("x-github-api-version")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
    }

    match variables["login"].as_str() {
        Some("ghost") => (
            StatusCode::OK,
            Json(json!({
                "data": { "user": null },
                "errors": [{ "type": "NOT_FOUND", "message": "Could not resolve to a User with the login of 'ghost'." }]
            })),
        ),
        Some("gone") => (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))),
        Some("broken") => (StatusCode::BAD_GATEWAY, Json(json!({ "message": "Bad Gateway" }))),
        _ if variables["after"].is_null() => (
            StatusCode::OK,
            Json(json!({
                "data": { "user": {
                    "name": "Test User",
                    "login": "testuser",
                    "repositories": {
                        "nodes": [repo("repo1", 10, false, json!([
                            { "size": 1000, "node": { "name": "Kotlin", "color": "#A97BFF" } }
                        ]))],
                        "pageInfo": { "hasNextPage": true, "endCursor": "page-2" }
                    }
                }}
            })),
        ),
        _ => (
            StatusCode::OK,
            Json(json!({
                "data": { "user": {
                    "name": "Test User",
                    "login": "testuser",
                    "repositories": {
                        "nodes": [repo("repo2", 5, false, json!([
                            { "size": 500, "node": { "name": "Java", "color": null } }
                        ]))],
                        "pageInfo": { "hasNextPage": false, "endCursor": null }
                    }
                }}
            })),
        ),
    }
}

async fn search(State(recorded): State<Shared>, Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    let q = params.get("q").cloned().unwrap_or_default();
    recorded.lock().unwrap().search_queries.push(q.clone());

    if q.contains("author-date:") {
        return (StatusCode::FORBIDDEN, Json(json!({ "message": "rate limited" })));
    }
    let total = if q.starts_with("type:issue") {
        3
    } else if q.starts_with("type:pr") {
        5
    } else {
        100
    };
    (StatusCode::OK, Json(json!({ "total_count": total, "items": [] })))
}

async fn spawn_fake_github() -> (String, Shared) {
    let recorded = Shared::default();
    let app = Router::new()
        .route("/graphql", post(graphql))
        .route("/search/issues", get(search))
        .route("/search/commits", get(search))
        .with_state(Arc::clone(&recorded));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/"), recorded)
}

#[tokio::test]
async fn test_fetch_raw_stats_follows_pages_and_counts() {
    let (base_url, recorded) = spawn_fake_github().await;
    let client = GithubClient::new(base_url, Some("secret-token")).unwrap();

    let raw = client.fetch_raw_stats("testuser", false).await.unwrap();

    assert_eq!(raw.name, "Test User");
    let names: Vec<&str> = raw.repositories.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["repo1", "repo2"]);
    assert_eq!(raw.repositories[0].languages[0].color.as_deref(), Some("#A97BFF"));
    assert_eq!(raw.repositories[1].languages[0].color, None);
    assert_eq!(raw.total_issues, 3);
    assert_eq!(raw.total_prs, 5);
    assert_eq!(raw.total_commits, 100);
    // the last-30-days search is rejected upstream and degrades to zero
    assert_eq!(raw.last_month_commits, 0);

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.graphql_variables.len(), 2);
    assert_eq!(recorded.graphql_variables[0]["ownerAffiliations"], json!(["OWNER"]));
    assert_eq!(recorded.graphql_variables[1]["after"], json!("page-2"));
    assert_eq!(recorded.authorization.as_deref(), Some("Bearer secret-token"));
    assert_eq!(recorded.api_version.as_deref(), Some("2022-11-28"));

    let mut queries = recorded.search_queries.clone();
    queries.sort();
    assert_eq!(queries.len(), 4);
    assert_eq!(queries[0], "author:testuser");
    assert!(queries[1].starts_with("author:testuser author-date:"));
    assert_eq!(queries[2], "type:issue author:testuser");
    assert_eq!(queries[3], "type:pr author:testuser");
}

#[tokio::test]
async fn test_include_orgs_requests_organization_repositories() {
    let (base_url, recorded) = spawn_fake_github().await;
    let client = GithubClient::new(base_url, None).unwrap();

    client.fetch_raw_stats("testuser", true).await.unwrap();

    let recorded = recorded.lock().unwrap();
    assert_eq!(
        recorded.graphql_variables[0]["ownerAffiliations"],
        json!(["OWNER", "ORGANIZATION_MEMBER"])
    );
    assert_eq!(recorded.authorization, None);
}

#[tokio::test]
async fn test_missing_users_are_not_found() {
    let (base_url, recorded) = spawn_fake_github().await;
    let client = GithubClient::new(base_url, None).unwrap();

    let err = client.fetch_raw_stats("ghost", false).await.unwrap_err();
    assert_eq!(err, StatsError::UserNotFound("ghost".to_string()));

    let err = client.fetch_raw_stats("gone", false).await.unwrap_err();
    assert!(err.is_not_found());

    // no counting queries are issued for a user that does not exist
    assert!(recorded.lock().unwrap().search_queries.is_empty());
}

#[tokio::test]
async fn test_upstream_failure_is_unavailable() {
    let (base_url, _recorded) = spawn_fake_github().await;
    let client = GithubClient::new(base_url, None).unwrap();

    let err = client.fetch_raw_stats("broken", false).await.unwrap_err();
    assert!(matches!(err, StatsError::UpstreamUnavailable(_)));
}
