//! Shared test utilities.

use contributed::github::MergedPullRequest;
use serde_json::{Value, json};

/// Strips the quotes that step placeholders capture around string values.
pub fn unquote(value: &str) -> &str {
    value.trim().trim_matches('"')
}

/// Builds a GraphQL response body carrying one page of merged pull requests.
pub fn graphql_page(
    records: &[MergedPullRequest],
    end_cursor: Option<&str>,
    has_next_page: bool,
) -> Value {
    let nodes: Vec<Value> = records
        .iter()
        .map(|record| {
            json!({
                "title": record.title,
                "permalink": record.link,
                "repository": {
                    "name": record.repo_name,
                    "owner": {
                        "login": record.repo_owner_login,
                        "avatarUrl": record.owner_avatar_url
                    }
                }
            })
        })
        .collect();

    json!({
        "data": {
            "user": {
                "pullRequests": {
                    "nodes": nodes,
                    "pageInfo": { "endCursor": end_cursor, "hasNextPage": has_next_page }
                }
            }
        }
    })
}

/// Builds the GraphQL response GitHub sends for an unknown login.
pub fn graphql_user_not_found(login: &str) -> Value {
    json!({
        "data": { "user": null },
        "errors": [{
            "type": "NOT_FOUND",
            "path": ["user"],
            "message": format!("Could not resolve to a User with the login of '{login}'.")
        }]
    })
}
