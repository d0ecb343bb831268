use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::github::PullRequestRef;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("GITHUB_EVENT_PATH is not set; pass --event or run inside a workflow")]
    MissingEventPath,

    #[error("Failed to read event payload: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse event payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("This tool can only run for a pull request event")]
    NoPullRequest,

    #[error("Repository identity not found in GITHUB_REPOSITORY or the event payload")]
    MissingRepository,

    #[error("Invalid repository identity: {0}")]
    InvalidRepository(String),
}

/// Pull request data extracted from the triggering event.
#[derive(Debug, Clone)]
pub struct PullRequestContext {
    pub pr: PullRequestRef,
    /// Name of the head branch, the carrier of the issue keys.
    pub head_branch: String,
    /// Current description text; GitHub sends null for an empty description.
    pub body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    pull_request: Option<PullRequestPayload>,
    repository: Option<RepositoryPayload>,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    number: u64,
    body: Option<String>,
    head: HeadPayload,
}

#[derive(Debug, Deserialize)]
struct HeadPayload {
    #[serde(rename = "ref")]
    branch: String,
}

#[derive(Debug, Deserialize)]
struct RepositoryPayload {
    full_name: String,
}

/// Load the pull request context from the workflow event payload.
///
/// The payload file is named by `GITHUB_EVENT_PATH` unless an override path
/// is given. Aborts with [`EventError::NoPullRequest`] when the triggering
/// event carries no pull request.
pub fn load(event_override: Option<&Path>) -> Result<PullRequestContext, EventError> {
    let path = match event_override {
        Some(path) => path.to_path_buf(),
        None => std::env::var("GITHUB_EVENT_PATH")
            .map(PathBuf::from)
            .map_err(|_| EventError::MissingEventPath)?,
    };
    let repo_env = std::env::var("GITHUB_REPOSITORY").ok();
    load_from(&path, repo_env.as_deref())
}

/// Load from a specific payload file with an explicit `owner/repo` value
/// (useful for testing).
pub fn load_from(path: &Path, repo_env: Option<&str>) -> Result<PullRequestContext, EventError> {
    debug!(path = %path.display(), "reading event payload");
    let raw = fs::read_to_string(path)?;
    let EventPayload {
        pull_request,
        repository,
    } = serde_json::from_str(&raw)?;

    let pull_request = pull_request.ok_or(EventError::NoPullRequest)?;
    let (owner, repo) = resolve_repository(repo_env, repository.as_ref())?;

    Ok(PullRequestContext {
        pr: PullRequestRef {
            owner,
            repo,
            number: pull_request.number,
        },
        head_branch: pull_request.head.branch,
        body: pull_request.body,
    })
}

/// Resolve `owner/repo`, preferring `GITHUB_REPOSITORY` over the payload's
/// `repository.full_name`.
fn resolve_repository(
    env_value: Option<&str>,
    payload: Option<&RepositoryPayload>,
) -> Result<(String, String), EventError> {
    let full_name = env_value
        .map(str::to_string)
        .or_else(|| payload.map(|repo| repo.full_name.clone()))
        .ok_or(EventError::MissingRepository)?;

    match full_name.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(EventError::InvalidRepository(full_name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_payload(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_pull_request_context() {
        let file = write_payload(
            r#"{
                "pull_request": {
                    "number": 42,
                    "body": "hello",
                    "head": { "ref": "feature/add-login/JIRA-42" }
                },
                "repository": { "full_name": "octo/demo" }
            }"#,
        );
        let context = load_from(file.path(), None).unwrap();
        assert_eq!(context.pr.owner, "octo");
        assert_eq!(context.pr.repo, "demo");
        assert_eq!(context.pr.number, 42);
        assert_eq!(context.head_branch, "feature/add-login/JIRA-42");
        assert_eq!(context.body.as_deref(), Some("hello"));
    }

    #[test]
    fn test_null_body_is_absent() {
        let file = write_payload(
            r#"{
                "pull_request": {
                    "number": 7,
                    "body": null,
                    "head": { "ref": "main" }
                },
                "repository": { "full_name": "octo/demo" }
            }"#,
        );
        let context = load_from(file.path(), None).unwrap();
        assert_eq!(context.body, None);
    }

    #[test]
    fn test_missing_pull_request_is_context_error() {
        let file = write_payload(r#"{ "repository": { "full_name": "octo/demo" } }"#);
        let err = load_from(file.path(), None).unwrap_err();
        assert!(matches!(err, EventError::NoPullRequest));
    }

    #[test]
    fn test_env_repository_wins_over_payload() {
        let file = write_payload(
            r#"{
                "pull_request": {
                    "number": 1,
                    "body": "x",
                    "head": { "ref": "a/b/K-1" }
                },
                "repository": { "full_name": "payload/repo" }
            }"#,
        );
        let context = load_from(file.path(), Some("env-owner/env-repo")).unwrap();
        assert_eq!(context.pr.owner, "env-owner");
        assert_eq!(context.pr.repo, "env-repo");
    }

    #[test]
    fn test_resolve_repository_rejects_malformed() {
        assert!(matches!(
            resolve_repository(Some("no-slash"), None),
            Err(EventError::InvalidRepository(_))
        ));
        assert!(matches!(
            resolve_repository(Some("/repo"), None),
            Err(EventError::InvalidRepository(_))
        ));
        assert!(matches!(
            resolve_repository(None, None),
            Err(EventError::MissingRepository)
        ));
    }
}
