pub mod types;

pub use types::PullRequestRef;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, error, instrument};

use types::UpdatePullRequest;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("GitHub API request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// The one GitHub operation this tool performs, behind a trait so tests can
/// substitute a stub for the hosted API.
#[async_trait]
pub trait PullRequestApi: Send + Sync {
    /// Replace the description of a pull request, returning the HTTP status
    /// of the update. A non-success status is handed back to the caller
    /// rather than raised; only transport failures are errors.
    async fn update_body(&self, pr: &PullRequestRef, body: &str) -> Result<StatusCode, ApiError>;
}

pub struct GitHubClient {
    http: reqwest::Client,
    token: String,
}

impl GitHubClient {
    pub fn new(token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
        }
    }

    fn pull_endpoint(pr: &PullRequestRef) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/pulls/{}",
            pr.owner, pr.repo, pr.number
        )
    }
}

#[async_trait]
impl PullRequestApi for GitHubClient {
    async fn update_body(&self, pr: &PullRequestRef, body: &str) -> Result<StatusCode, ApiError> {
        debug!(body_bytes = body.len(), "sending pull request update");
        let response = self
            .http
            .patch(Self::pull_endpoint(pr))
            .header("User-Agent", "pr-autolink")
            .bearer_auth(&self.token)
            .json(&UpdatePullRequest { body })
            .send()
            .await?;
        Ok(response.status())
    }
}

/// Send the update and log the outcome. A non-success status is a soft
/// failure: logged at error level, but the invocation still completes.
#[instrument(skip(api, body), fields(owner = %pr.owner, repo = %pr.repo, pr = pr.number))]
pub async fn push_update(
    api: &dyn PullRequestApi,
    pr: &PullRequestRef,
    body: &str,
) -> Result<StatusCode, ApiError> {
    let status = api.update_body(pr, body).await?;
    if status.is_success() {
        debug!(%status, "pull request updated");
    } else {
        error!(%status, "updating pull request has failed");
    }
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubApi {
        status: StatusCode,
    }

    #[async_trait]
    impl PullRequestApi for StubApi {
        async fn update_body(
            &self,
            _pr: &PullRequestRef,
            _body: &str,
        ) -> Result<StatusCode, ApiError> {
            Ok(self.status)
        }
    }

    fn test_pr() -> PullRequestRef {
        PullRequestRef {
            owner: "octo".to_string(),
            repo: "demo".to_string(),
            number: 42,
        }
    }

    #[test]
    fn test_pull_endpoint_format() {
        assert_eq!(
            GitHubClient::pull_endpoint(&test_pr()),
            "https://api.github.com/repos/octo/demo/pulls/42"
        );
    }

    #[tokio::test]
    async fn test_push_update_success() {
        let api = StubApi {
            status: StatusCode::OK,
        };
        let status = push_update(&api, &test_pr(), "body").await.unwrap();
        assert!(status.is_success());
    }

    #[tokio::test]
    async fn test_push_update_non_success_is_soft() {
        // A rejected update is reported via the status, not an error.
        let api = StubApi {
            status: StatusCode::UNPROCESSABLE_ENTITY,
        };
        let status = push_update(&api, &test_pr(), "body").await.unwrap();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
