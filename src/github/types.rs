use serde::Serialize;

/// Addresses a pull request on GitHub.
#[derive(Debug, Clone)]
pub struct PullRequestRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

/// JSON body of the PATCH request against the pulls resource. GitHub leaves
/// every field not present in the request untouched.
#[derive(Debug, Serialize)]
pub struct UpdatePullRequest<'a> {
    pub body: &'a str,
}
