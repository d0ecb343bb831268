use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

/// Payload of the line that opens the managed region of a PR body.
pub const START_TOKEN: &str = "autolink_jira_issues_start";
/// Payload of the line that closes the managed region.
pub const END_TOKEN: &str = "autolink_jira_issues_end";

/// Text written into the region when the branch names no issues.
pub const NO_ISSUES_PLACEHOLDER: &str = "No JIRA issues";

/// Matches the managed region, markers included. The markers are markdown
/// comment lines of the form `[//]: # (<token>)`, with zero or one space
/// after the `:` and after the `#`.
static REGION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\[//\]:\s?#\s?\({START_TOKEN}\)[\s\S]+\[//\]:\s?#\s?\({END_TOKEN}\)"
    ))
    .expect("marker region pattern must compile")
});

/// Extract issue keys from a branch name of the form
/// `<prefix>/<description>/<key>/<key>/...`.
///
/// The first two segments are discarded; everything after them is treated as
/// an issue key, in order, duplicates included. A branch with fewer than
/// three segments yields no keys.
pub fn extract_issue_keys(branch: &str) -> Vec<String> {
    branch.split('/').skip(2).map(str::to_string).collect()
}

/// Render one issue key as a markdown link under the given base URL.
pub fn issue_link(key: &str, issue_base_url: &str) -> String {
    format!("[{key}]({issue_base_url}/{key})")
}

/// Rewrite the managed region of a PR body with links to the issues named in
/// the branch.
///
/// Returns `None` when the body is absent or empty (nothing to update). The
/// matched region spans both marker lines, so the replacement consumes the
/// markers; a body without the markers is returned unchanged.
pub fn rewrite_body(branch: &str, body: Option<&str>, issue_base_url: &str) -> Option<String> {
    let body = match body {
        Some(text) if !text.is_empty() => text,
        _ => return None,
    };

    let keys = extract_issue_keys(branch);
    let replacement = if keys.is_empty() {
        NO_ISSUES_PLACEHOLDER.to_string()
    } else {
        keys.iter()
            .map(|key| issue_link(key, issue_base_url))
            .collect::<Vec<_>>()
            .join("\n")
    };

    // NoExpand: issue keys are opaque and may contain `$`.
    Some(REGION_RE.replace_all(body, NoExpand(&replacement)).into_owned())
}
