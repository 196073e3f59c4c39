//! Status callbacks, the urls a job calls to report how its build is going.
//!
//! The path shape is shared with the endpoint receiving the reports:
//! `BASE_URL/plugins/servlet/PLUGIN_PATH/REPO_ID/TYPE/STATE/BUILD_NUMBER/BUILD_HEAD/MERGE_HEAD/PULLREQUEST_ID`.
//! Everything but the base, plugin path and state is a jenkins variable, expanded at build time.
use std::fmt::{Display, Formatter};

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::callback::{callback_url, curl_command, BuildStatus};

    #[test]
    fn url_shape() {
        assert_eq!(
            callback_url(
                "https://stash.example.com",
                "stashbot/build-reporting",
                BuildStatus::InProgress
            ),
            "https://stash.example.com/plugins/servlet/stashbot/build-reporting/$repoId/$type/inprogress/$BUILD_NUMBER/$buildHead/$mergeHead/$pullRequestId"
        );
    }

    #[test]
    fn plugin_path_slashes() {
        assert_eq!(
            callback_url("https://s/", "/custom/", BuildStatus::Failed),
            "https://s/plugins/servlet/custom/$repoId/$type/failed/$BUILD_NUMBER/$buildHead/$mergeHead/$pullRequestId"
        );
    }

    #[test]
    fn curl() {
        assert_eq!(curl_command("https://x/y"), "/usr/bin/curl -s -i https://x/y");
    }

    #[test]
    fn status_segments() {
        let segments: Vec<String> = BuildStatus::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(segments, vec!["inprogress", "successful", "failed"]);
    }
}

const CURL: &str = "/usr/bin/curl -s -i";

/// Lifecycle of a build, as reported back
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BuildStatus {
    InProgress,
    Successful,
    Failed,
}

impl BuildStatus {
    pub const ALL: [BuildStatus; 3] = [
        BuildStatus::InProgress,
        BuildStatus::Successful,
        BuildStatus::Failed,
    ];

    /// The `STATE` path segment
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStatus::InProgress => "inprogress",
            BuildStatus::Successful => "successful",
            BuildStatus::Failed => "failed",
        }
    }
}

impl Display for BuildStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn callback_url(base: &str, plugin_path: &str, status: BuildStatus) -> String {
    format!(
        "{}/plugins/servlet/{}/$repoId/$type/{}/$BUILD_NUMBER/$buildHead/$mergeHead/$pullRequestId",
        base.trim_end_matches('/'),
        plugin_path.trim_matches('/'),
        status
    )
}

pub fn curl_command(url: &str) -> String {
    format!("{} {}", CURL, url)
}
