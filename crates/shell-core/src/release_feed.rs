use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    app_constants::RELEASE_REQUEST_TIMEOUT, artifact_paths::INSTALLER_EXTENSION,
    update_config::ReleaseFeed, ShellError, ShellResult,
};

/// Latest published release as seen by the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub version: String,
    pub release_notes: String,
    pub artifact_url: String,
}

#[async_trait]
pub trait ReleaseSource: Send + Sync {
    async fn latest_release(&self) -> ShellResult<VersionInfo>;
}

#[derive(Debug, Deserialize)]
struct GithubRelease {
    tag_name: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    assets: Vec<GithubAsset>,
}

#[derive(Debug, Deserialize)]
struct GithubAsset {
    name: String,
    browser_download_url: String,
}

pub struct GithubReleaseSource {
    client: reqwest::Client,
    feed: ReleaseFeed,
}

impl GithubReleaseSource {
    pub fn new(feed: ReleaseFeed, user_agent: &str) -> ShellResult<Self> {
        if feed.provider != "github" {
            return Err(ShellError::InvalidRequest(format!(
                "Unsupported release provider '{}', only github is supported",
                feed.provider
            )));
        }
        if feed.private && feed.token.is_none() {
            crate::append_update_log(
                "release feed is private but no access token is configured; checks will likely fail",
            );
        }

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(RELEASE_REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, feed })
    }

    fn latest_release_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.feed.api_base.trim_end_matches('/'),
            self.feed.owner,
            self.feed.repo
        )
    }
}

#[async_trait]
impl ReleaseSource for GithubReleaseSource {
    async fn latest_release(&self) -> ShellResult<VersionInfo> {
        let mut request = self
            .client
            .get(self.latest_release_url())
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = self.feed.token.as_deref().filter(|_| self.feed.private) {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ShellError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let raw = response.text().await?;
        version_info_from_release_json(&raw, INSTALLER_EXTENSION)
    }
}

pub fn version_info_from_release_json(raw: &str, extension: &str) -> ShellResult<VersionInfo> {
    let release: GithubRelease = serde_json::from_str(raw)?;
    let version = release
        .tag_name
        .trim()
        .trim_start_matches('v')
        .to_string();
    if version.is_empty() {
        return Err(ShellError::Unknown(
            "Latest release has an empty tag name".to_string(),
        ));
    }
    if semver::Version::parse(&version).is_err() {
        crate::append_update_log(&format!(
            "latest release tag '{}' is not a semantic version; comparing verbatim",
            release.tag_name
        ));
    }

    let suffix = format!(".{}", extension.to_ascii_lowercase());
    let installers: Vec<&GithubAsset> = release
        .assets
        .iter()
        .filter(|asset| asset.name.to_ascii_lowercase().ends_with(&suffix))
        .collect();
    let asset = installers
        .iter()
        .find(|asset| asset.name.contains("Setup"))
        .or_else(|| installers.first())
        .ok_or_else(|| {
            ShellError::Unknown(format!(
                "Release {version} has no '{suffix}' installer asset"
            ))
        })?;

    Ok(VersionInfo {
        version,
        release_notes: release.body.unwrap_or_default(),
        artifact_url: asset.browser_download_url.clone(),
    })
}
