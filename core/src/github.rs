/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose};
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Deserialize;

/// A repository as returned by the hosting provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRepo {
    pub full_name: String,
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub private: bool,
    pub default_branch: String,
}

/// A downloaded file, flattened from single-file and directory-listing
/// responses alike.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteFile {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteOrg {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteUser {
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateRepository {
    pub name: String,
    pub description: String,
    pub private: bool,
}

/// Provider seam for the project lifecycle. Every call is scoped to one
/// user's OAuth token; failures surface the provider's response
/// unmodified. No retries, no rate-limit handling.
#[async_trait]
pub trait RepoHost: Send + Sync {
    async fn create_repository(
        &self,
        token: &str,
        org: &str,
        repo: CreateRepository,
    ) -> Result<RemoteRepo>;

    /// Not idempotent: removing an already-deleted repository returns
    /// the provider's error.
    async fn remove_repository(&self, token: &str, full_name: &str) -> Result<()>;

    async fn get_repository(&self, token: &str, full_name: &str) -> Result<Option<RemoteRepo>>;

    /// Reads every path sequentially and flattens the results.
    async fn get_files(
        &self,
        token: &str,
        full_name: &str,
        paths: &[String],
    ) -> Result<Vec<RemoteFile>>;

    async fn read_file_content(
        &self,
        token: &str,
        full_name: &str,
        path: &str,
    ) -> Result<Vec<RemoteFile>>;

    async fn is_empty_repository(&self, token: &str, full_name: &str) -> Result<bool>;

    async fn list_organizations(&self, token: &str) -> Result<Vec<RemoteOrg>>;

    async fn get_authenticated_user(&self, token: &str) -> Result<RemoteUser>;
}

#[derive(Deserialize)]
struct GhRepo {
    full_name: String,
    name: String,
    owner: GhOwner,
    description: Option<String>,
    html_url: String,
    private: bool,
    default_branch: Option<String>,
}

#[derive(Deserialize)]
struct GhOwner {
    login: String,
}

#[derive(Deserialize)]
struct GhOrg {
    login: String,
}

#[derive(Deserialize)]
struct GhUser {
    login: String,
    name: Option<String>,
    email: Option<String>,
}

impl From<GhRepo> for RemoteRepo {
    fn from(r: GhRepo) -> Self {
        RemoteRepo {
            full_name: r.full_name,
            owner: r.owner.login,
            name: r.name,
            description: r.description,
            html_url: r.html_url,
            private: r.private,
            default_branch: r.default_branch.unwrap_or_else(|| "main".to_string()),
        }
    }
}

pub struct GithubHost {
    client: reqwest::Client,
    api_url: String,
}

impl GithubHost {
    pub fn new(api_url: String) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(header::USER_AGENT, HeaderValue::from_static("folio/0.1.0"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("failed to build reqwest client");

        Self { client, api_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), path)
    }

    async fn contents(
        &self,
        token: &str,
        full_name: &str,
        path: &str,
    ) -> Result<Option<serde_json::Value>> {
        let res = self
            .client
            .get(self.url(&format!(
                "/repos/{}/contents/{}",
                full_name,
                path.trim_start_matches('/')
            )))
            .bearer_auth(token)
            .send()
            .await
            .context("Contents request failed")?;

        if res.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            bail!("GitHub API error {}: {}", status, body);
        }

        Ok(Some(
            res.json().await.context("Failed to parse contents")?,
        ))
    }

    fn decode_blob(path: &str, value: &serde_json::Value) -> Result<RemoteFile> {
        let encoded = value["content"]
            .as_str()
            .context("No content in file response")?
            .replace(['\n', '\r'], "");

        let raw = general_purpose::STANDARD
            .decode(encoded)
            .context("Failed to decode file content")?;

        Ok(RemoteFile {
            path: path.to_string(),
            content: String::from_utf8(raw).context("File content is not valid UTF-8")?,
        })
    }
}

#[async_trait]
impl RepoHost for GithubHost {
    async fn create_repository(
        &self,
        token: &str,
        org: &str,
        repo: CreateRepository,
    ) -> Result<RemoteRepo> {
        let me = self.get_authenticated_user(token).await?;

        // Personal repositories go through /user/repos, organization
        // repositories through /orgs/{org}/repos.
        let endpoint = if org == me.login {
            self.url("/user/repos")
        } else {
            self.url(&format!("/orgs/{}/repos", org))
        };

        let res = self
            .client
            .post(endpoint)
            .bearer_auth(token)
            .json(&serde_json::json!({
                "name": repo.name,
                "description": repo.description,
                "private": repo.private,
            }))
            .send()
            .await
            .context("Create repository request failed")?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            bail!("GitHub API error {}: {}", status, body);
        }

        let repo: GhRepo = res
            .json()
            .await
            .context("Failed to parse repository response")?;

        Ok(repo.into())
    }

    async fn remove_repository(&self, token: &str, full_name: &str) -> Result<()> {
        let res = self
            .client
            .delete(self.url(&format!("/repos/{}", full_name)))
            .bearer_auth(token)
            .send()
            .await
            .context("Remove repository request failed")?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            bail!("GitHub API error {}: {}", status, body);
        }

        Ok(())
    }

    async fn get_repository(&self, token: &str, full_name: &str) -> Result<Option<RemoteRepo>> {
        let res = self
            .client
            .get(self.url(&format!("/repos/{}", full_name)))
            .bearer_auth(token)
            .send()
            .await
            .context("Get repository request failed")?;

        if res.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            bail!("GitHub API error {}: {}", status, body);
        }

        let repo: GhRepo = res
            .json()
            .await
            .context("Failed to parse repository response")?;

        Ok(Some(repo.into()))
    }

    async fn get_files(
        &self,
        token: &str,
        full_name: &str,
        paths: &[String],
    ) -> Result<Vec<RemoteFile>> {
        let mut files = Vec::new();

        for path in paths {
            files.extend(self.read_file_content(token, full_name, path).await?);
        }

        Ok(files)
    }

    async fn read_file_content(
        &self,
        token: &str,
        full_name: &str,
        path: &str,
    ) -> Result<Vec<RemoteFile>> {
        let Some(value) = self.contents(token, full_name, path).await? else {
            bail!("GitHub API error 404 Not Found: {}/{}", full_name, path);
        };

        match value {
            serde_json::Value::Array(entries) => {
                let mut files = Vec::new();

                for entry in entries {
                    if entry["type"].as_str() != Some("file") {
                        continue;
                    }

                    let entry_path = entry["path"]
                        .as_str()
                        .context("No path in directory entry")?;

                    let Some(blob) = self.contents(token, full_name, entry_path).await? else {
                        continue;
                    };

                    files.push(Self::decode_blob(entry_path, &blob)?);
                }

                Ok(files)
            }
            value => Ok(vec![Self::decode_blob(path, &value)?]),
        }
    }

    async fn is_empty_repository(&self, token: &str, full_name: &str) -> Result<bool> {
        match self.contents(token, full_name, "").await? {
            // The provider answers 404 for the root listing of an empty
            // repository.
            None => Ok(true),
            Some(serde_json::Value::Array(entries)) => Ok(entries.is_empty()),
            Some(_) => Ok(false),
        }
    }

    async fn list_organizations(&self, token: &str) -> Result<Vec<RemoteOrg>> {
        let res = self
            .client
            .get(self.url("/user/orgs"))
            .bearer_auth(token)
            .send()
            .await
            .context("List organizations request failed")?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            bail!("GitHub API error {}: {}", status, body);
        }

        let orgs: Vec<GhOrg> = res
            .json()
            .await
            .context("Failed to parse organizations response")?;

        Ok(orgs
            .into_iter()
            .map(|o| RemoteOrg { login: o.login })
            .collect())
    }

    async fn get_authenticated_user(&self, token: &str) -> Result<RemoteUser> {
        let res = self
            .client
            .get(self.url("/user"))
            .bearer_auth(token)
            .send()
            .await
            .context("User request failed")?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            bail!("GitHub API error {}: {}", status, body);
        }

        let user: GhUser = res.json().await.context("Failed to parse user response")?;

        Ok(RemoteUser {
            login: user.login,
            name: user.name,
            email: user.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_blob() {
        let value = serde_json::json!({
            "type": "file",
            "content": "aW1wb3J0IHsgQXBpIH0gZnJv\nbSAic2RrIjsK",
            "encoding": "base64",
        });

        let file = GithubHost::decode_blob("src/index.ts", &value).unwrap();
        assert_eq!(file.path, "src/index.ts");
        assert_eq!(file.content, "import { Api } from \"sdk\";\n");
    }

    #[test]
    fn test_decode_blob_rejects_missing_content() {
        let value = serde_json::json!({ "type": "dir" });
        assert!(GithubHost::decode_blob("src", &value).is_err());
    }
}
