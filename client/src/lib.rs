/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod cache;
pub mod mirror;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub server_url: String,
    pub token: Option<String>,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("client is offline")]
    Offline,
    #[error("token not set, log in first")]
    MissingToken,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server error: {0}")]
    Api(String),
    #[error("local mirror error: {0}")]
    Mirror(#[from] rusqlite::Error),
    #[error("unexpected response: {0}")]
    Decode(String),
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BaseResponse<T> {
    pub error: bool,
    pub message: T,
}

/// Server-side project row as the API serializes it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProjectResponse {
    pub id: String,
    pub owner: String,
    pub name: String,
    pub description: String,
    pub visibility: String,
    pub remote_url: String,
    pub last_synced_at: Option<String>,
    pub created_at: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MakeProjectRequest {
    pub organization: String,
    pub name: String,
    pub description: String,
    pub visibility: String,
    pub stack: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
struct RemoveProjectRequest {
    id: String,
}

pub struct ApiClient {
    config: RequestConfig,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: RequestConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn request(
        &self,
        endpoint: &str,
        method: reqwest::Method,
        login: bool,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let mut builder = self
            .client
            .request(
                method,
                format!("{}/{}", self.config.server_url.trim_end_matches('/'), endpoint),
            )
            .header("Content-Type", "application/json");

        if login {
            let token = self.config.token.as_ref().ok_or(ClientError::MissingToken)?;
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        Ok(builder)
    }

    async fn parse_response<T: DeserializeOwned>(
        res: reqwest::Response,
    ) -> Result<T, ClientError> {
        let bytes = res.bytes().await?;

        match serde_json::from_slice::<BaseResponse<T>>(&bytes) {
            Ok(parsed) => Ok(parsed.message),
            Err(_) => match serde_json::from_slice::<BaseResponse<String>>(&bytes) {
                Ok(error_res) => Err(ClientError::Api(error_res.message)),
                Err(_) => Err(ClientError::Decode(
                    String::from_utf8_lossy(&bytes).to_string(),
                )),
            },
        }
    }

    pub async fn health(&self) -> Result<String, ClientError> {
        let res = self
            .request("health", reqwest::Method::GET, false)?
            .send()
            .await?;

        Self::parse_response(res).await
    }

    pub async fn projects_all(&self) -> Result<Vec<ProjectResponse>, ClientError> {
        let res = self
            .request("projects/all", reqwest::Method::GET, true)?
            .send()
            .await?;

        Self::parse_response(res).await
    }

    pub async fn project_create(
        &self,
        req: &MakeProjectRequest,
    ) -> Result<ProjectResponse, ClientError> {
        let res = self
            .request("projects/create", reqwest::Method::POST, true)?
            .json(req)
            .send()
            .await?;

        Self::parse_response(res).await
    }

    pub async fn project_remove(&self, id: &str) -> Result<String, ClientError> {
        let res = self
            .request("projects/remove", reqwest::Method::POST, true)?
            .json(&RemoveProjectRequest { id: id.to_string() })
            .send()
            .await?;

        Self::parse_response(res).await
    }
}
