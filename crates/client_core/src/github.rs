//! GitHub REST implementation of [`FollowerSource`].

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    Client, StatusCode,
};
use serde::Serialize;
use shared::{
    domain::{Follower, User, PAGE_SIZE},
    error::NetworkError,
};
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com/";
pub const DEFAULT_USER_AGENT: &str = "followers-client";

/// Remote capability the follower list is fed from.
#[async_trait]
pub trait FollowerSource: Send + Sync {
    /// Fetches one page (1-based) of at most [`PAGE_SIZE`] followers.
    async fn followers(&self, username: &str, page: u32) -> Result<Vec<Follower>, NetworkError>;
    async fn user_info(&self, username: &str) -> Result<User, NetworkError>;
}

#[derive(Debug, Clone)]
pub struct GithubClientOptions {
    pub api_base_url: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub token: Option<String>,
}

impl Default for GithubClientOptions {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(15),
            token: None,
        }
    }
}

#[derive(Serialize)]
struct FollowersQuery {
    per_page: usize,
    page: u32,
}

pub struct GithubClient {
    http: Client,
    base_url: Url,
}

impl GithubClient {
    pub fn new(options: GithubClientOptions) -> Result<Self> {
        let mut raw_base = options.api_base_url.trim().to_string();
        if !raw_base.ends_with('/') {
            raw_base.push('/');
        }
        let base_url = Url::parse(&raw_base)
            .with_context(|| format!("invalid GitHub API base url '{}'", options.api_base_url))?;
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Some(token) = options.token.as_deref().filter(|t| !t.trim().is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
                .context("GitHub token contains invalid header characters")?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        let http = Client::builder()
            .default_headers(headers)
            .user_agent(options.user_agent)
            .timeout(options.request_timeout)
            .build()
            .context("failed to build GitHub http client")?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn user_url(&self, username: &str, suffix: Option<&str>) -> Result<Url, NetworkError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(NetworkError::InvalidUsername);
        }

        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| NetworkError::InvalidUsername)?;
            segments.pop_if_empty().push("users").push(username);
            if let Some(suffix) = suffix {
                segments.push(suffix);
            }
        }
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, NetworkError> {
        let response = request.send().await.map_err(|err| {
            warn!("github request failed: {err}");
            NetworkError::UnableToComplete
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "github returned unexpected status");
            return Err(NetworkError::InvalidResponse(status.as_u16()));
        }

        response.json::<T>().await.map_err(|err| {
            warn!("github response body could not be decoded: {err}");
            NetworkError::InvalidData
        })
    }
}

#[async_trait]
impl FollowerSource for GithubClient {
    async fn followers(&self, username: &str, page: u32) -> Result<Vec<Follower>, NetworkError> {
        let url = self.user_url(username, Some("followers"))?;
        debug!(%username, page, "fetching followers page");
        let request = self.http.get(url).query(&FollowersQuery {
            per_page: PAGE_SIZE,
            page,
        });
        self.get_json(request).await
    }

    async fn user_info(&self, username: &str) -> Result<User, NetworkError> {
        let url = self.user_url(username, None)?;
        debug!(%username, "fetching user info");
        self.get_json(self.http.get(url)).await
    }
}

#[cfg(test)]
#[path = "tests/github_tests.rs"]
mod tests;
