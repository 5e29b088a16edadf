use std::fmt;
use std::time::Duration;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::api::errors::{ApiError, status_message};
use crate::config::{ApiConfig, parse_base_url};

/// A resource path relative to the API base URL.
///
/// Segments are percent-encoded when the request URL is built, so opaque
/// identifiers can be passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPath {
    segments: Vec<String>,
    trailing_slash: bool,
    query: Vec<(String, String)>,
}

impl ApiPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            trailing_slash: false,
            query: Vec::new(),
        }
    }

    /// Request the collection form of the path (`/servers/` rather than `/servers`).
    pub fn with_trailing_slash(mut self) -> Self {
        self.trailing_slash = true;
        self
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    fn resolve(&self, base: &Url) -> Result<Url, ApiError> {
        let mut url = base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| ApiError::InvalidEndpoint {
                path: self.to_string(),
            })?;
            segments.pop_if_empty();
            segments.extend(self.segments.iter().map(String::as_str));
            if self.trailing_slash {
                segments.push("");
            }
        }

        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        Ok(url)
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))?;
        if self.trailing_slash {
            f.write_str("/")?;
        }
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, key, value)?;
        }
        Ok(())
    }
}

/// JSON client for the fleet backend REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Build a client from the `[api]` config section.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = parse_base_url(config.base_url())?;
        Self::new(base_url, config.timeout())
    }

    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ApiError> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ApiError::BuildClient { source })?;

        Ok(Self { inner, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn get<T>(&self, path: &ApiPath) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.request::<(), T>(Method::GET, path, None).await
    }

    pub async fn post<B, T>(&self, path: &ApiPath, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, body).await
    }

    pub async fn delete<B, T>(&self, path: &ApiPath, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::DELETE, path, Some(body)).await
    }

    async fn request<B, T>(
        &self,
        method: Method,
        path: &ApiPath,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = path.resolve(&self.base_url)?;
        debug!(event = "core.api.request_started", method = %method, path = %path);

        let mut request = self.inner.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| ApiError::Transport {
            path: path.to_string(),
            source,
        })?;
        let status = response.status();
        let text = response.text().await.map_err(|source| ApiError::Transport {
            path: path.to_string(),
            source,
        })?;

        if !status.is_success() {
            debug!(
                event = "core.api.request_rejected",
                method = %method,
                path = %path,
                status = status.as_u16()
            );
            return Err(ApiError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                message: status_message(status.as_u16(), &text),
            });
        }

        debug!(
            event = "core.api.request_completed",
            method = %method,
            path = %path,
            status = status.as_u16()
        );

        serde_json::from_str(&text).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}
