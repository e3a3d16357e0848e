//! Shared HTTP client for the school-management backend.

use reqwest::{Client, RequestBuilder, Response, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::dto::unwrap_envelope;
use crate::application::services::SessionStorage;
use crate::domain::errors::ApiError;
use crate::infrastructure::config::ApiConfig;

const USER_AGENT: &str = concat!("schooldesk/", env!("CARGO_PKG_VERSION"));
const SCHOOL_HEADER: &str = "X-School-Id";

/// Authenticated JSON client; every request carries the stored bearer token.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    root: String,
    storage: SessionStorage,
}

impl ApiClient {
    /// Creates new client for `config`.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(config: &ApiConfig, storage: SessionStorage) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            root: config.root(),
            storage,
        })
    }

    /// Joins the configured root and `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.root, path.trim_start_matches('/'))
    }

    async fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let mut builder = builder.header(header::ACCEPT, "application/json");

        match self.storage.access_token().await {
            Ok(Some(token)) => builder = builder.bearer_auth(token.as_str()),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Could not read access token"),
        }
        if let Ok(Some(school_id)) = self.storage.school_id().await {
            builder = builder.header(SCHOOL_HEADER, school_id.as_str());
        }

        builder
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = self
            .authorize(builder)
            .await
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = ApiError::from_response(status.as_u16(), &body);
        warn!(
            status = status.as_u16(),
            code = ?error.code(),
            error = %error,
            "Request failed"
        );
        Err(error)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let text = response.text().await.map_err(map_transport_error)?;
        let value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| {
                warn!(error = %e, "Failed to parse response body");
                ApiError::decode(format!("failed to parse response: {e}"))
            })?
        };
        unwrap_envelope(value)
    }

    /// `GET path`.
    ///
    /// # Errors
    /// Returns the normalized error for transport, status or decode failures.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let response = self.send(self.client.get(self.url(path))).await?;
        Self::decode(response).await
    }

    /// `GET path?query`.
    ///
    /// # Errors
    /// Returns the normalized error for transport, status or decode failures.
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        debug!(path, "GET");
        let response = self
            .send(self.client.get(self.url(path)).query(query))
            .await?;
        Self::decode(response).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    /// Returns the normalized error for transport, status or decode failures.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(path, "POST");
        let response = self
            .send(self.client.post(self.url(path)).json(body))
            .await?;
        Self::decode(response).await
    }

    /// `POST path`, ignoring the response body.
    ///
    /// # Errors
    /// Returns the normalized error for transport or status failures.
    pub async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        debug!(path, "POST");
        self.send(self.client.post(self.url(path)).json(body))
            .await
            .map(drop)
    }

    /// `PUT path` with a JSON body.
    ///
    /// # Errors
    /// Returns the normalized error for transport, status or decode failures.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(path, "PUT");
        let response = self
            .send(self.client.put(self.url(path)).json(body))
            .await?;
        Self::decode(response).await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    /// Returns the normalized error for transport or status failures.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        debug!(path, "DELETE");
        self.send(self.client.delete(self.url(path))).await.map(drop)
    }
}

fn map_transport_error(e: reqwest::Error) -> ApiError {
    warn!(error = %e, "Failed to reach backend");
    if e.is_timeout() {
        ApiError::timeout()
    } else if e.is_connect() {
        ApiError::connect()
    } else {
        ApiError::network(e.to_string())
    }
}
