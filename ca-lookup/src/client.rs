//! HTTP access to the person lookup backend
//!
//! [`LookupClient`] is the seam between the controller and the network; the
//! controller only ever sees [`PersonLookupResult`]s, [`Photo`]s and
//! [`LookupError`]s.

use async_trait::async_trait;
use ca_common::api::{person_photo_path, DNI_PARAM, SEARCH_PERSON, SEDE_PARAM};
use ca_common::config::ClientConfig;
use ca_common::PersonLookupResult;
use std::time::Duration;

use crate::error::LookupError;

const USER_AGENT: &str = concat!("dni-lookup/", env!("CARGO_PKG_VERSION"));

/// Content type assumed when the backend does not send one
pub const DEFAULT_PHOTO_CONTENT_TYPE: &str = "image/jpeg";

/// Binary image of a person
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Backend operations used by the controller
#[async_trait]
pub trait LookupClient: Send + Sync {
    /// `GET /search-person/?dni=<dni>`
    async fn search_person(&self, dni: &str) -> Result<PersonLookupResult, LookupError>;

    /// `GET /get-person-photo/<person_id>/`
    async fn fetch_photo(&self, person_id: i64) -> Result<Photo, LookupError>;
}

/// reqwest-backed [`LookupClient`]
pub struct HttpLookupClient {
    http_client: reqwest::Client,
    base_url: String,
    sede_id: Option<i64>,
}

impl HttpLookupClient {
    /// Create a client for the backend at `base_url` (e.g. `http://127.0.0.1:8000`)
    pub fn new(
        base_url: &str,
        timeout: Duration,
        sede_id: Option<i64>,
    ) -> Result<Self, LookupError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Setup(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            sede_id,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, LookupError> {
        Self::new(
            &config.server_url,
            Duration::from_secs(config.request_timeout_secs),
            config.sede_id,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl LookupClient for HttpLookupClient {
    async fn search_person(&self, dni: &str) -> Result<PersonLookupResult, LookupError> {
        let url = self.url(SEARCH_PERSON);

        let mut query = vec![(DNI_PARAM, dni.to_string())];
        if let Some(sede_id) = self.sede_id {
            query.push((SEDE_PARAM, sede_id.to_string()));
        }

        tracing::debug!(dni = %dni, url = %url, "Querying person lookup endpoint");

        let response = self
            .http_client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LookupError::Api(status.as_u16(), error_text));
        }

        let result: PersonLookupResult = response
            .json()
            .await
            .map_err(|e| LookupError::Parse(e.to_string()))?;

        tracing::debug!(dni = %dni, found = result.found, "Person lookup answered");

        Ok(result)
    }

    async fn fetch_photo(&self, person_id: i64) -> Result<Photo, LookupError> {
        let url = self.url(&person_photo_path(person_id));

        tracing::debug!(person_id, url = %url, "Fetching person photo");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LookupError::Api(status.as_u16(), error_text));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_PHOTO_CONTENT_TYPE)
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        if bytes.is_empty() {
            return Err(LookupError::Parse(format!(
                "empty photo payload for person {}",
                person_id
            )));
        }

        Ok(Photo {
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}
