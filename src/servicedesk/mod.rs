//! Client for the service desk REST backend.
//!
//! Every call maps to one request against `base_url`. A 404 is reported as
//! [`ServiceDeskError::NotFound`], every other transport, status or decoding
//! failure as [`ServiceDeskError::Request`].

mod types;

pub use types::{
    or_na, CallerRef, CreatedIncident, FieldValue, Incident, IncidentPriority, KnowledgeItem,
    KnowledgeItemSummary, NewIncident, PriorityRef, SignInActivity, UserProfile,
};
use types::decode_list;

use reqwest::{Client, Method, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Error)]
pub enum ServiceDeskError {
    #[error("Endpoint not found: {endpoint}")]
    NotFound { endpoint: String },
    #[error("API request failed: {0}")]
    Request(String),
    #[error("Invalid base URL {url}: {reason}")]
    BaseUrl { url: String, reason: String },
}

impl From<reqwest::Error> for ServiceDeskError {
    fn from(err: reqwest::Error) -> Self {
        ServiceDeskError::Request(err.to_string())
    }
}

/// REST client for incidents, knowledge items and user profiles.
#[derive(Debug, Clone)]
pub struct ServiceDeskClient {
    base_url: Url,
    client: Client,
}

impl ServiceDeskClient {
    pub fn new(base_url: &str) -> Result<Self, ServiceDeskError> {
        Self::with_client(base_url, Client::builder().build()?)
    }

    pub fn with_client(base_url: &str, client: Client) -> Result<Self, ServiceDeskError> {
        let parsed = Url::parse(base_url).map_err(|e| ServiceDeskError::BaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ServiceDeskError::BaseUrl {
                url: base_url.to_string(),
                reason: "cannot be a base".to_string(),
            });
        }
        Ok(Self {
            base_url: parsed,
            client,
        })
    }

    /// `POST /TOPDESK_POST/incidents`
    pub async fn create_incident(
        &self,
        incident: &NewIncident,
    ) -> Result<CreatedIncident, ServiceDeskError> {
        self.request(Method::POST, &["TOPDESK_POST", "incidents"], Some(incident))
            .await
    }

    /// `GET /TOPDESK_POST/incidents/name/{caller_name}`
    pub async fn incidents_by_caller(
        &self,
        caller_name: &str,
    ) -> Result<Vec<Incident>, ServiceDeskError> {
        self.get_list(&["TOPDESK_POST", "incidents", "name", caller_name])
            .await
    }

    /// `GET /knowledgeItems/{item_id}`
    pub async fn knowledge_item(&self, item_id: &str) -> Result<KnowledgeItem, ServiceDeskError> {
        self.get(&["knowledgeItems", item_id]).await
    }

    /// `GET /knowledgeItems`
    pub async fn knowledge_items(&self) -> Result<Vec<KnowledgeItemSummary>, ServiceDeskError> {
        self.get_list(&["knowledgeItems"]).await
    }

    /// `GET /v1.0/users`
    pub async fn users(&self) -> Result<Vec<UserProfile>, ServiceDeskError> {
        self.get_list(&["v1.0", "users"]).await
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ServiceDeskError> {
        self.request::<T, ()>(Method::GET, segments, None).await
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<Vec<T>, ServiceDeskError> {
        let body: serde_json::Value = self.get(segments).await?;
        decode_list(body).map_err(|reason| {
            log::warn!("Request failed: {reason}");
            ServiceDeskError::Request(reason)
        })
    }

    async fn request<T, B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T, ServiceDeskError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let endpoint = format!("/{}", segments.join("/"));
        let url = self.endpoint_url(segments)?;
        log::debug!("Making {method} request to: {url}");

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let result = Self::send(request, endpoint).await;

        if let Err(ServiceDeskError::Request(reason)) = &result {
            log::warn!("Request failed: {reason}");
        }
        result
    }

    async fn send<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
        endpoint: String,
    ) -> Result<T, ServiceDeskError> {
        let response = request.send().await?;
        let status = response.status();
        log::debug!("Response status code: {}", status.as_u16());

        if status == StatusCode::NOT_FOUND {
            return Err(ServiceDeskError::NotFound { endpoint });
        }
        Ok(response.error_for_status()?.json::<T>().await?)
    }

    fn endpoint_url(&self, segments: &[&str]) -> Result<Url, ServiceDeskError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceDeskError::BaseUrl {
                url: self.base_url.to_string(),
                reason: "cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
