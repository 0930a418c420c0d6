//! Item Endpoints
//!
//! HTTP client for list/create/update/delete on `/items`.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;

use super::{ApiError, ApiResult, ItemApi};
use crate::config::ApiConfig;
use crate::models::{Envelope, Item, ItemPage, ItemPatch, ItemPayload, ItemStatus, ListEnvelope};

/// Characters escaped when an id is placed in a path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

// ========================
// Query Parameters
// ========================

/// Parameters of `GET /items`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<ItemStatus>,
    pub page: u32,
    pub limit: u32,
}

impl ListQuery {
    /// Query pairs in wire order; unset filters are left out entirely
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }
}

// ========================
// Client
// ========================

#[derive(Debug, Clone)]
pub struct ItemClient {
    http: reqwest::Client,
    base_url: String,
}

impl ItemClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/items", self.base_url)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/items/{}", self.base_url, utf8_percent_encode(id, PATH_SEGMENT))
    }

    pub fn list_url(&self, query: &ListQuery) -> ApiResult<Url> {
        let mut url = Url::parse(&self.collection_url()).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.to_pairs() {
                pairs.append_pair(key, &value);
            }
        }
        Ok(url)
    }

    /// Send a request and return the body of a 2xx response
    async fn send(&self, request: RequestBuilder, item_route: bool) -> ApiResult<String> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        check_status(status, &body, item_route)?;
        Ok(body)
    }
}

#[async_trait(?Send)]
impl ItemApi for ItemClient {
    async fn list(&self, query: &ListQuery) -> ApiResult<ItemPage> {
        let url = self.list_url(query)?;
        log::debug!("[API] GET {}", url);
        let body = self.send(self.http.get(url), false).await?;
        decode_list(&body)
    }

    async fn create(&self, payload: &ItemPayload) -> ApiResult<Item> {
        let url = self.collection_url();
        log::debug!("[API] POST {}", url);
        let body = self.send(self.http.post(url).json(payload), false).await?;
        decode_item(&body)
    }

    async fn update(&self, id: &str, patch: &ItemPatch) -> ApiResult<Item> {
        let url = self.item_url(id);
        log::debug!("[API] PUT {}", url);
        let body = self.send(self.http.put(url).json(patch), true).await?;
        decode_item(&body)
    }

    async fn delete(&self, id: &str) -> ApiResult<()> {
        let url = self.item_url(id);
        log::debug!("[API] DELETE {}", url);
        self.send(self.http.delete(url), true).await?;
        Ok(())
    }
}

// ========================
// Response Handling
// ========================

/// Map a non-2xx status to the matching error
fn check_status(status: u16, body: &str, item_route: bool) -> ApiResult<()> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    let message = error_message(body);
    if status == 404 && item_route {
        return Err(ApiError::NotFound(message.unwrap_or_else(|| "Item not found".to_string())));
    }
    Err(ApiError::Http {
        status,
        message: message.unwrap_or_else(|| format!("Request failed with status code {}", status)),
    })
}

/// Pull a human-readable message out of an error body
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

fn rejected(message: Option<String>) -> ApiError {
    ApiError::Http {
        status: 200,
        message: message.unwrap_or_else(|| "Request was not successful".to_string()),
    }
}

fn decode_list(body: &str) -> ApiResult<ItemPage> {
    let envelope: ListEnvelope = serde_json::from_str(body)?;
    if !envelope.success {
        return Err(rejected(envelope.message));
    }
    let meta = envelope
        .meta
        .ok_or_else(|| ApiError::Decode("missing pagination meta".to_string()))?;
    Ok(ItemPage { items: envelope.data, meta })
}

fn decode_item(body: &str) -> ApiResult<Item> {
    decode_envelope(body)
}

fn decode_envelope<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    let envelope: Envelope<T> = serde_json::from_str(body)?;
    if !envelope.success {
        return Err(rejected(envelope.message));
    }
    envelope
        .data
        .ok_or_else(|| ApiError::Decode("missing data".to_string()))
}
