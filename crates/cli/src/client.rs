// HTTP client for the remote record store.
//
// The store is a passive REST API:
//   GET/POST   {base}/api/links            (reads scoped by userId)
//   PUT/DELETE {base}/api/links/:id
//   GET/POST   {base}/api/collections
//   PUT/DELETE {base}/api/collections/:id

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::debug;

use linkdeck_common::types::{
    Collection, CollectionDraft, CollectionId, Link, LinkDraft, LinkId, LinkPatch, UserId,
};
use linkdeck_engine::store::{RemoteStore, StoreError};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub struct HttpStore {
    http: Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>) -> Result<Self, StoreError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| StoreError::Transport(error.to_string()))?;
        Ok(Self { http, base_url: base_url.into().trim_end_matches('/').to_owned() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{path}", self.base_url)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
        let response = check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|error| StoreError::Transport(format!("failed to decode store response: {error}")))
    }
}

fn transport(error: reqwest::Error) -> StoreError {
    if error.is_timeout() {
        StoreError::Transport("request to the record store timed out".to_owned())
    } else {
        StoreError::Transport(error.to_string())
    }
}

async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound);
    }
    let message = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), %message, "store refused request");
    Err(StoreError::rejected(status.as_u16().to_string(), message))
}

/// Build a partial-update body: absent fields are left untouched by
/// the store; `collection_id: Some(None)` becomes an explicit null
/// that clears the membership.
fn patch_body(patch: &LinkPatch) -> Value {
    let mut body = Map::new();
    if let Some(title) = &patch.title {
        body.insert("title".into(), json!(title));
    }
    if let Some(url) = &patch.url {
        body.insert("url".into(), json!(url));
    }
    if let Some(short_url) = &patch.short_url {
        body.insert("short_url".into(), json!(short_url));
    }
    if let Some(tags) = &patch.tags {
        body.insert("tags".into(), json!(tags));
    }
    if let Some(collection_id) = &patch.collection_id {
        body.insert("collection_id".into(), json!(collection_id));
    }
    if let Some(flag) = patch.is_favorite {
        body.insert("is_favorite".into(), json!(flag));
    }
    Value::Object(body)
}

/// Draft body plus the owner scope the create endpoints require.
fn owned_body<T: serde::Serialize>(owner: &UserId, draft: &T) -> Result<Value, StoreError> {
    let mut body = match serde_json::to_value(draft) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => return Err(StoreError::Transport("draft did not serialize to an object".into())),
    };
    body.insert("userId".into(), json!(owner));
    Ok(Value::Object(body))
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn list_links(&self, owner: &UserId) -> Result<Vec<Link>, StoreError> {
        let response = self
            .http
            .get(self.url("links"))
            .query(&[("userId", owner.as_str())])
            .send()
            .await
            .map_err(transport)?;
        Self::decode(response).await
    }

    async fn list_collections(&self, owner: &UserId) -> Result<Vec<Collection>, StoreError> {
        let response = self
            .http
            .get(self.url("collections"))
            .query(&[("userId", owner.as_str())])
            .send()
            .await
            .map_err(transport)?;
        Self::decode(response).await
    }

    async fn create_link(&self, owner: &UserId, draft: LinkDraft) -> Result<Link, StoreError> {
        let body = owned_body(owner, &draft)?;
        let response =
            self.http.post(self.url("links")).json(&body).send().await.map_err(transport)?;
        Self::decode(response).await
    }

    async fn update_link(&self, id: &LinkId, patch: LinkPatch) -> Result<Link, StoreError> {
        debug!(link = %id, "updating link");
        let response = self
            .http
            .put(self.url(&format!("links/{id}")))
            .json(&patch_body(&patch))
            .send()
            .await
            .map_err(transport)?;
        Self::decode(response).await
    }

    async fn delete_link(&self, id: &LinkId) -> Result<(), StoreError> {
        let response = self
            .http
            .delete(self.url(&format!("links/{id}")))
            .send()
            .await
            .map_err(transport)?;
        check_status(response).await.map(|_| ())
    }

    async fn create_collection(
        &self,
        owner: &UserId,
        draft: CollectionDraft,
    ) -> Result<Collection, StoreError> {
        let body = owned_body(owner, &draft)?;
        let response =
            self.http.post(self.url("collections")).json(&body).send().await.map_err(transport)?;
        Self::decode(response).await
    }

    async fn update_collection(
        &self,
        id: &CollectionId,
        draft: CollectionDraft,
    ) -> Result<Collection, StoreError> {
        let response = self
            .http
            .put(self.url(&format!("collections/{id}")))
            .json(&draft)
            .send()
            .await
            .map_err(transport)?;
        Self::decode(response).await
    }

    async fn delete_collection(&self, id: &CollectionId) -> Result<(), StoreError> {
        let response = self
            .http
            .delete(self.url(&format!("collections/{id}")))
            .send()
            .await
            .map_err(transport)?;
        check_status(response).await.map(|_| ())
    }
}
