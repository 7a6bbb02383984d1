//! PostgREST-dialect store over HTTP.
//!
//! | Operation | Request |
//! |---|---|
//! | select | `GET /rest/v1/{table}?select=*` |
//! | select_one | `GET /rest/v1/{table}?select=*&id=eq.{id}` |
//! | insert | `POST /rest/v1/{table}` with `Prefer: return=representation` |
//! | update | `PATCH /rest/v1/{table}?id=eq.{id}` with `Prefer: return=representation` |
//! | delete | `DELETE /rest/v1/{table}?id=eq.{id}` |
//!
//! Every request carries the key as `apikey` and as a bearer token.

use assetry_core::EntityId;
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, Url};
use serde_json::{Map, Value};
use std::fmt;

use crate::config::ClientConfig;
use crate::remote::RemoteStore;
use crate::{Error, Result};

/// HTTP store speaking the PostgREST dialect.
pub struct RestStore {
    client: reqwest::Client,
    base: Url,
    api_key: String,
}

impl RestStore {
    /// Creates a store for the configured endpoint.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut base = Url::parse(config.url.trim())
            .map_err(|e| Error::config(format!("invalid remote url '{}': {e}", config.url)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base,
            api_key: config.api_key.clone(),
        })
    }

    /// The `/rest/v1/{table}` URL.
    fn table_url(&self, table: &str) -> Result<Url> {
        self.base
            .join(&format!("rest/v1/{table}"))
            .map_err(|e| Error::config(format!("invalid table '{table}': {e}")))
    }

    /// The table URL filtered to one id.
    fn row_url(&self, table: &str, id: &EntityId) -> Result<Url> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Sends a request and turns non-2xx answers into [`Error::Status`].
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), body = %body, "Remote store rejected request");
        Err(Error::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Reads a JSON array body.
    async fn rows(table: &str, response: Response) -> Result<Vec<Value>> {
        match response.json::<Value>().await? {
            Value::Array(rows) => Ok(rows),
            other => Err(Error::decode(
                table,
                format!("expected an array of rows, got {}", kind_of(&other)),
            )),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl RemoteStore for RestStore {
    async fn select(&self, table: &str) -> Result<Vec<Value>> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut().append_pair("select", "*");
        let response = self.send(self.client.get(url)).await?;
        let rows = Self::rows(table, response).await?;
        tracing::debug!(table, count = rows.len(), "Selected rows");
        Ok(rows)
    }

    async fn select_one(&self, table: &str, id: &EntityId) -> Result<Option<Value>> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("id", &format!("eq.{id}"));
        let response = self.send(self.client.get(url)).await?;
        Ok(Self::rows(table, response).await?.into_iter().next())
    }

    async fn insert(&self, table: &str, row: Map<String, Value>) -> Result<Value> {
        let url = self.table_url(table)?;
        let request = self
            .client
            .post(url)
            .header("Prefer", "return=representation")
            .json(&row);
        let response = self.send(request).await?;
        let stored = Self::rows(table, response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::decode(table, "insert returned no row"))?;
        tracing::debug!(table, id = ?stored.get("id"), "Inserted row");
        Ok(stored)
    }

    async fn update(
        &self,
        table: &str,
        id: &EntityId,
        changes: Map<String, Value>,
    ) -> Result<Value> {
        let url = self.row_url(table, id)?;
        let request = self
            .client
            .patch(url)
            .header("Prefer", "return=representation")
            .json(&changes);
        let response = self.send(request).await?;
        // An id filter that matched nothing answers with an empty array.
        let stored = Self::rows(table, response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(table, id.as_str()))?;
        tracing::debug!(table, %id, fields = changes.len(), "Updated row");
        Ok(stored)
    }

    async fn delete(&self, table: &str, id: &EntityId) -> Result<()> {
        let url = self.row_url(table, id)?;
        self.send(self.client.delete(url)).await?;
        tracing::debug!(table, %id, "Deleted row");
        Ok(())
    }

    fn name(&self) -> &str {
        "rest"
    }
}

impl fmt::Debug for RestStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestStore")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}
