use async_trait::async_trait;
use placement_types::Collection;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::remote::RemoteStore;

/// PostgREST path prefix used by the hosted store.
const REST_PREFIX: &str = "/rest/v1";

/// `RemoteStore` over the hosted PostgREST endpoint.
///
/// Single attempt per call, no client-side timeout: the transport defaults
/// apply.
pub struct RestStore {
    client: Client,
    config: StoreConfig,
}

impl RestStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn table_url(&self, collection: Collection) -> String {
        format!("{}{}/{}", self.config.url, REST_PREFIX, collection.table())
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
    }

    async fn send(
        &self,
        collection: Collection,
        request: RequestBuilder,
    ) -> Result<Response, StoreError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|source| StoreError::Transport { collection, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                collection,
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn rows(collection: Collection, response: Response) -> Result<Vec<Value>, StoreError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|source| StoreError::Transport { collection, source })?;
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode { collection, source })
    }
}

#[async_trait]
impl RemoteStore for RestStore {
    async fn select_all(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        let request = self
            .client
            .get(self.table_url(collection))
            .query(&[("select", "*"), ("order", "created_at.desc")]);

        let response = self.send(collection, request).await?;
        let rows = Self::rows(collection, response).await?;
        debug!("Fetched {} rows from {}", rows.len(), collection);
        Ok(rows)
    }

    async fn insert(&self, collection: Collection, row: Value) -> Result<Value, StoreError> {
        let request = self
            .client
            .post(self.table_url(collection))
            .header("Prefer", "return=representation")
            .json(&[row]);

        let response = self.send(collection, request).await?;
        let mut rows = Self::rows(collection, response).await?;
        if rows.len() != 1 {
            return Err(StoreError::UnexpectedRowCount {
                collection,
                count: rows.len(),
            });
        }
        Ok(rows.remove(0))
    }
}
