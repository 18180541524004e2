//! Generic CRUD over a [`Resource`] collection.

use std::fmt;
use std::marker::PhantomData;

use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::{ClientError, Result};
use crate::interceptor::RequestOptions;
use crate::models::{ListResponse, Resource};

/// CRUD calls for one resource collection.
pub struct ResourceService<R> {
    client: ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> fmt::Debug for ResourceService<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceService")
            .field("path", &R::PATH)
            .finish_non_exhaustive()
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    /// Path of one entity: the collection path followed by `{id}/`.
    pub fn detail_path(id: i64) -> String {
        format!("{}{id}/", R::PATH)
    }

    /// List the collection.
    pub async fn list(&self) -> Result<ListResponse<R>> {
        self.list_with_query(&[]).await
    }

    /// List with query parameters (filters, `page`).
    pub async fn list_with_query(&self, query: &[(&str, &str)]) -> Result<ListResponse<R>> {
        debug!(resource = R::NAME, "Listing");
        let mut url = self.client.url(R::PATH)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        self.fetch_list(url).await
    }

    /// Follow a `next` link from a previous page.
    pub async fn list_page(&self, next: &str) -> Result<ListResponse<R>> {
        let url = self.client.url(next)?;
        self.fetch_list(url).await
    }

    async fn fetch_list(&self, url: reqwest::Url) -> Result<ListResponse<R>> {
        let body = self
            .client
            .send(Method::GET, url, None, RequestOptions::default())
            .await?
            .unwrap_or(Value::Array(Vec::new()));
        ListResponse::from_value(body)
    }

    pub async fn get(&self, id: i64) -> Result<R> {
        self.client.get(&Self::detail_path(id)).await
    }

    /// Create an entity; returns the server's copy.
    pub async fn create(&self, entity: &R) -> Result<R> {
        debug!(resource = R::NAME, "Creating");
        self.client.post(R::PATH, entity).await
    }

    /// Replace an entity (PUT).
    pub async fn update(&self, entity: &R) -> Result<R> {
        let id = entity.id().ok_or_else(|| {
            ClientError::InvalidUrl(format!("cannot update an unsaved {}", R::NAME))
        })?;
        self.client.put(&Self::detail_path(id), entity).await
    }

    /// Update selected fields (PATCH).
    pub async fn partial_update(&self, id: i64, fields: &Value) -> Result<R> {
        self.client.patch(&Self::detail_path(id), fields).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        debug!(resource = R::NAME, id, "Deleting");
        self.client.delete(&Self::detail_path(id)).await
    }
}
