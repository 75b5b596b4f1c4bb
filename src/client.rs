use crate::authoring::{build_tree, parse_tree_json};
use crate::catalog::{CatalogStore, CatalogSummary};
use crate::error::CatalogError;
use crate::types::{Feedback, ResourceKind, TreeDefinition, Version};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Catalog backed by the quiz/tree backend REST API.
///
/// Maps the store contract onto the backend routes: `put` → PUT
/// `/api/<kind>/<name>`, `delete` → DELETE on the same path (with
/// the version appended for the guarded variant), `list` → GET
/// `/api/<kind>/`, `get` → GET `/api/<kind>/<name>`. Any response
/// status >= 400 surfaces as an error; a 404 becomes
/// [`CatalogError::NotFound`]. Nothing is retried here — transient-
/// failure retries are the caller's concern.
pub struct RemoteCatalog {
    http: reqwest::Client,
    base_url: String,
    kind: ResourceKind,
}

impl RemoteCatalog {
    pub fn new(base_url: impl Into<String>, kind: ResourceKind) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, kind)
    }

    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        kind: ResourceKind,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            kind,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn collection_url(&self) -> String {
        format!("{}/api/{}/", self.base_url, self.kind.segment())
    }

    fn resource_url(&self, name: &str) -> String {
        format!("{}/api/{}/{}", self.base_url, self.kind.segment(), name)
    }

    fn feedback_url(&self) -> String {
        format!("{}/api/feedback", self.base_url)
    }

    /// Post user feedback on a finished traversal.
    pub async fn send_feedback(&self, feedback: &Feedback) -> Result<(), CatalogError> {
        let url = self.feedback_url();
        let response = self
            .http
            .post(&url)
            .json(feedback)
            .send()
            .await
            .map_err(transport)?;
        check_status(&url, response.status().as_u16(), None)?;
        Ok(())
    }

    async fn stored_version(&self, name: &str) -> Result<Version, CatalogError> {
        self.list()
            .await?
            .into_iter()
            .find(|summary| summary.name == name)
            .map(|summary| summary.version)
            .ok_or_else(|| CatalogError::NotFound {
                name: name.to_string(),
            })
    }
}

#[async_trait]
impl CatalogStore for RemoteCatalog {
    async fn put(&self, name: &str, source: &str) -> Result<Version, CatalogError> {
        // reject locally-invalid sources before going on the wire
        let doc = parse_tree_json(source)?;
        build_tree(name, 1, &doc)?;

        let url = self.resource_url(name);
        let response = self
            .http
            .put(&url)
            .body(source.to_string())
            .send()
            .await
            .map_err(transport)?;
        check_status(&url, response.status().as_u16(), None)?;
        debug!(name, kind = self.kind.segment(), "tree stored on backend");

        // the PUT response carries no body; the list payload has the version
        self.stored_version(name).await
    }

    async fn get(&self, name: &str) -> Result<Arc<TreeDefinition>, CatalogError> {
        let version = self.stored_version(name).await?;
        let url = self.resource_url(name);
        let response = self.http.get(&url).send().await.map_err(transport)?;
        check_status(&url, response.status().as_u16(), Some(name))?;
        let source = response.text().await.map_err(transport)?;
        let doc = parse_tree_json(&source)?;
        Ok(Arc::new(build_tree(name, version, &doc)?))
    }

    async fn delete(&self, name: &str) -> Result<(), CatalogError> {
        let url = self.resource_url(name);
        let response = self.http.delete(&url).send().await.map_err(transport)?;
        check_status(&url, response.status().as_u16(), Some(name))
    }

    async fn delete_version(&self, name: &str, version: Version) -> Result<(), CatalogError> {
        let url = format!("{}/{}", self.resource_url(name), version);
        let response = self.http.delete(&url).send().await.map_err(transport)?;
        check_status(&url, response.status().as_u16(), Some(name))
    }

    async fn list(&self) -> Result<Vec<CatalogSummary>, CatalogError> {
        let url = self.collection_url();
        let response = self.http.get(&url).send().await.map_err(transport)?;
        check_status(&url, response.status().as_u16(), None)?;
        let body: serde_json::Value = response.json().await.map_err(transport)?;

        let entries = body
            .get(self.kind.list_key())
            .and_then(|v| v.as_array())
            .ok_or_else(|| CatalogError::Transport(format!("missing '{}' in list payload", self.kind.list_key())))?;

        let mut summaries = Vec::with_capacity(entries.len());
        for entry in entries {
            let name = entry
                .get("id")
                .and_then(|v| v.as_str())
                .ok_or_else(|| CatalogError::Transport("list entry without 'id'".to_string()))?;
            let version = entry
                .get("version")
                .and_then(|v| v.as_u64())
                .unwrap_or(1) as Version;
            summaries.push(CatalogSummary {
                name: name.to_string(),
                version,
            });
        }
        Ok(summaries)
    }

    async fn clear(&self) -> Result<(), CatalogError> {
        // the backend has no bulk delete; mirror the harness teardown
        for summary in self.list().await? {
            self.delete(&summary.name).await?;
        }
        Ok(())
    }
}

fn transport(e: reqwest::Error) -> CatalogError {
    CatalogError::Transport(e.to_string())
}

fn check_status(url: &str, status: u16, name: Option<&str>) -> Result<(), CatalogError> {
    if status < 400 {
        return Ok(());
    }
    if status == 404 {
        if let Some(name) = name {
            return Err(CatalogError::NotFound {
                name: name.to_string(),
            });
        }
    }
    Err(CatalogError::Backend {
        status,
        url: url.to_string(),
    })
}
