//! Document and filter registry.
//!
//! Holds the last document list and filter options fetched from the
//! backend, plus the user's filter selection. Refreshes replace the whole
//! list; nothing is diffed.

mod selection;

pub use selection::FilterSelection;

use serde_json::Value;
use std::path::PathBuf;

use crate::client::RagClient;
use crate::error::ClientResult;
use crate::models::{Document, FilterOptions, UploadResult};

/// Documents, filter options and filter selection.
#[derive(Debug, Clone)]
pub struct DocumentRegistry {
    client: RagClient,
    documents: Vec<Document>,
    filter_options: FilterOptions,
    selection: FilterSelection,
}

impl DocumentRegistry {
    pub fn new(client: RagClient) -> Self {
        Self {
            client,
            documents: Vec::new(),
            filter_options: FilterOptions::default(),
            selection: FilterSelection::default(),
        }
    }

    pub fn client(&self) -> &RagClient {
        &self.client
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn filter_options(&self) -> &FilterOptions {
        &self.filter_options
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut FilterSelection {
        &mut self.selection
    }

    /// Clear both filter selections.
    pub fn clear_filter_selection(&mut self) {
        self.selection.clear();
    }

    /// Refresh the document list, then the filter options.
    pub async fn list_documents(&mut self) -> ClientResult<()> {
        let documents = self.client.list_documents().await?;
        self.apply_documents(documents);
        self.list_filter_options().await
    }

    /// Refresh the filter options.
    pub async fn list_filter_options(&mut self) -> ClientResult<()> {
        let options = self.client.list_filter_options().await?;
        self.apply_filter_options(options);
        Ok(())
    }

    /// Replace the document list.
    pub fn apply_documents(&mut self, documents: Vec<Document>) {
        tracing::debug!("Document list refreshed: {} documents", documents.len());
        self.documents = documents;
    }

    /// Replace the filter options, pruning selections that disappeared.
    pub fn apply_filter_options(&mut self, options: FilterOptions) {
        tracing::debug!(
            "Filter options refreshed: {} sources, {} types",
            options.source_files.len(),
            options.file_types.len()
        );
        self.selection.retain_available(&options);
        self.filter_options = options;
    }

    /// Upload one or more files, then refresh documents and filters.
    pub async fn upload_documents(&mut self, paths: &[PathBuf]) -> ClientResult<UploadResult> {
        let result = self.client.upload_documents(paths).await?;
        tracing::info!("{}", result.summary());
        self.refresh_quietly().await;
        Ok(result)
    }

    /// Upload through the batch endpoint, then refresh documents and filters.
    /// Fewer than two files are rejected before any request.
    pub async fn upload_batch(&mut self, paths: &[PathBuf]) -> ClientResult<UploadResult> {
        let result = self.client.upload_batch(paths).await?;
        tracing::info!("{}", result.summary());
        self.refresh_quietly().await;
        Ok(result)
    }

    /// Delete a document by file name.
    ///
    /// Documents and filters are refreshed whatever the outcome, so a
    /// repeated delete of an absent file still completes the refresh cycle.
    pub async fn delete_document(&mut self, filename: &str) -> ClientResult<Value> {
        let result = self.client.delete_document(filename).await;
        match &result {
            Ok(_) => tracing::info!("Deleted document {}", filename),
            Err(err) => tracing::error!("Deleting {} failed: {}", filename, err),
        }
        self.refresh_quietly().await;
        result
    }

    /// Refresh documents and filters, logging failures.
    async fn refresh_quietly(&mut self) {
        if let Err(err) = self.list_documents().await {
            tracing::warn!("Document refresh failed: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MockHttpClient, MockResponse};
    use crate::startup::config::ClientConfig;
    use serde_json::json;
    use std::sync::Arc;

    const BASE: &str = "http://rag.test/api";

    fn registry() -> (DocumentRegistry, MockHttpClient) {
        let mock = MockHttpClient::new();
        let config = ClientConfig::new().with_base_url(BASE);
        let client = RagClient::new(Arc::new(mock.clone()), &config);
        (DocumentRegistry::new(client), mock)
    }

    #[tokio::test]
    async fn test_list_documents_also_refreshes_filters() {
        let (mut registry, mock) = registry();
        mock.set_response(
            "GET",
            &format!("{}/documents", BASE),
            MockResponse::json(200, json!([{"id": 1, "filename": "a.pdf"}])),
        );
        mock.set_response(
            "GET",
            &format!("{}/filters/options", BASE),
            MockResponse::json(200, json!({"sourceFiles": ["a.pdf"], "fileTypes": ["pdf"]})),
        );

        registry.list_documents().await.unwrap();
        assert_eq!(registry.documents().len(), 1);
        assert_eq!(registry.filter_options().file_types, vec!["pdf"]);
        assert_eq!(mock.requests_matching("GET", "/filters/options").len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_replaces_wholesale() {
        let (mut registry, _mock) = registry();
        registry.apply_documents(vec![Document::default(), Document::default()]);
        registry.apply_documents(vec![]);
        assert!(registry.documents().is_empty());
    }

    #[tokio::test]
    async fn test_new_options_prune_selection() {
        let (mut registry, _mock) = registry();
        registry.selection_mut().toggle_source_file("old.pdf");
        registry.apply_filter_options(FilterOptions {
            source_files: vec!["new.pdf".into()],
            file_types: vec![],
        });
        assert!(registry.selection().is_empty());
    }
}
