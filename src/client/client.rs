use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::client::{api::PantryApi, types::*};

pub struct PantryClient {
    base_url: String,
    client: Client,
}

impl PantryClient {
    pub fn new(base_url: String) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_timeout(base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Uses a preconfigured `reqwest` client, e.g. one with proxies disabled.
    pub fn with_client(base_url: String, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: ItemId) -> String {
        format!("{}/api/items/{}", self.base_url, id)
    }
}

#[async_trait]
impl PantryApi for PantryClient {
    async fn list_items(&self) -> Result<ItemsResponse> {
        let url = format!("{}/api/items", self.base_url);
        tracing::debug!("Fetching items from: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to list items: {}", response.status());
        }

        let items = response.json().await?;
        Ok(items)
    }

    async fn create_item(&self, fields: &BTreeMap<String, String>) -> Result<StatusCode> {
        let url = format!("{}/api/items", self.base_url);
        tracing::debug!("Creating item at {} with fields {:?}", url, fields);

        let response = self.client.post(&url).json(fields).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Item creation returned {}", status);
        }
        Ok(status)
    }

    async fn update_item(&self, id: ItemId, patch: &ItemPatch) -> Result<StatusCode> {
        let url = self.item_url(id);
        tracing::debug!("Updating item at: {}", url);

        let response = self.client.put(&url).json(patch).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Item update returned {}", status);
        }
        Ok(status)
    }

    async fn delete_item(&self, id: ItemId) -> Result<StatusCode> {
        let url = self.item_url(id);
        tracing::debug!("Deleting item at: {}", url);

        let response = self.client.delete(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Item deletion returned {}", status);
        }
        Ok(status)
    }

    async fn list_recipes(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/recipes", self.base_url);
        tracing::debug!("Fetching recipes from: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to list recipes: {}", response.status());
        }

        let recipes: RecipesResponse = response.json().await?;
        Ok(recipes.recipes)
    }

    async fn export_shopping(&self, items: &[Item]) -> Result<Vec<u8>> {
        let url = format!("{}/api/export_shopping", self.base_url);
        tracing::debug!("Exporting {} items to: {}", items.len(), url);

        let request = ExportRequest {
            items: items.to_vec(),
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to export shopping list: {}", response.status());
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }

    async fn update_settings(&self, soon_days: i64) -> Result<Settings> {
        let url = format!("{}/api/settings", self.base_url);
        let request = SettingsUpdate { soon_days };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to update settings: {}", response.status());
        }

        let settings = response.json().await?;
        Ok(settings)
    }
}
