//! The data-fetching seam between the controller and the backend.
//!
//! [`PantryApi`] is implemented over HTTP by [`PantryClient`](crate::client::PantryClient);
//! tests substitute in-memory fakes.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::BTreeMap;

use crate::client::types::{Item, ItemId, ItemPatch, ItemsResponse, Settings};

/// Backend operations used by the pantry controller.
///
/// Reads return parsed bodies and fail on non-success statuses. Mutations whose
/// response body is unused only fail when the request cannot be completed; the
/// returned status is informational.
#[async_trait]
pub trait PantryApi: Send + Sync {
    /// `GET /api/items`
    async fn list_items(&self) -> Result<ItemsResponse>;

    /// `POST /api/items` with the submitted form fields.
    async fn create_item(&self, fields: &BTreeMap<String, String>) -> Result<StatusCode>;

    /// `PUT /api/items/{id}`
    async fn update_item(&self, id: ItemId, patch: &ItemPatch) -> Result<StatusCode>;

    /// `DELETE /api/items/{id}`
    async fn delete_item(&self, id: ItemId) -> Result<StatusCode>;

    /// `GET /api/recipes`
    async fn list_recipes(&self) -> Result<Vec<String>>;

    /// `POST /api/export_shopping`, returning the CSV body.
    async fn export_shopping(&self, items: &[Item]) -> Result<Vec<u8>>;

    /// `POST /api/settings`
    async fn update_settings(&self, soon_days: i64) -> Result<Settings>;
}
