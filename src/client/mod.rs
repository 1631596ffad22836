//! # Pantry HTTP Client
//!
//! This module talks to the pantry backend: listing items and recipe suggestions,
//! creating, updating and deleting items, and exporting a shopping list as CSV.
//!
//! ## Modules
//!
//! - [`api`] - The [`PantryApi`] trait the controller fetches data through
//! - [`client`] - HTTP implementation of [`PantryApi`] on top of `reqwest`
//! - [`types`] - Type definitions for API requests and responses
//!
//! ## Quick Start
//!
//! ```no_run
//! use pantry_client::client::{PantryApi, PantryClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = PantryClient::new("http://localhost:5000".to_string());
//!
//! let listing = client.list_items().await?;
//! println!("{} items in the pantry", listing.items.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
#[allow(clippy::module_inception)]
pub mod client;
pub mod types;

pub use api::PantryApi;
pub use client::PantryClient;
pub use types::*;
