//! # Pantry Client Library
//!
//! Client for a pantry inventory tracker backend. It fetches the item and recipe
//! lists, renders them as an HTML table and list, and submits add, update, delete
//! and export actions.
//!
//! ## Client Module
//!
//! The [`client`] module holds the wire types, the [`PantryApi`] data-fetching trait
//! and its HTTP implementation [`PantryClient`].
//!
//! ## Controller Module
//!
//! The [`controller`] module reacts to user actions, reloading and re-rendering the
//! [`Page`](controller::Page) after each one. Rendering itself lives in [`view`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use pantry_client::{DirectoryDownloads, PantryClient, PantryController};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = PantryClient::new("http://localhost:5000".to_string());
//! let controller = PantryController::new(client, DirectoryDownloads::new("."));
//!
//! controller.load_items().await?;
//! let page = controller.snapshot().await;
//! println!("{}", page.table.to_html());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod controller;
pub mod download;
pub mod form;
pub mod view;

pub use client::{PantryApi, PantryClient};
pub use config::Config;
pub use controller::{ActionError, PantryController};
pub use download::DirectoryDownloads;
