//! Delivering exported files to the user.
//!
//! The export endpoint answers with CSV bytes which are handed to a [`DownloadSink`]
//! under a fixed filename. [`DirectoryDownloads`] saves them into a directory;
//! [`ShoppingList`] parses a saved export back into rows for display.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Filename every shopping list export is delivered under.
pub const EXPORT_FILENAME: &str = "shopping_list.csv";

/// Receives downloaded files.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Stores `contents` as `filename`, returning where it ended up.
    async fn save(&self, filename: &str, contents: &[u8]) -> Result<PathBuf>;
}

/// Writes downloads into a directory, replacing any file with the same name.
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DownloadSink for DirectoryDownloads {
    async fn save(&self, filename: &str, contents: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create download directory {}", self.dir.display()))?;

        let path = self.dir.join(filename);
        tokio::fs::write(&path, contents)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::info!("Saved {} bytes to {}", contents.len(), path.display());
        Ok(path)
    }
}

/// One line of an exported shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShoppingListRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Quantity")]
    pub quantity: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Notes")]
    pub notes: String,
}

/// A parsed shopping list export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    pub rows: Vec<ShoppingListRow>,
}

impl ShoppingList {
    pub fn parse(contents: &[u8]) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(contents);
        let rows = reader
            .deserialize()
            .collect::<Result<Vec<ShoppingListRow>, _>>()
            .context("Malformed shopping list export")?;
        Ok(Self { rows })
    }
}
