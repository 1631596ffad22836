//! Type definitions for the pantry backend API.
//!
//! This module contains the data structures exchanged with the backend: the item
//! records shown in the pantry table, the recipe suggestions, and the request
//! bodies for creating, updating and exporting items.
//!
//! ## Key Types
//!
//! - [`Item`] - A pantry record with quantity, optional expiry and days remaining
//! - [`ItemId`] - Normalized item identifier (with custom deserializer for API inconsistencies)
//! - [`Quantity`] - Quantity as stored by the backend: a number, form text, or unset
//! - [`ItemsResponse`] / [`RecipesResponse`] - List endpoint wrappers
//! - [`ExportRequest`] - Body of the shopping list export
//!
//! ## API Compatibility
//!
//! The backend stores whatever the add form submits, so several fields are loose:
//! - [`ItemId`] accepts both integers and numeric strings
//! - [`Quantity`] keeps numbers and text apart so they render exactly as received
//! - `category` and `notes` treat `null` as an empty string
//! - Unknown item fields are kept and sent back unchanged on export

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Backend-assigned item identifier.
///
/// Items created by the backend carry integer ids, while the rendered table and
/// checkbox controls carry them as text. Both forms normalize to this type so
/// selections can be compared against freshly fetched items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ItemId)
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        ItemId(id)
    }
}

/// Custom deserializer for ItemId to handle identifiers sent as text.
impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ItemIdVisitor;

        impl<'de> Visitor<'de> for ItemIdVisitor {
            type Value = ItemId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an integer or numeric string item id")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(ItemId(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                i64::try_from(v)
                    .map(ItemId)
                    .map_err(|_| E::custom(format!("item id {} out of range", v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                if v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64 {
                    Ok(ItemId(v as i64))
                } else {
                    Err(E::custom(format!("item id {} is not an integer", v)))
                }
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse()
                    .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(ItemIdVisitor)
    }
}

/// Item quantity exactly as the backend returned it.
///
/// Items added through the form store the quantity as text (`"2"`), items created
/// elsewhere may store a number, and an update can clear it to `null`.
/// Whole floats render without a fraction (`1.0` shows as `1`); otherwise the
/// value is rendered verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(serde_json::Number),
    Text(String),
    #[default]
    Unset,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Number(n) => match n.as_f64() {
                Some(v) if n.is_f64() && v.fract() == 0.0 && v.abs() < 1e15 => {
                    write!(f, "{}", v as i64)
                }
                _ => write!(f, "{}", n),
            },
            Quantity::Text(s) => f.write_str(s),
            Quantity::Unset => Ok(()),
        }
    }
}

/// A pantry inventory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique, backend-assigned identifier
    pub id: ItemId,
    /// Item name
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    /// Category label (backend defaults to "General")
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    /// Quantity on hand
    #[serde(default)]
    pub qty: Quantity,
    /// Expiry date as `YYYY-MM-DD`, if known
    #[serde(default)]
    pub expiry: Option<String>,
    /// Days until expiry, computed by the backend at read time
    #[serde(default)]
    pub days_left: Option<i64>,
    /// Free-form notes
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: String,
    /// Fields this client does not interpret, sent back unchanged on export
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Backend settings that influence recipe suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Items expiring within this many days drive recipe suggestions
    #[serde(default = "default_soon_days")]
    pub soon_days: i64,
}

fn default_soon_days() -> i64 {
    3
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            soon_days: default_soon_days(),
        }
    }
}

/// Response of `GET /api/items`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ItemsResponse {
    pub items: Vec<Item>,
    #[serde(default)]
    pub settings: Settings,
}

/// Response of `GET /api/recipes`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipesResponse {
    pub recipes: Vec<String>,
}

/// Body of `POST /api/export_shopping`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportRequest {
    pub items: Vec<Item>,
}

/// Partial update sent with `PUT /api/items/{id}`. Absent fields are left unchanged.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `POST /api/settings`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub soon_days: i64,
}
