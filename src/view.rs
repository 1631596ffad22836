//! Render step for the pantry page.
//!
//! Everything here is a pure function of the last fetched data: an [`ItemTable`]
//! is built from a slice of [`Item`]s and a [`RecipeList`] from recipe labels.
//! Both are replaced wholesale on every refresh. `to_html` produces the markup for
//! the table body and the recipe list with all text escaped.

use html_escaper::HtmlEscaper;
use std::fmt::{self, Write};

use crate::client::types::{Item, ItemId};

/// Displays text with HTML special characters escaped.
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        HtmlEscaper(f).write_str(self.0)
    }
}

/// Column headings, in cell order.
pub const COLUMNS: [&str; 6] = ["Name", "Category", "Qty", "Expiry", "Days left", "Notes"];

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub id: ItemId,
    /// Checkbox state of the row's selection control
    pub checked: bool,
    /// Text of each column in [`COLUMNS`] order
    pub cells: [String; 6],
}

impl ItemRow {
    pub fn from_item(item: &Item) -> Self {
        Self {
            id: item.id,
            checked: false,
            cells: [
                item.name.clone(),
                item.category.clone(),
                item.qty.to_string(),
                item.expiry.clone().unwrap_or_default(),
                item.days_left.map(|d| d.to_string()).unwrap_or_default(),
                item.notes.clone(),
            ],
        }
    }

    fn write_html(&self, out: &mut String) {
        let checked = if self.checked { " checked" } else { "" };
        let _ = write!(
            out,
            "<tr><td><input type=\"checkbox\" class=\"select-item\" data-id=\"{}\"{}></td>",
            self.id, checked
        );
        for cell in &self.cells {
            let _ = write!(out, "<td>{}</td>", Escaped(cell));
        }
        let _ = write!(
            out,
            "<td><button class=\"delete-btn\" data-id=\"{}\">Delete</button></td></tr>",
            self.id
        );
    }
}

/// The items table body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemTable {
    pub rows: Vec<ItemRow>,
}

impl ItemTable {
    pub fn from_items(items: &[Item]) -> Self {
        Self {
            rows: items.iter().map(ItemRow::from_item).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, id: ItemId) -> Option<&ItemRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Sets the checkbox of the row with `id`. Returns false if no such row is shown.
    pub fn set_checked(&mut self, id: ItemId, checked: bool) -> bool {
        match self.rows.iter_mut().find(|r| r.id == id) {
            Some(row) => {
                row.checked = checked;
                true
            }
            None => false,
        }
    }

    /// Ids of the checked rows, in table order.
    pub fn checked_ids(&self) -> Vec<ItemId> {
        self.rows.iter().filter(|r| r.checked).map(|r| r.id).collect()
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            row.write_html(&mut out);
        }
        out
    }
}

/// The recipe suggestions list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeList {
    pub entries: Vec<String>,
}

impl RecipeList {
    pub fn from_recipes(recipes: &[String]) -> Self {
        Self {
            entries: recipes.to_vec(),
        }
    }

    pub fn to_html(&self) -> String {
        self.entries
            .iter()
            .map(|r| format!("<li>{}</li>", Escaped(r)))
            .collect()
    }
}
