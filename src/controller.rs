//! # Pantry Controller
//!
//! Reacts to user actions on the pantry page: loading items and recipes, adding,
//! updating and deleting items, and exporting a selection as a shopping list.
//!
//! Every action is one backend round trip followed by a full reload. The page state
//! ([`Page`]) is only ever replaced from a fetch response, never merged.
//!
//! ## Concurrent actions
//!
//! The controller is cheap to clone and several actions may run at once. Each items
//! or recipes fetch takes a ticket before its request goes out; a response is applied
//! only if no later-ticketed response has been applied already, so an older reload
//! finishing last can not overwrite newer data.
//!
//! ## Failures
//!
//! A failed request stops the action where it failed and leaves the page as it was.
//! The failure is passed to the error hook (by default a `tracing` warning) and
//! returned as an [`ActionError`].

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::client::{ItemId, ItemPatch, PantryApi, Settings};
use crate::download::{DownloadSink, EXPORT_FILENAME};
use crate::form::AddItemForm;
use crate::view::{ItemTable, RecipeList};

/// User-visible actions, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LoadItems,
    LoadRecipes,
    AddItem,
    UpdateItem(ItemId),
    DeleteItem(Option<ItemId>),
    ExportSelection,
    UpdateSettings,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::LoadItems => f.write_str("load items"),
            Action::LoadRecipes => f.write_str("load recipes"),
            Action::AddItem => f.write_str("add item"),
            Action::UpdateItem(id) => write!(f, "update item {}", id),
            Action::DeleteItem(Some(id)) => write!(f, "delete item {}", id),
            Action::DeleteItem(None) => f.write_str("delete item"),
            Action::ExportSelection => f.write_str("export selection"),
            Action::UpdateSettings => f.write_str("update settings"),
        }
    }
}

/// An action that stopped early.
#[derive(Debug, thiserror::Error)]
#[error("Failed to {action}: {source}")]
pub struct ActionError {
    pub action: Action,
    #[source]
    pub source: anyhow::Error,
}

/// Callback receiving every [`ActionError`].
pub type ErrorHook = Arc<dyn Fn(&ActionError) + Send + Sync>;

fn log_error(err: &ActionError) {
    tracing::warn!("{:#}", err);
}

/// Everything shown on the page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub table: ItemTable,
    pub recipes: RecipeList,
    pub settings: Settings,
    pub form: AddItemForm,
}

#[derive(Default)]
struct Shared {
    page: Page,
    applied_items: u64,
    applied_recipes: u64,
}

#[derive(Default)]
struct Tickets {
    items: AtomicU64,
    recipes: AtomicU64,
}

pub struct PantryController<A> {
    api: Arc<A>,
    downloads: Arc<dyn DownloadSink>,
    state: Arc<Mutex<Shared>>,
    tickets: Arc<Tickets>,
    on_error: ErrorHook,
}

impl<A> Clone for PantryController<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            downloads: Arc::clone(&self.downloads),
            state: Arc::clone(&self.state),
            tickets: Arc::clone(&self.tickets),
            on_error: Arc::clone(&self.on_error),
        }
    }
}

impl<A: PantryApi> PantryController<A> {
    pub fn new(api: A, downloads: impl DownloadSink + 'static) -> Self {
        Self::with_form(api, downloads, AddItemForm::new())
    }

    pub fn with_form(api: A, downloads: impl DownloadSink + 'static, form: AddItemForm) -> Self {
        let shared = Shared {
            page: Page {
                form,
                ..Page::default()
            },
            ..Shared::default()
        };
        Self {
            api: Arc::new(api),
            downloads: Arc::new(downloads),
            state: Arc::new(Mutex::new(shared)),
            tickets: Arc::new(Tickets::default()),
            on_error: Arc::new(log_error),
        }
    }

    /// Replaces the default logging hook.
    pub fn with_error_hook(mut self, hook: impl Fn(&ActionError) + Send + Sync + 'static) -> Self {
        self.on_error = Arc::new(hook);
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn fail(&self, action: Action, source: anyhow::Error) -> ActionError {
        let err = ActionError { action, source };
        (self.on_error)(&err);
        err
    }

    /// A copy of the current page.
    pub async fn snapshot(&self) -> Page {
        self.state.lock().await.page.clone()
    }

    /// Fetches all items, replaces the table, then loads recipes.
    pub async fn load_items(&self) -> Result<(), ActionError> {
        let ticket = self.tickets.items.fetch_add(1, Ordering::SeqCst) + 1;

        let response = self
            .api
            .list_items()
            .await
            .map_err(|e| self.fail(Action::LoadItems, e))?;

        {
            let mut shared = self.state.lock().await;
            if ticket > shared.applied_items {
                shared.applied_items = ticket;
                shared.page.table = ItemTable::from_items(&response.items);
                shared.page.settings = response.settings;
                tracing::debug!("Rendered {} items", shared.page.table.len());
            } else {
                tracing::debug!(
                    "Discarding stale items response {} (already showing {})",
                    ticket,
                    shared.applied_items
                );
            }
        }

        self.load_recipes().await
    }

    /// Fetches recipe suggestions and replaces the recipe list.
    pub async fn load_recipes(&self) -> Result<(), ActionError> {
        let ticket = self.tickets.recipes.fetch_add(1, Ordering::SeqCst) + 1;

        let recipes = self
            .api
            .list_recipes()
            .await
            .map_err(|e| self.fail(Action::LoadRecipes, e))?;

        let mut shared = self.state.lock().await;
        if ticket > shared.applied_recipes {
            shared.applied_recipes = ticket;
            shared.page.recipes = RecipeList::from_recipes(&recipes);
        } else {
            tracing::debug!("Discarding stale recipes response {}", ticket);
        }
        Ok(())
    }

    /// Types `value` into the add form's control `name`.
    pub async fn fill_form(&self, name: &str, value: impl Into<String>) -> bool {
        self.state.lock().await.page.form.set(name, value)
    }

    /// Submits the add form, resets it, and reloads items.
    ///
    /// The reload happens whatever status the backend answered with. If the request
    /// could not be sent at all the form is still reset but nothing is reloaded.
    pub async fn add_item(&self) -> Result<(), ActionError> {
        let payload = self.state.lock().await.page.form.payload();

        let sent = self.api.create_item(&payload).await;
        self.state.lock().await.page.form.reset();

        let status = sent.map_err(|e| self.fail(Action::AddItem, e))?;
        tracing::info!("Submitted new item ({})", status);

        self.load_items().await
    }

    /// Sends a partial update for `id`, then reloads items.
    pub async fn update_item(&self, id: ItemId, patch: &ItemPatch) -> Result<(), ActionError> {
        let status = self
            .api
            .update_item(id, patch)
            .await
            .map_err(|e| self.fail(Action::UpdateItem(id), e))?;
        tracing::info!("Updated item {} ({})", id, status);

        self.load_items().await
    }

    /// Deletes `id`, then reloads items whatever the backend answered.
    pub async fn delete_item(&self, id: ItemId) -> Result<(), ActionError> {
        let status = self
            .api
            .delete_item(id)
            .await
            .map_err(|e| self.fail(Action::DeleteItem(Some(id)), e))?;
        tracing::info!("Deleted item {} ({})", id, status);

        self.load_items().await
    }

    /// Handles a click on a delete control carrying `data_id`.
    pub async fn click_delete(&self, data_id: &str) -> Result<(), ActionError> {
        let id = data_id.parse::<ItemId>().map_err(|e| {
            self.fail(
                Action::DeleteItem(None),
                anyhow::anyhow!("invalid item id {:?}: {}", data_id, e),
            )
        })?;
        self.delete_item(id).await
    }

    /// Ticks or unticks the selection checkbox of row `id`.
    pub async fn set_checked(&self, id: ItemId, checked: bool) -> bool {
        self.state.lock().await.page.table.set_checked(id, checked)
    }

    /// Exports the checked rows as a shopping list.
    ///
    /// The items sent are taken from a fresh fetch, not from the rendered table, so
    /// changes made since the last render are included. Returns where the file was saved.
    pub async fn export_selection(&self) -> Result<PathBuf, ActionError> {
        let selected: HashSet<ItemId> = self
            .state
            .lock()
            .await
            .page
            .table
            .checked_ids()
            .into_iter()
            .collect();

        let response = self
            .api
            .list_items()
            .await
            .map_err(|e| self.fail(Action::ExportSelection, e))?;

        let items: Vec<_> = response
            .items
            .into_iter()
            .filter(|item| selected.contains(&item.id))
            .collect();
        tracing::debug!("Exporting {} of {} selected items", items.len(), selected.len());

        let body = self
            .api
            .export_shopping(&items)
            .await
            .map_err(|e| self.fail(Action::ExportSelection, e))?;

        self.downloads
            .save(EXPORT_FILENAME, &body)
            .await
            .map_err(|e| self.fail(Action::ExportSelection, e))
    }

    /// Changes how many days ahead count as expiring soon, then reloads.
    pub async fn update_settings(&self, soon_days: i64) -> Result<(), ActionError> {
        let settings = self
            .api
            .update_settings(soon_days)
            .await
            .map_err(|e| self.fail(Action::UpdateSettings, e))?;
        tracing::info!("Expiring-soon window is now {} days", settings.soon_days);

        self.load_items().await
    }
}
