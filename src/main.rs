use clap::{Parser, Subcommand};
use pantry_client::client::ItemPatch;
use pantry_client::controller::Page;
use pantry_client::download::ShoppingList;
use pantry_client::view::COLUMNS;
use pantry_client::{Config, DirectoryDownloads, PantryClient, PantryController};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pantry", about = "Pantry inventory client")]
struct Cli {
    /// Backend address (overrides PANTRY_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Where exports are saved (overrides PANTRY_DOWNLOAD_DIR)
    #[arg(long)]
    download_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show all items and recipe suggestions
    List,
    /// Show recipe suggestions only
    Recipes,
    /// Add an item
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        qty: String,
        #[arg(long, default_value = "")]
        expiry: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Change fields of an existing item
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        qty: Option<String>,
        #[arg(long)]
        expiry: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete an item
    Delete { id: String },
    /// Export the given items as a shopping list
    Export {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Set how many days ahead count as expiring soon
    Settings { soon_days: i64 },
    /// Print the rendered table body and recipe list
    Render,
}

fn print_page(page: &Page) {
    println!("id\t{}", COLUMNS.join("\t"));
    for row in &page.table.rows {
        println!("{}\t{}", row.id, row.cells.join("\t"));
    }
    if !page.recipes.entries.is_empty() {
        println!();
        println!("Suggested recipes (expiring within {} days):", page.settings.soon_days);
        for recipe in &page.recipes.entries {
            println!("  - {}", recipe);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(dir) = cli.download_dir {
        config.download_dir = dir;
    }
    tracing::debug!("Using configuration: {:?}", config);

    let client = match config.timeout {
        Some(timeout) => PantryClient::with_timeout(config.base_url.clone(), timeout)?,
        None => PantryClient::new(config.base_url.clone()),
    };
    let controller = PantryController::new(client, DirectoryDownloads::new(&config.download_dir));

    match cli.command {
        Command::List => {
            controller.load_items().await?;
            print_page(&controller.snapshot().await);
        }
        Command::Recipes => {
            controller.load_recipes().await?;
            for recipe in controller.snapshot().await.recipes.entries {
                println!("{}", recipe);
            }
        }
        Command::Add {
            name,
            category,
            qty,
            expiry,
            notes,
        } => {
            controller.fill_form("name", name).await;
            controller.fill_form("category", category).await;
            controller.fill_form("qty", qty).await;
            controller.fill_form("expiry", expiry).await;
            controller.fill_form("notes", notes).await;
            controller.add_item().await?;
            print_page(&controller.snapshot().await);
        }
        Command::Update {
            id,
            name,
            category,
            qty,
            expiry,
            notes,
        } => {
            let patch = ItemPatch {
                name,
                category,
                qty,
                expiry,
                notes,
            };
            controller.update_item(id.into(), &patch).await?;
            print_page(&controller.snapshot().await);
        }
        Command::Delete { id } => {
            controller.click_delete(&id).await?;
            print_page(&controller.snapshot().await);
        }
        Command::Export { ids } => {
            controller.load_items().await?;
            for id in ids {
                if !controller.set_checked(id.into(), true).await {
                    tracing::warn!("Item {} is not in the pantry, skipping", id);
                }
            }
            let path = controller.export_selection().await?;
            let contents = tokio::fs::read(&path).await?;
            let list = ShoppingList::parse(&contents)?;
            println!("Saved {} ({} items)", path.display(), list.rows.len());
            for row in list.rows {
                println!("  {} x {} [{}] {}", row.quantity, row.name, row.category, row.notes);
            }
        }
        Command::Settings { soon_days } => {
            controller.update_settings(soon_days).await?;
            print_page(&controller.snapshot().await);
        }
        Command::Render => {
            controller.load_items().await?;
            let page = controller.snapshot().await;
            println!("{}", page.table.to_html());
            println!("{}", page.recipes.to_html());
        }
    }

    Ok(())
}
