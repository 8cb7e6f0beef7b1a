use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use shelfsync_core::{providers::RemoteCatalog, Config, LocalStore, Synchronizer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod render;

#[derive(Parser)]
#[command(name = "shelfsync")]
#[command(version, about = "Offline-first product catalog browser", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true, env = "SHELFSYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Catalog API root
    #[arg(long, global = true, env = "SHELFSYNC_BASE_URL")]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Local store location
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Pretend there is no network; only the local cache is used
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Browse the catalog
    Browse {
        /// Case-insensitive title search
        #[arg(short, long)]
        query: Option<String>,
        /// Exact category name
        #[arg(short, long)]
        category: Option<String>,
        /// How many pages to reveal
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },
    /// List product categories
    Categories,
    /// Show one product
    Show {
        id: u64,
    },
    /// Manage favorites
    #[command(subcommand)]
    Favorites(FavoriteCommands),
    /// Re-fetch the catalog, like pull-to-refresh
    Refresh,
}

#[derive(clap::Subcommand)]
enum FavoriteCommands {
    /// List favorites
    List,
    /// Mark a product as favorite
    Add { id: u64 },
    /// Unmark a product
    Remove { id: u64 },
    /// Flip the favorite flag
    Toggle { id: u64 },
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.api.timeout_secs = timeout;
    }
    if let Some(db) = &cli.db {
        config.cache.db_path = Some(db.clone());
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never mix with the listing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shelfsync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let db_path = config.db_path()?;
    let storage = Arc::new(
        LocalStore::open(&db_path)
            .with_context(|| format!("opening local store at {}", db_path.display()))?,
    );
    let source = Arc::new(RemoteCatalog::from_config(&config.api)?);
    let sync = Synchronizer::new(source, storage, config.catalog.page_size);
    sync.set_connected(!cli.offline);

    match cli.command {
        Commands::Browse {
            query,
            category,
            pages,
        } => {
            tracing::info!("Browsing catalog");
            sync.start().await;

            let state = sync.state();
            if let Some(query) = query {
                state.set_search_query(query);
            }
            if category.is_some() {
                state.set_selected_category(category);
            }
            for _ in 1..pages {
                state.load_more_products();
            }

            render::catalog(&state.snapshot(), sync.favorites());
            render::snapshot_age(sync.storage());
        }
        Commands::Categories => {
            sync.start().await;
            render::categories(&sync.state().snapshot());
        }
        Commands::Show { id } => {
            sync.load_cached();
            sync.favorites().load();
            let product = sync.product_details(id).await?;
            render::product(&product, sync.favorites().is_favorite(id));
        }
        Commands::Favorites(command) => {
            let favorites = sync.favorites();
            favorites.load();

            match command {
                FavoriteCommands::List => {}
                FavoriteCommands::Add { id } => {
                    sync.load_cached();
                    let product = sync.product_details(id).await?;
                    if !favorites.add(product) {
                        println!("Product {} is already a favorite", id);
                    }
                }
                FavoriteCommands::Remove { id } => {
                    if !favorites.remove(id) {
                        println!("Product {} was not a favorite", id);
                    }
                }
                FavoriteCommands::Toggle { id } => {
                    sync.load_cached();
                    let product = sync.product_details(id).await?;
                    let now = favorites.toggle(product);
                    println!(
                        "Product {} {}",
                        id,
                        if now { "added to favorites" } else { "removed from favorites" }
                    );
                }
            }

            render::favorites(&favorites.list());
        }
        Commands::Refresh => {
            sync.load_cached();
            sync.favorites().load();

            if sync.refresh().await {
                println!("Catalog refreshed");
            } else {
                println!("Offline - showing cached catalog");
            }
            render::catalog(&sync.state().snapshot(), sync.favorites());
            render::snapshot_age(sync.storage());
        }
    }

    Ok(())
}
