use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mindmap::api::{self, AppState};
use mindmap::config::Config;
use mindmap::db::Database;
use mindmap::history::SystemClock;
use mindmap::models::{Document, DEFAULT_DOCUMENT_NAME};
use mindmap::render::render_document;
use mindmap::store::MapCatalog;

#[derive(Parser)]
#[command(name = "mindmap")]
#[command(about = "Build and edit tree-shaped mind maps")]
struct Cli {
    /// Path of the map store (overrides the config file)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Port for HTTP API
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// List stored maps
    List,
    /// Create a new map with a single root node
    New {
        name: Option<String>,
    },
    /// Rename a map
    Rename { id: String, name: String },
    /// Delete a map
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Print a map as a tree
    Show { id: String },
    /// Write every map to a JSON file (stdout if omitted)
    Export { file: Option<PathBuf> },
    /// Replace every map with the contents of a JSON export
    Import { file: PathBuf },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "mindmap=debug,tower_http=debug".into()),
    );

    // stdout is reserved for command output
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_database(cli_path: Option<PathBuf>, config: &Config) -> anyhow::Result<Database> {
    let db = match cli_path.or_else(|| config.database_path.clone()) {
        Some(path) => Database::open(path)?,
        None => Database::open_default()?,
    };
    db.migrate()?;
    Ok(db)
}

async fn serve(db: Database, config: &Config, port: u16) -> anyhow::Result<()> {
    let state = AppState::with_clock(db, std::sync::Arc::new(SystemClock), config.history_window());
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Mind map server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = Config::load();
    let db = open_database(cli.db, &config)?;
    let catalog = MapCatalog::new(db.clone());

    match cli.command {
        Some(Commands::Serve { port }) => {
            serve(db, &config, port.unwrap_or(config.port)).await?;
        }
        None => {
            serve(db, &config, config.port).await?;
        }
        Some(Commands::List) => {
            let maps = catalog.list()?;
            if maps.is_empty() {
                println!("No maps yet. Create one with `mindmap new`.");
            }
            for (id, summary) in maps {
                println!("{}  {}  ({} nodes)", id, summary.name, summary.node_count);
            }
        }
        Some(Commands::New { name }) => {
            let name = name.unwrap_or_else(|| DEFAULT_DOCUMENT_NAME.to_string());
            let id = catalog.create(Document::fresh(name))?;
            println!("{}", id);
        }
        Some(Commands::Rename { id, name }) => {
            if !catalog.rename(&id, &name)? {
                anyhow::bail!("Map not found: {}", id);
            }
        }
        Some(Commands::Delete { id, yes }) => {
            if !yes {
                anyhow::bail!("Refusing to delete {} without --yes", id);
            }
            if !catalog.delete(&id)? {
                anyhow::bail!("Map not found: {}", id);
            }
        }
        Some(Commands::Show { id }) => {
            let document = catalog
                .get(&id)?
                .ok_or_else(|| anyhow::anyhow!("Map not found: {}", id))?;
            print!("{}", render_document(&document));
        }
        Some(Commands::Export { file }) => {
            let json = catalog.export()?;
            match file {
                Some(path) => std::fs::write(&path, json)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => println!("{}", json),
            }
        }
        Some(Commands::Import { file }) => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let count = catalog.import(&json)?;
            println!("Imported {} maps", count);
        }
    }

    Ok(())
}
