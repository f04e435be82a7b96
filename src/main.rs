use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tagsystem::auth::PasswordHasher;
use tagsystem::cli::{self, AdminCommands, UserCommands};
use tagsystem::config::ServerConfig;
use tagsystem::server::{AppState, create_router};
use tagsystem::store::{SqliteStore, Store, UserStore};

#[derive(Parser)]
#[command(name = "tagsystem")]
#[command(about = "A hierarchical tagging server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long, short)]
        port: Option<u16>,

        /// Data directory for the database
        #[arg(long)]
        data_dir: Option<String>,

        /// Path to a TOML config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn run_admin(command: AdminCommands) -> anyhow::Result<()> {
    match command {
        AdminCommands::Init {
            data_dir,
            username,
            password,
            non_interactive,
        } => cli::run_init(data_dir, username, password, non_interactive),
        AdminCommands::User { command } => match command {
            UserCommands::Add {
                data_dir,
                username,
                password,
                role,
                non_interactive,
            } => cli::run_user_add(data_dir, username, password, role, non_interactive),
            UserCommands::Remove {
                data_dir,
                username,
                non_interactive,
                yes,
            } => cli::run_user_remove(data_dir, username, non_interactive, yes),
            UserCommands::Role {
                data_dir,
                username,
                role,
                non_interactive,
            } => cli::run_user_role(data_dir, username, role, non_interactive),
        },
        AdminCommands::Info { data_dir, json } => cli::run_info(data_dir, json),
    }
}

async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    data_dir: Option<String>,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = match config_path {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(data_dir) = data_dir {
        config.data_dir = data_dir.into();
    }

    let db_path = config.db_path();
    if !db_path.exists() {
        bail!(
            "Server not initialized. Run 'tagsystem admin init' first to create the database and admin account."
        );
    }

    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;
    if !store.has_admin()? {
        bail!(
            "Server not initialized. Run 'tagsystem admin init' first to create the database and admin account."
        );
    }

    let state = Arc::new(AppState::new(
        Arc::new(store),
        PasswordHasher::new(&config.hashing)?,
    ));

    let app = create_router(state);
    let addr = config.socket_addr()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tagsystem=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => run_admin(command)?,
        Commands::Serve {
            host,
            port,
            data_dir,
            config,
        } => run_serve(host, port, data_dir, config).await?,
    }

    Ok(())
}
