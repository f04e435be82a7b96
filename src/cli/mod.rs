mod commands;
mod info;
mod init;
pub mod pickers;
mod user;

pub use commands::{AdminCommands, UserCommands};
pub use info::run_info;
pub use init::run_init;
pub use user::{run_user_add, run_user_remove, run_user_role};

use crate::auth::PasswordHasher;
use crate::config::{HashingConfig, ServerConfig};
use crate::store::SqliteStore;

/// Initialize store from data directory, checking it exists
pub fn init_store(data_dir: &str) -> anyhow::Result<SqliteStore> {
    let config = ServerConfig {
        data_dir: data_dir.into(),
        ..ServerConfig::default()
    };
    let db_path = config.db_path();

    if !db_path.exists() {
        anyhow::bail!(
            "Database not found at {}. Run 'tagsystem admin init' first.",
            db_path.display()
        );
    }

    SqliteStore::new(&db_path).map_err(Into::into)
}

fn default_hasher() -> anyhow::Result<PasswordHasher> {
    PasswordHasher::new(&HashingConfig::default()).map_err(Into::into)
}
