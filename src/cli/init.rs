use std::fs;
use std::path::Path;

use anyhow::bail;
use chrono::Utc;
use inquire::Password;

use crate::auth::generate_password;
use crate::config::ServerConfig;
use crate::store::{SqliteStore, Store, UserStore};
use crate::types::{Role, User};

use super::default_hasher;

pub const ADMIN_PASSWORD_FILE: &str = ".admin_password";

#[cfg(unix)]
fn set_restrictive_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        tracing::warn!("Failed to set permissions on {}: {e}", path.display());
    }
}

/// Creates the database and the first admin account.
pub fn run_init(
    data_dir: String,
    username: String,
    password: Option<String>,
    non_interactive: bool,
) -> anyhow::Result<()> {
    crate::server::validation::validate_username(&username).map_err(anyhow::Error::msg)?;

    let config = ServerConfig {
        data_dir: data_dir.into(),
        ..ServerConfig::default()
    };
    fs::create_dir_all(&config.data_dir)?;

    let store = SqliteStore::new(config.db_path())?;
    store.initialize()?;

    let password_file = config.data_dir.join(ADMIN_PASSWORD_FILE);

    if store.has_admin()? {
        bail!("Server already initialized. An admin account already exists.");
    }

    let (password, generated) = match password {
        Some(password) => (password, false),
        None if non_interactive => (generate_password(), true),
        None => Password::new("Admin password:")
            .with_help_message("Leave empty to generate one")
            .prompt_skippable()?
            .filter(|p| !p.is_empty())
            .map_or_else(|| (generate_password(), true), |p| (p, false)),
    };
    if password.is_empty() {
        bail!("Password cannot be empty");
    }

    let user = User {
        username: username.clone(),
        password_hash: default_hasher()?.hash(&password)?,
        role: Role::Admin,
        created_at: Utc::now(),
    };
    store.create_user(&user)?;

    println!();
    println!("========================================");
    println!("Created admin account '{username}'");

    if generated {
        fs::write(&password_file, &password)?;

        #[cfg(unix)]
        set_restrictive_permissions(&password_file);

        println!("Generated password (save this, it won't be shown again):");
        println!();
        println!("  {password}");
        println!();
        println!("Password also written to: {}", password_file.display());
    }

    println!("========================================");
    println!();

    Ok(())
}
