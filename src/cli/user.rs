use chrono::Utc;
use inquire::{Password, Text};

use crate::auth::generate_password;
use crate::server::validation::validate_username;
use crate::store::UserStore;
use crate::types::{Role, User};

use super::pickers::{confirm_action, get_or_pick_user};
use super::{default_hasher, init_store};

pub fn run_user_add(
    data_dir: String,
    username: Option<String>,
    password: Option<String>,
    role: String,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let store = init_store(&data_dir)?;
    let role: Role = role.parse()?;

    let username = if let Some(name) = username {
        validate_username(&name).map_err(anyhow::Error::msg)?;
        name
    } else if non_interactive {
        anyhow::bail!("--username is required in non-interactive mode");
    } else {
        Text::new("Username:")
            .with_validator(|input: &str| {
                Ok(validate_username(input)
                    .map(|()| inquire::validator::Validation::Valid)
                    .unwrap_or_else(|e| inquire::validator::Validation::Invalid(e.into())))
            })
            .prompt()?
    };

    if store.get_user(&username)?.is_some() {
        anyhow::bail!("User '{}' already exists", username);
    }

    let (password, generated) = match password {
        Some(password) => (password, false),
        None if non_interactive => (generate_password(), true),
        None => (Password::new("Password:").prompt()?, false),
    };
    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }

    let user = User {
        username: username.clone(),
        password_hash: default_hasher()?.hash(&password)?,
        role,
        created_at: Utc::now(),
    };
    store.create_user(&user)?;

    println!();
    println!("Created user \"{username}\" with role {role}");
    if generated {
        println!("Password: {password}");
        println!("  Save this now - it cannot be retrieved later.");
    }
    println!();

    Ok(())
}

pub fn run_user_remove(
    data_dir: String,
    username: Option<String>,
    non_interactive: bool,
    yes: bool,
) -> anyhow::Result<()> {
    let store = init_store(&data_dir)?;

    let Some(user) = get_or_pick_user(&store, username, non_interactive)? else {
        return Ok(());
    };

    let confirmed = confirm_action(
        &format!(
            "Delete user '{}'? This will also delete every entity they own.",
            user.username
        ),
        yes,
        non_interactive,
    )?;

    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    store.delete_user(&user.username)?;

    println!();
    println!("Deleted user '{}'", user.username);
    println!();

    Ok(())
}

pub fn run_user_role(
    data_dir: String,
    username: Option<String>,
    role: String,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let store = init_store(&data_dir)?;
    let role: Role = role.parse()?;

    let Some(user) = get_or_pick_user(&store, username, non_interactive)? else {
        return Ok(());
    };

    store.set_role(&user.username, role)?;

    println!();
    println!("Set role of '{}' to {role}", user.username);
    println!();

    Ok(())
}
