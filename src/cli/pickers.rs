use std::fmt;

use chrono::{DateTime, Utc};
use inquire::{InquireError, Select};

use crate::store::Store;
use crate::types::User;

/// User with role and age for display
pub struct UserDisplay(pub User);

impl fmt::Display for UserDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]  created {}",
            self.0.username,
            self.0.role,
            format_relative_time(&self.0.created_at)
        )
    }
}

pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(*dt);

    if duration.num_seconds() < 60 {
        "just now".to_string()
    } else if duration.num_minutes() < 60 {
        let mins = duration.num_minutes();
        format!("{mins} minute{} ago", if mins == 1 { "" } else { "s" })
    } else if duration.num_hours() < 24 {
        let hours = duration.num_hours();
        format!("{hours} hour{} ago", if hours == 1 { "" } else { "s" })
    } else {
        let days = duration.num_days();
        format!("{days} day{} ago", if days == 1 { "" } else { "s" })
    }
}

/// Pick a user from the list
pub fn pick_user(store: &impl Store) -> anyhow::Result<Option<User>> {
    let users: Vec<UserDisplay> = store.list_users()?.into_iter().map(UserDisplay).collect();

    if users.is_empty() {
        println!("No users found.");
        return Ok(None);
    }

    let selection = Select::new("Select user:", users)
        .with_page_size(15)
        .with_help_message("Type to filter, Enter to select")
        .with_vim_mode(true)
        .prompt();

    match selection {
        Ok(display) => Ok(Some(display.0)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Get a user by name or interactively pick one
pub fn get_or_pick_user(
    store: &impl Store,
    username: Option<String>,
    non_interactive: bool,
) -> anyhow::Result<Option<User>> {
    if let Some(name) = username {
        let user = store
            .get_user(&name)?
            .ok_or_else(|| anyhow::anyhow!("User not found: {}", name))?;
        Ok(Some(user))
    } else if non_interactive {
        anyhow::bail!("--username is required in non-interactive mode");
    } else {
        pick_user(store)
    }
}

pub fn confirm_action(message: &str, yes: bool, non_interactive: bool) -> anyhow::Result<bool> {
    if yes {
        Ok(true)
    } else if non_interactive {
        anyhow::bail!("--yes is required for destructive operations in non-interactive mode");
    } else {
        Ok(inquire::Confirm::new(message)
            .with_default(false)
            .prompt()?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_format_relative_time() {
        let now = Utc::now();
        assert_eq!(format_relative_time(&now), "just now");
        assert_eq!(
            format_relative_time(&(now - Duration::minutes(1))),
            "1 minute ago"
        );
        assert_eq!(
            format_relative_time(&(now - Duration::hours(5))),
            "5 hours ago"
        );
        assert_eq!(
            format_relative_time(&(now - Duration::days(3))),
            "3 days ago"
        );
    }
}
