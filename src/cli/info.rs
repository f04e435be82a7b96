use serde::Serialize;

use crate::store::{TagStore, UserStore};

use super::init_store;
use super::pickers::format_relative_time;

#[derive(Serialize)]
struct UserOutput {
    username: String,
    role: String,
    created_at: String,
}

#[derive(Serialize)]
struct DetailedServerInfo {
    users: Vec<UserOutput>,
    tags: Vec<String>,
    pending_requests: Vec<String>,
}

pub fn run_info(data_dir: String, json: bool) -> anyhow::Result<()> {
    let store = init_store(&data_dir)?;

    let users = store.list_users()?;
    let tags = store.list_tags()?;
    let requests = store.list_account_requests()?;

    if json {
        let info = DetailedServerInfo {
            users: users
                .iter()
                .map(|u| UserOutput {
                    username: u.username.clone(),
                    role: u.role.to_string(),
                    created_at: u.created_at.to_rfc3339(),
                })
                .collect(),
            tags: tags.into_iter().collect(),
            pending_requests: requests.into_iter().map(|r| r.username).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!();
    println!("Users ({}):", users.len());
    for user in &users {
        println!(
            "  {} [{}]  created {}",
            user.username,
            user.role,
            format_relative_time(&user.created_at)
        );
    }
    println!();
    println!("Tags: {}", tags.len());
    println!("Pending account requests: {}", requests.len());
    println!();

    Ok(())
}
