use clap::Subcommand;

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Initialize the server (create database and first admin account)
    Init {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Username for the admin account
        #[arg(long, default_value = "admin")]
        username: String,

        /// Password for the admin account (generated if omitted)
        #[arg(long)]
        password: Option<String>,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Show server status information
    Info {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Add a new user account
    Add {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Username for the new user
        #[arg(long)]
        username: Option<String>,

        /// Password for the new user (generated in non-interactive mode if omitted)
        #[arg(long)]
        password: Option<String>,

        /// Role for the new user (ADMIN or USER)
        #[arg(long, default_value = "USER")]
        role: String,

        /// Skip interactive prompts (requires --username)
        #[arg(long)]
        non_interactive: bool,
    },

    /// Remove a user and every entity they own
    Remove {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Username to remove
        #[arg(long)]
        username: Option<String>,

        /// Skip interactive prompts (requires --username)
        #[arg(long)]
        non_interactive: bool,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Change a user's role
    Role {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Username to update
        #[arg(long)]
        username: Option<String>,

        /// New role (ADMIN or USER)
        #[arg(long)]
        role: String,

        /// Skip interactive prompts (requires --username)
        #[arg(long)]
        non_interactive: bool,
    },
}
