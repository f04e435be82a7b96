mod server;

pub use server::{HashingConfig, ServerConfig};
