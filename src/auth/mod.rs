mod helpers;
mod middleware;
mod password;

pub use helpers::{Credentials, extract_basic_credentials};
pub use middleware::{AuthError, RequireAdmin, RequireUser};
pub use password::{PasswordHasher, generate_password};
