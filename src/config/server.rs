use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub hashing: HashingConfig,
}

/// Argon2id cost parameters used for account passwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
    pub output_len: usize,
}

impl ServerConfig {
    /// Loads a TOML config file. Missing keys fall back to their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    pub fn socket_addr(&self) -> std::result::Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("tagsystem.db")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            hashing: HashingConfig::default(),
        }
    }
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 2,
            parallelism: 1,
            output_len: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(config.db_path(), PathBuf::from("./data/tagsystem.db"));
        assert_eq!(config.hashing.memory_kib, 65536);
        assert_eq!(config.hashing.iterations, 2);
        assert_eq!(config.hashing.parallelism, 1);
    }

    #[test]
    fn test_from_file_fills_missing_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tagsystem.toml");
        std::fs::write(
            &path,
            "port = 9000\ndata_dir = \"/srv/tags\"\n\n[hashing]\niterations = 3\n",
        )
        .unwrap();

        let config = ServerConfig::from_file(&path).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.db_path(), PathBuf::from("/srv/tags/tagsystem.db"));
        assert_eq!(config.hashing.iterations, 3);
        assert_eq!(config.hashing.memory_kib, 65536);
    }

    #[test]
    fn test_from_file_rejects_bad_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.toml");
        std::fs::write(&path, "port = \"not a number\"").unwrap();

        assert!(matches!(
            ServerConfig::from_file(&path),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_from_file_missing() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            ServerConfig::from_file(temp.path().join("absent.toml")),
            Err(Error::Io(_))
        ));
    }
}
