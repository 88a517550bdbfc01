use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::models::AttributePolicy;
use crate::storage::DEFAULT_FILE_PATH;

/// Where entities are kept. Only the JSON file backend exists; `db`
/// switches entity construction to declared attributes only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageType {
    File,
    Db,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "hbnb", version, about = "Interactive console for HBNB objects")]
pub struct Config {
    /// JSON file the objects are persisted to
    #[arg(long = "file", env = "HBNB_FILE_PATH", default_value = DEFAULT_FILE_PATH)]
    pub file_path: PathBuf,

    #[arg(long = "storage", env = "HBNB_TYPE_STORAGE", value_enum, default_value_t = StorageType::File)]
    pub storage_type: StorageType,

    /// Log filter used when RUST_LOG is unset, e.g. `debug` or `hbnb=info`
    #[arg(long, env = "HBNB_LOG", default_value = "warn")]
    pub log_level: String,
}

impl Config {
    pub fn attribute_policy(&self) -> AttributePolicy {
        match self.storage_type {
            StorageType::File => AttributePolicy::Permissive,
            StorageType::Db => AttributePolicy::Strict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let config =
            Config::try_parse_from(["hbnb", "--file", "/tmp/objects.json", "--storage", "db"]).unwrap();
        assert_eq!(config.file_path, PathBuf::from("/tmp/objects.json"));
        assert_eq!(config.storage_type, StorageType::Db);
        assert_eq!(config.attribute_policy(), AttributePolicy::Strict);
    }

    #[test]
    fn test_rejects_unknown_storage() {
        assert!(Config::try_parse_from(["hbnb", "--storage", "sqlite"]).is_err());
    }
}
