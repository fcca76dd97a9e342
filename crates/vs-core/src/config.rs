//! Configuration types and parsing for versync.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default project configuration file name
pub const CONFIG_FILE: &str = "versync.yml";

/// In-memory database marker accepted by `database`
pub const IN_MEMORY: &str = ":memory:";

/// Project configuration from versync.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path to the database file, or `:memory:`
    pub database: String,

    /// Table recording one row per applied version
    #[serde(default = "default_version_table")]
    pub version_table: String,

    /// Directories containing migration scripts
    #[serde(default = "default_migration_paths")]
    pub migration_paths: Vec<String>,

    /// Number given to the change that creates the version table
    #[serde(default)]
    pub bootstrap_version: i64,

    /// Run each change inside its own transaction
    #[serde(default = "default_true")]
    pub transactional: bool,

    /// Log each applied change
    #[serde(default = "default_true")]
    pub log_changes: bool,
}

fn default_version_table() -> String {
    "version".to_string()
}

fn default_migration_paths() -> Vec<String> {
    vec!["migrations".to_string()]
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load and validate configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `versync.yml` (or `versync.yaml`) from a project directory
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml = dir.join(CONFIG_FILE);
        if yml.exists() {
            return Self::load(&yml);
        }
        let yaml = dir.join("versync.yaml");
        if yaml.exists() {
            return Self::load(&yaml);
        }
        Err(CoreError::ConfigNotFound {
            path: yml.display().to_string(),
        })
    }

    /// Check values serde cannot check on its own
    pub fn validate(&self) -> CoreResult<()> {
        if self.database.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database must not be empty".to_string(),
            });
        }
        if !is_table_name(&self.version_table) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "version_table '{}' is not a plain or schema-qualified identifier",
                    self.version_table
                ),
            });
        }
        if self.migration_paths.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migration_paths must name at least one directory".to_string(),
            });
        }
        Ok(())
    }

    /// Whether the database lives in memory only
    pub fn is_in_memory(&self) -> bool {
        self.database == IN_MEMORY
    }

    /// Database location resolved against the project root
    pub fn database_path(&self, root: &Path) -> String {
        if self.is_in_memory() {
            return self.database.clone();
        }
        resolve(root, &self.database).display().to_string()
    }

    /// Migration directories resolved against the project root
    pub fn migration_paths_absolute(&self, root: &Path) -> Vec<PathBuf> {
        self.migration_paths
            .iter()
            .map(|p| resolve(root, p))
            .collect()
    }
}

fn resolve(root: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// `name` or `schema.name`, each part a SQL identifier
fn is_table_name(name: &str) -> bool {
    let mut parts = name.split('.');
    let valid = |part: &str| {
        let mut chars = part.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    };
    match (parts.next(), parts.next(), parts.next()) {
        (Some(table), None, None) => valid(table),
        (Some(schema), Some(table), None) => valid(schema) && valid(table),
        _ => false,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
