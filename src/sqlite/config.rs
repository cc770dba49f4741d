use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{Result, SqliteError};

/// Descriptor used when none is configured.
pub const DEFAULT_DESCRIPTOR: &str = "sqlite:database.sqlite";

const MEMORY: &str = ":memory:";

/// How prepare-time failures reach the caller.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Return the failure as a [`SqliteError`].
    #[default]
    Raise,
    /// Log the failure and report [`QueryResult::NoResult`](super::QueryResult::NoResult).
    Silent,
}

/// SQLite Service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// `sqlite:<path>`, `sqlite::memory:` or a bare path
    pub descriptor: String,
    /// Accepted for descriptor compatibility; SQLite has no authentication.
    pub user: Option<String>,
    pub password: Option<String>,
    pub persistent: bool,
    pub error_mode: ErrorMode,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            descriptor: DEFAULT_DESCRIPTOR.to_string(),
            user: None,
            password: None,
            persistent: true,
            error_mode: ErrorMode::Raise,
        }
    }
}

/// Where a descriptor points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
    Memory,
    File(PathBuf),
}

impl SqliteConfig {
    pub fn new(descriptor: impl Into<String>) -> Self {
        Self {
            descriptor: descriptor.into(),
            ..Self::default()
        }
    }

    pub fn in_memory() -> Self {
        Self::new(format!("sqlite:{MEMORY}"))
    }

    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_error_mode(mut self, error_mode: ErrorMode) -> Self {
        self.error_mode = error_mode;
        self
    }

    pub fn with_persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    /// Resolve the descriptor to an in-memory database or a file path.
    pub fn target(&self) -> Result<ConnectionTarget> {
        let descriptor = self.descriptor.trim();
        let location = match descriptor.strip_prefix("sqlite:") {
            Some(rest) => rest,
            None => {
                // a one-letter "scheme" is a Windows drive, not a driver name
                if let Some((scheme, _)) = descriptor.split_once(':') {
                    if scheme.len() > 1 && scheme.chars().all(|c| c.is_ascii_alphanumeric()) {
                        return Err(SqliteError::UnsupportedDescriptor(self.descriptor.clone()));
                    }
                }
                descriptor
            }
        };

        match location {
            "" => Err(SqliteError::UnsupportedDescriptor(self.descriptor.clone())),
            MEMORY => Ok(ConnectionTarget::Memory),
            path => Ok(ConnectionTarget::File(PathBuf::from(path))),
        }
    }
}
