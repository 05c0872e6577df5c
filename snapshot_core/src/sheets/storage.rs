use log::info;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::dto::StoredToken;
use crate::error::AuthError;

/// Storage helper for the OAuth token file
pub struct TokenStorage {
    path: PathBuf,
}

impl TokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored token, `None` if nothing has been stored yet
    pub fn load(&self) -> Result<Option<StoredToken>, AuthError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(AuthError::Io {
                    path: self.path.display().to_string(),
                    source,
                })
            }
        };

        let token = serde_json::from_str(&content).map_err(|source| AuthError::Json {
            path: self.path.display().to_string(),
            source,
        })?;
        Ok(Some(token))
    }

    /// Store the token to disk for later runs
    pub fn store(&self, token: &StoredToken) -> Result<(), AuthError> {
        let json = serde_json::to_string(token).map_err(|source| AuthError::Json {
            path: self.path.display().to_string(),
            source,
        })?;

        fs::write(&self.path, json).map_err(|source| AuthError::Io {
            path: self.path.display().to_string(),
            source,
        })?;

        info!("Token stored to {}", self.path.display());
        Ok(())
    }
}
