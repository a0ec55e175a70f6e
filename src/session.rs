//! The per-user `~/.gatorconfig.json` file that remembers who is logged in.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

pub const FILE_NAME: &str = ".gatorconfig.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("failed to access {path}: {msg}")]
    Io { path: String, msg: String },
    #[error("{path} is not a valid gator config file: {msg}")]
    Format { path: String, msg: String },
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_user_name: Option<String>,
}

impl Session {
    /// A missing file reads as an empty session.
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(error) => return Err(io_error(path, error)),
        };

        serde_json::from_slice(&data).map_err(|error| SessionError::Format {
            path: path.display().to_string(),
            msg: error.to_string(),
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        let data = serde_json::to_vec_pretty(self).map_err(|error| SessionError::Format {
            path: path.display().to_string(),
            msg: error.to_string(),
        })?;

        fs::write(path, data).map_err(|error| io_error(path, error))
    }

    /// Rewrites the file with `name` as the current user, keeping other fields.
    pub fn set_user(path: &Path, name: &str) -> Result<Self, SessionError> {
        let mut session = Self::load(path)?;
        session.current_user_name = Some(name.to_string());
        session.save(path)?;

        Ok(session)
    }

    pub fn current_user_name(&self) -> Option<&str> {
        self.current_user_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

fn io_error(path: &Path, error: io::Error) -> SessionError {
    SessionError::Io {
        path: path.display().to_string(),
        msg: error.to_string(),
    }
}
