//! Credential resolution
//! Four secrets are read once at startup from the environment
//! An optional JSON file fills in what the environment doesn't have
use std::fmt;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::XError;

/// Consumer and access token pair used for signing every request
/// Resolved once and passed by reference into the client
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .field("access_token", &self.access_token)
            .field("access_token_secret", &"[REDACTED]")
            .finish()
    }
}

/// Shape of the credential file, every field is optional so that it can complete the environment
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CredentialFile {
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
    pub access_token: Option<String>,
    pub access_token_secret: Option<String>,
}

impl Credentials {
    /// Resolve from the process environment and the given file (if any)
    pub fn resolve(file: Option<CredentialFile>) -> Result<Credentials, XError> {
        Self::resolve_with(|name| std::env::var(name).ok(), file.unwrap_or_default())
    }

    /// Resolve with an arbitrary variable lookup
    ///
    /// * lookup: returns the value of an environment variable, empty values count as missing
    /// * file: values used when the environment has nothing
    pub fn resolve_with<F>(lookup: F, file: CredentialFile) -> Result<Credentials, XError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| lookup(name))
                .find(|value| !value.is_empty())
        };
        let or_file = |value: Option<String>, fallback: Option<String>| {
            value.or(fallback.filter(|value| !value.is_empty()))
        };

        let consumer_key = or_file(var(&["X_API_KEY"]), file.consumer_key);
        let consumer_secret = or_file(
            var(&["X_API_KEY_SECRET", "X_API_SECRET"]),
            file.consumer_secret,
        );
        let access_token = or_file(var(&["X_ACCESS_TOKEN"]), file.access_token);
        let access_token_secret = or_file(
            var(&["X_ACCESS_TOKEN_SECRET", "X_ACCESS_SECRET"]),
            file.access_token_secret,
        );

        match (
            consumer_key,
            consumer_secret,
            access_token,
            access_token_secret,
        ) {
            (
                Some(consumer_key),
                Some(consumer_secret),
                Some(access_token),
                Some(access_token_secret),
            ) => Ok(Credentials {
                consumer_key,
                consumer_secret,
                access_token,
                access_token_secret,
            }),
            (consumer_key, consumer_secret, access_token, access_token_secret) => {
                let mut missing = Vec::new();
                if consumer_key.is_none() {
                    missing.push("X_API_KEY");
                }
                if consumer_secret.is_none() {
                    missing.push("X_API_KEY_SECRET (or X_API_SECRET)");
                }
                if access_token.is_none() {
                    missing.push("X_ACCESS_TOKEN");
                }
                if access_token_secret.is_none() {
                    missing.push("X_ACCESS_TOKEN_SECRET (or X_ACCESS_SECRET)");
                }
                Err(XError::Configuration { missing })
            }
        }
    }
}

/// Load the credential file
/// * config_path: path of the file
/// * required: when false a nonexistent or broken file is treated as absent
pub fn load_credential_file(config_path: &Path, required: bool) -> Result<Option<CredentialFile>> {
    if !required && !config_path.exists() {
        debug!("No credential file at {}", config_path.display());
        return Ok(None);
    }
    let file = OpenOptions::new()
        .read(true)
        .open(config_path)
        .map_err(|source| XError::Filesystem {
            path: config_path.to_path_buf(),
            source,
        })?;
    let loaded: CredentialFile = match serde_json::from_reader(file) {
        Ok(loaded) => loaded,
        Err(e) if !required => {
            warn!("Ignoring {}: {}", config_path.display(), e);
            return Ok(None);
        }
        Err(e) => Err(e)?,
    };
    debug!("Loaded credential file {}", config_path.display());
    Ok(Some(loaded))
}

/// Get the default path of the credential file
/// It is `.xpost.json` in your home dir
pub fn find_default_config_file() -> Option<PathBuf> {
    let default_path = ".xpost.json";
    home::home_dir().map(|mut path| {
        path.push(default_path);
        path
    })
}
