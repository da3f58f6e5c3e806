//! Credentials persisted as a JSON object so sessions survive between runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use parking_lot::RwLock;
use vorp_client::CredentialStore;

const DEFAULT_FILE: &str = ".vorp-credentials.json";

/// `$HOME/.vorp-credentials.json`, or the working directory without a home.
pub fn default_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(DEFAULT_FILE)
}

pub struct FileCredentials {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl FileCredentials {
    /// Loads the file if it exists. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)
                .with_context(|| format!("corrupt credentials file {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()))
            }
        };
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) {
        let result = if values.is_empty() {
            match fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
                _ => Ok(()),
            }
        } else {
            serde_json::to_string_pretty(values)
                .map_err(std::io::Error::from)
                .and_then(|json| fs::write(&self.path, json))
        };
        if let Err(e) = result {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to persist credentials");
        }
    }
}

impl CredentialStore for FileCredentials {
    fn get(&self, name: &str) -> Option<String> {
        self.values.read().get(name).cloned()
    }

    fn set(&self, name: &str, value: &str) {
        let mut values = self.values.write();
        values.insert(name.to_string(), value.to_string());
        self.persist(&values);
    }

    fn remove(&self, name: &str) {
        let mut values = self.values.write();
        if values.remove(name).is_some() {
            self.persist(&values);
        }
    }

    fn clear(&self) {
        let mut values = self.values.write();
        values.clear();
        self.persist(&values);
    }

    fn entries(&self) -> Vec<(String, String)> {
        self.values
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
