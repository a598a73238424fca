//! secrets::file_store
//!
//! TOML file of key/value pairs, `~/.autoplaylist/secrets.toml` by default.
//!
//! On Unix the file is created with mode 0600 before any content is
//! written. Every write goes to a sibling temp file which is then renamed
//! over the original.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use tracing::debug;

use super::traits::{SecretError, SecretStore};

type Entries = BTreeMap<String, String>;

/// File-backed secret store.
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    path: PathBuf,
}

impl FileSecretStore {
    /// Store at `~/.autoplaylist/secrets.toml`.
    ///
    /// # Errors
    ///
    /// Fails if the home directory cannot be determined.
    pub fn new() -> Result<Self, SecretError> {
        let home = dirs::home_dir()
            .ok_or_else(|| SecretError::Read("cannot determine home directory".into()))?;
        Ok(Self::with_path(home.join(".autoplaylist").join("secrets.toml")))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries, SecretError> {
        if !self.path.exists() {
            return Ok(Entries::new());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| SecretError::Read(format!("cannot read {}: {}", self.path.display(), e)))?;

        // toml's error would echo the offending line, which may hold a value.
        toml::from_str(&content).map_err(|_| {
            SecretError::Read(format!("cannot parse {}", self.path.display()))
        })
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), SecretError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SecretError::Write(format!("cannot create directory: {}", e)))?;
        }

        let content = toml::to_string(entries)
            .map_err(|e| SecretError::Write(format!("cannot serialize: {}", e)))?;

        let temp_path = self.path.with_extension("toml.tmp");
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| SecretError::Write(format!("cannot create temp file: {}", e)))?;

            #[cfg(unix)]
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|e| SecretError::Write(format!("cannot set permissions: {}", e)))?;

            file.write_all(content.as_bytes())
                .and_then(|()| file.sync_all())
                .map_err(|e| SecretError::Write(format!("cannot write temp file: {}", e)))?;
        }

        fs::rename(&temp_path, &self.path)
            .map_err(|e| SecretError::Write(format!("cannot replace secrets file: {}", e)))?;
        debug!(path = %self.path.display(), keys = entries.len(), "secrets written");
        Ok(())
    }

    /// Fail if the file exists with group or world access.
    #[cfg(unix)]
    pub fn check_permissions(&self) -> Result<(), SecretError> {
        let metadata = match fs::metadata(&self.path) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(SecretError::Read(format!("cannot stat secrets file: {}", e))),
        };
        let mode = metadata.permissions().mode() & 0o777;
        if mode & 0o077 != 0 {
            return Err(SecretError::InsecurePermissions {
                path: self.path.clone(),
                mode,
            });
        }
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn check_permissions(&self) -> Result<(), SecretError> {
        Ok(())
    }
}

impl SecretStore for FileSecretStore {
    fn get(&self, key: &str) -> Result<Option<String>, SecretError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SecretError> {
        let mut entries = self.read_entries()?;
        if entries.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn delete(&self, key: &str) -> Result<(), SecretError> {
        let mut entries = self.read_entries()?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.write_entries(&entries)
    }
}
