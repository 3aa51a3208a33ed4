//! File-backed JSON store of named contact tables
//!
//! The on-disk layout is a single JSON object mapping table names to arrays
//! of contacts:
//!
//! ```json
//! { "users": [ { "firstName": "John", "lastName": "Doe", ... } ] }
//! ```

use crate::collection::ContactList;
use crate::contact::Contact;
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Table holding imported contacts
pub const USERS_TABLE: &str = "users";

/// Named tables of contacts, optionally backed by a JSON file
#[derive(Debug, Clone, Default)]
pub struct Store {
    path: Option<PathBuf>,
    tables: BTreeMap<String, Vec<Contact>>,
}

impl Store {
    /// Create a store that is never written to disk
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load a store from a JSON file, or start empty if the file does not exist
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "store file missing, starting empty");
            return Ok(Self {
                path: Some(path.to_path_buf()),
                tables: BTreeMap::new(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let tables: BTreeMap<String, Vec<Contact>> = serde_json::from_str(&content)?;
        debug!(path = %path.display(), tables = tables.len(), "store loaded");

        Ok(Self {
            path: Some(path.to_path_buf()),
            tables,
        })
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get a table by name, creating it empty if it does not exist
    pub fn table(&mut self, name: &str) -> &mut Vec<Contact> {
        self.tables.entry(name.to_string()).or_default()
    }

    /// Write the store to its file as pretty JSON. No-op for in-memory stores.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut content = serde_json::to_string_pretty(&self.tables)?;
        content.push('\n');
        fs::write(path, content)?;
        debug!(path = %path.display(), "store saved");
        Ok(())
    }
}

impl ContactList {
    /// Load the contacts held in the store's users table
    pub fn from_store(store: &mut Store) -> Self {
        store.table(USERS_TABLE).clone().into()
    }

    /// Replace the store's users table with this list
    pub fn write_to_store(&self, store: &mut Store) {
        *store.table(USERS_TABLE) = self.as_slice().to_vec();
    }
}
