//! Local key/value persistence.
//!
//! Holds the last entered identity and the bundle rotation between launches.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use super::PlayerIdentity;
use crate::content::BundleRotation;
use crate::log;

pub const COMPANY_KEY: &str = "human-ocr-company";
pub const EMPLOYEE_ID_KEY: &str = "human-ocr-employeeId";
pub const NAME_KEY: &str = "human-ocr-name";
pub const BUNDLE_ORDER_KEY: &str = "human-ocr-bundle-order";

/// String key/value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a single JSON object file, rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens the store. A missing or unreadable file starts empty.
    pub fn open(path: &Path) -> Self {
        let values = match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(values) => values,
                Err(e) => {
                    log(&format!(
                        "Ignoring invalid local state {}: {}",
                        path.display(),
                        e
                    ));
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };

        Self {
            path: path.to_path_buf(),
            values,
        }
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

/// Last saved identity; absent fields are empty.
pub fn load_identity(store: &dyn KeyValueStore) -> PlayerIdentity {
    PlayerIdentity {
        company: store.get(COMPANY_KEY).unwrap_or_default(),
        employee_id: store.get(EMPLOYEE_ID_KEY).unwrap_or_default(),
        name: store.get(NAME_KEY).unwrap_or_default(),
    }
}

pub fn save_identity(store: &mut dyn KeyValueStore, identity: &PlayerIdentity) -> Result<()> {
    store.set(COMPANY_KEY, &identity.company)?;
    store.set(EMPLOYEE_ID_KEY, &identity.employee_id)?;
    store.set(NAME_KEY, &identity.name)
}

/// Saved rotation, or the default rotation if none is stored.
pub fn load_rotation(store: &dyn KeyValueStore) -> BundleRotation {
    store
        .get(BUNDLE_ORDER_KEY)
        .map(|json| BundleRotation::from_json(&json))
        .unwrap_or_default()
}

pub fn save_rotation(store: &mut dyn KeyValueStore, rotation: &BundleRotation) -> Result<()> {
    store.set(BUNDLE_ORDER_KEY, &rotation.to_json())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_identity_roundtrip_memory() {
        let mut store = MemoryStore::default();
        assert_eq!(load_identity(&store), PlayerIdentity::default());

        let id = PlayerIdentity::new("회사", "007", "본드");
        save_identity(&mut store, &id).unwrap();
        assert_eq!(load_identity(&store), id);
        assert_eq!(store.get(EMPLOYEE_ID_KEY).as_deref(), Some("007"));
    }

    #[test]
    fn test_rotation_default_and_saved() {
        let mut store = MemoryStore::default();
        assert_eq!(load_rotation(&store), BundleRotation::default());

        let rotation = BundleRotation::from_slots(vec![
            Some("memil".into()),
            None,
            Some("last".into()),
        ]);
        save_rotation(&mut store, &rotation).unwrap();
        assert_eq!(
            store.get(BUNDLE_ORDER_KEY).as_deref(),
            Some(r#"["memil",null,"last"]"#)
        );
        assert_eq!(load_rotation(&store), rotation);
    }

    #[test]
    fn test_json_file_store_persists() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("local_state.json");

        let mut store = JsonFileStore::open(&path);
        assert!(store.get(NAME_KEY).is_none());
        store.set(NAME_KEY, "홍길동").unwrap();

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get(NAME_KEY).as_deref(), Some("홍길동"));
    }

    #[test]
    fn test_json_file_store_ignores_garbage() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("local_state.json");
        fs::write(&path, "{ not json").unwrap();

        let mut store = JsonFileStore::open(&path);
        assert!(store.get(COMPANY_KEY).is_none());
        store.set(COMPANY_KEY, "A").unwrap();
        assert_eq!(JsonFileStore::open(&path).get(COMPANY_KEY).as_deref(), Some("A"));
    }
}
