//! Per-window store handles.
//!
//! Each window context gets its own [`Storage`] connection, keyed by window
//! label and opened from the one shared descriptor. The main window's
//! bootstrap creates the schema exactly once per process; every other context
//! only ever opens what already exists.

use crate::{PopnotesError, Result, Storage, StoreDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// Outcome of the one-time store initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "camelCase")]
pub enum StoreStatus {
    Ready,
    /// Notes features are off; the rest of the UI keeps working.
    Unavailable(String),
}

/// One window's connection. Operations through it run in issuance order.
pub type SharedStorage = Arc<Mutex<Storage>>;

pub struct WindowStores {
    descriptor: StoreDescriptor,
    base_dir: PathBuf,
    init: OnceLock<StoreStatus>,
    handles: Mutex<HashMap<String, SharedStorage>>,
}

impl WindowStores {
    pub fn new(descriptor: StoreDescriptor, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            descriptor,
            base_dir: base_dir.into(),
            init: OnceLock::new(),
            handles: Mutex::new(HashMap::new()),
        }
    }

    pub fn descriptor(&self) -> &StoreDescriptor {
        &self.descriptor
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Creates file and schema on behalf of the main window. Runs at most once
    /// per process; later calls return the first result.
    ///
    /// A failure is logged and recorded as [`StoreStatus::Unavailable`]; it is
    /// never returned as an error.
    pub fn initialize_main(&self, label: &str) -> StoreStatus {
        self.init
            .get_or_init(|| match Storage::init(&self.descriptor, &self.base_dir) {
                Ok(storage) => {
                    self.lock()
                        .insert(label.to_string(), Arc::new(Mutex::new(storage)));
                    StoreStatus::Ready
                }
                Err(e) => {
                    log::error!("note store {} failed to initialize: {e}", self.descriptor);
                    StoreStatus::Unavailable(e.user_message())
                }
            })
            .clone()
    }

    /// `None` until the main window has run its initialization.
    pub fn status(&self) -> Option<StoreStatus> {
        self.init.get().cloned()
    }

    /// The calling window's own handle, opening it on first use.
    ///
    /// # Errors
    ///
    /// [`PopnotesError::StoreUnavailable`] if the store has not been created
    /// or cannot be opened.
    pub fn handle_for(&self, label: &str) -> Result<SharedStorage> {
        if let Some(handle) = self.lock().get(label) {
            return Ok(Arc::clone(handle));
        }
        if let Some(StoreStatus::Unavailable(reason)) = self.status() {
            return Err(PopnotesError::StoreUnavailable(reason));
        }

        let storage = Storage::open(&self.descriptor, &self.base_dir)?;
        log::debug!("window {label} opened its own handle to {}", self.descriptor);
        let handle = Arc::new(Mutex::new(storage));
        Ok(Arc::clone(
            self.lock().entry(label.to_string()).or_insert(handle),
        ))
    }

    /// Drops the handle of a window that has gone away.
    ///
    /// Calls still in flight keep their `Arc` and finish normally.
    pub fn release(&self, label: &str) {
        if self.lock().remove(label).is_some() {
            log::debug!("released store handle of window {label}");
        }
    }

    pub fn open_handles(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SharedStorage>> {
        self.handles.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Locks one window's connection for a single operation.
pub fn lock_storage(handle: &SharedStorage) -> MutexGuard<'_, Storage> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AUXILIARY_LABEL, MAIN_LABEL};
    use tempfile::TempDir;

    fn stores(dir: &Path) -> WindowStores {
        WindowStores::new(StoreDescriptor::default(), dir)
    }

    #[test]
    fn test_initialize_main_runs_once() {
        let temp = TempDir::new().unwrap();
        let stores = stores(temp.path());
        assert_eq!(stores.status(), None);

        assert_eq!(stores.initialize_main(MAIN_LABEL), StoreStatus::Ready);
        let first = stores.handle_for(MAIN_LABEL).unwrap();
        assert_eq!(stores.initialize_main(MAIN_LABEL), StoreStatus::Ready);
        let second = stores.handle_for(MAIN_LABEL).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_each_window_gets_its_own_handle() {
        let temp = TempDir::new().unwrap();
        let stores = stores(temp.path());
        stores.initialize_main(MAIN_LABEL);

        let main = stores.handle_for(MAIN_LABEL).unwrap();
        lock_storage(&main).insert_note("Note1", "").unwrap();

        let popup = stores.handle_for(AUXILIARY_LABEL).unwrap();
        assert!(!Arc::ptr_eq(&main, &popup));
        let popup = lock_storage(&popup);
        assert_eq!(popup.descriptor().as_str(), "sqlite:notes.db");
        assert_eq!(popup.list_notes().unwrap()[0].title, "Note1");
    }

    #[test]
    fn test_failed_init_degrades_without_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();
        let stores = stores(&blocker);

        let status = stores.initialize_main(MAIN_LABEL);
        assert!(matches!(status, StoreStatus::Unavailable(_)));
        assert!(matches!(
            stores.handle_for(AUXILIARY_LABEL),
            Err(PopnotesError::StoreUnavailable(_))
        ));
    }

    #[test]
    fn test_popup_before_main_init_is_unavailable() {
        let temp = TempDir::new().unwrap();
        let stores = stores(temp.path());
        assert!(matches!(
            stores.handle_for(AUXILIARY_LABEL),
            Err(PopnotesError::StoreUnavailable(_))
        ));
    }

    #[test]
    fn test_release_drops_only_that_window() {
        let temp = TempDir::new().unwrap();
        let stores = stores(temp.path());
        stores.initialize_main(MAIN_LABEL);
        let popup = stores.handle_for(AUXILIARY_LABEL).unwrap();
        assert_eq!(stores.open_handles(), 2);

        stores.release(AUXILIARY_LABEL);
        assert_eq!(stores.open_handles(), 1);
        // An in-flight call still completes on its own handle.
        assert!(lock_storage(&popup).list_notes().is_ok());

        stores.release(AUXILIARY_LABEL);
        assert_eq!(stores.open_handles(), 1);
    }

    #[test]
    fn test_status_serializes_for_renderer() {
        let json = serde_json::to_string(&StoreStatus::Ready).unwrap();
        assert_eq!(json, r#"{"status":"ready"}"#);
        let json = serde_json::to_string(&StoreStatus::Unavailable("x".into())).unwrap();
        assert_eq!(json, r#"{"status":"unavailable","reason":"x"}"#);
    }
}
