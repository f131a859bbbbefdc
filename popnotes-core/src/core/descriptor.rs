//! Connection descriptors that name the shared note database.
//!
//! Both window contexts reach the same data by opening the *same* descriptor
//! string. A descriptor is never rewritten into a derived form before it is
//! handed to the other window; only [`StoreDescriptor::resolve`] turns it into
//! a filesystem location, and it does so identically for every caller.

use crate::{PopnotesError, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// The descriptor both windows use unless settings override it.
pub const DEFAULT_DESCRIPTOR: &str = "sqlite:notes.db";

const SQLITE_SCHEME: &str = "sqlite:";
const IN_MEMORY: &str = ":memory:";

/// A parsed `sqlite:<path>` connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDescriptor {
    raw: String,
}

impl StoreDescriptor {
    /// Parses `raw`, keeping the original string intact.
    ///
    /// # Errors
    ///
    /// Returns [`PopnotesError::StoreUnavailable`] if the scheme is not
    /// `sqlite:` or the path part is empty.
    pub fn parse(raw: &str) -> Result<Self> {
        let Some(path) = raw.strip_prefix(SQLITE_SCHEME) else {
            return Err(PopnotesError::StoreUnavailable(format!(
                "unsupported store descriptor: {raw}"
            )));
        };
        if path.trim().is_empty() {
            return Err(PopnotesError::StoreUnavailable(format!(
                "store descriptor has no path: {raw}"
            )));
        }
        Ok(Self {
            raw: raw.to_string(),
        })
    }

    /// The descriptor exactly as it was given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The path part after the scheme, unresolved.
    pub fn path(&self) -> &str {
        &self.raw[SQLITE_SCHEME.len()..]
    }

    pub fn is_in_memory(&self) -> bool {
        self.path() == IN_MEMORY
    }

    /// Maps the descriptor onto a database location.
    ///
    /// Relative paths are placed under `base_dir` (the app data directory);
    /// absolute paths and `:memory:` are returned unchanged.
    pub fn resolve(&self, base_dir: &Path) -> PathBuf {
        let path = Path::new(self.path());
        if self.is_in_memory() || path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }
}

impl Default for StoreDescriptor {
    fn default() -> Self {
        Self {
            raw: DEFAULT_DESCRIPTOR.to_string(),
        }
    }
}

impl fmt::Display for StoreDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
