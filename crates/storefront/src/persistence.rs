//! Saving the cart between CLI invocations.
//!
//! The cart is written as pretty-printed JSON of [`CartState`]. Loading
//! replays every item through the cart rules, so a hand-edited file cannot
//! smuggle in a sixth item or a duplicate.

use std::io;
use std::path::{Path, PathBuf};

use threadline_core::{CartError, CartState, CartStore};
use tracing::debug;

/// The cart file could not be read or written.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to read cart file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write cart file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("cart file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("cart file {path} holds an invalid cart: {source}")]
    Invalid { path: PathBuf, source: CartError },
}

/// A cart stored at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartFile {
    path: PathBuf,
}

impl CartFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cart. A missing file is an empty cart.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the file is unreadable, not JSON, or
    /// breaks the cart rules.
    pub fn load(&self) -> Result<CartStore, PersistenceError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved cart");
                return Ok(CartStore::new());
            }
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let state: CartState =
            serde_json::from_str(&raw).map_err(|source| PersistenceError::Parse {
                path: self.path.clone(),
                source,
            })?;
        CartStore::restore(state).map_err(|source| PersistenceError::Invalid {
            path: self.path.clone(),
            source,
        })
    }

    /// Save the cart, replacing the previous file atomically.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Write`] if the directory or file cannot be
    /// written.
    pub fn save(&self, cart: &CartStore) -> Result<(), PersistenceError> {
        let write_err = |source| PersistenceError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let json = serde_json::to_string_pretty(&cart.snapshot())
            .map_err(|e| write_err(io::Error::other(e)))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(write_err)?;
        std::fs::rename(&tmp, &self.path).map_err(write_err)?;

        debug!(path = %self.path.display(), items = cart.len(), "cart saved");
        Ok(())
    }
}
