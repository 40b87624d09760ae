//! Cross-thread access to one [`World`].
//!
//! All reads and writes of the fill, approval, proxy and authentication
//! tables go through a single lock, so concurrent submitters observe the
//! same total order of top-level calls.

use std::sync::{Arc, Mutex};

use atomix_types::{AtomixError, Result};

use crate::host::World;

/// Cloneable handle serializing access to a [`World`].
#[derive(Debug, Clone)]
pub struct SharedWorld {
    inner: Arc<Mutex<World>>,
}

impl SharedWorld {
    #[must_use]
    pub fn new(world: World) -> Self {
        Self {
            inner: Arc::new(Mutex::new(world)),
        }
    }

    /// Run `f` with exclusive access. Nothing else touches the world
    /// until `f` returns.
    pub fn with<T>(&self, f: impl FnOnce(&mut World) -> Result<T>) -> Result<T> {
        let mut world = self
            .inner
            .lock()
            .map_err(|_| AtomixError::Internal("world lock poisoned".into()))?;
        f(&mut world)
    }
}
