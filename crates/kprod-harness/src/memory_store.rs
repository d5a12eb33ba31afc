//! In-memory configuration store.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::sync::{Mutex, MutexGuard, PoisonError};

use kprod_core::{ConfigError, ConfigStore, PersistError, PersistedConfig};

#[derive(Default)]
struct StoreState {
    config: PersistedConfig,
    saves: usize,
    fail_next_save: Option<PersistError>,
}

/// [`ConfigStore`] that keeps the configuration in memory.
#[derive(Default)]
pub struct MemoryConfigStore {
    state: Mutex<StoreState>,
}

impl MemoryConfigStore {
    /// Store holding `config`.
    pub fn new(config: PersistedConfig) -> Self {
        Self { state: Mutex::new(StoreState { config, ..StoreState::default() }) }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the next `save` fail with `err`.
    pub fn fail_next_save(&self, err: PersistError) {
        self.lock().fail_next_save = Some(err);
    }

    /// Current stored configuration.
    pub fn current(&self) -> PersistedConfig {
        self.lock().config.clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }
}

impl ConfigStore for MemoryConfigStore {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn load(&self) -> Result<PersistedConfig, ConfigError> {
        Ok(self.current())
    }

    fn save(&self, config: &PersistedConfig) -> Result<(), PersistError> {
        let mut state = self.lock();
        if let Some(err) = state.fail_next_save.take() {
            return Err(err);
        }
        state.config = config.clone();
        state.saves += 1;
        Ok(())
    }
}
