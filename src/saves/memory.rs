//! Saving to memory, for tests and games nobody wants to resume.

use std::sync::Arc;

use dashmap::DashMap;

use super::{Result, Storage};

/// Keeps everything in a map. Clones share the same map, so a test can hold onto one and peek at what the other
/// wrote.
#[derive(Clone, Debug, Default)]
pub struct Memory(Arc<DashMap<String, Vec<u8>>>);

impl Memory {
    /// How many keys are currently stored.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Storage for Memory {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.0.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.0.insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.0.remove(key);
        Ok(())
    }
}
