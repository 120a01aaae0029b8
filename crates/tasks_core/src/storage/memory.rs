use crate::error::PersistenceError;
use crate::storage::Slot;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// In-process slot. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    inner: Rc<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: RefCell<HashMap<String, String>>,
    full: Cell<bool>,
    writes: Cell<usize>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// While full, every write is rejected as if the quota were exceeded.
    pub fn set_full(&self, full: bool) {
        self.inner.full.set(full);
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.inner.writes.get()
    }

    pub fn put(&self, key: &str, content: &str) {
        self.inner
            .entries
            .borrow_mut()
            .insert(key.to_string(), content.to_string());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.entries.borrow().get(key).cloned()
    }
}

impl Slot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.get(key))
    }

    fn write(&self, key: &str, content: &str) -> Result<(), PersistenceError> {
        if self.inner.full.get() {
            return Err(PersistenceError::Write {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }
        self.put(key, content);
        self.inner.writes.set(self.inner.writes.get() + 1);
        Ok(())
    }
}
