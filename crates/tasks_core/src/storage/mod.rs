//! Durable key-value slot holding the serialized task list.
//!
//! Loading and saving never fail from the caller's point of view: a missing
//! or corrupt slot reads as an empty list, and a rejected write leaves the
//! in-memory list authoritative until the next successful save.

mod json_store;
mod memory;

pub use json_store::{FileSlot, store_dir};
pub use memory::MemorySlot;

use crate::error::PersistenceError;
use crate::model::Task;

pub const DEFAULT_SLOT_KEY: &str = "cute_tasks_v1";

pub trait Slot {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    fn write(&self, key: &str, content: &str) -> Result<(), PersistenceError>;
}

pub struct Persistence {
    slot: Box<dyn Slot>,
    key: String,
}

impl Persistence {
    pub fn new<K: Into<String>>(slot: Box<dyn Slot>, key: K) -> Self {
        Self {
            slot,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn load(&self) -> Vec<Task> {
        let content = match self.slot.read(&self.key) {
            Ok(Some(content)) => content,
            Ok(None) => return Vec::new(),
            Err(err) => {
                log::warn!("task storage not available: {err}");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Task>>(&content) {
            Ok(tasks) => tasks,
            Err(err) => {
                log::warn!("ignoring unreadable task list in slot `{}`: {err}", self.key);
                Vec::new()
            }
        }
    }

    /// Writes the full list. Returns whether the write landed.
    pub fn save(&self, tasks: &[Task]) -> bool {
        let content = match serde_json::to_string(tasks) {
            Ok(content) => content,
            Err(err) => {
                log::warn!("failed to serialize task list: {err}");
                return false;
            }
        };

        match self.slot.write(&self.key, &content) {
            Ok(()) => {
                log::debug!("saved {} task(s) to slot `{}`", tasks.len(), self.key);
                true
            }
            Err(err) => {
                log::warn!("{err}");
                false
            }
        }
    }
}
