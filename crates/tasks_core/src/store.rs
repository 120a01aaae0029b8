use crate::clock::{Clock, SystemClock};
use crate::codec;
use crate::error::{AppError, ImportError};
use crate::ids::IdAllocator;
use crate::model::{Counts, Task, TaskId};
use crate::storage::Persistence;

/// Result of committing an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Updated(Task),
    /// The committed text was blank, so the task was removed.
    Deleted(Task),
    NotFound,
}

/// Ordered task list. Every mutation writes the full list back to the slot.
pub struct TaskStore {
    tasks: Vec<Task>,
    persistence: Persistence,
    ids: IdAllocator,
    clock: Box<dyn Clock>,
}

impl TaskStore {
    pub fn open(persistence: Persistence) -> Self {
        Self::open_with_clock(persistence, Box::new(SystemClock))
    }

    pub fn open_with_clock(persistence: Persistence, clock: Box<dyn Clock>) -> Self {
        let tasks = persistence.load();
        let ids = IdAllocator::seeded(&tasks);
        log::debug!(
            "loaded {} task(s) from slot `{}`",
            tasks.len(),
            persistence.key()
        );
        Self {
            tasks,
            persistence,
            ids,
            clock,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn counts(&self) -> Counts {
        Counts::of(&self.tasks)
    }

    pub fn add(&mut self, raw_text: &str) -> Result<Task, AppError> {
        let text = raw_text.trim();
        if text.is_empty() {
            return Err(AppError::EmptyText);
        }

        let id = self.ids.next(self.clock.now_millis());
        let task = Task {
            id,
            text: text.to_string(),
            completed: false,
            created_at: self.clock.timestamp(),
        };

        self.tasks.push(task.clone());
        self.persist();
        log::debug!("added task {}", task.id);

        Ok(task)
    }

    pub fn toggle_completed(&mut self, id: &TaskId) -> Option<Task> {
        let task = self.tasks.iter_mut().find(|task| &task.id == id)?;
        task.completed = !task.completed;
        let updated = task.clone();
        self.persist();
        Some(updated)
    }

    /// Blank text removes the task; otherwise the text is replaced and the
    /// task reopened.
    pub fn commit_edit(&mut self, id: &TaskId, new_text: &str) -> EditOutcome {
        let text = new_text.trim();
        if text.is_empty() {
            return match self.delete(id) {
                Some(removed) => EditOutcome::Deleted(removed),
                None => EditOutcome::NotFound,
            };
        }

        let Some(task) = self.tasks.iter_mut().find(|task| &task.id == id) else {
            return EditOutcome::NotFound;
        };
        task.text = text.to_string();
        task.completed = false;
        let updated = task.clone();
        self.persist();

        EditOutcome::Updated(updated)
    }

    /// Removes a task. Callers are expected to have confirmed with the user.
    pub fn delete(&mut self, id: &TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|task| &task.id == id)?;
        let removed = self.tasks.remove(index);
        self.persist();
        log::debug!("deleted task {}", removed.id);
        Some(removed)
    }

    /// Returns how many tasks were removed. Nothing is written when none were.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        let removed = before - self.tasks.len();
        if removed > 0 {
            self.persist();
        }
        removed
    }

    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        for task in &tasks {
            self.ids.observe(&task.id);
        }
        self.tasks = tasks;
        self.persist();
    }

    /// Replaces the list with a normalized import of `document`. The list
    /// is untouched when the document is rejected.
    pub fn import_document(&mut self, document: &str) -> Result<usize, ImportError> {
        let imported = codec::import(document, &mut self.ids, self.clock.as_ref())?;
        let count = imported.len();
        self.replace_all(imported);
        log::debug!("imported {count} task(s)");
        Ok(count)
    }

    fn persist(&self) {
        self.persistence.save(&self.tasks);
    }
}
