//! Single owner of the task list and the view state around it.
//!
//! Rendering collaborators read state through the accessors and send user
//! intents through the methods below, then re-derive the visible list and
//! counters. Deleting is a two-step protocol: `request_delete` raises a
//! confirmation that must be answered with `confirm_delete` or
//! `cancel_delete` before anything else may change the list.

use crate::celebrate::should_celebrate;
use crate::codec;
use crate::config::{self, Config};
use crate::error::AppError;
use crate::filter::{Filter, visible_tasks};
use crate::model::{Counts, Task, TaskId};
use crate::storage::{FileSlot, Persistence};
use crate::store::{EditOutcome, TaskStore};

/// Task currently open for editing and the text to restore on cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub id: TaskId,
    pub original_text: String,
}

/// What a committed edit turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Updated(Task),
    /// Blank text: a delete confirmation is now pending for this task.
    DeleteRequested(TaskId),
    NotFound,
}

pub struct Controller {
    store: TaskStore,
    filter: Filter,
    editing: Option<EditSession>,
    pending_delete: Option<TaskId>,
}

impl Controller {
    pub fn new(store: TaskStore) -> Self {
        Self {
            store,
            filter: Filter::All,
            editing: None,
            pending_delete: None,
        }
    }

    /// Loads the list from the file slot described by `config`.
    pub fn open(config: &Config) -> Result<Self, AppError> {
        config::validate(config)?;
        let slot = FileSlot::new(config.store_dir()?);
        let persistence = Persistence::new(Box::new(slot), config.slot_key());
        Ok(Self::new(TaskStore::open(persistence)))
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn visible_tasks(&self) -> Vec<&Task> {
        visible_tasks(self.store.tasks(), self.filter)
    }

    pub fn counts(&self) -> Counts {
        self.store.counts()
    }

    pub fn should_celebrate(&self) -> bool {
        should_celebrate(self.store.tasks())
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    pub fn pending_delete(&self) -> Option<&TaskId> {
        self.pending_delete.as_ref()
    }

    pub fn add(&mut self, text: &str) -> Result<Task, AppError> {
        self.ensure_no_pending_delete()?;
        let task = self.store.add(text)?;
        self.filter = Filter::All;
        Ok(task)
    }

    pub fn toggle_completed(&mut self, id: &TaskId) -> Result<Option<Task>, AppError> {
        self.ensure_no_pending_delete()?;
        Ok(self.store.toggle_completed(id))
    }

    /// Opens an edit session. Returns false for an unknown id.
    pub fn begin_edit(&mut self, id: &TaskId) -> bool {
        match self.store.get(id) {
            Some(task) => {
                self.editing = Some(EditSession {
                    id: task.id.clone(),
                    original_text: task.text.clone(),
                });
                true
            }
            None => false,
        }
    }

    pub fn commit_edit(&mut self, id: &TaskId, text: &str) -> Result<CommitOutcome, AppError> {
        self.ensure_no_pending_delete()?;
        self.close_edit(id);

        if text.trim().is_empty() {
            return Ok(if self.request_delete(id)? {
                CommitOutcome::DeleteRequested(id.clone())
            } else {
                CommitOutcome::NotFound
            });
        }

        // Text is non-blank here, so the store never deletes.
        Ok(match self.store.commit_edit(id, text) {
            EditOutcome::Updated(task) => CommitOutcome::Updated(task),
            EditOutcome::Deleted(_) | EditOutcome::NotFound => CommitOutcome::NotFound,
        })
    }

    /// Abandons an edit. Returns the text to show again, if a session for
    /// `id` was open.
    pub fn cancel_edit(&mut self, id: &TaskId) -> Option<String> {
        self.close_edit(id).map(|session| session.original_text)
    }

    /// Raises a delete confirmation. Returns false for an unknown id.
    /// Asking again for the task already pending is allowed; asking for
    /// another one fails until the pending one is answered.
    pub fn request_delete(&mut self, id: &TaskId) -> Result<bool, AppError> {
        if self.pending_delete.as_ref() != Some(id) {
            self.ensure_no_pending_delete()?;
        }
        if self.store.get(id).is_none() {
            return Ok(false);
        }
        self.pending_delete = Some(id.clone());
        Ok(true)
    }

    /// Deletes the task if a confirmation for it is pending.
    pub fn confirm_delete(&mut self, id: &TaskId) -> Option<Task> {
        if self.pending_delete.as_ref() != Some(id) {
            return None;
        }
        self.pending_delete = None;
        self.store.delete(id)
    }

    pub fn cancel_delete(&mut self, id: &TaskId) -> bool {
        if self.pending_delete.as_ref() == Some(id) {
            self.pending_delete = None;
            true
        } else {
            false
        }
    }

    /// Runs the whole delete protocol with a synchronous confirmation.
    pub fn delete_with_confirmation<F>(
        &mut self,
        id: &TaskId,
        confirm: F,
    ) -> Result<Option<Task>, AppError>
    where
        F: FnOnce(&Task) -> bool,
    {
        self.ensure_no_pending_delete()?;
        let Some(task) = self.store.get(id) else {
            return Ok(None);
        };

        if confirm(task) {
            self.request_delete(id)?;
            Ok(self.confirm_delete(id))
        } else {
            Ok(None)
        }
    }

    pub fn set_filter(&mut self, name: &str) -> Result<Filter, AppError> {
        self.filter = name.parse()?;
        Ok(self.filter)
    }

    pub fn clear_completed(&mut self) -> Result<usize, AppError> {
        self.ensure_no_pending_delete()?;
        Ok(self.store.clear_completed())
    }

    pub fn export_tasks(&self) -> Result<String, AppError> {
        codec::export(self.store.tasks())
    }

    /// Replaces every task with the contents of `document`.
    pub fn import_tasks(&mut self, document: &str) -> Result<usize, AppError> {
        self.ensure_no_pending_delete()?;
        let count = self.store.import_document(document)?;
        self.editing = None;
        Ok(count)
    }

    fn close_edit(&mut self, id: &TaskId) -> Option<EditSession> {
        if self.editing.as_ref().is_some_and(|session| &session.id == id) {
            self.editing.take()
        } else {
            None
        }
    }

    fn ensure_no_pending_delete(&self) -> Result<(), AppError> {
        match &self.pending_delete {
            Some(id) => Err(AppError::ConfirmationPending(id.clone())),
            None => Ok(()),
        }
    }
}
