use crate::model::{Task, TaskId};
use std::collections::HashSet;

/// Hands out integer ids derived from a millisecond clock.
///
/// Issued ids never collide with an id the allocator has observed, so a
/// deleted task's id is not handed out again while the allocator lives.
/// They strictly increase until an observed id reaches `i64::MAX`.
#[derive(Debug, Default)]
pub struct IdAllocator {
    last_issued: Option<i64>,
    taken: HashSet<TaskId>,
}

impl IdAllocator {
    pub fn seeded(tasks: &[Task]) -> Self {
        let mut allocator = Self::default();
        for task in tasks {
            allocator.observe(&task.id);
        }
        allocator
    }

    pub fn observe(&mut self, id: &TaskId) {
        if let Some(value) = id.as_i64() {
            self.last_issued = Some(self.last_issued.map_or(value, |last| last.max(value)));
        }
        self.taken.insert(id.clone());
    }

    pub fn next(&mut self, now_millis: i64) -> TaskId {
        let upward_start = match self.last_issued {
            Some(last) if last >= now_millis => last.checked_add(1),
            _ => Some(now_millis),
        };
        // Past i64::MAX the order can no longer hold; settle for any free id
        // at or below the clock.
        let value = upward_start
            .and_then(|start| self.first_free(start, |value| value.checked_add(1)))
            .or_else(|| self.first_free(now_millis, |value| value.checked_sub(1)))
            .unwrap_or(now_millis);
        let id = TaskId::from(value);
        self.observe(&id);
        id
    }

    fn first_free(&self, start: i64, step: fn(i64) -> Option<i64>) -> Option<i64> {
        let mut candidate = Some(start);
        while let Some(value) = candidate {
            if !self.taken.contains(&TaskId::from(value)) {
                return Some(value);
            }
            candidate = step(value);
        }
        None
    }
}
