use super::entities::Task;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BacklogError {
    /// Callers check `len()` first; reaching this is a programming error
    #[error("Backlog is empty")]
    Empty,

    #[error("Inconsistent backlog cursors: head {head}, tail {tail}, {items} items")]
    Inconsistent {
        head: usize,
        tail: usize,
        items: usize,
    },
}

/// FIFO of tasks with monotonic cursors.
///
/// Invariant: `head_index <= tail_index == items.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backlog {
    items: Vec<Task>,
    head_index: usize,
    tail_index: usize,
}

impl Backlog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a backlog from persisted parts, rejecting torn cursors
    pub fn restore(
        items: Vec<Task>,
        head_index: usize,
        tail_index: usize,
    ) -> Result<Self, BacklogError> {
        if head_index > tail_index || tail_index != items.len() {
            return Err(BacklogError::Inconsistent {
                head: head_index,
                tail: tail_index,
                items: items.len(),
            });
        }

        Ok(Self {
            items,
            head_index,
            tail_index,
        })
    }

    pub fn enqueue(&mut self, task: Task) {
        self.items.push(task);
        self.tail_index += 1;
    }

    pub fn dequeue(&mut self) -> Result<Task, BacklogError> {
        if self.is_empty() {
            return Err(BacklogError::Empty);
        }

        let task = self.items[self.head_index].clone();
        self.head_index += 1;
        Ok(task)
    }

    pub fn reset(&mut self) {
        self.items.clear();
        self.head_index = 0;
        self.tail_index = 0;
    }

    pub fn len(&self) -> usize {
        self.tail_index - self.head_index
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn head_index(&self) -> usize {
        self.head_index
    }

    pub fn tail_index(&self) -> usize {
        self.tail_index
    }

    /// Every task ever enqueued this run, including dispatched ones
    pub fn items(&self) -> &[Task] {
        &self.items
    }
}
