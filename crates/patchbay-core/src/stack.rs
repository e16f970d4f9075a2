//! Build-phase construction stack.
//!
//! The stack threads "the most recently produced signal" from one node
//! construction to the next, the way a postfix expression threads operands.
//! It only stores [`BufferId`]s; hold counting is done by the owning
//! [`Patch`](crate::Patch), which keeps the stack and the buffer pool in step.

use crate::buffer::BufferId;
use crate::error::PatchError;

/// Fixed-depth LIFO of buffer references.
#[derive(Debug)]
pub(crate) struct Stack {
    entries: Vec<BufferId>,
    capacity: usize,
}

impl Stack {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn top(&self) -> Option<BufferId> {
        self.entries.last().copied()
    }

    pub(crate) fn entries(&self) -> &[BufferId] {
        &self.entries
    }

    /// Fails unless `extra` more entries fit.
    pub(crate) fn ensure_room(&self, extra: usize) -> Result<(), PatchError> {
        if self.entries.len() + extra > self.capacity {
            return Err(PatchError::StackOverflow {
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Fails unless at least `needed` entries are present.
    pub(crate) fn ensure_depth(&self, needed: usize) -> Result<(), PatchError> {
        if self.entries.len() < needed {
            return Err(PatchError::StackUnderflow {
                needed,
                depth: self.entries.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn push(&mut self, id: BufferId) -> Result<(), PatchError> {
        self.ensure_room(1)?;
        self.entries.push(id);
        Ok(())
    }

    pub(crate) fn pop(&mut self) -> Result<BufferId, PatchError> {
        self.entries.pop().ok_or(PatchError::StackUnderflow {
            needed: 1,
            depth: 0,
        })
    }
}
