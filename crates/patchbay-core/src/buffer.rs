//! Reference-counted buffer pool for signal fan-out.
//!
//! A buffer is a pooled slot that mirrors one producer cable. Buffers are what
//! the construction stack carries: a node pushes its output as a fresh buffer,
//! and later consumers resolve the buffer back to the producing cable.
//!
//! Each slot counts its holds. The stack holds one reference per entry, and
//! [`Patch::hold`](crate::Patch::hold) gives the caller a long-lived one. When
//! the count reaches zero the slot returns to the free list and its
//! generation advances, so any [`BufferId`] still referring to the old
//! generation is rejected with [`PatchError::BufferUseAfterRelease`] instead
//! of silently aliasing the slot's next occupant.

use core::fmt;

use crate::cable::CableId;
use crate::error::{PatchError, Resource};

/// Ownership token for a pooled buffer: slot index plus generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BufferId {
    slot: u32,
    generation: u32,
}

impl BufferId {
    /// Returns the pool slot index.
    #[inline]
    pub fn slot(self) -> u32 {
        self.slot
    }

    /// Returns the slot generation this id was issued for.
    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buf[{}]@{}", self.slot, self.generation)
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    holds: u32,
    generation: u32,
    source: Option<CableId>,
    live: bool,
}

/// Fixed-capacity pool of buffer slots.
#[derive(Debug)]
pub(crate) struct BufferPool {
    slots: Vec<Slot>,
    /// Free slot indices; the next allocation takes the last entry.
    free: Vec<u32>,
}

impl BufferPool {
    /// Creates a pool with `capacity` free slots.
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Slot::default(); capacity],
            free: (0..capacity as u32).rev().collect(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Takes a free slot. The new buffer is unbound and has no holds yet.
    pub(crate) fn alloc(&mut self) -> Result<BufferId, PatchError> {
        let slot = self.free.pop().ok_or(PatchError::AllocationExhausted {
            resource: Resource::Buffers,
            capacity: self.slots.len(),
        })?;
        let entry = &mut self.slots[slot as usize];
        entry.live = true;
        entry.holds = 0;
        entry.source = None;
        Ok(BufferId {
            slot,
            generation: entry.generation,
        })
    }

    fn slot(&self, id: BufferId) -> Result<&Slot, PatchError> {
        match self.slots.get(id.slot as usize) {
            Some(slot) if slot.live && slot.generation == id.generation => Ok(slot),
            _ => Err(PatchError::BufferUseAfterRelease(id)),
        }
    }

    fn slot_mut(&mut self, id: BufferId) -> Result<&mut Slot, PatchError> {
        match self.slots.get_mut(id.slot as usize) {
            Some(slot) if slot.live && slot.generation == id.generation => Ok(slot),
            _ => Err(PatchError::BufferUseAfterRelease(id)),
        }
    }

    /// Fails unless `id` refers to a live buffer.
    pub(crate) fn check(&self, id: BufferId) -> Result<(), PatchError> {
        self.slot(id).map(|_| ())
    }

    pub(crate) fn holds(&self, id: BufferId) -> Result<u32, PatchError> {
        self.slot(id).map(|s| s.holds)
    }

    pub(crate) fn retain(&mut self, id: BufferId) -> Result<(), PatchError> {
        let slot = self.slot_mut(id)?;
        slot.holds += 1;
        Ok(())
    }

    /// Drops one hold. Returns true if the buffer went back to the pool.
    pub(crate) fn release(&mut self, id: BufferId) -> Result<bool, PatchError> {
        let slot = self.slot_mut(id)?;
        if slot.holds == 0 {
            return Err(PatchError::BufferUseAfterRelease(id));
        }
        slot.holds -= 1;
        if slot.holds > 0 {
            return Ok(false);
        }
        slot.live = false;
        slot.source = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.slot);
        Ok(true)
    }

    pub(crate) fn bind(&mut self, id: BufferId, source: CableId) -> Result<(), PatchError> {
        self.slot_mut(id)?.source = Some(source);
        Ok(())
    }

    /// Returns the cable a held buffer mirrors.
    pub(crate) fn source(&self, id: BufferId) -> Result<CableId, PatchError> {
        let slot = self.slot(id)?;
        if slot.holds == 0 {
            return Err(PatchError::BufferUseAfterRelease(id));
        }
        slot.source.ok_or(PatchError::UnboundBuffer(id))
    }
}
