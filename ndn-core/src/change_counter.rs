//! Change tracking for owned sub-objects and cached encodings.
//!
//! Every mutation takes a fresh stamp from one process-wide sequence, so two
//! objects report the same change count only if one is an unmodified copy
//! of the other. An owner remembers the count of each child it holds and
//! treats any difference as a change of its own.

use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::blob::SignedBlob;

static LAST_CHANGE: AtomicU64 = AtomicU64::new(0);

/// A stamp no object has reported before.
pub(crate) fn next_change_count() -> u64 {
    LAST_CHANGE.fetch_add(1, Ordering::Relaxed) + 1
}

pub(crate) trait ChangeCount {
    fn change_count(&self) -> u64;
}

/// A child object plus the change count its owner last saw.
#[derive(Debug, Clone)]
pub(crate) struct ChangeCounter<T> {
    target: T,
    change_count: Cell<u64>,
}

impl<T: ChangeCount> ChangeCounter<T> {
    pub fn new(target: T) -> Self {
        let change_count = Cell::new(target.change_count());
        Self {
            target,
            change_count,
        }
    }

    pub fn get(&self) -> &T {
        &self.target
    }

    /// Edits through the returned reference are picked up by the next
    /// [`check_changed`](Self::check_changed).
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Replace the target. The old recorded count is kept, so the
    /// replacement reads as a change unless it is an unmodified copy.
    pub fn set(&mut self, target: T) {
        self.target = target;
    }

    /// Whether the target changed since the last check.
    pub fn check_changed(&self) -> bool {
        let current = self.target.change_count();
        if current == self.change_count.get() {
            return false;
        }
        self.change_count.set(current);
        true
    }
}

impl<T: ChangeCount + Default> Default for ChangeCounter<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// A packet's encoding in the default wire format, valid while the packet's
/// change count still equals the one recorded with it.
#[derive(Debug, Clone, Default)]
pub(crate) struct EncodingCache(RefCell<Option<(SignedBlob, u64)>>);

impl EncodingCache {
    pub fn get(&self, change_count: u64) -> Option<SignedBlob> {
        match &*self.0.borrow() {
            Some((encoding, recorded)) if *recorded == change_count => Some(encoding.clone()),
            _ => None,
        }
    }

    pub fn set(&self, encoding: SignedBlob, change_count: u64) {
        *self.0.borrow_mut() = Some((encoding, change_count));
    }
}
