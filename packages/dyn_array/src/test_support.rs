//! Allocator and element types that let unit tests observe storage and element lifecycles.

use std::alloc::Layout;
use std::cell::Cell;
use std::ptr::NonNull;
use std::rc::Rc;

use crate::allocator::sealed::Sealed;
use crate::{BlockAllocator, Global};

/// Delegates to [`Global`] but can be told to refuse allocations, and counts the blocks it has
/// handed out so tests can detect leaks. Clones share the same state.
#[derive(Clone, Debug, Default)]
pub(crate) struct FlakyAllocator {
    state: Rc<FlakyState>,
}

#[derive(Debug, Default)]
struct FlakyState {
    /// `None` means unlimited.
    allocations_remaining: Cell<Option<usize>>,
    allocations: Cell<usize>,
    live_blocks: Cell<usize>,
}

impl FlakyAllocator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Permits `count` more allocations, after which every allocation fails.
    pub(crate) fn fail_after(&self, count: usize) {
        self.state.allocations_remaining.set(Some(count));
    }

    pub(crate) fn fail_now(&self) {
        self.fail_after(0);
    }

    pub(crate) fn recover(&self) {
        self.state.allocations_remaining.set(None);
    }

    /// Total number of successful allocations so far.
    pub(crate) fn allocations(&self) -> usize {
        self.state.allocations.get()
    }

    pub(crate) fn live_blocks(&self) -> usize {
        self.state.live_blocks.get()
    }
}

impl Sealed for FlakyAllocator {}

impl BlockAllocator for FlakyAllocator {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        match self.state.allocations_remaining.get() {
            Some(0) => return None,
            Some(remaining) => self
                .state
                .allocations_remaining
                .set(Some(remaining.checked_sub(1).unwrap())),
            None => {}
        }

        let block = Global.allocate(layout)?;

        self.state
            .allocations
            .set(self.state.allocations.get().checked_add(1).unwrap());
        self.state
            .live_blocks
            .set(self.state.live_blocks.get().checked_add(1).unwrap());

        Some(block)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.state
            .live_blocks
            .set(self.state.live_blocks.get().checked_sub(1).unwrap());

        // SAFETY: Forwarding the caller's guarantee; every block we hand out came from `Global`.
        unsafe {
            Global.deallocate(ptr, layout);
        }
    }
}

/// Counts how many [`Tracked`] values are alive, so tests can assert that every constructed
/// value was destroyed exactly once.
#[derive(Clone, Debug, Default)]
pub(crate) struct LiveCounter {
    live: Rc<Cell<usize>>,
}

impl LiveCounter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn live(&self) -> usize {
        self.live.get()
    }

    pub(crate) fn track(&self, value: u32) -> Tracked {
        self.live.set(self.live.get().checked_add(1).unwrap());

        Tracked {
            value,
            counter: self.clone(),
            panic_on_clone: None,
        }
    }

    /// Creates a value whose `clone()` panics once `clones_left` clones have been made of it.
    pub(crate) fn track_fragile(&self, value: u32, clones_left: usize) -> Tracked {
        let mut tracked = self.track(value);
        tracked.panic_on_clone = Some(Rc::new(Cell::new(clones_left)));
        tracked
    }
}

/// A value that registers itself with a [`LiveCounter`] for its whole lifetime.
#[derive(Debug)]
pub(crate) struct Tracked {
    pub(crate) value: u32,
    counter: LiveCounter,
    panic_on_clone: Option<Rc<Cell<usize>>>,
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        if let Some(clones_left) = &self.panic_on_clone {
            let Some(remaining) = clones_left.get().checked_sub(1) else {
                panic!("clone of fragile value {} refused", self.value);
            };

            clones_left.set(remaining);
        }

        let mut clone = self.counter.track(self.value);
        clone.panic_on_clone.clone_from(&self.panic_on_clone);
        clone
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.counter
            .live
            .set(self.counter.live.get().checked_sub(1).unwrap());
    }
}

/// Returns the plain values of a sequence of tracked values, for order assertions.
pub(crate) fn values<'a>(items: impl IntoIterator<Item = &'a Tracked>) -> Vec<u32> {
    items.into_iter().map(|item| item.value).collect()
}
