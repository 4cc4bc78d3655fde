//! Snapshot cells for handing end-of-pass copies to other contexts.
//!
//! The scheduler is single-owner. Readers outside the driving loop (another
//! executor, an interrupt handler, a telemetry task) get the task table or
//! statistics through a [`SnapshotCell`] instead of touching live state.
//!
//! A cell stores one `Copy` value together with a publish counter. Both are
//! replaced in one step and copied out in one step, so a reader sees either
//! the previous snapshot or the new one, never a mix.

use core::cell::Cell;

/// Snapshot value and the publish count that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stamped<T> {
    pub value: T,
    /// Number of publishes so far (wrapping); `0` means the initial value
    pub generation: u32,
}

/// Single-writer, many-reader holder of the latest snapshot
pub trait SnapshotCell<T: Copy> {
    /// Replace the held value and bump the generation
    fn publish(&self, value: T);

    /// Copy out the held value with its generation
    fn read(&self) -> Stamped<T>;

    /// Copy out the held value
    fn value(&self) -> T {
        self.read().value
    }

    /// A publish happened since the reader last saw `generation`
    fn is_newer_than(&self, generation: u32) -> bool {
        self.read().generation != generation
    }
}

#[inline]
fn next_stamp<T>(current: Stamped<T>, value: T) -> Stamped<T> {
    Stamped {
        value,
        generation: current.generation.wrapping_add(1),
    }
}

// ============================================================================
// Embassy Implementation
// ============================================================================

#[cfg(feature = "embassy")]
use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};

/// Snapshot cell guarded by a critical section.
///
/// Can live in a `static` and be read from interrupt handlers or other
/// executors.
///
/// ```ignore
/// static TABLE: CriticalSnapshot<[TaskEntry; 3]> = CriticalSnapshot::new([TaskEntry::EMPTY; 3]);
///
/// if sched.run().executed().is_some() {
///     sched.share_log(&TABLE);
/// }
/// ```
#[cfg(feature = "embassy")]
pub struct CriticalSnapshot<T> {
    inner: Mutex<CriticalSectionRawMutex, Cell<Stamped<T>>>,
}

#[cfg(feature = "embassy")]
impl<T: Copy> CriticalSnapshot<T> {
    /// Create a cell holding `initial` at generation 0
    pub const fn new(initial: T) -> Self {
        Self {
            inner: Mutex::new(Cell::new(Stamped {
                value: initial,
                generation: 0,
            })),
        }
    }
}

#[cfg(feature = "embassy")]
impl<T: Copy> SnapshotCell<T> for CriticalSnapshot<T> {
    fn publish(&self, value: T) {
        self.inner.lock(|cell| cell.set(next_stamp(cell.get(), value)));
    }

    fn read(&self) -> Stamped<T> {
        self.inner.lock(Cell::get)
    }
}

// ============================================================================
// Local Implementation (single context, host testing)
// ============================================================================

/// Snapshot cell for readers on the same thread as the scheduler.
///
/// # Example
///
/// ```
/// use coop_sched::core::traits::{LocalSnapshot, SnapshotCell};
///
/// let cell = LocalSnapshot::new(0u32);
/// cell.publish(7);
/// assert_eq!(cell.value(), 7);
/// assert_eq!(cell.read().generation, 1);
/// ```
#[derive(Debug)]
pub struct LocalSnapshot<T: Copy> {
    inner: Cell<Stamped<T>>,
}

impl<T: Copy> LocalSnapshot<T> {
    /// Create a cell holding `initial` at generation 0
    pub const fn new(initial: T) -> Self {
        Self {
            inner: Cell::new(Stamped {
                value: initial,
                generation: 0,
            }),
        }
    }
}

impl<T: Copy> SnapshotCell<T> for LocalSnapshot<T> {
    fn publish(&self, value: T) {
        self.inner.set(next_stamp(self.inner.get(), value));
    }

    fn read(&self) -> Stamped<T> {
        self.inner.get()
    }
}
