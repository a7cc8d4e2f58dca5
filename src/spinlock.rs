// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
A reader/writer spinlock guarding the global context slot.

Enablement checks run on every log statement, so shared reads must be cheap
and must not serialize against each other.  Critical sections under this
lock are a handful of loads and Arc clones; holding it across I/O is a bug.
*/

use std::cell::UnsafeCell;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};

const UNLOCKED: usize = 0;
// all bits set marks an exclusive writer; any smaller value is a reader count
const LOCKED_WRITE: usize = usize::MAX;

pub(crate) struct Spinlock<T> {
    data: UnsafeCell<T>,
    locked: AtomicUsize,
}

unsafe impl<T: Send> Send for Spinlock<T> {}
unsafe impl<T: Send> Sync for Spinlock<T> {}

impl<T> Spinlock<T> {
    pub(crate) const fn new(data: T) -> Self {
        Spinlock {
            data: UnsafeCell::new(data),
            locked: AtomicUsize::new(UNLOCKED),
        }
    }

    fn spin_lock_write(&self) {
        while self
            .locked
            .compare_exchange_weak(UNLOCKED, LOCKED_WRITE, Acquire, Relaxed)
            .is_err()
        {
            std::hint::spin_loop();
        }
    }

    fn spin_unlock_write(&self) {
        self.locked.store(UNLOCKED, Release);
    }

    fn spin_lock_read(&self) {
        while self
            .locked
            .fetch_update(Acquire, Relaxed, |count| {
                if count < LOCKED_WRITE - 1 {
                    Some(count + 1)
                } else {
                    None
                }
            })
            .is_err()
        {
            std::hint::spin_loop();
        }
    }

    fn spin_unlock_read(&self) {
        self.locked.fetch_sub(1, Release);
    }

    /// Runs `f` with exclusive access to the data.
    pub(crate) fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        self.spin_lock_write();

        // SAFETY: the write lock is held, so access is exclusive.
        let result = unsafe { f(&mut *self.data.get()) };

        self.spin_unlock_write();
        result
    }

    /// Runs `f` with shared access to the data.
    pub(crate) fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.spin_lock_read();

        // SAFETY: a read lock is held, so no writer can be active.
        let result = unsafe { f(&*self.data.get()) };

        self.spin_unlock_read();
        result
    }
}
