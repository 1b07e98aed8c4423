use parking_lot::{Condvar, Mutex};

/// Event for platforms without a futex: a flag guarded by a mutex, with
/// waiters sleeping on a condvar until it flips.
pub(crate) struct Event {
    is_set: Mutex<bool>,
    condvar: Condvar,
}

impl Event {
    pub(crate) fn new() -> Self {
        Self {
            is_set: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }

    pub(crate) fn set(&self) {
        let mut is_set = self.is_set.lock();
        if !*is_set {
            *is_set = true;
            self.condvar.notify_all();
        }
    }

    pub(crate) fn wait(&self) {
        let mut is_set = self.is_set.lock();
        while !*is_set {
            self.condvar.wait(&mut is_set);
        }
    }
}
