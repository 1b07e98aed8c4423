use std::{
    io,
    sync::atomic::{AtomicI32, Ordering},
};

const UNSET: i32 = 0;
const WAIT: i32 = 1;
const SET: i32 = 2;

pub(crate) struct Event {
    state: AtomicI32,
}

impl Event {
    pub(crate) const fn new() -> Self {
        Self {
            state: AtomicI32::new(UNSET),
        }
    }

    pub(crate) fn set(&self) {
        // Only issue a FUTEX_WAKE if someone announced they're waiting.
        if self.state.swap(SET, Ordering::Release) == WAIT {
            let ptr = &self.state as *const AtomicI32 as *const i32;
            let r = unsafe {
                libc::syscall(
                    libc::SYS_futex,
                    ptr,
                    libc::FUTEX_WAKE | libc::FUTEX_PRIVATE_FLAG,
                    i32::MAX,
                )
            };
            debug_assert!(r >= 0);
        }
    }

    pub(crate) fn wait(&self) {
        // try to set the state to WAIT for the setter, exit if already set.
        let mut state = self.state.load(Ordering::Acquire);
        loop {
            match state {
                SET => return,
                WAIT => break,
                _ => match self.state.compare_exchange_weak(
                    UNSET,
                    WAIT,
                    Ordering::Acquire,
                    Ordering::Acquire,
                ) {
                    Ok(_) => break,
                    Err(s) => state = s,
                },
            }
        }

        while self.state.load(Ordering::Acquire) != SET {
            let ptr = &self.state as *const AtomicI32 as *const i32;
            let r = unsafe {
                libc::syscall(
                    libc::SYS_futex,
                    ptr,
                    libc::FUTEX_WAIT | libc::FUTEX_PRIVATE_FLAG,
                    WAIT,
                    std::ptr::null::<libc::timespec>(),
                )
            };
            if r == -1 {
                let errno = io::Error::last_os_error().raw_os_error();
                debug_assert!(errno == Some(libc::EAGAIN) || errno == Some(libc::EINTR));
            }
        }
    }
}
