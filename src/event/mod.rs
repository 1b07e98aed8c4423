//! One-shot readiness events.
//!
//! An [`Event`] starts out unset. [`Event::wait`] blocks the calling thread
//! until some thread calls [`Event::set`], after which every current and
//! future `wait` returns immediately. Setting before waiting is valid and is
//! never lost.
//!
//! `set` has release semantics and `wait` has acquire semantics: everything
//! written by the setter before `set` is visible to the waiter after `wait`.

#[cfg(any(target_os = "linux", target_os = "android"))]
mod linux;
#[cfg(any(target_os = "linux", target_os = "android"))]
pub(crate) use linux::Event;

#[cfg(any(test, not(any(target_os = "linux", target_os = "android"))))]
mod posix;
#[cfg(all(unix, not(any(target_os = "linux", target_os = "android"))))]
pub(crate) use posix::Event;
