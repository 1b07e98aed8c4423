//! Named OS threads with a startup handshake.
//!
//! A [`ThreadHandle`] owns a POSIX thread. Spawning blocks until the new
//! thread has stored its OS id and installed its name in thread-local
//! storage, so by the time the caller gets the handle back both
//! [`ThreadHandle::id`] and, inside the thread, [`Thread::current_name`]
//! are settled.
//!
//! ```
//! use yaar_thread::{Thread, ThreadHandle};
//!
//! let mut handle = ThreadHandle::spawn(
//!     || assert_eq!(Thread::current_name(), "worker-1"),
//!     "worker-1",
//! )
//! .unwrap();
//!
//! assert_ne!(handle.id(), 0);
//! handle.join().unwrap();
//! ```

#![warn(rust_2018_idioms)]

#[cfg(not(unix))]
compile_error!("yaar-thread only supports unix platforms");

mod builder;
mod error;
mod event;
mod sys;
mod thread;

pub use builder::Builder;
pub use error::{JoinError, SpawnError};
pub use thread::{Thread, ThreadHandle, DEFAULT_NAME};
