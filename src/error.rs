use std::io;
use thiserror::Error;

/// The OS refused to create a new thread.
///
/// No thread exists when this is returned and the unit of work has been
/// released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("failed to spawn thread: {}", os_error(.code))]
pub struct SpawnError {
    code: i32,
}

impl SpawnError {
    pub(crate) const fn new(code: i32) -> Self {
        Self { code }
    }

    /// The raw error code reported by the platform.
    pub const fn code(&self) -> i32 {
        self.code
    }
}

impl From<SpawnError> for io::Error {
    fn from(error: SpawnError) -> Self {
        io::Error::from_raw_os_error(error.code)
    }
}

/// Waiting on a thread failed.
///
/// The handle is still attached to the thread afterwards, so the join can be
/// retried or the handle dropped to detach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("failed to join thread: {}", os_error(.code))]
pub struct JoinError {
    code: i32,
}

impl JoinError {
    pub(crate) const fn new(code: i32) -> Self {
        Self { code }
    }

    /// The raw error code reported by the platform.
    pub const fn code(&self) -> i32 {
        self.code
    }
}

impl From<JoinError> for io::Error {
    fn from(error: JoinError) -> Self {
        io::Error::from_raw_os_error(error.code)
    }
}

fn os_error(code: &i32) -> io::Error {
    io::Error::from_raw_os_error(*code)
}
