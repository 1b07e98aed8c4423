use crate::{
    error::SpawnError,
    thread::{ThreadHandle, DEFAULT_NAME},
};
use std::num::NonZeroUsize;

/// Configuration for spawning a [`ThreadHandle`].
#[derive(Debug, Clone)]
pub struct Builder {
    name: String,
    stack_size: Option<NonZeroUsize>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// A builder for a thread named [`DEFAULT_NAME`] with the platform's
    /// default stack size.
    pub fn new() -> Self {
        Self {
            name: String::from(DEFAULT_NAME),
            stack_size: None,
        }
    }

    /// Logical name of the thread. Only a prefix of it may be visible to OS
    /// tools, depending on the platform's limit.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Stack size in bytes, rounded up to what the platform accepts.
    /// Zero means the platform default.
    pub fn stack_size(&mut self, stack_size: usize) -> &mut Self {
        self.stack_size = NonZeroUsize::new(stack_size);
        self
    }

    /// Spawns a thread running `work` with this configuration.
    ///
    /// Blocks until the new thread has published its id and name, so the
    /// returned handle's identity is already settled. Fails with
    /// [`SpawnError`] if the platform refuses to create the thread.
    pub fn spawn<F>(&self, work: F) -> Result<ThreadHandle, SpawnError>
    where
        F: FnOnce() + Send + 'static,
    {
        ThreadHandle::spawn_inner(
            self.name.clone(),
            self.stack_size.map(NonZeroUsize::get),
            Box::new(work),
        )
    }
}
