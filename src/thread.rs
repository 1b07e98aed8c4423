//! Owned OS threads with a published identity.
//!
//! [`ThreadHandle::spawn`] does not return until the new thread has recorded
//! its numeric id and installed its name in thread-local storage, so both
//! sides agree on the thread's identity from the moment the handle exists.

use crate::{
    builder::Builder,
    error::{JoinError, SpawnError},
    event::Event,
    sys,
};
use parking_lot::Mutex;
use std::{
    cell::RefCell,
    ffi::c_void,
    fmt,
    mem::MaybeUninit,
    ptr,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

/// Name reported by threads which never had one assigned.
pub const DEFAULT_NAME: &str = "UNKNOWN";

type Work = Box<dyn FnOnce() + Send + 'static>;

thread_local! {
    static CURRENT: RefCell<Option<Thread>> = const { RefCell::new(None) };
    static CURRENT_NAME: RefCell<String> = RefCell::new(String::from(DEFAULT_NAME));
}

struct Inner {
    id: AtomicU64,
    name: Mutex<String>,
    work: Mutex<Option<Work>>,
    ready: Event,
}

/// A shared reference to the identity of a thread created by this crate.
///
/// Cloning is cheap and every clone observes renames done through
/// [`Thread::set_current_name`] on the thread it refers to.
#[derive(Clone)]
pub struct Thread {
    inner: Arc<Inner>,
}

impl PartialEq for Thread {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Thread {}

impl fmt::Debug for Thread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thread")
            .field("id", &self.id())
            .field("name", &*self.inner.name.lock())
            .finish()
    }
}

impl Thread {
    fn new(name: String, work: Work) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: AtomicU64::new(0),
                name: Mutex::new(name),
                work: Mutex::new(Some(work)),
                ready: Event::new(),
            }),
        }
    }

    fn into_raw(self) -> *mut c_void {
        Arc::into_raw(self.inner) as *mut c_void
    }

    /// # Safety
    ///
    /// `ptr` must come from [`Thread::into_raw`] and be reclaimed only once.
    unsafe fn from_raw(ptr: *mut c_void) -> Self {
        Self {
            inner: Arc::from_raw(ptr as *const Inner),
        }
    }

    /// The OS id of this thread. Never zero once the owning
    /// [`ThreadHandle`] has been returned.
    pub fn id(&self) -> u64 {
        self.inner.id.load(Ordering::Relaxed)
    }

    /// The logical, untruncated name of this thread.
    pub fn name(&self) -> String {
        self.inner.name.lock().clone()
    }

    /// The OS id of the calling thread, whether or not this crate created it.
    pub fn current_id() -> u64 {
        sys::current_id()
    }

    /// The identity of the calling thread, or `None` if the calling thread
    /// was not spawned through a [`ThreadHandle`].
    ///
    /// Also `None` once the thread-local slots have been torn down.
    pub fn current() -> Option<Thread> {
        CURRENT
            .try_with(|current| current.borrow().clone())
            .ok()
            .flatten()
    }

    /// The calling thread's name, [`DEFAULT_NAME`] if it never got one or
    /// if the thread-local slots have already been torn down.
    pub fn current_name() -> String {
        CURRENT_NAME
            .try_with(|name| name.borrow().clone())
            .unwrap_or_else(|_| String::from(DEFAULT_NAME))
    }

    /// Renames the calling thread.
    ///
    /// When the calling thread belongs to a [`ThreadHandle`] the handle's name
    /// changes as well, and the OS-visible name is updated on a best-effort
    /// basis. Other threads only get their thread-local name changed.
    pub fn set_current_name(name: impl Into<String>) {
        let name = name.into();
        if let Some(thread) = Self::current() {
            *thread.inner.name.lock() = name.clone();
            sys::set_os_name(&name);
        }
        let _ = CURRENT_NAME.try_with(|current| *current.borrow_mut() = name);
    }
}

struct Attributes(libc::pthread_attr_t);

impl Drop for Attributes {
    fn drop(&mut self) {
        let r = unsafe { libc::pthread_attr_destroy(&mut self.0) };
        debug_assert_eq!(r, 0);
    }
}

impl Attributes {
    fn new(stack_size: Option<usize>) -> Result<Self, i32> {
        let mut attr = MaybeUninit::<libc::pthread_attr_t>::uninit();
        match unsafe { libc::pthread_attr_init(attr.as_mut_ptr()) } {
            0 => {}
            code => return Err(code),
        }

        let mut attr = Self(unsafe { attr.assume_init() });
        if let Some(stack_size) = stack_size {
            let stack_size = round_stack_size(stack_size);
            match unsafe { libc::pthread_attr_setstacksize(&mut attr.0, stack_size) } {
                0 => {}
                code => return Err(code),
            }
        }

        Ok(attr)
    }
}

/// Some platforms reject stacks smaller than the minimum or not page aligned.
fn round_stack_size(stack_size: usize) -> usize {
    let stack_size = stack_size.max(libc::PTHREAD_STACK_MIN);
    let page_size = match unsafe { libc::sysconf(libc::_SC_PAGESIZE) } {
        n if n > 0 => n as usize,
        _ => return stack_size,
    };

    match stack_size.checked_add(page_size - 1) {
        Some(size) => size & !(page_size - 1),
        None => stack_size,
    }
}

/// Exclusive owner of a spawned OS thread.
///
/// Dropping the handle without calling [`join`](ThreadHandle::join) detaches
/// the thread: it keeps running and the OS reclaims it once it finishes.
pub struct ThreadHandle {
    native: Option<libc::pthread_t>,
    thread: Thread,
}

// pthread_t is only ever passed back to pthread_join and pthread_detach,
// both of which may be called from any thread.
unsafe impl Send for ThreadHandle {}
unsafe impl Sync for ThreadHandle {}

impl fmt::Debug for ThreadHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadHandle")
            .field("thread", &self.thread)
            .field("joinable", &self.is_joinable())
            .finish()
    }
}

impl Drop for ThreadHandle {
    fn drop(&mut self) {
        if let Some(native) = self.native.take() {
            log::trace!("detaching thread {}", self.thread.id());
            let r = unsafe { libc::pthread_detach(native) };
            debug_assert_eq!(r, 0);
        }
    }
}

impl ThreadHandle {
    /// Spawns a thread named `name` running `work`.
    ///
    /// Returns once the new thread has published its id and name; `work`
    /// itself may or may not have started by then. Use [`Builder`] to
    /// configure more than the name.
    pub fn spawn<F>(work: F, name: impl Into<String>) -> Result<Self, SpawnError>
    where
        F: FnOnce() + Send + 'static,
    {
        Builder::new().name(name).spawn(work)
    }

    pub(crate) fn spawn_inner(
        name: String,
        stack_size: Option<usize>,
        work: Work,
    ) -> Result<Self, SpawnError> {
        let thread = Thread::new(name, work);

        let attr = Attributes::new(stack_size).map_err(|code| spawn_failed(&thread, code))?;
        let arg = thread.clone().into_raw();

        let mut native = MaybeUninit::<libc::pthread_t>::uninit();
        let r = unsafe { libc::pthread_create(native.as_mut_ptr(), &attr.0, trampoline, arg) };
        drop(attr);

        if r != 0 {
            // the trampoline never ran, take back the reference it would own
            drop(unsafe { Thread::from_raw(arg) });
            return Err(spawn_failed(&thread, r));
        }

        let native = unsafe { native.assume_init() };
        thread.inner.ready.wait();
        log::trace!("spawned thread {} ({:?})", thread.id(), thread.name());

        Ok(Self {
            native: Some(native),
            thread,
        })
    }

    /// The identity of the owned thread.
    pub fn thread(&self) -> &Thread {
        &self.thread
    }

    /// Shorthand for `self.thread().id()`.
    pub fn id(&self) -> u64 {
        self.thread.id()
    }

    /// Shorthand for `self.thread().name()`.
    pub fn name(&self) -> String {
        self.thread.name()
    }

    /// Whether the handle is still attached to the OS thread.
    pub fn is_joinable(&self) -> bool {
        self.native.is_some()
    }

    /// Blocks until the owned thread has finished.
    ///
    /// Joining an already joined handle succeeds immediately. On failure the
    /// handle stays attached.
    pub fn join(&mut self) -> Result<(), JoinError> {
        let native = match self.native {
            Some(native) => native,
            None => return Ok(()),
        };

        match unsafe { libc::pthread_join(native, ptr::null_mut()) } {
            0 => {
                log::trace!("joined thread {}", self.thread.id());
                self.native = None;
                Ok(())
            }
            code => {
                let error = JoinError::new(code);
                log::error!("{} (thread {:?})", error, self.thread.name());
                Err(error)
            }
        }
    }
}

fn spawn_failed(thread: &Thread, code: i32) -> SpawnError {
    let error = SpawnError::new(code);
    log::error!("{} (thread {:?})", error, thread.name());
    error
}

extern "C" fn trampoline(arg: *mut c_void) -> *mut c_void {
    let thread = unsafe { Thread::from_raw(arg) };
    CURRENT.with(|current| *current.borrow_mut() = Some(thread.clone()));

    let name = thread.name();
    thread.inner.id.store(sys::current_id(), Ordering::Relaxed);
    sys::set_os_name(&name);
    CURRENT_NAME.with(|current| *current.borrow_mut() = name);

    // Move the work out so whatever it captured is released when it returns
    // rather than when the last Thread reference goes away.
    let work = thread.inner.work.lock().take();

    thread.inner.ready.set();
    drop(thread);

    if let Some(work) = work {
        work();
    }

    ptr::null_mut()
}
