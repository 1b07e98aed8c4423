//! Thin wrappers over the per-platform thread identity calls.

use std::ffi::CString;

/// Longest OS-visible thread name, in bytes, excluding the trailing NUL.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub(crate) const MAX_OS_NAME_LEN: usize = 15;
#[cfg(any(target_os = "macos", target_os = "ios"))]
pub(crate) const MAX_OS_NAME_LEN: usize = 63;
#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios"
)))]
pub(crate) const MAX_OS_NAME_LEN: usize = 15;

#[cfg(any(target_os = "linux", target_os = "android"))]
pub(crate) fn current_id() -> u64 {
    let tid = unsafe { libc::syscall(libc::SYS_gettid) };
    debug_assert!(tid > 0);
    tid as u64
}

#[cfg(any(target_os = "macos", target_os = "ios"))]
pub(crate) fn current_id() -> u64 {
    let mut tid = 0u64;
    let r = unsafe { libc::pthread_threadid_np(0 as libc::pthread_t, &mut tid) };
    debug_assert_eq!(r, 0);
    tid
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios"
)))]
pub(crate) fn current_id() -> u64 {
    unsafe { libc::pthread_self() as usize as u64 }
}

/// Cut `name` down to at most `max` bytes without splitting a character.
pub(crate) fn truncate(name: &str, max: usize) -> &str {
    if name.len() <= max {
        return name;
    }

    let mut end = max;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

/// Best-effort: names the calling thread for debuggers, `ps` and `top`.
pub(crate) fn set_os_name(name: &str) {
    let name = match CString::new(truncate(name, MAX_OS_NAME_LEN)) {
        Ok(name) => name,
        Err(_) => {
            log::warn!("thread name {:?} contains a NUL byte, not applied to the OS", name);
            return;
        }
    };

    if let Err(code) = apply_os_name(&name) {
        log::warn!("failed to set OS thread name {:?}: errno {}", name, code);
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn apply_os_name(name: &CString) -> Result<(), i32> {
    match unsafe { libc::pthread_setname_np(libc::pthread_self(), name.as_ptr()) } {
        0 => Ok(()),
        code => Err(code),
    }
}

#[cfg(any(target_os = "macos", target_os = "ios"))]
fn apply_os_name(name: &CString) -> Result<(), i32> {
    match unsafe { libc::pthread_setname_np(name.as_ptr()) } {
        0 => Ok(()),
        code => Err(code),
    }
}

#[cfg(any(target_os = "freebsd", target_os = "openbsd"))]
fn apply_os_name(name: &CString) -> Result<(), i32> {
    unsafe { libc::pthread_set_name_np(libc::pthread_self(), name.as_ptr()) };
    Ok(())
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd"
)))]
fn apply_os_name(_name: &CString) -> Result<(), i32> {
    Ok(())
}
