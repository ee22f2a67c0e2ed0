//! Best-effort removal of temporary directories at process exit
//!
//! Directories are removed from an `atexit` hook, which runs when the process
//! exits normally (returning from `main` or calling `std::process::exit`).
//! Crashes, signals and forced kills leave them behind, and files still mapped
//! by the dynamic loader may refuse deletion on some systems. Failures are
//! ignored.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::fs;
use std::path::PathBuf;
use std::sync::Once;

static PENDING: Lazy<Mutex<Vec<PathBuf>>> = Lazy::new(|| Mutex::new(Vec::new()));
static HOOK: Once = Once::new();

/// Register a directory for removal when the process exits
pub fn delete_on_exit(path: impl Into<PathBuf>) {
    HOOK.call_once(|| {
        // SAFETY: `remove_pending` is a plain `extern "C" fn` that never unwinds
        let rc = unsafe { libc::atexit(remove_pending) };
        if rc != 0 {
            tracing::warn!("Cannot register exit hook; temporary natives will be left behind");
        }
    });
    PENDING.lock().push(path.into());
}

/// Check whether a directory is registered for removal
#[cfg(test)]
pub(crate) fn is_registered(path: &std::path::Path) -> bool {
    PENDING.lock().iter().any(|p| p == path)
}

extern "C" fn remove_pending() {
    let paths = std::mem::take(&mut *PENDING.lock());
    for path in paths.iter().rev() {
        let _ = fs::remove_dir_all(path);
    }
}
