//! Process-wide analysis options
//!
//! The solver runs single-threaded, so these flags are plain atomics with
//! relaxed ordering. They are set once before the analysis starts.

use std::sync::atomic::{AtomicBool, Ordering};

static COPY_ON_WRITE_DISABLED: AtomicBool = AtomicBool::new(false);

/// Returns true if copy-on-write sharing of property maps is disabled.
pub fn is_copy_on_write_disabled() -> bool {
    COPY_ON_WRITE_DISABLED.load(Ordering::Relaxed)
}

/// Enables or disables copy-on-write sharing of property maps.
///
/// Only consulted by the abstract object copy constructor. Disabling is
/// useful when bisecting sharing bugs; expect a large slowdown.
pub fn set_copy_on_write_disabled(disabled: bool) {
    COPY_ON_WRITE_DISABLED.store(disabled, Ordering::Relaxed);
}

/// Restores all options to their defaults.
pub fn reset() {
    COPY_ON_WRITE_DISABLED.store(false, Ordering::Relaxed);
}
