//! Page-lifetime ownership for the running app.
//!
//! The host page usually drops whatever `initXR()` returns, so the module
//! keeps its own handle. Handles are cheap clones of the stored value.

use std::cell::RefCell;
use std::thread::LocalKey;

pub type Slot<T> = LocalKey<RefCell<Option<T>>>;

/// Return the stored handle, building and storing it on first use. A failed
/// build leaves the slot empty so a later call can retry.
pub fn get_or_try_init<T, E>(slot: &'static Slot<T>, init: impl FnOnce() -> Result<T, E>) -> Result<T, E>
where
    T: Clone + 'static,
{
    if let Some(existing) = slot.with(|s| s.borrow().clone()) {
        log::warn!("already initialized; returning the running instance");
        return Ok(existing);
    }
    // No borrow is held while `init` runs; it may call back into the page.
    let value = init()?;
    slot.with(|s| *s.borrow_mut() = Some(value.clone()));
    Ok(value)
}
