// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Result Envelope
// ─────────────────────────────────────────────────────────────────────
//! Status / output slot / error slot.
//!
//! A fallible operation returns `true` and fills the output slot, or
//! returns `false` and fills the error slot with an [`ExceptionCapsule`].
//! Exactly one of the two slots is written. Panics are captured the same
//! way as returned errors. A direct operation has no error slot, so a
//! panic there is logged and the process aborts before it can unwind into
//! foreign frames.

use std::error::Error;
use std::panic::{self, AssertUnwindSafe};

use crate::capsule::ExceptionCapsule;
use crate::handle::EmptyHandle;

fn capture(error: EmptyHandle<'_, ExceptionCapsule>, capsule: ExceptionCapsule) {
    log::debug!("captured failure: {capsule}");
    error.construct(capsule);
}

/// Run `op` and route its outcome into `out` or `error`.
pub fn fallible<T, E, F>(
    out: EmptyHandle<'_, T>,
    error: EmptyHandle<'_, ExceptionCapsule>,
    op: F,
) -> bool
where
    F: FnOnce() -> Result<T, E>,
    E: Into<Box<dyn Error + Send + Sync>>,
{
    match panic::catch_unwind(AssertUnwindSafe(op)) {
        Ok(Ok(value)) => {
            out.construct(value);
            true
        }
        Ok(Err(e)) => {
            capture(error, ExceptionCapsule::from_boxed(e.into()));
            false
        }
        Err(payload) => {
            capture(error, ExceptionCapsule::from_panic(payload));
            false
        }
    }
}

fn run_direct<T, F>(op: F) -> Result<T, ExceptionCapsule>
where
    F: FnOnce() -> T,
{
    panic::catch_unwind(AssertUnwindSafe(op)).map_err(ExceptionCapsule::from_panic)
}

/// Non-fallible counterpart: construct `op()` into `out`. Aborts on panic.
pub fn direct<T, F>(out: EmptyHandle<'_, T>, op: F)
where
    F: FnOnce() -> T,
{
    match run_direct(op) {
        Ok(value) => {
            out.construct(value);
        }
        Err(capsule) => {
            log::error!("panic in direct operation, aborting: {capsule}");
            std::process::abort();
        }
    }
}

/// [`fallible`] over raw slots.
///
/// # Safety
///
/// `out` and `error` must be distinct empty handles for `T` and
/// `ExceptionCapsule`.
pub unsafe fn fallible_raw<T, E, F>(out: *mut T, error: *mut ExceptionCapsule, op: F) -> bool
where
    F: FnOnce() -> Result<T, E>,
    E: Into<Box<dyn Error + Send + Sync>>,
{
    // SAFETY: per the caller contract.
    let (out, error) = unsafe { (EmptyHandle::from_raw(out), EmptyHandle::from_raw(error)) };
    fallible(out, error, op)
}

/// [`direct`] over a raw slot.
///
/// # Safety
///
/// `out` must be an empty handle for `T`.
pub unsafe fn direct_raw<T, F>(out: *mut T, op: F)
where
    F: FnOnce() -> T,
{
    // SAFETY: per the caller contract.
    direct(unsafe { EmptyHandle::from_raw(out) }, op);
}
