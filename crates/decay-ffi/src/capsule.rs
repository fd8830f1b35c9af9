// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Exception Capsule
// ─────────────────────────────────────────────────────────────────────
//! A captured failure, boxed and type-erased, whose only query is its
//! message.

use std::any::Any;
use std::cell::OnceCell;
use std::error::Error;
use std::ffi::{c_char, CStr, CString};
use std::fmt;

use crate::handle::borrow;

/// Message reported for failures that carry no text of their own.
pub const UNKNOWN_ERROR: &str = "unknown error";

enum Payload {
    Error(Box<dyn Error + Send + Sync>),
    Panic(Box<dyn Any + Send>),
}

struct Captured {
    payload: Payload,
    message: OnceCell<CString>,
}

/// One captured failure. Occupies a single pointer in caller memory.
pub struct ExceptionCapsule(Box<Captured>);

impl ExceptionCapsule {
    fn with_payload(payload: Payload) -> Self {
        Self(Box::new(Captured {
            payload,
            message: OnceCell::new(),
        }))
    }

    pub fn from_error<E: Error + Send + Sync + 'static>(error: E) -> Self {
        Self::from_boxed(Box::new(error))
    }

    pub fn from_boxed(error: Box<dyn Error + Send + Sync>) -> Self {
        Self::with_payload(Payload::Error(error))
    }

    /// Capture a panic payload as returned by `catch_unwind`.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        Self::with_payload(Payload::Panic(payload))
    }

    /// True when the payload has no message of its own.
    pub fn is_opaque(&self) -> bool {
        match &self.0.payload {
            Payload::Error(_) => false,
            Payload::Panic(p) => !(p.is::<&'static str>() || p.is::<String>()),
        }
    }

    fn render(&self) -> String {
        let text = match &self.0.payload {
            Payload::Error(e) => e.to_string(),
            Payload::Panic(p) => p
                .downcast_ref::<&'static str>()
                .map(|s| (*s).to_string())
                .or_else(|| p.downcast_ref::<String>().cloned())
                .unwrap_or_default(),
        };
        if text.is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            text
        }
    }

    /// Rendered once, then cached. Never empty.
    pub fn message(&self) -> &CStr {
        self.0.message.get_or_init(|| {
            let mut bytes = self.render().into_bytes();
            bytes.retain(|&b| b != 0);
            CString::new(bytes).unwrap_or_else(|_| CString::from(c"unknown error"))
        })
    }
}

impl fmt::Debug for ExceptionCapsule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExceptionCapsule")
            .field(&self.message())
            .finish()
    }
}

impl fmt::Display for ExceptionCapsule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message().to_string_lossy())
    }
}

// ─── C ABI ──────────────────────────────────────────────────────────

/// Message of the captured failure, valid until the capsule is destroyed.
#[no_mangle]
pub unsafe extern "C" fn decay_exception_what(this: *const ExceptionCapsule) -> *const c_char {
    // SAFETY: `this` is an occupied capsule handle.
    unsafe { borrow(this) }.message().as_ptr()
}
