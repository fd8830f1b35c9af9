// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — String Channel
// ─────────────────────────────────────────────────────────────────────
//! Owned strings that can be read as C strings without copying.

use std::ffi::{c_char, CStr};
use std::fmt;

use decay_types::{DecayError, DecayResult};

use crate::handle::{borrow, EmptyHandle};

/// Owned byte string that always keeps one NUL past its content.
///
/// Interior NUL bytes are kept; the C view then ends at the first one,
/// the byte view does not.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DecayString {
    bytes: Vec<u8>,
}

impl DecayString {
    pub fn new() -> Self {
        Self { bytes: vec![0] }
    }

    pub fn from_bytes(content: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(content.len() + 1);
        bytes.extend_from_slice(content);
        bytes.push(0);
        Self { bytes }
    }

    /// Content without the trailing NUL.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() - 1]
    }

    pub fn as_c_ptr(&self) -> *const c_char {
        self.bytes.as_ptr().cast()
    }

    /// C view, up to the first NUL.
    pub fn as_c_str(&self) -> &CStr {
        // The trailing NUL is always present.
        CStr::from_bytes_until_nul(&self.bytes).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.bytes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_str(&self) -> DecayResult<&str> {
        std::str::from_utf8(self.as_bytes())
            .map_err(|e| DecayError::Parse(format!("string is not UTF-8: {e}")))
    }
}

impl Default for DecayString {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for DecayString {
    fn from(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }
}

impl From<String> for DecayString {
    fn from(s: String) -> Self {
        let mut bytes = s.into_bytes();
        bytes.push(0);
        Self { bytes }
    }
}

impl fmt::Debug for DecayString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(self.as_bytes()))
    }
}

impl fmt::Display for DecayString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}

// ─── C ABI ──────────────────────────────────────────────────────────

/// Construct from a NUL-terminated C string.
#[no_mangle]
pub unsafe extern "C" fn decay_string_from_cstr(out: *mut DecayString, cstr: *const c_char) {
    // SAFETY: `cstr` is NUL-terminated and `out` is an empty string handle.
    let content = unsafe { CStr::from_ptr(cstr) };
    unsafe { EmptyHandle::from_raw(out) }.construct(DecayString::from_bytes(content.to_bytes()));
}

/// Construct from `len` bytes at `ptr`. `ptr` is not read when `len` is 0.
#[no_mangle]
pub unsafe extern "C" fn decay_string_from_bytes(out: *mut DecayString, ptr: *const u8, len: usize) {
    let content: &[u8] = if len == 0 {
        &[]
    } else {
        // SAFETY: `ptr` is valid for `len` bytes.
        unsafe { std::slice::from_raw_parts(ptr, len) }
    };
    // SAFETY: `out` is an empty string handle.
    unsafe { EmptyHandle::from_raw(out) }.construct(DecayString::from_bytes(content));
}

/// NUL-terminated view, valid until the string is mutated or destroyed.
#[no_mangle]
pub unsafe extern "C" fn decay_string_cstr(this: *const DecayString) -> *const c_char {
    // SAFETY: `this` is an occupied string handle.
    unsafe { borrow(this) }.as_c_ptr()
}

/// Byte view without the trailing NUL.
#[no_mangle]
pub unsafe extern "C" fn decay_string_bytes(
    this: *const DecayString,
    ptr_out: *mut *const u8,
    len_out: *mut usize,
) {
    // SAFETY: `this` is occupied; both outputs are writable.
    unsafe {
        let s = borrow(this);
        ptr_out.write(s.bytes.as_ptr());
        len_out.write(s.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::{decay_move_string, decay_string_destruct};
    use crate::harness::Slot;

    #[test]
    fn test_trailing_nul_always_present() {
        let s = DecayString::from("Co60");
        assert_eq!(s.as_bytes(), b"Co60");
        assert_eq!(s.as_c_str().to_bytes(), b"Co60");
        assert_eq!(DecayString::new().as_c_str().to_bytes(), b"");
        assert!(DecayString::default().is_empty());
    }

    #[test]
    fn test_interior_nul_splits_views() {
        let s = DecayString::from_bytes(b"Ba\0137m");
        assert_eq!(s.len(), 7);
        assert_eq!(s.as_c_str().to_bytes(), b"Ba");
    }

    #[test]
    fn test_from_cstr_and_views() {
        let mut out = Slot::<DecayString>::new();
        out.fill_with(|p| unsafe { decay_string_from_cstr(p, c"Am241".as_ptr()) });
        let view = unsafe { CStr::from_ptr(decay_string_cstr(out.as_ptr())) };
        assert_eq!(view.to_bytes(), b"Am241");

        let mut ptr = std::ptr::null();
        let mut len = usize::MAX;
        unsafe { decay_string_bytes(out.as_ptr(), &mut ptr, &mut len) };
        assert_eq!(len, 5);
        assert_eq!(unsafe { std::slice::from_raw_parts(ptr, len) }, b"Am241");
        out.destruct_with(decay_string_destruct);
    }

    #[test]
    fn test_from_bytes_zero_len_ignores_pointer() {
        let mut out = Slot::<DecayString>::new();
        out.fill_with(|p| unsafe { decay_string_from_bytes(p, 0x1 as *const u8, 0) });
        assert!(out.get().is_empty());
        assert_eq!(out.get().as_c_str().to_bytes(), b"");
    }

    #[test]
    fn test_move_string() {
        let mut src = Slot::<DecayString>::new();
        let data = b"Na22";
        src.fill_with(|p| unsafe { decay_string_from_bytes(p, data.as_ptr(), data.len()) });
        let mut dst = Slot::<DecayString>::new();
        dst.move_from(&mut src, decay_move_string);
        assert!(!src.is_occupied());
        assert_eq!(dst.get().to_str().unwrap(), "Na22");
    }

    #[test]
    fn test_to_str_rejects_invalid_utf8() {
        assert!(DecayString::from_bytes(&[0xff, 0xfe]).to_str().is_err());
    }
}
