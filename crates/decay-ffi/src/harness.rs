// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Caller-Discipline Test Harness
// ─────────────────────────────────────────────────────────────────────
//! Plays the foreign caller in tests: owns raw slots and tracks whether
//! each one is occupied, panicking on any protocol violation (writing
//! into an occupied slot, reading or destroying an empty one).

use std::mem::MaybeUninit;

use crate::capsule::ExceptionCapsule;

/// Caller-owned storage for one `T`.
pub struct Slot<T> {
    storage: Box<MaybeUninit<T>>,
    occupied: bool,
}

impl<T> Slot<T> {
    pub fn new() -> Self {
        Self {
            storage: Box::new(MaybeUninit::uninit()),
            occupied: false,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// Hand the empty slot to `f`, which must construct into it.
    pub fn fill_with(&mut self, f: impl FnOnce(*mut T)) {
        assert!(!self.occupied, "constructing into an occupied slot");
        f(self.storage.as_mut_ptr());
        self.occupied = true;
    }

    pub fn as_ptr(&self) -> *const T {
        assert!(self.occupied, "reading an empty slot");
        self.storage.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut T {
        assert!(self.occupied, "mutating an empty slot");
        self.storage.as_mut_ptr()
    }

    pub fn get(&self) -> &T {
        assert!(self.occupied, "reading an empty slot");
        // SAFETY: occupied.
        unsafe { self.storage.assume_init_ref() }
    }

    pub fn destruct_with(&mut self, destruct: unsafe extern "C" fn(*mut T)) {
        let ptr = self.as_mut_ptr();
        // SAFETY: occupied; marked empty right after.
        unsafe { destruct(ptr) };
        self.occupied = false;
    }

    /// Move `src` into this empty slot; `src` becomes empty.
    pub fn move_from(&mut self, src: &mut Slot<T>, mover: unsafe extern "C" fn(*mut T, *mut T)) {
        assert!(!self.occupied, "moving into an occupied slot");
        let from = src.as_mut_ptr();
        // SAFETY: `self` empty, `src` occupied, distinct boxes.
        unsafe { mover(self.storage.as_mut_ptr(), from) };
        src.occupied = false;
        self.occupied = true;
    }

    /// Hand the slot to code that consumes its value (e.g. a vector push);
    /// the slot is empty afterwards.
    pub fn surrender(&mut self, f: impl FnOnce(*mut T)) {
        let ptr = self.as_mut_ptr();
        f(ptr);
        self.occupied = false;
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Slot<T> {
    fn drop(&mut self) {
        if self.occupied {
            // SAFETY: occupied exactly once.
            unsafe { self.storage.assume_init_drop() };
        }
    }
}

/// Call a fallible boundary function and check the envelope rule: exactly
/// one of `out` and `err` gets filled, as the status says.
pub fn call_fallible<T>(
    out: &mut Slot<T>,
    err: &mut Slot<ExceptionCapsule>,
    f: impl FnOnce(*mut T, *mut ExceptionCapsule) -> bool,
) -> bool {
    assert!(!out.occupied && !err.occupied, "envelope slots must start empty");
    let ok = f(out.storage.as_mut_ptr(), err.storage.as_mut_ptr());
    if ok {
        out.occupied = true;
    } else {
        err.occupied = true;
        assert!(
            !err.get().message().to_bytes().is_empty(),
            "capsule message must not be empty"
        );
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "reading an empty slot")]
    fn test_empty_read_is_caught() {
        let slot = Slot::<u32>::new();
        let _ = slot.get();
    }

    #[test]
    #[should_panic(expected = "constructing into an occupied slot")]
    fn test_double_construct_is_caught() {
        let mut slot = Slot::<u32>::new();
        slot.fill_with(|p| unsafe { p.write(1) });
        slot.fill_with(|p| unsafe { p.write(2) });
    }
}
