// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Handles and Ownership Transfer
// ─────────────────────────────────────────────────────────────────────
//! Typed views over caller-owned memory.
//!
//! A foreign caller hands out raw regions sized and aligned from the
//! layout table. Whether a region currently holds a value is tracked by
//! the caller only. Inside the crate a region is seen as either an
//! [`EmptyHandle`] (writable, uninitialised) or an [`OccupiedHandle`]
//! (holds exactly one live `T`), and every state change consumes the old
//! view. Raw pointers are converted at the `extern "C"` edge and nowhere
//! else.

use std::marker::PhantomData;
use std::mem::align_of;
use std::ptr::{self, NonNull};

use crate::registry::value_types;

#[inline]
fn debug_check<T>(ptr: *const T) {
    debug_assert!(!ptr.is_null(), "null handle");
    debug_assert_eq!(
        ptr as usize % align_of::<T>(),
        0,
        "misaligned handle for {}",
        std::any::type_name::<T>()
    );
}

/// Caller memory holding no value.
pub struct EmptyHandle<'a, T> {
    ptr: NonNull<T>,
    _slot: PhantomData<&'a mut T>,
}

/// Caller memory holding one live `T`.
pub struct OccupiedHandle<'a, T> {
    ptr: NonNull<T>,
    _slot: PhantomData<&'a mut T>,
}

impl<'a, T> EmptyHandle<'a, T> {
    /// # Safety
    ///
    /// `ptr` must be non-null, aligned for `T`, valid for writes of
    /// `size_of::<T>()` bytes for `'a`, and must not hold a live value.
    #[inline]
    pub unsafe fn from_raw(ptr: *mut T) -> Self {
        debug_check(ptr);
        Self {
            // SAFETY: non-null per the caller contract.
            ptr: unsafe { NonNull::new_unchecked(ptr) },
            _slot: PhantomData,
        }
    }

    /// Placement-construct `value` into this slot.
    #[inline]
    pub fn construct(self, value: T) -> OccupiedHandle<'a, T> {
        // SAFETY: the slot is writable and empty (see `from_raw`).
        unsafe { self.ptr.as_ptr().write(value) };
        OccupiedHandle {
            ptr: self.ptr,
            _slot: PhantomData,
        }
    }

    pub fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }
}

impl<'a, T> OccupiedHandle<'a, T> {
    /// # Safety
    ///
    /// `ptr` must be non-null, aligned, and hold a live `T` that nothing
    /// else accesses for `'a`.
    #[inline]
    pub unsafe fn from_raw(ptr: *mut T) -> Self {
        debug_check(ptr);
        Self {
            // SAFETY: non-null per the caller contract.
            ptr: unsafe { NonNull::new_unchecked(ptr) },
            _slot: PhantomData,
        }
    }

    #[inline]
    pub fn get(&self) -> &T {
        // SAFETY: occupied and exclusively ours for 'a.
        unsafe { self.ptr.as_ref() }
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        // SAFETY: as in `get`.
        unsafe { self.ptr.as_mut() }
    }

    #[inline]
    pub fn into_mut(self) -> &'a mut T {
        // SAFETY: as in `get`; the view is consumed.
        unsafe { &mut *self.ptr.as_ptr() }
    }

    /// Move the value out, leaving the slot empty.
    #[inline]
    pub fn take(self) -> (T, EmptyHandle<'a, T>) {
        // SAFETY: occupied; the returned empty view forbids a second read.
        let value = unsafe { ptr::read(self.ptr.as_ptr()) };
        (
            value,
            EmptyHandle {
                ptr: self.ptr,
                _slot: PhantomData,
            },
        )
    }

    /// Drop the value in place, leaving the slot empty.
    #[inline]
    pub fn destroy(self) -> EmptyHandle<'a, T> {
        // SAFETY: occupied; the returned empty view forbids a second drop.
        unsafe { ptr::drop_in_place(self.ptr.as_ptr()) };
        EmptyHandle {
            ptr: self.ptr,
            _slot: PhantomData,
        }
    }
}

/// Placement-construct `value` into `dst`.
#[inline]
pub fn construct_into<T>(dst: EmptyHandle<'_, T>, value: T) -> OccupiedHandle<'_, T> {
    dst.construct(value)
}

/// Relocate the value of `src` into `dst`. `src` ends up empty and must
/// not be destroyed again.
#[inline]
pub fn move_extract<'d, T>(
    dst: EmptyHandle<'d, T>,
    src: OccupiedHandle<'_, T>,
) -> OccupiedHandle<'d, T> {
    let (value, _vacated) = src.take();
    dst.construct(value)
}

/// Read-only access to an occupied handle passed by pointer.
///
/// # Safety
///
/// `ptr` must be non-null, aligned, and hold a live `T` that is not
/// mutated for `'a`.
#[inline]
pub unsafe fn borrow<'a, T>(ptr: *const T) -> &'a T {
    debug_check(ptr);
    // SAFETY: per the caller contract.
    unsafe { &*ptr }
}

/// Mutable access to an occupied handle passed by pointer.
///
/// # Safety
///
/// As for [`borrow`], and nothing else may access the value for `'a`.
#[inline]
pub unsafe fn borrow_mut<'a, T>(ptr: *mut T) -> &'a mut T {
    debug_check(ptr);
    // SAFETY: per the caller contract.
    unsafe { &mut *ptr }
}

/// Stamps `decay_<name>_destruct` and `decay_move_<name>` for a
/// transferable type.
macro_rules! transfer_ops {
    ($($name:ident => $ty:ty),+ $(,)?) => {
        paste::paste! {
            $(
                /// Drop the value in place; the handle becomes empty.
                #[no_mangle]
                pub unsafe extern "C" fn [<decay_ $name _destruct>](this: *mut $ty) {
                    // SAFETY: `this` is occupied per the boundary contract.
                    let _vacated = unsafe { $crate::handle::OccupiedHandle::from_raw(this) }.destroy();
                }

                /// Relocate `src` into `dst`; `src` becomes empty.
                #[no_mangle]
                pub unsafe extern "C" fn [<decay_move_ $name>](dst: *mut $ty, src: *mut $ty) {
                    debug_assert!(!std::ptr::eq(dst, src), "move onto itself");
                    // SAFETY: `dst` is empty and `src` occupied per the boundary contract.
                    let (dst, src) = unsafe {
                        (
                            $crate::handle::EmptyHandle::from_raw(dst),
                            $crate::handle::OccupiedHandle::from_raw(src),
                        )
                    };
                    $crate::handle::move_extract(dst, src);
                }
            )+
        }
    };
}

value_types!(transfer_ops);

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::MaybeUninit;
    use std::rc::Rc;

    #[test]
    fn test_construct_then_take() {
        let mut slot = MaybeUninit::<String>::uninit();
        let dst = unsafe { EmptyHandle::from_raw(slot.as_mut_ptr()) };
        let occupied = construct_into(dst, "Cs137".to_string());
        assert_eq!(occupied.get(), "Cs137");
        let (value, _empty) = occupied.take();
        assert_eq!(value, "Cs137");
    }

    #[test]
    fn test_move_extract_keeps_value_and_drops_once() {
        let tracker = Rc::new(());
        let mut a = MaybeUninit::<Rc<()>>::uninit();
        let mut b = MaybeUninit::<Rc<()>>::uninit();
        let src = construct_into(unsafe { EmptyHandle::from_raw(a.as_mut_ptr()) }, tracker.clone());
        assert_eq!(Rc::strong_count(&tracker), 2);

        let dst = move_extract(unsafe { EmptyHandle::from_raw(b.as_mut_ptr()) }, src);
        assert!(Rc::ptr_eq(dst.get(), &tracker));
        assert_eq!(Rc::strong_count(&tracker), 2);

        dst.destroy();
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    fn test_get_mut_writes_through() {
        let mut slot = MaybeUninit::<Vec<u32>>::uninit();
        let mut occupied = construct_into(unsafe { EmptyHandle::from_raw(slot.as_mut_ptr()) }, vec![1]);
        occupied.get_mut().push(2);
        let view = unsafe { borrow(slot.as_ptr()) };
        assert_eq!(view, &vec![1, 2]);
        let _ = unsafe { OccupiedHandle::from_raw(slot.as_mut_ptr()) }.destroy();
    }

    #[test]
    fn test_zero_sized_slot() {
        let mut unit = ();
        let occupied = construct_into(unsafe { EmptyHandle::from_raw(&mut unit as *mut ()) }, ());
        occupied.destroy();
    }
}
