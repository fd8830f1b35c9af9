// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Generic Vector ABI
// ─────────────────────────────────────────────────────────────────────
//! Nine operations over `Vec<T>` plus a whole-vector move, written once
//! and stamped out per element type by `vec_abi!`.

use std::marker::PhantomData;

use crate::handle::{EmptyHandle, OccupiedHandle};
use crate::registry::vector_element_types;

/// Vector operations for element type `T`.
pub struct VecAbi<T>(PhantomData<T>);

impl<T: Clone> VecAbi<T> {
    pub fn new(out: EmptyHandle<'_, Vec<T>>) -> OccupiedHandle<'_, Vec<T>> {
        out.construct(Vec::new())
    }

    /// Room for at least `capacity` elements in total.
    pub fn reserve(this: &mut Vec<T>, capacity: usize) {
        this.reserve(capacity.saturating_sub(this.len()));
    }

    /// Move-append `item`; its handle is returned empty.
    pub fn push<'i>(this: &mut Vec<T>, item: OccupiedHandle<'i, T>) -> EmptyHandle<'i, T> {
        let (value, vacated) = item.take();
        this.push(value);
        vacated
    }

    /// Copy `data` into a new vector. The source buffer stays the caller's.
    pub fn from_data<'o>(data: &[T], out: EmptyHandle<'o, Vec<T>>) -> OccupiedHandle<'o, Vec<T>> {
        out.construct(data.to_vec())
    }

    pub fn size(this: &[T]) -> usize {
        this.len()
    }

    pub fn empty(this: &[T]) -> bool {
        this.is_empty()
    }

    pub fn ptr(this: &[T]) -> *const T {
        this.as_ptr()
    }

    pub fn ptr_mut(this: &mut [T]) -> *mut T {
        this.as_mut_ptr()
    }

    pub fn destruct(this: OccupiedHandle<'_, Vec<T>>) {
        this.destroy();
    }
}

macro_rules! vec_abi {
    ($($name:ident => $ty:ty),+ $(,)?) => {
        paste::paste! {
            $(
                #[no_mangle]
                pub unsafe extern "C" fn [<decay_vec_ $name _new>](out: *mut Vec<$ty>) {
                    // SAFETY: `out` is an empty vector handle.
                    VecAbi::<$ty>::new(unsafe { EmptyHandle::from_raw(out) });
                }

                #[no_mangle]
                pub unsafe extern "C" fn [<decay_vec_ $name _reserve>](this: *mut Vec<$ty>, capacity: usize) {
                    // SAFETY: `this` is an occupied vector handle.
                    VecAbi::<$ty>::reserve(unsafe { $crate::handle::borrow_mut::<Vec<$ty>>(this) }, capacity);
                }

                #[no_mangle]
                pub unsafe extern "C" fn [<decay_vec_ $name _push>](this: *mut Vec<$ty>, item: *mut $ty) {
                    // SAFETY: both handles are occupied and distinct.
                    let (this, item) = unsafe {
                        ($crate::handle::borrow_mut::<Vec<$ty>>(this), OccupiedHandle::from_raw(item))
                    };
                    VecAbi::<$ty>::push(this, item);
                }

                /// `data` is not read when `len` is 0.
                #[no_mangle]
                pub unsafe extern "C" fn [<decay_vec_ $name _from_data>](
                    data: *const $ty,
                    len: usize,
                    out: *mut Vec<$ty>,
                ) {
                    let data: &[$ty] = if len == 0 {
                        &[]
                    } else {
                        // SAFETY: `data` holds `len` initialised elements.
                        unsafe { std::slice::from_raw_parts(data, len) }
                    };
                    // SAFETY: `out` is an empty vector handle.
                    VecAbi::<$ty>::from_data(data, unsafe { EmptyHandle::from_raw(out) });
                }

                #[no_mangle]
                pub unsafe extern "C" fn [<decay_vec_ $name _size>](this: *const Vec<$ty>) -> usize {
                    // SAFETY: `this` is an occupied vector handle.
                    VecAbi::<$ty>::size(unsafe { $crate::handle::borrow::<Vec<$ty>>(this) })
                }

                #[no_mangle]
                pub unsafe extern "C" fn [<decay_vec_ $name _empty>](this: *const Vec<$ty>) -> bool {
                    // SAFETY: `this` is an occupied vector handle.
                    VecAbi::<$ty>::empty(unsafe { $crate::handle::borrow::<Vec<$ty>>(this) })
                }

                /// Valid for `size` elements until the next mutation.
                #[no_mangle]
                pub unsafe extern "C" fn [<decay_vec_ $name _ptr>](this: *const Vec<$ty>) -> *const $ty {
                    // SAFETY: `this` is an occupied vector handle.
                    VecAbi::<$ty>::ptr(unsafe { $crate::handle::borrow::<Vec<$ty>>(this) })
                }

                #[no_mangle]
                pub unsafe extern "C" fn [<decay_vec_ $name _ptr_mut>](this: *mut Vec<$ty>) -> *mut $ty {
                    // SAFETY: `this` is an occupied vector handle.
                    VecAbi::<$ty>::ptr_mut(unsafe { $crate::handle::borrow_mut::<Vec<$ty>>(this) })
                }

                #[no_mangle]
                pub unsafe extern "C" fn [<decay_vec_ $name _destruct>](this: *mut Vec<$ty>) {
                    // SAFETY: `this` is an occupied vector handle.
                    VecAbi::<$ty>::destruct(unsafe { OccupiedHandle::from_raw(this) });
                }

                #[no_mangle]
                pub unsafe extern "C" fn [<decay_move_vec_ $name>](dst: *mut Vec<$ty>, src: *mut Vec<$ty>) {
                    debug_assert!(!std::ptr::eq(dst, src), "move onto itself");
                    // SAFETY: `dst` is empty and `src` occupied.
                    let (dst, src) = unsafe { (EmptyHandle::from_raw(dst), OccupiedHandle::from_raw(src)) };
                    $crate::handle::move_extract(dst, src);
                }
            )+
        }
    };
}

vector_element_types!(vec_abi);
