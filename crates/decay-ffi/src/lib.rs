// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — C ABI Boundary
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied: every export dereferences
// caller-supplied pointers. Each unsafe block states its precondition.
//! C-callable marshaling layer over the decay-physics collaborator.
//!
//! The caller owns every slot. It allocates storage using the published
//! layout table, passes it in empty, and gets it back holding a value.
//! Ownership then moves through `decay_move_*` and ends with
//! `decay_*_destruct`.
//!
//! - `registry`: the type lists every per-type export family is stamped from.
//! - [`layout`]: size/alignment descriptors for every exported type.
//! - [`handle`]: empty/occupied slot discipline, `construct_into`, `move_extract`.
//! - [`string`]: byte strings with a guaranteed trailing NUL.
//! - [`vec_abi`]: the nine-operation vector ABI plus `decay_move_vec_*`.
//! - [`capsule`], [`envelope`]: failures as owned exception capsules.
//! - [`shims`]: direct and fallible adapters over databases and mixtures.
//!
//! # FFI Safety
//!
//! - Output slots must be writable, aligned per the layout table and empty.
//! - Receiver and input pointers must point at live, initialized values.
//! - A fallible call fills exactly one of `out` and `error`, as its
//!   return value says; the other slot is left untouched.
//! - No panic unwinds across the boundary: fallible shims capture it as a
//!   capsule, direct shims log it and abort. Any other export relies on
//!   `extern "C"` aborting on unwind.
//! - Borrowed records stay valid until their database is destroyed.
//!
//! Usage from C:
//! ```c
//! void *db = aligned_alloc(DECAY_LAYOUT_DATABASE.align, DECAY_LAYOUT_DATABASE.size);
//! void *err = aligned_alloc(DECAY_LAYOUT_EXCEPTION.align, DECAY_LAYOUT_EXCEPTION.size);
//! if (!decay_try_init_database_bundled(db, err)) {
//!     puts(decay_exception_what(err));
//!     decay_exception_destruct(err);
//! }
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::missing_safety_doc)]

pub mod capsule;
pub mod envelope;
pub mod handle;
pub mod layout;
mod registry;
pub mod shims;
pub mod string;
pub mod vec_abi;

#[cfg(test)]
mod harness;

pub use capsule::{ExceptionCapsule, UNKNOWN_ERROR};
pub use envelope::{direct, fallible};
pub use handle::{construct_into, move_extract, EmptyHandle, OccupiedHandle};
pub use layout::{layout_of, LayoutDescriptor, LAYOUT_TABLE};
pub use string::DecayString;
pub use vec_abi::VecAbi;
