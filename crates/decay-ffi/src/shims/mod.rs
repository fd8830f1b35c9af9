// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Function-Call Shims
// ─────────────────────────────────────────────────────────────────────
//! Exported adapters over the decay-physics collaborator.
//!
//! Direct shims take `(out, receiver, args...)` and cannot fail.
//! Fallible shims take `(out, error, receiver, args...)`, return the
//! envelope status and report every failure, including an unknown enum
//! discriminant, as a capsule. Shims only forward; validation belongs to
//! the collaborator.
//!
//! Borrowed records (`&Nuclide`, pairs holding one) are handed out with a
//! `'static` lifetime. They stay valid until the database they came from
//! is destroyed; moving a `Database` handle leaves its heap data in place.
//! A mixture refers to the database handle itself, so the database must
//! stay where it is while a mixture made from it is alive.

pub mod database;
pub mod mixture;
pub mod nuclide;
pub mod summary;
