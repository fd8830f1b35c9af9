// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Nuclide Shims
// ─────────────────────────────────────────────────────────────────────

use decay_physics::{Database, Nuclide, Transition};

use crate::envelope::direct_raw;
use crate::handle::borrow;
use crate::string::DecayString;

/// `nuclide` followed by all of its progeny.
#[no_mangle]
pub unsafe extern "C" fn decay_nuclide_descendants(
    out: *mut Vec<&'static Nuclide>,
    db: *const Database,
    nuclide: *const Nuclide,
) {
    // SAFETY: boundary contract.
    unsafe {
        let db: &'static Database = borrow(db);
        let nuclide = borrow(nuclide);
        direct_raw(out, || db.descendants(nuclide));
    }
}

/// `nuclide` followed by every nuclide that decays into it.
#[no_mangle]
pub unsafe extern "C" fn decay_nuclide_forebearers(
    out: *mut Vec<&'static Nuclide>,
    db: *const Database,
    nuclide: *const Nuclide,
) {
    // SAFETY: boundary contract.
    unsafe {
        let db: &'static Database = borrow(db);
        let nuclide = borrow(nuclide);
        direct_raw(out, || db.forebearers(nuclide));
    }
}

#[no_mangle]
pub unsafe extern "C" fn decay_nuclide_decays_to_children(
    out: *mut Vec<&'static Transition>,
    db: *const Database,
    nuclide: *const Nuclide,
) {
    // SAFETY: boundary contract.
    unsafe {
        let db: &'static Database = borrow(db);
        let nuclide = borrow(nuclide);
        direct_raw(out, || db.decays_to_children(nuclide));
    }
}

#[no_mangle]
pub unsafe extern "C" fn decay_nuclide_decays_from_parents(
    out: *mut Vec<&'static Transition>,
    db: *const Database,
    nuclide: *const Nuclide,
) {
    // SAFETY: boundary contract.
    unsafe {
        let db: &'static Database = borrow(db);
        let nuclide = borrow(nuclide);
        direct_raw(out, || db.decays_from_parents(nuclide));
    }
}

#[no_mangle]
pub unsafe extern "C" fn decay_nuclide_human_str_summary(
    out: *mut DecayString,
    nuclide: *const Nuclide,
) {
    // SAFETY: boundary contract.
    unsafe {
        let nuclide = borrow(nuclide);
        direct_raw(out, || DecayString::from(nuclide.human_str_summary()));
    }
}

/// 1/s; zero for stable nuclides.
#[no_mangle]
pub unsafe extern "C" fn decay_nuclide_decay_constant(nuclide: *const Nuclide) -> f64 {
    // SAFETY: boundary contract.
    unsafe { borrow(nuclide) }.decay_constant()
}
