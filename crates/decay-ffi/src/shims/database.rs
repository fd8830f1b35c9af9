// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Database Shims
// ─────────────────────────────────────────────────────────────────────

use std::ffi::c_char;
use std::ptr;

use decay_physics::{
    Database, Element, Nuclide, NuclideAbundancePair, NuclideActivityPair, NuclideNumAtomsPair,
    NuclideTimeEvolution, Transition,
};

use crate::capsule::ExceptionCapsule;
use crate::envelope::{direct_raw, fallible_raw};
use crate::handle::{borrow, borrow_mut};
use crate::string::DecayString;

// ─── Construction ───────────────────────────────────────────────────

/// Load the JSON database at `path`.
#[no_mangle]
pub unsafe extern "C" fn decay_try_init_database(
    out: *mut Database,
    error: *mut ExceptionCapsule,
    path: *const DecayString,
) -> bool {
    // SAFETY: boundary contract for every argument.
    unsafe {
        let path = borrow(path);
        fallible_raw(out, error, || Database::from_path(path.to_str()?))
    }
}

/// Parse a database from JSON bytes.
#[no_mangle]
pub unsafe extern "C" fn decay_try_init_database_bytes(
    out: *mut Database,
    error: *mut ExceptionCapsule,
    bytes: *const Vec<c_char>,
) -> bool {
    // SAFETY: boundary contract; `c_char` and `u8` share a layout.
    unsafe {
        let bytes = borrow(bytes);
        let bytes = std::slice::from_raw_parts(bytes.as_ptr().cast::<u8>(), bytes.len());
        fallible_raw(out, error, || Database::from_bytes(bytes))
    }
}

/// Load the database named by `DECAY_DATABASE_PATH`.
#[no_mangle]
pub unsafe extern "C" fn decay_try_init_database_env(
    out: *mut Database,
    error: *mut ExceptionCapsule,
) -> bool {
    // SAFETY: boundary contract.
    unsafe { fallible_raw(out, error, Database::from_env) }
}

/// Load the embedded dataset.
#[no_mangle]
pub unsafe extern "C" fn decay_try_init_database_bundled(
    out: *mut Database,
    error: *mut ExceptionCapsule,
) -> bool {
    // SAFETY: boundary contract.
    unsafe { fallible_raw(out, error, Database::bundled) }
}

// ─── Decay ──────────────────────────────────────────────────────────

#[no_mangle]
pub unsafe extern "C" fn decay_database_decay_single(
    out: *mut Vec<NuclideActivityPair<'static>>,
    db: *const Database,
    parent: *const Nuclide,
    activity: f64,
    time: f64,
) {
    // SAFETY: boundary contract.
    unsafe {
        let db: &'static Database = borrow(db);
        let parent = borrow(parent);
        direct_raw(out, || db.decay_single(parent, activity, time));
    }
}

#[no_mangle]
pub unsafe extern "C" fn decay_database_decay_atoms(
    out: *mut Vec<NuclideActivityPair<'static>>,
    db: *const Database,
    parents: *const Vec<NuclideNumAtomsPair<'static>>,
    time: f64,
) {
    // SAFETY: boundary contract.
    unsafe {
        let db: &'static Database = borrow(db);
        let parents = borrow(parents);
        direct_raw(out, || db.decay_atoms(parents, time));
    }
}

#[no_mangle]
pub unsafe extern "C" fn decay_database_decay_activities(
    out: *mut Vec<NuclideActivityPair<'static>>,
    db: *const Database,
    parents: *const Vec<NuclideActivityPair<'static>>,
    time: f64,
) {
    // SAFETY: boundary contract.
    unsafe {
        let db: &'static Database = borrow(db);
        let parents = borrow(parents);
        direct_raw(out, || db.decay_activities(parents, time));
    }
}

/// Replace the contents of `parents` with their decayed activities.
#[no_mangle]
pub unsafe extern "C" fn decay_database_decay_activities_assign(
    db: *const Database,
    parents: *mut Vec<NuclideActivityPair<'static>>,
    time: f64,
) {
    // SAFETY: boundary contract.
    unsafe {
        let db: &'static Database = borrow(db);
        db.decay_activities_assign(borrow_mut(parents), time);
    }
}

// ─── Evolution ──────────────────────────────────────────────────────

#[no_mangle]
pub unsafe extern "C" fn decay_database_evolution_single(
    out: *mut Vec<NuclideTimeEvolution<'static>>,
    db: *const Database,
    parent: *const Nuclide,
    activity: f64,
) {
    // SAFETY: boundary contract.
    unsafe {
        let db: &'static Database = borrow(db);
        let parent = borrow(parent);
        direct_raw(out, || db.evolution_single(parent, activity));
    }
}

#[no_mangle]
pub unsafe extern "C" fn decay_database_evolution_atoms(
    out: *mut Vec<NuclideTimeEvolution<'static>>,
    db: *const Database,
    parents: *const Vec<NuclideNumAtomsPair<'static>>,
) {
    // SAFETY: boundary contract.
    unsafe {
        let db: &'static Database = borrow(db);
        let parents = borrow(parents);
        direct_raw(out, || db.evolution_atoms(parents));
    }
}

#[no_mangle]
pub unsafe extern "C" fn decay_database_evolution_activities(
    out: *mut Vec<NuclideTimeEvolution<'static>>,
    db: *const Database,
    parents: *const Vec<NuclideActivityPair<'static>>,
) {
    // SAFETY: boundary contract.
    unsafe {
        let db: &'static Database = borrow(db);
        let parents = borrow(parents);
        direct_raw(out, || db.evolution_activities(parents));
    }
}

// ─── Lookup ─────────────────────────────────────────────────────────

/// Null when the name is unknown or not UTF-8.
#[no_mangle]
pub unsafe extern "C" fn decay_database_nuclide_by_name(
    db: *const Database,
    name: *const DecayString,
) -> *const Nuclide {
    // SAFETY: boundary contract.
    let (db, name) = unsafe { (borrow(db), borrow(name)) };
    name.to_str()
        .ok()
        .and_then(|name| db.nuclide_by_name(name))
        .map_or(ptr::null(), ptr::from_ref)
}

/// Null when no nuclide has this `(z, a, iso)`.
#[no_mangle]
pub unsafe extern "C" fn decay_database_nuclide_by_num(
    db: *const Database,
    z: i32,
    mass_number: i32,
    iso: i32,
) -> *const Nuclide {
    // SAFETY: boundary contract.
    unsafe { borrow(db) }
        .nuclide_by_num(z, mass_number, iso)
        .map_or(ptr::null(), ptr::from_ref)
}

#[no_mangle]
pub unsafe extern "C" fn decay_database_element_by_symbol(
    db: *const Database,
    symbol: *const DecayString,
) -> *const Element {
    // SAFETY: boundary contract.
    let (db, symbol) = unsafe { (borrow(db), borrow(symbol)) };
    symbol
        .to_str()
        .ok()
        .and_then(|symbol| db.element_by_symbol(symbol))
        .map_or(ptr::null(), ptr::from_ref)
}

#[no_mangle]
pub unsafe extern "C" fn decay_database_element_by_z(db: *const Database, z: i32) -> *const Element {
    // SAFETY: boundary contract.
    unsafe { borrow(db) }
        .element_by_z(z)
        .map_or(ptr::null(), ptr::from_ref)
}

#[no_mangle]
pub unsafe extern "C" fn decay_database_nuclides(
    out: *mut Vec<&'static Nuclide>,
    db: *const Database,
) {
    // SAFETY: boundary contract.
    unsafe {
        let db: &'static Database = borrow(db);
        direct_raw(out, || db.nuclides().iter().collect());
    }
}

#[no_mangle]
pub unsafe extern "C" fn decay_database_elements(
    out: *mut Vec<&'static Element>,
    db: *const Database,
) {
    // SAFETY: boundary contract.
    unsafe {
        let db: &'static Database = borrow(db);
        direct_raw(out, || db.elements().iter().collect());
    }
}

#[no_mangle]
pub unsafe extern "C" fn decay_database_transitions(
    out: *mut Vec<&'static Transition>,
    db: *const Database,
) {
    // SAFETY: boundary contract.
    unsafe {
        let db: &'static Database = borrow(db);
        direct_raw(out, || db.transitions().iter().collect());
    }
}

#[no_mangle]
pub unsafe extern "C" fn decay_database_element_isotopes(
    out: *mut Vec<NuclideAbundancePair<'static>>,
    db: *const Database,
    element: *const Element,
) {
    // SAFETY: boundary contract.
    unsafe {
        let db: &'static Database = borrow(db);
        let element = borrow(element);
        direct_raw(out, || db.element_isotopes(element));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::{call_fallible, Slot};
    use crate::vec_abi::{decay_vec_char_from_data, decay_vec_nuclide_activity_pair_from_data};

    fn bundled() -> Slot<Database> {
        let mut db = Slot::<Database>::new();
        let mut err = Slot::<ExceptionCapsule>::new();
        let ok = call_fallible(&mut db, &mut err, |o, e| unsafe {
            decay_try_init_database_bundled(o, e)
        });
        assert!(ok);
        db
    }

    fn string(s: &str) -> Slot<DecayString> {
        let mut slot = Slot::<DecayString>::new();
        slot.fill_with(|p| unsafe { p.write(DecayString::from(s)) });
        slot
    }

    #[test]
    fn test_missing_path_reports_io_error() {
        let path = string("/no/such/dir/nuclides.decay.json");
        let mut db = Slot::<Database>::new();
        let mut err = Slot::<ExceptionCapsule>::new();
        let ok = call_fallible(&mut db, &mut err, |o, e| unsafe {
            decay_try_init_database(o, e, path.as_ptr())
        });
        assert!(!ok);
        assert!(!db.is_occupied());
        assert!(err.get().to_string().starts_with("I/O error"));
    }

    #[test]
    fn test_garbage_bytes_report_parse_error() {
        let raw: Vec<c_char> = b"<xml/>".iter().map(|&b| b as c_char).collect();
        let mut bytes = Slot::<Vec<c_char>>::new();
        bytes.fill_with(|p| unsafe { decay_vec_char_from_data(raw.as_ptr(), raw.len(), p) });
        let mut db = Slot::<Database>::new();
        let mut err = Slot::<ExceptionCapsule>::new();
        let ok = call_fallible(&mut db, &mut err, |o, e| unsafe {
            decay_try_init_database_bytes(o, e, bytes.as_ptr())
        });
        assert!(!ok);
        assert!(err.get().to_string().starts_with("parse error"));
    }

    #[test]
    fn test_valid_bytes_load() {
        let json = br#"{"nuclides": [{"symbol": "H3", "z": 1, "a": 3, "mass": 3.016, "half_life": 3.888e8}]}"#;
        let raw: Vec<c_char> = json.iter().map(|&b| b as c_char).collect();
        let mut bytes = Slot::<Vec<c_char>>::new();
        bytes.fill_with(|p| unsafe { decay_vec_char_from_data(raw.as_ptr(), raw.len(), p) });
        let mut db = Slot::<Database>::new();
        let mut err = Slot::<ExceptionCapsule>::new();
        assert!(call_fallible(&mut db, &mut err, |o, e| unsafe {
            decay_try_init_database_bytes(o, e, bytes.as_ptr())
        }));
        assert_eq!(db.get().nuclides().len(), 1);
    }

    #[test]
    fn test_lookup_by_name_and_num() {
        let db = bundled();
        let name = string("Cs-137");
        let by_name = unsafe { decay_database_nuclide_by_name(db.as_ptr(), name.as_ptr()) };
        let by_num = unsafe { decay_database_nuclide_by_num(db.as_ptr(), 55, 137, 0) };
        assert!(!by_name.is_null());
        assert_eq!(by_name, by_num);
        let unknown = string("Dr282");
        assert!(unsafe { decay_database_nuclide_by_name(db.as_ptr(), unknown.as_ptr()) }.is_null());
        assert!(unsafe { decay_database_nuclide_by_num(db.as_ptr(), 0, 0, 0) }.is_null());
    }

    #[test]
    fn test_elements_and_isotopes() {
        let db = bundled();
        let symbol = string("Ni");
        let ni = unsafe { decay_database_element_by_symbol(db.as_ptr(), symbol.as_ptr()) };
        assert_eq!(ni, unsafe { decay_database_element_by_z(db.as_ptr(), 28) });
        let mut isotopes = Slot::<Vec<NuclideAbundancePair<'static>>>::new();
        isotopes.fill_with(|p| unsafe { decay_database_element_isotopes(p, db.as_ptr(), ni) });
        assert_eq!(isotopes.get()[0].nuclide.symbol, "Ni60");
    }

    #[test]
    fn test_listings() {
        let db = bundled();
        let mut nuclides = Slot::<Vec<&'static Nuclide>>::new();
        nuclides.fill_with(|p| unsafe { decay_database_nuclides(p, db.as_ptr()) });
        assert_eq!(nuclides.get().len(), db.get().nuclides().len());
        let mut elements = Slot::<Vec<&'static Element>>::new();
        elements.fill_with(|p| unsafe { decay_database_elements(p, db.as_ptr()) });
        assert_eq!(elements.get().len(), db.get().elements().len());
        let mut transitions = Slot::<Vec<&'static Transition>>::new();
        transitions.fill_with(|p| unsafe { decay_database_transitions(p, db.as_ptr()) });
        assert!(std::ptr::eq(transitions.get()[0], &db.get().transitions()[0]));
    }

    #[test]
    fn test_decay_single_matches_collaborator() {
        let db = bundled();
        let co = db.get().nuclide_by_name("Co60").unwrap();
        let mut out = Slot::<Vec<NuclideActivityPair<'static>>>::new();
        out.fill_with(|p| unsafe { decay_database_decay_single(p, db.as_ptr(), co, 100.0, co.half_life) });
        assert!((out.get()[0].activity - 50.0).abs() < 1e-9);
        assert_eq!(out.get().len(), 2);
    }

    #[test]
    fn test_batch_decay_empty_input() {
        let db = bundled();
        let mut parents = Slot::<Vec<NuclideActivityPair<'static>>>::new();
        parents.fill_with(|p| unsafe {
            decay_vec_nuclide_activity_pair_from_data(ptr::null(), 0, p)
        });
        let mut out = Slot::<Vec<NuclideActivityPair<'static>>>::new();
        out.fill_with(|p| unsafe { decay_database_decay_activities(p, db.as_ptr(), parents.as_ptr(), 1.0e6) });
        assert!(out.get().is_empty());

        let mut evolutions = Slot::<Vec<NuclideTimeEvolution<'static>>>::new();
        evolutions.fill_with(|p| unsafe { decay_database_evolution_activities(p, db.as_ptr(), parents.as_ptr()) });
        assert!(evolutions.get().is_empty());
    }

    #[test]
    fn test_assign_matches_out_of_place() {
        let db = bundled();
        let sr: &'static Nuclide = unsafe { &*ptr::from_ref(db.get().nuclide_by_name("Sr90").unwrap()) };
        let input = [NuclideActivityPair::new(sr, 1.0e3)];
        let mut parents = Slot::<Vec<NuclideActivityPair<'static>>>::new();
        parents.fill_with(|p| unsafe { decay_vec_nuclide_activity_pair_from_data(input.as_ptr(), 1, p) });

        let mut decayed = Slot::<Vec<NuclideActivityPair<'static>>>::new();
        decayed.fill_with(|p| unsafe { decay_database_decay_activities(p, db.as_ptr(), parents.as_ptr(), 3.0e7) });
        unsafe { decay_database_decay_activities_assign(db.as_ptr(), parents.as_mut_ptr(), 3.0e7) };
        assert_eq!(parents.get(), decayed.get());

        let atoms = [NuclideNumAtomsPair::new(sr, sr.activity_to_num_atoms(1.0e3))];
        let mut atom_parents = Slot::<Vec<NuclideNumAtomsPair<'static>>>::new();
        atom_parents.fill_with(|p| unsafe { p.write(atoms.to_vec()) });
        let mut by_atoms = Slot::<Vec<NuclideActivityPair<'static>>>::new();
        by_atoms.fill_with(|p| unsafe { decay_database_decay_atoms(p, db.as_ptr(), atom_parents.as_ptr(), 3.0e7) });
        for (a, b) in by_atoms.get().iter().zip(decayed.get()) {
            assert!((a.activity - b.activity).abs() < 1e-9 * b.activity.max(1.0));
        }
    }

    #[test]
    fn test_evolution_shims() {
        let db = bundled();
        let na = db.get().nuclide_by_name("Na22").unwrap();
        let mut single = Slot::<Vec<NuclideTimeEvolution<'static>>>::new();
        single.fill_with(|p| unsafe { decay_database_evolution_single(p, db.as_ptr(), na, 10.0) });
        assert_eq!(single.get().len(), 2);
        assert!((single.get()[0].activity(0.0) - 10.0).abs() < 1e-9);

        let atoms = vec![NuclideNumAtomsPair::new(
            single.get()[0].nuclide,
            na.activity_to_num_atoms(10.0),
        )];
        let mut parents = Slot::<Vec<NuclideNumAtomsPair<'static>>>::new();
        parents.fill_with(|p| unsafe { p.write(atoms) });
        let mut by_atoms = Slot::<Vec<NuclideTimeEvolution<'static>>>::new();
        by_atoms.fill_with(|p| unsafe { decay_database_evolution_atoms(p, db.as_ptr(), parents.as_ptr()) });
        assert_eq!(by_atoms.get().len(), single.get().len());
    }
}
