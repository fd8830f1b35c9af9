// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Mixture Shims
// ─────────────────────────────────────────────────────────────────────
//! Mixture operations. Enum arguments arrive as raw `i32` discriminants
//! and are decoded inside the envelope, so an unknown value comes back as
//! a capsule.

use decay_physics::{
    Database, EnergyCountPair, EnergyRatePair, Nuclide, NuclideActivityPair, NuclideMixture,
    NuclideNumAtomsPair, NuclideTimeEvolution,
};
use decay_types::{DecayError, HowToOrder, ProductType};

use crate::capsule::ExceptionCapsule;
use crate::envelope::{direct_raw, fallible_raw};
use crate::handle::{borrow, borrow_mut};
use crate::string::DecayString;

type Mixture = NuclideMixture<'static>;

/// Empty mixture over `db`. The database must outlive the mixture and
/// must not be moved while the mixture exists.
#[no_mangle]
pub unsafe extern "C" fn decay_mixture_new(out: *mut Mixture, db: *const Database) {
    // SAFETY: boundary contract.
    unsafe {
        let db: &'static Database = borrow(db);
        direct_raw(out, || NuclideMixture::new(db));
    }
}

#[no_mangle]
pub unsafe extern "C" fn decay_mixture_clear(this: *mut Mixture) {
    // SAFETY: boundary contract.
    unsafe { borrow_mut(this) }.clear();
}

// ─── Building ───────────────────────────────────────────────────────

#[no_mangle]
pub unsafe extern "C" fn decay_mixture_try_add_aged_nuclide_by_activity(
    out: *mut (),
    error: *mut ExceptionCapsule,
    this: *mut Mixture,
    nuclide: *const Nuclide,
    activity: f64,
    age: f64,
) -> bool {
    // SAFETY: boundary contract.
    unsafe {
        let this = borrow_mut(this);
        let nuclide: &'static Nuclide = borrow(nuclide);
        fallible_raw(out, error, || this.add_aged_nuclide_by_activity(nuclide, activity, age))
    }
}

#[no_mangle]
pub unsafe extern "C" fn decay_mixture_try_add_aged_nuclide_by_num_atoms(
    out: *mut (),
    error: *mut ExceptionCapsule,
    this: *mut Mixture,
    nuclide: *const Nuclide,
    num_atoms: f64,
    age: f64,
) -> bool {
    // SAFETY: boundary contract.
    unsafe {
        let this = borrow_mut(this);
        let nuclide: &'static Nuclide = borrow(nuclide);
        fallible_raw(out, error, || this.add_aged_nuclide_by_num_atoms(nuclide, num_atoms, age))
    }
}

#[no_mangle]
pub unsafe extern "C" fn decay_mixture_try_add_nuclide_in_secular_equilibrium(
    out: *mut (),
    error: *mut ExceptionCapsule,
    this: *mut Mixture,
    nuclide: *const Nuclide,
    activity: f64,
) -> bool {
    // SAFETY: boundary contract.
    unsafe {
        let this = borrow_mut(this);
        let nuclide: &'static Nuclide = borrow(nuclide);
        fallible_raw(out, error, || this.add_nuclide_in_secular_equilibrium(nuclide, activity))
    }
}

#[no_mangle]
pub unsafe extern "C" fn decay_mixture_try_add_nuclide_in_prompt_equilibrium(
    out: *mut (),
    error: *mut ExceptionCapsule,
    this: *mut Mixture,
    nuclide: *const Nuclide,
    activity: f64,
) -> bool {
    // SAFETY: boundary contract.
    unsafe {
        let this = borrow_mut(this);
        let nuclide: &'static Nuclide = borrow(nuclide);
        fallible_raw(out, error, || this.add_nuclide_in_prompt_equilibrium(nuclide, activity))
    }
}

// ─── Initial and solution nuclides ──────────────────────────────────

fn out_of_range(what: &str, index: usize, len: usize) -> DecayError {
    DecayError::Validation(format!("{what} index {index} out of range for {len} entries"))
}

/// Null when `index` is past the last added nuclide.
#[no_mangle]
pub unsafe extern "C" fn decay_mixture_initial_nuclide(this: *const Mixture, index: usize) -> *const Nuclide {
    // SAFETY: boundary contract.
    let this = unsafe { borrow(this) };
    this.initial_nuclide(index)
        .map_or(std::ptr::null(), |n| n as *const Nuclide)
}

#[no_mangle]
pub unsafe extern "C" fn decay_mixture_try_initial_activity(
    out: *mut f64,
    error: *mut ExceptionCapsule,
    this: *const Mixture,
    index: usize,
) -> bool {
    // SAFETY: boundary contract.
    unsafe {
        let this = borrow(this);
        fallible_raw(out, error, || {
            this.initial_activity(index)
                .ok_or_else(|| out_of_range("initial nuclide", index, this.num_initial_nuclides()))
        })
    }
}

#[no_mangle]
pub unsafe extern "C" fn decay_mixture_try_initial_num_atoms(
    out: *mut f64,
    error: *mut ExceptionCapsule,
    this: *const Mixture,
    index: usize,
) -> bool {
    // SAFETY: boundary contract.
    unsafe {
        let this = borrow(this);
        fallible_raw(out, error, || {
            this.initial_num_atoms(index)
                .ok_or_else(|| out_of_range("initial nuclide", index, this.num_initial_nuclides()))
        })
    }
}

#[no_mangle]
pub unsafe extern "C" fn decay_mixture_num_solution_nuclides(this: *const Mixture) -> usize {
    // SAFETY: boundary contract.
    unsafe { borrow(this) }.num_solution_nuclides()
}

/// Null when `index` is past the last solution nuclide.
#[no_mangle]
pub unsafe extern "C" fn decay_mixture_solution_nuclide(this: *const Mixture, index: usize) -> *const Nuclide {
    // SAFETY: boundary contract.
    let this = unsafe { borrow(this) };
    this.solution_nuclide(index)
        .map_or(std::ptr::null(), |n| n as *const Nuclide)
}

#[no_mangle]
pub unsafe extern "C" fn decay_mixture_solution_nuclides(
    out: *mut Vec<&'static Nuclide>,
    this: *const Mixture,
) {
    // SAFETY: boundary contract.
    unsafe {
        let this = borrow(this);
        direct_raw(out, || this.solution_nuclides());
    }
}

// ─── Per-nuclide queries ────────────────────────────────────────────

macro_rules! per_nuclide_queries {
    ($($prefix:ident => $by_ref:ident, $by_symbol:ident, $by_num:ident;)+) => {
        paste::paste! {
            $(
                #[no_mangle]
                pub unsafe extern "C" fn [<decay_mixture_try_ $prefix _nuclide>](
                    out: *mut f64,
                    error: *mut ExceptionCapsule,
                    this: *const Mixture,
                    time: f64,
                    nuclide: *const Nuclide,
                ) -> bool {
                    // SAFETY: boundary contract.
                    unsafe {
                        let (this, nuclide) = (borrow(this), borrow(nuclide));
                        fallible_raw(out, error, || this.$by_ref(time, nuclide))
                    }
                }

                #[no_mangle]
                pub unsafe extern "C" fn [<decay_mixture_try_ $prefix _symbol>](
                    out: *mut f64,
                    error: *mut ExceptionCapsule,
                    this: *const Mixture,
                    time: f64,
                    symbol: *const DecayString,
                ) -> bool {
                    // SAFETY: boundary contract.
                    unsafe {
                        let (this, symbol) = (borrow(this), borrow(symbol));
                        fallible_raw(out, error, || this.$by_symbol(time, symbol.to_str()?))
                    }
                }

                #[no_mangle]
                pub unsafe extern "C" fn [<decay_mixture_try_ $prefix _num>](
                    out: *mut f64,
                    error: *mut ExceptionCapsule,
                    this: *const Mixture,
                    time: f64,
                    z: i32,
                    mass_number: i32,
                    iso: i32,
                ) -> bool {
                    // SAFETY: boundary contract.
                    unsafe {
                        let this = borrow(this);
                        fallible_raw(out, error, || this.$by_num(time, z, mass_number, iso))
                    }
                }
            )+
        }
    };
}

per_nuclide_queries! {
    activity => nuclide_activity, nuclide_activity_by_symbol, nuclide_activity_by_num;
    atoms => nuclide_num_atoms, nuclide_num_atoms_by_symbol, nuclide_num_atoms_by_num;
}

// ─── Whole-mixture queries ──────────────────────────────────────────

#[no_mangle]
pub unsafe extern "C" fn decay_mixture_activity(
    out: *mut Vec<NuclideActivityPair<'static>>,
    this: *const Mixture,
    time: f64,
) {
    // SAFETY: boundary contract.
    unsafe {
        let this = borrow(this);
        direct_raw(out, || this.activity(time));
    }
}

#[no_mangle]
pub unsafe extern "C" fn decay_mixture_num_atoms(
    out: *mut Vec<NuclideNumAtomsPair<'static>>,
    this: *const Mixture,
    time: f64,
) {
    // SAFETY: boundary contract.
    unsafe {
        let this = borrow(this);
        direct_raw(out, || this.num_atoms(time));
    }
}

#[no_mangle]
pub unsafe extern "C" fn decay_mixture_decayed_to_nuclides_evolutions(
    out: *mut Vec<NuclideTimeEvolution<'static>>,
    this: *const Mixture,
) {
    // SAFETY: boundary contract.
    unsafe {
        let this = borrow(this);
        direct_raw(out, || this.decayed_to_nuclides_evolutions().to_vec());
    }
}

#[no_mangle]
pub unsafe extern "C" fn decay_mixture_num_initial_nuclides(this: *const Mixture) -> usize {
    // SAFETY: boundary contract.
    unsafe { borrow(this) }.num_initial_nuclides()
}

#[no_mangle]
pub unsafe extern "C" fn decay_mixture_total_activity(this: *const Mixture, time: f64) -> f64 {
    // SAFETY: boundary contract.
    unsafe { borrow(this) }.total_activity(time)
}

#[no_mangle]
pub unsafe extern "C" fn decay_mixture_total_mass_in_grams(this: *const Mixture, time: f64) -> f64 {
    // SAFETY: boundary contract.
    unsafe { borrow(this) }.total_mass_in_grams(time)
}

#[no_mangle]
pub unsafe extern "C" fn decay_mixture_info(out: *mut DecayString, this: *const Mixture, time: f64) {
    // SAFETY: boundary contract.
    unsafe {
        let this = borrow(this);
        direct_raw(out, || DecayString::from(this.info(time)));
    }
}

// ─── Spectra ────────────────────────────────────────────────────────

#[no_mangle]
pub unsafe extern "C" fn decay_mixture_try_gammas(
    out: *mut Vec<EnergyRatePair>,
    error: *mut ExceptionCapsule,
    this: *const Mixture,
    time: f64,
    order: i32,
    include_annihilations: bool,
) -> bool {
    // SAFETY: boundary contract.
    unsafe {
        let this = borrow(this);
        fallible_raw(out, error, || {
            this.gammas(time, HowToOrder::try_from(order)?, include_annihilations)
        })
    }
}

macro_rules! spectrum_shims {
    ($($method:ident),+ $(,)?) => {
        paste::paste! {
            $(
                #[no_mangle]
                pub unsafe extern "C" fn [<decay_mixture_try_ $method>](
                    out: *mut Vec<EnergyRatePair>,
                    error: *mut ExceptionCapsule,
                    this: *const Mixture,
                    time: f64,
                    order: i32,
                ) -> bool {
                    // SAFETY: boundary contract.
                    unsafe {
                        let this = borrow(this);
                        fallible_raw(out, error, || this.$method(time, HowToOrder::try_from(order)?))
                    }
                }
            )+
        }
    };
}

spectrum_shims!(alphas, betas, beta_plusses, xrays, photons);

#[no_mangle]
pub unsafe extern "C" fn decay_mixture_try_decay_particle(
    out: *mut Vec<EnergyRatePair>,
    error: *mut ExceptionCapsule,
    this: *const Mixture,
    time: f64,
    product_type: i32,
    order: i32,
) -> bool {
    // SAFETY: boundary contract.
    unsafe {
        let this = borrow(this);
        fallible_raw(out, error, || {
            this.decay_particle(
                time,
                ProductType::try_from(product_type)?,
                HowToOrder::try_from(order)?,
            )
        })
    }
}

// ─── Interval counts ────────────────────────────────────────────────

#[no_mangle]
pub unsafe extern "C" fn decay_mixture_try_decay_particles_in_interval(
    out: *mut Vec<EnergyCountPair>,
    error: *mut ExceptionCapsule,
    this: *const Mixture,
    initial_age: f64,
    duration: f64,
    product_type: i32,
    order: i32,
    slices: usize,
) -> bool {
    // SAFETY: boundary contract.
    unsafe {
        let this = borrow(this);
        fallible_raw(out, error, || {
            this.decay_particles_in_interval(
                initial_age,
                duration,
                ProductType::try_from(product_type)?,
                HowToOrder::try_from(order)?,
                slices,
            )
        })
    }
}

#[no_mangle]
pub unsafe extern "C" fn decay_mixture_try_decay_photons_in_interval(
    out: *mut Vec<EnergyCountPair>,
    error: *mut ExceptionCapsule,
    this: *const Mixture,
    initial_age: f64,
    duration: f64,
    order: i32,
    slices: usize,
) -> bool {
    // SAFETY: boundary contract.
    unsafe {
        let this = borrow(this);
        fallible_raw(out, error, || {
            this.decay_photons_in_interval(initial_age, duration, HowToOrder::try_from(order)?, slices)
        })
    }
}

#[no_mangle]
pub unsafe extern "C" fn decay_mixture_try_decay_gammas_in_interval(
    out: *mut Vec<EnergyCountPair>,
    error: *mut ExceptionCapsule,
    this: *const Mixture,
    initial_age: f64,
    duration: f64,
    include_annihilations: bool,
    order: i32,
    slices: usize,
) -> bool {
    // SAFETY: boundary contract.
    unsafe {
        let this = borrow(this);
        fallible_raw(out, error, || {
            this.decay_gammas_in_interval(
                initial_age,
                duration,
                include_annihilations,
                HowToOrder::try_from(order)?,
                slices,
            )
        })
    }
}
