// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Record Summaries
// ─────────────────────────────────────────────────────────────────────

use decay_physics::{RadParticle, Transition};

use crate::envelope::direct_raw;
use crate::handle::borrow;
use crate::string::DecayString;

#[no_mangle]
pub unsafe extern "C" fn decay_transition_human_str_summary(
    out: *mut DecayString,
    transition: *const Transition,
) {
    // SAFETY: boundary contract.
    unsafe {
        let transition = borrow(transition);
        direct_raw(out, || DecayString::from(transition.human_str_summary()));
    }
}

#[no_mangle]
pub unsafe extern "C" fn decay_rad_particle_human_str_summary(
    out: *mut DecayString,
    particle: *const RadParticle,
) {
    // SAFETY: boundary contract.
    unsafe {
        let particle = borrow(particle);
        direct_raw(out, || DecayString::from(particle.human_str_summary()));
    }
}
