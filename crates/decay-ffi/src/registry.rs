// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Exported Type Registry
// ─────────────────────────────────────────────────────────────────────
//! The two lists every per-type export family is stamped from.
//!
//! `value_types!(cb)` and `vector_element_types!(cb)` expand to
//! `cb! { name => Type, ... }`, optionally preceded by tokens passed after
//! the callback name. Transfer operations, the vector ABI, the layout
//! table and the per-type vector tests all read from here, so a type added
//! to a list gets every symbol of its family and a layout entry at once.

/// Types a caller allocates a slot for: `decay_<name>_destruct`,
/// `decay_move_<name>` and `DECAY_LAYOUT_<NAME>`.
macro_rules! value_types {
    ($callback:ident $(, $($prefix:tt)*)?) => {
        $callback! {
            $($($prefix)*)?
            string => $crate::string::DecayString,
            database => ::decay_physics::Database,
            mixture => ::decay_physics::NuclideMixture<'static>,
            nuclide => ::decay_physics::Nuclide,
            transition => ::decay_physics::Transition,
            rad_particle => ::decay_physics::RadParticle,
            element => ::decay_physics::Element,
            nuclide_abundance_pair => ::decay_physics::NuclideAbundancePair<'static>,
            nuclide_activity_pair => ::decay_physics::NuclideActivityPair<'static>,
            nuclide_num_atoms_pair => ::decay_physics::NuclideNumAtomsPair<'static>,
            energy_intensity_pair => ::decay_physics::EnergyIntensityPair,
            energy_count_pair => ::decay_physics::EnergyCountPair,
            energy_rate_pair => ::decay_physics::EnergyRatePair,
            time_evolution_term => ::decay_physics::TimeEvolutionTerm,
            nuclide_time_evolution => ::decay_physics::NuclideTimeEvolution<'static>,
            coincidence_pair => ::decay_physics::CoincidencePair,
            exception => $crate::capsule::ExceptionCapsule,
        }
    };
}
pub(crate) use value_types;

/// Element types of `Vec<T>`: the `decay_vec_<name>_*` family,
/// `decay_move_vec_<name>` and `DECAY_LAYOUT_VEC_<NAME>`.
macro_rules! vector_element_types {
    ($callback:ident $(, $($prefix:tt)*)?) => {
        $callback! {
            $($($prefix)*)?
            char => ::std::ffi::c_char,
            transition => ::decay_physics::Transition,
            transition_ptr => &'static ::decay_physics::Transition,
            rad_particle => ::decay_physics::RadParticle,
            nuclide_abundance_pair => ::decay_physics::NuclideAbundancePair<'static>,
            nuclide_activity_pair => ::decay_physics::NuclideActivityPair<'static>,
            nuclide_num_atoms_pair => ::decay_physics::NuclideNumAtomsPair<'static>,
            energy_intensity_pair => ::decay_physics::EnergyIntensityPair,
            energy_count_pair => ::decay_physics::EnergyCountPair,
            energy_rate_pair => ::decay_physics::EnergyRatePair,
            nuclide => ::decay_physics::Nuclide,
            nuclide_ref => &'static ::decay_physics::Nuclide,
            element => ::decay_physics::Element,
            element_ref => &'static ::decay_physics::Element,
            coincidence_pair => ::decay_physics::CoincidencePair,
            time_evolution_term => ::decay_physics::TimeEvolutionTerm,
            nuclide_time_evolution => ::decay_physics::NuclideTimeEvolution<'static>,
        }
    };
}
pub(crate) use vector_element_types;
