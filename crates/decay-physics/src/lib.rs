// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Decay Physics Collaborator
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Nuclear-data database, Bateman time evolution, nuclide mixtures and
//! emission spectra.

#![deny(unsafe_code)]

pub mod database;
pub mod evolution;
pub mod mixture;
pub mod nuclide;
pub mod pairs;
pub mod transition;
pub mod units;

pub use database::Database;
pub use evolution::{NuclideTimeEvolution, TimeEvolutionTerm};
pub use mixture::{InitialNuclide, NuclideMixture};
pub use nuclide::{Element, IsotopeAbundance, Nuclide};
pub use pairs::{
    CoincidencePair, EnergyCountPair, EnergyIntensityPair, EnergyRatePair, NuclideAbundancePair,
    NuclideActivityPair, NuclideNumAtomsPair,
};
pub use transition::{RadParticle, Transition};
