// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Value Pairs
// ─────────────────────────────────────────────────────────────────────
//! Small `#[repr(C)]` records returned in bulk by the database and
//! mixtures. A foreign caller reads them straight out of vector storage,
//! so their field order is part of the boundary contract.

use crate::nuclide::Nuclide;

#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct NuclideAbundancePair<'db> {
    pub nuclide: &'db Nuclide,
    pub abundance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct NuclideActivityPair<'db> {
    pub nuclide: &'db Nuclide,
    /// Becquerel.
    pub activity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct NuclideNumAtomsPair<'db> {
    pub nuclide: &'db Nuclide,
    pub num_atoms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct EnergyIntensityPair {
    /// keV.
    pub energy: f64,
    pub intensity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct EnergyCountPair {
    pub energy: f64,
    pub count: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct EnergyRatePair {
    pub energy: f64,
    pub num_per_second: f64,
}

/// Another particle of the same transition emitted in coincidence.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct CoincidencePair {
    /// Index into the owning transition's `products`.
    pub index: u16,
    pub fraction: f32,
}

impl<'db> NuclideActivityPair<'db> {
    pub fn new(nuclide: &'db Nuclide, activity: f64) -> Self {
        Self { nuclide, activity }
    }

    pub fn to_num_atoms(self) -> NuclideNumAtomsPair<'db> {
        NuclideNumAtomsPair {
            nuclide: self.nuclide,
            num_atoms: self.nuclide.activity_to_num_atoms(self.activity),
        }
    }
}

impl<'db> NuclideNumAtomsPair<'db> {
    pub fn new(nuclide: &'db Nuclide, num_atoms: f64) -> Self {
        Self { nuclide, num_atoms }
    }
}
