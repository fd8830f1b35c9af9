// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Nuclides and Elements
// ─────────────────────────────────────────────────────────────────────

use std::fmt;

use crate::pairs::EnergyIntensityPair;
use crate::units;

/// One nuclide of the database.
///
/// Transitions are referenced by index into `Database::transitions()`,
/// so a nuclide stays valid however the owning database is relocated.
#[derive(Debug, Clone, PartialEq)]
pub struct Nuclide {
    /// Normalized symbol, e.g. `U238`, `Co60`, `Ba137m`, `Au192m2`.
    pub symbol: String,
    /// Proton count.
    pub atomic_number: i16,
    /// Nucleon count.
    pub mass_number: i16,
    /// Nuclear excitation level (0 = ground state).
    pub isomer_number: i16,
    /// Atomic mass in a.m.u.
    pub atomic_mass: f32,
    /// Half-life in seconds; `f64::INFINITY` for stable nuclides.
    pub half_life: f64,
    /// Transitions this nuclide decays through.
    pub decays_to_children: Vec<usize>,
    /// Transitions that produce this nuclide.
    pub decays_from_parents: Vec<usize>,
}

impl Nuclide {
    pub fn decay_constant(&self) -> f64 {
        units::decay_constant(self.half_life)
    }

    pub fn is_stable(&self) -> bool {
        self.decay_constant() == 0.0
    }

    /// Activity (Bq) of `num_atoms` atoms of this nuclide.
    pub fn num_atoms_to_activity(&self, num_atoms: f64) -> f64 {
        num_atoms * self.decay_constant()
    }

    /// Atoms needed for `activity` Bq; zero for stable nuclides.
    pub fn activity_to_num_atoms(&self, activity: f64) -> f64 {
        let lambda = self.decay_constant();
        if lambda > 0.0 {
            activity / lambda
        } else {
            0.0
        }
    }

    pub fn human_str_summary(&self) -> String {
        let half_life = if self.is_stable() {
            "stable".to_string()
        } else {
            format!("half-life {:.6e} s", self.half_life)
        };
        format!(
            "{}: Z={}, A={}, iso={}, mass={} amu, {}, {} decay channel(s)",
            self.symbol,
            self.atomic_number,
            self.mass_number,
            self.isomer_number,
            self.atomic_mass,
            half_life,
            self.decays_to_children.len()
        )
    }
}

impl fmt::Display for Nuclide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

/// Natural abundance of one isotope of an element, by nuclide index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsotopeAbundance {
    pub nuclide: usize,
    /// Fraction by number of atoms, in [0, 1].
    pub abundance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Capitalized chemical symbol, e.g. `Cs`.
    pub symbol: String,
    pub name: String,
    pub atomic_number: i16,
    /// Naturally occurring isotopes.
    pub isotopes: Vec<IsotopeAbundance>,
    /// Characteristic x-rays (keV, relative intensity).
    pub xrays: Vec<EnergyIntensityPair>,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cs137() -> Nuclide {
        Nuclide {
            symbol: "Cs137".into(),
            atomic_number: 55,
            mass_number: 137,
            isomer_number: 0,
            atomic_mass: 136.907,
            half_life: 30.08 * units::YEAR,
            decays_to_children: vec![0, 1],
            decays_from_parents: vec![],
        }
    }

    #[test]
    fn test_activity_atoms_inverse() {
        let n = cs137();
        let atoms = n.activity_to_num_atoms(1000.0);
        assert!((n.num_atoms_to_activity(atoms) - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_stable_has_zero_atoms_for_activity() {
        let n = Nuclide {
            half_life: f64::INFINITY,
            ..cs137()
        };
        assert!(n.is_stable());
        assert_eq!(n.activity_to_num_atoms(5.0), 0.0);
    }

    #[test]
    fn test_summary_mentions_symbol_and_channels() {
        let s = cs137().human_str_summary();
        assert!(s.starts_with("Cs137:"));
        assert!(s.contains("2 decay channel(s)"));
    }
}
