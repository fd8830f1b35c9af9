// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Nuclide Mixtures and Emission Spectra
// ─────────────────────────────────────────────────────────────────────
//! A mixture of nuclides bound to one database.
//!
//! Each added nuclide is given with its amount at mixture time 0 and an
//! age; its progeny is grown in over that age. All queries take a time
//! relative to mixture time 0.

use std::fmt::Write as _;

use decay_types::{DecayConfig, DecayError, DecayResult, HowToOrder, ProductType};

use crate::database::Database;
use crate::evolution::NuclideTimeEvolution;
use crate::nuclide::Nuclide;
use crate::pairs::{EnergyCountPair, EnergyRatePair, NuclideActivityPair, NuclideNumAtomsPair};
use crate::units::{ANNIHILATION_ENERGY_KEV, AVOGADRO};

/// Half-lives of the longest-lived descendant a chain is aged by before
/// it counts as settled into equilibrium.
const EQUILIBRIUM_HALF_LIVES: f64 = 30.0;

/// A nuclide as it was added to a mixture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialNuclide<'db> {
    pub nuclide: &'db Nuclide,
    /// Atoms at mixture time 0.
    pub num_atoms: f64,
    /// Seconds the nuclide had been decaying before mixture time 0.
    pub age: f64,
}

#[derive(Debug, Clone)]
pub struct NuclideMixture<'db> {
    db: &'db Database,
    config: DecayConfig,
    initial: Vec<InitialNuclide<'db>>,
    evolutions: Vec<NuclideTimeEvolution<'db>>,
}

impl<'db> NuclideMixture<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self {
            db,
            config: db.config().clone(),
            initial: Vec::new(),
            evolutions: Vec::new(),
        }
    }

    pub fn with_config(db: &'db Database, config: DecayConfig) -> DecayResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(db)
        })
    }

    pub fn database(&self) -> &'db Database {
        self.db
    }

    pub fn clear(&mut self) {
        self.initial.clear();
        self.evolutions.clear();
    }

    // ── Building ────────────────────────────────────────────────────

    /// Add `activity` Bq of `nuclide` at mixture time 0, aged by `age` s.
    pub fn add_aged_nuclide_by_activity(
        &mut self,
        nuclide: &'db Nuclide,
        activity: f64,
        age: f64,
    ) -> DecayResult<()> {
        if !activity.is_finite() || activity < 0.0 {
            return Err(DecayError::Validation(format!(
                "{}: activity must be finite and >= 0, got {activity}",
                nuclide.symbol
            )));
        }
        if nuclide.is_stable() && activity > 0.0 {
            return Err(DecayError::Validation(format!(
                "{} is stable; add it by number of atoms instead of activity",
                nuclide.symbol
            )));
        }
        self.add_aged_nuclide_by_num_atoms(nuclide, nuclide.activity_to_num_atoms(activity), age)
    }

    /// Add `num_atoms` atoms of `nuclide` at mixture time 0, aged by `age` s.
    pub fn add_aged_nuclide_by_num_atoms(
        &mut self,
        nuclide: &'db Nuclide,
        num_atoms: f64,
        age: f64,
    ) -> DecayResult<()> {
        if !num_atoms.is_finite() || num_atoms < 0.0 {
            return Err(DecayError::Validation(format!(
                "{}: number of atoms must be finite and >= 0, got {num_atoms}",
                nuclide.symbol
            )));
        }
        if !age.is_finite() || age < 0.0 {
            return Err(DecayError::Validation(format!(
                "{}: age must be finite and >= 0, got {age}",
                nuclide.symbol
            )));
        }
        let index = self
            .db
            .index_of(nuclide)
            .ok_or_else(|| DecayError::NuclideNotFound(nuclide.symbol.clone()))?;

        // Unit solution from birth, shifted so the parent holds
        // `num_atoms` at mixture time 0.
        let parent_lambda = nuclide.decay_constant();
        let mut grown = self.db.solve_indexed(&[(index, 1.0)]);
        for evolution in &mut grown {
            for term in &mut evolution.evolution_terms {
                let scale = num_atoms * ((parent_lambda - term.exponential_coeff) * age).exp();
                term.term_coeff *= scale;
                if !term.term_coeff.is_finite() {
                    return Err(DecayError::Numerical(format!(
                        "{} aged {age} s overflows the evolution of {}",
                        nuclide.symbol, evolution.nuclide.symbol
                    )));
                }
            }
        }

        for evolution in grown {
            match self
                .evolutions
                .iter_mut()
                .find(|e| e.nuclide.symbol == evolution.nuclide.symbol)
            {
                Some(existing) => existing.absorb(&evolution.evolution_terms),
                None => self.evolutions.push(evolution),
            }
        }
        self.initial.push(InitialNuclide {
            nuclide,
            num_atoms,
            age,
        });
        Ok(())
    }

    /// Add `activity` Bq of `parent` at mixture time 0 with its whole
    /// chain already in secular equilibrium. Fails when the parent is
    /// stable or a radioactive descendant lives at least as long.
    pub fn add_nuclide_in_secular_equilibrium(
        &mut self,
        parent: &'db Nuclide,
        activity: f64,
    ) -> DecayResult<()> {
        if parent.is_stable() {
            return Err(DecayError::Validation(format!(
                "{} is stable and has no secular equilibrium",
                parent.symbol
            )));
        }
        let mut longest = 0.0_f64;
        for descendant in self.db.descendants(parent).into_iter().skip(1) {
            if descendant.is_stable() {
                continue;
            }
            if descendant.half_life >= parent.half_life {
                return Err(DecayError::Validation(format!(
                    "{} cannot reach secular equilibrium: {} lives at least as long",
                    parent.symbol, descendant.symbol
                )));
            }
            longest = longest.max(descendant.half_life);
        }
        self.add_aged_nuclide_by_activity(parent, activity, EQUILIBRIUM_HALF_LIVES * longest)
    }

    /// Add `activity` Bq of `parent` together with the descendants reached
    /// through decreasing half-lives, settled into equilibrium with it.
    /// Nuclides past that chain hold only what grew in while it settled.
    pub fn add_nuclide_in_prompt_equilibrium(
        &mut self,
        parent: &'db Nuclide,
        activity: f64,
    ) -> DecayResult<()> {
        let longest = self
            .db
            .prompt_equilibrium_chain(parent)
            .iter()
            .skip(1)
            .map(|n| n.half_life)
            .fold(0.0, f64::max);
        self.add_aged_nuclide_by_activity(parent, activity, EQUILIBRIUM_HALF_LIVES * longest)
    }

    // ── Initial contents ────────────────────────────────────────────

    pub fn num_initial_nuclides(&self) -> usize {
        self.initial.len()
    }

    pub fn initial(&self) -> &[InitialNuclide<'db>] {
        &self.initial
    }

    pub fn initial_nuclide(&self, index: usize) -> Option<&'db Nuclide> {
        self.initial.get(index).map(|i| i.nuclide)
    }

    /// Activity at mixture time 0 of the `index`-th added nuclide.
    pub fn initial_activity(&self, index: usize) -> Option<f64> {
        self.initial
            .get(index)
            .map(|i| i.nuclide.num_atoms_to_activity(i.num_atoms))
    }

    /// Atoms at mixture time 0 of the `index`-th added nuclide.
    pub fn initial_num_atoms(&self, index: usize) -> Option<f64> {
        self.initial.get(index).map(|i| i.num_atoms)
    }

    // ── Solution ────────────────────────────────────────────────────

    /// Nuclides with an evolution: everything added plus its progeny.
    pub fn num_solution_nuclides(&self) -> usize {
        self.evolutions.len()
    }

    pub fn solution_nuclide(&self, index: usize) -> Option<&'db Nuclide> {
        self.evolutions.get(index).map(|e| e.nuclide)
    }

    pub fn solution_nuclides(&self) -> Vec<&'db Nuclide> {
        self.evolutions.iter().map(|e| e.nuclide).collect()
    }

    // ── Amounts ─────────────────────────────────────────────────────

    /// One evolution per nuclide present, added nuclides and progeny alike.
    pub fn decayed_to_nuclides_evolutions(&self) -> &[NuclideTimeEvolution<'db>] {
        &self.evolutions
    }

    pub fn activity(&self, time: f64) -> Vec<NuclideActivityPair<'db>> {
        self.evolutions
            .iter()
            .map(|e| NuclideActivityPair::new(e.nuclide, e.activity(time)))
            .collect()
    }

    pub fn num_atoms(&self, time: f64) -> Vec<NuclideNumAtomsPair<'db>> {
        self.evolutions
            .iter()
            .map(|e| NuclideNumAtomsPair::new(e.nuclide, e.num_atoms(time)))
            .collect()
    }

    pub fn total_activity(&self, time: f64) -> f64 {
        self.evolutions.iter().map(|e| e.activity(time)).sum()
    }

    pub fn total_mass_in_grams(&self, time: f64) -> f64 {
        self.evolutions
            .iter()
            .map(|e| e.num_atoms(time) * f64::from(e.nuclide.atomic_mass) / AVOGADRO)
            .sum()
    }

    fn evolution_of(&self, nuclide: &Nuclide) -> DecayResult<&NuclideTimeEvolution<'db>> {
        self.evolutions
            .iter()
            .find(|e| e.nuclide.symbol == nuclide.symbol)
            .ok_or_else(|| DecayError::NuclideNotFound(nuclide.symbol.clone()))
    }

    fn lookup_symbol(&self, symbol: &str) -> DecayResult<&'db Nuclide> {
        self.db
            .nuclide_by_name(symbol)
            .ok_or_else(|| DecayError::NuclideNotFound(symbol.to_string()))
    }

    fn lookup_num(&self, z: i32, mass_number: i32, iso: i32) -> DecayResult<&'db Nuclide> {
        self.db
            .nuclide_by_num(z, mass_number, iso)
            .ok_or_else(|| DecayError::NuclideNotFound(format!("Z={z} A={mass_number} iso={iso}")))
    }

    pub fn nuclide_activity(&self, time: f64, nuclide: &Nuclide) -> DecayResult<f64> {
        Ok(self.evolution_of(nuclide)?.activity(time))
    }

    pub fn nuclide_activity_by_symbol(&self, time: f64, symbol: &str) -> DecayResult<f64> {
        self.nuclide_activity(time, self.lookup_symbol(symbol)?)
    }

    pub fn nuclide_activity_by_num(
        &self,
        time: f64,
        z: i32,
        mass_number: i32,
        iso: i32,
    ) -> DecayResult<f64> {
        self.nuclide_activity(time, self.lookup_num(z, mass_number, iso)?)
    }

    pub fn nuclide_num_atoms(&self, time: f64, nuclide: &Nuclide) -> DecayResult<f64> {
        Ok(self.evolution_of(nuclide)?.num_atoms(time))
    }

    pub fn nuclide_num_atoms_by_symbol(&self, time: f64, symbol: &str) -> DecayResult<f64> {
        self.nuclide_num_atoms(time, self.lookup_symbol(symbol)?)
    }

    pub fn nuclide_num_atoms_by_num(
        &self,
        time: f64,
        z: i32,
        mass_number: i32,
        iso: i32,
    ) -> DecayResult<f64> {
        self.nuclide_num_atoms(time, self.lookup_num(z, mass_number, iso)?)
    }

    /// Human-readable listing of the mixture at `time`.
    pub fn info(&self, time: f64) -> String {
        let mut s = format!(
            "Nuclide mixture at t = {time} s: {} initial nuclide(s), {} total\n",
            self.initial.len(),
            self.evolutions.len()
        );
        for e in &self.evolutions {
            let _ = writeln!(
                s,
                "  {}: {:.6e} Bq, {:.6e} atoms",
                e.nuclide.symbol,
                e.activity(time),
                e.num_atoms(time)
            );
        }
        let _ = write!(
            s,
            "Total: {:.6e} Bq, {:.6e} g",
            self.total_activity(time),
            self.total_mass_in_grams(time)
        );
        s
    }

    // ── Spectra ─────────────────────────────────────────────────────

    /// Unmerged emission lines at `time`. With `annihilation`, every
    /// positron line also yields twice its rate at 511 keV.
    fn raw_lines(&self, time: f64, kinds: &[ProductType], annihilation: bool) -> Vec<EnergyRatePair> {
        let mut lines = Vec::new();
        for evolution in &self.evolutions {
            let activity = evolution.activity(time);
            if activity <= 0.0 {
                continue;
            }
            for transition in self.db.decays_to_children(evolution.nuclide) {
                let per_decay = activity * f64::from(transition.branch_ratio);
                for particle in &transition.products {
                    let rate = per_decay * f64::from(particle.intensity);
                    if kinds.contains(&particle.kind) {
                        lines.push(EnergyRatePair {
                            energy: f64::from(particle.energy),
                            num_per_second: rate,
                        });
                    }
                    if annihilation && particle.kind == ProductType::PositronParticle {
                        lines.push(EnergyRatePair {
                            energy: ANNIHILATION_ENERGY_KEV,
                            num_per_second: 2.0 * rate,
                        });
                    }
                }
            }
        }
        lines
    }

    fn merge_lines(&self, mut lines: Vec<EnergyRatePair>, order: HowToOrder) -> Vec<EnergyRatePair> {
        let tolerance = self.config.energy_merge_tolerance_kev;
        lines.sort_by(|a, b| a.energy.total_cmp(&b.energy));
        let mut merged: Vec<EnergyRatePair> = Vec::with_capacity(lines.len());
        for line in lines {
            match merged.last_mut() {
                Some(last) if (line.energy - last.energy).abs() <= tolerance => {
                    last.num_per_second += line.num_per_second;
                }
                _ => merged.push(line),
            }
        }
        if order == HowToOrder::OrderByAbundance {
            merged.sort_by(|a, b| b.num_per_second.total_cmp(&a.num_per_second));
        }
        merged
    }

    fn spectrum(
        &self,
        time: f64,
        kinds: &[ProductType],
        annihilation: bool,
        order: HowToOrder,
    ) -> DecayResult<Vec<EnergyRatePair>> {
        if !time.is_finite() {
            return Err(DecayError::Validation(format!("time must be finite, got {time}")));
        }
        Ok(self.merge_lines(self.raw_lines(time, kinds, annihilation), order))
    }

    pub fn decay_particle(
        &self,
        time: f64,
        kind: ProductType,
        order: HowToOrder,
    ) -> DecayResult<Vec<EnergyRatePair>> {
        self.spectrum(time, &[kind], false, order)
    }

    pub fn gammas(
        &self,
        time: f64,
        order: HowToOrder,
        include_annihilations: bool,
    ) -> DecayResult<Vec<EnergyRatePair>> {
        self.spectrum(time, &[ProductType::GammaParticle], include_annihilations, order)
    }

    pub fn alphas(&self, time: f64, order: HowToOrder) -> DecayResult<Vec<EnergyRatePair>> {
        self.decay_particle(time, ProductType::AlphaParticle, order)
    }

    pub fn betas(&self, time: f64, order: HowToOrder) -> DecayResult<Vec<EnergyRatePair>> {
        self.decay_particle(time, ProductType::BetaParticle, order)
    }

    pub fn beta_plusses(&self, time: f64, order: HowToOrder) -> DecayResult<Vec<EnergyRatePair>> {
        self.decay_particle(time, ProductType::PositronParticle, order)
    }

    pub fn xrays(&self, time: f64, order: HowToOrder) -> DecayResult<Vec<EnergyRatePair>> {
        self.decay_particle(time, ProductType::XrayParticle, order)
    }

    /// Gammas and x-rays, plus annihilation photons unless disabled in
    /// the mixture's configuration.
    pub fn photons(&self, time: f64, order: HowToOrder) -> DecayResult<Vec<EnergyRatePair>> {
        self.spectrum(
            time,
            &[ProductType::GammaParticle, ProductType::XrayParticle],
            self.config.include_annihilations_in_photons,
            order,
        )
    }

    // ── Interval counts ─────────────────────────────────────────────

    fn interval_counts(
        &self,
        initial_age: f64,
        duration: f64,
        slices: usize,
        kinds: &[ProductType],
        annihilation: bool,
        order: HowToOrder,
    ) -> DecayResult<Vec<EnergyCountPair>> {
        if slices == 0 {
            return Err(DecayError::Validation("number of time slices must be >= 1".to_string()));
        }
        if !initial_age.is_finite() {
            return Err(DecayError::Validation(format!(
                "initial age must be finite, got {initial_age}"
            )));
        }
        if !duration.is_finite() || duration < 0.0 {
            return Err(DecayError::Validation(format!(
                "duration must be finite and >= 0, got {duration}"
            )));
        }

        let dt = duration / slices as f64;
        let mut counts = Vec::new();
        for k in 0..slices {
            let mid = initial_age + (k as f64 + 0.5) * dt;
            counts.extend(self.raw_lines(mid, kinds, annihilation).into_iter().map(|line| {
                EnergyRatePair {
                    energy: line.energy,
                    num_per_second: line.num_per_second * dt,
                }
            }));
        }
        Ok(self
            .merge_lines(counts, order)
            .into_iter()
            .map(|line| EnergyCountPair {
                energy: line.energy,
                count: line.num_per_second,
            })
            .collect())
    }

    /// Particles of `kind` emitted over `[initial_age, initial_age + duration]`.
    pub fn decay_particles_in_interval(
        &self,
        initial_age: f64,
        duration: f64,
        kind: ProductType,
        order: HowToOrder,
        slices: usize,
    ) -> DecayResult<Vec<EnergyCountPair>> {
        self.interval_counts(initial_age, duration, slices, &[kind], false, order)
    }

    pub fn decay_photons_in_interval(
        &self,
        initial_age: f64,
        duration: f64,
        order: HowToOrder,
        slices: usize,
    ) -> DecayResult<Vec<EnergyCountPair>> {
        self.interval_counts(
            initial_age,
            duration,
            slices,
            &[ProductType::GammaParticle, ProductType::XrayParticle],
            self.config.include_annihilations_in_photons,
            order,
        )
    }

    pub fn decay_gammas_in_interval(
        &self,
        initial_age: f64,
        duration: f64,
        include_annihilations: bool,
        order: HowToOrder,
        slices: usize,
    ) -> DecayResult<Vec<EnergyCountPair>> {
        self.interval_counts(
            initial_age,
            duration,
            slices,
            &[ProductType::GammaParticle],
            include_annihilations,
            order,
        )
    }

    /// `decay_photons_in_interval` with the configured slice count.
    pub fn decay_photons_in_interval_default(
        &self,
        initial_age: f64,
        duration: f64,
        order: HowToOrder,
    ) -> DecayResult<Vec<EnergyCountPair>> {
        self.decay_photons_in_interval(
            initial_age,
            duration,
            order,
            self.config.characteristic_time_slices,
        )
    }
}
