// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Nuclear Data Database
// ─────────────────────────────────────────────────────────────────────
//! Immutable nuclear-data database loaded from JSON.
//!
//! Layout of the source document:
//!
//! ```json
//! {
//!   "elements":    [{ "symbol": "Ba", "name": "Barium", "z": 56,
//!                     "isotopes": [{ "nuclide": "Ba137", "abundance": 0.11232 }],
//!                     "xrays": [{ "energy": 32.194, "intensity": 0.63 }] }],
//!   "nuclides":    [{ "symbol": "Cs137", "z": 55, "a": 137, "iso": 0,
//!                     "mass": 136.907, "half_life": 9.4925e8 }],
//!   "transitions": [{ "parent": "Cs137", "child": "Ba137m", "mode": "beta",
//!                     "branch_ratio": 0.944,
//!                     "products": [{ "kind": "beta_particle", "energy": 514.03,
//!                                    "intensity": 1.0 }] }]
//! }
//! ```
//!
//! A `null` or missing half-life marks a stable nuclide. Times are in
//! seconds, energies in keV.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use decay_types::{
    DecayConfig, DecayError, DecayMode, DecayResult, ForbiddennessType, ProductType,
};

use crate::evolution::{self, NuclideTimeEvolution};
use crate::nuclide::{Element, IsotopeAbundance, Nuclide};
use crate::pairs::{
    CoincidencePair, EnergyIntensityPair, NuclideAbundancePair, NuclideActivityPair,
    NuclideNumAtomsPair,
};
use crate::transition::{RadParticle, Transition};

const BUNDLED_JSON: &str = include_str!("../data/bundled.decay.json");

// ─── Source records ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct DatabaseFile {
    #[serde(default)]
    elements: Vec<ElementRecord>,
    nuclides: Vec<NuclideRecord>,
    #[serde(default)]
    transitions: Vec<TransitionRecord>,
}

#[derive(Deserialize)]
struct ElementRecord {
    symbol: String,
    name: String,
    z: i16,
    #[serde(default)]
    isotopes: Vec<IsotopeRecord>,
    #[serde(default)]
    xrays: Vec<LineRecord>,
}

#[derive(Deserialize)]
struct IsotopeRecord {
    nuclide: String,
    abundance: f64,
}

#[derive(Deserialize)]
struct LineRecord {
    energy: f64,
    intensity: f64,
}

#[derive(Deserialize)]
struct NuclideRecord {
    symbol: String,
    z: i16,
    a: i16,
    #[serde(default)]
    iso: i16,
    mass: f32,
    #[serde(default)]
    half_life: Option<f64>,
}

#[derive(Deserialize)]
struct TransitionRecord {
    parent: String,
    #[serde(default)]
    child: Option<String>,
    mode: DecayMode,
    branch_ratio: f32,
    #[serde(default)]
    products: Vec<ParticleRecord>,
}

#[derive(Deserialize)]
struct ParticleRecord {
    kind: ProductType,
    energy: f32,
    intensity: f32,
    #[serde(default)]
    hindrance: f32,
    #[serde(default)]
    log_ft: f32,
    #[serde(default)]
    forbiddenness: ForbiddennessType,
    #[serde(default)]
    coincidences: Vec<CoincidenceRecord>,
}

#[derive(Deserialize)]
struct CoincidenceRecord {
    index: u16,
    fraction: f32,
}

// ─── Symbols ────────────────────────────────────────────────────────

/// Split a nuclide symbol into (element, mass number, isomer level).
///
/// Accepts `Co60`, `co-60`, `60Co`, `Ba137m`, `Ba-137m1`, `Au192m2`.
fn parse_symbol(raw: &str) -> Option<(String, u32, u32)> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .collect();
    let split_alpha = |s: &str| s.find(|c: char| !c.is_ascii_alphabetic()).unwrap_or(s.len());
    let split_digit = |s: &str| s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());

    let (element, mass, suffix) = if cleaned.starts_with(|c: char| c.is_ascii_digit()) {
        let (mass, rest) = cleaned.split_at(split_digit(&cleaned));
        let (element, suffix) = rest.split_at(split_alpha(rest));
        (element, mass, suffix)
    } else {
        let (element, rest) = cleaned.split_at(split_alpha(&cleaned));
        let (mass, suffix) = rest.split_at(split_digit(rest));
        (element, mass, suffix)
    };

    if element.is_empty() || element.len() > 3 || mass.is_empty() {
        return None;
    }
    let mass: u32 = mass.parse().ok()?;
    let iso = match suffix.to_ascii_lowercase().as_str() {
        "" => 0,
        "m" => 1,
        other => other.strip_prefix('m')?.parse().ok()?,
    };
    Some((element.to_string(), mass, iso))
}

/// Normalized display form, e.g. `Ba137m`.
fn canonical_symbol(element: &str, mass: u32, iso: u32) -> String {
    let mut out = canonical_element(element);
    out.push_str(&mass.to_string());
    match iso {
        0 => {}
        1 => out.push('m'),
        n => out.push_str(&format!("m{n}")),
    }
    out
}

/// Case-insensitive lookup key of a symbol.
fn symbol_key(raw: &str) -> Option<String> {
    let (element, mass, iso) = parse_symbol(raw)?;
    Some(canonical_symbol(&element, mass, iso).to_ascii_lowercase())
}

// ─── Database ───────────────────────────────────────────────────────

/// Nuclides, elements and the transitions between them.
///
/// Nothing changes after construction, so references handed out by the
/// lookups stay valid for as long as the database lives, including across
/// moves of the `Database` value itself.
pub struct Database {
    nuclides: Vec<Nuclide>,
    elements: Vec<Element>,
    transitions: Vec<Transition>,
    by_symbol: HashMap<String, usize>,
    config: DecayConfig,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("nuclides", &self.nuclides.len())
            .field("elements", &self.elements.len())
            .field("transitions", &self.transitions.len())
            .finish_non_exhaustive()
    }
}

impl Database {
    pub fn from_json(json: &str) -> DecayResult<Self> {
        Self::from_json_with_config(json, DecayConfig::default())
    }

    pub fn from_json_with_config(json: &str, config: DecayConfig) -> DecayResult<Self> {
        config.validate()?;
        let file: DatabaseFile = serde_json::from_str(json)
            .map_err(|e| DecayError::Parse(format!("database JSON: {e}")))?;
        Self::build(file, config)
    }

    /// Parse UTF-8 JSON bytes. Trailing NUL bytes are ignored.
    pub fn from_bytes(bytes: &[u8]) -> DecayResult<Self> {
        let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        let text = std::str::from_utf8(&bytes[..end])
            .map_err(|e| DecayError::Parse(format!("database is not UTF-8: {e}")))?;
        Self::from_json(text)
    }

    pub fn from_path(path: impl AsRef<Path>) -> DecayResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let db = Self::from_bytes(&bytes)?;
        log::info!(
            "loaded decay database {}: {} nuclides, {} transitions",
            path.display(),
            db.nuclides.len(),
            db.transitions.len()
        );
        Ok(db)
    }

    /// Load from the path named by `DecayConfig::database_env_var`.
    pub fn from_env() -> DecayResult<Self> {
        let var = DecayConfig::default().database_env_var;
        let path = std::env::var_os(&var).ok_or_else(|| {
            DecayError::Config(format!("environment variable `{var}` is not set"))
        })?;
        Self::from_path(path)
    }

    /// Small embedded dataset (Cs-137, Co-60, Sr-90, Na-22, Am-241 chains).
    pub fn bundled() -> DecayResult<Self> {
        Self::from_json(BUNDLED_JSON)
    }

    fn build(file: DatabaseFile, config: DecayConfig) -> DecayResult<Self> {
        let mut nuclides = Vec::with_capacity(file.nuclides.len());
        let mut by_symbol = HashMap::with_capacity(file.nuclides.len());

        for record in file.nuclides {
            let (element, mass, iso) = parse_symbol(&record.symbol).ok_or_else(|| {
                DecayError::Parse(format!("malformed nuclide symbol `{}`", record.symbol))
            })?;
            let half_life = match record.half_life {
                None => f64::INFINITY,
                Some(h) if h > 0.0 => h,
                Some(h) => {
                    return Err(DecayError::Validation(format!(
                        "{}: half-life must be > 0 (omit it for stable nuclides), got {h}",
                        record.symbol
                    )))
                }
            };
            let symbol = canonical_symbol(&element, mass, iso);
            let key = symbol.to_ascii_lowercase();
            if by_symbol.insert(key, nuclides.len()).is_some() {
                return Err(DecayError::Database(format!("duplicate nuclide `{symbol}`")));
            }
            nuclides.push(Nuclide {
                symbol,
                atomic_number: record.z,
                mass_number: record.a,
                isomer_number: record.iso,
                atomic_mass: record.mass,
                half_life,
                decays_to_children: Vec::new(),
                decays_from_parents: Vec::new(),
            });
        }

        let resolve = |by_symbol: &HashMap<String, usize>, symbol: &str, role: &str| {
            symbol_key(symbol)
                .and_then(|key| by_symbol.get(&key).copied())
                .ok_or_else(|| {
                    DecayError::Database(format!("{role} `{symbol}` is not a known nuclide"))
                })
        };

        let mut transitions = Vec::with_capacity(file.transitions.len());
        for record in file.transitions {
            let parent = resolve(&by_symbol, &record.parent, "transition parent")?;
            let child = match &record.child {
                Some(symbol) => Some(resolve(&by_symbol, symbol, "transition child")?),
                None => None,
            };
            if !(0.0..=1.0).contains(&record.branch_ratio) {
                return Err(DecayError::Validation(format!(
                    "{}: branch ratio must be in [0, 1], got {}",
                    record.parent, record.branch_ratio
                )));
            }
            let n_products = record.products.len();
            let mut products = Vec::with_capacity(n_products);
            for p in record.products {
                if let Some(bad) = p.coincidences.iter().find(|c| usize::from(c.index) >= n_products) {
                    return Err(DecayError::Database(format!(
                        "{}: coincidence index {} out of range",
                        record.parent, bad.index
                    )));
                }
                products.push(RadParticle {
                    kind: p.kind,
                    energy: p.energy,
                    intensity: p.intensity,
                    hindrance: p.hindrance,
                    log_ft: p.log_ft,
                    forbiddenness: p.forbiddenness,
                    coincidences: p
                        .coincidences
                        .into_iter()
                        .map(|c| CoincidencePair {
                            index: c.index,
                            fraction: c.fraction,
                        })
                        .collect(),
                });
            }

            let index = transitions.len();
            nuclides[parent].decays_to_children.push(index);
            if let Some(child) = child {
                nuclides[child].decays_from_parents.push(index);
            }
            transitions.push(Transition {
                parent,
                child,
                parent_symbol: nuclides[parent].symbol.clone(),
                child_symbol: child.map(|c| nuclides[c].symbol.clone()),
                mode: record.mode,
                branch_ratio: record.branch_ratio,
                products,
            });
        }

        let mut elements = Vec::with_capacity(file.elements.len());
        for record in file.elements {
            let isotopes = record
                .isotopes
                .iter()
                .map(|iso| {
                    Ok(IsotopeAbundance {
                        nuclide: resolve(&by_symbol, &iso.nuclide, "isotope")?,
                        abundance: iso.abundance,
                    })
                })
                .collect::<DecayResult<Vec<_>>>()?;
            elements.push(Element {
                symbol: canonical_element(&record.symbol),
                name: record.name,
                atomic_number: record.z,
                isotopes,
                xrays: record
                    .xrays
                    .iter()
                    .map(|x| EnergyIntensityPair {
                        energy: x.energy,
                        intensity: x.intensity,
                    })
                    .collect(),
            });
        }

        log::debug!(
            "decay database built: {} nuclides, {} elements, {} transitions",
            nuclides.len(),
            elements.len(),
            transitions.len()
        );

        Ok(Self {
            nuclides,
            elements,
            transitions,
            by_symbol,
            config,
        })
    }

    // ── Lookup ──────────────────────────────────────────────────────

    pub fn config(&self) -> &DecayConfig {
        &self.config
    }

    pub fn nuclides(&self) -> &[Nuclide] {
        &self.nuclides
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn transition(&self, index: usize) -> Option<&Transition> {
        self.transitions.get(index)
    }

    /// Case-insensitive lookup; see module docs for accepted spellings.
    pub fn nuclide_by_name(&self, name: &str) -> Option<&Nuclide> {
        let key = symbol_key(name)?;
        self.by_symbol.get(&key).map(|&i| &self.nuclides[i])
    }

    pub fn nuclide_by_num(&self, z: i32, mass_number: i32, iso: i32) -> Option<&Nuclide> {
        self.nuclides.iter().find(|n| {
            i32::from(n.atomic_number) == z
                && i32::from(n.mass_number) == mass_number
                && i32::from(n.isomer_number) == iso
        })
    }

    pub fn element_by_symbol(&self, symbol: &str) -> Option<&Element> {
        self.elements
            .iter()
            .find(|e| e.symbol.eq_ignore_ascii_case(symbol.trim()))
    }

    pub fn element_by_z(&self, z: i32) -> Option<&Element> {
        self.elements.iter().find(|e| i32::from(e.atomic_number) == z)
    }

    /// Index of a nuclide of this database, matched by symbol.
    pub fn index_of(&self, nuclide: &Nuclide) -> Option<usize> {
        self.by_symbol
            .get(&nuclide.symbol.to_ascii_lowercase())
            .copied()
    }

    pub fn element_isotopes(&self, element: &Element) -> Vec<NuclideAbundancePair<'_>> {
        element
            .isotopes
            .iter()
            .filter_map(|iso| {
                self.nuclides.get(iso.nuclide).map(|nuclide| NuclideAbundancePair {
                    nuclide,
                    abundance: iso.abundance,
                })
            })
            .collect()
    }

    pub fn decays_to_children(&self, nuclide: &Nuclide) -> Vec<&Transition> {
        nuclide
            .decays_to_children
            .iter()
            .filter_map(|&i| self.transitions.get(i))
            .collect()
    }

    pub fn decays_from_parents(&self, nuclide: &Nuclide) -> Vec<&Transition> {
        nuclide
            .decays_from_parents
            .iter()
            .filter_map(|&i| self.transitions.get(i))
            .collect()
    }

    /// The nuclide and all its progeny, breadth-first.
    pub fn descendants(&self, nuclide: &Nuclide) -> Vec<&Nuclide> {
        self.closure(nuclide, true)
    }

    /// The nuclide and every nuclide whose chain passes through it,
    /// breadth-first.
    pub fn forebearers(&self, nuclide: &Nuclide) -> Vec<&Nuclide> {
        self.closure(nuclide, false)
    }

    /// The nuclide followed by the descendants reached through strictly
    /// decreasing half-lives. A branch ends at a stable child or at one
    /// living at least as long as its parent.
    pub fn prompt_equilibrium_chain(&self, nuclide: &Nuclide) -> Vec<&Nuclide> {
        let Some(start) = self.index_of(nuclide) else {
            log::warn!("{} is not part of this database", nuclide.symbol);
            return Vec::new();
        };
        let mut chain = vec![&self.nuclides[start]];
        let mut next = 0;
        while let Some(&parent) = chain.get(next) {
            next += 1;
            for tr in self.decays_to_children(parent) {
                let Some(child) = tr.child.and_then(|i| self.nuclides.get(i)) else {
                    continue;
                };
                let shorter = !child.is_stable() && child.half_life < parent.half_life;
                if shorter && !chain.iter().any(|n| std::ptr::eq(*n, child)) {
                    chain.push(child);
                }
            }
        }
        chain
    }

    fn closure(&self, nuclide: &Nuclide, downward: bool) -> Vec<&Nuclide> {
        let Some(start) = self.index_of(nuclide) else {
            log::warn!("{} is not part of this database", nuclide.symbol);
            return Vec::new();
        };
        let mut seen = vec![false; self.nuclides.len()];
        let mut queue = VecDeque::from([start]);
        seen[start] = true;
        let mut out = Vec::new();
        while let Some(i) = queue.pop_front() {
            let current = &self.nuclides[i];
            out.push(current);
            let edges = if downward {
                &current.decays_to_children
            } else {
                &current.decays_from_parents
            };
            for &t in edges {
                let tr = &self.transitions[t];
                let next = if downward { tr.child } else { Some(tr.parent) };
                if let Some(j) = next {
                    if !seen[j] {
                        seen[j] = true;
                        queue.push_back(j);
                    }
                }
            }
        }
        out
    }

    // ── Evolution ───────────────────────────────────────────────────

    pub(crate) fn solve_indexed(&self, initial: &[(usize, f64)]) -> Vec<NuclideTimeEvolution<'_>> {
        evolution::solve(
            &self.nuclides,
            &self.transitions,
            initial,
            self.config.degenerate_lambda_epsilon,
        )
    }

    pub fn evolution_single(&self, parent: &Nuclide, activity: f64) -> Vec<NuclideTimeEvolution<'_>> {
        self.evolution_activities(&[NuclideActivityPair::new(parent, activity)])
    }

    pub fn evolution_atoms(&self, parents: &[NuclideNumAtomsPair<'_>]) -> Vec<NuclideTimeEvolution<'_>> {
        let initial: Vec<(usize, f64)> = parents
            .iter()
            .filter_map(|p| match self.index_of(p.nuclide) {
                Some(i) => Some((i, p.num_atoms)),
                None => {
                    log::warn!("{} is not part of this database; skipped", p.nuclide.symbol);
                    None
                }
            })
            .collect();
        self.solve_indexed(&initial)
    }

    /// Activities are converted to atoms first; a stable nuclide given an
    /// activity contributes nothing.
    pub fn evolution_activities(
        &self,
        parents: &[NuclideActivityPair<'_>],
    ) -> Vec<NuclideTimeEvolution<'_>> {
        let atoms: Vec<NuclideNumAtomsPair<'_>> = parents
            .iter()
            .map(|p| {
                if p.nuclide.is_stable() && p.activity != 0.0 {
                    log::warn!(
                        "{} is stable; activity {} Bq converts to zero atoms",
                        p.nuclide.symbol,
                        p.activity
                    );
                }
                p.to_num_atoms()
            })
            .collect();
        self.evolution_atoms(&atoms)
    }

    // ── Decay ───────────────────────────────────────────────────────

    pub fn decay_single(
        &self,
        parent: &Nuclide,
        activity: f64,
        time: f64,
    ) -> Vec<NuclideActivityPair<'_>> {
        activities_at(self.evolution_single(parent, activity), time)
    }

    pub fn decay_atoms(
        &self,
        parents: &[NuclideNumAtomsPair<'_>],
        time: f64,
    ) -> Vec<NuclideActivityPair<'_>> {
        activities_at(self.evolution_atoms(parents), time)
    }

    pub fn decay_activities(
        &self,
        parents: &[NuclideActivityPair<'_>],
        time: f64,
    ) -> Vec<NuclideActivityPair<'_>> {
        activities_at(self.evolution_activities(parents), time)
    }

    /// Replace `parents` with the decayed activities.
    pub fn decay_activities_assign<'db>(
        &'db self,
        parents: &mut Vec<NuclideActivityPair<'db>>,
        time: f64,
    ) {
        *parents = self.decay_activities(parents, time);
    }
}

fn canonical_element(symbol: &str) -> String {
    let mut chars = symbol.trim().chars();
    chars.next().map_or_else(String::new, |first| {
        std::iter::once(first.to_ascii_uppercase())
            .chain(chars.map(|c| c.to_ascii_lowercase()))
            .collect()
    })
}

fn activities_at(evolutions: Vec<NuclideTimeEvolution<'_>>, time: f64) -> Vec<NuclideActivityPair<'_>> {
    evolutions
        .iter()
        .map(|e| NuclideActivityPair::new(e.nuclide, e.activity(time)))
        .collect()
}
