// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Bateman Time Evolution
// ─────────────────────────────────────────────────────────────────────
//! Closed-form time evolution of decay chains.
//!
//! The amount of every nuclide in a chain is a sum of decaying
//! exponentials:
//!
//!   N(t) = Σ_i c_i · exp(-λ_i · t)
//!
//! For a child fed by parent p with branch ratio b, each parent term
//! (c_i, λ_i) contributes b·λ_p·c_i / (λ_c - λ_i) at λ_i and the negated
//! amount at λ_c, so that the child starts from its own initial amount.
//! Nuclides are solved in topological order of the decay graph, which
//! makes every parent complete before it feeds its children.

use std::collections::HashMap;

use crate::nuclide::Nuclide;
use crate::transition::Transition;

/// One exponential of a Bateman decomposition.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct TimeEvolutionTerm {
    /// Atoms at t = 0 carried by this term.
    pub term_coeff: f64,
    /// Decay constant of the term (1/s).
    pub exponential_coeff: f64,
}

impl TimeEvolutionTerm {
    pub fn eval(&self, time: f64) -> f64 {
        self.term_coeff * (-self.exponential_coeff * time).exp()
    }
}

/// Amount of one nuclide over time.
#[derive(Debug, Clone, PartialEq)]
pub struct NuclideTimeEvolution<'db> {
    pub nuclide: &'db Nuclide,
    pub evolution_terms: Vec<TimeEvolutionTerm>,
}

impl<'db> NuclideTimeEvolution<'db> {
    /// Atoms present at `time`. Cancellation noise below zero is clamped.
    pub fn num_atoms(&self, time: f64) -> f64 {
        let sum: f64 = self.evolution_terms.iter().map(|t| t.eval(time)).sum();
        sum.max(0.0)
    }

    /// Activity (Bq) at `time`.
    pub fn activity(&self, time: f64) -> f64 {
        self.nuclide.num_atoms_to_activity(self.num_atoms(time))
    }

    /// Add `other`'s terms, merging equal exponents.
    pub fn absorb(&mut self, other: &[TimeEvolutionTerm]) {
        self.evolution_terms.extend_from_slice(other);
        merge_terms(&mut self.evolution_terms);
    }
}

/// Sort by exponent, fold equal exponents together, drop zero terms.
pub fn merge_terms(terms: &mut Vec<TimeEvolutionTerm>) {
    terms.sort_by(|a, b| a.exponential_coeff.total_cmp(&b.exponential_coeff));
    let mut merged: Vec<TimeEvolutionTerm> = Vec::with_capacity(terms.len());
    for term in terms.drain(..) {
        match merged.last_mut() {
            Some(last) if last.exponential_coeff == term.exponential_coeff => {
                last.term_coeff += term.term_coeff;
            }
            _ => merged.push(term),
        }
    }
    merged.retain(|t| t.term_coeff != 0.0);
    *terms = merged;
}

/// Nuclide indices reachable from `roots`, parents before children.
///
/// Roots keep their relative order; the decay graph is acyclic, and a
/// cycle in malformed data is cut at the first revisit.
pub fn topological_order(
    nuclides: &[Nuclide],
    transitions: &[Transition],
    roots: &[usize],
) -> Vec<usize> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        Active,
        Done,
    }

    let mut marks = vec![Mark::New; nuclides.len()];
    let mut postorder = Vec::new();

    for &root in roots.iter().rev() {
        if marks[root] != Mark::New {
            continue;
        }
        // (node, children already visited)
        let mut stack = vec![(root, 0usize)];
        marks[root] = Mark::Active;
        while let Some(top) = stack.last_mut() {
            let (node, pos) = *top;
            let children = &nuclides[node].decays_to_children;
            if pos < children.len() {
                top.1 += 1;
                let tr = &transitions[children[children.len() - 1 - pos]];
                if let Some(child) = tr.child {
                    match marks[child] {
                        Mark::New => {
                            marks[child] = Mark::Active;
                            stack.push((child, 0));
                        }
                        Mark::Active => {
                            log::warn!(
                                "decay graph cycle through {}; edge ignored",
                                nuclides[child].symbol
                            );
                        }
                        Mark::Done => {}
                    }
                }
            } else {
                marks[node] = Mark::Done;
                postorder.push(node);
                stack.pop();
            }
        }
    }

    postorder.reverse();
    postorder
}

/// Solve the chains started by `initial` (nuclide index, atoms at t = 0).
///
/// One evolution per reachable nuclide: the roots in order of first
/// appearance, then their progeny with parents before children. Duplicate
/// roots are summed.
pub fn solve<'db>(
    nuclides: &'db [Nuclide],
    transitions: &[Transition],
    initial: &[(usize, f64)],
    degenerate_epsilon: f64,
) -> Vec<NuclideTimeEvolution<'db>> {
    let mut roots: Vec<usize> = Vec::new();
    let mut amounts: HashMap<usize, f64> = HashMap::new();
    for &(index, atoms) in initial {
        if !amounts.contains_key(&index) {
            roots.push(index);
        }
        *amounts.entry(index).or_insert(0.0) += atoms;
    }

    let order = topological_order(nuclides, transitions, &roots);
    let mut terms: HashMap<usize, Vec<TimeEvolutionTerm>> = HashMap::with_capacity(order.len());

    for &index in &order {
        let nuclide = &nuclides[index];
        let lambda = nuclide.decay_constant();
        let own = terms.entry(index).or_default();
        own.push(TimeEvolutionTerm {
            term_coeff: amounts.get(&index).copied().unwrap_or(0.0),
            exponential_coeff: lambda,
        });
        merge_terms(own);

        if lambda == 0.0 {
            continue;
        }
        let parent_terms = own.clone();
        for &tr_index in &nuclide.decays_to_children {
            let tr = &transitions[tr_index];
            let Some(child) = tr.child else { continue };
            let branch = f64::from(tr.branch_ratio);
            if branch <= 0.0 {
                continue;
            }
            let child_lambda = nuclides[child].decay_constant();
            let child_terms = terms.entry(child).or_default();
            for term in &parent_terms {
                let mut lambda_c = child_lambda;
                let scale = lambda_c.max(term.exponential_coeff);
                if (lambda_c - term.exponential_coeff).abs() <= degenerate_epsilon * scale {
                    lambda_c = term.exponential_coeff * (1.0 + degenerate_epsilon);
                    log::debug!(
                        "degenerate decay constants for {}; separated by {degenerate_epsilon}",
                        nuclides[child].symbol
                    );
                }
                let coeff = branch * lambda * term.term_coeff / (lambda_c - term.exponential_coeff);
                child_terms.push(TimeEvolutionTerm {
                    term_coeff: coeff,
                    exponential_coeff: term.exponential_coeff,
                });
                child_terms.push(TimeEvolutionTerm {
                    term_coeff: -coeff,
                    exponential_coeff: lambda_c,
                });
            }
        }
    }

    // Roots in input order, then progeny parents-first.
    let progeny: Vec<usize> = order
        .into_iter()
        .filter(|index| !amounts.contains_key(index))
        .collect();
    roots
        .into_iter()
        .chain(progeny)
        .map(|index| {
            let mut evolution_terms = terms.remove(&index).unwrap_or_default();
            merge_terms(&mut evolution_terms);
            NuclideTimeEvolution {
                nuclide: &nuclides[index],
                evolution_terms,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use decay_types::DecayMode;

    fn nuclide(symbol: &str, half_life: f64, children: Vec<usize>) -> Nuclide {
        Nuclide {
            symbol: symbol.into(),
            atomic_number: 1,
            mass_number: 1,
            isomer_number: 0,
            atomic_mass: 1.0,
            half_life,
            decays_to_children: children,
            decays_from_parents: vec![],
        }
    }

    fn edge(parent: usize, child: usize, branch_ratio: f32) -> Transition {
        Transition {
            parent,
            child: Some(child),
            parent_symbol: String::new(),
            child_symbol: None,
            mode: DecayMode::Beta,
            branch_ratio,
            products: vec![],
        }
    }

    /// A (10 s) -> B (100 s) -> C (stable)
    fn chain() -> (Vec<Nuclide>, Vec<Transition>) {
        let nuclides = vec![
            nuclide("A", 10.0, vec![0]),
            nuclide("B", 100.0, vec![1]),
            nuclide("C", f64::INFINITY, vec![]),
        ];
        let transitions = vec![edge(0, 1, 1.0), edge(1, 2, 1.0)];
        (nuclides, transitions)
    }

    #[test]
    fn test_single_nuclide_halves() {
        let nuclides = vec![nuclide("B", 100.0, vec![])];
        let evo = solve(&nuclides, &[], &[(0, 1000.0)], 1e-9);
        assert_eq!(evo.len(), 1);
        assert!((evo[0].num_atoms(100.0) - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_chain_conserves_atoms() {
        let (nuclides, transitions) = chain();
        let evo = solve(&nuclides, &transitions, &[(0, 1.0e6)], 1e-9);
        assert_eq!(evo.len(), 3);
        assert_eq!(evo[0].nuclide.symbol, "A");
        assert_eq!(evo[2].nuclide.symbol, "C");
        for t in [0.0, 5.0, 50.0, 500.0, 5000.0] {
            let total: f64 = evo.iter().map(|e| e.num_atoms(t)).sum();
            assert!((total - 1.0e6).abs() < 1e-3, "t={t}: total={total}");
        }
    }

    #[test]
    fn test_two_member_bateman() {
        let (nuclides, transitions) = chain();
        let evo = solve(&nuclides, &transitions, &[(0, 1.0)], 1e-9);
        let la = std::f64::consts::LN_2 / 10.0;
        let lb = std::f64::consts::LN_2 / 100.0;
        let t = 30.0;
        let expected = la / (lb - la) * ((-la * t).exp() - (-lb * t).exp());
        assert!((evo[1].num_atoms(t) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_branching_splits_amount() {
        let nuclides = vec![
            nuclide("P", 1.0, vec![0, 1]),
            nuclide("X", f64::INFINITY, vec![]),
            nuclide("Y", f64::INFINITY, vec![]),
        ];
        let transitions = vec![edge(0, 1, 0.25), edge(0, 2, 0.75)];
        let evo = solve(&nuclides, &transitions, &[(0, 100.0)], 1e-9);
        let x = evo.iter().find(|e| e.nuclide.symbol == "X").unwrap();
        let y = evo.iter().find(|e| e.nuclide.symbol == "Y").unwrap();
        assert!((x.num_atoms(1.0e3) - 25.0).abs() < 1e-9);
        assert!((y.num_atoms(1.0e3) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_half_lives_stay_finite() {
        let nuclides = vec![
            nuclide("A", 10.0, vec![0]),
            nuclide("B", 10.0, vec![]),
        ];
        let transitions = vec![edge(0, 1, 1.0)];
        let evo = solve(&nuclides, &transitions, &[(0, 1.0)], 1e-9);
        let lambda = std::f64::consts::LN_2 / 10.0;
        let t = 10.0;
        // Exact solution for equal constants: λ t e^{-λ t}
        let expected = lambda * t * (-lambda * t).exp();
        let got = evo[1].num_atoms(t);
        assert!(got.is_finite());
        assert!((got - expected).abs() < 1e-5, "got {got}, expected {expected}");
    }

    #[test]
    fn test_duplicate_roots_are_summed() {
        let (nuclides, transitions) = chain();
        let evo = solve(&nuclides, &transitions, &[(1, 10.0), (1, 5.0)], 1e-9);
        assert_eq!(evo.len(), 2);
        assert!((evo[0].num_atoms(0.0) - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_merge_terms_folds_and_drops() {
        let mut terms = vec![
            TimeEvolutionTerm { term_coeff: 1.0, exponential_coeff: 0.5 },
            TimeEvolutionTerm { term_coeff: 2.0, exponential_coeff: 0.1 },
            TimeEvolutionTerm { term_coeff: -1.0, exponential_coeff: 0.5 },
        ];
        merge_terms(&mut terms);
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].exponential_coeff, 0.1);
    }

    #[test]
    fn test_roots_come_out_in_input_order() {
        let (nuclides, transitions) = chain();
        let evo = solve(&nuclides, &transitions, &[(1, 1.0), (0, 1.0)], 1e-9);
        let symbols: Vec<&str> = evo.iter().map(|e| e.nuclide.symbol.as_str()).collect();
        assert_eq!(symbols, ["B", "A", "C"]);
        // B still receives A's in-growth.
        assert!(evo[0].num_atoms(20.0) > 1.0 * 0.5f64.powf(0.2));
    }

    #[test]
    fn test_topological_order_parents_first() {
        let (nuclides, transitions) = chain();
        assert_eq!(topological_order(&nuclides, &transitions, &[1, 0]), vec![0, 1, 2]);
        assert_eq!(topological_order(&nuclides, &transitions, &[2]), vec![2]);
    }
}
