// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Transitions and Emitted Particles
// ─────────────────────────────────────────────────────────────────────

use decay_types::{DecayMode, ForbiddennessType, ProductType};

use crate::pairs::CoincidencePair;

/// A particle emitted by a transition.
#[derive(Debug, Clone, PartialEq)]
pub struct RadParticle {
    pub kind: ProductType,
    /// keV. For beta-like particles this is the end-point energy.
    pub energy: f32,
    /// Emissions per decay through the owning transition.
    pub intensity: f32,
    /// Alpha hindrance factor, 0 when not applicable.
    pub hindrance: f32,
    /// log ft of beta-like decays, 0 when not applicable.
    pub log_ft: f32,
    pub forbiddenness: ForbiddennessType,
    pub coincidences: Vec<CoincidencePair>,
}

impl RadParticle {
    pub fn human_str_summary(&self) -> String {
        let mut s = format!(
            "{} of {} keV, intensity {}",
            self.kind, self.energy, self.intensity
        );
        if self.forbiddenness != ForbiddennessType::NoForbiddenness {
            s.push_str(&format!(", {}", self.forbiddenness));
        }
        if self.hindrance > 0.0 {
            s.push_str(&format!(", hindrance {}", self.hindrance));
        }
        if self.log_ft > 0.0 {
            s.push_str(&format!(", log ft {}", self.log_ft));
        }
        if !self.coincidences.is_empty() {
            s.push_str(&format!(", {} coincidence(s)", self.coincidences.len()));
        }
        s
    }
}

/// One decay channel from a parent to an optional child nuclide.
///
/// `parent` and `child` index into `Database::nuclides()`; the symbols are
/// kept alongside so a transition can describe itself on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub parent: usize,
    pub child: Option<usize>,
    pub parent_symbol: String,
    pub child_symbol: Option<String>,
    pub mode: DecayMode,
    /// Fraction of parent decays taking this channel.
    pub branch_ratio: f32,
    pub products: Vec<RadParticle>,
}

impl Transition {
    pub fn human_str_summary(&self) -> String {
        let child = self.child_symbol.as_deref().unwrap_or("nothing");
        let mut s = format!(
            "{} -> {} via {} (branch ratio {})",
            self.parent_symbol, child, self.mode, self.branch_ratio
        );
        for particle in &self.products {
            s.push_str("\n  ");
            s.push_str(&particle.human_str_summary());
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gamma(energy: f32) -> RadParticle {
        RadParticle {
            kind: ProductType::GammaParticle,
            energy,
            intensity: 0.9,
            hindrance: 0.0,
            log_ft: 0.0,
            forbiddenness: ForbiddennessType::NoForbiddenness,
            coincidences: vec![],
        }
    }

    #[test]
    fn test_particle_summary() {
        let s = gamma(661.657).human_str_summary();
        assert_eq!(s, "GammaParticle of 661.657 keV, intensity 0.9");
    }

    #[test]
    fn test_particle_summary_forbidden() {
        let p = RadParticle {
            kind: ProductType::BetaParticle,
            forbiddenness: ForbiddennessType::FirstUniqueForbidden,
            ..gamma(514.0)
        };
        assert!(p.human_str_summary().contains("FirstUniqueForbidden"));
    }

    #[test]
    fn test_transition_summary_lists_products() {
        let t = Transition {
            parent: 0,
            child: Some(1),
            parent_symbol: "Ba137m".into(),
            child_symbol: Some("Ba137".into()),
            mode: DecayMode::IsometricTransition,
            branch_ratio: 1.0,
            products: vec![gamma(661.657)],
        };
        let s = t.human_str_summary();
        assert!(s.starts_with("Ba137m -> Ba137 via IsometricTransition"));
        assert_eq!(s.lines().count(), 2);
    }

    #[test]
    fn test_transition_summary_without_child() {
        let t = Transition {
            parent: 0,
            child: None,
            parent_symbol: "Np237".into(),
            child_symbol: None,
            mode: DecayMode::Alpha,
            branch_ratio: 1.0,
            products: vec![],
        };
        assert_eq!(t.human_str_summary(), "Np237 -> nothing via Alpha (branch ratio 1)");
    }
}
