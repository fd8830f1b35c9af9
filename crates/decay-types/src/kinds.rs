// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Shared Domain Enums
// ─────────────────────────────────────────────────────────────────────
//! Enumerations shared by the collaborator and the boundary.
//!
//! All of them are `#[repr(i32)]`. A foreign caller passes the raw
//! discriminant; `TryFrom<i32>` is the only way back into the enum, so an
//! out-of-range value becomes a `DecayError` instead of an invalid enum.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DecayError, DecayResult};

macro_rules! raw_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        #[repr(i32)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value,)+
        }

        impl $name {
            /// Every variant, in discriminant order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant),)+
                }
            }
        }

        impl TryFrom<i32> for $name {
            type Error = DecayError;

            fn try_from(value: i32) -> DecayResult<Self> {
                match value {
                    $($value => Ok($name::$variant),)+
                    _ => Err(DecayError::UnknownDiscriminant {
                        kind: stringify!($name),
                        value,
                    }),
                }
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> i32 {
                value as i32
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

raw_enum! {
    /// Decay modes a transition can take.
    DecayMode {
        Alpha = 0,
        Beta = 1,
        BetaPlus = 2,
        Proton = 3,
        IsometricTransition = 4,
        BetaAndNeutron = 5,
        BetaAndTwoNeutron = 6,
        ElectronCapture = 7,
        ElectronCaptureAndProton = 8,
        ElectronCaptureAndAlpha = 9,
        ElectronCaptureAndTwoProton = 10,
        BetaAndAlpha = 11,
        BetaPlusAndProton = 12,
        BetaPlusAndTwoProton = 13,
        BetaPlusAndThreeProton = 14,
        BetaPlusAndAlpha = 15,
        DoubleBeta = 16,
        DoubleElectronCapture = 17,
        Carbon14 = 18,
        SpontaneousFission = 19,
        Cluster = 20,
        DoubleProton = 21,
        Undefined = 22,
    }
}

raw_enum! {
    /// Kind of particle emitted by a transition.
    ProductType {
        /// Electron.
        BetaParticle = 0,
        /// Nuclear de-excitation photon.
        GammaParticle = 1,
        /// Helium-4 nucleus.
        AlphaParticle = 2,
        /// Positron.
        PositronParticle = 3,
        /// Neutrino from electron capture.
        CaptureElectronParticle = 4,
        /// Atomic shell photon.
        XrayParticle = 5,
    }
}

raw_enum! {
    /// Forbiddenness of beta, positron and electron-capture decays.
    ForbiddennessType {
        NoForbiddenness = 0,
        FirstForbidden = 1,
        FirstUniqueForbidden = 2,
        SecondForbidden = 3,
        SecondUniqueForbidden = 4,
        ThirdForbidden = 5,
        ThirdUniqueForbidden = 6,
        FourthForbidden = 7,
    }
}

raw_enum! {
    /// Ordering of spectrum results.
    HowToOrder {
        /// Descending by rate or count.
        OrderByAbundance = 0,
        /// Ascending by energy.
        OrderByEnergy = 1,
    }
}

impl ProductType {
    /// Photons: gammas and x-rays.
    pub fn is_photon(self) -> bool {
        matches!(self, ProductType::GammaParticle | ProductType::XrayParticle)
    }
}

impl Default for ForbiddennessType {
    fn default() -> Self {
        ForbiddennessType::NoForbiddenness
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_every_discriminant() {
        for &mode in DecayMode::ALL {
            assert_eq!(DecayMode::try_from(i32::from(mode)).unwrap(), mode);
        }
        for &kind in ProductType::ALL {
            assert_eq!(ProductType::try_from(kind as i32).unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_discriminant() {
        let err = HowToOrder::try_from(2).unwrap_err();
        assert!(matches!(
            err,
            DecayError::UnknownDiscriminant {
                kind: "HowToOrder",
                value: 2
            }
        ));
        assert!(ProductType::try_from(-1).is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&DecayMode::BetaPlus).unwrap();
        assert_eq!(json, "\"beta_plus\"");
        let kind: ProductType = serde_json::from_str("\"xray_particle\"").unwrap();
        assert_eq!(kind, ProductType::XrayParticle);
    }

    #[test]
    fn test_display() {
        assert_eq!(DecayMode::IsometricTransition.to_string(), "IsometricTransition");
        assert_eq!(HowToOrder::OrderByEnergy.to_string(), "OrderByEnergy");
    }

    #[test]
    fn test_photon_kinds() {
        assert!(ProductType::GammaParticle.is_photon());
        assert!(ProductType::XrayParticle.is_photon());
        assert!(!ProductType::PositronParticle.is_photon());
    }
}
