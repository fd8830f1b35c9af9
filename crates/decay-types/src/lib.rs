// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Configuration, error hierarchy and shared enums for the decay
//! marshaling layer and its physics collaborator.

pub mod config;
pub mod error;
pub mod kinds;

pub use config::DecayConfig;
pub use error::{DecayError, DecayResult};
pub use kinds::{DecayMode, ForbiddennessType, HowToOrder, ProductType};
