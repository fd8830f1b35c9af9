// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for every failure the decay collaborator reports.
///
/// Each variant renders a human-readable message through `Display`,
/// which is what a captured failure shows at the boundary.
#[derive(Error, Debug)]
pub enum DecayError {
    /// Database content is inconsistent (dangling references, duplicates).
    #[error("database error: {0}")]
    Database(String),

    /// Reading the database source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database source is not well-formed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Requested nuclide is unknown to the database or absent from a mixture.
    #[error("nuclide not found: {0}")]
    NuclideNotFound(String),

    /// Invalid input (amounts, ages, time slices).
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Numerical error (NaN/Inf in computation).
    #[error("numerical error: {0}")]
    Numerical(String),

    /// Raw enum value received across the boundary has no matching variant.
    #[error("unknown {kind} discriminant: {value}")]
    UnknownDiscriminant { kind: &'static str, value: i32 },
}

pub type DecayResult<T> = Result<T, DecayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_prefixed() {
        let err = DecayError::NuclideNotFound("Xx999".into());
        assert_eq!(err.to_string(), "nuclide not found: Xx999");
        let err = DecayError::UnknownDiscriminant {
            kind: "HowToOrder",
            value: 7,
        };
        assert_eq!(err.to_string(), "unknown HowToOrder discriminant: 7");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: DecayError = io.into();
        assert!(matches!(err, DecayError::Io(_)));
        assert!(err.to_string().contains("missing.json"));
    }
}
