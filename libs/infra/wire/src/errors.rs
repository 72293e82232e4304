// [libs/infra/wire/src/errors.rs]
//! =================================================================
//! APARATO: WIRE CODEC ERRORS (V9.0)
//! RESPONSABILIDAD: CATALOGACIÓN DE FALLOS DE TRAMA
//! =================================================================

use thiserror::Error;

use triplex_domain_models::ModelError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WireError {
    #[error("TRUNCATED_FRAME: needed {needed} bytes, only {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("UNKNOWN_TAG: {0}")]
    UnknownTag(#[from] ModelError),

    #[error("COUNT_OVERFLOW: frame declares {declared} ops, maximum is {maximum}")]
    CountOverflow { declared: usize, maximum: usize },

    #[error("PACKET_FULL: {capacity} slots already filled")]
    PacketFull { capacity: usize },

    #[error("DIRECTION_MISMATCH: expected a {expected} frame")]
    DirectionMismatch { expected: &'static str },
}
