// [libs/core/order/src/errors.rs]
//! =================================================================
//! APARATO: ORDER ENGINE ERRORS (V9.1)
//! RESPONSABILIDAD: CATALOGACIÓN DE FALLOS DE CODIFICACIÓN
//! =================================================================

use thiserror::Error;

/// Fallos del codec ELEN. Los mensajes devuelven siempre el búfer
/// original que provocó el fallo.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElenError {
    #[error("EMPTY_INPUT: nothing to decode")]
    Empty,

    #[error("BAD_PREFIX: symbol {prefix:?} is neither the positive nor the negative symbol in {input:?}")]
    BadPrefix { prefix: char, input: String },

    #[error("MALFORMED_INPUT: {0:?}")]
    Malformed(String),

    #[error("MISMATCHED_AFFIXES: prefix and postfix disagree in {0:?}")]
    MismatchedAffixes(String),

    #[error("VALUE_OVERFLOW: decoded magnitude does not fit the target type in {0:?}")]
    Overflow(String),
}

/// Fallos del codec de claves (sujeto, predicado) ↔ bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("EMPTY_FIELD: {0} must not be empty")]
    EmptyField(&'static str),

    #[error("TRUNCATED_KEY: {actual} bytes cannot hold the declared field lengths ({declared})")]
    Truncated { actual: usize, declared: usize },
}
