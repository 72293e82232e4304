// [libs/core/histogram/src/errors.rs]
//! =================================================================
//! APARATO: HISTOGRAM ERRORS (V8.2)
//! RESPONSABILIDAD: CATALOGACIÓN DE FALLOS DE LA FACILIDAD
//! =================================================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistogramError {
    #[error("UNKNOWN_GENERATOR: bucket rule {0:?} is not in the stock set")]
    UnknownGenerator(String),

    #[error("NO_SAMPLES: stock rules need at least one sample")]
    NoSamples,

    #[error("DEGENERATE_BUCKETS: computed bin count {0} is not a positive finite number")]
    DegenerateBuckets(f64),

    #[error("NOT_READY: buckets have not been generated yet")]
    NotReady,
}
