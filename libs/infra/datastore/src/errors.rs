// [libs/infra/datastore/src/errors.rs]
//! =================================================================
//! APARATO: DATASTORE ERRORS (V9.2)
//! RESPONSABILIDAD: CATALOGACIÓN DE FALLOS DE ALMACENAMIENTO
//! =================================================================

use std::path::PathBuf;

use thiserror::Error;

use triplex_core_order::KeyError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatastoreError {
    #[error("UNKNOWN_ENGINE: {0:?} is not a recognized datastore selector")]
    UnknownEngine(String),

    #[error("ENGINE_UNAVAILABLE: {0} lives outside this tree")]
    EngineUnavailable(&'static str),

    #[error("IO_FAULT at [{path}]: {detail}")]
    Io { path: PathBuf, detail: String },

    #[error("STORE_CLOSED: {0} no longer accepts operations")]
    Closed(String),

    #[error("NOT_FOUND: no record under the requested key")]
    NotFound,

    #[error("MISSING_ANCHOR: this scan kind requires an anchor key")]
    MissingAnchor,

    #[error("BAD_KEY: {0}")]
    BadKey(#[from] KeyError),

    #[error("UNTRACKED_HISTOGRAM: predicate {0:?} is not tracked on this store")]
    UntrackedHistogram(String),
}
