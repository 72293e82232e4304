// [libs/domain/models/src/errors.rs]
//! =================================================================
//! APARATO: DOMAIN MODEL ERRORS (V8.0)
//! RESPONSABILIDAD: CATALOGACIÓN DE FALLOS DE VOCABULARIO
//! =================================================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("UNKNOWN_DATA_TYPE: wire tag {0} is not in the catalog")]
    UnknownDataType(u8),

    #[error("UNKNOWN_DIRECTION: wire tag {0} is neither REQUEST nor RESPONSE")]
    UnknownDirection(u8),

    #[error("UNKNOWN_OPERATION: wire tag {0} is not in the catalog")]
    UnknownOperation(u8),

    #[error("UNKNOWN_GETOP_KIND: wire tag {0} is not in the catalog")]
    UnknownGetOpKind(u8),

    #[error("UNKNOWN_STATUS: wire value {0} is neither SUCCESS nor ERROR")]
    UnknownStatus(i32),
}
