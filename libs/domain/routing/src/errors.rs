// [libs/domain/routing/src/errors.rs]
//! =================================================================
//! APARATO: ROUTING ERRORS (V8.3)
//! RESPONSABILIDAD: CATALOGACIÓN DE FALLOS DE ENRUTAMIENTO
//! =================================================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    #[error("ZERO_RATIO: client and server ratios must be positive")]
    ZeroRatio,

    #[error("RANK_OUT_OF_WORLD: rank {rank} does not exist in a world of {world_size}")]
    RankOutOfWorld { rank: usize, world_size: usize },

    #[error("NOT_A_RANGE_SERVER: rank {rank} holds no datastore under the configured ratios")]
    NotARangeServer { rank: usize },

    #[error("UNKNOWN_HASH: {0:?} is not in the stock set")]
    UnknownHash(String),

    #[error("HASH_OUT_OF_RANGE: id {id} outside [0, {total})")]
    HashOutOfRange { id: i64, total: usize },
}
