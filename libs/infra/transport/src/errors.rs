// [libs/infra/transport/src/errors.rs]
//! =================================================================
//! APARATO: TRANSPORT ERRORS (V9.0)
//! RESPONSABILIDAD: CATALOGACIÓN DE FALLOS DE LA MALLA
//! =================================================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("RANK_OUT_OF_ROSTER: rank {rank} absent from a roster of {roster_size}")]
    RankOutOfRoster { rank: usize, roster_size: usize },

    #[error("NO_NETWORK_SURFACE: a single-process world has no peers to dial")]
    NoNetworkSurface,

    #[error("LINK_FAULT to rank {rank}: {detail}")]
    LinkFault { rank: usize, detail: String },

    #[error("BIND_FAULT at [{address}]: {detail}")]
    BindFault { address: String, detail: String },

    #[error("FRAME_OVERSIZE: {declared} bytes exceeds the {maximum} byte ceiling")]
    FrameOversize { declared: u64, maximum: u64 },

    #[error("SESSION_CANCELLED: the running flag was cleared")]
    Cancelled,

    #[error("PEER_REJECTION: rank {rank} answered {status}")]
    PeerRejection { rank: usize, status: String },

    #[error("ANNOUNCE_TIMEOUT: rank {rank} never confirmed its roster address")]
    AnnounceTimeout { rank: usize },
}
