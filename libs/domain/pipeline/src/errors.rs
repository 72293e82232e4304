// [libs/domain/pipeline/src/errors.rs]
//! =================================================================
//! APARATO: PIPELINE ERRORS (V10.0)
//! RESPONSABILIDAD: TAXONOMÍA DE FALLOS DE LA SESIÓN
//!
//! Clases del contrato: Argument (inmediato, sin tocar colas),
//! Capacity (recuperado por el empaquetador), Codec (paquete caído,
//! ranuras en error), Transport (destino caído, el resto sigue),
//! Datastore (por ranura) y Config (open fatal).
//! =================================================================

use thiserror::Error;

use triplex_domain_routing::RoutingError;
use triplex_infra_datastore::DatastoreError;
use triplex_infra_transport::TransportError;
use triplex_infra_wire::WireError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("ARGUMENT_FAULT: {0}")]
    Argument(String),

    #[error("SESSION_HALTED: the running flag is down")]
    NotRunning,

    #[error("CONFIG_FAULT: {0}")]
    Config(String),

    #[error("ROUTING_FAULT: {0}")]
    Routing(#[from] RoutingError),

    #[error("CODEC_FAULT: {0}")]
    Wire(#[from] WireError),

    #[error("TRANSPORT_FAULT: {0}")]
    Transport(#[from] TransportError),

    #[error("DATASTORE_FAULT: {0}")]
    Datastore(#[from] DatastoreError),
}
