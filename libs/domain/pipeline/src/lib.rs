// [libs/domain/pipeline/src/lib.rs]
/*!
 * =================================================================
 * APARATO: PIPELINE DOMAIN (V16.0 - GOLD MASTER)
 * CLASIFICACIÓN: DOMAIN LAYER (ESTRATO L2-PIPELINE)
 * RESPONSABILIDAD: NÚCLEO DE SESIÓN DEL TRIPLESTORE DISTRIBUIDO
 *
 * VISION HIPER-HOLÍSTICA:
 * Este estrato es la tubería completa del sistema: las colas de
 * operaciones pendientes, el barajador con su empaquetador, el motor
 * de flush con despacho local y remoto, el worker de PUTs en segundo
 * plano, el bucle del servidor de rango y el contenedor de
 * resultados que el llamante recorre.
 * =================================================================
 */

pub mod config;
pub mod queues;
pub mod rangeserver;
pub mod results;
pub mod session;
pub mod shuffle;
pub mod stats;

mod errors;
mod worker;

pub use config::{DebugLevel, PoolAdvisory, PoolOptions, SessionOptions, TransportSelector};
pub use errors::PipelineError;
pub use results::{ResultRecord, Results};
pub use session::Session;
pub use stats::StatsSheet;

// re-exportes de conveniencia del vocabulario que la API pública usa
pub use triplex_domain_models::{Blob, DataType, GetOpKind, PutPermutation, Status};
pub use triplex_domain_routing::HashFunction;
pub use triplex_infra_datastore::EngineSelector;
pub use triplex_infra_transport::PeerEndpoint;
