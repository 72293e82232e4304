// [libs/infra/wire/src/lib.rs]
/*!
 * =================================================================
 * APARATO: WIRE FORMAT INFRASTRUCTURE (V14.0 - GOLD MASTER)
 * CLASIFICACIÓN: INFRASTRUCTURE CODEC (ESTRATO L3-WIRE)
 * RESPONSABILIDAD: FORMATO ÚNICO DE MENSAJE PARA TODO TRANSPORTE
 *
 * Un solo árbol de mensajes sirve a ambos backends: los paquetes de
 * petición/respuesta acotados, el empaquetador de cabecera fija y el
 * desempaquetador total sobre entradas bien formadas. El transporte
 * sólo ve ráfagas de bytes autodescritas.
 * =================================================================
 */

pub mod frame;
pub mod packer;
pub mod requests;
pub mod responses;
pub mod unpacker;

mod errors;

pub use errors::WireError;
pub use frame::BlobRef;
pub use packer::{pack_request, pack_response, HEADER_BYTES};
pub use requests::{
    DeleteRequest, GetOpRequest, GetRequest, HistogramRequest, PutRequest, RequestPacket,
    SyncRequest,
};
pub use responses::{
    DeleteResponse, GetOpResponse, GetResponse, HistogramResponse, PutResponse,
    ResponsePacket, SyncResponse,
};
pub use unpacker::{unpack_request, unpack_response};
