// [libs/infra/transport/src/lib.rs]
/*!
 * =================================================================
 * APARATO: TRANSPORT INFRASTRUCTURE (V13.0 - GOLD MASTER)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3-TRANSPORT)
 * RESPONSABILIDAD: MOVER RÁFAGAS AUTODESCRITAS ENTRE RANGOS
 *
 * VISION HIPER-HOLÍSTICA:
 * Un contrato, dos backends: la malla TCP de dos fases y el RPC de
 * espacio de usuario. El llamante garantiza que el destino es un
 * servidor válido; el transporte garantiza orden por par
 * (origen, destino) y cancelación pronta vía la bandera de sesión.
 * El destino local nunca toca un backend: el despacho en proceso lo
 * resuelve el bucle del servidor de rango.
 * =================================================================
 */

pub mod barrier;
pub mod rpc;
pub mod tcp;
pub mod world;

mod errors;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

pub use errors::TransportError;
pub use rpc::RpcMesh;
pub use tcp::TcpMesh;
pub use world::{AnnounceEnvelope, PeerEndpoint, World};

/// Petición entrante entregada al bucle del servidor de rango: la
/// ráfaga recibida y el canal de un solo uso para la respuesta.
pub struct InboundExchange {
    pub material: Vec<u8>,
    pub reply: oneshot::Sender<Vec<u8>>,
}

/// Backend activo de la sesión.
pub enum Transport {
    /// Mundo de un proceso: sin superficie de red.
    Local,
    Tcp(TcpMesh),
    Rpc(RpcMesh),
}

impl Transport {
    /// Canal de entrada vacío para el mundo local: el bucle del
    /// servidor sólo recibirá despachos en proceso.
    pub fn local() -> (Self, mpsc::Receiver<InboundExchange>) {
        let (_sender, receiver) = mpsc::channel(1);
        (Self::Local, receiver)
    }

    pub async fn bind_tcp(
        world: World,
        running: Arc<AtomicBool>,
    ) -> Result<(Self, mpsc::Receiver<InboundExchange>), TransportError> {
        let (mesh, inbound) = TcpMesh::bind(world, running).await?;
        Ok((Self::Tcp(mesh), inbound))
    }

    pub async fn bind_rpc(
        world: World,
        running: Arc<AtomicBool>,
    ) -> Result<(Self, mpsc::Receiver<InboundExchange>), TransportError> {
        let (mesh, inbound) = RpcMesh::bind(world, running).await?;
        Ok((Self::Rpc(mesh), inbound))
    }

    /**
     * Envía una ráfaga empaquetada al rango destino y espera su
     * respuesta. El llamante garantiza que dst_rank es un servidor.
     */
    pub async fn exchange(
        &self,
        dst_rank: usize,
        material: Vec<u8>,
    ) -> Result<Vec<u8>, TransportError> {
        match self {
            Self::Local => Err(TransportError::NoNetworkSurface),
            Self::Tcp(mesh) => mesh.exchange(dst_rank, material).await,
            Self::Rpc(mesh) => mesh.exchange(dst_rank, material).await,
        }
    }

    /// Ronda de anuncio del arranque (no-op en el mundo local).
    pub async fn announce(&self) -> Result<(), TransportError> {
        match self {
            Self::Local => Ok(()),
            Self::Tcp(mesh) => mesh.announce().await,
            Self::Rpc(mesh) => mesh.announce().await,
        }
    }

    /// Barrera colectiva del mundo (no-op en el mundo local).
    pub async fn barrier(&self) -> Result<(), TransportError> {
        match self {
            Self::Local => Ok(()),
            Self::Tcp(mesh) => mesh.barrier().await,
            Self::Rpc(mesh) => mesh.barrier().await,
        }
    }

    /// Despierta los bucles de la malla para el apagado de sesión.
    pub fn shutdown(&self) {
        match self {
            Self::Local => {}
            Self::Tcp(mesh) => mesh.shutdown(),
            Self::Rpc(mesh) => mesh.shutdown(),
        }
    }
}
