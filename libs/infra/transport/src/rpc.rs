// [libs/infra/transport/src/rpc.rs]
/*!
 * =================================================================
 * APARATO: USERSPACE RPC BACKEND (V13.1 - NAMED PROCEDURE)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3-TRANSPORT)
 * RESPONSABILIDAD: PROCEDIMIENTO REMOTO BYTES → BYTES POR SERVIDOR
 *
 * Cada servidor expone un único procedimiento nominal
 * (POST /rpc/exchange) que toma una ráfaga de bytes y devuelve otra.
 * El anuncio de arranque (POST /rpc/announce) juega el papel del
 * allgather de una ronda; tras él, el núcleo conserva el mapa
 * rango → endpoint y llama al procedimiento del par que corresponda.
 * =================================================================
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use axum::Router;
use tokio::sync::{mpsc, Mutex, Notify};
use tracing::{debug, warn};

use crate::barrier::BarrierLedger;
use crate::errors::TransportError;
use crate::world::{AnnounceEnvelope, World};
use crate::InboundExchange;

/// Capacidad del canal de entrada hacia el bucle del servidor.
const INBOUND_CHANNEL_CAPACITY: usize = 64;

/// Cadencia de reintento del anuncio de arranque.
const ANNOUNCE_RETRY_MILLIS: u64 = 100;
/// Reintentos de anuncio antes de declarar al par ausente.
const ANNOUNCE_MAX_ATTEMPTS: usize = 300;

struct RpcServerState {
    inbound_sender: mpsc::Sender<InboundExchange>,
    barrier: Arc<BarrierLedger>,
}

/// Malla RPC del mundo: servidor axum propio + cliente reqwest.
pub struct RpcMesh {
    world: World,
    running: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    client: reqwest::Client,
    send_locks: Vec<Mutex<()>>,
    barrier: Arc<BarrierLedger>,
}

impl RpcMesh {
    /**
     * Liga el endpoint propio del censo y publica los procedimientos
     * nominales. Devuelve la malla y el canal de peticiones entrantes.
     */
    pub async fn bind(
        world: World,
        running: Arc<AtomicBool>,
    ) -> Result<(Self, mpsc::Receiver<InboundExchange>), TransportError> {
        let (inbound_sender, inbound_receiver) = mpsc::channel(INBOUND_CHANNEL_CAPACITY);
        let barrier = Arc::new(BarrierLedger::new(world.size()));
        let shutdown = Arc::new(Notify::new());

        let state = Arc::new(RpcServerState {
            inbound_sender,
            barrier: Arc::clone(&barrier),
        });

        let router = Router::new()
            .route("/rpc/exchange", post(exchange_procedure))
            .route("/rpc/barrier", post(barrier_procedure))
            .route("/rpc/announce", post(announce_procedure))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind(world.own_address())
            .await
            .map_err(|fault| TransportError::BindFault {
                address: world.own_address().to_string(),
                detail: fault.to_string(),
            })?;

        debug!("📡 [RPC_MESH]: Rank {} serving at [{}]", world.rank(), world.own_address());

        let shutdown_signal = Arc::clone(&shutdown);
        tokio::spawn(async move {
            let serve_outcome = axum::serve(listener, router)
                .with_graceful_shutdown(async move { shutdown_signal.notified().await })
                .await;
            if let Err(serve_fault) = serve_outcome {
                warn!("⚠️ [RPC_MESH]: Server loop ended with fault: {}", serve_fault);
            }
        });

        let client = reqwest::Client::builder()
            .build()
            .map_err(|fault| TransportError::BindFault {
                address: world.own_address().to_string(),
                detail: fault.to_string(),
            })?;

        let send_locks = (0..world.size()).map(|_| Mutex::new(())).collect();

        Ok((
            Self { world, running, shutdown, client, send_locks, barrier },
            inbound_receiver,
        ))
    }

    fn ensure_running(&self) -> Result<(), TransportError> {
        if !self.running.load(Ordering::SeqCst) {
            return Err(TransportError::Cancelled);
        }
        Ok(())
    }

    async fn call(
        &self,
        dst_rank: usize,
        procedure: &str,
        material: Vec<u8>,
    ) -> Result<Vec<u8>, TransportError> {
        self.ensure_running()?;

        let lock = self
            .send_locks
            .get(dst_rank)
            .ok_or(TransportError::RankOutOfRoster {
                rank: dst_rank,
                roster_size: self.send_locks.len(),
            })?;

        // orden por (origen, destino): un procedimiento en vuelo por par
        let _ordering_guard = lock.lock().await;

        let url = format!("http://{}/rpc/{}", self.world.address_of(dst_rank)?, procedure);
        let response = self
            .client
            .post(&url)
            .body(material)
            .send()
            .await
            .map_err(|fault| TransportError::LinkFault {
                rank: dst_rank,
                detail: fault.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TransportError::PeerRejection {
                rank: dst_rank,
                status: response.status().to_string(),
            });
        }

        let reply = response.bytes().await.map_err(|fault| TransportError::LinkFault {
            rank: dst_rank,
            detail: fault.to_string(),
        })?;

        Ok(reply.to_vec())
    }

    /// Intercambio completo con un par: procedimiento nominal único.
    pub async fn exchange(
        &self,
        dst_rank: usize,
        material: Vec<u8>,
    ) -> Result<Vec<u8>, TransportError> {
        self.call(dst_rank, "exchange", material).await
    }

    /// Anuncio de arranque: confirma la presencia de cada par del censo.
    pub async fn announce(&self) -> Result<(), TransportError> {
        let envelope = AnnounceEnvelope {
            rank: self.world.rank(),
            address: self.world.own_address().to_string(),
        };
        let material = bincode::serialize(&envelope)
            .expect("announce envelope always serializes");

        for peer in self.world.endpoints() {
            if peer.rank == self.world.rank() {
                continue;
            }

            let mut confirmed = false;
            for _ in 0..ANNOUNCE_MAX_ATTEMPTS {
                self.ensure_running()?;
                match self.call(peer.rank, "announce", material.clone()).await {
                    Ok(_) => {
                        confirmed = true;
                        break;
                    }
                    Err(TransportError::Cancelled) => return Err(TransportError::Cancelled),
                    Err(_) => {
                        tokio::time::sleep(std::time::Duration::from_millis(
                            ANNOUNCE_RETRY_MILLIS,
                        ))
                        .await;
                    }
                }
            }

            if !confirmed {
                return Err(TransportError::AnnounceTimeout { rank: peer.rank });
            }
        }

        debug!("📡 [RPC_MESH]: Roster confirmed for rank {}.", self.world.rank());
        Ok(())
    }

    /// Barrera colectiva anclada en el rango 0.
    pub async fn barrier(&self) -> Result<(), TransportError> {
        if self.world.size() == 1 {
            return Ok(());
        }

        if self.world.rank() == 0 {
            self.barrier
                .arrive()
                .await
                .map_err(|_| TransportError::Cancelled)?;
            return Ok(());
        }

        self.call(0, "barrier", Vec::new()).await.map(|_| ())
    }

    /// Despierta el servidor axum para el apagado.
    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }
}

async fn exchange_procedure(
    State(state): State<Arc<RpcServerState>>,
    body: Bytes,
) -> Vec<u8> {
    let (reply_sender, reply_receiver) = tokio::sync::oneshot::channel();
    let delivery = state
        .inbound_sender
        .send(InboundExchange { material: body.to_vec(), reply: reply_sender })
        .await;

    match delivery {
        Ok(()) => reply_receiver.await.unwrap_or_default(),
        Err(_) => Vec::new(),
    }
}

async fn barrier_procedure(State(state): State<Arc<RpcServerState>>) -> Vec<u8> {
    let _ = state.barrier.arrive().await;
    Vec::new()
}

async fn announce_procedure(
    State(_state): State<Arc<RpcServerState>>,
    body: Bytes,
) -> Vec<u8> {
    match bincode::deserialize::<AnnounceEnvelope>(&body) {
        Ok(envelope) => {
            debug!("📡 [RPC_MESH]: Announce from rank {}.", envelope.rank);
        }
        Err(decode_fault) => {
            warn!("⚠️ [RPC_MESH]: Malformed announce: {}", decode_fault);
        }
    }
    Vec::new()
}
