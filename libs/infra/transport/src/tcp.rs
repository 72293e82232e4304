// [libs/infra/transport/src/tcp.rs]
/*!
 * =================================================================
 * APARATO: TCP MESH BACKEND (V13.0 - TWO PHASE EXCHANGE)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3-TRANSPORT)
 * RESPONSABILIDAD: INTERCAMBIO TAMAÑO+CUERPO ENTRE PARES DEL CENSO
 *
 * Cada intercambio es bloqueante por naturaleza (tamaño, luego
 * cuerpo, luego la respuesta en el mismo orden) pero todos los bucles
 * de lectura observan la señal de apagado, de modo que el cierre de
 * sesión es inmediato. Un cerrojo por destino serializa los envíos a
 * cada par y preserva el orden por (origen, destino).
 * =================================================================
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex, Notify};
use tracing::{debug, warn};

use crate::barrier::BarrierLedger;
use crate::errors::TransportError;
use crate::world::{AnnounceEnvelope, World};
use crate::InboundExchange;

/// Clases de trama del protocolo punto a punto.
const FRAME_EXCHANGE: u8 = 1;
const FRAME_BARRIER: u8 = 2;
const FRAME_ANNOUNCE: u8 = 3;

/// Techo de trama entrante: corta deserializaciones hostiles.
const MAX_FRAME_BYTES: u64 = 64 * 1024 * 1024;

/// Capacidad del canal de entrada hacia el bucle del servidor.
const INBOUND_CHANNEL_CAPACITY: usize = 64;

/// Cadencia de reintento del anuncio de arranque.
const ANNOUNCE_RETRY_MILLIS: u64 = 100;
/// Reintentos de anuncio antes de declarar al par ausente.
const ANNOUNCE_MAX_ATTEMPTS: usize = 300;

/// Malla TCP del mundo: un enlace perezoso por destino.
pub struct TcpMesh {
    world: World,
    running: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    links: Vec<Mutex<Option<TcpStream>>>,
    barrier: Arc<BarrierLedger>,
}

impl TcpMesh {
    /**
     * Liga el puerto propio del censo y arranca el bucle de
     * aceptación. Devuelve la malla y el canal de peticiones
     * entrantes que consume el bucle del servidor de rango.
     */
    pub async fn bind(
        world: World,
        running: Arc<AtomicBool>,
    ) -> Result<(Self, mpsc::Receiver<InboundExchange>), TransportError> {
        let listener = TcpListener::bind(world.own_address())
            .await
            .map_err(|fault| TransportError::BindFault {
                address: world.own_address().to_string(),
                detail: fault.to_string(),
            })?;

        let (inbound_sender, inbound_receiver) = mpsc::channel(INBOUND_CHANNEL_CAPACITY);
        let shutdown = Arc::new(Notify::new());
        let barrier = Arc::new(BarrierLedger::new(world.size()));

        debug!("🔗 [TCP_MESH]: Rank {} listening at [{}]", world.rank(), world.own_address());

        tokio::spawn(accept_loop(
            listener,
            inbound_sender,
            Arc::clone(&barrier),
            Arc::clone(&shutdown),
            Arc::clone(&running),
        ));

        let links = (0..world.size()).map(|_| Mutex::new(None)).collect();

        Ok((
            Self { world, running, shutdown, links, barrier },
            inbound_receiver,
        ))
    }

    fn ensure_running(&self) -> Result<(), TransportError> {
        if !self.running.load(Ordering::SeqCst) {
            return Err(TransportError::Cancelled);
        }
        Ok(())
    }

    /// Intercambio completo con un par: trama fuera, respuesta dentro.
    pub async fn exchange(
        &self,
        dst_rank: usize,
        material: Vec<u8>,
    ) -> Result<Vec<u8>, TransportError> {
        self.request(dst_rank, FRAME_EXCHANGE, material).await
    }

    async fn request(
        &self,
        dst_rank: usize,
        kind: u8,
        material: Vec<u8>,
    ) -> Result<Vec<u8>, TransportError> {
        self.ensure_running()?;

        let link_slot = self
            .links
            .get(dst_rank)
            .ok_or(TransportError::RankOutOfRoster {
                rank: dst_rank,
                roster_size: self.links.len(),
            })?;

        // el cerrojo por destino serializa los envíos a ese par
        let mut link = link_slot.lock().await;

        if link.is_none() {
            let address = self.world.address_of(dst_rank)?;
            let stream = TcpStream::connect(address).await.map_err(|fault| {
                TransportError::LinkFault { rank: dst_rank, detail: fault.to_string() }
            })?;
            *link = Some(stream);
        }

        let stream = link.as_mut().expect("link dialed above");
        let outcome = full_exchange(stream, kind, &material).await;
        if outcome.is_err() {
            // un enlace fallido se descarta; el siguiente envío re-marca
            *link = None;
        }

        outcome.map_err(|fault| TransportError::LinkFault {
            rank: dst_rank,
            detail: fault.to_string(),
        })
    }

    /**
     * Anuncio de arranque: una ronda allgather que confirma que cada
     * par del censo escucha en su dirección. Reintenta con cadencia
     * fija hasta la confirmación o la cancelación de la sesión.
     */
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
                match self.request(peer.rank, FRAME_ANNOUNCE, material.clone()).await {
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

        debug!("🔗 [TCP_MESH]: Roster confirmed for rank {}.", self.world.rank());
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

        self.request(0, FRAME_BARRIER, Vec::new()).await.map(|_| ())
    }

    /// Despierta todos los bucles de la malla para el apagado.
    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }
}

async fn full_exchange(
    stream: &mut TcpStream,
    kind: u8,
    material: &[u8],
) -> std::io::Result<Vec<u8>> {
    stream.write_u8(kind).await?;
    stream.write_u64_le(material.len() as u64).await?;
    stream.write_all(material).await?;
    stream.flush().await?;

    let reply_len = stream.read_u64_le().await?;
    if reply_len > MAX_FRAME_BYTES {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "reply frame exceeds the size ceiling",
        ));
    }

    let mut reply = vec![0u8; reply_len as usize];
    stream.read_exact(&mut reply).await?;
    Ok(reply)
}

async fn accept_loop(
    listener: TcpListener,
    inbound_sender: mpsc::Sender<InboundExchange>,
    barrier: Arc<BarrierLedger>,
    shutdown: Arc<Notify>,
    running: Arc<AtomicBool>,
) {
    loop {
        tokio::select! {
            _ = shutdown.notified() => break,
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer_address)) => {
                        debug!("🔗 [TCP_MESH]: Link accepted from [{}]", peer_address);
                        tokio::spawn(serve_link(
                            stream,
                            inbound_sender.clone(),
                            Arc::clone(&barrier),
                            Arc::clone(&shutdown),
                            Arc::clone(&running),
                        ));
                    }
                    Err(accept_fault) => {
                        warn!("⚠️ [TCP_MESH]: Accept fault: {}", accept_fault);
                    }
                }
            }
        }
    }
}

async fn serve_link(
    mut stream: TcpStream,
    inbound_sender: mpsc::Sender<InboundExchange>,
    barrier: Arc<BarrierLedger>,
    shutdown: Arc<Notify>,
    running: Arc<AtomicBool>,
) {
    loop {
        if !running.load(Ordering::SeqCst) {
            break;
        }

        let frame = tokio::select! {
            _ = shutdown.notified() => break,
            frame = read_frame(&mut stream) => frame,
        };

        let (kind, material) = match frame {
            Ok(frame) => frame,
            // el par colgó o envió material inválido: el enlace muere
            Err(_) => break,
        };

        let reply = match kind {
            FRAME_EXCHANGE => {
                let (reply_sender, reply_receiver) = tokio::sync::oneshot::channel();
                let delivery = inbound_sender
                    .send(InboundExchange { material, reply: reply_sender })
                    .await;

                match delivery {
                    Ok(()) => reply_receiver.await.unwrap_or_default(),
                    Err(_) => Vec::new(),
                }
            }
            FRAME_BARRIER => {
                let _ = barrier.arrive().await;
                Vec::new()
            }
            FRAME_ANNOUNCE => {
                match bincode::deserialize::<AnnounceEnvelope>(&material) {
                    Ok(envelope) => {
                        debug!("🔗 [TCP_MESH]: Announce from rank {}.", envelope.rank);
                    }
                    Err(decode_fault) => {
                        warn!("⚠️ [TCP_MESH]: Malformed announce: {}", decode_fault);
                    }
                }
                Vec::new()
            }
            unknown => {
                warn!("⚠️ [TCP_MESH]: Unknown frame kind {}. Link dropped.", unknown);
                break;
            }
        };

        let written = async {
            stream.write_u64_le(reply.len() as u64).await?;
            stream.write_all(&reply).await?;
            stream.flush().await
        }
        .await;

        if written.is_err() {
            break;
        }
    }
}

async fn read_frame(stream: &mut TcpStream) -> std::io::Result<(u8, Vec<u8>)> {
    let kind = stream.read_u8().await?;
    let len = stream.read_u64_le().await?;
    if len > MAX_FRAME_BYTES {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "frame exceeds the size ceiling",
        ));
    }

    let mut material = vec![0u8; len as usize];
    stream.read_exact(&mut material).await?;
    Ok((kind, material))
}
