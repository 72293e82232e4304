// [libs/infra/transport/src/world.rs]
/*!
 * =================================================================
 * APARATO: WORLD ROSTER (V12.0 - FIXED MEMBERSHIP)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3-TRANSPORT)
 * RESPONSABILIDAD: CENSO FIJO RANGO → ENDPOINT DEL MUNDO
 *
 * La membresía es fija durante la vida de la instancia: el censo se
 * conoce al arranque y el rango propio es el índice del proceso en
 * el censo. Un mundo de tamaño uno nunca toca un backend de red.
 * =================================================================
 */

use serde::{Deserialize, Serialize};

use crate::errors::TransportError;

/// Un participante del mundo: su rango y su dirección de escucha.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerEndpoint {
    pub rank: usize,
    pub address: String,
}

/// Censo completo del mundo más el rango propio del proceso.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct World {
    rank: usize,
    endpoints: Vec<PeerEndpoint>,
}

impl World {
    /**
     * Construye el mundo desde el censo de arranque.
     *
     * # Errors:
     * - `TransportError::RankOutOfRoster`: el rango propio no figura
     *   en el censo.
     */
    pub fn from_roster(rank: usize, endpoints: Vec<PeerEndpoint>) -> Result<Self, TransportError> {
        if rank >= endpoints.len() {
            return Err(TransportError::RankOutOfRoster {
                rank,
                roster_size: endpoints.len(),
            });
        }

        Ok(Self { rank, endpoints })
    }

    /// Mundo de un solo proceso, sin direcciones de red.
    pub fn single() -> Self {
        Self {
            rank: 0,
            endpoints: vec![PeerEndpoint { rank: 0, address: String::new() }],
        }
    }

    pub const fn rank(&self) -> usize {
        self.rank
    }

    pub fn size(&self) -> usize {
        self.endpoints.len()
    }

    pub fn endpoints(&self) -> &[PeerEndpoint] {
        &self.endpoints
    }

    pub fn own_address(&self) -> &str {
        &self.endpoints[self.rank].address
    }

    pub fn address_of(&self, rank: usize) -> Result<&str, TransportError> {
        self.endpoints
            .get(rank)
            .map(|peer| peer.address.as_str())
            .ok_or(TransportError::RankOutOfRoster {
                rank,
                roster_size: self.endpoints.len(),
            })
    }
}

/// Sobre de anuncio del arranque: el allgather de una sola ronda que
/// confirma la presencia de cada rango en su dirección del censo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnounceEnvelope {
    pub rank: usize,
    pub address: String,
}
