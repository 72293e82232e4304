// [libs/domain/models/src/stamps.rs]
/*!
 * =================================================================
 * APARATO: LATENCY CHRONOSTAMPS (V9.4 - MONOTONIC)
 * CLASIFICACIÓN: DOMAIN FOUNDATION (ESTRATO L2-MODELS)
 * RESPONSABILIDAD: SELLOS DE TIEMPO POR OPERACIÓN Y POR LOTE
 * =================================================================
 */

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Sello de un intervalo medido contra la época monótona de la sesión,
/// en nanosegundos. La época se fija en `open` y nunca retrocede.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chronostamp {
    pub start_nanos: u64,
    pub end_nanos: u64,
}

impl Chronostamp {
    pub fn started(epoch: Instant) -> Self {
        Self { start_nanos: nanos_since(epoch), end_nanos: 0 }
    }

    pub fn finish(&mut self, epoch: Instant) {
        self.end_nanos = nanos_since(epoch);
    }

    pub const fn elapsed_nanos(&self) -> u64 {
        self.end_nanos.saturating_sub(self.start_nanos)
    }
}

/// Rastro completo de una operación individual a través de la tubería:
/// encolada → barajada → enviada → respondida.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendStamps {
    pub cached_nanos: u64,
    pub shuffled_nanos: u64,
    pub sent_nanos: u64,
    pub received_nanos: u64,
}

impl SendStamps {
    pub fn cached(epoch: Instant) -> Self {
        Self { cached_nanos: nanos_since(epoch), ..Self::default() }
    }

    pub fn mark_shuffled(&mut self, epoch: Instant) {
        self.shuffled_nanos = nanos_since(epoch);
    }

    pub fn mark_sent(&mut self, epoch: Instant) {
        self.sent_nanos = nanos_since(epoch);
    }

    pub fn mark_received(&mut self, epoch: Instant) {
        self.received_nanos = nanos_since(epoch);
    }

    /// Latencia total encolado→respuesta.
    pub const fn total_nanos(&self) -> u64 {
        self.received_nanos.saturating_sub(self.cached_nanos)
    }
}

fn nanos_since(epoch: Instant) -> u64 {
    epoch.elapsed().as_nanos() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_advance_monotonically_through_the_pipeline() {
        let epoch = Instant::now();
        let mut stamps = SendStamps::cached(epoch);
        stamps.mark_shuffled(epoch);
        stamps.mark_sent(epoch);
        stamps.mark_received(epoch);

        assert!(stamps.cached_nanos <= stamps.shuffled_nanos);
        assert!(stamps.shuffled_nanos <= stamps.sent_nanos);
        assert!(stamps.sent_nanos <= stamps.received_nanos);
        assert_eq!(
            stamps.total_nanos(),
            stamps.received_nanos - stamps.cached_nanos
        );
    }
}
