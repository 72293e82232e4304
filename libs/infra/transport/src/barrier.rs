// [libs/infra/transport/src/barrier.rs]
/*!
 * =================================================================
 * APARATO: COLLECTIVE BARRIER LEDGER (V10.1 - RANK ZERO ANCHORED)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3-TRANSPORT)
 * RESPONSABILIDAD: PUNTO DE ENCUENTRO COLECTIVO DEL MUNDO
 *
 * El rango 0 ancla la barrera: cada rango (el 0 incluido) registra su
 * llegada en el libro mayor y espera la liberación; cuando el número
 * de llegadas alcanza el tamaño del mundo, todas las esperas se
 * liberan a la vez y la generación se reinicia. La disciplina
 * colectiva del llamante garantiza una sola barrera en vuelo.
 * =================================================================
 */

use std::sync::Mutex;

use tokio::sync::oneshot;

/// Libro mayor de llegadas de la generación en curso.
pub struct BarrierLedger {
    world_size: usize,
    generation: Mutex<BarrierGeneration>,
}

#[derive(Default)]
struct BarrierGeneration {
    arrived: usize,
    waiters: Vec<oneshot::Sender<()>>,
}

impl BarrierLedger {
    pub fn new(world_size: usize) -> Self {
        Self { world_size, generation: Mutex::new(BarrierGeneration::default()) }
    }

    /**
     * Registra una llegada. El futuro devuelto resuelve cuando la
     * generación completa; la llegada que cierra la generación
     * libera a todas las anteriores.
     */
    pub fn arrive(&self) -> oneshot::Receiver<()> {
        let (release_sender, release_receiver) = oneshot::channel();

        let mut generation = self
            .generation
            .lock()
            .expect("barrier ledger lock never poisoned");
        generation.arrived += 1;
        generation.waiters.push(release_sender);

        if generation.arrived >= self.world_size {
            for waiter in generation.waiters.drain(..) {
                // un rango que canceló su espera no bloquea al resto
                let _ = waiter.send(());
            }
            generation.arrived = 0;
        }

        release_receiver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn the_last_arrival_releases_the_generation() {
        let ledger = BarrierLedger::new(3);

        let mut first = ledger.arrive();
        let mut second = ledger.arrive();
        assert!(first.try_recv().is_err(), "premature release");
        assert!(second.try_recv().is_err(), "premature release");

        let third = ledger.arrive();
        assert!(first.await.is_ok());
        assert!(second.await.is_ok());
        assert!(third.await.is_ok());
    }

    #[tokio::test]
    async fn generations_reset_for_the_next_collective() {
        let ledger = BarrierLedger::new(2);

        let first = ledger.arrive();
        let second = ledger.arrive();
        assert!(first.await.is_ok());
        assert!(second.await.is_ok());

        // segunda generación limpia
        let mut third = ledger.arrive();
        assert!(third.try_recv().is_err());
        let fourth = ledger.arrive();
        assert!(third.await.is_ok());
        assert!(fourth.await.is_ok());
    }

    #[tokio::test]
    async fn single_process_worlds_release_immediately() {
        let ledger = BarrierLedger::new(1);
        assert!(ledger.arrive().await.is_ok());
    }
}
