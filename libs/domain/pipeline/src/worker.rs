// [libs/domain/pipeline/src/worker.rs]
/*!
 * =================================================================
 * APARATO: ASYNC PUT WORKER (V12.0 - WRITE BEHIND)
 * CLASIFICACIÓN: DOMAIN LAYER (ESTRATO L2-PIPELINE)
 * RESPONSABILIDAD: DRENAJE EN SEGUNDO PLANO DE LA COLA DE PUTS
 *
 * Una sola tarea de fondo por proceso. El llamante de Put/BPut señala
 * la condición y nunca bloquea; el worker despierta, comprueba la
 * marca de agua, drena la cola entera bajo el cerrojo (tomar y
 * vaciar), lo suelta de inmediato y baraja/envía con normalidad. Los
 * resultados se anexan al búfer de la sesión bajo el mismo cerrojo y
 * el usuario los recupera vía FlushPuts.
 * =================================================================
 */

use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::session::SessionCore;

pub(crate) fn spawn_put_worker(core: Arc<SessionCore>) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "🌀 [PUT_WORKER]: Write-behind engine online (watermark {}).",
            core.options().start_async_puts_at
        );

        loop {
            core.puts_signal().notified().await;

            if !core.is_running() {
                break;
            }

            loop {
                // FASE 1: drenaje atómico bajo el cerrojo de PUTs
                let drained = {
                    let mut queue = core.puts().lock().await;
                    if queue.records.len() < core.options().start_async_puts_at {
                        Vec::new()
                    } else {
                        queue.drain_records()
                    }
                };

                if drained.is_empty() {
                    break;
                }

                let drained_volume = drained.len();
                debug!("🌀 [PUT_WORKER]: Draining {} queued puts.", drained_volume);

                // FASE 2: barajado y envío fuera del cerrojo
                let results = core.flush_put_records(drained).await;

                // FASE 3: anexo de resultados bajo el mismo cerrojo
                let mut queue = core.puts().lock().await;
                queue.async_results.append(results);
            }

            if !core.running_flag().load(Ordering::SeqCst) {
                break;
            }
        }

        debug!("🌀 [PUT_WORKER]: Write-behind engine drained and parked.");
    })
}
