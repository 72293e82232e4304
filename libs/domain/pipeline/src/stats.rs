// [libs/domain/pipeline/src/stats.rs]
/*!
 * =================================================================
 * APARATO: SESSION STATS SHEET (V10.2 - CHRONO LEDGER)
 * CLASIFICACIÓN: DOMAIN LAYER (ESTRATO L2-PIPELINE)
 * RESPONSABILIDAD: CRONOSELLOS DE LLAMADAS MASIVAS Y FLUSHES
 * =================================================================
 */

use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

use triplex_domain_models::{Chronostamp, Operation};

/// Época monótona del proceso: se fija en la primera apertura de
/// sesión y nunca se toca concurrentemente con Open/Close.
pub static PROCESS_EPOCH: Lazy<Instant> = Lazy::new(Instant::now);

/// Hoja de estadísticas de la sesión: época de apertura, cronosellos
/// por operación masiva y cronosellos de flush.
#[derive(Debug, Clone)]
pub struct StatsSheet {
    pub opened_at: DateTime<Utc>,
    pub bulk_ops: HashMap<Operation, Vec<Chronostamp>>,
    pub flushes: Vec<Chronostamp>,
}

impl StatsSheet {
    pub fn new() -> Self {
        Self {
            opened_at: Utc::now(),
            bulk_ops: HashMap::new(),
            flushes: Vec::new(),
        }
    }

    pub fn record_bulk(&mut self, operation: Operation, stamp: Chronostamp) {
        self.bulk_ops.entry(operation).or_default().push(stamp);
    }

    pub fn record_flush(&mut self, stamp: Chronostamp) {
        self.flushes.push(stamp);
    }

    /// Volumen total de llamadas masivas registradas para una clase.
    pub fn bulk_call_count(&self, operation: Operation) -> usize {
        self.bulk_ops
            .get(&operation)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl Default for StatsSheet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_calls_accumulate_per_operation() {
        let mut sheet = StatsSheet::new();
        sheet.record_bulk(Operation::Put, Chronostamp::default());
        sheet.record_bulk(Operation::Put, Chronostamp::default());
        sheet.record_bulk(Operation::Get, Chronostamp::default());

        assert_eq!(sheet.bulk_call_count(Operation::Put), 2);
        assert_eq!(sheet.bulk_call_count(Operation::Get), 1);
        assert_eq!(sheet.bulk_call_count(Operation::Delete), 0);
    }
}
