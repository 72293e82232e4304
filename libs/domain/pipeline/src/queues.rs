// [libs/domain/pipeline/src/queues.rs]
/*!
 * =================================================================
 * APARATO: PENDING OPERATION QUEUES (V13.1 - ONE MUTEX DISCIPLINE)
 * CLASIFICACIÓN: DOMAIN LAYER (ESTRATO L2-PIPELINE)
 * RESPONSABILIDAD: COLAS POR OPERACIÓN HASTA EL FLUSH
 *
 * Una lista propia por clase de operación, drenada por intercambio y
 * vaciado. La lista de PUTs vive bajo su propio cerrojo asíncrono
 * porque el worker de PUTs la drena concurrentemente; es la única
 * estructura compartida entre el hilo de usuario y el worker, y el
 * búfer de resultados asíncronos se anexa bajo ese mismo cerrojo.
 * =================================================================
 */

use triplex_domain_models::{Blob, DataType, GetOpKind, PutPermutation, SendStamps};

use crate::results::Results;

/// PUT pendiente: una ordenación ya expandida de un triple.
#[derive(Debug, Clone)]
pub struct PendingPut {
    pub subject: Blob,
    pub predicate: Blob,
    pub object: Blob,
    pub permutation: PutPermutation,
    pub stamps: SendStamps,
}

/// GET pendiente.
#[derive(Debug, Clone)]
pub struct PendingGet {
    pub subject: Blob,
    pub predicate: Blob,
    pub object_type: DataType,
    pub stamps: SendStamps,
}

/// GETOP pendiente.
#[derive(Debug, Clone)]
pub struct PendingGetOp {
    pub subject: Blob,
    pub predicate: Blob,
    pub object_type: DataType,
    pub num_recs: u64,
    pub kind: GetOpKind,
    pub stamps: SendStamps,
}

/// DELETE pendiente.
#[derive(Debug, Clone)]
pub struct PendingDelete {
    pub subject: Blob,
    pub predicate: Blob,
    pub stamps: SendStamps,
}

/// HISTOGRAM pendiente: destino explícito por id de datastore.
#[derive(Debug, Clone)]
pub struct PendingHistogram {
    pub datastore_id: usize,
    pub name: Blob,
    pub stamps: SendStamps,
}

/// La cola de PUTs y el búfer de resultados del worker, bajo el
/// mismo cerrojo (disciplina de un solo mutex).
#[derive(Default)]
pub struct PutQueue {
    pub records: Vec<PendingPut>,
    pub async_results: Results,
}

impl PutQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { records: Vec::with_capacity(capacity), async_results: Results::new() }
    }

    /// Drenaje por transferencia de propiedad: vacía la cola y
    /// devuelve el material, liberando el cerrojo de inmediato.
    pub fn drain_records(&mut self) -> Vec<PendingPut> {
        std::mem::take(&mut self.records)
    }
}

/// Las colas de las operaciones restantes, sólo tocadas por el hilo
/// de usuario.
#[derive(Default)]
pub struct ReadQueues {
    pub gets: Vec<PendingGet>,
    pub getops: Vec<PendingGetOp>,
    pub deletes: Vec<PendingDelete>,
    pub histograms: Vec<PendingHistogram>,
}

impl ReadQueues {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            gets: Vec::with_capacity(capacity),
            getops: Vec::with_capacity(capacity),
            deletes: Vec::with_capacity(capacity),
            histograms: Vec::with_capacity(capacity),
        }
    }
}
