// [libs/domain/pipeline/src/results.rs]
/*!
 * =================================================================
 * APARATO: RESULTS CONTAINER (V12.3 - FORWARD ITERABLE)
 * CLASIFICACIÓN: DOMAIN LAYER (ESTRATO L2-PIPELINE)
 * RESPONSABILIDAD: SECUENCIA PROPIA DE RESULTADOS PARA EL LLAMANTE
 *
 * Cada registro expone la clase de operación, el datastore de origen,
 * el estado y la carga útil específica. El contenedor posee toda su
 * memoria: sobrevive a la sesión hasta que el llamante lo suelta.
 * Los GET re-ligan las manillas devueltas por el servidor a los
 * blobs originales del llamante sin re-parsear.
 * =================================================================
 */

use triplex_core_histogram::HistogramSnapshot;
use triplex_domain_models::{Blob, SendStamps, Status};

/// Un resultado etiquetado por clase de operación.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultRecord {
    Put {
        datastore: i32,
        status: Status,
        subject: Blob,
        predicate: Blob,
        stamps: SendStamps,
    },
    Get {
        datastore: i32,
        status: Status,
        subject: Blob,
        predicate: Blob,
        object: Option<Blob>,
        stamps: SendStamps,
    },
    GetOp {
        datastore: i32,
        status: Status,
        subjects: Vec<Blob>,
        predicates: Vec<Blob>,
        objects: Vec<Blob>,
        stamps: SendStamps,
    },
    Delete {
        datastore: i32,
        status: Status,
        subject: Blob,
        predicate: Blob,
        stamps: SendStamps,
    },
    Histogram {
        datastore: i32,
        status: Status,
        histogram: Option<HistogramSnapshot>,
        stamps: SendStamps,
    },
    Sync {
        datastore: i32,
        status: Status,
    },
}

impl ResultRecord {
    pub fn status(&self) -> Status {
        match self {
            Self::Put { status, .. }
            | Self::Get { status, .. }
            | Self::GetOp { status, .. }
            | Self::Delete { status, .. }
            | Self::Histogram { status, .. }
            | Self::Sync { status, .. } => *status,
        }
    }

    pub fn datastore(&self) -> i32 {
        match self {
            Self::Put { datastore, .. }
            | Self::Get { datastore, .. }
            | Self::GetOp { datastore, .. }
            | Self::Delete { datastore, .. }
            | Self::Histogram { datastore, .. }
            | Self::Sync { datastore, .. } => *datastore,
        }
    }
}

/// Contenedor iterable hacia delante de resultados.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Results {
    records: Vec<ResultRecord>,
}

impl Results {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { records: Vec::with_capacity(capacity) }
    }

    pub fn push(&mut self, record: ResultRecord) {
        self.records.push(record);
    }

    /// Anexa otro contenedor completo, preservando el orden.
    pub fn append(&mut self, mut other: Results) {
        self.records.append(&mut other.records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultRecord> {
        self.records.iter()
    }

    /// Conteo de registros con estado SUCCESS.
    pub fn success_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.status().is_success())
            .count()
    }

    /// Toma el material acumulado dejando el contenedor vacío.
    pub fn take(&mut self) -> Results {
        Results { records: std::mem::take(&mut self.records) }
    }
}

impl IntoIterator for Results {
    type Item = ResultRecord;
    type IntoIter = std::vec::IntoIter<ResultRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'record> IntoIterator for &'record Results {
    type Item = &'record ResultRecord;
    type IntoIter = std::slice::Iter<'record, ResultRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
