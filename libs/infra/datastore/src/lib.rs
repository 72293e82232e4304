// [libs/infra/datastore/src/lib.rs]
/*!
 * =================================================================
 * APARATO: DATASTORE INFRASTRUCTURE (V13.0 - ENGINE AGNOSTIC)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3-STORAGE)
 * RESPONSABILIDAD: INTERFAZ DE MOTOR LOCAL Y UNIDAD CON HISTOGRAMAS
 *
 * VISION HIPER-HOLÍSTICA:
 * El núcleo ve los motores clave-valor sólo a través de la interfaz
 * DatastoreEngine. Este estrato aporta el motor en memoria ordenado
 * (BTreeMap, orden memcmp idéntico al de los motores LSM), el
 * direccionamiento en disco prefix/name/postfix-id y la unidad que
 * acopla cada motor con sus histogramas de predicado.
 * =================================================================
 */

pub mod memory;
pub mod unit;

mod errors;

use std::path::PathBuf;

pub use errors::DatastoreError;
pub use unit::{DatastoreUnit, HistogramPolicy, ScannedTriple};

use triplex_domain_models::DataType;

/// Registro recuperado de un recorrido ordenado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub key: Vec<u8>,
    pub object: Vec<u8>,
    pub object_type: DataType,
}

/// Modalidad de recorrido de un motor: espejo de GetOpKind sin la
/// variante inválida, que el servidor corta antes de llegar aquí.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind {
    Eq,
    Next,
    Prev,
    First,
    Last,
}

/// Interfaz mínima que el núcleo exige a un motor clave-valor local.
pub trait DatastoreEngine: Send {
    /// Nombre base bajo el que el motor fue abierto.
    fn name(&self) -> &str;

    fn put(
        &mut self,
        key: Vec<u8>,
        object: Vec<u8>,
        object_type: DataType,
    ) -> Result<(), DatastoreError>;

    fn get(&self, key: &[u8]) -> Result<(Vec<u8>, DataType), DatastoreError>;

    /// Recorrido ordenado desde la clave ancla (inclusive), limitado
    /// a num_recs registros.
    fn scan(
        &self,
        anchor: Option<&[u8]>,
        kind: ScanKind,
        num_recs: usize,
    ) -> Result<Vec<StoredRecord>, DatastoreError>;

    fn delete(&mut self, key: &[u8]) -> Result<(), DatastoreError>;

    /// Persistencia del material pendiente; el motor decide qué
    /// significa (fsync, compactación, nada).
    fn sync(&mut self) -> Result<(), DatastoreError>;

    fn close(&mut self) -> Result<(), DatastoreError>;
}

/// Selector de motor reconocido por la configuración.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineSelector {
    InMemory,
    LevelDb,
    RocksDb,
}

impl EngineSelector {
    pub fn from_config_name(name: &str) -> Result<Self, DatastoreError> {
        match name {
            "in_memory" => Ok(Self::InMemory),
            "leveldb" => Ok(Self::LevelDb),
            "rocksdb" => Ok(Self::RocksDb),
            unknown => Err(DatastoreError::UnknownEngine(unknown.to_string())),
        }
    }
}

/// Dirección en disco de un datastore: prefix/name/postfix-id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreAddress {
    pub prefix: PathBuf,
    pub name: String,
    pub postfix: String,
    pub id: usize,
}

impl StoreAddress {
    pub fn directory(&self) -> PathBuf {
        self.prefix
            .join(&self.name)
            .join(format!("{}-{}", self.postfix, self.id))
    }

    /// La misma dirección bajo otro nombre base (renombrado colectivo).
    pub fn renamed(&self, new_name: &str) -> Self {
        Self {
            prefix: self.prefix.clone(),
            name: new_name.to_string(),
            postfix: self.postfix.clone(),
            id: self.id,
        }
    }
}

/**
 * Abre un motor bajo la dirección dada.
 *
 * # Errors:
 * - `DatastoreError::EngineUnavailable`: selectores leveldb/rocksdb,
 *   reconocidos pero servidos por motores externos a este árbol.
 */
pub fn open_engine(
    selector: EngineSelector,
    address: &StoreAddress,
) -> Result<Box<dyn DatastoreEngine>, DatastoreError> {
    match selector {
        EngineSelector::InMemory => Ok(Box::new(memory::InMemoryEngine::open(address)?)),
        EngineSelector::LevelDb => {
            Err(DatastoreError::EngineUnavailable("leveldb"))
        }
        EngineSelector::RocksDb => {
            Err(DatastoreError::EngineUnavailable("rocksdb"))
        }
    }
}
