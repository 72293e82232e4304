// [libs/infra/datastore/src/memory.rs]
/*!
 * =================================================================
 * APARATO: IN-MEMORY ORDERED ENGINE (V12.2 - BTREE STRATA)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3-STORAGE)
 * RESPONSABILIDAD: MOTOR CLAVE-VALOR ORDENADO RESIDENTE EN RAM
 *
 * # Mathematical Proof (Scan Parity):
 * BTreeMap ordena las claves por comparación de bytes, el mismo
 * orden memcmp de los motores LSM en disco. Los recorridos NEXT,
 * PREV, FIRST y LAST sobre este motor son por tanto observacionalmente
 * idénticos a los de un cursor LevelDB sobre las mismas claves.
 * =================================================================
 */

use std::collections::BTreeMap;
use std::ops::Bound;
use std::path::PathBuf;

use tracing::debug;

use triplex_domain_models::DataType;

use crate::errors::DatastoreError;
use crate::{DatastoreEngine, ScanKind, StoreAddress, StoredRecord};

struct StoredObject {
    object: Vec<u8>,
    object_type: DataType,
}

/// Motor en memoria: un BTreeMap por almacén más su directorio en
/// disco, mantenido por paridad de direccionamiento con los motores
/// persistentes (el contenido vive sólo en RAM).
pub struct InMemoryEngine {
    name: String,
    directory: PathBuf,
    records: BTreeMap<Vec<u8>, StoredObject>,
    open: bool,
}

impl InMemoryEngine {
    pub fn open(address: &StoreAddress) -> Result<Self, DatastoreError> {
        let directory = address.directory();
        std::fs::create_dir_all(&directory).map_err(|fault| DatastoreError::Io {
            path: directory.clone(),
            detail: fault.to_string(),
        })?;

        debug!("🗄️ [DATASTORE]: In-memory stratum opened at [{}]", directory.display());

        Ok(Self {
            name: address.name.clone(),
            directory,
            records: BTreeMap::new(),
            open: true,
        })
    }

    fn ensure_open(&self) -> Result<(), DatastoreError> {
        if !self.open {
            return Err(DatastoreError::Closed(self.name.clone()));
        }
        Ok(())
    }
}

impl DatastoreEngine for InMemoryEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn put(
        &mut self,
        key: Vec<u8>,
        object: Vec<u8>,
        object_type: DataType,
    ) -> Result<(), DatastoreError> {
        self.ensure_open()?;
        self.records.insert(key, StoredObject { object, object_type });
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<(Vec<u8>, DataType), DatastoreError> {
        self.ensure_open()?;
        self.records
            .get(key)
            .map(|stored| (stored.object.clone(), stored.object_type))
            .ok_or(DatastoreError::NotFound)
    }

    fn scan(
        &self,
        anchor: Option<&[u8]>,
        kind: ScanKind,
        num_recs: usize,
    ) -> Result<Vec<StoredRecord>, DatastoreError> {
        self.ensure_open()?;

        let records = match kind {
            ScanKind::Eq => {
                let key = anchor.ok_or(DatastoreError::MissingAnchor)?;
                let stored = self.records.get(key).ok_or(DatastoreError::NotFound)?;
                vec![StoredRecord {
                    key: key.to_vec(),
                    object: stored.object.clone(),
                    object_type: stored.object_type,
                }]
            }
            ScanKind::Next => {
                let key = anchor.ok_or(DatastoreError::MissingAnchor)?;
                collect_records(
                    self.records
                        .range::<[u8], _>((Bound::Included(key), Bound::Unbounded)),
                    num_recs,
                )
            }
            ScanKind::Prev => {
                let key = anchor.ok_or(DatastoreError::MissingAnchor)?;
                collect_records(
                    self.records
                        .range::<[u8], _>((Bound::Unbounded, Bound::Included(key)))
                        .rev(),
                    num_recs,
                )
            }
            ScanKind::First => collect_records(self.records.iter(), num_recs),
            ScanKind::Last => collect_records(self.records.iter().rev(), num_recs),
        };

        if records.is_empty() {
            return Err(DatastoreError::NotFound);
        }

        Ok(records)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), DatastoreError> {
        self.ensure_open()?;
        self.records
            .remove(key)
            .map(|_| ())
            .ok_or(DatastoreError::NotFound)
    }

    fn sync(&mut self) -> Result<(), DatastoreError> {
        self.ensure_open()?;
        // el material vive en RAM: no hay nada que cristalizar
        Ok(())
    }

    fn close(&mut self) -> Result<(), DatastoreError> {
        self.ensure_open()?;
        self.records.clear();
        self.open = false;
        debug!("🗄️ [DATASTORE]: Stratum [{}] closed.", self.directory.display());
        Ok(())
    }
}

fn collect_records<'stratum, I>(iterator: I, num_recs: usize) -> Vec<StoredRecord>
where
    I: Iterator<Item = (&'stratum Vec<u8>, &'stratum StoredObject)>,
{
    iterator
        .take(num_recs)
        .map(|(key, stored)| StoredRecord {
            key: key.clone(),
            object: stored.object.clone(),
            object_type: stored.object_type,
        })
        .collect()
}
