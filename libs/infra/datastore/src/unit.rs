// [libs/infra/datastore/src/unit.rs]
/*!
 * =================================================================
 * APARATO: DATASTORE UNIT (V13.1 - HISTOGRAM COUPLED)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3-STORAGE)
 * RESPONSABILIDAD: MOTOR LOCAL + CODEC DE CLAVES + HISTOGRAMAS
 *
 * La unidad es lo que el bucle del servidor de rango despacha: acopla
 * un motor clave-valor con el codec (sujeto, predicado) ↔ clave y con
 * el registro de histogramas de los predicados rastreados. Un PUT
 * cuyo predicado está rastreado y cuyo objeto decodifica como
 * flotante alimenta el histograma correspondiente.
 * =================================================================
 */

use std::collections::HashMap;

use tracing::{debug, warn};

use triplex_core_histogram::{Histogram, HistogramConfig, HistogramSnapshot};
use triplex_core_order::key::{key_to_sp, sp_to_key};
use triplex_domain_models::{Blob, DataType};

use crate::errors::DatastoreError;
use crate::{open_engine, DatastoreEngine, EngineSelector, ScanKind, StoreAddress};

/// Política de histogramas de una unidad: configuración de arranque
/// más los nombres de predicado rastreados.
#[derive(Debug, Clone)]
pub struct HistogramPolicy {
    pub config: HistogramConfig,
    pub tracked_predicates: Vec<Vec<u8>>,
}

impl HistogramPolicy {
    pub fn untracked(config: HistogramConfig) -> Self {
        Self { config, tracked_predicates: Vec::new() }
    }
}

/// Triple reconstruido por un recorrido ordenado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedTriple {
    pub subject: Vec<u8>,
    pub predicate: Vec<u8>,
    pub object: Vec<u8>,
    pub object_type: DataType,
}

/// Un datastore local: motor + histogramas, identificado por su id
/// de servidor de rango.
pub struct DatastoreUnit {
    id: usize,
    selector: EngineSelector,
    address: StoreAddress,
    engine: Box<dyn DatastoreEngine>,
    policy: HistogramPolicy,
    histograms: HashMap<Vec<u8>, Histogram>,
}

impl DatastoreUnit {
    pub fn open(
        id: usize,
        selector: EngineSelector,
        address: StoreAddress,
        policy: HistogramPolicy,
    ) -> Result<Self, DatastoreError> {
        let engine = open_engine(selector, &address)?;
        let histograms = Self::fresh_histograms(&policy);

        debug!(
            "🗄️ [UNIT]: Datastore {} online with {} tracked predicates.",
            id,
            histograms.len()
        );

        Ok(Self { id, selector, address, engine, policy, histograms })
    }

    fn fresh_histograms(policy: &HistogramPolicy) -> HashMap<Vec<u8>, Histogram> {
        policy
            .tracked_predicates
            .iter()
            .map(|name| (name.clone(), Histogram::new(name.clone(), &policy.config)))
            .collect()
    }

    pub const fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        self.engine.name()
    }

    /**
     * Inserta el triple bajo su clave codificada y alimenta el
     * histograma del predicado si está rastreado. Un histograma que
     * rechaza la muestra no invalida el PUT ya persistido.
     */
    pub fn put(
        &mut self,
        subject: &Blob,
        predicate: &Blob,
        object: &Blob,
    ) -> Result<(), DatastoreError> {
        let key = sp_to_key(subject.data(), predicate.data())?;
        self.engine
            .put(key, object.data().to_vec(), object.data_type())?;

        if let Some(histogram) = self.histograms.get_mut(predicate.data()) {
            if let Some(sample) = object.as_f64() {
                if let Err(histogram_fault) = histogram.add(sample) {
                    warn!(
                        "⚠️ [UNIT]: Histogram sample rejected on datastore {}: {}",
                        self.id, histogram_fault
                    );
                }
            }
        }

        Ok(())
    }

    pub fn get(
        &self,
        subject: &Blob,
        predicate: &Blob,
    ) -> Result<(Vec<u8>, DataType), DatastoreError> {
        let key = sp_to_key(subject.data(), predicate.data())?;
        self.engine.get(&key)
    }

    /// Recorrido ordenado; las claves recuperadas se decodifican de
    /// vuelta a (sujeto, predicado) por valor.
    pub fn scan(
        &self,
        subject: Option<&Blob>,
        predicate: Option<&Blob>,
        kind: ScanKind,
        num_recs: usize,
    ) -> Result<Vec<ScannedTriple>, DatastoreError> {
        let anchor = match (subject, predicate) {
            (Some(subject), Some(predicate)) => {
                Some(sp_to_key(subject.data(), predicate.data())?)
            }
            _ => None,
        };

        let records = self.engine.scan(anchor.as_deref(), kind, num_recs)?;

        let mut triples = Vec::with_capacity(records.len());
        for record in records {
            let (scanned_subject, scanned_predicate) = key_to_sp(&record.key)?;
            triples.push(ScannedTriple {
                subject: scanned_subject.to_vec(),
                predicate: scanned_predicate.to_vec(),
                object: record.object,
                object_type: record.object_type,
            });
        }

        Ok(triples)
    }

    pub fn delete(
        &mut self,
        subject: &Blob,
        predicate: &Blob,
    ) -> Result<(), DatastoreError> {
        let key = sp_to_key(subject.data(), predicate.data())?;
        self.engine.delete(&key)
    }

    pub fn sync(&mut self) -> Result<(), DatastoreError> {
        self.engine.sync()
    }

    pub fn histogram(&self, name: &[u8]) -> Result<HistogramSnapshot, DatastoreError> {
        self.histograms
            .get(name)
            .map(Histogram::snapshot)
            .ok_or_else(|| DatastoreError::UntrackedHistogram(
                String::from_utf8_lossy(name).into_owned(),
            ))
    }

    pub fn have_histogram(&self, name: &[u8]) -> bool {
        self.histograms.contains_key(name)
    }

    /**
     * Renombrado colectivo: cierra el motor, reabre bajo el nuevo
     * nombre base y reinicia los histogramas. El material previo deja
     * de ser alcanzable desde esta unidad.
     */
    pub fn reopen_as(&mut self, new_name: &str) -> Result<(), DatastoreError> {
        self.engine.close()?;
        self.address = self.address.renamed(new_name);
        self.engine = open_engine(self.selector, &self.address)?;
        self.histograms = Self::fresh_histograms(&self.policy);

        debug!(
            "🗄️ [UNIT]: Datastore {} reopened under [{}].",
            self.id, new_name
        );
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), DatastoreError> {
        self.engine.close()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use triplex_core_histogram::BucketGenerator;

    use super::*;

    fn unit_with_tracked(predicate: &[u8]) -> (TempDir, DatastoreUnit) {
        let workspace = TempDir::new().expect("CRITICAL_FAULT: temp strata denied");
        let address = StoreAddress {
            prefix: workspace.path().to_path_buf(),
            name: "triples".to_string(),
            postfix: "shard".to_string(),
            id: 0,
        };
        let policy = HistogramPolicy {
            config: HistogramConfig {
                first_n: 0,
                generator: BucketGenerator::Custom(Arc::new(|_| Ok(vec![0.0]))),
            },
            tracked_predicates: vec![predicate.to_vec()],
        };
        let unit = DatastoreUnit::open(0, EngineSelector::InMemory, address, policy).unwrap();
        (workspace, unit)
    }

    #[test]
    fn puts_feed_the_tracked_predicate_histogram() {
        let (_workspace, mut unit) = unit_with_tracked(b"p");

        for index in 0..10 {
            unit.put(
                &Blob::from_u64(index),
                &Blob::from_str_bytes("p"),
                &Blob::from_f64(index as f64),
            )
            .unwrap();
        }

        let snapshot = unit.histogram(b"p").unwrap();
        assert_eq!(snapshot.size(), 1);
        assert_eq!(snapshot.counts, vec![10]);
        assert!(unit.have_histogram(b"p"));
        assert!(!unit.have_histogram(b"q"));
        assert!(unit.histogram(b"q").is_err());
    }

    #[test]
    fn untracked_predicates_store_without_sampling() {
        let (_workspace, mut unit) = unit_with_tracked(b"p");
        unit.put(
            &Blob::from_u64(1),
            &Blob::from_str_bytes("other"),
            &Blob::from_f64(9.0),
        )
        .unwrap();

        assert_eq!(unit.histogram(b"p").unwrap().counts, vec![0]);
        let (object, object_type) = unit
            .get(&Blob::from_u64(1), &Blob::from_str_bytes("other"))
            .unwrap();
        assert_eq!(object, 9.0f64.to_le_bytes().to_vec());
        assert_eq!(object_type, DataType::Double);
    }

    #[test]
    fn scans_recover_subject_and_predicate_by_value() {
        let (_workspace, mut unit) = unit_with_tracked(b"p");
        let subject = Blob::from_str_bytes("s");
        for index in 0u8..5 {
            unit.put(&subject, &Blob::new(vec![index], DataType::Byte), &Blob::from_u64(index as u64))
                .unwrap();
        }

        let triples = unit
            .scan(
                Some(&subject),
                Some(&Blob::new(vec![0], DataType::Byte)),
                ScanKind::Next,
                3,
            )
            .unwrap();

        assert_eq!(triples.len(), 3);
        for (index, triple) in triples.iter().enumerate() {
            assert_eq!(triple.subject, b"s".to_vec());
            assert_eq!(triple.predicate, vec![index as u8]);
        }
    }

    #[test]
    fn rename_reopens_an_empty_store() {
        let (_workspace, mut unit) = unit_with_tracked(b"p");
        unit.put(
            &Blob::from_u64(42),
            &Blob::from_u64(7),
            &Blob::from_f64(6.0),
        )
        .unwrap();
        assert!(unit.get(&Blob::from_u64(42), &Blob::from_u64(7)).is_ok());

        unit.reopen_as("triples-v2").unwrap();
        assert!(matches!(
            unit.get(&Blob::from_u64(42), &Blob::from_u64(7)),
            Err(DatastoreError::NotFound)
        ));
        assert_eq!(unit.histogram(b"p").unwrap().counts, vec![0]);
    }
}
