// [libs/core/histogram/src/lib.rs]
/*!
 * =================================================================
 * APARATO: HISTOGRAM FACILITY (V12.3 - FIRST-N BOOTSTRAP)
 * CLASIFICACIÓN: CORE ALGORITHMIC LAYER (ESTRATO L1-CORE)
 * RESPONSABILIDAD: HISTOGRAMAS NOMINALES POR PREDICADO Y DATASTORE
 *
 * VISION HIPER-HOLÍSTICA:
 * Hasta acumular first_n muestras el histograma sólo almacena; en la
 * muestra first_n la regla configurada produce las cubetas y todas
 * las muestras acumuladas se reinyectan en los contadores. A partir
 * de ahí cada muestra incrementa counts[upper_bound(v) - 1].
 * Con first_n = 0 las cubetas se generan en la construcción, lo que
 * permite reglas de usuario independientes de las muestras.
 * =================================================================
 */

pub mod generators;

mod errors;

pub use errors::HistogramError;
pub use generators::{BucketGenerator, CustomGenerator};

/// Configuración de arranque de un histograma.
#[derive(Debug, Clone)]
pub struct HistogramConfig {
    /// Muestras acumuladas antes de generar cubetas.
    pub first_n: usize,
    /// Regla de generación de cubetas.
    pub generator: BucketGenerator,
}

/// Instantánea estable de un histograma, apta para la trama.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSnapshot {
    pub name: Vec<u8>,
    pub buckets: Vec<f64>,
    pub counts: Vec<u64>,
}

impl HistogramSnapshot {
    pub fn size(&self) -> usize {
        self.buckets.len()
    }
}

/// Histograma nominal de un predicado sobre un datastore.
pub struct Histogram {
    name: Vec<u8>,
    first_n: usize,
    generator: BucketGenerator,
    samples: Vec<f64>,
    buckets: Vec<f64>,
    counts: Vec<u64>,
    total: u64,
}

impl Histogram {
    /**
     * Construye el histograma. Con `first_n == 0` la regla se ejecuta
     * inmediatamente sobre cero muestras: las reglas de serie que
     * exigen material dejan el histograma sin cubetas (las inserciones
     * fallarán por ranura), las reglas de usuario pueden producirlas.
     */
    pub fn new(name: Vec<u8>, config: &HistogramConfig) -> Self {
        let mut histogram = Self {
            name,
            first_n: config.first_n,
            generator: config.generator.clone(),
            samples: Vec::with_capacity(config.first_n),
            buckets: Vec::new(),
            counts: Vec::new(),
            total: 0,
        };

        if histogram.first_n == 0 {
            histogram.generate_buckets();
        }

        histogram
    }

    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// Muestras totales aceptadas, incluidas las de arranque.
    pub const fn total(&self) -> u64 {
        self.total
    }

    /**
     * Acepta una muestra. Si aún no se alcanzó first_n la muestra se
     * acumula; al alcanzarlo se generan las cubetas y se reinyecta
     * todo el material acumulado.
     *
     * # Errors:
     * - `HistogramError::NotReady`: la muestra llega con las cubetas
     *   sin generar (regla fallida o aún en fase de acumulación tras
     *   un generador fallido).
     */
    pub fn add(&mut self, value: f64) -> Result<(), HistogramError> {
        if self.samples.len() < self.first_n {
            self.samples.push(value);

            if self.samples.len() == self.first_n {
                self.generate_buckets();
                let staged = std::mem::take(&mut self.samples);
                for sample in &staged {
                    self.insert(*sample)?;
                }
                self.samples = staged;
            }

            self.total += 1;
            return Ok(());
        }

        self.insert(value)?;
        self.total += 1;
        Ok(())
    }

    /// Instantánea estable: nombre, cubetas y contadores.
    pub fn snapshot(&self) -> HistogramSnapshot {
        HistogramSnapshot {
            name: self.name.clone(),
            buckets: self.buckets.clone(),
            counts: self.counts.clone(),
        }
    }

    fn generate_buckets(&mut self) {
        match self.generator.generate(&self.samples) {
            Ok(edges) => {
                self.counts = vec![0; edges.len()];
                self.buckets = edges;
            }
            Err(_) => {
                // la regla no pudo producir cubetas; las inserciones
                // posteriores se reportan por ranura
                self.buckets.clear();
                self.counts.clear();
            }
        }
    }

    /// Incrementa counts[upper_bound(value) - 1], con la primera
    /// cubeta absorbiendo los valores por debajo de su borde.
    fn insert(&mut self, value: f64) -> Result<(), HistogramError> {
        if self.buckets.is_empty() {
            return Err(HistogramError::NotReady);
        }

        let upper = self.buckets.partition_point(|edge| *edge <= value);
        let index = upper.saturating_sub(1);
        self.counts[index] += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn single_bucket_config() -> HistogramConfig {
        HistogramConfig {
            first_n: 0,
            generator: BucketGenerator::Custom(Arc::new(|_samples| Ok(vec![0.0]))),
        }
    }

    #[test]
    fn first_n_zero_generates_buckets_at_construction() {
        let mut histogram = Histogram::new(b"p".to_vec(), &single_bucket_config());

        for sample in 0..10 {
            histogram.add(sample as f64).unwrap();
        }

        let snapshot = histogram.snapshot();
        assert_eq!(snapshot.size(), 1);
        assert_eq!(snapshot.buckets, vec![0.0]);
        assert_eq!(snapshot.counts, vec![10]);
        assert_eq!(histogram.total(), 10);
    }

    #[test]
    fn bootstrap_replays_the_accumulated_samples() {
        let config = HistogramConfig {
            first_n: 4,
            generator: BucketGenerator::FixedBuckets(2),
        };
        let mut histogram = Histogram::new(b"pressure".to_vec(), &config);

        // fase de acumulación: sin cubetas todavía
        for sample in [0.0, 1.0, 2.0] {
            histogram.add(sample).unwrap();
            assert_eq!(histogram.snapshot().size(), 0);
        }

        // la cuarta muestra dispara la generación y la reinyección
        histogram.add(3.0).unwrap();
        let snapshot = histogram.snapshot();
        assert_eq!(snapshot.size(), 2);
        assert_eq!(snapshot.counts.iter().sum::<u64>(), 4);

        // las muestras posteriores van directas a los contadores
        histogram.add(3.0).unwrap();
        assert_eq!(histogram.snapshot().counts.iter().sum::<u64>(), 5);
    }

    #[test]
    fn values_below_the_first_edge_land_in_bucket_zero() {
        let mut histogram = Histogram::new(b"p".to_vec(), &single_bucket_config());
        histogram.add(-100.0).unwrap();
        assert_eq!(histogram.snapshot().counts, vec![1]);
    }

    #[test]
    fn upper_bound_minus_one_selects_the_owning_bucket() {
        let config = HistogramConfig {
            first_n: 0,
            generator: BucketGenerator::Custom(Arc::new(|_| Ok(vec![0.0, 10.0, 20.0]))),
        };
        let mut histogram = Histogram::new(b"p".to_vec(), &config);

        histogram.add(5.0).unwrap();
        histogram.add(10.0).unwrap();
        histogram.add(25.0).unwrap();

        assert_eq!(histogram.snapshot().counts, vec![1, 1, 1]);
    }

    #[test]
    fn stock_rule_with_first_n_zero_leaves_the_histogram_not_ready() {
        let config = HistogramConfig {
            first_n: 0,
            generator: BucketGenerator::SturgesFormula,
        };
        let mut histogram = Histogram::new(b"p".to_vec(), &config);
        assert!(matches!(histogram.add(1.0), Err(HistogramError::NotReady)));
    }
}
