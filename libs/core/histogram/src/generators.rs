// [libs/core/histogram/src/generators.rs]
/*!
 * =================================================================
 * APARATO: BUCKET GENERATOR SET (V10.1 - STOCK RULES)
 * CLASIFICACIÓN: CORE ALGORITHMIC LAYER (ESTRATO L1-CORE)
 * RESPONSABILIDAD: GENERACIÓN DE BORDES IZQUIERDOS DE CUBETAS
 *
 * Reglas de serie: cubetas fijas, raíz cuadrada, fórmula de Sturges,
 * regla de Rice, referencia normal de Scott, uniforme log-n y un
 * generador suministrado por el usuario. Todas reciben las primeras
 * N muestras y devuelven los bordes izquierdos ordenados.
 * =================================================================
 */

use std::sync::Arc;

use crate::errors::HistogramError;

/// Firma del generador de usuario: muestras → bordes izquierdos.
pub type CustomGenerator =
    Arc<dyn Fn(&[f64]) -> Result<Vec<f64>, HistogramError> + Send + Sync>;

/// Regla de generación de cubetas configurada por histograma.
#[derive(Clone)]
pub enum BucketGenerator {
    /// N cubetas de ancho ceil((max-min)/n).
    FixedBuckets(usize),
    /// √n cubetas.
    SquareRootChoice,
    /// log2(n) + 2 cubetas.
    SturgesFormula,
    /// ∛n + 2 cubetas.
    RiceRule,
    /// Ancho 3.5·σ/∛n.
    ScottsNormalReference,
    /// ceil((max-min)·ln(extra)/ln(max-min)) cubetas.
    UniformLogN(usize),
    /// Regla suministrada por el integrador.
    Custom(CustomGenerator),
}

impl std::fmt::Debug for BucketGenerator {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FixedBuckets(n) => write!(formatter, "FixedBuckets({})", n),
            Self::SquareRootChoice => write!(formatter, "SquareRootChoice"),
            Self::SturgesFormula => write!(formatter, "SturgesFormula"),
            Self::RiceRule => write!(formatter, "RiceRule"),
            Self::ScottsNormalReference => write!(formatter, "ScottsNormalReference"),
            Self::UniformLogN(n) => write!(formatter, "UniformLogN({})", n),
            Self::Custom(_) => write!(formatter, "Custom(..)"),
        }
    }
}

impl BucketGenerator {
    /// Resuelve una regla por su nombre de configuración.
    pub fn from_config_name(name: &str, extra: usize) -> Result<Self, HistogramError> {
        match name {
            "FIXED_BUCKETS" => Ok(Self::FixedBuckets(extra.max(1))),
            "SQUARE_ROOT_CHOICE" => Ok(Self::SquareRootChoice),
            "STURGES_FORMULA" => Ok(Self::SturgesFormula),
            "RICE_RULE" => Ok(Self::RiceRule),
            "SCOTTS_NORMAL_REFERENCE" => Ok(Self::ScottsNormalReference),
            "UNIFORM_LOG_N" => Ok(Self::UniformLogN(extra.max(2))),
            unknown => Err(HistogramError::UnknownGenerator(unknown.to_string())),
        }
    }

    /**
     * Ejecuta la regla sobre las primeras N muestras acumuladas.
     *
     * # Errors:
     * - `HistogramError::NoSamples`: reglas de serie sin material.
     * - `HistogramError::DegenerateBuckets`: el conteo calculado no es
     *   un número positivo finito.
     */
    pub fn generate(&self, samples: &[f64]) -> Result<Vec<f64>, HistogramError> {
        if let Self::Custom(rule) = self {
            return rule(samples);
        }

        if samples.is_empty() {
            return Err(HistogramError::NoSamples);
        }

        let (min, max) = min_max(samples);

        match self {
            Self::FixedBuckets(buckets) => {
                let width = ((max - min) / *buckets as f64).ceil();
                let mut edges = Vec::with_capacity(*buckets);
                let mut edge = min;
                for _ in 0..*buckets {
                    edges.push(edge);
                    edge += width;
                }
                Ok(edges)
            }
            Self::SquareRootChoice => {
                edges_from_bin_count(min, max, (samples.len() as f64).sqrt())
            }
            Self::SturgesFormula => {
                edges_from_bin_count(min, max, (samples.len() as f64).log2() + 2.0)
            }
            Self::RiceRule => {
                edges_from_bin_count(min, max, (samples.len() as f64).cbrt() + 2.0)
            }
            Self::ScottsNormalReference => {
                let n = samples.len() as f64;
                let mean = samples.iter().sum::<f64>() / n;
                let sum_of_squares: f64 = samples
                    .iter()
                    .map(|sample| (sample - mean) * (sample - mean))
                    .sum();
                let stdev = (sum_of_squares / (n - 1.0).max(1.0)).sqrt();
                let width = 3.5 * stdev / n.cbrt();
                edges_from_bin_count(min, max, (max - min) / width)
            }
            Self::UniformLogN(extra) => {
                let span = max - min;
                let bins = (span * (*extra as f64).ln() / span.ln()).ceil();
                edges_from_bin_count(min, max, bins)
            }
            Self::Custom(_) => unreachable!("handled above"),
        }
    }
}

fn min_max(samples: &[f64]) -> (f64, f64) {
    let mut min = f64::MAX;
    let mut max = f64::MIN;
    for sample in samples {
        if *sample < min {
            min = *sample;
        }
        if *sample > max {
            max = *sample;
        }
    }
    (min, max)
}

/// Bordes izquierdos equiespaciados para un conteo de cubetas dado.
fn edges_from_bin_count(min: f64, max: f64, bins: f64) -> Result<Vec<f64>, HistogramError> {
    if !bins.is_finite() || bins < 1.0 {
        return Err(HistogramError::DegenerateBuckets(bins));
    }

    let bins = bins as usize;
    let step = (max - min) / bins as f64;
    let mut edges = Vec::with_capacity(bins);
    let mut edge = min;
    for _ in 0..bins {
        edges.push(edge);
        edge += step;
    }
    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_buckets_use_a_ceiled_width() {
        let samples = [0.0, 10.0];
        let edges = BucketGenerator::FixedBuckets(4).generate(&samples).unwrap();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[0], 0.0);
        assert_eq!(edges[1], 3.0); // ceil(10 / 4)
    }

    #[test]
    fn square_root_choice_scales_with_sample_volume() {
        let samples: Vec<f64> = (0..16).map(f64::from).collect();
        let edges = BucketGenerator::SquareRootChoice.generate(&samples).unwrap();
        assert_eq!(edges.len(), 4);
    }

    #[test]
    fn stock_rules_reject_empty_material() {
        assert!(matches!(
            BucketGenerator::SturgesFormula.generate(&[]),
            Err(HistogramError::NoSamples)
        ));
    }

    #[test]
    fn custom_rules_may_ignore_the_samples() {
        let generator = BucketGenerator::Custom(Arc::new(|_samples| Ok(vec![0.0])));
        assert_eq!(generator.generate(&[]).unwrap(), vec![0.0]);
    }

    #[test]
    fn config_names_resolve_to_rules() {
        assert!(matches!(
            BucketGenerator::from_config_name("RICE_RULE", 0),
            Ok(BucketGenerator::RiceRule)
        ));
        assert!(BucketGenerator::from_config_name("NO_SUCH_RULE", 0).is_err());
    }
}
