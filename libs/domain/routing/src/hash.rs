// [libs/domain/routing/src/hash.rs]
/*!
 * =================================================================
 * APARATO: SHUFFLE HASH CAPABILITY (V10.4 - STOCK SET)
 * CLASIFICACIÓN: DOMAIN LAYER (ESTRATO L2-ROUTING)
 * RESPONSABILIDAD: (SUJETO, PREDICADO) → ID DE DATASTORE DESTINO
 *
 * El núcleo trata la función hash como una capacidad opaca: recibe
 * los bytes de sujeto y predicado más el contexto del proceso y
 * devuelve el id de datastore destino, que el barajador valida
 * contra el censo total antes de encolar.
 * =================================================================
 */

use std::sync::Arc;

use crate::errors::RoutingError;

/// Contexto del proceso visible para la función hash.
#[derive(Debug, Clone, Copy)]
pub struct HashContext {
    /// Rango propio del proceso llamante.
    pub rank: usize,
    /// Censo total de datastores del mundo.
    pub total_datastores: usize,
}

/// Firma del hash de usuario: (sujeto, predicado, contexto) → id.
pub type CustomHash =
    Arc<dyn Fn(&[u8], &[u8], HashContext) -> i64 + Send + Sync>;

/// Conjunto de hashes de serie más la capacidad de usuario.
#[derive(Clone)]
pub enum HashFunction {
    /// Suma de bytes de sujeto y predicado, módulo el censo total.
    SumModDatastores,
    /// El primer datastore del rango propio del llamante.
    MyRank,
    /// Alias de configuración histórico de MyRank.
    Rank,
    /// Constante cero: todo al primer datastore del mundo.
    DatastoreZero,
    /// Capacidad suministrada por el integrador.
    Custom(&'static str, CustomHash),
}

impl std::fmt::Debug for HashFunction {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "HashFunction::{}", self.name())
    }
}

impl HashFunction {
    /// Nombre de configuración del hash activo.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SumModDatastores => "SUM_MOD_DATASTORES",
            Self::MyRank => "MY_RANK",
            Self::Rank => "RANK",
            Self::DatastoreZero => "DATASTORE_ZERO",
            Self::Custom(name, _) => name,
        }
    }

    /// Resuelve un hash de serie por su nombre de configuración.
    pub fn from_config_name(name: &str) -> Result<Self, RoutingError> {
        match name {
            "SUM_MOD_DATASTORES" => Ok(Self::SumModDatastores),
            "MY_RANK" => Ok(Self::MyRank),
            "RANK" => Ok(Self::Rank),
            "DATASTORE_ZERO" => Ok(Self::DatastoreZero),
            unknown => Err(RoutingError::UnknownHash(unknown.to_string())),
        }
    }

    /**
     * Evalúa el hash y valida el id resultante contra el censo.
     *
     * # Errors:
     * - `RoutingError::HashOutOfRange`: el id queda fuera de
     *   [0, total_datastores), incluido el caso de censo cero.
     */
    pub fn evaluate(
        &self,
        subject: &[u8],
        predicate: &[u8],
        context: HashContext,
    ) -> Result<usize, RoutingError> {
        if context.total_datastores == 0 {
            return Err(RoutingError::HashOutOfRange { id: 0, total: 0 });
        }

        let raw: i64 = match self {
            Self::SumModDatastores => {
                let byte_sum: u64 = subject
                    .iter()
                    .chain(predicate.iter())
                    .map(|byte| *byte as u64)
                    .sum();
                (byte_sum % context.total_datastores as u64) as i64
            }
            Self::MyRank | Self::Rank => {
                (context.rank % context.total_datastores) as i64
            }
            Self::DatastoreZero => 0,
            Self::Custom(_, capability) => capability(subject, predicate, context),
        };

        if raw < 0 || raw as usize >= context.total_datastores {
            return Err(RoutingError::HashOutOfRange {
                id: raw,
                total: context.total_datastores,
            });
        }

        Ok(raw as usize)
    }
}
