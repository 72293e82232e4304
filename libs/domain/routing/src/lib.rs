// [libs/domain/routing/src/lib.rs]
/*!
 * =================================================================
 * APARATO: SHUFFLE ROUTING DOMAIN (V11.0 - BLOCK ARITHMETIC)
 * CLASIFICACIÓN: DOMAIN LAYER (ESTRATO L2-ROUTING)
 * RESPONSABILIDAD: MAPEO OPERACIÓN → DATASTORE → RANGO PROPIETARIO
 *
 * Los rangos se particionan en bloques de tamaño max(C, S): dentro
 * de cada bloque los primeros S rangos son servidores cuando C ≥ S,
 * y todos los rangos son servidores cuando S ≥ C. La función hash es
 * una capacidad opaca que el barajador consulta por operación.
 * =================================================================
 */

pub mod hash;
pub mod ranks;

mod errors;

pub use errors::RoutingError;
pub use hash::{HashContext, HashFunction};
