// [libs/core/order/src/lib.rs]
/*!
 * =================================================================
 * APARATO: LEXICOGRAPHIC ORDER ENGINE (V15.0 - GOLD MASTER)
 * CLASIFICACIÓN: CORE ALGORITHMIC LAYER (ESTRATO L1-CORE)
 * RESPONSABILIDAD: ORDEN TOTAL DE BYTES PARA EL ESPACIO DE CLAVES
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. ELEN: codificación de enteros y flotantes cuyo orden de bytes
 *    coincide con el orden numérico, habilitando escaneos de rango
 *    sobre predicados numéricos sin comparadores especiales.
 * 2. KEY CODEC: empaquetado (sujeto, predicado) → clave única con
 *    longitudes big-endian al final, preservando el orden primario
 *    por (sujeto, predicado).
 * 3. PURE CORE: sin E/S, sin estado global, sin dependencias de
 *    runtime. Todo es función determinista sobre bytes.
 * =================================================================
 */

pub mod elen;
pub mod key;

mod errors;

pub use errors::{ElenError, KeyError};
