// [libs/domain/models/src/lib.rs]
/*!
 * =================================================================
 * APARATO: TRIPLE DOMAIN MODELS (V12.0 - GOLD MASTER)
 * CLASIFICACIÓN: DOMAIN FOUNDATION (ESTRATO L2-MODELS)
 * RESPONSABILIDAD: VOCABULARIO NOMINAL DEL TRIPLESTORE DISTRIBUIDO
 *
 * VISION HIPER-HOLÍSTICA:
 * Define el léxico compartido por todos los estratos: el Blob tipado
 * que transporta sujetos, predicados y objetos; el catálogo de
 * operaciones del protocolo; las permutaciones de escritura; y los
 * sellos de tiempo que certifican la latencia de cada operación.
 * Ninguna lógica de enrutamiento ni de E/S reside aquí.
 * =================================================================
 */

pub mod blob;
pub mod datatype;
pub mod ops;
pub mod permutation;
pub mod stamps;

mod errors;

pub use blob::Blob;
pub use datatype::DataType;
pub use errors::ModelError;
pub use ops::{Direction, GetOpKind, Operation, Status};
pub use permutation::PutPermutation;
pub use stamps::{Chronostamp, SendStamps};

#[cfg(test)]
mod tests_serialization;
