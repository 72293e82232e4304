// [libs/domain/models/src/blob.rs]
/*!
 * =================================================================
 * APARATO: TYPED BLOB CARRIER (V14.1 - OWNERSHIP SEALED)
 * CLASIFICACIÓN: DOMAIN FOUNDATION (ESTRATO L2-MODELS)
 * RESPONSABILIDAD: BÚFER PROPIO CON ETIQUETA DE TIPO
 *
 * # Mathematical Proof (Ownership Discipline):
 * El Blob posee siempre sus bytes. Las referencias "eco" que el
 * servidor devuelve al cliente no transportan punteros crudos sino
 * manillas opacas de 64 bits (índices en la tabla de orígenes del
 * flush), por lo que la trama conserva el layout u64∥u64∥u8 sin
 * comprometer la seguridad de memoria.
 * =================================================================
 */

use serde::{Deserialize, Serialize};

use crate::datatype::DataType;

/// Búfer de bytes propio con etiqueta de tipo. Un Blob vacío
/// (`len == 0`) es legal y representa el objeto nulo de las
/// permutaciones (S,O)→null y (O,S)→null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    bytes: Vec<u8>,
    data_type: DataType,
}

impl Blob {
    pub fn new(bytes: Vec<u8>, data_type: DataType) -> Self {
        Self { bytes, data_type }
    }

    /// Blob nulo: cero bytes, etiquetado como BYTE.
    pub fn null() -> Self {
        Self { bytes: Vec::new(), data_type: DataType::Byte }
    }

    pub fn from_slice(bytes: &[u8], data_type: DataType) -> Self {
        Self { bytes: bytes.to_vec(), data_type }
    }

    pub fn from_str_bytes(text: &str) -> Self {
        Self { bytes: text.as_bytes().to_vec(), data_type: DataType::Byte }
    }

    pub fn from_i32(value: i32) -> Self {
        Self { bytes: value.to_le_bytes().to_vec(), data_type: DataType::Int32 }
    }

    pub fn from_i64(value: i64) -> Self {
        Self { bytes: value.to_le_bytes().to_vec(), data_type: DataType::Int64 }
    }

    pub fn from_u32(value: u32) -> Self {
        Self { bytes: value.to_le_bytes().to_vec(), data_type: DataType::Uint32 }
    }

    pub fn from_u64(value: u64) -> Self {
        Self { bytes: value.to_le_bytes().to_vec(), data_type: DataType::Uint64 }
    }

    pub fn from_f32(value: f32) -> Self {
        Self { bytes: value.to_le_bytes().to_vec(), data_type: DataType::Float }
    }

    pub fn from_f64(value: f64) -> Self {
        Self { bytes: value.to_le_bytes().to_vec(), data_type: DataType::Double }
    }

    pub fn data(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub const fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /**
     * Reinterpreta los bytes como f64 según la etiqueta de tipo.
     * Alimenta la facilidad de histogramas, que opera sobre dobles.
     *
     * @returns None si la etiqueta no es numérica o la longitud no cuadra.
     */
    pub fn as_f64(&self) -> Option<f64> {
        match self.data_type {
            DataType::Float => {
                let raw: [u8; 4] = self.bytes.as_slice().try_into().ok()?;
                Some(f32::from_le_bytes(raw) as f64)
            }
            DataType::Double => {
                let raw: [u8; 8] = self.bytes.as_slice().try_into().ok()?;
                Some(f64::from_le_bytes(raw))
            }
            DataType::Int32 => {
                let raw: [u8; 4] = self.bytes.as_slice().try_into().ok()?;
                Some(i32::from_le_bytes(raw) as f64)
            }
            DataType::Int64 => {
                let raw: [u8; 8] = self.bytes.as_slice().try_into().ok()?;
                Some(i64::from_le_bytes(raw) as f64)
            }
            DataType::Uint32 => {
                let raw: [u8; 4] = self.bytes.as_slice().try_into().ok()?;
                Some(u32::from_le_bytes(raw) as f64)
            }
            DataType::Uint64 => {
                let raw: [u8; 8] = self.bytes.as_slice().try_into().ok()?;
                Some(u64::from_le_bytes(raw) as f64)
            }
            DataType::Byte | DataType::Pointer => None,
        }
    }

    /// Reinterpreta los bytes como u64 little-endian.
    pub fn as_u64(&self) -> Option<u64> {
        let raw: [u8; 8] = self.bytes.as_slice().try_into().ok()?;
        Some(u64::from_le_bytes(raw))
    }

    /// Reinterpreta los bytes como f64 little-endian sin mirar la etiqueta.
    pub fn as_raw_f64(&self) -> Option<f64> {
        let raw: [u8; 8] = self.bytes.as_slice().try_into().ok()?;
        Some(f64::from_le_bytes(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_constructors_preserve_little_endian_material() {
        let blob = Blob::from_u64(42);
        assert_eq!(blob.len(), 8);
        assert_eq!(blob.data_type(), DataType::Uint64);
        assert_eq!(blob.as_u64(), Some(42));
    }

    #[test]
    fn floating_reinterpretation_follows_the_type_tag() {
        assert_eq!(Blob::from_f64(6.0).as_f64(), Some(6.0));
        assert_eq!(Blob::from_f32(1.5).as_f64(), Some(1.5));
        assert_eq!(Blob::from_i64(-7).as_f64(), Some(-7.0));
        assert_eq!(Blob::from_str_bytes("p").as_f64(), None);
    }

    #[test]
    fn null_blob_is_empty_and_legal() {
        let null = Blob::null();
        assert!(null.is_empty());
        assert_eq!(null.len(), 0);
    }
}
