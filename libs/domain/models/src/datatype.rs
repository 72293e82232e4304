// [libs/domain/models/src/datatype.rs]
/*!
 * =================================================================
 * APARATO: DATA TYPE REGISTRY (V11.2 - WIRE ALIGNED)
 * CLASIFICACIÓN: DOMAIN FOUNDATION (ESTRATO L2-MODELS)
 * RESPONSABILIDAD: CATÁLOGO DE ETIQUETAS DE TIPO PARA BLOBS
 * =================================================================
 */

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Etiqueta de tipo que viaja junto a cada Blob en la trama binaria.
/// El núcleo nunca interpreta los bytes del objeto; la etiqueta existe
/// para que el consumidor final reconstruya el valor original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DataType {
    Byte = 1,
    Pointer = 2,
    Int32 = 3,
    Int64 = 4,
    Uint32 = 5,
    Uint64 = 6,
    Float = 7,
    Double = 8,
}

impl DataType {
    /**
     * Reconstruye la etiqueta desde su byte de trama.
     *
     * # Errors:
     * - `ModelError::UnknownDataType`: si el byte no pertenece al catálogo.
     */
    pub fn from_wire(tag: u8) -> Result<Self, ModelError> {
        match tag {
            1 => Ok(Self::Byte),
            2 => Ok(Self::Pointer),
            3 => Ok(Self::Int32),
            4 => Ok(Self::Int64),
            5 => Ok(Self::Uint32),
            6 => Ok(Self::Uint64),
            7 => Ok(Self::Float),
            8 => Ok(Self::Double),
            unknown => Err(ModelError::UnknownDataType(unknown)),
        }
    }

    /// Byte de trama de la etiqueta.
    pub const fn to_wire(self) -> u8 {
        self as u8
    }

    /// Indica si los bytes del Blob representan un valor numérico de
    /// coma flotante apto para alimentar histogramas.
    pub const fn is_floating(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_tags_roundtrip_for_the_full_catalog() {
        for tag in 1u8..=8u8 {
            let decoded = DataType::from_wire(tag).expect("catalog tag must decode");
            assert_eq!(decoded.to_wire(), tag);
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert!(matches!(
            DataType::from_wire(0),
            Err(ModelError::UnknownDataType(0))
        ));
        assert!(matches!(
            DataType::from_wire(99),
            Err(ModelError::UnknownDataType(99))
        ));
    }
}
