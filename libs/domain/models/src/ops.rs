// [libs/domain/models/src/ops.rs]
/*!
 * =================================================================
 * APARATO: OPERATION CATALOG (V13.0 - PROTOCOL SEALED)
 * CLASIFICACIÓN: DOMAIN FOUNDATION (ESTRATO L2-MODELS)
 * RESPONSABILIDAD: CATÁLOGO DE OPERACIONES, DIRECCIONES Y ESTADOS
 * =================================================================
 */

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Sentido de una trama del protocolo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    Request = 1,
    Response = 2,
}

impl Direction {
    pub fn from_wire(tag: u8) -> Result<Self, ModelError> {
        match tag {
            1 => Ok(Self::Request),
            2 => Ok(Self::Response),
            unknown => Err(ModelError::UnknownDirection(unknown)),
        }
    }

    pub const fn to_wire(self) -> u8 {
        self as u8
    }
}

/// Operación transportada por un paquete. El valor de trama es fijo
/// y compartido por ambos backends de transporte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Operation {
    Put = 1,
    Get = 2,
    GetOp = 3,
    Delete = 4,
    Histogram = 5,
    Sync = 6,
}

impl Operation {
    pub fn from_wire(tag: u8) -> Result<Self, ModelError> {
        match tag {
            1 => Ok(Self::Put),
            2 => Ok(Self::Get),
            3 => Ok(Self::GetOp),
            4 => Ok(Self::Delete),
            5 => Ok(Self::Histogram),
            6 => Ok(Self::Sync),
            unknown => Err(ModelError::UnknownOperation(unknown)),
        }
    }

    pub const fn to_wire(self) -> u8 {
        self as u8
    }
}

/// Modalidad de un GETOP sobre el espacio ordenado de claves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum GetOpKind {
    /// Exactamente la clave (S,P).
    Eq = 1,
    /// La clave (S,P) y sus sucesoras en orden ascendente.
    Next = 2,
    /// La clave (S,P) y sus predecesoras en orden descendente.
    Prev = 3,
    /// Las primeras claves del datastore.
    First = 4,
    /// Las últimas claves del datastore, en orden descendente.
    Last = 5,
    /// Registro inválido: se encola igualmente y el servidor responde
    /// la ranura con estado de error.
    Invalid = 255,
}

impl GetOpKind {
    pub fn from_wire(tag: u8) -> Result<Self, ModelError> {
        match tag {
            1 => Ok(Self::Eq),
            2 => Ok(Self::Next),
            3 => Ok(Self::Prev),
            4 => Ok(Self::First),
            5 => Ok(Self::Last),
            255 => Ok(Self::Invalid),
            unknown => Err(ModelError::UnknownGetOpKind(unknown)),
        }
    }

    pub const fn to_wire(self) -> u8 {
        self as u8
    }
}

/// Estado por ranura en las respuestas. SUCCESS=0, ERROR=-1, igual
/// que el enum de estado de la biblioteca.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum Status {
    Success = 0,
    Error = -1,
}

impl Status {
    pub fn from_wire(raw: i32) -> Result<Self, ModelError> {
        match raw {
            0 => Ok(Self::Success),
            -1 => Ok(Self::Error),
            unknown => Err(ModelError::UnknownStatus(unknown)),
        }
    }

    pub const fn to_wire(self) -> i32 {
        self as i32
    }

    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}
