// [libs/core/order/src/key.rs]
/*!
 * =================================================================
 * APARATO: TRIPLE KEY CODEC (V11.0 - BIG ENDIAN TAIL)
 * CLASIFICACIÓN: CORE ALGORITHMIC LAYER (ESTRATO L1-CORE)
 * RESPONSABILIDAD: EMPAQUETADO (SUJETO, PREDICADO) ↔ CLAVE ÚNICA
 *
 * # Mathematical Proof (Primary Ordering):
 * La clave es sujeto ∥ predicado ∥ be_u64(len_s) ∥ be_u64(len_p).
 * Las longitudes van al final y en ancho fijo, de modo que la
 * comparación byte a byte queda dominada por los campos variables
 * iniciales: el orden primario es (sujeto, predicado) y las
 * longitudes sólo desambiguan colas idénticas.
 * =================================================================
 */

use crate::errors::KeyError;

/// Bytes fijos que ocupan las dos longitudes big-endian al final.
pub const LENGTH_TAIL_BYTES: usize = 2 * std::mem::size_of::<u64>();

/**
 * Combina sujeto y predicado en una clave única.
 *
 * # Errors:
 * - `KeyError::EmptyField`: sujeto o predicado vacíos.
 */
pub fn sp_to_key(subject: &[u8], predicate: &[u8]) -> Result<Vec<u8>, KeyError> {
    if subject.is_empty() {
        return Err(KeyError::EmptyField("subject"));
    }
    if predicate.is_empty() {
        return Err(KeyError::EmptyField("predicate"));
    }

    let mut key = Vec::with_capacity(subject.len() + predicate.len() + LENGTH_TAIL_BYTES);
    key.extend_from_slice(subject);
    key.extend_from_slice(predicate);
    key.extend_from_slice(&(subject.len() as u64).to_be_bytes());
    key.extend_from_slice(&(predicate.len() as u64).to_be_bytes());

    Ok(key)
}

/**
 * Divide una clave en sus vistas (sujeto, predicado).
 *
 * # Errors:
 * - `KeyError::Truncated`: la clave no puede contener las longitudes
 *   que declara su cola.
 */
pub fn key_to_sp(key: &[u8]) -> Result<(&[u8], &[u8]), KeyError> {
    if key.len() < LENGTH_TAIL_BYTES {
        return Err(KeyError::Truncated { actual: key.len(), declared: LENGTH_TAIL_BYTES });
    }

    let tail = key.len() - LENGTH_TAIL_BYTES;
    let subject_len = u64::from_be_bytes(
        key[tail..tail + 8].try_into().expect("fixed-width slice"),
    ) as usize;
    let predicate_len = u64::from_be_bytes(
        key[tail + 8..].try_into().expect("fixed-width slice"),
    ) as usize;

    let declared = subject_len
        .checked_add(predicate_len)
        .and_then(|sum| sum.checked_add(LENGTH_TAIL_BYTES))
        .ok_or(KeyError::Truncated { actual: key.len(), declared: usize::MAX })?;
    if declared != key.len() {
        return Err(KeyError::Truncated { actual: key.len(), declared });
    }

    Ok((
        &key[..subject_len],
        &key[subject_len..subject_len + predicate_len],
    ))
}
