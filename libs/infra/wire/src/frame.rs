// [libs/infra/wire/src/frame.rs]
/*!
 * =================================================================
 * APARATO: FRAME CURSOR PRIMITIVES (V13.0 - LITTLE ENDIAN)
 * CLASIFICACIÓN: INFRASTRUCTURE CODEC (ESTRATO L3-WIRE)
 * RESPONSABILIDAD: LECTURA/ESCRITURA SECUENCIAL DE CAMPOS DE TRAMA
 *
 * Todos los enteros multibyte viajan en little-endian. Los blobs por
 * valor serializan len:u64 ∥ bytes ∥ type:u8; las referencias de
 * blob serializan ref_bits:u64 ∥ len:u64 ∥ type:u8 sin carga útil.
 * El lector devuelve error de truncamiento en cuanto una lectura
 * excede el material disponible.
 * =================================================================
 */

use byteorder::{ByteOrder, LittleEndian};

use triplex_domain_models::{Blob, DataType};

use crate::errors::WireError;

/// Referencia opaca de blob: manilla de 64 bits que el servidor
/// devuelve intacta para que el cliente re-ligue sus originales.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobRef {
    pub ref_bits: u64,
    pub len: u64,
    pub data_type: DataType,
}

/// Escritor secuencial sobre un búfer propio pre-dimensionado.
pub struct FrameWriter {
    buffer: Vec<u8>,
}

impl FrameWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buffer: Vec::with_capacity(capacity) }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn put_u32(&mut self, value: u32) {
        let mut raw = [0u8; 4];
        LittleEndian::write_u32(&mut raw, value);
        self.buffer.extend_from_slice(&raw);
    }

    pub fn put_i32(&mut self, value: i32) {
        let mut raw = [0u8; 4];
        LittleEndian::write_i32(&mut raw, value);
        self.buffer.extend_from_slice(&raw);
    }

    pub fn put_u64(&mut self, value: u64) {
        let mut raw = [0u8; 8];
        LittleEndian::write_u64(&mut raw, value);
        self.buffer.extend_from_slice(&raw);
    }

    pub fn put_f64(&mut self, value: f64) {
        let mut raw = [0u8; 8];
        LittleEndian::write_f64(&mut raw, value);
        self.buffer.extend_from_slice(&raw);
    }

    /// Blob por valor: len ∥ bytes ∥ type.
    pub fn put_blob(&mut self, blob: &Blob) {
        self.put_u64(blob.len() as u64);
        self.buffer.extend_from_slice(blob.data());
        self.put_u8(blob.data_type().to_wire());
    }

    /// Referencia de blob: ref_bits ∥ len ∥ type, sin carga útil.
    pub fn put_blob_ref(&mut self, blob_ref: &BlobRef) {
        self.put_u64(blob_ref.ref_bits);
        self.put_u64(blob_ref.len);
        self.put_u8(blob_ref.data_type.to_wire());
    }
}

/// Lector secuencial con detección de truncamiento.
pub struct FrameReader<'material> {
    bytes: &'material [u8],
    position: usize,
}

impl<'material> FrameReader<'material> {
    pub fn new(bytes: &'material [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Bytes aún no consumidos.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    fn take(&mut self, len: usize) -> Result<&'material [u8], WireError> {
        if self.remaining() < len {
            return Err(WireError::Truncated {
                needed: len,
                available: self.remaining(),
            });
        }

        let slice = &self.bytes[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    pub fn get_u8(&mut self) -> Result<u8, WireError> {
        Ok(self.take(1)?[0])
    }

    pub fn get_u32(&mut self) -> Result<u32, WireError> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn get_i32(&mut self) -> Result<i32, WireError> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn get_u64(&mut self) -> Result<u64, WireError> {
        Ok(LittleEndian::read_u64(self.take(8)?))
    }

    pub fn get_f64(&mut self) -> Result<f64, WireError> {
        Ok(LittleEndian::read_f64(self.take(8)?))
    }

    pub fn get_blob(&mut self) -> Result<Blob, WireError> {
        let len = self.get_u64()? as usize;
        let payload = self.take(len)?.to_vec();
        let data_type = DataType::from_wire(self.get_u8()?)?;
        Ok(Blob::new(payload, data_type))
    }

    pub fn get_blob_ref(&mut self) -> Result<BlobRef, WireError> {
        let ref_bits = self.get_u64()?;
        let len = self.get_u64()?;
        let data_type = DataType::from_wire(self.get_u8()?)?;
        Ok(BlobRef { ref_bits, len, data_type })
    }
}

/// Bytes que ocupa un blob por valor en la trama.
pub fn blob_wire_size(blob: &Blob) -> usize {
    8 + blob.len() + 1
}

/// Bytes fijos de una referencia de blob en la trama.
pub const BLOB_REF_WIRE_SIZE: usize = 8 + 8 + 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_fields_roundtrip_in_little_endian() {
        let mut writer = FrameWriter::with_capacity(32);
        writer.put_u8(7);
        writer.put_u32(0xAABBCCDD);
        writer.put_i32(-42);
        writer.put_u64(0x1122334455667788);
        writer.put_f64(6.0);
        let material = writer.into_bytes();

        // el primer campo multibyte confirma el orden little-endian
        assert_eq!(&material[1..5], &[0xDD, 0xCC, 0xBB, 0xAA]);

        let mut reader = FrameReader::new(&material);
        assert_eq!(reader.get_u8().unwrap(), 7);
        assert_eq!(reader.get_u32().unwrap(), 0xAABBCCDD);
        assert_eq!(reader.get_i32().unwrap(), -42);
        assert_eq!(reader.get_u64().unwrap(), 0x1122334455667788);
        assert_eq!(reader.get_f64().unwrap(), 6.0);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn blobs_roundtrip_with_their_type_tags() {
        let blob = Blob::from_f64(2.5);
        let mut writer = FrameWriter::with_capacity(blob_wire_size(&blob));
        writer.put_blob(&blob);
        let material = writer.into_bytes();
        assert_eq!(material.len(), blob_wire_size(&blob));

        let mut reader = FrameReader::new(&material);
        assert_eq!(reader.get_blob().unwrap(), blob);
    }

    #[test]
    fn blob_refs_carry_no_payload() {
        let reference = BlobRef { ref_bits: 3, len: 128, data_type: DataType::Uint64 };
        let mut writer = FrameWriter::with_capacity(BLOB_REF_WIRE_SIZE);
        writer.put_blob_ref(&reference);
        let material = writer.into_bytes();
        assert_eq!(material.len(), BLOB_REF_WIRE_SIZE);

        let mut reader = FrameReader::new(&material);
        assert_eq!(reader.get_blob_ref().unwrap(), reference);
    }

    #[test]
    fn truncation_is_detected_mid_field() {
        let mut writer = FrameWriter::with_capacity(8);
        writer.put_u64(99);
        let mut material = writer.into_bytes();
        material.truncate(5);

        let mut reader = FrameReader::new(&material);
        assert!(matches!(
            reader.get_u64(),
            Err(WireError::Truncated { needed: 8, available: 5 })
        ));
    }
}
