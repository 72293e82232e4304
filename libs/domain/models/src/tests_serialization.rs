// [libs/domain/models/src/tests_serialization.rs]
/**
 * =================================================================
 * APARATO: DOMAIN SERIALIZATION TEST (V12.0 - INTEGRATION LEVEL)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L2-MODELS)
 * RESPONSABILIDAD: CERTIFICACIÓN DE PARIDAD JSON DEL VOCABULARIO
 *
 * # Mathematical Proof (Byte Fidelity):
 * Los Blobs transportan material binario arbitrario. La serialización
 * JSON (usada por el sobre de anuncio del transporte y por utilidades
 * de diagnóstico) debe preservar cada byte y cada etiqueta de tipo
 * sin pérdida, de lo contrario la trama reconstruida divergiría de la
 * original en el lado remoto.
 * =================================================================
 */

#[cfg(test)]
mod tests {
    use crate::{Blob, DataType, GetOpKind, Operation, PutPermutation, Status};

    #[test]
    fn certify_blob_json_roundtrip() {
        println!("\n🧪 [PROVING_GROUNDS]: Validating typed Blob JSON parity...");

        let original = Blob::new(vec![0x00, 0xFF, 0x7E, 0x2D], DataType::Byte);

        let serialized = serde_json::to_string(&original)
            .expect("CRITICAL_FAULT: Blob serialization collapsed.");
        let recovered: Blob = serde_json::from_str(&serialized)
            .expect("CRITICAL_FAULT: Blob deserialization failed.");

        assert_eq!(recovered, original, "L1_DATA_CORRUPTION: byte material drifted.");
        assert_eq!(recovered.data_type(), DataType::Byte);

        println!("   ✅ [SUCCESS]: Blob byte material preserved bit-perfect.");
    }

    #[test]
    fn certify_operation_catalog_roundtrip() {
        let catalog = [
            Operation::Put,
            Operation::Get,
            Operation::GetOp,
            Operation::Delete,
            Operation::Histogram,
            Operation::Sync,
        ];

        for operation in catalog {
            let serialized = serde_json::to_string(&operation)
                .expect("CRITICAL_FAULT: Operation serialization collapsed.");
            let recovered: Operation = serde_json::from_str(&serialized)
                .expect("CRITICAL_FAULT: Operation deserialization failed.");
            assert_eq!(recovered, operation);
        }
    }

    #[test]
    fn certify_permutation_mask_and_status_roundtrip() {
        let mask = PutPermutation::SPO.union(PutPermutation::OS);
        let serialized = serde_json::to_string(&mask).unwrap();
        let recovered: PutPermutation = serde_json::from_str(&serialized).unwrap();
        assert_eq!(recovered, mask);
        assert_eq!(recovered.popcount(), 2);

        let status: Status = serde_json::from_str(
            &serde_json::to_string(&Status::Error).unwrap(),
        )
        .unwrap();
        assert_eq!(status, Status::Error);

        let kind: GetOpKind = serde_json::from_str(
            &serde_json::to_string(&GetOpKind::Prev).unwrap(),
        )
        .unwrap();
        assert_eq!(kind, GetOpKind::Prev);
    }
}
