// [tests/mirror/integration/putget_roundtrip.test.rs]
/**
 * =================================================================
 * APARATO: PUT/GET ROUNDTRIP CERTIFICATION (V12.0 - TRINITY EVIDENCE)
 * CLASIFICACIÓN: INTEGRATION MIRROR (ESTRATO L2-PIPELINE)
 * RESPONSABILIDAD: CERTIFICACIÓN DEL CAMINO COMPLETO DE LA TUBERÍA
 *
 * Valida la cadena completa en un mundo de un rango:
 * encolar → barajar → empaquetar → despacho local → datastore →
 * respuesta → re-ligado de manillas → resultados.
 * =================================================================
 */

use tempfile::TempDir;

use triplex_domain_pipeline::{
    Blob, DataType, PutPermutation, ResultRecord, Session, SessionOptions, Status,
};

fn single_rank_options(workspace: &TempDir) -> SessionOptions {
    SessionOptions::default()
        .with_datastore_prefix(workspace.path().to_path_buf())
        .with_datastore_name("roundtrip")
}

#[tokio::test]
async fn certify_put_then_get_roundtrip() {
    println!("\n🧪 [PROVING_GROUNDS]: Validating PUT→GET roundtrip...");

    let workspace = TempDir::new().expect("CRITICAL_FAULT: temp strata denied");
    let session = Session::open(single_rank_options(&workspace))
        .await
        .expect("CRITICAL_FAULT: session ignition failed");

    // 1. ESCRITURA: (S=u64 42, P=u64 7, O=f64 6.0)
    session
        .put(
            Blob::from_u64(42),
            Blob::from_u64(7),
            Blob::from_f64(6.0),
            PutPermutation::SPO,
        )
        .await
        .unwrap();

    let put_results = session.flush_puts().await.unwrap();
    assert_eq!(put_results.len(), 1, "one ordering, one PUT result");
    assert_eq!(put_results.success_count(), 1);

    // 2. LECTURA PUNTUAL
    session
        .get(Blob::from_u64(42), Blob::from_u64(7), DataType::Double)
        .unwrap();
    let get_results = session.flush_gets().await.unwrap();
    assert_eq!(get_results.len(), 1);

    match get_results.iter().next().unwrap() {
        ResultRecord::Get { status, subject, predicate, object, .. } => {
            assert_eq!(*status, Status::Success);
            // las manillas devueltas re-ligan los blobs originales
            assert_eq!(subject.as_u64(), Some(42));
            assert_eq!(predicate.as_u64(), Some(7));
            let object = object.as_ref().expect("successful GET carries its object");
            assert_eq!(object.as_f64(), Some(6.0));
        }
        other => panic!("INTEGRITY_COLLAPSE: unexpected record {:?}", other),
    }

    session.close().await.unwrap();
    println!("   ✅ [SUCCESS]: Roundtrip parity confirmed.");
}

#[tokio::test]
async fn certify_missing_triple_reports_error() {
    let workspace = TempDir::new().unwrap();
    let session = Session::open(single_rank_options(&workspace)).await.unwrap();

    // sin PUT previo: el GET responde en error y sin objeto
    session
        .get(
            Blob::from_str_bytes("never-written"),
            Blob::from_str_bytes("nowhere"),
            DataType::Double,
        )
        .unwrap();
    let results = session.flush_gets().await.unwrap();

    assert_eq!(results.len(), 1);
    match results.iter().next().unwrap() {
        ResultRecord::Get { status, object, .. } => {
            assert_eq!(*status, Status::Error);
            assert!(object.is_none(), "failed GET carries no object");
        }
        other => panic!("INTEGRITY_COLLAPSE: unexpected record {:?}", other),
    }

    session.close().await.unwrap();
}

#[tokio::test]
async fn certify_permutation_mask_multiplies_responses() {
    let workspace = TempDir::new().unwrap();
    let session = Session::open(single_rank_options(&workspace)).await.unwrap();

    // las cuatro ordenaciones activas: cuatro PUTs encolados
    session
        .put(
            Blob::from_str_bytes("subject"),
            Blob::from_str_bytes("predicate"),
            Blob::from_str_bytes("object"),
            PutPermutation::ALL,
        )
        .await
        .unwrap();

    let results = session.flush_puts().await.unwrap();
    assert_eq!(
        results.len() as u32,
        PutPermutation::ALL.popcount(),
        "response count equals Σ popcount(permutations)"
    );
    assert_eq!(results.success_count(), 4);

    // la ordenación inversa (P,S)→O es recuperable
    session
        .get(
            Blob::from_str_bytes("predicate"),
            Blob::from_str_bytes("subject"),
            DataType::Byte,
        )
        .unwrap();
    let reversed = session.flush_gets().await.unwrap();
    assert_eq!(reversed.success_count(), 1);

    session.close().await.unwrap();
}

#[tokio::test]
async fn certify_delete_removes_the_triple() {
    let workspace = TempDir::new().unwrap();
    let session = Session::open(single_rank_options(&workspace)).await.unwrap();

    session
        .put(
            Blob::from_u64(1),
            Blob::from_u64(2),
            Blob::from_u64(3),
            PutPermutation::SPO,
        )
        .await
        .unwrap();
    assert_eq!(session.flush_puts().await.unwrap().success_count(), 1);

    session.delete(Blob::from_u64(1), Blob::from_u64(2)).unwrap();
    let deletes = session.flush_deletes().await.unwrap();
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes.success_count(), 1);

    session
        .get(Blob::from_u64(1), Blob::from_u64(2), DataType::Uint64)
        .unwrap();
    let gets = session.flush_gets().await.unwrap();
    assert_eq!(gets.success_count(), 0, "deleted triple is unreachable");

    session.close().await.unwrap();
}

#[tokio::test]
async fn certify_argument_faults_leave_queues_untouched() {
    let workspace = TempDir::new().unwrap();
    let session = Session::open(single_rank_options(&workspace)).await.unwrap();

    // sujeto vacío: fallo inmediato de clase Argument
    assert!(session
        .put(
            Blob::null(),
            Blob::from_u64(7),
            Blob::from_f64(6.0),
            PutPermutation::SPO,
        )
        .await
        .is_err());

    assert!(session
        .get(Blob::from_u64(1), Blob::null(), DataType::Double)
        .is_err());

    // nada quedó encolado
    assert!(session.flush_puts().await.unwrap().is_empty());
    assert!(session.flush_gets().await.unwrap().is_empty());

    session.close().await.unwrap();
}

#[tokio::test]
async fn certify_session_accessors_report_runtime_facts() {
    let workspace = TempDir::new().unwrap();
    let session = Session::open(single_rank_options(&workspace)).await.unwrap();

    assert_eq!(session.rank(), 0);
    assert_eq!(session.world_size(), 1);
    assert!(session.is_range_server());
    assert_eq!(session.range_server_count(), 1);
    assert_eq!(session.datastore_count(), 1);
    assert_eq!(session.hash_name(), "SUM_MOD_DATASTORES");
    assert_eq!(session.datastore_name(), "roundtrip");

    session.close().await.unwrap();

    // tras el cierre, la sesión rechaza nuevas operaciones
    assert!(session
        .get(Blob::from_u64(1), Blob::from_u64(2), DataType::Byte)
        .is_err());
}
