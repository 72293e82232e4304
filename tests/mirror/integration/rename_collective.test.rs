// [tests/mirror/integration/rename_collective.test.rs]
/**
 * =================================================================
 * APARATO: RENAME COLLECTIVE CERTIFICATION (V11.0 - TRINITY EVIDENCE)
 * CLASIFICACIÓN: INTEGRATION MIRROR (ESTRATO L2-PIPELINE)
 * RESPONSABILIDAD: CERTIFICACIÓN DEL RENOMBRADO COLECTIVO
 *
 * Cada servidor cristaliza, cierra y reabre sus almacenes bajo el
 * nuevo nombre base, emitiendo un SYNC por datastore. El material
 * previo deja de ser alcanzable: el GET posterior responde en error.
 * =================================================================
 */

use tempfile::TempDir;

use triplex_domain_pipeline::{
    Blob, DataType, PutPermutation, ResultRecord, Session, SessionOptions, Status,
};

#[tokio::test]
async fn certify_rename_reopens_empty_stores() {
    println!("\n🧪 [PROVING_GROUNDS]: Validating collective rename...");

    let workspace = TempDir::new().unwrap();
    let options = SessionOptions::default()
        .with_datastore_prefix(workspace.path().to_path_buf())
        .with_datastore_name("census-v1");
    let session = Session::open(options).await.unwrap();

    // 1. ESCRITURA Y LECTURA PREVIA: el triple es alcanzable
    session
        .put(
            Blob::from_u64(42),
            Blob::from_u64(7),
            Blob::from_f64(6.0),
            PutPermutation::SPO,
        )
        .await
        .unwrap();
    assert_eq!(session.flush_puts().await.unwrap().success_count(), 1);

    session
        .get(Blob::from_u64(42), Blob::from_u64(7), DataType::Double)
        .unwrap();
    assert_eq!(session.flush_gets().await.unwrap().success_count(), 1);

    // 2. RENOMBRADO COLECTIVO: un SYNC por datastore local
    let rename_results = session.change_datastore_name("census-v2").await.unwrap();
    assert_eq!(rename_results.len(), 1);
    match rename_results.iter().next().unwrap() {
        ResultRecord::Sync { status, datastore } => {
            assert_eq!(*status, Status::Success);
            assert_eq!(*datastore, 0);
        }
        other => panic!("INTEGRITY_COLLAPSE: unexpected record {:?}", other),
    }
    assert_eq!(session.datastore_name(), "census-v2");

    // 3. LECTURA POSTERIOR: el almacén reabierto está vacío
    session
        .get(Blob::from_u64(42), Blob::from_u64(7), DataType::Double)
        .unwrap();
    let post_rename = session.flush_gets().await.unwrap();
    assert_eq!(post_rename.len(), 1);
    assert_eq!(post_rename.success_count(), 0);

    // 4. EL ALMACÉN RENOMBRADO ACEPTA MATERIAL NUEVO
    session
        .put(
            Blob::from_u64(1),
            Blob::from_u64(1),
            Blob::from_u64(1),
            PutPermutation::SPO,
        )
        .await
        .unwrap();
    assert_eq!(session.flush_puts().await.unwrap().success_count(), 1);

    session.close().await.unwrap();
    println!("   ✅ [SUCCESS]: Collective rename certified.");
}

#[tokio::test]
async fn certify_sync_emits_one_record_per_local_datastore() {
    let workspace = TempDir::new().unwrap();
    let options = SessionOptions::default()
        .with_datastore_prefix(workspace.path().to_path_buf())
        .with_datastore_name("sync-census")
        .with_datastores_per_server(3);
    let session = Session::open(options).await.unwrap();

    assert_eq!(session.datastore_count(), 3);

    let results = session.sync().await.unwrap();
    assert_eq!(results.len(), 3, "one SYNC per local datastore");

    let datastores: Vec<i32> = results.iter().map(ResultRecord::datastore).collect();
    assert_eq!(datastores, vec![0, 1, 2]);
    assert_eq!(results.success_count(), 3);

    session.close().await.unwrap();
}

#[tokio::test]
async fn certify_empty_rename_is_an_argument_fault() {
    let workspace = TempDir::new().unwrap();
    let options = SessionOptions::default()
        .with_datastore_prefix(workspace.path().to_path_buf())
        .with_datastore_name("unchanged");
    let session = Session::open(options).await.unwrap();

    assert!(session.change_datastore_name("").await.is_err());
    assert_eq!(session.datastore_name(), "unchanged");

    session.close().await.unwrap();
}
