// [tests/mirror/integration/histogram_collective.test.rs]
/**
 * =================================================================
 * APARATO: HISTOGRAM CERTIFICATION (V11.0 - TRINITY EVIDENCE)
 * CLASIFICACIÓN: INTEGRATION MIRROR (ESTRATO L2-PIPELINE)
 * RESPONSABILIDAD: CERTIFICACIÓN DEL ARRANQUE FIRST-N Y LA CONSULTA
 *
 * Escenario: first_n = 0 con un generador de una sola cubeta {0}.
 * Diez PUTs con objeto f64 alimentan el histograma del predicado
 * rastreado; la consulta HISTOGRAM al datastore propietario devuelve
 * counts[0] = 10 y size = 1.
 * =================================================================
 */

use std::sync::Arc;

use tempfile::TempDir;

use triplex_core_histogram::BucketGenerator;
use triplex_domain_pipeline::{
    Blob, DataType, PutPermutation, ResultRecord, Session, SessionOptions, Status,
};

fn single_bucket_options(workspace: &TempDir) -> SessionOptions {
    SessionOptions::default()
        .with_datastore_prefix(workspace.path().to_path_buf())
        .with_datastore_name("histograms")
        .with_histogram_bootstrap(0, BucketGenerator::Custom(Arc::new(|_| Ok(vec![0.0]))))
        .with_tracked_predicates(vec![b"p".to_vec()])
}

#[tokio::test]
async fn certify_single_bucket_histogram_absorbs_every_sample() {
    println!("\n🧪 [PROVING_GROUNDS]: Validating single-bucket histogram...");

    let workspace = TempDir::new().unwrap();
    let session = Session::open(single_bucket_options(&workspace)).await.unwrap();

    // diez triples con el predicado rastreado y objeto f64 variable
    let triples = (0..10)
        .map(|index| {
            (
                Blob::from_u64(index),
                Blob::from_str_bytes("p"),
                Blob::from_f64(index as f64 * 1.5),
                PutPermutation::SPO,
            )
        })
        .collect();
    session.bput(triples).await.unwrap();
    assert_eq!(session.flush_puts().await.unwrap().success_count(), 10);

    // consulta al datastore propietario (mundo de uno: id 0)
    session.histogram(0, b"p").unwrap();
    let results = session.flush_histograms().await.unwrap();

    assert_eq!(results.len(), 1);
    match results.iter().next().unwrap() {
        ResultRecord::Histogram { status, histogram, datastore, .. } => {
            assert_eq!(*status, Status::Success);
            assert_eq!(*datastore, 0);
            let snapshot = histogram.as_ref().expect("successful query carries a snapshot");
            assert_eq!(snapshot.size(), 1);
            assert_eq!(snapshot.buckets, vec![0.0]);
            assert_eq!(snapshot.counts, vec![10]);
            assert_eq!(snapshot.name, b"p".to_vec());
        }
        other => panic!("INTEGRITY_COLLAPSE: unexpected record {:?}", other),
    }

    session.close().await.unwrap();
    println!("   ✅ [SUCCESS]: counts[0] = 10 certified.");
}

#[tokio::test]
async fn certify_untracked_predicates_answer_in_error() {
    let workspace = TempDir::new().unwrap();
    let session = Session::open(single_bucket_options(&workspace)).await.unwrap();

    session.histogram(0, b"never-tracked").unwrap();
    let results = session.flush_histograms().await.unwrap();

    assert_eq!(results.len(), 1);
    match results.iter().next().unwrap() {
        ResultRecord::Histogram { status, histogram, .. } => {
            assert_eq!(*status, Status::Error);
            assert!(histogram.is_none());
        }
        other => panic!("INTEGRITY_COLLAPSE: unexpected record {:?}", other),
    }

    session.close().await.unwrap();
}

#[tokio::test]
async fn certify_out_of_census_histogram_ids_fail_immediately() {
    let workspace = TempDir::new().unwrap();
    let session = Session::open(single_bucket_options(&workspace)).await.unwrap();

    // id 7 fuera del censo de 1: fallo inmediato sin tocar paquetes
    session.histogram(7, b"p").unwrap();
    let results = session.flush_histograms().await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results.success_count(), 0);

    session.close().await.unwrap();
}

#[tokio::test]
async fn certify_have_histogram_accessor_sees_local_tracking() {
    let workspace = TempDir::new().unwrap();
    let session = Session::open(single_bucket_options(&workspace)).await.unwrap();

    assert!(session.have_histogram(0, b"p").await.unwrap());
    assert!(!session.have_histogram(0, b"q").await.unwrap());
    assert!(session.have_histogram(5, b"p").await.is_err(), "non-local id");

    session.close().await.unwrap();
}
