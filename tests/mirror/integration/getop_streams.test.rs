// [tests/mirror/integration/getop_streams.test.rs]
/**
 * =================================================================
 * APARATO: GETOP STREAM CERTIFICATION (V12.1 - TRINITY EVIDENCE)
 * CLASIFICACIÓN: INTEGRATION MIRROR (ESTRATO L2-PIPELINE)
 * RESPONSABILIDAD: CERTIFICACIÓN DE RECORRIDOS ORDENADOS
 *
 * Los predicados numéricos se codifican con el motor de orden
 * lexicográfico, de modo que el recorrido de bytes del datastore
 * coincide con el orden numérico: NEXT asciende, PREV desciende,
 * FIRST y LAST anclan en los extremos.
 * =================================================================
 */

use tempfile::TempDir;

use triplex_core_order::elen::{encode_floating_point, Symbols, DOUBLE_PRECISION};
use triplex_domain_pipeline::{
    Blob, DataType, GetOpKind, PutPermutation, ResultRecord, Session, SessionOptions,
    Status,
};

fn ordered_predicate(value: f64) -> Blob {
    Blob::new(
        encode_floating_point(value, DOUBLE_PRECISION, Symbols::ORDERED).into_bytes(),
        DataType::Double,
    )
}

/// Fixture compartida: (S=u64 0, P=elen(i), O=f64 -i) para i en 0..10.
async fn seeded_session(workspace: &TempDir) -> Session {
    let options = SessionOptions::default()
        .with_datastore_prefix(workspace.path().to_path_buf())
        .with_datastore_name("getop-streams");
    let session = Session::open(options).await.unwrap();

    let triples = (0..10)
        .map(|index| {
            (
                Blob::from_u64(0),
                ordered_predicate(index as f64),
                Blob::from_f64(-(index as f64)),
                PutPermutation::SPO,
            )
        })
        .collect();
    session.bput(triples).await.unwrap();
    assert_eq!(session.flush_puts().await.unwrap().success_count(), 10);

    session
}

fn single_getop(results: &triplex_domain_pipeline::Results) -> (&Status, &Vec<Blob>, &Vec<Blob>) {
    assert_eq!(results.len(), 1);
    match results.iter().next().unwrap() {
        ResultRecord::GetOp { status, predicates, objects, .. } => {
            (status, predicates, objects)
        }
        other => panic!("INTEGRITY_COLLAPSE: unexpected record {:?}", other),
    }
}

#[tokio::test]
async fn certify_next_streams_in_ascending_predicate_order() {
    println!("\n🧪 [PROVING_GROUNDS]: Validating GETOP NEXT stream...");

    let workspace = TempDir::new().unwrap();
    let session = seeded_session(&workspace).await;

    session
        .getop(
            Blob::from_u64(0),
            ordered_predicate(0.0),
            DataType::Double,
            10,
            GetOpKind::Next,
        )
        .unwrap();
    let results = session.flush_getops().await.unwrap();

    let (status, predicates, objects) = single_getop(&results);
    assert_eq!(*status, Status::Success);
    assert_eq!(objects.len(), 10);

    for (index, object) in objects.iter().enumerate() {
        assert_eq!(
            object.as_f64(),
            Some(-(index as f64)),
            "object {} drifted",
            index
        );
    }

    // los predicados vuelven en orden ascendente estricto de bytes
    for window in predicates.windows(2) {
        assert!(window[0].data() < window[1].data(), "predicate order violated");
    }

    session.close().await.unwrap();
    println!("   ✅ [SUCCESS]: Ascending stream certified.");
}

#[tokio::test]
async fn certify_prev_streams_in_descending_predicate_order() {
    let workspace = TempDir::new().unwrap();
    let session = seeded_session(&workspace).await;

    session
        .getop(
            Blob::from_u64(0),
            ordered_predicate(9.0),
            DataType::Double,
            10,
            GetOpKind::Prev,
        )
        .unwrap();
    let results = session.flush_getops().await.unwrap();

    let (status, predicates, objects) = single_getop(&results);
    assert_eq!(*status, Status::Success);
    assert_eq!(objects.len(), 10);

    for (index, object) in objects.iter().enumerate() {
        let expected = -(9.0 - index as f64);
        assert_eq!(object.as_f64(), Some(expected), "object {} drifted", index);
    }

    for window in predicates.windows(2) {
        assert!(window[0].data() > window[1].data(), "descending order violated");
    }

    session.close().await.unwrap();
}

#[tokio::test]
async fn certify_first_and_last_anchor_at_the_extremes() {
    let workspace = TempDir::new().unwrap();
    let session = seeded_session(&workspace).await;

    // FIRST con k < N: exactamente los k primeros en orden (S,P)
    session
        .getop(Blob::null(), Blob::null(), DataType::Double, 3, GetOpKind::First)
        .unwrap();
    let first = session.flush_getops().await.unwrap();
    let (status, _, objects) = single_getop(&first);
    assert_eq!(*status, Status::Success);
    assert_eq!(objects.len(), 3);
    assert_eq!(objects[0].as_f64(), Some(0.0));

    // LAST: desde la cola hacia atrás
    session
        .getop(Blob::null(), Blob::null(), DataType::Double, 2, GetOpKind::Last)
        .unwrap();
    let last = session.flush_getops().await.unwrap();
    let (status, _, objects) = single_getop(&last);
    assert_eq!(*status, Status::Success);
    assert_eq!(objects[0].as_f64(), Some(-9.0));

    session.close().await.unwrap();
}

#[tokio::test]
async fn certify_eq_returns_exactly_the_anchor() {
    let workspace = TempDir::new().unwrap();
    let session = seeded_session(&workspace).await;

    session
        .getop(
            Blob::from_u64(0),
            ordered_predicate(4.0),
            DataType::Double,
            10,
            GetOpKind::Eq,
        )
        .unwrap();
    let results = session.flush_getops().await.unwrap();

    let (status, _, objects) = single_getop(&results);
    assert_eq!(*status, Status::Success);
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].as_f64(), Some(-4.0));

    session.close().await.unwrap();
}

#[tokio::test]
async fn certify_invalid_getop_is_enqueued_and_fails_per_slot() {
    let workspace = TempDir::new().unwrap();
    let session = seeded_session(&workspace).await;

    // el registro inválido se encola igualmente y responde en error
    session
        .getop(
            Blob::from_u64(0),
            ordered_predicate(0.0),
            DataType::Double,
            10,
            GetOpKind::Invalid,
        )
        .unwrap();
    let results = session.flush_getops().await.unwrap();

    assert_eq!(results.len(), 1, "the invalid record still yields one result");
    let (status, _, objects) = single_getop(&results);
    assert_eq!(*status, Status::Error);
    assert!(objects.is_empty());

    session.close().await.unwrap();
}

#[tokio::test]
async fn certify_anchored_getop_rejects_empty_anchors() {
    let workspace = TempDir::new().unwrap();
    let session = seeded_session(&workspace).await;

    assert!(session
        .getop(Blob::null(), Blob::null(), DataType::Double, 5, GetOpKind::Next)
        .is_err());

    session.close().await.unwrap();
}
