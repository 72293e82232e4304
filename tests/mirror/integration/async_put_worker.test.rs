// [tests/mirror/integration/async_put_worker.test.rs]
/**
 * =================================================================
 * APARATO: ASYNC PUT WORKER CERTIFICATION (V11.1 - TRINITY EVIDENCE)
 * CLASIFICACIÓN: INTEGRATION MIRROR (ESTRATO L2-PIPELINE)
 * RESPONSABILIDAD: CERTIFICACIÓN DEL DRENAJE EN SEGUNDO PLANO
 *
 * Con la marca de agua activa, Put/BPut señalan la condición y nunca
 * bloquean: el worker drena la cola entera bajo el cerrojo y anexa
 * sus resultados al búfer que FlushPuts entrega. Por debajo de la
 * marca, el material espera al flush explícito.
 * =================================================================
 */

use std::time::Duration;

use tempfile::TempDir;

use triplex_domain_pipeline::{
    Blob, DataType, PutPermutation, Results, Session, SessionOptions,
};

fn watermark_options(workspace: &TempDir, watermark: usize) -> SessionOptions {
    SessionOptions::default()
        .with_datastore_prefix(workspace.path().to_path_buf())
        .with_datastore_name("write-behind")
        .with_start_async_puts_at(watermark)
}

fn seed_triples(volume: u64) -> Vec<(Blob, Blob, Blob, PutPermutation)> {
    (0..volume)
        .map(|index| {
            (
                Blob::from_u64(index),
                Blob::from_u64(index + 100),
                Blob::from_f64(index as f64),
                PutPermutation::SPO,
            )
        })
        .collect()
}

/// Recolecta resultados de FlushPuts hasta el volumen esperado,
/// dando margen al worker para completar su ráfaga.
async fn collect_put_results(session: &Session, expected: usize) -> Results {
    let mut collected = Results::new();
    for _ in 0..100 {
        collected.append(session.flush_puts().await.unwrap());
        if collected.len() >= expected {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    collected
}

#[tokio::test]
async fn certify_watermark_triggers_the_background_drain() {
    println!("\n🧪 [PROVING_GROUNDS]: Validating write-behind watermark...");

    let workspace = TempDir::new().unwrap();
    let session = Session::open(watermark_options(&workspace, 4)).await.unwrap();

    // cinco PUTs superan la marca de agua de cuatro: señal al worker
    session.bput(seed_triples(5)).await.unwrap();

    let results = collect_put_results(&session, 5).await;
    assert_eq!(results.len(), 5);
    assert_eq!(results.success_count(), 5);

    // el material drenado es legible
    session
        .get(Blob::from_u64(3), Blob::from_u64(103), DataType::Double)
        .unwrap();
    assert_eq!(session.flush_gets().await.unwrap().success_count(), 1);

    session.close().await.unwrap();
    println!("   ✅ [SUCCESS]: Background drain certified.");
}

#[tokio::test]
async fn certify_below_watermark_material_waits_for_the_flush() {
    let workspace = TempDir::new().unwrap();
    let session = Session::open(watermark_options(&workspace, 10)).await.unwrap();

    // dos PUTs bajo la marca de diez: el worker no despierta
    session.bput(seed_triples(2)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // el flush explícito drena la cola en línea
    let results = session.flush_puts().await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results.success_count(), 2);

    session.close().await.unwrap();
}

#[tokio::test]
async fn certify_synchronous_mode_answers_before_returning() {
    let workspace = TempDir::new().unwrap();
    // marca de agua cero: sin worker, envío en línea en cada Put
    let session = Session::open(watermark_options(&workspace, 0)).await.unwrap();

    session.bput(seed_triples(3)).await.unwrap();

    // las respuestas ya esperan en el búfer sin margen adicional
    let results = session.flush_puts().await.unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results.success_count(), 3);

    session.close().await.unwrap();
}

#[tokio::test]
async fn certify_close_is_idempotent_and_halts_the_worker() {
    let workspace = TempDir::new().unwrap();
    let session = Session::open(watermark_options(&workspace, 4)).await.unwrap();

    session.bput(seed_triples(5)).await.unwrap();
    let _ = collect_put_results(&session, 5).await;

    session.close().await.unwrap();
    session.close().await.unwrap();

    assert!(session.bput(seed_triples(1)).await.is_err());
}
