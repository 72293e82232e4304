// [libs/domain/pipeline/src/rangeserver.rs]
/*!
 * =================================================================
 * APARATO: RANGE SERVER LOOP (V14.0 - SINGLE THREADED PER RANK)
 * CLASIFICACIÓN: DOMAIN LAYER (ESTRATO L2-PIPELINE)
 * RESPONSABILIDAD: RECIBIR → DESPACHAR → DATASTORE → RESPONDER
 *
 * Un solo bucle por rango, cooperativo con el datastore local. Cada
 * trama entrante se desempaqueta, se despacha ranura a ranura contra
 * la unidad local que selecciona dst mod D (orden de ranuras
 * preservado) y se responde por el mismo transporte. Al apagarse, el
 * bucle termina la petición en vuelo y sale; no hay más garantía de
 * durabilidad que la del propio motor.
 * =================================================================
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use triplex_domain_models::{Blob, GetOpKind, Status};
use triplex_infra_datastore::{DatastoreUnit, ScanKind};
use triplex_infra_transport::InboundExchange;
use triplex_infra_wire::{
    pack_response, unpack_request, BlobRef, DeleteResponse, GetOpResponse, GetResponse,
    HistogramResponse, PutResponse, RequestPacket, ResponsePacket, SyncResponse,
};

/// Despacha un paquete de petición contra las unidades locales del
/// servidor, ranura a ranura y en orden.
pub fn dispatch(
    units: &mut [DatastoreUnit],
    request: &RequestPacket,
    datastores_per_server: usize,
) -> ResponsePacket {
    // la respuesta invierte los extremos de la petición
    let src = request.dst();
    let dst = request.src();

    let unit_index = (request.dst().max(0) as usize) % datastores_per_server.max(1);

    match request {
        RequestPacket::Put(put) => {
            let mut response = PutResponse::new(src, dst, put.count());
            for slot in 0..put.count() {
                let status = match units.get_mut(unit_index) {
                    Some(unit) => match unit.put(
                        &put.subjects[slot],
                        &put.predicates[slot],
                        &put.objects[slot],
                    ) {
                        Ok(()) => Status::Success,
                        Err(datastore_fault) => {
                            debug!("🗄️ [RANGE_SERVER]: PUT slot fault: {}", datastore_fault);
                            Status::Error
                        }
                    },
                    None => Status::Error,
                };

                response
                    .add(
                        status,
                        echo_ref(&put.subjects[slot], put.subject_refs[slot]),
                        echo_ref(&put.predicates[slot], put.predicate_refs[slot]),
                    )
                    .expect("response capacity mirrors the request");
            }
            ResponsePacket::Put(response)
        }

        RequestPacket::Get(get) => {
            let mut response = GetResponse::new(src, dst, get.count());
            for slot in 0..get.count() {
                let outcome = units
                    .get(unit_index)
                    .ok_or(())
                    .and_then(|unit| {
                        unit.get(&get.subjects[slot], &get.predicates[slot]).map_err(|_| ())
                    });

                let (status, object) = match outcome {
                    // el objeto vuelve etiquetado con el tipo que el
                    // llamante declaró esperar
                    Ok((bytes, _stored_type)) => (
                        Status::Success,
                        Some(Blob::new(bytes, get.object_types[slot])),
                    ),
                    Err(()) => (Status::Error, None),
                };

                response
                    .add(
                        status,
                        echo_ref(&get.subjects[slot], get.subject_refs[slot]),
                        echo_ref(&get.predicates[slot], get.predicate_refs[slot]),
                        object,
                    )
                    .expect("response capacity mirrors the request");
            }
            ResponsePacket::Get(response)
        }

        RequestPacket::GetOp(getop) => {
            let mut response = GetOpResponse::new(src, dst, getop.count());
            for slot in 0..getop.count() {
                let (status, subjects, predicates, objects) =
                    dispatch_getop_slot(units, unit_index, getop, slot);
                response
                    .add(status, subjects, predicates, objects)
                    .expect("response capacity mirrors the request");
            }
            ResponsePacket::GetOp(response)
        }

        RequestPacket::Delete(delete) => {
            let mut response = DeleteResponse::new(src, dst, delete.count());
            for slot in 0..delete.count() {
                let status = match units.get_mut(unit_index) {
                    Some(unit) => match unit
                        .delete(&delete.subjects[slot], &delete.predicates[slot])
                    {
                        Ok(()) => Status::Success,
                        Err(_) => Status::Error,
                    },
                    None => Status::Error,
                };

                response
                    .add(
                        status,
                        echo_ref(&delete.subjects[slot], delete.subject_refs[slot]),
                        echo_ref(&delete.predicates[slot], delete.predicate_refs[slot]),
                    )
                    .expect("response capacity mirrors the request");
            }
            ResponsePacket::Delete(response)
        }

        RequestPacket::Histogram(histogram) => {
            let mut response = HistogramResponse::new(src, dst, histogram.count());
            for slot in 0..histogram.count() {
                let snapshot = units
                    .get(unit_index)
                    .and_then(|unit| unit.histogram(histogram.names[slot].data()).ok());

                let status = if snapshot.is_some() { Status::Success } else { Status::Error };
                response
                    .add(status, snapshot)
                    .expect("response capacity mirrors the request");
            }
            ResponsePacket::Histogram(response)
        }

        RequestPacket::Sync(_) => {
            // un SYNC sincroniza todas las unidades locales del servidor
            let mut response = SyncResponse::new(src, dst, units.len());
            for unit in units.iter_mut() {
                let status = match unit.sync() {
                    Ok(()) => Status::Success,
                    Err(_) => Status::Error,
                };
                response.add(status).expect("one slot per local unit");
            }
            ResponsePacket::Sync(response)
        }
    }
}

fn dispatch_getop_slot(
    units: &[DatastoreUnit],
    unit_index: usize,
    getop: &triplex_infra_wire::GetOpRequest,
    slot: usize,
) -> (Status, Vec<Blob>, Vec<Blob>, Vec<Blob>) {
    let unit = match units.get(unit_index) {
        Some(unit) => unit,
        None => return (Status::Error, Vec::new(), Vec::new(), Vec::new()),
    };

    // el registro inválido se encola igualmente y responde en error
    let scan_kind = match getop.kinds[slot] {
        GetOpKind::Eq => ScanKind::Eq,
        GetOpKind::Next => ScanKind::Next,
        GetOpKind::Prev => ScanKind::Prev,
        GetOpKind::First => ScanKind::First,
        GetOpKind::Last => ScanKind::Last,
        GetOpKind::Invalid => {
            return (Status::Error, Vec::new(), Vec::new(), Vec::new());
        }
    };

    let anchor_subject = (!getop.subjects[slot].is_empty()).then(|| &getop.subjects[slot]);
    let anchor_predicate =
        (!getop.predicates[slot].is_empty()).then(|| &getop.predicates[slot]);

    let scanned = unit.scan(
        anchor_subject,
        anchor_predicate,
        scan_kind,
        getop.num_recs[slot] as usize,
    );

    match scanned {
        Ok(triples) => {
            let mut subjects = Vec::with_capacity(triples.len());
            let mut predicates = Vec::with_capacity(triples.len());
            let mut objects = Vec::with_capacity(triples.len());
            for triple in triples {
                // las claves no persisten etiquetas: sujeto y predicado
                // heredan los tipos declarados en la petición
                subjects.push(Blob::new(triple.subject, getop.subjects[slot].data_type()));
                predicates.push(Blob::new(
                    triple.predicate,
                    getop.predicates[slot].data_type(),
                ));
                objects.push(Blob::new(triple.object, triple.object_type));
            }
            (Status::Success, subjects, predicates, objects)
        }
        Err(_) => (Status::Error, Vec::new(), Vec::new(), Vec::new()),
    }
}

fn echo_ref(blob: &Blob, ref_bits: u64) -> BlobRef {
    BlobRef { ref_bits, len: blob.len() as u64, data_type: blob.data_type() }
}

/**
 * Bucle de eventos del servidor de rango: consume la cola de entrada
 * del transporte hasta el cierre del canal o la caída de la bandera.
 * Una trama imparseable responde vacío; el cliente falla las ranuras
 * de ese paquete con clase códec.
 */
pub fn spawn_event_loop(
    mut inbound: mpsc::Receiver<InboundExchange>,
    units: Arc<Mutex<Vec<DatastoreUnit>>>,
    datastores_per_server: usize,
    max_ops_per_send: usize,
    running: Arc<AtomicBool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!("🛰️ [RANGE_SERVER]: Event loop online.");

        while let Some(exchange) = inbound.recv().await {
            let reply = match unpack_request(&exchange.material, max_ops_per_send) {
                Ok(request) => {
                    let mut local_units = units.lock().await;
                    let response = dispatch(&mut local_units, &request, datastores_per_server);
                    pack_response(&response)
                }
                Err(codec_fault) => {
                    warn!("⚠️ [RANGE_SERVER]: Frame rejected: {}", codec_fault);
                    Vec::new()
                }
            };

            let _ = exchange.reply.send(reply);

            // la petición en vuelo se responde antes de salir
            if !running.load(Ordering::SeqCst) {
                break;
            }
        }

        debug!("🛰️ [RANGE_SERVER]: Event loop drained.");
    })
}
