// [libs/domain/pipeline/src/shuffle.rs]
/*!
 * =================================================================
 * APARATO: SHUFFLE + PACKETIZER (V14.1 - PER DESTINATION FILL)
 * CLASIFICACIÓN: DOMAIN LAYER (ESTRATO L2-PIPELINE)
 * RESPONSABILIDAD: COLA PENDIENTE → PAQUETES ACOTADOS POR DESTINO
 *
 * El barajado procesa la lista pendiente de cabeza a cola: evalúa el
 * hash, valida el id contra el censo, transfiere la propiedad de los
 * blobs al paquete abierto del destino y lo cierra al llenarse. El
 * orden dentro de un destino se preserva; entre destinos no se
 * promete orden. Un hash fuera de rango produce un resultado de
 * error inmediato sin tocar ningún paquete.
 * =================================================================
 */

use std::collections::BTreeMap;
use std::time::Instant;

use triplex_domain_models::{Blob, SendStamps, Status};
use triplex_domain_routing::{HashContext, HashFunction};
use triplex_infra_wire::{
    DeleteRequest, GetOpRequest, GetRequest, HistogramRequest, PutRequest, RequestPacket,
};

use crate::queues::{PendingDelete, PendingGet, PendingGetOp, PendingHistogram, PendingPut};
use crate::results::{ResultRecord, Results};

/// Contexto del barajador para una pasada de flush.
#[derive(Clone)]
pub struct ShuffleContext {
    pub hash: HashFunction,
    pub rank: usize,
    pub total_datastores: usize,
    pub datastores_per_server: usize,
    pub max_ops_per_send: usize,
    /// Id de servidor propio, o -1 en rangos sólo-cliente.
    pub src_id: i32,
    pub epoch: Instant,
}

impl ShuffleContext {
    fn hash_context(&self) -> HashContext {
        HashContext { rank: self.rank, total_datastores: self.total_datastores }
    }
}

/// Un paquete listo para el transporte con los sellos de sus ranuras.
pub struct OutboundRequest {
    pub request: RequestPacket,
    pub stamps: Vec<SendStamps>,
}

/// Resultado de una pasada de barajado: secuencias de paquetes por
/// destino, la tabla de orígenes para re-ligar respuestas y los
/// fallos inmediatos de hash.
pub struct ShuffleOutcome {
    pub grouped: Vec<Vec<OutboundRequest>>,
    pub origins: Vec<(Blob, Blob)>,
    pub failures: Results,
}

fn partition<Record>(
    records: Vec<Record>,
    context: &ShuffleContext,
    subject_of: impl Fn(&Record) -> &[u8],
    predicate_of: impl Fn(&Record) -> &[u8],
    mut on_failure: impl FnMut(Record, &mut Results),
) -> (BTreeMap<usize, Vec<Record>>, Results) {
    let mut by_destination: BTreeMap<usize, Vec<Record>> = BTreeMap::new();
    let mut failures = Results::new();

    for record in records {
        match context.hash.evaluate(
            subject_of(&record),
            predicate_of(&record),
            context.hash_context(),
        ) {
            Ok(destination) => by_destination.entry(destination).or_default().push(record),
            Err(_) => on_failure(record, &mut failures),
        }
    }

    (by_destination, failures)
}

/// Baraja la cola de PUTs en paquetes por destino.
pub fn shuffle_puts(records: Vec<PendingPut>, context: &ShuffleContext) -> ShuffleOutcome {
    let (by_destination, failures) = partition(
        records,
        context,
        |record| record.subject.data(),
        |record| record.predicate.data(),
        |record, failures| {
            failures.push(ResultRecord::Put {
                datastore: -1,
                status: Status::Error,
                subject: record.subject,
                predicate: record.predicate,
                stamps: record.stamps,
            });
        },
    );

    let mut origins: Vec<(Blob, Blob)> = Vec::new();
    let mut grouped = Vec::with_capacity(by_destination.len());

    for (destination, mut sequence) in by_destination {
        let mut outbound_sequence = Vec::new();

        while !sequence.is_empty() {
            let take = sequence.len().min(context.max_ops_per_send);
            let mut packet =
                PutRequest::new(context.src_id, destination as i32, context.max_ops_per_send);
            let mut stamps = Vec::with_capacity(take);

            for mut record in sequence.drain(..take) {
                record.stamps.mark_shuffled(context.epoch);

                let reference = origins.len() as u64;
                origins.push((record.subject.clone(), record.predicate.clone()));

                packet
                    .add(
                        record.subject,
                        reference,
                        record.predicate,
                        reference,
                        record.object,
                        record.permutation,
                    )
                    .expect("chunk never exceeds the packet capacity");
                stamps.push(record.stamps);
            }

            outbound_sequence.push(OutboundRequest {
                request: RequestPacket::Put(packet),
                stamps,
            });
        }

        grouped.push(outbound_sequence);
    }

    ShuffleOutcome { grouped, origins, failures }
}

/// Baraja la cola de GETs en paquetes por destino.
pub fn shuffle_gets(records: Vec<PendingGet>, context: &ShuffleContext) -> ShuffleOutcome {
    let (by_destination, failures) = partition(
        records,
        context,
        |record| record.subject.data(),
        |record| record.predicate.data(),
        |record, failures| {
            failures.push(ResultRecord::Get {
                datastore: -1,
                status: Status::Error,
                subject: record.subject,
                predicate: record.predicate,
                object: None,
                stamps: record.stamps,
            });
        },
    );

    let mut origins: Vec<(Blob, Blob)> = Vec::new();
    let mut grouped = Vec::with_capacity(by_destination.len());

    for (destination, mut sequence) in by_destination {
        let mut outbound_sequence = Vec::new();

        while !sequence.is_empty() {
            let take = sequence.len().min(context.max_ops_per_send);
            let mut packet =
                GetRequest::new(context.src_id, destination as i32, context.max_ops_per_send);
            let mut stamps = Vec::with_capacity(take);

            for mut record in sequence.drain(..take) {
                record.stamps.mark_shuffled(context.epoch);

                let reference = origins.len() as u64;
                origins.push((record.subject.clone(), record.predicate.clone()));

                packet
                    .add(
                        record.subject,
                        reference,
                        record.predicate,
                        reference,
                        record.object_type,
                    )
                    .expect("chunk never exceeds the packet capacity");
                stamps.push(record.stamps);
            }

            outbound_sequence.push(OutboundRequest {
                request: RequestPacket::Get(packet),
                stamps,
            });
        }

        grouped.push(outbound_sequence);
    }

    ShuffleOutcome { grouped, origins, failures }
}

/// Baraja la cola de GETOPs en paquetes por destino.
pub fn shuffle_getops(
    records: Vec<PendingGetOp>,
    context: &ShuffleContext,
) -> ShuffleOutcome {
    let (by_destination, failures) = partition(
        records,
        context,
        |record| record.subject.data(),
        |record| record.predicate.data(),
        |record, failures| {
            failures.push(ResultRecord::GetOp {
                datastore: -1,
                status: Status::Error,
                subjects: Vec::new(),
                predicates: Vec::new(),
                objects: Vec::new(),
                stamps: record.stamps,
            });
        },
    );

    let mut grouped = Vec::with_capacity(by_destination.len());

    for (destination, mut sequence) in by_destination {
        let mut outbound_sequence = Vec::new();

        while !sequence.is_empty() {
            let take = sequence.len().min(context.max_ops_per_send);
            let mut packet =
                GetOpRequest::new(context.src_id, destination as i32, context.max_ops_per_send);
            let mut stamps = Vec::with_capacity(take);

            for mut record in sequence.drain(..take) {
                record.stamps.mark_shuffled(context.epoch);
                packet
                    .add(
                        record.subject,
                        record.predicate,
                        record.object_type,
                        record.num_recs,
                        record.kind,
                    )
                    .expect("chunk never exceeds the packet capacity");
                stamps.push(record.stamps);
            }

            outbound_sequence.push(OutboundRequest {
                request: RequestPacket::GetOp(packet),
                stamps,
            });
        }

        grouped.push(outbound_sequence);
    }

    ShuffleOutcome { grouped, origins: Vec::new(), failures }
}

/// Baraja la cola de DELETEs en paquetes por destino.
pub fn shuffle_deletes(
    records: Vec<PendingDelete>,
    context: &ShuffleContext,
) -> ShuffleOutcome {
    let (by_destination, failures) = partition(
        records,
        context,
        |record| record.subject.data(),
        |record| record.predicate.data(),
        |record, failures| {
            failures.push(ResultRecord::Delete {
                datastore: -1,
                status: Status::Error,
                subject: record.subject,
                predicate: record.predicate,
                stamps: record.stamps,
            });
        },
    );

    let mut origins: Vec<(Blob, Blob)> = Vec::new();
    let mut grouped = Vec::with_capacity(by_destination.len());

    for (destination, mut sequence) in by_destination {
        let mut outbound_sequence = Vec::new();

        while !sequence.is_empty() {
            let take = sequence.len().min(context.max_ops_per_send);
            let mut packet =
                DeleteRequest::new(context.src_id, destination as i32, context.max_ops_per_send);
            let mut stamps = Vec::with_capacity(take);

            for mut record in sequence.drain(..take) {
                record.stamps.mark_shuffled(context.epoch);

                let reference = origins.len() as u64;
                origins.push((record.subject.clone(), record.predicate.clone()));

                packet
                    .add(record.subject, reference, record.predicate, reference)
                    .expect("chunk never exceeds the packet capacity");
                stamps.push(record.stamps);
            }

            outbound_sequence.push(OutboundRequest {
                request: RequestPacket::Delete(packet),
                stamps,
            });
        }

        grouped.push(outbound_sequence);
    }

    ShuffleOutcome { grouped, origins, failures }
}

/// Baraja la cola de HISTOGRAMs: el destino es el id explícito del
/// registro, no el hash.
pub fn shuffle_histograms(
    records: Vec<PendingHistogram>,
    context: &ShuffleContext,
) -> ShuffleOutcome {
    let mut by_destination: BTreeMap<usize, Vec<PendingHistogram>> = BTreeMap::new();
    let mut failures = Results::new();

    for record in records {
        if record.datastore_id >= context.total_datastores {
            failures.push(ResultRecord::Histogram {
                datastore: record.datastore_id as i32,
                status: Status::Error,
                histogram: None,
                stamps: record.stamps,
            });
            continue;
        }
        by_destination
            .entry(record.datastore_id)
            .or_default()
            .push(record);
    }

    let mut grouped = Vec::with_capacity(by_destination.len());

    for (destination, mut sequence) in by_destination {
        let mut outbound_sequence = Vec::new();

        while !sequence.is_empty() {
            let take = sequence.len().min(context.max_ops_per_send);
            let mut packet = HistogramRequest::new(
                context.src_id,
                destination as i32,
                context.max_ops_per_send,
            );
            let mut stamps = Vec::with_capacity(take);

            for mut record in sequence.drain(..take) {
                record.stamps.mark_shuffled(context.epoch);
                packet
                    .add(record.name)
                    .expect("chunk never exceeds the packet capacity");
                stamps.push(record.stamps);
            }

            outbound_sequence.push(OutboundRequest {
                request: RequestPacket::Histogram(packet),
                stamps,
            });
        }

        grouped.push(outbound_sequence);
    }

    ShuffleOutcome { grouped, origins: Vec::new(), failures }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use triplex_domain_models::{PutPermutation, SendStamps};

    use super::*;

    fn context(total: usize, max_ops: usize) -> ShuffleContext {
        ShuffleContext {
            hash: HashFunction::SumModDatastores,
            rank: 0,
            total_datastores: total,
            datastores_per_server: 1,
            max_ops_per_send: max_ops,
            src_id: 0,
            epoch: Instant::now(),
        }
    }

    fn pending_put(subject: u8) -> PendingPut {
        PendingPut {
            subject: Blob::new(vec![subject], triplex_domain_models::DataType::Byte),
            predicate: Blob::from_str_bytes("p"),
            object: Blob::from_f64(1.0),
            permutation: PutPermutation::SPO,
            stamps: SendStamps::default(),
        }
    }

    #[test]
    fn full_packets_close_and_reopen_per_destination() {
        // hash constante: todo al datastore 0
        let mut shuffle_context = context(4, 2);
        shuffle_context.hash = HashFunction::DatastoreZero;

        let records = (0..5).map(pending_put).collect();
        let outcome = shuffle_puts(records, &shuffle_context);

        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.grouped.len(), 1, "single destination");
        let sequence = &outcome.grouped[0];
        assert_eq!(sequence.len(), 3, "5 ops over capacity 2 close two packets");
        assert_eq!(sequence[0].request.count(), 2);
        assert_eq!(sequence[1].request.count(), 2);
        assert_eq!(sequence[2].request.count(), 1);
    }

    #[test]
    fn order_within_a_destination_is_preserved() {
        let mut shuffle_context = context(4, 8);
        shuffle_context.hash = HashFunction::DatastoreZero;

        let records = (0..5).map(pending_put).collect();
        let outcome = shuffle_puts(records, &shuffle_context);

        match &outcome.grouped[0][0].request {
            RequestPacket::Put(packet) => {
                let order: Vec<u8> =
                    packet.subjects.iter().map(|subject| subject.data()[0]).collect();
                assert_eq!(order, vec![0, 1, 2, 3, 4]);
            }
            other => panic!("INTEGRITY_COLLAPSE: unexpected packet {:?}", other.operation()),
        }
    }

    #[test]
    fn rogue_hashes_fail_immediately_without_touching_packets() {
        let mut shuffle_context = context(4, 8);
        shuffle_context.hash =
            HashFunction::Custom("ROGUE", Arc::new(|_, _, _| 99));

        let outcome = shuffle_puts(vec![pending_put(0)], &shuffle_context);
        assert!(outcome.grouped.is_empty());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures.iter().next().unwrap().status(), Status::Error);
    }

    #[test]
    fn histograms_route_by_explicit_datastore_id() {
        let shuffle_context = context(4, 8);
        let records = vec![
            PendingHistogram {
                datastore_id: 2,
                name: Blob::from_str_bytes("p"),
                stamps: SendStamps::default(),
            },
            PendingHistogram {
                datastore_id: 9,
                name: Blob::from_str_bytes("p"),
                stamps: SendStamps::default(),
            },
        ];

        let outcome = shuffle_histograms(records, &shuffle_context);
        assert_eq!(outcome.grouped.len(), 1);
        assert_eq!(outcome.grouped[0][0].request.dst(), 2);
        assert_eq!(outcome.failures.len(), 1, "id 9 exceeds the census of 4");
    }
}
