// [libs/domain/pipeline/src/session.rs]
/*!
 * =================================================================
 * APARATO: TRIPLESTORE SESSION (V16.0 - GOLD MASTER)
 * CLASIFICACIÓN: DOMAIN LAYER (ESTRATO L2-PIPELINE)
 * RESPONSABILIDAD: API PÚBLICA, MOTOR DE FLUSH Y CICLO DE VIDA
 *
 * VISION HIPER-HOLÍSTICA:
 * La sesión liga el mundo, levanta los datastores locales, arranca el
 * bucle del servidor de rango y el worker de PUTs, y conduce la
 * tubería completa: encolar → barajar → empaquetar → transportar →
 * despachar → responder → resultados. El destino local nunca toca la
 * red: se despacha en proceso contra las unidades propias.
 * =================================================================
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tokio::sync::{Mutex as AsyncMutex, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use triplex_domain_models::{
    Blob, Chronostamp, DataType, GetOpKind, Operation, PutPermutation, SendStamps, Status,
};
use triplex_domain_routing::ranks;
use triplex_infra_datastore::{DatastoreUnit, StoreAddress};
use triplex_infra_transport::{Transport, World};
use triplex_infra_wire::{
    pack_request, unpack_response, RequestPacket, ResponsePacket,
};

use crate::config::{SessionOptions, TransportSelector};
use crate::errors::PipelineError;
use crate::queues::{
    PendingDelete, PendingGet, PendingGetOp, PendingHistogram, PendingPut, PutQueue,
    ReadQueues,
};
use crate::rangeserver;
use crate::results::{ResultRecord, Results};
use crate::shuffle::{
    shuffle_deletes, shuffle_getops, shuffle_gets, shuffle_histograms, shuffle_puts,
    OutboundRequest, ShuffleContext,
};
use crate::stats::StatsSheet;
use crate::worker::spawn_put_worker;

/// Núcleo compartido de la sesión. El worker de PUTs y el bucle del
/// servidor sostienen su propio Arc.
pub struct SessionCore {
    options: SessionOptions,
    world: World,
    epoch: Instant,
    running: Arc<AtomicBool>,
    transport: Transport,

    puts: AsyncMutex<PutQueue>,
    puts_signal: Notify,
    reads: std::sync::Mutex<ReadQueues>,

    units: Arc<AsyncMutex<Vec<DatastoreUnit>>>,
    own_server_id: Option<usize>,
    range_server_count: usize,
    total_datastores: usize,

    current_datastore_name: std::sync::Mutex<String>,
    stats: std::sync::Mutex<StatsSheet>,
}

impl SessionCore {
    pub(crate) fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub(crate) fn puts(&self) -> &AsyncMutex<PutQueue> {
        &self.puts
    }

    pub(crate) fn puts_signal(&self) -> &Notify {
        &self.puts_signal
    }

    pub(crate) fn running_flag(&self) -> &Arc<AtomicBool> {
        &self.running
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn ensure_running(&self) -> Result<(), PipelineError> {
        if !self.is_running() {
            return Err(PipelineError::NotRunning);
        }
        Ok(())
    }

    fn shuffle_context(&self) -> ShuffleContext {
        ShuffleContext {
            hash: self.options.hash.clone(),
            rank: self.world.rank(),
            total_datastores: self.total_datastores,
            datastores_per_server: self.options.datastores_per_server,
            max_ops_per_send: self.options.max_ops_per_send,
            src_id: self
                .own_server_id
                .map(|id| (id * self.options.datastores_per_server) as i32)
                .unwrap_or(-1),
            epoch: self.epoch,
        }
    }

    // ------------------------------------------------------------
    // MOTOR DE TRANSMISIÓN
    // ------------------------------------------------------------

    /// Envía un paquete a su destino y devuelve la respuesta. El
    /// destino local se despacha en proceso.
    async fn transmit_one(
        &self,
        request: &RequestPacket,
    ) -> Result<ResponsePacket, PipelineError> {
        let destination_id = request.dst().max(0) as usize;
        let server_id = destination_id / self.options.datastores_per_server;
        let destination_rank = ranks::rank_of_id_in_world(
            server_id,
            self.world.size(),
            self.options.client_ratio,
            self.options.server_ratio,
        )?;

        if destination_rank == self.world.rank() {
            let mut local_units = self.units.lock().await;
            return Ok(rangeserver::dispatch(
                &mut local_units,
                request,
                self.options.datastores_per_server,
            ));
        }

        let packed = pack_request(request);
        let reply = self.transport.exchange(destination_rank, packed).await?;
        Ok(unpack_response(&reply, self.options.max_ops_per_send)?)
    }

    /// Transmite la secuencia de paquetes de un destino, en orden.
    async fn transmit_sequence(
        &self,
        sequence: Vec<OutboundRequest>,
        origins: &[(Blob, Blob)],
    ) -> Results {
        let mut results = Results::new();

        for mut outbound in sequence {
            for stamps in outbound.stamps.iter_mut() {
                stamps.mark_sent(self.epoch);
            }

            match self.transmit_one(&outbound.request).await {
                Ok(response) => {
                    results.append(self.convert_response(response, outbound.stamps, origins));
                }
                Err(transmit_fault) => {
                    warn!(
                        "⚠️ [FLUSH]: Destination {} failed: {}. Failing its slots.",
                        outbound.request.dst(),
                        transmit_fault
                    );
                    results.append(synthesize_failure(
                        &outbound.request,
                        outbound.stamps,
                        origins,
                    ));
                }
            }
        }

        results
    }

    /// Transmite todos los destinos concurrentemente; dentro de cada
    /// destino las secuencias conservan su orden de emisión.
    async fn transmit(
        &self,
        grouped: Vec<Vec<OutboundRequest>>,
        origins: &[(Blob, Blob)],
    ) -> Results {
        let transmissions = grouped
            .into_iter()
            .map(|sequence| self.transmit_sequence(sequence, origins));

        let mut results = Results::new();
        for partial in join_all(transmissions).await {
            results.append(partial);
        }
        results
    }

    /// Convierte un paquete de respuesta en registros de resultados,
    /// re-ligando las manillas devueltas a los blobs originales.
    fn convert_response(
        &self,
        response: ResponsePacket,
        mut stamps: Vec<SendStamps>,
        origins: &[(Blob, Blob)],
    ) -> Results {
        for stamp in stamps.iter_mut() {
            stamp.mark_received(self.epoch);
        }

        let mut results = Results::with_capacity(response.count());
        let datastore = response.src();

        match response {
            ResponsePacket::Put(packet) => {
                for slot in 0..packet.count() {
                    let (subject, predicate) =
                        rebind(origins, packet.subject_refs[slot].ref_bits);
                    results.push(ResultRecord::Put {
                        datastore,
                        status: packet.statuses[slot],
                        subject,
                        predicate,
                        stamps: stamps.get(slot).copied().unwrap_or_default(),
                    });
                }
            }
            ResponsePacket::Get(packet) => {
                for slot in 0..packet.count() {
                    let (subject, predicate) =
                        rebind(origins, packet.subject_refs[slot].ref_bits);
                    results.push(ResultRecord::Get {
                        datastore,
                        status: packet.statuses[slot],
                        subject,
                        predicate,
                        object: packet.objects[slot].clone(),
                        stamps: stamps.get(slot).copied().unwrap_or_default(),
                    });
                }
            }
            ResponsePacket::GetOp(packet) => {
                for (slot, ((subjects, predicates), objects)) in packet
                    .subjects
                    .into_iter()
                    .zip(packet.predicates)
                    .zip(packet.objects)
                    .enumerate()
                {
                    results.push(ResultRecord::GetOp {
                        datastore,
                        status: packet.statuses[slot],
                        subjects,
                        predicates,
                        objects,
                        stamps: stamps.get(slot).copied().unwrap_or_default(),
                    });
                }
            }
            ResponsePacket::Delete(packet) => {
                for slot in 0..packet.count() {
                    let (subject, predicate) =
                        rebind(origins, packet.subject_refs[slot].ref_bits);
                    results.push(ResultRecord::Delete {
                        datastore,
                        status: packet.statuses[slot],
                        subject,
                        predicate,
                        stamps: stamps.get(slot).copied().unwrap_or_default(),
                    });
                }
            }
            ResponsePacket::Histogram(packet) => {
                for slot in 0..packet.count() {
                    results.push(ResultRecord::Histogram {
                        datastore,
                        status: packet.statuses[slot],
                        histogram: packet.histograms[slot].clone(),
                        stamps: stamps.get(slot).copied().unwrap_or_default(),
                    });
                }
            }
            ResponsePacket::Sync(packet) => {
                let base = (datastore.max(0) as usize / self.options.datastores_per_server)
                    * self.options.datastores_per_server;
                for slot in 0..packet.count() {
                    results.push(ResultRecord::Sync {
                        datastore: (base + slot) as i32,
                        status: packet.statuses[slot],
                    });
                }
            }
        }

        results
    }

    // ------------------------------------------------------------
    // MOTORES DE FLUSH POR CLASE
    // ------------------------------------------------------------

    pub(crate) async fn flush_put_records(&self, records: Vec<PendingPut>) -> Results {
        if records.is_empty() {
            return Results::new();
        }
        let outcome = shuffle_puts(records, &self.shuffle_context());
        let mut results = outcome.failures;
        results.append(self.transmit(outcome.grouped, &outcome.origins).await);
        results
    }

    async fn flush_get_records(&self, records: Vec<PendingGet>) -> Results {
        if records.is_empty() {
            return Results::new();
        }
        let outcome = shuffle_gets(records, &self.shuffle_context());
        let mut results = outcome.failures;
        results.append(self.transmit(outcome.grouped, &outcome.origins).await);
        results
    }

    async fn flush_getop_records(&self, records: Vec<PendingGetOp>) -> Results {
        if records.is_empty() {
            return Results::new();
        }
        let outcome = shuffle_getops(records, &self.shuffle_context());
        let mut results = outcome.failures;
        results.append(self.transmit(outcome.grouped, &outcome.origins).await);
        results
    }

    async fn flush_delete_records(&self, records: Vec<PendingDelete>) -> Results {
        if records.is_empty() {
            return Results::new();
        }
        let outcome = shuffle_deletes(records, &self.shuffle_context());
        let mut results = outcome.failures;
        results.append(self.transmit(outcome.grouped, &outcome.origins).await);
        results
    }

    async fn flush_histogram_records(&self, records: Vec<PendingHistogram>) -> Results {
        if records.is_empty() {
            return Results::new();
        }
        let outcome = shuffle_histograms(records, &self.shuffle_context());
        let mut results = outcome.failures;
        results.append(self.transmit(outcome.grouped, &outcome.origins).await);
        results
    }
}

fn rebind(origins: &[(Blob, Blob)], ref_bits: u64) -> (Blob, Blob) {
    origins
        .get(ref_bits as usize)
        .cloned()
        .unwrap_or_else(|| (Blob::null(), Blob::null()))
}

/// Falla cada ranura de un paquete con la misma clase: el destino
/// entero cayó (transporte o códec), los demás destinos no se ven
/// afectados.
fn synthesize_failure(
    request: &RequestPacket,
    stamps: Vec<SendStamps>,
    origins: &[(Blob, Blob)],
) -> Results {
    let mut results = Results::with_capacity(request.count());
    let datastore = request.dst();

    match request {
        RequestPacket::Put(packet) => {
            for slot in 0..packet.count() {
                let (subject, predicate) = rebind(origins, packet.subject_refs[slot]);
                results.push(ResultRecord::Put {
                    datastore,
                    status: Status::Error,
                    subject,
                    predicate,
                    stamps: stamps.get(slot).copied().unwrap_or_default(),
                });
            }
        }
        RequestPacket::Get(packet) => {
            for slot in 0..packet.count() {
                let (subject, predicate) = rebind(origins, packet.subject_refs[slot]);
                results.push(ResultRecord::Get {
                    datastore,
                    status: Status::Error,
                    subject,
                    predicate,
                    object: None,
                    stamps: stamps.get(slot).copied().unwrap_or_default(),
                });
            }
        }
        RequestPacket::GetOp(packet) => {
            for slot in 0..packet.count() {
                results.push(ResultRecord::GetOp {
                    datastore,
                    status: Status::Error,
                    subjects: Vec::new(),
                    predicates: Vec::new(),
                    objects: Vec::new(),
                    stamps: stamps.get(slot).copied().unwrap_or_default(),
                });
            }
        }
        RequestPacket::Delete(packet) => {
            for slot in 0..packet.count() {
                let (subject, predicate) = rebind(origins, packet.subject_refs[slot]);
                results.push(ResultRecord::Delete {
                    datastore,
                    status: Status::Error,
                    subject,
                    predicate,
                    stamps: stamps.get(slot).copied().unwrap_or_default(),
                });
            }
        }
        RequestPacket::Histogram(packet) => {
            for slot in 0..packet.count() {
                results.push(ResultRecord::Histogram {
                    datastore,
                    status: Status::Error,
                    histogram: None,
                    stamps: stamps.get(slot).copied().unwrap_or_default(),
                });
            }
        }
        RequestPacket::Sync(_) => {
            results.push(ResultRecord::Sync { datastore, status: Status::Error });
        }
    }

    results
}

/// La sesión del triplestore: la manilla pública del proceso.
pub struct Session {
    core: Arc<SessionCore>,
    worker_handle: std::sync::Mutex<Option<JoinHandle<()>>>,
    server_handle: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    /**
     * Abre la sesión: valida las opciones (con pisado TRIPLEX_* del
     * entorno), liga el mundo, levanta los datastores locales si el
     * rango es servidor, arranca el bucle de eventos y el worker de
     * PUTs, y fija la época monótona del proceso.
     *
     * # Errors:
     * Todo fallo aquí es fatal y de clase Config/Transport/Datastore.
     */
    pub async fn open(options: SessionOptions) -> Result<Self, PipelineError> {
        let options = options.apply_env_overrides()?;
        options.validate()?;

        let world = match options.transport {
            TransportSelector::Local => World::single(),
            TransportSelector::Tcp | TransportSelector::Rpc => {
                World::from_roster(options.rank, options.roster.clone())?
            }
        };

        let running = Arc::new(AtomicBool::new(true));

        let (transport, inbound) = match options.transport {
            TransportSelector::Local => Transport::local(),
            TransportSelector::Tcp => {
                Transport::bind_tcp(world.clone(), Arc::clone(&running)).await?
            }
            TransportSelector::Rpc => {
                Transport::bind_rpc(world.clone(), Arc::clone(&running)).await?
            }
        };

        // ronda de anuncio: el allgather de arranque del censo
        transport.announce().await?;

        let range_server_count = ranks::server_count_in_world(
            world.size(),
            options.client_ratio,
            options.server_ratio,
        )?;
        let total_datastores = range_server_count * options.datastores_per_server;

        let is_server = ranks::is_range_server_in_world(
            world.rank(),
            world.size(),
            options.client_ratio,
            options.server_ratio,
        )?;

        let own_server_id = if is_server {
            Some(ranks::id_of_rank(
                world.rank(),
                options.client_ratio,
                options.server_ratio,
            )?)
        } else {
            None
        };

        // los datastores locales del servidor: ids contiguos por bloque
        let mut local_units = Vec::new();
        if let Some(server_id) = own_server_id {
            for local_index in 0..options.datastores_per_server {
                let datastore_id = server_id * options.datastores_per_server + local_index;
                let address = StoreAddress {
                    prefix: options.datastore_prefix.clone(),
                    name: options.datastore_name.clone(),
                    postfix: options.datastore_postfix.clone(),
                    id: datastore_id,
                };
                local_units.push(DatastoreUnit::open(
                    datastore_id,
                    options.datastore,
                    address,
                    options.histogram_policy(),
                )?);
            }
        }

        let units = Arc::new(AsyncMutex::new(local_units));

        let server_handle = if is_server {
            Some(rangeserver::spawn_event_loop(
                inbound,
                Arc::clone(&units),
                options.datastores_per_server,
                options.max_ops_per_send,
                Arc::clone(&running),
            ))
        } else {
            drop(inbound);
            None
        };

        let queue_capacity = options.pools.ops_cache.capacity_hint();
        let epoch = *crate::stats::PROCESS_EPOCH;
        let core = Arc::new(SessionCore {
            current_datastore_name: std::sync::Mutex::new(options.datastore_name.clone()),
            puts: AsyncMutex::new(PutQueue::with_capacity(queue_capacity)),
            puts_signal: Notify::new(),
            reads: std::sync::Mutex::new(ReadQueues::with_capacity(queue_capacity)),
            units,
            own_server_id,
            range_server_count,
            total_datastores,
            stats: std::sync::Mutex::new(StatsSheet::new()),
            epoch,
            running,
            transport,
            world,
            options,
        });

        let worker_handle = if core.options.start_async_puts_at > 0 {
            Some(spawn_put_worker(Arc::clone(&core)))
        } else {
            None
        };

        info!(
            "🚀 [SESSION]: Rank {}/{} online ({} range servers, {} datastores).",
            core.world.rank(),
            core.world.size(),
            core.range_server_count,
            core.total_datastores
        );

        Ok(Self {
            core,
            worker_handle: std::sync::Mutex::new(worker_handle),
            server_handle: std::sync::Mutex::new(server_handle),
        })
    }

    // ------------------------------------------------------------
    // ENCOLADO
    // ------------------------------------------------------------

    /// Encola un PUT, expandiendo la máscara de permutaciones: cada
    /// bit activo se convierte en un PUT encolado. Con la marca de
    /// agua a cero el envío es inmediato y sin worker.
    pub async fn put(
        &self,
        subject: Blob,
        predicate: Blob,
        object: Blob,
        permutations: PutPermutation,
    ) -> Result<(), PipelineError> {
        self.bput(vec![(subject, predicate, object, permutations)]).await
    }

    pub async fn bput(
        &self,
        triples: Vec<(Blob, Blob, Blob, PutPermutation)>,
    ) -> Result<(), PipelineError> {
        self.core.ensure_running()?;

        let mut bulk_stamp = Chronostamp::started(self.core.epoch);

        for (subject, predicate, object, permutations) in &triples {
            if subject.is_empty() || predicate.is_empty() || object.is_empty() {
                return Err(PipelineError::Argument(
                    "PUT requires non-empty subject, predicate and object".to_string(),
                ));
            }
            if permutations.popcount() == 0 {
                return Err(PipelineError::Argument(
                    "PUT requires at least one ordering in the permutation mask".to_string(),
                ));
            }
        }

        let watermark = self.core.options.start_async_puts_at;
        let mut should_signal = false;

        {
            let mut queue = self.core.puts.lock().await;
            for (subject, predicate, object, permutations) in triples {
                for (permutation, first, second, third) in
                    permutations.expand(&subject, &predicate, &object)
                {
                    queue.records.push(PendingPut {
                        subject: first,
                        predicate: second,
                        object: third,
                        permutation,
                        stamps: SendStamps::cached(self.core.epoch),
                    });
                }
            }

            if watermark > 0 && queue.records.len() >= watermark {
                should_signal = true;
            }
        }

        if should_signal {
            // el llamante señala y nunca bloquea
            self.core.puts_signal.notify_one();
        }

        if watermark == 0 {
            // modo síncrono: barajar y enviar en línea, resultados al
            // búfer que FlushPuts entrega
            let drained = {
                let mut queue = self.core.puts.lock().await;
                queue.drain_records()
            };
            let results = self.core.flush_put_records(drained).await;
            let mut queue = self.core.puts.lock().await;
            queue.async_results.append(results);
        }

        bulk_stamp.finish(self.core.epoch);
        self.record_bulk(Operation::Put, bulk_stamp);
        Ok(())
    }

    pub fn get(
        &self,
        subject: Blob,
        predicate: Blob,
        object_type: DataType,
    ) -> Result<(), PipelineError> {
        self.bget(vec![(subject, predicate, object_type)])
    }

    pub fn bget(
        &self,
        requests: Vec<(Blob, Blob, DataType)>,
    ) -> Result<(), PipelineError> {
        self.core.ensure_running()?;
        let mut bulk_stamp = Chronostamp::started(self.core.epoch);

        for (subject, predicate, _) in &requests {
            if subject.is_empty() || predicate.is_empty() {
                return Err(PipelineError::Argument(
                    "GET requires non-empty subject and predicate".to_string(),
                ));
            }
        }

        {
            let mut reads = self.core.reads.lock().expect("read queues lock");
            for (subject, predicate, object_type) in requests {
                reads.gets.push(PendingGet {
                    subject,
                    predicate,
                    object_type,
                    stamps: SendStamps::cached(self.core.epoch),
                });
            }
        }

        bulk_stamp.finish(self.core.epoch);
        self.record_bulk(Operation::Get, bulk_stamp);
        Ok(())
    }

    pub fn getop(
        &self,
        subject: Blob,
        predicate: Blob,
        object_type: DataType,
        num_recs: u64,
        kind: GetOpKind,
    ) -> Result<(), PipelineError> {
        self.bgetop(vec![(subject, predicate, object_type, num_recs, kind)])
    }

    pub fn bgetop(
        &self,
        requests: Vec<(Blob, Blob, DataType, u64, GetOpKind)>,
    ) -> Result<(), PipelineError> {
        self.core.ensure_running()?;
        let mut bulk_stamp = Chronostamp::started(self.core.epoch);

        for (subject, predicate, _, _, kind) in &requests {
            let needs_anchor =
                matches!(kind, GetOpKind::Eq | GetOpKind::Next | GetOpKind::Prev);
            if needs_anchor && (subject.is_empty() || predicate.is_empty()) {
                return Err(PipelineError::Argument(
                    "anchored GETOP requires non-empty subject and predicate".to_string(),
                ));
            }
            // la modalidad inválida se encola igualmente: su ranura
            // responde con estado de error
        }

        {
            let mut reads = self.core.reads.lock().expect("read queues lock");
            for (subject, predicate, object_type, num_recs, kind) in requests {
                reads.getops.push(PendingGetOp {
                    subject,
                    predicate,
                    object_type,
                    num_recs,
                    kind,
                    stamps: SendStamps::cached(self.core.epoch),
                });
            }
        }

        bulk_stamp.finish(self.core.epoch);
        self.record_bulk(Operation::GetOp, bulk_stamp);
        Ok(())
    }

    pub fn delete(&self, subject: Blob, predicate: Blob) -> Result<(), PipelineError> {
        self.bdelete(vec![(subject, predicate)])
    }

    pub fn bdelete(&self, requests: Vec<(Blob, Blob)>) -> Result<(), PipelineError> {
        self.core.ensure_running()?;
        let mut bulk_stamp = Chronostamp::started(self.core.epoch);

        for (subject, predicate) in &requests {
            if subject.is_empty() || predicate.is_empty() {
                return Err(PipelineError::Argument(
                    "DELETE requires non-empty subject and predicate".to_string(),
                ));
            }
        }

        {
            let mut reads = self.core.reads.lock().expect("read queues lock");
            for (subject, predicate) in requests {
                reads.deletes.push(PendingDelete {
                    subject,
                    predicate,
                    stamps: SendStamps::cached(self.core.epoch),
                });
            }
        }

        bulk_stamp.finish(self.core.epoch);
        self.record_bulk(Operation::Delete, bulk_stamp);
        Ok(())
    }

    pub fn histogram(&self, datastore_id: usize, name: &[u8]) -> Result<(), PipelineError> {
        self.bhistogram(vec![(datastore_id, name.to_vec())])
    }

    pub fn bhistogram(
        &self,
        requests: Vec<(usize, Vec<u8>)>,
    ) -> Result<(), PipelineError> {
        self.core.ensure_running()?;
        let mut bulk_stamp = Chronostamp::started(self.core.epoch);

        for (_, name) in &requests {
            if name.is_empty() {
                return Err(PipelineError::Argument(
                    "HISTOGRAM requires a non-empty name".to_string(),
                ));
            }
        }

        {
            let mut reads = self.core.reads.lock().expect("read queues lock");
            for (datastore_id, name) in requests {
                reads.histograms.push(PendingHistogram {
                    datastore_id,
                    name: Blob::new(name, DataType::Byte),
                    stamps: SendStamps::cached(self.core.epoch),
                });
            }
        }

        bulk_stamp.finish(self.core.epoch);
        self.record_bulk(Operation::Histogram, bulk_stamp);
        Ok(())
    }

    // ------------------------------------------------------------
    // FLUSH
    // ------------------------------------------------------------

    /// Conduce la cola de PUTs hasta vaciarla y entrega también los
    /// resultados acumulados por el worker asíncrono.
    pub async fn flush_puts(&self) -> Result<Results, PipelineError> {
        self.core.ensure_running()?;
        let mut flush_stamp = Chronostamp::started(self.core.epoch);

        let (drained, buffered) = {
            let mut queue = self.core.puts.lock().await;
            (queue.drain_records(), queue.async_results.take())
        };

        let mut results = buffered;
        results.append(self.core.flush_put_records(drained).await);

        flush_stamp.finish(self.core.epoch);
        self.record_flush(flush_stamp);
        Ok(results)
    }

    pub async fn flush_gets(&self) -> Result<Results, PipelineError> {
        self.core.ensure_running()?;
        let drained = {
            let mut reads = self.core.reads.lock().expect("read queues lock");
            std::mem::take(&mut reads.gets)
        };
        Ok(self.core.flush_get_records(drained).await)
    }

    pub async fn flush_getops(&self) -> Result<Results, PipelineError> {
        self.core.ensure_running()?;
        let drained = {
            let mut reads = self.core.reads.lock().expect("read queues lock");
            std::mem::take(&mut reads.getops)
        };
        Ok(self.core.flush_getop_records(drained).await)
    }

    pub async fn flush_deletes(&self) -> Result<Results, PipelineError> {
        self.core.ensure_running()?;
        let drained = {
            let mut reads = self.core.reads.lock().expect("read queues lock");
            std::mem::take(&mut reads.deletes)
        };
        Ok(self.core.flush_delete_records(drained).await)
    }

    pub async fn flush_histograms(&self) -> Result<Results, PipelineError> {
        self.core.ensure_running()?;
        let drained = {
            let mut reads = self.core.reads.lock().expect("read queues lock");
            std::mem::take(&mut reads.histograms)
        };
        Ok(self.core.flush_histogram_records(drained).await)
    }

    /// Conduce todas las colas hasta vaciarlas: PUTs, GETs, GETOPs,
    /// DELETEs e HISTOGRAMs, en ese orden.
    pub async fn flush(&self) -> Result<Results, PipelineError> {
        let mut results = self.flush_puts().await?;
        results.append(self.flush_gets().await?);
        results.append(self.flush_getops().await?);
        results.append(self.flush_deletes().await?);
        results.append(self.flush_histograms().await?);
        Ok(results)
    }

    // ------------------------------------------------------------
    // COLECTIVAS
    // ------------------------------------------------------------

    /**
     * Sincronización colectiva: cada servidor cristaliza sus
     * datastores locales (un resultado SYNC por datastore) y la
     * barrera del mundo sella la frontera pasa-antes entre las
     * escrituras previas y las lecturas posteriores.
     */
    pub async fn sync(&self) -> Result<Results, PipelineError> {
        self.core.ensure_running()?;

        let mut results = Results::new();
        if let Some(server_id) = self.core.own_server_id {
            let mut units = self.core.units.lock().await;
            for (local_index, unit) in units.iter_mut().enumerate() {
                let status = match unit.sync() {
                    Ok(()) => Status::Success,
                    Err(_) => Status::Error,
                };
                results.push(ResultRecord::Sync {
                    datastore: (server_id * self.core.options.datastores_per_server
                        + local_index) as i32,
                    status,
                });
            }
        }

        self.core.transport.barrier().await?;
        Ok(results)
    }

    /**
     * Renombrado colectivo de los almacenes: cada servidor cristaliza,
     * cierra y reabre bajo el nuevo nombre base, emitiendo un SYNC por
     * datastore. El material previo deja de ser alcanzable.
     */
    pub async fn change_datastore_name(
        &self,
        new_name: &str,
    ) -> Result<Results, PipelineError> {
        self.core.ensure_running()?;
        if new_name.is_empty() {
            return Err(PipelineError::Argument(
                "datastore rename requires a non-empty name".to_string(),
            ));
        }

        self.core.transport.barrier().await?;

        let mut results = Results::new();
        if let Some(server_id) = self.core.own_server_id {
            let mut units = self.core.units.lock().await;
            for (local_index, unit) in units.iter_mut().enumerate() {
                let status = match unit.sync().and_then(|_| unit.reopen_as(new_name)) {
                    Ok(()) => Status::Success,
                    Err(rename_fault) => {
                        warn!("⚠️ [SESSION]: Rename fault: {}", rename_fault);
                        Status::Error
                    }
                };
                results.push(ResultRecord::Sync {
                    datastore: (server_id * self.core.options.datastores_per_server
                        + local_index) as i32,
                    status,
                });
            }
        }

        *self
            .core
            .current_datastore_name
            .lock()
            .expect("datastore name lock") = new_name.to_string();

        self.core.transport.barrier().await?;
        Ok(results)
    }

    /**
     * Cierra la sesión: baja la bandera, despierta los bucles, espera
     * el worker y el bucle del servidor y cierra los datastores.
     */
    pub async fn close(&self) -> Result<(), PipelineError> {
        if !self.core.running.swap(false, Ordering::SeqCst) {
            return Ok(());
        }

        self.core.puts_signal.notify_one();
        self.core.transport.shutdown();

        let worker = self.worker_handle.lock().expect("worker handle lock").take();
        if let Some(handle) = worker {
            let _ = handle.await;
        }

        let server = self.server_handle.lock().expect("server handle lock").take();
        if let Some(handle) = server {
            handle.abort();
            let _ = handle.await;
        }

        let mut units = self.core.units.lock().await;
        for unit in units.iter_mut() {
            if let Err(close_fault) = unit.close() {
                warn!("⚠️ [SESSION]: Datastore close fault: {}", close_fault);
            }
        }

        debug!("🚪 [SESSION]: Rank {} closed.", self.core.world.rank());
        Ok(())
    }

    // ------------------------------------------------------------
    // ACCESORES
    // ------------------------------------------------------------

    pub fn rank(&self) -> usize {
        self.core.world.rank()
    }

    pub fn world_size(&self) -> usize {
        self.core.world.size()
    }

    pub fn is_range_server(&self) -> bool {
        self.core.own_server_id.is_some()
    }

    pub fn range_server_count(&self) -> usize {
        self.core.range_server_count
    }

    pub fn datastore_count(&self) -> usize {
        self.core.total_datastores
    }

    pub fn hash_name(&self) -> &'static str {
        self.core.options.hash.name()
    }

    /// Época monótona de la sesión, fijada en la apertura.
    pub fn epoch(&self) -> Instant {
        self.core.epoch
    }

    pub fn datastore_name(&self) -> String {
        self.core
            .current_datastore_name
            .lock()
            .expect("datastore name lock")
            .clone()
    }

    /**
     * Si el datastore local indicado mantiene un histograma con ese
     * nombre. Sólo responde por datastores alojados en este rango.
     */
    pub async fn have_histogram(
        &self,
        datastore_id: usize,
        name: &[u8],
    ) -> Result<bool, PipelineError> {
        let datastores_per_server = self.core.options.datastores_per_server;
        let local = self
            .core
            .own_server_id
            .map(|server_id| datastore_id / datastores_per_server == server_id)
            .unwrap_or(false);

        if !local {
            return Err(PipelineError::Argument(format!(
                "datastore {} is not hosted on rank {}",
                datastore_id,
                self.core.world.rank()
            )));
        }

        let units = self.core.units.lock().await;
        Ok(units
            .get(datastore_id % datastores_per_server)
            .map(|unit| unit.have_histogram(name))
            .unwrap_or(false))
    }

    pub fn stats_snapshot(&self) -> StatsSheet {
        self.core.stats.lock().expect("stats lock").clone()
    }

    fn record_bulk(&self, operation: Operation, stamp: Chronostamp) {
        self.core
            .stats
            .lock()
            .expect("stats lock")
            .record_bulk(operation, stamp);
    }

    fn record_flush(&self, stamp: Chronostamp) {
        self.core
            .stats
            .lock()
            .expect("stats lock")
            .record_flush(stamp);
    }
}
