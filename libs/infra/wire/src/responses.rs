// [libs/infra/wire/src/responses.rs]
/*!
 * =================================================================
 * APARATO: RESPONSE PACKETS (V14.1 - SLOT ORDER PRESERVED)
 * CLASIFICACIÓN: INFRASTRUCTURE CODEC (ESTRATO L3-WIRE)
 * RESPONSABILIDAD: PAQUETES DE RESPUESTA ESPEJO DE CADA PETICIÓN
 *
 * El servidor responde ranura a ranura en el mismo orden de la
 * petición. Sujeto y predicado vuelven como referencias opacas (la
 * manilla que viajó en la petición); el objeto de un GET sólo se
 * empaqueta en las ranuras con estado SUCCESS.
 * =================================================================
 */

use triplex_core_histogram::HistogramSnapshot;
use triplex_domain_models::{Blob, DataType, Operation, Status};

use crate::errors::WireError;
use crate::frame::{BlobRef, FrameReader, FrameWriter};

/// PUT: estado más el eco de las manillas de sujeto y predicado.
#[derive(Debug, Clone)]
pub struct PutResponse {
    pub src: i32,
    pub dst: i32,
    capacity: usize,
    pub statuses: Vec<Status>,
    pub subject_refs: Vec<BlobRef>,
    pub predicate_refs: Vec<BlobRef>,
}

impl PutResponse {
    pub fn new(src: i32, dst: i32, capacity: usize) -> Self {
        Self {
            src,
            dst,
            capacity,
            statuses: Vec::with_capacity(capacity),
            subject_refs: Vec::with_capacity(capacity),
            predicate_refs: Vec::with_capacity(capacity),
        }
    }

    pub fn count(&self) -> usize {
        self.statuses.len()
    }

    pub fn add(
        &mut self,
        status: Status,
        subject_ref: BlobRef,
        predicate_ref: BlobRef,
    ) -> Result<(), WireError> {
        if self.count() >= self.capacity {
            return Err(WireError::PacketFull { capacity: self.capacity });
        }

        self.statuses.push(status);
        self.subject_refs.push(subject_ref);
        self.predicate_refs.push(predicate_ref);
        Ok(())
    }

    pub(crate) fn pack_body(&self, writer: &mut FrameWriter) {
        for slot in 0..self.count() {
            writer.put_i32(self.statuses[slot].to_wire());
            writer.put_blob_ref(&self.subject_refs[slot]);
            writer.put_blob_ref(&self.predicate_refs[slot]);
        }
    }

    pub(crate) fn unpack_body(
        src: i32,
        dst: i32,
        count: usize,
        reader: &mut FrameReader<'_>,
    ) -> Result<Self, WireError> {
        let mut packet = Self::new(src, dst, count);
        for _ in 0..count {
            let status = Status::from_wire(reader.get_i32()?)?;
            let subject_ref = reader.get_blob_ref()?;
            let predicate_ref = reader.get_blob_ref()?;
            packet
                .add(status, subject_ref, predicate_ref)
                .expect("capacity equals declared count");
        }
        Ok(packet)
    }
}

/// GET: estado, eco de manillas y el objeto recuperado (sólo en las
/// ranuras con éxito).
#[derive(Debug, Clone)]
pub struct GetResponse {
    pub src: i32,
    pub dst: i32,
    capacity: usize,
    pub statuses: Vec<Status>,
    pub subject_refs: Vec<BlobRef>,
    pub predicate_refs: Vec<BlobRef>,
    pub objects: Vec<Option<Blob>>,
}

impl GetResponse {
    pub fn new(src: i32, dst: i32, capacity: usize) -> Self {
        Self {
            src,
            dst,
            capacity,
            statuses: Vec::with_capacity(capacity),
            subject_refs: Vec::with_capacity(capacity),
            predicate_refs: Vec::with_capacity(capacity),
            objects: Vec::with_capacity(capacity),
        }
    }

    pub fn count(&self) -> usize {
        self.statuses.len()
    }

    pub fn add(
        &mut self,
        status: Status,
        subject_ref: BlobRef,
        predicate_ref: BlobRef,
        object: Option<Blob>,
    ) -> Result<(), WireError> {
        if self.count() >= self.capacity {
            return Err(WireError::PacketFull { capacity: self.capacity });
        }

        self.statuses.push(status);
        self.subject_refs.push(subject_ref);
        self.predicate_refs.push(predicate_ref);
        self.objects.push(object);
        Ok(())
    }

    pub(crate) fn pack_body(&self, writer: &mut FrameWriter) {
        for slot in 0..self.count() {
            writer.put_i32(self.statuses[slot].to_wire());
            writer.put_blob_ref(&self.subject_refs[slot]);
            writer.put_blob_ref(&self.predicate_refs[slot]);
            if self.statuses[slot].is_success() {
                let object = self.objects[slot]
                    .as_ref()
                    .expect("successful GET slots carry their object");
                writer.put_blob(object);
            }
        }
    }

    pub(crate) fn unpack_body(
        src: i32,
        dst: i32,
        count: usize,
        reader: &mut FrameReader<'_>,
    ) -> Result<Self, WireError> {
        let mut packet = Self::new(src, dst, count);
        for _ in 0..count {
            let status = Status::from_wire(reader.get_i32()?)?;
            let subject_ref = reader.get_blob_ref()?;
            let predicate_ref = reader.get_blob_ref()?;
            let object = if status.is_success() {
                Some(reader.get_blob()?)
            } else {
                None
            };
            packet
                .add(status, subject_ref, predicate_ref, object)
                .expect("capacity equals declared count");
        }
        Ok(packet)
    }
}

/// GETOP: cada ranura devuelve num_recs registros completos (sujeto,
/// predicado, objeto) recuperados del recorrido ordenado.
#[derive(Debug, Clone)]
pub struct GetOpResponse {
    pub src: i32,
    pub dst: i32,
    capacity: usize,
    pub statuses: Vec<Status>,
    pub subjects: Vec<Vec<Blob>>,
    pub predicates: Vec<Vec<Blob>>,
    pub objects: Vec<Vec<Blob>>,
}

impl GetOpResponse {
    pub fn new(src: i32, dst: i32, capacity: usize) -> Self {
        Self {
            src,
            dst,
            capacity,
            statuses: Vec::with_capacity(capacity),
            subjects: Vec::with_capacity(capacity),
            predicates: Vec::with_capacity(capacity),
            objects: Vec::with_capacity(capacity),
        }
    }

    pub fn count(&self) -> usize {
        self.statuses.len()
    }

    pub fn add(
        &mut self,
        status: Status,
        subjects: Vec<Blob>,
        predicates: Vec<Blob>,
        objects: Vec<Blob>,
    ) -> Result<(), WireError> {
        if self.count() >= self.capacity {
            return Err(WireError::PacketFull { capacity: self.capacity });
        }

        self.statuses.push(status);
        self.subjects.push(subjects);
        self.predicates.push(predicates);
        self.objects.push(objects);
        Ok(())
    }

    pub(crate) fn pack_body(&self, writer: &mut FrameWriter) {
        for slot in 0..self.count() {
            writer.put_i32(self.statuses[slot].to_wire());
            writer.put_u64(self.subjects[slot].len() as u64);
            for record in 0..self.subjects[slot].len() {
                writer.put_blob(&self.subjects[slot][record]);
                writer.put_blob(&self.predicates[slot][record]);
                writer.put_blob(&self.objects[slot][record]);
            }
        }
    }

    pub(crate) fn unpack_body(
        src: i32,
        dst: i32,
        count: usize,
        reader: &mut FrameReader<'_>,
    ) -> Result<Self, WireError> {
        let mut packet = Self::new(src, dst, count);
        for _ in 0..count {
            let status = Status::from_wire(reader.get_i32()?)?;
            let num_recs = reader.get_u64()? as usize;

            let mut subjects = Vec::with_capacity(num_recs);
            let mut predicates = Vec::with_capacity(num_recs);
            let mut objects = Vec::with_capacity(num_recs);
            for _ in 0..num_recs {
                subjects.push(reader.get_blob()?);
                predicates.push(reader.get_blob()?);
                objects.push(reader.get_blob()?);
            }

            packet
                .add(status, subjects, predicates, objects)
                .expect("capacity equals declared count");
        }
        Ok(packet)
    }
}

/// DELETE: estado más el eco de las manillas.
#[derive(Debug, Clone)]
pub struct DeleteResponse {
    pub src: i32,
    pub dst: i32,
    capacity: usize,
    pub statuses: Vec<Status>,
    pub subject_refs: Vec<BlobRef>,
    pub predicate_refs: Vec<BlobRef>,
}

impl DeleteResponse {
    pub fn new(src: i32, dst: i32, capacity: usize) -> Self {
        Self {
            src,
            dst,
            capacity,
            statuses: Vec::with_capacity(capacity),
            subject_refs: Vec::with_capacity(capacity),
            predicate_refs: Vec::with_capacity(capacity),
        }
    }

    pub fn count(&self) -> usize {
        self.statuses.len()
    }

    pub fn add(
        &mut self,
        status: Status,
        subject_ref: BlobRef,
        predicate_ref: BlobRef,
    ) -> Result<(), WireError> {
        if self.count() >= self.capacity {
            return Err(WireError::PacketFull { capacity: self.capacity });
        }

        self.statuses.push(status);
        self.subject_refs.push(subject_ref);
        self.predicate_refs.push(predicate_ref);
        Ok(())
    }

    pub(crate) fn pack_body(&self, writer: &mut FrameWriter) {
        for slot in 0..self.count() {
            writer.put_i32(self.statuses[slot].to_wire());
            writer.put_blob_ref(&self.subject_refs[slot]);
            writer.put_blob_ref(&self.predicate_refs[slot]);
        }
    }

    pub(crate) fn unpack_body(
        src: i32,
        dst: i32,
        count: usize,
        reader: &mut FrameReader<'_>,
    ) -> Result<Self, WireError> {
        let mut packet = Self::new(src, dst, count);
        for _ in 0..count {
            let status = Status::from_wire(reader.get_i32()?)?;
            let subject_ref = reader.get_blob_ref()?;
            let predicate_ref = reader.get_blob_ref()?;
            packet
                .add(status, subject_ref, predicate_ref)
                .expect("capacity equals declared count");
        }
        Ok(packet)
    }
}

/// HISTOGRAM: estado más la instantánea del histograma en las
/// ranuras con éxito: nombre ∥ size:u64 ∥ (cubeta:f64, conteo:u64)×size.
#[derive(Debug, Clone)]
pub struct HistogramResponse {
    pub src: i32,
    pub dst: i32,
    capacity: usize,
    pub statuses: Vec<Status>,
    pub histograms: Vec<Option<HistogramSnapshot>>,
}

impl HistogramResponse {
    pub fn new(src: i32, dst: i32, capacity: usize) -> Self {
        Self {
            src,
            dst,
            capacity,
            statuses: Vec::with_capacity(capacity),
            histograms: Vec::with_capacity(capacity),
        }
    }

    pub fn count(&self) -> usize {
        self.statuses.len()
    }

    pub fn add(
        &mut self,
        status: Status,
        histogram: Option<HistogramSnapshot>,
    ) -> Result<(), WireError> {
        if self.count() >= self.capacity {
            return Err(WireError::PacketFull { capacity: self.capacity });
        }

        self.statuses.push(status);
        self.histograms.push(histogram);
        Ok(())
    }

    pub(crate) fn pack_body(&self, writer: &mut FrameWriter) {
        for slot in 0..self.count() {
            writer.put_i32(self.statuses[slot].to_wire());
            if self.statuses[slot].is_success() {
                let snapshot = self.histograms[slot]
                    .as_ref()
                    .expect("successful HISTOGRAM slots carry their snapshot");
                writer.put_blob(&Blob::from_slice(&snapshot.name, DataType::Byte));
                writer.put_u64(snapshot.size() as u64);
                for bucket in 0..snapshot.size() {
                    writer.put_f64(snapshot.buckets[bucket]);
                    writer.put_u64(snapshot.counts[bucket]);
                }
            }
        }
    }

    pub(crate) fn unpack_body(
        src: i32,
        dst: i32,
        count: usize,
        reader: &mut FrameReader<'_>,
    ) -> Result<Self, WireError> {
        let mut packet = Self::new(src, dst, count);
        for _ in 0..count {
            let status = Status::from_wire(reader.get_i32()?)?;
            let histogram = if status.is_success() {
                let name = reader.get_blob()?.into_bytes();
                let size = reader.get_u64()? as usize;
                let mut buckets = Vec::with_capacity(size);
                let mut counts = Vec::with_capacity(size);
                for _ in 0..size {
                    buckets.push(reader.get_f64()?);
                    counts.push(reader.get_u64()?);
                }
                Some(HistogramSnapshot { name, buckets, counts })
            } else {
                None
            };
            packet
                .add(status, histogram)
                .expect("capacity equals declared count");
        }
        Ok(packet)
    }
}

/// SYNC: un estado por datastore local del servidor que responde.
#[derive(Debug, Clone)]
pub struct SyncResponse {
    pub src: i32,
    pub dst: i32,
    capacity: usize,
    pub statuses: Vec<Status>,
}

impl SyncResponse {
    pub fn new(src: i32, dst: i32, capacity: usize) -> Self {
        Self { src, dst, capacity, statuses: Vec::with_capacity(capacity) }
    }

    pub fn count(&self) -> usize {
        self.statuses.len()
    }

    pub fn add(&mut self, status: Status) -> Result<(), WireError> {
        if self.count() >= self.capacity {
            return Err(WireError::PacketFull { capacity: self.capacity });
        }

        self.statuses.push(status);
        Ok(())
    }

    pub(crate) fn pack_body(&self, writer: &mut FrameWriter) {
        for status in &self.statuses {
            writer.put_i32(status.to_wire());
        }
    }

    pub(crate) fn unpack_body(
        src: i32,
        dst: i32,
        count: usize,
        reader: &mut FrameReader<'_>,
    ) -> Result<Self, WireError> {
        let mut packet = Self::new(src, dst, count);
        for _ in 0..count {
            let status = Status::from_wire(reader.get_i32()?)?;
            packet.add(status).expect("capacity equals declared count");
        }
        Ok(packet)
    }
}

/// La igualdad de paquetes se define sobre los campos visibles en la
/// trama: la capacidad es un hecho local del emisor y el
/// desempaquetador la fija al count declarado.
macro_rules! wire_field_equality {
    ($packet:ty { $($field:ident),+ $(,)? }) => {
        impl PartialEq for $packet {
            fn eq(&self, other: &Self) -> bool {
                $(self.$field == other.$field)&&+
            }
        }
    };
}

wire_field_equality!(PutResponse { src, dst, statuses, subject_refs, predicate_refs });
wire_field_equality!(GetResponse {
    src, dst, statuses, subject_refs, predicate_refs, objects,
});
wire_field_equality!(GetOpResponse { src, dst, statuses, subjects, predicates, objects });
wire_field_equality!(DeleteResponse { src, dst, statuses, subject_refs, predicate_refs });
wire_field_equality!(HistogramResponse { src, dst, statuses, histograms });
wire_field_equality!(SyncResponse { src, dst, statuses });

/// Paquete de respuesta de cualquier tipo.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePacket {
    Put(PutResponse),
    Get(GetResponse),
    GetOp(GetOpResponse),
    Delete(DeleteResponse),
    Histogram(HistogramResponse),
    Sync(SyncResponse),
}

impl ResponsePacket {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Put(_) => Operation::Put,
            Self::Get(_) => Operation::Get,
            Self::GetOp(_) => Operation::GetOp,
            Self::Delete(_) => Operation::Delete,
            Self::Histogram(_) => Operation::Histogram,
            Self::Sync(_) => Operation::Sync,
        }
    }

    pub fn src(&self) -> i32 {
        match self {
            Self::Put(packet) => packet.src,
            Self::Get(packet) => packet.src,
            Self::GetOp(packet) => packet.src,
            Self::Delete(packet) => packet.src,
            Self::Histogram(packet) => packet.src,
            Self::Sync(packet) => packet.src,
        }
    }

    pub fn dst(&self) -> i32 {
        match self {
            Self::Put(packet) => packet.dst,
            Self::Get(packet) => packet.dst,
            Self::GetOp(packet) => packet.dst,
            Self::Delete(packet) => packet.dst,
            Self::Histogram(packet) => packet.dst,
            Self::Sync(packet) => packet.dst,
        }
    }

    pub fn count(&self) -> usize {
        match self {
            Self::Put(packet) => packet.count(),
            Self::Get(packet) => packet.count(),
            Self::GetOp(packet) => packet.count(),
            Self::Delete(packet) => packet.count(),
            Self::Histogram(packet) => packet.count(),
            Self::Sync(packet) => packet.count(),
        }
    }
}
