// [libs/infra/wire/src/requests.rs]
/*!
 * =================================================================
 * APARATO: REQUEST PACKETS (V14.0 - STRUCT OF ARRAYS)
 * CLASIFICACIÓN: INFRASTRUCTURE CODEC (ESTRATO L3-WIRE)
 * RESPONSABILIDAD: PAQUETES DE PETICIÓN ACOTADOS POR DESTINO
 *
 * Cada paquete agrupa hasta max_ops_per_send operaciones del mismo
 * tipo con destino a un único servidor de rango. El layout es
 * estructura-de-vectores: los campos de la ranura i viven en la
 * posición i de cada vector paralelo. `add` rechaza con PacketFull
 * cuando la capacidad se agota, y el empaquetador reacciona cerrando
 * y reabriendo el paquete del destino.
 * =================================================================
 */

use triplex_domain_models::{Blob, DataType, GetOpKind, Operation, PutPermutation};

use crate::errors::WireError;
use crate::frame::{FrameReader, FrameWriter};

/// PUT: sujeto, predicado y objeto por valor, más la manilla de
/// origen de sujeto/predicado y la permutación que originó la ranura.
#[derive(Debug, Clone)]
pub struct PutRequest {
    pub src: i32,
    pub dst: i32,
    capacity: usize,
    pub subjects: Vec<Blob>,
    pub subject_refs: Vec<u64>,
    pub predicates: Vec<Blob>,
    pub predicate_refs: Vec<u64>,
    pub objects: Vec<Blob>,
    pub permutations: Vec<PutPermutation>,
}

impl PutRequest {
    pub fn new(src: i32, dst: i32, capacity: usize) -> Self {
        Self {
            src,
            dst,
            capacity,
            subjects: Vec::with_capacity(capacity),
            subject_refs: Vec::with_capacity(capacity),
            predicates: Vec::with_capacity(capacity),
            predicate_refs: Vec::with_capacity(capacity),
            objects: Vec::with_capacity(capacity),
            permutations: Vec::with_capacity(capacity),
        }
    }

    pub fn count(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_full(&self) -> bool {
        self.count() >= self.capacity
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add(
        &mut self,
        subject: Blob,
        subject_ref: u64,
        predicate: Blob,
        predicate_ref: u64,
        object: Blob,
        permutation: PutPermutation,
    ) -> Result<(), WireError> {
        if self.is_full() {
            return Err(WireError::PacketFull { capacity: self.capacity });
        }

        self.subjects.push(subject);
        self.subject_refs.push(subject_ref);
        self.predicates.push(predicate);
        self.predicate_refs.push(predicate_ref);
        self.objects.push(object);
        self.permutations.push(permutation);
        Ok(())
    }

    pub(crate) fn pack_body(&self, writer: &mut FrameWriter) {
        for slot in 0..self.count() {
            writer.put_blob(&self.subjects[slot]);
            writer.put_u64(self.subject_refs[slot]);
            writer.put_blob(&self.predicates[slot]);
            writer.put_u64(self.predicate_refs[slot]);
            writer.put_blob(&self.objects[slot]);
            writer.put_u32(self.permutations[slot].bits());
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
            let subject = reader.get_blob()?;
            let subject_ref = reader.get_u64()?;
            let predicate = reader.get_blob()?;
            let predicate_ref = reader.get_u64()?;
            let object = reader.get_blob()?;
            let permutation = PutPermutation::from_bits(reader.get_u32()?);
            packet
                .add(subject, subject_ref, predicate, predicate_ref, object, permutation)
                .expect("capacity equals declared count");
        }
        Ok(packet)
    }
}

/// GET: sujeto y predicado por valor más manillas, y el tipo del
/// objeto que el llamante espera recibir.
#[derive(Debug, Clone)]
pub struct GetRequest {
    pub src: i32,
    pub dst: i32,
    capacity: usize,
    pub subjects: Vec<Blob>,
    pub subject_refs: Vec<u64>,
    pub predicates: Vec<Blob>,
    pub predicate_refs: Vec<u64>,
    pub object_types: Vec<DataType>,
}

impl GetRequest {
    pub fn new(src: i32, dst: i32, capacity: usize) -> Self {
        Self {
            src,
            dst,
            capacity,
            subjects: Vec::with_capacity(capacity),
            subject_refs: Vec::with_capacity(capacity),
            predicates: Vec::with_capacity(capacity),
            predicate_refs: Vec::with_capacity(capacity),
            object_types: Vec::with_capacity(capacity),
        }
    }

    pub fn count(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_full(&self) -> bool {
        self.count() >= self.capacity
    }

    pub fn add(
        &mut self,
        subject: Blob,
        subject_ref: u64,
        predicate: Blob,
        predicate_ref: u64,
        object_type: DataType,
    ) -> Result<(), WireError> {
        if self.is_full() {
            return Err(WireError::PacketFull { capacity: self.capacity });
        }

        self.subjects.push(subject);
        self.subject_refs.push(subject_ref);
        self.predicates.push(predicate);
        self.predicate_refs.push(predicate_ref);
        self.object_types.push(object_type);
        Ok(())
    }

    pub(crate) fn pack_body(&self, writer: &mut FrameWriter) {
        for slot in 0..self.count() {
            writer.put_blob(&self.subjects[slot]);
            writer.put_u64(self.subject_refs[slot]);
            writer.put_blob(&self.predicates[slot]);
            writer.put_u64(self.predicate_refs[slot]);
            writer.put_u8(self.object_types[slot].to_wire());
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
            let subject = reader.get_blob()?;
            let subject_ref = reader.get_u64()?;
            let predicate = reader.get_blob()?;
            let predicate_ref = reader.get_u64()?;
            let object_type = DataType::from_wire(reader.get_u8()?)?;
            packet
                .add(subject, subject_ref, predicate, predicate_ref, object_type)
                .expect("capacity equals declared count");
        }
        Ok(packet)
    }
}

/// GETOP: consulta de rango ordenado; num_recs limita los registros
/// y la modalidad elige el recorrido (EQ/NEXT/PREV/FIRST/LAST).
#[derive(Debug, Clone)]
pub struct GetOpRequest {
    pub src: i32,
    pub dst: i32,
    capacity: usize,
    pub subjects: Vec<Blob>,
    pub predicates: Vec<Blob>,
    pub object_types: Vec<DataType>,
    pub num_recs: Vec<u64>,
    pub kinds: Vec<GetOpKind>,
}

impl GetOpRequest {
    pub fn new(src: i32, dst: i32, capacity: usize) -> Self {
        Self {
            src,
            dst,
            capacity,
            subjects: Vec::with_capacity(capacity),
            predicates: Vec::with_capacity(capacity),
            object_types: Vec::with_capacity(capacity),
            num_recs: Vec::with_capacity(capacity),
            kinds: Vec::with_capacity(capacity),
        }
    }

    pub fn count(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_full(&self) -> bool {
        self.count() >= self.capacity
    }

    pub fn add(
        &mut self,
        subject: Blob,
        predicate: Blob,
        object_type: DataType,
        num_recs: u64,
        kind: GetOpKind,
    ) -> Result<(), WireError> {
        if self.is_full() {
            return Err(WireError::PacketFull { capacity: self.capacity });
        }

        self.subjects.push(subject);
        self.predicates.push(predicate);
        self.object_types.push(object_type);
        self.num_recs.push(num_recs);
        self.kinds.push(kind);
        Ok(())
    }

    pub(crate) fn pack_body(&self, writer: &mut FrameWriter) {
        for slot in 0..self.count() {
            writer.put_blob(&self.subjects[slot]);
            writer.put_blob(&self.predicates[slot]);
            writer.put_u8(self.object_types[slot].to_wire());
            writer.put_u64(self.num_recs[slot]);
            writer.put_u8(self.kinds[slot].to_wire());
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
            let subject = reader.get_blob()?;
            let predicate = reader.get_blob()?;
            let object_type = DataType::from_wire(reader.get_u8()?)?;
            let num_recs = reader.get_u64()?;
            let kind = GetOpKind::from_wire(reader.get_u8()?)?;
            packet
                .add(subject, predicate, object_type, num_recs, kind)
                .expect("capacity equals declared count");
        }
        Ok(packet)
    }
}

/// DELETE: sujeto y predicado por valor más manillas.
#[derive(Debug, Clone)]
pub struct DeleteRequest {
    pub src: i32,
    pub dst: i32,
    capacity: usize,
    pub subjects: Vec<Blob>,
    pub subject_refs: Vec<u64>,
    pub predicates: Vec<Blob>,
    pub predicate_refs: Vec<u64>,
}

impl DeleteRequest {
    pub fn new(src: i32, dst: i32, capacity: usize) -> Self {
        Self {
            src,
            dst,
            capacity,
            subjects: Vec::with_capacity(capacity),
            subject_refs: Vec::with_capacity(capacity),
            predicates: Vec::with_capacity(capacity),
            predicate_refs: Vec::with_capacity(capacity),
        }
    }

    pub fn count(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_full(&self) -> bool {
        self.count() >= self.capacity
    }

    pub fn add(
        &mut self,
        subject: Blob,
        subject_ref: u64,
        predicate: Blob,
        predicate_ref: u64,
    ) -> Result<(), WireError> {
        if self.is_full() {
            return Err(WireError::PacketFull { capacity: self.capacity });
        }

        self.subjects.push(subject);
        self.subject_refs.push(subject_ref);
        self.predicates.push(predicate);
        self.predicate_refs.push(predicate_ref);
        Ok(())
    }

    pub(crate) fn pack_body(&self, writer: &mut FrameWriter) {
        for slot in 0..self.count() {
            writer.put_blob(&self.subjects[slot]);
            writer.put_u64(self.subject_refs[slot]);
            writer.put_blob(&self.predicates[slot]);
            writer.put_u64(self.predicate_refs[slot]);
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
            let subject = reader.get_blob()?;
            let subject_ref = reader.get_u64()?;
            let predicate = reader.get_blob()?;
            let predicate_ref = reader.get_u64()?;
            packet
                .add(subject, subject_ref, predicate, predicate_ref)
                .expect("capacity equals declared count");
        }
        Ok(packet)
    }
}

/// HISTOGRAM: el nombre del histograma solicitado, por valor.
#[derive(Debug, Clone)]
pub struct HistogramRequest {
    pub src: i32,
    pub dst: i32,
    capacity: usize,
    pub names: Vec<Blob>,
}

impl HistogramRequest {
    pub fn new(src: i32, dst: i32, capacity: usize) -> Self {
        Self { src, dst, capacity, names: Vec::with_capacity(capacity) }
    }

    pub fn count(&self) -> usize {
        self.names.len()
    }

    pub fn is_full(&self) -> bool {
        self.count() >= self.capacity
    }

    pub fn add(&mut self, name: Blob) -> Result<(), WireError> {
        if self.is_full() {
            return Err(WireError::PacketFull { capacity: self.capacity });
        }

        self.names.push(name);
        Ok(())
    }

    pub(crate) fn pack_body(&self, writer: &mut FrameWriter) {
        for name in &self.names {
            writer.put_blob(name);
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
            let name = reader.get_blob()?;
            packet.add(name).expect("capacity equals declared count");
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

wire_field_equality!(PutRequest {
    src, dst, subjects, subject_refs, predicates, predicate_refs, objects, permutations,
});
wire_field_equality!(GetRequest {
    src, dst, subjects, subject_refs, predicates, predicate_refs, object_types,
});
wire_field_equality!(GetOpRequest {
    src, dst, subjects, predicates, object_types, num_recs, kinds,
});
wire_field_equality!(DeleteRequest {
    src, dst, subjects, subject_refs, predicates, predicate_refs,
});
wire_field_equality!(HistogramRequest { src, dst, names });

/// SYNC: sin ranuras; la trama sólo transporta la orden colectiva.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    pub src: i32,
    pub dst: i32,
}

impl SyncRequest {
    pub fn new(src: i32, dst: i32) -> Self {
        Self { src, dst }
    }
}

/// Paquete de petición de cualquier tipo, para el despacho uniforme
/// del transporte y del bucle del servidor.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPacket {
    Put(PutRequest),
    Get(GetRequest),
    GetOp(GetOpRequest),
    Delete(DeleteRequest),
    Histogram(HistogramRequest),
    Sync(SyncRequest),
}

impl RequestPacket {
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
            Self::Sync(_) => 0,
        }
    }
}
