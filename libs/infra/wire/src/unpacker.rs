// [libs/infra/wire/src/unpacker.rs]
/*!
 * =================================================================
 * APARATO: FRAME UNPACKER (V13.2 - TOTAL ON WELL-FORMED INPUT)
 * CLASIFICACIÓN: INFRASTRUCTURE CODEC (ESTRATO L3-WIRE)
 * RESPONSABILIDAD: RÁFAGA DE BYTES → PAQUETE EN MEMORIA
 *
 * El desempaquetador es total sobre tramas bien formadas y devuelve
 * un error de clase códec ante truncamiento, operación desconocida,
 * dirección desconocida o un count por encima del máximo
 * configurado. El paquete resultante posee todo su material.
 * =================================================================
 */

use triplex_domain_models::{Direction, Operation};

use crate::errors::WireError;
use crate::frame::FrameReader;
use crate::requests::{
    DeleteRequest, GetOpRequest, GetRequest, HistogramRequest, PutRequest, RequestPacket,
    SyncRequest,
};
use crate::responses::{
    DeleteResponse, GetOpResponse, GetResponse, HistogramResponse, PutResponse,
    ResponsePacket, SyncResponse,
};

struct FrameHeader {
    direction: Direction,
    operation: Operation,
    src: i32,
    dst: i32,
    count: usize,
}

fn read_header(
    reader: &mut FrameReader<'_>,
    max_count: usize,
) -> Result<FrameHeader, WireError> {
    let direction = Direction::from_wire(reader.get_u8()?)?;
    let operation = Operation::from_wire(reader.get_u8()?)?;
    let src = reader.get_i32()?;
    let dst = reader.get_i32()?;
    let count = reader.get_u32()? as usize;

    if count > max_count {
        return Err(WireError::CountOverflow { declared: count, maximum: max_count });
    }

    Ok(FrameHeader { direction, operation, src, dst, count })
}

/**
 * Desempaqueta una trama de petición.
 *
 * @param material  la ráfaga completa recibida del transporte.
 * @param max_count el máximo de operaciones por envío configurado.
 */
pub fn unpack_request(
    material: &[u8],
    max_count: usize,
) -> Result<RequestPacket, WireError> {
    let mut reader = FrameReader::new(material);
    let header = read_header(&mut reader, max_count)?;

    if header.direction != Direction::Request {
        return Err(WireError::DirectionMismatch { expected: "REQUEST" });
    }

    let packet = match header.operation {
        Operation::Put => RequestPacket::Put(PutRequest::unpack_body(
            header.src, header.dst, header.count, &mut reader,
        )?),
        Operation::Get => RequestPacket::Get(GetRequest::unpack_body(
            header.src, header.dst, header.count, &mut reader,
        )?),
        Operation::GetOp => RequestPacket::GetOp(GetOpRequest::unpack_body(
            header.src, header.dst, header.count, &mut reader,
        )?),
        Operation::Delete => RequestPacket::Delete(DeleteRequest::unpack_body(
            header.src, header.dst, header.count, &mut reader,
        )?),
        Operation::Histogram => RequestPacket::Histogram(HistogramRequest::unpack_body(
            header.src, header.dst, header.count, &mut reader,
        )?),
        Operation::Sync => RequestPacket::Sync(SyncRequest::new(header.src, header.dst)),
    };

    Ok(packet)
}

/// Desempaqueta una trama de respuesta.
pub fn unpack_response(
    material: &[u8],
    max_count: usize,
) -> Result<ResponsePacket, WireError> {
    let mut reader = FrameReader::new(material);
    let header = read_header(&mut reader, max_count)?;

    if header.direction != Direction::Response {
        return Err(WireError::DirectionMismatch { expected: "RESPONSE" });
    }

    let packet = match header.operation {
        Operation::Put => ResponsePacket::Put(PutResponse::unpack_body(
            header.src, header.dst, header.count, &mut reader,
        )?),
        Operation::Get => ResponsePacket::Get(GetResponse::unpack_body(
            header.src, header.dst, header.count, &mut reader,
        )?),
        Operation::GetOp => ResponsePacket::GetOp(GetOpResponse::unpack_body(
            header.src, header.dst, header.count, &mut reader,
        )?),
        Operation::Delete => ResponsePacket::Delete(DeleteResponse::unpack_body(
            header.src, header.dst, header.count, &mut reader,
        )?),
        Operation::Histogram => ResponsePacket::Histogram(HistogramResponse::unpack_body(
            header.src, header.dst, header.count, &mut reader,
        )?),
        Operation::Sync => ResponsePacket::Sync(SyncResponse::unpack_body(
            header.src, header.dst, header.count, &mut reader,
        )?),
    };

    Ok(packet)
}
