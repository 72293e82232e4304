// [libs/infra/wire/src/packer.rs]
/*!
 * =================================================================
 * APARATO: FRAME PACKER (V13.2 - HEADER SEALED)
 * CLASIFICACIÓN: INFRASTRUCTURE CODEC (ESTRATO L3-WIRE)
 * RESPONSABILIDAD: PAQUETE EN MEMORIA → RÁFAGA DE BYTES AUTODESCRITA
 *
 * Toda trama comienza con la cabecera fija:
 *   direction:u8 ∥ op:u8 ∥ src:i32 ∥ dst:i32 ∥ count:u32
 * seguida de count registros en el layout que dicta la operación.
 * =================================================================
 */

use triplex_domain_models::{Direction, Operation};

use crate::frame::FrameWriter;
use crate::requests::RequestPacket;
use crate::responses::ResponsePacket;

/// Bytes fijos de la cabecera de toda trama.
pub const HEADER_BYTES: usize = 1 + 1 + 4 + 4 + 4;

/// Capacidad inicial estimada para el búfer de empaquetado.
/// Las ráfagas reales crecen según el material; esto sólo evita las
/// primeras re-alocaciones en paquetes pequeños.
const INITIAL_FRAME_CAPACITY_BYTES: usize = 512;

fn write_header(
    writer: &mut FrameWriter,
    direction: Direction,
    operation: Operation,
    src: i32,
    dst: i32,
    count: usize,
) {
    writer.put_u8(direction.to_wire());
    writer.put_u8(operation.to_wire());
    writer.put_i32(src);
    writer.put_i32(dst);
    writer.put_u32(count as u32);
}

/// Empaqueta una petición completa, cabecera incluida.
pub fn pack_request(packet: &RequestPacket) -> Vec<u8> {
    let mut writer = FrameWriter::with_capacity(INITIAL_FRAME_CAPACITY_BYTES);
    write_header(
        &mut writer,
        Direction::Request,
        packet.operation(),
        packet.src(),
        packet.dst(),
        packet.count(),
    );

    match packet {
        RequestPacket::Put(request) => request.pack_body(&mut writer),
        RequestPacket::Get(request) => request.pack_body(&mut writer),
        RequestPacket::GetOp(request) => request.pack_body(&mut writer),
        RequestPacket::Delete(request) => request.pack_body(&mut writer),
        RequestPacket::Histogram(request) => request.pack_body(&mut writer),
        RequestPacket::Sync(_) => {}
    }

    writer.into_bytes()
}

/// Empaqueta una respuesta completa, cabecera incluida.
pub fn pack_response(packet: &ResponsePacket) -> Vec<u8> {
    let mut writer = FrameWriter::with_capacity(INITIAL_FRAME_CAPACITY_BYTES);
    write_header(
        &mut writer,
        Direction::Response,
        packet.operation(),
        packet.src(),
        packet.dst(),
        packet.count(),
    );

    match packet {
        ResponsePacket::Put(response) => response.pack_body(&mut writer),
        ResponsePacket::Get(response) => response.pack_body(&mut writer),
        ResponsePacket::GetOp(response) => response.pack_body(&mut writer),
        ResponsePacket::Delete(response) => response.pack_body(&mut writer),
        ResponsePacket::Histogram(response) => response.pack_body(&mut writer),
        ResponsePacket::Sync(response) => response.pack_body(&mut writer),
    }

    writer.into_bytes()
}
