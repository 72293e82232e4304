// [libs/domain/routing/src/ranks.rs]
/*!
 * =================================================================
 * APARATO: CLIENT:SERVER BLOCK ARITHMETIC (V11.2 - O(1) SEALED)
 * CLASIFICACIÓN: DOMAIN LAYER (ESTRATO L2-ROUTING)
 * RESPONSABILIDAD: BIYECCIÓN RANGO ↔ ID DE SERVIDOR DE RANGO
 *
 * # Mathematical Proof (Block Bijection):
 * Con C > S cada bloque de C rangos aporta exactamente S servidores,
 * de modo que rank_of_id(id) = (id / S)·C + (id mod S) y
 * id_of_rank(rank) = (rank / C)·S + (rank mod C) son inversas sobre
 * el subconjunto de rangos servidores. Con S ≥ C todos los rangos
 * son servidores y ambas funciones son la identidad.
 *
 * Ejemplo (C:S = 5:3):
 *     Rango:     |  0  |  1  |  2  |  3  |  4  |  5  |  6  |
 *     Servidor:  |  0  |  1  |  2  |     |     |  3  |  4  |
 * =================================================================
 */

use crate::errors::RoutingError;

/// Si el rango actuaría como servidor de rango en un mundo infinito.
pub fn is_range_server(
    rank: usize,
    client_ratio: usize,
    server_ratio: usize,
) -> Result<bool, RoutingError> {
    if client_ratio == 0 || server_ratio == 0 {
        return Err(RoutingError::ZeroRatio);
    }

    Ok((rank % client_ratio) < server_ratio)
}

/// Variante consciente del tamaño de mundo: rechaza rangos inexistentes.
pub fn is_range_server_in_world(
    rank: usize,
    world_size: usize,
    client_ratio: usize,
    server_ratio: usize,
) -> Result<bool, RoutingError> {
    if rank >= world_size {
        return Err(RoutingError::RankOutOfWorld { rank, world_size });
    }

    is_range_server(rank, client_ratio, server_ratio)
}

/// Rango donde reside el id de servidor dado.
pub fn rank_of_id(
    id: usize,
    client_ratio: usize,
    server_ratio: usize,
) -> Result<usize, RoutingError> {
    if client_ratio == 0 || server_ratio == 0 {
        return Err(RoutingError::ZeroRatio);
    }

    // todos los rangos son servidores: los ids coinciden con los rangos
    if server_ratio >= client_ratio {
        return Ok(id);
    }

    let block = id / server_ratio;
    let offset = id % server_ratio;
    Ok(block * client_ratio + offset)
}

/// Variante consciente del tamaño de mundo.
pub fn rank_of_id_in_world(
    id: usize,
    world_size: usize,
    client_ratio: usize,
    server_ratio: usize,
) -> Result<usize, RoutingError> {
    let rank = rank_of_id(id, client_ratio, server_ratio)?;
    if rank >= world_size {
        return Err(RoutingError::RankOutOfWorld { rank, world_size });
    }

    Ok(rank)
}

/// Id del servidor alojado en el rango, si el rango es servidor.
pub fn id_of_rank(
    rank: usize,
    client_ratio: usize,
    server_ratio: usize,
) -> Result<usize, RoutingError> {
    if client_ratio == 0 || server_ratio == 0 {
        return Err(RoutingError::ZeroRatio);
    }

    // todos los rangos son servidores: los ids coinciden con los rangos
    if server_ratio >= client_ratio {
        return Ok(rank);
    }

    let block_offset = rank % client_ratio;
    if block_offset >= server_ratio {
        return Err(RoutingError::NotARangeServer { rank });
    }

    // cada bloque completo aporta server_ratio servidores
    let whole_blocks = rank / client_ratio;
    Ok(whole_blocks * server_ratio + block_offset)
}

/// Variante consciente del tamaño de mundo.
pub fn id_of_rank_in_world(
    rank: usize,
    world_size: usize,
    client_ratio: usize,
    server_ratio: usize,
) -> Result<usize, RoutingError> {
    if rank >= world_size {
        return Err(RoutingError::RankOutOfWorld { rank, world_size });
    }

    id_of_rank(rank, client_ratio, server_ratio)
}

/// Número de servidores de rango presentes en un mundo finito.
pub fn server_count_in_world(
    world_size: usize,
    client_ratio: usize,
    server_ratio: usize,
) -> Result<usize, RoutingError> {
    if client_ratio == 0 || server_ratio == 0 {
        return Err(RoutingError::ZeroRatio);
    }

    if server_ratio >= client_ratio {
        return Ok(world_size);
    }

    let whole_blocks = world_size / client_ratio;
    let trailing = (world_size % client_ratio).min(server_ratio);
    Ok(whole_blocks * server_ratio + trailing)
}

#[cfg(test)]
mod tests {
    use super::*;

    // el ejemplo 5:3 del diagrama de bloques
    #[test]
    fn five_to_three_layout_matches_the_block_diagram() {
        let expected_servers = [true, true, true, false, false, true, true];
        for (rank, expected) in expected_servers.iter().enumerate() {
            assert_eq!(
                is_range_server(rank, 5, 3).unwrap(),
                *expected,
                "rank {} misclassified",
                rank
            );
        }

        assert_eq!(rank_of_id(0, 5, 3).unwrap(), 0);
        assert_eq!(rank_of_id(2, 5, 3).unwrap(), 2);
        assert_eq!(rank_of_id(3, 5, 3).unwrap(), 5);
        assert_eq!(rank_of_id(4, 5, 3).unwrap(), 6);

        assert_eq!(id_of_rank(5, 5, 3).unwrap(), 3);
        assert!(matches!(
            id_of_rank(3, 5, 3),
            Err(RoutingError::NotARangeServer { rank: 3 })
        ));
    }

    #[test]
    fn more_servers_than_clients_makes_every_rank_a_server() {
        for rank in 0..7 {
            assert!(is_range_server(rank, 3, 5).unwrap());
            assert_eq!(rank_of_id(rank, 3, 5).unwrap(), rank);
            assert_eq!(id_of_rank(rank, 3, 5).unwrap(), rank);
        }
    }

    #[test]
    fn zero_ratios_are_rejected() {
        assert!(matches!(is_range_server(0, 0, 1), Err(RoutingError::ZeroRatio)));
        assert!(matches!(rank_of_id(0, 1, 0), Err(RoutingError::ZeroRatio)));
    }

    #[test]
    fn world_aware_variants_reject_out_of_range_material() {
        assert!(matches!(
            is_range_server_in_world(7, 7, 5, 3),
            Err(RoutingError::RankOutOfWorld { .. })
        ));
        assert!(matches!(
            rank_of_id_in_world(4, 6, 5, 3),
            Err(RoutingError::RankOutOfWorld { rank: 6, world_size: 6 })
        ));
        assert_eq!(rank_of_id_in_world(3, 6, 5, 3).unwrap(), 5);
    }

    #[test]
    fn id_and_rank_form_a_bijection_over_servers() {
        for (client_ratio, server_ratio) in [(5, 3), (3, 5), (1, 1), (7, 2)] {
            for id in 0..64 {
                let rank = rank_of_id(id, client_ratio, server_ratio).unwrap();
                assert!(is_range_server(rank, client_ratio, server_ratio).unwrap());
                assert_eq!(id_of_rank(rank, client_ratio, server_ratio).unwrap(), id);
            }
        }
    }

    #[test]
    fn world_server_census_counts_partial_blocks() {
        assert_eq!(server_count_in_world(7, 5, 3).unwrap(), 5);
        assert_eq!(server_count_in_world(7, 3, 5).unwrap(), 7);
        assert_eq!(server_count_in_world(10, 5, 3).unwrap(), 6);
        assert_eq!(server_count_in_world(4, 5, 3).unwrap(), 3);
    }
}
