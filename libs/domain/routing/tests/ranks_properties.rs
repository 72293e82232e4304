// [libs/domain/routing/tests/ranks_properties.rs]
/**
 * =================================================================
 * APARATO: RANK ARITHMETIC PROPERTY SUITE (V10.0 - PROVING GROUNDS)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L2-ROUTING)
 * RESPONSABILIDAD: CERTIFICACIÓN CUANTIFICADA DE LA BIYECCIÓN
 * =================================================================
 */

use proptest::prelude::*;

use triplex_domain_routing::ranks::{
    id_of_rank, is_range_server, rank_of_id, server_count_in_world,
};

proptest! {
    #[test]
    fn every_server_id_maps_to_a_server_rank_and_back(
        id in 0usize..4096,
        client_ratio in 1usize..32,
        server_ratio in 1usize..32,
    ) {
        let rank = rank_of_id(id, client_ratio, server_ratio).unwrap();
        prop_assert!(
            is_range_server(rank, client_ratio, server_ratio).unwrap(),
            "rank_of_id landed on a non-server rank"
        );
        prop_assert_eq!(id_of_rank(rank, client_ratio, server_ratio).unwrap(), id);
    }

    #[test]
    fn server_ranks_are_exactly_the_image_of_rank_of_id(
        rank in 0usize..4096,
        client_ratio in 1usize..32,
        server_ratio in 1usize..32,
    ) {
        let classified = is_range_server(rank, client_ratio, server_ratio).unwrap();
        match id_of_rank(rank, client_ratio, server_ratio) {
            Ok(id) => {
                prop_assert!(classified, "id_of_rank accepted a non-server rank");
                prop_assert_eq!(rank_of_id(id, client_ratio, server_ratio).unwrap(), rank);
            }
            Err(_) => prop_assert!(!classified, "id_of_rank rejected a server rank"),
        }
    }

    #[test]
    fn the_world_census_counts_every_server_rank(
        world_size in 1usize..256,
        client_ratio in 1usize..16,
        server_ratio in 1usize..16,
    ) {
        let census = server_count_in_world(world_size, client_ratio, server_ratio).unwrap();
        let enumerated = (0..world_size)
            .filter(|rank| is_range_server(*rank, client_ratio, server_ratio).unwrap())
            .count();
        prop_assert_eq!(census, enumerated);
    }
}
