use std::collections::HashMap;

use glam::Vec2;
use hexspin_board::{apply_move, is_solved, query, BoardState, Grid};
use hexspin_core::{hex_corners, OperatorKind, Rotation, TurnDirection, ROTATION_STEPS};
use hexspin_system_operators::{build_instances, OperatorCatalog};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn shuffled_board(grid: &Grid, catalog: &OperatorCatalog, seed: u64, moves: usize) -> BoardState {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = BoardState::create_solved(grid);
    for _ in 0..moves {
        let kind = *OperatorKind::ALL.choose(&mut rng).expect("operators");
        let Some(instance) = catalog.instances(kind).choose(&mut rng) else {
            continue;
        };
        let direction = if rng.gen_bool(0.5) {
            TurnDirection::Clockwise
        } else {
            TurnDirection::CounterClockwise
        };
        let _ = apply_move(&mut state, instance, direction).expect("legal move");
    }
    state
}

#[test]
fn every_move_preserves_the_bijection() {
    let grid = Grid::create(6, 5).expect("grid");
    let catalog = OperatorCatalog::build(&grid);
    let mut state = shuffled_board(&grid, &catalog, 11, 40);

    for kind in OperatorKind::ALL {
        for instance in catalog.instances(kind) {
            for direction in TurnDirection::ALL {
                let _ = apply_move(&mut state, instance, direction).expect("legal move");
                assert!(
                    query::is_consistent(&state),
                    "{} broke the cell/tile bijection",
                    instance.id()
                );
                assert_eq!(query::tile_count(&state), grid.cell_count());
            }
        }
    }
}

#[test]
fn opposite_turn_restores_the_board_exactly() {
    let grid = Grid::create(5, 5).expect("grid");
    let catalog = OperatorCatalog::build(&grid);
    let start = shuffled_board(&grid, &catalog, 3, 25);

    for kind in OperatorKind::ALL {
        for instance in catalog.instances(kind) {
            for direction in TurnDirection::ALL {
                let mut state = start.clone();
                let _ = apply_move(&mut state, instance, direction).expect("forward");
                let _ = apply_move(&mut state, instance, direction.inverse()).expect("back");
                assert_eq!(state, start, "{} is not reversible", instance.id());
            }
        }
    }
}

#[test]
fn repeating_a_move_a_full_cycle_is_the_identity() {
    let grid = Grid::create(7, 5).expect("grid");
    let catalog = OperatorCatalog::build(&grid);
    let start = shuffled_board(&grid, &catalog, 29, 30);

    for kind in OperatorKind::ALL {
        let repeats = usize::from(ROTATION_STEPS / kind.rotation_step());
        assert_eq!(repeats, kind.cycle_length());
        for instance in catalog.instances(kind) {
            for direction in TurnDirection::ALL {
                let mut state = start.clone();
                for step in 1..=repeats {
                    let _ = apply_move(&mut state, instance, direction).expect("move");
                    if step < repeats {
                        assert_ne!(state, start, "{} returned early", instance.id());
                    }
                }
                assert_eq!(state, start, "{} did not return after {repeats}", instance.id());
            }
        }
    }
}

#[test]
fn ring_rotates_each_tile_one_step_per_move() {
    let grid = Grid::create(7, 3).expect("grid");
    let instances = build_instances(&grid, OperatorKind::Ring6);
    let instance = &instances[2];
    let mut state = BoardState::create_solved(&grid);

    for expected in 1..=5u8 {
        let moved = apply_move(&mut state, instance, TurnDirection::Clockwise).expect("move");
        for tile in moved {
            assert_eq!(query::rotation_of(&state, tile), Some(Rotation::new(expected)));
        }
    }
    let _ = apply_move(&mut state, instance, TurnDirection::Clockwise).expect("move");
    assert!(is_solved(&state));
}

#[test]
fn vertex_anchors_match_brute_force_corner_count() {
    let grid = Grid::create(7, 3).expect("grid");
    let tile_size = 10.0;
    let mut owners: HashMap<(i64, i64), usize> = HashMap::new();
    for cell in grid.cells() {
        for corner in hex_corners(*cell, tile_size, Vec2::ZERO) {
            let key = (
                (corner.x * 10.0).round() as i64,
                (corner.y * 10.0).round() as i64,
            );
            *owners.entry(key).or_insert(0) += 1;
        }
    }
    let shared_by_three = owners.values().filter(|count| **count == 3).count();

    let instances = build_instances(&grid, OperatorKind::Vertex);
    assert_eq!(instances.len(), shared_by_three);
    assert_eq!(instances.len(), 26);
}

#[test]
fn vertex_discovery_order_turns_like_the_ring() {
    let grid = Grid::create(7, 3).expect("grid");
    let instances = build_instances(&grid, OperatorKind::Vertex);
    for instance in &instances {
        let points: Vec<Vec2> = instance
            .cycle()
            .iter()
            .map(|cell| hexspin_core::world_from_cell(*cell, 1.0, Vec2::ZERO))
            .collect();
        let turn = (points[1] - points[0]).perp_dot(points[2] - points[0]);
        assert!(
            turn > 0.0,
            "{} is listed counter-clockwise on screen",
            instance.id()
        );
    }
}
