#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Operator catalog: enumerates every anchor each move operator can act on.
//!
//! Instances depend only on grid topology, so a catalog is built once per
//! grid. World-space pivots depend on tile size and origin and are resolved on
//! demand through [`anchor_world`].

use std::collections::{BTreeMap, HashMap, HashSet};

use glam::Vec2;
use hexspin_board::Grid;
use hexspin_core::{
    hex_corners, world_from_cell, AnchorId, AnchorInstance, CellCoord, EngineError, HexDirection,
    OperatorKind,
};

/// Every anchor instance of every operator on one grid.
#[derive(Clone, Debug)]
pub struct OperatorCatalog {
    instances: BTreeMap<OperatorKind, Vec<AnchorInstance>>,
    index: HashMap<AnchorId, (OperatorKind, usize)>,
}

impl OperatorCatalog {
    /// Builds the instance lists of all operators for the grid.
    #[must_use]
    pub fn build(grid: &Grid) -> Self {
        let mut instances = BTreeMap::new();
        let mut index = HashMap::new();
        for kind in OperatorKind::ALL {
            let built = build_instances(grid, kind);
            for (position, instance) in built.iter().enumerate() {
                let _ = index.insert(instance.id().clone(), (kind, position));
            }
            tracing::debug!(operator = %kind, instances = built.len(), "operator instances built");
            let _ = instances.insert(kind, built);
        }
        Self { instances, index }
    }

    /// Instances of a single operator, in discovery order.
    #[must_use]
    pub fn instances(&self, kind: OperatorKind) -> &[AnchorInstance] {
        self.instances
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Looks up an instance by its anchor id.
    #[must_use]
    pub fn get(&self, anchor: &AnchorId) -> Option<&AnchorInstance> {
        let (kind, position) = self.index.get(anchor)?;
        self.instances.get(kind)?.get(*position)
    }

    /// Total number of instances across all operators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Reports whether the grid admits no moves at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Operators from `enabled` that have at least one instance on this grid.
    #[must_use]
    pub fn available(&self, enabled: &[OperatorKind]) -> Vec<OperatorKind> {
        let mut seen = HashSet::new();
        enabled
            .iter()
            .copied()
            .filter(|kind| seen.insert(*kind) && !self.instances(*kind).is_empty())
            .collect()
    }
}

/// Enumerates the instances of one operator over the grid.
///
/// Candidates whose cells are not all on the grid are skipped; edge cells
/// simply have fewer anchors.
#[must_use]
pub fn build_instances(grid: &Grid, kind: OperatorKind) -> Vec<AnchorInstance> {
    match kind.cell_directions() {
        Some(directions) => cell_anchored_instances(grid, kind, directions),
        None => vertex_instances(grid),
    }
}

fn cell_anchored_instances(
    grid: &Grid,
    kind: OperatorKind,
    directions: &[HexDirection],
) -> Vec<AnchorInstance> {
    let mut instances = Vec::new();
    for &anchor in grid.cells() {
        let cycle: Vec<CellCoord> = directions
            .iter()
            .map(|direction| anchor.neighbor(*direction))
            .collect();
        if !cycle.iter().all(|cell| grid.has_cell(*cell)) {
            continue;
        }
        let spin = kind.spins_anchor().then_some(anchor);
        instances.push(AnchorInstance::new(
            kind,
            AnchorId::for_cell(kind, anchor),
            cycle,
            spin,
        ));
    }
    instances
}

fn vertex_instances(grid: &Grid) -> Vec<AnchorInstance> {
    let mut seen = HashSet::new();
    let mut instances = Vec::new();
    for &cell in grid.cells() {
        for direction in HexDirection::ALL {
            let first = cell.neighbor(direction);
            let second = cell.neighbor(direction.next());
            if !grid.has_cell(first) || !grid.has_cell(second) {
                continue;
            }
            let id = AnchorId::for_vertex([cell, first, second]);
            if !seen.insert(id.clone()) {
                continue;
            }
            // Discovery order (cell, first, second) runs clockwise around the
            // shared corner, matching the ring operators.
            instances.push(AnchorInstance::new(
                OperatorKind::Vertex,
                id,
                vec![cell, first, second],
                None,
            ));
        }
    }
    instances
}

/// World-space point the instance rotates around.
///
/// Cell-anchored operators pivot on the anchor cell, which is the centroid of
/// their symmetric cycle. Vertex instances pick one corner from each cell so
/// that the largest pairwise distance is minimal and pivot on the centroid of
/// that triple; ties keep the first combination in corner-index order.
pub fn anchor_world(
    instance: &AnchorInstance,
    tile_size: f32,
    origin: Vec2,
) -> Result<Vec2, EngineError> {
    match instance.kind() {
        OperatorKind::Vertex => vertex_pivot(instance, tile_size, origin),
        OperatorKind::Ring6 | OperatorKind::AlternatingEven | OperatorKind::AlternatingOdd => {
            if let Some(spin) = instance.spin() {
                return Ok(world_from_cell(spin, tile_size, origin));
            }
            let cycle = instance.cycle();
            let sum: Vec2 = cycle
                .iter()
                .map(|cell| world_from_cell(*cell, tile_size, origin))
                .sum();
            Ok(sum / cycle.len().max(1) as f32)
        }
    }
}

fn vertex_pivot(
    instance: &AnchorInstance,
    tile_size: f32,
    origin: Vec2,
) -> Result<Vec2, EngineError> {
    let degenerate = || EngineError::DegenerateVertexAnchor {
        anchor: instance.id().clone(),
    };
    let [a, b, c] = instance.cycle() else {
        return Err(degenerate());
    };
    let corners_a = hex_corners(*a, tile_size, origin);
    let corners_b = hex_corners(*b, tile_size, origin);
    let corners_c = hex_corners(*c, tile_size, origin);

    let mut best: Option<(f32, [Vec2; 3])> = None;
    for &pa in &corners_a {
        for &pb in &corners_b {
            for &pc in &corners_c {
                let spread = pa
                    .distance(pb)
                    .max(pb.distance(pc))
                    .max(pa.distance(pc));
                let improves = match best {
                    Some((best_spread, _)) => spread < best_spread,
                    None => spread.is_finite(),
                };
                if improves {
                    best = Some((spread, [pa, pb, pc]));
                }
            }
        }
    }

    let (_, [pa, pb, pc]) = best.ok_or_else(degenerate)?;
    Ok((pa + pb + pc) / 3.0)
}
